//! Balance receipts and the trait for whatever persists them.

use core::fmt;

use chrono::NaiveDateTime;

use crate::{Money, ResultEngine};

const RULE: &str = "-------------------------";

/// A printed balance ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub issued_at: NaiveDateTime,
    pub owner_name: String,
    /// Masked, only the last four digits are shown.
    pub account_number: String,
    pub balance: Money,
}

impl Receipt {
    /// Ticket text, one field per line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "       ATM RECEIPT")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Date:    {}", self.issued_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Owner:   {}", self.owner_name)?;
        writeln!(f, "Account: {}", self.account_number)?;
        writeln!(f, "Balance: {}", self.balance)?;
        writeln!(f, "{RULE}")
    }
}

/// Persists receipts. Best effort: callers report a failure and go on.
pub trait ReceiptSink {
    fn write(&mut self, receipt: &Receipt) -> ResultEngine<()>;
}

/// Keeps rendered receipts in memory.
impl ReceiptSink for Vec<String> {
    fn write(&mut self, receipt: &Receipt) -> ResultEngine<()> {
        self.push(receipt.render());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn renders_every_field() {
        let receipt = Receipt {
            issued_at: NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(14, 3, 11)
                .unwrap(),
            owner_name: "Ana Martínez".to_string(),
            account_number: "*4440".to_string(),
            balance: Money::new(50_037),
        };

        let mut sink: Vec<String> = Vec::new();
        sink.write(&receipt).unwrap();

        let text = &sink[0];
        assert!(text.contains("Date:    2026-10-19 14:03:11"));
        assert!(text.contains("Owner:   Ana Martínez"));
        assert!(text.contains("Account: *4440"));
        assert!(text.contains("Balance: $500.37"));
    }
}
