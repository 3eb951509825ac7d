//! Card expiration as printed on the card, `MM/YY`.

use core::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::EngineError;

/// Month/year pair after which a card stops working.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expiration {
    year: i32,
    month: u32,
}

impl Expiration {
    pub fn new(month: u32, year: i32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidExpiration(format!(
                "month {month} out of range"
            )));
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// A card is expired once `(year, month)` is strictly before the month
    /// containing `today`; it stays valid through its whole expiration month.
    #[must_use]
    pub fn is_expired_at(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

impl FromStr for Expiration {
    type Err = EngineError;

    /// Parses `MM/YY`; the two-digit year is offset by 2000.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidExpiration(format!("\"{}\" is not MM/YY", s.trim()));

        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let (month, year) = (month.trim(), year.trim());
        if year.len() != 2 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        Self::new(month, 2000 + year)
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year.rem_euclid(100))
    }
}
