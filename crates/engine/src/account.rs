//! The module contains `Account` struct and its implementation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Expiration, Money, cash};

/// How an outgoing transfer treats the source balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferPolicy {
    /// Reject transfers larger than the source balance, like withdrawals.
    #[default]
    Strict,
    /// Move the money even if the source goes negative.
    Permissive,
}

/// A bank account reachable from the teller.
///
/// Everything but the balance is fixed at creation. The balance only moves
/// through [`withdraw`], [`deposit`] and [`transfer`], which report failure
/// with `false` and leave the account untouched in that case.
///
/// [`withdraw`]: Account::withdraw
/// [`deposit`]: Account::deposit
/// [`transfer`]: Account::transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    owner_name: String,
    account_number: String,
    expiration: Expiration,
    pin: u32,
    balance: Money,
}

impl Account {
    pub fn new(
        owner_name: impl Into<String>,
        account_number: impl Into<String>,
        expiration: Expiration,
        pin: u32,
        balance: Money,
    ) -> Self {
        Self {
            owner_name: owner_name.into(),
            account_number: account_number.into(),
            expiration,
            pin,
            balance,
        }
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn expiration(&self) -> Expiration {
        self.expiration
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Account number with everything but the last four digits hidden.
    pub fn masked_number(&self) -> String {
        mask(&self.account_number)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration.is_expired_at(today)
    }

    pub fn is_authorized(&self, account_number: &str, pin: u32) -> bool {
        self.account_number == account_number && self.pin == pin
    }

    /// Dispenses `amount` in notes.
    ///
    /// Fails for non-positive amounts, amounts above the balance and amounts
    /// that can't be paid in $20/$50 combinations.
    pub fn withdraw(&mut self, amount: Money) -> bool {
        if !amount.is_positive() || amount > self.balance || !cash::is_payable(amount) {
            return false;
        }
        self.balance -= amount;
        true
    }

    /// Accepts `amount` in notes. No upper bound.
    pub fn deposit(&mut self, amount: Money) -> bool {
        if !amount.is_positive() || !cash::is_payable(amount) {
            return false;
        }
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Moves `amount` from this account to `destination`.
    ///
    /// Transfers are book entries, so any positive amount is allowed, cents
    /// included. Under [`TransferPolicy::Permissive`] the source may go
    /// negative: withdrawals have always checked the balance but transfers
    /// never did, and it is not known whether that was intended. Strict is
    /// the default.
    pub fn transfer(
        &mut self,
        destination: &mut Account,
        amount: Money,
        policy: TransferPolicy,
    ) -> bool {
        if !amount.is_positive() {
            return false;
        }
        if policy == TransferPolicy::Strict && amount > self.balance {
            return false;
        }
        let (Some(source), Some(target)) = (
            self.balance.checked_sub(amount),
            destination.balance.checked_add(amount),
        ) else {
            return false;
        };
        self.balance = source;
        destination.balance = target;
        true
    }
}

pub(crate) fn mask(account_number: &str) -> String {
    let chars: Vec<char> = account_number.chars().collect();
    if chars.len() <= 4 {
        return account_number.to_string();
    }
    let last4: String = chars[chars.len() - 4..].iter().collect();
    format!("*{last4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(balance: i64) -> Account {
        Account::new(
            "Ana Martínez",
            "5555555555554440",
            "01/30".parse().unwrap(),
            112,
            Money::from_major(balance),
        )
    }

    #[test]
    fn authorization_needs_number_and_pin() {
        let acc = account(0);
        assert!(acc.is_authorized("5555555555554440", 112));
        assert!(!acc.is_authorized("5555555555554440", 113));
        assert!(!acc.is_authorized("5555555555554441", 112));
    }

    #[test]
    fn withdraw_rejects_without_mutation() {
        let mut acc = account(100);
        assert!(!acc.withdraw(Money::ZERO));
        assert!(!acc.withdraw(Money::from_major(-20)));
        assert!(!acc.withdraw(Money::from_major(120)));
        assert!(!acc.withdraw(Money::from_major(99)));
        assert!(!acc.withdraw(Money::new(2050)));
        assert_eq!(acc.balance(), Money::from_major(100));
    }

    #[test]
    fn withdraw_whole_balance() {
        let mut acc = account(100);
        assert!(acc.withdraw(Money::from_major(100)));
        assert_eq!(acc.balance(), Money::ZERO);
    }

    #[test]
    fn deposit_has_no_upper_bound() {
        let mut acc = account(0);
        assert!(acc.deposit(Money::from_major(1_000_000)));
        assert_eq!(acc.balance(), Money::from_major(1_000_000));
        assert!(!acc.deposit(Money::from_major(35)));
        assert_eq!(acc.balance(), Money::from_major(1_000_000));
    }

    #[test]
    fn strict_transfer_rejects_overdraft() {
        let mut source = account(50);
        let mut target = account(0);
        assert!(!source.transfer(&mut target, Money::from_major(60), TransferPolicy::Strict));
        assert_eq!(source.balance(), Money::from_major(50));
        assert_eq!(target.balance(), Money::ZERO);
    }

    #[test]
    fn permissive_transfer_allows_overdraft() {
        let mut source = account(50);
        let mut target = account(0);
        assert!(source.transfer(&mut target, Money::from_major(60), TransferPolicy::Permissive));
        assert_eq!(source.balance(), Money::from_major(-10));
        assert_eq!(target.balance(), Money::from_major(60));
    }

    #[test]
    fn transfer_accepts_cents_and_rejects_non_positive() {
        let mut source = account(50);
        let mut target = account(0);
        assert!(source.transfer(&mut target, Money::new(1234), TransferPolicy::Strict));
        assert_eq!(target.balance(), Money::new(1234));
        assert!(!source.transfer(&mut target, Money::ZERO, TransferPolicy::Permissive));
        assert!(!source.transfer(&mut target, Money::new(-1), TransferPolicy::Permissive));
        assert_eq!(source.balance(), Money::new(5000 - 1234));
    }

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(account(0).masked_number(), "*4440");
        assert_eq!(mask("123"), "123");
    }
}
