//! In-memory collection of the accounts a teller session can reach.

use std::collections::HashMap;

use crate::Account;

/// Accounts in load order plus an index by account number.
///
/// The index keeps the first position seen for a number, so lookups by
/// number resolve duplicates to the earliest loaded account.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
    by_number: HashMap<String, usize>,
}

impl AccountRegistry {
    pub fn new(accounts: Vec<Account>) -> Self {
        let mut by_number = HashMap::with_capacity(accounts.len());
        for (index, account) in accounts.iter().enumerate() {
            by_number
                .entry(account.account_number().to_string())
                .or_insert(index);
        }
        Self {
            accounts,
            by_number,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn position(&self, account_number: &str) -> Option<usize> {
        self.by_number.get(account_number).copied()
    }

    pub fn find(&self, account_number: &str) -> Option<&Account> {
        self.position(account_number).and_then(|index| self.get(index))
    }

    /// Position of the first account authorized by `account_number` and `pin`.
    pub fn authorize(&self, account_number: &str, pin: u32) -> Option<usize> {
        self.accounts
            .iter()
            .position(|account| account.is_authorized(account_number, pin))
    }

    pub fn get(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Account> {
        self.accounts.get_mut(index)
    }

    /// Two distinct accounts borrowed mutably at once.
    ///
    /// Returns `None` if `first == second` or either index is out of range.
    pub fn pair_mut(&mut self, first: usize, second: usize) -> Option<(&mut Account, &mut Account)> {
        if first == second || first >= self.accounts.len() || second >= self.accounts.len() {
            return None;
        }
        if first < second {
            let (head, tail) = self.accounts.split_at_mut(second);
            Some((&mut head[first], &mut tail[0]))
        } else {
            let (head, tail) = self.accounts.split_at_mut(first);
            Some((&mut tail[0], &mut head[second]))
        }
    }
}

impl From<Vec<Account>> for AccountRegistry {
    fn from(accounts: Vec<Account>) -> Self {
        Self::new(accounts)
    }
}
