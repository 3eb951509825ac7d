//! Where the accounts of a session come from.

use crate::{Account, ResultEngine};

/// Supplies the full set of accounts once, when a session starts.
///
/// A failing source is fatal: there is nothing to operate on without it.
pub trait AccountSource {
    fn load(&self) -> ResultEngine<Vec<Account>>;
}

/// A fixed list, handy for tests and demos.
impl AccountSource for Vec<Account> {
    fn load(&self) -> ResultEngine<Vec<Account>> {
        Ok(self.clone())
    }
}
