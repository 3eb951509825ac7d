//! Core of the teller: accounts, cash rules and the customer session.
//!
//! The engine is synchronous and keeps everything in memory. Accounts come
//! from an [`AccountSource`] when the [`Session`] is built and receipts go to
//! a [`ReceiptSink`]; prompting, parsing and files belong to the caller.

pub use account::{Account, TransferPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use expiration::Expiration;
pub use money::Money;
pub use receipt::{Receipt, ReceiptSink};
pub use registry::AccountRegistry;
pub use session::{Authenticated, BalanceInquiry, Session, SessionBuilder};
pub use source::AccountSource;

mod account;
pub mod cash;
mod clock;
mod error;
mod expiration;
mod money;
mod receipt;
mod registry;
mod session;
mod source;

pub type ResultEngine<T> = Result<T, EngineError>;
