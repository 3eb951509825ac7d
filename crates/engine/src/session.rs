//! The teller session: account registry plus the four customer operations.
//!
//! There is no stored "current account". [`Session::authenticate`] hands out
//! an [`Authenticated`] context and every operation that needs one consumes
//! it, so each withdrawal, inquiry or transfer re-checks the card. A context
//! is only honoured by the session that issued it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    Account, AccountRegistry, AccountSource, Clock, EngineError, Money, Receipt, ResultEngine,
    SystemClock, TransferPolicy, account::mask, cash,
};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Proof that a card and PIN were accepted. Consumed by one operation.
#[derive(Debug, PartialEq, Eq)]
pub struct Authenticated {
    session_id: u64,
    index: usize,
    account_number: String,
    owner_name: String,
}

impl Authenticated {
    /// Name to greet the customer with.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }
}

/// Result of a balance inquiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceInquiry {
    pub owner_name: String,
    pub account_number: String,
    pub balance: Money,
}

pub struct Session {
    id: u64,
    registry: AccountRegistry,
    clock: Box<dyn Clock>,
    transfer_policy: TransferPolicy,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("registry", &self.registry)
            .field("transfer_policy", &self.transfer_policy)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Return a builder for `Session`. Help to build the struct.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn transfer_policy(&self) -> TransferPolicy {
        self.transfer_policy
    }

    /// Whether some account has this number.
    pub fn contains(&self, account_number: &str) -> bool {
        self.registry.position(account_number).is_some()
    }

    /// Checks a card number and PIN.
    ///
    /// The first account accepting the pair decides: if its card is expired
    /// the whole attempt fails with [`EngineError::CardExpired`].
    pub fn authenticate(&self, account_number: &str, pin: u32) -> ResultEngine<Authenticated> {
        let Some(index) = self.registry.authorize(account_number, pin) else {
            tracing::warn!(account = %mask(account_number), "authentication failed");
            return Err(EngineError::InvalidCredentials);
        };
        let account = self.account(index)?;

        if account.is_expired(self.clock.today()) {
            tracing::warn!(
                account = %account.masked_number(),
                expiration = %account.expiration(),
                "card expired"
            );
            return Err(EngineError::CardExpired);
        }

        tracing::info!(account = %account.masked_number(), "authenticated");
        Ok(Authenticated {
            session_id: self.id,
            index,
            account_number: account.account_number().to_string(),
            owner_name: account.owner_name().to_string(),
        })
    }

    /// Dispenses cash from the authenticated account and returns the new
    /// balance.
    pub fn withdraw_cash(&mut self, auth: Authenticated, amount: Money) -> ResultEngine<Money> {
        let index = self.authorized_index(&auth)?;
        let account = self.account_mut(index)?;

        if !account.withdraw(amount) {
            let reason = rejection_reason(amount, Some(account.balance()));
            tracing::warn!(account = %account.masked_number(), %amount, reason, "withdrawal rejected");
            return Err(EngineError::InvalidAmount(reason.to_string()));
        }

        tracing::info!(account = %account.masked_number(), %amount, "withdrawal");
        Ok(account.balance())
    }

    /// Accepts cash for any existing account, no card needed. Returns the
    /// new balance of the target account.
    pub fn deposit_cash(&mut self, account_number: &str, amount: Money) -> ResultEngine<Money> {
        let index = self
            .registry
            .position(account_number)
            .ok_or_else(|| EngineError::AccountNotFound(mask(account_number)))?;
        let account = self.account_mut(index)?;

        if !account.deposit(amount) {
            let reason = rejection_reason(amount, None);
            tracing::warn!(account = %account.masked_number(), %amount, reason, "deposit rejected");
            return Err(EngineError::InvalidAmount(reason.to_string()));
        }

        tracing::info!(account = %account.masked_number(), %amount, "deposit");
        Ok(account.balance())
    }

    pub fn check_balance(&self, auth: Authenticated) -> ResultEngine<BalanceInquiry> {
        let index = self.authorized_index(&auth)?;
        let account = self.account(index)?;
        tracing::info!(account = %account.masked_number(), "balance inquiry");
        Ok(BalanceInquiry {
            owner_name: account.owner_name().to_string(),
            account_number: account.account_number().to_string(),
            balance: account.balance(),
        })
    }

    /// Moves money from the authenticated account to `destination` and
    /// returns the new source balance. Transferring to oneself is refused.
    pub fn transfer_funds(
        &mut self,
        auth: Authenticated,
        destination: &str,
        amount: Money,
    ) -> ResultEngine<Money> {
        let index = self.authorized_index(&auth)?;
        let target = self
            .registry
            .position(destination)
            .ok_or_else(|| EngineError::AccountNotFound(mask(destination)))?;
        if target == index {
            return Err(EngineError::SelfTransfer);
        }

        let policy = self.transfer_policy;
        let (source, target) = self
            .registry
            .pair_mut(index, target)
            .ok_or_else(|| EngineError::AccountNotFound(mask(destination)))?;

        if !source.transfer(target, amount, policy) {
            let reason = if amount.is_positive() {
                "insufficient balance"
            } else {
                "amount must be positive"
            };
            tracing::warn!(
                from = %source.masked_number(),
                to = %target.masked_number(),
                %amount,
                reason,
                "transfer rejected"
            );
            return Err(EngineError::InvalidAmount(reason.to_string()));
        }

        tracing::info!(
            from = %source.masked_number(),
            to = %target.masked_number(),
            %amount,
            "transfer"
        );
        Ok(source.balance())
    }

    /// Stamps a receipt for `inquiry` with the session clock.
    pub fn issue_receipt(&self, inquiry: &BalanceInquiry) -> Receipt {
        Receipt {
            issued_at: self.clock.now(),
            owner_name: inquiry.owner_name.clone(),
            account_number: mask(&inquiry.account_number),
            balance: inquiry.balance,
        }
    }

    /// Position of the account `auth` names, provided this session issued it
    /// and the account at that position still carries the same number.
    fn authorized_index(&self, auth: &Authenticated) -> ResultEngine<usize> {
        let issued_here = auth.session_id == self.id
            && self
                .registry
                .get(auth.index)
                .is_some_and(|account| account.account_number() == auth.account_number);
        if !issued_here {
            tracing::warn!(
                account = %mask(&auth.account_number),
                "authentication context from another session"
            );
            return Err(EngineError::InvalidCredentials);
        }
        Ok(auth.index)
    }

    fn account(&self, index: usize) -> ResultEngine<&Account> {
        self.registry
            .get(index)
            .ok_or_else(|| EngineError::AccountNotFound(format!("#{index}")))
    }

    fn account_mut(&mut self, index: usize) -> ResultEngine<&mut Account> {
        self.registry
            .get_mut(index)
            .ok_or_else(|| EngineError::AccountNotFound(format!("#{index}")))
    }
}

fn rejection_reason(amount: Money, balance: Option<Money>) -> &'static str {
    if !amount.is_positive() {
        "amount must be positive"
    } else if amount > cash::NOTES_LIMIT {
        "amount is above the teller limit"
    } else if balance.is_some_and(|balance| amount > balance) {
        "insufficient balance"
    } else if !cash::is_payable(amount) {
        "amount can't be paid with $20, $50, $100, $200 and $500 notes"
    } else {
        "amount rejected"
    }
}

pub struct SessionBuilder {
    accounts: Vec<Account>,
    clock: Box<dyn Clock>,
    transfer_policy: TransferPolicy,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            clock: Box::new(SystemClock),
            transfer_policy: TransferPolicy::default(),
        }
    }
}

impl SessionBuilder {
    /// Pass the accounts directly.
    pub fn accounts(mut self, accounts: Vec<Account>) -> SessionBuilder {
        self.accounts = accounts;
        self
    }

    /// Load the accounts from `source`.
    pub fn source(mut self, source: &dyn AccountSource) -> ResultEngine<SessionBuilder> {
        self.accounts = source.load()?;
        Ok(self)
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> SessionBuilder {
        self.clock = Box::new(clock);
        self
    }

    pub fn transfer_policy(mut self, policy: TransferPolicy) -> SessionBuilder {
        self.transfer_policy = policy;
        self
    }

    /// Construct `Session`
    pub fn build(self) -> Session {
        tracing::debug!(accounts = self.accounts.len(), "session ready");
        Session {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            registry: AccountRegistry::new(self.accounts),
            clock: self.clock,
            transfer_policy: self.transfer_policy,
        }
    }
}
