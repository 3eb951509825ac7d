//! The teller menu: reads raw values from the console, hands them to the
//! session and prints what happened.

use engine::{Authenticated, EngineError, Money, ReceiptSink, Session, cash};

use crate::{console::Console, error::Result};

const MENU: &str = "\
1. Withdraw cash
2. Deposit cash
3. Balance inquiry
4. Transfer funds
5. Exit";

const NOTES_HINT: &str = "Accepted notes: $20, $50, $100, $200, $500";

pub struct Teller<C, S> {
    session: Session,
    console: C,
    receipts: S,
    input_closed: bool,
}

impl<C: Console, S: ReceiptSink> Teller<C, S> {
    pub fn new(session: Session, console: C, receipts: S) -> Self {
        Self {
            session,
            console,
            receipts,
            input_closed: false,
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (Session, C, S) {
        (self.session, self.console, self.receipts)
    }

    /// Shows the menu until the customer leaves or input runs out. Input
    /// running out at any prompt ends the session once that option returns.
    pub fn run(&mut self) -> Result<()> {
        self.console.say("------ ATM ------")?;
        loop {
            self.console.say(MENU)?;
            let Some(option) = self.ask("Option: ")? else {
                break;
            };

            match option.as_str() {
                "1" => self.withdraw()?,
                "2" => self.deposit()?,
                "3" => self.balance_inquiry()?,
                "4" => self.transfer()?,
                "5" => {
                    self.console
                        .say("Thank you for using the teller. See you soon!")?;
                    break;
                }
                _ => self.console.say("Invalid option")?,
            }

            if self.input_closed {
                break;
            }
        }
        tracing::debug!(input_closed = self.input_closed, "teller session over");
        Ok(())
    }

    fn withdraw(&mut self) -> Result<()> {
        let Some(auth) = self.authenticate()? else {
            return Ok(());
        };
        self.console.say(NOTES_HINT)?;
        let Some(amount) = self.read_amount("Amount to withdraw: ")? else {
            return Ok(());
        };

        match self.session.withdraw_cash(auth, amount) {
            Ok(balance) => {
                self.console
                    .say(&format!("Withdrawal successful. Take your notes: {}", notes(amount)))?;
                self.console.say(&format!("Current balance: {balance}"))?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn deposit(&mut self) -> Result<()> {
        let Some(number) = self.ask("Account number to deposit into: ")? else {
            return Ok(());
        };
        if !self.session.contains(&number) {
            return self.report(&EngineError::AccountNotFound(number));
        }

        self.console.say(NOTES_HINT)?;
        let Some(amount) = self.read_amount("Amount to deposit: ")? else {
            return Ok(());
        };

        match self.session.deposit_cash(&number, amount) {
            Ok(_) => self
                .console
                .say(&format!("Deposit successful. Notes accepted: {}", notes(amount))),
            Err(err) => self.report(&err),
        }
    }

    fn balance_inquiry(&mut self) -> Result<()> {
        let Some(auth) = self.authenticate()? else {
            return Ok(());
        };

        let inquiry = match self.session.check_balance(auth) {
            Ok(inquiry) => inquiry,
            Err(err) => return self.report(&err),
        };
        self.console
            .say(&format!("Your current balance is: {}", inquiry.balance))?;

        let Some(answer) = self.ask("Print a receipt? [y/N]: ")? else {
            return Ok(());
        };
        if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
            let receipt = self.session.issue_receipt(&inquiry);
            match self.receipts.write(&receipt) {
                Ok(()) => self.console.say("Receipt printed.")?,
                Err(err) => {
                    tracing::error!("failed to write receipt: {err}");
                    self.console.say("Sorry, the receipt could not be printed.")?;
                }
            }
        }
        Ok(())
    }

    fn transfer(&mut self) -> Result<()> {
        let Some(auth) = self.authenticate()? else {
            return Ok(());
        };
        let Some(destination) = self.ask("Destination account: ")? else {
            return Ok(());
        };
        if !self.session.contains(&destination) {
            return self.report(&EngineError::AccountNotFound(destination));
        }
        let Some(amount) = self.read_amount("Amount to transfer: ")? else {
            return Ok(());
        };

        match self.session.transfer_funds(auth, &destination, amount) {
            Ok(balance) => {
                self.console.say("Transfer successful.")?;
                self.console.say(&format!("Current balance: {balance}"))
            }
            Err(err) => self.report(&err),
        }
    }

    /// Asks for card number and PIN. `None` if the attempt failed or input
    /// ran out; a failure has already been shown.
    fn authenticate(&mut self) -> Result<Option<Authenticated>> {
        let Some(number) = self.ask("Enter your account number: ")? else {
            return Ok(None);
        };
        let Some(pin) = self.ask_secret("Enter your PIN: ")? else {
            return Ok(None);
        };
        let Ok(pin) = pin.parse::<u32>() else {
            self.console.say("The PIN must be numeric.")?;
            return Ok(None);
        };

        match self.session.authenticate(&number, pin) {
            Ok(auth) => {
                self.console.say(&format!("Welcome {}", auth.owner_name()))?;
                Ok(Some(auth))
            }
            Err(err) => {
                self.report(&err)?;
                Ok(None)
            }
        }
    }

    fn read_amount(&mut self, label: &str) -> Result<Option<Money>> {
        let Some(raw) = self.ask(label)? else {
            return Ok(None);
        };
        match raw.parse::<Money>() {
            Ok(amount) => Ok(Some(amount)),
            Err(err) => {
                tracing::debug!("unparsable amount: {err}");
                self.console
                    .say("Invalid amount. Enter a number such as 120 or 120.50.")?;
                Ok(None)
            }
        }
    }

    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        let answer = self.console.prompt(label)?;
        self.input_closed |= answer.is_none();
        Ok(answer)
    }

    fn ask_secret(&mut self, label: &str) -> Result<Option<String>> {
        let answer = self.console.prompt_secret(label)?;
        self.input_closed |= answer.is_none();
        Ok(answer)
    }

    fn report(&mut self, err: &EngineError) -> Result<()> {
        let message = match err {
            EngineError::InvalidCredentials => "Incorrect details. Please try again.".to_string(),
            EngineError::CardExpired => {
                "Your card has expired. Visit a branch to request a new one.".to_string()
            }
            EngineError::AccountNotFound(_) => {
                "Account not found. Make sure the number is correct.".to_string()
            }
            EngineError::InvalidAmount(reason) => format!("Operation rejected: {reason}."),
            EngineError::SelfTransfer => "Choose a different destination account.".to_string(),
            other => other.to_string(),
        };
        self.console.say(&message)
    }
}

fn notes(amount: Money) -> String {
    cash::breakdown(amount)
        .map(|bundle| {
            bundle
                .iter()
                .map(|(note, count)| format!("{count} x {note}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use engine::{AccountSource, FixedClock};
    use rstest::rstest;

    use super::*;
    use crate::{console::LineConsole, sources::BuiltinAccounts};

    type TestTeller = Teller<LineConsole<Cursor<String>, Vec<u8>>, Vec<String>>;

    fn teller(input: &str) -> TestTeller {
        let session = Session::builder()
            .source(&BuiltinAccounts)
            .unwrap()
            .clock(FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()))
            .build();
        let console = LineConsole::new(Cursor::new(input.to_string()), Vec::new());
        Teller::new(session, console, Vec::new())
    }

    fn run(input: &str) -> (Session, String, Vec<String>) {
        let mut teller = teller(input);
        teller.run().unwrap();
        let (session, console, receipts) = teller.into_parts();
        let output = String::from_utf8(console.into_output()).unwrap();
        (session, output, receipts)
    }

    fn balance(session: &Session, number: &str) -> Money {
        session.registry().find(number).unwrap().balance()
    }

    #[test]
    fn exit_option_says_goodbye() {
        let (_, output, _) = run("5\n");
        assert!(output.contains("See you soon!"));
    }

    #[test]
    fn end_of_input_stops_the_loop() {
        let (_, output, _) = run("");
        assert!(output.contains("Option: "));
    }

    #[rstest]
    #[case::at_account_number("1\n")]
    #[case::at_pin("1\n5555555555554440\n")]
    #[case::at_withdraw_amount("1\n5555555555554440\n112\n")]
    #[case::at_deposit_account("2\n")]
    #[case::at_deposit_amount("2\n4242424242424240\n")]
    #[case::at_receipt_question("3\n4242424242424240\n145\n")]
    #[case::at_destination("4\n5555555555554440\n112\n")]
    #[case::at_transfer_amount("4\n5555555555554440\n112\n4242424242424240\n")]
    fn end_of_input_inside_an_option_ends_the_session(#[case] input: &str) {
        let (_, output, _) = run(input);
        assert_eq!(output.matches("Option: ").count(), 1, "{output}");
    }

    #[test]
    fn unknown_option_is_reported() {
        let (_, output, _) = run("9\n5\n");
        assert!(output.contains("Invalid option"));
    }

    #[test]
    fn withdraw_shows_notes_and_balance() {
        let (session, output, _) = run("1\n5555555555554440\n112\n70\n5\n");
        assert!(output.contains("Welcome Ana Martínez"));
        assert!(output.contains("1 x $50, 1 x $20"));
        assert!(output.contains("Current balance: $430.37"));
        assert_eq!(balance(&session, "5555555555554440"), Money::new(43_037));
    }

    #[test]
    fn wrong_pin_and_non_numeric_pin() {
        let (_, output, _) = run("1\n5555555555554440\n999\n1\n5555555555554440\nabc\n5\n");
        assert!(output.contains("Incorrect details"));
        assert!(output.contains("The PIN must be numeric."));
    }

    #[test]
    fn expired_card_cannot_withdraw() {
        let (session, output, _) = run("1\n2223003122003220\n730\n5\n");
        assert!(output.contains("Your card has expired"));
        assert_eq!(balance(&session, "2223003122003220"), Money::new(540_005));
    }

    #[test]
    fn deposit_to_unknown_account_skips_amount_prompt() {
        let (_, output, _) = run("2\n0000\n5\n");
        assert!(output.contains("Account not found"));
        assert!(!output.contains("Amount to deposit"));
    }

    #[test]
    fn deposit_rejects_unpayable_amount() {
        let (session, output, _) = run("2\n4242424242424240\n99\n2\n4242424242424240\n120\n5\n");
        assert!(output.contains("Operation rejected"));
        assert!(output.contains("Deposit successful. Notes accepted: 1 x $100, 1 x $20"));
        assert_eq!(balance(&session, "4242424242424240"), Money::new(12_010));
    }

    #[test]
    fn malformed_amount_is_reported() {
        let (session, output, _) = run("1\n5555555555554440\n112\ntwenty\n5\n");
        assert!(output.contains("Invalid amount"));
        assert_eq!(balance(&session, "5555555555554440"), Money::new(50_037));
    }

    #[test]
    fn balance_inquiry_prints_receipt_on_request() {
        let (_, output, receipts) = run("3\n4242424242424240\n145\ny\n3\n4242424242424240\n145\nn\n5\n");
        assert!(output.contains("Your current balance is: $0.10"));
        assert!(output.contains("Receipt printed."));
        assert_eq!(receipts.len(), 1);
        assert!(receipts[0].contains("Account: *4240"));
        assert!(receipts[0].contains("Date:    2026-10-19 00:00:00"));
    }

    #[test]
    fn transfer_between_accounts() {
        let (session, output, _) = run("4\n5555555555554440\n112\n4242424242424240\n0.37\n5\n");
        assert!(output.contains("Transfer successful."));
        assert!(output.contains("Current balance: $500.00"));
        assert_eq!(balance(&session, "4242424242424240"), Money::new(47));
    }

    #[test]
    fn transfer_to_self_is_refused() {
        let (session, output, _) = run("4\n5555555555554440\n112\n5555555555554440\n20\n5\n");
        assert!(output.contains("Choose a different destination account."));
        assert_eq!(balance(&session, "5555555555554440"), Money::new(50_037));
    }

    #[test]
    fn builtin_source_feeds_the_session() {
        let (session, _, _) = teller("").into_parts();
        assert_eq!(
            session.registry().len(),
            BuiltinAccounts.load().unwrap().len()
        );
    }
}
