use std::io::{self, IsTerminal};

use clap::Parser;
use engine::{AccountSource, Session};

use crate::{
    console::{LineConsole, TtyConsole},
    error::Result,
    receipts::FileReceiptSink,
    settings::{Accounts, Args, Settings},
    sources::{BuiltinAccounts, FileAccounts},
    teller::Teller,
};

mod console;
mod error;
mod receipts;
mod settings;
mod sources;
mod teller;

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::new(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "teller={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(io::stderr)
        .init();

    let source: Box<dyn AccountSource> = match &settings.accounts {
        Accounts::Builtin => Box::new(BuiltinAccounts),
        Accounts::File(path) => Box::new(FileAccounts::new(path)),
    };
    let session = match Session::builder().source(&*source) {
        Ok(builder) => builder.transfer_policy(settings.transfer_policy).build(),
        Err(err) => {
            tracing::error!("failed to load accounts: {err}");
            return Err(err.into());
        }
    };
    tracing::info!(
        accounts = session.registry().len(),
        policy = ?session.transfer_policy(),
        "teller ready"
    );

    let receipts = FileReceiptSink::new(&settings.receipts.directory);
    if io::stdin().is_terminal() {
        Teller::new(session, TtyConsole::new(settings.terminal.mask_pin), receipts).run()
    } else {
        let console = LineConsole::new(io::stdin().lock(), io::stdout());
        Teller::new(session, console, receipts).run()
    }
}
