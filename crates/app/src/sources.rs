//! Account sources: the built-in demo accounts and flat files.

use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord, Trim};
use engine::{Account, AccountSource, EngineError, Expiration, Money, ResultEngine};

use crate::error::Result;

const FIELDS: usize = 5;

/// The four demo accounts the teller ships with.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinAccounts;

impl AccountSource for BuiltinAccounts {
    fn load(&self) -> ResultEngine<Vec<Account>> {
        let demo = [
            ("Juan Montes", "4242424242424240", "12/29", 145, 10),
            ("Pedro Zapata", "4000056655665550", "07/26", 502, 12_500_000),
            ("Ana Martínez", "5555555555554440", "01/30", 112, 50_037),
            ("Rogelio Guerra", "2223003122003220", "12/24", 730, 540_005),
        ];

        demo.into_iter()
            .map(|(owner, number, expiration, pin, cents)| -> ResultEngine<Account> {
                Ok(Account::new(
                    owner,
                    number,
                    expiration.parse::<Expiration>()?,
                    pin,
                    Money::new(cents),
                ))
            })
            .collect()
    }
}

/// Comma-separated file, one account per line:
/// `owner, account number, MM/YY, pin, balance`.
///
/// Lines starting with `#` are ignored. Records that are short, not UTF-8
/// or don't parse are skipped with a warning; a missing file is an error.
#[derive(Debug, Clone)]
pub struct FileAccounts {
    path: PathBuf,
}

impl FileAccounts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<Vec<Account>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_path(&self.path)?;

        let mut accounts = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    let line = err.position().map_or(0, |pos| pos.line());
                    tracing::warn!(
                        path = %self.path.display(),
                        line,
                        "skipping unreadable account record: {err}"
                    );
                    continue;
                }
            };
            let line = record.position().map_or(0, |pos| pos.line());

            if record.len() < FIELDS {
                tracing::warn!(
                    path = %self.path.display(),
                    line,
                    fields = record.len(),
                    "skipping account record with missing fields"
                );
                continue;
            }

            match parse_record(&record) {
                Ok(account) => accounts.push(account),
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), line, "skipping account record: {err}");
                }
            }
        }

        tracing::debug!(path = %self.path.display(), accounts = accounts.len(), "accounts file read");
        Ok(accounts)
    }
}

impl AccountSource for FileAccounts {
    fn load(&self) -> ResultEngine<Vec<Account>> {
        self.read().map_err(|err| EngineError::Io(err.to_string()))
    }
}

fn parse_record(record: &StringRecord) -> ResultEngine<Account> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    let owner = field(0);
    let number = field(1);
    if owner.is_empty() || number.is_empty() {
        return Err(EngineError::InvalidRecord(
            "owner and account number are required".to_string(),
        ));
    }
    let expiration: Expiration = field(2).parse()?;
    let pin: u32 = field(3)
        .parse()
        .map_err(|_| EngineError::InvalidRecord(format!("invalid pin \"{}\"", field(3))))?;
    let balance: Money = field(4).parse()?;

    Ok(Account::new(owner, number, expiration, pin, balance))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn accounts_file(contents: impl AsRef<[u8]>) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_ref()).unwrap();
        file
    }

    #[test]
    fn builtin_accounts_load_in_order() {
        let accounts = BuiltinAccounts.load().unwrap();
        let owners: Vec<&str> = accounts.iter().map(Account::owner_name).collect();
        assert_eq!(
            owners,
            ["Juan Montes", "Pedro Zapata", "Ana Martínez", "Rogelio Guerra"]
        );
        assert_eq!(accounts[2].balance(), Money::new(50_037));
    }

    #[test]
    fn reads_well_formed_records() {
        let file = accounts_file(
            "# owner, number, expiration, pin, balance\n\
             Juan Montes, 4242424242424240, 12/29, 145, 0.10\n\
             Ana Martínez,5555555555554440,01/30,112,500.37\n",
        );
        let accounts = FileAccounts::new(file.path()).load().unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].account_number(), "4242424242424240");
        assert_eq!(accounts[0].balance(), Money::new(10));
        assert!(accounts[1].is_authorized("5555555555554440", 112));
    }

    #[test]
    fn skips_short_and_broken_records() {
        let file = accounts_file(
            "Short Record, 1111, 12/29\n\
             Bad Pin, 2222, 12/29, abc, 10\n\
             Bad Date, 3333, 2029-12, 1, 10\n\
             Good, 4444, 12/29, 1, 10\n",
        );
        let accounts = FileAccounts::new(file.path()).load().unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].owner_name(), "Good");
    }

    #[test]
    fn skips_records_that_are_not_utf8() {
        let file = accounts_file(
            b"Good One, 1111, 12/29, 1, 10\n\
              Bad \xff Bytes, 2222, 12/29, 2, 10\n\
              Good Two, 3333, 12/29, 3, 10\n",
        );
        let accounts = FileAccounts::new(file.path()).load().unwrap();

        let owners: Vec<&str> = accounts.iter().map(Account::owner_name).collect();
        assert_eq!(owners, ["Good One", "Good Two"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = FileAccounts::new("/definitely/not/here.csv").load().unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
