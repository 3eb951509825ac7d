//! Writes balance receipts as text files.

use std::{fs, path::PathBuf};

use engine::{Receipt, ReceiptSink, ResultEngine};

/// One `receipt_<last4>_<timestamp>.txt` file per receipt.
#[derive(Debug, Clone)]
pub struct FileReceiptSink {
    directory: PathBuf,
}

impl FileReceiptSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, receipt: &Receipt) -> PathBuf {
        let last4 = receipt.account_number.trim_start_matches('*');
        self.directory.join(format!(
            "receipt_{last4}_{}.txt",
            receipt.issued_at.format("%Y%m%d%H%M%S")
        ))
    }
}

impl ReceiptSink for FileReceiptSink {
    fn write(&mut self, receipt: &Receipt) -> ResultEngine<()> {
        fs::create_dir_all(&self.directory)?;
        let path = self.path_for(receipt);
        fs::write(&path, receipt.render())?;
        tracing::info!(path = %path.display(), "receipt written");
        Ok(())
    }
}
