use std::path::Path;
use tracing::info;

use super::Database;
use crate::error::StoreResult;
use crate::models::DateRange;

impl Database {
    /// Write the transactions in `range` (all of them when `None`) to a CSV
    /// file, newest first. Returns the number of rows written.
    pub(crate) fn export_to_csv(&self, path: &Path, range: Option<&DateRange>) -> StoreResult<usize> {
        let txns = self.read_transactions(range)?;

        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["id", "date", "category", "description", "amount", "card"])?;
        for txn in &txns {
            wtr.write_record([
                txn.id.unwrap_or_default().to_string(),
                txn.date.format("%Y-%m-%d").to_string(),
                txn.category.to_string(),
                txn.description.clone(),
                txn.amount.to_string(),
                txn.card.to_string(),
            ])?;
        }
        wtr.flush()?;

        info!(rows = txns.len(), path = %path.display(), "exported transactions");
        Ok(txns.len())
    }
}
