use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use crate::beancount::Entry;

/// Probes over a candidate input file. Each call reads the file afresh.
pub trait EntryImporter {
    /// Whether the file holds data for the account this importer is for.
    fn identify(&self, path: &Path) -> Result<bool>;

    /// The ledger account entries are written against.
    fn account(&self) -> &str;

    /// The date the file's data is filed under, if it has any.
    fn date(&self, path: &Path) -> Result<Option<NaiveDate>>;

    /// Name to file the input under once imported.
    fn filename(&self, path: &Path) -> String;

    /// Entries for every record in the file, in file order. `None` if the file
    /// is not of the format this importer reads.
    fn extract(&self, path: &Path) -> Result<Option<Vec<Entry>>>;
}
