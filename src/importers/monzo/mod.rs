//! Importer for transaction lists in the JSON format of the Monzo API:
//! `/transactions?expand[]=merchant&account_id=$account_id`.

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::beancount::Entry;
use crate::importers::importer::EntryImporter;

pub mod classify;
mod de;
pub mod record;
pub mod resolve;

#[cfg(test)]
mod testutil;

use classify::Mapper;
use record::{Timestamp, Transaction};

/// Reads files fetched for one Monzo account.
#[derive(Debug)]
pub struct MonzoJson {
    account_id: String,
    account: String,
    timezone: Option<Tz>,
}

impl MonzoJson {
    pub fn new<S: Into<String>, A: Into<String>>(
        account_id: S,
        account: A,
        timezone: Option<Tz>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account: account.into(),
            timezone,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl EntryImporter for MonzoJson {
    fn identify(&self, path: &Path) -> Result<bool> {
        let records: Vec<de::AccountRef> = match read_transactions(path)? {
            Some(records) => records,
            None => return Ok(false),
        };
        Ok(records
            .first()
            .and_then(|record| record.account_id.as_deref())
            .map_or(false, |id| id == self.account_id))
    }

    fn account(&self) -> &str {
        &self.account
    }

    fn date(&self, path: &Path) -> Result<Option<NaiveDate>> {
        let records: Vec<de::Created> = match read_transactions(path)? {
            Some(records) => records,
            None => return Ok(None),
        };
        records
            .into_iter()
            .next()
            .map(|record| {
                Timestamp::parse(record.created)
                    .map(|created| created.date(self.timezone))
                    .with_context(|| format!("dating {:?}", path))
            })
            .transpose()
    }

    fn filename(&self, path: &Path) -> String {
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        format!("monzo.{}", basename)
    }

    fn extract(&self, path: &Path) -> Result<Option<Vec<Entry>>> {
        let records: Vec<de::Transaction> = match read_transactions(path)? {
            Some(records) => records,
            None => return Ok(None),
        };
        let mapper = Mapper::new(&self.account, self.timezone);
        records
            .into_iter()
            .map(|record| {
                let trn: Transaction = record.try_into()?;
                mapper.map(&trn)
            })
            .collect::<Result<Vec<Entry>>>()
            .with_context(|| format!("extracting entries from {:?}", path))
            .map(Some)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Reads the `transactions` list of a JSON file. `None` if the file is not
/// JSON by name, or is not an object with a `transactions` array.
fn read_transactions<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !is_json(path) {
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("opening {:?} for reading", path))?;
    let doc: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {:?}", path))?;
    let records = match doc {
        Value::Object(mut fields) => match fields.remove("transactions") {
            Some(records @ Value::Array(_)) => records,
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };
    serde_json::from_value(records)
        .map(Some)
        .with_context(|| format!("reading transactions of {:?}", path))
}
