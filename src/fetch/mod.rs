//! Downloads raw transaction lists from the Monzo API into per-account JSON
//! files, for later import.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde_derive::Deserialize;

pub mod cmd;
pub mod http;

/// Maximum age of transactions the API returns without a fresh strong
/// customer authentication, less a day of margin.
pub const DEFAULT_HISTORY_DAYS: i64 = 89;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub sort_code: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Balance {
    /// In minor units of `currency`.
    pub balance: i64,
    pub currency: String,
}

/// The parts of the Monzo API used to fetch transactions.
pub trait MonzoApi {
    fn accounts(&self) -> Result<Vec<Account>>;

    fn balance(&self, account_id: &str) -> Result<Balance>;

    /// Transactions created since the start of `since`, with merchants
    /// expanded, exactly as returned.
    fn transactions(&self, account_id: &str, since: NaiveDate) -> Result<serde_json::Value>;

    /// Invalidates the access token.
    fn logout(&self) -> Result<()>;
}

/// Name of the file holding transactions of `account_id` fetched on `date`.
pub fn file_name(date: NaiveDate, account_id: &str) -> String {
    format!("{}-monzo-{}.json", date, account_id)
}

pub struct Downloader<'a> {
    data_folder: &'a Path,
    since: NaiveDate,
    today: NaiveDate,
}

impl<'a> Downloader<'a> {
    pub fn new(data_folder: &'a Path, since: NaiveDate, today: NaiveDate) -> Self {
        Self {
            data_folder,
            since,
            today,
        }
    }

    /// Writes one file per account, returning their paths.
    pub fn download(&self, api: &dyn MonzoApi) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for account in api.accounts()? {
            let balance = api
                .balance(&account.id)
                .with_context(|| format!("balance of {}", account.id))?;
            info!(
                "{} {} {}: {} {}",
                account.id,
                account.sort_code.as_deref().unwrap_or("-"),
                account.account_number.as_deref().unwrap_or("-"),
                Decimal::new(balance.balance, 2),
                balance.currency
            );

            let payload = api
                .transactions(&account.id, self.since)
                .with_context(|| format!("transactions of {}", account.id))?;
            if !payload
                .get("transactions")
                .map_or(false, serde_json::Value::is_array)
            {
                bail!("response for {} has no transactions list", account.id);
            }

            let path = self.data_folder.join(file_name(self.today, &account.id));
            write_json(&path, &payload)?;
            info!("wrote transactions of {} to {:?}", account.id, path);
            written.push(path);
        }
        Ok(written)
    }
}

fn write_json(path: &Path, payload: &serde_json::Value) -> Result<()> {
    let file = File::create(path).with_context(|| format!("opening {:?} for writing", path))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, payload)
        .with_context(|| format!("writing {:?}", path))?;
    w.flush()?;
    Ok(())
}
