//! Which Monzo accounts to import, and the ledger accounts they map to.

use std::collections::HashSet;
use std::io::Read;

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use clap::Args;
use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::Deserialize;

use crate::filespec::FileSpec;
use crate::importers::monzo::MonzoJson;

/// Contents of a `--config` file, e.g:
///
/// ```ron
/// (
///     accounts: [
///         (id: "acc_00009ABC", account: "Assets:Monzo:Current"),
///         (id: "acc_00009DEF", account: "Assets:Monzo:Joint"),
///     ],
///     timezone: Some("Europe/London"),
/// )
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    pub accounts: Vec<AccountConfig>,
    /// Zone that entry dates are given in. Unset uses the offset written
    /// in each timestamp (UTC for the Monzo API).
    #[serde(default)]
    pub timezone: Option<Tz>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccountConfig {
    /// Account identifier used by the bank, e.g. `acc_00009ABC`.
    pub id: String,
    /// Beancount account to post to.
    pub account: String,
}

impl Config {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Config = ron::de::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            bail!("no accounts configured");
        }
        let mut seen = HashSet::new();
        for acct in &self.accounts {
            check_account_name(&acct.account)?;
            if !seen.insert(acct.id.as_str()) {
                bail!("account id {:?} configured more than once", acct.id);
            }
        }
        Ok(())
    }

    /// One importer per configured account, in configuration order.
    pub fn importers(&self) -> Vec<MonzoJson> {
        self.accounts
            .iter()
            .map(|acct| MonzoJson::new(acct.id.as_str(), acct.account.as_str(), self.timezone))
            .collect()
    }
}

/// Checks that `name` is a valid Beancount account name.
pub fn check_account_name(name: &str) -> Result<()> {
    lazy_static! {
        static ref ACCOUNT_RX: Regex =
            Regex::new(r"^(Assets|Liabilities|Equity|Income|Expenses)(:[\p{Lu}\p{Nd}][\p{L}\p{Nd}-]*)+$")
                .unwrap();
    }
    if !ACCOUNT_RX.is_match(name) {
        bail!("{:?} is not a valid Beancount account name", name);
    }
    Ok(())
}

/// Command line options selecting the accounts to import.
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// RON file listing the accounts to import.
    #[arg(long = "config", conflicts_with_all = ["account_id", "account"])]
    config: Option<FileSpec>,
    /// Monzo account identifier of the single account to import.
    #[arg(long = "account-id", requires = "account")]
    account_id: Option<String>,
    /// Beancount account to post the single account's transactions to.
    #[arg(long = "account", requires = "account_id")]
    account: Option<String>,
    /// Timezone to date entries in, e.g. "Europe/London". Overrides any
    /// timezone in the config file.
    #[arg(long = "timezone")]
    timezone: Option<Tz>,
}

impl AccountArgs {
    pub fn load(&self) -> Result<Config> {
        let mut config = match (&self.config, &self.account_id, &self.account) {
            (Some(file), _, _) => Config::from_reader(file.reader()?)
                .with_context(|| format!("reading config from {}", file))?,
            (None, Some(id), Some(account)) => {
                let config = Config {
                    accounts: vec![AccountConfig {
                        id: id.clone(),
                        account: account.clone(),
                    }],
                    timezone: None,
                };
                config.validate()?;
                config
            }
            _ => bail!("either --config, or both --account-id and --account, must be given"),
        };
        if self.timezone.is_some() {
            config.timezone = self.timezone;
        }
        Ok(config)
    }
}
