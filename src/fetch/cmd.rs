use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use log::{info, warn};

use crate::fetch::http::HttpApi;
use crate::fetch::{Downloader, MonzoApi, DEFAULT_HISTORY_DAYS};

#[derive(Debug, Args)]
pub struct Command {
    /// Access token for the Monzo API.
    #[arg(long = "access-token", env = "MONZO_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,
    /// Directory to write the transaction files into.
    #[arg(long = "data-folder", env = "MONZO_DATA_FOLDER")]
    data_folder: PathBuf,
    /// Fetch transactions created on or after this date (YYYY-MM-DD).
    /// Defaults to 89 days ago.
    #[arg(short = 'd', long = "since")]
    since: Option<NaiveDate>,
    /// Leave the access token valid once done.
    #[arg(long = "no-logout")]
    no_logout: bool,
}

impl Command {
    pub fn run(&self) -> Result<()> {
        if !self.data_folder.is_dir() {
            bail!("data folder {:?} is not a directory", self.data_folder);
        }
        let today = Local::now().date_naive();
        let since = self
            .since
            .unwrap_or_else(|| today - Duration::days(DEFAULT_HISTORY_DAYS));

        let api = HttpApi::new(self.access_token.as_str())?;
        let downloader = Downloader::new(&self.data_folder, since, today);
        let written = download_then_logout(&downloader, &api, !self.no_logout)?;
        info!("fetched {} accounts since {}", written.len(), since);
        Ok(())
    }
}

/// Logs out of `api` once the download is over, whether or not it succeeded.
/// A download error takes precedence over a logout error.
fn download_then_logout(
    downloader: &Downloader,
    api: &dyn MonzoApi,
    logout: bool,
) -> Result<Vec<PathBuf>> {
    let downloaded = downloader.download(api);
    if logout {
        match (api.logout(), &downloaded) {
            (Ok(()), _) => info!("logged out"),
            (Err(err), Ok(_)) => return Err(err.context("logging out")),
            (Err(err), Err(_)) => warn!("logging out: {:#}", err),
        }
    }
    downloaded
}
