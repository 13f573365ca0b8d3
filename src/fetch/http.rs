use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

use crate::fetch::{Account, Balance, MonzoApi};

pub const API_BASE: &str = "https://api.monzo.com";

/// Only current accounts are fetched; other account types have no
/// transactions endpoint.
const ACCOUNT_TYPE: &str = "uk_retail";

#[derive(Deserialize)]
struct AccountList {
    accounts: Vec<Account>,
}

/// `MonzoApi` over HTTPS, authenticated by an access token obtained
/// elsewhere.
pub struct HttpApi {
    client: Client,
    base: String,
    access_token: String,
}

impl HttpApi {
    pub fn new<S: Into<String>>(access_token: S) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base: API_BASE.to_string(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn send(&self, what: &str, req: RequestBuilder) -> Result<reqwest::blocking::Response> {
        let resp = req
            .bearer_auth(&self.access_token)
            .send()
            .with_context(|| format!("requesting {}", what))?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().unwrap_or_default();
            bail!("requesting {}: {} {}", what, status, txt);
        }
        Ok(resp)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self.send(path, self.client.get(self.url(path)).query(query))?;
        resp.json()
            .with_context(|| format!("parsing response of {}", path))
    }
}

impl MonzoApi for HttpApi {
    fn accounts(&self) -> Result<Vec<Account>> {
        let list: AccountList = self.get("/accounts", &[("account_type", ACCOUNT_TYPE)])?;
        Ok(list.accounts)
    }

    fn balance(&self, account_id: &str) -> Result<Balance> {
        self.get("/balance", &[("account_id", account_id)])
    }

    fn transactions(&self, account_id: &str, since: NaiveDate) -> Result<serde_json::Value> {
        let since = format!("{}T00:00:00Z", since);
        self.get(
            "/transactions",
            &[
                ("account_id", account_id),
                ("expand[]", "merchant"),
                ("since", since.as_str()),
            ],
        )
    }

    fn logout(&self) -> Result<()> {
        let path = "/oauth2/logout";
        self.send(path, self.client.post(self.url(path)))?;
        Ok(())
    }
}
