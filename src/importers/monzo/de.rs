//! Records as they appear in the JSON returned by the Monzo API
//! (`/transactions?expand[]=merchant`).

use std::collections::HashMap;

use serde_derive::Deserialize;

/// Just enough of a record to identify the account it belongs to.
#[derive(Debug, Deserialize)]
pub struct AccountRef {
    pub account_id: Option<String>,
}

/// Just enough of a record to date it.
#[derive(Debug, Deserialize)]
pub struct Created {
    pub created: String,
}

#[derive(Debug, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub dedupe_id: String,
    pub description: String,
    pub notes: String,
    pub amount: i64,
    pub currency: String,
    pub local_amount: i64,
    pub local_currency: String,
    pub created: String,
    pub settled: Option<String>,
    pub updated: String,
    #[serde(default)]
    pub counterparty: Counterparty,
    pub merchant: Option<Merchant>,
    pub scheme: String,
    pub decline_reason: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Union of the fields of every counterparty shape. Which shape applies is
/// decided when converting to `record::Counterparty`.
#[derive(Debug, Default, Deserialize)]
pub struct Counterparty {
    pub account_number: Option<String>,
    pub sort_code: Option<String>,
    pub number: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    // Sic, as spelled by the API.
    pub prefered_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Merchant {
    pub name: String,
}
