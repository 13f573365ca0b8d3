use std::collections::HashMap;

use anyhow::{anyhow, Context, Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;

use crate::importers::monzo::de;

/// Scheme value used by the bank for moves between an account and its pots.
pub const POT_TRANSFER_SCHEME: &str = "uk_retail_pot";

/// A transaction record, validated and with its counterparty shape resolved.
#[derive(Debug)]
pub struct Transaction {
    pub id: String,
    pub dedupe_id: String,
    pub description: String,
    pub notes: String,
    /// Settled amount, in minor units of `currency`.
    pub amount: i64,
    pub currency: String,
    /// Amount in minor units of `local_currency`, the currency the merchant
    /// charged in.
    pub local_amount: i64,
    pub local_currency: String,
    pub created: Timestamp,
    pub settled: String,
    pub updated: String,
    pub counterparty: Counterparty,
    pub merchant_name: Option<String>,
    pub scheme: Scheme,
    pub decline_reason: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl TryFrom<de::Transaction> for Transaction {
    type Error = Error;

    fn try_from(v: de::Transaction) -> Result<Self> {
        let created = Timestamp::parse(v.created)
            .with_context(|| format!("created time of transaction {}", v.id))?;
        let counterparty = Counterparty::try_from(v.counterparty)
            .with_context(|| format!("counterparty of transaction {}", v.id))?;
        Ok(Self {
            id: v.id,
            dedupe_id: v.dedupe_id,
            description: v.description,
            notes: v.notes,
            amount: v.amount,
            currency: v.currency,
            local_amount: v.local_amount,
            local_currency: v.local_currency,
            created,
            settled: v.settled.unwrap_or_default(),
            updated: v.updated,
            counterparty,
            merchant_name: v.merchant.map(|m| m.name),
            scheme: v.scheme.into(),
            decline_reason: v.decline_reason,
            metadata: v.metadata,
        })
    }
}

/// An RFC 3339 timestamp, keeping the text it was parsed from.
#[derive(Debug)]
pub struct Timestamp {
    pub raw: String,
    pub at: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn parse(raw: String) -> Result<Self> {
        let at = DateTime::parse_from_rfc3339(&raw)
            .with_context(|| format!("parsing timestamp {:?}", raw))?;
        Ok(Self { raw, at })
    }

    /// The calendar date of the timestamp, in `timezone` if given, otherwise
    /// in the offset it was written with.
    pub fn date(&self, timezone: Option<Tz>) -> NaiveDate {
        match timezone {
            Some(tz) => self.at.with_timezone(&tz).date_naive(),
            None => self.at.date_naive(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scheme {
    PotTransfer,
    Other(String),
}

impl From<String> for Scheme {
    fn from(s: String) -> Self {
        if s == POT_TRANSFER_SCHEME {
            Scheme::PotTransfer
        } else {
            Scheme::Other(s)
        }
    }
}

#[derive(Debug, Default, Eq, PartialEq)]
pub struct Counterparty {
    pub kind: CounterpartyKind,
    pub name: Option<String>,
    pub preferred_name: Option<String>,
}

#[derive(Debug, Default, Eq, PartialEq)]
pub enum CounterpartyKind {
    /// Paid to or from a UK bank account.
    BankAccount {
        account_number: String,
        sort_code: String,
    },
    /// Paid to or from another Monzo user by phone number.
    MobileMoney { phone_number: String, user_id: String },
    /// No counterparty, or one without account details (e.g. card payments).
    #[default]
    Absent,
}

impl TryFrom<de::Counterparty> for Counterparty {
    type Error = Error;

    fn try_from(v: de::Counterparty) -> Result<Self> {
        use CounterpartyKind::*;

        let kind = match (v.account_number, v.number) {
            (Some(account_number), _) => BankAccount {
                account_number,
                sort_code: v
                    .sort_code
                    .ok_or_else(|| anyhow!("account number without a sort code"))?,
            },
            (None, Some(phone_number)) => MobileMoney {
                phone_number,
                user_id: v
                    .user_id
                    .ok_or_else(|| anyhow!("phone number without a user id"))?,
            },
            (None, None) => Absent,
        };
        Ok(Self {
            kind,
            name: v.name,
            preferred_name: v.prefered_name,
        })
    }
}
