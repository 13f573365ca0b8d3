//! Maps each transaction record onto exactly one ledger entry.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::beancount::builder::TransactionBuilder;
use crate::beancount::{Entry, Flag, Metadata, Note};
use crate::importers::monzo::record::{CounterpartyKind, Scheme, Transaction};
use crate::importers::monzo::resolve;
use crate::tags;

/// Notes text the bank app writes on PIN change records.
const PIN_CHANGE_MARKER: &str = "pin change";
const PIN_CHANGE_NOTE: &str = "PIN Change";
/// Key of the pot identifier in the metadata of pot transfers.
const POT_ID_KEY: &str = "pot_id";
/// Used in place of the payee in decline notes when none is known.
const UNKNOWN_PAYEE: &str = "Unknown";

/// The kind of entry a transaction record becomes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape<'a> {
    /// A PIN change recorded as a zero amount transaction.
    PinChange,
    /// A card payment that was declined, with the bank's reason.
    Declined { reason: &'a str },
    /// A move between the account and one of its pots.
    PotTransfer,
    /// Anything else. The other side of the transaction is not known.
    General,
}

type Guard = fn(&Transaction) -> Option<Shape<'_>>;

/// Guards in order of precedence. The first to match decides the shape.
const PRECEDENCE: &[Guard] = &[pin_change, declined, pot_transfer];

pub fn classify(trn: &Transaction) -> Shape<'_> {
    PRECEDENCE
        .iter()
        .find_map(|guard| guard(trn))
        .unwrap_or(Shape::General)
}

fn pin_change(trn: &Transaction) -> Option<Shape<'_>> {
    if trn.notes.to_lowercase() == PIN_CHANGE_MARKER {
        Some(Shape::PinChange)
    } else {
        None
    }
}

fn declined(trn: &Transaction) -> Option<Shape<'_>> {
    trn.decline_reason
        .as_deref()
        .map(|reason| Shape::Declined { reason })
}

fn pot_transfer(trn: &Transaction) -> Option<Shape<'_>> {
    if trn.scheme == Scheme::PotTransfer {
        Some(Shape::PotTransfer)
    } else {
        None
    }
}

/// Produces entries for transactions of a single account.
#[derive(Debug)]
pub struct Mapper<'a> {
    account: &'a str,
    timezone: Option<Tz>,
}

impl<'a> Mapper<'a> {
    pub fn new(account: &'a str, timezone: Option<Tz>) -> Self {
        Self { account, timezone }
    }

    pub fn map(&self, trn: &Transaction) -> Result<Entry> {
        let meta = metadata(trn);
        let date = trn.created.date(self.timezone);

        use Shape::*;
        Ok(match classify(trn) {
            PinChange => self.note(meta, date, PIN_CHANGE_NOTE.to_string()),
            Declined { reason } => {
                let payee = resolve::payee(trn);
                let comment = format!(
                    "{} transaction declined with reason {}",
                    payee.as_deref().unwrap_or(UNKNOWN_PAYEE),
                    reason
                );
                self.note(meta, date, comment)
            }
            PotTransfer => {
                let pot_id = trn
                    .metadata
                    .get(POT_ID_KEY)
                    .ok_or_else(|| anyhow!("pot transfer {} has no {}", trn.id, POT_ID_KEY))?;
                let units = resolve::units(trn);
                Entry::Transaction(
                    TransactionBuilder::new(date, Flag::Okay, resolve::narration(trn))
                        .meta(meta)
                        .payee(resolve::payee(trn))
                        .link(pot_id.as_str())
                        .posting(self.account, units.clone(), None)
                        .posting(self.account, -units, None)
                        .build(),
                )
            }
            General => Entry::Transaction(
                TransactionBuilder::new(date, Flag::Warning, resolve::narration(trn))
                    .meta(meta)
                    .payee(resolve::payee(trn))
                    .posting(self.account, resolve::units(trn), resolve::unit_price(trn))
                    .build(),
            ),
        })
    }

    fn note(&self, meta: Metadata, date: NaiveDate, comment: String) -> Entry {
        Entry::Note(Note {
            meta,
            date,
            account: self.account.to_string(),
            comment,
        })
    }
}

fn metadata(trn: &Transaction) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert(tags::BANK_ID, trn.id.as_str());
    meta.insert(tags::BANK_DEDUPE_ID, trn.dedupe_id.as_str());
    meta.insert(tags::BANK_DESCRIPTION, trn.description.as_str());
    meta.insert(tags::BANK_CREATED_DATE, trn.created.raw.as_str());
    meta.insert(tags::BANK_SETTLEMENT_DATE, trn.settled.as_str());
    meta.insert(tags::BANK_UPDATED_DATE, trn.updated.as_str());

    use CounterpartyKind::*;
    match &trn.counterparty.kind {
        BankAccount {
            account_number,
            sort_code,
        } => {
            meta.insert(tags::COUNTERPARTY_ACCOUNT_NUMBER, account_number.as_str());
            meta.insert(tags::COUNTERPARTY_SORT_CODE, sort_code.as_str());
        }
        MobileMoney {
            phone_number,
            user_id,
        } => {
            meta.insert(tags::COUNTERPARTY_PHONE_NUMBER, phone_number.as_str());
            meta.insert(tags::COUNTERPARTY_USER_ID, user_id.as_str());
        }
        Absent => {}
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;
    use serde_json::json;
    use test_case::test_case;

    use crate::beancount::Amount;
    use crate::importers::monzo::testutil::record_with;

    const ACCOUNT: &str = "Assets:Monzo:Current";

    fn map(overrides: serde_json::Value) -> Entry {
        Mapper::new(ACCOUNT, None)
            .map(&record_with(overrides))
            .expect("map transaction")
    }

    fn expect_note(entry: Entry) -> Note {
        match entry {
            Entry::Note(note) => note,
            other => panic!("got {:?}, want note", other),
        }
    }

    fn expect_transaction(entry: Entry) -> crate::beancount::Transaction {
        match entry {
            Entry::Transaction(trn) => trn,
            other => panic!("got {:?}, want transaction", other),
        }
    }

    #[test_case(json!({}), Shape::General; "general")]
    #[test_case(json!({"notes": "PIN change"}), Shape::PinChange; "pin_change")]
    #[test_case(json!({"notes": "PIN CHANGE"}), Shape::PinChange; "pin_change_upper")]
    #[test_case(json!({"notes": "pin changed"}), Shape::General; "not_quite_pin_change")]
    #[test_case(json!({"scheme": "uk_retail_pot"}), Shape::PotTransfer; "pot_transfer")]
    #[test_case(
        json!({"notes": "pin change", "decline_reason": "INVALID_PIN", "scheme": "uk_retail_pot"}),
        Shape::PinChange;
        "pin_change_beats_declined"
    )]
    #[test_case(
        json!({"decline_reason": "INSUFFICIENT_FUNDS", "scheme": "uk_retail_pot"}),
        Shape::Declined { reason: "INSUFFICIENT_FUNDS" };
        "declined_beats_pot_transfer"
    )]
    fn test_classify(overrides: serde_json::Value, want: Shape<'static>) {
        let trn = record_with(overrides);
        assert_eq!(want, classify(&trn));
    }

    #[test]
    fn pin_change_is_a_note() {
        let note = expect_note(map(json!({"notes": "Pin Change", "amount": 0})));
        assert_eq!("PIN Change", note.comment);
        assert_eq!(ACCOUNT, note.account);
        assert_eq!(NaiveDate::from_ymd_opt(2023, 4, 5).unwrap(), note.date);
        assert_eq!(Some("tx_0001"), note.meta.get(tags::BANK_ID));
    }

    #[test_case(
        json!({"decline_reason": "INSUFFICIENT_FUNDS", "merchant": {"name": "Cinema"}})
        => "Cinema transaction declined with reason INSUFFICIENT_FUNDS";
        "with_merchant"
    )]
    #[test_case(
        json!({"decline_reason": "CARD_BLOCKED", "counterparty": {"name": "Some Shop"}})
        => "Some Shop transaction declined with reason CARD_BLOCKED";
        "with_counterparty"
    )]
    #[test_case(
        json!({"decline_reason": "OTHER"})
        => "Unknown transaction declined with reason OTHER";
        "without_payee"
    )]
    fn test_declined_note(overrides: serde_json::Value) -> String {
        expect_note(map(overrides)).comment
    }

    #[test]
    fn pot_transfer_balances_on_own_account() {
        let trn = expect_transaction(map(json!({
            "scheme": "uk_retail_pot",
            "amount": -2500,
            "local_amount": -2500,
            "description": "pot_0001",
            "metadata": {"pot_id": "pot_0001", "trigger": "user"},
        })));
        assert_eq!(Flag::Okay, trn.flag);
        assert_eq!(resolve::POT_TRANSFER_NARRATION, trn.narration);
        assert_eq!(vec!["pot_0001"], trn.links.iter().collect::<Vec<_>>());
        assert_eq!(2, trn.postings.len());
        let sum: Decimal = trn.postings.iter().map(|p| p.units.number).sum();
        assert_eq!(Decimal::ZERO, sum);
        for p in &trn.postings {
            assert_eq!(ACCOUNT, p.account);
            assert_eq!(None, p.price);
            assert_eq!(None, p.flag);
        }
        assert_eq!(Decimal::new(-2500, 2), trn.postings[0].units.number);
    }

    #[test]
    fn zero_pot_transfer_has_unsigned_postings() {
        let trn = expect_transaction(map(json!({
            "scheme": "uk_retail_pot",
            "amount": 0,
            "local_amount": 0,
            "metadata": {"pot_id": "pot_0001"},
        })));
        let lines: Vec<String> = trn.postings.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            vec![
                format!("{}  0.00 GBP", ACCOUNT),
                format!("{}  0.00 GBP", ACCOUNT),
            ],
            lines
        );
    }

    #[test]
    fn pot_transfer_without_pot_id_fails() {
        let trn = record_with(json!({"scheme": "uk_retail_pot"}));
        assert!(Mapper::new(ACCOUNT, None).map(&trn).is_err());
    }

    #[test]
    fn general_transaction_needs_review() {
        let trn = expect_transaction(map(json!({
            "amount": -1000,
            "local_amount": -1176,
            "local_currency": "EUR",
            "merchant": {"name": "Boulangerie"},
        })));
        assert_eq!(Flag::Warning, trn.flag);
        assert_eq!(Some("Boulangerie".to_string()), trn.payee);
        assert_eq!("PRET A MANGER", trn.narration);
        assert!(trn.links.is_empty());
        assert_eq!(1, trn.postings.len());
        let posting = &trn.postings[0];
        assert_eq!(Amount::new(Decimal::new(-1000, 2), "GBP"), posting.units);
        assert_eq!(
            Some(Amount::new(Decimal::new(117600, 5), "EUR")),
            posting.price
        );
    }

    #[test]
    fn metadata_for_bank_transfer() {
        let entry = map(json!({
            "counterparty": {"account_number": "12345678", "sort_code": "040004", "name": "Landlord"},
        }));
        let meta = entry.meta();
        assert_eq!(
            vec![
                tags::BANK_ID,
                tags::BANK_DEDUPE_ID,
                tags::BANK_DESCRIPTION,
                tags::BANK_CREATED_DATE,
                tags::BANK_SETTLEMENT_DATE,
                tags::BANK_UPDATED_DATE,
                tags::COUNTERPARTY_ACCOUNT_NUMBER,
                tags::COUNTERPARTY_SORT_CODE,
            ],
            meta.keys().collect::<Vec<_>>()
        );
        assert_eq!(Some("2023-04-05T12:34:56.789Z"), meta.get(tags::BANK_CREATED_DATE));
        assert_eq!(Some("040004"), meta.get(tags::COUNTERPARTY_SORT_CODE));
    }

    #[test]
    fn metadata_for_mobile_transfer() {
        let entry = map(json!({
            "decline_reason": "OTHER",
            "counterparty": {"number": "+447700900000", "user_id": "user_0001"},
        }));
        let meta = entry.meta();
        assert_eq!(Some("+447700900000"), meta.get(tags::COUNTERPARTY_PHONE_NUMBER));
        assert_eq!(Some("user_0001"), meta.get(tags::COUNTERPARTY_USER_ID));
        assert_eq!(None, meta.get(tags::COUNTERPARTY_ACCOUNT_NUMBER));
    }

    #[test]
    fn date_in_configured_timezone() {
        let trn = record_with(json!({"created": "2023-06-30T23:15:00Z"}));
        let utc = Mapper::new(ACCOUNT, None).map(&trn).expect("map");
        let london = Mapper::new(ACCOUNT, Some(chrono_tz::Europe::London))
            .map(&trn)
            .expect("map");
        assert_eq!(NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(), utc.date());
        assert_eq!(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(), london.date());
    }
}
