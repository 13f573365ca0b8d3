//! Derivation of entry fields from a transaction record.

use rust_decimal::Decimal;

use crate::beancount::Amount;
use crate::importers::monzo::record::{Scheme, Transaction};

/// Narration used for pot transfers that the user has not annotated.
pub const POT_TRANSFER_NARRATION: &str = "Internal pot transfer";

/// Decimal places kept in foreign exchange unit prices.
const PRICE_DECIMAL_PLACES: u32 = 5;

/// The merchant name, else the counterparty's preferred name, else the
/// counterparty's name. Empty names count as absent.
pub fn payee(trn: &Transaction) -> Option<String> {
    [
        trn.merchant_name.as_ref(),
        trn.counterparty.preferred_name.as_ref(),
        trn.counterparty.name.as_ref(),
    ]
    .into_iter()
    .flatten()
    .find(|name| !name.is_empty())
    .cloned()
}

pub fn narration(trn: &Transaction) -> String {
    if !trn.notes.is_empty() {
        trn.notes.clone()
    } else if trn.scheme == Scheme::PotTransfer {
        POT_TRANSFER_NARRATION.to_string()
    } else {
        trn.description.clone()
    }
}

/// The settled amount as a decimal quantity of its currency.
pub fn units(trn: &Transaction) -> Amount {
    Amount::new(Decimal::new(trn.amount, 2), trn.currency.as_str())
}

/// Price of one unit of the settled currency in the local currency, for
/// transactions made in a foreign currency.
///
/// Card checks have a zero local amount and get no price.
pub fn unit_price(trn: &Transaction) -> Option<Amount> {
    if trn.local_currency == trn.currency || trn.local_amount == 0 || trn.amount == 0 {
        return None;
    }
    let ratio = Decimal::from(trn.local_amount).checked_div(Decimal::from(trn.amount))?;
    let mut price = ratio.abs().round_dp(PRICE_DECIMAL_PLACES);
    price.rescale(PRICE_DECIMAL_PLACES);
    Some(Amount::new(price, trn.local_currency.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use test_case::test_case;

    use crate::importers::monzo::testutil::record_with;

    #[test_case(
        json!({"merchant": {"name": "Coffee Shop"}, "counterparty": {"name": "Ignored"}})
        => Some("Coffee Shop".to_string());
        "merchant_name"
    )]
    #[test_case(
        json!({"counterparty": {"prefered_name": "Nickname", "name": "Full Name"}})
        => Some("Nickname".to_string());
        "preferred_name"
    )]
    #[test_case(
        json!({"counterparty": {"name": "Full Name"}})
        => Some("Full Name".to_string());
        "counterparty_name"
    )]
    #[test_case(
        json!({"merchant": {"name": ""}, "counterparty": {"name": "Full Name"}})
        => Some("Full Name".to_string());
        "empty_merchant_name_skipped"
    )]
    #[test_case(json!({}) => None; "none")]
    fn test_payee(overrides: serde_json::Value) -> Option<String> {
        payee(&record_with(overrides))
    }

    #[test_case(json!({"notes": "Birthday present"}) => "Birthday present"; "notes")]
    #[test_case(
        json!({"notes": "Holiday fund", "scheme": "uk_retail_pot"})
        => "Holiday fund";
        "pot_transfer_with_notes"
    )]
    #[test_case(json!({"scheme": "uk_retail_pot"}) => POT_TRANSFER_NARRATION; "pot_transfer")]
    #[test_case(json!({"description": "TFL TRAVEL CH"}) => "TFL TRAVEL CH"; "description")]
    fn test_narration(overrides: serde_json::Value) -> String {
        narration(&record_with(overrides))
    }

    #[test_case(
        json!({"amount": 1000, "currency": "GBP", "local_amount": -850, "local_currency": "EUR"})
        => Some("0.85000 EUR".to_string());
        "foreign_spend"
    )]
    #[test_case(
        json!({"amount": -300, "currency": "GBP", "local_amount": -1000, "local_currency": "DKK"})
        => Some("3.33333 DKK".to_string());
        "rounded_to_five_places"
    )]
    #[test_case(
        json!({"amount": -1, "currency": "GBP", "local_amount": -123456, "local_currency": "JPY"})
        => Some("123456.00000 JPY".to_string());
        "large_ratio"
    )]
    #[test_case(
        json!({"amount": 0, "currency": "GBP", "local_amount": 0, "local_currency": "EUR"})
        => None;
        "zero_local_amount"
    )]
    #[test_case(
        json!({"amount": -250, "currency": "GBP", "local_amount": 0, "local_currency": "USD"})
        => None;
        "card_check"
    )]
    #[test_case(
        json!({"amount": 0, "currency": "GBP", "local_amount": 100, "local_currency": "USD"})
        => None;
        "zero_settled_amount"
    )]
    #[test_case(
        json!({"amount": -1000, "currency": "GBP", "local_amount": -1000, "local_currency": "GBP"})
        => None;
        "same_currency"
    )]
    fn test_unit_price(overrides: serde_json::Value) -> Option<String> {
        unit_price(&record_with(overrides)).map(|price| price.to_string())
    }

    #[test]
    fn units_are_minor_units_over_100() {
        let trn = record_with(json!({"amount": -1234, "currency": "GBP"}));
        assert_eq!(Amount::new(Decimal::new(-1234, 2), "GBP"), units(&trn));
        assert_eq!("-12.34 GBP", units(&trn).to_string());
    }
}
