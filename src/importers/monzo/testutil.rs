use serde_json::{json, Value};

use crate::importers::monzo::{de, record::Transaction};

/// A plain card payment in GBP, as returned by the API.
pub fn base_record() -> Value {
    json!({
        "id": "tx_0001",
        "account_id": "acc_0001",
        "dedupe_id": "dd_0001",
        "description": "PRET A MANGER",
        "notes": "",
        "amount": -450,
        "currency": "GBP",
        "local_amount": -450,
        "local_currency": "GBP",
        "created": "2023-04-05T12:34:56.789Z",
        "settled": "2023-04-06T02:00:00.000Z",
        "updated": "2023-04-06T02:00:01.000Z",
        "counterparty": {},
        "merchant": null,
        "scheme": "mastercard",
        "metadata": {}
    })
}

/// `base_record` with the given top level fields replaced.
pub fn json_with(overrides: Value) -> Value {
    let mut v = base_record();
    let fields = v.as_object_mut().expect("base record is an object");
    for (k, field) in overrides.as_object().expect("overrides are an object") {
        fields.insert(k.clone(), field.clone());
    }
    v
}

pub fn record_with(overrides: Value) -> Transaction {
    let de: de::Transaction =
        serde_json::from_value(json_with(overrides)).expect("deserialize transaction");
    de.try_into().expect("valid transaction")
}
