//! Metadata keys written on imported entries. Values are copied verbatim from
//! the bank's data so that a re-import produces identical metadata.

/// Transaction identifier, provided by the bank.
pub const BANK_ID: &str = "bank_id";
/// Identifier that stays stable across re-fetches of the same transaction.
pub const BANK_DEDUPE_ID: &str = "bank_dedupe_id";
/// Raw transaction description, provided by the bank.
pub const BANK_DESCRIPTION: &str = "bank_description";
pub const BANK_CREATED_DATE: &str = "bank_created_date";
/// Settlement timestamp. Empty while the transaction is still pending.
pub const BANK_SETTLEMENT_DATE: &str = "bank_settlement_date";
pub const BANK_UPDATED_DATE: &str = "bank_updated_date";

pub const COUNTERPARTY_ACCOUNT_NUMBER: &str = "counterparty_account_number";
pub const COUNTERPARTY_SORT_CODE: &str = "counterparty_sort_code";
pub const COUNTERPARTY_PHONE_NUMBER: &str = "counterparty_phone_number";
pub const COUNTERPARTY_USER_ID: &str = "counterparty_user_id";
