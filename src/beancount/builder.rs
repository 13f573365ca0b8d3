use chrono::naive::NaiveDate;

use crate::beancount::{Amount, Flag, Metadata, Posting, Transaction};

pub struct TransactionBuilder {
    trn: Transaction,
}

impl TransactionBuilder {
    pub fn new<S: Into<String>>(date: NaiveDate, flag: Flag, narration: S) -> Self {
        TransactionBuilder {
            trn: Transaction {
                meta: Metadata::new(),
                date,
                flag,
                payee: None,
                narration: narration.into(),
                tags: Default::default(),
                links: Default::default(),
                postings: vec![],
            },
        }
    }

    pub fn meta(mut self, meta: Metadata) -> Self {
        self.trn.meta = meta;
        self
    }

    pub fn payee(mut self, payee: Option<String>) -> Self {
        self.trn.payee = payee;
        self
    }

    #[cfg(test)] // Currently only used in tests.
    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.trn.tags.insert(tag.into());
        self
    }

    pub fn link<S: Into<String>>(mut self, link: S) -> Self {
        self.trn.links.insert(link.into());
        self
    }

    pub fn posting<S: Into<String>>(
        self,
        account: S,
        units: Amount,
        price: Option<Amount>,
    ) -> Self {
        self.flagged_posting(account, units, price, None)
    }

    pub fn flagged_posting<S: Into<String>>(
        mut self,
        account: S,
        units: Amount,
        price: Option<Amount>,
        flag: Option<Flag>,
    ) -> Self {
        self.trn.postings.push(Posting {
            account: account.into(),
            units,
            price,
            flag,
        });
        self
    }

    pub fn build(self) -> Transaction {
        self.trn
    }
}
