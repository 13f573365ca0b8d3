//! Beancount directives produced by importers, and their textual form.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Neg;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod builder;

/// Transaction or posting flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flag {
    /// `*`: the entry is complete.
    Okay,
    /// `!`: the entry requires human review/categorisation.
    Warning,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use Flag::*;
        f.write_str(match self {
            Okay => "*",
            Warning => "!",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new<S: Into<String>>(number: Decimal, currency: S) -> Self {
        Amount {
            number,
            currency: currency.into(),
        }
    }
}

impl Neg for Amount {
    type Output = Amount;

    /// Zero stays unsigned.
    fn neg(self) -> Amount {
        let number = if self.number.is_zero() {
            self.number.abs()
        } else {
            -self.number
        };
        Amount {
            number,
            currency: self.currency,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.number, self.currency)
    }
}

/// String valued metadata attached to a directive. Keys are written out in
/// the order they were inserted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets `key` to `value`, replacing any existing value in place.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for (k, v) in &self.entries {
            writeln!(f, "  {}: {}", k, Quoted(v))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub account: String,
    pub comment: String,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(
            f,
            "{} note {} {}",
            self.date,
            self.account,
            Quoted(&self.comment)
        )?;
        write!(f, "{}", self.meta)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub flag: Flag,
    pub payee: Option<String>,
    pub narration: String,
    pub tags: BTreeSet<String>,
    pub links: BTreeSet<String>,
    pub postings: Vec<Posting>,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.date, self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, " {}", Quoted(payee))?;
        }
        write!(f, " {}", Quoted(&self.narration))?;
        for tag in &self.tags {
            write!(f, " #{}", tag)?;
        }
        for link in &self.links {
            write!(f, " ^{}", link)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.meta)?;
        for p in &self.postings {
            writeln!(f, "  {}", p)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Posting {
    pub account: String,
    pub units: Amount,
    /// Per-unit price, used to value foreign currency spending.
    pub price: Option<Amount>,
    pub flag: Option<Flag>,
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if let Some(flag) = &self.flag {
            write!(f, "{} ", flag)?;
        }
        write!(f, "{}  {}", self.account, self.units)?;
        if let Some(price) = &self.price {
            write!(f, " @ {}", price)?;
        }
        Ok(())
    }
}

/// A single directive produced by an importer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Entry {
    Note(Note),
    Transaction(Transaction),
}

impl Entry {
    pub fn date(&self) -> NaiveDate {
        use Entry::*;
        match self {
            Note(note) => note.date,
            Transaction(trn) => trn.date,
        }
    }

    pub fn meta(&self) -> &Metadata {
        use Entry::*;
        match self {
            Note(note) => &note.meta,
            Transaction(trn) => &trn.meta,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use Entry::*;
        match self {
            Note(note) => note.fmt(f),
            Transaction(trn) => trn.fmt(f),
        }
    }
}

/// Formats entries one after another, separated by blank lines.
pub fn format_entries(entries: &[Entry]) -> String {
    itertools::join(entries.iter().map(Entry::to_string), "\n")
}

/// Beancount string literal.
struct Quoted<'a>(&'a str);

impl<'a> fmt::Display for Quoted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")
    }
}
