pub mod cmd;
pub mod importer;
pub mod monzo;

#[cfg(test)]
mod testutil;
