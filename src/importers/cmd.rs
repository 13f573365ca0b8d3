use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use itertools::Itertools;
use log::{debug, info, warn};

use crate::beancount::format_entries;
use crate::config::AccountArgs;
use crate::filespec::{self, FileSpec};
use crate::importers::importer::EntryImporter;

/// Input files or directories. Directories are searched for `*.json` files.
#[derive(Debug, Args)]
struct Inputs {
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl Inputs {
    fn candidates(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for input in &self.inputs {
            if input.is_dir() {
                let dir = input
                    .to_str()
                    .ok_or_else(|| anyhow!("directory name {:?} is not valid UTF-8", input))?;
                let pattern = format!("{}/*.json", glob::Pattern::escape(dir));
                for entry in glob::glob(&pattern)? {
                    files.push(entry.with_context(|| format!("listing {:?}", input))?);
                }
            } else {
                files.push(input.clone());
            }
        }
        Ok(files)
    }
}

/// Pairs each candidate file with the first importer that identifies it.
/// Files that no importer identifies are left out.
fn identify<'a>(
    importers: &'a [&'a dyn EntryImporter],
    files: Vec<PathBuf>,
) -> Result<Vec<(PathBuf, &'a dyn EntryImporter)>> {
    let mut identified = Vec::new();
    for file in files {
        let mut found = None;
        for importer in importers {
            if importer
                .identify(&file)
                .with_context(|| format!("identifying {:?}", file))?
            {
                found = Some(*importer);
                break;
            }
        }
        match found {
            Some(importer) => {
                debug!("{:?} is for {}", file, importer.account());
                identified.push((file, importer));
            }
            None => info!("skipping {:?}: not for any configured account", file),
        }
    }
    Ok(identified)
}

fn dated<'a>(
    identified: Vec<(PathBuf, &'a dyn EntryImporter)>,
) -> Result<Vec<(Option<NaiveDate>, PathBuf, &'a dyn EntryImporter)>> {
    identified
        .into_iter()
        .map(|(file, importer)| {
            importer
                .date(&file)
                .map(|date| (date, file, importer))
        })
        .collect()
}

/// Prints the ledger account of each input file that belongs to a configured
/// account.
#[derive(Debug, Args)]
pub struct IdentifyCommand {
    #[command(flatten)]
    accounts: AccountArgs,
    #[command(flatten)]
    inputs: Inputs,
}

impl IdentifyCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.accounts.load()?;
        let monzo = config.importers();
        let importers: Vec<&dyn EntryImporter> =
            monzo.iter().map(|i| i as &dyn EntryImporter).collect();
        let mut out = String::new();
        for (file, importer) in identify(&importers, self.inputs.candidates()?)? {
            out.push_str(&format!("{}\t{}\n", file.display(), importer.account()));
        }
        filespec::write_file(&FileSpec::Stdio, &out)
    }
}

/// Prints the date each input file is filed under.
#[derive(Debug, Args)]
pub struct DateCommand {
    #[command(flatten)]
    accounts: AccountArgs,
    #[command(flatten)]
    inputs: Inputs,
}

impl DateCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.accounts.load()?;
        let monzo = config.importers();
        let importers: Vec<&dyn EntryImporter> =
            monzo.iter().map(|i| i as &dyn EntryImporter).collect();
        let mut out = String::new();
        for (date, file, importer) in dated(identify(&importers, self.inputs.candidates()?)?)? {
            match date {
                Some(date) => out.push_str(&format!("{}\t{}\n", file.display(), date)),
                None => warn!("{:?} ({}) has no transactions", file, importer.account()),
            }
        }
        filespec::write_file(&FileSpec::Stdio, &out)
    }
}

/// Extracts Beancount entries from every input file that belongs to a
/// configured account.
#[derive(Debug, Args)]
pub struct ImportCommand {
    #[command(flatten)]
    accounts: AccountArgs,
    /// The Beancount file to write to (overwrites any existing file). "-"
    /// writes to stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
    #[command(flatten)]
    inputs: Inputs,
}

impl ImportCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.accounts.load()?;
        let monzo = config.importers();
        let importers: Vec<&dyn EntryImporter> =
            monzo.iter().map(|i| i as &dyn EntryImporter).collect();
        let files = identify(&importers, self.inputs.candidates()?)?;
        let content = import_files(dated(files)?)?;
        filespec::write_file(&self.output, &content)
    }
}

/// Formats the entries of each file, oldest file first, each headed by a
/// comment naming the file.
fn import_files(files: Vec<(Option<NaiveDate>, PathBuf, &dyn EntryImporter)>) -> Result<String> {
    let mut sections = Vec::new();
    for (_, file, importer) in files
        .into_iter()
        .sorted_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)))
    {
        let entries = match importer.extract(&file)? {
            Some(entries) => entries,
            None => {
                warn!("{:?} has no transactions list", file);
                continue;
            }
        };
        info!("{} entries from {:?}", entries.len(), file);
        sections.push(section(importer, &file, &format_entries(&entries)));
    }
    Ok(sections.join("\n"))
}

fn section(importer: &dyn EntryImporter, file: &Path, body: &str) -> String {
    if body.is_empty() {
        format!(";; {}\n", importer.filename(file))
    } else {
        format!(";; {}\n\n{}", importer.filename(file), body)
    }
}
