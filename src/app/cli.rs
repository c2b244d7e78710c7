use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::ingest::{DirectEntries, EmailDomains, ExtractionPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// CSV file with a header row
    #[arg(short, long, value_name = "FILE", default_value = "input.csv")]
    pub input: PathBuf,

    /// Which column to read and how to interpret it
    #[arg(short, long, value_enum, default_value_t = Mode::Emails)]
    pub mode: Mode,

    /// Env file to load instead of ./.env
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// `emails` column; bookmark each address's domain
    Emails,
    /// `domains` column; bookmark each domain or URL as given
    Domains,
}

impl Mode {
    pub fn policy(self) -> Box<dyn ExtractionPolicy> {
        match self {
            Mode::Emails => Box::new(EmailDomains),
            Mode::Domains => Box::new(DirectEntries),
        }
    }
}
