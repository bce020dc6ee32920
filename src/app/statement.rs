use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{ArgEnum, Parser};
use teller_lib::types::{DateRange, StatementFormat};

use crate::app::Context;
use crate::Error;

#[derive(Debug, Clone, Copy, ArgEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for StatementFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Statement {
    /// First day to include (YYYY-MM-DD)
    #[clap(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[clap(long)]
    to: Option<NaiveDate>,

    /// Document format to request
    #[clap(long, arg_enum, default_value = "csv")]
    format: Format,

    /// Write the document here instead of stdout
    #[clap(long, short)]
    output: Option<PathBuf>,
}

impl Statement {
    pub async fn run(self, ctx: &Context) -> Result<(), Error> {
        let range = DateRange {
            from: self.from,
            to: self.to,
        };
        let document = ctx.accounts.statement(Some(range), self.format.into()).await?;

        match self.output {
            Some(path) => {
                fs::write(&path, document)
                    .with_context(|| format!("failed to write statement to {}", path.display()))?;
                println!("statement written to {}", path.display());
            }
            None => print!("{document}"),
        }

        Ok(())
    }
}
