use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::services::WorkItemSource;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// `work_item` section of the configuration file
    #[default]
    Config,
    /// `--url`, `--phrase` and `--category`
    Args,
    /// JSON file named by the configured environment variable
    Env,
    /// Work item api
    Api,
}

/// Searches a news website and saves the matching news to a spreadsheet.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "configuration/base.yaml")]
    pub config: PathBuf,

    /// Directory of the daily log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Where the url, phrase and category are read from
    #[arg(short, long, value_enum, default_value_t = SourceKind::Config)]
    pub source: SourceKind,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(short, long)]
    pub phrase: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

impl Cli {
    pub fn work_item_source(&self) -> WorkItemSource {
        match self.source {
            SourceKind::Config => WorkItemSource::Config,
            SourceKind::Args => WorkItemSource::Args {
                url: self.url.clone(),
                search_phrase: self.phrase.clone(),
                category: self.category.clone(),
            },
            SourceKind::Env => WorkItemSource::Environment,
            SourceKind::Api => WorkItemSource::Api,
        }
    }
}
