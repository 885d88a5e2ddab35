use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigFile;

/// Merge newly exported school survey measures into a district aggregate dataset
#[derive(Parser, Debug)]
#[command(name = "survey-merge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append the raw export's measures to the aggregate file (default)
    Merge(MergeArgs),

    /// Print the column mapping table
    Mappings {
        /// Raw export to show the header found at each mapped position
        #[arg(short, long)]
        raw_file: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// TOML config file (default: ./survey-merge.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Existing district aggregate file
    #[arg(long)]
    pub district_file: Option<PathBuf>,

    /// Raw survey export
    #[arg(long)]
    pub raw_file: Option<PathBuf>,

    /// SCHOOL_YEAR label for new rows
    #[arg(long)]
    pub school_year: Option<String>,

    /// YEAR_GU batch identifier for new rows
    #[arg(long)]
    pub year_gu: Option<String>,

    /// Output base path; `_<MMDDYYYY>.csv` is appended
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl MergeArgs {
    /// Command-line values that override the config file
    pub fn overrides(&self) -> ConfigFile {
        ConfigFile {
            district_file: self.district_file.clone(),
            raw_file: self.raw_file.clone(),
            new_school_year: self.school_year.clone(),
            new_year_gu: self.year_gu.clone(),
            output_path: self.output_path.clone(),
        }
    }
}
