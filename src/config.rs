use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::Error;
use crate::types::{BatchLabels, Result};

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "survey-merge.toml";

pub const DEFAULT_DISTRICT_FILE: &str = "district_aggregates_pano1.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./output/combined_pano_data";

/// Settings as written in a config file or given on the command line.
/// Every key is optional here; `MergeConfig::resolve` decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub district_file: Option<PathBuf>,
    pub raw_file: Option<PathBuf>,
    pub new_school_year: Option<String>,
    pub new_year_gu: Option<String>,
    pub output_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Values set in `overrides` win
    pub fn overlay(self, overrides: ConfigFile) -> ConfigFile {
        ConfigFile {
            district_file: overrides.district_file.or(self.district_file),
            raw_file: overrides.raw_file.or(self.raw_file),
            new_school_year: overrides.new_school_year.or(self.new_school_year),
            new_year_gu: overrides.new_year_gu.or(self.new_year_gu),
            output_path: overrides.output_path.or(self.output_path),
        }
    }
}

/// Load a TOML config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load the explicitly named config file, or the default one if present
pub fn discover_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_config_file(path)
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                info!(path = DEFAULT_CONFIG_FILE, "loading config");
                load_config_file(default)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Everything one merge run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub district_file: PathBuf,
    pub raw_file: PathBuf,
    pub batch: BatchLabels,
    /// Base path; the run date and `.csv` are appended at write time
    pub output_path: PathBuf,
}

impl MergeConfig {
    pub fn resolve(file: ConfigFile, overrides: ConfigFile) -> Result<Self> {
        let merged = file.overlay(overrides);

        Ok(Self {
            district_file: merged
                .district_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DISTRICT_FILE)),
            raw_file: required(merged.raw_file, "raw_file")?,
            batch: BatchLabels {
                school_year: required(non_blank(merged.new_school_year), "new_school_year")?,
                year_gu: required(non_blank(merged.new_year_gu), "new_year_gu")?,
            },
            output_path: merged
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        })
    }
}

fn required<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| Error::Config(format!("missing required setting '{}'", key)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
