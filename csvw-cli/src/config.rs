//! Config file loading and flag merging
//!
//! Settings resolve in order: command-line flags, then the `[convert]`
//! section of the config file, then built-in defaults.

use crate::cli::ConvertArgs;
use crate::error::{CliError, CliResult};
use csvw_convert::ConvertConfig;
use csvw_graph_format::RdfFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const CONFIG_FILE: &str = "csvw.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub convert: ConvertSection,
}

/// `[convert]` section; every key mirrors a `csvw convert` flag
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConvertSection {
    pub format: Option<RdfFormat>,
    pub workers: Option<usize>,
    pub chunk_size: Option<usize>,
    pub delimiter: Option<char>,
    pub quotechar: Option<char>,
    pub base: Option<String>,
    pub dataset_name: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> CliResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `explicit`, or `csvw.toml` in the working directory if it exists
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        let path: PathBuf = match explicit {
            Some(p) => {
                if !p.is_file() {
                    return Err(CliError::Config(format!(
                        "config file does not exist: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.is_file() {
                    return Ok(Self::default());
                }
                local
            }
        };

        let text = fs::read_to_string(&path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::parse(&text)
    }
}

/// Flags merged over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSettings {
    pub config: ConvertConfig,
    pub delimiter: Option<char>,
    pub quotechar: Option<char>,
    pub dataset_name: Option<String>,
}

impl ConvertSettings {
    pub fn resolve(args: &ConvertArgs, file: &ConvertSection) -> Self {
        let mut config = ConvertConfig::default();
        if let Some(format) = args.format.or(file.format) {
            config = config.with_format(format);
        }
        if let Some(workers) = args.workers.or(file.workers) {
            config = config.with_workers(workers);
        }
        if let Some(chunk_size) = args.chunk_size.or(file.chunk_size) {
            config = config.with_chunk_size(chunk_size);
        }
        if let Some(base) = args.base.as_ref().or(file.base.as_ref()) {
            config = config.with_base(base.clone());
        }

        Self {
            config,
            delimiter: args.delimiter.or(file.delimiter),
            quotechar: args.quotechar.or(file.quotechar),
            dataset_name: args
                .dataset_name
                .clone()
                .or_else(|| file.dataset_name.clone()),
        }
    }

    /// Job config for one input file; the dataset name defaults to its file name
    pub fn config_for(&self, csv_path: &Path) -> ConvertConfig {
        let name = self.dataset_name.clone().or_else(|| {
            csv_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        });
        match name {
            Some(name) => self.config.clone().with_dataset_name(name),
            None => self.config.clone(),
        }
    }
}
