//! Conversion job configuration

use csvw_graph_format::RdfFormat;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Base IRI used when the schema declares none
pub const DEFAULT_BASE: &str = "https://iisg.amsterdam/";

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Settings for one conversion job
///
/// `workers == 1` runs sequentially; any larger value runs chunks on a
/// worker pool with sequential fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConvertConfig {
    pub workers: usize,
    pub chunk_size: usize,
    pub format: RdfFormat,
    /// Fallback base IRI when the schema's `@base` is missing or empty
    pub base: String,
    /// Name used in the publication graph IRIs; defaults to the schema `url`
    pub dataset_name: Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            format: RdfFormat::default(),
            base: DEFAULT_BASE.to_string(),
            dataset_name: None,
        }
    }
}

impl ConvertConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_format(mut self, format: RdfFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    /// Reject settings that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ConvertError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConvertError::Config(
                "chunk size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether chunks are dispatched to a worker pool
    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::default();
        assert_eq!(config.workers, 4);
        assert_eq!(config.chunk_size, 5000);
        assert_eq!(config.format, RdfFormat::NQuads);
        assert_eq!(config.base, "https://iisg.amsterdam/");
        assert!(config.validate().is_ok());
        assert!(config.is_parallel());
    }

    #[test]
    fn test_zero_workers_or_chunk_size_rejected() {
        let err = ConvertConfig::default().with_workers(0).validate();
        assert!(matches!(err, Err(ConvertError::Config(_))));

        let err = ConvertConfig::default().with_chunk_size(0).validate();
        assert!(matches!(err, Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ConvertConfig =
            serde_json::from_str(r#"{"workers": 1, "format": "turtle"}"#).unwrap();
        assert_eq!(config.workers, 1);
        assert_eq!(config.format, RdfFormat::Turtle);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!config.is_parallel());
    }
}
