use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::adapter_for;
use crate::aggregator::Aggregator;
use crate::catalog::Catalog;
use crate::data_source::SourceAdapter;
use crate::fetch_policy::FetchPolicy;
use crate::fetcher::FetchClient;
use crate::http_client::HttpClient;
use crate::snapshot::{MissingValueStyle, SnapshotWriter};
use crate::{CoreError, SourceId, ValidationError};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "public/data.json";

/// Everything one run needs. Unset optional fields fall back to the
/// selected source's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub source: SourceId,
    pub base_url: Option<String>,
    pub output_path: PathBuf,
    /// JSON catalog file; the built-in TSE 33 catalog when unset.
    pub catalog_path: Option<PathBuf>,
    pub missing_values: MissingValueStyle,
    pub min_interval: Option<Duration>,
    pub timeout_ms: Option<u64>,
    pub pretty: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: SourceId::default(),
            base_url: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            catalog_path: None,
            missing_values: MissingValueStyle::default(),
            min_interval: None,
            timeout_ms: None,
            pretty: false,
        }
    }
}

impl PipelineConfig {
    pub fn fetch_policy(&self) -> FetchPolicy {
        let mut policy = FetchPolicy::default_for(self.source);
        if let Some(min_interval) = self.min_interval {
            policy = policy.with_min_interval(min_interval);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            policy = policy.with_timeout_ms(timeout_ms);
        }
        policy
    }

    pub fn catalog(&self) -> Result<Catalog, CoreError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path),
            None => Ok(Catalog::tse33()),
        }
    }

    pub fn adapter(&self) -> Result<Arc<dyn SourceAdapter>, ValidationError> {
        adapter_for(self.source, self.base_url.as_deref())
    }

    pub fn writer(&self) -> SnapshotWriter {
        SnapshotWriter::new(self.output_path.clone())
            .with_style(self.missing_values)
            .with_pretty(self.pretty)
    }

    /// Assembles an aggregator sending its requests through `http`.
    pub fn aggregator(&self, http: Arc<dyn HttpClient>) -> Result<Aggregator, CoreError> {
        let catalog = self.catalog()?;
        let adapter = self.adapter()?;
        let fetcher = FetchClient::new(http, self.fetch_policy());
        Ok(Aggregator::new(catalog, adapter, fetcher))
    }
}
