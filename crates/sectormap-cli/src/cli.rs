//! CLI argument definitions for sectormap.
//!
//! One invocation performs one full catalog sweep and writes the snapshot.
//!
//! # Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--output` | `SECTORMAP_OUTPUT` | `public/data.json` | Snapshot path |
//! | `--base-url` | `SECTORMAP_BASE_URL` | per source | Upstream host override |
//! | `--source` | | `kabutan` | Upstream source |
//! | `--catalog` | | built-in | Catalog JSON file |
//! | `--missing-values` | | `null` | `null` or `dash` |
//! | `--interval-ms` | | per source | Delay between requests |
//! | `--timeout-ms` | | per source | Request timeout |
//! | `--pretty` | | `false` | Pretty-print JSON |
//! | `--log-level` | | `info` | Log filter, `RUST_LOG` wins |
//!
//! # Examples
//!
//! ```bash
//! # Default sweep against kabutan into public/data.json
//! sectormap
//!
//! # Legacy display format from another source
//! sectormap --source minkabu --missing-values dash --output dist/data.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sectormap_core::{MissingValueStyle, PipelineConfig, SourceId, DEFAULT_OUTPUT_PATH};

/// Sector valuation snapshot builder.
///
/// Fetches PBR, PER, dividend yield and trend for the leader securities of
/// every catalog sector and writes them as one JSON document.
#[derive(Debug, Parser)]
#[command(name = "sectormap", author, version, about = "Sector valuation snapshot builder")]
pub struct Cli {
    /// Snapshot file to write. Parent directories are created.
    #[arg(long, env = "SECTORMAP_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Upstream base URL, e.g. a local mirror.
    #[arg(long, env = "SECTORMAP_BASE_URL")]
    pub base_url: Option<String>,

    /// Upstream source: kabutan, minkabu or yahoo_japan.
    #[arg(long, default_value_t = SourceId::Kabutan)]
    pub source: SourceId,

    /// Catalog JSON file replacing the built-in TSE 33 table.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// How missing metrics are written: null or dash.
    #[arg(long, default_value_t = MissingValueStyle::Null)]
    pub missing_values: MissingValueStyle,

    /// Minimum delay between two requests in milliseconds.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Request timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print the snapshot and the run summary.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source: self.source,
            base_url: self.base_url.clone(),
            output_path: self.output.clone(),
            catalog_path: self.catalog.clone(),
            missing_values: self.missing_values,
            min_interval: self.interval_ms.map(Duration::from_millis),
            timeout_ms: self.timeout_ms,
            pretty: self.pretty,
        }
    }
}
