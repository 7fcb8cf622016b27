//! # Sectormap Core
//!
//! Sector valuation snapshots built from third-party stock pages.
//!
//! ## Overview
//!
//! Given a catalog of market sectors and a few leader securities per sector,
//! this crate fetches one page per security from a selected upstream source,
//! extracts PBR, PER, dividend yield and a trend signal, validates the
//! figures, and writes the whole sweep as one JSON document for a display
//! layer. Individual lookups may fail; the snapshot is always complete.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Bundled source adapters (table, pattern scan, raw text) |
//! | [`aggregator`] | Catalog sweep producing a [`Snapshot`] and [`RunReport`] |
//! | [`catalog`] | Sector catalog and the built-in TSE 33 table |
//! | [`config`] | Run configuration |
//! | [`data_source`] | Source adapter trait and extraction strategies |
//! | [`domain`] | Domain models (Stock, Sector, Snapshot) |
//! | [`error`] | Core error types |
//! | [`extraction`] | Adapter output → numbers |
//! | [`fetch_policy`] | Per-source request spacing, timeout and identity |
//! | [`fetcher`] | Rate-limited page fetching |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`snapshot`] | Snapshot rendering and atomic persistence |
//! | [`source`] | Source identifiers |
//! | [`throttling`] | Fixed-interval request gate |
//! | [`validation`] | Plausibility checks and record normalization |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sectormap_core::{PipelineConfig, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let aggregator = config.aggregator(Arc::new(ReqwestHttpClient::new()))?;
//!
//!     let outcome = aggregator.run().await;
//!     config.writer().write(&outcome.snapshot)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Config   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Aggregator    │────▶│ Catalog          │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Fetch Client   │────▶│ Request Gate     │
//! │                 │     │ HTTP Client      │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Source Adapter  │────▶│ Extraction       │
//! │ (trait)         │     │ Validation       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Snapshot Writer │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Per-security failures are values, not errors: a failed fetch becomes
//! [`Stock::unavailable`] and is counted in the [`RunReport`]. Only
//! configuration problems ([`ValidationError`], [`CoreError`]) and a failed
//! write ([`PersistError`]) surface as `Err`.

pub mod adapters;
pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod fetch_policy;
pub mod fetcher;
pub mod http_client;
pub mod snapshot;
pub mod source;
pub mod throttling;
pub mod validation;

// Adapter implementations
pub use adapters::{
    adapter_for, trend_from_change, PageTemplate, PatternScanAdapter, PatternScanLayout,
    RawTextAdapter, RawTextLayout, TableAdapter, TableLayout,
};

// Aggregation
pub use aggregator::{Aggregator, RunOutcome, RunReport};

// Catalog
pub use catalog::{Catalog, CatalogSector, MAX_LEADERS};

// Configuration
pub use config::{PipelineConfig, DEFAULT_OUTPUT_PATH};

// Adapter contract
pub use data_source::{ExtractionStrategy, LabelMatch, SourceAdapter, TrendRule};

// Domain models
pub use domain::{
    PartialMetricRecord, RawMetricFields, Sector, SectorCode, SecurityId, Snapshot, Stock, Trend,
};

// Error types
pub use error::{CoreError, PersistError, ValidationError};

// Extraction
pub use extraction::{extract, parse_metric};

// Fetching
pub use fetch_policy::{FetchPolicy, DEFAULT_USER_AGENT};
pub use fetcher::{FetchClient, FetchFailure};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};

// Snapshot output
pub use snapshot::{render, MissingValueStyle, SnapshotWriter, DASH_PLACEHOLDER};

// Source identifiers
pub use source::SourceId;

// Throttling
pub use throttling::RequestGate;

// Validation
pub use validation::{
    plausibility_warnings, validate, MetricField, PlausibilityBounds, PlausibilityWarning,
};
