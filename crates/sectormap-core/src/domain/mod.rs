//! # Domain Models
//!
//! Canonical types shared by every stage of the pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SectorCode`] | Validated 4-character sector identifier |
//! | [`SecurityId`] | Validated security code |
//! | [`Trend`] | Direction of the latest price change |
//! | [`Stock`] | Metric record for one security |
//! | [`Sector`] | Sector with its leader records |
//! | [`Snapshot`] | Complete run output, serialized as a JSON array |
//! | [`RawMetricFields`] | Adapter output before numeric parsing |
//! | [`PartialMetricRecord`] | Extraction output before validation |

mod codes;
mod models;

pub use codes::{SecurityId, SectorCode};
pub use models::{PartialMetricRecord, RawMetricFields, Sector, Snapshot, Stock, Trend};
