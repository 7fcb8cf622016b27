//! Source adapter contract.
//!
//! An adapter knows how to address one upstream page template and how to pull
//! the raw metric tokens out of it. It never touches the network itself: the
//! aggregator fetches `url_for(code)` through the shared fetch client and hands
//! the document to [`SourceAdapter::scan`].
//!
//! | Strategy | Adapter | Lookup |
//! |----------|---------|--------|
//! | [`ExtractionStrategy::Table`] | [`TableAdapter`](crate::adapters::TableAdapter) | header cell label → adjacent data cell |
//! | [`ExtractionStrategy::PatternScan`] | [`PatternScanAdapter`](crate::adapters::PatternScanAdapter) | element + next sibling text → marker → number |
//! | [`ExtractionStrategy::RawText`] | [`RawTextAdapter`](crate::adapters::RawTextAdapter) | `>MARKER … number unit` in raw markup |

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{RawMetricFields, SecurityId, SourceId};

/// How an adapter locates values inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    Table,
    PatternScan,
    RawText,
}

impl ExtractionStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::PatternScan => "pattern_scan",
            Self::RawText => "raw_text",
        }
    }
}

impl Display for ExtractionStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label comparison used by the structured-table adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMatch {
    /// Trimmed cell text equals the label.
    Exact(String),
    /// Cell text contains the label, ignoring case. Covers qualifier
    /// suffixes such as `PBR (forecast)`.
    Contains(String),
}

impl LabelMatch {
    pub fn exact(label: impl Into<String>) -> Self {
        Self::Exact(label.into())
    }

    pub fn contains(label: impl Into<String>) -> Self {
        Self::Contains(label.into())
    }

    pub fn matches(&self, cell_text: &str) -> bool {
        let text = cell_text.trim();
        match self {
            Self::Exact(label) => text == label,
            Self::Contains(label) => text.to_lowercase().contains(&label.to_lowercase()),
        }
    }
}

/// Per-adapter rule deciding the trend direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrendRule {
    /// Sign of the change amount in the element matched by `selector`.
    ChangeSign { selector: String },
    /// Class tokens carried by an element in the raw markup. Which colour
    /// means a gain differs between sources, so both tokens are configured.
    ClassMarker { up: String, down: String },
}

/// Adapter contract for one upstream page template.
///
/// Implementations must be pure: the same document always yields the same
/// fields, and a missing field is `None`, never an error.
pub trait SourceAdapter: Send + Sync {
    fn id(&self) -> SourceId;

    fn strategy(&self) -> ExtractionStrategy;

    /// Page address for `security`.
    fn url_for(&self, security: &SecurityId) -> String;

    /// Raw field tokens found in `document`.
    fn scan(&self, document: &str) -> RawMetricFields;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_label_rejects_qualified_header() {
        let label = LabelMatch::exact("PBR");

        assert!(label.matches(" PBR "));
        assert!(!label.matches("PBR (forecast)"));
    }

    #[test]
    fn loose_label_accepts_qualifier_and_case() {
        let label = LabelMatch::contains("dividend yield");

        assert!(label.matches("Dividend Yield (forecast)"));
        assert!(!label.matches("Dividend"));
    }
}
