//! Extraction engine: runs an adapter over a document and turns its raw
//! tokens into numbers.
//!
//! Numeric post-processing is shared by all adapters. A token that cannot be
//! read as a finite number is treated exactly like a missing field.

use tracing::debug;

use crate::data_source::SourceAdapter;
use crate::{PartialMetricRecord, RawMetricFields};

/// Scans `document` with `adapter` and parses every numeric field.
pub fn extract(adapter: &dyn SourceAdapter, document: &str) -> PartialMetricRecord {
    let fields = adapter.scan(document);
    normalize_fields(fields)
}

pub fn normalize_fields(fields: RawMetricFields) -> PartialMetricRecord {
    PartialMetricRecord {
        name: fields.name.filter(|name| !name.trim().is_empty()),
        pbr: parse_field("pbr", fields.pbr.as_deref()),
        per: parse_field("per", fields.per.as_deref()),
        dividend_yield: parse_field("yield", fields.dividend_yield.as_deref()),
        trend: fields.trend,
    }
}

fn parse_field(field: &'static str, token: Option<&str>) -> Option<f64> {
    let token = token?;
    let value = parse_metric(token);
    if value.is_none() {
        debug!(field, token, "metric token is not numeric");
    }
    value
}

/// Parses a metric token such as `1.10倍`, `3.1%` or `1,234.5倍`.
///
/// Full-width digits and signs are normalized, thousands separators and
/// whitespace removed, and a trailing `倍` or `%` stripped.
pub fn parse_metric(token: &str) -> Option<f64> {
    let mut normalized = String::with_capacity(token.len());
    for ch in token.trim().chars() {
        let mapped = match ch {
            '０'..='９' => char::from_u32(u32::from(ch) - u32::from('０') + u32::from('0'))?,
            '．' => '.',
            '＋' => '+',
            '−' | '－' | '▲' => '-',
            '％' => '%',
            ',' | '，' => continue,
            c if c.is_whitespace() => continue,
            c => c,
        };
        normalized.push(mapped);
    }

    let number = normalized
        .strip_suffix('倍')
        .or_else(|| normalized.strip_suffix('%'))
        .unwrap_or(&normalized);

    if number.is_empty() {
        return None;
    }

    number.parse::<f64>().ok().filter(|value| value.is_finite())
}
