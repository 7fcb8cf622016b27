//! Validation and normalization of extracted metrics into [`Stock`] records.
//!
//! Implausible values are reported, never dropped: the upstream page is the
//! source of truth and a suspicious figure is still more useful to a reader
//! than a blank.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{PartialMetricRecord, SecurityId, Stock};

/// Upper bounds above which a metric is flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityBounds {
    pub pbr_max: f64,
    pub per_max: f64,
    pub yield_max: f64,
}

impl Default for PlausibilityBounds {
    fn default() -> Self {
        Self {
            pbr_max: 100.0,
            per_max: 1000.0,
            yield_max: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Pbr,
    Per,
    #[serde(rename = "yield")]
    DividendYield,
}

impl MetricField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pbr => "pbr",
            Self::Per => "per",
            Self::DividendYield => "yield",
        }
    }
}

impl Display for MetricField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric above its plausibility bound. The value is kept in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlausibilityWarning {
    pub field: MetricField,
    pub value: f64,
    pub limit: f64,
}

impl Display for PlausibilityWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} exceeds {}", self.field, self.value, self.limit)
    }
}

pub fn plausibility_warnings(
    stock: &Stock,
    bounds: &PlausibilityBounds,
) -> Vec<PlausibilityWarning> {
    [
        (MetricField::Pbr, stock.pbr, bounds.pbr_max),
        (MetricField::Per, stock.per, bounds.per_max),
        (MetricField::DividendYield, stock.dividend_yield, bounds.yield_max),
    ]
    .into_iter()
    .filter_map(|(field, value, limit)| {
        value
            .filter(|value| *value > limit)
            .map(|value| PlausibilityWarning {
                field,
                value,
                limit,
            })
    })
    .collect()
}

/// Builds the final record for `code`.
///
/// Missing numbers stay absent, the trend defaults to flat and the display
/// name falls back to the code itself.
pub fn validate(
    code: &SecurityId,
    partial: PartialMetricRecord,
    bounds: &PlausibilityBounds,
) -> Stock {
    let name = partial
        .name
        .as_deref()
        .map(|raw| clean_name(raw, code.as_str()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| code.as_str().to_owned());

    let stock = Stock {
        code: code.clone(),
        name,
        pbr: partial.pbr.filter(|value| value.is_finite()),
        per: partial.per.filter(|value| value.is_finite()),
        dividend_yield: partial.dividend_yield.filter(|value| value.is_finite()),
        trend: partial.trend.unwrap_or_default(),
    };

    for warning in plausibility_warnings(&stock, bounds) {
        tracing::warn!(
            code = %stock.code,
            field = %warning.field,
            value = warning.value,
            limit = warning.limit,
            "implausible metric kept"
        );
    }

    stock
}

const BRACKETS: [(&str, &str); 4] = [("【", "】"), ("(", ")"), ("（", "）"), ("[", "]")];
const EDGE_PUNCTUATION: &[char] = &['-', '|', '｜', ':', '：', '/', '／', '・'];

/// Removes the security code and its ticker forms from a page heading.
fn clean_name(raw: &str, code: &str) -> String {
    let ticker = format!("{code}.T");
    let mut cleaned = raw.to_owned();

    for (open, close) in BRACKETS {
        for token in [ticker.as_str(), code] {
            cleaned = cleaned.replace(&format!("{open}{token}{close}"), " ");
        }
    }
    cleaned = cleaned.replace(&ticker, " ");

    let joined = cleaned
        .split_whitespace()
        .filter(|token| *token != code)
        .collect::<Vec<_>>()
        .join(" ");

    joined
        .trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
        .to_owned()
}
