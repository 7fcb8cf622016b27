use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{SecurityId, SectorCode};

/// Direction of the latest price change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric record for one leader security.
///
/// Numeric fields are finite or `None`. `None` means "unknown" and is kept
/// distinct from a legitimate zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub code: SecurityId,
    pub name: String,
    pub pbr: Option<f64>,
    pub per: Option<f64>,
    #[serde(rename = "yield")]
    pub dividend_yield: Option<f64>,
    pub trend: Trend,
}

impl Stock {
    /// Degraded record used when the page for `code` could not be fetched.
    pub fn unavailable(code: SecurityId) -> Self {
        Self {
            name: code.as_str().to_owned(),
            code,
            pbr: None,
            per: None,
            dividend_yield: None,
            trend: Trend::Flat,
        }
    }

    pub fn has_metrics(&self) -> bool {
        self.pbr.is_some() || self.per.is_some() || self.dividend_yield.is_some()
    }
}

/// One catalog sector with the records of its leader securities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub code: SectorCode,
    pub name: String,
    pub stocks: Vec<Stock>,
}

/// Complete output of one pipeline run, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub sectors: Vec<Sector>,
}

impl Snapshot {
    pub fn new(sectors: Vec<Sector>) -> Self {
        Self { sectors }
    }

    pub fn stock_count(&self) -> usize {
        self.sectors.iter().map(|sector| sector.stocks.len()).sum()
    }

    pub fn stocks(&self) -> impl Iterator<Item = &Stock> {
        self.sectors.iter().flat_map(|sector| sector.stocks.iter())
    }
}

/// Raw field tokens as found by a source adapter, before numeric parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetricFields {
    pub name: Option<String>,
    pub pbr: Option<String>,
    pub per: Option<String>,
    pub dividend_yield: Option<String>,
    pub trend: Option<Trend>,
}

/// Extraction result where every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialMetricRecord {
    pub name: Option<String>,
    pub pbr: Option<f64>,
    pub per: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub trend: Option<Trend>,
}

impl PartialMetricRecord {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.pbr.is_none()
            && self.per.is_none()
            && self.dividend_yield.is_none()
            && self.trend.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unavailable_stock_uses_code_as_name() {
        let stock = Stock::unavailable(SecurityId::parse("1928").expect("valid"));

        assert_eq!(stock.name, "1928");
        assert_eq!(stock.trend, Trend::Flat);
        assert!(!stock.has_metrics());
    }

    #[test]
    fn stock_serializes_yield_field_and_nulls() {
        let stock = Stock {
            code: SecurityId::parse("8058").expect("valid"),
            name: String::from("ABC Corp"),
            pbr: Some(1.23),
            per: None,
            dividend_yield: Some(3.1),
            trend: Trend::Up,
        };

        let value = serde_json::to_value(&stock).expect("serializable");
        assert_eq!(
            value,
            json!({
                "code": "8058",
                "name": "ABC Corp",
                "pbr": 1.23,
                "per": null,
                "yield": 3.1,
                "trend": "up"
            })
        );
    }

    #[test]
    fn snapshot_serializes_as_bare_array() {
        let snapshot = Snapshot::new(vec![Sector {
            code: SectorCode::parse("0277").expect("valid"),
            name: String::from("Wholesale"),
            stocks: Vec::new(),
        }]);

        let value = serde_json::to_value(&snapshot).expect("serializable");
        assert_eq!(
            value,
            json!([{ "code": "0277", "name": "Wholesale", "stocks": [] }])
        );
    }
}
