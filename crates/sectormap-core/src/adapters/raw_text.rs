use regex::Regex;

use super::markup::{collapse_whitespace, TrendMatcher};
use super::PageTemplate;
use crate::data_source::{ExtractionStrategy, SourceAdapter, TrendRule};
use crate::{RawMetricFields, SecurityId, SourceId, ValidationError};

/// Bound on the filler (characters or whole tags) between marker and number.
const MAX_FILLER: usize = 64;

/// Configuration of a raw-text source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTextLayout {
    pub source: SourceId,
    pub page: PageTemplate,
    pub pbr_markers: Vec<String>,
    pub per_markers: Vec<String>,
    pub yield_markers: Vec<String>,
    /// Unit suffixes accepted after ratio values.
    pub ratio_units: Vec<String>,
    /// Unit suffixes accepted after the yield value.
    pub yield_units: Vec<String>,
    pub trend: TrendRule,
}

impl RawTextLayout {
    pub fn yahoo_japan() -> Result<Self, ValidationError> {
        Ok(Self {
            source: SourceId::YahooJapan,
            page: PageTemplate::new("https://finance.yahoo.co.jp", "/quote/{code}.T")?,
            pbr_markers: vec![String::from("PBR")],
            per_markers: vec![String::from("PER")],
            yield_markers: vec![String::from("配当利回り")],
            ratio_units: vec![String::from("倍")],
            yield_units: vec![String::from("%"), String::from("％")],
            trend: TrendRule::ClassMarker {
                up: String::from("price-up"),
                down: String::from("price-down"),
            },
        })
    }
}

/// Regex adapter working on the raw markup.
///
/// Looks for `>MARKER`, then a number, then the field's unit suffix. Tags
/// between those parts are skipped, which keeps the pattern working across
/// markup reshuffles that preserve token order.
#[derive(Debug, Clone)]
pub struct RawTextAdapter {
    source: SourceId,
    page: PageTemplate,
    pbr: Regex,
    per: Regex,
    dividend_yield: Regex,
    heading: Regex,
    tag: Regex,
    trend: TrendMatcher,
}

impl RawTextAdapter {
    pub fn new(layout: RawTextLayout) -> Result<Self, ValidationError> {
        Ok(Self {
            source: layout.source,
            page: layout.page,
            pbr: metric_pattern(&layout.pbr_markers, &layout.ratio_units)?,
            per: metric_pattern(&layout.per_markers, &layout.ratio_units)?,
            dividend_yield: metric_pattern(&layout.yield_markers, &layout.yield_units)?,
            heading: compile("h1", r"(?s)<h1[^>]*>(.*?)</h1>")?,
            tag: compile("tag", r"<[^>]*>")?,
            trend: TrendMatcher::compile(&layout.trend)?,
        })
    }

    pub fn yahoo_japan() -> Result<Self, ValidationError> {
        Self::new(RawTextLayout::yahoo_japan()?)
    }

    fn name(&self, document: &str) -> Option<String> {
        let inner = self.heading.captures(document)?.get(1)?.as_str();
        let text = self.tag.replace_all(inner, " ");
        let name = collapse_whitespace(&decode_entities(&text));
        (!name.is_empty()).then_some(name)
    }
}

impl SourceAdapter for RawTextAdapter {
    fn id(&self) -> SourceId {
        self.source
    }

    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::RawText
    }

    fn url_for(&self, security: &SecurityId) -> String {
        self.page.url_for(security)
    }

    fn scan(&self, document: &str) -> RawMetricFields {
        RawMetricFields {
            name: self.name(document),
            pbr: first_capture(&self.pbr, document),
            per: first_capture(&self.per, document),
            dividend_yield: first_capture(&self.dividend_yield, document),
            trend: self.trend.detect(document, None),
        }
    }
}

fn first_capture(pattern: &Regex, document: &str) -> Option<String> {
    pattern
        .captures(document)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_owned())
}

fn metric_pattern(markers: &[String], units: &[String]) -> Result<Regex, ValidationError> {
    let marker_alternatives = alternatives(markers);
    let unit_alternatives = alternatives(units);
    let unit_chars: String = units
        .iter()
        .filter(|unit| unit.chars().count() == 1)
        .map(|unit| regex::escape(unit))
        .collect();

    let pattern = format!(
        r">\s*(?:{marker_alternatives})(?:[^0-9<{unit_chars}]|<[^>]*>){{0,{MAX_FILLER}}}?([+\-−]?[0-9][0-9,]*(?:\.[0-9]+)?)\s*(?:<[^>]*>\s*){{0,4}}(?:{unit_alternatives})"
    );
    compile(&markers.join("|"), &pattern)
}

fn alternatives(values: &[String]) -> String {
    values
        .iter()
        .map(|value| regex::escape(value.trim()))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(marker: &str, pattern: &str) -> Result<Regex, ValidationError> {
    Regex::new(pattern).map_err(|error| ValidationError::InvalidPattern {
        marker: marker.to_owned(),
        reason: error.to_string(),
    })
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
