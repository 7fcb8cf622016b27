use regex::Regex;
use scraper::{Html, Selector};

use super::markup::{
    element_text, first_text, next_sibling_element, parse_selector, parse_selectors, TrendMatcher,
};
use super::PageTemplate;
use crate::data_source::{ExtractionStrategy, SourceAdapter, TrendRule};
use crate::{RawMetricFields, SecurityId, SourceId, ValidationError};

/// Number after a marker. The filler in between may not hold digits, Latin
/// letters or dashes, so `N/A`, `--` and `－` end the search.
const VALUE_AFTER_MARKER: &str =
    r"^[^0-9A-Za-z+\-−－―—‐]{0,24}?([+\-−]?[0-9][0-9,]*(?:\.[0-9]+)?)";

/// Configuration of a label/pattern-scan source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternScanLayout {
    pub source: SourceId,
    pub page: PageTemplate,
    /// Elements whose text, joined with their next sibling's, is scanned.
    pub candidates: String,
    pub name_selectors: Vec<String>,
    pub pbr_markers: Vec<String>,
    pub per_markers: Vec<String>,
    pub yield_markers: Vec<String>,
    pub trend: TrendRule,
}

impl PatternScanLayout {
    pub fn minkabu() -> Result<Self, ValidationError> {
        Ok(Self {
            source: SourceId::Minkabu,
            page: PageTemplate::new("https://minkabu.jp", "/stock/{code}")?,
            candidates: String::from("dt, th, span, li"),
            name_selectors: vec![
                String::from("p.md_stockBoard_stockName"),
                String::from("h1"),
                String::from("h2"),
            ],
            pbr_markers: vec![String::from("PBR")],
            per_markers: vec![String::from("PER")],
            yield_markers: vec![String::from("配当利回り"), String::from("利回り")],
            trend: TrendRule::ClassMarker {
                up: String::from("text-red"),
                down: String::from("text-blue"),
            },
        })
    }
}

/// Label-scan adapter for sources without a stable table layout.
#[derive(Debug, Clone)]
pub struct PatternScanAdapter {
    source: SourceId,
    page: PageTemplate,
    candidates: Selector,
    name_selectors: Vec<Selector>,
    markers: [Vec<String>; 3],
    value: Regex,
    trend: TrendMatcher,
}

impl PatternScanAdapter {
    pub fn new(layout: PatternScanLayout) -> Result<Self, ValidationError> {
        let value = Regex::new(VALUE_AFTER_MARKER).map_err(|error| {
            ValidationError::InvalidPattern {
                marker: String::from("value"),
                reason: error.to_string(),
            }
        })?;

        Ok(Self {
            source: layout.source,
            page: layout.page,
            candidates: parse_selector(&layout.candidates)?,
            name_selectors: parse_selectors(&layout.name_selectors)?,
            markers: [layout.pbr_markers, layout.per_markers, layout.yield_markers],
            value,
            trend: TrendMatcher::compile(&layout.trend)?,
        })
    }

    pub fn minkabu() -> Result<Self, ValidationError> {
        Self::new(PatternScanLayout::minkabu()?)
    }

    /// First number following any of `markers` in `text`, before the next
    /// marker of any field.
    fn value_after(&self, text: &str, markers: &[String]) -> Option<String> {
        markers.iter().find_map(|marker| {
            text.match_indices(marker.as_str()).find_map(|(at, _)| {
                let tail = self.up_to_next_marker(&text[at + marker.len()..]);
                self.value
                    .captures(tail)
                    .and_then(|captures| captures.get(1))
                    .map(|token| token.as_str().to_owned())
            })
        })
    }

    fn up_to_next_marker<'t>(&self, tail: &'t str) -> &'t str {
        let end = self
            .markers
            .iter()
            .flatten()
            .filter_map(|marker| tail.find(marker.as_str()))
            .min()
            .unwrap_or(tail.len());
        &tail[..end]
    }
}

impl SourceAdapter for PatternScanAdapter {
    fn id(&self) -> SourceId {
        self.source
    }

    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::PatternScan
    }

    fn url_for(&self, security: &SecurityId) -> String {
        self.page.url_for(security)
    }

    fn scan(&self, document: &str) -> RawMetricFields {
        let dom = Html::parse_document(document);
        let mut values: [Option<String>; 3] = Default::default();

        for element in dom.select(&self.candidates) {
            let mut text = element_text(&element);
            if let Some(sibling) = next_sibling_element(&element) {
                text.push(' ');
                text.push_str(&element_text(&sibling));
            }

            for (value, markers) in values.iter_mut().zip(&self.markers) {
                if value.is_none() {
                    *value = self.value_after(&text, markers);
                }
            }

            if values.iter().all(Option::is_some) {
                break;
            }
        }

        let [pbr, per, dividend_yield] = values;
        RawMetricFields {
            name: first_text(&dom, &self.name_selectors),
            pbr,
            per,
            dividend_yield,
            trend: self.trend.detect(document, Some(&dom)),
        }
    }
}
