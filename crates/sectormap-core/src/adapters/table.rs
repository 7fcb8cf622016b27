use scraper::{ElementRef, Html, Selector};

use super::markup::{
    element_text, first_text, next_sibling_element, parse_selector, parse_selectors,
    trend_from_change, TrendMatcher,
};
use super::PageTemplate;
use crate::data_source::{ExtractionStrategy, LabelMatch, SourceAdapter, TrendRule};
use crate::{RawMetricFields, SecurityId, SourceId, ValidationError};

/// Configuration of a structured-table source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub source: SourceId,
    pub page: PageTemplate,
    /// Name element selectors, tried in order.
    pub name_selectors: Vec<String>,
    pub pbr_labels: Vec<LabelMatch>,
    pub per_labels: Vec<LabelMatch>,
    pub yield_labels: Vec<LabelMatch>,
    /// Labels of the day-change cell used for the trend.
    pub change_labels: Vec<LabelMatch>,
    /// Used when no labelled change cell is found.
    pub trend: TrendRule,
}

impl TableLayout {
    pub fn kabutan() -> Result<Self, ValidationError> {
        Ok(Self {
            source: SourceId::Kabutan,
            page: PageTemplate::new("https://kabutan.jp", "/stock/?code={code}")?,
            name_selectors: vec![
                String::from("#stockinfo_i1 h2"),
                String::from("h2"),
                String::from("h1"),
            ],
            pbr_labels: vec![LabelMatch::contains("PBR")],
            per_labels: vec![
                LabelMatch::exact("PER"),
                LabelMatch::contains("PER ("),
                LabelMatch::contains("PER（"),
            ],
            yield_labels: vec![
                LabelMatch::contains("利回り"),
                LabelMatch::contains("dividend yield"),
            ],
            change_labels: vec![
                LabelMatch::contains("前日比"),
                LabelMatch::exact("Change"),
                LabelMatch::contains("day change"),
            ],
            trend: TrendRule::ChangeSign {
                selector: String::from("td.change, span.change, dd.change"),
            },
        })
    }
}

/// Structured-table adapter: header cell label → adjacent data cell.
///
/// The value of a header is its next sibling `td`. Column-oriented tables,
/// where the header row sits above the data row, fall back to the cell at the
/// same column index in the following row.
#[derive(Debug, Clone)]
pub struct TableAdapter {
    source: SourceId,
    page: PageTemplate,
    header: Selector,
    name_selectors: Vec<Selector>,
    labels: [Vec<LabelMatch>; 4],
    trend: TrendMatcher,
}

const PBR: usize = 0;
const PER: usize = 1;
const YIELD: usize = 2;
const CHANGE: usize = 3;

impl TableAdapter {
    pub fn new(layout: TableLayout) -> Result<Self, ValidationError> {
        Ok(Self {
            source: layout.source,
            page: layout.page,
            header: parse_selector("th")?,
            name_selectors: parse_selectors(&layout.name_selectors)?,
            labels: [
                layout.pbr_labels,
                layout.per_labels,
                layout.yield_labels,
                layout.change_labels,
            ],
            trend: TrendMatcher::compile(&layout.trend)?,
        })
    }

    pub fn kabutan() -> Result<Self, ValidationError> {
        Self::new(TableLayout::kabutan()?)
    }

    fn labelled_values(&self, dom: &Html) -> [Option<String>; 4] {
        let mut values: [Option<String>; 4] = Default::default();

        for header in dom.select(&self.header) {
            let label = element_text(&header);
            if label.is_empty() {
                continue;
            }

            let Some(field) = self.labels.iter().zip(values.iter()).position(|(labels, value)| {
                value.is_none() && labels.iter().any(|rule| rule.matches(&label))
            }) else {
                continue;
            };

            if let Some(value) = value_for(&header) {
                values[field] = Some(value);
            }

            if values.iter().all(Option::is_some) {
                break;
            }
        }

        values
    }
}

impl SourceAdapter for TableAdapter {
    fn id(&self) -> SourceId {
        self.source
    }

    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Table
    }

    fn url_for(&self, security: &SecurityId) -> String {
        self.page.url_for(security)
    }

    fn scan(&self, document: &str) -> RawMetricFields {
        let dom = Html::parse_document(document);
        let mut values = self.labelled_values(&dom);

        let trend = values[CHANGE]
            .as_deref()
            .and_then(trend_from_change)
            .or_else(|| self.trend.detect(document, Some(&dom)));

        RawMetricFields {
            name: first_text(&dom, &self.name_selectors),
            pbr: values[PBR].take(),
            per: values[PER].take(),
            dividend_yield: values[YIELD].take(),
            trend,
        }
    }
}

fn value_for(header: &ElementRef<'_>) -> Option<String> {
    let cell = match next_sibling_element(header) {
        Some(sibling) if sibling.value().name() == "td" => Some(sibling),
        _ => cell_below(header),
    }?;

    let text = element_text(&cell);
    (!text.is_empty()).then_some(text)
}

fn cell_below<'a>(header: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let row = header.parent().and_then(ElementRef::wrap)?;
    let column = child_elements(&row).position(|cell| cell.id() == header.id())?;
    let next = next_row(&row)?;
    child_elements(&next)
        .nth(column)
        .filter(|cell| cell.value().name() == "td")
}

/// Row after `row`, crossing from `thead` into the next table section.
fn next_row<'a>(row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    if let Some(next) = row
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "tr")
    {
        return Some(next);
    }

    let section = row.parent().and_then(ElementRef::wrap)?;
    let next_section = section.next_siblings().find_map(ElementRef::wrap)?;
    child_elements(&next_section).find(|element| element.value().name() == "tr")
}

fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}
