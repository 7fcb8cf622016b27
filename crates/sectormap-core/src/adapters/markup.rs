//! Markup helpers shared by the adapters.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::data_source::TrendRule;
use crate::extraction::parse_metric;
use crate::{Trend, ValidationError};

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ValidationError> {
    Selector::parse(selector).map_err(|_| ValidationError::InvalidSelector {
        selector: selector.to_owned(),
    })
}

pub(crate) fn parse_selectors(selectors: &[String]) -> Result<Vec<Selector>, ValidationError> {
    selectors.iter().map(|s| parse_selector(s)).collect()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn next_sibling_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Text of the first non-empty element matched by any of `selectors`, tried in order.
pub(crate) fn first_text(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        document
            .select(selector)
            .map(|element| element_text(&element))
            .find(|text| !text.is_empty())
    })
}

/// Direction implied by a change amount such as `+5`, `-12.5` or `▲3`.
///
/// A sign only counts when a digit follows it, so placeholders like `-` or
/// `---` yield `None`.
pub fn trend_from_change(text: &str) -> Option<Trend> {
    let text = text.trim();
    if parse_metric(text) == Some(0.0) {
        return Some(Trend::Flat);
    }

    let mut chars = text.chars();
    let sign = chars.next()?;
    if !chars.as_str().trim_start().starts_with(is_digit) {
        return None;
    }

    match sign {
        '+' | '＋' => Some(Trend::Up),
        '-' | '−' | '－' | '▲' | '▼' => Some(Trend::Down),
        _ => None,
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// Compiled form of a [`TrendRule`].
#[derive(Debug, Clone)]
pub(crate) enum TrendMatcher {
    ChangeSign(Selector),
    ClassMarker { up: Regex, down: Regex },
}

impl TrendMatcher {
    pub(crate) fn compile(rule: &TrendRule) -> Result<Self, ValidationError> {
        match rule {
            TrendRule::ChangeSign { selector } => Ok(Self::ChangeSign(parse_selector(selector)?)),
            TrendRule::ClassMarker { up, down } => Ok(Self::ClassMarker {
                up: class_token_pattern(up)?,
                down: class_token_pattern(down)?,
            }),
        }
    }

    /// Detects the trend in a document. `dom` is reused when the caller has
    /// already parsed the document.
    pub(crate) fn detect(&self, raw: &str, dom: Option<&Html>) -> Option<Trend> {
        match self {
            Self::ChangeSign(selector) => {
                let parsed;
                let dom = match dom {
                    Some(dom) => dom,
                    None => {
                        parsed = Html::parse_document(raw);
                        &parsed
                    }
                };
                dom.select(selector)
                    .map(|element| element_text(&element))
                    .find(|text| !text.is_empty())
                    .and_then(|text| trend_from_change(&text))
            }
            Self::ClassMarker { up, down } => {
                let up_at = up.find(raw).map(|m| m.start());
                let down_at = down.find(raw).map(|m| m.start());
                match (up_at, down_at) {
                    (Some(u), Some(d)) if d < u => Some(Trend::Down),
                    (Some(_), _) => Some(Trend::Up),
                    (None, Some(_)) => Some(Trend::Down),
                    (None, None) => None,
                }
            }
        }
    }
}

/// Matches `token` as a whole class name inside a `class="..."` attribute.
fn class_token_pattern(token: &str) -> Result<Regex, ValidationError> {
    let pattern = format!(
        r#"class\s*=\s*["'](?:[^"']*\s)?{}(?:\s[^"']*)?["']"#,
        regex::escape(token.trim())
    );
    Regex::new(&pattern).map_err(|error| ValidationError::InvalidPattern {
        marker: token.to_owned(),
        reason: error.to_string(),
    })
}
