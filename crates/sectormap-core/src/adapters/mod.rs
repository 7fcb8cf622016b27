mod markup;
mod pattern_scan;
mod raw_text;
mod table;

use std::sync::Arc;

pub use markup::trend_from_change;
pub use pattern_scan::{PatternScanAdapter, PatternScanLayout};
pub use raw_text::{RawTextAdapter, RawTextLayout};
pub use table::{TableAdapter, TableLayout};

use crate::data_source::SourceAdapter;
use crate::{SecurityId, SourceId, ValidationError};

/// Address template of a per-security page: `base_url` + `path`, where
/// `path` carries a `{code}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    base_url: String,
    path: String,
}

impl PageTemplate {
    pub fn new(
        base_url: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let base_url = validate_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            path: path.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Same path against another host, e.g. a local mirror in tests.
    pub fn with_base_url(self, base_url: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(base_url, self.path)
    }

    pub fn url_for(&self, security: &SecurityId) -> String {
        let code = urlencoding::encode(security.as_str());
        format!("{}{}", self.base_url, self.path.replace("{code}", &code))
    }
}

fn validate_base_url(value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, host)| !host.is_empty());

    if !has_scheme || !has_host {
        return Err(ValidationError::InvalidBaseUrl { value });
    }

    Ok(trimmed.to_owned())
}

/// Builds the bundled adapter for `source`, optionally pointed at another host.
pub fn adapter_for(
    source: SourceId,
    base_url: Option<&str>,
) -> Result<Arc<dyn SourceAdapter>, ValidationError> {
    let adapter: Arc<dyn SourceAdapter> = match source {
        SourceId::Kabutan => {
            let mut layout = TableLayout::kabutan()?;
            if let Some(base_url) = base_url {
                layout.page = layout.page.with_base_url(base_url)?;
            }
            Arc::new(TableAdapter::new(layout)?)
        }
        SourceId::Minkabu => {
            let mut layout = PatternScanLayout::minkabu()?;
            if let Some(base_url) = base_url {
                layout.page = layout.page.with_base_url(base_url)?;
            }
            Arc::new(PatternScanAdapter::new(layout)?)
        }
        SourceId::YahooJapan => {
            let mut layout = RawTextLayout::yahoo_japan()?;
            if let Some(base_url) = base_url {
                layout.page = layout.page.with_base_url(base_url)?;
            }
            Arc::new(RawTextAdapter::new(layout)?)
        }
    };

    Ok(adapter)
}
