//! Snapshot rendering and persistence.
//!
//! The document is a JSON array of sectors, each with its leader records:
//!
//! ```json
//! [{"code": "0254", "name": "建設業", "stocks": [
//!   {"code": "1928", "name": "積水ハウス", "pbr": 1.1, "per": 12.3, "yield": 2.5, "trend": "up"}
//! ]}]
//! ```
//!
//! Writes go to a temporary file next to the target which is then renamed
//! over it, so readers never observe a half-written document. The renamed
//! file keeps the permissions of the document it replaces; a new document is
//! created world-readable (`0644`).

use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{PersistError, Snapshot, ValidationError};

/// Placeholder written for missing numbers in the legacy display format.
pub const DASH_PLACEHOLDER: &str = "-";

const METRIC_KEYS: [&str; 3] = ["pbr", "per", "yield"];

#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// How missing metrics appear in the written document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MissingValueStyle {
    /// JSON `null`.
    #[default]
    Null,
    /// The string `"-"`, as expected by older display layers.
    Dash,
}

impl MissingValueStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Dash => "dash",
        }
    }
}

impl Display for MissingValueStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingValueStyle {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "dash" | "-" => Ok(Self::Dash),
            other => Err(ValidationError::InvalidMissingValueStyle {
                value: other.to_owned(),
            }),
        }
    }
}

/// Serializes `snapshot` with missing metrics rendered in `style`.
pub fn render(snapshot: &Snapshot, style: MissingValueStyle) -> Result<Value, serde_json::Error> {
    let mut document = serde_json::to_value(snapshot)?;

    if style == MissingValueStyle::Dash {
        let stocks = document
            .as_array_mut()
            .into_iter()
            .flatten()
            .filter_map(|sector| sector.get_mut("stocks").and_then(Value::as_array_mut))
            .flatten();

        for stock in stocks {
            for key in METRIC_KEYS {
                if let Some(value) = stock.get_mut(key).filter(|value| value.is_null()) {
                    *value = Value::String(DASH_PLACEHOLDER.to_owned());
                }
            }
        }
    }

    Ok(document)
}

/// Writes complete snapshots to one path, replacing the previous document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotWriter {
    path: PathBuf,
    style: MissingValueStyle,
    pretty: bool,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            style: MissingValueStyle::default(),
            pretty: false,
        }
    }

    pub fn with_style(mut self, style: MissingValueStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders and persists `snapshot`, returning the written path.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, PersistError> {
        let document = render(snapshot, self.style)?;
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };
        bytes.push(b'\n');

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory).map_err(|source| self.io_error(source))?;

        let mut staged = NamedTempFile::new_in(&directory).map_err(|source| self.io_error(source))?;
        staged
            .write_all(&bytes)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|source| self.io_error(source))?;
        if let Some(permissions) = self.target_permissions() {
            staged
                .as_file()
                .set_permissions(permissions)
                .map_err(|source| self.io_error(source))?;
        }
        staged
            .persist(&self.path)
            .map_err(|error| self.io_error(error.error))?;

        tracing::info!(
            path = %self.path.display(),
            bytes = bytes.len(),
            style = %self.style,
            "snapshot written"
        );

        Ok(self.path.clone())
    }

    /// Mode for the renamed file. Temporary files are created owner-only.
    fn target_permissions(&self) -> Option<std::fs::Permissions> {
        if let Ok(previous) = std::fs::metadata(&self.path) {
            return Some(previous.permissions());
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Some(std::fs::Permissions::from_mode(NEW_FILE_MODE))
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SecurityId, Sector, SectorCode, Stock, Trend};

    fn snapshot() -> Snapshot {
        let code = SecurityId::parse("1928").expect("valid code");
        Snapshot::new(vec![Sector {
            code: SectorCode::parse("0254").expect("valid sector"),
            name: String::from("建設業"),
            stocks: vec![Stock {
                pbr: Some(1.1),
                trend: Trend::Up,
                ..Stock::unavailable(code)
            }],
        }])
    }

    #[test]
    fn null_style_keeps_json_nulls() {
        let document = render(&snapshot(), MissingValueStyle::Null).expect("renders");
        let stock = &document[0]["stocks"][0];

        assert_eq!(stock["pbr"], serde_json::json!(1.1));
        assert!(stock["per"].is_null());
        assert!(stock["yield"].is_null());
        assert_eq!(stock["trend"], "up");
    }

    #[test]
    fn dash_style_replaces_only_missing_metrics() {
        let document = render(&snapshot(), MissingValueStyle::Dash).expect("renders");
        let stock = &document[0]["stocks"][0];

        assert_eq!(stock["pbr"], serde_json::json!(1.1));
        assert_eq!(stock["per"], "-");
        assert_eq!(stock["yield"], "-");
        assert_eq!(stock["name"], "1928");
    }

    #[test]
    fn style_parses_from_flag_values() {
        assert_eq!("dash".parse::<MissingValueStyle>(), Ok(MissingValueStyle::Dash));
        assert_eq!("NULL".parse::<MissingValueStyle>(), Ok(MissingValueStyle::Null));
        assert!("zero".parse::<MissingValueStyle>().is_err());
    }
}
