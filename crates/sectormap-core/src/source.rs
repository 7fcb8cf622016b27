use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upstream sources with a bundled adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    #[default]
    Kabutan,
    Minkabu,
    YahooJapan,
}

impl SourceId {
    pub const ALL: [Self; 3] = [Self::Kabutan, Self::Minkabu, Self::YahooJapan];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kabutan => "kabutan",
            Self::Minkabu => "minkabu",
            Self::YahooJapan => "yahoo_japan",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "kabutan" => Ok(Self::Kabutan),
            "minkabu" => Ok(Self::Minkabu),
            "yahoo_japan" | "yahoo" => Ok(Self::YahooJapan),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_names() {
        assert_eq!("Kabutan".parse::<SourceId>(), Ok(SourceId::Kabutan));
        assert_eq!("yahoo-japan".parse::<SourceId>(), Ok(SourceId::YahooJapan));
        assert!("bloomberg".parse::<SourceId>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for id in SourceId::ALL {
            assert_eq!(id.to_string().parse::<SourceId>(), Ok(id));
        }
    }
}
