use std::time::Duration;

use crate::SourceId;

/// Default user agent, identifying the tool and its purpose to upstream hosts.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "sectormap/",
    env!("CARGO_PKG_VERSION"),
    " (+sector valuation snapshot)"
);

/// Request budget and identity used when talking to one upstream source.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub source: SourceId,
    /// Minimum spacing between two consecutive requests.
    pub min_interval: Duration,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl FetchPolicy {
    pub fn kabutan_default() -> Self {
        Self {
            min_interval: Duration::from_secs(2),
            ..Self::base(SourceId::Kabutan)
        }
    }

    pub fn minkabu_default() -> Self {
        Self::base(SourceId::Minkabu)
    }

    pub fn yahoo_japan_default() -> Self {
        Self::base(SourceId::YahooJapan)
    }

    pub fn default_for(source: SourceId) -> Self {
        match source {
            SourceId::Kabutan => Self::kabutan_default(),
            SourceId::Minkabu => Self::minkabu_default(),
            SourceId::YahooJapan => Self::yahoo_japan_default(),
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn base(source: SourceId) -> Self {
        Self {
            source,
            min_interval: Duration::from_millis(1_500),
            timeout_ms: 10_000,
            user_agent: String::from(DEFAULT_USER_AGENT),
            accept_language: String::from("ja,en;q=0.8"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kabutan_policy_spaces_requests_two_seconds_apart() {
        let policy = FetchPolicy::kabutan_default();

        assert_eq!(policy.source, SourceId::Kabutan);
        assert_eq!(policy.min_interval, Duration::from_secs(2));
        assert_eq!(policy.timeout_ms, 10_000);
    }

    #[test]
    fn other_sources_use_shorter_interval() {
        for source in [SourceId::Minkabu, SourceId::YahooJapan] {
            let policy = FetchPolicy::default_for(source);
            assert_eq!(policy.source, source);
            assert_eq!(policy.min_interval, Duration::from_millis(1_500));
        }
    }

    #[test]
    fn user_agent_names_the_tool() {
        let policy = FetchPolicy::minkabu_default();
        assert!(policy.user_agent.starts_with("sectormap/"));
    }
}
