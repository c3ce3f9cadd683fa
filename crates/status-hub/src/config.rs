//! Hub Configuration

use serde::{Deserialize, Serialize};
use status_aggregator::AggregatorConfig;
use subsystem_monitor::MonitorConfig;

/// Channel capacities used at bootstrap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Capacity of each subsystem status channel (default: 5)
    pub status_capacity: usize,
    /// Capacity of the speed and rpm sample channels (default: 1)
    ///
    /// Kept at 1 so latest-value-wins publishing makes each channel hold
    /// exactly the freshest reading.
    pub sample_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            status_capacity: 5,
            sample_capacity: 1,
        }
    }
}

/// Top-level configuration for the status hub
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub channels: ChannelConfig,
    pub monitor: MonitorConfig,
    pub aggregator: AggregatorConfig,
}

impl HubConfig {
    /// Load from an optional `hub.toml` plus `HUB_*` environment overrides
    ///
    /// Falls back to compiled-in defaults when neither source exists.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name("hub").required(false))
            .add_source(::config::Environment::with_prefix("HUB").separator("__"))
            .build()?;
        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_capacities() {
        let config = HubConfig::default();
        assert_eq!(config.channels.status_capacity, 5);
        assert_eq!(config.channels.sample_capacity, 1);
        assert_eq!(config.monitor.pace_ms, 1000);
        assert_eq!(config.monitor.low_fuel_threshold, 10.0);
    }
}
