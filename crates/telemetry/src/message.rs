//! Status Message and Channel Identity Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three monitored subsystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsystemId {
    Motor,
    Ventilation,
    Fuel,
}

impl SubsystemId {
    /// Short error code prefix used in composed error statuses
    pub fn error_code(&self) -> &'static str {
        match self {
            SubsystemId::Motor => "M01",
            SubsystemId::Ventilation => "V01",
            SubsystemId::Fuel => "F01",
        }
    }

    /// The status channel this subsystem publishes to
    pub fn status_channel(&self) -> ChannelId {
        match self {
            SubsystemId::Motor => ChannelId::MotorStatus,
            SubsystemId::Ventilation => ChannelId::VentilationStatus,
            SubsystemId::Fuel => ChannelId::FuelStatus,
        }
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsystemId::Motor => write!(f, "motor"),
            SubsystemId::Ventilation => write!(f, "ventilation"),
            SubsystemId::Fuel => write!(f, "fuel"),
        }
    }
}

/// Identity of one channel in the aggregation set
///
/// Three status channels (one per subsystem) plus two numeric sample
/// channels fed by the motor monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    MotorStatus,
    VentilationStatus,
    FuelStatus,
    Speed,
    Rpm,
}

impl ChannelId {
    /// Whether the aggregator treats items from this channel as numeric
    /// samples that update the shared status record
    pub fn is_sample_channel(&self) -> bool {
        matches!(self, ChannelId::Speed | ChannelId::Rpm)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::MotorStatus => write!(f, "motor-status"),
            ChannelId::VentilationStatus => write!(f, "ventilation-status"),
            ChannelId::FuelStatus => write!(f, "fuel-status"),
            ChannelId::Speed => write!(f, "speed"),
            ChannelId::Rpm => write!(f, "rpm"),
        }
    }
}

/// One message flowing through a status channel
///
/// A single tagged representation is used on every channel: discrete
/// human-readable statuses ("OK", "ERROR:M01") and numeric samples
/// (speed in km/h, engine rpm) share the same wire type, so the set
/// stays homogeneous and classification happens by origin channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusMessage {
    /// Discrete state tag, e.g. "OK" or "ERROR:<code>"
    Status(String),
    /// Numeric reading (speed or rpm, depending on origin channel)
    Sample(u32),
}

impl StatusMessage {
    /// Compose the positive status for a healthy check
    pub fn ok() -> Self {
        StatusMessage::Status("OK".to_string())
    }

    /// Compose the error status for a failed check
    pub fn error(code: &str) -> Self {
        StatusMessage::Status(format!("ERROR:{code}"))
    }

    /// The numeric payload, if this is a sample
    pub fn as_sample(&self) -> Option<u32> {
        match self {
            StatusMessage::Sample(v) => Some(*v),
            StatusMessage::Status(_) => None,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Status(s) => write!(f, "{s}"),
            StatusMessage::Sample(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_carries_code() {
        let msg = StatusMessage::error(SubsystemId::Fuel.error_code());
        assert_eq!(msg, StatusMessage::Status("ERROR:F01".to_string()));
        assert_eq!(msg.as_sample(), None);
    }

    #[test]
    fn test_sample_channels() {
        assert!(ChannelId::Speed.is_sample_channel());
        assert!(ChannelId::Rpm.is_sample_channel());
        assert!(!ChannelId::MotorStatus.is_sample_channel());
    }

    #[test]
    fn test_subsystem_to_status_channel() {
        assert_eq!(
            SubsystemId::Ventilation.status_channel(),
            ChannelId::VentilationStatus
        );
    }

    #[test]
    fn test_message_serde_roundtrip() {
        let msg = StatusMessage::Sample(2500);
        let json = serde_json::to_string(&msg).unwrap();
        let back: StatusMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
