//! Car Telemetry Data Model
//!
//! Leaf crate shared by the monitors, the aggregator, and the hub binary.
//! Holds the car status record behind a lock-guarded handle and the tagged
//! message type that flows through every status channel.

mod message;
mod status;

pub use message::{ChannelId, StatusMessage, SubsystemId};
pub use status::{CarStatus, SharedStatus};
