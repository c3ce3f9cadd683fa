//! Subsystem Health Monitors
//!
//! Each monitor is a periodic task: run its pluggable self-check, compose
//! a status message, publish to its channel(s), pace, repeat. A failed or
//! timed-out send abandons the iteration; the loop self-heals on the next
//! cycle. The check itself is a strategy collaborator, so the aggregation
//! core stays testable with deterministic fakes.

mod check;
mod monitor;

pub use check::{
    CheckFn, CheckReport, Readings, SimulatedFuelCheck, SimulatedMotorCheck,
    SimulatedVentilationCheck, SubsystemCheck,
};
pub use monitor::{MonitorConfig, SubsystemMonitor};
