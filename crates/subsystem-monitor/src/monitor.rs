//! Periodic Monitor Loop

use crate::check::{CheckReport, SubsystemCheck};
use serde::{Deserialize, Serialize};
use status_channel::BoundedChannel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use telemetry::{StatusMessage, SubsystemId};
use tokio::time::Duration;
use tracing::{debug, info, warn};

/// Configuration shared by all subsystem monitors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Pacing delay between iterations in milliseconds (default: 1000)
    pub pace_ms: u64,
    /// Timeout for blocking status sends in milliseconds (default: 500)
    pub send_timeout_ms: u64,
    /// Fuel level below which a low-fuel status is reported (liters)
    pub low_fuel_threshold: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pace_ms: 1000,
            send_timeout_ms: 500,
            low_fuel_threshold: 10.0,
        }
    }
}

/// Periodic producer task for one subsystem
///
/// Each iteration walks the same state machine: run the check, compose a
/// status message, send it, publish numeric samples (motor only, healthy
/// only), then pace. A full or timed-out status send abandons the
/// iteration with a warning; there is no retry within the cycle.
pub struct SubsystemMonitor<C: SubsystemCheck> {
    subsystem: SubsystemId,
    check: C,
    config: MonitorConfig,
    status_tx: BoundedChannel<StatusMessage>,
    speed_tx: Option<BoundedChannel<StatusMessage>>,
    rpm_tx: Option<BoundedChannel<StatusMessage>>,
    running: Arc<AtomicBool>,
}

impl<C: SubsystemCheck> SubsystemMonitor<C> {
    /// Create a monitor publishing to a single status channel
    pub fn new(
        subsystem: SubsystemId,
        check: C,
        config: MonitorConfig,
        status_tx: BoundedChannel<StatusMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        info!(
            "Creating {} monitor: pace={}ms, send_timeout={}ms",
            subsystem, config.pace_ms, config.send_timeout_ms
        );
        Self {
            subsystem,
            check,
            config,
            status_tx,
            speed_tx: None,
            rpm_tx: None,
            running,
        }
    }

    /// Attach the numeric sample channels (motor monitor only)
    ///
    /// Samples go out via latest-value-wins sends, so a capacity-1
    /// channel always holds the freshest reading.
    pub fn with_sample_channels(
        mut self,
        speed_tx: BoundedChannel<StatusMessage>,
        rpm_tx: BoundedChannel<StatusMessage>,
    ) -> Self {
        self.speed_tx = Some(speed_tx);
        self.rpm_tx = Some(rpm_tx);
        self
    }

    /// Run the monitor loop until the shared run flag clears
    pub async fn run(&mut self) {
        info!("Starting {} monitor", self.subsystem);

        while self.running.load(Ordering::Relaxed) {
            let report = self.check.check();
            if !report.healthy {
                warn!("{} self-check reported unhealthy", self.subsystem);
            }

            let message = self.compose_status(&report);
            let timeout = Duration::from_millis(self.config.send_timeout_ms);
            match self.status_tx.send(message, timeout).await {
                Ok(()) => {
                    debug!("{} status sent", self.subsystem);
                    if report.healthy {
                        self.publish_samples(&report);
                    }
                }
                Err(err) => {
                    // Iteration abandoned; the next cycle runs a fresh check.
                    warn!("{} status send abandoned: {}", self.subsystem, err);
                }
            }

            tokio::time::sleep(Duration::from_millis(self.config.pace_ms)).await;
        }

        info!("{} monitor stopped", self.subsystem);
    }

    /// Map a check report to the outgoing status message
    fn compose_status(&self, report: &CheckReport) -> StatusMessage {
        if !report.healthy {
            return StatusMessage::error(self.subsystem.error_code());
        }
        match (self.subsystem, report.readings.fuel_level) {
            (SubsystemId::Fuel, Some(level)) if level < self.config.low_fuel_threshold => {
                StatusMessage::Status(format!("LOW FUEL:{level:.1}"))
            }
            (SubsystemId::Fuel, Some(level)) => {
                StatusMessage::Status(format!("FUEL OK:{level:.1}"))
            }
            _ => StatusMessage::ok(),
        }
    }

    fn publish_samples(&self, report: &CheckReport) {
        if let (Some(tx), Some(speed)) = (&self.speed_tx, report.readings.speed) {
            tx.send_latest(StatusMessage::Sample(speed));
        }
        if let (Some(tx), Some(rpm)) = (&self.rpm_tx, report.readings.rpm) {
            tx.send_latest(StatusMessage::Sample(rpm));
        }
    }
}
