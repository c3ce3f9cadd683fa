//! Car Status Hub Bootstrap
//!
//! Wires the whole system together: five bounded channels (three status,
//! two numeric samples), the channel set, the shared status record, three
//! subsystem monitors, and the single aggregator. All tasks observe one
//! shared run flag, so the hub can be stopped cleanly from tests or a
//! supervisor.

mod config;

pub use config::{ChannelConfig, HubConfig};

use status_aggregator::{Aggregator, LogRenderer};
use status_channel::{BoundedChannel, ChannelSet, SetError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use subsystem_monitor::{
    SimulatedFuelCheck, SimulatedMotorCheck, SimulatedVentilationCheck, SubsystemMonitor,
};
use telemetry::{ChannelId, SharedStatus, SubsystemId};
use tokio::task::JoinHandle;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Handles to a running hub
pub struct Hub {
    status: SharedStatus,
    running: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Hub {
    /// Construct all channels and spawn the monitor and aggregator tasks
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: HubConfig) -> Result<Self, SetError> {
        let status_capacity = config.channels.status_capacity;
        let sample_capacity = config.channels.sample_capacity;

        let motor_status = BoundedChannel::new(status_capacity);
        let ventilation_status = BoundedChannel::new(status_capacity);
        let fuel_status = BoundedChannel::new(status_capacity);
        let speed = BoundedChannel::new(sample_capacity);
        let rpm = BoundedChannel::new(sample_capacity);

        let set = ChannelSet::new(vec![
            (ChannelId::MotorStatus, motor_status.clone()),
            (ChannelId::VentilationStatus, ventilation_status.clone()),
            (ChannelId::FuelStatus, fuel_status.clone()),
            (ChannelId::Speed, speed.clone()),
            (ChannelId::Rpm, rpm.clone()),
        ])?;

        let status = SharedStatus::new();
        let running = Arc::new(AtomicBool::new(true));
        let mut tasks = Vec::new();

        let mut motor = SubsystemMonitor::new(
            SubsystemId::Motor,
            SimulatedMotorCheck::default(),
            config.monitor.clone(),
            motor_status,
            Arc::clone(&running),
        )
        .with_sample_channels(speed, rpm);
        tasks.push(tokio::spawn(async move { motor.run().await }));

        let mut ventilation = SubsystemMonitor::new(
            SubsystemId::Ventilation,
            SimulatedVentilationCheck::default(),
            config.monitor.clone(),
            ventilation_status,
            Arc::clone(&running),
        );
        tasks.push(tokio::spawn(async move { ventilation.run().await }));

        let mut fuel = SubsystemMonitor::new(
            SubsystemId::Fuel,
            SimulatedFuelCheck::default(),
            config.monitor.clone(),
            fuel_status,
            Arc::clone(&running),
        );
        tasks.push(tokio::spawn(async move { fuel.run().await }));

        let mut aggregator = Aggregator::new(
            set,
            status.clone(),
            LogRenderer,
            config.aggregator.clone(),
            Arc::clone(&running),
        );
        tasks.push(tokio::spawn(async move { aggregator.run().await }));

        info!("Status hub running: 3 monitors + aggregator over 5 channels");
        Ok(Self {
            status,
            running,
            tasks,
        })
    }

    /// Handle to the shared car status record
    pub fn status(&self) -> &SharedStatus {
        &self.status
    }

    /// Clear the run flag and wait for every task to finish
    pub async fn shutdown(self) {
        info!("Stopping status hub");
        self.running.store(false, Ordering::Relaxed);
        for task in self.tasks {
            let _ = task.await;
        }
        info!("Status hub stopped");
    }

    /// Wait for all tasks (they run until the flag is cleared elsewhere)
    pub async fn join(self) {
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

/// Initialize the global tracing subscriber
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use status_aggregator::AggregatorConfig;
    use subsystem_monitor::MonitorConfig;
    use tokio::time::Duration;

    fn fast_config() -> HubConfig {
        HubConfig {
            monitor: MonitorConfig {
                pace_ms: 50,
                send_timeout_ms: 20,
                low_fuel_threshold: 10.0,
            },
            aggregator: AggregatorConfig { idle_wait_ms: 20 },
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hub_propagates_motor_samples_end_to_end() {
        let hub = Hub::spawn(fast_config()).unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        let snap = hub.status().snapshot().await;
        assert_ne!(snap.speed, 0, "speed sample should have been aggregated");
        assert_ne!(snap.rpm, 0, "rpm sample should have been aggregated");

        hub.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_every_task() {
        let hub = Hub::spawn(fast_config()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        // Completes only if monitors and aggregator all observe the flag.
        hub.shutdown().await;
    }
}
