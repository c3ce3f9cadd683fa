//! Aggregator Task Loop

use crate::render::StatusRenderer;
use serde::{Deserialize, Serialize};
use status_channel::ChannelSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use telemetry::{CarStatus, ChannelId, SharedStatus, StatusMessage};
use tokio::time::Duration;
use tracing::{debug, info, warn};

/// Aggregator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Idle wait on the channel set in milliseconds (default: 200)
    ///
    /// Bounds how long the loop suspends with nothing ready, which is
    /// also how promptly the run flag is observed.
    pub idle_wait_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self { idle_wait_ms: 200 }
    }
}

/// Single consumer of every status channel
///
/// The loop suspends on the set with the status lock released. Once a
/// member is ready it takes the lock, drains every currently-ready
/// channel with zero-timeout waits and non-blocking receives, then
/// releases. Holding the lock across the whole drain pass keeps the
/// visible record consistent for a batch of samples arriving in the same
/// waking; an idle timeout never takes the lock at all.
pub struct Aggregator<R: StatusRenderer> {
    set: ChannelSet<ChannelId, StatusMessage>,
    status: SharedStatus,
    renderer: R,
    config: AggregatorConfig,
    running: Arc<AtomicBool>,
}

impl<R: StatusRenderer> Aggregator<R> {
    pub fn new(
        set: ChannelSet<ChannelId, StatusMessage>,
        status: SharedStatus,
        renderer: R,
        config: AggregatorConfig,
        running: Arc<AtomicBool>,
    ) -> Self {
        info!(
            "Creating aggregator over {} channels, idle_wait={}ms",
            set.len(),
            config.idle_wait_ms
        );
        Self {
            set,
            status,
            renderer,
            config,
            running,
        }
    }

    /// Run the aggregation loop until the shared run flag clears
    pub async fn run(&mut self) {
        info!("Starting aggregator");
        let status = self.status.clone();
        let idle_wait = Duration::from_millis(self.config.idle_wait_ms);

        while self.running.load(Ordering::Relaxed) {
            let Some(first) = self.set.wait_any(idle_wait).await else {
                continue;
            };

            let mut record = status.lock().await;
            let mut ready = Some(first);
            let mut drained = 0usize;
            while let Some(id) = ready {
                if let Some(message) = self.set.channel(id).and_then(|c| c.try_recv()) {
                    self.dispatch(id, message, &mut record);
                    drained += 1;
                }
                ready = self.set.wait_any(Duration::ZERO).await;
            }
            debug!("Drain pass consumed {} messages", drained);
        }

        info!("Aggregator stopped");
    }

    /// Route one drained item by its origin channel
    fn dispatch(&mut self, origin: ChannelId, message: StatusMessage, record: &mut CarStatus) {
        match (origin, &message) {
            (ChannelId::Speed, StatusMessage::Sample(value)) => {
                debug!("Speed sample: {} km/h", value);
                record.speed = *value;
            }
            (ChannelId::Rpm, StatusMessage::Sample(value)) => {
                debug!("Rpm sample: {}", value);
                record.rpm = *value;
            }
            _ if origin.is_sample_channel() => {
                warn!("Dropping non-numeric message on {} channel", origin);
            }
            _ => self.renderer.render(origin, &message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use status_channel::BoundedChannel;
    use tokio::time::timeout;

    struct Harness {
        motor: BoundedChannel<StatusMessage>,
        ventilation: BoundedChannel<StatusMessage>,
        fuel: BoundedChannel<StatusMessage>,
        speed: BoundedChannel<StatusMessage>,
        rpm: BoundedChannel<StatusMessage>,
        status: SharedStatus,
        recorder: RecordingRenderer,
        running: Arc<AtomicBool>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn spawn_harness() -> Harness {
        let motor = BoundedChannel::new(5);
        let ventilation = BoundedChannel::new(5);
        let fuel = BoundedChannel::new(5);
        let speed = BoundedChannel::new(1);
        let rpm = BoundedChannel::new(1);

        let set = ChannelSet::new(vec![
            (ChannelId::MotorStatus, motor.clone()),
            (ChannelId::VentilationStatus, ventilation.clone()),
            (ChannelId::FuelStatus, fuel.clone()),
            (ChannelId::Speed, speed.clone()),
            (ChannelId::Rpm, rpm.clone()),
        ])
        .unwrap();

        let status = SharedStatus::new();
        let recorder = RecordingRenderer::new();
        let running = Arc::new(AtomicBool::new(true));

        let mut aggregator = Aggregator::new(
            set,
            status.clone(),
            recorder.clone(),
            AggregatorConfig { idle_wait_ms: 50 },
            Arc::clone(&running),
        );
        let handle = tokio::spawn(async move { aggregator.run().await });

        Harness {
            motor,
            ventilation,
            fuel,
            speed,
            rpm,
            status,
            recorder,
            running,
            handle,
        }
    }

    async fn stop(harness: Harness) {
        harness.running.store(false, Ordering::Relaxed);
        harness.handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_motor_cycle_updates_status_and_renders_once() {
        let harness = spawn_harness();

        harness.motor.try_send(StatusMessage::ok()).unwrap();
        harness.speed.send_latest(StatusMessage::Sample(90));
        harness.rpm.send_latest(StatusMessage::Sample(2500));

        tokio::time::sleep(Duration::from_millis(100)).await;

        let snap = harness.status.snapshot().await;
        assert_eq!(snap.speed, 90);
        assert_eq!(snap.rpm, 2500);

        let rendered = harness.recorder.rendered();
        assert_eq!(
            rendered,
            vec![(ChannelId::MotorStatus, StatusMessage::ok())]
        );

        stop(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_message_observed_exactly_once() {
        let harness = spawn_harness();

        for i in 0..5 {
            harness
                .motor
                .try_send(StatusMessage::Status(format!("M{i}")))
                .unwrap();
            harness
                .ventilation
                .try_send(StatusMessage::Status(format!("V{i}")))
                .unwrap();
            harness
                .fuel
                .try_send(StatusMessage::Status(format!("F{i}")))
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(200)).await;

        let rendered = harness.recorder.rendered();
        assert_eq!(rendered.len(), 15);
        for i in 0..5 {
            for tag in ["M", "V", "F"] {
                let expected = StatusMessage::Status(format!("{tag}{i}"));
                let count = rendered.iter().filter(|(_, m)| *m == expected).count();
                assert_eq!(count, 1, "{tag}{i} observed {count} times");
            }
        }

        stop(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_channel_fifo_order_preserved() {
        let harness = spawn_harness();

        for i in 0..5 {
            harness
                .fuel
                .try_send(StatusMessage::Status(format!("F{i}")))
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(100)).await;

        let fuel_order: Vec<_> = harness
            .recorder
            .rendered()
            .into_iter()
            .filter(|(origin, _)| *origin == ChannelId::FuelStatus)
            .map(|(_, m)| m)
            .collect();
        let expected: Vec<_> = (0..5)
            .map(|i| StatusMessage::Status(format!("F{i}")))
            .collect();
        assert_eq!(fuel_order, expected);

        stop(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_released_while_idle() {
        let harness = spawn_harness();

        // Let the aggregator settle into its idle wait, then take the
        // lock from outside; this hangs if the loop idles lock-held.
        tokio::time::sleep(Duration::from_millis(75)).await;
        let snap = timeout(Duration::from_millis(500), harness.status.snapshot())
            .await
            .expect("status lock must be free while the aggregator idles");
        assert_eq!(snap, CarStatus::default());

        stop(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_sample_wins_on_capacity_one_channel() {
        let harness = spawn_harness();

        // Two sends in the same cycle; the first is displaced unread.
        harness.speed.send_latest(StatusMessage::Sample(80));
        harness.speed.send_latest(StatusMessage::Sample(120));

        tokio::time::sleep(Duration::from_millis(100)).await;

        let snap = harness.status.snapshot().await;
        assert_eq!(snap.speed, 120);

        stop(harness).await;
    }
}
