use common::Event;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

pub struct HeartbeatScheduler {
    interval: Interval,
    sent: u64,
}

impl HeartbeatScheduler {
    /// First beat fires one full period after start.
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { interval, sent: 0 }
    }

    pub async fn tick(&mut self) -> Event {
        self.interval.tick().await;
        self.sent += 1;

        Event::Heartbeat
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}
