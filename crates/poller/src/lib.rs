//! Periodic polling of the monitoring service.
//!
//! One Tokio task per cadence, all registered in a [`TaskRegistry`] so the
//! whole schedule can be torn down at once (config reload, shutdown).

pub mod registry;
pub mod source;

pub use registry::{ScheduledTask, TaskRegistry};
pub use source::{fetch, refresh_endpoints, StatsSource};

use netdash_core::{Endpoint, Message};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shortest period a cadence may use; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Poll results buffered between the tasks and the consumer.
const CHANNEL_CAPACITY: usize = 32;

/// Refresh interval of each periodic endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadences {
    pub live:     Duration,
    pub today:    Duration,
    pub lifetime: Duration,
}

impl Default for Cadences {
    fn default() -> Self {
        Self {
            live:     Duration::from_secs(2),
            today:    Duration::from_secs(30),
            lifetime: Duration::from_secs(60),
        }
    }
}

impl Cadences {
    fn schedule(&self) -> [(Endpoint, Duration); 3] {
        [
            (Endpoint::Live, self.live),
            (Endpoint::Today, self.today),
            (Endpoint::Lifetime, self.lifetime),
        ]
    }
}

/// Running poll schedule. Dropping it cancels every task.
#[derive(Debug)]
pub struct Poller {
    registry: TaskRegistry,
}

impl Poller {
    /// Spawn one background task per cadence and return the channel their
    /// results arrive on, in the order the responses complete.
    ///
    /// Every cadence fires immediately once, then on its period. The channel
    /// closes after [`Poller::cancel_all`] (or drop) has stopped every task.
    pub fn spawn<S: StatsSource>(source: S, cadences: Cadences) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut registry = TaskRegistry::new();

        for (endpoint, period) in cadences.schedule() {
            let period = period.max(MIN_PERIOD);
            let handle = tokio::spawn(run_cadence(source.clone(), endpoint, period, tx.clone()));
            registry.push(ScheduledTask::new(endpoint, period, handle));
        }

        info!(
            "Polling live every {:?}, today every {:?}, lifetime every {:?}",
            cadences.live, cadences.today, cadences.lifetime
        );

        (Self { registry }, rx)
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn is_running(&self) -> bool {
        self.registry.iter().any(|t| !t.is_finished())
    }

    /// Stop every cadence and any request still in flight.
    pub fn cancel_all(&mut self) -> usize {
        self.registry.cancel_all()
    }

    /// Tear the schedule down and start it again against `source` with new
    /// `cadences`. The previous receiver closes once its tasks are gone; the
    /// returned one gets an immediate first poll of every cadence.
    pub fn restart<S: StatsSource>(&mut self, source: S, cadences: Cadences) -> mpsc::Receiver<Message> {
        let stopped = self.cancel_all();
        debug!("Restarting poll schedule ({stopped} task(s) stopped)");
        let (fresh, rx) = Self::spawn(source, cadences);
        *self = fresh;
        rx
    }
}

/// Tick forever, starting one fetch per tick without waiting for the last
/// one, so a slow response never delays the next poll.
async fn run_cadence<S: StatsSource>(
    source: S,
    endpoint: Endpoint,
    period: Duration,
    tx: mpsc::Sender<Message>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if tx.is_closed() {
                    break; // all receivers dropped
                }
                debug!("Polling {endpoint}");
                let source = source.clone();
                let tx = tx.clone();
                in_flight.spawn(async move {
                    let message = fetch(&source, endpoint).await;
                    let _ = tx.send(message).await;
                });
            }
            Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = done {
                    if e.is_panic() {
                        warn!("Poll of {endpoint} panicked: {e}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netdash_core::model::{LiveStats, UsageStats};
    use netdash_core::{DashError, Result};
    use std::future::Future;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Scripted source: live call `n` sleeps `live_delays[n]` and reports
    /// `n` as its upload rate.
    #[derive(Clone, Default)]
    struct FakeSource {
        calls:       Arc<AtomicU64>,
        live_calls:  Arc<AtomicU64>,
        live_delays: Arc<Vec<Duration>>,
        fail_today:  bool,
    }

    impl StatsSource for FakeSource {
        fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<Message>> + Send {
            let this = self.clone();
            async move {
                this.calls.fetch_add(1, Ordering::SeqCst);
                match endpoint {
                    Endpoint::Live => {
                        let seq = this.live_calls.fetch_add(1, Ordering::SeqCst);
                        if let Some(delay) = this.live_delays.get(seq as usize) {
                            time::sleep(*delay).await;
                        }
                        Ok(Message::LiveUpdated(LiveStats {
                            bytes_sent: seq,
                            ..Default::default()
                        }))
                    }
                    Endpoint::Today if this.fail_today => Err(DashError::Api("boom".into())),
                    Endpoint::Today => Ok(Message::TodayUpdated(UsageStats::default())),
                    Endpoint::Lifetime => Ok(Message::LifetimeUpdated(UsageStats::default())),
                    other => Err(DashError::Api(format!("unexpected {other}"))),
                }
            }
        }
    }

    fn slow_others(live: Duration) -> Cadences {
        Cadences {
            live,
            today:    Duration::from_secs(3600),
            lifetime: Duration::from_secs(3600),
        }
    }

    async fn next_live(rx: &mut mpsc::Receiver<Message>) -> u64 {
        loop {
            match rx.recv().await.expect("poller stopped") {
                Message::LiveUpdated(live) => return live.bytes_sent,
                _ => continue,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn every_cadence_fires_immediately() {
        let (_poller, mut rx) = Poller::spawn(FakeSource::default(), Cadences::default());

        let (mut live, mut today, mut lifetime) = (0, 0, 0);
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                Message::LiveUpdated(_)     => live += 1,
                Message::TodayUpdated(_)    => today += 1,
                Message::LifetimeUpdated(_) => lifetime += 1,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!((live, today, lifetime), (1, 1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn live_repeats_on_its_period() {
        let (_poller, mut rx) = Poller::spawn(FakeSource::default(), slow_others(Duration::from_secs(2)));

        let start = time::Instant::now();
        for expected in 0..4 {
            assert_eq!(next_live(&mut rx).await, expected);
        }
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn responses_arrive_in_completion_order() {
        let source = FakeSource {
            live_delays: Arc::new(vec![Duration::from_secs(3), Duration::from_millis(500)]),
            ..Default::default()
        };
        let (_poller, mut rx) = Poller::spawn(source, slow_others(Duration::from_secs(2)));

        // Request 0 is issued first but completes last; neither is dropped.
        assert_eq!(next_live(&mut rx).await, 1);
        assert_eq!(next_live(&mut rx).await, 0);
        assert_eq!(next_live(&mut rx).await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported_not_fatal() {
        let source = FakeSource { fail_today: true, ..Default::default() };
        let cadences = Cadences {
            live:     Duration::from_secs(3600),
            today:    Duration::from_secs(30),
            lifetime: Duration::from_secs(3600),
        };
        let (_poller, mut rx) = Poller::spawn(source, cadences);

        let mut failed = 0;
        while failed < 2 {
            if let Message::PollFailed(Endpoint::Today) = rx.recv().await.unwrap() {
                failed += 1;
            }
        }
        assert_eq!(failed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_leaves_nothing_running() {
        let source = FakeSource::default();
        let calls = source.calls.clone();
        let (mut poller, mut rx) = Poller::spawn(source, slow_others(Duration::from_secs(2)));

        assert_eq!(poller.registry().len(), 3);
        next_live(&mut rx).await;

        assert_eq!(poller.cancel_all(), 3);
        assert!(!poller.is_running());

        // Channel closes once every task (and its in-flight requests) is gone.
        while rx.recv().await.is_some() {}

        let seen = calls.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_schedule() {
        let source = FakeSource::default();
        let live_calls = source.live_calls.clone();
        let (mut poller, mut old_rx) = Poller::spawn(source.clone(), slow_others(Duration::from_secs(2)));
        next_live(&mut old_rx).await;

        let mut rx = poller.restart(source, slow_others(Duration::from_secs(10)));
        assert_eq!(poller.registry().len(), 3);

        // Old channel closes; the new schedule polls right away.
        while old_rx.recv().await.is_some() {}
        assert_eq!(next_live(&mut rx).await, 1);

        // Nothing left on the old 2 s cadence: only the new 10 s one fires.
        time::sleep(Duration::from_secs(9)).await;
        assert_eq!(live_calls.load(Ordering::SeqCst), 2);
        assert_eq!(next_live(&mut rx).await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_poller_closes_the_channel() {
        let (poller, mut rx) = Poller::spawn(FakeSource::default(), Cadences::default());
        drop(poller);
        while rx.recv().await.is_some() {}
    }
}
