use netdash_core::Endpoint;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle to one periodic poll task.
#[derive(Debug)]
pub struct ScheduledTask {
    endpoint: Endpoint,
    period:   Duration,
    handle:   JoinHandle<()>,
}

impl ScheduledTask {
    pub fn new(endpoint: Endpoint, period: Duration, handle: JoinHandle<()>) -> Self {
        Self { endpoint, period, handle }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    fn cancel(self) {
        debug!("Stopping {} poll (every {:?})", self.endpoint, self.period);
        self.handle.abort();
    }
}

/// Every periodic task the dashboard has running, cancelable as a group.
///
/// Dropping the registry cancels whatever is still registered.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<ScheduledTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: ScheduledTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> + '_ {
        self.tasks.iter()
    }

    /// Abort every registered task, including its in-flight requests.
    /// Returns how many tasks were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.cancel();
        }
        if count > 0 {
            info!("Cancelled {count} poll task(s)");
        }
        count
    }
}

impl Drop for TaskRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
