use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// One timestamped throughput observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Local wall-clock time the reading was applied.
    pub timestamp: DateTime<Local>,
    pub upload_bytes_per_sec: u64,
    pub download_bytes_per_sec: u64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Local>, upload: u64, download: u64) -> Self {
        Self {
            timestamp,
            upload_bytes_per_sec: upload,
            download_bytes_per_sec: download,
        }
    }

    /// Combined upload + download rate.
    pub fn total(&self) -> u64 {
        self.upload_bytes_per_sec.saturating_add(self.download_bytes_per_sec)
    }

    /// Chart axis label, e.g. `"14:03:27"`.
    pub fn label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Fixed-capacity FIFO of the most recent [`Sample`]s, oldest first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl RollingWindow {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn append(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Owned copy of the window in chronological order.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Most recently appended sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, dropping the oldest samples if it shrank.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}
