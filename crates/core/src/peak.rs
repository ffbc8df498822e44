/// Best-known peak combined (upload + download) throughput for the session.
///
/// Local observations only ever raise the value. A server-reported peak is
/// authoritative and replaces it outright, so a restarted dashboard shows
/// the durable peak instead of whatever it has seen since launch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakTracker {
    value: f64,
}

impl PeakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the peak to `total_bytes_per_sec` if it is higher.
    pub fn observe_local(&mut self, total_bytes_per_sec: f64) {
        if total_bytes_per_sec > self.value {
            self.value = total_bytes_per_sec;
        }
    }

    /// Adopt the server's peak when one was reported, even if lower.
    pub fn reconcile(&mut self, server_peak: Option<f64>) {
        if let Some(peak) = server_peak.filter(|p| p.is_finite()) {
            self.value = peak;
        }
    }

    /// Current peak in bytes/second.
    pub fn value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(PeakTracker::new().value(), 0.0);
    }

    #[test]
    fn local_observations_are_monotone() {
        let mut peak = PeakTracker::new();
        peak.observe_local(500.0);
        peak.observe_local(300.0);
        assert_eq!(peak.value(), 500.0);
    }

    #[test]
    fn server_value_overrides_even_downward() {
        let mut peak = PeakTracker::new();
        peak.observe_local(500.0);
        peak.observe_local(300.0);
        peak.reconcile(Some(200.0));
        assert_eq!(peak.value(), 200.0);

        // Local monotonicity resumes from the server figure.
        peak.observe_local(250.0);
        assert_eq!(peak.value(), 250.0);
    }

    #[test]
    fn absent_server_value_changes_nothing() {
        let mut peak = PeakTracker::new();
        peak.observe_local(800.0);
        peak.reconcile(None);
        peak.reconcile(Some(f64::NAN));
        assert_eq!(peak.value(), 800.0);
    }
}
