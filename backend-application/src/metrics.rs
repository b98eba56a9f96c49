use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    batch_requests: AtomicU64,
    batch_lines: AtomicU64,
    events_added: AtomicU64,
    lines_failed: AtomicU64,
    request_errors: AtomicU64,
}

impl Metrics {
    pub fn record_batch(&self, line_count: usize) {
        self.batch_requests.fetch_add(1, Ordering::Relaxed);
        self.batch_lines
            .fetch_add(line_count as u64, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, added: usize, failed: usize) {
        self.events_added.fetch_add(added as u64, Ordering::Relaxed);
        self.lines_failed.fetch_add(failed as u64, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.request_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_added(&self) -> u64 {
        self.events_added.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.batch_requests.load(Ordering::Relaxed);
        let lines = self.batch_lines.load(Ordering::Relaxed);
        let added = self.events_added.load(Ordering::Relaxed);
        let failed = self.lines_failed.load(Ordering::Relaxed);
        let errors = self.request_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE events_batch_requests_total counter\n\
events_batch_requests_total {}\n\
# TYPE events_batch_lines_total counter\n\
events_batch_lines_total {}\n\
# TYPE events_added_total counter\n\
events_added_total {}\n\
# TYPE events_failed_lines_total counter\n\
events_failed_lines_total {}\n\
# TYPE events_request_errors_total counter\n\
events_request_errors_total {}\n",
            requests, lines, added, failed, errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_recorded_counters() {
        let metrics = Metrics::default();
        metrics.record_batch(3);
        metrics.record_outcome(2, 1);
        metrics.record_error();
        let text = metrics.render_prometheus();
        assert!(text.contains("events_batch_requests_total 1\n"));
        assert!(text.contains("events_batch_lines_total 3\n"));
        assert!(text.contains("events_added_total 2\n"));
        assert!(text.contains("events_failed_lines_total 1\n"));
        assert!(text.contains("events_request_errors_total 1\n"));
        assert_eq!(metrics.events_added(), 2);
    }
}
