use std::sync::Mutex;

/// Snapshot of the run counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub completed: usize,
    pub failed: usize,
}

/// Mutex-guarded counters for completed and failed processing runs.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot {
                completed: 0,
                failed: 0,
            }),
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.completed += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or(MetricsSnapshot {
                completed: 0,
                failed: 0,
            })
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_completed();
        recorder.record_completed();
        recorder.record_failure();
        assert_eq!(
            recorder.snapshot(),
            MetricsSnapshot {
                completed: 2,
                failed: 1
            }
        );
    }
}
