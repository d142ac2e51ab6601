use std::sync::Mutex;

/// Counters for what a display has drawn.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub meshes: usize,
    pub colorbars: usize,
    pub masked_gates: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_mesh(&self, masked_gates: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.meshes += 1;
            metrics.masked_gates += masked_gates;
        }
    }

    pub fn record_colorbar(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.colorbars += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
