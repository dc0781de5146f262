/// Default jitter buffer depth in milliseconds.
const DEFAULT_LATENCY_MS: u32 = 200;

/// Jitter buffer tuning applied to every pipeline at build time. Both
/// knobs remain adjustable on a live pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTuning {
    latency_ms: u32,
    drop_on_latency: bool,
}

impl StreamTuning {
    pub fn with_latency_ms(mut self, latency_ms: u32) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_drop_on_latency(mut self, enabled: bool) -> Self {
        self.drop_on_latency = enabled;
        self
    }

    pub fn latency_ms(&self) -> u32 {
        self.latency_ms
    }

    pub fn drop_on_latency(&self) -> bool {
        self.drop_on_latency
    }
}

impl Default for StreamTuning {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
            drop_on_latency: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let tuning = StreamTuning::default();
        assert_eq!(tuning.latency_ms(), 200);
        assert!(tuning.drop_on_latency());
    }

    #[test]
    fn test_builder_overrides() {
        let tuning = StreamTuning::default()
            .with_latency_ms(50)
            .with_drop_on_latency(false);

        assert_eq!(tuning.latency_ms(), 50);
        assert!(!tuning.drop_on_latency());
    }
}
