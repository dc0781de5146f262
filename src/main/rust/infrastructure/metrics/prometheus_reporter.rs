use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::domain::ports::MetricsReporter;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref ACTIVE_PIPELINES: IntGauge = IntGauge::new(
        "rig_active_pipelines",
        "Number of live camera receive pipelines"
    ).expect("metric can be created");

    pub static ref PIPELINE_STARTS: IntCounter = IntCounter::new(
        "rig_pipeline_starts_total",
        "Total number of receive pipeline starts"
    ).expect("metric can be created");

    pub static ref PIPELINE_STOPS: IntCounter = IntCounter::new(
        "rig_pipeline_stops_total",
        "Total number of receive pipeline stops, including end of stream"
    ).expect("metric can be created");

    pub static ref TRANSPORT_ERRORS: IntCounter = IntCounter::new(
        "rig_transport_errors_total",
        "Total number of transport errors reported by receive pipelines"
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(ACTIVE_PIPELINES.clone()))?;
        REGISTRY.register(Box::new(PIPELINE_STARTS.clone()))?;
        REGISTRY.register(Box::new(PIPELINE_STOPS.clone()))?;
        REGISTRY.register(Box::new(TRANSPORT_ERRORS.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_pipeline_started(&self, _camera: &str) {
        PIPELINE_STARTS.inc();
    }

    fn report_pipeline_stopped(&self, _camera: &str) {
        PIPELINE_STOPS.inc();
    }

    fn report_transport_error(&self, _camera: &str) {
        TRANSPORT_ERRORS.inc();
    }

    fn report_active_pipelines(&self, count: usize) {
        ACTIVE_PIPELINES.set(count as i64);
    }
}
