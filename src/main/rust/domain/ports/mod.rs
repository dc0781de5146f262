mod decode_pipeline;
mod metrics_reporter;
mod pipeline_observer;

pub use decode_pipeline::{DecodePipeline, PipelineFactory};
pub use metrics_reporter::MetricsReporter;
pub use pipeline_observer::{NoopObserver, PipelineObserver};
