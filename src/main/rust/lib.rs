pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::{PipelineRegistry, ReceiverService};
pub use config::Config;
pub use domain::entities::{PipelineLifecycle, PipelineState, StateTransition};
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{
    DecodePipeline, MetricsReporter, NoopObserver, PipelineFactory, PipelineObserver,
};
pub use domain::value_objects::{
    CameraConfig, DecodeMode, PipelineEvent, RenderTarget, Stage, StagePlan, StreamTuning,
};
pub use infrastructure::gstreamer::{
    GstDecodePipeline, GstPipelineFactory, GstTopology, TopologyBuilder,
};
pub use infrastructure::metrics::{serve_metrics, PrometheusReporter};
