mod pipeline_lifecycle;

pub use pipeline_lifecycle::{PipelineLifecycle, PipelineState, StateTransition};
