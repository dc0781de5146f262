mod camera_config;
mod decode_mode;
mod pipeline_event;
mod render_target;
mod stage_plan;
mod stream_tuning;

pub use camera_config::CameraConfig;
pub use decode_mode::DecodeMode;
pub use pipeline_event::PipelineEvent;
pub use render_target::RenderTarget;
pub use stage_plan::{Stage, StagePlan};
pub use stream_tuning::StreamTuning;
