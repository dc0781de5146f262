use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::domain::entities::PipelineState;
use crate::domain::errors::Result;
use crate::domain::value_objects::{CameraConfig, DecodeMode, PipelineEvent, RenderTarget};

/// Port for one camera's receive pipeline. Control calls are non-blocking;
/// the resulting notifications arrive later on the registry's dispatch
/// thread via the event channel handed to the factory.
pub trait DecodePipeline: Send + Sync {
    fn camera_name(&self) -> &str;

    fn port(&self) -> u16;

    /// Unique id of this instance, for telling replacements apart.
    fn instance_id(&self) -> &str;

    fn state(&self) -> PipelineState;

    /// Valid from `Ready` or `Paused`; binds the UDP port. On success a
    /// `Started` event is queued. On failure the state is unchanged and
    /// nothing is queued. From any other state this is a silent no-op.
    fn start(&self) -> Result<()>;

    /// Valid from `Playing`; halts frame delivery without releasing
    /// resources. No event. Otherwise a silent no-op.
    fn pause(&self);

    /// Releases every stage and the socket, from any live state. Queues
    /// exactly one `Stopped` event per actual transition; calling it on an
    /// already-`Null` instance does nothing.
    fn stop(&self);

    /// Rebind the render target. May be called at any time; while playing
    /// it takes effect for subsequently decoded frames without a restart.
    fn set_render_target(&self, target: RenderTarget);

    fn set_latency_ms(&self, latency_ms: u32);

    fn set_drop_on_latency(&self, enabled: bool);

    /// Drain pending engine messages, translating them into events: end of
    /// stream tears the pipeline down and queues `Stopped`; decode or
    /// transport faults queue `Error` and leave the pipeline running.
    fn pump_events(&self);
}

/// Port for constructing pipelines. The factory wires each instance to the
/// shared event channel so all notifications funnel into one consumer.
pub trait PipelineFactory: Send + Sync {
    fn create(
        &self,
        config: &CameraConfig,
        mode: DecodeMode,
        events: Sender<PipelineEvent>,
    ) -> Result<Arc<dyn DecodePipeline>>;
}
