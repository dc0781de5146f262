use std::sync::Arc;

use crate::application::services::PipelineRegistry;
use crate::domain::errors::Result;
use crate::domain::ports::{DecodePipeline, MetricsReporter};
use crate::domain::value_objects::{CameraConfig, DecodeMode};

/// Application service orchestrating rig-level operations
pub struct ReceiverService {
    registry: Arc<PipelineRegistry>,
    metrics: Arc<dyn MetricsReporter>,
}

impl ReceiverService {
    pub fn new(registry: Arc<PipelineRegistry>, metrics: Arc<dyn MetricsReporter>) -> Self {
        Self { registry, metrics }
    }

    /// Bring one camera feed up (use case). A start failure leaves the
    /// freshly built instance registered in `Ready`; retrying is the
    /// caller's call.
    pub fn start_camera(
        &self,
        config: &CameraConfig,
        mode: DecodeMode,
    ) -> Result<Arc<dyn DecodePipeline>> {
        config.validate()?;

        let pipeline = self.registry.acquire(config, mode)?;
        pipeline.start()?;

        self.metrics
            .report_active_pipelines(self.registry.active_count());

        tracing::info!(
            camera = %config.name(),
            port = config.port(),
            mode = mode.as_str(),
            instance = %pipeline.instance_id(),
            "Receive pipeline started"
        );

        Ok(pipeline)
    }

    /// Stop and discard one camera feed.
    pub fn stop_camera(&self, camera_name: &str) {
        self.registry.release(camera_name);
        self.metrics
            .report_active_pipelines(self.registry.active_count());

        tracing::info!(camera = camera_name, "Receive pipeline released");
    }

    pub fn is_receiving(&self, camera_name: &str) -> bool {
        self.registry.is_active(camera_name)
    }

    /// Stop every feed. Invoked at application shutdown.
    pub fn shutdown(&self) {
        tracing::info!("Stopping all receive pipelines");
        self.registry.release_all();
        self.metrics.report_active_pipelines(0);
    }
}
