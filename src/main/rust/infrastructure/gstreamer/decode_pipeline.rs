use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_video::prelude::*;
use uuid::Uuid;

use super::{GstTopology, TopologyBuilder};
use crate::domain::entities::{PipelineLifecycle, PipelineState};
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{DecodePipeline, PipelineFactory};
use crate::domain::value_objects::{
    CameraConfig, DecodeMode, PipelineEvent, RenderTarget, StreamTuning,
};

/// One camera's receive pipeline wrapping a constructed topology.
///
/// Control calls serialize on the lifecycle lock, and events are queued
/// to the shared channel while that lock is held, so the order the
/// observer sees always matches the order transitions actually happened:
/// a `Started` from a superseded start can never trail the `Stopped` that
/// superseded it.
pub struct GstDecodePipeline {
    camera_name: String,
    port: u16,
    instance_id: String,
    lifecycle: Mutex<PipelineLifecycle>,
    topology: GstTopology,
    bus: gst::Bus,
    events: Sender<PipelineEvent>,
}

impl GstDecodePipeline {
    pub fn from_topology(
        config: &CameraConfig,
        topology: GstTopology,
        events: Sender<PipelineEvent>,
    ) -> Result<Self> {
        let bus = topology.pipeline().bus().ok_or(DomainError::BusUnavailable)?;

        Ok(Self {
            camera_name: config.name().to_string(),
            port: config.port(),
            instance_id: Uuid::new_v4().to_string(),
            lifecycle: Mutex::new(PipelineLifecycle::new()),
            topology,
            bus,
            events,
        })
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, PipelineLifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue_event(&self, event: PipelineEvent) {
        // The receiver disappears once the registry shuts down; a send
        // failure then has no one left to notify.
        let _ = self.events.send(event);
    }
}

impl DecodePipeline for GstDecodePipeline {
    fn camera_name(&self) -> &str {
        &self.camera_name
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn state(&self) -> PipelineState {
        self.lock_lifecycle().current_state()
    }

    fn start(&self) -> Result<()> {
        let mut lifecycle = self.lock_lifecycle();
        if !matches!(
            lifecycle.current_state(),
            PipelineState::Ready | PipelineState::Paused
        ) {
            return Ok(());
        }

        match self.topology.pipeline().set_state(gst::State::Playing) {
            Ok(_) => {
                lifecycle.begin_playing();
                self.queue_event(PipelineEvent::Started {
                    camera: self.camera_name.clone(),
                });
                Ok(())
            }
            Err(_) => {
                // Roll the engine back so a failed bind does not keep the
                // socket; the lifecycle state is untouched.
                let _ = self.topology.pipeline().set_state(gst::State::Null);
                Err(DomainError::StartFailed(format!(
                    "camera {} could not enter PLAYING on port {}",
                    self.camera_name, self.port
                )))
            }
        }
    }

    fn pause(&self) {
        let mut lifecycle = self.lock_lifecycle();
        if !lifecycle.current_state().is_playing() {
            return;
        }
        if self
            .topology
            .pipeline()
            .set_state(gst::State::Paused)
            .is_ok()
        {
            lifecycle.begin_paused();
        }
    }

    fn stop(&self) {
        let mut lifecycle = self.lock_lifecycle();
        if !lifecycle.shut_down() {
            return;
        }
        let _ = self.topology.pipeline().set_state(gst::State::Null);
        self.queue_event(PipelineEvent::Stopped {
            camera: self.camera_name.clone(),
        });
    }

    fn set_render_target(&self, target: RenderTarget) {
        match self
            .topology
            .sink()
            .dynamic_cast_ref::<gstreamer_video::VideoOverlay>()
        {
            Some(overlay) => unsafe { overlay.set_window_handle(target.as_raw()) },
            None => tracing::warn!(
                camera = %self.camera_name,
                "Render sink does not support window-handle binding"
            ),
        }
    }

    fn set_latency_ms(&self, latency_ms: u32) {
        self.topology
            .jitter_buffer()
            .set_property("latency", latency_ms);
    }

    fn set_drop_on_latency(&self, enabled: bool) {
        self.topology
            .jitter_buffer()
            .set_property("drop-on-latency", enabled);
    }

    fn pump_events(&self) {
        while let Some(msg) = self.bus.pop() {
            match msg.view() {
                gst::MessageView::Eos(_) => {
                    tracing::info!(camera = %self.camera_name, "End of stream");
                    self.stop();
                }
                gst::MessageView::Error(err) => {
                    let message = format!("{} ({:?})", err.error(), err.debug());
                    tracing::warn!(
                        camera = %self.camera_name,
                        "Transport error: {}",
                        message
                    );
                    self.queue_event(PipelineEvent::Error {
                        camera: self.camera_name.clone(),
                        message,
                    });
                }
                gst::MessageView::Warning(warn) => {
                    tracing::warn!(
                        camera = %self.camera_name,
                        "Warning from {:?}: {} ({:?})",
                        warn.src().map(|s| s.path_string()),
                        warn.error(),
                        warn.debug()
                    );
                }
                gst::MessageView::StateChanged(state_changed) => {
                    if state_changed
                        .src()
                        .map(|s| s == self.topology.pipeline())
                        .unwrap_or(false)
                    {
                        tracing::debug!(
                            camera = %self.camera_name,
                            "Pipeline state changed from {:?} to {:?}",
                            state_changed.old(),
                            state_changed.current()
                        );
                    }
                }
                _ => {}
            }
        }
    }
}

impl Drop for GstDecodePipeline {
    fn drop(&mut self) {
        let _ = self.topology.pipeline().set_state(gst::State::Null);
    }
}

/// Factory wiring freshly built topologies into pipeline instances.
pub struct GstPipelineFactory {
    tuning: StreamTuning,
}

impl GstPipelineFactory {
    pub fn new(tuning: StreamTuning) -> Self {
        Self { tuning }
    }
}

impl Default for GstPipelineFactory {
    fn default() -> Self {
        Self::new(StreamTuning::default())
    }
}

impl PipelineFactory for GstPipelineFactory {
    fn create(
        &self,
        config: &CameraConfig,
        mode: DecodeMode,
        events: Sender<PipelineEvent>,
    ) -> Result<Arc<dyn DecodePipeline>> {
        let topology = TopologyBuilder::build(config, mode, &self.tuning)?;

        tracing::debug!(
            camera = %config.name(),
            port = config.port(),
            mode = mode.as_str(),
            "Constructed receive topology"
        );

        let pipeline = GstDecodePipeline::from_topology(config, topology, events)?;
        Ok(Arc::new(pipeline))
    }
}
