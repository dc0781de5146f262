//! In-memory fakes for exercising registry and service orchestration
//! without the media engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::entities::{PipelineLifecycle, PipelineState};
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{DecodePipeline, PipelineFactory, PipelineObserver};
use crate::domain::value_objects::{
    CameraConfig, DecodeMode, PipelineEvent, RenderTarget,
};

/// Poll until `pred` holds, or give up after two seconds.
pub(crate) fn wait_for<F: Fn() -> bool>(pred: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

enum FakeBusMessage {
    Eos,
    TransportError(String),
}

/// Pipeline double that mirrors the real instance's locking and event
/// discipline, with injectable bus messages.
pub(crate) struct FakePipeline {
    name: String,
    port: u16,
    instance_id: String,
    lifecycle: Mutex<PipelineLifecycle>,
    events: Sender<PipelineEvent>,
    pending: Mutex<Vec<FakeBusMessage>>,
    render_target: Mutex<Option<RenderTarget>>,
    fail_start: bool,
}

impl FakePipeline {
    fn new(config: &CameraConfig, events: Sender<PipelineEvent>, fail_start: bool) -> Self {
        Self {
            name: config.name().to_string(),
            port: config.port(),
            instance_id: Uuid::new_v4().to_string(),
            lifecycle: Mutex::new(PipelineLifecycle::new()),
            events,
            pending: Mutex::new(Vec::new()),
            render_target: Mutex::new(None),
            fail_start,
        }
    }

    pub fn inject_transport_error(&self, message: &str) {
        self.pending
            .lock()
            .unwrap()
            .push(FakeBusMessage::TransportError(message.to_string()));
    }

    pub fn inject_eos(&self) {
        self.pending.lock().unwrap().push(FakeBusMessage::Eos);
    }

    pub fn render_target(&self) -> Option<RenderTarget> {
        *self.render_target.lock().unwrap()
    }
}

impl DecodePipeline for FakePipeline {
    fn camera_name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn state(&self) -> PipelineState {
        self.lifecycle.lock().unwrap().current_state()
    }

    fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        if !matches!(
            lifecycle.current_state(),
            PipelineState::Ready | PipelineState::Paused
        ) {
            return Ok(());
        }
        if self.fail_start {
            return Err(DomainError::StartFailed("injected start failure".to_string()));
        }
        lifecycle.begin_playing();
        let _ = self.events.send(PipelineEvent::Started {
            camera: self.name.clone(),
        });
        Ok(())
    }

    fn pause(&self) {
        self.lifecycle.lock().unwrap().begin_paused();
    }

    fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        if !lifecycle.shut_down() {
            return;
        }
        let _ = self.events.send(PipelineEvent::Stopped {
            camera: self.name.clone(),
        });
    }

    fn set_render_target(&self, target: RenderTarget) {
        *self.render_target.lock().unwrap() = Some(target);
    }

    fn set_latency_ms(&self, _latency_ms: u32) {}

    fn set_drop_on_latency(&self, _enabled: bool) {}

    fn pump_events(&self) {
        let drained: Vec<FakeBusMessage> = self.pending.lock().unwrap().drain(..).collect();
        for message in drained {
            match message {
                FakeBusMessage::Eos => self.stop(),
                FakeBusMessage::TransportError(message) => {
                    let _ = self.events.send(PipelineEvent::Error {
                        camera: self.name.clone(),
                        message,
                    });
                }
            }
        }
    }
}

/// Factory double handing out `FakePipeline`s and keeping a side list of
/// everything it created so tests can reach the concrete instances.
pub(crate) struct FakeFactory {
    created: Arc<Mutex<Vec<Arc<FakePipeline>>>>,
    fail_next: Arc<AtomicBool>,
    fail_starts: Arc<AtomicBool>,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self {
            created: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(AtomicBool::new(false)),
            fail_starts: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A second handle over the same underlying state, for moving into
    /// the registry while the test keeps its own.
    pub fn sharing(other: &Arc<FakeFactory>) -> Self {
        Self {
            created: Arc::clone(&other.created),
            fail_next: Arc::clone(&other.fail_next),
            fail_starts: Arc::clone(&other.fail_starts),
        }
    }

    pub fn fail_next_build(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn fail_starts(&self) {
        self.fail_starts.store(true, Ordering::SeqCst);
    }

    pub fn last_created(&self) -> Arc<FakePipeline> {
        Arc::clone(
            self.created
                .lock()
                .unwrap()
                .last()
                .expect("a pipeline was created"),
        )
    }
}

impl PipelineFactory for FakeFactory {
    fn create(
        &self,
        config: &CameraConfig,
        _mode: DecodeMode,
        events: Sender<PipelineEvent>,
    ) -> Result<Arc<dyn DecodePipeline>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DomainError::StageUnavailable { stage: "vtdec_hw" });
        }
        let pipeline = Arc::new(FakePipeline::new(
            config,
            events,
            self.fail_starts.load(Ordering::SeqCst),
        ));
        self.created.lock().unwrap().push(Arc::clone(&pipeline));
        Ok(pipeline)
    }
}

/// Observer that records every callback for later inspection.
#[derive(Default)]
pub(crate) struct RecordingObserver {
    log: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn snapshot(&self) -> Vec<PipelineEvent> {
        self.log.lock().unwrap().clone()
    }

    pub fn started_count(&self, camera: &str) -> usize {
        self.count(|e| matches!(e, PipelineEvent::Started { camera: c } if c == camera))
    }

    pub fn stopped_count(&self, camera: &str) -> usize {
        self.count(|e| matches!(e, PipelineEvent::Stopped { camera: c } if c == camera))
    }

    pub fn error_count(&self, camera: &str) -> usize {
        self.count(|e| matches!(e, PipelineEvent::Error { camera: c, .. } if c == camera))
    }

    fn count<F: Fn(&PipelineEvent) -> bool>(&self, pred: F) -> usize {
        self.log.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_started(&self, camera: &str) {
        self.log.lock().unwrap().push(PipelineEvent::Started {
            camera: camera.to_string(),
        });
    }

    fn on_stopped(&self, camera: &str) {
        self.log.lock().unwrap().push(PipelineEvent::Stopped {
            camera: camera.to_string(),
        });
    }

    fn on_error(&self, camera: &str, message: &str) {
        self.log.lock().unwrap().push(PipelineEvent::Error {
            camera: camera.to_string(),
            message: message.to_string(),
        });
    }
}
