use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::domain::errors::Result;
use crate::domain::ports::{DecodePipeline, PipelineFactory, PipelineObserver};
use crate::domain::value_objects::{CameraConfig, DecodeMode, PipelineEvent};

/// How often the dispatch thread pumps engine buses and drains the event
/// channel. Short enough that UI-driven toggles feel immediate.
const EVENT_POLL_INTERVAL_MS: u64 = 25;

type PipelineMap = HashMap<String, Arc<dyn DecodePipeline>>;

/// Name-keyed table of live receive pipelines, enforcing at most one
/// instance per camera name. Explicitly constructed and owned by the
/// application session; dropping it stops everything and joins the
/// dispatch thread, so no background context outlives the session.
///
/// All notifications from every pipeline funnel through one channel into
/// a single consumer loop on the `pipeline-events` thread, which invokes
/// the registered observer.
pub struct PipelineRegistry {
    factory: Box<dyn PipelineFactory>,
    pipelines: Arc<Mutex<PipelineMap>>,
    events: Sender<PipelineEvent>,
    running: Arc<AtomicBool>,
    dispatcher: Option<thread::JoinHandle<()>>,
}

impl PipelineRegistry {
    pub fn new(factory: Box<dyn PipelineFactory>, observer: Arc<dyn PipelineObserver>) -> Self {
        let (events, receiver) = mpsc::channel();
        let pipelines: Arc<Mutex<PipelineMap>> = Arc::new(Mutex::new(HashMap::new()));
        let running = Arc::new(AtomicBool::new(true));

        let dispatcher = {
            let pipelines = Arc::clone(&pipelines);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("pipeline-events".to_string())
                .spawn(move || dispatch_loop(receiver, pipelines, observer, running))
                .expect("event dispatch thread can be spawned")
        };

        Self {
            factory,
            pipelines,
            events,
            running,
            dispatcher: Some(dispatcher),
        }
    }

    /// Build (or rebuild) the pipeline for a camera. An existing instance
    /// under the same name is fully stopped and discarded before the new
    /// one is constructed, inside the same critical section, so no caller
    /// ever observes two live instances or a half-torn-down entry. A
    /// construction failure leaves no entry under that name.
    pub fn acquire(
        &self,
        config: &CameraConfig,
        mode: DecodeMode,
    ) -> Result<Arc<dyn DecodePipeline>> {
        let mut map = lock_map(&self.pipelines);

        if let Some(previous) = map.remove(config.name()) {
            tracing::info!(
                camera = %config.name(),
                instance = %previous.instance_id(),
                "Replacing existing pipeline"
            );
            previous.stop();
        }

        let pipeline = self.factory.create(config, mode, self.events.clone())?;
        map.insert(config.name().to_string(), Arc::clone(&pipeline));

        Ok(pipeline)
    }

    /// Stop and discard one camera's pipeline. Unknown names are a no-op.
    pub fn release(&self, camera_name: &str) {
        let removed = lock_map(&self.pipelines).remove(camera_name);
        if let Some(pipeline) = removed {
            pipeline.stop();
        }
    }

    pub fn is_active(&self, camera_name: &str) -> bool {
        lock_map(&self.pipelines)
            .get(camera_name)
            .map(|p| p.state().is_live())
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        lock_map(&self.pipelines)
            .values()
            .filter(|p| p.state().is_live())
            .count()
    }

    /// Stop and discard every entry. Safe to call repeatedly.
    pub fn release_all(&self) {
        let drained: Vec<(String, Arc<dyn DecodePipeline>)> =
            lock_map(&self.pipelines).drain().collect();
        for (_, pipeline) in drained {
            pipeline.stop();
        }
    }
}

impl Drop for PipelineRegistry {
    fn drop(&mut self) {
        self.release_all();
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.join();
        }
    }
}

fn lock_map(pipelines: &Mutex<PipelineMap>) -> MutexGuard<'_, PipelineMap> {
    pipelines.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single consumer loop: pump every live pipeline's engine messages into
/// the channel, then deliver queued notifications in arrival order. Per
/// pipeline, arrival order matches transition order because instances
/// queue events while holding their own state lock.
fn dispatch_loop(
    receiver: Receiver<PipelineEvent>,
    pipelines: Arc<Mutex<PipelineMap>>,
    observer: Arc<dyn PipelineObserver>,
    running: Arc<AtomicBool>,
) {
    while running.load(Ordering::SeqCst) {
        let snapshot: Vec<Arc<dyn DecodePipeline>> =
            lock_map(&pipelines).values().cloned().collect();
        for pipeline in snapshot {
            pipeline.pump_events();
        }

        while let Ok(event) = receiver.try_recv() {
            deliver(observer.as_ref(), event);
        }

        thread::sleep(Duration::from_millis(EVENT_POLL_INTERVAL_MS));
    }

    // Final drain so notifications queued by a shutdown-time release_all
    // still reach the observer before the thread exits.
    while let Ok(event) = receiver.try_recv() {
        deliver(observer.as_ref(), event);
    }
}

fn deliver(observer: &dyn PipelineObserver, event: PipelineEvent) {
    match event {
        PipelineEvent::Started { camera } => observer.on_started(&camera),
        PipelineEvent::Stopped { camera } => observer.on_stopped(&camera),
        PipelineEvent::Error { camera, message } => observer.on_error(&camera, &message),
    }
}
