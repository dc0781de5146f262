/// Listener for asynchronous pipeline notifications, invoked on the
/// registry's dispatch thread. Every method has an empty default body, so
/// implementors override only the callbacks they care about.
///
/// An `on_error` does not mean the pipeline stopped; whether repeated
/// errors warrant an explicit stop is the listener's policy decision.
pub trait PipelineObserver: Send + Sync {
    fn on_started(&self, camera: &str) {
        let _ = camera;
    }

    fn on_stopped(&self, camera: &str) {
        let _ = camera;
    }

    fn on_error(&self, camera: &str, message: &str) {
        let _ = (camera, message);
    }
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
