use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use pipeline_rtp_receiver::{
    Config, GstPipelineFactory, MetricsReporter, PipelineObserver, PipelineRegistry,
    PrometheusReporter, ReceiverService, serve_metrics,
};

/// Binary-side listener: log every notification and feed the counters.
struct RigObserver {
    metrics: Arc<PrometheusReporter>,
}

impl PipelineObserver for RigObserver {
    fn on_started(&self, camera: &str) {
        info!(camera, "Pipeline started");
        self.metrics.report_pipeline_started(camera);
    }

    fn on_stopped(&self, camera: &str) {
        info!(camera, "Pipeline stopped");
        self.metrics.report_pipeline_stopped(camera);
    }

    fn on_error(&self, camera: &str, message: &str) {
        warn!(camera, "Pipeline error: {}", message);
        self.metrics.report_transport_error(camera);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    info!(
        "Starting pipeline-rtp-receiver v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize GStreamer (infrastructure concern)
    gstreamer::init()?;
    info!("GStreamer initialized");

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    // Start metrics server
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        serve_metrics(metrics_port).await;
    });

    // Create infrastructure implementations (dependency injection)
    let metrics_reporter = Arc::new(PrometheusReporter::new());
    let factory = Box::new(GstPipelineFactory::new(config.stream_tuning()));
    let observer = Arc::new(RigObserver {
        metrics: metrics_reporter.clone(),
    });

    let registry = Arc::new(PipelineRegistry::new(factory, observer));
    let service = ReceiverService::new(registry, metrics_reporter);

    let cameras = config.camera_configs()?;
    let mode = config.decode_mode();

    for camera in &cameras {
        if let Err(e) = service.start_camera(camera, mode) {
            // One bad feed must not take the rest of the rig down.
            error!(camera = %camera.name(), "Failed to start camera: {}", e);
        }
    }

    info!("-------------------------------------------------------");
    info!("Camera Rig Receiver Ready");
    for camera in &cameras {
        info!("   {}  udp://0.0.0.0:{}", camera.name(), camera.port());
    }
    info!("   Decode:  {}", mode.as_str());
    info!("   Source:  {}", config.source_host);
    info!("   Metrics: http://0.0.0.0:{}/metrics", config.metrics_port);
    info!("   Health:  http://0.0.0.0:{}/health", config.metrics_port);
    info!("-------------------------------------------------------");

    // Handle graceful shutdown
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received (Ctrl+C)");

    service.shutdown();

    info!("Receiver stopped gracefully");
    Ok(())
}
