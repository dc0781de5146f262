use std::sync::Arc;

use pipeline_rtp_receiver::{
    CameraConfig, Config, DecodeMode, DomainError, GstPipelineFactory, NoopObserver,
    PipelineRegistry, PipelineState, PrometheusReporter, Stage, StagePlan, StreamTuning,
    TopologyBuilder,
};

fn create_test_config() -> Config {
    Config {
        source_host: "10.0.0.31".to_string(),
        base_port: 30000,
        num_cameras: 4,
        camera_file: None,
        software_decode: true,
        jitter_latency_ms: 200,
        keep_late_packets: false,
        metrics_port: 9003,
        verbose: false,
    }
}

#[test]
fn test_gstreamer_init() {
    assert!(gstreamer::init().is_ok());
}

#[test]
fn test_config_produces_standard_rig() {
    let config = create_test_config();
    assert!(config.validate().is_ok());

    let cameras = config.camera_configs().unwrap();
    let ports: Vec<u16> = cameras.iter().map(|c| c.port()).collect();
    assert_eq!(ports, vec![30000, 30002, 30004, 30006]);
    assert_eq!(config.decode_mode(), DecodeMode::SoftwareFallback);
}

#[test]
fn test_stage_plans_differ_only_in_decode_tail() {
    let hardware = StagePlan::for_mode(DecodeMode::Hardware);
    let software = StagePlan::for_mode(DecodeMode::SoftwareFallback);

    assert_eq!(hardware.stages()[..4], software.stages()[..4]);
    assert!(software.stages().contains(&Stage::Convert));
    assert!(!hardware.stages().contains(&Stage::Convert));
}

#[test]
fn test_software_topology_construction() {
    gstreamer::init().unwrap();

    let camera = CameraConfig::new(0, "cam0", 35600).unwrap();
    let result = TopologyBuilder::build(
        &camera,
        DecodeMode::SoftwareFallback,
        &StreamTuning::default(),
    );

    match result {
        Ok(_) => {}
        Err(DomainError::StageUnavailable { stage }) => {
            // Plugin availability is environment dependent, but the error
            // must still name a stage from the requested plan.
            let plan = StagePlan::for_mode(DecodeMode::SoftwareFallback);
            assert!(plan.stages().iter().any(|s| s.element_name() == stage));
            eprintln!("Skipping: element {} not available in this environment", stage);
        }
        Err(e) => panic!("unexpected construction error: {e}"),
    }
}

#[test]
fn test_hardware_mode_failure_identifies_stage_and_leaves_no_entry() {
    gstreamer::init().unwrap();

    let registry = PipelineRegistry::new(
        Box::new(GstPipelineFactory::default()),
        Arc::new(NoopObserver),
    );
    let camera = CameraConfig::new(1, "cam-hw", 35604).unwrap();

    match registry.acquire(&camera, DecodeMode::Hardware) {
        Ok(pipeline) => {
            // Hosts with the platform decoder construct fine.
            assert_eq!(pipeline.state(), PipelineState::Ready);
        }
        Err(DomainError::StageUnavailable { stage }) => {
            let plan = StagePlan::for_mode(DecodeMode::Hardware);
            assert!(plan.stages().iter().any(|s| s.element_name() == stage));
            assert!(!registry.is_active("cam-hw"));
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_full_lifecycle_round_trip() {
    gstreamer::init().unwrap();

    let registry = PipelineRegistry::new(
        Box::new(GstPipelineFactory::default()),
        Arc::new(NoopObserver),
    );
    let camera = CameraConfig::new(0, "cam0", 35602).unwrap();

    let pipeline = match registry.acquire(&camera, DecodeMode::SoftwareFallback) {
        Ok(p) => p,
        Err(DomainError::StageUnavailable { stage }) => {
            eprintln!("Skipping: element {} not available in this environment", stage);
            return;
        }
        Err(e) => panic!("unexpected error: {e}"),
    };

    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert!(registry.is_active("cam0"));

    if let Err(e) = pipeline.start() {
        // Render sinks need a display; construction-only coverage is all
        // a headless environment can give us.
        eprintln!("Skipping: pipeline could not start in this environment: {e}");
        return;
    }
    assert_eq!(pipeline.state(), PipelineState::Playing);

    pipeline.pause();
    assert_eq!(pipeline.state(), PipelineState::Paused);

    pipeline.start().unwrap();
    assert_eq!(pipeline.state(), PipelineState::Playing);

    pipeline.stop();
    pipeline.stop();
    assert_eq!(pipeline.state(), PipelineState::Null);
    assert!(!registry.is_active("cam0"));

    // The stop released the socket, so an immediate rebuild on the same
    // port must come up again.
    let again = registry
        .acquire(&camera, DecodeMode::SoftwareFallback)
        .unwrap();
    again.start().unwrap();
    assert_eq!(again.state(), PipelineState::Playing);

    registry.release_all();
    assert_eq!(again.state(), PipelineState::Null);
}

#[test]
fn test_metrics_gather_after_init() {
    let _ = PrometheusReporter::init_metrics();

    let body = String::from_utf8(PrometheusReporter::gather_metrics()).unwrap();
    assert!(body.contains("rig_active_pipelines"));
}
