use std::path::PathBuf;

use clap::Parser;

use crate::domain::value_objects::{CameraConfig, DecodeMode, StreamTuning};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pipeline-rtp-receiver",
    version = "0.1.0",
    about = "Multi-camera RTP/H.264 receive pipelines with shared lifecycle management"
)]
pub struct Config {
    /// Address of the sending device (diagnostics only; streams arrive on
    /// locally bound UDP ports)
    #[arg(long, env = "SOURCE_HOST", default_value = "10.0.0.31")]
    pub source_host: String,

    /// UDP port of the first camera; camera i listens on base-port + 2*i
    #[arg(long, env = "BASE_PORT", default_value = "30000")]
    pub base_port: u16,

    /// Number of cameras on the rig
    #[arg(long, env = "NUM_CAMERAS", default_value = "4")]
    pub num_cameras: u8,

    /// JSON file describing the rig; overrides base-port/num-cameras
    #[arg(long, env = "CAMERA_FILE")]
    pub camera_file: Option<PathBuf>,

    /// Use the software H.264 decoder instead of the platform hardware path
    #[arg(long, env = "SOFTWARE_DECODE")]
    pub software_decode: bool,

    /// Jitter buffer latency in milliseconds
    #[arg(long, env = "JITTER_LATENCY_MS", default_value = "200")]
    pub jitter_latency_ms: u32,

    /// Keep packets that exceed the jitter buffer latency instead of
    /// dropping them
    #[arg(long)]
    pub keep_late_packets: bool,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9003")]
    pub metrics_port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

const MAX_CAMERAS: u8 = 16;

/// Each feed occupies a data + control port pair on the sender, so
/// camera ports advance in steps of two.
const PORT_STRIDE: u16 = 2;

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        Self::validate_port(self.base_port, "base")?;
        Self::validate_port(self.metrics_port, "metrics")?;

        if self.num_cameras == 0 {
            anyhow::bail!("At least one camera is required");
        }

        if self.num_cameras > MAX_CAMERAS {
            anyhow::bail!(
                "Too many cameras: {} (max {})",
                self.num_cameras,
                MAX_CAMERAS
            );
        }

        let top_port = u32::from(self.base_port)
            + u32::from(PORT_STRIDE) * (u32::from(self.num_cameras) - 1);
        if top_port > u32::from(u16::MAX) {
            anyhow::bail!(
                "Camera port range exceeds 65535 (base port {} with {} cameras)",
                self.base_port,
                self.num_cameras
            );
        }

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn decode_mode(&self) -> DecodeMode {
        if self.software_decode {
            DecodeMode::SoftwareFallback
        } else {
            DecodeMode::Hardware
        }
    }

    pub fn stream_tuning(&self) -> StreamTuning {
        StreamTuning::default()
            .with_latency_ms(self.jitter_latency_ms)
            .with_drop_on_latency(!self.keep_late_packets)
    }

    /// Resolve the rig description: an explicit JSON file wins, otherwise
    /// cameras cam0..camN on the fixed port stride.
    pub fn camera_configs(&self) -> anyhow::Result<Vec<CameraConfig>> {
        if let Some(path) = &self.camera_file {
            let contents = std::fs::read_to_string(path)?;
            let cameras: Vec<CameraConfig> = serde_json::from_str(&contents)?;
            for camera in &cameras {
                camera
                    .validate()
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            }
            return Ok(cameras);
        }

        (0..self.num_cameras)
            .map(|i| {
                let port = self.base_port + PORT_STRIDE * u16::from(i);
                CameraConfig::new(u32::from(i), format!("cam{}", i), port)
                    .map(|c| c.with_host(self.source_host.clone()))
                    .map_err(|e| anyhow::anyhow!("{}", e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> Config {
        Config {
            source_host: "10.0.0.31".to_string(),
            base_port: 30000,
            num_cameras: 4,
            camera_file: None,
            software_decode: false,
            jitter_latency_ms: 200,
            keep_late_packets: false,
            metrics_port: 9003,
            verbose: false,
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(create_test_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_base_port() {
        let mut config = create_test_config();
        config.base_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_privileged_metrics_port() {
        let mut config = create_test_config();
        config.metrics_port = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_cameras() {
        let mut config = create_test_config();
        config.num_cameras = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_port_range_overflow() {
        let mut config = create_test_config();
        config.base_port = 65534;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generates_rig_on_port_stride() {
        let config = create_test_config();
        let cameras = config.camera_configs().unwrap();

        assert_eq!(cameras.len(), 4);
        let ports: Vec<u16> = cameras.iter().map(|c| c.port()).collect();
        assert_eq!(ports, vec![30000, 30002, 30004, 30006]);
        assert_eq!(cameras[0].name(), "cam0");
        assert_eq!(cameras[3].name(), "cam3");
        assert!(cameras.iter().all(|c| c.host() == Some("10.0.0.31")));
    }

    #[test]
    fn test_camera_file_overrides_generation() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"id": 0, "name": "front", "port": 31000}},
               {{"id": 1, "name": "rear", "port": 31002, "host": "10.0.0.40"}}]"#
        )
        .unwrap();

        let mut config = create_test_config();
        config.camera_file = Some(file.path().to_path_buf());

        let cameras = config.camera_configs().unwrap();
        assert_eq!(cameras.len(), 2);
        assert_eq!(cameras[0].name(), "front");
        assert_eq!(cameras[1].host(), Some("10.0.0.40"));
    }

    #[test]
    fn test_camera_file_entries_are_validated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"[{{"id": 0, "name": "", "port": 31000}}]"#).unwrap();

        let mut config = create_test_config();
        config.camera_file = Some(file.path().to_path_buf());

        assert!(config.camera_configs().is_err());
    }

    #[test]
    fn test_decode_mode_flag() {
        let mut config = create_test_config();
        assert_eq!(config.decode_mode(), DecodeMode::Hardware);

        config.software_decode = true;
        assert_eq!(config.decode_mode(), DecodeMode::SoftwareFallback);
    }

    #[test]
    fn test_stream_tuning_from_flags() {
        let mut config = create_test_config();
        config.jitter_latency_ms = 80;
        config.keep_late_packets = true;

        let tuning = config.stream_tuning();
        assert_eq!(tuning.latency_ms(), 80);
        assert!(!tuning.drop_on_latency());
    }
}
