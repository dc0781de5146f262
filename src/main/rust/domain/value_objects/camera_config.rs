use serde::Deserialize;

use crate::domain::errors::{DomainError, Result};

/// Identity of one camera feed: numeric id, diagnostic name, and the UDP
/// port its RTP stream arrives on. Port uniqueness across cameras is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CameraConfig {
    id: u32,
    name: String,
    port: u16,
    #[serde(default)]
    host: Option<String>,
}

impl CameraConfig {
    pub fn new(id: u32, name: impl Into<String>, port: u16) -> Result<Self> {
        let config = Self {
            id,
            name: name.into(),
            port,
            host: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Address of the sending device. Recorded for diagnostics only; the
    /// network source listens, it does not dial.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Pure validation logic (domain concern)
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DomainError::EmptyCameraName);
        }

        let valid_chars = self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid_chars {
            return Err(DomainError::InvalidCameraName(self.name.clone()));
        }

        if self.port == 0 {
            return Err(DomainError::InvalidPort);
        }

        Ok(())
    }
}
