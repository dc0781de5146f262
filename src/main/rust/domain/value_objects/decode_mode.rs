/// Decoding path selection. A pure caller choice; the builder never probes
/// hardware capability itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Platform hardware decoder feeding an overlay-capable sink.
    Hardware,
    /// Software decoder; needs a pixel-format conversion before the sink.
    SoftwareFallback,
}

impl DecodeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeMode::Hardware => "hardware",
            DecodeMode::SoftwareFallback => "software-fallback",
        }
    }
}

impl Default for DecodeMode {
    fn default() -> Self {
        DecodeMode::Hardware
    }
}
