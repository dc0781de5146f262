use super::DecodeMode;

/// One processing stage in the receive chain, named by the GStreamer
/// element that implements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NetworkSource,
    JitterBuffer,
    Depayloader,
    Parser,
    HardwareDecoder,
    SoftwareDecoder,
    Convert,
    RenderSink,
}

impl Stage {
    pub fn element_name(&self) -> &'static str {
        match self {
            Stage::NetworkSource => "udpsrc",
            Stage::JitterBuffer => "rtpjitterbuffer",
            Stage::Depayloader => "rtph264depay",
            Stage::Parser => "h264parse",
            Stage::HardwareDecoder => "vtdec_hw",
            Stage::SoftwareDecoder => "avdec_h264",
            Stage::Convert => "videoconvert",
            Stage::RenderSink => "glimagesink",
        }
    }
}

/// The two topology shapes, one per decode mode. Each shape is a fixed
/// stage order; the software shape carries the extra conversion stage
/// because the software decoder does not emit the sink's native format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePlan {
    Hardware,
    Software,
}

impl StagePlan {
    pub fn for_mode(mode: DecodeMode) -> Self {
        match mode {
            DecodeMode::Hardware => StagePlan::Hardware,
            DecodeMode::SoftwareFallback => StagePlan::Software,
        }
    }

    pub fn stages(&self) -> &'static [Stage] {
        match self {
            StagePlan::Hardware => &[
                Stage::NetworkSource,
                Stage::JitterBuffer,
                Stage::Depayloader,
                Stage::Parser,
                Stage::HardwareDecoder,
                Stage::RenderSink,
            ],
            StagePlan::Software => &[
                Stage::NetworkSource,
                Stage::JitterBuffer,
                Stage::Depayloader,
                Stage::Parser,
                Stage::SoftwareDecoder,
                Stage::Convert,
                Stage::RenderSink,
            ],
        }
    }

    pub fn decoder(&self) -> Stage {
        match self {
            StagePlan::Hardware => Stage::HardwareDecoder,
            StagePlan::Software => Stage::SoftwareDecoder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_plan_has_no_conversion_stage() {
        let plan = StagePlan::for_mode(DecodeMode::Hardware);

        assert!(!plan.stages().contains(&Stage::Convert));
        assert!(!plan.stages().contains(&Stage::SoftwareDecoder));
        assert_eq!(plan.decoder(), Stage::HardwareDecoder);
    }

    #[test]
    fn test_software_plan_inserts_conversion_before_sink() {
        let plan = StagePlan::for_mode(DecodeMode::SoftwareFallback);
        let stages = plan.stages();

        let convert = stages.iter().position(|s| *s == Stage::Convert).unwrap();
        let decoder = stages
            .iter()
            .position(|s| *s == Stage::SoftwareDecoder)
            .unwrap();
        let sink = stages.iter().position(|s| *s == Stage::RenderSink).unwrap();

        assert!(decoder < convert);
        assert!(convert < sink);
        assert!(!stages.contains(&Stage::HardwareDecoder));
    }

    #[test]
    fn test_both_plans_start_at_network_source_and_end_at_sink() {
        for plan in [StagePlan::Hardware, StagePlan::Software] {
            let stages = plan.stages();
            assert_eq!(stages.first(), Some(&Stage::NetworkSource));
            assert_eq!(stages.last(), Some(&Stage::RenderSink));
        }
    }

    #[test]
    fn test_front_of_chain_is_shared() {
        let hw = StagePlan::Hardware.stages();
        let sw = StagePlan::Software.stages();

        assert_eq!(hw[..4], sw[..4]);
        assert_eq!(
            hw[..4],
            [
                Stage::NetworkSource,
                Stage::JitterBuffer,
                Stage::Depayloader,
                Stage::Parser,
            ]
        );
    }

    #[test]
    fn test_element_names() {
        assert_eq!(Stage::NetworkSource.element_name(), "udpsrc");
        assert_eq!(Stage::JitterBuffer.element_name(), "rtpjitterbuffer");
        assert_eq!(Stage::HardwareDecoder.element_name(), "vtdec_hw");
        assert_eq!(Stage::SoftwareDecoder.element_name(), "avdec_h264");
    }
}
