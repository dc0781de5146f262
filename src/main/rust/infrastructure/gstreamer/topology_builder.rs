use gstreamer as gst;
use gstreamer::prelude::*;

use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::{CameraConfig, DecodeMode, Stage, StagePlan, StreamTuning};

/// A constructed stage chain for one camera. Every element stays in
/// `NULL` until the owning instance starts, so the UDP port is not bound
/// here and construction cannot fail on port conflicts.
pub struct GstTopology {
    pipeline: gst::Pipeline,
    source: gst::Element,
    jitter_buffer: gst::Element,
    sink: gst::Element,
}

impl GstTopology {
    pub fn pipeline(&self) -> &gst::Pipeline {
        &self.pipeline
    }

    pub fn source(&self) -> &gst::Element {
        &self.source
    }

    pub fn jitter_buffer(&self) -> &gst::Element {
        &self.jitter_buffer
    }

    pub fn sink(&self) -> &gst::Element {
        &self.sink
    }
}

pub struct TopologyBuilder;

impl TopologyBuilder {
    /// Allocate and link the stage chain for one camera, in plan order.
    /// The first stage that cannot be created or linked fails the whole
    /// build; no partially linked topology is ever returned.
    pub fn build(
        config: &CameraConfig,
        mode: DecodeMode,
        tuning: &StreamTuning,
    ) -> Result<GstTopology> {
        let plan = StagePlan::for_mode(mode);
        let pipeline = gst::Pipeline::with_name(&format!("recv-{}", config.name()));

        let mut elements: Vec<(Stage, gst::Element)> = Vec::with_capacity(plan.stages().len());
        for stage in plan.stages() {
            let element = Self::make_stage(*stage, config, tuning)?;
            pipeline
                .add(&element)
                .map_err(|_| DomainError::StageUnavailable {
                    stage: stage.element_name(),
                })?;
            elements.push((*stage, element));
        }

        for pair in elements.windows(2) {
            let (upstream_stage, upstream) = &pair[0];
            let (downstream_stage, downstream) = &pair[1];
            upstream
                .link(downstream)
                .map_err(|_| DomainError::LinkFailed {
                    upstream: upstream_stage.element_name(),
                    downstream: downstream_stage.element_name(),
                })?;
        }

        // Plan order puts the source first, the jitter buffer second and
        // the sink last.
        let source = elements[0].1.clone();
        let jitter_buffer = elements[1].1.clone();
        let sink = elements[elements.len() - 1].1.clone();

        Ok(GstTopology {
            pipeline,
            source,
            jitter_buffer,
            sink,
        })
    }

    fn make_stage(stage: Stage, config: &CameraConfig, tuning: &StreamTuning) -> Result<gst::Element> {
        let element_name = stage.element_name();

        if gst::ElementFactory::find(element_name).is_none() {
            return Err(DomainError::StageUnavailable {
                stage: element_name,
            });
        }

        let builder = gst::ElementFactory::make(element_name)
            .name(format!("{}-{}", element_name, config.name()));

        let builder = match stage {
            Stage::NetworkSource => builder
                .property("port", i32::from(config.port()))
                .property("caps", Self::rtp_caps()),
            Stage::JitterBuffer => builder
                .property("latency", tuning.latency_ms())
                .property("drop-on-latency", tuning.drop_on_latency()),
            // Render as frames arrive; clock sync only adds latency on a
            // live feed.
            Stage::RenderSink => builder.property("sync", false),
            _ => builder,
        };

        builder.build().map_err(|_| DomainError::StageUnavailable {
            stage: element_name,
        })
    }

    fn rtp_caps() -> gst::Caps {
        gst::Caps::builder("application/x-rtp")
            .field("media", "video")
            .field("clock-rate", 90000i32)
            .field("encoding-name", "H264")
            .field("payload", 96i32)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtp_caps_describe_h264_video() {
        gstreamer::init().unwrap();

        let caps = TopologyBuilder::rtp_caps().to_string();

        assert!(caps.contains("application/x-rtp"));
        assert!(caps.contains("H264"));
        assert!(caps.contains("90000"));
    }
}
