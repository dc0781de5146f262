mod decode_pipeline;
mod topology_builder;

pub use decode_pipeline::{GstDecodePipeline, GstPipelineFactory};
pub use topology_builder::{GstTopology, TopologyBuilder};
