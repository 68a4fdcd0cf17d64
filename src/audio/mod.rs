pub mod capability;
pub mod graph;

pub use capability::{CaptureRecorder, Edge, MixerTopology};
pub use graph::RoutingGraph;
