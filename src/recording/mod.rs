//! Local conversation recording
//!
//! This module turns the stream of raw segments captured from the routing
//! graph's sink into a single downloadable artifact:
//! - Container selection for the "audio" media kind
//! - Duration fix-up for containers streamed incrementally
//! - Segment buffering and once-per-cycle finalization

pub mod container;
pub mod session;

pub use container::{container_for, fix_riff_sizes, Container, ContainerSpec, MediaKind};
pub use session::{Recording, RecordingSession};
