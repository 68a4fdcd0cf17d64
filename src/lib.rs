pub mod audio;
pub mod config;
pub mod connect;
pub mod progress;
pub mod recording;
pub mod session;

pub use audio::{CaptureRecorder, Edge, MixerTopology, RoutingGraph};
pub use config::Config;
pub use connect::{
    resolve_target, ChannelEvent, ConnectionManager, ConnectionState, HostContext, Inbound,
    Outbound,
};
pub use progress::{ProgressLog, ProgressStep, StepStatus};
pub use recording::{container_for, Container, ContainerSpec, MediaKind, Recording, RecordingSession};
pub use session::{AudioStats, SessionEvent, SessionOrchestrator, SessionParameters};
