//! Duplex channel to the speech service
//!
//! - `target`: deterministic resolution of the connection URL from
//!   session parameters and the hosting context
//! - `manager`: channel lifecycle, outbound sends, in-order inbound
//!   dispatch to a single subscriber
//! - `messages`: the wire envelope and frame classification

pub mod manager;
pub mod messages;
pub mod target;

pub use manager::{ChannelEvent, ConnectionManager, ConnectionState};
pub use messages::{classify, Envelope, Inbound, MetadataPayload, Outbound};
pub use target::{resolve_target, HostContext, SAME_ORIGIN};
