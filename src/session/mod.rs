//! Session orchestration
//!
//! This module provides the `SessionOrchestrator` abstraction that
//! manages:
//! - The duplex channel lifecycle and its parameterization
//! - Progress-event reduction into a display-ready history
//! - The audio routing graph and the local recording cycle
//! - Terminal-disconnect handling and full session resets

mod orchestrator;
mod params;
mod stats;

pub use orchestrator::{SessionEvent, SessionOrchestrator};
pub use params::SessionParameters;
pub use stats::AudioStats;
