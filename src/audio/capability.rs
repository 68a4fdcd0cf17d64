use anyhow::Result;
use tokio::sync::mpsc;

/// Routing edges owned by the session core.
///
/// The microphone feed into the merge node's right channel is wired by the
/// platform capability itself and never appears in this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Remote synthesized voice into the merge node's left channel.
    RemoteToMergeLeft,
    /// Merge node into the capture sink.
    MergeToSink,
}

/// Mixing-topology operations supplied by the platform audio capability.
pub trait MixerTopology: Send {
    fn connect(&mut self, edge: Edge) -> Result<()>;

    /// Unwire an edge. Errors when the edge is not currently connected;
    /// callers that need idempotent teardown swallow the error.
    fn disconnect(&mut self, edge: Edge) -> Result<()>;
}

/// Capture sink driver supplied by the platform audio capability.
#[async_trait::async_trait]
pub trait CaptureRecorder: Send {
    /// Start the capture sink.
    ///
    /// Returns the channel on which raw captured segments arrive.
    async fn start(&mut self) -> Result<mpsc::Receiver<Vec<u8>>>;

    /// Stop the capture sink. Any pending segment must be flushed to the
    /// channel before this returns.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the sink is currently capturing.
    fn is_capturing(&self) -> bool;

    /// Get capability name for logging.
    fn name(&self) -> &str;
}
