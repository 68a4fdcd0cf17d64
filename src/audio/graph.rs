// Audio routing graph for local conversation recording
//
// The graph mixes two live signals into one recordable stream:
// - Remote synthesized voice -> merge node, left channel
// - Microphone -> merge node, right channel (wired by the capability)
// and feeds the merge node into the capture sink.
//
// Invariant: the wired edge set is either the full capturing topology or
// empty. Teardown is idempotent, so interrupted cycles never leave a
// half-wired graph behind.

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::capability::{Edge, MixerTopology};

const CAPTURE_EDGES: [Edge; 2] = [Edge::RemoteToMergeLeft, Edge::MergeToSink];

pub struct RoutingGraph {
    topology: Box<dyn MixerTopology>,
    edges: HashSet<Edge>,
    capturing: bool,
}

impl RoutingGraph {
    pub fn new(topology: Box<dyn MixerTopology>) -> Self {
        Self {
            topology,
            edges: HashSet::new(),
            capturing: false,
        }
    }

    /// Wire the capturing topology. Pre-existing wiring is torn down
    /// first, so calling this twice re-asserts the same topology.
    pub fn start_capture(&mut self) -> Result<()> {
        self.teardown();

        for edge in CAPTURE_EDGES {
            if let Err(e) = self.topology.connect(edge) {
                // Partial wiring must not persist.
                self.teardown();
                return Err(e).with_context(|| format!("failed to wire {edge:?}"));
            }
            self.edges.insert(edge);
        }

        self.capturing = true;
        info!("Capture topology wired");
        Ok(())
    }

    /// Unwire the capturing topology. Safe before any `start_capture` and
    /// when called repeatedly.
    pub fn stop_capture(&mut self) {
        self.teardown();
        self.capturing = false;
        debug!("Capture topology torn down");
    }

    fn teardown(&mut self) {
        for edge in CAPTURE_EDGES {
            if let Err(e) = self.topology.disconnect(edge) {
                debug!("Ignoring teardown of unwired edge {:?}: {}", edge, e);
            }
        }
        self.edges.clear();
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn edges(&self) -> &HashSet<Edge> {
        &self.edges
    }
}
