//! Session-initialization progress tracking
//!
//! The service reports initialization as a stream of step-status events
//! that may repeat and overlap. `ProgressLog` folds that stream into an
//! ordered, display-ready history: at most one live (non-done) entry per
//! step, and completed entries are permanent.

use serde::{Deserialize, Serialize};

/// Step id whose completion marks the session as ready.
pub const READY_STEP: &str = "ready";

/// Status reported for a single initialization step.
///
/// Unrecognized statuses deserialize to `Unknown` and are carried through
/// to display rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Started,
    Running,
    Done,
    #[serde(other)]
    Unknown,
}

/// One reported initialization phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressStep {
    /// Step identifier (e.g. "init", "voice_prompt", "ready").
    pub step: String,

    /// Reported status.
    pub status: StepStatus,

    /// Free-text decoration for display. Opaque; the numeric `elapsed`
    /// field is the authoritative timing source.
    #[serde(default)]
    pub detail: String,

    /// Seconds elapsed since session initialization began.
    #[serde(default)]
    pub elapsed: f64,
}

/// Ordered, append-mostly history of session initialization.
#[derive(Debug, Default)]
pub struct ProgressLog {
    steps: Vec<ProgressStep>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the log: drop the (at most one) live entry for
    /// the same step, then append the event. Done entries are never
    /// touched.
    pub fn apply(&mut self, event: ProgressStep) {
        if let Some(pos) = self
            .steps
            .iter()
            .position(|s| s.step == event.step && s.status != StepStatus::Done)
        {
            self.steps.remove(pos);
        }
        self.steps.push(event);
    }

    /// Total elapsed seconds once the terminal step has completed as the
    /// latest entry; `None` while initialization is still in flight.
    pub fn ready_elapsed(&self) -> Option<f64> {
        match self.steps.last() {
            Some(s) if s.step == READY_STEP && s.status == StepStatus::Done => Some(s.elapsed),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_elapsed().is_some()
    }

    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

/// Human label for a step id. Unknown ids fall through as-is.
pub fn step_label(step: &str) -> &str {
    match step {
        "init" => "Initializing",
        "text_prompt" => "Loading text prompt",
        "voice_prompt" => "Loading voice prompt",
        "lm" => "Warming up the model",
        READY_STEP => "Ready",
        other => other,
    }
}

/// Display glyph for a status.
pub fn status_glyph(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Started => "·",
        StepStatus::Running => "~",
        StepStatus::Done => "✓",
        StepStatus::Unknown => "?",
    }
}

/// Elapsed-time suffix in the conventional "(1.2s)" form.
pub fn format_elapsed(elapsed: f64) -> String {
    format!("({elapsed:.1}s)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(step: &str, status: StepStatus, elapsed: f64) -> ProgressStep {
        ProgressStep {
            step: step.to_string(),
            status,
            detail: String::new(),
            elapsed,
        }
    }

    #[test]
    fn test_live_entry_is_replaced() {
        let mut log = ProgressLog::new();
        log.apply(event("init", StepStatus::Started, 0.0));
        log.apply(event("init", StepStatus::Running, 0.5));

        assert_eq!(log.steps().len(), 1);
        assert_eq!(log.steps()[0].status, StepStatus::Running);
    }

    #[test]
    fn test_done_entries_are_permanent() {
        let mut log = ProgressLog::new();
        log.apply(event("init", StepStatus::Started, 0.0));
        log.apply(event("init", StepStatus::Done, 1.2));
        log.apply(event("voice_prompt", StepStatus::Running, 1.3));

        assert_eq!(log.steps().len(), 2);
        assert_eq!(log.steps()[0].step, "init");
        assert_eq!(log.steps()[0].status, StepStatus::Done);
        assert_eq!(log.steps()[1].step, "voice_prompt");
        assert_eq!(log.steps()[1].status, StepStatus::Running);

        // A repeated event for a completed step appends a fresh entry
        // instead of rewriting history.
        log.apply(event("init", StepStatus::Done, 2.0));
        assert_eq!(log.steps().len(), 3);
        assert_eq!(log.steps()[0].elapsed, 1.2);
    }

    #[test]
    fn test_at_most_one_live_entry_per_step() {
        let mut log = ProgressLog::new();
        for i in 0..10 {
            log.apply(event("lm", StepStatus::Running, i as f64));
        }

        let live = log
            .steps()
            .iter()
            .filter(|s| s.step == "lm" && s.status != StepStatus::Done)
            .count();
        assert_eq!(live, 1);
    }

    #[test]
    fn test_readiness() {
        let mut log = ProgressLog::new();
        log.apply(event("init", StepStatus::Done, 1.0));
        assert!(!log.is_ready());

        log.apply(event(READY_STEP, StepStatus::Running, 2.0));
        assert!(!log.is_ready());

        log.apply(event(READY_STEP, StepStatus::Done, 2.5));
        assert_eq!(log.ready_elapsed(), Some(2.5));
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let step: ProgressStep =
            serde_json::from_str(r#"{"step":"init","status":"warming","elapsed":0.1}"#).unwrap();
        assert_eq!(step.status, StepStatus::Unknown);

        let mut log = ProgressLog::new();
        log.apply(step);
        assert_eq!(log.steps().len(), 1);
        assert_eq!(status_glyph(log.steps()[0].status), "?");
    }
}
