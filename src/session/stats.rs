use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime playback counters for the current session.
///
/// Updated from playback-subsystem notifications and surfaced read-only;
/// the session core never derives behavior from these numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStats {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Seconds of remote audio actually played
    pub played_secs: f64,

    /// Seconds of audio missed to underruns
    pub missed_secs: f64,

    /// Number of inbound audio messages
    pub message_count: u64,

    /// Most recently measured playback delay in seconds
    pub delay_secs: f64,

    /// Smallest delay measured so far
    pub min_delay_secs: Option<f64>,

    /// Largest delay measured so far
    pub max_delay_secs: Option<f64>,
}

impl AudioStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            played_secs: 0.0,
            missed_secs: 0.0,
            message_count: 0,
            delay_secs: 0.0,
            min_delay_secs: None,
            max_delay_secs: None,
        }
    }

    pub fn record_played(&mut self, secs: f64) {
        self.played_secs += secs;
    }

    pub fn record_missed(&mut self, secs: f64) {
        self.missed_secs += secs;
    }

    pub fn record_message(&mut self) {
        self.message_count += 1;
    }

    pub fn record_delay(&mut self, secs: f64) {
        self.delay_secs = secs;
        self.min_delay_secs = Some(self.min_delay_secs.map_or(secs, |m| m.min(secs)));
        self.max_delay_secs = Some(self.max_delay_secs.map_or(secs, |m| m.max(secs)));
    }

    /// Session age in seconds.
    pub fn duration_secs(&self) -> f64 {
        let duration = Utc::now().signed_duration_since(self.started_at);
        duration.num_milliseconds() as f64 / 1000.0
    }
}

impl Default for AudioStats {
    fn default() -> Self {
        Self::new()
    }
}
