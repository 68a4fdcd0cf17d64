use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::audio::{CaptureRecorder, MixerTopology, RoutingGraph};
use crate::config::Config;
use crate::connect::{
    resolve_target, ChannelEvent, ConnectionManager, ConnectionState, HostContext, Inbound,
    Outbound,
};
use crate::progress::ProgressLog;
use crate::recording::{Recording, RecordingSession};
use crate::session::params::SessionParameters;
use crate::session::stats::AudioStats;

/// Discrete triggers processed one at a time by the run loop.
///
/// Every external input funnels through this queue, so the session state
/// only ever mutates from one run-to-completion handler at a time.
#[derive(Debug)]
pub enum SessionEvent {
    /// The user pressed the connect control.
    ConnectPressed,
    /// The hosting surface is going away.
    Unmounted,
    /// Channel traffic, forwarded in arrival order.
    Channel(ChannelEvent),
    /// Playback subsystem notifications, surfaced into stats.
    Played { secs: f64 },
    Missed { secs: f64 },
    Delay { secs: f64 },
}

/// Owns one conversation: the duplex channel, the routing graph, the
/// recording cycle, the progress log, and the terminal "over" flag.
///
/// All resources live exactly as long as this instance; a conversation
/// that ended terminally is never resumed, only replaced via `reset`.
pub struct SessionOrchestrator {
    config: Config,
    host: HostContext,
    params: SessionParameters,
    session_id: String,

    connection: ConnectionManager,
    graph: RoutingGraph,
    recorder: Box<dyn CaptureRecorder>,
    segments: Option<mpsc::Receiver<Vec<u8>>>,
    recording: RecordingSession,
    progress: ProgressLog,
    stats: AudioStats,

    /// Set on server disconnect; the session cannot be resumed past it.
    over: bool,

    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
}

impl SessionOrchestrator {
    /// Build a session around externally supplied capability handles.
    /// Must run inside a tokio runtime (channel tasks are spawned lazily).
    pub fn new(
        config: Config,
        topology: Box<dyn MixerTopology>,
        recorder: Box<dyn CaptureRecorder>,
    ) -> Result<Self> {
        let host = HostContext {
            host: config.connection.host.clone(),
            port: config.connection.port,
            secure: config.connection.secure,
        };

        let params = SessionParameters::draw(&config.generation, &config.connection);
        let target = resolve_target(&config.connection.address, &host, &params)?;
        let session_id = format!("session-{}", Uuid::new_v4());

        info!("Creating voice session: {}", session_id);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let connection = channel_for(target, event_tx.clone());

        Ok(Self {
            config,
            host,
            params,
            session_id: session_id.clone(),
            connection,
            graph: RoutingGraph::new(topology),
            recorder,
            segments: None,
            recording: RecordingSession::new(session_id),
            progress: ProgressLog::new(),
            stats: AudioStats::new(),
            over: false,
            event_tx,
            event_rx: Some(event_rx),
        })
    }

    /// Handle for injecting user actions and playback notifications.
    pub fn events(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.event_tx.clone()
    }

    /// Process events until the hosting surface unmounts.
    ///
    /// Captured segments are appended to the cycle buffer as they arrive;
    /// the sink's channel must never back up over a long conversation.
    pub async fn run(&mut self) -> Result<()> {
        let mut events = self
            .event_rx
            .take()
            .context("run() already consumed the event queue")?;

        self.on_mount().await?;

        loop {
            let next = match self.segments.as_mut() {
                Some(segments) => tokio::select! {
                    event = events.recv() => Wake::Event(event),
                    segment = segments.recv() => Wake::Segment(segment),
                },
                None => Wake::Event(events.recv().await),
            };

            match next {
                Wake::Event(Some(SessionEvent::ConnectPressed)) => {
                    self.handle_connect_press().await?
                }
                Wake::Event(Some(SessionEvent::Unmounted)) | Wake::Event(None) => break,
                Wake::Event(Some(SessionEvent::Channel(ChannelEvent::Inbound(inbound)))) => {
                    self.on_inbound(inbound)
                }
                Wake::Event(Some(SessionEvent::Channel(ChannelEvent::Disconnected))) => {
                    self.on_server_disconnect().await?
                }
                Wake::Event(Some(SessionEvent::Played { secs })) => {
                    self.stats.record_played(secs)
                }
                Wake::Event(Some(SessionEvent::Missed { secs })) => {
                    self.stats.record_missed(secs)
                }
                Wake::Event(Some(SessionEvent::Delay { secs })) => self.stats.record_delay(secs),
                Wake::Segment(Some(segment)) => self.recording.push_segment(segment),
                Wake::Segment(None) => self.segments = None,
            }
        }

        self.on_unmount().await
    }

    /// User pressed the connect control.
    ///
    /// Past the terminal state this starts a whole new conversation;
    /// otherwise it toggles between starting and pausing the current one.
    pub async fn handle_connect_press(&mut self) -> Result<()> {
        if self.over {
            self.reset()?;
            return self.begin().await;
        }

        match self.connection.state().await {
            ConnectionState::Connected => self.pause().await,
            _ => self.begin().await,
        }
    }

    /// The hosting surface appeared: connect once.
    pub async fn on_mount(&mut self) -> Result<()> {
        self.begin().await
    }

    /// The hosting surface is going away: tear everything down,
    /// regardless of current state.
    pub async fn on_unmount(&mut self) -> Result<()> {
        self.connection.stop().await;
        self.stop_capture_and_finalize().await
    }

    /// The service closed the channel. Terminal: preserve whatever was
    /// captured and require a full reset to continue.
    pub async fn on_server_disconnect(&mut self) -> Result<()> {
        warn!("Server closed the session; conversation is over");
        self.over = true;
        self.stop_capture_and_finalize().await
    }

    /// Route one inbound message. Progress statuses feed the reducer,
    /// synthesized audio is counted and handed to playback; everything
    /// else belongs to external display collaborators.
    pub fn on_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Progress(step) => {
                debug!("Progress: {} {:?}", step.step, step.status);
                self.progress.apply(step);
                if let Some(elapsed) = self.progress.ready_elapsed() {
                    info!("Session ready after {:.1}s", elapsed);
                }
            }
            Inbound::Audio(_data) => {
                // Playback itself is an external collaborator; only the
                // counter lives here.
                self.stats.record_message();
            }
            Inbound::Ignored => {}
        }
    }

    /// Forward one microphone frame to the service.
    pub async fn send_audio(&self, pcm: Vec<u8>) {
        self.connection.send(Outbound::Audio(pcm)).await;
    }

    async fn begin(&mut self) -> Result<()> {
        self.progress.clear();
        self.connection.start().await;
        self.start_capture().await
    }

    async fn pause(&mut self) -> Result<()> {
        info!("Pausing conversation");
        self.connection.stop().await;
        self.stop_capture_and_finalize().await
    }

    async fn start_capture(&mut self) -> Result<()> {
        if self.graph.is_capturing() {
            debug!("Capture already running");
            return Ok(());
        }

        self.graph.start_capture()?;
        let rx = self
            .recorder
            .start()
            .await
            .context("Failed to start capture sink")?;
        info!("Capture sink started: {}", self.recorder.name());
        self.segments = Some(rx);
        Ok(())
    }

    async fn stop_capture_and_finalize(&mut self) -> Result<()> {
        let was_capturing = self.graph.is_capturing();
        self.graph.stop_capture();
        if !was_capturing {
            return Ok(());
        }

        if self.recorder.is_capturing() {
            if let Err(e) = self.recorder.stop().await {
                warn!("Capture sink stop failed: {:#}", e);
            }
        }

        // The sink flushed on stop; claim everything it produced before
        // finalizing this cycle.
        if let Some(mut rx) = self.segments.take() {
            rx.close();
            while let Ok(segment) = rx.try_recv() {
                self.recording.push_segment(segment);
            }
        }

        self.recording.finalize()
    }

    /// Discard the ended conversation and set up a fresh one: new seeds,
    /// new target, new recording cycle, cleared progress.
    fn reset(&mut self) -> Result<()> {
        info!("Starting a new conversation");

        self.params = SessionParameters::draw(&self.config.generation, &self.config.connection);
        let target = resolve_target(&self.config.connection.address, &self.host, &self.params)?;

        self.session_id = format!("session-{}", Uuid::new_v4());
        self.connection = channel_for(target, self.event_tx.clone());
        self.recording = RecordingSession::new(self.session_id.clone());
        self.progress.clear();
        self.stats = AudioStats::new();
        self.segments = None;
        self.over = false;

        Ok(())
    }

    /// Persist the latest finalized artifact to the configured directory.
    pub fn save_recording(&self) -> Result<Option<PathBuf>> {
        self.recording
            .save_latest(PathBuf::from(&self.config.recording.output_dir).as_path())
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    pub fn stats(&self) -> &AudioStats {
        &self.stats
    }

    pub fn params(&self) -> &SessionParameters {
        &self.params
    }

    pub fn latest_recording(&self) -> Option<&Recording> {
        self.recording.latest()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_capturing(&self) -> bool {
        self.graph.is_capturing()
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.connection.state().await
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// One wake-up of the run loop: an external event, or a captured segment
/// ready for the recording cycle.
enum Wake {
    Event(Option<SessionEvent>),
    Segment(Option<Vec<u8>>),
}

/// Wire a connection manager into the session's single event queue. The
/// forwarder task ends when the manager (and its sender) is dropped.
fn channel_for(target: Url, events: mpsc::UnboundedSender<SessionEvent>) -> ConnectionManager {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if events.send(SessionEvent::Channel(event)).is_err() {
                break;
            }
        }
    });

    ConnectionManager::new(target, tx)
}
