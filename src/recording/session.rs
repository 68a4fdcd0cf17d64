use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::container::{container_for, fix_riff_sizes, ContainerSpec, MediaKind};

/// A finalized capture artifact, ready for download.
#[derive(Debug, Clone)]
pub struct Recording {
    pub data: Vec<u8>,
    pub container: ContainerSpec,
    file_stem: String,
}

impl Recording {
    /// File-name hint for download, e.g. "session-<id>.wav".
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem, self.container.extension)
    }
}

/// Accumulates captured segments for the current cycle and finalizes them
/// into a single artifact.
pub struct RecordingSession {
    session_id: String,
    container: ContainerSpec,
    segments: Vec<Vec<u8>>,
    latest: Option<Recording>,
}

impl RecordingSession {
    pub fn new(session_id: String) -> Self {
        let container = container_for(MediaKind::Audio);
        info!(
            "Recording session ready: {} (container: {:?})",
            session_id, container.container
        );

        Self {
            session_id,
            container,
            segments: Vec::new(),
            latest: None,
        }
    }

    /// Append one raw captured segment to the current cycle's buffer.
    pub fn push_segment(&mut self, segment: Vec<u8>) {
        if segment.is_empty() {
            return;
        }
        self.segments.push(segment);
    }

    pub fn buffered_segments(&self) -> usize {
        self.segments.len()
    }

    /// Concatenate the buffered segments into the session's artifact,
    /// superseding any prior one. The buffer is claimed up front, so
    /// segments of a new cycle never land in a finalize already underway.
    ///
    /// A cycle that captured nothing keeps the previous artifact.
    pub fn finalize(&mut self) -> Result<()> {
        let segments = mem::take(&mut self.segments);
        if segments.is_empty() {
            debug!("No captured segments; keeping previous artifact");
            return Ok(());
        }

        let total: usize = segments.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for segment in &segments {
            data.extend_from_slice(segment);
        }

        if self.container.container.needs_duration_fixup() {
            if let Err(e) = fix_riff_sizes(&mut data) {
                warn!("Duration fix-up failed, keeping unfixed payload: {:#}", e);
            }
        }

        info!(
            "Finalized recording: {} segments, {} bytes",
            segments.len(),
            data.len()
        );

        self.latest = Some(Recording {
            data,
            container: self.container,
            file_stem: self.session_id.clone(),
        });

        Ok(())
    }

    /// The most recently finalized artifact, if any.
    pub fn latest(&self) -> Option<&Recording> {
        self.latest.as_ref()
    }

    /// Persist the latest artifact into `dir`, returning the written path.
    pub fn save_latest(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(recording) = &self.latest else {
            return Ok(None);
        };

        fs::create_dir_all(dir).context("Failed to create output directory")?;

        let path = dir.join(recording.file_name());
        fs::write(&path, &recording.data)
            .with_context(|| format!("Failed to write recording: {:?}", path))?;

        info!("Saved recording to {:?} ({} bytes)", path, recording.data.len());
        Ok(Some(path))
    }
}
