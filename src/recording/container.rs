// Container selection and the duration fix-up for incremental capture.
//
// Capture sinks stream a container incrementally, which leaves duration
// metadata unreliable for some formats. WAV is the worst offender: the
// RIFF and `data` chunk sizes are only correct if the writer got to seek
// back and patch them, so a payload assembled from streamed segments
// reports a zero or bogus duration until fixed.

use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Wav,
    Ogg,
}

impl Container {
    /// Whether incrementally captured payloads of this container need
    /// their duration metadata rewritten before use.
    pub fn needs_duration_fixup(self) -> bool {
        matches!(self, Container::Wav)
    }
}

/// Container plus the matching file extension for the current runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSpec {
    pub container: Container,
    pub extension: &'static str,
}

/// Container lookup for a requested media kind.
pub fn container_for(kind: MediaKind) -> ContainerSpec {
    match kind {
        MediaKind::Audio => ContainerSpec {
            container: Container::Wav,
            extension: "wav",
        },
    }
}

/// Rewrite the RIFF and `data` chunk sizes of a WAV payload from its
/// actual length.
pub fn fix_riff_sizes(data: &mut [u8]) -> Result<()> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        bail!("payload is not RIFF/WAVE");
    }

    let riff_size = (data.len() - 8) as u32;
    data[4..8].copy_from_slice(&riff_size.to_le_bytes());

    // Walk the chunk list to the data chunk; its size is everything that
    // follows the chunk header.
    let mut offset = 12;
    while offset + 8 <= data.len() {
        let declared = u32::from_le_bytes([
            data[offset + 4],
            data[offset + 5],
            data[offset + 6],
            data[offset + 7],
        ]) as usize;

        if &data[offset..offset + 4] == b"data" {
            let payload = (data.len() - offset - 8) as u32;
            data[offset + 4..offset + 8].copy_from_slice(&payload.to_le_bytes());
            return Ok(());
        }

        // Chunks are word-aligned.
        offset += 8 + declared + (declared & 1);
    }

    bail!("no data chunk found")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal WAV payload with stale (zeroed) size fields, the shape an
    /// incremental capture produces.
    fn stale_wav(samples: &[i16]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(b"WAVE");

        data.extend_from_slice(b"fmt ");
        data.extend_from_slice(&16u32.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes()); // PCM
        data.extend_from_slice(&1u16.to_le_bytes()); // mono
        data.extend_from_slice(&16000u32.to_le_bytes());
        data.extend_from_slice(&32000u32.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&16u16.to_le_bytes());

        data.extend_from_slice(b"data");
        data.extend_from_slice(&0u32.to_le_bytes());
        for s in samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_fixup_rewrites_sizes() {
        let samples = [1i16, -2, 3, -4];
        let mut data = stale_wav(&samples);
        fix_riff_sizes(&mut data).unwrap();

        let riff_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        assert_eq!(riff_size as usize, data.len() - 8);

        // A fixed payload parses with a correct sample count.
        let reader = hound::WavReader::new(std::io::Cursor::new(&data)).unwrap();
        assert_eq!(reader.len() as usize, samples.len());
    }

    #[test]
    fn test_fixup_rejects_non_wav() {
        let mut data = b"OggS\x00\x00junk-that-is-not-riff".to_vec();
        assert!(fix_riff_sizes(&mut data).is_err());
    }

    #[test]
    fn test_only_wav_needs_fixup() {
        assert!(Container::Wav.needs_duration_fixup());
        assert!(!Container::Ogg.needs_duration_fixup());
    }
}
