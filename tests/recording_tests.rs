// Tests for the recording cycle: segment buffering, finalization,
// artifact supersession, and the WAV duration fix-up.

use colloquy::recording::{container_for, Container, MediaKind, RecordingSession};
use tempfile::TempDir;

/// Minimal mono 16-bit WAV payload with stale (zeroed) size fields, split
/// into a header+first-samples segment and a tail-samples segment, the way
/// an incremental capture sink delivers it.
fn stale_wav_segments(head: &[i16], tail: &[i16]) -> (Vec<u8>, Vec<u8>) {
    let mut first = Vec::new();
    first.extend_from_slice(b"RIFF");
    first.extend_from_slice(&0u32.to_le_bytes());
    first.extend_from_slice(b"WAVE");

    first.extend_from_slice(b"fmt ");
    first.extend_from_slice(&16u32.to_le_bytes());
    first.extend_from_slice(&1u16.to_le_bytes());
    first.extend_from_slice(&1u16.to_le_bytes());
    first.extend_from_slice(&16000u32.to_le_bytes());
    first.extend_from_slice(&32000u32.to_le_bytes());
    first.extend_from_slice(&2u16.to_le_bytes());
    first.extend_from_slice(&16u16.to_le_bytes());

    first.extend_from_slice(b"data");
    first.extend_from_slice(&0u32.to_le_bytes());
    for s in head {
        first.extend_from_slice(&s.to_le_bytes());
    }

    let mut second = Vec::new();
    for s in tail {
        second.extend_from_slice(&s.to_le_bytes());
    }

    (first, second)
}

#[test]
fn test_audio_lookup_selects_wav() {
    let spec = container_for(MediaKind::Audio);
    assert_eq!(spec.container, Container::Wav);
    assert_eq!(spec.extension, "wav");
    assert!(spec.container.needs_duration_fixup());
    assert!(!Container::Ogg.needs_duration_fixup());
}

#[test]
fn test_finalize_concatenates_and_fixes_duration() {
    let head = [1i16, -2, 3];
    let tail = [-4i16, 5, -6, 7];
    let (a, b) = stale_wav_segments(&head, &tail);

    let mut session = RecordingSession::new("test-session".to_string());
    session.push_segment(a.clone());
    session.push_segment(b.clone());
    session.finalize().unwrap();

    let recording = session.latest().expect("artifact after finalize");
    assert_eq!(recording.data.len(), a.len() + b.len());
    assert_eq!(recording.file_name(), "test-session.wav");

    // Everything outside the patched size fields is the raw concatenation.
    let concat: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
    assert_eq!(recording.data[8..40], concat[8..40]);
    assert_eq!(recording.data[44..], concat[44..]);

    // The fixed payload parses with the full sample count.
    let reader = hound::WavReader::new(std::io::Cursor::new(&recording.data)).unwrap();
    assert_eq!(reader.len() as usize, head.len() + tail.len());
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
}

#[test]
fn test_fixup_failure_falls_back_to_raw_concatenation() {
    // Segments that are not RIFF at all: the fix-up fails and the
    // artifact is the unmodified concatenation.
    let a = vec![10u8, 11, 12];
    let b = vec![13u8, 14];

    let mut session = RecordingSession::new("raw".to_string());
    session.push_segment(a.clone());
    session.push_segment(b.clone());
    session.finalize().unwrap();

    let recording = session.latest().unwrap();
    let concat: Vec<u8> = a.into_iter().chain(b).collect();
    assert_eq!(recording.data, concat);
}

#[test]
fn test_new_artifact_supersedes_previous() {
    let mut session = RecordingSession::new("cycles".to_string());

    session.push_segment(vec![1, 2, 3]);
    session.finalize().unwrap();
    let first_len = session.latest().unwrap().data.len();
    assert_eq!(first_len, 3);

    session.push_segment(vec![9, 9, 9, 9, 9]);
    session.finalize().unwrap();
    assert_eq!(session.latest().unwrap().data, vec![9, 9, 9, 9, 9]);
}

#[test]
fn test_finalize_claims_the_buffer() {
    let mut session = RecordingSession::new("claims".to_string());

    session.push_segment(vec![1]);
    assert_eq!(session.buffered_segments(), 1);
    session.finalize().unwrap();
    assert_eq!(session.buffered_segments(), 0);

    // Segments of the next cycle belong to the next finalize only.
    session.push_segment(vec![2]);
    session.finalize().unwrap();
    assert_eq!(session.latest().unwrap().data, vec![2]);
}

#[test]
fn test_empty_cycle_keeps_previous_artifact() {
    let mut session = RecordingSession::new("empty".to_string());

    session.push_segment(vec![7, 7]);
    session.finalize().unwrap();

    session.finalize().unwrap();
    assert_eq!(session.latest().unwrap().data, vec![7, 7]);

    // Empty segments are dropped at the door.
    session.push_segment(Vec::new());
    assert_eq!(session.buffered_segments(), 0);
}

#[test]
fn test_save_latest_writes_artifact() {
    let temp_dir = TempDir::new().unwrap();

    let mut session = RecordingSession::new("saved".to_string());
    assert!(session.save_latest(temp_dir.path()).unwrap().is_none());

    session.push_segment(vec![42; 64]);
    session.finalize().unwrap();

    let path = session.save_latest(temp_dir.path()).unwrap().unwrap();
    assert!(path.ends_with("saved.wav"));
    assert_eq!(std::fs::read(&path).unwrap(), vec![42; 64]);
}
