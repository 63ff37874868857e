//! Integration tests for frame emission.
//!
//! Covers timestamps, byte offsets, looping, end of stream, seeking and read
//! failures on an activated source.

use imgseq_core::{FrameRate, RationalTime, SequenceFrame};
use imgseq_source::{ImageSequenceSource, SequenceConfig, SequenceError, SourceState};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────

/// `count` numbered units of `size` bytes each.
fn numbered(count: u32, size: usize) -> (TempDir, SequenceConfig) {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..count {
        fs::write(dir.path().join(format!("u{i:04}.dat")), vec![i as u8; size]).unwrap();
    }
    let pattern = dir.path().join("u%04d.dat");
    (dir, SequenceConfig::new(pattern.to_str().unwrap()))
}

fn started(config: SequenceConfig) -> ImageSequenceSource {
    let mut source = ImageSequenceSource::new(config);
    source.activate().unwrap();
    source
}

fn take(source: &mut ImageSequenceSource, n: usize) -> Vec<SequenceFrame> {
    (0..n).map(|_| source.next_frame().unwrap().unwrap()).collect()
}

// ── Timing ─────────────────────────────────────────────────────

#[test]
fn ntsc_timestamps_stay_exact() {
    let (_dir, config) = numbered(5, 1);
    let mut source = started(config.with_rate(FrameRate::FPS_29_97));

    let frames = take(&mut source, 5);
    for (k, frame) in frames.iter().enumerate() {
        assert_eq!(frame.pts, RationalTime::new(1001 * k as i64, 30000));
        assert_eq!(frame.duration, RationalTime::new(1001, 30000));
    }
    assert_eq!(frames[4].time_range().end(), RationalTime::new(5005, 30000));
    assert_eq!(source.duration(), Some(RationalTime::new(5005, 30000)));
}

#[test]
fn offsets_accumulate_across_units() {
    let (_dir, config) = numbered(3, 6);
    let mut source = started(config);

    let frames = take(&mut source, 3);
    let ranges: Vec<(u64, u64)> = frames.iter().map(|f| (f.offset.start, f.offset.end)).collect();
    assert_eq!(ranges, [(0, 6), (6, 12), (12, 18)]);
    assert_eq!(source.bytes_emitted(), Some(18));
}

#[test]
fn duration_unknown_until_first_read() {
    let (_dir, config) = numbered(4, 1);
    let mut source = started(config.with_rate(FrameRate::FPS_25));
    assert_eq!(source.duration(), None);
    assert!(source.current_format().is_none());

    source.next_frame().unwrap();
    assert_eq!(source.duration(), Some(RationalTime::new(4, 25)));
}

// ── End of stream and looping ──────────────────────────────────

#[test]
fn end_of_stream_repeats_until_seek() {
    let (_dir, config) = numbered(2, 1);
    let mut source = started(config);

    take(&mut source, 2);
    for _ in 0..3 {
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.state(), SourceState::Ended);
    }

    assert!(source.seek_to_start());
    assert_eq!(source.state(), SourceState::Ready);
    assert_eq!(source.position(), Some(RationalTime::ZERO));
    let again = source.next_frame().unwrap().unwrap();
    assert_eq!(again.index, 0);
    // Byte offsets keep counting across a seek.
    assert_eq!(again.offset.start, 2);
}

#[test]
fn looping_restarts_timestamps() {
    let (_dir, config) = numbered(5, 1);
    let mut source = started(config.with_start_index(1).with_stop_index(3).with_loop(true));

    let indices: Vec<usize> = take(&mut source, 7).iter().map(|f| f.index).collect();
    assert_eq!(indices, [0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(source.state(), SourceState::Streaming);
    assert_eq!(source.duration(), None);
}

#[test]
fn looping_window_inside_a_list() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = (0..4).map(|i| dir.path().join(format!("{i}.raw"))).collect();
    for path in &paths {
        fs::write(path, b"ab").unwrap();
    }
    let config = SequenceConfig::from_locations(paths)
        .with_start_index(2)
        .with_loop(true)
        .with_rate(FrameRate::FPS_24);
    let mut source = started(config);

    let frames = take(&mut source, 3);
    assert_eq!(frames.iter().map(|f| f.index).collect::<Vec<_>>(), [2, 3, 2]);
    assert_eq!(frames[1].pts, RationalTime::new(1, 24));
    assert_eq!(frames[2].pts, RationalTime::ZERO);
}

// ── Failures ───────────────────────────────────────────────────

#[test]
fn unreadable_unit_can_be_retried() {
    let (dir, config) = numbered(3, 1);
    let mut source = started(config);
    take(&mut source, 1);

    let victim = dir.path().join("u0001.dat");
    fs::remove_file(&victim).unwrap();
    for _ in 0..2 {
        match source.next_frame() {
            Err(SequenceError::Read { path, .. }) => assert_eq!(path, victim),
            other => panic!("expected read error, got {other:?}"),
        }
        assert_eq!(source.current_index(), Some(1));
    }

    fs::write(&victim, [9u8]).unwrap();
    let frame = source.next_frame().unwrap().unwrap();
    assert_eq!(frame.index, 1);
    assert_eq!(&*frame.data, &[9u8]);
    assert_eq!(frame.offset.start, 1);
}

#[test]
fn pulling_from_idle_source_fails() {
    let (_dir, config) = numbered(1, 1);
    let mut source = ImageSequenceSource::new(config);
    assert!(matches!(source.next_frame(), Err(SequenceError::NotActive)));
    assert!(!source.seek_to_start());
    assert!(!source.is_seekable());

    source.activate().unwrap();
    assert!(source.is_seekable());
    source.deactivate();
    assert!(matches!(source.next_frame(), Err(SequenceError::NotActive)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn pass_is_gapless_and_ordered(
        count in 1u32..7,
        num in 1u32..120,
        den in 1u32..1002,
    ) {
        let (_dir, config) = numbered(count, 3);
        let rate = FrameRate::new(num, den);
        let mut source = started(config.with_rate(rate));

        let frames: Vec<SequenceFrame> =
            std::iter::from_fn(|| source.next_frame().unwrap()).collect();
        prop_assert_eq!(frames.len(), count as usize);

        let mut expected_pts = RationalTime::ZERO;
        for frame in &frames {
            prop_assert_eq!(frame.pts, expected_pts);
            expected_pts = frame.time_range().end();
        }
        prop_assert_eq!(Some(expected_pts), source.duration());
        prop_assert_eq!(expected_pts, RationalTime::from_frames(count as i64, rate));
    }
}
