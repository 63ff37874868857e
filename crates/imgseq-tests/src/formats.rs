//! Integration tests for format discovery and the push driver.
//!
//! Units are real images encoded with the `image` crate.

use image::{ImageFormat, Rgb, RgbImage};
use imgseq_core::{FormatDescriptor, FrameRate, RationalTime};
use imgseq_source::{ImageSequenceSource, PushEvent, PushSource, SequenceConfig, SourceState};
use std::fs;
use std::path::Path;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
    img.save_with_format(path, format).unwrap();
}

// ── Format discovery ───────────────────────────────────────────

#[test]
fn png_sequence_reports_dimensions_and_rate() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..3 {
        write_image(&dir.path().join(format!("shot_{i:02}.png")), 64, 36, ImageFormat::Png);
    }
    let pattern = dir.path().join("shot_%02d.png");
    let config = SequenceConfig::new(pattern.to_str().unwrap()).with_rate(FrameRate::FPS_24);
    let mut source = ImageSequenceSource::new(config);
    source.activate().unwrap();
    source.next_frame().unwrap().unwrap();

    let format = source.current_format().unwrap();
    assert_eq!(format.media_type, "image/png");
    assert_eq!((format.width, format.height), (Some(64), Some(36)));
    assert_eq!(format.frame_rate, Some(FrameRate::FPS_24));
}

#[test]
fn format_is_latched_from_first_unit() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.png");
    let second = dir.path().join("b.jpg");
    write_image(&first, 8, 8, ImageFormat::Png);
    write_image(&second, 16, 4, ImageFormat::Jpeg);

    let mut source = ImageSequenceSource::new(SequenceConfig::from_locations([first, second]));
    source.activate().unwrap();
    source.next_frame().unwrap().unwrap();
    source.next_frame().unwrap().unwrap();

    let format = source.current_format().unwrap();
    assert_eq!(format.media_type, "image/png");
    assert_eq!(format.width, Some(8));
}

#[test]
fn non_image_units_are_octet_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "plain text, not pixels").unwrap();

    let mut source = ImageSequenceSource::new(SequenceConfig::from_locations([path]));
    source.activate().unwrap();
    let frame = source.next_frame().unwrap().unwrap();
    assert_eq!(frame.size(), 22);

    let format = source.current_format().unwrap();
    assert!(format.is_unknown());
    assert_eq!(format.frame_rate, Some(FrameRate::FPS_1));
}

#[test]
fn custom_sniffer_is_consulted_once() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = (0..3).map(|i| dir.path().join(format!("{i}.raw"))).collect();
    for path in &paths {
        fs::write(path, [0u8; 16]).unwrap();
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let sniffer = move |_: &[u8]| {
        counter.fetch_add(1, Ordering::SeqCst);
        Some(FormatDescriptor::new("video/x-raw").with_dimensions(4, 4))
    };

    let mut source =
        ImageSequenceSource::with_sniffer(SequenceConfig::from_locations(paths), sniffer);
    source.activate().unwrap();
    while source.next_frame().unwrap().is_some() {}

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.current_format().unwrap().media_type, "video/x-raw");
}

// ── Push driver ────────────────────────────────────────────────

#[test]
fn push_delivers_a_playlist_in_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["one.png", "two.png", "three.png"] {
        write_image(&dir.path().join(name), 4, 4, ImageFormat::Png);
    }
    let playlist = dir.path().join("push.playlist");
    fs::write(
        &playlist,
        "metadata,framerate=(fraction)3/1\n\
         image,location=one.png\n\
         image,location=two.png\n\
         image,location=three.png\n",
    )
    .unwrap();

    let mut source = ImageSequenceSource::new(SequenceConfig::new(playlist.to_str().unwrap()));
    source.activate().unwrap();
    let push = PushSource::spawn(source, 2).unwrap();

    let mut seen = Vec::new();
    loop {
        match push.recv_timeout(WAIT) {
            Some(PushEvent::Frame(frame)) => seen.push((frame.location, frame.pts)),
            Some(PushEvent::EndOfSequence) => break,
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        seen,
        [
            (dir.path().join("one.png"), RationalTime::ZERO),
            (dir.path().join("two.png"), RationalTime::new(1, 3)),
            (dir.path().join("three.png"), RationalTime::new(2, 3)),
        ]
    );

    let stats = push.stats();
    assert_eq!(stats.frames_pushed, 3);
    let source = push.stop().unwrap();
    assert_eq!(source.state(), SourceState::Idle);
}

#[test]
fn push_reports_read_errors() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("here.png");
    let absent = dir.path().join("gone.png");
    write_image(&present, 2, 2, ImageFormat::Png);
    fs::write(&absent, b"soon removed").unwrap();

    let mut source =
        ImageSequenceSource::new(SequenceConfig::from_locations([present, absent.clone()]));
    source.activate().unwrap();
    fs::remove_file(&absent).unwrap();

    let push = PushSource::spawn(source, 4).unwrap();
    assert!(matches!(push.recv_timeout(WAIT), Some(PushEvent::Frame(_))));
    match push.recv_timeout(WAIT) {
        Some(PushEvent::Error(e)) => assert!(!e.is_config()),
        other => panic!("expected error event, got {other:?}"),
    }
    assert!(push.recv_timeout(Duration::from_millis(50)).is_none());
}
