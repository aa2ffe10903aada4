//! Integration tests for session lifecycle
//!
//! Covers file and device outputs together, the shutdown order and how
//! failures halt the session.

mod common;

use common::{expected_samples, RecordingDevice, ScriptedEngine};
use picospeak::speech::DriverConfig;
use picospeak::state::Session;
use picospeak::PicoSpeakError;
use tempfile::tempdir;

type TestSession = Session<ScriptedEngine, RecordingDevice>;

fn session(engine: ScriptedEngine) -> TestSession {
    Session::new(engine, DriverConfig::default())
}

fn read_wav(path: &std::path::Path) -> Vec<i16> {
    hound::WavReader::open(path)
        .unwrap()
        .samples::<i16>()
        .map(|s| s.unwrap())
        .collect()
}

#[test]
fn test_file_and_device_together() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("speech.wav");
    let mut session = session(ScriptedEngine::new(10));
    let (device, log) = RecordingDevice::new(16_000);

    session.set_file_output(&path).unwrap();
    session.set_playback(device, 64).unwrap();
    session.send_text("First. Second").unwrap();
    session.finish().unwrap();

    let expected = expected_samples("First. Second", 10);
    assert_eq!(read_wav(&path), expected);

    let log = log.borrow();
    let played = log.writes.concat();
    assert_eq!(&played[..expected.len()], expected.as_slice());
    assert!(played[expected.len()..].iter().all(|&s| s == 0));
    assert_eq!(log.events.first(), Some(&"start"));
    assert_eq!(log.events.last(), Some(&"stop"));
    assert!(session.file().is_none());
}

#[test]
fn test_finish_flushes_trailing_fragment() {
    let (device, log) = RecordingDevice::new(16_000);
    let mut session = session(ScriptedEngine::new(2));
    session.set_playback(device, 1024).unwrap();

    session.send_text("no full stop").unwrap();
    assert!(log.borrow().writes.is_empty());

    session.finish().unwrap();

    let log = log.borrow();
    assert_eq!(log.events, vec!["start", "write", "stop"]);
    assert_eq!(
        &log.writes[0][..24],
        expected_samples("no full stop", 2).as_slice()
    );
}

#[test]
fn test_finish_with_no_audio() {
    let (device, log) = RecordingDevice::new(16_000);
    let mut session = session(ScriptedEngine::new(2));
    session.set_playback(device, 16).unwrap();

    session.finish().unwrap();

    assert_eq!(log.borrow().events, vec!["start", "stop"]);
}

#[test]
fn test_engine_failure_halts_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("speech.raw");
    let mut engine = ScriptedEngine::new(1);
    engine.fail_on_pull = Some(1);
    let mut session = session(engine);
    session.set_file_output(&path).unwrap();

    let err = session.send_text("Boom.").unwrap_err();
    assert!(matches!(err, PicoSpeakError::Engine { .. }));
    assert!(session.is_halted());

    let err = session.send_text("Again.").unwrap_err();
    assert!(matches!(err, PicoSpeakError::Halted));
    assert!(matches!(
        session.flush_pending_text().unwrap_err(),
        PicoSpeakError::Halted
    ));

    // Outputs still close cleanly
    session.finish().unwrap();
    assert!(path.exists());
}

#[test]
fn test_device_failure_halts_but_file_keeps_audio() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("speech.wav");
    let (device, log) = RecordingDevice::new(16_000);
    log.borrow_mut().fail_writes = true;

    let mut session = session(ScriptedEngine::new(8));
    session.set_file_output(&path).unwrap();
    session.set_playback(device, 16).unwrap();

    let err = session.send_text("Loud.").unwrap_err();
    assert!(matches!(err, PicoSpeakError::SinkWrite { sink: "device", .. }));
    assert!(session.is_halted());

    // The file sink saw the chunk before the device failed
    assert!(session.finish().is_err());
    assert_eq!(read_wav(&path), expected_samples("Loud.", 8));
}

#[test]
fn test_reopening_file_output() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.au");
    let mut session = session(ScriptedEngine::new(1));

    session.set_file_output(&first).unwrap();
    session.send_text("One.").unwrap();
    session.set_file_output(&second).unwrap();
    session.send_text("Two.").unwrap();
    session.close_file_output().unwrap();

    assert_eq!(read_wav(&first), expected_samples("One.", 1));
    // AU header plus 4 big-endian samples
    assert_eq!(std::fs::read(&second).unwrap().len(), 24 + 8);
}

#[test]
fn test_upsampled_playback_session() {
    let (device, log) = RecordingDevice::new(48_000);
    let mut session = session(ScriptedEngine::new(3));
    session.set_playback(device, 48).unwrap();
    assert!(session.playback().unwrap().is_upsampling());

    session.send_text("Hi!").unwrap();
    session.finish().unwrap();

    let input = expected_samples("Hi!", 3);
    let played = log.borrow().writes.concat();
    assert_eq!(played.len(), 48);
    for (i, &sample) in input.iter().enumerate() {
        assert_eq!(played[3 * i], sample);
    }
}

#[test]
fn test_replacing_playback_finishes_old_device() {
    let (first, first_log) = RecordingDevice::new(16_000);
    let (second, second_log) = RecordingDevice::new(16_000);
    let mut session = session(ScriptedEngine::new(10));

    session.set_playback(first, 1024).unwrap();
    session.send_text("Hi.").unwrap();
    assert!(first_log.borrow().writes.is_empty());

    session.set_playback(second, 1024).unwrap();
    {
        let log = first_log.borrow();
        assert_eq!(log.events, vec!["start", "write", "stop"]);
        assert_eq!(&log.writes[0][..30], expected_samples("Hi.", 10).as_slice());
    }

    session.send_text("Yo.").unwrap();
    session.finish().unwrap();
    assert_eq!(first_log.borrow().writes.len(), 1);
    let log = second_log.borrow();
    assert_eq!(log.events, vec!["start", "write", "stop"]);
    assert_eq!(&log.writes[0][..30], expected_samples("Yo.", 10).as_slice());
    assert!(session.playback().is_none());
}
