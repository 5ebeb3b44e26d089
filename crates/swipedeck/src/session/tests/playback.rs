use std::time::Instant;

use super::session;
use crate::session::playback::DeviceEvent;
use crate::session::{Command, Effect};

#[test]
fn begins_not_playing() {
    let (session, device) = session();
    assert!(!session.started());
    assert!(!session.playback().desired_playing());
    assert!(!session.playback().needs_retry());
    assert_eq!(device.plays(), 0);
}

#[test]
fn begin_starts_playback() {
    let (mut session, device) = session();
    let ack = session.begin();
    assert!(ack.intent_accepted);
    assert!(session.started());
    assert!(session.playback().desired_playing());
    assert_eq!(device.plays(), 1);

    // Not confirmed until the device says so.
    assert!(!session.playback().device_playing());
    device.emit(DeviceEvent::Confirmed);
    session.tick(Instant::now());
    assert!(session.playback().device_playing());
}

#[test]
fn begin_silently_leaves_audio_alone() {
    let (mut session, device) = session();
    session.begin_silently();
    assert!(session.started());
    assert!(!session.playback().desired_playing());
    assert_eq!(device.plays(), 0);
}

#[test]
fn immediate_rejection_keeps_intent() {
    let (mut session, device) = session();
    device.reject_next_play("blocked");
    let ack = session.begin();
    assert!(!ack.intent_accepted);
    assert!(ack.reason.as_deref().unwrap_or_default().contains("blocked"));
    assert!(session.playback().desired_playing());
    assert!(session.playback().needs_retry());
}

#[test]
fn late_rejection_raises_retry() {
    let (mut session, device) = session();
    session.begin();
    device.emit(DeviceEvent::Rejected("autoplay blocked".to_string()));
    session.tick(Instant::now());
    assert!(session.playback().desired_playing());
    assert!(session.playback().needs_retry());
}

#[test]
fn toggle_flips_intent_and_commands_device() {
    let (mut session, device) = session();
    let now = Instant::now();

    let Effect::Playback(ack) = session.apply(Command::TogglePlayback, now) else {
        panic!("expected a playback effect");
    };
    assert!(ack.intent_accepted);
    assert!(session.playback().desired_playing());
    assert_eq!(device.plays(), 1);

    session.apply(Command::TogglePlayback, now);
    assert!(!session.playback().desired_playing());
    assert_eq!(device.pauses(), 1);
}

#[test]
fn toggle_rejection_handled_like_start() {
    let (mut session, device) = session();
    device.reject_next_play("no device");
    session.apply(Command::TogglePlayback, Instant::now());
    assert!(session.playback().desired_playing());
    assert!(session.playback().needs_retry());
}

#[test]
fn pausing_clears_retry_prompt() {
    let (mut session, device) = session();
    device.reject_next_play("blocked");
    session.begin();
    assert!(session.playback().needs_retry());
    session.apply(Command::TogglePlayback, Instant::now());
    assert!(!session.playback().desired_playing());
    assert!(!session.playback().needs_retry());
}

#[test]
fn failed_retry_keeps_prompt() {
    let (mut session, device) = session();
    device.reject_next_play("blocked");
    session.begin();
    device.reject_next_play("still blocked");
    let Effect::Playback(ack) = session.apply(Command::RetryPlayback, Instant::now()) else {
        panic!("expected a playback effect");
    };
    assert!(!ack.intent_accepted);
    assert!(session.playback().needs_retry());
}

#[test]
fn late_confirmation_after_pause_is_silenced() {
    let (mut session, device) = session();
    session.begin();
    session.apply(Command::TogglePlayback, Instant::now());
    assert_eq!(device.pauses(), 1);

    device.emit(DeviceEvent::Confirmed);
    session.tick(Instant::now());
    assert!(!session.playback().device_playing());
    assert_eq!(device.pauses(), 2);
}

#[test]
fn device_ending_on_its_own_offers_retry() {
    let (mut session, device) = session();
    session.begin();
    device.emit(DeviceEvent::Confirmed);
    device.emit(DeviceEvent::Ended);
    session.tick(Instant::now());
    assert!(!session.playback().device_playing());
    assert!(session.playback().needs_retry());
    assert!(session.playback().desired_playing());
}

#[test]
fn start_command_begins_the_session() {
    let (mut session, device) = session();
    let effect = session.apply(Command::StartPlayback, Instant::now());
    assert!(matches!(effect, Effect::Playback(ack) if ack.intent_accepted));
    assert!(session.started());
    assert!(session.playback().desired_playing());
    assert_eq!(device.plays(), 1);
}
