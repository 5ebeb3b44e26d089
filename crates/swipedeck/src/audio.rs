//! Playback devices for the background track.
//!
//! Decoding audio is left to an external player process; the device only
//! starts it, stops it, and watches whether it stays alive.

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use crate::config::AudioSettings;
use crate::error::DeviceError;
use crate::session::playback::{DeviceEvent, PlaybackDevice};

/// How long the player must survive before playback counts as confirmed.
const CONFIRM_AFTER: Duration = Duration::from_millis(400);

pub fn device_for(settings: &AudioSettings, mute: bool) -> Box<dyn PlaybackDevice> {
    if mute || !settings.enabled {
        tracing::info!("Audio disabled, using silent device");
        return Box::new(SilentDevice::default());
    }
    tracing::debug!(player = %settings.player, source = %settings.source, "Using external audio player");
    Box::new(ProcessPlayer::new(
        settings.player.clone(),
        settings.args.clone(),
        settings.source.clone(),
    ))
}

/// Accepts every request and plays nothing.
#[derive(Debug, Default)]
pub struct SilentDevice {
    pending: VecDeque<DeviceEvent>,
}

impl PlaybackDevice for SilentDevice {
    fn play(&mut self) -> Result<(), DeviceError> {
        self.pending.push_back(DeviceEvent::Confirmed);
        Ok(())
    }

    fn pause(&mut self) {}

    fn poll(&mut self) -> Option<DeviceEvent> {
        self.pending.pop_front()
    }
}

struct RunningPlayer {
    child: Child,
    spawned: Instant,
    confirmed: bool,
}

/// Plays the source by spawning `player [args..] source`.
pub struct ProcessPlayer {
    player: String,
    args: Vec<String>,
    source: String,
    running: Option<RunningPlayer>,
    pending: VecDeque<DeviceEvent>,
}

impl ProcessPlayer {
    pub fn new(player: String, args: Vec<String>, source: String) -> Self {
        Self {
            player,
            args,
            source,
            running: None,
            pending: VecDeque::new(),
        }
    }

    fn stop(&mut self) {
        if let Some(mut running) = self.running.take() {
            if let Err(e) = running.child.kill() {
                tracing::debug!(error = %e, "Player already exited");
            }
            if let Err(e) = running.child.wait() {
                tracing::warn!(error = %e, "Failed to reap audio player");
            }
        }
    }
}

impl PlaybackDevice for ProcessPlayer {
    fn play(&mut self) -> Result<(), DeviceError> {
        if let Some(running) = &self.running {
            if running.confirmed {
                self.pending.push_back(DeviceEvent::Confirmed);
            }
            return Ok(());
        }

        let child = Command::new(&self.player)
            .args(&self.args)
            .arg(&self.source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    DeviceError::Unavailable(self.player.clone())
                } else {
                    DeviceError::Spawn {
                        program: self.player.clone(),
                        source: e,
                    }
                }
            })?;

        tracing::debug!(pid = child.id(), player = %self.player, "Audio player spawned");
        self.running = Some(RunningPlayer {
            child,
            spawned: Instant::now(),
            confirmed: false,
        });
        Ok(())
    }

    fn pause(&mut self) {
        self.stop();
    }

    fn poll(&mut self) -> Option<DeviceEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let running = self.running.as_mut()?;
        match running.child.try_wait() {
            Ok(None) => {
                if !running.confirmed && running.spawned.elapsed() >= CONFIRM_AFTER {
                    running.confirmed = true;
                    return Some(DeviceEvent::Confirmed);
                }
                None
            }
            Ok(Some(status)) => {
                let confirmed = running.confirmed;
                self.running = None;
                if confirmed {
                    Some(DeviceEvent::Ended)
                } else {
                    Some(DeviceEvent::Rejected(format!(
                        "{} exited early ({status})",
                        self.player
                    )))
                }
            }
            Err(e) => {
                self.running = None;
                Some(DeviceEvent::Rejected(e.to_string()))
            }
        }
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_until(device: &mut dyn PlaybackDevice, limit: Duration) -> Option<DeviceEvent> {
        let start = Instant::now();
        while start.elapsed() < limit {
            if let Some(event) = device.poll() {
                return Some(event);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        None
    }

    #[test]
    fn test_silent_device_confirms_each_play() {
        let mut device = SilentDevice::default();
        assert!(device.poll().is_none());
        device.play().unwrap();
        device.pause();
        assert_eq!(device.poll(), Some(DeviceEvent::Confirmed));
        assert!(device.poll().is_none());
    }

    #[test]
    fn test_missing_player_is_unavailable() {
        let mut device = ProcessPlayer::new(
            "swipedeck-no-such-player".to_string(),
            Vec::new(),
            "track.mp3".to_string(),
        );
        let err = device.play().unwrap_err();
        assert!(matches!(err, DeviceError::Unavailable(ref p) if p == "swipedeck-no-such-player"));
        assert!(device.poll().is_none());
    }

    #[test]
    fn test_device_for_respects_mute() {
        let settings = AudioSettings {
            enabled: true,
            player: "swipedeck-no-such-player".to_string(),
            args: Vec::new(),
            source: "x".to_string(),
        };
        let mut device = device_for(&settings, true);
        assert!(device.play().is_ok());
        assert_eq!(device.poll(), Some(DeviceEvent::Confirmed));
    }

    #[cfg(unix)]
    #[test]
    fn test_player_that_exits_early_is_rejected() {
        let mut device = ProcessPlayer::new(
            "sh".to_string(),
            vec!["-c".to_string(), "exit 3".to_string()],
            "track.mp3".to_string(),
        );
        device.play().unwrap();
        let event = poll_until(&mut device, Duration::from_secs(5));
        assert!(matches!(event, Some(DeviceEvent::Rejected(_))), "{event:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_long_running_player_confirms_and_pauses() {
        let mut device = ProcessPlayer::new("sleep".to_string(), Vec::new(), "30".to_string());
        device.play().unwrap();
        let event = poll_until(&mut device, Duration::from_secs(5));
        assert_eq!(event, Some(DeviceEvent::Confirmed));

        // A second play while running re-confirms without spawning again.
        device.play().unwrap();
        assert_eq!(device.poll(), Some(DeviceEvent::Confirmed));

        device.pause();
        assert!(device.running.is_none());
        assert!(device.poll().is_none());
    }
}
