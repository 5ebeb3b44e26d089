use crate::error::DeviceError;

/// Late outcome reported by a playback device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The device is actually playing.
    Confirmed,
    /// A play request failed after it was issued.
    Rejected(String),
    /// Playback stopped without being asked to.
    Ended,
}

/// The audio output the coordinator drives. Implementations must not block.
pub trait PlaybackDevice {
    /// Ask the device to play. `Err` is an immediate rejection; `Ok` means the
    /// request is in flight and its outcome arrives through [`poll`](Self::poll).
    fn play(&mut self) -> Result<(), DeviceError>;

    fn pause(&mut self);

    /// Next pending outcome, if any.
    fn poll(&mut self) -> Option<DeviceEvent>;
}

/// What happened to a play/pause request at the moment it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackAck {
    pub intent_accepted: bool,
    pub reason: Option<String>,
}

impl PlaybackAck {
    fn accepted() -> Self {
        Self {
            intent_accepted: true,
            reason: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            intent_accepted: false,
            reason: Some(reason),
        }
    }
}

/// Keeps the user's play/pause intent and reconciles it with what the device
/// reports. Intent is updated optimistically and never rolled back by a
/// rejection; a rejection raises `needs_retry` instead.
pub struct PlaybackCoordinator {
    device: Box<dyn PlaybackDevice>,
    desired_playing: bool,
    needs_retry: bool,
    device_playing: bool,
}

impl std::fmt::Debug for PlaybackCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCoordinator")
            .field("desired_playing", &self.desired_playing)
            .field("needs_retry", &self.needs_retry)
            .field("device_playing", &self.device_playing)
            .finish_non_exhaustive()
    }
}

impl PlaybackCoordinator {
    pub fn new(device: Box<dyn PlaybackDevice>) -> Self {
        Self {
            device,
            desired_playing: false,
            needs_retry: false,
            device_playing: false,
        }
    }

    pub fn desired_playing(&self) -> bool {
        self.desired_playing
    }

    pub fn needs_retry(&self) -> bool {
        self.needs_retry
    }

    /// Whether the device has confirmed it is playing.
    pub fn device_playing(&self) -> bool {
        self.device_playing
    }

    pub fn start(&mut self) -> PlaybackAck {
        self.desired_playing = true;
        self.request_play()
    }

    pub fn toggle(&mut self) -> PlaybackAck {
        if self.desired_playing {
            self.desired_playing = false;
            self.needs_retry = false;
            self.device_playing = false;
            self.device.pause();
            tracing::debug!("Playback paused");
            PlaybackAck::accepted()
        } else {
            self.desired_playing = true;
            self.request_play()
        }
    }

    pub fn retry(&mut self) -> PlaybackAck {
        self.desired_playing = true;
        self.request_play()
    }

    /// Drain device outcomes and fold them into the current state.
    pub fn poll(&mut self) {
        while let Some(event) = self.device.poll() {
            self.handle(event);
        }
    }

    fn request_play(&mut self) -> PlaybackAck {
        match self.device.play() {
            Ok(()) => {
                tracing::debug!("Play requested");
                PlaybackAck::accepted()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Play request rejected");
                self.needs_retry = true;
                self.device_playing = false;
                PlaybackAck::rejected(e.to_string())
            }
        }
    }

    fn handle(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Confirmed => {
                if self.desired_playing {
                    self.device_playing = true;
                    self.needs_retry = false;
                    tracing::info!("Playback confirmed");
                } else {
                    // Confirmation of a request the user has since paused.
                    self.device.pause();
                }
            }
            DeviceEvent::Rejected(reason) => {
                self.device_playing = false;
                if self.desired_playing {
                    self.needs_retry = true;
                }
                tracing::warn!(%reason, "Playback rejected by device");
            }
            DeviceEvent::Ended => {
                self.device_playing = false;
                if self.desired_playing {
                    self.needs_retry = true;
                }
                tracing::info!("Playback ended");
            }
        }
    }
}
