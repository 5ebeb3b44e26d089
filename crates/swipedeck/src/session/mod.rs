pub mod gesture;
pub mod navigation;
pub mod playback;
pub mod selection;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use crate::deck::{Slide, SlideRegistry};

use gesture::{GestureInterpreter, SwipeCommand};
use navigation::{Direction, NavigationController, NavigationState};
use playback::{PlaybackAck, PlaybackCoordinator, PlaybackDevice};
use selection::{Choice, FixedReveal, SelectionFlow, SelectionView};

/// Everything the rendering surface can ask of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Advance,
    Retreat,
    Choose(Choice),
    RequestReveal,
    TogglePlayback,
    StartPlayback,
    RetryPlayback,
    DragReleased { offset: f32 },
}

/// What a command changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Moved(Direction),
    RevealStarted,
    Playback(PlaybackAck),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub swipe_threshold: f32,
    pub reveal_delay: Duration,
    pub reveal_value: u8,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            swipe_threshold: gesture::DEFAULT_SWIPE_THRESHOLD,
            reveal_delay: selection::DEFAULT_REVEAL_DELAY,
            reveal_value: selection::DEFAULT_REVEAL_VALUE,
        }
    }
}

/// All state for one run of the carousel. Dropping it cancels a pending
/// reveal and releases the audio device.
#[derive(Debug)]
pub struct Session {
    registry: SlideRegistry,
    navigation: NavigationController,
    selection: SelectionFlow,
    playback: PlaybackCoordinator,
    gesture: GestureInterpreter,
    started: bool,
}

impl Session {
    pub fn new(
        registry: SlideRegistry,
        settings: SessionSettings,
        device: Box<dyn PlaybackDevice>,
    ) -> Self {
        let navigation = NavigationController::new(&registry);
        Self {
            registry,
            navigation,
            selection: SelectionFlow::new(
                settings.reveal_delay,
                Box::new(FixedReveal(settings.reveal_value)),
            ),
            playback: PlaybackCoordinator::new(device),
            gesture: GestureInterpreter::new(settings.swipe_threshold),
            started: false,
        }
    }

    /// Leave the entry screen and start the music. [`Command::StartPlayback`]
    /// lands here.
    pub fn begin(&mut self) -> PlaybackAck {
        self.started = true;
        tracing::info!(slides = self.registry.size(), "Session started");
        self.playback.start()
    }

    /// Leave the entry screen without touching playback.
    pub fn begin_silently(&mut self) {
        self.started = true;
        tracing::info!(slides = self.registry.size(), "Session started without audio");
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn registry(&self) -> &SlideRegistry {
        &self.registry
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn navigation_state(&self) -> NavigationState {
        self.navigation.state()
    }

    pub fn current_slide(&self) -> &Slide {
        self.registry.clamped(self.navigation.position())
    }

    pub fn selection(&self) -> SelectionView {
        self.selection.view()
    }

    pub fn playback(&self) -> &PlaybackCoordinator {
        &self.playback
    }

    pub fn gesture(&self) -> GestureInterpreter {
        self.gesture
    }

    pub fn jump_to(&mut self, position: usize) {
        self.navigation.jump_to(position);
    }

    pub fn apply(&mut self, command: Command, now: Instant) -> Effect {
        tracing::trace!(?command, "Applying command");
        match command {
            Command::Advance => self.moved(|nav| nav.advance()),
            Command::Retreat => self.moved(|nav| nav.retreat()),
            Command::Choose(choice) => self.select_and_advance(choice),
            Command::RequestReveal => {
                if self.selection.request_reveal(now) {
                    Effect::RevealStarted
                } else {
                    Effect::None
                }
            }
            Command::TogglePlayback => Effect::Playback(self.playback.toggle()),
            Command::StartPlayback => Effect::Playback(self.begin()),
            Command::RetryPlayback => Effect::Playback(self.playback.retry()),
            Command::DragReleased { offset } => self.release_drag(offset),
        }
    }

    /// Record the choice and step past the gated slide. Only valid while the
    /// gated slide is showing. Revisiting the slide keeps the first choice.
    pub fn select_and_advance(&mut self, choice: Choice) -> Effect {
        if !self.navigation.is_gated() {
            return Effect::None;
        }
        self.selection.choose(choice);
        self.moved(|nav| nav.advance_through_gate())
    }

    pub fn release_drag(&mut self, offset: f32) -> Effect {
        match self.gesture.classify(offset) {
            Some(SwipeCommand::Forward) => self.moved(|nav| nav.advance()),
            Some(SwipeCommand::Backward) => self.moved(|nav| nav.retreat()),
            None => Effect::None,
        }
    }

    /// Advance timers and device outcomes. Returns the revealed number on the
    /// frame it resolves.
    pub fn tick(&mut self, now: Instant) -> Option<u8> {
        self.playback.poll();
        self.selection.tick(now)
    }

    /// Time until the next scheduled state change, for repaint scheduling.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.selection.remaining(now)
    }

    fn moved(&mut self, step: impl FnOnce(&mut NavigationController) -> bool) -> Effect {
        if step(&mut self.navigation) {
            Effect::Moved(self.navigation.state().last_direction)
        } else {
            Effect::None
        }
    }
}
