mod playback;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::playback::{DeviceEvent, PlaybackDevice};
use super::{Session, SessionSettings};
use crate::deck::{self, SlideRegistry};
use crate::error::DeviceError;

/// Index of the choice slide in the bundled deck.
const GATE: usize = 17;
const LAST: usize = 18;

#[derive(Debug, Default)]
struct DeviceScript {
    reject_next_play: Option<String>,
    events: VecDeque<DeviceEvent>,
    plays: usize,
    pauses: usize,
}

/// Playback device whose outcomes are pushed by the test.
#[derive(Debug, Clone, Default)]
struct FakeDevice(Rc<RefCell<DeviceScript>>);

impl FakeDevice {
    fn reject_next_play(&self, reason: &str) {
        self.0.borrow_mut().reject_next_play = Some(reason.to_string());
    }

    fn emit(&self, event: DeviceEvent) {
        self.0.borrow_mut().events.push_back(event);
    }

    fn plays(&self) -> usize {
        self.0.borrow().plays
    }

    fn pauses(&self) -> usize {
        self.0.borrow().pauses
    }
}

impl PlaybackDevice for FakeDevice {
    fn play(&mut self) -> Result<(), DeviceError> {
        let mut script = self.0.borrow_mut();
        script.plays += 1;
        match script.reject_next_play.take() {
            Some(reason) => Err(DeviceError::Unavailable(reason)),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.0.borrow_mut().pauses += 1;
    }

    fn poll(&mut self) -> Option<DeviceEvent> {
        self.0.borrow_mut().events.pop_front()
    }
}

fn bundled_registry() -> SlideRegistry {
    deck::bundled().expect("bundled deck").slides
}

/// Session over the bundled deck, plus a handle to its device.
fn session() -> (Session, FakeDevice) {
    let device = FakeDevice::default();
    let session = Session::new(
        bundled_registry(),
        SessionSettings::default(),
        Box::new(device.clone()),
    );
    (session, device)
}

/// Advance `n` times with generic navigation.
fn advance_n(session: &mut Session, n: usize) {
    for _ in 0..n {
        session.apply(super::Command::Advance, Instant::now());
    }
}

/// An instant safely past the reveal delay.
fn after_delay(start: Instant) -> Instant {
    start + SessionSettings::default().reveal_delay + Duration::from_millis(1)
}
