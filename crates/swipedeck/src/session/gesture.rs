pub const DEFAULT_SWIPE_THRESHOLD: f32 = 30.0;

/// How much of the pointer travel the card follows while dragging.
pub const DRAG_ELASTICITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeCommand {
    Forward,
    Backward,
}

/// Turns a horizontal drag, measured only at release, into at most one
/// navigation command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureInterpreter {
    threshold: f32,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl GestureInterpreter {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Dragging left (negative offset) means "next". The threshold itself is
    /// not enough; the release has to go past it.
    pub fn classify(&self, offset: f32) -> Option<SwipeCommand> {
        if offset < -self.threshold {
            Some(SwipeCommand::Forward)
        } else if offset > self.threshold {
            Some(SwipeCommand::Backward)
        } else {
            None
        }
    }
}
