use std::time::{Duration, Instant};

pub const REVEAL_MIN: u8 = 1;
pub const REVEAL_MAX: u8 = 20;
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_REVEAL_VALUE: u8 = REVEAL_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    OptionA,
    OptionB,
}

impl Choice {
    pub fn index(self) -> usize {
        match self {
            Self::OptionA => 0,
            Self::OptionB => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Unset,
    Chosen,
    Computing,
    Revealed,
}

/// Source of the revealed number.
pub trait RevealPolicy {
    /// Must return a value in `REVEAL_MIN..=REVEAL_MAX`; anything else is clamped.
    fn draw(&mut self) -> u8;
}

/// Always reveals the same number.
#[derive(Debug, Clone, Copy)]
pub struct FixedReveal(pub u8);

impl Default for FixedReveal {
    fn default() -> Self {
        Self(DEFAULT_REVEAL_VALUE)
    }
}

impl RevealPolicy for FixedReveal {
    fn draw(&mut self) -> u8 {
        self.0
    }
}

/// Read-only snapshot handed to every slide that shows the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionView {
    pub choice: Option<Choice>,
    pub revealed_value: Option<u8>,
    pub is_computing: bool,
}

impl SelectionView {
    pub fn can_request_reveal(&self) -> bool {
        self.choice.is_some() && self.revealed_value.is_none() && !self.is_computing
    }
}

/// Choice first, then a delayed reveal. Moves forward only and never resets.
pub struct SelectionFlow {
    choice: Option<Choice>,
    revealed_value: Option<u8>,
    computing_since: Option<Instant>,
    delay: Duration,
    policy: Box<dyn RevealPolicy>,
}

impl Default for SelectionFlow {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY, Box::new(FixedReveal::default()))
    }
}

impl std::fmt::Debug for SelectionFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionFlow")
            .field("choice", &self.choice)
            .field("revealed_value", &self.revealed_value)
            .field("computing_since", &self.computing_since)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl SelectionFlow {
    pub fn new(delay: Duration, policy: Box<dyn RevealPolicy>) -> Self {
        Self {
            choice: None,
            revealed_value: None,
            computing_since: None,
            delay,
            policy,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.choice, self.computing_since, self.revealed_value) {
            (None, _, _) => SelectionPhase::Unset,
            (Some(_), _, Some(_)) => SelectionPhase::Revealed,
            (Some(_), Some(_), None) => SelectionPhase::Computing,
            (Some(_), None, None) => SelectionPhase::Chosen,
        }
    }

    pub fn view(&self) -> SelectionView {
        SelectionView {
            choice: self.choice,
            revealed_value: self.revealed_value,
            is_computing: self.computing_since.is_some(),
        }
    }

    /// Record the choice. Only the first call counts.
    pub fn choose(&mut self, choice: Choice) -> bool {
        if self.phase() != SelectionPhase::Unset {
            return false;
        }
        self.choice = Some(choice);
        tracing::debug!(?choice, "Choice made");
        true
    }

    /// Start the reveal. Ignored unless a choice was made and nothing is
    /// pending or revealed yet.
    pub fn request_reveal(&mut self, now: Instant) -> bool {
        if self.phase() != SelectionPhase::Chosen {
            return false;
        }
        self.computing_since = Some(now);
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Reveal requested");
        true
    }

    /// Time left before a pending reveal resolves.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.computing_since
            .map(|since| self.delay.saturating_sub(now.saturating_duration_since(since)))
    }

    /// Resolve a pending reveal once its delay has passed. Returns the value
    /// only on the call that resolves it.
    pub fn tick(&mut self, now: Instant) -> Option<u8> {
        let since = self.computing_since?;
        if now.saturating_duration_since(since) < self.delay {
            return None;
        }
        let value = self.policy.draw().clamp(REVEAL_MIN, REVEAL_MAX);
        self.computing_since = None;
        self.revealed_value = Some(value);
        tracing::info!(value, "Number revealed");
        Some(value)
    }
}
