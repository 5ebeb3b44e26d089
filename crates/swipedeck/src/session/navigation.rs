use crate::deck::SlideRegistry;

/// Which way the last move went. Only the transition animation reads this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub position: usize,
    pub last_direction: Direction,
}

/// Owns the slide position. Every operation is total: a move that would leave
/// the deck or skip a gated slide is silently ignored.
#[derive(Debug, Clone)]
pub struct NavigationController {
    state: NavigationState,
    /// `forward_requires_action` per position, copied out of the registry.
    gates: Vec<bool>,
}

impl NavigationController {
    pub fn new(registry: &SlideRegistry) -> Self {
        Self {
            state: NavigationState::default(),
            gates: registry
                .iter()
                .map(|s| s.descriptor.forward_requires_action)
                .collect(),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn size(&self) -> usize {
        self.gates.len()
    }

    pub fn is_last(&self) -> bool {
        self.state.position + 1 >= self.size()
    }

    /// True when the current slide can only be left forward through its own action.
    pub fn is_gated(&self) -> bool {
        self.gates
            .get(self.state.position)
            .copied()
            .unwrap_or(false)
    }

    pub fn can_advance(&self) -> bool {
        !self.is_last() && !self.is_gated()
    }

    pub fn can_retreat(&self) -> bool {
        self.state.position > 0
    }

    /// Move one slide forward unless at the end or on a gated slide.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.step_forward();
        true
    }

    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.state.last_direction = Direction::Backward;
        self.state.position -= 1;
        tracing::debug!(position = self.state.position, "Retreated");
        true
    }

    /// Move forward past a gate. Still bounded by the last slide.
    pub(crate) fn advance_through_gate(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.step_forward();
        true
    }

    /// Place the session on `position` without animation, clamped to the deck.
    /// Used for the start slide; never skips forward past a gate.
    pub fn jump_to(&mut self, position: usize) {
        let mut target = position.min(self.size().saturating_sub(1));
        if let Some(gate) = self.gates.iter().position(|g| *g) {
            target = target.min(gate);
        }
        self.state = NavigationState {
            position: target,
            last_direction: Direction::None,
        };
    }

    fn step_forward(&mut self) {
        self.state.last_direction = Direction::Forward;
        self.state.position += 1;
        tracing::debug!(position = self.state.position, "Advanced");
    }
}
