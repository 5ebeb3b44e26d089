use std::time::Instant;

use crate::session::navigation::Direction;

pub const TRANSITION_DURATION: f32 = 0.35;

/// Scale of a card while it is fully off-center.
pub const OFFSTAGE_SCALE: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Forward,
    Backward,
}

impl TransitionDirection {
    pub fn from_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::Forward => Some(Self::Forward),
            Direction::Backward => Some(Self::Backward),
            Direction::None => None,
        }
    }
}

/// Where and how to draw one card on a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFrame {
    pub offset: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl CardFrame {
    pub const CENTER: Self = Self {
        offset: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct ActiveTransition {
    pub from: usize,
    pub to: usize,
    pub direction: TransitionDirection,
    pub start: Instant,
}

impl ActiveTransition {
    pub fn new(from: usize, to: usize, direction: TransitionDirection, start: Instant) -> Self {
        Self {
            from,
            to,
            direction,
            start,
        }
    }

    pub fn progress(&self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.start).as_secs_f32() / TRANSITION_DURATION;
        ease_in_out(raw.clamp(0.0, 1.0))
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start).as_secs_f32() >= TRANSITION_DURATION
    }

    /// Outgoing and incoming card placement. Forward slides the new card in
    /// from the right, backward from the left.
    pub fn frames(&self, now: Instant, width: f32) -> (CardFrame, CardFrame) {
        let progress = self.progress(now);
        let sign = match self.direction {
            TransitionDirection::Forward => -1.0,
            TransitionDirection::Backward => 1.0,
        };
        let from_offset = sign * progress * width;
        let to_offset = from_offset - sign * width;
        let shrink = 1.0 - OFFSTAGE_SCALE;

        let outgoing = CardFrame {
            offset: from_offset,
            opacity: 1.0 - progress,
            scale: 1.0 - shrink * progress,
        };
        let incoming = CardFrame {
            offset: to_offset,
            opacity: progress,
            scale: OFFSTAGE_SCALE + shrink * progress,
        };
        (outgoing, incoming)
    }
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert!(approx(ease_in_out(0.0), 0.0));
        assert!(approx(ease_in_out(0.5), 0.5));
        assert!(approx(ease_in_out(1.0), 1.0));
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_forward_enters_from_right() {
        let start = Instant::now();
        let t = ActiveTransition::new(0, 1, TransitionDirection::Forward, start);
        let (out, inc) = t.frames(start, 400.0);
        assert!(approx(out.offset, 0.0));
        assert!(approx(inc.offset, 400.0));
        assert!(approx(inc.opacity, 0.0));
        assert!(approx(inc.scale, OFFSTAGE_SCALE));

        let end = start + Duration::from_millis(400);
        let (out, inc) = t.frames(end, 400.0);
        assert!(approx(out.offset, -400.0));
        assert!(approx(out.opacity, 0.0));
        assert!(approx(inc.offset, CardFrame::CENTER.offset));
        assert!(approx(inc.opacity, CardFrame::CENTER.opacity));
        assert!(approx(inc.scale, CardFrame::CENTER.scale));
        assert!(t.is_complete(end));
    }

    #[test]
    fn test_backward_enters_from_left() {
        let start = Instant::now();
        let t = ActiveTransition::new(3, 2, TransitionDirection::Backward, start);
        let (_, inc) = t.frames(start, 300.0);
        assert!(approx(inc.offset, -300.0));
        assert!(!t.is_complete(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(
            TransitionDirection::from_direction(Direction::Forward),
            Some(TransitionDirection::Forward)
        );
        assert_eq!(TransitionDirection::from_direction(Direction::None), None);
    }
}
