//! Quick-time-event session: mash the escape key N times before the clock runs out.

use bevy::prelude::*;

use super::fsm::EscapeKey;

/// Result of advancing a session by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QteOutcome {
    Pending,
    /// Required presses reached while time remained.
    Escaped,
    /// Clock hit zero first.
    Failed,
}

/// Transient QTE state, owned by a guard in `GuardState::Contact`.
///
/// Invariants: `presses ∈ [0, required]`, `remaining ∈ [0, time_limit]`.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct QteSession {
    pub required: u32,
    pub presses: u32,
    pub time_limit: f32,
    pub remaining: f32,
    pub key: EscapeKey,
}

impl QteSession {
    pub fn new(required: u32, time_limit: f32, key: EscapeKey) -> Self {
        let time_limit = time_limit.max(0.0);
        Self {
            required: required.max(1),
            presses: 0,
            time_limit,
            remaining: time_limit,
            key,
        }
    }

    /// One frame: the clock runs first (clamped at zero), then the press is
    /// counted only if time is left, then success beats failure.
    pub fn advance(&mut self, delta: f32, pressed: bool) -> QteOutcome {
        self.remaining = (self.remaining - delta.max(0.0)).clamp(0.0, self.time_limit);

        if pressed && self.remaining > 0.0 {
            self.presses = (self.presses + 1).min(self.required);
        }

        if self.presses >= self.required && self.remaining > 0.0 {
            QteOutcome::Escaped
        } else if self.remaining <= 0.0 {
            QteOutcome::Failed
        } else {
            QteOutcome::Pending
        }
    }

    /// 0.0..=1.0, for the HUD bar.
    pub fn progress(&self) -> f32 {
        self.presses as f32 / self.required as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 0.1;

    #[test]
    fn test_escape_before_time_limit() {
        let mut session = QteSession::new(15, 5.0, EscapeKey::E);

        // 30 frames = 3.0s, a press on every second frame → 15 presses at 3.0s
        let mut outcome = QteOutcome::Pending;
        for frame in 1..=30 {
            outcome = session.advance(FRAME, frame % 2 == 0);
            if outcome != QteOutcome::Pending {
                break;
            }
        }

        assert_eq!(outcome, QteOutcome::Escaped);
        assert_eq!(session.presses, 15);
        assert!(session.remaining > 0.0);
    }

    #[test]
    fn test_failure_when_presses_run_short() {
        let mut session = QteSession::new(15, 5.0, EscapeKey::E);

        let mut outcome = QteOutcome::Pending;
        let mut frames = 0;
        while outcome == QteOutcome::Pending {
            frames += 1;
            // 10 presses in the first 10 frames, then nothing
            outcome = session.advance(FRAME, frames <= 10);
        }

        assert_eq!(outcome, QteOutcome::Failed);
        assert_eq!(session.presses, 10);
        assert_eq!(session.remaining, 0.0);
    }

    #[test]
    fn test_press_on_expiring_frame_does_not_count() {
        let mut session = QteSession::new(1, 0.5, EscapeKey::Space);
        assert_eq!(session.advance(0.5, true), QteOutcome::Failed);
        assert_eq!(session.presses, 0);
    }

    #[test]
    fn test_counters_are_clamped() {
        let mut session = QteSession::new(2, 1.0, EscapeKey::E);
        session.advance(-3.0, false); // negative delta ignored
        assert_eq!(session.remaining, 1.0);

        session.advance(0.1, true);
        session.advance(0.1, true);
        session.advance(0.1, true);
        assert_eq!(session.presses, 2);

        session.advance(50.0, false);
        assert_eq!(session.remaining, 0.0);
    }

    #[test]
    fn test_zero_required_is_raised_to_one() {
        let session = QteSession::new(0, 5.0, EscapeKey::E);
        assert_eq!(session.required, 1);
        assert_eq!(session.progress(), 0.0);
    }
}
