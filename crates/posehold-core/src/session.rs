use crate::config::SessionParams;
use crate::stability::StabilityEvent;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Preparing,
    Active,
    Completed,
}

/// The mutable state of one challenge attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: SessionState,
    pub countdown_remaining: Duration,
    pub elapsed_hold: Duration,
    pub target: Duration,
    pub confidence_history: Vec<f32>,
}

impl Session {
    fn idle(target: Duration) -> Self {
        Self {
            state: SessionState::Idle,
            countdown_remaining: Duration::ZERO,
            elapsed_hold: Duration::ZERO,
            target,
            confidence_history: Vec::new(),
        }
    }

    /// Countdown shown to the user, rounded up to whole seconds.
    pub fn countdown_display(&self) -> u32 {
        let d = self.countdown_remaining;
        let whole = d.as_secs() as u32;
        if d.subsec_nanos() > 0 {
            whole + 1
        } else {
            whole
        }
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_hold.as_secs_f32()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
}

/// Input for one `Active` tick: the debounced stability and the frame's
/// overall confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldSample {
    pub stability: StabilityEvent,
    pub confidence: f32,
}

/// Idle -> Preparing -> Active -> Completed, driven entirely by the caller.
///
/// The machine owns no timers. Every change happens in `start`, `cancel`,
/// `reset`, or `advance`, so identical call sequences reach identical states.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    session: Session,
    preparation: Duration,
}

impl SessionStateMachine {
    pub fn new(preparation: Duration, target: Duration) -> Self {
        Self {
            session: Session::idle(target),
            preparation,
        }
    }

    pub fn from_params(params: &SessionParams) -> Self {
        Self::new(
            Duration::from_secs(u64::from(params.preparation_seconds)),
            Duration::try_from_secs_f32(params.target_seconds).unwrap_or(Duration::ZERO),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Idle -> Preparing. Ignored in any other state.
    pub fn start(&mut self) -> Option<Transition> {
        if self.session.state != SessionState::Idle {
            return None;
        }
        self.session.countdown_remaining = self.preparation;
        self.transition(SessionState::Preparing)
    }

    /// Preparing/Active -> Idle, discarding all progress.
    pub fn cancel(&mut self) -> Option<Transition> {
        match self.session.state {
            SessionState::Preparing | SessionState::Active => {
                let target = self.session.target;
                let from = self.session.state;
                self.session = Session::idle(target);
                Some(Transition {
                    from,
                    to: SessionState::Idle,
                })
            }
            SessionState::Idle | SessionState::Completed => None,
        }
    }

    /// Any state -> Idle.
    pub fn reset(&mut self) -> Option<Transition> {
        let from = self.session.state;
        self.session = Session::idle(self.session.target);
        (from != SessionState::Idle).then_some(Transition {
            from,
            to: SessionState::Idle,
        })
    }

    /// Applies one tick of `dt`.
    ///
    /// `sample` is only consulted while `Active`. Hold time accrues only on
    /// `Held` ticks and is never taken away by instability.
    pub fn advance(&mut self, dt: Duration, sample: Option<HoldSample>) -> Option<Transition> {
        match self.session.state {
            SessionState::Idle | SessionState::Completed => None,
            SessionState::Preparing => {
                self.session.countdown_remaining =
                    self.session.countdown_remaining.saturating_sub(dt);
                if self.session.countdown_remaining.is_zero() {
                    self.session.elapsed_hold = Duration::ZERO;
                    self.session.confidence_history.clear();
                    self.transition(SessionState::Active)
                } else {
                    None
                }
            }
            SessionState::Active => {
                let sample = sample.filter(|s| s.stability.is_held())?;
                self.session.elapsed_hold += dt;
                self.session.confidence_history.push(sample.confidence);

                if self.session.elapsed_hold >= self.session.target {
                    self.session.elapsed_hold = self.session.target;
                    self.transition(SessionState::Completed)
                } else {
                    None
                }
            }
        }
    }

    fn transition(&mut self, to: SessionState) -> Option<Transition> {
        let from = self.session.state;
        self.session.state = to;
        Some(Transition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn held() -> Option<HoldSample> {
        Some(HoldSample {
            stability: StabilityEvent::Held,
            confidence: 0.9,
        })
    }

    fn active_machine(target_secs: u64) -> SessionStateMachine {
        let mut m = SessionStateMachine::new(Duration::from_secs(1), Duration::from_secs(target_secs));
        m.start();
        for _ in 0..10 {
            m.advance(TICK, None);
        }
        assert_eq!(m.state(), SessionState::Active);
        m
    }

    #[test]
    fn test_countdown_display_rounds_up() {
        let mut m = SessionStateMachine::new(Duration::from_secs(3), Duration::from_secs(30));
        m.start();
        assert_eq!(m.session().countdown_display(), 3);
        m.advance(TICK, None);
        assert_eq!(m.session().countdown_display(), 3);
        for _ in 0..10 {
            m.advance(TICK, None);
        }
        assert_eq!(m.session().countdown_display(), 2);
    }

    #[test]
    fn test_preparing_ignores_samples() {
        let mut m = SessionStateMachine::new(Duration::from_secs(3), Duration::from_secs(30));
        m.start();
        m.advance(TICK, held());
        assert_eq!(m.session().elapsed_hold, Duration::ZERO);
        assert!(m.session().confidence_history.is_empty());
    }

    #[test]
    fn test_unheld_tick_pauses() {
        let mut m = active_machine(30);
        for _ in 0..5 {
            m.advance(TICK, held());
        }
        let paused = Some(HoldSample {
            stability: StabilityEvent::Stabilizing(0.5),
            confidence: 0.9,
        });
        m.advance(TICK, paused);
        m.advance(TICK, None);
        assert_eq!(m.session().elapsed_hold, Duration::from_millis(500));
        assert_eq!(m.session().confidence_history.len(), 5);
    }

    #[test]
    fn test_completion_clamps_to_target() {
        let mut m = active_machine(1);
        let t = m.advance(Duration::from_millis(1500), held());
        assert_eq!(
            t,
            Some(Transition {
                from: SessionState::Active,
                to: SessionState::Completed
            })
        );
        assert_eq!(m.session().elapsed_hold, Duration::from_secs(1));
        assert_eq!(m.advance(TICK, held()), None);
    }

    #[test]
    fn test_cancel_and_reset_rules() {
        let mut m = SessionStateMachine::new(Duration::from_secs(3), Duration::from_secs(30));
        assert_eq!(m.cancel(), None);
        assert_eq!(m.reset(), None);
        m.start();
        assert!(m.start().is_none(), "start is ignored outside Idle");
        assert!(m.cancel().is_some());
        assert_eq!(m.state(), SessionState::Idle);
    }

    #[test]
    fn test_zero_preparation_enters_active_on_first_tick() {
        let mut m = SessionStateMachine::new(Duration::ZERO, Duration::from_secs(5));
        m.start();
        assert_eq!(m.state(), SessionState::Preparing);
        m.advance(Duration::ZERO, None);
        assert_eq!(m.state(), SessionState::Active);
    }
}
