use crate::reward::RewardResult;
use crate::stability::StabilityEvent;
use serde::{Deserialize, Serialize};

/// What the presentation layer sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionEvent {
    Idle,
    Preparing {
        remaining_seconds: u32,
    },
    Active {
        elapsed_seconds: f32,
        stability: StabilityEvent,
    },
    Completed {
        reward: RewardResult,
    },
}

impl SessionEvent {
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionEvent::Completed { .. })
    }
}

/// Outbound collaborator for a running session.
pub trait SessionSink {
    fn on_event(&mut self, event: &SessionEvent);

    /// Persists a completed session's payout. Called exactly once per completion.
    fn award(&mut self, total_coins: u32, reason: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SessionSink for NullSink {
    fn on_event(&mut self, _event: &SessionEvent) {}

    fn award(&mut self, _total_coins: u32, _reason: &str) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Award {
    pub total_coins: u32,
    pub reason: String,
}

/// Records everything, in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventLog {
    pub events: Vec<SessionEvent>,
    pub awards: Vec<Award>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completions(&self) -> usize {
        self.events.iter().filter(|e| e.is_completed()).count()
    }

    pub fn last(&self) -> Option<&SessionEvent> {
        self.events.last()
    }

    /// The event stream with each run of `Active` updates collapsed to its first entry.
    pub fn transitions(&self) -> impl Iterator<Item = &SessionEvent> {
        let mut prev_active = false;
        self.events.iter().filter(move |e| {
            let is_active = matches!(e, SessionEvent::Active { .. });
            let keep = !(is_active && prev_active);
            prev_active = is_active;
            keep
        })
    }
}

impl SessionSink for EventLog {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.push(*event);
    }

    fn award(&mut self, total_coins: u32, reason: &str) {
        self.awards.push(Award {
            total_coins,
            reason: reason.to_string(),
        });
    }
}

impl<T: SessionSink + ?Sized> SessionSink for &mut T {
    fn on_event(&mut self, event: &SessionEvent) {
        (**self).on_event(event)
    }

    fn award(&mut self, total_coins: u32, reason: &str) {
        (**self).award(total_coins, reason)
    }
}
