use crate::clock::sanitize_delta;
use crate::config::ChallengeConfig;
use crate::error::PhResult;
use crate::events::{EventLog, SessionEvent, SessionSink};
use crate::frame::PoseFrame;
use crate::reward::{RewardCalculator, RewardResult};
use crate::scorer::{FrameScorer, LandmarkScorer};
use crate::session::{HoldSample, Session, SessionState, SessionStateMachine, Transition};
use crate::stability::{StabilityEvent, StabilityFilter};
use crate::validation::Validate;
use std::mem::discriminant;
use tracing::{debug, info, warn};

/// Composition root: scorer -> stability filter -> state machine -> reward.
///
/// The caller drives time by calling `tick` once per vision/timer tick. The
/// controller spawns nothing and owns no timers.
pub struct SessionController<K = EventLog, S = LandmarkScorer> {
    name: String,
    scorer: S,
    filter: StabilityFilter,
    machine: SessionStateMachine,
    rewards: RewardCalculator,
    sink: K,
    reward: Option<RewardResult>,
    stability: StabilityEvent,
    last_countdown: u32,
    degraded_warned: bool,
}

impl<K: SessionSink> SessionController<K, LandmarkScorer> {
    /// Validates `config` and builds a controller using the geometric scorer.
    pub fn new(config: ChallengeConfig, sink: K) -> PhResult<Self> {
        config.validate()?;
        let scorer = LandmarkScorer {
            spec: config.pose.clone(),
        };
        Ok(Self::assemble(&config, scorer, sink))
    }
}

impl<K: SessionSink, S: FrameScorer> SessionController<K, S> {
    /// Builds a controller around a custom scorer.
    pub fn with_scorer(config: &ChallengeConfig, scorer: S, sink: K) -> PhResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, scorer, sink))
    }

    fn assemble(config: &ChallengeConfig, scorer: S, sink: K) -> Self {
        Self {
            name: config.name.clone(),
            scorer,
            filter: StabilityFilter::from_params(&config.session),
            machine: SessionStateMachine::from_params(&config.session),
            rewards: RewardCalculator::new(config.reward),
            sink,
            reward: None,
            stability: StabilityEvent::Unstable,
            last_countdown: 0,
            degraded_warned: false,
        }
    }

    pub fn start(&mut self) {
        if let Some(t) = self.machine.start() {
            self.reward = None;
            self.degraded_warned = false;
            self.filter.reset();
            info!("Challenge '{}' started", self.name);
            self.on_transition(t);
        }
    }

    pub fn cancel(&mut self) {
        if let Some(t) = self.machine.cancel() {
            self.filter.reset();
            info!("Challenge '{}' cancelled while {}", self.name, t.from);
            self.on_transition(t);
        }
    }

    pub fn reset(&mut self) {
        if let Some(t) = self.machine.reset() {
            self.filter.reset();
            self.reward = None;
            self.on_transition(t);
        }
    }

    /// Advances the session by one tick.
    ///
    /// `frame` is `None` when the vision collaborator produced nothing; such
    /// ticks score as failing every criterion. Returns the state after the tick.
    pub fn tick(&mut self, frame: Option<&PoseFrame>, delta_seconds: f64) -> SessionState {
        let dt = sanitize_delta(delta_seconds);

        match self.machine.state() {
            SessionState::Idle | SessionState::Completed => {}
            SessionState::Preparing => match self.machine.advance(dt, None) {
                Some(t) => self.on_transition(t),
                None => {
                    let remaining = self.machine.session().countdown_display();
                    if remaining != self.last_countdown {
                        self.last_countdown = remaining;
                        self.sink.on_event(&SessionEvent::Preparing {
                            remaining_seconds: remaining,
                        });
                    }
                }
            },
            SessionState::Active => {
                let score = match frame {
                    Some(f) => self.scorer.score(f),
                    None => self.scorer.empty_score(),
                };
                if score.degraded && frame.is_some() && !self.degraded_warned {
                    warn!(
                        "Frame is missing landmarks required by '{}'; scoring as zero",
                        self.name
                    );
                    self.degraded_warned = true;
                }

                let stability = self.filter.ingest(&score);
                if discriminant(&stability) != discriminant(&self.stability) {
                    debug!("Stability {:?} -> {:?}", self.stability, stability);
                }
                self.stability = stability;

                let sample = HoldSample {
                    stability,
                    confidence: score.overall_confidence,
                };
                let transition = self.machine.advance(dt, Some(sample));

                self.sink.on_event(&SessionEvent::Active {
                    elapsed_seconds: self.machine.session().elapsed_seconds(),
                    stability,
                });
                if let Some(t) = transition {
                    self.on_transition(t);
                }
            }
        }

        self.machine.state()
    }

    fn on_transition(&mut self, t: Transition) {
        debug!("Session {} -> {}", t.from, t.to);

        let event = match t.to {
            SessionState::Idle => SessionEvent::Idle,
            SessionState::Preparing => {
                self.last_countdown = self.machine.session().countdown_display();
                SessionEvent::Preparing {
                    remaining_seconds: self.last_countdown,
                }
            }
            SessionState::Active => {
                self.filter.reset();
                self.stability = StabilityEvent::Unstable;
                SessionEvent::Active {
                    elapsed_seconds: 0.0,
                    stability: StabilityEvent::Unstable,
                }
            }
            SessionState::Completed => {
                let reward = match self.reward {
                    Some(r) => r,
                    None => {
                        let session = self.machine.session();
                        let r = self
                            .rewards
                            .compute(session.elapsed_seconds(), &session.confidence_history);
                        self.reward = Some(r);
                        info!(
                            "Challenge '{}' completed: {:.1}s held, {} coins ({} base + {} bonus)",
                            self.name, r.duration_seconds, r.total_coins, r.base_coins, r.bonus_coins
                        );
                        self.sink.award(r.total_coins, &self.name);
                        r
                    }
                };
                SessionEvent::Completed { reward }
            }
        };

        self.sink.on_event(&event);
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    pub fn stability(&self) -> StabilityEvent {
        self.stability
    }

    /// The payout of the current session, once it has completed.
    pub fn reward(&self) -> Option<RewardResult> {
        self.reward
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}
