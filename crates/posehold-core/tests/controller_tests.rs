mod common;

use common::*;
use posehold_core::config::BonusSchedule;
use posehold_core::events::{EventLog, SessionEvent};
use posehold_core::frame::PoseFrame;
use posehold_core::presets::Challenge;
use posehold_core::session::SessionState;
use posehold_core::stability::StabilityEvent;
use posehold_core::{PoseHoldError, SessionController};

type Controller = SessionController<EventLog>;

fn controller(window: usize, hold: usize, target: f32, rate: f32) -> Controller {
    SessionController::new(plank_config(window, hold, target, rate), EventLog::new()).unwrap()
}

fn feed(ctrl: &mut Controller, frame: Option<&PoseFrame>, ticks: usize) -> SessionState {
    let mut state = ctrl.state();
    for _ in 0..ticks {
        state = ctrl.tick(frame, TICK);
    }
    state
}

/// Starts the session and runs out the default 3 s countdown.
fn activate(ctrl: &mut Controller) {
    ctrl.start();
    assert_eq!(feed(ctrl, None, 30), SessionState::Active);
}

#[test]
fn test_full_hold_pays_base_rate() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    activate(&mut ctrl);

    let good = good_plank();
    let mut first_held = None;
    let mut active_ticks = 0;
    while ctrl.state() == SessionState::Active && active_ticks < 1_000 {
        ctrl.tick(Some(&good), TICK);
        active_ticks += 1;
        if first_held.is_none() && ctrl.stability().is_held() {
            first_held = Some(active_ticks);
        }
    }

    // quorum of 6 reached on tick 6, then 15 stable windows
    assert_eq!(first_held, Some(20));
    assert_eq!(active_ticks, 319);
    assert_eq!(ctrl.state(), SessionState::Completed);

    let reward = ctrl.reward().unwrap();
    assert_eq!(reward.base_coins, 60);
    assert_eq!(reward.bonus_coins, 0);
    assert_eq!(reward.total_coins, 60);
    assert_eq!(reward.duration_seconds, 30.0);

    let log = ctrl.sink();
    assert_eq!(log.awards.len(), 1);
    assert_eq!(log.awards[0].total_coins, 60);
    assert_eq!(log.awards[0].reason, "plank");
    assert!(matches!(log.last(), Some(SessionEvent::Completed { reward: r }) if r.base_coins == 60));
}

#[test]
fn test_instability_pauses_without_resetting() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    activate(&mut ctrl);

    let good = good_plank();
    let bad = sagging_plank();
    feed(&mut ctrl, Some(&good), 19);
    assert!(!ctrl.stability().is_held());
    feed(&mut ctrl, Some(&good), 98);
    assert!((ctrl.session().elapsed_seconds() - 9.8).abs() < 1e-4);

    // two failures still sit inside the 6-of-8 quorum
    feed(&mut ctrl, Some(&bad), 2);
    assert_eq!(ctrl.session().elapsed_seconds(), 10.0);
    assert!(ctrl.stability().is_held());

    let state = feed(&mut ctrl, Some(&bad), 18);
    assert_eq!(state, SessionState::Active);
    assert_eq!(ctrl.stability(), StabilityEvent::Unstable);
    assert_eq!(ctrl.session().elapsed_seconds(), 10.0);

    // recovery has to rebuild the quorum and the hold streak from scratch
    feed(&mut ctrl, Some(&good), 19);
    assert_eq!(ctrl.session().elapsed_seconds(), 10.0);
    feed(&mut ctrl, Some(&good), 1);
    assert!((ctrl.session().elapsed_seconds() - 10.1).abs() < 1e-4);
}

#[test]
fn test_cancel_during_countdown() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    ctrl.start();
    ctrl.tick(None, 1.0);
    assert_eq!(ctrl.state(), SessionState::Preparing);
    assert_eq!(ctrl.session().countdown_display(), 2);

    ctrl.cancel();
    assert_eq!(ctrl.state(), SessionState::Idle);
    assert_eq!(ctrl.reward(), None);

    let log = ctrl.sink();
    assert!(log.awards.is_empty());
    assert_eq!(log.completions(), 0);
    assert_eq!(log.last(), Some(&SessionEvent::Idle));
}

#[test]
fn test_cancel_during_active_discards_progress() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    activate(&mut ctrl);
    feed(&mut ctrl, Some(&good_plank()), 60);
    assert!(ctrl.session().elapsed_seconds() > 0.0);

    ctrl.cancel();
    assert_eq!(ctrl.state(), SessionState::Idle);
    assert_eq!(ctrl.session().elapsed_seconds(), 0.0);
    assert!(ctrl.session().confidence_history.is_empty());
    assert!(ctrl.sink().awards.is_empty());
}

#[test]
fn test_countdown_events_once_per_second() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    activate(&mut ctrl);

    let countdown: Vec<u32> = ctrl
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Preparing { remaining_seconds } => Some(*remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(countdown, vec![3, 2, 1]);
    assert!(matches!(
        ctrl.sink().last(),
        Some(SessionEvent::Active { elapsed_seconds, .. }) if *elapsed_seconds == 0.0
    ));
}

#[test]
fn test_idle_ticks_never_transition() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    for dt in [0.1, 5.0, -1.0, f64::NAN, 0.0] {
        assert_eq!(ctrl.tick(None, dt), SessionState::Idle);
        assert_eq!(ctrl.tick(Some(&good_plank()), dt), SessionState::Idle);
    }
    assert!(ctrl.sink().events.is_empty());
}

#[test]
fn test_missing_frames_are_unstable() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    activate(&mut ctrl);
    feed(&mut ctrl, Some(&good_plank()), 25);
    let before = ctrl.session().elapsed_seconds();

    feed(&mut ctrl, None, 10);
    assert_eq!(ctrl.stability(), StabilityEvent::Unstable);
    assert_eq!(ctrl.state(), SessionState::Active);
    // at most the two quorum-tolerated ticks accrue
    assert!(ctrl.session().elapsed_seconds() <= before + 0.2 + 1e-4);
}

#[test]
fn test_negative_delta_is_clamped() {
    let mut ctrl = controller(8, 15, 30.0, 2.0);
    activate(&mut ctrl);
    let good = good_plank();
    feed(&mut ctrl, Some(&good), 25);
    let before = ctrl.session().elapsed_seconds();

    ctrl.tick(Some(&good), -0.5);
    ctrl.tick(Some(&good), f64::INFINITY);
    assert_eq!(ctrl.session().elapsed_seconds(), before);
    assert_eq!(ctrl.state(), SessionState::Active);
}

#[test]
fn test_completion_is_awarded_once() {
    let mut ctrl = controller(4, 2, 1.0, 2.0);
    activate(&mut ctrl);
    let good = good_plank();
    assert_eq!(feed(&mut ctrl, Some(&good), 40), SessionState::Completed);

    let reward = ctrl.reward();
    feed(&mut ctrl, Some(&good), 20);
    feed(&mut ctrl, None, 20);
    ctrl.start();
    ctrl.cancel();

    assert_eq!(ctrl.state(), SessionState::Completed);
    assert_eq!(ctrl.reward(), reward);
    assert_eq!(ctrl.sink().awards.len(), 1);
    assert_eq!(ctrl.sink().completions(), 1);
}

#[test]
fn test_reset_allows_a_second_attempt() {
    let mut ctrl = controller(4, 2, 1.0, 2.0);
    let good = good_plank();

    for round in 1..=2 {
        activate(&mut ctrl);
        assert_eq!(feed(&mut ctrl, Some(&good), 40), SessionState::Completed);
        assert_eq!(ctrl.sink().awards.len(), round);
        ctrl.reset();
        assert_eq!(ctrl.state(), SessionState::Idle);
        assert_eq!(ctrl.reward(), None);
    }
    assert_eq!(ctrl.sink().completions(), 2);
}

#[test]
fn test_zero_preparation_goes_active_on_first_tick() {
    let mut config = plank_config(8, 15, 30.0, 2.0);
    config.session.preparation_seconds = 0;
    let mut ctrl = SessionController::new(config, EventLog::new()).unwrap();

    ctrl.start();
    assert_eq!(ctrl.state(), SessionState::Preparing);
    assert_eq!(ctrl.tick(None, 0.0), SessionState::Active);
}

#[test]
fn test_cross_pose_adds_rounded_bonus() {
    let config = Challenge::CrossPose.config();
    assert_eq!(config.reward.bonus, BonusSchedule::Rounded { divisor: 5.0 });
    let mut ctrl = SessionController::new(config, EventLog::new()).unwrap();
    activate(&mut ctrl);

    let good = posehold_core::simulate::ideal_pose(Challenge::CrossPose);
    assert_eq!(feed(&mut ctrl, Some(&good), 300), SessionState::Completed);

    let reward = ctrl.reward().unwrap();
    assert_eq!(reward.base_coins, 20);
    assert_eq!(reward.bonus_coins, 20);
    assert_eq!(reward.total_coins, 40);
    assert_eq!(ctrl.sink().awards[0].reason, "cross_pose");
}

#[test]
fn test_custom_scorer_drives_the_same_pipeline() {
    let config = plank_config(4, 3, 0.5, 10.0);
    let mut ctrl = SessionController::with_scorer(&config, ConfidenceScorer, EventLog::new()).unwrap();
    ctrl.start();
    for _ in 0..30 {
        ctrl.tick(None, TICK);
    }

    let pass = confidence_frame(0.8);
    let mut ticks = 0;
    while ctrl.state() == SessionState::Active && ticks < 100 {
        ctrl.tick(Some(&pass), TICK);
        ticks += 1;
    }
    // quorum 3 of 4 on tick 3, held on tick 5, five held ticks to 0.5 s
    assert_eq!(ticks, 9);
    assert_eq!(ctrl.reward().unwrap().base_coins, 5);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = plank_config(8, 15, 30.0, 2.0);
    config.pose.criteria[0].weight = 0.9;
    let err = SessionController::new(config, EventLog::new()).err().unwrap();
    assert!(matches!(err, PoseHoldError::Config(_)));
}

#[test]
fn test_transition_stream() {
    let mut ctrl = controller(4, 2, 0.3, 2.0);
    activate(&mut ctrl);
    feed(&mut ctrl, Some(&good_plank()), 20);

    let states: Vec<&str> = ctrl
        .sink()
        .transitions()
        .map(|e| match e {
            SessionEvent::Idle => "idle",
            SessionEvent::Preparing { .. } => "preparing",
            SessionEvent::Active { .. } => "active",
            SessionEvent::Completed { .. } => "completed",
        })
        .collect();
    assert_eq!(
        states,
        vec!["preparing", "preparing", "preparing", "active", "completed"]
    );
}
