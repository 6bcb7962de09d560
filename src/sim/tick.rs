//! Match controller
//!
//! Owns the ball, the barriers and the trace for one match and advances them
//! one tick at a time. Input gathered between ticks is applied at the start of
//! the next tick, so the resolver never sees barriers change mid-step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::barrier::{BarrierSet, Segment};
use super::collision::{CollisionReport, step_ball};
use super::outcome::{MatchOutcome, ReplayStoreRequest, ScoreUpdateRequest};
use super::state::{Arena, Ball, MatchConfig, MatchPhase, MatchResult, Player, RngState};
use super::trace::{PositionSample, TraceRecorder};
use crate::error::MatchError;
use crate::ms_to_secs;

/// Events collected since the previous tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Completed drag gestures, in the order they finished
    pub segments: Vec<Segment>,
    /// Latest size of the drawable surface
    pub resize: Option<Arena>,
    /// Host is leaving the match (back/exit)
    pub cancel: bool,
}

impl TickInput {
    /// Record a finished drag as a straight barrier from `start` to `end`
    pub fn gesture(&mut self, start: Vec2, end: Vec2) {
        self.segments.push(Segment::from_gesture(start, end));
    }

    pub fn resized(&mut self, width: f32, height: f32) {
        self.resize = Some(Arena::new(width, height));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What the presentation layer draws for the current tick
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub phase: MatchPhase,
    pub ball: Option<&'a Ball>,
    pub barriers: &'a [Segment],
    pub elapsed_ms: u64,
    /// Hull size as a percentage of the arena, 0 until something is enclosed
    pub enclosed_percent: f32,
    pub result: Option<MatchResult>,
}

/// One match, from waiting for an arena to its single result
#[derive(Debug, Clone)]
pub struct MatchState {
    config: MatchConfig,
    player: Player,
    rng_state: RngState,
    phase: MatchPhase,
    arena: Option<Arena>,
    ball: Option<Ball>,
    barriers: BarrierSet,
    recorder: TraceRecorder,
    started_at_ms: u64,
    last_tick_ms: u64,
    elapsed_ms: u64,
    last_contacts: CollisionReport,
    result: Option<MatchResult>,
}

impl MatchState {
    /// New idle match; `seed` picks the launch direction
    pub fn new(config: MatchConfig, player: Player, seed: u64) -> Self {
        Self {
            config: config.sanitized(),
            player,
            rng_state: RngState::new(seed),
            phase: MatchPhase::Idle,
            arena: None,
            ball: None,
            barriers: BarrierSet::new(),
            recorder: TraceRecorder::default(),
            started_at_ms: 0,
            last_tick_ms: 0,
            elapsed_ms: 0,
            last_contacts: CollisionReport::default(),
            result: None,
        }
    }

    /// Put the ball in play at the arena centre and start the clock
    pub fn start(&mut self, arena: Arena, now_ms: u64) -> Result<(), MatchError> {
        if self.phase != MatchPhase::Idle {
            return Err(MatchError::NotIdle { phase: self.phase });
        }
        if !arena.is_valid() {
            return Err(MatchError::InvalidArena {
                width: arena.width,
                height: arena.height,
            });
        }

        let mut rng = self.rng_state.to_rng();
        let mut ball = Ball::new(arena.center());
        ball.launch(self.config.speed_px_per_sec, &mut rng);

        self.barriers.clear();
        self.recorder.clear();
        self.recorder.sample(0, ball.pos);
        self.arena = Some(arena);
        self.ball = Some(ball);
        self.started_at_ms = now_ms;
        self.last_tick_ms = now_ms;
        self.elapsed_ms = 0;
        self.phase = MatchPhase::Running;

        log::info!(
            "Match started: {}x{} arena, level {}, close at {}%, limit {} ms",
            arena.width,
            arena.height,
            self.config.level,
            self.config.close_percent,
            self.config.time_limit_ms
        );
        Ok(())
    }

    /// Abandon the match without a result or any side effects
    pub fn cancel(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        log::info!("Match cancelled after {} ms", self.elapsed_ms);
        self.phase = MatchPhase::Cancelled;
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn arena(&self) -> Option<Arena> {
        self.arena
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn barriers(&self) -> &BarrierSet {
        &self.barriers
    }

    pub fn positions(&self) -> &[PositionSample] {
        self.recorder.positions()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Wall and barrier contacts during the most recent tick
    pub fn last_contacts(&self) -> CollisionReport {
        self.last_contacts
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn enclosed_percent(&self) -> f32 {
        self.arena
            .map(|arena| self.barriers.enclosed_area_ratio(arena.area()))
            .unwrap_or(0.0)
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            phase: self.phase,
            ball: self.ball.as_ref(),
            barriers: self.barriers.as_slice(),
            elapsed_ms: self.elapsed_ms,
            enclosed_percent: self.enclosed_percent(),
            result: self.result,
        }
    }

    fn apply_resize(&mut self, arena: Arena) {
        if !arena.is_valid() {
            log::warn!("Ignoring arena resize to {}x{}", arena.width, arena.height);
            return;
        }
        if self.arena != Some(arena) {
            log::debug!("Arena resized to {}x{}", arena.width, arena.height);
            self.arena = Some(arena);
        }
    }

    fn apply_segments(&mut self, segments: &[Segment]) {
        for segment in segments {
            if segment.is_finite() {
                self.barriers.append(*segment);
            } else {
                log::warn!("Dropping non-finite barrier {:?}", segment);
            }
        }
    }

    /// Enter a terminal phase and build the intents it calls for
    fn finish(&mut self, won: bool) -> MatchOutcome {
        let result = MatchResult {
            won,
            elapsed_ms: self.elapsed_ms,
        };
        self.result = Some(result);
        self.phase = if won { MatchPhase::Won } else { MatchPhase::Lost };

        let (score_update, replay) = if won {
            let score_update = self
                .player
                .is_improvement(self.elapsed_ms)
                .then(|| ScoreUpdateRequest {
                    username: self.player.username.clone(),
                    level: self.config.level,
                    close_percent: self.config.close_percent,
                    best_time_ms: self.elapsed_ms,
                });
            let replay = ReplayStoreRequest {
                username: self.player.username.clone(),
                level: self.config.level,
                replay: self.recorder.snapshot(&self.barriers),
            };
            (score_update, Some(replay))
        } else {
            (None, None)
        };

        log::info!(
            "Match {} after {} ms ({} barriers, {} samples{})",
            if won { "won" } else { "lost" },
            self.elapsed_ms,
            self.barriers.len(),
            self.recorder.len(),
            if score_update.is_some() { ", new best" } else { "" }
        );

        MatchOutcome {
            result,
            score_update,
            replay,
        }
    }
}

/// Advance the match to wall-clock time `now_ms`
///
/// Returns the outcome on the tick the match ends; `None` otherwise,
/// including every tick after it has ended.
pub fn tick(state: &mut MatchState, input: &TickInput, now_ms: u64) -> Option<MatchOutcome> {
    if state.phase.is_terminal() {
        return None;
    }
    if input.cancel {
        state.cancel();
        return None;
    }

    if state.phase == MatchPhase::Idle {
        let Some(arena) = input.resize else {
            if !input.segments.is_empty() {
                log::debug!("Ignoring {} barriers before start", input.segments.len());
            }
            return None;
        };
        if let Err(err) = state.start(arena, now_ms) {
            log::warn!("Cannot start match: {}", err);
            return None;
        }
    } else if let Some(arena) = input.resize {
        state.apply_resize(arena);
    }

    state.apply_segments(&input.segments);

    let (Some(arena), Some(ball)) = (state.arena, state.ball.as_mut()) else {
        return None;
    };

    let dt = ms_to_secs(now_ms.saturating_sub(state.last_tick_ms));
    state.last_tick_ms = now_ms;
    state.last_contacts = step_ball(ball, &arena, state.barriers.as_slice(), dt);
    state.elapsed_ms = now_ms.saturating_sub(state.started_at_ms);
    state.recorder.sample(state.elapsed_ms, ball.pos);

    let enclosed = state
        .barriers
        .enclosure(arena.area())
        .is_some_and(|percent| percent <= state.config.close_percent as f32);

    if enclosed {
        Some(state.finish(true))
    } else if state.elapsed_ms >= state.config.time_limit_ms {
        Some(state.finish(false))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;

    fn config(close_percent: u32, time_limit_ms: u64) -> MatchConfig {
        MatchConfig {
            speed_px_per_sec: 300.0,
            close_percent,
            time_limit_ms,
            level: 1,
        }
    }

    fn started(config: MatchConfig, player: Player) -> MatchState {
        let mut state = MatchState::new(config, player, 12345);
        state
            .start(Arena::new(1000.0, 1000.0), 0)
            .expect("valid arena");
        state
    }

    fn small_triangle() -> TickInput {
        let mut input = TickInput::default();
        input.gesture(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        input.gesture(Vec2::new(200.0, 100.0), Vec2::new(150.0, 200.0));
        input.gesture(Vec2::new(150.0, 200.0), Vec2::new(100.0, 100.0));
        input
    }

    #[test]
    fn test_idle_until_arena_known() {
        let mut state = MatchState::new(config(80, 30_000), Player::new("ana"), 1);
        assert!(tick(&mut state, &TickInput::default(), 0).is_none());
        assert_eq!(state.phase(), MatchPhase::Idle);

        let mut input = TickInput::default();
        input.resized(0.0, 800.0);
        tick(&mut state, &input, 5);
        assert_eq!(state.phase(), MatchPhase::Idle);
        assert!(state.ball().is_none());

        input.resized(600.0, 800.0);
        tick(&mut state, &input, 10);
        assert_eq!(state.phase(), MatchPhase::Running);
        let ball = state.ball().expect("ball in play");
        assert_eq!(ball.pos, Vec2::new(300.0, 400.0));
        assert!((ball.speed() - 300.0).abs() < 1e-3);
        assert_eq!(state.positions().len(), 1);
    }

    #[test]
    fn test_start_rejects_bad_arena_and_restart() {
        let mut state = MatchState::new(config(80, 30_000), Player::new("ana"), 1);
        assert_eq!(
            state.start(Arena::new(-1.0, 10.0), 0),
            Err(MatchError::InvalidArena {
                width: -1.0,
                height: 10.0
            })
        );
        assert_eq!(state.phase(), MatchPhase::Idle);

        state.start(Arena::new(10.0, 10.0), 0).unwrap();
        assert_eq!(
            state.start(Arena::new(10.0, 10.0), 0),
            Err(MatchError::NotIdle {
                phase: MatchPhase::Running
            })
        );
    }

    #[test]
    fn test_invalid_config_uses_defaults() {
        let bad = MatchConfig {
            speed_px_per_sec: 0.0,
            close_percent: 0,
            time_limit_ms: 0,
            level: 0,
        };
        let state = MatchState::new(bad, Player::new("ana"), 1);
        assert_eq!(*state.config(), MatchConfig::default());
    }

    #[test]
    fn test_time_limit_loses() {
        let mut state = started(config(80, 1_000), Player::new("ana"));
        let input = TickInput::default();

        let mut now = 0;
        let outcome = loop {
            now += TICK_MS;
            if let Some(outcome) = tick(&mut state, &input, now) {
                break outcome;
            }
            assert!(now < 2_000, "match never ended");
        };

        assert!(!outcome.result.won);
        assert!(outcome.result.elapsed_ms >= 1_000);
        assert!(outcome.result.elapsed_ms < 1_000 + TICK_MS);
        assert!(outcome.score_update.is_none());
        assert!(outcome.replay.is_none());
        assert_eq!(state.phase(), MatchPhase::Lost);
        assert_eq!(state.result(), Some(outcome.result));
    }

    #[test]
    fn test_enclosing_triangle_wins() {
        let mut state = started(config(80, 30_000), Player::new("ana"));
        assert!(tick(&mut state, &TickInput::default(), 16).is_none());

        let outcome = tick(&mut state, &small_triangle(), 32).expect("win");
        assert_eq!(
            outcome.result,
            MatchResult {
                won: true,
                elapsed_ms: 32
            }
        );
        let score = outcome.score_update.expect("first win is a best");
        assert_eq!(score.username, "ana");
        assert_eq!(score.best_time_ms, 32);
        assert_eq!(score.close_percent, 80);

        let replay = outcome.replay.expect("replay on win");
        assert_eq!(replay.replay.lines.len(), 3);
        assert_eq!(replay.replay.lines, state.barriers().snapshot());
        assert!(!replay.replay.positions.is_empty());
        assert_eq!(state.phase(), MatchPhase::Won);
    }

    #[test]
    fn test_slower_win_stores_replay_only() {
        let player = Player::new("ana").with_prior_best(Some(10));
        let mut state = started(config(80, 30_000), player);
        let outcome = tick(&mut state, &small_triangle(), 500).expect("win");
        assert!(outcome.result.won);
        assert!(outcome.score_update.is_none());
        assert!(outcome.replay.is_some());
    }

    #[test]
    fn test_large_hull_does_not_win() {
        // Hull covering the whole arena is above 80%
        let mut state = started(config(80, 30_000), Player::new("ana"));
        let mut input = TickInput::default();
        input.gesture(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0));
        input.gesture(Vec2::new(1000.0, 1000.0), Vec2::new(0.0, 1000.0));
        assert!(tick(&mut state, &input, 16).is_none());
        assert_eq!(state.phase(), MatchPhase::Running);
        assert!((state.enclosed_percent() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_barrier_does_not_win() {
        let mut state = started(config(80, 30_000), Player::new("ana"));
        let mut input = TickInput::default();
        input.gesture(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        assert!(tick(&mut state, &input, 16).is_none());
        assert_eq!(state.phase(), MatchPhase::Running);
    }

    #[test]
    fn test_collinear_barriers_win() {
        // Four distinct endpoints on one line: a flat hull at 0% is under 80%
        let mut state = started(config(80, 30_000), Player::new("ana"));
        let mut input = TickInput::default();
        input.gesture(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        input.gesture(Vec2::new(200.0, 0.0), Vec2::new(300.0, 0.0));

        let outcome = tick(&mut state, &input, 16).expect("flat hull wins");
        assert!(outcome.result.won);
        assert_eq!(outcome.result.elapsed_ms, 16);
        assert_eq!(state.phase(), MatchPhase::Won);
        assert_eq!(state.enclosed_percent(), 0.0);
    }

    #[test]
    fn test_ticks_after_end_are_noops() {
        let mut state = started(config(80, 30_000), Player::new("ana"));
        assert!(tick(&mut state, &small_triangle(), 16).is_some());

        let ball_pos = state.ball().unwrap().pos;
        let barriers = state.barriers().snapshot();
        let result = state.result();

        let mut more = small_triangle();
        more.resized(50.0, 50.0);
        for now in [32, 48, 5_000] {
            assert!(tick(&mut state, &more, now).is_none());
        }
        assert_eq!(state.ball().unwrap().pos, ball_pos);
        assert_eq!(state.barriers().snapshot(), barriers);
        assert_eq!(state.result(), result);
        assert_eq!(state.arena(), Some(Arena::new(1000.0, 1000.0)));
    }

    #[test]
    fn test_cancel_has_no_result() {
        let mut state = started(config(80, 1_000), Player::new("ana"));
        tick(&mut state, &TickInput::default(), 16);

        let cancel = TickInput {
            cancel: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &cancel, 32).is_none());
        assert_eq!(state.phase(), MatchPhase::Cancelled);

        // Even a winning input or an expired clock produce nothing now
        assert!(tick(&mut state, &small_triangle(), 5_000).is_none());
        assert!(state.result().is_none());
    }

    #[test]
    fn test_segments_ignored_while_idle() {
        let mut state = MatchState::new(config(80, 30_000), Player::new("ana"), 1);
        tick(&mut state, &small_triangle(), 0);
        assert!(state.barriers().is_empty());
    }

    #[test]
    fn test_stall_still_times_out() {
        let mut state = started(config(80, 1_000), Player::new("ana"));
        let before = state.ball().unwrap().pos;

        let outcome = tick(&mut state, &TickInput::default(), 5_000).expect("timeout");
        assert!(!outcome.result.won);
        assert_eq!(outcome.result.elapsed_ms, 5_000);

        // Movement was capped at one clamped step
        let moved = (state.ball().unwrap().pos - before).length();
        assert!(moved <= 300.0 * crate::consts::MAX_TICK_DT + 1e-3);
    }

    #[test]
    fn test_resize_while_running() {
        let mut state = started(config(80, 30_000), Player::new("ana"));
        let mut input = TickInput::default();
        input.resized(-5.0, 100.0);
        tick(&mut state, &input, 16);
        assert_eq!(state.arena(), Some(Arena::new(1000.0, 1000.0)));

        input.resized(800.0, 600.0);
        tick(&mut state, &input, 32);
        assert_eq!(state.arena(), Some(Arena::new(800.0, 600.0)));
    }

    #[test]
    fn test_trace_cadence_over_200ms() {
        let mut state = started(config(80, 30_000), Player::new("ana"));
        let input = TickInput::default();
        let mut now = 0;
        while now + TICK_MS <= 200 {
            now += TICK_MS;
            tick(&mut state, &input, now);
        }
        // Start sample plus one roughly every 50 ms, not one per tick
        let offsets: Vec<u64> = state.positions().iter().map(|s| s.t_offset_ms).collect();
        assert_eq!(offsets, vec![0, 64, 128, 192]);
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut a = started(config(80, 30_000), Player::new("ana"));
        let mut b = started(config(80, 30_000), Player::new("ana"));
        let input = TickInput::default();
        for now in (16..=640).step_by(16) {
            tick(&mut a, &input, now);
            tick(&mut b, &input, now);
        }
        assert_eq!(a.ball().unwrap().pos, b.ball().unwrap().pos);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_view_reflects_state() {
        let mut state = started(config(80, 30_000), Player::new("ana"));
        let mut input = TickInput::default();
        input.gesture(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        tick(&mut state, &input, 16);

        let view = state.view();
        assert_eq!(view.phase, MatchPhase::Running);
        assert_eq!(view.barriers.len(), 1);
        assert_eq!(view.elapsed_ms, 16);
        assert_eq!(view.enclosed_percent, 0.0);
        assert!(view.ball.is_some());
        assert!(view.result.is_none());
    }
}
