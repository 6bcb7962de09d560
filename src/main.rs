//! Ball Trap headless driver
//!
//! Plays one match in real time at the host tick cadence with a scripted
//! player, then prints the result as JSON.
//!
//! Usage: `ball-trap [settings.json] [username]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::time::{Duration, Instant};

    use glam::Vec2;

    use ball_trap::consts::TICK_MS;
    use ball_trap::sim::{Arena, MatchState, TickInput, tick};
    use ball_trap::{Records, Settings, format_seconds};

    /// Phone-sized arena in portrait
    const ARENA: Arena = Arena {
        width: 720.0,
        height: 1280.0,
    };
    /// Wait before the first stroke, then between strokes
    const FIRST_STROKE_MS: u64 = 1_000;
    const STROKE_GAP_MS: u64 = 400;
    const TRIANGLE_SIZE: f32 = 120.0;

    /// Draws a small triangle in the quadrant farthest from the ball, one edge at a time
    struct ScriptedPlayer {
        strokes: Vec<(Vec2, Vec2)>,
        next_at_ms: u64,
    }

    impl ScriptedPlayer {
        fn new() -> Self {
            Self {
                strokes: Vec::new(),
                next_at_ms: FIRST_STROKE_MS,
            }
        }

        fn plan(&mut self, ball: Vec2) {
            let center = Vec2::new(ARENA.width, ARENA.height) / 2.0;
            let away = Vec2::new(
                if ball.x < center.x { 0.75 } else { 0.25 },
                if ball.y < center.y { 0.75 } else { 0.25 },
            );
            let anchor = Vec2::new(ARENA.width, ARENA.height) * away;
            let half = TRIANGLE_SIZE / 2.0;
            let a = anchor + Vec2::new(-half, half);
            let b = anchor + Vec2::new(half, half);
            let c = anchor + Vec2::new(0.0, -half);
            // Drawn in reverse so `pop` yields a -> b first
            self.strokes = vec![(c, a), (b, c), (a, b)];
            log::debug!("Planned triangle around {:?}", anchor);
        }

        fn act(&mut self, state: &MatchState, elapsed_ms: u64, input: &mut TickInput) {
            if elapsed_ms < self.next_at_ms {
                return;
            }
            if self.strokes.is_empty() {
                if let Some(ball) = state.ball() {
                    self.plan(ball.pos);
                }
            }
            if let Some((start, end)) = self.strokes.pop() {
                input.gesture(start, end);
                self.next_at_ms = elapsed_ms + STROKE_GAP_MS;
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Ball Trap (headless) starting...");

        let mut args = std::env::args().skip(1);
        let settings = args
            .next()
            .map(|path| Settings::load(Path::new(&path)))
            .unwrap_or_default();
        let username = args.next().unwrap_or_else(|| "player".to_string());

        let config = settings.match_config();
        let mut records = Records::new();
        let seed: u64 = rand::random();
        log::info!("Match seed: {}", seed);

        let mut state = MatchState::new(config, records.player(&username, config.level), seed);
        let mut bot = ScriptedPlayer::new();
        let mut input = TickInput::default();
        input.resize = Some(ARENA);

        let clock = Instant::now();
        let outcome = loop {
            let now_ms = clock.elapsed().as_millis() as u64;
            bot.act(&state, state.elapsed_ms(), &mut input);

            let outcome = tick(&mut state, &input, now_ms);
            input.clear();
            if let Some(outcome) = outcome {
                break outcome;
            }

            let contacts = state.last_contacts();
            if contacts.any() {
                log::debug!(
                    "Bounce at {} ms ({} wall, {} barrier)",
                    state.elapsed_ms(),
                    contacts.wall_hits,
                    contacts.barrier_hits
                );
            }
            std::thread::sleep(Duration::from_millis(TICK_MS));
        };

        outcome.dispatch(&mut records);

        let verdict = if outcome.result.won { "Trapped" } else { "Escaped" };
        log::info!("{} in {}", verdict, format_seconds(outcome.result.elapsed_ms));
        if let Some(best) = records.best_time(&username, config.level) {
            log::info!("Best on level {}: {}", config.level, format_seconds(best));
        }
        for stored in records.replays_for(&username) {
            log::info!(
                "Replay on level {}: {} of trace, {} barriers",
                stored.level,
                format_seconds(stored.replay.duration_ms()),
                stored.replay.lines.len()
            );
        }

        match serde_json::to_string_pretty(&outcome.result) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to encode result: {}", err),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
