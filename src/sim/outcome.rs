//! What a finished match asks the outside world to do
//!
//! The engine never writes scores or replays itself. A win produces intents
//! that the host carries out after the tick returns.

use serde::{Deserialize, Serialize};

use super::state::MatchResult;
use super::trace::Replay;

/// New personal best for a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdateRequest {
    pub username: String,
    pub level: u32,
    pub close_percent: u32,
    pub best_time_ms: u64,
}

/// Replay of a won match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStoreRequest {
    pub username: String,
    pub level: u32,
    pub replay: Replay,
}

/// Terminal result plus any side effects it calls for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub result: MatchResult,
    /// Only on a win that beats the player's prior best
    pub score_update: Option<ScoreUpdateRequest>,
    /// Only on a win
    pub replay: Option<ReplayStoreRequest>,
}

impl MatchOutcome {
    /// Hand the intents to `host`, score first
    pub fn dispatch<H: MatchHost + ?Sized>(&self, host: &mut H) {
        if let Some(score) = &self.score_update {
            host.report_score(score);
        }
        if let Some(replay) = &self.replay {
            host.store_replay(replay);
        }
    }
}

/// Leaderboard and replay collaborators
pub trait MatchHost {
    fn report_score(&mut self, request: &ScoreUpdateRequest);
    fn store_replay(&mut self, request: &ReplayStoreRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls(Vec<&'static str>);

    impl MatchHost for Calls {
        fn report_score(&mut self, _: &ScoreUpdateRequest) {
            self.0.push("score");
        }
        fn store_replay(&mut self, _: &ReplayStoreRequest) {
            self.0.push("replay");
        }
    }

    #[test]
    fn test_dispatch_loss_does_nothing() {
        let outcome = MatchOutcome {
            result: MatchResult {
                won: false,
                elapsed_ms: 1_000,
            },
            score_update: None,
            replay: None,
        };
        let mut calls = Calls::default();
        outcome.dispatch(&mut calls);
        assert!(calls.0.is_empty());
    }

    #[test]
    fn test_dispatch_order() {
        let outcome = MatchOutcome {
            result: MatchResult {
                won: true,
                elapsed_ms: 800,
            },
            score_update: Some(ScoreUpdateRequest {
                username: "ana".into(),
                level: 2,
                close_percent: 80,
                best_time_ms: 800,
            }),
            replay: Some(ReplayStoreRequest {
                username: "ana".into(),
                level: 2,
                replay: Replay::default(),
            }),
        };
        let mut calls = Calls::default();
        outcome.dispatch(&mut calls);
        assert_eq!(calls.0, vec!["score", "replay"]);
    }
}
