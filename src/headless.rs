//! Headless presentation layer
//!
//! Stands in for the animation layer: it pays the rope out at extend speed,
//! reels it in at the weight-dependent retract speed, and sends the
//! completion signals when its "animations" finish. Used by the binary and
//! by the end-to-end tests.

use serde::{Deserialize, Serialize};

use crate::engine::Game;
use crate::sim::hook::HookState;
use crate::sim::state::{GameEvent, GameStatus};
use crate::sim::tick::CaptureResult;

/// Frame length of the simulated display (~60 fps)
pub const FRAME_MS: f32 = 16.0;

/// Rope animation state on the presentation side
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rope {
    Idle,
    /// Length drawn so far while paying out
    Extending(f32),
    Retracting(f32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub shots: u32,
    pub catches: u32,
    pub misses: u32,
    pub levels_cleared: u32,
    pub frames: u64,
}

/// Result of a headless session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub level: usize,
    pub score: i64,
    pub status: GameStatus,
    pub stats: RunStats,
    pub decisions: Vec<String>,
}

pub struct HeadlessDriver {
    frame_ms: f32,
    rope: Rope,
    stats: RunStats,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new(FRAME_MS)
    }
}

impl HeadlessDriver {
    pub fn new(frame_ms: f32) -> Self {
        Self {
            frame_ms: frame_ms.max(1.0),
            rope: Rope::Idle,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// One display frame: timers first, then the rope animation
    pub fn frame(&mut self, game: &mut Game) {
        let dt = self.frame_ms;
        self.stats.frames += 1;
        game.update(dt);

        let (hook_state, angle, length) = {
            let hook = &game.state().hook;
            (hook.state, hook.angle, hook.length)
        };
        let min_length = game.state().tuning.min_length;

        match (hook_state, self.rope) {
            (HookState::Swinging, _) => self.rope = Rope::Idle,
            (HookState::Extending, rope) => {
                let drawn = match rope {
                    Rope::Extending(drawn) => drawn,
                    _ => length,
                };
                let drawn = drawn + game.state().tuning.extend_speed * dt;
                self.rope = Rope::Extending(drawn);

                if let CaptureResult::Captured(id) = game.tick_extension(dt, angle, drawn) {
                    game.on_capture(id);
                }
            }
            (HookState::Pulling, _) => {
                game.tick_extension(dt, angle, length);
            }
            (HookState::Retracting, rope) => {
                let drawn = match rope {
                    Rope::Retracting(drawn) => drawn,
                    _ => length,
                };
                let drawn = drawn - game.state().retract_speed() * dt;
                if drawn <= min_length {
                    self.rope = Rope::Idle;
                    game.on_retract_complete();
                } else {
                    self.rope = Rope::Retracting(drawn);
                }
            }
        }

        self.tally(game.drain_events());
    }

    fn tally(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Fired { .. } => self.stats.shots += 1,
                GameEvent::Collected { .. } => self.stats.catches += 1,
                GameEvent::Missed { .. } => self.stats.misses += 1,
                GameEvent::LevelCompleted { .. } | GameEvent::GameCompleted { .. } => {
                    self.stats.levels_cleared += 1
                }
                _ => {}
            }
        }
    }

    /// Play the current level until it is no longer being played or
    /// `max_ms` of game time has passed.
    pub fn play_level(&mut self, game: &mut Game, max_ms: u64) -> GameStatus {
        let deadline = game.now_ms() + max_ms;
        while game.state().is_playing() && game.now_ms() < deadline {
            self.frame(game);
        }
        game.status()
    }

    /// Play from level `start` through at most `levels` levels
    pub fn play(&mut self, game: &mut Game, start: usize, levels: usize) -> RunSummary {
        game.start_level(start);
        let mut played = 1;

        loop {
            // A level can't outlast its clock; the slack covers the final retract
            let budget = (game.state().time_remaining as u64 + 5) * 1000;
            let status = self.play_level(game, budget);
            if status != GameStatus::LevelCompleted || played >= levels {
                break;
            }
            if game.advance_level().is_none() {
                break;
            }
            played += 1;
        }

        self.summary(game)
    }

    pub fn summary(&self, game: &Game) -> RunSummary {
        let state = game.state();
        RunSummary {
            seed: state.rng_state.seed,
            level: state.level_index,
            score: state.score,
            status: state.status,
            stats: self.stats.clone(),
            decisions: game.autoplay().decision_log().map(str::to_owned).collect(),
        }
    }
}
