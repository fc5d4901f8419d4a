//! Hook state machine and session bookkeeping
//!
//! The presentation layer owns timing: it animates the rope, reports the
//! current angle/length through `tick_extension`, and signals the end of
//! its animations through `on_capture` and `on_retract_complete`. Score and
//! collected flags are only committed from those completion signals.

use serde::{Deserialize, Serialize};

use super::collision::sweep_capture;
use super::hook::{Hook, HookState, retract_duration_ms, retract_speed};
use super::item::{ItemId, ItemKind};
use super::level::generate_items;
use super::state::{GameEvent, GameState, GameStatus};
use crate::clamp_angle;

/// What the animation layer should do after an extension frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureResult {
    /// Hook is neither extending nor pulling
    Idle,
    /// Keep paying out rope
    Continue,
    /// The tip touched this item; play the catch and call `on_capture`
    Captured(ItemId),
    /// Maximum length reached empty-handed; the hook is now retracting
    Exhausted,
    /// Pull pause still running
    Pulling,
    /// Pause over; the hook is now retracting with this item
    Reeling(ItemId),
}

/// An item committed to the score by `on_retract_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collected {
    pub id: ItemId,
    pub kind: ItemKind,
    pub value: i32,
}

impl GameState {
    /// Generate and enter level `index`, keeping the cumulative score
    pub fn start_level(&mut self, index: usize) {
        let mut rng = self.rng_state.next_rng();
        let bounds = self.playfield.mine_bounds();
        self.items = generate_items(index, bounds, &self.levels, &mut rng);
        self.items.sort_by_key(|i| i.id);

        self.level_index = index;
        let (target, time) = self
            .level_config()
            .map(|cfg| (cfg.target_score, cfg.time_limit))
            .unwrap_or((0, 0));

        self.target_score = target;
        self.time_remaining = time;
        self.hook = Hook::new(&self.tuning);
        self.status = GameStatus::Playing;

        log::info!(
            "Level {}: target {}, {}s, {} items",
            index + 1,
            self.target_score,
            self.time_remaining,
            self.items.len()
        );
        self.push_event(GameEvent::LevelStarted {
            level: index,
            items: self.items.len(),
        });
    }

    /// Move on from a completed level. No-op in any other status.
    pub fn advance_level(&mut self) -> bool {
        if self.status != GameStatus::LevelCompleted {
            log::debug!("advance_level ignored in {:?}", self.status);
            return false;
        }
        self.start_level(self.level_index + 1);
        true
    }

    /// Start over from `index` with a zero score
    pub fn reset_to_level(&mut self, index: usize) {
        self.score = 0;
        self.start_level(index);
    }

    /// Fire the hook. Only legal while playing and swinging.
    pub fn request_fire(&mut self) -> bool {
        if !self.is_playing() {
            log::debug!("Fire ignored: game is {:?}", self.status);
            return false;
        }
        if !self.hook.is_swinging() {
            log::debug!("Fire ignored: hook is {:?}", self.hook.state);
            return false;
        }

        self.hook.state = HookState::Extending;
        self.hook.length = self.tuning.min_length;
        self.push_event(GameEvent::Fired {
            angle: self.hook.angle,
        });
        true
    }

    /// Aim the swinging hook (used by autoplay before firing)
    pub fn set_hook_angle(&mut self, angle: f32) -> bool {
        self.is_playing() && self.hook.aim(angle)
    }

    /// Advance the swing
    pub fn tick_angle(&mut self, delta_ms: f32) {
        if self.is_playing() {
            self.hook.swing(delta_ms, self.tuning.swing_speed);
        }
    }

    /// Report the rope's current angle/length while extending, or let the
    /// pull pause run while pulling.
    pub fn tick_extension(&mut self, delta_ms: f32, angle: f32, length: f32) -> CaptureResult {
        if !self.is_playing() {
            return CaptureResult::Idle;
        }

        match self.hook.state {
            HookState::Extending => {
                let length = length.clamp(self.tuning.min_length, self.tuning.max_length);
                let previous = self.hook.length;
                self.hook.angle = clamp_angle(angle);

                // Everything between the last reported tip and this one was passed over
                let hit = sweep_capture(
                    self.origin(),
                    self.hook.angle,
                    previous,
                    length,
                    &self.items,
                    &self.tuning,
                )
                .map(|(item, at)| (item.id, at));
                if let Some((id, at)) = hit {
                    self.hook.length = at;
                    return CaptureResult::Captured(id);
                }
                self.hook.length = length;

                if length >= self.tuning.max_length {
                    self.hook.state = HookState::Retracting;
                    self.hook.caught = None;
                    self.push_event(GameEvent::Missed {
                        angle: self.hook.angle,
                    });
                    return CaptureResult::Exhausted;
                }
                CaptureResult::Continue
            }
            HookState::Pulling => {
                let elapsed = self.hook.pull_elapsed_ms as f32 + delta_ms.max(0.0);
                self.hook.pull_elapsed_ms = elapsed as u32;
                if self.hook.pull_elapsed_ms < self.tuning.pull_pause_ms {
                    return CaptureResult::Pulling;
                }
                self.hook.state = HookState::Retracting;
                match self.hook.caught {
                    Some(id) => CaptureResult::Reeling(id),
                    None => CaptureResult::Exhausted,
                }
            }
            HookState::Swinging | HookState::Retracting => CaptureResult::Idle,
        }
    }

    /// The catch animation landed: attach the item and start the pull pause.
    pub fn on_capture(&mut self, id: ItemId) -> bool {
        if !self.is_playing() || self.hook.state != HookState::Extending {
            log::debug!("Capture of {id} ignored: hook is {:?}", self.hook.state);
            return false;
        }
        let Some(item) = self.item(id) else {
            log::debug!("Capture of unknown item {id} ignored");
            return false;
        };
        if item.collected {
            log::debug!("Capture of collected item {id} ignored");
            return false;
        }

        let kind = item.kind;
        self.hook.state = HookState::Pulling;
        self.hook.caught = Some(id);
        self.hook.pull_elapsed_ms = 0;
        self.push_event(GameEvent::Captured { id, kind });
        true
    }

    /// Rope speed the animation layer should reel in at
    pub fn retract_speed(&self) -> f32 {
        retract_speed(self.caught_weight(), &self.tuning)
    }

    /// How long reeling in from the current length should take
    pub fn retract_duration_ms(&self) -> u32 {
        retract_duration_ms(self.hook.length, self.caught_weight(), &self.tuning)
    }

    /// The rope is back at minimum length: commit the catch, if any, and
    /// resume swinging.
    pub fn on_retract_complete(&mut self) -> Option<Collected> {
        if self.hook.state != HookState::Retracting {
            log::debug!("Retract complete ignored: hook is {:?}", self.hook.state);
            return None;
        }

        let caught = self.hook.caught.take();
        self.hook.resume_swing(&self.tuning);

        if !self.is_playing() {
            return None;
        }

        let item = self.item_mut(caught?)?;
        if !item.collect() {
            return None;
        }
        let collected = Collected {
            id: item.id,
            kind: item.kind,
            value: item.value,
        };

        self.score += collected.value as i64;
        self.push_event(GameEvent::Collected {
            id: collected.id,
            kind: collected.kind,
            value: collected.value,
        });
        log::debug!(
            "Collected {} {} for {} (score {})",
            collected.kind,
            collected.id,
            collected.value,
            self.score
        );

        if self.score >= self.target_score || self.all_collected() {
            self.complete_level();
        }
        Some(collected)
    }

    /// One second of the session clock
    pub fn tick_clock(&mut self) -> GameStatus {
        if !self.is_playing() {
            return self.status;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            if self.score >= self.target_score {
                self.complete_level();
            } else {
                self.status = GameStatus::GameOver;
                log::info!("Game over at level {} with {}", self.level_index + 1, self.score);
                self.push_event(GameEvent::GameOver { score: self.score });
            }
        }
        self.status
    }

    fn complete_level(&mut self) {
        if self.on_last_level() && !self.endless {
            self.status = GameStatus::GameCompleted;
            log::info!("Game completed with {}", self.score);
            self.push_event(GameEvent::GameCompleted { score: self.score });
        } else {
            self.status = GameStatus::LevelCompleted;
            log::info!("Level {} completed with {}", self.level_index + 1, self.score);
            self.push_event(GameEvent::LevelCompleted {
                level: self.level_index,
                score: self.score,
            });
        }
    }
}
