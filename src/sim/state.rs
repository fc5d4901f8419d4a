//! Game session state
//!
//! Everything the presentation layer renders and everything a replay needs
//! lives here. Mutation goes through the operations in `tick`.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hook::Hook;
use super::item::{Item, ItemId, ItemKind};
use super::level::{LevelConfig, level_config};
use crate::settings::{HookTuning, Playfield, Settings};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    /// No level started yet
    Ready,
    Playing,
    LevelCompleted,
    GameOver,
    /// Last configured level cleared
    GameCompleted,
}

/// Notable things that happened, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: usize, items: usize },
    Fired { angle: f32 },
    Captured { id: ItemId, kind: ItemKind },
    Missed { angle: f32 },
    Collected { id: ItemId, kind: ItemKind, value: i32 },
    LevelCompleted { level: usize, score: i64 },
    GameCompleted { score: i64 },
    GameOver { score: i64 },
}

/// RNG state wrapper for serialization
///
/// Each generated level draws from its own PCG stream so a seed replays
/// the same sequence of layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Hand out the next stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete game session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub rng_state: RngState,
    /// Current level index (0-based, may run past the table when endless)
    pub level_index: usize,
    /// Cumulative across levels
    pub score: i64,
    pub target_score: i64,
    /// Seconds
    pub time_remaining: u32,
    pub status: GameStatus,
    pub hook: Hook,
    /// Sorted by id
    pub items: Vec<Item>,
    pub playfield: Playfield,
    pub tuning: HookTuning,
    pub levels: Vec<LevelConfig>,
    pub endless: bool,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            rng_state: RngState::new(seed),
            level_index: 0,
            score: 0,
            target_score: 0,
            time_remaining: 0,
            status: GameStatus::Ready,
            hook: Hook::new(&settings.hook),
            items: Vec::new(),
            playfield: settings.playfield,
            tuning: settings.hook,
            levels: settings.level_table(),
            endless: settings.endless,
            events: Vec::new(),
        }
    }

    /// Hook pivot
    pub fn origin(&self) -> Vec2 {
        self.playfield.origin()
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Descriptor of the current level (clamped to the table)
    pub fn level_config(&self) -> Option<&LevelConfig> {
        level_config(&self.levels, self.level_index)
    }

    /// Whether the current level is the last one in the table
    pub fn on_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn remaining_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| !i.collected)
    }

    pub fn all_collected(&self) -> bool {
        self.items.iter().all(|i| i.collected)
    }

    /// Weight of the item on the hook, if any
    pub fn caught_weight(&self) -> Option<u32> {
        self.hook
            .caught
            .and_then(|id| self.item(id))
            .map(|item| item.weight)
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
