//! The game façade the presentation layer talks to
//!
//! `Game` is the single writer of the session state. It owns the autoplayer
//! and the periodic timers, feeds elapsed time to them in `update`, and
//! forwards the animation layer's frame calls and completion signals to
//! the hook state machine.

use serde::{Deserialize, Serialize};

use crate::autoplay::{AutoPlayer, AutoplayConfig, FireCommand};
use crate::consts::{DECISION_TICK_MS, SESSION_TICK_MS, SWING_TICK_MS};
use crate::error::ManualInputError;
use crate::schedule::{TaskKind, Timers};
use crate::settings::Settings;
use crate::sim::item::ItemId;
use crate::sim::state::{GameEvent, GameState, GameStatus};
use crate::sim::tick::{CaptureResult, Collected};

/// Serializable copy of everything the presentation layer shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub now_ms: u64,
    pub state: GameState,
    pub autoplay: AutoplayConfig,
    pub manual_angles: Vec<f32>,
    pub manual_targets: Vec<ItemId>,
    pub decision_log: Vec<String>,
}

#[derive(Debug)]
pub struct Game {
    state: GameState,
    autoplay: AutoPlayer,
    timers: Timers,
    /// Monotonic session clock fed by `update`
    now_ms: u64,
    /// Sub-millisecond remainder not yet on the clock
    carry_ms: f64,
}

impl Game {
    /// New session in `Ready` status. Without a configured seed one is drawn.
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("New game (seed {seed})");
        Self {
            state: GameState::new(settings, seed),
            autoplay: AutoPlayer::new(settings.autoplay),
            timers: Timers::new(),
            now_ms: 0,
            carry_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn autoplay(&self) -> &AutoPlayer {
        &self.autoplay
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.now_ms,
            state: self.state.clone(),
            autoplay: *self.autoplay.config(),
            manual_angles: self.autoplay.manual_angles().collect(),
            manual_targets: self.autoplay.manual_targets().collect(),
            decision_log: self.autoplay.decision_log().map(str::to_owned).collect(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    // --- Lifecycle ---

    pub fn start_level(&mut self, index: usize) -> Snapshot {
        self.state.start_level(index);
        self.enter_level();
        self.snapshot()
    }

    /// Next level after a completed one; `None` in any other status
    pub fn advance_level(&mut self) -> Option<Snapshot> {
        if !self.state.advance_level() {
            return None;
        }
        self.enter_level();
        Some(self.snapshot())
    }

    pub fn reset_to_level(&mut self, index: usize) -> Snapshot {
        self.state.reset_to_level(index);
        self.enter_level();
        self.snapshot()
    }

    fn enter_level(&mut self) {
        self.autoplay.reset_for_level();
        self.timers.start(TaskKind::Swing, SWING_TICK_MS);
        self.timers.start(TaskKind::Decision, DECISION_TICK_MS);
        self.timers.start(TaskKind::Session, SESSION_TICK_MS);
    }

    /// Stop every periodic task once play is over
    fn sync_timers(&mut self) {
        if !self.state.is_playing() && self.timers.any_running() {
            log::debug!("Stopping timers ({:?})", self.state.status);
            self.timers.cancel_all();
        }
    }

    // --- Hook state machine ---

    pub fn request_fire(&mut self) -> bool {
        self.state.request_fire()
    }

    /// Swing by hand. Hosts driving time through `update` get this from the
    /// swing timer already.
    pub fn tick_angle(&mut self, delta_ms: f32) {
        self.state.tick_angle(delta_ms);
    }

    pub fn tick_extension(&mut self, delta_ms: f32, angle: f32, length: f32) -> CaptureResult {
        self.state.tick_extension(delta_ms, angle, length)
    }

    pub fn on_capture(&mut self, id: ItemId) -> bool {
        self.state.on_capture(id)
    }

    pub fn on_retract_complete(&mut self) -> Option<Collected> {
        let collected = self.state.on_retract_complete();
        self.sync_timers();
        collected
    }

    // --- Autoplay surface ---

    pub fn set_autoplay_config(&mut self, config: AutoplayConfig) {
        self.autoplay.set_config(config);
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay.toggle()
    }

    pub fn enqueue_manual_angle(&mut self, angle: f32) -> Result<(), ManualInputError> {
        self.autoplay.enqueue_manual_angle(angle)
    }

    pub fn enqueue_manual_angles(&mut self, angles: &[f32]) -> Result<usize, ManualInputError> {
        self.autoplay.enqueue_manual_angles(angles)
    }

    pub fn enqueue_manual_targets(&mut self, ids: &[ItemId]) -> Result<usize, ManualInputError> {
        self.autoplay.enqueue_manual_targets(ids, &self.state.items)
    }

    // --- Time ---

    /// Advance the session clock and run the periodic tasks that fell due,
    /// one at a time in order.
    pub fn update(&mut self, delta_ms: f32) {
        let delta_ms = delta_ms.max(0.0);
        let elapsed = self.carry_ms + f64::from(delta_ms);
        let whole = elapsed.floor();
        self.now_ms += whole as u64;
        self.carry_ms = elapsed - whole;

        for task in self.timers.advance(delta_ms) {
            match task {
                TaskKind::Swing => self.state.tick_angle(SWING_TICK_MS as f32),
                TaskKind::Decision => self.run_decision(),
                TaskKind::Session => {
                    self.state.tick_clock();
                }
            }
            if !self.state.is_playing() {
                break;
            }
        }
        self.sync_timers();
    }

    fn run_decision(&mut self) {
        if let Some(command) = self.autoplay.decide(&self.state, self.now_ms) {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: FireCommand) {
        if let Some(angle) = command.angle {
            if !self.state.set_hook_angle(angle) {
                log::debug!("Autoplay aim at {angle:.1}° rejected");
                return;
            }
        }
        if self.state.request_fire() {
            log::debug!(
                "Autoplay fired at {:.1}°{}",
                self.state.hook.angle,
                command
                    .target
                    .map(|id| format!(" for {id}"))
                    .unwrap_or_default()
            );
        }
    }
}
