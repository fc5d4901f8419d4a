//! Autoplay decision engine
//!
//! Reads a game snapshot and answers with at most one fire command per
//! decision tick. It never touches items or the hook itself: the engine
//! applies the command through the hook's public operations.
//!
//! Two modes:
//! - Manual: queued angles, then queued item ids, serviced FIFO
//! - Heuristic: the best rated reachable item once the swing lines up

pub mod config;
pub mod cooldown;
pub mod rating;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub use config::{AutoplayConfig, IntelligenceTier};
pub use cooldown::{CooldownList, CooldownSpot};
pub use rating::{HAZARD_SCORE, RatedItem, Rater, base_score};

use crate::angle_in_range;
use crate::consts::{COOLDOWN_RADIUS_PAD, DECISION_LOG_LEN, FIRE_COOLDOWN_MS, POSITION_COOLDOWN_MS};
use crate::error::ManualInputError;
use crate::settings::HookTuning;
use crate::sim::geometry::{angle_to, distance};
use crate::sim::item::{Item, ItemId};
use crate::sim::state::GameState;

/// Instruction for the hook state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireCommand {
    /// Aim here before firing; `None` fires at the current swing angle
    pub angle: Option<f32>,
    /// Item the shot is meant for, if any
    pub target: Option<ItemId>,
}

enum ManualStep {
    Fire(FireCommand),
    /// A queued target is cooling down; hold fire
    Wait,
    Drained,
}

/// Whether the rope can get to an item at `origin_dist` at all
fn reachable(origin_dist: f32, item: &Item, tuning: &HookTuning) -> bool {
    origin_dist > tuning.min_reach && origin_dist - item.radius() <= tuning.max_length
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPlayer {
    config: AutoplayConfig,
    cooldowns: CooldownList,
    manual_angles: VecDeque<f32>,
    manual_targets: VecDeque<ItemId>,
    decision_log: VecDeque<String>,
    last_fire_ms: Option<u64>,
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self::new(AutoplayConfig::default())
    }
}

impl AutoPlayer {
    pub fn new(config: AutoplayConfig) -> Self {
        Self {
            config,
            cooldowns: CooldownList::new(POSITION_COOLDOWN_MS),
            manual_angles: VecDeque::new(),
            manual_targets: VecDeque::new(),
            decision_log: VecDeque::with_capacity(DECISION_LOG_LEN),
            last_fire_ms: None,
        }
    }

    pub fn config(&self) -> &AutoplayConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_config(&mut self, config: AutoplayConfig) {
        if config != self.config {
            log::info!(
                "Autoplay {} ({}, risk {:.2})",
                if config.enabled { "on" } else { "off" },
                config.tier.as_str(),
                config.risk_tolerance
            );
        }
        self.config = config;
    }

    /// Flip autoplay on/off, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.config.enabled = !self.config.enabled;
        log::info!("Autoplay: {}", self.config.enabled);
        self.config.enabled
    }

    pub fn cooldowns(&self) -> &CooldownList {
        &self.cooldowns
    }

    pub fn manual_angles(&self) -> impl Iterator<Item = f32> + '_ {
        self.manual_angles.iter().copied()
    }

    pub fn manual_targets(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.manual_targets.iter().copied()
    }

    pub fn in_manual_mode(&self) -> bool {
        !self.manual_angles.is_empty() || !self.manual_targets.is_empty()
    }

    /// Most recent decisions, oldest first
    pub fn decision_log(&self) -> impl Iterator<Item = &str> {
        self.decision_log.iter().map(String::as_str)
    }

    /// Forget everything tied to the previous level's items
    pub fn reset_for_level(&mut self) {
        self.manual_angles.clear();
        self.manual_targets.clear();
        self.cooldowns.clear();
        self.last_fire_ms = None;
    }

    pub fn enqueue_manual_angle(&mut self, angle: f32) -> Result<(), ManualInputError> {
        self.enqueue_manual_angles(&[angle]).map(|_| ())
    }

    /// Queue several angles. One bad angle rejects the whole batch.
    pub fn enqueue_manual_angles(&mut self, angles: &[f32]) -> Result<usize, ManualInputError> {
        for &angle in angles {
            if !angle.is_finite() {
                return Err(ManualInputError::NonFiniteAngle);
            }
            if !angle_in_range(angle) {
                return Err(ManualInputError::AngleOutOfRange { angle });
            }
        }
        if angles.is_empty() {
            return Ok(0);
        }

        self.manual_angles.extend(angles.iter().copied());
        self.enable_for_manual();
        self.log_decision(format!("Queued manual angles {angles:?}"));
        Ok(angles.len())
    }

    /// Queue item ids to go after. Collected or unknown ids are skipped; it
    /// is an error only when none remain.
    pub fn enqueue_manual_targets(
        &mut self,
        ids: &[ItemId],
        items: &[Item],
    ) -> Result<usize, ManualInputError> {
        if ids.is_empty() {
            return Err(ManualInputError::NoTargets);
        }

        let live: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| items.iter().any(|i| i.id == *id && !i.collected))
            .collect();
        if live.is_empty() {
            return Err(ManualInputError::NothingToTarget(ids.to_vec()));
        }

        let added = live.len();
        self.log_decision(format!(
            "Queued manual targets {}",
            live.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        ));
        self.manual_targets.extend(live);
        self.enable_for_manual();
        Ok(added)
    }

    fn enable_for_manual(&mut self) {
        if !self.config.enabled {
            self.config.enabled = true;
            log::info!("Autoplay enabled by manual input");
        }
    }

    /// Rate the state's uncollected items against the current swing angle
    pub fn rate<'s>(&self, state: &'s GameState, now_ms: u64) -> Vec<RatedItem<'s>> {
        Rater {
            config: &self.config,
            tuning: &state.tuning,
            cooldowns: &self.cooldowns,
            origin: state.origin(),
            max_distance: state.playfield.diagonal(),
            now_ms,
        }
        .rate(&state.items, state.hook.angle)
    }

    /// One decision tick
    pub fn decide(&mut self, state: &GameState, now_ms: u64) -> Option<FireCommand> {
        if !self.config.enabled || !state.is_playing() || !state.hook.is_swinging() {
            return None;
        }
        if let Some(last) = self.last_fire_ms {
            if now_ms.saturating_sub(last) < FIRE_COOLDOWN_MS {
                return None;
            }
        }

        self.cooldowns.prune(now_ms);
        self.tidy_manual_queues(state);

        let command = match self.manual_step(state, now_ms) {
            ManualStep::Fire(command) => Some(command),
            ManualStep::Wait => None,
            ManualStep::Drained => self.heuristic_step(state, now_ms),
        };
        if command.is_some() {
            self.last_fire_ms = Some(now_ms);
        }
        command
    }

    /// Drop queued targets that are gone, and everything once the field is clear
    fn tidy_manual_queues(&mut self, state: &GameState) {
        if state.all_collected() {
            if self.in_manual_mode() {
                self.manual_angles.clear();
                self.manual_targets.clear();
                self.log_decision("Field cleared, leaving manual mode".to_string());
            }
            return;
        }

        let before = self.manual_targets.len();
        self.manual_targets
            .retain(|id| state.item(*id).is_some_and(|item| !item.collected));
        if self.manual_targets.len() != before {
            self.log_decision("Dropped collected manual targets".to_string());
        }
    }

    fn manual_step(&mut self, state: &GameState, now_ms: u64) -> ManualStep {
        if let Some(angle) = self.manual_angles.pop_front() {
            self.log_decision(format!("Manual fire at {angle:.1}°"));
            return ManualStep::Fire(FireCommand {
                angle: Some(angle),
                target: None,
            });
        }

        let origin = state.origin();
        while let Some(&id) = self.manual_targets.front() {
            let Some(item) = state.item(id).filter(|i| !i.collected) else {
                self.manual_targets.pop_front();
                continue;
            };

            let center = item.center();
            let target_angle = angle_to(origin, center);
            if !reachable(distance(origin, center), item, &state.tuning) {
                self.log_decision(format!("Manual target {id} is out of reach, skipped"));
                self.manual_targets.pop_front();
                continue;
            }
            if self.cooldowns.contains(center, now_ms) {
                log::trace!("Manual target {id} cooling down");
                return ManualStep::Wait;
            }

            self.manual_targets.pop_front();
            self.cooldowns.record(center, item.radius() + COOLDOWN_RADIUS_PAD, now_ms);
            self.log_decision(format!("Manual fire at {} {id}", item.kind));
            return ManualStep::Fire(FireCommand {
                angle: Some(target_angle),
                target: Some(id),
            });
        }
        ManualStep::Drained
    }

    fn heuristic_step(&mut self, state: &GameState, now_ms: u64) -> Option<FireCommand> {
        let tuning = &state.tuning;
        let best = self
            .rate(state, now_ms)
            .into_iter()
            .find(|rated| rated.score > 0.0 && reachable(rated.distance, rated.item, tuning))?;

        if best.cooling {
            log::trace!("Best target {} cooling down", best.item.id);
            return None;
        }

        let off = (state.hook.angle - best.target_angle).abs();
        if off > self.config.tier.angle_tolerance() {
            return None;
        }

        let (id, kind, center, radius, score) = (
            best.item.id,
            best.item.kind,
            best.item.center(),
            best.item.radius(),
            best.score,
        );
        self.cooldowns.record(center, radius + COOLDOWN_RADIUS_PAD, now_ms);
        self.log_decision(format!("Fire at {kind} {id} (score {score:.1}, {off:.1}° off)"));
        Some(FireCommand {
            angle: None,
            target: Some(id),
        })
    }

    fn log_decision(&mut self, entry: String) {
        log::debug!("Autoplay: {entry}");
        if self.decision_log.len() == DECISION_LOG_LEN {
            self.decision_log.pop_front();
        }
        self.decision_log.push_back(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::hook::HookState;
    use crate::sim::item::ItemKind;
    use glam::Vec2;

    fn playing_state() -> GameState {
        let mut state = GameState::new(&Settings::default(), 7);
        state.start_level(0);
        state.items.clear();
        state.hook.angle = 0.0;
        state
    }

    fn place(state: &mut GameState, id: u32, kind: ItemKind, offset: Vec2, value: i32) {
        let center = state.origin() + offset;
        let pos = center - kind.size() * 0.5;
        state.items.push(Item::new(ItemId(id), kind, pos, value, 2));
    }

    fn enabled() -> AutoPlayer {
        AutoPlayer::new(AutoplayConfig {
            enabled: true,
            ..AutoplayConfig::default()
        })
    }

    #[test]
    fn test_disabled_never_fires() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        let mut bot = AutoPlayer::default();
        assert_eq!(bot.decide(&state, 0), None);
    }

    #[test]
    fn test_fires_when_aligned_and_records_cooldown() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        let mut bot = enabled();

        let command = bot.decide(&state, 0);
        assert_eq!(
            command,
            Some(FireCommand {
                angle: None,
                target: Some(ItemId(1)),
            })
        );
        assert_eq!(bot.cooldowns().len(), 1);
        assert_eq!(bot.decision_log().count(), 1);
    }

    #[test]
    fn test_fire_cooldown_blocks_rapid_refire() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        place(&mut state, 2, ItemKind::Gold2, Vec2::new(0.0, 320.0), 200);
        let mut bot = enabled();

        assert!(bot.decide(&state, 0).is_some());
        assert_eq!(bot.decide(&state, 500), None);
        // The first spot is still cooling; the deeper item is next in line
        assert_eq!(
            bot.decide(&state, 1_000).and_then(|c| c.target),
            Some(ItemId(2))
        );
    }

    #[test]
    fn test_waits_for_swing_to_line_up() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(200.0, 200.0), 200);
        let mut bot = enabled();
        assert_eq!(bot.decide(&state, 0), None);

        state.hook.angle = 44.0;
        assert!(bot.decide(&state, 0).is_some());
    }

    #[test]
    fn test_tier_tolerance_decides_fire() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        state.hook.angle = 4.0;

        let mut expert = AutoPlayer::new(AutoplayConfig {
            enabled: true,
            tier: IntelligenceTier::Expert,
            ..AutoplayConfig::default()
        });
        assert_eq!(expert.decide(&state, 0), None);

        let mut advanced = enabled();
        assert!(advanced.decide(&state, 0).is_some());
    }

    #[test]
    fn test_only_hazard_left_never_fires() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Tnt, Vec2::new(0.0, 200.0), -150);
        let mut bot = enabled();
        for step in 0..200u64 {
            state.hook.angle = (step as f32 * 7.0) % 160.0 - 80.0;
            assert_eq!(bot.decide(&state, step * 1_000), None);
        }
    }

    #[test]
    fn test_out_of_reach_item_is_skipped() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Diamond, Vec2::new(0.0, 40.0), 700);
        let mut bot = enabled();
        assert_eq!(bot.decide(&state, 0), None);
    }

    #[test]
    fn test_no_decision_unless_swinging() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        state.request_fire();
        assert_eq!(state.hook.state, HookState::Extending);
        assert_eq!(enabled().decide(&state, 0), None);
    }

    #[test]
    fn test_manual_angle_enables_and_fires_first() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        let mut bot = AutoPlayer::default();

        assert!(bot.enqueue_manual_angle(30.0).is_ok());
        assert!(bot.is_enabled());
        assert_eq!(
            bot.decide(&state, 0),
            Some(FireCommand {
                angle: Some(30.0),
                target: None,
            })
        );
        assert!(!bot.in_manual_mode());
    }

    #[test]
    fn test_bad_angle_batch_rejected_whole() {
        let mut bot = AutoPlayer::default();
        assert_eq!(
            bot.enqueue_manual_angles(&[10.0, 95.0]),
            Err(ManualInputError::AngleOutOfRange { angle: 95.0 })
        );
        assert_eq!(
            bot.enqueue_manual_angle(f32::NAN),
            Err(ManualInputError::NonFiniteAngle)
        );
        assert_eq!(bot.manual_angles().count(), 0);
        assert!(!bot.is_enabled());
    }

    #[test]
    fn test_manual_targets_skip_collected_ids() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(100.0, 200.0), 200);
        place(&mut state, 2, ItemKind::Gold1, Vec2::new(0.0, 300.0), 80);
        state.items[1].collect();
        let mut bot = AutoPlayer::default();

        assert_eq!(
            bot.enqueue_manual_targets(&[ItemId(2), ItemId(9)], &state.items),
            Err(ManualInputError::NothingToTarget(vec![ItemId(2), ItemId(9)]))
        );
        assert_eq!(bot.enqueue_manual_targets(&[], &state.items), Err(ManualInputError::NoTargets));
        assert_eq!(
            bot.enqueue_manual_targets(&[ItemId(1), ItemId(2)], &state.items),
            Ok(1)
        );

        let command = bot.decide(&state, 0).unwrap();
        assert_eq!(command.target, Some(ItemId(1)));
        let expected = angle_to(state.origin(), state.items[0].center());
        assert!((command.angle.unwrap() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_manual_target_waits_out_cooldown() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        let mut bot = enabled();
        bot.enqueue_manual_targets(&[ItemId(1)], &state.items).unwrap();
        bot.cooldowns.record(state.items[0].center(), 30.0, 0);

        assert_eq!(bot.decide(&state, 1_000), None);
        assert_eq!(bot.manual_targets().count(), 1);
        assert!(bot.decide(&state, POSITION_COOLDOWN_MS).is_some());
        assert_eq!(bot.manual_targets().count(), 0);
    }

    #[test]
    fn test_collected_manual_target_falls_back_to_heuristic() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(150.0, 200.0), 200);
        place(&mut state, 2, ItemKind::Gold1, Vec2::new(0.0, 250.0), 80);
        let mut bot = enabled();
        bot.enqueue_manual_targets(&[ItemId(1)], &state.items).unwrap();
        state.items[0].collect();

        let command = bot.decide(&state, 0).unwrap();
        assert_eq!(command, FireCommand { angle: None, target: Some(ItemId(2)) });
        assert!(!bot.in_manual_mode());
    }

    #[test]
    fn test_reset_for_level_clears_queues_and_cooldowns() {
        let mut state = playing_state();
        place(&mut state, 1, ItemKind::Gold2, Vec2::new(0.0, 200.0), 200);
        let mut bot = enabled();
        bot.enqueue_manual_angles(&[5.0, -5.0]).unwrap();
        bot.enqueue_manual_targets(&[ItemId(1)], &state.items).unwrap();
        bot.cooldowns.record(Vec2::ZERO, 10.0, 0);

        bot.reset_for_level();
        assert!(!bot.in_manual_mode());
        assert!(bot.cooldowns().is_empty());
    }

    #[test]
    fn test_decision_log_keeps_last_entries() {
        let mut bot = AutoPlayer::default();
        for i in 0..(DECISION_LOG_LEN + 5) {
            bot.enqueue_manual_angle(i as f32).unwrap();
        }
        assert_eq!(bot.decision_log().count(), DECISION_LOG_LEN);
        assert_eq!(bot.decision_log().next(), Some("Queued manual angles [5.0]"));
    }

    #[test]
    fn test_toggle() {
        let mut bot = AutoPlayer::default();
        assert!(bot.toggle());
        assert!(!bot.toggle());
    }
}
