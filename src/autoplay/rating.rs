//! Target rating heuristic
//!
//! Every uncollected item gets a score from its worth, how far the swing is
//! from its angle, how far away it is, whether something blocks the path,
//! and whether its spot was fired at recently. Higher is better; anything
//! at or below zero is not worth a shot.

use std::cmp::Ordering;

use glam::Vec2;

use super::config::AutoplayConfig;
use super::cooldown::CooldownList;
use crate::settings::HookTuning;
use crate::sim::collision::{beyond_min_reach, has_obstacle_in_path};
use crate::sim::geometry::{angle_to, distance};
use crate::sim::item::Item;

/// Score given to hazards when they are to be avoided
pub const HAZARD_SCORE: f32 = -1000.0;
/// Multiplier for targets inside minimum reach or in cooldown
pub const DISCOUNT: f32 = 0.1;

/// An item with its autoplay score
#[derive(Debug, Clone, Copy)]
pub struct RatedItem<'a> {
    pub item: &'a Item,
    pub score: f32,
    /// Swing angle that points at the item's center
    pub target_angle: f32,
    /// From the hook origin to the item's center
    pub distance: f32,
    pub obstructed: bool,
    pub cooling: bool,
}

/// Worth of an item before any positional factor
pub fn base_score(item: &Item, config: &AutoplayConfig) -> f32 {
    if config.prefer_high_value {
        item.base_score()
    } else {
        item.value as f32 / item.weight.max(1) as f32
    }
}

/// Everything the heuristic reads besides the items themselves
pub struct Rater<'a> {
    pub config: &'a AutoplayConfig,
    pub tuning: &'a HookTuning,
    pub cooldowns: &'a CooldownList,
    pub origin: Vec2,
    /// Normalizes the distance penalty (the playfield diagonal)
    pub max_distance: f32,
    pub now_ms: u64,
}

impl Rater<'_> {
    /// Rate every uncollected item, best first. Equal scores keep id order.
    pub fn rate<'i>(&self, items: &'i [Item], hook_angle: f32) -> Vec<RatedItem<'i>> {
        let mut rated: Vec<RatedItem<'i>> = items
            .iter()
            .filter(|item| !item.collected)
            .map(|item| self.rate_one(item, items, hook_angle))
            .collect();

        rated.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.id.cmp(&b.item.id))
        });
        rated
    }

    fn rate_one<'i>(&self, item: &'i Item, items: &[Item], hook_angle: f32) -> RatedItem<'i> {
        let center = item.center();
        let target_angle = angle_to(self.origin, center);
        let dist = distance(self.origin, center);
        let obstructed = self.obstructed(item, items);
        let cooling = self.cooldowns.contains(center, self.now_ms);

        let mut score = base_score(item, self.config);

        let angle_off = ((hook_angle - target_angle).abs() / 90.0).min(1.0);
        score *= 1.0 - 0.8 * angle_off;

        let far = if self.max_distance > 0.0 {
            (dist / self.max_distance).min(1.0)
        } else {
            0.0
        };
        score *= 1.0 - 0.5 * far;

        if obstructed {
            score *= self.config.risk_tolerance * 0.3;
        }
        if item.kind.is_hazard() && self.config.avoid_hazard {
            score = HAZARD_SCORE;
        }
        if !beyond_min_reach(self.origin, item, self.tuning) {
            score *= DISCOUNT;
        }
        if cooling {
            score *= DISCOUNT;
        }

        RatedItem {
            item,
            score,
            target_angle,
            distance: dist,
            obstructed,
            cooling,
        }
    }

    /// Whether something in the way of `target` makes the shot risky
    pub fn obstructed(&self, target: &Item, items: &[Item]) -> bool {
        let config = self.config;
        let target_worth = base_score(target, config);

        has_obstacle_in_path(target, items, self.origin, |obstacle| {
            if obstacle.kind.is_hazard() && !config.avoid_hazard {
                return false;
            }
            // A target worth far more than what is in the way can be worth the risk
            let judged_worth_it = config.tier.judges_obstacles()
                && config.risk_tolerance > 0.7
                && target_worth > base_score(obstacle, config) * 2.0;
            !judged_worth_it
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoplay::config::IntelligenceTier;
    use crate::sim::item::{ItemId, ItemKind};

    const ORIGIN: Vec2 = Vec2::new(400.0, 60.0);

    fn item_at(id: u32, kind: ItemKind, center: Vec2, value: i32, weight: u32) -> Item {
        Item::new(ItemId(id), kind, center - kind.size() * 0.5, value, weight)
    }

    fn below(id: u32, kind: ItemKind, dist: f32, value: i32) -> Item {
        item_at(id, kind, ORIGIN + Vec2::new(0.0, dist), value, 2)
    }

    fn defaults() -> (AutoplayConfig, HookTuning, CooldownList) {
        (
            AutoplayConfig::default(),
            HookTuning::default(),
            CooldownList::new(5000),
        )
    }

    fn rater<'a>(
        config: &'a AutoplayConfig,
        tuning: &'a HookTuning,
        cooldowns: &'a CooldownList,
    ) -> Rater<'a> {
        Rater {
            config,
            tuning,
            cooldowns,
            origin: ORIGIN,
            max_distance: 932.0,
            now_ms: 0,
        }
    }

    #[test]
    fn test_aligned_item_scores_higher() {
        let (config, tuning, cd) = defaults();
        let items = vec![
            below(1, ItemKind::Gold2, 200.0, 200),
            item_at(2, ItemKind::Gold2, ORIGIN + Vec2::new(200.0, 200.0), 200, 2),
        ];
        let rated = rater(&config, &tuning, &cd).rate(&items, 0.0);
        assert_eq!(rated[0].item.id, ItemId(1));
        assert!(rated[0].score > rated[1].score);
    }

    #[test]
    fn test_base_formula_straight_below() {
        let (config, tuning, cd) = defaults();
        let items = vec![below(1, ItemKind::Gold1, 233.0, 100)];
        let rated = rater(&config, &tuning, &cd).rate(&items, 0.0);
        // 4 * 100/2, no angle penalty, distance 233/932 = 0.25
        let expected = 200.0 * (1.0 - 0.5 * 0.25);
        assert!((rated[0].score - expected).abs() < 1e-2);
    }

    #[test]
    fn test_value_per_weight_without_type_priority() {
        let (config, tuning, cd) = defaults();
        // Mirrored around the swing so only worth differs
        let items = vec![
            item_at(1, ItemKind::Gold1, ORIGIN + Vec2::new(-100.0, 200.0), 80, 2),
            item_at(2, ItemKind::Rock2, ORIGIN + Vec2::new(100.0, 200.0), 50, 1),
        ];

        // Priority: gold1 4 * 40 beats rock2 2 * 50
        let rated = rater(&config, &tuning, &cd).rate(&items, 0.0);
        assert_eq!(rated[0].item.id, ItemId(1));

        let plain = AutoplayConfig {
            prefer_high_value: false,
            ..config
        };
        assert_eq!(base_score(&items[0], &plain), 40.0);
        assert_eq!(base_score(&items[1], &plain), 50.0);
        let rated = rater(&plain, &tuning, &cd).rate(&items, 0.0);
        assert_eq!(rated[0].item.id, ItemId(2));
        assert!(rated[0].score > rated[1].score);
    }

    #[test]
    fn test_hazard_gets_sentinel_when_avoided() {
        let (config, tuning, cd) = defaults();
        let items = vec![below(1, ItemKind::Tnt, 200.0, -100)];
        let rated = rater(&config, &tuning, &cd).rate(&items, 0.0);
        assert_eq!(rated[0].score, HAZARD_SCORE);

        let reckless = AutoplayConfig {
            avoid_hazard: false,
            ..config
        };
        let rated = rater(&reckless, &tuning, &cd).rate(&items, 0.0);
        assert_ne!(rated[0].score, HAZARD_SCORE);
    }

    #[test]
    fn test_obstacle_penalty() {
        let (config, tuning, cd) = defaults();
        let clear = vec![below(1, ItemKind::Gold3, 300.0, 500)];
        let blocked = vec![
            below(1, ItemKind::Gold3, 300.0, 500),
            below(2, ItemKind::Rock1, 150.0, 10),
        ];
        let r = rater(&config, &tuning, &cd);
        let free_score = r.rate(&clear, 0.0)[0].score;
        let blocked_rated = r.rate(&blocked, 0.0);
        let gold = blocked_rated.iter().find(|r| r.item.id == ItemId(1)).unwrap();
        assert!(gold.obstructed);
        assert!((gold.score - free_score * 0.6 * 0.3).abs() < 1e-2);
    }

    #[test]
    fn test_expert_risks_cheap_obstacle() {
        let tuning = HookTuning::default();
        let cd = CooldownList::new(5000);
        let expert = AutoplayConfig {
            tier: IntelligenceTier::Expert,
            risk_tolerance: 0.9,
            ..AutoplayConfig::default()
        };
        let items = vec![
            below(1, ItemKind::Gold3, 300.0, 500),
            below(2, ItemKind::Rock1, 150.0, 10),
        ];
        assert!(!rater(&expert, &tuning, &cd).obstructed(&items[0], &items));

        let cautious = AutoplayConfig {
            risk_tolerance: 0.5,
            ..expert
        };
        assert!(rater(&cautious, &tuning, &cd).obstructed(&items[0], &items));
    }

    #[test]
    fn test_cooldown_and_close_discounts() {
        let (config, tuning) = (AutoplayConfig::default(), HookTuning::default());
        let items = vec![below(1, ItemKind::Gold1, 200.0, 100)];
        let fresh = CooldownList::new(5000);
        let base = rater(&config, &tuning, &fresh).rate(&items, 0.0)[0].score;

        let mut cooling = CooldownList::new(5000);
        cooling.record(items[0].center(), 25.0, 0);
        let rated = rater(&config, &tuning, &cooling).rate(&items, 0.0);
        assert!(rated[0].cooling);
        assert!((rated[0].score - base * DISCOUNT).abs() < 1e-3);

        let close = vec![below(1, ItemKind::Gold1, tuning.min_reach, 100)];
        let close_rated = rater(&config, &tuning, &fresh).rate(&close, 0.0)[0];
        let unclamped = 200.0 * (1.0 - 0.5 * tuning.min_reach / 932.0) * DISCOUNT;
        assert!((close_rated.score - unclamped).abs() < 1e-2);
    }

    #[test]
    fn test_collected_items_are_not_rated() {
        let (config, tuning, cd) = defaults();
        let mut items = vec![below(1, ItemKind::Gold1, 200.0, 100)];
        items[0].collect();
        assert!(rater(&config, &tuning, &cd).rate(&items, 0.0).is_empty());
    }
}
