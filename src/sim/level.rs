//! Level table and item placement
//!
//! Placement is rejection sampling against every previously placed item,
//! driven by an injected RNG so a seed reproduces the exact layout.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::item::{Item, ItemId, ItemKind};
use crate::consts::{MIN_ITEM_SPACING, PLACEMENT_RETRIES};
use crate::error::ConfigError;

/// One spawn rule: `count` items of `kind` with value/weight drawn from inclusive ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub kind: ItemKind,
    pub count: u32,
    pub value_range: (i32, i32),
    pub weight_range: (u32, u32),
}

impl ItemSpawn {
    pub const fn new(kind: ItemKind, count: u32, value: (i32, i32), weight: (u32, u32)) -> Self {
        Self {
            kind,
            count,
            value_range: value,
            weight_range: weight,
        }
    }
}

/// Static per-level descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub target_score: i64,
    /// Seconds
    pub time_limit: u32,
    pub items: Vec<ItemSpawn>,
}

impl LevelConfig {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|s| s.count).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit == 0 {
            return Err(ConfigError::Invalid("time_limit must be positive".into()));
        }
        for spawn in &self.items {
            let (vlo, vhi) = spawn.value_range;
            let (wlo, whi) = spawn.weight_range;
            if vlo > vhi {
                return Err(ConfigError::Invalid(format!(
                    "{}: value range [{vlo}, {vhi}] is inverted",
                    spawn.kind
                )));
            }
            if wlo == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: weight must be at least 1",
                    spawn.kind
                )));
            }
            if wlo > whi {
                return Err(ConfigError::Invalid(format!(
                    "{}: weight range [{wlo}, {whi}] is inverted",
                    spawn.kind
                )));
            }
        }
        Ok(())
    }
}

/// Validate a whole level table
pub fn validate_levels(levels: &[LevelConfig]) -> Result<(), ConfigError> {
    if levels.is_empty() {
        return Err(ConfigError::Invalid("level table is empty".into()));
    }
    levels.iter().try_for_each(LevelConfig::validate)
}

/// Built-in five level campaign
pub fn default_levels() -> Vec<LevelConfig> {
    use ItemKind::*;
    vec![
        // Level 1 - basic introduction
        LevelConfig {
            target_score: 650,
            time_limit: 60,
            items: vec![
                ItemSpawn::new(Gold1, 4, (50, 100), (2, 3)),
                ItemSpawn::new(Gold2, 2, (200, 250), (3, 4)),
                ItemSpawn::new(Rock1, 4, (10, 20), (4, 6)),
                ItemSpawn::new(Rock2, 2, (30, 50), (6, 8)),
            ],
        },
        // Level 2 - first gold3 and first TNT
        LevelConfig {
            target_score: 1200,
            time_limit: 60,
            items: vec![
                ItemSpawn::new(Gold1, 3, (50, 100), (2, 3)),
                ItemSpawn::new(Gold2, 3, (200, 250), (3, 4)),
                ItemSpawn::new(Gold3, 1, (500, 600), (5, 6)),
                ItemSpawn::new(Rock1, 3, (10, 20), (4, 6)),
                ItemSpawn::new(Rock2, 3, (30, 50), (6, 8)),
                ItemSpawn::new(Tnt, 1, (-150, -100), (1, 1)),
            ],
        },
        // Level 3 - gold4
        LevelConfig {
            target_score: 1800,
            time_limit: 60,
            items: vec![
                ItemSpawn::new(Gold1, 2, (50, 100), (2, 3)),
                ItemSpawn::new(Gold2, 3, (200, 250), (3, 4)),
                ItemSpawn::new(Gold3, 2, (500, 600), (5, 6)),
                ItemSpawn::new(Gold4, 1, (1000, 1200), (8, 10)),
                ItemSpawn::new(Rock1, 2, (10, 20), (4, 6)),
                ItemSpawn::new(Rock2, 2, (30, 50), (6, 8)),
                ItemSpawn::new(Tnt, 2, (-200, -150), (1, 1)),
            ],
        },
        // Level 4 - time pressure
        LevelConfig {
            target_score: 2500,
            time_limit: 50,
            items: vec![
                ItemSpawn::new(Gold1, 2, (50, 100), (2, 3)),
                ItemSpawn::new(Gold2, 2, (200, 250), (3, 4)),
                ItemSpawn::new(Gold3, 2, (500, 600), (5, 6)),
                ItemSpawn::new(Gold4, 1, (1000, 1200), (8, 10)),
                ItemSpawn::new(Rock1, 3, (10, 20), (4, 6)),
                ItemSpawn::new(Rock2, 3, (30, 50), (7, 9)),
                ItemSpawn::new(Tnt, 3, (-250, -200), (1, 1)),
            ],
        },
        // Level 5 - final challenge
        LevelConfig {
            target_score: 3500,
            time_limit: 45,
            items: vec![
                ItemSpawn::new(Gold1, 1, (50, 100), (2, 3)),
                ItemSpawn::new(Gold2, 2, (200, 250), (3, 4)),
                ItemSpawn::new(Gold3, 3, (500, 600), (5, 6)),
                ItemSpawn::new(Gold4, 2, (1000, 1500), (8, 10)),
                ItemSpawn::new(Rock1, 2, (10, 20), (4, 6)),
                ItemSpawn::new(Rock2, 3, (30, 50), (7, 9)),
                ItemSpawn::new(Tnt, 3, (-300, -250), (1, 1)),
            ],
        },
    ]
}

/// Level descriptor for `index`, clamping past the end of the table
pub fn level_config(levels: &[LevelConfig], index: usize) -> Option<&LevelConfig> {
    levels.get(index.min(levels.len().checked_sub(1)?))
}

/// Generate the item set for a level inside `bounds`.
///
/// Every item lies fully inside `bounds`, and centers are at least
/// `r_a + r_b + MIN_ITEM_SPACING` apart. Items that cannot be placed
/// within the retry budget are dropped with a warning.
pub fn generate_items<R: Rng + ?Sized>(
    level_index: usize,
    bounds: Rect,
    levels: &[LevelConfig],
    rng: &mut R,
) -> Vec<Item> {
    let Some(config) = level_config(levels, level_index) else {
        log::warn!("No level configuration available, level {} is empty", level_index + 1);
        return Vec::new();
    };

    let mut items: Vec<Item> = Vec::with_capacity(config.item_count() as usize);
    let mut next_id = 1u32;

    for spawn in &config.items {
        for _ in 0..spawn.count {
            let value = rng.random_range(spawn.value_range.0..=spawn.value_range.1);
            let weight = rng.random_range(spawn.weight_range.0..=spawn.weight_range.1);
            let size = spawn.kind.size();

            let Some(pos) = place(&items, spawn.kind, size, bounds, rng) else {
                log::warn!(
                    "Level {}: no room for {} after {} attempts, skipping",
                    level_index + 1,
                    spawn.kind,
                    PLACEMENT_RETRIES
                );
                continue;
            };

            items.push(Item::new(ItemId(next_id), spawn.kind, pos, value, weight));
            next_id += 1;
        }
    }

    log::debug!(
        "Level {}: placed {}/{} items",
        level_index + 1,
        items.len(),
        config.item_count()
    );
    items
}

/// Find a top-left position for a new item, or None once retries run out
fn place<R: Rng + ?Sized>(
    placed: &[Item],
    kind: ItemKind,
    size: Vec2,
    bounds: Rect,
    rng: &mut R,
) -> Option<Vec2> {
    let max_x = bounds.max.x - size.x;
    let max_y = bounds.max.y - size.y;
    if max_x < bounds.min.x || max_y < bounds.min.y {
        log::warn!("{kind} ({}px) does not fit the playfield", size.x);
        return None;
    }

    let radius = size.x.max(size.y) / 2.0;
    for _ in 0..PLACEMENT_RETRIES {
        let pos = Vec2::new(
            rng.random_range(bounds.min.x..=max_x),
            rng.random_range(bounds.min.y..=max_y),
        );
        let center = pos + size * 0.5;
        let clear = placed.iter().all(|other| {
            center.distance(other.center()) >= radius + other.radius() + MIN_ITEM_SPACING
        });
        if clear {
            return Some(pos);
        }
    }
    None
}
