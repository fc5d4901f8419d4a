//! Collectible and hazard items

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Gold1,
    Gold2,
    Gold3,
    Gold4,
    Rock1,
    Rock2,
    /// Explosive, carries negative value
    Tnt,
    Diamond,
}

impl ItemKind {
    pub const ALL: [ItemKind; 8] = [
        ItemKind::Gold1,
        ItemKind::Gold2,
        ItemKind::Gold3,
        ItemKind::Gold4,
        ItemKind::Rock1,
        ItemKind::Rock2,
        ItemKind::Tnt,
        ItemKind::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Gold1 => "gold1",
            ItemKind::Gold2 => "gold2",
            ItemKind::Gold3 => "gold3",
            ItemKind::Gold4 => "gold4",
            ItemKind::Rock1 => "rock1",
            ItemKind::Rock2 => "rock2",
            ItemKind::Tnt => "tnt",
            ItemKind::Diamond => "diamond",
        }
    }

    /// Side length of the (square) sprite in pixels
    pub fn size(&self) -> Vec2 {
        let side = match self {
            ItemKind::Gold1 => 30.0,
            ItemKind::Gold2 => 40.0,
            ItemKind::Gold3 => 50.0,
            ItemKind::Gold4 => 60.0,
            ItemKind::Rock1 => 45.0,
            ItemKind::Rock2 => 55.0,
            ItemKind::Tnt => 40.0,
            ItemKind::Diamond => 25.0,
        };
        Vec2::splat(side)
    }

    /// Autoplay priority multiplier
    pub fn priority(&self) -> f32 {
        match self {
            ItemKind::Diamond => 12.0,
            ItemKind::Gold4 => 10.0,
            ItemKind::Gold3 => 8.0,
            ItemKind::Gold2 => 6.0,
            ItemKind::Gold1 => 4.0,
            ItemKind::Rock2 => 2.0,
            ItemKind::Rock1 => 1.0,
            ItemKind::Tnt => -5.0,
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, ItemKind::Tnt)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable item identity within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An item lying in the mine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Score delta on collection (negative for explosives)
    pub value: i32,
    /// Always >= 1, drives retraction speed
    pub weight: u32,
    pub collected: bool,
}

impl Item {
    pub fn new(id: ItemId, kind: ItemKind, pos: Vec2, value: i32, weight: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            size: kind.size(),
            value,
            weight: weight.max(1),
            collected: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Bounding circle radius
    pub fn radius(&self) -> f32 {
        self.size.x.max(self.size.y) / 2.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Base desirability used by autoplay: priority * value/weight
    pub fn base_score(&self) -> f32 {
        self.kind.priority() * (self.value as f32 / self.weight.max(1) as f32)
    }

    /// Mark collected; never reverts within a level
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}
