//! Autoplay configuration and intelligence tiers

use serde::{Deserialize, Serialize};

/// Named presets controlling aim precision and risk behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntelligenceTier {
    Basic,
    #[default]
    Advanced,
    Expert,
}

impl IntelligenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntelligenceTier::Basic => "basic",
            IntelligenceTier::Advanced => "advanced",
            IntelligenceTier::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(IntelligenceTier::Basic),
            "advanced" | "adv" => Some(IntelligenceTier::Advanced),
            "expert" => Some(IntelligenceTier::Expert),
            _ => None,
        }
    }

    /// How close (degrees) the swing must be to the target angle to fire
    pub fn angle_tolerance(&self) -> f32 {
        match self {
            IntelligenceTier::Basic => 10.0,
            IntelligenceTier::Advanced => 5.0,
            IntelligenceTier::Expert => 2.0,
        }
    }

    /// Whether this tier weighs obstacles against the target's worth
    pub fn judges_obstacles(&self) -> bool {
        matches!(self, IntelligenceTier::Expert)
    }
}

/// Autoplay settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    pub enabled: bool,
    pub tier: IntelligenceTier,
    /// 0.0 (cautious) to 1.0 (reckless)
    pub risk_tolerance: f32,
    /// Weight targets by their type priority, not just value per weight
    pub prefer_high_value: bool,
    /// Never aim at explosives, and treat them as obstacles
    pub avoid_hazard: bool,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tier: IntelligenceTier::Advanced,
            risk_tolerance: 0.6,
            prefer_high_value: true,
            avoid_hazard: true,
        }
    }
}
