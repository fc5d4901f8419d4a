//! Game settings and tuning
//!
//! Loaded from JSON; every section has defaults so a partial file works.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::autoplay::AutoplayConfig;
use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::geometry::Rect;
use crate::sim::level::{LevelConfig, default_levels, validate_levels};

/// Playfield supplied by the presentation layer (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    /// Height of the hook pivot from the top edge
    pub origin_y: f32,
    /// Empty band between the pivot and the first row of items
    pub top_margin: f32,
    pub side_margin: f32,
    pub bottom_margin: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 480.0,
            origin_y: 60.0,
            top_margin: 80.0,
            side_margin: 50.0,
            bottom_margin: 20.0,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Hook pivot, centered horizontally
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.origin_y)
    }

    /// Region items are placed in
    pub fn mine_bounds(&self) -> Rect {
        Rect::new(
            Vec2::new(self.side_margin, self.origin_y + self.top_margin),
            Vec2::new(
                self.width - self.side_margin,
                self.height - self.bottom_margin,
            ),
        )
    }

    /// Largest distance between two points on screen
    pub fn diagonal(&self) -> f32 {
        Vec2::new(self.width, self.height).length()
    }
}

/// Where the hook points when it goes back to swinging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    /// Keep the angle and direction the hook was fired at
    #[default]
    KeepAngle,
    /// Re-center at 0° swinging toward +x
    Center,
}

/// Hook motion and catch tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookTuning {
    pub min_length: f32,
    pub max_length: f32,
    /// Items centered at or inside this distance are never captured or targeted
    pub min_reach: f32,
    pub hook_radius: f32,
    pub capture_margin: f32,
    /// Degrees per millisecond
    pub swing_speed: f32,
    /// Pixels per millisecond
    pub extend_speed: f32,
    pub base_retract_speed: f32,
    pub retract_weight_drag: f32,
    pub min_retract_speed: f32,
    pub pull_pause_ms: u32,
    pub resume_policy: ResumePolicy,
}

impl Default for HookTuning {
    fn default() -> Self {
        Self {
            min_length: ROPE_MIN_LENGTH,
            max_length: ROPE_MAX_LENGTH,
            min_reach: MIN_REACH,
            hook_radius: HOOK_RADIUS,
            capture_margin: CAPTURE_MARGIN,
            swing_speed: SWING_SPEED,
            extend_speed: EXTEND_SPEED,
            base_retract_speed: BASE_RETRACT_SPEED,
            retract_weight_drag: RETRACT_WEIGHT_DRAG,
            min_retract_speed: MIN_RETRACT_SPEED,
            pull_pause_ms: PULL_PAUSE_MS,
            resume_policy: ResumePolicy::KeepAngle,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub playfield: Playfield,
    pub hook: HookTuning,
    pub autoplay: AutoplayConfig,
    /// Replaces the built-in campaign when set
    pub levels: Option<Vec<LevelConfig>>,
    /// Keep playing the last level's layout instead of finishing the game
    pub endless: bool,
    pub seed: Option<u64>,
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Level table in effect
    pub fn level_table(&self) -> Vec<LevelConfig> {
        self.levels.clone().unwrap_or_else(default_levels)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        if !(pf.width > 0.0 && pf.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "playfield {}x{} must be positive",
                pf.width, pf.height
            )));
        }
        let mine = pf.mine_bounds();
        if mine.width() <= 0.0 || mine.height() <= 0.0 {
            return Err(ConfigError::Invalid(
                "margins leave no room for items".into(),
            ));
        }

        let hook = &self.hook;
        if !(hook.min_length >= 0.0 && hook.min_length < hook.max_length) {
            return Err(ConfigError::Invalid(format!(
                "rope length range [{}, {}] is empty",
                hook.min_length, hook.max_length
            )));
        }
        if hook.min_reach < 0.0 || hook.min_reach >= hook.max_length {
            return Err(ConfigError::Invalid(format!(
                "min_reach {} must be in [0, max_length)",
                hook.min_reach
            )));
        }
        if hook.swing_speed <= 0.0 || hook.extend_speed <= 0.0 {
            return Err(ConfigError::Invalid("hook speeds must be positive".into()));
        }
        if hook.min_retract_speed <= 0.0 || hook.min_retract_speed > hook.base_retract_speed {
            return Err(ConfigError::Invalid(
                "min_retract_speed must be in (0, base_retract_speed]".into(),
            ));
        }
        if hook.pull_pause_ms == 0 {
            return Err(ConfigError::Invalid("pull_pause_ms must be non-zero".into()));
        }

        if !(0.0..=1.0).contains(&self.autoplay.risk_tolerance) {
            return Err(ConfigError::Invalid(format!(
                "risk_tolerance {} must be in [0, 1]",
                self.autoplay.risk_tolerance
            )));
        }

        if let Some(levels) = &self.levels {
            validate_levels(levels)?;
        }
        Ok(())
    }
}
