//! Gold Hook - hook targeting and autoplay engine for a Gold Miner style game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, items, capture, hook state machine)
//! - `autoplay`: Decision engine that fires the hook on the player's behalf
//! - `schedule`: Cancelable periodic ticks on a single timeline
//! - `engine`: The single-writer game façade the presentation layer talks to
//! - `headless`: A reference presentation layer that drives the animation callbacks
//! - `settings`: Data-driven tuning and level tables

pub mod autoplay;
pub mod engine;
pub mod error;
pub mod headless;
pub mod schedule;
pub mod settings;
pub mod sim;

pub use engine::Game;
pub use error::{ConfigError, ManualInputError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Hook swings between -MAX_ANGLE and +MAX_ANGLE (degrees)
    pub const MAX_ANGLE: f32 = 80.0;
    /// Angular speed while swinging: 2° every 50ms
    pub const SWING_SPEED: f32 = 2.0 / 50.0;

    /// Rope length bounds (pixels)
    pub const ROPE_MIN_LENGTH: f32 = 50.0;
    pub const ROPE_MAX_LENGTH: f32 = 400.0;
    /// Items at or inside this distance from the origin are never captured or targeted
    pub const MIN_REACH: f32 = ROPE_MIN_LENGTH;

    /// Hook collision radius (larger = easier to catch)
    pub const HOOK_RADIUS: f32 = 20.0;
    /// Expansion of an item's bounding box for the forgiving catch check
    pub const CAPTURE_MARGIN: f32 = 6.0;

    /// Extension speed (pixels/ms)
    pub const EXTEND_SPEED: f32 = 0.3;
    /// Retraction speed with an empty hook (pixels/ms)
    pub const BASE_RETRACT_SPEED: f32 = 0.5;
    /// Retraction speed lost per unit of weight
    pub const RETRACT_WEIGHT_DRAG: f32 = 0.03125;
    /// Retraction never drops below a quarter of base speed
    pub const MIN_RETRACT_SPEED: f32 = 0.125;
    /// Yank pause between capture and reeling in
    pub const PULL_PAUSE_MS: u32 = 250;

    /// Minimum gap between placed items (pixels)
    pub const MIN_ITEM_SPACING: f32 = 10.0;
    /// Random placement attempts per item before it is dropped
    pub const PLACEMENT_RETRIES: u32 = 64;

    /// Periodic task intervals
    pub const SWING_TICK_MS: u32 = 50;
    pub const DECISION_TICK_MS: u32 = 50;
    pub const SESSION_TICK_MS: u32 = 1000;
    /// Maximum ticks of one task per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Minimum time between two autoplay deployments
    pub const FIRE_COOLDOWN_MS: u64 = 1000;
    /// How long a fired-at spot stays discounted
    pub const POSITION_COOLDOWN_MS: u64 = 5000;
    /// Safety margin added to an item's radius when recording a cooldown spot
    pub const COOLDOWN_RADIUS_PAD: f32 = 10.0;
    /// Entries kept in the rolling decision log
    pub const DECISION_LOG_LEN: usize = 10;
}

/// Clamp an angle (degrees) into the hook's legal swing range
#[inline]
pub fn clamp_angle(angle: f32) -> f32 {
    angle.clamp(-consts::MAX_ANGLE, consts::MAX_ANGLE)
}

/// Whether an angle (degrees) is inside the hook's legal swing range
#[inline]
pub fn angle_in_range(angle: f32) -> bool {
    angle.is_finite() && (-consts::MAX_ANGLE..=consts::MAX_ANGLE).contains(&angle)
}
