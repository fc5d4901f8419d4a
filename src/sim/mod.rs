//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by item ID)
//! - No rendering, animation or wall-clock dependencies

pub mod collision;
pub mod geometry;
pub mod hook;
pub mod item;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{check_capture, has_obstacle_in_path, sweep_capture};
pub use geometry::{Rect, angle_to, distance, hook_endpoint};
pub use hook::{Hook, HookState, retract_duration_ms, retract_speed};
pub use item::{Item, ItemId, ItemKind};
pub use level::{ItemSpawn, LevelConfig, default_levels, generate_items};
pub use state::{GameEvent, GameState, GameStatus, RngState};
pub use tick::{CaptureResult, Collected};
