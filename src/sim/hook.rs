//! The hook actor: swing oscillation and rope speeds

use serde::{Deserialize, Serialize};

use super::item::ItemId;
use crate::consts::MAX_ANGLE;
use crate::settings::{HookTuning, ResumePolicy};

/// Hook lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookState {
    /// Oscillating between the angle bounds, ready to fire
    Swinging,
    /// Rope paying out, capture polled every frame
    Extending,
    /// Short yank after a catch before reeling in
    Pulling,
    /// Rope coming back, with or without an item
    Retracting,
}

/// The single retrieval actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hook {
    /// Degrees, 0 = straight down, positive toward +x
    pub angle: f32,
    pub length: f32,
    /// +1.0 or -1.0
    pub direction: f32,
    pub state: HookState,
    /// Only set while pulling or retracting after a catch
    pub caught: Option<ItemId>,
    /// Time spent in the current pull pause
    #[serde(default)]
    pub pull_elapsed_ms: u32,
}

impl Hook {
    pub fn new(tuning: &HookTuning) -> Self {
        Self {
            angle: 0.0,
            length: tuning.min_length,
            direction: 1.0,
            state: HookState::Swinging,
            caught: None,
            pull_elapsed_ms: 0,
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.state == HookState::Swinging
    }

    /// Advance the swing by `delta_ms`. The hook sweeps a triangle wave
    /// between -MAX_ANGLE and +MAX_ANGLE, flipping direction at each bound.
    pub fn swing(&mut self, delta_ms: f32, speed: f32) {
        if self.state != HookState::Swinging || delta_ms <= 0.0 {
            return;
        }

        // Phase along one full back-and-forth period [0, 4*MAX)
        let half = 2.0 * MAX_ANGLE;
        let period = 2.0 * half;
        let phase = if self.direction >= 0.0 {
            self.angle + MAX_ANGLE
        } else {
            half + (MAX_ANGLE - self.angle)
        };
        let phase = (phase + speed * delta_ms).rem_euclid(period);

        if phase < half {
            self.angle = phase - MAX_ANGLE;
            self.direction = 1.0;
        } else {
            self.angle = MAX_ANGLE - (phase - half);
            self.direction = -1.0;
        }
    }

    /// Point the hook before firing. Only legal while swinging.
    pub fn aim(&mut self, angle: f32) -> bool {
        if !self.is_swinging() || !crate::angle_in_range(angle) {
            return false;
        }
        self.angle = angle;
        true
    }

    /// Back to swinging at minimum length
    pub fn resume_swing(&mut self, tuning: &HookTuning) {
        self.state = HookState::Swinging;
        self.length = tuning.min_length;
        self.caught = None;
        self.pull_elapsed_ms = 0;
        if tuning.resume_policy == ResumePolicy::Center {
            self.angle = 0.0;
            self.direction = 1.0;
        }
    }
}

/// Rope speed while retracting (pixels/ms).
///
/// Non-increasing in weight and never below `min_retract_speed`.
pub fn retract_speed(weight: Option<u32>, tuning: &HookTuning) -> f32 {
    let drag = weight.unwrap_or(0) as f32 * tuning.retract_weight_drag;
    (tuning.base_retract_speed - drag).max(tuning.min_retract_speed)
}

/// Time to reel in from `length` to minimum length
pub fn retract_duration_ms(length: f32, weight: Option<u32>, tuning: &HookTuning) -> u32 {
    let travel = (length - tuning.min_length).max(0.0);
    (travel / retract_speed(weight, tuning)).ceil() as u32
}
