//! Recently fired-at spots that autoplay should not re-target right away

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownSpot {
    pub center: Vec2,
    pub radius: f32,
    pub at_ms: u64,
}

impl CooldownSpot {
    fn expired(&self, now_ms: u64, window_ms: u64) -> bool {
        now_ms.saturating_sub(self.at_ms) >= window_ms
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownList {
    spots: Vec<CooldownSpot>,
    window_ms: u64,
}

impl CooldownList {
    pub fn new(window_ms: u64) -> Self {
        Self {
            spots: Vec::new(),
            window_ms,
        }
    }

    pub fn record(&mut self, center: Vec2, radius: f32, now_ms: u64) {
        self.spots.push(CooldownSpot {
            center,
            radius,
            at_ms: now_ms,
        });
    }

    /// Drop spots older than the window
    pub fn prune(&mut self, now_ms: u64) {
        let window = self.window_ms;
        self.spots.retain(|s| !s.expired(now_ms, window));
    }

    /// Whether `point` falls inside a live spot. Expired spots are ignored
    /// even before the next prune.
    pub fn contains(&self, point: Vec2, now_ms: u64) -> bool {
        self.spots
            .iter()
            .filter(|s| !s.expired(now_ms, self.window_ms))
            .any(|s| s.center.distance(point) <= s.radius)
    }

    pub fn clear(&mut self) {
        self.spots.clear();
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn spots(&self) -> &[CooldownSpot] {
        &self.spots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_covers_radius_until_expiry() {
        let mut list = CooldownList::new(5000);
        list.record(Vec2::new(100.0, 100.0), 30.0, 1_000);

        assert!(list.contains(Vec2::new(120.0, 100.0), 2_000));
        assert!(!list.contains(Vec2::new(140.0, 100.0), 2_000));
        assert!(list.contains(Vec2::new(100.0, 100.0), 5_999));
        assert!(!list.contains(Vec2::new(100.0, 100.0), 6_000));
    }

    #[test]
    fn test_prune_is_lazy_and_exact() {
        let mut list = CooldownList::new(5000);
        list.record(Vec2::ZERO, 10.0, 0);
        list.record(Vec2::ONE, 10.0, 3_000);
        list.prune(4_999);
        assert_eq!(list.len(), 2);
        list.prune(5_000);
        assert_eq!(list.len(), 1);
        list.clear();
        assert!(list.is_empty());
    }
}
