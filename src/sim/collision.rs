//! Hook capture detection and path obstacle queries
//!
//! Both queries are read-only: they report what the hook would hit and
//! leave committing the result to the state machine.

use std::cmp::Ordering;

use glam::Vec2;

use super::geometry::{distance, hook_endpoint};
use super::item::Item;
use crate::settings::HookTuning;

/// Extra clearance around an item's radius when testing the straight path
pub const OBSTACLE_PATH_MARGIN: f32 = 5.0;

/// Whether the hook tip at `tip` catches `item`
///
/// Two forgiving checks, either one is enough: the tip is within
/// `hook_radius + item radius` of the item's center, or it lies inside the
/// item's bounding box grown by `capture_margin`.
pub fn tip_catches(tip: Vec2, item: &Item, tuning: &HookTuning) -> bool {
    let near_center = distance(tip, item.center()) < tuning.hook_radius + item.radius();
    near_center || item.bounds().expand(tuning.capture_margin).contains(tip)
}

/// Whether an item sits beyond the minimum reach (exclusive)
#[inline]
pub fn beyond_min_reach(origin: Vec2, item: &Item, tuning: &HookTuning) -> bool {
    distance(origin, item.center()) > tuning.min_reach
}

/// Find the item caught by a hook at `angle`/`length`.
///
/// Collected items and items within minimum reach never qualify. When
/// several qualify the one nearest the tip wins, exact ties go to the
/// lowest id.
pub fn check_capture<'a>(
    origin: Vec2,
    angle: f32,
    length: f32,
    items: &'a [Item],
    tuning: &HookTuning,
) -> Option<&'a Item> {
    let tip = hook_endpoint(origin, angle, length);

    items
        .iter()
        .filter(|item| !item.collected)
        .filter(|item| beyond_min_reach(origin, item, tuning))
        .filter(|item| tip_catches(tip, item, tuning))
        .map(|item| (item, distance(tip, item.center())))
        .min_by(|(a, da), (b, db)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(item, _)| item)
}

/// Sweep the tip along `angle` from length `from` out to `to` and return the
/// first item it touches, with the rope length at first contact.
///
/// The tip advances at most `hook_radius` per check, so a long jump between
/// two frames cannot carry it over an item. Each check uses the same
/// ordering as `check_capture`.
pub fn sweep_capture<'a>(
    origin: Vec2,
    angle: f32,
    from: f32,
    to: f32,
    items: &'a [Item],
    tuning: &HookTuning,
) -> Option<(&'a Item, f32)> {
    let step = tuning.hook_radius.max(1.0);
    let mut length = from.min(to);
    loop {
        if let Some(item) = check_capture(origin, angle, length, items, tuning) {
            return Some((item, length));
        }
        if length >= to {
            return None;
        }
        length = (length + step).min(to);
    }
}

/// Whether another uncollected item blocks the straight line from `origin`
/// to `target`'s center.
///
/// Only items nearer than the target whose center projects onto the path
/// segment within `radius + OBSTACLE_PATH_MARGIN` count. `counts` lets the
/// caller exempt items (hazards it does not care about, obstacles worth
/// the risk).
pub fn has_obstacle_in_path<F>(target: &Item, items: &[Item], origin: Vec2, mut counts: F) -> bool
where
    F: FnMut(&Item) -> bool,
{
    let path = target.center() - origin;
    let path_len = path.length();
    if path_len <= f32::EPSILON {
        return false;
    }
    let dir = path / path_len;

    items.iter().any(|item| {
        if item.id == target.id || item.collected {
            return false;
        }

        let rel = item.center() - origin;
        if rel.length() > path_len {
            return false;
        }

        // Behind the pivot or past the target
        let projection = rel.dot(dir);
        if !(0.0..=path_len).contains(&projection) {
            return false;
        }

        let off_path = (rel - dir * projection).length();
        off_path < item.radius() + OBSTACLE_PATH_MARGIN && counts(item)
    })
}
