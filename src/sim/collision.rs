//! Ground collision for the runner
//!
//! Only landings matter: the player is a unit box that can come to rest on a
//! platform roof. Hitting a building from the side or from below is not a
//! collision, the player simply keeps falling past it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::world::Platform;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with full extents `size`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Touching boxes count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// Overlap of two boxes (only meaningful when they intersect)
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }
}

/// Bounding box of the player: a unit cube standing on `y`
pub fn player_box(y: f32) -> Aabb {
    Aabb::new(Vec3::new(-0.5, y, -0.5), Vec3::new(0.5, y + 1.0, 0.5))
}

/// A successful landing check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Platform that was hit
    pub index: usize,
    /// Height the player rests at
    pub top_y: f32,
}

/// Check whether `body` is sinking into the roof of `platform`
///
/// A hit needs the boxes to overlap with the body's bottom at or below the roof
/// while its top is still above it. Returns the height of the overlap top.
pub fn roof_contact(body: &Aabb, platform: &Aabb) -> Option<f32> {
    if !body.intersects(platform) {
        return None;
    }
    if body.min.y <= platform.max.y && body.max.y > platform.max.y {
        return Some(body.intersection(platform).max.y);
    }
    None
}

/// Find the platform the player is standing on
///
/// Platforms are laid out left to right in index order (with wrap-around), so
/// only the last platform hit and the one after it can be under the player.
/// Checks those two in that order and stops at the first hit.
pub fn find_ground_collision(
    body: &Aabb,
    platforms: &[Platform],
    start_index: usize,
) -> Option<GroundHit> {
    if platforms.is_empty() {
        return None;
    }
    let count = platforms.len();
    (0..2.min(count))
        .map(|i| (start_index + i) % count)
        .find_map(|index| {
            roof_contact(body, &platforms[index].bounds()).map(|top_y| GroundHit { index, top_y })
        })
}
