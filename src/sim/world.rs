//! Scrolling world: recycled rooftops and the city skyline ring
//!
//! Nothing here is ever allocated after [`World::generate`]. Platforms that
//! leave the screen on the left are moved one full ring length to the right
//! and re-rolled, and the skyline segments are re-laid every tick from the
//! leftmost one so they can never drift apart.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rng::RunRng;
use crate::config::Tuning;
use crate::consts::{CITY_SEGMENT_Y, CITY_SEGMENT_Z};
use crate::scene::PlatformHandle;

/// Material used to draw a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialClass {
    /// Full-width building facade
    #[default]
    Full,
    /// Narrow building facade
    Half,
}

impl MaterialClass {
    /// Narrow buildings get the half facade so the texture doesn't squash
    pub fn classify(width: f32, height: f32, half_ratio: f32) -> Self {
        if width / height < half_ratio {
            MaterialClass::Half
        } else {
            MaterialClass::Full
        }
    }
}

/// A building the player can land on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Centre of the building
    pub position: Vec3,
    /// Full extents (width, height, depth)
    pub size: Vec3,
    pub material: MaterialClass,
}

impl Platform {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Height of the roof
    pub fn roof_y(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }

    pub fn left_edge(&self) -> f32 {
        self.position.x - self.size.x / 2.0
    }

    pub fn right_edge(&self) -> f32 {
        self.position.x + self.size.x / 2.0
    }
}

/// One tile of the skyline backdrop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSegment {
    pub position: Vec3,
    pub scale: f32,
}

/// All scrolling geometry of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    platforms: Vec<Platform>,
    backgrounds: Vec<BackgroundSegment>,
    /// Index of the skyline segment that is currently leftmost
    bg_left_index: usize,
}

impl World {
    /// Build the opening layout
    ///
    /// The first platform is always full width at the canonical height so the
    /// player starts on solid ground; the rest draw their width ratio and then
    /// their roof offset from `rng`.
    pub fn generate(tuning: &Tuning, rng: &mut RunRng) -> Self {
        let mut world = Self {
            platforms: vec![Platform::default(); tuning.num_platforms],
            backgrounds: vec![BackgroundSegment::default(); tuning.num_city_segments],
            bg_left_index: 0,
        };
        world.regenerate(tuning, rng);
        world
    }

    /// Lay the opening layout out again in the existing slots
    pub fn regenerate(&mut self, tuning: &Tuning, rng: &mut RunRng) {
        let pitch = tuning.platform_pitch();
        let mut x = tuning.platform_length / 2.0 - 0.1;
        for (i, platform) in self.platforms.iter_mut().enumerate() {
            *platform = if i == 0 {
                make_platform(tuning, x, 1.0, 0.0)
            } else {
                roll_platform(tuning, rng, x)
            };
            x += pitch;
        }

        let scale = tuning.city_segment_scale;
        for (i, segment) in self.backgrounds.iter_mut().enumerate() {
            *segment = BackgroundSegment {
                position: Vec3::new(
                    -scale + i as f32 * scale,
                    CITY_SEGMENT_Y,
                    CITY_SEGMENT_Z,
                ),
                scale,
            };
        }
        self.bg_left_index = 0;
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn backgrounds(&self) -> &[BackgroundSegment] {
        &self.backgrounds
    }

    pub fn bg_left_index(&self) -> usize {
        self.bg_left_index
    }

    /// Move every platform left by `dx`, recycling the ones past the boundary
    ///
    /// Returns how many platforms were recycled.
    pub fn scroll_platforms(&mut self, tuning: &Tuning, rng: &mut RunRng, dx: f32) -> usize {
        let limit = tuning.recycle_boundary();
        let ring_length = self.platforms.len() as f32 * tuning.platform_pitch();
        let mut recycled = 0;
        for platform in &mut self.platforms {
            platform.position.x -= dx;
            if platform.position.x < limit {
                let spawn_x = platform.position.x + ring_length;
                *platform = roll_platform(tuning, rng, spawn_x);
                recycled += 1;
            }
        }
        if recycled > 0 {
            log::trace!("Recycled {recycled} platform(s)");
        }
        recycled
    }

    /// Move the skyline left by `dx`, keeping the ring contiguous
    pub fn scroll_background(&mut self, tuning: &Tuning, dx: f32) {
        let count = self.backgrounds.len();
        if count == 0 {
            return;
        }
        let mut left_x = self.backgrounds[self.bg_left_index].position.x - dx;
        if left_x < tuning.bg_recycle_boundary() {
            left_x += self.backgrounds[self.bg_left_index].scale;
            self.bg_left_index = (self.bg_left_index + 1) % count;
        }
        let mut x = left_x;
        for i in 0..count {
            let idx = (self.bg_left_index + i) % count;
            self.backgrounds[idx].position.x = x;
            x += self.backgrounds[idx].scale;
        }
    }

    /// Push platform transforms to their renderable handles
    pub fn sync_platforms<H: PlatformHandle>(&self, handles: &mut [H]) {
        for (platform, handle) in self.platforms.iter().zip(handles.iter_mut()) {
            handle.set_position(platform.position);
            handle.set_scale(platform.size);
            handle.set_material(platform.material);
        }
    }
}

fn make_platform(tuning: &Tuning, x: f32, ratio: f32, offset: f32) -> Platform {
    let width = tuning.platform_length * ratio;
    Platform {
        position: Vec3::new(x, tuning.platform_center_y() + offset, 0.0),
        size: Vec3::new(width, tuning.platform_height, width),
        material: MaterialClass::classify(
            width,
            tuning.platform_height,
            tuning.half_material_ratio,
        ),
    }
}

/// Width first, then offset: the call order is part of the seed contract
fn roll_platform(tuning: &Tuning, rng: &mut RunRng, x: f32) -> Platform {
    let ratio = rng.next(tuning.platform_min_ratio, tuning.platform_max_ratio);
    let offset = rng.next(tuning.platform_min_offset, tuning.platform_max_offset);
    make_platform(tuning, x, ratio, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted_by_x(world: &World) -> Vec<Platform> {
        let mut platforms = world.platforms().to_vec();
        platforms.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
        platforms
    }

    fn assert_spacing(world: &World, tuning: &Tuning) {
        let platforms = sorted_by_x(world);
        for pair in platforms.windows(2) {
            let pitch = pair[1].position.x - pair[0].position.x;
            assert!(
                (pitch - tuning.platform_pitch()).abs() < 1e-2,
                "pitch {pitch} drifted"
            );
            assert!(pair[0].right_edge() <= pair[1].left_edge());
        }
    }

    fn assert_skyline_contiguous(world: &World) {
        let count = world.backgrounds().len();
        let left = &world.backgrounds()[world.bg_left_index()];
        for i in 0..count {
            let seg = &world.backgrounds()[(world.bg_left_index() + i) % count];
            let expected = left.position.x + i as f32 * left.scale;
            assert!((seg.position.x - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_first_platform_is_canonical() {
        let tuning = Tuning::default();
        let world = World::generate(&tuning, &mut RunRng::seeded(1));
        let first = &world.platforms()[0];
        assert_eq!(first.size.x, tuning.platform_length);
        assert_eq!(first.position.y, tuning.platform_center_y());
        assert!((first.position.x - 2.9).abs() < 1e-6);
        assert_eq!(first.roof_y(), -0.5);
    }

    #[test]
    fn test_layout_follows_rng_call_order() {
        let tuning = Tuning::default();
        let world = World::generate(&tuning, &mut RunRng::seeded(666));
        let mut rng = RunRng::seeded(666);
        assert_eq!(world.platforms().len(), 8);
        for platform in &world.platforms()[1..] {
            let ratio = rng.next(0.35, 1.0);
            let offset = rng.next(-1.5, 1.5);
            assert_eq!(platform.size.x, tuning.platform_length * ratio);
            assert_eq!(platform.position.y, tuning.platform_center_y() + offset);
            assert!((0.35..1.0).contains(&ratio));
            assert!((-1.5..1.5).contains(&offset));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = Tuning::default();
        let a = World::generate(&tuning, &mut RunRng::seeded(5));
        let b = World::generate(&tuning, &mut RunRng::seeded(5));
        assert_eq!(a.platforms(), b.platforms());
        assert_eq!(a.backgrounds(), b.backgrounds());
    }

    #[test]
    fn test_material_threshold() {
        assert_eq!(MaterialClass::classify(6.0, 30.0, 0.15), MaterialClass::Full);
        assert_eq!(MaterialClass::classify(4.0, 30.0, 0.15), MaterialClass::Half);
    }

    #[test]
    fn test_recycle_moves_to_far_right() {
        let tuning = Tuning::default();
        let mut rng = RunRng::seeded(2);
        let mut world = World::generate(&tuning, &mut rng);
        // Platform 0 starts at 2.9: 35 units puts it just past -32
        let recycled = world.scroll_platforms(&tuning, &mut rng, 35.0);
        assert_eq!(recycled, 1);
        let rightmost = sorted_by_x(&world).last().cloned().expect("platforms");
        assert_eq!(rightmost.position, world.platforms()[0].position);
        assert_spacing(&world, &tuning);
    }

    #[test]
    fn test_skyline_starts_contiguous() {
        let world = World::generate(&Tuning::default(), &mut RunRng::seeded(0));
        let xs: Vec<f32> = world.backgrounds().iter().map(|b| b.position.x).collect();
        assert_eq!(xs, vec![-50.0, 0.0, 50.0, 100.0]);
        assert_skyline_contiguous(&world);
    }

    #[test]
    fn test_skyline_left_index_advances() {
        let tuning = Tuning::default();
        let mut world = World::generate(&tuning, &mut RunRng::seeded(0));
        world.scroll_background(&tuning, 51.0);
        assert_eq!(world.bg_left_index(), 1);
        assert_skyline_contiguous(&world);
        // Old leftmost tile is now at the right end of the ring
        let last = &world.backgrounds()[0];
        assert!((last.position.x - 99.0).abs() < 1e-3);
    }

    #[derive(Default)]
    struct Recorder {
        position: Vec3,
        scale: Vec3,
        material: Option<MaterialClass>,
    }

    impl PlatformHandle for Recorder {
        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }
        fn set_scale(&mut self, scale: Vec3) {
            self.scale = scale;
        }
        fn set_material(&mut self, material: MaterialClass) {
            self.material = Some(material);
        }
    }

    #[test]
    fn test_sync_pushes_transforms() {
        let world = World::generate(&Tuning::default(), &mut RunRng::seeded(8));
        let mut handles: Vec<Recorder> = (0..8).map(|_| Recorder::default()).collect();
        world.sync_platforms(&mut handles);
        for (platform, handle) in world.platforms().iter().zip(&handles) {
            assert_eq!(handle.position, platform.position);
            assert_eq!(handle.scale, platform.size);
            assert_eq!(handle.material, Some(platform.material));
        }
    }

    proptest! {
        #[test]
        fn prop_spacing_survives_recycling(
            seed in any::<u64>(),
            steps in prop::collection::vec(0.0f32..1.5, 1..400),
        ) {
            let tuning = Tuning::default();
            let mut rng = RunRng::seeded(seed);
            let mut world = World::generate(&tuning, &mut rng);
            for dx in steps {
                world.scroll_platforms(&tuning, &mut rng, dx);
                prop_assert_eq!(world.platforms().len(), tuning.num_platforms);
            }
            assert_spacing(&world, &tuning);
        }

        #[test]
        fn prop_skyline_stays_contiguous(steps in prop::collection::vec(0.0f32..1.2, 1..600)) {
            let tuning = Tuning::default();
            let mut world = World::generate(&tuning, &mut RunRng::seeded(0));
            for dx in steps {
                world.scroll_background(&tuning, dx);
            }
            assert_skyline_contiguous(&world);
        }
    }
}
