//! Decorative scenery: a looping hill profile and drifting clouds
//!
//! Purely visual. Uses its own seeded RNG so scenery never perturbs the
//! obstacle stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Profile length as a multiple of the screen width
const HILL_PROFILE_SCREENS: usize = 4;
const HILL_MIN_HEIGHT: f32 = 2.0;
const HILL_MAX_HEIGHT: f32 = 15.0;
/// Hill scroll speed (units/s)
const HILL_SPEED: f32 = 8.0;

/// Seconds between clouds (min, max)
const CLOUD_INTERVAL: (f32, f32) = (15.0, 30.0);
/// Clouds live in this top fraction of the screen
const CLOUD_BAND: f32 = 0.4;
/// How far past the left edge a cloud drifts before eviction
const CLOUD_EVICT_MARGIN: f32 = 20.0;
pub const CLOUD_VARIANTS: u8 = 3;

/// A drifting cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Sprite shape, `0..CLOUD_VARIANTS`
    pub variant: u8,
}

/// Rolling hills sampled once per column, scrolled with an offset
#[derive(Debug, Clone)]
pub struct HillProfile {
    heights: Vec<f32>,
    offset: f32,
    speed: f32,
}

impl HillProfile {
    /// Summed sines with a little noise, clamped to a sane band
    fn generate(screen_width: u16, rng: &mut Pcg32) -> Self {
        let width = (screen_width as usize * HILL_PROFILE_SCREENS).max(1);
        let heights = (0..width)
            .map(|x| {
                let t = x as f32 / width as f32 * 4.0 * std::f32::consts::PI;
                let base = 6.0 + 4.0 * (t * 0.5).sin();
                let medium = 2.5 * (t * 1.2 + 1.5).sin();
                let small = 1.2 * (t * 2.3 + 0.7).sin();
                let noise = rng.random::<f32>() - 0.5;
                (base + medium + small + noise).clamp(HILL_MIN_HEIGHT, HILL_MAX_HEIGHT)
            })
            .collect();

        Self {
            heights,
            offset: 0.0,
            speed: HILL_SPEED,
        }
    }

    fn update(&mut self, dt: f32) {
        self.offset += self.speed * dt;
        // Loop after half a profile so the seam is never on screen
        let half = self.heights.len() as f32 / 2.0;
        if self.offset >= half {
            self.offset -= half;
        }
    }

    /// Hill height under screen column `x`
    pub fn height_at(&self, x: f32) -> f32 {
        let len = self.heights.len() as i64;
        let index = ((self.offset + x).floor() as i64).rem_euclid(len);
        self.heights[index as usize]
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

/// Scenery state, advanced only while a run is in progress
#[derive(Debug, Clone)]
pub struct Background {
    clouds: Vec<Cloud>,
    hills: HillProfile,
    screen_width: u16,
    screen_height: u16,
    since_cloud: f32,
    next_cloud_in: f32,
    rng: Pcg32,
}

impl Background {
    pub fn new(screen_width: u16, screen_height: u16, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hills = HillProfile::generate(screen_width, &mut rng);
        Self {
            clouds: Vec::with_capacity(8),
            hills,
            screen_width,
            screen_height,
            since_cloud: 0.0,
            // First cloud right away
            next_cloud_in: 0.0,
            rng,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.hills.update(dt);

        self.since_cloud += dt;
        if self.since_cloud >= self.next_cloud_in {
            self.spawn_cloud();
            self.since_cloud = 0.0;
            let (lo, hi) = CLOUD_INTERVAL;
            self.next_cloud_in = self.rng.random_range(lo..hi);
        }

        for i in (0..self.clouds.len()).rev() {
            let cloud = &mut self.clouds[i];
            cloud.x -= cloud.speed * dt;
            if cloud.x + cloud.width < -CLOUD_EVICT_MARGIN {
                self.clouds.swap_remove(i);
            }
        }
    }

    fn spawn_cloud(&mut self) {
        let band = self.screen_height as f32 * CLOUD_BAND;
        let cloud = Cloud {
            x: self.screen_width as f32 + 10.0,
            y: 1.0 + self.rng.random::<f32>() * band,
            width: self.rng.random_range(12.0..20.0),
            height: self.rng.random_range(2.0..3.0),
            speed: self.rng.random_range(3.0..5.0),
            variant: self.rng.random_range(0..CLOUD_VARIANTS),
        };
        log::trace!("Cloud spawned at y={:.1}", cloud.y);
        self.clouds.push(cloud);
    }

    /// Clear clouds and draw a fresh hill profile
    pub fn reset(&mut self) {
        self.clouds.clear();
        self.since_cloud = 0.0;
        self.next_cloud_in = 0.0;
        self.hills = HillProfile::generate(self.screen_width, &mut self.rng);
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn hills(&self) -> &HillProfile {
        &self.hills
    }

    pub fn hill_height_at(&self, x: f32) -> f32 {
        self.hills.height_at(x)
    }
}
