//! Short-lived decorative particles.

use dungeon_runner_core::Rgb;
use rand::Rng;

const LIFETIME: u32 = 45;
const GRAVITY: f32 = 0.3;

/// Color of the burst emitted when a pickup is collected.
pub const PICKUP_COLOR: Rgb = Rgb::from_rgb(255, 105, 180);
/// Color of the burst emitted when the player is hurt.
pub const DAMAGE_COLOR: Rgb = Rgb::from_rgb(255, 50, 50);

/// Falling square that fades out over its lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: u32,
    color: Rgb,
    size: u32,
}

impl Particle {
    /// Spawns a particle, drawing a random upward spray when no velocity is given.
    pub fn new<R: Rng>(
        x: f32,
        y: f32,
        color: Rgb,
        velocity: Option<(f32, f32)>,
        rng: &mut R,
    ) -> Self {
        let (vx, vy) = velocity
            .unwrap_or_else(|| (rng.gen_range(-6.0..=6.0), rng.gen_range(-8.0..=-2.0)));
        let size = rng.gen_range(6..=12);
        Self {
            x,
            y,
            vx,
            vy,
            life: LIFETIME,
            color,
            size,
        }
    }

    /// Appends `count` randomly sprayed particles originating at `(x, y)`.
    pub fn burst<R: Rng>(
        out: &mut Vec<Particle>,
        x: f32,
        y: f32,
        color: Rgb,
        count: usize,
        rng: &mut R,
    ) {
        out.extend((0..count).map(|_| Self::new(x, y, color, None, rng)));
    }

    /// Moves the particle and burns one frame of life.
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.life = self.life.saturating_sub(1);
    }

    /// Whether the particle still has life left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Opacity in `[0, 1]`, proportional to remaining life.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.life as f32 / LIFETIME as f32
    }

    /// Horizontal position.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical position.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Edge length in world units.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Base color before fading.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn random_spray_stays_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut particles = Vec::new();
        Particle::burst(&mut particles, 50.0, 60.0, PICKUP_COLOR, 25, &mut rng);

        assert_eq!(particles.len(), 25);
        for particle in &particles {
            assert!((-6.0..=6.0).contains(&particle.vx));
            assert!((-8.0..=-2.0).contains(&particle.vy));
            assert!((6..=12).contains(&particle.size()));
            assert_eq!(particle.life, LIFETIME);
            assert_eq!(particle.alpha(), 1.0);
        }
    }

    #[test]
    fn explicit_velocity_is_used_verbatim() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut particle = Particle::new(0.0, 0.0, DAMAGE_COLOR, Some((1.0, -2.0)), &mut rng);
        particle.update();
        assert_eq!(particle.x(), 1.0);
        assert_eq!(particle.y(), -2.0);
        particle.update();
        assert!((particle.y() - (-3.7)).abs() < 1e-5);
    }

    #[test]
    fn expires_after_lifetime() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut particle = Particle::new(0.0, 0.0, PICKUP_COLOR, None, &mut rng);
        for _ in 0..LIFETIME - 1 {
            particle.update();
        }
        assert!(particle.is_alive());
        assert!((particle.alpha() - 1.0 / 45.0).abs() < 1e-6);
        particle.update();
        assert!(!particle.is_alive());
    }
}
