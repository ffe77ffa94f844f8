//! # Glassbreak Physics
//!
//! Simplified rigid-body stepping for glass fragments.
//!
//! ## Features
//! - Gravity, air and spin damping
//! - Ground contact with restitution, friction and resting detection
//! - Room containment (side walls and ceiling) with lossy bounces
//! - Frame-rate independent: damping constants are authored per 60 Hz
//!   frame and rescaled to the actual step, so slow motion is a pure
//!   time scale
//!
//! The stepper only touches kinematics. It knows nothing about how a
//! fragment is drawn.

use glam::{Mat4, Vec3};
use glassbreak_core::math::euler_to_quat;
use serde::{Deserialize, Serialize};

/// Frame rate the damping constants are authored at
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// Default restitution for fragments that don't override it
pub const DEFAULT_BOUNCE: f32 = 0.3;

/// Default ground friction for fragments that don't override it
pub const DEFAULT_FRICTION: f32 = 0.85;

/// Default resting height above the floor
pub const DEFAULT_GROUND_HEIGHT: f32 = 0.01;

/// Physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Linear velocity kept per reference frame in flight
    pub air_damping: f32,
    /// Angular velocity kept per reference frame
    pub angular_damping: f32,
    /// Angular velocity kept per reference frame while touching the floor
    pub contact_spin_damping: f32,
    /// Vertical speed below which a ground hit comes to rest
    pub bounce_threshold: f32,
    /// Speed below which a grounded fragment counts as resting
    pub rest_speed: f32,
    /// Velocity kept (and reversed) on wall and ceiling hits
    pub wall_restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            air_damping: 0.98,
            angular_damping: 0.98,
            contact_spin_damping: 0.85,
            bounce_threshold: 0.1,
            rest_speed: 0.01,
            wall_restitution: 0.3,
        }
    }
}

/// Interior extents of the room fragments are confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    /// Wall clamp on X, centred on the origin
    pub half_width: f32,
    /// Wall clamp on Z, centred on the origin
    pub half_depth: f32,
    /// Ceiling clamp on Y
    pub ceiling: f32,
}

impl RoomBounds {
    /// Inset from every wall so fragments don't z-fight with the tiles
    pub const WALL_INSET: f32 = 0.05;

    /// Bounds for a room of the given interior size
    pub fn from_room(width: f32, depth: f32, height: f32) -> Self {
        Self {
            half_width: width / 2.0 - Self::WALL_INSET,
            half_depth: depth / 2.0 - Self::WALL_INSET,
            ceiling: height - Self::WALL_INSET,
        }
    }

    /// Whether a point is inside the room and above `floor`
    pub fn contains(&self, point: Vec3, floor: f32) -> bool {
        point.x.abs() <= self.half_width + 1e-5
            && point.z.abs() <= self.half_depth + 1e-5
            && point.y >= floor - 1e-5
            && point.y <= self.ceiling + 1e-5
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self::from_room(4.0, 3.5, 2.8)
    }
}

/// Kinematic state of one fragment
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// XYZ Euler angles in radians
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
    /// Height of the fragment's centre when lying on the floor
    pub ground_contact_y: f32,
    /// Fraction of vertical speed kept on a floor bounce
    pub bounce_coefficient: f32,
    /// Horizontal speed kept per reference frame on the floor
    pub friction_coefficient: f32,
    pub on_ground: bool,
    /// Floor bounces so far
    pub bounce_count: u32,
    /// Never integrated (crack overlays)
    pub is_static: bool,
}

impl FragmentBody {
    /// Moving body with default contact parameters
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            ground_contact_y: DEFAULT_GROUND_HEIGHT,
            bounce_coefficient: DEFAULT_BOUNCE,
            friction_coefficient: DEFAULT_FRICTION,
            on_ground: false,
            bounce_count: 0,
            is_static: false,
        }
    }

    /// Body that is drawn but never simulated
    pub fn fixed(position: Vec3) -> Self {
        Self {
            is_static: true,
            ..Self::new(position, Vec3::ZERO)
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3, angular_velocity: Vec3) -> Self {
        self.rotation = rotation;
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_contact(mut self, ground_contact_y: f32, bounce: f32, friction: f32) -> Self {
        self.ground_contact_y = ground_contact_y;
        self.bounce_coefficient = bounce;
        self.friction_coefficient = friction;
        self
    }

    /// Whether the body is lying still on the floor
    pub fn is_resting(&self, rest_speed: f32) -> bool {
        self.on_ground && self.velocity.length() < rest_speed
    }

    /// World transform from position and rotation
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(euler_to_quat(self.rotation), self.position)
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Bodies integrated this step
    pub integrated: usize,
    /// Bodies skipped as static
    pub skipped_static: usize,
    /// Floor bounces this step
    pub bounces: usize,
    /// Every non-static body is at rest after the step
    pub settled: bool,
}

/// Integrates fragment bodies inside a room
#[derive(Debug, Clone)]
pub struct PhysicsStepper {
    config: PhysicsConfig,
    room: RoomBounds,
}

impl PhysicsStepper {
    pub fn new(config: PhysicsConfig, room: RoomBounds) -> Self {
        Self { config, room }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn room(&self) -> &RoomBounds {
        &self.room
    }

    /// Advance every body by `dt` seconds of simulated time.
    ///
    /// Static and resting bodies are left untouched.
    pub fn step<'a>(&self, bodies: impl IntoIterator<Item = &'a mut FragmentBody>, dt: f32) -> StepReport {
        let mut report = StepReport {
            settled: true,
            ..Default::default()
        };
        let advance = dt.is_finite() && dt > 0.0;
        if !advance {
            log::trace!("Ignoring step with dt {}", dt);
        }

        for body in bodies {
            if body.is_static {
                report.skipped_static += 1;
                continue;
            }
            if body.is_resting(self.config.rest_speed) {
                continue;
            }
            if !advance {
                report.settled = false;
                continue;
            }

            report.integrated += 1;
            if self.integrate(body, dt) {
                report.bounces += 1;
            }
            if !body.is_resting(self.config.rest_speed) {
                report.settled = false;
            }
        }
        report
    }

    /// Returns true when the body bounced off the floor
    fn integrate(&self, body: &mut FragmentBody, dt: f32) -> bool {
        let c = &self.config;
        let frames = dt * REFERENCE_FRAME_RATE;

        // Gravity lands mid-step so the damped sum matches at any dt
        let damping = c.air_damping.powf(frames);
        let previous = body.velocity;
        body.velocity *= damping;
        body.velocity.y += c.gravity * dt * damping.sqrt();
        body.position += (previous + body.velocity) * 0.5 * dt;

        let spin = body.angular_velocity;
        body.angular_velocity *= c.angular_damping.powf(frames);
        body.rotation += (spin + body.angular_velocity) * 0.5 * dt;

        let mut bounced = false;
        if body.position.y < body.ground_contact_y {
            body.position.y = body.ground_contact_y;

            // One step of gravity alone must not count as a bounce
            let threshold = c.bounce_threshold + c.gravity.abs() * dt;
            if body.velocity.y.abs() > threshold {
                body.velocity.y = -body.velocity.y * body.bounce_coefficient;
                body.bounce_count += 1;
                bounced = true;
            } else {
                body.velocity.y = 0.0;
                body.on_ground = true;
            }

            let friction = body.friction_coefficient.powf(frames);
            body.velocity.x *= friction;
            body.velocity.z *= friction;
            body.angular_velocity *= c.contact_spin_damping.powf(frames);
        }

        let room = &self.room;
        let wall = c.wall_restitution;
        if body.position.x.abs() > room.half_width {
            body.position.x = room.half_width.copysign(body.position.x);
            body.velocity.x *= -wall;
        }
        if body.position.z.abs() > room.half_depth {
            body.position.z = room.half_depth.copysign(body.position.z);
            body.velocity.z *= -wall;
        }
        if body.position.y > room.ceiling {
            body.position.y = room.ceiling;
            body.velocity.y *= -wall;
        }

        bounced
    }
}

impl Default for PhysicsStepper {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), RoomBounds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn burst(count: usize, seed: u64) -> Vec<FragmentBody> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-0.425..0.425),
                    rng.gen_range(0.1..1.85),
                    rng.gen_range(-0.004..0.004),
                );
                let velocity = Vec3::new(
                    rng.gen_range(-12.0..12.0),
                    rng.gen_range(-4.0..15.0),
                    rng.gen_range(-12.0..12.0),
                );
                let spin = Vec3::splat(rng.gen_range(-7.5..7.5));
                FragmentBody::new(position, velocity).with_rotation(Vec3::ZERO, spin)
            })
            .collect()
    }

    fn run_until_settled(stepper: &PhysicsStepper, bodies: &mut [FragmentBody], dt: f32, limit: f32) -> Option<f32> {
        let mut t = 0.0;
        while t < limit {
            let report = stepper.step(bodies.iter_mut(), dt);
            t += dt;
            if report.settled {
                return Some(t);
            }
        }
        None
    }

    #[test]
    fn test_config_defaults() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, -9.81);
        assert_eq!(config.air_damping, 0.98);
        assert_eq!(config.wall_restitution, 0.3);

        let room = RoomBounds::default();
        assert!((room.half_width - 1.95).abs() < 1e-6);
        assert!((room.half_depth - 1.70).abs() < 1e-6);
        assert!((room.ceiling - 2.75).abs() < 1e-6);
    }

    #[test]
    fn test_config_partial_json() {
        let config: PhysicsConfig = serde_json::from_str(r#"{"gravity": -3.7}"#).unwrap();
        assert_eq!(config.gravity, -3.7);
        assert_eq!(config.rest_speed, 0.01);
    }

    #[test]
    fn test_settles_within_ten_seconds() {
        let stepper = PhysicsStepper::default();
        let mut bodies = burst(300, 7);
        let settled_at = run_until_settled(&stepper, &mut bodies, 1.0 / 60.0, 10.0);
        assert!(settled_at.is_some(), "fragments still moving after 10s");
        assert!(bodies.iter().all(|b| b.on_ground));

        // Nothing moves once settled
        let snapshot = bodies.clone();
        let report = stepper.step(bodies.iter_mut(), 1.0 / 60.0);
        assert_eq!(report.integrated, 0);
        assert!(report.settled);
        assert_eq!(bodies, snapshot);
    }

    #[test]
    fn test_settles_at_low_frame_rate() {
        let stepper = PhysicsStepper::default();
        let mut bodies = burst(100, 11);
        assert!(run_until_settled(&stepper, &mut bodies, 0.1, 10.0).is_some());
    }

    #[test]
    fn test_slow_motion_is_time_scale() {
        let stepper = PhysicsStepper::default();
        let start = FragmentBody::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(1.0, 0.5, 0.8))
            .with_rotation(Vec3::ZERO, Vec3::new(2.0, -1.0, 3.0));

        let mut normal = start.clone();
        for _ in 0..30 {
            stepper.step(std::iter::once(&mut normal), 1.0 / 60.0);
        }
        let mut slow = start;
        for _ in 0..150 {
            stepper.step(std::iter::once(&mut slow), 1.0 / 60.0 * 0.2);
        }

        assert!(normal.position.distance(slow.position) < 0.02);
        assert!(normal.velocity.distance(slow.velocity) < 0.02);
        assert!(normal.rotation.distance(slow.rotation) < 0.02);
    }

    #[test]
    fn test_containment_every_step() {
        let stepper = PhysicsStepper::default();
        let mut bodies = vec![
            FragmentBody::new(Vec3::new(1.9, 1.0, 0.0), Vec3::new(40.0, 0.0, 0.0)),
            FragmentBody::new(Vec3::new(0.0, 1.0, -1.6), Vec3::new(0.0, 0.0, -40.0)),
            FragmentBody::new(Vec3::new(0.0, 2.7, 0.0), Vec3::new(0.0, 30.0, 0.0)),
            FragmentBody::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, -50.0, 0.0)),
        ];
        for _ in 0..600 {
            stepper.step(bodies.iter_mut(), 1.0 / 60.0);
            for body in &bodies {
                assert!(stepper.room().contains(body.position, body.ground_contact_y), "{body:?}");
            }
        }
        // Wall hits reverse and shrink velocity
        let mut body = FragmentBody::new(Vec3::new(1.94, 1.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
        stepper.step(std::iter::once(&mut body), 1.0 / 60.0);
        assert!(body.velocity.x < 0.0 && body.velocity.x > -3.5);
    }

    #[test]
    fn test_ground_bounce_then_rest() {
        let stepper = PhysicsStepper::default();
        let mut body = FragmentBody::new(Vec3::new(0.0, 0.02, 0.0), Vec3::new(0.0, -5.0, 0.0));
        let report = stepper.step(std::iter::once(&mut body), 1.0 / 60.0);
        assert_eq!(report.bounces, 1);
        assert_eq!(body.bounce_count, 1);
        assert!(body.velocity.y > 0.0);
        assert!(!body.on_ground);

        // Dropped from rest height stays put
        let mut resting = FragmentBody::new(Vec3::new(0.0, DEFAULT_GROUND_HEIGHT, 0.0), Vec3::ZERO);
        stepper.step(std::iter::once(&mut resting), 1.0 / 60.0);
        assert!(resting.on_ground);
        assert_eq!(resting.bounce_count, 0);
        assert_eq!(resting.position.y, DEFAULT_GROUND_HEIGHT);
    }

    #[test]
    fn test_static_bodies_skipped() {
        let stepper = PhysicsStepper::default();
        let mut bodies = vec![FragmentBody::fixed(Vec3::new(0.0, 1.0, 0.005)); 4];
        let report = stepper.step(bodies.iter_mut(), 1.0 / 60.0);
        assert_eq!(report.skipped_static, 4);
        assert_eq!(report.integrated, 0);
        assert!(report.settled);
        assert!(bodies.iter().all(|b| b.position == Vec3::new(0.0, 1.0, 0.005)));
    }

    #[test]
    fn test_zero_step_is_noop() {
        let stepper = PhysicsStepper::default();
        let mut body = FragmentBody::new(Vec3::ONE, Vec3::ONE);
        stepper.step(std::iter::once(&mut body), 0.0);
        stepper.step(std::iter::once(&mut body), f32::NAN);
        assert_eq!(body.position, Vec3::ONE);
    }

    #[test]
    fn test_per_body_contact() {
        let stepper = PhysicsStepper::default();
        let mut body = FragmentBody::new(Vec3::new(0.0, 0.2, 0.0), Vec3::new(3.0, -1.0, 0.0))
            .with_contact(0.15, 0.15, 0.7);
        for _ in 0..600 {
            stepper.step(std::iter::once(&mut body), 1.0 / 60.0);
        }
        assert!(body.is_resting(0.01));
        assert_eq!(body.position.y, 0.15);
    }
}
