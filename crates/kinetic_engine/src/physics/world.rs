//! Fixed-substep physics integrator
//!
//! [`SimulationWorld`] owns all simulation state: the static triangle
//! octree, the player capsule, and the dynamic body pool. Each frame the
//! caller runs [`SimulationWorld::step`], which divides the clamped frame
//! delta into fixed substeps and resolves them strictly in order:
//!
//! 1. control application
//! 2. player integration (gravity + exponential damping)
//! 3. player-vs-world resolution
//! 4. player-vs-body resolution
//! 5. body integration and body-vs-world resolution
//! 6. body-vs-body resolution
//! 7. out-of-bounds recovery
//!
//! The order is load-bearing: substep `k + 1` always sees the fully
//! resolved state of substep `k`, and reordering within a substep changes
//! perceived friction and bounce behavior.

use crate::collision::Triangle;
use crate::config::SimulationConfig;
use crate::foundation::math::{utils, Vec3};
use crate::physics::body::BodyPool;
use crate::physics::player::Player;
use crate::spatial::TriangleOctree;

/// Per-frame movement intent supplied by the caller
///
/// The direction need not be normalized; a zero vector means no movement.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Desired movement direction in world space
    pub direction: Vec3,
    /// Whether a jump was requested (honored only while grounded)
    pub jump: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            direction: Vec3::zeros(),
            jump: false,
        }
    }
}

/// Pose of one dynamic body, for the caller's presentation layer
#[derive(Debug, Clone, Copy)]
pub struct BodyPose {
    /// Sphere center in world space
    pub center: Vec3,
    /// Sphere radius
    pub radius: f32,
}

/// The complete simulation: static world index, player, and body pool
///
/// All state is owned here and mutated only through `step` and the launch
/// interface; there are no ambient globals.
pub struct SimulationWorld {
    index: TriangleOctree,
    player: Player,
    bodies: BodyPool,
    config: SimulationConfig,
}

impl SimulationWorld {
    /// Build a simulation over a finalized world triangle set
    pub fn new(triangles: Vec<Triangle>, config: SimulationConfig) -> Self {
        let index = TriangleOctree::build(triangles, &config.octree);
        let bodies = BodyPool::new(config.body_count, config.body_radius, config.parked_body_y);

        log::info!(
            "simulation world ready: {} triangles, {} pooled bodies",
            index.triangle_count(),
            bodies.len()
        );

        Self {
            index,
            player: Player::new(),
            bodies,
            config,
        }
    }

    /// Advance the simulation by one frame
    ///
    /// The frame delta is clamped to `max_frame_delta` and divided into
    /// `steps_per_frame` fixed substeps, which stabilizes fast-moving
    /// collisions across frame-rate hitches.
    pub fn step(&mut self, frame_dt: f32, input: &FrameInput) {
        let dt = frame_dt.min(self.config.max_frame_delta) / self.config.steps_per_frame as f32;
        for _ in 0..self.config.steps_per_frame {
            self.substep(dt, input);
        }
    }

    fn substep(&mut self, dt: f32, input: &FrameInput) {
        self.apply_controls(dt, input);
        self.integrate_player(dt);
        self.resolve_player_world();
        self.resolve_player_bodies();
        self.integrate_bodies(dt);
        self.resolve_body_pairs();
        self.teleport_player_if_oob();
    }

    /// Step 1: movement intent becomes a velocity delta, with ground
    /// traction stronger than air control
    fn apply_controls(&mut self, dt: f32, input: &FrameInput) {
        let speed = if self.player.on_floor {
            self.config.ground_control_speed
        } else {
            self.config.air_control_speed
        };

        if let Some(direction) = utils::safe_normalize(input.direction) {
            self.player.velocity += direction * (speed * dt);
        }

        if input.jump && self.player.on_floor {
            self.player.velocity.y = self.config.jump_speed;
        }
    }

    /// Step 2: gravity while falling, frame-rate-independent exponential
    /// damping, then translation
    fn integrate_player(&mut self, dt: f32) {
        let mut damping = utils::damping_term(self.config.player_damping, dt);

        if !self.player.on_floor {
            self.player.velocity.y -= self.config.gravity * dt;

            // small air resistance
            damping *= self.config.air_damping_scale;
        }

        self.player.velocity += self.player.velocity * damping;
        let delta = self.player.velocity * dt;
        self.player.collider.translate(delta);
    }

    /// Step 3: resolve the capsule against the static world
    ///
    /// An upward-pointing contact normal grounds the player. On wall/ceiling
    /// contacts the velocity component into the surface is removed so the
    /// player slides; the capsule is always translated out of penetration.
    fn resolve_player_world(&mut self) {
        let result = self.index.query_capsule(&self.player.collider);

        self.player.on_floor = false;

        if let Some(contact) = result {
            self.player.on_floor = contact.normal.y > 0.0;

            if !self.player.on_floor {
                let along_normal = contact.normal.dot(&self.player.velocity);
                self.player.velocity -= contact.normal * along_normal;
            }

            self.player.collider.translate(contact.normal * contact.depth);
        }
    }

    /// Step 4: test the capsule's probe points against every body sphere
    ///
    /// On overlap the normal velocity components are swapped (elastic
    /// equal-mass exchange) and only the body is moved out of the overlap;
    /// the player's position is left to the world resolution.
    fn resolve_player_bodies(&mut self) {
        let player = &mut self.player;
        let bodies = self.bodies.bodies_mut();

        for body in bodies {
            let combined = player.collider.radius + body.collider.radius;
            let combined_sq = combined * combined;

            for point in player.collider.probe_points() {
                let offset = point - body.collider.center;
                let distance_sq = offset.magnitude_squared();
                if distance_sq >= combined_sq {
                    continue;
                }

                // Coincident centers have no meaningful separation axis
                let Some(normal) = utils::safe_normalize(offset) else {
                    continue;
                };

                let v1 = normal * normal.dot(&player.velocity);
                let v2 = normal * normal.dot(&body.velocity);

                player.velocity += v2 - v1;
                body.velocity += v1 - v2;

                let half_overlap = (combined - distance_sq.sqrt()) * 0.5;
                body.collider.center -= normal * half_overlap;
            }
        }
    }

    /// Step 5: advance every body and resolve it against the static world
    ///
    /// World contacts reflect the normal velocity component scaled by
    /// `world_bounce` and push the body out of penetration; free-flying
    /// bodies take gravity instead. Damping always applies.
    fn integrate_bodies(&mut self, dt: f32) {
        let damping = utils::damping_term(self.config.body_damping, dt);

        for body in self.bodies.bodies_mut() {
            body.collider.center += body.velocity * dt;

            if let Some(contact) = self.index.query_sphere(&body.collider) {
                let along_normal = contact.normal.dot(&body.velocity);
                body.velocity += contact.normal * (-along_normal * self.config.world_bounce);
                body.collider.center += contact.normal * contact.depth;
            } else {
                body.velocity.y -= self.config.gravity * dt;
            }

            body.velocity += body.velocity * damping;
        }
    }

    /// Step 6: all unordered body pairs exchange normal velocity and
    /// separate by half the overlap each (equal and opposite)
    fn resolve_body_pairs(&mut self) {
        let bodies = self.bodies.bodies_mut();

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (head, tail) = bodies.split_at_mut(j);
                let first = &mut head[i];
                let second = &mut tail[0];

                let offset = first.collider.center - second.collider.center;
                let distance_sq = offset.magnitude_squared();
                let combined = first.collider.radius + second.collider.radius;
                if distance_sq >= combined * combined {
                    continue;
                }

                // Parked bodies stack at the exact same point; skip rather
                // than normalize a zero vector
                let Some(normal) = utils::safe_normalize(offset) else {
                    continue;
                };

                let v1 = normal * normal.dot(&first.velocity);
                let v2 = normal * normal.dot(&second.velocity);

                first.velocity += v2 - v1;
                second.velocity += v1 - v2;

                let half_overlap = (combined - distance_sq.sqrt()) * 0.5;
                first.collider.center += normal * half_overlap;
                second.collider.center -= normal * half_overlap;
            }
        }
    }

    /// Step 7: full session reset once the player falls below the world
    ///
    /// Not an error path: falling out of bounds is a defined recovery
    /// transition. Also callable directly as a public reset operation.
    pub fn teleport_player_if_oob(&mut self) {
        if self.player.eye().y <= self.config.oob_floor {
            log::info!("player out of bounds, resetting to spawn pose");
            self.player.reset_pose();
        }
    }

    /// Activate a body with an explicit origin, direction, and speed
    pub fn spawn_body(&mut self, origin: Vec3, direction: Vec3, speed: f32) -> usize {
        self.bodies.spawn(origin, direction, speed)
    }

    /// Throw a body from the player with a charge-based impulse
    ///
    /// The impulse follows `base + max * (1 - e^(-k * held))`: it rewards
    /// holding the charge but saturates toward `base + max`. The body
    /// spawns just in front of the capsule end and inherits a multiple of
    /// the player's velocity.
    pub fn throw_from_player(&mut self, direction: Vec3, held_secs: f32) -> usize {
        let direction =
            utils::safe_normalize(direction).unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));

        let charge = 1.0 - (-self.config.throw_charge_rate * held_secs.max(0.0)).exp();
        let impulse = self.config.throw_base_impulse + self.config.throw_charge_impulse * charge;

        let offset = self.player.collider.radius * self.config.throw_spawn_offset;
        let origin = self.player.collider.end + direction * offset;

        let index = self.bodies.spawn(origin, direction, impulse);
        self.bodies.bodies_mut()[index].velocity +=
            self.player.velocity * self.config.throw_velocity_inherit;

        log::debug!("body {index} thrown with impulse {impulse:.2}");
        index
    }

    /// The player's current state
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The point the caller's camera/rig should follow
    pub fn player_eye(&self) -> Vec3 {
        self.player.eye()
    }

    /// Current sphere poses of all pooled bodies
    pub fn body_poses(&self) -> impl Iterator<Item = BodyPose> + '_ {
        self.bodies.bodies().iter().map(|body| BodyPose {
            center: body.collider.center,
            radius: body.collider.radius,
        })
    }

    /// The static spatial index
    pub fn index(&self) -> &TriangleOctree {
        &self.index
    }

    /// The active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Flat floor at y = 0 covering +/- `half_size` on x and z
    fn floor_triangles(half_size: f32) -> Vec<Triangle> {
        let s = half_size;
        let a = Vec3::new(-s, 0.0, -s);
        let b = Vec3::new(s, 0.0, -s);
        let c = Vec3::new(s, 0.0, s);
        let d = Vec3::new(-s, 0.0, s);
        vec![Triangle::new(a, c, b), Triangle::new(a, d, c)]
    }

    fn still() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn test_body_drops_to_rest_on_floor() {
        let mut world = SimulationWorld::new(floor_triangles(20.0), SimulationConfig::default());
        let index = world.spawn_body(Vec3::new(3.0, 10.0, 3.0), Vec3::zeros(), 0.0);

        // 32 simulated seconds at 60 fps; substeps stay small enough that
        // terminal velocity never crosses a full radius per substep
        for _ in 0..2000 {
            world.step(0.016, &still());
        }

        let body = world.bodies.bodies()[index];
        // Steady state: resting at y = radius, residual velocity bounded by
        // one substep of gravity
        assert_relative_eq!(body.collider.center.y, 0.2, epsilon = 0.05);
        assert!(body.velocity.y.abs() < 0.5);
        assert!(body.velocity.x.abs() < 0.1 && body.velocity.z.abs() < 0.1);
    }

    #[test]
    fn test_overlapping_pair_separates_to_combined_radius() {
        let mut world = SimulationWorld::new(Vec::new(), SimulationConfig::default());
        let a = world.spawn_body(Vec3::new(0.0, 5.0, 0.0), Vec3::zeros(), 0.0);
        let b = world.spawn_body(Vec3::new(0.1, 5.0, 0.0), Vec3::zeros(), 0.0);

        world.resolve_body_pairs();

        let bodies = world.bodies.bodies();
        let distance = (bodies[a].collider.center - bodies[b].collider.center).magnitude();
        assert!(distance >= 0.4 - 1.0e-4, "distance was {distance}");
    }

    #[test]
    fn test_body_pair_exchange_conserves_normal_momentum() {
        let mut world = SimulationWorld::new(Vec::new(), SimulationConfig::default());
        let a = world.spawn_body(Vec3::new(-0.15, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 2.0);
        let b = world.spawn_body(Vec3::new(0.15, 5.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), 3.0);

        let before_a = world.bodies.bodies()[a].velocity;
        let before_b = world.bodies.bodies()[b].velocity;

        world.resolve_body_pairs();

        let delta_a = world.bodies.bodies()[a].velocity - before_a;
        let delta_b = world.bodies.bodies()[b].velocity - before_b;

        // The exchange is built from the same projected vectors, so the
        // deltas are exactly opposite
        assert_eq!(delta_a.x, -delta_b.x);
        assert_eq!(delta_a.y, -delta_b.y);
        assert_eq!(delta_a.z, -delta_b.z);

        // Head-on equal-mass exchange swaps the normal components
        assert_relative_eq!(world.bodies.bodies()[a].velocity.x, -3.0, epsilon = 1.0e-5);
        assert_relative_eq!(world.bodies.bodies()[b].velocity.x, 2.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_grounded_damping_never_increases_speed() {
        let mut world = SimulationWorld::new(floor_triangles(20.0), SimulationConfig::default());
        world.player.on_floor = true;
        world.player.velocity = Vec3::new(3.0, 0.0, 1.0);
        let speed_before = world.player.velocity.magnitude();

        world.integrate_player(0.01);

        assert!(world.player.velocity.magnitude() <= speed_before);
    }

    #[test]
    fn test_world_bounce_reflects_at_half_impact_speed() {
        // A body pushed into the floor: v' . n = (1 - 1.5) * (v . n)
        let mut world = SimulationWorld::new(floor_triangles(20.0), SimulationConfig::default());
        let index = world.spawn_body(Vec3::new(0.0, 0.15, 0.0), Vec3::new(0.0, -1.0, 0.0), 2.0);

        world.integrate_bodies(0.01);

        let velocity = world.bodies.bodies()[index].velocity;
        // Impact at -2.0 reflects to +1.0 (coefficient 1.5 removes the
        // normal component one and a half times over), then one substep of
        // body damping
        assert!(velocity.y > 0.0, "expected upward bounce, got {}", velocity.y);
        assert_relative_eq!(velocity.y, 0.985, epsilon = 0.005);
    }

    #[test]
    fn test_player_lands_and_grounds_on_floor() {
        let mut world = SimulationWorld::new(floor_triangles(20.0), SimulationConfig::default());
        world.player.velocity = Vec3::new(0.0, -5.0, 0.0);

        for _ in 0..100 {
            world.step(0.05, &still());
        }

        assert!(world.player.on_floor);
        // No residual penetrating velocity along the floor normal
        assert!(world.player.velocity.y >= -1.0e-3);
        // Standing on the floor, capsule bottom at ~radius height
        assert_relative_eq!(world.player.collider.start.y, 0.35, epsilon = 0.05);
    }

    #[test]
    fn test_oob_reset_restores_spawn_capsule() {
        let mut world = SimulationWorld::new(floor_triangles(20.0), SimulationConfig::default());
        world.player.collider.translate(Vec3::new(2.0, -31.0, 2.0));

        world.teleport_player_if_oob();

        let capsule = world.player.collider;
        assert_relative_eq!(capsule.start.x, 0.0);
        assert_relative_eq!(capsule.start.y, 0.35);
        assert_relative_eq!(capsule.end.y, 1.0);
        assert_relative_eq!(capsule.radius, 0.35);
    }

    #[test]
    fn test_oob_check_leaves_in_bounds_player_alone() {
        let mut world = SimulationWorld::new(floor_triangles(20.0), SimulationConfig::default());
        world.player.collider.translate(Vec3::new(2.0, 0.0, 2.0));

        world.teleport_player_if_oob();

        assert_relative_eq!(world.player.collider.start.x, 2.0);
    }

    #[test]
    fn test_ground_control_beats_air_control() {
        let config = SimulationConfig::default();
        let input = FrameInput {
            direction: Vec3::new(1.0, 0.0, 0.0),
            jump: false,
        };

        let mut grounded = SimulationWorld::new(Vec::new(), config.clone());
        grounded.player.on_floor = true;
        grounded.apply_controls(0.01, &input);

        let mut airborne = SimulationWorld::new(Vec::new(), config);
        airborne.player.on_floor = false;
        airborne.apply_controls(0.01, &input);

        assert!(grounded.player.velocity.x > airborne.player.velocity.x);
        assert_relative_eq!(grounded.player.velocity.x, 0.25, epsilon = 1.0e-5);
        assert_relative_eq!(airborne.player.velocity.x, 0.08, epsilon = 1.0e-5);
    }

    #[test]
    fn test_jump_requires_ground_contact() {
        let config = SimulationConfig::default();
        let input = FrameInput {
            direction: Vec3::zeros(),
            jump: true,
        };

        let mut airborne = SimulationWorld::new(Vec::new(), config.clone());
        airborne.player.on_floor = false;
        airborne.apply_controls(0.01, &input);
        assert_relative_eq!(airborne.player.velocity.y, 0.0);

        let mut grounded = SimulationWorld::new(Vec::new(), config);
        grounded.player.on_floor = true;
        grounded.apply_controls(0.01, &input);
        assert_relative_eq!(grounded.player.velocity.y, 15.0);
    }

    #[test]
    fn test_throw_charge_saturates() {
        let config = SimulationConfig::default();

        let mut world = SimulationWorld::new(Vec::new(), config.clone());
        let quick = world.throw_from_player(Vec3::new(0.0, 0.0, -1.0), 0.0);
        let quick_speed = world.bodies.bodies()[quick].velocity.magnitude();
        assert_relative_eq!(quick_speed, 15.0, epsilon = 1.0e-4);

        let held = world.throw_from_player(Vec3::new(0.0, 0.0, -1.0), 30.0);
        let held_speed = world.bodies.bodies()[held].velocity.magnitude();
        // Saturates toward base + max, never beyond
        assert_relative_eq!(held_speed, 45.0, epsilon = 0.01);
        assert!(held_speed <= 45.0 + 1.0e-4);
    }

    #[test]
    fn test_throw_spawns_in_front_of_eye() {
        let mut world = SimulationWorld::new(Vec::new(), SimulationConfig::default());
        let index = world.throw_from_player(Vec3::new(0.0, 0.0, -1.0), 0.0);

        let center = world.bodies.bodies()[index].collider.center;
        // eye (0, 1, 0) + dir * (0.35 * 1.5)
        assert_relative_eq!(center.z, -0.525, epsilon = 1.0e-5);
        assert_relative_eq!(center.y, 1.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_player_body_exchange_moves_only_the_body() {
        let mut world = SimulationWorld::new(Vec::new(), SimulationConfig::default());
        // Body overlapping the capsule start probe point
        let index = world.spawn_body(Vec3::new(0.3, 0.35, 0.0), Vec3::zeros(), 0.0);
        let capsule_before = world.player.collider;

        world.resolve_player_bodies();

        // Player position untouched; body pushed away from the player
        assert_relative_eq!(world.player.collider.start.x, capsule_before.start.x);
        let body = world.bodies.bodies()[index];
        let distance = (body.collider.center - Vec3::new(0.0, 0.35, 0.0)).magnitude();
        assert!(distance > 0.3);
    }
}

