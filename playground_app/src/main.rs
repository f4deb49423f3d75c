//! Headless playground demo
//!
//! Drives the physics core the way a rendering front end would:
//! - builds a box room out of world-space triangles
//! - runs the clamped frame loop with fixed substeps
//! - scripts movement, jumps, and charged throws
//! - reads back player and body poses each frame
//!
//! There is no window; poses are reported through the log instead.

use kinetic_engine::foundation::time::Timer;
use kinetic_engine::prelude::*;
use rand::Rng;

// Room dimensions
const ROOM_HALF_SIZE: f32 = 20.0;
const WALL_HEIGHT: f32 = 6.0;

// Demo script settings
const FRAME_DT: f32 = 1.0 / 60.0;
const TOTAL_FRAMES: u32 = 60 * 30; // 30 simulated seconds
const THROW_INTERVAL: u32 = 45; // frames between throws
const REPORT_INTERVAL: u32 = 60; // one log line per simulated second

/// Two triangles covering the quad `a-b-c-d` (counter-clockwise)
fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3, out: &mut Vec<Triangle>) {
    out.push(Triangle::new(a, b, c));
    out.push(Triangle::new(a, c, d));
}

/// A closed box room: floor, four walls, and a ramp in one corner
fn build_room() -> Vec<Triangle> {
    let s = ROOM_HALF_SIZE;
    let h = WALL_HEIGHT;
    let mut triangles = Vec::new();

    // Floor at y = 0, normal up
    quad(
        Vec3::new(-s, 0.0, -s),
        Vec3::new(-s, 0.0, s),
        Vec3::new(s, 0.0, s),
        Vec3::new(s, 0.0, -s),
        &mut triangles,
    );

    // Walls, normals facing inward
    quad(
        Vec3::new(-s, 0.0, -s),
        Vec3::new(s, 0.0, -s),
        Vec3::new(s, h, -s),
        Vec3::new(-s, h, -s),
        &mut triangles,
    );
    quad(
        Vec3::new(s, 0.0, s),
        Vec3::new(-s, 0.0, s),
        Vec3::new(-s, h, s),
        Vec3::new(s, h, s),
        &mut triangles,
    );
    quad(
        Vec3::new(-s, 0.0, s),
        Vec3::new(-s, 0.0, -s),
        Vec3::new(-s, h, -s),
        Vec3::new(-s, h, s),
        &mut triangles,
    );
    quad(
        Vec3::new(s, 0.0, -s),
        Vec3::new(s, 0.0, s),
        Vec3::new(s, h, s),
        Vec3::new(s, h, -s),
        &mut triangles,
    );

    // Ramp up to the back wall
    quad(
        Vec3::new(6.0, 0.0, 14.0),
        Vec3::new(6.0, 3.0, 19.0),
        Vec3::new(14.0, 3.0, 19.0),
        Vec3::new(14.0, 0.0, 14.0),
        &mut triangles,
    );

    triangles
}

/// Scripted movement: circle the room, jumping now and then
fn scripted_input(frame: u32) -> FrameInput {
    let angle = frame as f32 * 0.01;
    FrameInput {
        direction: Vec3::new(angle.cos(), 0.0, angle.sin()),
        jump: frame % 240 == 120,
    }
}

fn count_active(world: &SimulationWorld) -> usize {
    world.body_poses().filter(|pose| pose.center.y > -50.0).count()
}

fn main() {
    kinetic_engine::foundation::logging::init_with_level(log::LevelFilter::Info);

    let config = SimulationConfig::default();
    let mut world = SimulationWorld::new(build_room(), config);
    log::info!(
        "octree: {} triangles across {} nodes",
        world.index().triangle_count(),
        world.index().node_count()
    );

    let mut rng = rand::thread_rng();
    let mut held_since: Option<u32> = None;
    let mut timer = Timer::new();

    for frame in 0..TOTAL_FRAMES {
        timer.update();
        // Charge a throw over a random hold, then release toward a random
        // direction somewhere in front of the player
        match held_since {
            None => {
                if frame % THROW_INTERVAL == 0 {
                    held_since = Some(frame);
                }
            }
            Some(start) => {
                let held_frames = frame - start;
                if held_frames >= rng.gen_range(5..40) {
                    let direction = Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(0.1..0.8),
                        rng.gen_range(-1.0..1.0),
                    );
                    let held_secs = held_frames as f32 * FRAME_DT;
                    let index = world.throw_from_player(direction, held_secs);
                    log::debug!("frame {frame}: threw body {index} after {held_secs:.2}s charge");
                    held_since = None;
                }
            }
        }

        world.step(FRAME_DT, &scripted_input(frame));

        if frame % REPORT_INTERVAL == 0 {
            let eye = world.player_eye();
            log::info!(
                "t={:5.1}s eye=({:6.2}, {:5.2}, {:6.2}) grounded={} active_bodies={}",
                frame as f32 * FRAME_DT,
                eye.x,
                eye.y,
                eye.z,
                world.player().on_floor,
                count_active(&world),
            );
        }
    }

    log::info!(
        "demo finished: {} of {} bodies in play, {} frames in {:.2}s wall time",
        count_active(&world),
        world.config().body_count,
        timer.frame_count(),
        timer.total_time()
    );
}
