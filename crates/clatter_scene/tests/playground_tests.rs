//! End-to-end playground scenarios

use approx::assert_abs_diff_eq;
use clatter_audio::RecordingClip;
use clatter_scene::prelude::*;

const FRAME: f64 = 1.0 / 60.0;

fn playground_with(clip: Box<dyn ImpactClip>) -> Playground {
    let config = SceneConfig::default();
    let host = HeadlessHost::new(&config.camera);
    Playground::new(&config, host, clip).unwrap()
}

fn playground() -> Playground {
    playground_with(Box::new(SilentClip))
}

fn run_frames(playground: &mut Playground, clock: &mut ManualClock, frames: u64) {
    for _ in 0..frames {
        playground.tick(clock.elapsed()).unwrap();
    }
}

#[test]
fn registry_and_world_grow_in_lockstep() {
    let mut playground = playground();
    let mut panel = DebugPanel::new(SpawnRanges::default(), Some(3));

    for i in 0..12 {
        let action = if i % 2 == 0 {
            DebugAction::SpawnSphere
        } else {
            DebugAction::SpawnBox
        };
        let before = playground.registry().len();
        playground.apply(panel.request(action)).unwrap();

        assert_eq!(playground.registry().len(), before + 1);
        assert_eq!(playground.registry().len(), playground.world().dynamic_body_count());
    }
    // Floor mesh plus one mesh per object
    assert_eq!(playground.host().mesh_count(), 13);
}

#[test]
fn clear_all_is_idempotent_and_keeps_the_floor() {
    let mut playground = playground();
    playground.spawn_initial(&SceneConfig::default().scene.initial).unwrap();
    playground.spawn_sphere(0.3, Vec3::new(2.0, 6.0, 0.0)).unwrap();

    assert_eq!(playground.reset().unwrap(), 3);
    assert_eq!(playground.reset().unwrap(), 0);

    assert!(playground.registry().is_empty());
    assert_eq!(playground.world().body_count(), 1);
    assert!(playground.world().contains(playground.floor()));
    assert_eq!(playground.world().subscription_count(), 0);
    assert_eq!(playground.host().mesh_count(), 1);
    assert_eq!(playground.host().count_of(PrimitiveKind::Plane), 1);
}

#[test]
fn loop_keeps_running_after_reset() {
    let mut playground = playground();
    let mut clock = ManualClock::new(FRAME);
    playground.spawn_box(Vec3::ONE, Vec3::new(0.0, 4.0, 0.0)).unwrap();
    run_frames(&mut playground, &mut clock, 30);

    playground.reset().unwrap();
    run_frames(&mut playground, &mut clock, 30);

    let handle = playground.spawn_sphere(0.5, Vec3::new(0.0, 3.0, 0.0)).unwrap();
    run_frames(&mut playground, &mut clock, 30);
    assert!(playground.world().body_position(handle).unwrap().y < 3.0);
    assert_eq!(playground.frame(), 90);
}

#[test]
fn zero_delta_frames_leave_meshes_unchanged() {
    let mut playground = playground();
    let mut clock = ManualClock::new(FRAME);
    playground.spawn_initial(&SceneConfig::default().scene.initial).unwrap();
    run_frames(&mut playground, &mut clock, 20);

    let before: Vec<_> = playground.registry().iter().map(|e| e.mesh.pose()).collect();
    clock.set_step(0.0);
    for _ in 0..25 {
        let stats = playground.tick(clock.elapsed()).unwrap();
        assert_eq!(stats.substeps, 0);
        assert_eq!(stats.synced, 2);
    }
    let after: Vec<_> = playground.registry().iter().map(|e| e.mesh.pose()).collect();
    assert_eq!(before, after);
}

#[test]
fn meshes_follow_bodies_after_the_step() {
    let mut playground = playground();
    let mut clock = ManualClock::new(FRAME);
    let ball = playground.spawn_sphere(0.5, Vec3::new(0.0, 10.0, 0.0)).unwrap();

    run_frames(&mut playground, &mut clock, 10);

    let body = playground.world().body_pose(ball).unwrap();
    let mesh = playground.registry().iter().next().unwrap().mesh.pose();
    assert_eq!(body, mesh);
    assert!(mesh.position.y < 10.0);
}

#[test]
fn dropped_sphere_settles_and_makes_noise() {
    let clip = RecordingClip::new();
    let mut playground = playground_with(Box::new(clip.clone()));
    let mut clock = ManualClock::new(FRAME);
    let ball = playground.spawn_sphere(0.5, Vec3::new(0.0, 10.0, 0.0)).unwrap();

    run_frames(&mut playground, &mut clock, 900);

    let world = playground.world();
    assert_abs_diff_eq!(world.body_position(ball).unwrap().y, 0.5, epsilon = 0.05);
    assert_abs_diff_eq!(world.body_linear_velocity(ball).unwrap().y, 0.0, epsilon = 0.1);

    let plays = clip.plays();
    assert!(!plays.is_empty());
    assert_eq!(plays[0], 1.0);
    assert_eq!(plays.len() as u64, playground.sounds().played_count());
}

#[test]
fn simultaneous_landings_are_rate_limited() {
    let clip = RecordingClip::new();
    let mut playground = playground_with(Box::new(clip.clone()));
    let mut clock = ManualClock::new(FRAME);
    for i in 0..5 {
        playground
            .spawn_sphere(0.5, Vec3::new(i as f32 * 2.0 - 4.0, 5.0, 0.0))
            .unwrap();
    }

    // Until just after the first landing
    while playground.world().collision_events().is_empty() {
        playground.tick(clock.elapsed()).unwrap();
        assert!(playground.frame() < 300, "spheres never landed");
    }

    assert_eq!(clip.play_count(), 1);
    assert_eq!(playground.sounds().suppressed_count(), 4);
}

#[test]
fn failed_spawn_leaves_everything_untouched() {
    let mut playground = playground();
    playground.spawn_sphere(0.5, Vec3::new(0.0, 3.0, 0.0)).unwrap();

    assert!(playground.spawn_box(Vec3::new(1.0, 0.0, 1.0), Vec3::Y).is_err());
    assert!(playground.spawn_sphere(-1.0, Vec3::Y).is_err());

    assert_eq!(playground.registry().len(), 1);
    assert_eq!(playground.world().dynamic_body_count(), 1);
    assert_eq!(playground.host().mesh_count(), 2);
}
