//! Scenario tests for the physics world

use approx::assert_abs_diff_eq;
use clatter_physics::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn playground() -> (PhysicsWorld, RigidBodyHandle) {
    let mut world = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
    let concrete = world.default_material().unwrap();
    let floor = world
        .add_body(RigidBodyDesc::fixed(ColliderShape::Plane).with_material(concrete))
        .unwrap();
    (world, floor)
}

fn drop_body(world: &mut PhysicsWorld, shape: ColliderShape, position: Vec3) -> RigidBodyHandle {
    let concrete = world.default_material().unwrap();
    let handle = world
        .add_body(
            RigidBodyDesc::dynamic(1.0, shape)
                .with_position(position)
                .with_material(concrete),
        )
        .unwrap();
    world.subscribe_collisions(handle).unwrap();
    handle
}

fn run(world: &mut PhysicsWorld, seconds: f32, handler: &mut dyn CollisionHandler) {
    let frames = (seconds / DT).ceil() as usize;
    for _ in 0..frames {
        world.step(DT, DT, 3, handler).unwrap();
    }
}

#[test]
fn sphere_comes_to_rest_on_floor() {
    let (mut world, _) = playground();
    let ball = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 3.0, 0.0));

    run(&mut world, 10.0, &mut NullHandler);

    let position = world.body_position(ball).unwrap();
    assert_abs_diff_eq!(position.y, 0.5, epsilon = 0.05);
    assert_abs_diff_eq!(position.x, 0.0, epsilon = 0.05);
    assert!(world.body_linear_velocity(ball).unwrap().length() < 0.2);
}

#[test]
fn box_comes_to_rest_on_floor() {
    let (mut world, _) = playground();
    let cube = drop_body(
        &mut world,
        ColliderShape::from_size(1.0, 1.0, 1.0),
        Vec3::new(1.0, 4.0, 1.0),
    );

    run(&mut world, 10.0, &mut NullHandler);

    assert_abs_diff_eq!(world.body_position(cube).unwrap().y, 0.5, epsilon = 0.05);
}

#[test]
fn resting_body_falls_asleep() {
    let (mut world, floor) = playground();
    let ball = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 1.0, 0.0));

    run(&mut world, 20.0, &mut NullHandler);

    assert_eq!(world.sleep_state(ball).unwrap(), SleepState::Asleep);
    assert_eq!(world.sleep_state(floor).unwrap(), SleepState::Awake);
    assert_eq!(world.active_body_count(), 0);
}

#[test]
fn sleeping_body_wakes_when_struck() {
    let (mut world, _) = playground();
    let lower = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 1.0, 0.0));
    run(&mut world, 20.0, &mut NullHandler);
    assert_eq!(world.sleep_state(lower).unwrap(), SleepState::Asleep);

    let upper = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.1, 3.0, 0.0));
    let mut collector = EventCollector::new();
    let mut woke = false;
    for _ in 0..180 {
        world.step(DT, DT, 3, &mut collector).unwrap();
        woke |= world.sleep_state(lower).unwrap() == SleepState::Awake;
    }

    assert!(collector.for_body(lower).any(|e| e.other == Some(upper)));
    assert!(woke, "lower sphere should wake when hit");

    run(&mut world, 20.0, &mut NullHandler);
    assert_abs_diff_eq!(world.body_position(lower).unwrap().y, 0.5, epsilon = 0.05);
}

#[test]
fn sleeping_body_wakes_on_impulse() {
    let (mut world, _) = playground();
    let ball = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 1.0, 0.0));
    run(&mut world, 20.0, &mut NullHandler);
    assert_eq!(world.sleep_state(ball).unwrap(), SleepState::Asleep);

    world.apply_impulse(ball, Vec3::new(0.0, 2.0, 0.0)).unwrap();
    assert_eq!(world.sleep_state(ball).unwrap(), SleepState::Awake);

    run(&mut world, 0.1, &mut NullHandler);
    assert!(world.body_position(ball).unwrap().y > 0.6);

    run(&mut world, 20.0, &mut NullHandler);
    assert_abs_diff_eq!(world.body_position(ball).unwrap().y, 0.5, epsilon = 0.05);
}

#[test]
fn force_on_sleeping_body_wakes_it_once() {
    let (mut world, _) = playground();
    let ball = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 1.0, 0.0));
    run(&mut world, 20.0, &mut NullHandler);
    assert_eq!(world.sleep_state(ball).unwrap(), SleepState::Asleep);

    world.apply_force(ball, Vec3::new(50.0, 0.0, 0.0)).unwrap();
    assert_eq!(world.sleep_state(ball).unwrap(), SleepState::Awake);

    world.step(DT, DT, 3, &mut NullHandler).unwrap();
    let pushed = world.body_linear_velocity(ball).unwrap().x;
    assert!(pushed > 0.3, "got {}", pushed);

    // Without a fresh force the sphere only rolls, it never speeds up
    run(&mut world, 5.0, &mut NullHandler);
    let rolling = world.body_linear_velocity(ball).unwrap().x;
    assert!(rolling <= pushed + 1e-3, "got {} after {}", rolling, pushed);
    assert!(world.body_position(ball).unwrap().x < 5.0);
    assert_abs_diff_eq!(world.body_position(ball).unwrap().y, 0.5, epsilon = 0.05);
}

#[test]
fn bounces_get_weaker() {
    let (mut world, _) = playground();
    let ball = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 3.0, 0.0));

    let mut collector = EventCollector::new();
    run(&mut world, 5.0, &mut collector);

    let impacts: Vec<f32> = collector
        .for_body(ball)
        .map(|e| e.impact_velocity_along_normal)
        .collect();
    assert!(impacts.len() >= 2, "expected several bounces, got {:?}", impacts);
    assert!(impacts[0] > impacts[1]);
    assert!(impacts[0] > 5.0);
}

#[test]
fn both_subscribed_bodies_hear_the_same_contact() {
    let (mut world, _) = playground();
    let lower = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 0.5, 0.0));
    let upper = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 3.0, 0.0));

    let mut collector = EventCollector::new();
    run(&mut world, 2.0, &mut collector);

    let hit = collector
        .for_body(upper)
        .find(|e| e.other == Some(lower))
        .copied()
        .expect("upper sphere should land on the lower one");
    let mirrored = collector
        .for_body(lower)
        .find(|e| e.other == Some(upper) && e.time == hit.time)
        .expect("lower sphere should receive the same contact");

    assert_abs_diff_eq!(
        hit.impact_velocity_along_normal,
        mirrored.impact_velocity_along_normal,
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(hit.normal.y, -mirrored.normal.y, epsilon = 1e-5);
    // Upper sphere hits from above
    assert!(hit.normal.y < 0.0);
}

#[test]
fn material_pairs_change_bounce() {
    let (mut bouncy, _) = playground();
    let (mut dead, _) = playground();
    {
        let table = dead.contact_materials_mut();
        let concrete = table.material("concrete");
        table
            .add_contact_material(concrete, concrete, ContactMaterial::new(0.5, 0.0))
            .unwrap();
    }

    let a = drop_body(&mut bouncy, ColliderShape::sphere(0.5), Vec3::new(0.0, 3.0, 0.0));
    let b = drop_body(&mut dead, ColliderShape::sphere(0.5), Vec3::new(0.0, 3.0, 0.0));

    let mut bouncy_hits = EventCollector::new();
    let mut dead_hits = EventCollector::new();
    run(&mut bouncy, 3.0, &mut bouncy_hits);
    run(&mut dead, 3.0, &mut dead_hits);

    assert!(bouncy_hits.for_body(a).count() > dead_hits.for_body(b).count());
}

#[test]
fn zero_elapsed_time_changes_nothing() {
    let (mut world, _) = playground();
    let ball = drop_body(&mut world, ColliderShape::sphere(0.5), Vec3::new(0.0, 3.0, 0.0));
    run(&mut world, 0.5, &mut NullHandler);

    let before = world.body_pose(ball).unwrap();
    for _ in 0..10 {
        assert_eq!(world.step(DT, 0.0, 3, &mut NullHandler), Ok(0));
    }
    assert_eq!(world.body_pose(ball).unwrap(), before);
}
