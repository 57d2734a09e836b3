//! End-to-end pooling scenarios
//!
//! Each test drives `PrefabPools` against the headless `Scene` host the
//! way a game loop would: spawn, despawn, destroy, and drain the scene's
//! deletion notifications back into the registry.

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::host::{InstanceHost, Spawnable};
use crate::math::{Quat, Vec3};
use crate::placement::Placement;
use crate::registry::{PoolError, PrefabPools};
use crate::scene::Scene;

/// Route every queued deletion notification into the registry, as the
/// host application's update loop would.
fn drain_notifications(scene: &mut Scene, pools: &mut PrefabPools) {
    for handle in scene.take_destroyed() {
        pools.reconcile_destroyed(handle);
    }
}

#[test]
fn test_two_spawns_yield_distinct_instances() {
    let mut scene = Scene::new();
    let bullet = scene.register_prototype("bullet");
    let mut pools = PrefabPools::new();

    let first = pools.spawn(&mut scene, bullet, Placement::default());
    let second = pools.spawn(&mut scene, bullet, Placement::default());

    assert_ne!(first, second);
    assert_eq!(pools.instance_count_of(bullet), Some(2));
    assert!(pools.is_managed(first));
    assert!(pools.is_managed(second));
}

#[test]
fn test_lifo_reuse_order() {
    let mut scene = Scene::new();
    let bullet = scene.register_prototype("bullet");
    let mut pools = PrefabPools::new();

    let a = pools.spawn(&mut scene, bullet, Placement::default());
    let b = pools.spawn(&mut scene, bullet, Placement::default());
    pools.despawn(&mut scene, a).unwrap();
    pools.despawn(&mut scene, b).unwrap();

    // b was released last, so it comes back first.
    assert_eq!(pools.spawn(&mut scene, bullet, Placement::default()), b);
    assert_eq!(pools.spawn(&mut scene, bullet, Placement::default()), a);
}

#[test]
fn test_spawn_three_despawn_middle_reuses_it() {
    let mut scene = Scene::new();
    let bullet = scene.register_prototype("bullet");
    let mut pools = PrefabPools::new();

    let _first = pools.spawn(&mut scene, bullet, Placement::default());
    let second = pools.spawn(&mut scene, bullet, Placement::default());
    let _third = pools.spawn(&mut scene, bullet, Placement::default());

    pools.despawn(&mut scene, second).unwrap();
    assert_eq!(pools.spawn(&mut scene, bullet, Placement::default()), second);
    assert_eq!(pools.instance_count_of(bullet), Some(3));
}

#[test]
fn test_double_despawn_is_idempotent() {
    let mut scene = Scene::new();
    let bullet = scene.register_prototype("bullet");
    let mut pools = PrefabPools::new();

    let shot = pools.spawn(&mut scene, bullet, Placement::default());
    pools.despawn(&mut scene, shot).unwrap();
    pools.despawn(&mut scene, shot).unwrap();

    assert_eq!(pools.idle_count_of(bullet), Some(1));
}

#[test]
fn test_round_trip_never_grows_pool() {
    let mut scene = Scene::new();
    let bullet = scene.register_prototype("bullet");
    let mut pools = PrefabPools::new();

    for i in 0..16 {
        let shot = pools.spawn_at(&mut scene, bullet, Vec3::new(i as f32, 0.0, 0.0));
        pools.despawn(&mut scene, shot).unwrap();
    }

    assert_eq!(pools.instance_count_of(bullet), Some(1));
    assert_eq!(pools.idle_count_of(bullet), Some(1));
}

#[test]
fn test_spawn_applies_placement() {
    let mut scene = Scene::new();
    let ship = scene.register_prototype("ship");
    let mut pools = PrefabPools::new();

    let position = Vec3::new(4.0, -2.0, 0.5);
    let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
    let handle = pools.spawn_at_rotated(&mut scene, ship, position, rotation);

    let node = scene.node(handle).unwrap();
    assert!(node.active);
    assert_relative_eq!(node.position, position);
    assert_relative_eq!(node.rotation.angle(), rotation.angle());
}

#[test]
fn test_spawn_under_parent_and_despawn_reparents_to_pool() {
    let mut scene = Scene::new();
    let turret = scene.register_prototype("turret");
    let mut pools = PrefabPools::new();
    let mount = scene.create_container("mount", None);

    let handle = pools.spawn_under(&mut scene, turret, mount);
    assert_eq!(scene.node(handle).unwrap().parent, Some(mount));

    pools.despawn(&mut scene, handle).unwrap();
    let container = pools.pool(turret).unwrap().container();
    let node = scene.node(handle).unwrap();
    assert_eq!(node.parent, Some(container));
    assert!(!node.active);
}

#[test]
fn test_despawn_all_of_releases_everything() {
    let mut scene = Scene::new();
    let rock = scene.register_prototype("rock");
    let mut pools = PrefabPools::new();

    let a = pools.spawn(&mut scene, rock, Placement::default());
    let b = pools.spawn(&mut scene, rock, Placement::default());
    pools.despawn(&mut scene, a).unwrap();

    pools.despawn_all_of(&mut scene, rock).unwrap();
    assert_eq!(pools.idle_count_of(rock), Some(2));
    assert!(!scene.node(b).unwrap().active);
}

#[test]
fn test_despawn_all_spans_prototypes() {
    let mut scene = Scene::new();
    let rock = scene.register_prototype("rock");
    let ship = scene.register_prototype("ship");
    let mut pools = PrefabPools::new();

    pools.spawn(&mut scene, rock, Placement::default());
    pools.spawn(&mut scene, ship, Placement::default());
    pools.despawn_all(&mut scene);

    assert_eq!(pools.idle_count_of(rock), Some(1));
    assert_eq!(pools.idle_count_of(ship), Some(1));
}

#[test]
fn test_destroy_all_of_then_spawn_starts_fresh() {
    let mut scene = Scene::new();
    let vfx = scene.register_prototype("vfx");
    let mut pools = PrefabPools::new();

    let old = pools.spawn(&mut scene, vfx, Placement::default());
    let old_container = pools.pool(vfx).unwrap().container();
    pools.destroy_all_of(&mut scene, vfx).unwrap();
    drain_notifications(&mut scene, &mut pools);

    assert_eq!(pools.pool_count(), 0);
    assert!(!scene.contains(old));
    assert!(!scene.contains(old_container));

    let fresh = pools.spawn(&mut scene, vfx, Placement::default());
    assert_ne!(fresh, old);
    assert_eq!(pools.instance_count_of(vfx), Some(1));
}

#[test]
fn test_out_of_band_deletion_is_reconciled() {
    let mut scene = Scene::new();
    let vfx = scene.register_prototype("vfx");
    let mut pools = PrefabPools::new();

    let doomed = pools.spawn(&mut scene, vfx, Placement::default());
    let survivor = pools.spawn(&mut scene, vfx, Placement::default());

    // Unrelated caller code deletes the instance directly.
    scene.destroy_instance(doomed);
    drain_notifications(&mut scene, &mut pools);

    assert!(!pools.is_managed(doomed));
    assert_eq!(pools.instance_count_of(vfx), Some(1));

    // Mass release completes without error and skips the dead instance.
    pools.despawn_all_of(&mut scene, vfx).unwrap();
    assert_eq!(pools.idle_count_of(vfx), Some(1));
    assert_eq!(pools.spawn(&mut scene, vfx, Placement::default()), survivor);
}

#[test]
fn test_out_of_band_deletion_of_idle_instance() {
    let mut scene = Scene::new();
    let vfx = scene.register_prototype("vfx");
    let mut pools = PrefabPools::new();

    let handle = pools.spawn(&mut scene, vfx, Placement::default());
    pools.despawn(&mut scene, handle).unwrap();
    scene.destroy_instance(handle);
    drain_notifications(&mut scene, &mut pools);

    assert_eq!(pools.idle_count_of(vfx), Some(0));
    assert_eq!(pools.instance_count_of(vfx), Some(0));

    // The dead instance is never reused.
    let fresh = pools.spawn(&mut scene, vfx, Placement::default());
    assert_ne!(fresh, handle);
}

#[test]
fn test_destroy_all_empties_registry_and_issues_deletions() {
    let mut scene = Scene::new();
    let rock = scene.register_prototype("rock");
    let ship = scene.register_prototype("ship");
    let mut pools = PrefabPools::new();

    let spawned = [
        pools.spawn(&mut scene, rock, Placement::default()),
        pools.spawn(&mut scene, rock, Placement::default()),
        pools.spawn(&mut scene, ship, Placement::default()),
        pools.spawn(&mut scene, ship, Placement::default()),
    ];

    pools.destroy_all(&mut scene);
    drain_notifications(&mut scene, &mut pools);

    assert_eq!(pools.pool_count(), 0);
    assert_eq!(scene.instances_destroyed(), 4);
    for handle in spawned {
        assert!(!scene.contains(handle));
        assert!(!pools.is_managed(handle));
    }
}

#[test]
fn test_late_notifications_after_destroy_all_are_harmless() {
    let mut scene = Scene::new();
    let rock = scene.register_prototype("rock");
    let mut pools = PrefabPools::new();

    pools.spawn(&mut scene, rock, Placement::default());
    pools.destroy_all(&mut scene);

    // Notifications for the pool-initiated deletions arrive only now,
    // well after the registry cleared its collections.
    drain_notifications(&mut scene, &mut pools);
    assert_eq!(pools.pool_count(), 0);
}

#[derive(Default)]
struct LifecycleCounters {
    spawned: Rc<Cell<u32>>,
    despawned: Rc<Cell<u32>>,
}

struct CountingBehavior {
    spawned: Rc<Cell<u32>>,
    despawned: Rc<Cell<u32>>,
}

impl Spawnable for CountingBehavior {
    fn on_spawned(&mut self) {
        self.spawned.set(self.spawned.get() + 1);
    }

    fn on_despawned(&mut self) {
        self.despawned.set(self.despawned.get() + 1);
    }
}

#[test]
fn test_lifecycle_capability_dispatch() {
    let mut scene = Scene::new();
    let counters = LifecycleCounters::default();
    let (spawned, despawned) = (counters.spawned.clone(), counters.despawned.clone());

    let flare = scene.register_prototype_with_behavior(
        "flare",
        Box::new(move || {
            Box::new(CountingBehavior {
                spawned: spawned.clone(),
                despawned: despawned.clone(),
            })
        }),
    );
    let mut pools = PrefabPools::new();

    let handle = pools.spawn(&mut scene, flare, Placement::default());
    assert_eq!(counters.spawned.get(), 1);

    pools.despawn(&mut scene, handle).unwrap();
    assert_eq!(counters.despawned.get(), 1);

    // Reuse dispatches the hook again on the same behavior instance.
    pools.spawn(&mut scene, flare, Placement::default());
    assert_eq!(counters.spawned.get(), 2);
}

#[test]
fn test_instances_without_capability_are_fine() {
    let mut scene = Scene::new();
    let crate_proto = scene.register_prototype("crate");
    let mut pools = PrefabPools::new();

    let handle = pools.spawn(&mut scene, crate_proto, Placement::default());
    pools.despawn(&mut scene, handle).unwrap();
}

#[test]
fn test_spawn_component_finds_host_component() {
    let mut scene = Scene::new();
    let drone = scene.register_prototype("drone");
    let mut pools = PrefabPools::new();

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    // First spawn creates the instance; the host then attaches state.
    let handle = pools.spawn(&mut scene, drone, Placement::default());
    scene.insert_component(handle, Health(100));
    pools.despawn(&mut scene, handle).unwrap();

    // The reused instance still carries its component.
    let (reused, health) = pools.spawn_component::<Health, _>(&mut scene, drone, Placement::default());
    assert_eq!(reused, handle);
    assert_eq!(health, Some(&mut Health(100)));
}

#[test]
fn test_spawn_component_absent_is_not_an_error() {
    let mut scene = Scene::new();
    let drone = scene.register_prototype("drone");
    let mut pools = PrefabPools::new();

    #[derive(Debug, PartialEq)]
    struct Shield(u32);

    let (_, shield) = pools.spawn_component::<Shield, _>(&mut scene, drone, Placement::default());
    assert_eq!(shield, None);
}

#[test]
fn test_despawn_error_display() {
    let err = PoolError::UnmanagedInstance(crate::handle::NodeHandle::new(3));
    assert!(err.to_string().contains("not managed"));
}
