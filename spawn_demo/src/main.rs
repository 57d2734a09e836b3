//! Prefab pooling demo
//!
//! Drives the pooling layer against the headless scene host the way a
//! game loop would: a burst of bullet spawns, despawns as they "expire",
//! reuse on the next volley, and a full teardown at the end.
//!
//! Run with `RUST_LOG=debug` to watch pool creation and reuse decisions.

use prefab_pool::prelude::*;

/// Muzzle flash behavior demonstrating the optional lifecycle capability
struct MuzzleFlash;

impl Spawnable for MuzzleFlash {
    fn on_spawned(&mut self) {
        log::info!("muzzle flash ignited");
    }

    fn on_despawned(&mut self) {
        log::info!("muzzle flash faded");
    }
}

fn drain_notifications(scene: &mut Scene, pools: &mut PrefabPools) {
    for handle in scene.take_destroyed() {
        pools.reconcile_destroyed(handle);
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let bullet = scene.register_prototype("bullet");
    let flash = scene
        .register_prototype_with_behavior("muzzle_flash", Box::new(|| Box::new(MuzzleFlash)));

    let mut pools = PrefabPools::new();
    pools.initialize(&mut scene);

    // First volley: every bullet is a fresh instance.
    let mut volley = Vec::new();
    for i in 0..3 {
        let position = Vec3::new(i as f32 * 0.5, 1.0, 0.0);
        volley.push(pools.spawn_at(&mut scene, bullet, position));
    }
    pools.spawn(&mut scene, flash, Placement::default());
    log::info!(
        "volley fired: {} bullet instances live",
        pools.instance_count_of(bullet).unwrap_or(0)
    );

    // Bullets expire and return to the pool.
    for handle in volley.drain(..) {
        pools
            .despawn(&mut scene, handle)
            .expect("bullet came from spawn");
    }
    log::info!(
        "volley expired: {} idle bullets parked",
        pools.idle_count_of(bullet).unwrap_or(0)
    );

    // Second volley reuses the parked instances; the pool does not grow.
    for i in 0..3 {
        let position = Vec3::new(i as f32 * 0.5, 2.0, 0.0);
        pools.spawn_at(&mut scene, bullet, position);
    }
    log::info!(
        "second volley: still {} bullet instances total",
        pools.instance_count_of(bullet).unwrap_or(0)
    );

    // Level change: tear everything down and reconcile the deletions.
    pools.despawn_all(&mut scene);
    pools.destroy_all(&mut scene);
    drain_notifications(&mut scene, &mut pools);
    log::info!(
        "teardown complete: {} pools, {} deletion requests issued",
        pools.pool_count(),
        scene.instances_destroyed()
    );
}
