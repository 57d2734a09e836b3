//! # prefab_pool
//!
//! Prototype-instance recycling for game-engine scene graphs.
//!
//! Spawning and destroying scene objects every frame is expensive; this
//! crate keeps a per-prototype pool of instances so despawned objects are
//! parked and handed back out instead of being destroyed and recreated.
//!
//! ## Features
//!
//! - **Lazy pools**: one pool per prototype, created on first spawn
//! - **LIFO reuse**: the most recently despawned instance is reused first
//! - **Host-agnostic**: scene objects stay owned by the host environment,
//!   reached through the [`InstanceHost`] trait
//! - **Out-of-band reconciliation**: instances deleted outside the pooling
//!   API silently disappear from bookkeeping
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut scene = Scene::new();
//! let bullet = scene.register_prototype("bullet");
//! let mut pools = PrefabPools::new();
//!
//! let shot = pools.spawn(&mut scene, bullet, Placement::at(Vec3::new(0.0, 1.0, 0.0)));
//! pools.despawn(&mut scene, shot)?;
//!
//! // The next spawn reuses the same instance instead of creating one.
//! assert_eq!(pools.spawn(&mut scene, bullet, Placement::default()), shot);
//! # Ok::<(), prefab_pool::PoolError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod handle;
pub mod host;
pub mod math;
pub mod placement;
pub mod pool;
pub mod registry;
pub mod scene;

#[cfg(test)]
mod tests;

pub use handle::{NodeHandle, PrototypeId};
pub use host::{InstanceHost, LifecycleEvent, Spawnable};
pub use placement::Placement;
pub use pool::Pool;
pub use registry::{PoolError, PoolsConfig, PrefabPools};
pub use scene::Scene;

/// Common imports for pooling users
pub mod prelude {
    pub use crate::{
        handle::{NodeHandle, PrototypeId},
        host::{InstanceHost, LifecycleEvent, Spawnable},
        math::{Quat, Vec3},
        placement::Placement,
        registry::{PoolError, PoolsConfig, PrefabPools},
        scene::Scene,
    };
}
