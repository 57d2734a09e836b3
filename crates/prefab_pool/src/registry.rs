//! Prototype-to-pool routing and the public spawn/despawn surface

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;

use crate::handle::{NodeHandle, PrototypeId};
use crate::host::{InstanceHost, LifecycleEvent};
use crate::math::{Quat, Vec3};
use crate::placement::Placement;
use crate::pool::Pool;

/// Errors surfaced by the registry's despawn/destroy operations.
///
/// Both variants are programmer errors: they are reported synchronously,
/// never retried, and nothing is mutated before they are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The handle was never produced by a spawn call
    #[error("instance {0:?} is not managed by any prefab pool")]
    UnmanagedInstance(NodeHandle),

    /// No pool has been created for the prototype
    #[error("no pool exists for prototype {0:?}")]
    UnknownPrototype(PrototypeId),
}

/// Configuration for the pooling context
#[derive(Debug, Clone)]
pub struct PoolsConfig {
    /// Name of the root holding container created on initialization
    pub root_container_name: String,
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            root_container_name: "Prefab Pools".to_string(),
        }
    }
}

/// Pooling context: owns every [`Pool`] and routes the public operations.
///
/// One `PrefabPools` per application replaces the usual process-wide
/// singleton. The host application constructs it once and passes it to
/// every call site, which keeps the prototype-to-pool map explicit while
/// preserving single-instance semantics when only one context exists.
///
/// The registry also keeps the managed-instance map: every handle a spawn
/// call produced, keyed back to its owning prototype. That map is how a
/// despawn finds the right pool and how handles never seen by a spawn are
/// rejected.
pub struct PrefabPools {
    config: PoolsConfig,
    pools: HashMap<PrototypeId, Pool>,
    managed: HashMap<NodeHandle, PrototypeId>,
    root: Option<NodeHandle>,
}

impl PrefabPools {
    /// Create a pooling context with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolsConfig::default())
    }

    /// Create a pooling context with the given configuration
    pub fn with_config(config: PoolsConfig) -> Self {
        Self {
            config,
            pools: HashMap::new(),
            managed: HashMap::new(),
            root: None,
        }
    }

    /// Create the root holding container.
    ///
    /// No-op after the first call; pool creation also performs this
    /// lazily, so calling it up front is optional.
    pub fn initialize(&mut self, host: &mut impl InstanceHost) {
        let _ = self.ensure_root(host);
    }

    fn ensure_root(&mut self, host: &mut impl InstanceHost) -> NodeHandle {
        if let Some(root) = self.root {
            root
        } else {
            let root = host.create_container(&self.config.root_container_name, None);
            log::info!("Initialized prefab pooling under container {:?}", root);
            self.root = Some(root);
            root
        }
    }

    /// Look up the pool for a prototype, creating it on first reference.
    ///
    /// Safe to call repeatedly for the same prototype; at most one pool
    /// ever exists per identity. New pools get a fresh holding container
    /// under the root.
    pub fn get_or_create_pool(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
    ) -> &mut Pool {
        let root = self.ensure_root(host);
        match self.pools.entry(prototype) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let name = format!("Pool {}", prototype.id());
                let container = host.create_container(&name, Some(root));
                log::info!(
                    "Created pool for prototype {:?} under container {:?}",
                    prototype,
                    container
                );
                entry.insert(Pool::new(prototype, container))
            }
        }
    }

    /// Spawn an instance of a prototype.
    ///
    /// Reuses the most recently despawned instance when one is idle,
    /// otherwise asks the host to create a fresh one. The instance is
    /// reparented and positioned per `placement` (untouched fields keep
    /// their current value), activated, and notified with
    /// [`LifecycleEvent::Spawned`].
    pub fn spawn(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
        placement: Placement,
    ) -> NodeHandle {
        let handle = self.get_or_create_pool(host, prototype).acquire(host);
        self.managed.insert(handle, prototype);

        if let Some(parent) = placement.parent {
            host.set_parent(handle, Some(parent));
        }
        if placement.wants_transform() {
            let position = placement.position.unwrap_or_else(Vec3::zeros);
            let rotation = placement.rotation.unwrap_or_else(Quat::identity);
            host.set_transform(handle, position, rotation);
        }
        host.set_active(handle, true);
        host.notify(handle, LifecycleEvent::Spawned);
        handle
    }

    /// Spawn at a world position
    pub fn spawn_at(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
        position: Vec3,
    ) -> NodeHandle {
        self.spawn(host, prototype, Placement::at(position))
    }

    /// Spawn at a world position with a rotation
    pub fn spawn_at_rotated(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
        position: Vec3,
        rotation: Quat,
    ) -> NodeHandle {
        self.spawn(host, prototype, Placement::at_rotated(position, rotation))
    }

    /// Spawn attached under a parent node
    pub fn spawn_under(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
        parent: NodeHandle,
    ) -> NodeHandle {
        self.spawn(host, prototype, Placement::default().under(parent))
    }

    /// Spawn and look up a typed component on the new instance.
    ///
    /// The instance is spawned either way; `None` means the host found no
    /// component of the requested type on it, which is not an error.
    pub fn spawn_component<'h, C: 'static, H: InstanceHost>(
        &mut self,
        host: &'h mut H,
        prototype: PrototypeId,
        placement: Placement,
    ) -> (NodeHandle, Option<&'h mut C>) {
        let handle = self.spawn(&mut *host, prototype, placement);
        let component = host.component_mut::<C>(handle);
        (handle, component)
    }

    /// Return a spawned instance to its pool.
    ///
    /// The instance is notified with [`LifecycleEvent::Despawned`],
    /// deactivated, and parked for reuse. Despawning an already-idle
    /// instance is a no-op at the pool level.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnmanagedInstance`] when the handle was never
    /// produced by [`spawn`](Self::spawn); nothing is mutated in that
    /// case.
    pub fn despawn(
        &mut self,
        host: &mut impl InstanceHost,
        handle: NodeHandle,
    ) -> Result<(), PoolError> {
        let prototype = self
            .managed
            .get(&handle)
            .copied()
            .ok_or(PoolError::UnmanagedInstance(handle))?;
        let pool = self
            .pools
            .get_mut(&prototype)
            .ok_or(PoolError::UnmanagedInstance(handle))?;

        host.notify(handle, LifecycleEvent::Despawned);
        host.set_active(handle, false);
        pool.release(host, handle);
        Ok(())
    }

    /// Return every instance of a prototype to its pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPrototype`] when no pool exists for the
    /// prototype.
    pub fn despawn_all_of(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
    ) -> Result<(), PoolError> {
        let pool = self
            .pools
            .get_mut(&prototype)
            .ok_or(PoolError::UnknownPrototype(prototype))?;
        pool.release_all(host);
        Ok(())
    }

    /// Return every instance of every prototype to its pool
    pub fn despawn_all(&mut self, host: &mut impl InstanceHost) {
        for pool in self.pools.values_mut() {
            pool.release_all(host);
        }
    }

    /// Destroy every instance of a prototype and drop its pool.
    ///
    /// The pool's holding container is destroyed along with the
    /// instances; a later spawn of the same prototype starts from a
    /// brand-new pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPrototype`] when no pool exists for the
    /// prototype.
    pub fn destroy_all_of(
        &mut self,
        host: &mut impl InstanceHost,
        prototype: PrototypeId,
    ) -> Result<(), PoolError> {
        let mut pool = self
            .pools
            .remove(&prototype)
            .ok_or(PoolError::UnknownPrototype(prototype))?;
        for handle in pool.instance_handles() {
            self.managed.remove(&handle);
        }
        pool.destroy_all(host);
        log::info!("Destroyed pool for prototype {:?}", prototype);
        Ok(())
    }

    /// Destroy every pool and all their instances.
    ///
    /// The root container survives; initialization is once per context.
    pub fn destroy_all(&mut self, host: &mut impl InstanceHost) {
        for (_, mut pool) in self.pools.drain() {
            pool.destroy_all(host);
        }
        self.managed.clear();
        log::info!("Destroyed all prefab pools");
    }

    /// Reconcile a host deletion notification into pool bookkeeping.
    ///
    /// The host reports every destroyed node here, pool-initiated
    /// deletions included. Unknown handles are ignored: either the node
    /// was never a pooled instance, or its pool already tore it down.
    /// The destroyed instance simply disappears from bookkeeping and is
    /// never reused.
    pub fn reconcile_destroyed(&mut self, handle: NodeHandle) {
        if let Some(prototype) = self.managed.remove(&handle) {
            if let Some(pool) = self.pools.get_mut(&prototype) {
                pool.handle_removed(handle);
            }
        }
    }

    /// Number of live pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Whether a handle is currently managed by any pool
    pub fn is_managed(&self, handle: NodeHandle) -> bool {
        self.managed.contains_key(&handle)
    }

    /// Look up an existing pool without creating it
    pub fn pool(&self, prototype: PrototypeId) -> Option<&Pool> {
        self.pools.get(&prototype)
    }

    /// Live instance count for a prototype's pool, if one exists
    pub fn instance_count_of(&self, prototype: PrototypeId) -> Option<usize> {
        self.pools.get(&prototype).map(Pool::instance_count)
    }

    /// Idle instance count for a prototype's pool, if one exists
    pub fn idle_count_of(&self, prototype: PrototypeId) -> Option<usize> {
        self.pools.get(&prototype).map(Pool::idle_count)
    }
}

impl Default for PrefabPools {
    fn default() -> Self {
        Self::new()
    }
}
