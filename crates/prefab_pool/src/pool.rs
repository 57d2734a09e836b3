//! Per-prototype instance pool
//!
//! Tracks every instance created from one prototype and the LIFO stack
//! of idle instances ready for reuse.

use crate::handle::{NodeHandle, PrototypeId};
use crate::host::InstanceHost;

/// Reuse bookkeeping for all instances derived from one prototype.
///
/// The pool owns two collections: `instances` lists every live instance
/// created from the prototype in insertion order, and `idle` is the LIFO
/// stack of instances currently parked under the holding container.
/// An instance handed out to a caller stays in `instances` but is never
/// in `idle`; an instance leaves `instances` only through destruction.
#[derive(Debug)]
pub struct Pool {
    prototype: PrototypeId,
    container: NodeHandle,
    instances: Vec<NodeHandle>,
    idle: Vec<NodeHandle>,
}

impl Pool {
    /// Create a pool bound to a prototype and its holding container
    pub(crate) fn new(prototype: PrototypeId, container: NodeHandle) -> Self {
        Self {
            prototype,
            container,
            instances: Vec::new(),
            idle: Vec::new(),
        }
    }

    /// The prototype this pool recycles
    pub fn prototype(&self) -> PrototypeId {
        self.prototype
    }

    /// The holding container idle instances are parked under
    pub fn container(&self) -> NodeHandle {
        self.container
    }

    /// Number of live instances created from the prototype
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of idle instances ready for reuse
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// True when the instance is currently parked on the idle stack
    pub fn is_idle(&self, handle: NodeHandle) -> bool {
        self.idle.contains(&handle)
    }

    /// Hand out an instance, reusing the most recently released one.
    ///
    /// Falls back to host creation when the idle stack is empty; the new
    /// instance is created under the holding container and tracked from
    /// then on. Activation and placement are the caller's responsibility.
    pub(crate) fn acquire(&mut self, host: &mut impl InstanceHost) -> NodeHandle {
        if let Some(handle) = self.idle.pop() {
            log::debug!(
                "Reusing idle instance {:?} of prototype {:?}",
                handle,
                self.prototype
            );
            return handle;
        }

        let handle = host.create_instance(self.prototype, self.container);
        self.instances.push(handle);
        log::debug!(
            "Created instance {:?} of prototype {:?} ({} total)",
            handle,
            self.prototype,
            self.instances.len()
        );
        handle
    }

    /// Park an instance back on the idle stack.
    ///
    /// Releasing an instance that is already idle is a no-op, so a
    /// double despawn cannot duplicate idle entries. Deactivation is the
    /// caller's responsibility, before or alongside this call.
    pub(crate) fn release(&mut self, host: &mut impl InstanceHost, handle: NodeHandle) {
        if self.idle.contains(&handle) {
            return;
        }
        host.set_parent(handle, Some(self.container));
        self.idle.push(handle);
    }

    /// Release every live instance, deactivating the ones still out.
    ///
    /// Already-idle instances are skipped, so this is idempotent.
    pub(crate) fn release_all(&mut self, host: &mut impl InstanceHost) {
        for i in 0..self.instances.len() {
            let handle = self.instances[i];
            if self.idle.contains(&handle) {
                continue;
            }
            host.set_active(handle, false);
            host.set_parent(handle, Some(self.container));
            self.idle.push(handle);
        }
    }

    /// Destroy every instance and the holding container.
    ///
    /// All deletion requests are issued before the collections are
    /// cleared, so a host deletion notification that lands afterwards
    /// finds nothing to reconcile and no-ops.
    pub(crate) fn destroy_all(&mut self, host: &mut impl InstanceHost) {
        for &handle in &self.instances {
            host.destroy_instance(handle);
        }
        host.destroy_instance(self.container);
        self.instances.clear();
        self.idle.clear();
    }

    /// Drop an instance that was destroyed outside the pooling API.
    ///
    /// Unknown handles are ignored: the instance may already have gone
    /// through [`destroy_all`](Self::destroy_all). Safe whether or not
    /// the instance was ever idle.
    pub(crate) fn handle_removed(&mut self, handle: NodeHandle) {
        let before = self.instances.len();
        self.instances.retain(|&h| h != handle);
        self.idle.retain(|&h| h != handle);
        if self.instances.len() == before {
            log::trace!("Ignoring removal notice for untracked instance {:?}", handle);
        } else {
            log::debug!(
                "Reconciled external deletion of instance {:?} from prototype {:?}",
                handle,
                self.prototype
            );
        }
    }

    /// Iterate the handles of every live instance (insertion order)
    pub(crate) fn instance_handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.instances.iter().copied()
    }
}
