//! Host environment collaborator contract
//!
//! The pooling layer never owns scene objects. It directs the host to
//! create, destroy, reparent, and toggle them through [`InstanceHost`],
//! and the host reports deletions back so pool bookkeeping stays honest.

use crate::handle::{NodeHandle, PrototypeId};
use crate::math::{Quat, Vec3};

/// Lifecycle events dispatched to instances as they move in and out of
/// their pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The instance was just handed to a caller and activated
    Spawned,
    /// The instance is about to be returned to its pool
    Despawned,
}

/// Optional lifecycle capability for host-side instance behaviors.
///
/// Hosts probe for this capability when dispatching a [`LifecycleEvent`];
/// instances without it are simply skipped, which is not an error. Both
/// methods default to no-ops so implementors override only what they
/// react to.
pub trait Spawnable {
    /// Called right after the instance is activated by a spawn
    fn on_spawned(&mut self) {}

    /// Called right before the instance is parked back in its pool
    fn on_despawned(&mut self) {}
}

/// Scene-side collaborator driven by the pooling layer.
///
/// Implementations own the actual scene objects; the pooling layer only
/// sees [`NodeHandle`]s. All operations are synchronous and assumed to
/// run on the host's main update thread.
pub trait InstanceHost {
    /// Instantiate a new object from a prototype under the given parent.
    ///
    /// Creation failure is the host's concern; the pooling layer assumes
    /// a valid handle comes back.
    fn create_instance(&mut self, prototype: PrototypeId, parent: NodeHandle) -> NodeHandle;

    /// Create an empty holding-container node.
    fn create_container(&mut self, name: &str, parent: Option<NodeHandle>) -> NodeHandle;

    /// Permanently destroy a node.
    ///
    /// The host must eventually surface a deletion notification for the
    /// node that the application routes to
    /// [`PrefabPools::reconcile_destroyed`](crate::registry::PrefabPools::reconcile_destroyed),
    /// whether the deletion was pool-initiated or came from unrelated
    /// caller code. Both sides are `&mut`, so the notification cannot
    /// re-enter the registry synchronously; hosts queue it and the
    /// application drains the queue (see [`Scene`](crate::scene::Scene)).
    fn destroy_instance(&mut self, handle: NodeHandle);

    /// Toggle visibility/processing of a node.
    fn set_active(&mut self, handle: NodeHandle, active: bool);

    /// Reparent a node; `None` detaches it to the scene root.
    fn set_parent(&mut self, handle: NodeHandle, parent: Option<NodeHandle>);

    /// Set a node's world position and rotation.
    fn set_transform(&mut self, handle: NodeHandle, position: Vec3, rotation: Quat);

    /// Best-effort lifecycle dispatch.
    ///
    /// Hosts that support instance behaviors check for the [`Spawnable`]
    /// capability and forward the event; the default ignores it.
    fn notify(&mut self, handle: NodeHandle, event: LifecycleEvent) {
        let _ = (handle, event);
    }

    /// Typed component lookup on an instance, if the host supports it.
    ///
    /// Backs the component-returning spawn variant; the default reports
    /// no component.
    fn component_mut<C: 'static>(&mut self, handle: NodeHandle) -> Option<&mut C> {
        let _ = handle;
        None
    }
}
