//! Headless reference host
//!
//! [`Scene`] is a minimal in-memory scene tree implementing
//! [`InstanceHost`]. It backs the test suite and the demo application,
//! and models the parts of the host contract that matter to pooling:
//! node creation and destruction, parenting, activation, transform
//! placement, capability-probed lifecycle dispatch, and the deferred
//! deletion-notification queue.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::handle::{NodeHandle, PrototypeId};
use crate::host::{InstanceHost, LifecycleEvent, Spawnable};
use crate::math::{Quat, Vec3};

/// Factory producing a fresh behavior for each instance of a prototype
pub type BehaviorFactory = Box<dyn Fn() -> Box<dyn Spawnable>>;

/// A node in the headless scene tree
pub struct Node {
    /// Display name
    pub name: String,

    /// Parent node, if any
    pub parent: Option<NodeHandle>,

    /// Whether the node is visible/processing
    pub active: bool,

    /// World position
    pub position: Vec3,

    /// World rotation
    pub rotation: Quat,

    /// Prototype this node was instantiated from; `None` for containers
    pub prototype: Option<PrototypeId>,

    behavior: Option<Box<dyn Spawnable>>,
    components: HashMap<TypeId, Box<dyn Any>>,
}

impl Node {
    fn new(name: String, parent: Option<NodeHandle>, prototype: Option<PrototypeId>) -> Self {
        Self {
            name,
            parent,
            active: prototype.is_none(),
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            prototype,
            behavior: None,
            components: HashMap::new(),
        }
    }
}

/// Prototype template registered with the scene
struct Prototype {
    name: String,
    behavior: Option<BehaviorFactory>,
}

/// In-memory scene tree implementing the host contract.
///
/// Handles are minted from a monotonic counter, so a destroyed node's
/// handle is never reissued. Operations on handles the scene no longer
/// knows are treated as no-ops, mirroring engines that ignore calls on
/// dead objects.
#[derive(Default)]
pub struct Scene {
    nodes: HashMap<NodeHandle, Node>,
    prototypes: HashMap<PrototypeId, Prototype>,
    next_node: u64,
    next_prototype: u64,
    pending_removals: Vec<NodeHandle>,
    instances_destroyed: usize,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prototype template by name
    pub fn register_prototype(&mut self, name: &str) -> PrototypeId {
        self.register(name, None)
    }

    /// Register a prototype whose instances carry a [`Spawnable`] behavior
    pub fn register_prototype_with_behavior(
        &mut self,
        name: &str,
        behavior: BehaviorFactory,
    ) -> PrototypeId {
        self.register(name, Some(behavior))
    }

    fn register(&mut self, name: &str, behavior: Option<BehaviorFactory>) -> PrototypeId {
        self.next_prototype += 1;
        let id = PrototypeId::new(self.next_prototype);
        self.prototypes.insert(
            id,
            Prototype {
                name: name.to_string(),
                behavior,
            },
        );
        id
    }

    fn mint_handle(&mut self) -> NodeHandle {
        self.next_node += 1;
        NodeHandle::new(self.next_node)
    }

    /// Access a node
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(&handle)
    }

    /// Mutably access a node
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(&handle)
    }

    /// Whether the node currently exists
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    /// Number of live nodes, containers included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find a node by exact name
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(&handle, _)| handle)
    }

    /// Attach a typed component to a node
    pub fn insert_component<C: 'static>(&mut self, handle: NodeHandle, component: C) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.components.insert(TypeId::of::<C>(), Box::new(component));
        }
    }

    /// Drain the deletion notifications queued since the last call.
    ///
    /// The application routes each handle to
    /// [`PrefabPools::reconcile_destroyed`](crate::registry::PrefabPools::reconcile_destroyed).
    /// The host contract only promises the notification "eventually";
    /// this queue is how the scene models that deferral.
    pub fn take_destroyed(&mut self) -> Vec<NodeHandle> {
        std::mem::take(&mut self.pending_removals)
    }

    /// Total instance (non-container) deletion requests issued so far
    pub fn instances_destroyed(&self) -> usize {
        self.instances_destroyed
    }
}

impl InstanceHost for Scene {
    fn create_instance(&mut self, prototype: PrototypeId, parent: NodeHandle) -> NodeHandle {
        let (name, behavior) = match self.prototypes.get(&prototype) {
            Some(proto) => (
                format!("{} (pooled)", proto.name),
                proto.behavior.as_ref().map(|factory| factory()),
            ),
            None => (format!("prototype-{} (pooled)", prototype.id()), None),
        };

        let handle = self.mint_handle();
        let mut node = Node::new(name, Some(parent), Some(prototype));
        node.behavior = behavior;
        self.nodes.insert(handle, node);
        handle
    }

    fn create_container(&mut self, name: &str, parent: Option<NodeHandle>) -> NodeHandle {
        let handle = self.mint_handle();
        self.nodes
            .insert(handle, Node::new(name.to_string(), parent, None));
        handle
    }

    fn destroy_instance(&mut self, handle: NodeHandle) {
        if let Some(node) = self.nodes.remove(&handle) {
            if node.prototype.is_some() {
                self.instances_destroyed += 1;
            }
            self.pending_removals.push(handle);
        }
    }

    fn set_active(&mut self, handle: NodeHandle, active: bool) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.active = active;
        }
    }

    fn set_parent(&mut self, handle: NodeHandle, parent: Option<NodeHandle>) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.parent = parent;
        }
    }

    fn set_transform(&mut self, handle: NodeHandle, position: Vec3, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.position = position;
            node.rotation = rotation;
        }
    }

    fn notify(&mut self, handle: NodeHandle, event: LifecycleEvent) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            if let Some(behavior) = node.behavior.as_mut() {
                match event {
                    LifecycleEvent::Spawned => behavior.on_spawned(),
                    LifecycleEvent::Despawned => behavior.on_despawned(),
                }
            }
        }
    }

    fn component_mut<C: 'static>(&mut self, handle: NodeHandle) -> Option<&mut C> {
        self.nodes
            .get_mut(&handle)
            .and_then(|node| node.components.get_mut(&TypeId::of::<C>()))
            .and_then(|boxed| boxed.downcast_mut::<C>())
    }
}
