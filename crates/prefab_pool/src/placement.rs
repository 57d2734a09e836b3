//! Spawn placement options

use crate::handle::NodeHandle;
use crate::math::{Quat, Vec3};

/// Where and under which parent a spawned instance should appear.
///
/// All fields are optional; the default placement leaves the instance
/// wherever its pool keeps it, with its last transform intact. The spawn
/// convenience variants are argument plumbing over this struct.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placement {
    /// World position to move the instance to
    pub position: Option<Vec3>,

    /// World rotation to apply
    pub rotation: Option<Quat>,

    /// Parent node to attach the instance under
    pub parent: Option<NodeHandle>,
}

impl Placement {
    /// Placement at a world position
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Placement at a world position with a rotation
    pub fn at_rotated(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            parent: None,
        }
    }

    /// Attach the instance under a parent node
    pub fn under(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// True when a transform update needs to reach the host
    pub(crate) fn wants_transform(&self) -> bool {
        self.position.is_some() || self.rotation.is_some()
    }
}
