//! Identity types for prototypes and scene nodes

/// Stable identifier for a prefab prototype, assigned by the host
/// environment (typically the engine's asset id for the prefab).
///
/// Two spawn requests carrying the same `PrototypeId` resolve to the
/// same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrototypeId(u64);

impl PrototypeId {
    /// Create a prototype id from a host-assigned value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Handle to a scene node owned by the host environment.
///
/// Covers both pooled instances and holding containers. Minted by the
/// host when the node is created, stable for the node's lifetime, and
/// meaningless once the node is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

impl NodeHandle {
    /// Create a node handle from a host-assigned value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw handle value
    pub fn id(&self) -> u64 {
        self.0
    }
}
