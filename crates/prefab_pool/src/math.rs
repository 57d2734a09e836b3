//! Math types shared with the host scene graph
//!
//! Thin aliases over nalgebra so the pooling layer and the host agree on
//! placement types without pulling in engine-specific wrappers.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;
