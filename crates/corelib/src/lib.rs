//! Core scene types: math re-exports, transforms, camera, bounding boxes
//! and the scene graph the viewer traverses every frame.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod aabb;
pub mod camera;
pub mod orbit;
pub mod scene;
pub mod stack;
pub mod transform;
