//! 3D Rotation Mathematics Library
//!
//! This crate provides the four interchangeable rotation representations used by
//! rotlab, plus the small vector type they are built on.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`RotationMatrix`] - 3x3 rotation matrix (row-major)
//! - [`EulerAngles`] - roll/pitch/yaw in degrees with an [`AxisOrder`]
//! - [`AxisAngle`] - unit axis plus angle in radians
//! - [`Quaternion`] - (w, x, y, z) rotation quaternion
//!
//! Every conversion is closed-form. Degenerate inputs never produce NaN: they
//! collapse to the documented defaults ([`Vec3::X`] for axes, [`Quaternion::IDENTITY`]
//! for near-zero quaternions).

mod vec3;
pub mod mat3;
pub mod euler;
pub mod axis_angle;
pub mod quaternion;

pub use vec3::Vec3;
pub use mat3::RotationMatrix;
pub use euler::{Axis, AxisOrder, EulerAngles, EulerExtraction, ParseAxisOrderError};
pub use axis_angle::AxisAngle;
pub use quaternion::Quaternion;

/// Vectors shorter than this cannot be normalized and fall back to [`Vec3::X`]
pub const VECTOR_EPSILON: f64 = 1e-6;

/// Quaternions with a magnitude below this are replaced by the identity
pub const QUATERNION_EPSILON: f64 = 1e-4;

/// Default allowed deviation of a matrix determinant from 1
pub const DETERMINANT_TOLERANCE: f64 = 0.1;

/// Cosine of the middle Euler angle below which the decomposition is treated as gimbal locked
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-7;
