//! Axis-angle rotations
//!
//! The angle is stored in radians. Constructors normalize the axis; a zero-length
//! axis falls back to [`Vec3::DEFAULT_AXIS`] instead of producing NaN.

use serde::{Serialize, Deserialize};

use crate::{Quaternion, RotationMatrix, Vec3};

/// Rotation of `angle` radians about a unit `axis`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    /// Unit rotation axis
    pub axis: Vec3,
    /// Rotation angle in radians
    pub angle: f64,
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AxisAngle {
    /// Zero rotation about the default axis
    pub const IDENTITY: Self = Self { axis: Vec3::DEFAULT_AXIS, angle: 0.0 };

    /// Create from any non-zero axis (normalized here)
    pub fn new(axis: Vec3, angle: f64) -> Self {
        Self { axis: axis.normalized(), angle }
    }

    /// Create from an axis, or `None` if it is too short to normalize
    pub fn try_new(axis: Vec3, angle: f64) -> Option<Self> {
        axis.try_normalized().map(|axis| Self { axis, angle })
    }

    /// Create from an axis the caller guarantees to be unit length
    pub(crate) const fn from_unit(axis: Vec3, angle: f64) -> Self {
        Self { axis, angle }
    }

    /// Create with the angle given in degrees
    pub fn from_degrees(axis: Vec3, degrees: f64) -> Self {
        Self::new(axis, degrees.to_radians())
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    /// True for angles that are a whole number of turns (axis meaningless)
    pub fn is_identity(&self, eps: f64) -> bool {
        let turns = self.angle / std::f64::consts::TAU;
        (turns - turns.round()).abs() * std::f64::consts::TAU < eps
    }

    /// `w = cos(θ/2)`, vector part `axis * sin(θ/2)`
    pub fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_axis_angle(self.axis, self.angle)
    }

    /// Rodrigues' formula
    pub fn to_matrix(&self) -> RotationMatrix {
        RotationMatrix::from_axis_angle(self)
    }

    pub fn from_quaternion(q: &Quaternion) -> Self {
        q.to_axis_angle()
    }

    pub fn from_matrix(m: &RotationMatrix) -> Self {
        m.to_axis_angle()
    }

    /// True when both describe the same rotation
    ///
    /// Handles the `(a, θ)` ~ `(-a, -θ)` ~ `(a, θ + 2πk)` equivalences by comparing
    /// the quaternions up to sign.
    pub fn same_rotation(&self, other: &Self, eps: f64) -> bool {
        self.to_quaternion().same_rotation(&other.to_quaternion(), eps)
    }
}
