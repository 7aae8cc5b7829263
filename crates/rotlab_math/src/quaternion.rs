//! Rotation quaternions
//!
//! A quaternion `(w, x, y, z)` with `w² + x² + y² + z² = 1` encodes a rotation of
//! angle θ about unit axis `a` as `w = cos(θ/2)`, `(x, y, z) = a sin(θ/2)`.
//!
//! `q` and `-q` encode the same rotation. Nothing in this module flips signs
//! behind the caller's back; use [`Quaternion::same_rotation`] to compare two
//! quaternions as rotations.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::euler::{Axis, EulerAngles};
use crate::{AxisAngle, RotationMatrix, Vec3, QUATERNION_EPSILON};

/// Quaternion in canonical field order (w, x, y, z)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar part
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// Identity rotation
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Components as `[w, x, y, z]`
    pub fn to_array(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Vector part
    #[inline]
    pub fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// True when the magnitude is below [`QUATERNION_EPSILON`] or not finite
    pub fn is_degenerate(&self) -> bool {
        let mag = self.magnitude();
        !(mag.is_finite() && mag >= QUATERNION_EPSILON)
    }

    /// Four-component dot product
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Scale to unit magnitude
    ///
    /// A degenerate quaternion (see [`Quaternion::is_degenerate`]) has no
    /// meaningful direction and becomes the identity instead.
    pub fn normalize(&self) -> Self {
        if self.is_degenerate() {
            return Self::IDENTITY;
        }
        let inv_mag = 1.0 / self.magnitude();
        Self::new(self.w * inv_mag, self.x * inv_mag, self.y * inv_mag, self.z * inv_mag)
    }

    /// Negate the vector part
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// `conjugate / |q|²`
    ///
    /// Divides explicitly so a slightly drifted quaternion still yields an exact
    /// inverse. A degenerate quaternion has no inverse and yields the identity.
    pub fn inverse(&self) -> Self {
        if self.is_degenerate() {
            return Self::IDENTITY;
        }
        let inv = 1.0 / self.magnitude_squared();
        let c = self.conjugate();
        Self::new(c.w * inv, c.x * inv, c.y * inv, c.z * inv)
    }

    /// Rotation of `angle` radians about `axis`
    ///
    /// The axis is normalized here; a zero axis falls back to [`Vec3::DEFAULT_AXIS`].
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Axis and angle (radians, in [0, 2π])
    ///
    /// When `w ≈ ±1` the rotation is (a multiple of) a full turn, the axis is
    /// undefined and the identity axis-angle is returned.
    pub fn to_axis_angle(&self) -> AxisAngle {
        let q = self.normalize();
        let w = q.w.clamp(-1.0, 1.0);
        let sin_half = (1.0 - w * w).max(0.0).sqrt();
        if sin_half < 1e-6 {
            return AxisAngle::IDENTITY;
        }
        let axis = q.vector() / sin_half;
        match axis.try_normalized() {
            Some(axis) => AxisAngle::from_unit(axis, 2.0 * w.acos()),
            None => AxisAngle::IDENTITY,
        }
    }

    /// Elemental rotation about a principal axis (radians)
    pub fn from_axis(axis: Axis, angle: f64) -> Self {
        let unit = match axis {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        };
        Self::from_axis_angle(unit, angle)
    }

    /// Compose elemental quaternions in `angles.order`: `q_A * q_B * q_C`
    ///
    /// Same ordering rule as [`RotationMatrix::from_euler`].
    pub fn from_euler(angles: &EulerAngles) -> Self {
        angles
            .order
            .axes()
            .iter()
            .fold(Self::IDENTITY, |acc, &axis| {
                acc * Self::from_axis(axis, angles.angle_for(axis).to_radians())
            })
    }

    pub fn to_matrix(&self) -> RotationMatrix {
        RotationMatrix::from_quaternion(self)
    }

    pub fn from_matrix(m: &RotationMatrix) -> Self {
        m.to_quaternion()
    }

    /// Multiply the rotation angle by `factor`, keeping the axis
    ///
    /// The identity has no axis; it stays the identity for every factor.
    pub fn scale_angle(&self, factor: f64) -> Self {
        let aa = self.to_axis_angle();
        Self::from_axis_angle(aa.axis, aa.angle * factor)
    }

    /// Rotate a vector: `q v q*`
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let q = self.normalize();
        let u = q.vector();
        // v' = v + 2w(u x v) + 2u x (u x v)
        let t = u.cross(v) * 2.0;
        v + t * q.w + u.cross(t)
    }

    /// True when `self` and `other` describe the same rotation, allowing for
    /// the `q` / `-q` sign ambiguity
    pub fn same_rotation(&self, other: &Self, eps: f64) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        (1.0 - a.dot(&b).abs()) < eps
    }

    /// Component-wise comparison within `eps` (sign-sensitive)
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.w - other.w).abs() < eps
            && (self.x - other.x).abs() < eps
            && (self.y - other.y).abs() < eps
            && (self.z - other.z).abs() < eps
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Self;

    /// Hamilton product; `a * b` applies `b` first, then `a`
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AxisOrder;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_identity_and_default() {
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(Quaternion::IDENTITY.rotate(v).approx_eq(v, EPSILON));
    }

    #[test]
    fn test_normalize_unit_magnitude() {
        for q in [
            Quaternion::new(2.0, 0.0, 0.0, 0.0),
            Quaternion::new(1.0, 2.0, 3.0, 4.0),
            Quaternion::new(-0.001, 0.002, 0.0, 0.0005),
        ] {
            assert!((q.normalize().magnitude() - 1.0).abs() < 1e-6, "{:?}", q);
        }
    }

    #[test]
    fn test_normalize_degenerate_is_identity() {
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(), Quaternion::IDENTITY);
        assert_eq!(Quaternion::new(5e-5, 0.0, 0.0, 0.0).normalize(), Quaternion::IDENTITY);
        assert_eq!(Quaternion::new(f64::NAN, 1.0, 0.0, 0.0).normalize(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_normalize_does_not_flip_sign() {
        let q = Quaternion::new(-2.0, 0.0, 0.0, 0.0).normalize();
        assert_eq!(q, Quaternion::new(-1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_from_axis_angle_x_90() {
        let q = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2);
        assert!(q.approx_eq(&Quaternion::new(0.7071, 0.7071, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn test_axis_angle_round_trip() {
        let axis = Vec3::new(1.0, 1.0, 1.0).normalized();
        for angle in [0.3, FRAC_PI_3, 2.5, 4.0] {
            let aa = Quaternion::from_axis_angle(axis, angle).to_axis_angle();
            assert!(aa.axis.approx_eq(axis, 1e-9), "{}", angle);
            assert!((aa.angle - angle).abs() < 1e-9, "{}", angle);
        }
    }

    #[test]
    fn test_to_axis_angle_identity_default_axis() {
        let aa = Quaternion::IDENTITY.to_axis_angle();
        assert_eq!(aa.axis, Vec3::DEFAULT_AXIS);
        assert_eq!(aa.angle, 0.0);

        // w = -1 is a full turn
        let aa = Quaternion::new(-1.0, 0.0, 0.0, 0.0).to_axis_angle();
        assert_eq!(aa.angle, 0.0);
    }

    #[test]
    fn test_conjugate_and_inverse() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 2.0), 0.8);
        assert_eq!(q.conjugate(), Quaternion::new(q.w, -q.x, -q.y, -q.z));
        assert!((q * q.inverse()).approx_eq(&Quaternion::IDENTITY, EPSILON));
    }

    #[test]
    fn test_inverse_divides_by_magnitude() {
        let q = Quaternion::new(1.0, 1.0, 0.0, 0.0);
        let inv = q.inverse();
        // |q|² = 2
        assert!(inv.approx_eq(&Quaternion::new(0.5, -0.5, 0.0, 0.0), EPSILON));
        assert!((q * inv).approx_eq(&Quaternion::IDENTITY, EPSILON));
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).inverse(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_mul_non_commutative() {
        let a = Quaternion::from_axis(Axis::X, FRAC_PI_2);
        let b = Quaternion::from_axis(Axis::Y, FRAC_PI_2);
        assert!(!(a * b).same_rotation(&(b * a), 1e-6));
    }

    #[test]
    fn test_from_euler_matches_matrix() {
        for order in AxisOrder::ALL {
            let e = EulerAngles::new(15.0, -65.0, 120.0, order);
            let from_q = Quaternion::from_euler(&e).to_matrix();
            assert!(from_q.approx_eq(&e.to_matrix(), 1e-9), "{}", order);
        }
    }

    #[test]
    fn test_negation_same_matrix() {
        let q = Quaternion::new(0.3, -0.5, 0.7, 0.1).normalize();
        assert!(q.to_matrix().approx_eq(&(-q).to_matrix(), 1e-12));
        assert!(q.same_rotation(&-q, 1e-12));
    }

    #[test]
    fn test_rotate_matches_matrix() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, -1.0, 0.5), 1.1);
        let v = Vec3::new(0.2, 3.0, -1.0);
        assert!(q.rotate(v).approx_eq(q.to_matrix() * v, 1e-9));
    }

    #[test]
    fn test_scale_angle_keeps_axis() {
        let axis = Vec3::new(0.0, 0.0, 1.0);
        let q = Quaternion::from_axis_angle(axis, 0.6);
        let doubled = q.scale_angle(2.0).to_axis_angle();
        assert!(doubled.axis.approx_eq(axis, 1e-9));
        assert!((doubled.angle - 1.2).abs() < 1e-9);

        let halved = q.scale_angle(0.5).to_axis_angle();
        assert!((halved.angle - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_scale_angle_identity_stays_identity() {
        assert!(Quaternion::IDENTITY.scale_angle(2.0).approx_eq(&Quaternion::IDENTITY, EPSILON));
        assert!(Quaternion::IDENTITY.scale_angle(0.5).approx_eq(&Quaternion::IDENTITY, EPSILON));
    }

    #[test]
    fn test_half_turn_doubles_to_full_turn() {
        let q = Quaternion::from_axis_angle(Vec3::X, PI);
        let full = q.scale_angle(2.0);
        assert!(full.same_rotation(&Quaternion::IDENTITY, 1e-9));
    }
}
