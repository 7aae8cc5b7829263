//! Rigid transforms (rotation + translation)
//!
//! A [`RigidTransform`] maps body-frame points into the world frame as
//! `p_world = R · p_body + t`. The rotation is a full [`RotationState`], so the
//! transform exposes every rotation representation and remembers the last edit.

use rotlab_math::{RotationMatrix, Vec3};

use crate::diagnostics::UpdateReport;
use crate::input::FieldReader;
use crate::state::{EngineSettings, RotationState};

/// A 4x4 homogeneous matrix
///
/// # Element order
///
/// Row-major: [`HomogeneousMatrix::to_row_major`] index `4 * row + col` holds
/// element `(row, col)`. The upper-left 3x3 block is the rotation, column 3 holds
/// the translation and the last row is `(0, 0, 0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomogeneousMatrix {
    m: [[f64; 4]; 4],
}

impl Default for HomogeneousMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl HomogeneousMatrix {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Assemble from a rotation block and a translation column
    pub fn from_parts(rotation: &RotationMatrix, translation: Vec3) -> Self {
        let r = rotation.rows();
        let t = translation.to_array();
        let mut m = Self::IDENTITY.m;
        for row in 0..3 {
            m[row][..3].copy_from_slice(&r[row]);
            m[row][3] = t[row];
        }
        Self { m }
    }

    /// Element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    pub fn rows(&self) -> [[f64; 4]; 4] {
        self.m
    }

    /// The sixteen elements, index `4 * row + col`
    pub fn to_row_major(&self) -> [f64; 16] {
        bytemuck::cast(self.m)
    }

    /// The sixteen elements, index `4 * col + row` (GPU-style layout)
    pub fn to_column_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[4 * col + row] = self.m[row][col];
            }
        }
        out
    }

    /// The rotation block
    pub fn rotation(&self) -> RotationMatrix {
        let m = &self.m;
        RotationMatrix::from_rows([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// The translation column
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Multiply `(p, 1)` and drop the homogeneous coordinate
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation().transform(p) + self.translation()
    }
}

/// A rotation plus a translation
#[derive(Clone, Debug, Default)]
pub struct RigidTransform {
    /// Translation of the body origin in the world frame
    pub translation: Vec3,
    /// Orientation of the body frame
    pub rotation: RotationState,
}

impl RigidTransform {
    /// Identity transform with the given engine settings
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: RotationState::new(settings),
        }
    }

    /// Create a transform from parts
    pub fn from_parts(translation: Vec3, rotation: RotationState) -> Self {
        Self { translation, rotation }
    }

    /// Set the translation; non-finite components become 0
    pub fn set_translation(&mut self, translation: Vec3) -> UpdateReport {
        let mut report = UpdateReport::new();
        let mut reader = FieldReader::new(&mut report);
        self.translation = Vec3::new(
            reader.number("tx", translation.x, 0.0),
            reader.number("ty", translation.y, 0.0),
            reader.number("tz", translation.z, 0.0),
        );
        report
    }

    /// Set the translation from raw fields; invalid fields become 0
    pub fn set_translation_fields(&mut self, fields: [&str; 3]) -> UpdateReport {
        let mut report = UpdateReport::new();
        let mut reader = FieldReader::new(&mut report);
        self.translation = Vec3::new(
            reader.text("tx", fields[0], 0.0),
            reader.text("ty", fields[1], 0.0),
            reader.text("tz", fields[2], 0.0),
        );
        report
    }

    /// Body frame to world frame: `R · p + t`
    ///
    /// Uses the proper rotation of the canonical state, so a non-orthonormal
    /// matrix awaiting repair never shears the result.
    pub fn apply_to_point(&self, p_body: Vec3) -> Vec3 {
        self.rotation.rotate(p_body) + self.translation
    }

    /// World frame to body frame: `Rᵀ · (p - t)`
    pub fn world_to_body(&self, p_world: Vec3) -> Vec3 {
        self.rotation
            .rotation_matrix()
            .transpose()
            .transform(p_world - self.translation)
    }

    /// Rotate a direction (no translation)
    pub fn apply_to_direction(&self, d: Vec3) -> Vec3 {
        self.rotation.rotate(d)
    }

    /// The 4x4 homogeneous matrix of this transform
    pub fn homogeneous_matrix(&self) -> HomogeneousMatrix {
        HomogeneousMatrix::from_parts(&self.rotation.rotation_matrix(), self.translation)
    }

    /// The transform that undoes this one
    ///
    /// `t.inverse().apply_to_point(t.apply_to_point(p)) == p`
    pub fn inverse(&self) -> Self {
        let inv_q = self.rotation.quaternion().inverse();
        let rotation = RotationState::from_quaternion(inv_q, *self.rotation.settings());
        let translation = -inv_q.rotate(self.translation);
        Self { translation, rotation }
    }

    /// Compose two transforms: result = self * other
    ///
    /// The composed transform applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let q = self.rotation.quaternion() * other.rotation.quaternion();
        Self {
            translation: self.apply_to_point(other.translation),
            rotation: RotationState::from_quaternion(q, *self.rotation.settings()),
        }
    }

    /// Reset both translation and rotation
    pub fn reset(&mut self) -> UpdateReport {
        self.translation = Vec3::ZERO;
        self.rotation.reset_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use rotlab_math::{AxisOrder, EulerAngles};

    const EPSILON: f64 = 1e-9;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        a.approx_eq(b, EPSILON)
    }

    fn sample() -> RigidTransform {
        let mut t = RigidTransform::default();
        t.set_translation(Vec3::new(1.5, 1.0, 0.5));
        t.rotation.set_euler(EulerAngles::new(15.0, 30.0, 45.0, AxisOrder::XYZ));
        t
    }

    #[test]
    fn test_translation_only() {
        let mut t = RigidTransform::default();
        t.set_translation(Vec3::new(2.0, 1.0, 0.0));
        let p = t.apply_to_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(vec_approx_eq(p, Vec3::new(3.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotation_then_translation() {
        let mut t = RigidTransform::default();
        t.set_translation(Vec3::new(3.0, 2.0, 0.0));
        t.rotation.set_euler(EulerAngles::new(0.0, 0.0, 90.0, AxisOrder::XYZ));
        let p = t.apply_to_point(Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(3.0, 3.0, 0.0)));
    }

    #[test]
    fn test_translation_fields() {
        let mut t = RigidTransform::default();
        let report = t.set_translation_fields(["1", "oops", ""]);
        assert!(report.has(Diagnostics::INVALID_NUMERIC_INPUT));
        assert_eq!(report.warnings().len(), 2);
        assert_eq!(t.translation, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_world_to_body_roundtrip() {
        let t = sample();
        let p = Vec3::new(0.3, -2.0, 4.0);
        assert!(vec_approx_eq(t.world_to_body(t.apply_to_point(p)), p));
    }

    #[test]
    fn test_inverse() {
        let t = sample();
        let inv = t.inverse();
        let p = Vec3::new(-1.0, 0.5, 2.0);
        assert!(vec_approx_eq(inv.apply_to_point(t.apply_to_point(p)), p));
    }

    #[test]
    fn test_compose() {
        let a = sample();
        let mut b = RigidTransform::default();
        b.set_translation(Vec3::new(0.0, -1.0, 2.0));
        b.rotation.set_axis_angle(Vec3::Y, 70.0);

        let ab = a.compose(&b);
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(ab.apply_to_point(p), a.apply_to_point(b.apply_to_point(p))));
    }

    #[test]
    fn test_homogeneous_layout() {
        let mut t = RigidTransform::default();
        t.set_translation(Vec3::new(2.0, 1.0, 0.0));
        t.rotation.set_euler(EulerAngles::new(0.0, 0.0, 90.0, AxisOrder::XYZ));
        let h = t.homogeneous_matrix();
        let e = h.to_row_major();

        assert_eq!(e[3], 2.0);
        assert_eq!(e[7], 1.0);
        assert_eq!(e[11], 0.0);
        assert_eq!(&e[12..], &[0.0, 0.0, 0.0, 1.0]);
        assert!((e[1] + 1.0).abs() < EPSILON);
        assert!((e[4] - 1.0).abs() < EPSILON);
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(e[4 * row + col], h.get(row, col));
                assert_eq!(h.to_column_major()[4 * col + row], h.get(row, col));
            }
        }
    }

    #[test]
    fn test_homogeneous_transform_matches() {
        let t = sample();
        let p = Vec3::new(0.1, 0.2, 0.3);
        assert!(vec_approx_eq(t.homogeneous_matrix().transform_point(p), t.apply_to_point(p)));
    }

    #[test]
    fn test_non_orthonormal_matrix_still_rotates_properly() {
        let mut t = RigidTransform::default();
        let c = 0.8f64.cbrt();
        t.rotation
            .set_matrix(RotationMatrix::from_rows([[c, 0.0, 0.0], [0.0, c, 0.0], [0.0, 0.0, c]]));
        let p = t.apply_to_point(Vec3::new(1.0, 2.0, 3.0));
        assert!(vec_approx_eq(p, Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_reset() {
        let mut t = sample();
        t.reset();
        assert_eq!(t.translation, Vec3::ZERO);
        assert!(vec_approx_eq(t.apply_to_point(Vec3::Y), Vec3::Y));
    }
}
