//! 3x3 rotation matrices
//!
//! [`RotationMatrix`] is the hub representation: every other representation can be
//! built from it and turned into it with a closed-form formula.
//!
//! # Storage Layout
//!
//! Elements are stored row-major as `[[f64; 3]; 3]`; `get(row, col)` reads one
//! cell and [`RotationMatrix::from_rows`] / [`RotationMatrix::rows`] exchange all
//! nine in row order. The columns are the images of the X, Y and Z basis vectors.
//! Vectors are column vectors, so `m * v` rotates `v`.
//!
//! A matrix supplied from outside may have drifted from orthonormality. It is
//! still usable as-is; [`RotationMatrix::orthonormalize`] repairs it on request.

use crate::euler::{Axis, AxisOrder, EulerAngles, EulerExtraction};
use crate::{AxisAngle, Quaternion, Vec3, GIMBAL_LOCK_EPSILON};

/// A 3x3 matrix intended to hold a proper rotation (row-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationMatrix {
    m: [[f64; 3]; 3],
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationMatrix {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    /// Build from rows: `rows[r][c]` is the element at row `r`, column `c`
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Build from the nine elements in row-major order (m11, m12, m13, m21, ...)
    pub fn from_row_major(e: [f64; 9]) -> Self {
        Self::from_rows([
            [e[0], e[1], e[2]],
            [e[3], e[4], e[5]],
            [e[6], e[7], e[8]],
        ])
    }

    /// Build from three column vectors
    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([
            [c0.x, c1.x, c2.x],
            [c0.y, c1.y, c2.y],
            [c0.z, c1.z, c2.z],
        ])
    }

    /// Rows as nested arrays
    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.m
    }

    /// The nine elements in row-major order
    pub fn to_row_major(&self) -> [f64; 9] {
        let m = &self.m;
        [
            m[0][0], m[0][1], m[0][2],
            m[1][0], m[1][1], m[1][2],
            m[2][0], m[2][1], m[2][2],
        ]
    }

    /// Element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    /// Column vector `col`
    pub fn column(&self, col: usize) -> Vec3 {
        Vec3::new(self.m[0][col], self.m[1][col], self.m[2][col])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Rotate a column vector: `m * v`
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// True when `|det - 1| <= tolerance` (a proper rotation, possibly drifted)
    pub fn is_proper_rotation(&self, tolerance: f64) -> bool {
        (self.determinant() - 1.0).abs() <= tolerance
    }

    /// Largest absolute deviation of `m * mᵗ` from the identity
    pub fn orthonormality_error(&self) -> f64 {
        let product = *self * self.transpose();
        let mut worst = 0.0f64;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((product.m[i][j] - expected).abs());
            }
        }
        worst
    }

    /// Element-wise comparison within `eps`
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.to_row_major()
            .iter()
            .zip(other.to_row_major().iter())
            .all(|(a, b)| (a - b).abs() < eps)
    }

    /// Gram-Schmidt repair
    ///
    /// Column 1 is normalized, column 2 is made orthogonal to it and normalized,
    /// and column 3 is replaced by their cross product. The result is right-handed
    /// with determinant 1 even if the input was a reflection or singular.
    pub fn orthonormalize(&self) -> Self {
        let v1 = self.column(0).normalized();

        let c1 = self.column(1);
        let v2 = (c1 - v1 * v1.dot(c1))
            .try_normalized()
            .or_else(|| {
                let c2 = self.column(2);
                (c2 - v1 * v1.dot(c2)).try_normalized()
            })
            .unwrap_or_else(|| any_perpendicular(v1));

        let v3 = v1.cross(v2).normalized();

        Self::from_columns(v1, v2, v3)
    }

    /// Elemental rotation about X (radians)
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0],
            [0.0, c, -s],
            [0.0, s, c],
        ])
    }

    /// Elemental rotation about Y (radians)
    ///
    /// The sine signs are mirrored relative to X and Z so the rotation stays
    /// right-handed (Z x X = Y).
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s],
            [0.0, 1.0, 0.0],
            [-s, 0.0, c],
        ])
    }

    /// Elemental rotation about Z (radians)
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, -s, 0.0],
            [s, c, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Elemental rotation about `axis` (radians)
    pub fn rotation_about(axis: Axis, angle: f64) -> Self {
        match axis {
            Axis::X => Self::rotation_x(angle),
            Axis::Y => Self::rotation_y(angle),
            Axis::Z => Self::rotation_z(angle),
        }
    }

    /// Compose the elemental rotations in `angles.order`: `M_A * M_B * M_C`
    pub fn from_euler(angles: &EulerAngles) -> Self {
        angles
            .order
            .axes()
            .iter()
            .fold(Self::IDENTITY, |acc, &axis| {
                acc * Self::rotation_about(axis, angles.angle_for(axis).to_radians())
            })
    }

    /// Decompose into Euler angles (degrees) for `order`
    ///
    /// The middle angle comes from its sine and cosine, both read off the matrix.
    /// Lock is declared only when that cosine is below [`GIMBAL_LOCK_EPSILON`],
    /// where the first and third angles are coupled. The canonical solution then
    /// keeps the middle angle, fixes the third angle of the sequence to 0 and
    /// folds the whole coupled rotation into the first one. The result reproduces
    /// the same matrix but not necessarily the input angles.
    pub fn to_euler(&self, order: AxisOrder) -> EulerExtraction {
        let e = |r: usize, c: usize| self.m[r][c];

        // (x, y, z, cosine of the middle angle)
        let (x, y, z, middle_cos) = match order {
            AxisOrder::XYZ => {
                let c = e(0, 0).hypot(e(0, 1));
                let y = f64::atan2(e(0, 2), c);
                if c >= GIMBAL_LOCK_EPSILON {
                    (f64::atan2(-e(1, 2), e(2, 2)), y, f64::atan2(-e(0, 1), e(0, 0)), c)
                } else {
                    (f64::atan2(e(2, 1), e(1, 1)), y, 0.0, c)
                }
            }
            AxisOrder::YXZ => {
                let c = e(1, 0).hypot(e(1, 1));
                let x = f64::atan2(-e(1, 2), c);
                if c >= GIMBAL_LOCK_EPSILON {
                    (x, f64::atan2(e(0, 2), e(2, 2)), f64::atan2(e(1, 0), e(1, 1)), c)
                } else {
                    (x, f64::atan2(-e(2, 0), e(0, 0)), 0.0, c)
                }
            }
            AxisOrder::ZXY => {
                let c = e(2, 0).hypot(e(2, 2));
                let x = f64::atan2(e(2, 1), c);
                if c >= GIMBAL_LOCK_EPSILON {
                    (x, f64::atan2(-e(2, 0), e(2, 2)), f64::atan2(-e(0, 1), e(1, 1)), c)
                } else {
                    (x, 0.0, f64::atan2(e(1, 0), e(0, 0)), c)
                }
            }
            AxisOrder::ZYX => {
                let c = e(2, 1).hypot(e(2, 2));
                let y = f64::atan2(-e(2, 0), c);
                if c >= GIMBAL_LOCK_EPSILON {
                    (f64::atan2(e(2, 1), e(2, 2)), y, f64::atan2(e(1, 0), e(0, 0)), c)
                } else {
                    (0.0, y, f64::atan2(-e(0, 1), e(1, 1)), c)
                }
            }
            AxisOrder::YZX => {
                let c = e(1, 1).hypot(e(1, 2));
                let z = f64::atan2(e(1, 0), c);
                if c >= GIMBAL_LOCK_EPSILON {
                    (f64::atan2(-e(1, 2), e(1, 1)), f64::atan2(-e(2, 0), e(0, 0)), z, c)
                } else {
                    (0.0, f64::atan2(e(0, 2), e(2, 2)), z, c)
                }
            }
            AxisOrder::XZY => {
                let c = e(0, 0).hypot(e(0, 2));
                let z = f64::atan2(-e(0, 1), c);
                if c >= GIMBAL_LOCK_EPSILON {
                    (f64::atan2(e(2, 1), e(1, 1)), f64::atan2(e(0, 2), e(0, 0)), z, c)
                } else {
                    (f64::atan2(-e(1, 2), e(2, 2)), 0.0, z, c)
                }
            }
        };

        let fix = |a: f64| if a.is_finite() { a.to_degrees() } else { 0.0 };

        EulerExtraction {
            angles: EulerAngles::new(fix(x), fix(y), fix(z), order),
            gimbal_locked: middle_cos < GIMBAL_LOCK_EPSILON || middle_cos.is_nan(),
        }
    }

    /// Closed-form conversion from a quaternion
    ///
    /// The quaternion is normalized first, so slight drift is tolerated and a
    /// degenerate one yields the identity. `q` and `-q` give the same matrix.
    pub fn from_quaternion(q: &Quaternion) -> Self {
        let q = q.normalize();
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);

        Self::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }

    /// Closed-form conversion to a unit quaternion
    ///
    /// Picks the branch with the largest of trace / diagonal terms so the
    /// divisor never approaches zero.
    pub fn to_quaternion(&self) -> Quaternion {
        let e = |r: usize, c: usize| self.m[r][c];
        let trace = e(0, 0) + e(1, 1) + e(2, 2);

        let q = if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Quaternion::new(
                0.25 / s,
                (e(2, 1) - e(1, 2)) * s,
                (e(0, 2) - e(2, 0)) * s,
                (e(1, 0) - e(0, 1)) * s,
            )
        } else if e(0, 0) > e(1, 1) && e(0, 0) > e(2, 2) {
            let s = 2.0 * (1.0 + e(0, 0) - e(1, 1) - e(2, 2)).sqrt();
            Quaternion::new(
                (e(2, 1) - e(1, 2)) / s,
                0.25 * s,
                (e(0, 1) + e(1, 0)) / s,
                (e(0, 2) + e(2, 0)) / s,
            )
        } else if e(1, 1) > e(2, 2) {
            let s = 2.0 * (1.0 + e(1, 1) - e(0, 0) - e(2, 2)).sqrt();
            Quaternion::new(
                (e(0, 2) - e(2, 0)) / s,
                (e(0, 1) + e(1, 0)) / s,
                0.25 * s,
                (e(1, 2) + e(2, 1)) / s,
            )
        } else {
            let s = 2.0 * (1.0 + e(2, 2) - e(0, 0) - e(1, 1)).sqrt();
            Quaternion::new(
                (e(1, 0) - e(0, 1)) / s,
                (e(0, 2) + e(2, 0)) / s,
                (e(1, 2) + e(2, 1)) / s,
                0.25 * s,
            )
        };

        q.normalize()
    }

    /// Rodrigues' rotation formula
    ///
    /// `R = I cos θ + (1 - cos θ) a aᵀ + sin θ [a]ₓ`
    pub fn from_axis_angle(aa: &AxisAngle) -> Self {
        let a = aa.axis.normalized();
        let (s, c) = aa.angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (a.x, a.y, a.z);

        Self::from_rows([
            [c + x * x * t, x * y * t - z * s, x * z * t + y * s],
            [y * x * t + z * s, c + y * y * t, y * z * t - x * s],
            [z * x * t - y * s, z * y * t + x * s, c + z * z * t],
        ])
    }

    /// Inverse of Rodrigues' formula
    ///
    /// Angle is in [0, π]. A (near) zero angle reports [`Vec3::DEFAULT_AXIS`] and 0,
    /// since any axis is valid there. Near π the skew part vanishes, so the axis
    /// is recovered from the symmetric part instead.
    pub fn to_axis_angle(&self) -> AxisAngle {
        let e = |r: usize, c: usize| self.m[r][c];
        let cos = ((e(0, 0) + e(1, 1) + e(2, 2) - 1.0) * 0.5).clamp(-1.0, 1.0);
        let angle = cos.acos();
        if !angle.is_finite() {
            return AxisAngle::IDENTITY;
        }
        let sin = angle.sin();

        if sin > 1e-4 {
            let axis = Vec3::new(e(2, 1) - e(1, 2), e(0, 2) - e(2, 0), e(1, 0) - e(0, 1));
            match axis.try_normalized() {
                Some(axis) => AxisAngle::from_unit(axis, angle),
                None => AxisAngle::IDENTITY,
            }
        } else if angle < std::f64::consts::FRAC_PI_2 {
            AxisAngle::IDENTITY
        } else {
            // θ ≈ π: R ≈ 2 a aᵀ - I
            let xx = ((e(0, 0) + 1.0) * 0.5).max(0.0);
            let yy = ((e(1, 1) + 1.0) * 0.5).max(0.0);
            let zz = ((e(2, 2) + 1.0) * 0.5).max(0.0);
            let xy = (e(0, 1) + e(1, 0)) * 0.25;
            let xz = (e(0, 2) + e(2, 0)) * 0.25;
            let yz = (e(1, 2) + e(2, 1)) * 0.25;

            let axis = if xx >= yy && xx >= zz {
                let x = xx.sqrt();
                Vec3::new(x, xy / x, xz / x)
            } else if yy >= zz {
                let y = yy.sqrt();
                Vec3::new(xy / y, y, yz / y)
            } else {
                let z = zz.sqrt();
                Vec3::new(xz / z, yz / z, z)
            };

            match axis.try_normalized() {
                Some(axis) => AxisAngle::from_unit(axis, angle),
                None => AxisAngle::IDENTITY,
            }
        }
    }
}

/// A unit vector perpendicular to unit vector `v`
fn any_perpendicular(v: Vec3) -> Vec3 {
    // Cross with the basis axis least aligned with v
    let helper = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vec3::X
    } else if v.y.abs() <= v.z.abs() {
        Vec3::Y
    } else {
        Vec3::Z
    };
    v.cross(helper).try_normalized().unwrap_or(Vec3::Y)
}

impl std::ops::Mul for RotationMatrix {
    type Output = Self;

    /// Matrix product; `a * b` applies `b` first, then `a`
    #[allow(clippy::needless_range_loop)]
    fn mul(self, other: Self) -> Self {
        let mut result = [[0.0f64; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result[i][j] += self.m[i][k] * other.m[k][j];
                }
            }
        }
        Self::from_rows(result)
    }
}

impl std::ops::Mul<Vec3> for RotationMatrix {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(v)
    }
}
