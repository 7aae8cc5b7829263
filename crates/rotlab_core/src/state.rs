//! Rotation state
//!
//! [`RotationState`] owns the single current rotation. Internally it is one unit
//! quaternion (free of gimbal lock); every other representation is a view derived
//! on read. The one exception is the representation the user edited last: it is
//! kept verbatim so reading it back shows exactly what was typed (Euler angles
//! outside (-180, 180], a drifted matrix awaiting repair, an axis-angle beyond 2π).

use rotlab_math::{
    AxisAngle, AxisOrder, EulerAngles, EulerExtraction, Quaternion, RotationMatrix, Vec3,
    DETERMINANT_TOLERANCE,
};
use serde::{Serialize, Deserialize};

use crate::diagnostics::{UpdateReport, Warning};
use crate::input::FieldReader;

/// Tunables for a [`RotationState`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Order used to compose and decompose Euler angles
    pub euler_order: AxisOrder,
    /// Allowed |det - 1| before a matrix is reported as non-orthonormal
    pub determinant_tolerance: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            euler_order: AxisOrder::XYZ,
            determinant_tolerance: DETERMINANT_TOLERANCE,
        }
    }
}

/// The representation the user touched last, kept as entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LastEdit {
    /// Quaternion edits and quaternion operations (the canonical form itself)
    Quaternion,
    Euler(EulerAngles),
    Matrix(RotationMatrix),
    AxisAngle(AxisAngle),
}

/// The current rotation plus the verbatim last edit
#[derive(Debug, Clone)]
pub struct RotationState {
    settings: EngineSettings,
    /// Always unit length
    canonical: Quaternion,
    last_edit: LastEdit,
    last_report: UpdateReport,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl RotationState {
    /// Identity rotation
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            canonical: Quaternion::IDENTITY,
            last_edit: LastEdit::Quaternion,
            last_report: UpdateReport::new(),
        }
    }

    /// State holding `q` (normalized; degenerate becomes identity)
    pub fn from_quaternion(q: Quaternion, settings: EngineSettings) -> Self {
        let mut state = Self::new(settings);
        state.set_quaternion(q);
        state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn euler_order(&self) -> AxisOrder {
        self.settings.euler_order
    }

    pub fn last_edit(&self) -> &LastEdit {
        &self.last_edit
    }

    /// Report produced by the most recent mutation
    pub fn last_report(&self) -> &UpdateReport {
        &self.last_report
    }

    // ---------- Views ----------

    /// The canonical unit quaternion
    pub fn quaternion(&self) -> Quaternion {
        self.canonical
    }

    /// The proper rotation matrix of the canonical rotation
    pub fn rotation_matrix(&self) -> RotationMatrix {
        self.canonical.to_matrix()
    }

    /// The matrix shown in the matrix editor
    ///
    /// After a matrix edit this is the matrix exactly as supplied, even if it is
    /// not orthonormal; otherwise it is [`RotationState::rotation_matrix`].
    pub fn matrix(&self) -> RotationMatrix {
        match self.last_edit {
            LastEdit::Matrix(m) => m,
            _ => self.rotation_matrix(),
        }
    }

    /// Determinant of [`RotationState::matrix`]
    pub fn matrix_determinant(&self) -> f64 {
        self.matrix().determinant()
    }

    /// True when [`RotationState::matrix`] is within the determinant tolerance
    pub fn is_matrix_orthonormal(&self) -> bool {
        self.matrix().is_proper_rotation(self.settings.determinant_tolerance)
    }

    /// Euler angles in the current order
    pub fn euler(&self) -> EulerAngles {
        self.euler_extraction().angles
    }

    /// Euler angles in the current order, with the gimbal lock flag
    pub fn euler_extraction(&self) -> EulerExtraction {
        match self.last_edit {
            LastEdit::Euler(e) if e.order == self.settings.euler_order => {
                let locked = self.rotation_matrix().to_euler(e.order).gimbal_locked;
                EulerExtraction { angles: e, gimbal_locked: locked }
            }
            _ => self.rotation_matrix().to_euler(self.settings.euler_order),
        }
    }

    pub fn axis_angle(&self) -> AxisAngle {
        match self.last_edit {
            LastEdit::AxisAngle(aa) => aa,
            _ => self.canonical.to_axis_angle(),
        }
    }

    /// Rotate a vector by the canonical rotation
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        self.rotation_matrix().transform(v)
    }

    // ---------- Typed setters ----------

    /// Set from Euler angles (degrees); also adopts `angles.order`
    pub fn set_euler(&mut self, angles: EulerAngles) -> UpdateReport {
        let mut report = UpdateReport::new();
        let angles = {
            let mut reader = FieldReader::new(&mut report);
            EulerAngles::new(
                reader.number("roll", angles.roll, 0.0),
                reader.number("pitch", angles.pitch, 0.0),
                reader.number("yaw", angles.yaw, 0.0),
                angles.order,
            )
        };
        self.apply_euler(angles, report)
    }

    /// Set from a 3x3 matrix
    ///
    /// The matrix is kept as supplied. If its determinant is outside the
    /// tolerance a [`Warning::NonOrthonormalMatrix`] is reported, but the matrix
    /// is still used (through a proper rotation derived from it) until
    /// [`RotationState::orthonormalize_matrix`] is called.
    pub fn set_matrix(&mut self, matrix: RotationMatrix) -> UpdateReport {
        let mut report = UpdateReport::new();
        let elements = {
            let mut reader = FieldReader::new(&mut report);
            let e = matrix.to_row_major();
            let mut out = [0.0; 9];
            for (i, value) in e.iter().enumerate() {
                out[i] = reader.number(MATRIX_FIELDS[i], *value, identity_element(i));
            }
            out
        };
        self.apply_matrix(RotationMatrix::from_row_major(elements), report)
    }

    /// Set from a quaternion (w, x, y, z)
    ///
    /// The quaternion is normalized; a near-zero one is replaced by the identity.
    pub fn set_quaternion(&mut self, q: Quaternion) -> UpdateReport {
        let mut report = UpdateReport::new();
        let q = {
            let mut reader = FieldReader::new(&mut report);
            Quaternion::new(
                reader.number("w", q.w, 0.0),
                reader.number("x", q.x, 0.0),
                reader.number("y", q.y, 0.0),
                reader.number("z", q.z, 0.0),
            )
        };
        self.apply_quaternion(q, report)
    }

    /// Set from an axis and an angle in degrees
    ///
    /// The axis is normalized; a zero axis becomes +X.
    pub fn set_axis_angle(&mut self, axis: Vec3, angle_degrees: f64) -> UpdateReport {
        let mut report = UpdateReport::new();
        let (axis, angle) = {
            let mut reader = FieldReader::new(&mut report);
            let axis = Vec3::new(
                reader.number("axis_x", axis.x, 1.0),
                reader.number("axis_y", axis.y, 0.0),
                reader.number("axis_z", axis.z, 0.0),
            );
            (axis, reader.number("angle", angle_degrees, 0.0))
        };
        self.apply_axis_angle(axis, angle, report)
    }

    // ---------- Raw field setters ----------

    /// Set from raw roll/pitch/yaw fields (degrees); invalid fields become 0
    pub fn set_euler_fields(
        &mut self,
        roll: &str,
        pitch: &str,
        yaw: &str,
        order: AxisOrder,
    ) -> UpdateReport {
        let mut report = UpdateReport::new();
        let angles = {
            let mut reader = FieldReader::new(&mut report);
            EulerAngles::new(
                reader.text("roll", roll, 0.0),
                reader.text("pitch", pitch, 0.0),
                reader.text("yaw", yaw, 0.0),
                order,
            )
        };
        self.apply_euler(angles, report)
    }

    /// Set from nine raw fields in row-major order (m11, m12, m13, m21, ...)
    ///
    /// Invalid diagonal fields become 1, invalid off-diagonal fields 0.
    pub fn set_matrix_fields(&mut self, fields: [&str; 9]) -> UpdateReport {
        let mut report = UpdateReport::new();
        let elements = {
            let mut reader = FieldReader::new(&mut report);
            let mut out = [0.0; 9];
            for (i, raw) in fields.iter().enumerate() {
                out[i] = reader.text(MATRIX_FIELDS[i], raw, identity_element(i));
            }
            out
        };
        self.apply_matrix(RotationMatrix::from_row_major(elements), report)
    }

    /// Set from raw w, x, y, z fields; invalid fields become 0
    pub fn set_quaternion_fields(&mut self, fields: [&str; 4]) -> UpdateReport {
        let mut report = UpdateReport::new();
        let q = {
            let mut reader = FieldReader::new(&mut report);
            Quaternion::new(
                reader.text("w", fields[0], 0.0),
                reader.text("x", fields[1], 0.0),
                reader.text("y", fields[2], 0.0),
                reader.text("z", fields[3], 0.0),
            )
        };
        self.apply_quaternion(q, report)
    }

    /// Set from raw axis x, y, z and angle (degrees) fields
    ///
    /// An invalid axis x becomes 1 and invalid y, z, angle become 0, so a blank
    /// form means "0° about +X".
    pub fn set_axis_angle_fields(&mut self, axis: [&str; 3], angle_degrees: &str) -> UpdateReport {
        let mut report = UpdateReport::new();
        let (axis, angle) = {
            let mut reader = FieldReader::new(&mut report);
            let axis = Vec3::new(
                reader.text("axis_x", axis[0], 1.0),
                reader.text("axis_y", axis[1], 0.0),
                reader.text("axis_z", axis[2], 0.0),
            );
            (axis, reader.text("angle", angle_degrees, 0.0))
        };
        self.apply_axis_angle(axis, angle, report)
    }

    // ---------- Operations ----------

    /// Change the Euler order
    ///
    /// If the last edit was Euler angles, the same three angles are re-applied in
    /// the new order, which changes the orientation. Otherwise the rotation is
    /// unchanged and only the Euler view is decomposed differently.
    pub fn set_euler_order(&mut self, order: AxisOrder) -> UpdateReport {
        match self.last_edit {
            LastEdit::Euler(e) => self.apply_euler(e.with_order(order), UpdateReport::new()),
            _ => {
                self.settings.euler_order = order;
                let mut report = UpdateReport::new();
                if self.euler_extraction().gimbal_locked {
                    report.push(Warning::GimbalLock { order });
                }
                self.finish(report)
            }
        }
    }

    /// Re-commit the canonical quaternion as a quaternion edit
    pub fn normalize_quaternion(&mut self) -> UpdateReport {
        self.apply_quaternion(self.canonical, UpdateReport::new())
    }

    pub fn reset_identity(&mut self) -> UpdateReport {
        self.apply_quaternion(Quaternion::IDENTITY, UpdateReport::new())
    }

    pub fn conjugate(&mut self) -> UpdateReport {
        self.apply_quaternion(self.canonical.conjugate(), UpdateReport::new())
    }

    pub fn invert(&mut self) -> UpdateReport {
        self.apply_quaternion(self.canonical.inverse(), UpdateReport::new())
    }

    /// Multiply the rotation angle by `factor` about the same axis
    pub fn scale_angle(&mut self, factor: f64) -> UpdateReport {
        self.apply_quaternion(self.canonical.scale_angle(factor), UpdateReport::new())
    }

    pub fn double_angle(&mut self) -> UpdateReport {
        self.scale_angle(2.0)
    }

    pub fn half_angle(&mut self) -> UpdateReport {
        self.scale_angle(0.5)
    }

    /// Repair the editor matrix with Gram-Schmidt and make it the current rotation
    pub fn orthonormalize_matrix(&mut self) -> UpdateReport {
        let repaired = self.matrix().orthonormalize();
        log::info!("Orthonormalized matrix (det {:.6})", repaired.determinant());
        self.apply_matrix(repaired, UpdateReport::new())
    }

    // ---------- Internals ----------

    fn apply_euler(&mut self, angles: EulerAngles, mut report: UpdateReport) -> UpdateReport {
        self.settings.euler_order = angles.order;
        self.canonical = angles.to_quaternion().normalize();
        self.last_edit = LastEdit::Euler(angles);
        if self.euler_extraction().gimbal_locked {
            report.push(Warning::GimbalLock { order: angles.order });
        }
        self.finish(report)
    }

    fn apply_matrix(&mut self, matrix: RotationMatrix, mut report: UpdateReport) -> UpdateReport {
        if !matrix.is_proper_rotation(self.settings.determinant_tolerance) {
            report.push(Warning::NonOrthonormalMatrix { determinant: matrix.determinant() });
        }
        self.canonical = matrix.to_quaternion();
        self.last_edit = LastEdit::Matrix(matrix);
        self.finish(report)
    }

    fn apply_quaternion(&mut self, q: Quaternion, mut report: UpdateReport) -> UpdateReport {
        if q.is_degenerate() {
            report.push(Warning::NearZeroQuaternion { magnitude: q.magnitude() });
        }
        self.canonical = q.normalize();
        self.last_edit = LastEdit::Quaternion;
        self.finish(report)
    }

    fn apply_axis_angle(
        &mut self,
        axis: Vec3,
        angle_degrees: f64,
        mut report: UpdateReport,
    ) -> UpdateReport {
        let aa = AxisAngle::try_new(axis, angle_degrees.to_radians()).unwrap_or_else(|| {
            report.push(Warning::DegenerateVector);
            AxisAngle::new(Vec3::DEFAULT_AXIS, angle_degrees.to_radians())
        });
        self.canonical = aa.to_quaternion().normalize();
        self.last_edit = LastEdit::AxisAngle(aa);
        self.finish(report)
    }

    fn finish(&mut self, report: UpdateReport) -> UpdateReport {
        self.last_report = report.clone();
        report
    }
}

/// Field names for the nine matrix cells in row-major order
pub const MATRIX_FIELDS: [&str; 9] = [
    "m11", "m12", "m13", "m21", "m22", "m23", "m31", "m32", "m33",
];

/// Identity value of row-major cell `i`
fn identity_element(i: usize) -> f64 {
    if i % 4 == 0 { 1.0 } else { 0.0 }
}
