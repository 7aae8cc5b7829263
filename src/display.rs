//! Text rendering of engine state
//!
//! Every number goes through [`ViewFormatter::num`], so a whole view shares one
//! precision. Euler angles are wrapped into (-180°, 180°] for display only; the
//! engine keeps the angles as entered.

use std::fmt::Write;

use rotlab_core::{
    AxisAngle, EulerExtraction, HomogeneousMatrix, Quaternion, RigidTransform, RotationMatrix,
    UpdateReport, Vec3,
};
use rotlab_math::euler::wrap_degrees;

/// Fixed-precision formatter for rotation views
#[derive(Debug, Clone, Copy)]
pub struct ViewFormatter {
    precision: usize,
}

impl Default for ViewFormatter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ViewFormatter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Format one number, printing negative zero as zero
    pub fn num(&self, value: f64) -> String {
        let s = format!("{:.*}", self.precision, value);
        if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
            s[1..].to_string()
        } else {
            s
        }
    }

    /// Angle in degrees, wrapped into (-180, 180]
    pub fn angle(&self, degrees: f64) -> String {
        self.num(wrap_degrees(degrees))
    }

    pub fn vector(&self, v: Vec3) -> String {
        format!("({}, {}, {})", self.num(v.x), self.num(v.y), self.num(v.z))
    }

    pub fn euler(&self, extraction: &EulerExtraction) -> String {
        let e = &extraction.angles;
        let mut out = format!(
            "Euler {} (deg): roll {}  pitch {}  yaw {}",
            e.order,
            self.angle(e.roll),
            self.angle(e.pitch),
            self.angle(e.yaw)
        );
        if extraction.gimbal_locked {
            out.push_str("  [gimbal lock]");
        }
        out
    }

    /// Rows on separate lines, columns aligned
    pub fn matrix(&self, m: &RotationMatrix) -> String {
        let rows: Vec<Vec<String>> = m
            .rows()
            .iter()
            .map(|row| row.iter().map(|&v| self.num(v)).collect())
            .collect();
        self.grid(&rows)
    }

    pub fn quaternion(&self, q: &Quaternion) -> String {
        format!(
            "Quaternion (w, x, y, z): ({}, {}, {}, {})  |q| = {}",
            self.num(q.w),
            self.num(q.x),
            self.num(q.y),
            self.num(q.z),
            self.num(q.magnitude())
        )
    }

    pub fn axis_angle(&self, aa: &AxisAngle) -> String {
        format!(
            "Axis-angle: axis {}  angle {} deg",
            self.vector(aa.axis),
            self.num(aa.angle_degrees())
        )
    }

    /// The 4x4 grid in row-major order
    pub fn homogeneous(&self, h: &HomogeneousMatrix) -> String {
        let rows: Vec<Vec<String>> = h
            .rows()
            .iter()
            .map(|row| row.iter().map(|&v| self.num(v)).collect())
            .collect();
        self.grid(&rows)
    }

    /// One line per warning, empty for a clean report
    pub fn report(&self, report: &UpdateReport) -> String {
        let mut out = String::new();
        for warning in report.warnings() {
            let tag = if warning.is_informational() { "note" } else { "warning" };
            let _ = writeln!(out, "{}: {}", tag, warning);
        }
        out
    }

    /// Every view of a transform, plus the mapping of `point`
    pub fn transform(&self, transform: &RigidTransform, point: Vec3) -> String {
        let state = &transform.rotation;
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.euler(&state.euler_extraction()));
        let _ = writeln!(out, "Matrix (det = {}):", self.num(state.matrix_determinant()));
        out.push_str(&self.matrix(&state.matrix()));
        let _ = writeln!(out, "{}", self.quaternion(&state.quaternion()));
        let _ = writeln!(out, "{}", self.axis_angle(&state.axis_angle()));
        let _ = writeln!(out, "Translation: {}", self.vector(transform.translation));
        let _ = writeln!(out, "Homogeneous matrix:");
        out.push_str(&self.homogeneous(&transform.homogeneous_matrix()));
        let _ = writeln!(
            out,
            "Point: body {} -> world {}",
            self.vector(point),
            self.vector(transform.apply_to_point(point))
        );
        out
    }

    /// One numbered line per extra tracked point, empty when there are none
    pub fn tracked_points(&self, transform: &RigidTransform, points: &[Vec3]) -> String {
        let mut out = String::new();
        for (i, &p) in points.iter().enumerate() {
            let _ = writeln!(
                out,
                "Point {}: body {} -> world {}",
                i + 1,
                self.vector(p),
                self.vector(transform.apply_to_point(p))
            );
        }
        out
    }

    fn grid(&self, rows: &[Vec<String>]) -> String {
        let width = rows.iter().flatten().map(String::len).max().unwrap_or(0);
        let mut out = String::new();
        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .map(|c| format!("{:>width$}", c, width = width))
                .collect();
            let _ = writeln!(out, "  [ {} ]", cells.join("  "));
        }
        out
    }
}
