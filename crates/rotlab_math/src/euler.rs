//! Euler angles and axis orders
//!
//! The three angles are always stored per axis: `roll` about X, `pitch` about Y,
//! `yaw` about Z, in degrees. The [`AxisOrder`] only decides the sequence in which
//! the elemental rotations are multiplied. For order `A-B-C` the composed matrix is
//! `M_A(angle_A) * M_B(angle_B) * M_C(angle_C)` (intrinsic composition), so
//! swapping the order with the same three angles gives a different orientation.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::{Quaternion, RotationMatrix};

/// A principal axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One of the six Tait-Bryan axis orders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl AxisOrder {
    /// All six orders
    pub const ALL: [AxisOrder; 6] = [
        AxisOrder::XYZ,
        AxisOrder::XZY,
        AxisOrder::YXZ,
        AxisOrder::YZX,
        AxisOrder::ZXY,
        AxisOrder::ZYX,
    ];

    /// The axes in multiplication order (leftmost factor first)
    pub fn axes(self) -> [Axis; 3] {
        match self {
            AxisOrder::XYZ => [Axis::X, Axis::Y, Axis::Z],
            AxisOrder::XZY => [Axis::X, Axis::Z, Axis::Y],
            AxisOrder::YXZ => [Axis::Y, Axis::X, Axis::Z],
            AxisOrder::YZX => [Axis::Y, Axis::Z, Axis::X],
            AxisOrder::ZXY => [Axis::Z, Axis::X, Axis::Y],
            AxisOrder::ZYX => [Axis::Z, Axis::Y, Axis::X],
        }
    }

    /// The middle axis, whose ±90° rotation causes gimbal lock
    pub fn middle_axis(self) -> Axis {
        self.axes()[1]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AxisOrder::XYZ => "XYZ",
            AxisOrder::XZY => "XZY",
            AxisOrder::YXZ => "YXZ",
            AxisOrder::YZX => "YZX",
            AxisOrder::ZXY => "ZXY",
            AxisOrder::ZYX => "ZYX",
        }
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`AxisOrder`] from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAxisOrderError(pub String);

impl fmt::Display for ParseAxisOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown axis order '{}' (expected one of XYZ, XZY, YXZ, YZX, ZXY, ZYX)", self.0)
    }
}

impl std::error::Error for ParseAxisOrderError {}

impl FromStr for AxisOrder {
    type Err = ParseAxisOrderError;

    /// Case-insensitive, dashes allowed ("x-y-z")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        AxisOrder::ALL
            .iter()
            .copied()
            .find(|order| order.as_str() == cleaned)
            .ok_or_else(|| ParseAxisOrderError(s.to_string()))
    }
}

/// Euler angles in degrees plus the order they are composed in
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about X in degrees
    pub roll: f64,
    /// Rotation about Y in degrees
    pub pitch: f64,
    /// Rotation about Z in degrees
    pub yaw: f64,
    /// Composition order
    #[serde(default)]
    pub order: AxisOrder,
}

impl Default for EulerAngles {
    fn default() -> Self {
        Self::zero(AxisOrder::XYZ)
    }
}

/// Result of decomposing a matrix into Euler angles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerExtraction {
    pub angles: EulerAngles,
    /// The middle angle was ±90°; the first and third angles were coupled and
    /// the third one was fixed to 0. The angles are rotation-equivalent to the
    /// input, not necessarily the ones it was built from.
    pub gimbal_locked: bool,
}

impl EulerAngles {
    pub const fn new(roll: f64, pitch: f64, yaw: f64, order: AxisOrder) -> Self {
        Self { roll, pitch, yaw, order }
    }

    pub const fn zero(order: AxisOrder) -> Self {
        Self::new(0.0, 0.0, 0.0, order)
    }

    /// Same angles, different composition order
    pub fn with_order(self, order: AxisOrder) -> Self {
        Self { order, ..self }
    }

    /// Angle in degrees for a given axis
    pub fn angle_for(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.roll,
            Axis::Y => self.pitch,
            Axis::Z => self.yaw,
        }
    }

    /// `[roll, pitch, yaw]` in degrees
    pub fn to_array(&self) -> [f64; 3] {
        [self.roll, self.pitch, self.yaw]
    }

    pub fn to_matrix(&self) -> RotationMatrix {
        RotationMatrix::from_euler(self)
    }

    pub fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_euler(self)
    }

    /// Decompose a matrix using `order`
    pub fn from_matrix(m: &RotationMatrix, order: AxisOrder) -> EulerExtraction {
        m.to_euler(order)
    }

    /// Angles wrapped into (-180, 180] for display
    ///
    /// The rotation is unchanged; only the representative angles move.
    pub fn wrapped(&self) -> Self {
        Self {
            roll: wrap_degrees(self.roll),
            pitch: wrap_degrees(self.pitch),
            yaw: wrap_degrees(self.yaw),
            order: self.order,
        }
    }

    /// True when both hold the same order and all angles are within `eps` degrees
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.order == other.order
            && (self.roll - other.roll).abs() < eps
            && (self.pitch - other.pitch).abs() < eps
            && (self.yaw - other.yaw).abs() < eps
    }
}

/// Wrap an angle in degrees into (-180, 180]
pub fn wrap_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_per_order() {
        assert_eq!(AxisOrder::XYZ.axes(), [Axis::X, Axis::Y, Axis::Z]);
        assert_eq!(AxisOrder::ZYX.axes(), [Axis::Z, Axis::Y, Axis::X]);
        assert_eq!(AxisOrder::YZX.middle_axis(), Axis::Z);
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("xyz".parse::<AxisOrder>(), Ok(AxisOrder::XYZ));
        assert_eq!("Z-Y-X".parse::<AxisOrder>(), Ok(AxisOrder::ZYX));
        assert!("XYX".parse::<AxisOrder>().is_err());
        assert!("".parse::<AxisOrder>().is_err());
    }

    #[test]
    fn test_order_display_round_trip() {
        for order in AxisOrder::ALL {
            assert_eq!(order.to_string().parse::<AxisOrder>(), Ok(order));
        }
    }

    #[test]
    fn test_angle_for() {
        let e = EulerAngles::new(10.0, 20.0, 30.0, AxisOrder::ZXY);
        assert_eq!(e.angle_for(Axis::X), 10.0);
        assert_eq!(e.angle_for(Axis::Y), 20.0);
        assert_eq!(e.angle_for(Axis::Z), 30.0);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(wrap_degrees(-450.0), -90.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
        assert_eq!(wrap_degrees(f64::NAN), 0.0);
    }

    #[test]
    fn test_wrapped_keeps_rotation() {
        let e = EulerAngles::new(370.0, -200.0, 90.0, AxisOrder::XYZ);
        let w = e.wrapped();
        assert!(w.approx_eq(&EulerAngles::new(10.0, 160.0, 90.0, AxisOrder::XYZ), 1e-9));
        assert!(e.to_matrix().approx_eq(&w.to_matrix(), 1e-9));
    }

    #[test]
    fn test_with_order() {
        let e = EulerAngles::new(1.0, 2.0, 3.0, AxisOrder::XYZ).with_order(AxisOrder::YXZ);
        assert_eq!(e.order, AxisOrder::YXZ);
        assert_eq!(e.to_array(), [1.0, 2.0, 3.0]);
    }
}
