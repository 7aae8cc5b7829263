//! Engine diagnostics
//!
//! Nothing the engine does on user input is fatal. Every questionable input is
//! replaced by a documented default and reported as a [`Warning`], collected in
//! the [`UpdateReport`] returned by each mutation.

use bitflags::bitflags;
use rotlab_math::AxisOrder;

/// A recoverable condition encountered while applying an edit
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A field was empty, non-numeric or non-finite; `default` was used instead
    InvalidNumericInput { field: String, default: f64 },
    /// A zero-length axis or vector; the default axis (+X) was used instead
    DegenerateVector,
    /// Quaternion magnitude below the validity threshold; the identity was used instead
    NearZeroQuaternion { magnitude: f64 },
    /// Matrix determinant outside tolerance; the matrix is kept until repaired
    NonOrthonormalMatrix { determinant: f64 },
    /// Informational: the Euler decomposition is not unique for this rotation
    GimbalLock { order: AxisOrder },
}

impl Warning {
    /// The diagnostic flag this warning sets
    pub fn flag(&self) -> Diagnostics {
        match self {
            Warning::InvalidNumericInput { .. } => Diagnostics::INVALID_NUMERIC_INPUT,
            Warning::DegenerateVector => Diagnostics::DEGENERATE_VECTOR,
            Warning::NearZeroQuaternion { .. } => Diagnostics::NEAR_ZERO_QUATERNION,
            Warning::NonOrthonormalMatrix { .. } => Diagnostics::NON_ORTHONORMAL_MATRIX,
            Warning::GimbalLock { .. } => Diagnostics::GIMBAL_LOCK,
        }
    }

    /// Informational warnings do not indicate bad input
    pub fn is_informational(&self) -> bool {
        matches!(self, Warning::GimbalLock { .. })
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::InvalidNumericInput { field, default } => {
                write!(f, "Invalid numeric input for '{}', using {}", field, default)
            }
            Warning::DegenerateVector => {
                write!(f, "Zero-length axis, using default axis (1, 0, 0)")
            }
            Warning::NearZeroQuaternion { magnitude } => {
                write!(f, "Quaternion magnitude {:.6} is too small, using identity", magnitude)
            }
            Warning::NonOrthonormalMatrix { determinant } => {
                write!(f, "Matrix determinant is {:.3}, not 1. Consider normalizing.", determinant)
            }
            Warning::GimbalLock { order } => {
                write!(f, "Gimbal lock in {} decomposition: Euler angles are not unique", order)
            }
        }
    }
}

impl std::error::Error for Warning {}

bitflags! {
    /// Summary of which warnings an update produced
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Diagnostics: u8 {
        /// No warnings
        const NONE = 0;
        const INVALID_NUMERIC_INPUT = 1 << 0;
        const DEGENERATE_VECTOR = 1 << 1;
        const NEAR_ZERO_QUATERNION = 1 << 2;
        const NON_ORTHONORMAL_MATRIX = 1 << 3;
        const GIMBAL_LOCK = 1 << 4;
    }
}

/// Warnings produced by one engine mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    warnings: Vec<Warning>,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it
    pub fn push(&mut self, warning: Warning) {
        match &warning {
            Warning::InvalidNumericInput { .. } | Warning::GimbalLock { .. } => {
                log::debug!("{}", warning)
            }
            _ => log::warn!("{}", warning),
        }
        self.warnings.push(warning);
    }

    /// Append all warnings from another report
    pub fn merge(&mut self, other: UpdateReport) {
        self.warnings.extend(other.warnings);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn flags(&self) -> Diagnostics {
        self.warnings
            .iter()
            .fold(Diagnostics::NONE, |acc, w| acc | w.flag())
    }

    pub fn has(&self, flag: Diagnostics) -> bool {
        self.flags().contains(flag)
    }

    /// True when no warning (informational ones included) was produced
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Determinant reported by a non-orthonormal matrix warning, if any
    pub fn non_orthonormal_determinant(&self) -> Option<f64> {
        self.warnings.iter().find_map(|w| match w {
            Warning::NonOrthonormalMatrix { determinant } => Some(*determinant),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = UpdateReport::new();
        assert!(report.is_clean());
        assert_eq!(report.flags(), Diagnostics::NONE);
        assert!(report.non_orthonormal_determinant().is_none());
    }

    #[test]
    fn test_flags_accumulate() {
        let mut report = UpdateReport::new();
        report.push(Warning::DegenerateVector);
        report.push(Warning::NonOrthonormalMatrix { determinant: 0.8 });
        assert!(report.has(Diagnostics::DEGENERATE_VECTOR));
        assert!(report.has(Diagnostics::NON_ORTHONORMAL_MATRIX));
        assert!(!report.has(Diagnostics::GIMBAL_LOCK));
        assert_eq!(report.non_orthonormal_determinant(), Some(0.8));
    }

    #[test]
    fn test_merge() {
        let mut a = UpdateReport::new();
        a.push(Warning::DegenerateVector);
        let mut b = UpdateReport::new();
        b.push(Warning::GimbalLock { order: AxisOrder::XYZ });
        a.merge(b);
        assert_eq!(a.warnings().len(), 2);
    }

    #[test]
    fn test_display() {
        let w = Warning::NonOrthonormalMatrix { determinant: 0.8 };
        assert!(w.to_string().contains("0.800"));

        let w = Warning::InvalidNumericInput { field: "roll".to_string(), default: 0.0 };
        assert!(w.to_string().contains("roll"));

        let w = Warning::GimbalLock { order: AxisOrder::ZYX };
        assert!(w.to_string().contains("ZYX"));
        assert!(w.is_informational());
    }
}
