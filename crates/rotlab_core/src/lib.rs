//! Rotation engine for rotlab
//!
//! This crate turns raw user edits into a consistent rotation state:
//!
//! - [`RotationState`] - One canonical rotation, viewable in all four representations
//! - [`RigidTransform`] - Rotation plus translation, with point mapping
//! - [`HomogeneousMatrix`] - 4x4 matrix of a rigid transform (row-major)
//! - [`UpdateReport`] - Warnings produced by an edit, summarised as [`Diagnostics`]
//! - [`PresetLibrary`] - Named poses, loadable from RON files
//!
//! No edit is ever rejected. Invalid fields, degenerate axes and near-zero
//! quaternions are replaced by documented defaults and reported as [`Warning`]s.

mod diagnostics;
mod input;
mod state;
mod transform;
mod presets;

pub use diagnostics::{Diagnostics, UpdateReport, Warning};
pub use input::{parse_number, sanitize, FieldReader, ParsedNumber};
pub use state::{EngineSettings, LastEdit, RotationState, MATRIX_FIELDS};
pub use transform::{HomogeneousMatrix, RigidTransform};
pub use presets::{
    FramePreset, PoseTemplate, PresetLibrary, PresetLoadError, PresetSaveError,
    QuaternionPreset, RotationTemplate, UnknownPresetError,
};

// Re-export the math types for convenient access through rotlab_core
pub use rotlab_math::{Axis, AxisAngle, AxisOrder, EulerAngles, EulerExtraction, Quaternion};
pub use rotlab_math::{RotationMatrix, Vec3};
