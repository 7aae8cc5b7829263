//! Presets and preset libraries
//!
//! A preset is a named [`PoseTemplate`]: an optional translation plus a rotation
//! written in whichever representation is most natural for it. Templates are plain
//! serializable data; applying one to a [`RigidTransform`] goes through the normal
//! engine setters, so presets get the same validation as user input.
//!
//! Libraries of templates are stored as RON files.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use rotlab_math::{AxisOrder, EulerAngles, Quaternion, RotationMatrix, Vec3};
use serde::{Serialize, Deserialize};

use crate::diagnostics::UpdateReport;
use crate::state::RotationState;
use crate::transform::RigidTransform;

/// A rotation in any of the four representations (angles in degrees)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RotationTemplate {
    Identity,
    Euler {
        roll: f64,
        pitch: f64,
        yaw: f64,
        #[serde(default)]
        order: AxisOrder,
    },
    Quaternion { w: f64, x: f64, y: f64, z: f64 },
    AxisAngle { axis: [f64; 3], degrees: f64 },
    /// Row-major
    Matrix { rows: [[f64; 3]; 3] },
}

impl RotationTemplate {
    /// Write this rotation into `state` through the matching setter
    pub fn apply(&self, state: &mut RotationState) -> UpdateReport {
        match *self {
            RotationTemplate::Identity => state.reset_identity(),
            RotationTemplate::Euler { roll, pitch, yaw, order } => {
                state.set_euler(EulerAngles::new(roll, pitch, yaw, order))
            }
            RotationTemplate::Quaternion { w, x, y, z } => {
                state.set_quaternion(Quaternion::new(w, x, y, z))
            }
            RotationTemplate::AxisAngle { axis, degrees } => {
                state.set_axis_angle(Vec3::from_array(axis), degrees)
            }
            RotationTemplate::Matrix { rows } => state.set_matrix(RotationMatrix::from_rows(rows)),
        }
    }
}

/// A named pose
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseTemplate {
    pub name: String,
    /// Translation to set; `None` leaves the current translation alone
    #[serde(default)]
    pub translation: Option<[f64; 3]>,
    pub rotation: RotationTemplate,
}

impl PoseTemplate {
    pub fn new(name: impl Into<String>, rotation: RotationTemplate) -> Self {
        Self {
            name: name.into(),
            translation: None,
            rotation,
        }
    }

    pub fn with_translation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.translation = Some([x, y, z]);
        self
    }

    /// Apply to a transform, returning the combined report
    pub fn apply(&self, transform: &mut RigidTransform) -> UpdateReport {
        let mut report = UpdateReport::new();
        if let Some(t) = self.translation {
            report.merge(transform.set_translation(Vec3::from_array(t)));
        }
        report.merge(self.rotation.apply(&mut transform.rotation));
        log::info!("Applied preset '{}'", self.name);
        report
    }
}

/// Built-in rotation-only presets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuaternionPreset {
    Identity,
    Rot90X,
    Rot90Y,
    Rot90Z,
    Rot180X,
    /// 60° about (1, 1, 1)
    Arbitrary,
}

impl QuaternionPreset {
    pub const ALL: [QuaternionPreset; 6] = [
        QuaternionPreset::Identity,
        QuaternionPreset::Rot90X,
        QuaternionPreset::Rot90Y,
        QuaternionPreset::Rot90Z,
        QuaternionPreset::Rot180X,
        QuaternionPreset::Arbitrary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QuaternionPreset::Identity => "identity",
            QuaternionPreset::Rot90X => "90x",
            QuaternionPreset::Rot90Y => "90y",
            QuaternionPreset::Rot90Z => "90z",
            QuaternionPreset::Rot180X => "180x",
            QuaternionPreset::Arbitrary => "arbitrary",
        }
    }

    pub fn quaternion(self) -> Quaternion {
        let deg = |d: f64| d.to_radians();
        match self {
            QuaternionPreset::Identity => Quaternion::IDENTITY,
            QuaternionPreset::Rot90X => Quaternion::from_axis_angle(Vec3::X, deg(90.0)),
            QuaternionPreset::Rot90Y => Quaternion::from_axis_angle(Vec3::Y, deg(90.0)),
            QuaternionPreset::Rot90Z => Quaternion::from_axis_angle(Vec3::Z, deg(90.0)),
            QuaternionPreset::Rot180X => Quaternion::from_axis_angle(Vec3::X, deg(180.0)),
            QuaternionPreset::Arbitrary => {
                Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), deg(60.0))
            }
        }
    }

    pub fn template(self) -> PoseTemplate {
        let q = self.quaternion();
        let rotation = match self {
            QuaternionPreset::Identity => RotationTemplate::Identity,
            _ => RotationTemplate::Quaternion { w: q.w, x: q.x, y: q.y, z: q.z },
        };
        PoseTemplate::new(self.name(), rotation)
    }
}

impl FromStr for QuaternionPreset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| UnknownPresetError(s.to_string()))
    }
}

/// Built-in frame presets (translation + XYZ Euler angles)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePreset {
    Identity,
    Translation,
    Rotation,
    Combined,
    RobotPose,
}

impl FramePreset {
    pub const ALL: [FramePreset; 5] = [
        FramePreset::Identity,
        FramePreset::Translation,
        FramePreset::Rotation,
        FramePreset::Combined,
        FramePreset::RobotPose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FramePreset::Identity => "identity",
            FramePreset::Translation => "translation",
            FramePreset::Rotation => "rotation",
            FramePreset::Combined => "combined",
            FramePreset::RobotPose => "robot-pose",
        }
    }

    pub fn translation(self) -> Vec3 {
        match self {
            FramePreset::Identity | FramePreset::Rotation => Vec3::ZERO,
            FramePreset::Translation => Vec3::new(2.0, 1.0, 0.0),
            FramePreset::Combined => Vec3::new(1.5, 1.0, 0.5),
            FramePreset::RobotPose => Vec3::new(3.0, 2.0, 0.0),
        }
    }

    /// Roll, pitch, yaw in degrees (XYZ order)
    pub fn euler(self) -> EulerAngles {
        let (r, p, y) = match self {
            FramePreset::Identity | FramePreset::Translation => (0.0, 0.0, 0.0),
            FramePreset::Rotation => (30.0, 45.0, 60.0),
            FramePreset::Combined => (15.0, 30.0, 45.0),
            FramePreset::RobotPose => (0.0, 0.0, 90.0),
        };
        EulerAngles::new(r, p, y, AxisOrder::XYZ)
    }

    pub fn template(self) -> PoseTemplate {
        let t = self.translation();
        let e = self.euler();
        PoseTemplate::new(
            self.name(),
            RotationTemplate::Euler { roll: e.roll, pitch: e.pitch, yaw: e.yaw, order: e.order },
        )
        .with_translation(t.x, t.y, t.z)
    }
}

impl FromStr for FramePreset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| UnknownPresetError(s.to_string()))
    }
}

/// No preset with the given name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPresetError(pub String);

impl std::fmt::Display for UnknownPresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown preset: {}", self.0)
    }
}

impl std::error::Error for UnknownPresetError {}

/// A named collection of pose templates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetLibrary {
    pub name: String,
    #[serde(default)]
    pub presets: Vec<PoseTemplate>,
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetLibrary {
    /// Create an empty library
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presets: Vec::new(),
        }
    }

    /// Frame presets followed by the quaternion presets
    ///
    /// Both families define `identity`; it appears once.
    pub fn builtin() -> Self {
        let mut library = Self::new("builtin");
        for preset in FramePreset::ALL {
            library.add(preset.template());
        }
        for preset in QuaternionPreset::ALL {
            if library.get(preset.name()).is_none() {
                library.add(preset.template());
            }
        }
        library
    }

    /// Load a library from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PresetLoadError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let library: Self = ron::from_str(&contents)?;
        log::info!(
            "Loaded preset library '{}' ({} presets) from {}",
            library.name,
            library.presets.len(),
            path.as_ref().display()
        );
        Ok(library)
    }

    /// Save the library to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PresetSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add a template, replacing any existing one with the same name
    pub fn add(&mut self, template: PoseTemplate) {
        match self.presets.iter_mut().find(|p| p.name.eq_ignore_ascii_case(&template.name)) {
            Some(existing) => *existing = template,
            None => self.presets.push(template),
        }
    }

    /// Look up a template by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PoseTemplate> {
        let name = name.trim();
        self.presets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Add every template of `other`, overriding same-named ones
    pub fn extend(&mut self, other: PresetLibrary) {
        for template in other.presets {
            self.add(template);
        }
    }
}

/// Error loading a preset library
#[derive(Debug)]
pub enum PresetLoadError {
    /// IO error reading the file
    Io(io::Error),
    /// RON parsing error
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for PresetLoadError {
    fn from(e: io::Error) -> Self {
        PresetLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for PresetLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        PresetLoadError::Parse(e)
    }
}

impl std::fmt::Display for PresetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetLoadError::Io(e) => write!(f, "IO error: {}", e),
            PresetLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for PresetLoadError {}

/// Error saving a preset library
#[derive(Debug)]
pub enum PresetSaveError {
    /// IO error writing the file
    Io(io::Error),
    /// RON serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for PresetSaveError {
    fn from(e: io::Error) -> Self {
        PresetSaveError::Io(e)
    }
}

impl From<ron::Error> for PresetSaveError {
    fn from(e: ron::Error) -> Self {
        PresetSaveError::Serialize(e)
    }
}

impl std::fmt::Display for PresetSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetSaveError::Io(e) => write!(f, "IO error: {}", e),
            PresetSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for PresetSaveError {}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_quaternion_preset_values() {
        let q = QuaternionPreset::Rot90X.quaternion();
        assert!(q.approx_eq(&Quaternion::new(0.7071068, 0.7071068, 0.0, 0.0), EPSILON));

        let q = QuaternionPreset::Rot180X.quaternion();
        assert!(approx_eq(q.w, 0.0));
        assert!(approx_eq(q.x, 1.0));

        let q = QuaternionPreset::Arbitrary.quaternion();
        let s = 0.5 / 3f64.sqrt();
        assert!(q.approx_eq(&Quaternion::new(30f64.to_radians().cos(), s, s, s), EPSILON));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("90Z".parse::<QuaternionPreset>(), Ok(QuaternionPreset::Rot90Z));
        assert_eq!("robot_pose".parse::<FramePreset>(), Ok(FramePreset::RobotPose));
        assert!("spin".parse::<FramePreset>().is_err());
    }

    #[test]
    fn test_builtin_library() {
        let library = PresetLibrary::builtin();
        assert_eq!(library.len(), 10);
        assert_eq!(library.names().filter(|n| *n == "identity").count(), 1);
        assert!(library.get("ROBOT-POSE").is_some());
        assert!(library.get("arbitrary").is_some());
        assert!(library.get("nope").is_none());
    }

    #[test]
    fn test_apply_frame_preset() {
        let mut t = RigidTransform::default();
        let report = FramePreset::RobotPose.template().apply(&mut t);
        assert!(report.is_clean());
        assert_eq!(t.translation, Vec3::new(3.0, 2.0, 0.0));
        let p = t.apply_to_point(Vec3::X);
        assert!(p.approx_eq(Vec3::new(3.0, 3.0, 0.0), EPSILON));
    }

    #[test]
    fn test_quaternion_preset_keeps_translation() {
        let mut t = RigidTransform::default();
        t.set_translation(Vec3::new(1.0, 2.0, 3.0));
        QuaternionPreset::Rot90Y.template().apply(&mut t);
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(t
            .rotation
            .quaternion()
            .same_rotation(&QuaternionPreset::Rot90Y.quaternion(), EPSILON));
    }

    #[test]
    fn test_rotation_templates_agree() {
        let q = Quaternion::from_axis_angle(Vec3::Z, 90f64.to_radians());
        let templates = [
            RotationTemplate::Euler { roll: 0.0, pitch: 0.0, yaw: 90.0, order: AxisOrder::XYZ },
            RotationTemplate::Quaternion { w: q.w, x: q.x, y: q.y, z: q.z },
            RotationTemplate::AxisAngle { axis: [0.0, 0.0, 2.0], degrees: 90.0 },
            RotationTemplate::Matrix { rows: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]] },
        ];
        for template in &templates {
            let mut state = RotationState::default();
            template.apply(&mut state);
            assert!(state.quaternion().same_rotation(&q, EPSILON), "{:?}", template);
        }
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let mut library = PresetLibrary::new("custom");
        library.add(
            PoseTemplate::new(
                "tilted",
                RotationTemplate::AxisAngle { axis: [1.0, 0.0, 1.0], degrees: 30.0 },
            )
            .with_translation(0.0, 0.0, 1.0),
        );

        let path = std::env::temp_dir().join("rotlab_presets_test.ron");
        library.save(&path).unwrap();
        let loaded = PresetLibrary::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, library);
    }

    #[test]
    fn test_parse_handwritten_ron() {
        let ron_str = r#"
            PresetLibrary(
                name: "hand",
                presets: [
                    PoseTemplate(
                        name: "yaw",
                        rotation: Euler(roll: 0.0, pitch: 0.0, yaw: 45.0),
                    ),
                ],
            )
        "#;
        let library: PresetLibrary = ron::from_str(ron_str).unwrap();
        let yaw = library.get("yaw").unwrap();
        assert_eq!(yaw.translation, None);
        assert_eq!(
            yaw.rotation,
            RotationTemplate::Euler { roll: 0.0, pitch: 0.0, yaw: 45.0, order: AxisOrder::XYZ }
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = PresetLibrary::load("/nonexistent/rotlab/presets.ron").unwrap_err();
        assert!(matches!(err, PresetLoadError::Io(_)));
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut library = PresetLibrary::builtin();
        let before = library.len();
        library.add(PoseTemplate::new("90X", RotationTemplate::Identity));
        assert_eq!(library.len(), before);
        assert_eq!(library.get("90x").unwrap().rotation, RotationTemplate::Identity);
    }
}
