//! Line-oriented command driver
//!
//! Each input line is one discrete edit event, the same events a UI would raise
//! from its sliders and fields. Numeric arguments are passed to the engine as raw
//! text so invalid input takes the engine's documented defaults instead of failing
//! here. Only structural problems (unknown command, wrong argument count, unknown
//! order or preset) are [`CommandError`]s.

use std::str::FromStr;

use rotlab_core::{
    AxisOrder, EngineSettings, FieldReader, PresetLibrary, RigidTransform, UpdateReport, Vec3,
};
use rotlab_math::ParseAxisOrderError;

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `euler ROLL PITCH YAW [ORDER]` (degrees)
    Euler { angles: [String; 3], order: Option<AxisOrder> },
    /// `order ORDER`
    Order(AxisOrder),
    /// `matrix M11 M12 M13 M21 M22 M23 M31 M32 M33` (row-major)
    Matrix([String; 9]),
    /// `quat W X Y Z`
    Quaternion([String; 4]),
    /// `axis X Y Z DEGREES`
    AxisAngle { axis: [String; 3], degrees: String },
    /// `translate X Y Z`
    Translate([String; 3]),
    /// `point X Y Z` (body frame)
    Point([String; 3]),
    /// `point add X Y Z`: track one more body point
    AddPoint([String; 3]),
    /// `point clear`: drop the extra tracked points
    ClearPoints,
    Normalize,
    /// Rotation back to identity
    Identity,
    /// Rotation and translation back to identity
    Reset,
    Conjugate,
    Inverse,
    Double,
    Half,
    Orthonormalize,
    Preset(String),
    Show,
}

impl Command {
    /// Parse one line; blank lines and `#` comments give `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let name = name.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match name.as_str() {
            "euler" => {
                if !(3..=4).contains(&args.len()) {
                    return Err(CommandError::arity(&name, "3 or 4", args.len()));
                }
                let order = match args.get(3) {
                    Some(order) => Some(AxisOrder::from_str(order)?),
                    None => None,
                };
                Command::Euler { angles: fields(&args[..3]), order }
            }
            "order" => {
                expect_args(&name, &args, 1)?;
                Command::Order(AxisOrder::from_str(args[0])?)
            }
            "matrix" => {
                expect_args(&name, &args, 9)?;
                Command::Matrix(fields(&args))
            }
            "quat" | "quaternion" => {
                expect_args(&name, &args, 4)?;
                Command::Quaternion(fields(&args))
            }
            "axis" => {
                expect_args(&name, &args, 4)?;
                Command::AxisAngle { axis: fields(&args[..3]), degrees: args[3].to_string() }
            }
            "translate" => {
                expect_args(&name, &args, 3)?;
                Command::Translate(fields(&args))
            }
            "point" => match args.first().map(|a| a.to_ascii_lowercase()).as_deref() {
                Some("add") => {
                    expect_args("point add", &args[1..], 3)?;
                    Command::AddPoint(fields(&args[1..]))
                }
                Some("clear") => {
                    expect_args("point clear", &args[1..], 0)?;
                    Command::ClearPoints
                }
                _ => {
                    expect_args(&name, &args, 3)?;
                    Command::Point(fields(&args))
                }
            },
            "preset" => {
                expect_args(&name, &args, 1)?;
                Command::Preset(args[0].to_string())
            }
            _ => {
                let command = match name.as_str() {
                    "normalize" => Command::Normalize,
                    "identity" => Command::Identity,
                    "reset" => Command::Reset,
                    "conjugate" => Command::Conjugate,
                    "inverse" | "invert" => Command::Inverse,
                    "double" => Command::Double,
                    "half" => Command::Half,
                    "orthonormalize" => Command::Orthonormalize,
                    "show" => Command::Show,
                    _ => return Err(CommandError::Unknown(name.clone())),
                };
                expect_args(&name, &args, 0)?;
                command
            }
        };
        Ok(Some(command))
    }
}

fn expect_args(name: &str, args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CommandError::arity(name, &expected.to_string(), args.len()))
    }
}

fn fields<const N: usize>(args: &[&str]) -> [String; N] {
    std::array::from_fn(|i| args[i].to_string())
}

/// A command line that could not be turned into an edit
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// No command with this name
    Unknown(String),
    /// Wrong number of arguments
    Arity { command: String, expected: String, found: usize },
    /// Unparseable Euler order
    Order(ParseAxisOrderError),
    /// No preset with this name
    UnknownPreset(String),
}

impl CommandError {
    fn arity(command: &str, expected: &str, found: usize) -> Self {
        CommandError::Arity {
            command: command.to_string(),
            expected: expected.to_string(),
            found,
        }
    }
}

impl From<ParseAxisOrderError> for CommandError {
    fn from(e: ParseAxisOrderError) -> Self {
        CommandError::Order(e)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "Unknown command: {}", name),
            CommandError::Arity { command, expected, found } => write!(
                f,
                "'{}' takes {} arguments, got {}",
                command, expected, found
            ),
            CommandError::Order(e) => write!(f, "{}", e),
            CommandError::UnknownPreset(name) => write!(f, "Unknown preset: {}", name),
        }
    }
}

impl std::error::Error for CommandError {}

/// One frame being edited, plus the body points tracked through it
#[derive(Debug, Clone)]
pub struct Session {
    transform: RigidTransform,
    point: Vec3,
    points: Vec<Vec3>,
    presets: PresetLibrary,
}

impl Session {
    pub fn new(settings: EngineSettings, presets: PresetLibrary) -> Self {
        Self {
            transform: RigidTransform::new(settings),
            point: Vec3::X,
            points: Vec::new(),
            presets,
        }
    }

    pub fn transform(&self) -> &RigidTransform {
        &self.transform
    }

    /// The tracked point in the body frame
    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// The tracked point in the world frame
    pub fn world_point(&self) -> Vec3 {
        self.transform.apply_to_point(self.point)
    }

    /// Extra body points added with `point add`
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// World images of [`Session::points`], in the same order
    pub fn world_points(&self) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|&p| self.transform.apply_to_point(p))
            .collect()
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    /// Parse and execute one line; `Ok(None)` for blank lines and comments
    pub fn run_line(&mut self, line: &str) -> Result<Option<UpdateReport>, CommandError> {
        match Command::parse(line)? {
            Some(command) => self.execute(&command).map(Some),
            None => Ok(None),
        }
    }

    pub fn execute(&mut self, command: &Command) -> Result<UpdateReport, CommandError> {
        let report = match command {
            Command::Euler { angles, order } => {
                let rotation = &mut self.transform.rotation;
                let order = order.unwrap_or_else(|| rotation.euler_order());
                rotation.set_euler_fields(&angles[0], &angles[1], &angles[2], order)
            }
            Command::Order(order) => self.transform.rotation.set_euler_order(*order),
            Command::Matrix(cells) => self
                .transform
                .rotation
                .set_matrix_fields(cells.each_ref().map(String::as_str)),
            Command::Quaternion(q) => self
                .transform
                .rotation
                .set_quaternion_fields(q.each_ref().map(String::as_str)),
            Command::AxisAngle { axis, degrees } => self
                .transform
                .rotation
                .set_axis_angle_fields(axis.each_ref().map(String::as_str), degrees),
            Command::Translate(t) => self
                .transform
                .set_translation_fields(t.each_ref().map(String::as_str)),
            Command::Point(p) => {
                let (point, report) = read_point(p);
                self.point = point;
                report
            }
            Command::AddPoint(p) => {
                let (point, report) = read_point(p);
                self.points.push(point);
                report
            }
            Command::ClearPoints => {
                self.points.clear();
                UpdateReport::new()
            }
            Command::Normalize => self.transform.rotation.normalize_quaternion(),
            Command::Identity => self.transform.rotation.reset_identity(),
            Command::Reset => self.transform.reset(),
            Command::Conjugate => self.transform.rotation.conjugate(),
            Command::Inverse => self.transform.rotation.invert(),
            Command::Double => self.transform.rotation.double_angle(),
            Command::Half => self.transform.rotation.half_angle(),
            Command::Orthonormalize => self.transform.rotation.orthonormalize_matrix(),
            Command::Preset(name) => {
                let template = self
                    .presets
                    .get(name)
                    .ok_or_else(|| CommandError::UnknownPreset(name.clone()))?;
                template.apply(&mut self.transform)
            }
            Command::Show => UpdateReport::new(),
        };
        log::debug!("{:?} -> {} warning(s)", command, report.warnings().len());
        Ok(report)
    }
}

fn read_point(fields: &[String; 3]) -> (Vec3, UpdateReport) {
    let mut report = UpdateReport::new();
    let mut reader = FieldReader::new(&mut report);
    let point = Vec3::new(
        reader.text("px", &fields[0], 0.0),
        reader.text("py", &fields[1], 0.0),
        reader.text("pz", &fields[2], 0.0),
    );
    (point, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotlab_core::{Diagnostics, Quaternion};

    const EPSILON: f64 = 1e-9;

    fn session() -> Session {
        Session::new(EngineSettings::default(), PresetLibrary::builtin())
    }

    #[test]
    fn test_parse_blank_and_comments() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   # just a note"), Ok(None));
        assert_eq!(Command::parse("show # trailing"), Ok(Some(Command::Show)));
    }

    #[test]
    fn test_parse_euler() {
        let cmd = Command::parse("euler 0 0 90 zyx").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Euler {
                angles: ["0".to_string(), "0".to_string(), "90".to_string()],
                order: Some(AxisOrder::ZYX),
            }
        );
        assert!(matches!(
            Command::parse("euler 0 0"),
            Err(CommandError::Arity { found: 2, .. })
        ));
        assert!(matches!(Command::parse("euler 0 0 0 XYX"), Err(CommandError::Order(_))));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse("spin"), Err(CommandError::Unknown("spin".to_string())));
        assert_eq!(Command::parse("SPIN 1 2"), Err(CommandError::Unknown("spin".to_string())));
        assert!(matches!(Command::parse("show 1"), Err(CommandError::Arity { .. })));
    }

    #[test]
    fn test_raw_fields_keep_invalid_text() {
        let mut s = session();
        let report = s.run_line("quat 0 x 0 0").unwrap().unwrap();
        assert!(report.has(Diagnostics::INVALID_NUMERIC_INPUT));
        assert!(report.has(Diagnostics::NEAR_ZERO_QUATERNION));
        assert_eq!(s.transform().rotation.quaternion(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_frame_scenario() {
        let mut s = session();
        s.run_line("translate 2 1 0").unwrap();
        s.run_line("point 1 0 0").unwrap();
        assert!(s.world_point().approx_eq(Vec3::new(3.0, 1.0, 0.0), EPSILON));
    }

    #[test]
    fn test_parse_point_subcommands() {
        assert_eq!(
            Command::parse("point add 1 2 3"),
            Ok(Some(Command::AddPoint(["1".to_string(), "2".to_string(), "3".to_string()])))
        );
        assert_eq!(Command::parse("point CLEAR"), Ok(Some(Command::ClearPoints)));
        assert!(matches!(
            Command::parse("point add 1 2"),
            Err(CommandError::Arity { found: 2, .. })
        ));
        assert!(matches!(Command::parse("point clear 1"), Err(CommandError::Arity { .. })));
    }

    #[test]
    fn test_tracked_points_follow_frame() {
        let mut s = session();
        s.run_line("point add 1 0 0").unwrap();
        s.run_line("point add 0 2 0").unwrap();
        s.run_line("translate 2 1 0").unwrap();
        s.run_line("axis 0 0 1 90").unwrap();

        assert_eq!(s.points(), &[Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)]);
        let world = s.world_points();
        assert_eq!(world.len(), 2);
        assert!(world[0].approx_eq(Vec3::new(2.0, 2.0, 0.0), EPSILON));
        assert!(world[1].approx_eq(Vec3::new(0.0, 1.0, 0.0), EPSILON));
        // The primary point is separate from the list
        assert_eq!(s.point(), Vec3::X);

        s.run_line("point clear").unwrap();
        assert!(s.points().is_empty());
        assert!(s.world_points().is_empty());
    }

    #[test]
    fn test_euler_uses_current_order() {
        let mut s = session();
        s.run_line("order ZYX").unwrap();
        s.run_line("euler 10 20 30").unwrap();
        assert_eq!(s.transform().rotation.euler().order, AxisOrder::ZYX);
    }

    #[test]
    fn test_matrix_repair_flow() {
        let mut s = session();
        let report = s.run_line("matrix 0.9 0 0 0 0.9 0 0 0 0.9").unwrap().unwrap();
        assert!(report.has(Diagnostics::NON_ORTHONORMAL_MATRIX));
        let report = s.run_line("orthonormalize").unwrap().unwrap();
        assert!(report.is_clean());
        assert!((s.transform().rotation.matrix_determinant() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_presets() {
        let mut s = session();
        s.run_line("preset robot-pose").unwrap();
        assert!(s.world_point().approx_eq(Vec3::new(3.0, 3.0, 0.0), EPSILON));
        assert_eq!(
            s.run_line("preset nowhere"),
            Err(CommandError::UnknownPreset("nowhere".to_string()))
        );
    }

    #[test]
    fn test_reset_and_identity() {
        let mut s = session();
        s.run_line("preset combined").unwrap();
        s.run_line("identity").unwrap();
        assert_eq!(s.transform().translation, Vec3::new(1.5, 1.0, 0.5));
        s.run_line("reset").unwrap();
        assert_eq!(s.transform().translation, Vec3::ZERO);
    }
}
