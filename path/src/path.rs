//! Path commands, paths, shapes and the division walker.

use thiserror::Error;

use scrawl_math::{vec2, Vector2};

use crate::attribute::Attributes;

/// Division endpoints within this distance of the subpath start are welded
/// onto it, so turtle programs that return home with floating point drift
/// still close cleanly.
const WELD_EPSILON: f32 = 1e-4;

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A span command (`line_to`/`arc_to`/`curve_to`) was appended to an
    /// empty path. This is a construction bug in the caller and is never
    /// recovered internally.
    #[error("missing previous command")]
    MissingPreviousCommand,
}

/// One drawing command. Every variant carries its destination and the
/// attribute values that apply at that destination; attributes are
/// interpolated from the previous command across the generated span.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathCommand {
    MoveTo {
        to: Vector2,
        attributes: Attributes,
    },
    LineTo {
        to: Vector2,
        attributes: Attributes,
    },
    /// Circular arc to `to`. A positive radius places the arc's center on
    /// the left of the travel direction (counterclockwise sweep), negative
    /// on the right. The included angle saturates at a semicircle when the
    /// radius is smaller than half the chord.
    ArcTo {
        to: Vector2,
        radius: f32,
        attributes: Attributes,
    },
    /// Cubic Bezier to `to`; the previous endpoint and `to` are the end
    /// anchors, `ctrl1`/`ctrl2` the two internal control points.
    CurveTo {
        to: Vector2,
        ctrl1: Vector2,
        ctrl2: Vector2,
        attributes: Attributes,
    },
}

impl PathCommand {
    #[inline]
    pub fn to(&self) -> Vector2 {
        match self {
            PathCommand::MoveTo { to, .. }
            | PathCommand::LineTo { to, .. }
            | PathCommand::ArcTo { to, .. }
            | PathCommand::CurveTo { to, .. } => *to,
        }
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        match self {
            PathCommand::MoveTo { attributes, .. }
            | PathCommand::LineTo { attributes, .. }
            | PathCommand::ArcTo { attributes, .. }
            | PathCommand::CurveTo { attributes, .. } => attributes,
        }
    }

    pub fn is_move_to(&self) -> bool {
        matches!(self, PathCommand::MoveTo { .. })
    }

    /// Number of divisions the span from `prev` contributes at the given
    /// tessellation density. Move commands contribute none.
    pub fn division_count(&self, prev: Vector2, density: f32) -> usize {
        match self {
            PathCommand::MoveTo { .. } => 0,
            PathCommand::LineTo { .. } => 1,
            PathCommand::ArcTo { to, radius, .. } => {
                let arc_length = match arc_geometry(prev, *to, *radius) {
                    Some(arc) => arc.arc_length(),
                    None => 0.0,
                };
                ((arc_length * density).ceil() as usize).max(1)
            }
            PathCommand::CurveTo {
                to, ctrl1, ctrl2, ..
            } => {
                let bound = cubic_length_bound(prev, *ctrl1, *ctrl2, *to);
                ((bound * density).ceil() as usize).max(1)
            }
        }
    }
}

/// An ordered command sequence forming one polyline or closed loop.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path {
    commands: Vec<PathCommand>,
    /// Closed paths treat their last and first commands as adjacent for
    /// join computation and index wraparound.
    pub closed: bool,
    pub z_order: i32,
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The path's first point. A path whose first command is not a move is
    /// treated as if a `MoveTo` to that command's destination had been
    /// synthesized.
    pub fn start_point(&self) -> Option<Vector2> {
        self.commands.first().map(|c| c.to())
    }

    pub fn move_to(&mut self, to: Vector2, attributes: Attributes) {
        self.commands.push(PathCommand::MoveTo { to, attributes });
    }

    pub fn line_to(&mut self, to: Vector2, attributes: Attributes) -> Result<(), PathError> {
        self.check_previous()?;
        self.commands.push(PathCommand::LineTo { to, attributes });
        Ok(())
    }

    pub fn arc_to(
        &mut self,
        to: Vector2,
        radius: f32,
        attributes: Attributes,
    ) -> Result<(), PathError> {
        self.check_previous()?;
        self.commands.push(PathCommand::ArcTo {
            to,
            radius,
            attributes,
        });
        Ok(())
    }

    pub fn curve_to(
        &mut self,
        to: Vector2,
        ctrl1: Vector2,
        ctrl2: Vector2,
        attributes: Attributes,
    ) -> Result<(), PathError> {
        self.check_previous()?;
        self.commands.push(PathCommand::CurveTo {
            to,
            ctrl1,
            ctrl2,
            attributes,
        });
        Ok(())
    }

    fn check_previous(&self) -> Result<(), PathError> {
        if self.commands.is_empty() {
            return Err(PathError::MissingPreviousCommand);
        }
        Ok(())
    }

    /// Builder-internal append; the turtle builder upholds the move-first
    /// invariant by construction.
    pub(crate) fn push(&mut self, command: PathCommand) {
        debug_assert!(!self.commands.is_empty() || command.is_move_to());
        self.commands.push(command);
    }

    /// Iterates over the runs of commands separated by interior move
    /// commands. Each run is tessellated as an independent polyline; the
    /// path's `closed` flag applies to every run.
    pub fn subpaths(&self) -> Subpaths {
        Subpaths {
            path: self,
            start: 0,
        }
    }
}

/// A fillable region: a closed exterior boundary with optional holes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Shape {
    pub exterior: Path,
    pub holes: Vec<Path>,
}

impl Shape {
    /// Wraps a path as a shape boundary; the exterior is always closed.
    pub fn new(mut exterior: Path) -> Shape {
        exterior.closed = true;
        Shape {
            exterior,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(exterior: Path, holes: Vec<Path>) -> Shape {
        let mut shape = Shape::new(exterior);
        shape.holes = holes
            .into_iter()
            .map(|mut hole| {
                hole.closed = true;
                hole
            })
            .collect();
        shape
    }

    pub fn z_order(&self) -> i32 {
        self.exterior.z_order
    }
}

/// Iterator over a path's command runs.
pub struct Subpaths<'l> {
    path: &'l Path,
    start: usize,
}

impl<'l> Iterator for Subpaths<'l> {
    type Item = Subpath<'l>;

    fn next(&mut self) -> Option<Subpath<'l>> {
        let commands = self.path.commands();
        if self.start >= commands.len() {
            return None;
        }
        let first = self.start;
        let mut end = first + 1;
        while end < commands.len() && !commands[end].is_move_to() {
            end += 1;
        }
        self.start = end;
        Some(Subpath {
            commands: &commands[first..end],
            first_index: first,
            closed: self.path.closed,
        })
    }
}

/// One run of commands with no interior move: an anchor command followed by
/// span commands. This is the unit both tessellation passes and the
/// collision builder walk.
#[derive(Copy, Clone)]
pub struct Subpath<'l> {
    commands: &'l [PathCommand],
    pub first_index: usize,
    pub closed: bool,
}

impl<'l> Subpath<'l> {
    #[inline]
    pub fn commands(&self) -> &'l [PathCommand] {
        self.commands
    }

    #[inline]
    pub fn start(&self) -> Vector2 {
        self.commands[0].to()
    }

    #[inline]
    pub fn start_attributes(&self) -> &'l Attributes {
        self.commands[0].attributes()
    }

    /// Whether the last command already lands on the start point (within
    /// the weld tolerance). When a closed run does not, the walker emits an
    /// implicit closing span.
    pub fn ends_at_start(&self) -> bool {
        match self.commands.last() {
            Some(last) => last.to().distance(self.start()) <= WELD_EPSILON,
            None => true,
        }
    }

    /// Exact number of spans the walker will emit, including the implicit
    /// closing span of an unterminated loop. The stats pass sizes buffers
    /// from this.
    pub fn span_count(&self, density: f32) -> usize {
        let mut prev = self.start();
        let mut count = 0;
        for command in &self.commands[1..] {
            count += command.division_count(prev, density);
            prev = command.to();
        }
        if self.closed && count > 0 && !self.ends_at_start() {
            count += 1;
        }
        count
    }

    /// Walks every division endpoint in order, passing its position, the
    /// attribute sets on both sides of the span, and the arc-length
    /// fraction within the generating command. On a closed run the final
    /// endpoint is always the (welded) start point.
    pub fn for_each_division<F>(&self, density: f32, mut callback: F)
    where
        F: FnMut(Vector2, &'l Attributes, &'l Attributes, f32),
    {
        let start = self.start();
        let mut prev_point = start;
        let mut prev_attrs = self.start_attributes();
        let last = self.commands.len() - 1;
        for (i, command) in self.commands.iter().enumerate().skip(1) {
            let divisions = command.division_count(prev_point, density);
            let attrs = command.attributes();
            let is_final_span = self.closed && i == last && self.ends_at_start();
            for k in 1..=divisions {
                let t = k as f32 / divisions as f32;
                let mut position = if k == divisions {
                    command.to()
                } else {
                    sample_command(prev_point, command, t)
                };
                if is_final_span && k == divisions {
                    position = start;
                }
                callback(position, prev_attrs, attrs, t);
            }
            prev_point = command.to();
            prev_attrs = attrs;
        }
        if self.closed && self.commands.len() > 1 && !self.ends_at_start() {
            callback(start, prev_attrs, self.start_attributes(), 1.0);
        }
    }
}

fn sample_command(prev: Vector2, command: &PathCommand, t: f32) -> Vector2 {
    match command {
        PathCommand::MoveTo { to, .. } => *to,
        PathCommand::LineTo { to, .. } => prev.lerp(*to, t),
        PathCommand::ArcTo { to, radius, .. } => match arc_geometry(prev, *to, *radius) {
            Some(arc) => arc.sample(t),
            None => *to,
        },
        PathCommand::CurveTo {
            to, ctrl1, ctrl2, ..
        } => cubic_sample(prev, *ctrl1, *ctrl2, *to, t),
    }
}

pub(crate) struct ArcGeometry {
    pub center: Vector2,
    pub start_angle: f32,
    pub sweep: f32,
    /// Effective radius: at least half the chord, so the circle always
    /// passes through both endpoints.
    pub radius: f32,
}

impl ArcGeometry {
    fn sample(&self, t: f32) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        self.center + vec2(angle.cos(), angle.sin()) * self.radius
    }

    pub fn arc_length(&self) -> f32 {
        self.sweep.abs() * self.radius
    }
}

/// Center, start angle and sweep of the arc from `from` to `to` with the
/// given signed radius. `None` when the chord is degenerate (zero length).
///
/// The included angle is `2 * asin(clamp(half_chord / |radius|, 0, 1))`:
/// a radius smaller than the half chord saturates at a semicircle, and the
/// semicircle's radius grows to half the chord so the arc still lands on
/// its endpoints.
pub(crate) fn arc_geometry(from: Vector2, to: Vector2, radius: f32) -> Option<ArcGeometry> {
    let chord = to - from;
    let half = chord.length() * 0.5;
    if half == 0.0 || radius == 0.0 {
        return None;
    }
    let side = radius.signum();
    let half_angle = (half / radius.abs()).min(1.0).asin();
    let sweep = 2.0 * half_angle * side;
    let effective = radius.abs().max(half);
    let apothem = (effective * effective - half * half).max(0.0).sqrt();
    let mid = (from + to) * 0.5;
    let center = mid + chord.normalize().perp() * (apothem * side);
    let offset = from - center;
    let start_angle = offset.y.atan2(offset.x);
    Some(ArcGeometry {
        center,
        start_angle,
        sweep,
        radius: effective,
    })
}

/// Closed-form upper bound on the arc length of a cubic Bezier, from the
/// derivative's polynomial coefficients. Exact for straight control
/// polygons, conservative otherwise; never requires numerical integration.
pub(crate) fn cubic_length_bound(p0: Vector2, c1: Vector2, c2: Vector2, p1: Vector2) -> f32 {
    let u = c1 - p0;
    let v = c2 - c1;
    let w = p1 - c2;
    // B'(t) = a*t^2 + b*t + c, so the length integrates below
    // |a|/3 + |b|/2 + |c|.
    let a = (u - v * 2.0 + w) * 3.0;
    let b = (v - u) * 6.0;
    let c = u * 3.0;
    a.length() / 3.0 + b.length() / 2.0 + c.length()
}

pub(crate) fn cubic_sample(p0: Vector2, c1: Vector2, c2: Vector2, p1: Vector2, t: f32) -> Vector2 {
    let s = 1.0 - t;
    p0 * (s * s * s) + c1 * (3.0 * s * s * t) + c2 * (3.0 * s * t * t) + p1 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_math::approx_eq;
    use std::f32::consts::PI;

    fn attrs() -> Attributes {
        Attributes::new()
    }

    #[test]
    fn span_commands_need_a_previous_command() {
        let mut path = Path::new();
        assert_eq!(
            path.line_to(vec2(1.0, 0.0), attrs()),
            Err(PathError::MissingPreviousCommand)
        );
        assert_eq!(
            path.arc_to(vec2(1.0, 0.0), 1.0, attrs()),
            Err(PathError::MissingPreviousCommand)
        );
        path.move_to(Vector2::ZERO, attrs());
        assert!(path.line_to(vec2(1.0, 0.0), attrs()).is_ok());
    }

    #[test]
    fn zero_chord_arc_is_one_division() {
        let mut path = Path::new();
        path.move_to(vec2(2.0, 3.0), attrs());
        path.arc_to(vec2(2.0, 3.0), 5.0, attrs()).unwrap();
        let subpath = path.subpaths().next().unwrap();
        assert_eq!(subpath.span_count(100.0), 1);
    }

    #[test]
    fn quarter_arc_geometry() {
        let arc = arc_geometry(vec2(0.0, 0.0), vec2(1.0, 1.0), 1.0).unwrap();
        assert!(approx_eq(arc.center.x, 0.0));
        assert!(approx_eq(arc.center.y, 1.0));
        assert!(approx_eq(arc.sweep, PI * 0.5));
        let mid = arc.sample(0.5);
        let expected = vec2((PI * 0.25).sin(), 1.0 - (PI * 0.25).cos());
        assert!(approx_eq(mid.x, expected.x));
        assert!(approx_eq(mid.y, expected.y));
    }

    #[test]
    fn small_radius_saturates_at_semicircle() {
        // Chord of length 2 with radius 0.5: the clamp holds the sweep at pi
        // and the effective radius grows to the half chord, so the arc still
        // lands on its endpoints.
        let arc = arc_geometry(vec2(0.0, 0.0), vec2(2.0, 0.0), 0.5).unwrap();
        assert!(approx_eq(arc.sweep, PI));
        assert!(arc.sample(0.0).distance(vec2(0.0, 0.0)) < 1e-5);
        assert!(arc.sample(1.0).distance(vec2(2.0, 0.0)) < 1e-5);
        // Positive radius keeps the center on the left of travel, so the
        // bulge is on the right.
        assert!(arc.sample(0.5).distance(vec2(1.0, -1.0)) < 1e-5);
    }

    #[test]
    fn straight_cubic_length_bound_is_exact() {
        let bound = cubic_length_bound(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(2.0, 0.0),
            vec2(3.0, 0.0),
        );
        assert!(approx_eq(bound, 3.0));
    }

    #[test]
    fn walker_visits_line_endpoints() {
        let mut path = Path::new();
        path.move_to(vec2(0.0, 0.0), attrs());
        path.line_to(vec2(10.0, 0.0), attrs()).unwrap();
        path.line_to(vec2(10.0, 5.0), attrs()).unwrap();
        let subpath = path.subpaths().next().unwrap();
        let mut points = Vec::new();
        subpath.for_each_division(4.0, |p, _, _, t| points.push((p, t)));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, vec2(10.0, 0.0));
        assert_eq!(points[1].0, vec2(10.0, 5.0));
        assert_eq!(points[0].1, 1.0);
    }

    #[test]
    fn closed_walker_emits_implicit_closing_span() {
        let mut path = Path::new();
        path.move_to(vec2(0.0, 0.0), attrs());
        path.line_to(vec2(4.0, 0.0), attrs()).unwrap();
        path.line_to(vec2(4.0, 4.0), attrs()).unwrap();
        path.closed = true;
        let subpath = path.subpaths().next().unwrap();
        assert!(!subpath.ends_at_start());
        assert_eq!(subpath.span_count(4.0), 3);
        let mut last = None;
        subpath.for_each_division(4.0, |p, _, _, _| last = Some(p));
        assert_eq!(last, Some(vec2(0.0, 0.0)));
    }

    #[test]
    fn interior_move_splits_subpaths() {
        let mut path = Path::new();
        path.move_to(vec2(0.0, 0.0), attrs());
        path.line_to(vec2(1.0, 0.0), attrs()).unwrap();
        path.move_to(vec2(5.0, 5.0), attrs());
        path.line_to(vec2(6.0, 5.0), attrs()).unwrap();
        let runs: Vec<_> = path.subpaths().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].first_index, 0);
        assert_eq!(runs[1].first_index, 2);
        assert_eq!(runs[1].start(), vec2(5.0, 5.0));
    }
}
