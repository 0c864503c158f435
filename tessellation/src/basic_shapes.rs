//! The declarative shape catalog.
//!
//! Each shape kind maps to two pure functions: one expands a bounds
//! accumulator to cover the shape and returns its stroke thickness, the
//! other builds the turtle-graphics [`ShapeList`] from the declarative
//! parameters. The catalog is a lookup table, not a class hierarchy: a new
//! kind is a new entry. Parameters are an open record of named fields;
//! every accessor applies a documented default and never fails on a
//! missing field.

use std::f32::consts::PI;

use scrawl_math::{vec2, Bounds, Vector2};
use scrawl_path::{ShapeList, DEFAULT_THICKNESS};

/// A declarative parameter value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ParamValue {
    Number(f32),
    Bool(bool),
    Vector(Vector2),
    Points(Vec<Vector2>),
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> ParamValue {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> ParamValue {
        ParamValue::Bool(value)
    }
}

impl From<Vector2> for ParamValue {
    fn from(value: Vector2) -> ParamValue {
        ParamValue::Vector(value)
    }
}

impl From<Vec<Vector2>> for ParamValue {
    fn from(value: Vec<Vector2>) -> ParamValue {
        ParamValue::Points(value)
    }
}

/// An open record of named shape parameters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ShapeParams {
    entries: Vec<(String, ParamValue)>,
}

impl ShapeParams {
    pub fn new() -> ShapeParams {
        ShapeParams::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> &mut Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn number(&self, key: &str, default: f32) -> f32 {
        match self.get(key) {
            Some(ParamValue::Number(n)) => *n,
            _ => default,
        }
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(ParamValue::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn vector(&self, key: &str, default: Vector2) -> Vector2 {
        match self.get(key) {
            Some(ParamValue::Vector(v)) => *v,
            _ => default,
        }
    }

    pub fn points(&self, key: &str) -> &[Vector2] {
        match self.get(key) {
            Some(ParamValue::Points(p)) => p,
            _ => &[],
        }
    }

    fn thickness(&self) -> f32 {
        self.number("thickness", DEFAULT_THICKNESS)
    }
}

/// A catalog entry: the two functions external declarative-data editors
/// call. `add_to_bounds` covers the untickened extent and returns the
/// stroke thickness; callers pad by the thickness themselves.
pub struct ShapeKind {
    pub name: &'static str,
    pub add_to_bounds: fn(&mut Bounds, &ShapeParams) -> f32,
    pub create_shape_list: fn(&ShapeParams) -> ShapeList,
}

static CATALOG: &[ShapeKind] = &[
    ShapeKind {
        name: "point",
        add_to_bounds: point_bounds,
        create_shape_list: point_shape_list,
    },
    ShapeKind {
        name: "line",
        add_to_bounds: line_bounds,
        create_shape_list: line_shape_list,
    },
    ShapeKind {
        name: "lineGroup",
        add_to_bounds: line_group_bounds,
        create_shape_list: line_group_shape_list,
    },
    ShapeKind {
        name: "polygon",
        add_to_bounds: polygon_bounds,
        create_shape_list: polygon_shape_list,
    },
    ShapeKind {
        name: "rectangle",
        add_to_bounds: rectangle_bounds,
        create_shape_list: rectangle_shape_list,
    },
    ShapeKind {
        name: "arc",
        add_to_bounds: arc_bounds,
        create_shape_list: arc_shape_list,
    },
    ShapeKind {
        name: "curve",
        add_to_bounds: curve_bounds,
        create_shape_list: curve_shape_list,
    },
];

/// All registered shape kinds.
pub fn catalog() -> &'static [ShapeKind] {
    CATALOG
}

/// Looks a kind up by name.
pub fn shape_kind(name: &str) -> Option<&'static ShapeKind> {
    CATALOG.iter().find(|kind| kind.name == name)
}

fn point_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    bounds.add_point(Vector2::ZERO);
    params.thickness()
}

fn point_shape_list(params: &ShapeParams) -> ShapeList {
    let mut list = ShapeList::new();
    list.set_thickness(params.thickness())
        .jump(0.0, 0.0)
        .pen_down(false)
        .pen_up(false);
    list
}

fn line_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    let half = params.number("length", 1.0) * 0.5;
    bounds.add_point(vec2(-half, 0.0));
    bounds.add_point(vec2(half, 0.0));
    params.thickness()
}

fn line_shape_list(params: &ShapeParams) -> ShapeList {
    let length = params.number("length", 1.0);
    let mut list = ShapeList::new();
    list.set_thickness(params.thickness())
        .jump_rotated(-length * 0.5, 0.0, 0.0)
        .pen_down(false)
        .advance(length)
        .pen_up(false);
    list
}

fn line_group_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    for point in params.points("vertices") {
        bounds.add_point(*point);
    }
    params.thickness()
}

fn line_group_shape_list(params: &ShapeParams) -> ShapeList {
    let mut list = ShapeList::new();
    list.set_thickness(params.thickness());
    // Consecutive vertex pairs form independent segments; a trailing odd
    // vertex is ignored.
    for pair in params.points("vertices").chunks_exact(2) {
        let delta = pair[1] - pair[0];
        list.jump_rotated(pair[0].x, pair[0].y, delta.y.atan2(delta.x))
            .pen_down(false)
            .advance(delta.length())
            .pen_up(false);
    }
    list
}

fn polygon_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    for point in params.points("vertices") {
        bounds.add_point(*point);
    }
    params.thickness()
}

fn polygon_shape_list(params: &ShapeParams) -> ShapeList {
    let vertices = params.points("vertices");
    let mut list = ShapeList::new();
    list.set_thickness(params.thickness());
    if vertices.len() < 2 {
        return list;
    }
    list.jump(vertices[0].x, vertices[0].y)
        .pen_down(params.boolean("fill", false));
    for i in 1..=vertices.len() {
        advance_to(&mut list, vertices[i % vertices.len()]);
    }
    list.pen_up(true);
    list
}

fn rectangle_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    let half_width = params.number("width", 1.0) * 0.5;
    let half_height = params.number("height", 1.0) * 0.5;
    bounds.add_point(vec2(-half_width, -half_height));
    bounds.add_point(vec2(half_width, half_height));
    params.thickness()
}

fn rectangle_shape_list(params: &ShapeParams) -> ShapeList {
    let width = params.number("width", 1.0);
    let height = params.number("height", 1.0);
    let mut list = ShapeList::new();
    list.set_thickness(params.thickness())
        .jump_rotated(-width * 0.5, -height * 0.5, 0.0)
        .pen_down(params.boolean("fill", false))
        .advance(width)
        .pivot(90.0)
        .advance(height)
        .pivot(90.0)
        .advance(width)
        .pivot(90.0)
        .advance(height)
        .pen_up(true);
    list
}

fn arc_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    // Conservative: the full circle the arc lies on.
    let radius = params.number("radius", 1.0);
    bounds.add_point(vec2(-radius, -radius));
    bounds.add_point(vec2(radius, radius));
    params.thickness()
}

fn arc_shape_list(params: &ShapeParams) -> ShapeList {
    let radius = params.number("radius", 1.0);
    let angle = params.number("angle", 2.0 * PI);
    let fill = params.boolean("fill", false);
    let mut list = ShapeList::new();
    list.set_thickness(params.thickness())
        .jump_rotated(radius, 0.0, PI * 0.5)
        .pen_down(fill)
        .arc(angle, radius)
        .pen_up(angle.abs() >= 2.0 * PI - 1e-3);
    list
}

fn curve_bounds(bounds: &mut Bounds, params: &ShapeParams) -> f32 {
    let half_span = params.number("span", 1.0) * 0.5;
    let from = vec2(-half_span, 0.0);
    let to = vec2(half_span, 0.0);
    bounds.add_point(from);
    bounds.add_point(to);
    // The curve stays inside its control polygon's hull.
    bounds.add_point(params.vector("c1", vec2(-half_span / 3.0, 0.0)));
    bounds.add_point(params.vector("c2", vec2(half_span / 3.0, 0.0)));
    params.thickness()
}

fn curve_shape_list(params: &ShapeParams) -> ShapeList {
    let half_span = params.number("span", 1.0) * 0.5;
    let from = vec2(-half_span, 0.0);
    let to = vec2(half_span, 0.0);
    let ctrl1 = params.vector("c1", vec2(-half_span / 3.0, 0.0));
    let ctrl2 = params.vector("c2", vec2(half_span / 3.0, 0.0));

    // Express the control points as turtle strides.
    let leg1 = ctrl1 - from;
    let leg2 = ctrl2 - ctrl1;
    let leg3 = to - ctrl2;
    let h0 = leg1.y.atan2(leg1.x);
    let h1 = leg2.y.atan2(leg2.x);
    let h2 = leg3.y.atan2(leg3.x);

    let mut list = ShapeList::new();
    list.set_thickness(params.thickness())
        .jump_rotated(from.x, from.y, h0)
        .pen_down(false)
        .curve(leg1.length(), h1 - h0, leg2.length(), h2 - h1, leg3.length())
        .pen_up(false);
    list
}

/// Turns toward `target` and advances the exact distance.
fn advance_to(list: &mut ShapeList, target: Vector2) {
    let delta = target - list.position();
    let distance = delta.length();
    if distance == 0.0 {
        return;
    }
    let heading = delta.y.atan2(delta.x);
    list.rotate(heading - list.rotation()).advance(distance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_math::approx_eq;

    #[test]
    fn rectangle_bounds_are_exact() {
        let mut params = ShapeParams::new();
        params.set("width", 4.0).set("height", 2.0).set("fill", false);
        let kind = shape_kind("rectangle").unwrap();
        let mut bounds = Bounds::empty();
        let thickness = (kind.add_to_bounds)(&mut bounds, &params);
        assert_eq!(bounds.min, vec2(-2.0, -1.0));
        assert_eq!(bounds.max, vec2(2.0, 1.0));
        assert!(approx_eq(thickness, DEFAULT_THICKNESS));

        let list = (kind.create_shape_list)(&params);
        assert!(list.shapes.is_empty());
        assert_eq!(list.paths.len(), 1);
        let path = &list.paths[0];
        assert!(path.closed);
        // A move plus four corner-to-corner lines.
        assert_eq!(path.commands().len(), 5);
        let end = path.commands().last().unwrap().to();
        assert!(end.distance(vec2(-2.0, -1.0)) < 1e-4);
    }

    #[test]
    fn filled_rectangle_becomes_a_shape() {
        let mut params = ShapeParams::new();
        params.set("fill", true);
        let kind = shape_kind("rectangle").unwrap();
        let list = (kind.create_shape_list)(&params);
        assert_eq!(list.shapes.len(), 1);
        assert!(list.paths.is_empty());
    }

    #[test]
    fn full_arc_closes_on_itself() {
        let params = ShapeParams::new();
        let kind = shape_kind("arc").unwrap();
        let list = (kind.create_shape_list)(&params);
        let path = &list.paths[0];
        assert!(path.closed);
        let subpath = path.subpaths().next().unwrap();
        assert!(subpath.ends_at_start());
    }

    #[test]
    fn polygon_walks_every_vertex() {
        let mut params = ShapeParams::new();
        params.set(
            "vertices",
            vec![vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(1.0, 2.0)],
        );
        let kind = shape_kind("polygon").unwrap();
        let list = (kind.create_shape_list)(&params);
        let path = &list.paths[0];
        // Move plus one line per edge, back to the start.
        assert_eq!(path.commands().len(), 4);
        assert!(path.subpaths().next().unwrap().ends_at_start());
    }

    #[test]
    fn line_group_makes_independent_segments() {
        let mut params = ShapeParams::new();
        params.set(
            "vertices",
            vec![
                vec2(0.0, 0.0),
                vec2(1.0, 0.0),
                vec2(0.0, 1.0),
                vec2(1.0, 1.0),
                vec2(9.0, 9.0),
            ],
        );
        let kind = shape_kind("lineGroup").unwrap();
        let list = (kind.create_shape_list)(&params);
        assert_eq!(list.paths.len(), 2);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let params = ShapeParams::new();
        for kind in catalog() {
            let mut bounds = Bounds::empty();
            let thickness = (kind.add_to_bounds)(&mut bounds, &params);
            assert!(thickness > 0.0, "{} thickness", kind.name);
            let _ = (kind.create_shape_list)(&params);
        }
    }

    #[test]
    fn unknown_kind_is_none() {
        assert!(shape_kind("sphere").is_none());
    }
}
