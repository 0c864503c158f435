//! Turtle-graphics builder assembling shapes and paths from relative motion.

use std::f32::consts::PI;

use scrawl_math::{vec2, Vector2};

use crate::attribute::{AttributeValue, Attributes};
use crate::path::{Path, PathCommand, Shape};
use crate::THICKNESS_ATTRIBUTE;

struct Pen {
    path: Path,
    fill: bool,
}

/// A list of shapes and paths under construction, driven by turtle motion
/// commands: a current position, a heading, a z order and an attribute set.
///
/// Motion commands (`advance`, `jump`, `arc`, `curve`) always update the
/// position and heading, pen up or down; with the pen down they also append
/// to the active path. The builder is owned exclusively by one construction
/// call; there is no shared state between builds.
#[derive(Default)]
pub struct ShapeList {
    pub shapes: Vec<Shape>,
    pub paths: Vec<Path>,
    position: Vector2,
    rotation: f32,
    z_order: i32,
    attributes: Attributes,
    attribute_stack: Vec<Attributes>,
    pen: Option<Pen>,
}

impl ShapeList {
    pub fn new() -> ShapeList {
        ShapeList::default()
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Heading in radians, counterclockwise from +x.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen.is_some()
    }

    /// Adds `degrees` to the heading.
    pub fn pivot(&mut self, degrees: f32) -> &mut Self {
        self.rotate(degrees * PI / 180.0)
    }

    /// Adds `radians` to the heading.
    pub fn rotate(&mut self, radians: f32) -> &mut Self {
        self.rotation += radians;
        self
    }

    /// Moves `distance` along the current heading, drawing a line when the
    /// pen is down.
    pub fn advance(&mut self, distance: f32) -> &mut Self {
        let direction = vec2(self.rotation.cos(), self.rotation.sin());
        self.position += direction * distance;
        let to = self.position;
        self.append(|attributes| PathCommand::LineTo { to, attributes });
        self
    }

    /// Teleports to an absolute position, keeping the heading.
    pub fn jump(&mut self, x: f32, y: f32) -> &mut Self {
        self.position = vec2(x, y);
        let to = self.position;
        self.append(|attributes| PathCommand::MoveTo { to, attributes });
        self
    }

    /// Teleports to an absolute position and heading.
    pub fn jump_rotated(&mut self, x: f32, y: f32, rotation: f32) -> &mut Self {
        self.rotation = rotation;
        self.jump(x, y)
    }

    /// Follows a circular arc turning by `angle` radians with the given
    /// (positive) radius. An angle of magnitude greater than pi is bisected
    /// into two sub-arcs first: a single arc command cannot represent a turn
    /// beyond a half circle without ambiguity in center placement.
    pub fn arc(&mut self, angle: f32, radius: f32) -> &mut Self {
        if angle == 0.0 {
            return self;
        }
        if angle.abs() > PI {
            let half = angle * 0.5;
            self.arc(half, radius);
            return self.arc(angle - half, radius);
        }
        let side = angle.signum();
        let direction = vec2(self.rotation.cos(), self.rotation.sin());
        let center = self.position + direction.perp() * (radius * side);
        self.position = center + (self.position - center).rotate(angle);
        self.rotation += angle;
        let to = self.position;
        let signed_radius = radius * side;
        self.append(|attributes| PathCommand::ArcTo {
            to,
            radius: signed_radius,
            attributes,
        });
        self
    }

    /// Draws a cubic Bezier described as three turtle strides: forward
    /// `d1`, turn `a1` radians, forward `d2`, turn `a2`, forward `d3`. The
    /// intermediate stops become the curve's absolute control points.
    pub fn curve(&mut self, d1: f32, a1: f32, d2: f32, a2: f32, d3: f32) -> &mut Self {
        let dir0 = vec2(self.rotation.cos(), self.rotation.sin());
        let ctrl1 = self.position + dir0 * d1;
        let h1 = self.rotation + a1;
        let dir1 = vec2(h1.cos(), h1.sin());
        let ctrl2 = ctrl1 + dir1 * d2;
        let h2 = h1 + a2;
        let dir2 = vec2(h2.cos(), h2.sin());
        self.position = ctrl2 + dir2 * d3;
        self.rotation = h2;
        let to = self.position;
        self.append(|attributes| PathCommand::CurveTo {
            to,
            ctrl1,
            ctrl2,
            attributes,
        });
        self
    }

    /// Starts a new path at the current position. With `fill` the finished
    /// path becomes a [`Shape`] boundary, otherwise a stroked [`Path`]. A
    /// pen that was already down is finished as an open path first.
    pub fn pen_down(&mut self, fill: bool) -> &mut Self {
        if self.pen.is_some() {
            self.pen_up(false);
        }
        let mut path = Path::new();
        path.z_order = self.z_order;
        path.move_to(self.position, self.attributes.clone());
        self.pen = Some(Pen { path, fill });
        self
    }

    /// Finishes the active path. `close` marks a stroked path as a closed
    /// loop; shape boundaries are always closed.
    pub fn pen_up(&mut self, close: bool) -> &mut Self {
        if let Some(pen) = self.pen.take() {
            if pen.fill {
                self.shapes.push(Shape::new(pen.path));
            } else {
                let mut path = pen.path;
                path.closed = close;
                self.paths.push(path);
            }
        }
        self
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<AttributeValue>) -> &mut Self {
        self.attributes.set(key, value);
        self
    }

    pub fn clear_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes.remove(key);
        self
    }

    pub fn set_thickness(&mut self, thickness: f32) -> &mut Self {
        self.set_attribute(THICKNESS_ATTRIBUTE, thickness)
    }

    /// Saves the current attribute set; [`pop_attributes`] restores it.
    ///
    /// [`pop_attributes`]: ShapeList::pop_attributes
    pub fn push_attributes(&mut self) -> &mut Self {
        self.attribute_stack.push(self.attributes.clone());
        self
    }

    pub fn pop_attributes(&mut self) -> &mut Self {
        if let Some(attributes) = self.attribute_stack.pop() {
            self.attributes = attributes;
        }
        self
    }

    pub fn set_z_order(&mut self, z_order: i32) -> &mut Self {
        self.z_order = z_order;
        self
    }

    pub fn raise(&mut self) -> &mut Self {
        self.z_order += 1;
        self
    }

    pub fn lower(&mut self) -> &mut Self {
        self.z_order -= 1;
        self
    }

    /// Moves another list's shapes and paths into this one.
    pub fn extend(&mut self, mut other: ShapeList) -> &mut Self {
        other.pen_up(false);
        self.shapes.append(&mut other.shapes);
        self.paths.append(&mut other.paths);
        self
    }

    fn append<F: FnOnce(Attributes) -> PathCommand>(&mut self, command: F) {
        if let Some(pen) = &mut self.pen {
            pen.path.push(command(self.attributes.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;
    use scrawl_math::approx_eq;

    #[test]
    fn square_builds_one_closed_shape() {
        let mut list = ShapeList::new();
        list.jump(0.0, 0.0)
            .pen_down(true)
            .advance(5.0)
            .pivot(90.0)
            .advance(5.0)
            .pivot(90.0)
            .advance(5.0)
            .pivot(90.0)
            .advance(5.0)
            .pen_up(true);
        assert_eq!(list.shapes.len(), 1);
        assert!(list.paths.is_empty());
        let shape = &list.shapes[0];
        assert!(shape.exterior.closed);
        // A move plus four line commands.
        assert_eq!(shape.exterior.commands().len(), 5);
        let end = shape.exterior.commands().last().unwrap().to();
        assert!(end.distance(Vector2::ZERO) < 1e-4);
    }

    #[test]
    fn motion_updates_state_with_pen_up() {
        let mut list = ShapeList::new();
        list.jump(1.0, 2.0).pivot(90.0).advance(3.0);
        assert!(approx_eq(list.position().x, 1.0));
        assert!(approx_eq(list.position().y, 5.0));
        assert!(list.shapes.is_empty() && list.paths.is_empty());
    }

    #[test]
    fn wide_arc_is_bisected() {
        let mut list = ShapeList::new();
        list.pen_down(false).arc(2.0 * PI, 1.0).pen_up(false);
        let path = &list.paths[0];
        let arcs = path
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::ArcTo { .. }))
            .count();
        // A full turn splits into two semicircles.
        assert_eq!(arcs, 2);
        // And comes back home.
        assert!(list.position().distance(Vector2::ZERO) < 1e-4);
        assert!(approx_eq(list.rotation(), 2.0 * PI));
    }

    #[test]
    fn curve_control_points_follow_the_turtle() {
        let mut list = ShapeList::new();
        list.pen_down(false)
            .curve(1.0, PI * 0.5, 1.0, -PI * 0.5, 1.0)
            .pen_up(false);
        let path = &list.paths[0];
        match path.commands().last().unwrap() {
            PathCommand::CurveTo {
                to, ctrl1, ctrl2, ..
            } => {
                assert!(ctrl1.distance(vec2(1.0, 0.0)) < 1e-5);
                assert!(ctrl2.distance(vec2(1.0, 1.0)) < 1e-5);
                assert!(to.distance(vec2(2.0, 1.0)) < 1e-5);
            }
            other => panic!("expected a curve, got {:?}", other),
        }
        assert!(approx_eq(list.rotation(), 0.0));
    }

    #[test]
    fn attribute_stack_restores() {
        let mut list = ShapeList::new();
        list.set_thickness(0.5).push_attributes().set_thickness(2.0);
        list.pen_down(false);
        list.pop_attributes().advance(1.0).pen_up(false);
        let commands = list.paths[0].commands();
        assert_eq!(
            commands[0].attributes().get(THICKNESS_ATTRIBUTE),
            Some(AttributeValue::Scalar(2.0))
        );
        assert_eq!(
            commands[1].attributes().get(THICKNESS_ATTRIBUTE),
            Some(AttributeValue::Scalar(0.5))
        );
    }

    #[test]
    fn pen_down_twice_finishes_the_first_path() {
        let mut list = ShapeList::new();
        list.pen_down(false).advance(1.0).pen_down(false).advance(1.0).pen_up(false);
        assert_eq!(list.paths.len(), 2);
    }
}
