//! Conservative bounding box computation for shape lists.

use scrawl_math::{Bounds, Vector2};
use scrawl_path::{Path, PathCommand, ShapeList};

/// Computes a conservative axis-aligned bounding box containing every
/// shape and path of the list. Curve control points bound their segments
/// by the hull property; arcs are padded by their radius, which bounds the
/// sagitta. Faster but looser than exact extremum computation.
pub fn fast_bounding_box(list: &ShapeList) -> Bounds {
    let mut bounds = Bounds::empty();
    for shape in &list.shapes {
        add_path(&mut bounds, &shape.exterior);
        for hole in &shape.holes {
            add_path(&mut bounds, hole);
        }
    }
    for path in &list.paths {
        add_path(&mut bounds, path);
    }
    bounds
}

fn add_path(bounds: &mut Bounds, path: &Path) {
    let mut prev: Option<Vector2> = None;
    for command in path.commands() {
        match command {
            PathCommand::MoveTo { to, .. } | PathCommand::LineTo { to, .. } => {
                bounds.add_point(*to);
            }
            PathCommand::CurveTo {
                to, ctrl1, ctrl2, ..
            } => {
                bounds.add_point(*ctrl1);
                bounds.add_point(*ctrl2);
                bounds.add_point(*to);
            }
            PathCommand::ArcTo { to, radius, .. } => {
                let mut chord = Bounds::empty();
                if let Some(prev) = prev {
                    chord.add_point(prev);
                }
                chord.add_point(*to);
                bounds.union(&chord.expanded(radius.abs()));
            }
        }
        prev = Some(command.to());
    }
}
