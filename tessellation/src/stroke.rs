//! Thick-path and thin-edge tessellation of path boundaries.
//!
//! Thick mode emits a stroke with width: every generated corner carries a
//! miter offset vector at unit half-thickness in the `vector` channel, and
//! consumers displace by half the interpolated `thickness`. Thin mode emits
//! a zero-width boundary whose vertices carry their span's half-plane
//! coefficients in the `plane` channel; fill triangulation and anti-aliased
//! edge rendering both read it.

use scrawl_math::{Plane, Vector2};
use scrawl_path::{Attributes, Path, Subpath, DEFAULT_THICKNESS, THICKNESS_ATTRIBUTE};

use crate::geometry_builder::{
    Count, Cursors, Index, VertexLayout, PLANE_CHANNEL, VECTOR_CHANNEL, VERTEX_CHANNEL,
};

/// One flattened corner: a division endpoint with the attribute context of
/// the span that produced it.
pub(crate) struct Corner<'l> {
    pub position: Vector2,
    pub from: &'l Attributes,
    pub to: &'l Attributes,
    pub t: f32,
}

impl<'l> Corner<'l> {
    fn anchor(subpath: &Subpath<'l>) -> Corner<'l> {
        Corner {
            position: subpath.start(),
            from: subpath.start_attributes(),
            to: subpath.start_attributes(),
            t: 1.0,
        }
    }
}

/// Flattens a subpath into `corners`: the start point followed by every
/// division endpoint. A closed subpath contributes a final entry welded
/// onto the start point.
pub(crate) fn flatten_subpath<'l>(
    subpath: &Subpath<'l>,
    density: f32,
    corners: &mut Vec<Corner<'l>>,
) {
    corners.clear();
    corners.push(Corner::anchor(subpath));
    subpath.for_each_division(density, |position, from, to, t| {
        corners.push(Corner {
            position,
            from,
            to,
            t,
        });
    });
}

/// Exact thick-mode totals for one path.
pub(crate) fn count_stroke(path: &Path, density: f32) -> Count {
    let mut count = Count::default();
    for subpath in path.subpaths() {
        let spans = subpath.span_count(density) as u32;
        count = count
            + if spans == 0 {
                Count {
                    vertices: 2,
                    indices: 0,
                }
            } else if subpath.closed {
                Count {
                    vertices: 8 * spans,
                    indices: 12 * spans,
                }
            } else {
                Count {
                    vertices: 8 * spans - 4,
                    indices: 12 * spans - 6,
                }
            };
    }
    count
}

/// Exact thin-mode totals for one path. Thin edges emit no indices; the
/// fill triangulator indexes into them instead.
pub(crate) fn count_edges(path: &Path, density: f32) -> Count {
    let mut count = Count::default();
    for subpath in path.subpaths() {
        let spans = subpath.span_count(density) as u32;
        count.vertices += if spans == 0 {
            1
        } else if subpath.closed {
            2 * spans
        } else {
            1 + 2 * spans
        };
    }
    count
}

/// The four miter corner offsets of a join, at unit half-thickness.
struct Join {
    left_in: Vector2,
    left_out: Vector2,
    right_in: Vector2,
    right_out: Vector2,
}

impl Join {
    /// A join between collinear spans: plain perpendicular offsets.
    fn straight(direction: Vector2) -> Join {
        let left = direction.perp();
        Join {
            left_in: left,
            left_out: left,
            right_in: -left,
            right_out: -left,
        }
    }
}

/// Builds the miter join at `position` between spans with unit directions
/// `dir_in` and `dir_out`.
///
/// Each corner offset is located by intersecting the span's unit-offset
/// edge plane with the bisector cap plane at distance
/// `1 / max(cos(theta/2), sin(theta/2))`, which limits the miter spike on
/// sharp turns. A non-finite intersection (collinear spans, degenerate
/// directions, 180 degree turns) falls back to the plain perpendicular
/// offset, so the output never contains NaN or infinite coordinates.
fn compute_join(position: Vector2, dir_in: Vector2, dir_out: Vector2) -> Join {
    let theta = dir_in.angle_to(dir_out).abs();
    let half = theta * 0.5;
    let scale = 1.0 / half.cos().max(half.sin());
    let perp_in = dir_in.perp();
    let perp_out = dir_out.perp();
    let (left_in, left_out) = side_offsets(position, perp_in, perp_out, scale);
    let (right_in, right_out) = side_offsets(position, -perp_in, -perp_out, scale);
    Join {
        left_in,
        left_out,
        right_in,
        right_out,
    }
}

fn side_offsets(
    position: Vector2,
    normal_in: Vector2,
    normal_out: Vector2,
    scale: f32,
) -> (Vector2, Vector2) {
    let bisector = (normal_in + normal_out).normalize();
    let cap = Plane::from_point_normal(position + bisector * scale, bisector);
    let edge_in = Plane::from_point_normal(position + normal_in, normal_in);
    let edge_out = Plane::from_point_normal(position + normal_out, normal_out);
    let corner_in = edge_in.intersection(&cap);
    let corner_out = edge_out.intersection(&cap);
    (
        if corner_in.is_finite() {
            corner_in - position
        } else {
            normal_in
        },
        if corner_out.is_finite() {
            corner_out - position
        } else {
            normal_out
        },
    )
}

fn span_directions(corners: &[Corner], directions: &mut Vec<Vector2>) {
    directions.clear();
    for pair in corners.windows(2) {
        directions.push((pair[1].position - pair[0].position).normalize());
    }
}

/// Writes one interleaved vertex and returns its id.
fn emit_vertex(
    layout: &VertexLayout,
    vertices: &mut [f32],
    cursors: &mut Cursors,
    position: Vector2,
    vector: Option<Vector2>,
    plane: Option<Plane>,
    corner: &Corner,
) -> Index {
    let id = cursors.next_vertex();
    let base = id as usize * layout.vertex_size();
    for (name, components, offset) in layout.channels() {
        let slot = &mut vertices[base + offset..base + offset + components];
        match name {
            VERTEX_CHANNEL => {
                slot[0] = position.x;
                slot[1] = position.y;
            }
            VECTOR_CHANNEL => {
                if let Some(v) = vector {
                    slot[0] = v.x;
                    slot[1] = v.y;
                }
            }
            PLANE_CHANNEL => {
                if let Some(p) = plane {
                    slot[0] = p.normal.x;
                    slot[1] = p.normal.y;
                    slot[2] = p.constant;
                }
            }
            _ => match Attributes::interpolate(corner.from, corner.to, name, corner.t) {
                Some(value) => {
                    for (i, out) in slot.iter_mut().enumerate() {
                        *out = value.component(i);
                    }
                }
                None => {
                    if name == THICKNESS_ATTRIBUTE {
                        slot[0] = DEFAULT_THICKNESS;
                    }
                }
            },
        }
    }
    id
}

fn quad(
    cursors: &mut Cursors,
    indices: &mut [Index],
    start_left: Index,
    start_right: Index,
    end_left: Index,
    end_right: Index,
) {
    cursors.push_triangle(indices, start_left, start_right, end_right);
    cursors.push_triangle(indices, start_left, end_right, end_left);
}

/// Populates thick-mode vertices and indices for one path.
#[allow(clippy::too_many_arguments)]
pub(crate) fn populate_stroke<'l>(
    path: &'l Path,
    density: f32,
    layout: &VertexLayout,
    vertices: &mut [f32],
    indices: &mut [Index],
    cursors: &mut Cursors,
    corners: &mut Vec<Corner<'l>>,
    directions: &mut Vec<Vector2>,
) {
    for subpath in path.subpaths() {
        flatten_subpath(&subpath, density, corners);
        span_directions(corners, directions);
        let spans = directions.len();

        if spans == 0 {
            let corner = &corners[0];
            emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(Vector2::ZERO),
                None,
                corner,
            );
            emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(Vector2::ZERO),
                None,
                corner,
            );
            continue;
        }

        let closed = subpath.closed;
        // On a loop the start pair already needs the wrap join, computed
        // from the last span's direction.
        let start_join = if closed {
            compute_join(corners[0].position, directions[spans - 1], directions[0])
        } else {
            Join::straight(directions[0])
        };

        let start = &corners[0];
        let mut prev_left = emit_vertex(
            layout,
            vertices,
            cursors,
            start.position,
            Some(start_join.left_out),
            None,
            start,
        );
        let mut prev_right = emit_vertex(
            layout,
            vertices,
            cursors,
            start.position,
            Some(start_join.right_out),
            None,
            start,
        );

        for c in 1..=spans {
            let corner = &corners[c];
            let wrap = c == spans;
            if wrap && !closed {
                // Final corner of an open run: plain perpendicular cap.
                let join = Join::straight(directions[spans - 1]);
                let end_left = emit_vertex(
                    layout,
                    vertices,
                    cursors,
                    corner.position,
                    Some(join.left_in),
                    None,
                    corner,
                );
                let end_right = emit_vertex(
                    layout,
                    vertices,
                    cursors,
                    corner.position,
                    Some(join.right_in),
                    None,
                    corner,
                );
                quad(cursors, indices, prev_left, prev_right, end_left, end_right);
                break;
            }

            let join = if wrap {
                compute_join(corner.position, directions[spans - 1], directions[0])
            } else {
                compute_join(corner.position, directions[c - 1], directions[c])
            };

            // Incoming pair ends the span quad.
            let end_left = emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(join.left_in),
                None,
                corner,
            );
            let end_right = emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(join.right_in),
                None,
                corner,
            );
            quad(cursors, indices, prev_left, prev_right, end_left, end_right);

            // Miter wedge between the incoming and outgoing pairs. The
            // outgoing copies of a wrap corner belong to the run's first
            // command again.
            let out_corner = if wrap { &corners[0] } else { corner };
            let wedge_in_left = emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(join.left_in),
                None,
                corner,
            );
            let wedge_in_right = emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(join.right_in),
                None,
                corner,
            );
            let wedge_out_left = emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(join.left_out),
                None,
                out_corner,
            );
            let wedge_out_right = emit_vertex(
                layout,
                vertices,
                cursors,
                corner.position,
                Some(join.right_out),
                None,
                out_corner,
            );
            quad(
                cursors,
                indices,
                wedge_in_left,
                wedge_in_right,
                wedge_out_left,
                wedge_out_right,
            );

            if !wrap {
                prev_left = emit_vertex(
                    layout,
                    vertices,
                    cursors,
                    corner.position,
                    Some(join.left_out),
                    None,
                    corner,
                );
                prev_right = emit_vertex(
                    layout,
                    vertices,
                    cursors,
                    corner.position,
                    Some(join.right_out),
                    None,
                    corner,
                );
            }
        }
    }
}

/// One thin-edge boundary loop or polyline in the vertex buffer. Boundary
/// point `i` lives at vertex id `first_vertex + 2 * i`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct EdgeRun {
    pub first_vertex: Index,
    pub points: usize,
    pub closed: bool,
}

/// Populates thin-edge vertices for one path; spans emit no indices. The
/// returned runs let the fill triangulator address boundary points.
pub(crate) fn populate_edges<'l>(
    path: &'l Path,
    density: f32,
    layout: &VertexLayout,
    vertices: &mut [f32],
    cursors: &mut Cursors,
    corners: &mut Vec<Corner<'l>>,
    runs: &mut Vec<EdgeRun>,
) {
    for subpath in path.subpaths() {
        flatten_subpath(&subpath, density, corners);
        let spans = corners.len() - 1;
        let first_vertex = cursors.vertex as Index;

        let first_plane = if spans > 0 {
            Plane::from_points(corners[0].position, corners[1].position)
        } else {
            Plane::default()
        };
        emit_vertex(
            layout,
            vertices,
            cursors,
            corners[0].position,
            None,
            Some(first_plane),
            &corners[0],
        );

        for i in 0..spans {
            let plane = Plane::from_points(corners[i].position, corners[i + 1].position);
            emit_vertex(
                layout,
                vertices,
                cursors,
                corners[i].position,
                None,
                Some(plane),
                &corners[i],
            );
            let suppress_end = subpath.closed && i == spans - 1;
            if !suppress_end {
                emit_vertex(
                    layout,
                    vertices,
                    cursors,
                    corners[i + 1].position,
                    None,
                    Some(plane),
                    &corners[i + 1],
                );
            }
        }

        runs.push(EdgeRun {
            first_vertex,
            points: if subpath.closed && spans > 0 {
                spans
            } else {
                spans + 1
            },
            closed: subpath.closed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_math::vec2;
    use scrawl_path::ShapeList;

    fn layout_for_paths() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout.add_channel(VERTEX_CHANNEL, 2);
        layout.add_channel(VECTOR_CHANNEL, 2);
        layout.add_channel(THICKNESS_ATTRIBUTE, 1);
        layout
    }

    fn stroke(path: &Path, density: f32) -> (Vec<f32>, Vec<Index>, VertexLayout) {
        let layout = layout_for_paths();
        let count = count_stroke(path, density);
        let mut vertices = vec![0.0; count.vertices as usize * layout.vertex_size()];
        let mut indices = vec![0; count.indices as usize];
        let mut cursors = Cursors::default();
        let mut corners = Vec::new();
        let mut directions = Vec::new();
        populate_stroke(
            path,
            density,
            &layout,
            &mut vertices,
            &mut indices,
            &mut cursors,
            &mut corners,
            &mut directions,
        );
        assert_eq!(cursors.vertex, count.vertices as usize);
        assert_eq!(cursors.index, count.indices as usize);
        (vertices, indices, layout)
    }

    fn line_path(points: &[Vector2], closed: bool) -> Path {
        let mut path = Path::new();
        path.move_to(points[0], Attributes::new());
        for p in &points[1..] {
            path.line_to(*p, Attributes::new()).unwrap();
        }
        path.closed = closed;
        path
    }

    #[test]
    fn single_span_emits_one_quad() {
        let path = line_path(&[vec2(0.0, 0.0), vec2(10.0, 0.0)], false);
        let (vertices, indices, layout) = stroke(&path, 4.0);
        assert_eq!(vertices.len() / layout.vertex_size(), 4);
        assert_eq!(indices, vec![0, 1, 3, 0, 3, 2]);
        // Start pair offsets are the unit perpendiculars.
        let vector_offset = layout.offset_of(VECTOR_CHANNEL).unwrap();
        assert_eq!(vertices[vector_offset], 0.0);
        assert_eq!(vertices[vector_offset + 1], 1.0);
        // Default thickness fills the attribute channel.
        let thickness_offset = layout.offset_of(THICKNESS_ATTRIBUTE).unwrap();
        assert_eq!(vertices[thickness_offset], DEFAULT_THICKNESS);
    }

    #[test]
    fn closed_square_counts() {
        let path = line_path(
            &[
                vec2(0.0, 0.0),
                vec2(5.0, 0.0),
                vec2(5.0, 5.0),
                vec2(0.0, 5.0),
                vec2(0.0, 0.0),
            ],
            true,
        );
        let count = count_stroke(&path, 4.0);
        assert_eq!(count.vertices, 8 * 4);
        assert_eq!(count.indices, 12 * 4);
        stroke(&path, 4.0);
    }

    #[test]
    fn doubling_back_stays_finite() {
        // A 180 degree turn: the miter planes are degenerate and the
        // fallback perpendicular offsets must keep everything finite.
        let path = line_path(&[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(0.0, 0.0)], false);
        let (vertices, _, _) = stroke(&path, 4.0);
        assert!(vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn right_angle_miter_offsets() {
        let path = line_path(
            &[vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0)],
            false,
        );
        let (vertices, _, layout) = stroke(&path, 4.0);
        let size = layout.vertex_size();
        let vector_offset = layout.offset_of(VECTOR_CHANNEL).unwrap();
        // Vertex 2 is the corner's incoming left offset: the inner miter of
        // a left turn, pointing up-left at sqrt(2) length.
        let left_in = vec2(
            vertices[2 * size + vector_offset],
            vertices[2 * size + vector_offset + 1],
        );
        assert!((left_in - vec2(-1.0, 1.0)).length() < 1e-4);
        assert!(vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn thin_edges_of_turtle_square() {
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
        let exterior = &list.shapes[0].exterior;
        let count = count_edges(exterior, 4.0);
        assert_eq!(count.vertices, 8);
        assert_eq!(count.indices, 0);

        let mut layout = VertexLayout::new();
        layout.add_channel(VERTEX_CHANNEL, 2);
        layout.add_channel(PLANE_CHANNEL, 3);
        let mut vertices = vec![0.0; count.vertices as usize * layout.vertex_size()];
        let mut cursors = Cursors::default();
        let mut corners = Vec::new();
        let mut runs = Vec::new();
        populate_edges(
            exterior,
            4.0,
            &layout,
            &mut vertices,
            &mut cursors,
            &mut corners,
            &mut runs,
        );
        assert_eq!(cursors.vertex, 8);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].points, 4);
        assert!(runs[0].closed);
        // Every other vertex is a distinct boundary point.
        let size = layout.vertex_size();
        let p1 = vec2(vertices[2 * size], vertices[2 * size + 1]);
        assert!((p1 - vec2(5.0, 0.0)).length() < 1e-3);
    }
}
