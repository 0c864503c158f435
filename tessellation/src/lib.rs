//! Tessellation of the scrawl editor's paths and shapes.
//!
//! ## Overview
//!
//! The tessellator turns a [`ShapeList`](scrawl_path::ShapeList) into one
//! interleaved vertex buffer, one triangle index buffer and an
//! attribute-size map ([`VertexLayout`]) that lets a renderer compute
//! per-attribute offsets without this crate knowing about any graphics API.
//!
//! Stroked paths tessellate in thick mode (miter joins, a per-vertex offset
//! vector scaled by the interpolated `thickness` attribute); shape
//! boundaries tessellate in thin-edge mode and their interiors are filled
//! by ear-clipping triangulation.
//!
//! Buffer construction is strictly two-pass: a stats pass computes exact
//! vertex and index totals so both buffers are allocated once at final
//! size, then a populate pass writes through running offsets. The passes
//! share the division-count rules in `scrawl_path`, so they can never
//! disagree; debug builds assert that the populate pass fills the buffers
//! exactly.

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

pub use scrawl_math as math;
pub use scrawl_path as path;

pub mod geometry_builder;

mod basic_shapes;
mod error;
mod fill;
mod stroke;

#[cfg(test)]
mod fill_tests;

pub use crate::basic_shapes::{catalog, shape_kind, ParamValue, ShapeKind, ShapeParams};
pub use crate::error::{GeometryBuilderError, TessellationError, TessellationResult};
pub use crate::geometry_builder::{
    Count, GeometryBuffers, Index, VertexLayout, PLANE_CHANNEL, VECTOR_CHANNEL, VERTEX_CHANNEL,
};

use crate::fill::FillPoint;
use crate::geometry_builder::Cursors;
use crate::stroke::{Corner, EdgeRun};
use scrawl_math::{vec2, Vector2};
use scrawl_path::{Path, Shape, ShapeList, THICKNESS_ATTRIBUTE};

/// Default subdivisions per unit of arc length.
pub const DEFAULT_DENSITY: f32 = 4.0;

/// Tessellates shape lists, paths and shapes into [`GeometryBuffers`].
#[derive(Default)]
pub struct Tessellator {}

impl Tessellator {
    pub fn new() -> Tessellator {
        Tessellator {}
    }

    /// Tessellates every shape and path of the list, in ascending z order,
    /// into `output`. The list must not be mutated for the duration of the
    /// call; the tessellator assumes exclusive access.
    pub fn tessellate_shape_list(
        &mut self,
        list: &ShapeList,
        density: f32,
        output: &mut GeometryBuffers,
    ) -> TessellationResult {
        tessellate(&list.shapes, &list.paths, density, output)
    }

    /// Tessellates a single stroked path in thick mode.
    pub fn tessellate_path(
        &mut self,
        path: &Path,
        density: f32,
        output: &mut GeometryBuffers,
    ) -> TessellationResult {
        tessellate(&[], std::slice::from_ref(path), density, output)
    }

    /// Tessellates a single shape: thin-edge boundary plus filled interior.
    pub fn tessellate_shape(
        &mut self,
        shape: &Shape,
        density: f32,
        output: &mut GeometryBuffers,
    ) -> TessellationResult {
        tessellate(std::slice::from_ref(shape), &[], density, output)
    }
}

/// Builds the geometry of a shape list at the given tessellation density.
/// This is the sole data handoff to renderers.
pub fn create_geometry(
    list: &ShapeList,
    density: f32,
) -> Result<GeometryBuffers, TessellationError> {
    let mut output = GeometryBuffers::new();
    Tessellator::new().tessellate_shape_list(list, density, &mut output)?;
    Ok(output)
}

enum Item<'l> {
    Shape(&'l Shape),
    Path(&'l Path),
}

impl<'l> Item<'l> {
    fn z_order(&self) -> i32 {
        match self {
            Item::Shape(shape) => shape.z_order(),
            Item::Path(path) => path.z_order,
        }
    }
}

fn tessellate(
    shapes: &[Shape],
    paths: &[Path],
    density: f32,
    output: &mut GeometryBuffers,
) -> TessellationResult {
    let layout = compute_layout(shapes, paths);

    let mut items: Vec<Item> = shapes
        .iter()
        .map(Item::Shape)
        .chain(paths.iter().map(Item::Path))
        .collect();
    items.sort_by_key(Item::z_order);

    // Stats pass: exact totals, so the populate pass never reallocates.
    let mut total = Count::default();
    for item in &items {
        total = total
            + match item {
                Item::Path(path) => stroke::count_stroke(path, density),
                Item::Shape(shape) => count_shape(shape, density),
            };
    }
    if total.vertices > Index::MAX as u32 {
        return Err(GeometryBuilderError::TooManyVertices.into());
    }

    let mut vertices = vec![0.0; total.vertices as usize * layout.vertex_size()];
    let mut indices = vec![0 as Index; total.indices as usize];
    let mut cursors = Cursors::default();
    let mut corners: Vec<Corner> = Vec::new();
    let mut directions: Vec<Vector2> = Vec::new();

    for item in &items {
        match item {
            Item::Path(path) => stroke::populate_stroke(
                path,
                density,
                &layout,
                &mut vertices,
                &mut indices,
                &mut cursors,
                &mut corners,
                &mut directions,
            ),
            Item::Shape(shape) => populate_shape(
                shape,
                density,
                &layout,
                &mut vertices,
                &mut indices,
                &mut cursors,
                &mut corners,
            ),
        }
    }

    debug_assert_eq!(cursors.vertex, total.vertices as usize);
    debug_assert_eq!(cursors.index, total.indices as usize);

    output.vertices = vertices;
    output.indices = indices;
    output.layout = layout;
    Ok(total)
}

/// The union layout over every channel the list needs: position always,
/// offset vectors when any stroked path exists, plane coefficients when any
/// shape exists, then every named attribute at its maximum width, in first
/// appearance order.
fn compute_layout(shapes: &[Shape], paths: &[Path]) -> VertexLayout {
    let mut layout = VertexLayout::new();
    layout.add_channel(VERTEX_CHANNEL, 2);
    if !paths.is_empty() {
        layout.add_channel(VECTOR_CHANNEL, 2);
        // Collision and rendering both scale the offset vector by the
        // thickness, so thick buffers always carry the channel.
        layout.add_channel(THICKNESS_ATTRIBUTE, 1);
    }
    if !shapes.is_empty() {
        layout.add_channel(PLANE_CHANNEL, 3);
    }
    for shape in shapes {
        register_attributes(&mut layout, &shape.exterior);
        for hole in &shape.holes {
            register_attributes(&mut layout, hole);
        }
    }
    for path in paths {
        register_attributes(&mut layout, path);
    }
    layout
}

fn register_attributes(layout: &mut VertexLayout, path: &Path) {
    for command in path.commands() {
        for (name, value) in command.attributes().iter() {
            layout.add_channel(name, value.components());
        }
    }
}

/// Distinct boundary point counts of a path's closed runs.
fn loop_points(path: &Path, density: f32) -> Vec<usize> {
    path.subpaths()
        .map(|subpath| subpath.span_count(density))
        .collect()
}

fn count_shape(shape: &Shape, density: f32) -> Count {
    let mut count = stroke::count_edges(&shape.exterior, density);
    for hole in &shape.holes {
        count = count + stroke::count_edges(hole, density);
    }

    let hole_points: Vec<usize> = shape
        .holes
        .iter()
        .flat_map(|hole| loop_points(hole, density))
        .collect();
    let mut first = true;
    for points in loop_points(&shape.exterior, density) {
        if points < 3 {
            continue;
        }
        let triangles = if first {
            first = false;
            fill::triangle_count(points, &hole_points)
        } else {
            points - 2
        };
        count.indices += (triangles * 3) as u32;
    }
    count
}

fn run_points(
    run: &EdgeRun,
    layout: &VertexLayout,
    vertices: &[f32],
) -> Vec<FillPoint> {
    let size = layout.vertex_size();
    (0..run.points)
        .map(|i| {
            let id = run.first_vertex + 2 * i as Index;
            let base = id as usize * size;
            FillPoint {
                position: vec2(vertices[base], vertices[base + 1]),
                id,
            }
        })
        .collect()
}

fn populate_shape<'l>(
    shape: &'l Shape,
    density: f32,
    layout: &VertexLayout,
    vertices: &mut [f32],
    indices: &mut [Index],
    cursors: &mut Cursors,
    corners: &mut Vec<Corner<'l>>,
) {
    let mut exterior_runs: Vec<EdgeRun> = Vec::new();
    stroke::populate_edges(
        &shape.exterior,
        density,
        layout,
        vertices,
        cursors,
        corners,
        &mut exterior_runs,
    );
    let mut hole_runs: Vec<EdgeRun> = Vec::new();
    for hole in &shape.holes {
        stroke::populate_edges(
            hole,
            density,
            layout,
            vertices,
            cursors,
            corners,
            &mut hole_runs,
        );
    }

    let hole_loops: Vec<Vec<FillPoint>> = hole_runs
        .iter()
        .map(|run| run_points(run, layout, vertices))
        .collect();

    let mut first = true;
    for run in &exterior_runs {
        if run.points < 3 {
            continue;
        }
        let boundary = run_points(run, layout, vertices);
        if first {
            first = false;
            fill::triangulate(&boundary, &hole_loops, indices, cursors);
        } else {
            fill::triangulate(&boundary, &[], indices, cursors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_path::ShapeList;

    fn square_list() -> ShapeList {
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
        list
    }

    #[test]
    fn square_geometry_has_two_triangles() {
        let geometry = create_geometry(&square_list(), DEFAULT_DENSITY).unwrap();
        assert_eq!(geometry.indices.len(), 6);
        assert_eq!(geometry.vertex_count(), 8);

        // The two triangles cover the square exactly.
        let mut area = 0.0;
        for triangle in geometry.indices.chunks(3) {
            let p: Vec<Vector2> = triangle
                .iter()
                .map(|&id| {
                    let v = geometry.vertex(id);
                    vec2(v[0], v[1])
                })
                .collect();
            let signed = (p[1] - p[0]).cross(p[2] - p[0]) * 0.5;
            assert!(signed > 0.0);
            area += signed;
        }
        assert!((area - 25.0).abs() < 1e-3);
    }

    #[test]
    fn layout_reports_channel_sizes() {
        let mut list = square_list();
        list.set_thickness(0.5)
            .set_attribute("glow", vec2(1.0, 0.0))
            .jump(20.0, 0.0)
            .pen_down(false)
            .advance(3.0)
            .pen_up(false);
        let geometry = create_geometry(&list, DEFAULT_DENSITY).unwrap();
        let channels: Vec<(String, usize)> = geometry
            .layout
            .channels()
            .map(|(name, components, _)| (name.to_string(), components))
            .collect();
        assert_eq!(
            channels,
            vec![
                (VERTEX_CHANNEL.to_string(), 2),
                (VECTOR_CHANNEL.to_string(), 2),
                (THICKNESS_ATTRIBUTE.to_string(), 1),
                (PLANE_CHANNEL.to_string(), 3),
                ("glow".to_string(), 2),
            ]
        );
    }

    #[test]
    fn z_order_controls_emission_order() {
        let mut list = ShapeList::new();
        list.set_z_order(5)
            .jump(0.0, 0.0)
            .pen_down(false)
            .advance(1.0)
            .pen_up(false);
        list.set_z_order(-1)
            .jump(10.0, 0.0)
            .pen_down(false)
            .advance(1.0)
            .pen_up(false);
        let geometry = create_geometry(&list, DEFAULT_DENSITY).unwrap();
        // The lower path emits first: its start is at x = 10.
        assert_eq!(geometry.vertex(0)[0], 10.0);
    }

    #[test]
    fn empty_list_is_empty_geometry() {
        let geometry = create_geometry(&ShapeList::new(), DEFAULT_DENSITY).unwrap();
        assert!(geometry.vertices.is_empty());
        assert!(geometry.indices.is_empty());
    }

    #[test]
    fn stats_and_populate_agree_on_arcs_and_curves() {
        let mut list = ShapeList::new();
        list.set_thickness(0.3)
            .jump(0.0, 0.0)
            .pen_down(false)
            .arc(std::f32::consts::PI * 1.5, 2.0)
            .curve(1.0, 0.5, 1.0, -0.5, 1.0)
            .advance(2.0)
            .pen_up(false);
        // Populating asserts the cursors land exactly on the stats totals
        // in debug builds.
        let geometry = create_geometry(&list, 10.0).unwrap();
        assert!(geometry.vertices.iter().all(|v| v.is_finite()));
        assert!(!geometry.indices.is_empty());
    }
}
