//! Tests for the ear-clipping triangulator.

use proptest::prelude::*;
use std::f32::consts::PI;

use crate::fill::{triangle_count, triangulate, FillPoint};
use crate::geometry_builder::{Cursors, Index};
use scrawl_math::{vec2, Vector2};

fn points(positions: &[Vector2]) -> Vec<FillPoint> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| FillPoint {
            position,
            id: i as Index,
        })
        .collect()
}

fn run(exterior: &[Vector2], holes: &[Vec<Vector2>]) -> Vec<Index> {
    let exterior_points = points(exterior);
    let mut next_id = exterior.len() as Index;
    let hole_points: Vec<Vec<FillPoint>> = holes
        .iter()
        .map(|hole| {
            hole.iter()
                .map(|&position| {
                    let id = next_id;
                    next_id += 1;
                    FillPoint { position, id }
                })
                .collect()
        })
        .collect();
    let hole_sizes: Vec<usize> = holes.iter().map(|h| h.len()).collect();
    let triangles = triangle_count(exterior.len(), &hole_sizes);
    let mut indices = vec![0 as Index; triangles * 3];
    let mut cursors = Cursors::default();
    triangulate(&exterior_points, &hole_points, &mut indices, &mut cursors);
    assert_eq!(cursors.index, indices.len());
    indices
}

fn position_of(exterior: &[Vector2], holes: &[Vec<Vector2>], id: Index) -> Vector2 {
    let mut id = id as usize;
    if id < exterior.len() {
        return exterior[id];
    }
    id -= exterior.len();
    for hole in holes {
        if id < hole.len() {
            return hole[id];
        }
        id -= hole.len();
    }
    panic!("index out of range");
}

fn triangle_area_sum(exterior: &[Vector2], holes: &[Vec<Vector2>], indices: &[Index]) -> f32 {
    indices
        .chunks(3)
        .map(|tri| {
            let a = position_of(exterior, holes, tri[0]);
            let b = position_of(exterior, holes, tri[1]);
            let c = position_of(exterior, holes, tri[2]);
            (b - a).cross(c - a) * 0.5
        })
        .sum()
}

fn polygon_area(positions: &[Vector2]) -> f32 {
    let mut area = 0.0;
    for i in 0..positions.len() {
        area += positions[i].cross(positions[(i + 1) % positions.len()]);
    }
    (area * 0.5).abs()
}

#[test]
fn square_is_two_triangles() {
    let square = [
        vec2(0.0, 0.0),
        vec2(5.0, 0.0),
        vec2(5.0, 5.0),
        vec2(0.0, 5.0),
    ];
    let indices = run(&square, &[]);
    assert_eq!(indices.len(), 6);
    let area = triangle_area_sum(&square, &[], &indices);
    assert!((area - 25.0).abs() < 1e-3);
}

#[test]
fn concave_polygon_covers_its_area() {
    // An L shape: one reflex vertex.
    let l_shape = [
        vec2(0.0, 0.0),
        vec2(4.0, 0.0),
        vec2(4.0, 2.0),
        vec2(2.0, 2.0),
        vec2(2.0, 4.0),
        vec2(0.0, 4.0),
    ];
    let indices = run(&l_shape, &[]);
    assert_eq!(indices.len(), (l_shape.len() - 2) * 3);
    for tri in indices.chunks(3) {
        let a = position_of(&l_shape, &[], tri[0]);
        let b = position_of(&l_shape, &[], tri[1]);
        let c = position_of(&l_shape, &[], tri[2]);
        assert!((b - a).cross(c - a) > 0.0, "non-positive triangle");
    }
    let area = triangle_area_sum(&l_shape, &[], &indices);
    assert!((area - 12.0).abs() < 1e-3);
}

#[test]
fn clockwise_input_is_reoriented() {
    let square = [
        vec2(0.0, 0.0),
        vec2(0.0, 5.0),
        vec2(5.0, 5.0),
        vec2(5.0, 0.0),
    ];
    let indices = run(&square, &[]);
    let area = triangle_area_sum(&square, &[], &indices);
    assert!((area - 25.0).abs() < 1e-3);
}

#[test]
fn hole_is_bridged_and_subtracted() {
    let outer = [
        vec2(0.0, 0.0),
        vec2(10.0, 0.0),
        vec2(10.0, 10.0),
        vec2(0.0, 10.0),
    ];
    let hole = vec![
        vec2(4.0, 4.0),
        vec2(6.0, 4.0),
        vec2(6.0, 6.0),
        vec2(4.0, 6.0),
    ];
    let holes = vec![hole];
    let indices = run(&outer, &holes);
    // The bridged walk has 4 + (4 + 2) entries.
    assert_eq!(indices.len(), (10 - 2) * 3);
    let area = triangle_area_sum(&outer, &holes, &indices);
    assert!((area - 96.0).abs() < 1e-2);
}

#[test]
fn degenerate_collinear_input_terminates() {
    let collinear = [
        vec2(0.0, 0.0),
        vec2(1.0, 0.0),
        vec2(2.0, 0.0),
        vec2(3.0, 0.0),
    ];
    // No valid ear exists; the relaxation schedule must still finish with
    // n - 2 (degenerate) triangles.
    let indices = run(&collinear, &[]);
    assert_eq!(indices.len(), 6);
}

#[test]
fn self_intersecting_input_terminates() {
    let bowtie = [
        vec2(0.0, 0.0),
        vec2(4.0, 4.0),
        vec2(4.0, 0.0),
        vec2(0.0, 4.0),
    ];
    let indices = run(&bowtie, &[]);
    assert_eq!(indices.len(), 6);
}

#[test]
fn too_few_points_yield_nothing() {
    assert_eq!(triangle_count(2, &[]), 0);
    let indices = run(&[vec2(0.0, 0.0), vec2(1.0, 0.0)], &[]);
    assert!(indices.is_empty());
}

proptest! {
    /// Any simple polygon triangulates into exactly n - 2 positive
    /// triangles whose areas sum to the polygon area. Random star-convex
    /// polygons (vertices at increasing angles around a center) are always
    /// simple.
    #[test]
    fn star_polygons_triangulate_exactly(
        n in 3usize..24,
        radii in proptest::collection::vec(0.5f32..5.0, 24),
        seed in 0.0f32..(2.0 * PI),
    ) {
        let positions: Vec<Vector2> = (0..n)
            .map(|i| {
                let angle = seed + i as f32 / n as f32 * 2.0 * PI;
                vec2(angle.cos(), angle.sin()) * radii[i]
            })
            .collect();
        let indices = run(&positions, &[]);
        prop_assert_eq!(indices.len(), (n - 2) * 3);
        for tri in indices.chunks(3) {
            let a = position_of(&positions, &[], tri[0]);
            let b = position_of(&positions, &[], tri[1]);
            let c = position_of(&positions, &[], tri[2]);
            prop_assert!((b - a).cross(c - a) >= -1e-4);
        }
        let area = triangle_area_sum(&positions, &[], &indices);
        let expected = polygon_area(&positions);
        prop_assert!((area - expected).abs() < expected.max(1.0) * 1e-3);
    }
}
