//! Ear-clipping triangulation of shape interiors.
//!
//! The triangulator consumes the distinct boundary points of a thin-edge
//! loop and emits `n - 2` triangles for `n` walk entries. Convex and reflex
//! vertices are tracked incrementally as ears are clipped. When no valid
//! ear exists (degenerate or self-intersecting boundaries), a relaxation
//! schedule keeps clipping anyway: two stalled passes accept a convex
//! vertex without the emptiness test, after which any reflex vertex is
//! accepted. Termination at exactly `n - 2` triangles is guaranteed; a
//! geometrically correct triangulation of malformed input is not, and the
//! algorithm does not try to repair it.

use scrawl_math::Vector2;

use crate::geometry_builder::{Cursors, Index};

/// Points strictly inside a clipping triangle block the ear; boundary
/// contact (bridge duplicates, collinear runs) does not.
const CONTAINMENT_EPSILON: f32 = 1e-6;

/// One boundary point: its position and its id in the vertex buffer.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FillPoint {
    pub position: Vector2,
    pub id: Index,
}

/// Walk entries of a triangulation: the exterior loop plus `len + 2` for
/// every bridged hole.
pub(crate) fn walk_len(exterior: usize, holes: &[usize]) -> usize {
    let mut len = exterior;
    for &hole in holes {
        if hole >= 3 {
            len += hole + 2;
        }
    }
    len
}

/// Number of triangles the triangulator will emit.
pub(crate) fn triangle_count(exterior: usize, holes: &[usize]) -> usize {
    if exterior < 3 {
        return 0;
    }
    walk_len(exterior, holes) - 2
}

fn signed_area(points: &[FillPoint]) -> f32 {
    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i].position;
        let b = points[(i + 1) % points.len()].position;
        area += a.cross(b);
    }
    area * 0.5
}

/// Splices `hole` into `walk` with a bridge edge: the hole's rightmost
/// vertex connects to a visible exterior vertex, duplicating both bridge
/// endpoints in the walk.
fn bridge_hole(walk: &mut Vec<FillPoint>, hole: &[FillPoint]) {
    let mut start = 0;
    for (i, p) in hole.iter().enumerate() {
        if p.position.x > hole[start].position.x {
            start = i;
        }
    }
    let anchor = hole[start].position;

    // Cast a ray toward +x and bridge to the nearest crossing edge's
    // right-hand endpoint; degenerate casts fall back to the nearest walk
    // vertex at or right of the anchor.
    let mut target = None;
    let mut best_x = f32::MAX;
    for i in 0..walk.len() {
        let a = walk[i].position;
        let b = walk[(i + 1) % walk.len()].position;
        if (a.y - anchor.y) * (b.y - anchor.y) > 0.0 {
            continue;
        }
        let dy = b.y - a.y;
        let hit_x = if dy.abs() < CONTAINMENT_EPSILON {
            a.x.max(b.x)
        } else {
            a.x + (anchor.y - a.y) / dy * (b.x - a.x)
        };
        if hit_x >= anchor.x - CONTAINMENT_EPSILON && hit_x < best_x {
            best_x = hit_x;
            target = Some(if a.x > b.x { i } else { (i + 1) % walk.len() });
        }
    }
    let target = target.unwrap_or_else(|| {
        let mut best = 0;
        let mut best_dist = f32::MAX;
        for (i, p) in walk.iter().enumerate() {
            let dist = p.position.distance(anchor);
            if p.position.x >= anchor.x && dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    });

    let mut spliced = Vec::with_capacity(walk.len() + hole.len() + 2);
    spliced.extend_from_slice(&walk[..=target]);
    for k in 0..=hole.len() {
        spliced.push(hole[(start + k) % hole.len()]);
    }
    spliced.push(walk[target]);
    spliced.extend_from_slice(&walk[target + 1..]);
    *walk = spliced;
}

struct Node {
    position: Vector2,
    id: Index,
    prev: usize,
    next: usize,
    convex: bool,
    alive: bool,
}

fn classify(nodes: &[Node], i: usize) -> bool {
    let prev = nodes[nodes[i].prev].position;
    let cur = nodes[i].position;
    let next = nodes[nodes[i].next].position;
    (cur - prev).cross(next - cur) > 0.0
}

fn triangle_contains(a: Vector2, b: Vector2, c: Vector2, p: Vector2) -> bool {
    (b - a).cross(p - a) > CONTAINMENT_EPSILON
        && (c - b).cross(p - b) > CONTAINMENT_EPSILON
        && (a - c).cross(p - c) > CONTAINMENT_EPSILON
}

fn is_ear(nodes: &[Node], i: usize) -> bool {
    if !nodes[i].convex {
        return false;
    }
    let a = nodes[nodes[i].prev].position;
    let b = nodes[i].position;
    let c = nodes[nodes[i].next].position;
    for (j, node) in nodes.iter().enumerate() {
        if !node.alive || j == i || j == nodes[i].prev || j == nodes[i].next {
            continue;
        }
        if triangle_contains(a, b, c, node.position) {
            return false;
        }
    }
    true
}

/// Triangulates `exterior` (with bridged `holes`) and writes the triangle
/// indices through `cursors`. The caller is responsible for sizing the
/// index buffer with [`triangle_count`].
pub(crate) fn triangulate(
    exterior: &[FillPoint],
    holes: &[Vec<FillPoint>],
    indices: &mut [Index],
    cursors: &mut Cursors,
) {
    if exterior.len() < 3 {
        return;
    }

    let mut walk: Vec<FillPoint> = exterior.to_vec();
    if signed_area(&walk) < 0.0 {
        walk.reverse();
    }

    let mut ordered: Vec<&Vec<FillPoint>> = holes.iter().filter(|h| h.len() >= 3).collect();
    ordered.sort_by(|a, b| {
        let ax = a.iter().map(|p| p.position.x).fold(f32::MIN, f32::max);
        let bx = b.iter().map(|p| p.position.x).fold(f32::MIN, f32::max);
        bx.partial_cmp(&ax).unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut oriented_hole = Vec::new();
    for hole in ordered {
        oriented_hole.clear();
        oriented_hole.extend_from_slice(hole);
        // Holes wind opposite to the exterior.
        if signed_area(&oriented_hole) > 0.0 {
            oriented_hole.reverse();
        }
        bridge_hole(&mut walk, &oriented_hole);
    }

    let n = walk.len();
    let mut nodes: Vec<Node> = walk
        .iter()
        .enumerate()
        .map(|(i, p)| Node {
            position: p.position,
            id: p.id,
            prev: (i + n - 1) % n,
            next: (i + 1) % n,
            convex: false,
            alive: true,
        })
        .collect();
    for i in 0..n {
        nodes[i].convex = classify(&nodes, i);
    }

    let mut remaining = n;
    let mut stalls = 0;
    while remaining > 3 {
        let mut chosen = None;
        for i in 0..n {
            if nodes[i].alive && is_ear(&nodes, i) {
                chosen = Some(i);
                break;
            }
        }
        match chosen {
            Some(_) => stalls = 0,
            None => {
                stalls += 1;
                let relaxed = if stalls <= 2 {
                    // Accept a convex vertex without the emptiness test.
                    (0..n).find(|&i| nodes[i].alive && nodes[i].convex)
                } else {
                    // Accept any reflex vertex; guarantees progress on
                    // malformed input.
                    (0..n).find(|&i| nodes[i].alive && !nodes[i].convex)
                };
                chosen = relaxed.or_else(|| (0..n).find(|&i| nodes[i].alive));
            }
        }
        let i = match chosen {
            Some(i) => i,
            None => return,
        };

        let prev = nodes[i].prev;
        let next = nodes[i].next;
        cursors.push_triangle(indices, nodes[prev].id, nodes[i].id, nodes[next].id);
        nodes[i].alive = false;
        nodes[prev].next = next;
        nodes[next].prev = prev;
        nodes[prev].convex = classify(&nodes, prev);
        nodes[next].convex = classify(&nodes, next);
        remaining -= 1;
    }

    // The final triangle.
    let first = match (0..n).find(|&i| nodes[i].alive) {
        Some(i) => i,
        None => return,
    };
    let second = nodes[first].next;
    let third = nodes[second].next;
    cursors.push_triangle(indices, nodes[first].id, nodes[second].id, nodes[third].id);
}
