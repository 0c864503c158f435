//! Geometric queries over the scrawl editor's shape lists: collision
//! geometry for mouse interaction and conservative bounding boxes.

mod aabb;

pub use crate::aabb::fast_bounding_box;
pub use crate::hit_test::{CollisionGeometry, CollisionPath, CollisionPolygon};
