//! Path, shape and turtle-graphics builder types for the scrawl editor core.
//!
//! A [`Path`] is an ordered list of drawing commands with per-command named
//! attributes; a [`Shape`] is a closed path with optional holes, describing a
//! fillable region; a [`ShapeList`] assembles both from relative turtle
//! motion commands. The tessellation and collision crates consume paths
//! through the shared division walker ([`Subpath::for_each_division`]), so
//! rendering and hit-testing always agree on the generated geometry.

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod attribute;
mod builder;
mod path;

pub use crate::attribute::{AttributeValue, Attributes};
pub use crate::builder::ShapeList;
pub use crate::path::{Path, PathCommand, PathError, Shape, Subpath, Subpaths};

/// Stroke thickness applied when a command carries no `thickness` attribute.
pub const DEFAULT_THICKNESS: f32 = 0.2;

/// Name of the attribute holding the stroke thickness.
pub const THICKNESS_ATTRIBUTE: &str = "thickness";
