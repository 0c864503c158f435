//! Shape and path tessellation for a browser-based 2D scene editor.
//!
//! This crate re-exports the member crates under short names:
//!
//! * [`math`]: vectors, planes, affine transforms, bounds.
//! * [`path`]: path commands, shapes and the turtle-graphics builder.
//! * [`tessellation`]: the two-pass tessellator, ear-clipping fill and the
//!   declarative shape catalog.
//! * [`algorithms`]: collision geometry and bounding boxes.

pub extern crate scrawl_algorithms;
pub extern crate scrawl_math;
pub extern crate scrawl_path;
pub extern crate scrawl_tessellation;

pub use scrawl_algorithms as algorithms;
pub use scrawl_math as math;
pub use scrawl_path as path;
pub use scrawl_tessellation as tessellation;
