use crate::geometry_builder::Count;
use scrawl_path::PathError;

/// The tessellator's result type.
pub type TessellationResult = Result<Count, TessellationError>;

/// An error that can happen while populating geometry buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    TooManyVertices,
}

impl core::fmt::Display for GeometryBuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GeometryBuilderError::TooManyVertices => {
                write!(f, "Too many vertices")
            }
        }
    }
}

impl std::error::Error for GeometryBuilderError {}

/// The tessellator's error enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TessellationError {
    Path(PathError),
    GeometryBuilder(GeometryBuilderError),
}

impl core::fmt::Display for TessellationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TessellationError::Path(e) => {
                write!(f, "Path error: {}", e)
            }
            TessellationError::GeometryBuilder(e) => {
                write!(f, "Geometry builder error: {}", e)
            }
        }
    }
}

impl std::error::Error for TessellationError {}

impl core::convert::From<PathError> for TessellationError {
    fn from(value: PathError) -> Self {
        Self::Path(value)
    }
}

impl core::convert::From<GeometryBuilderError> for TessellationError {
    fn from(value: GeometryBuilderError) -> Self {
        Self::GeometryBuilder(value)
    }
}
