//! Error types for overlay construction and region geometry.

use thiserror::Error;

/// Fatal configuration errors. Construction aborts and no overlay is produced.
#[derive(Debug, Error)]
pub enum PictareaError {
    #[error("The image has no usemap reference (expected \"#name\", got {0:?})")]
    MissingUsemap(String),

    #[error("No <map name=\"{0}\"> found")]
    MissingMap(String),

    #[error("Invalid natural image width: {0}")]
    InvalidImageWidth(f32),

    #[error("Markup error: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("Options error: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] pictarea_render::RenderError),
}

pub type Result<T> = std::result::Result<T, PictareaError>;

/// Non-fatal geometry problems. The region is skipped when rendering only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryWarning {
    #[error("Unknown shape {0:?}")]
    UnknownShape(String),

    #[error("Invalid coordinate {0:?}")]
    InvalidNumber(String),

    #[error("{shape} needs at least {expected} coordinates, got {found}")]
    TooFewCoordinates {
        shape: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Polygon needs an even number of coordinates, got {0}")]
    OddCoordinateCount(usize),

    #[error("Circle radius must not be negative, got {0}")]
    NegativeRadius(f32),
}
