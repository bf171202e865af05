use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Cannot allocate a {width}x{height} raster surface")]
    EmptySurface { width: u32, height: u32 },

    #[error("PNG encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
