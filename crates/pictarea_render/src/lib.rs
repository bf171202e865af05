//! pictarea_render - drawing vocabulary for the pictarea overlay
//!
//! Colors, paths and paint styles plus the [`Surface`] trait every backend
//! implements. Two backends live here: [`RecordingSurface`], which keeps a
//! draw-command list, and [`RasterSurface`], which rasterizes on the CPU.

mod color;
mod error;
mod path;
mod raster;
mod style;
mod surface;

pub use color::Color;
pub use error::{RenderError, Result};
pub use path::{is_full_turn, Path, PathCommand, Point, Rect};
pub use raster::RasterSurface;
pub use style::{PaintStyle, StylePatch};
pub use surface::{DrawCommand, RecordingSurface, Surface};
