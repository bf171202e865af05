//! Pictarea - interactive image map overlays
//!
//! Paints the areas of an HTML image map onto a canvas layered over the
//! image, with hover highlighting, bounded multi-selection and a derived
//! selection value.
//!
//! ```no_run
//! use pictarea::{ImageMap, PictareaController, PictareaOptions, RegionId};
//! use pictarea_render::RecordingSurface;
//!
//! let html = r##"<map name="m"><area shape="rect" coords="0,0,10,10" target="a"></map>"##;
//! let map = ImageMap::parse_html(html, "#m")?;
//! let mut overlay =
//!     PictareaController::new(&map, 20.0, RecordingSurface::new(10, 10), PictareaOptions::default())?;
//! overlay.activate(RegionId(0));
//! # Ok::<(), pictarea::PictareaError>(())
//! ```

pub mod callback;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod region;
pub mod registry;
pub mod scheduler;
pub mod selection;
pub mod source;
pub mod style;

pub use callback::{EventPayload, Listeners, PictareaEvent, Propagation};
pub use config::PictareaOptions;
pub use controller::PictareaController;
pub use error::{GeometryWarning, PictareaError, Result};
pub use geometry::{RegionShape, ScaleFactor, ShapeKind};
pub use region::{AreaDefinition, Region, RegionId};
pub use registry::PictareaRegistry;
pub use scheduler::{FrameHost, RedrawRequest, RenderScheduler};
pub use selection::{Selection, SelectionLimit, SelectionPolicy, SelectionValue, Toggle};
pub use source::ImageMap;
pub use style::{RegionState, StyleSet};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
