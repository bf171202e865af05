//! Global constants for pictarea

/// Default area attribute holding the value reported for a selected area.
pub const DEFAULT_VALUE_KEY: &str = "target";

/// Default area attribute marking an area as disabled.
pub const DEFAULT_DISABLE_KEY: &str = "disabled";

/// Default maximum number of simultaneously selected areas.
pub const DEFAULT_MAX_SELECTIONS: i64 = 1;

/// Minimum number of vertices for a polygon area.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Coordinates needed by a rectangle area (`x1,y1,x2,y2`).
pub const RECT_COORDS: usize = 4;

/// Coordinates needed by a circle area (`cx,cy,r`).
pub const CIRCLE_COORDS: usize = 3;

/// Default style bundles, as canvas CSS color strings.
pub mod style {
    pub const NORMAL_FILL: &str = "rgba(255,255,255,.4)";
    pub const NORMAL_STROKE: &str = "rgba(255,255,255,.8)";
    pub const NORMAL_LINE_WIDTH: f32 = 1.0;

    pub const HOVER_FILL: &str = "rgba(255,255,255,.6)";
    pub const HOVER_STROKE: &str = "#fff";
    pub const HOVER_LINE_WIDTH: f32 = 2.0;
    pub const HOVER_SHADOW: &str = "#fff";
    pub const HOVER_SHADOW_BLUR: f32 = 10.0;

    pub const ACTIVE_FILL: &str = "rgba(255,255,255,.8)";
    pub const ACTIVE_STROKE: &str = "#f00";
    pub const ACTIVE_LINE_WIDTH: f32 = 2.0;

    pub const DISABLED_FILL: &str = "rgba(0,0,0,.4)";
    pub const DISABLED_STROKE: &str = "transparent";
}
