//! Paint styles: the subset of canvas context state used to paint a shape.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A fully resolved paint style.
///
/// `Default` mirrors a freshly created canvas 2D context: black fill and
/// stroke, one pixel lines, no shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStyle {
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f32,
    pub shadow_color: Color,
    pub shadow_blur: f32,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            shadow_color: Color::TRANSPARENT,
            shadow_blur: 0.0,
        }
    }
}

impl PaintStyle {
    /// Overwrite every property the patch sets.
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(fill) = patch.fill_style {
            self.fill = fill;
        }
        if let Some(stroke) = patch.stroke_style {
            self.stroke = stroke;
        }
        if let Some(width) = patch.line_width {
            self.line_width = width;
        }
        if let Some(color) = patch.shadow_color {
            self.shadow_color = color;
        }
        if let Some(blur) = patch.shadow_blur {
            self.shadow_blur = blur;
        }
    }

    /// Builder form of [`PaintStyle::apply`].
    pub fn with(mut self, patch: &StylePatch) -> Self {
        self.apply(patch);
        self
    }

    pub fn has_shadow(&self) -> bool {
        !self.shadow_color.is_transparent() && self.shadow_blur > 0.0
    }
}

/// A partial paint style. Field names serialize as canvas context property names.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f32>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill_style = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke_style = Some(color);
        self
    }

    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn shadow(mut self, color: Color, blur: f32) -> Self {
        self.shadow_color = Some(color);
        self.shadow_blur = Some(blur);
        self
    }

    /// Shallow property-wise merge: properties set in `over` win.
    pub fn merged(&self, over: &StylePatch) -> StylePatch {
        StylePatch {
            fill_style: over.fill_style.or(self.fill_style),
            stroke_style: over.stroke_style.or(self.stroke_style),
            line_width: over.line_width.or(self.line_width),
            shadow_color: over.shadow_color.or(self.shadow_color),
            shadow_blur: over.shadow_blur.or(self.shadow_blur),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StylePatch::default()
    }
}
