//! Style resolution by region state.
//!
//! Precedence, highest first: disabled, active, hover, normal. A disabled
//! region gets the disabled bundle alone. Otherwise the bundles that apply
//! are merged left to right over `normal`, property by property.

use pictarea_render::{Color, PaintStyle, StylePatch};
use serde::{Deserialize, Serialize};

use crate::constants::style as defaults;
use crate::region::{Region, RegionId};
use crate::selection::Selection;

/// Visual state flags of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionState {
    pub disabled: bool,
    pub hovered: bool,
    pub selected: bool,
}

/// The four named style bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    #[serde(default = "default_normal")]
    pub normal: StylePatch,
    #[serde(default = "default_hover")]
    pub hover: StylePatch,
    #[serde(default = "default_active")]
    pub active: StylePatch,
    #[serde(default = "default_disabled")]
    pub disabled: StylePatch,
}

impl Default for StyleSet {
    fn default() -> Self {
        Self {
            normal: default_normal(),
            hover: default_hover(),
            active: default_active(),
            disabled: default_disabled(),
        }
    }
}

impl StyleSet {
    /// Merge the bundles that apply to `state`.
    pub fn resolve_patch(&self, state: RegionState) -> StylePatch {
        if state.disabled {
            return self.disabled;
        }
        let mut patch = self.normal;
        if state.hovered {
            patch = patch.merged(&self.hover);
        }
        if state.selected {
            patch = patch.merged(&self.active);
        }
        patch
    }

    /// Concrete paint style for `state`, starting from a fresh context.
    pub fn resolve(&self, state: RegionState) -> PaintStyle {
        PaintStyle::default().with(&self.resolve_patch(state))
    }

    /// Resolve the style of `region` given the current hover and selection.
    pub fn resolve_region(
        &self,
        region: &Region,
        disable_key: Option<&str>,
        hovered: Option<RegionId>,
        selection: &Selection,
    ) -> PaintStyle {
        self.resolve(RegionState {
            disabled: region.is_disabled(disable_key),
            hovered: hovered == Some(region.id()),
            selected: selection.contains(region.id()),
        })
    }
}

fn color(css: &str) -> Color {
    // Built-in defaults are known-good literals
    css.parse().unwrap_or(Color::TRANSPARENT)
}

fn default_normal() -> StylePatch {
    StylePatch::new()
        .fill(color(defaults::NORMAL_FILL))
        .stroke(color(defaults::NORMAL_STROKE))
        .line_width(defaults::NORMAL_LINE_WIDTH)
}

fn default_hover() -> StylePatch {
    StylePatch::new()
        .fill(color(defaults::HOVER_FILL))
        .stroke(color(defaults::HOVER_STROKE))
        .line_width(defaults::HOVER_LINE_WIDTH)
        .shadow(color(defaults::HOVER_SHADOW), defaults::HOVER_SHADOW_BLUR)
}

fn default_active() -> StylePatch {
    StylePatch::new()
        .fill(color(defaults::ACTIVE_FILL))
        .stroke(color(defaults::ACTIVE_STROKE))
        .line_width(defaults::ACTIVE_LINE_WIDTH)
}

fn default_disabled() -> StylePatch {
    StylePatch::new()
        .fill(color(defaults::DISABLED_FILL))
        .stroke(color(defaults::DISABLED_STROKE))
}
