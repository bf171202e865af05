//! Overlay options.
//!
//! Options serialize with the camelCase names used by the browser widget,
//! so an options object written for the browser can be loaded as-is:
//!
//! ```json
//! { "maxSelections": 2, "areaValueKey": "data-id", "hover": { "fillStyle": "#fff" } }
//! ```
//!
//! A style bundle that is given replaces the default bundle entirely.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DISABLE_KEY, DEFAULT_MAX_SELECTIONS, DEFAULT_VALUE_KEY};
use crate::error::Result;
use crate::selection::{SelectionLimit, SelectionPolicy};
use crate::style::StyleSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictareaOptions {
    /// normal / hover / active / disabled bundles
    #[serde(flatten)]
    pub styles: StyleSet,

    /// Area attribute whose value becomes the selection value
    #[serde(default = "default_value_key")]
    pub area_value_key: Option<String>,

    /// Area attribute marking an area as disabled
    #[serde(default = "default_disable_key")]
    pub area_disable_key: Option<String>,

    /// Maximum number of selected areas; negative means unlimited
    #[serde(default = "default_max_selections")]
    pub max_selections: i64,

    /// Schedule a redraw whenever the overlay is resized
    #[serde(default)]
    pub rescale_on_resize: bool,
}

fn default_value_key() -> Option<String> {
    Some(DEFAULT_VALUE_KEY.to_string())
}

fn default_disable_key() -> Option<String> {
    Some(DEFAULT_DISABLE_KEY.to_string())
}

fn default_max_selections() -> i64 {
    DEFAULT_MAX_SELECTIONS
}

impl Default for PictareaOptions {
    fn default() -> Self {
        Self {
            styles: StyleSet::default(),
            area_value_key: default_value_key(),
            area_disable_key: default_disable_key(),
            max_selections: default_max_selections(),
            rescale_on_resize: false,
        }
    }
}

impl PictareaOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The value key, treating an empty name as unset.
    pub fn value_key(&self) -> Option<&str> {
        self.area_value_key.as_deref().filter(|k| !k.is_empty())
    }

    /// The disable marker, treating an empty name as unset.
    pub fn disable_key(&self) -> Option<&str> {
        self.area_disable_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn selection_limit(&self) -> SelectionLimit {
        SelectionLimit::from_option(self.max_selections)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            limit: self.selection_limit(),
            disable_key: self.disable_key().map(str::to_string),
            value_key: self.value_key().map(str::to_string),
        }
    }
}
