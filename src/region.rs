//! Regions: the areas of an image map as seen by the overlay.

use std::collections::HashMap;
use std::fmt;

use crate::error::GeometryWarning;
use crate::geometry::RegionShape;

/// Stable identity of a region: its position in map order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

impl RegionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area #{}", self.0)
    }
}

/// One `<area>` definition before it becomes a region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaDefinition {
    /// Raw `shape` attribute
    pub shape: String,
    /// Raw `coords` attribute, in natural image space
    pub coords: String,
    /// Every other attribute, by lower-cased name
    pub attributes: HashMap<String, String>,
}

impl AreaDefinition {
    pub fn new(shape: impl Into<String>, coords: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            coords: coords.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder helper to add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }
}

/// A selectable, hoverable shape of the image map.
///
/// Geometry is fixed for the region's lifetime. Attributes can change, which
/// is why disabled state and value keys are looked up on demand.
#[derive(Debug, Clone)]
pub struct Region {
    id: RegionId,
    shape: Result<RegionShape, GeometryWarning>,
    attributes: HashMap<String, String>,
    /// Coordinates used by the most recent redraw, in render space
    rendered_coords: Option<Vec<f32>>,
}

impl Region {
    pub fn new(id: RegionId, area: AreaDefinition) -> Self {
        Self {
            id,
            shape: RegionShape::parse(&area.shape, &area.coords),
            attributes: area.attributes,
            rendered_coords: None,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    /// The validated shape, or `None` if this region cannot be rendered.
    pub fn shape(&self) -> Option<&RegionShape> {
        self.shape.as_ref().ok()
    }

    /// Why this region cannot be rendered, if it cannot.
    pub fn geometry_warning(&self) -> Option<&GeometryWarning> {
        self.shape.as_ref().err()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_ascii_lowercase())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(&name.to_ascii_lowercase())
    }

    /// A region is disabled when it carries the disable marker attribute,
    /// whatever its value. No marker key means nothing is ever disabled.
    pub fn is_disabled(&self, disable_key: Option<&str>) -> bool {
        disable_key.is_some_and(|key| self.has_attribute(key))
    }

    /// Value reported for this region when it is selected.
    pub fn value(&self, value_key: Option<&str>) -> Option<&str> {
        value_key.and_then(|key| self.attribute(key))
    }

    pub fn rendered_coords(&self) -> Option<&[f32]> {
        self.rendered_coords.as_deref()
    }

    pub(crate) fn set_rendered_coords(&mut self, coords: Vec<f32>) {
        self.rendered_coords = Some(coords);
    }
}
