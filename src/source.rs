//! Region source: the image map an overlay is attached to.
//!
//! Maps are read from HTML markup with quick-xml in a lenient mode: `<area>`
//! tags need not be closed and valueless attributes such as `disabled` are
//! accepted.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{PictareaError, Result};
use crate::region::{AreaDefinition, Region, RegionId};

/// A named image map and its areas in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMap {
    name: String,
    areas: Vec<AreaDefinition>,
}

impl ImageMap {
    pub fn new(name: impl Into<String>, areas: Vec<AreaDefinition>) -> Self {
        Self {
            name: name.into(),
            areas,
        }
    }

    /// Find the map referenced by an image's `usemap` attribute (`"#name"`).
    pub fn parse_html(html: &str, usemap: &str) -> Result<Self> {
        let name = usemap_name(usemap)?;

        let mut reader = Reader::from_str(html);
        reader.trim_text(true);
        reader.check_end_names(false);

        let mut in_map = false;
        let mut found = false;
        let mut areas = Vec::new();

        loop {
            // Only an opening tag has content; `<map/>` is an empty map
            let (tag, opens) = match reader.read_event()? {
                Event::Start(e) => (e, true),
                Event::Empty(e) => (e, false),
                Event::End(e) => {
                    if in_map && e.local_name().as_ref().eq_ignore_ascii_case(b"map") {
                        in_map = false;
                    }
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            if is_tag(&tag, b"map") && !found {
                if attribute(&tag, "name")?.as_deref() == Some(name) {
                    in_map = opens;
                    found = true;
                }
            } else if in_map && is_tag(&tag, b"area") {
                areas.push(area_definition(&tag)?);
            }
        }

        if !found {
            return Err(PictareaError::MissingMap(name.to_string()));
        }

        log::debug!("Parsed map {:?} with {} areas", name, areas.len());
        Ok(Self::new(name, areas))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn areas(&self) -> &[AreaDefinition] {
        &self.areas
    }

    /// Snapshot the areas as regions, identified by their position.
    pub fn regions(&self) -> Vec<Region> {
        self.areas
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, area)| Region::new(RegionId(i), area))
            .collect()
    }
}

fn usemap_name(usemap: &str) -> Result<&str> {
    usemap
        .trim()
        .strip_prefix('#')
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PictareaError::MissingUsemap(usemap.to_string()))
}

fn is_tag(e: &BytesStart<'_>, tag: &[u8]) -> bool {
    e.local_name().as_ref().eq_ignore_ascii_case(tag)
}

fn attribute(e: &BytesStart<'_>, wanted: &str) -> Result<Option<String>> {
    for (name, value) in attributes(e)? {
        if name == wanted {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// All attributes of a tag as lower-cased names and unescaped values.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.html_attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        // Unknown HTML entities are kept as written
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        out.push((name, value));
    }
    Ok(out)
}

fn area_definition(e: &BytesStart<'_>) -> Result<AreaDefinition> {
    let mut area = AreaDefinition::default();
    for (name, value) in attributes(e)? {
        match name.as_str() {
            "shape" => area.shape = value,
            "coords" => area.coords = value,
            _ => {
                area.attributes.insert(name, value);
            }
        }
    }
    if area.shape.is_empty() {
        // HTML's missing-value default
        area.shape = "rect".to_string();
    }
    Ok(area)
}
