//! Overlay instances keyed by the host element they are attached to.
//!
//! Attaching twice to the same element returns the existing overlay.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use pictarea_render::Surface;

use crate::controller::PictareaController;
use crate::error::Result;

pub struct PictareaRegistry<S: Surface> {
    instances: HashMap<String, PictareaController<S>>,
}

impl<S: Surface> Default for PictareaRegistry<S> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }
}

impl<S: Surface> PictareaRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the overlay attached to `key`, building it with `build` if there is none.
    ///
    /// `build` is not called when an overlay already exists. A failed build
    /// leaves the registry unchanged.
    pub fn attach<F>(&mut self, key: &str, build: F) -> Result<&mut PictareaController<S>>
    where
        F: FnOnce() -> Result<PictareaController<S>>,
    {
        match self.instances.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                log::debug!("Overlay already attached to {:?}", key);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let controller = build()?;
                Ok(entry.insert(controller))
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PictareaController<S>> {
        self.instances.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PictareaController<S>> {
        self.instances.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Make the overlay attached to `key` inert and forget it.
    pub fn destroy(&mut self, key: &str) -> Option<PictareaController<S>> {
        let mut controller = self.instances.remove(key)?;
        controller.destroy();
        Some(controller)
    }
}
