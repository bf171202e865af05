//! The overlay controller.
//!
//! Owns hover and selection state for one image map, reacts to pointer
//! events forwarded by the host and repaints the whole overlay from current
//! state whenever that state changes.

use pictarea_render::Surface;
use web_time::Instant;

use crate::callback::{Listeners, PictareaEvent, Propagation};
use crate::config::PictareaOptions;
use crate::error::{PictareaError, Result};
use crate::geometry::ScaleFactor;
use crate::region::{Region, RegionId};
use crate::scheduler::{FrameHost, RedrawRequest, RenderScheduler};
use crate::selection::{Selection, SelectionPolicy, SelectionValue, Toggle};
use crate::source::ImageMap;

pub struct PictareaController<S: Surface> {
    options: PictareaOptions,
    policy: SelectionPolicy,
    /// Natural width of the image the map coordinates refer to
    image_width: f32,
    regions: Vec<Region>,
    surface: S,
    /// Current display box of the overlay
    display: (u32, u32),
    hovered: Option<RegionId>,
    selection: Selection,
    value: Option<SelectionValue>,
    scheduler: RenderScheduler,
    listeners: Listeners,
    destroyed: bool,
}

impl<S: Surface> PictareaController<S> {
    /// Attach an overlay to `map` and paint it once.
    ///
    /// The overlay's display box starts at the surface's display size.
    pub fn new(map: &ImageMap, image_width: f32, surface: S, options: PictareaOptions) -> Result<Self> {
        if !(image_width.is_finite() && image_width > 0.0) {
            return Err(PictareaError::InvalidImageWidth(image_width));
        }

        let regions = map.regions();
        for region in &regions {
            if let Some(warning) = region.geometry_warning() {
                log::warn!("Map {:?}, {} will not be drawn: {}", map.name(), region.id(), warning);
            }
        }
        if regions.is_empty() {
            log::warn!("Map {:?} has no areas", map.name());
        }

        let policy = options.selection_policy();
        let display = surface.display_size();
        let mut controller = Self {
            options,
            policy,
            image_width,
            regions,
            surface,
            display,
            hovered: None,
            selection: Selection::new(),
            value: None,
            scheduler: RenderScheduler::immediate(),
            listeners: Listeners::new(),
            destroyed: false,
        };
        controller.value = controller
            .policy
            .derive_value(&controller.selection, &controller.regions);

        log::info!(
            "Attached overlay to map {:?} ({} regions, image width {})",
            map.name(),
            controller.regions.len(),
            image_width
        );
        controller.redraw();
        Ok(controller)
    }

    /// Use `host` to coalesce scheduled redraws into display frames.
    pub fn set_frame_host(&mut self, host: Box<dyn FrameHost>) {
        self.scheduler.set_host(host);
    }

    /// Register a notification listener.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&PictareaEvent<'_>) -> Propagation + 'static,
    {
        self.listeners.push(listener);
    }

    // =========================================================================
    // Pointer events
    // =========================================================================

    /// The pointer entered `id`. Returns whether hover state changed.
    pub fn hover_enter(&mut self, id: RegionId) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(region) = self.regions.get(id.index()) else {
            log::warn!("hover_enter on unknown {}", id);
            return false;
        };
        if self.listeners.emit(&PictareaEvent::EnterArea { region }) == Propagation::Prevent {
            return false;
        }

        self.hovered = Some(id);
        self.redraw();
        true
    }

    /// The pointer left `id`. Returns whether hover state changed.
    pub fn hover_leave(&mut self, id: RegionId) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(region) = self.regions.get(id.index()) else {
            log::warn!("hover_leave on unknown {}", id);
            return false;
        };
        if self.listeners.emit(&PictareaEvent::LeaveArea { region }) == Propagation::Prevent {
            return false;
        }

        self.hovered = None;
        self.redraw();
        true
    }

    /// `id` was clicked or tapped. Returns whether the activation went through.
    pub fn activate(&mut self, id: RegionId) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(region) = self.regions.get(id.index()) else {
            log::warn!("activate on unknown {}", id);
            return false;
        };
        if region.is_disabled(self.policy.disable_key.as_deref()) {
            log::debug!("Ignoring activation of disabled {}", id);
            return false;
        }

        let key = region.value(self.policy.value_key.as_deref());
        if self.listeners.emit(&PictareaEvent::SelectArea { region, key }) == Propagation::Prevent {
            return false;
        }

        match self.selection.toggle(region, &self.policy) {
            Toggle::Rejected => return false,
            Toggle::Added { evicted } => {
                log::debug!("Selected {} (evicted {:?})", id, evicted);
            }
            Toggle::Removed => log::debug!("Deselected {}", id),
        }
        self.value = self.policy.derive_value(&self.selection, &self.regions);

        self.redraw();

        let region = &self.regions[id.index()];
        self.listeners.emit(&PictareaEvent::Change {
            region,
            selection: self.selection.ids(),
            value: self.value.as_ref(),
        });
        true
    }

    /// Hit-test a point in display coordinates against the last rendered
    /// geometry. The first matching region in map order wins.
    pub fn region_at(&self, x: f32, y: f32) -> Option<RegionId> {
        let factor = self.scale_factor()?;
        self.regions
            .iter()
            .find(|region| {
                region
                    .shape()
                    .is_some_and(|shape| shape.scaled(factor).contains(x, y))
            })
            .map(Region::id)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// The overlay's display box changed.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }
        self.display = (width, height);
        if self.options.rescale_on_resize {
            self.schedule_redraw();
        }
    }

    /// Request a redraw, coalesced to one per display frame.
    pub fn schedule_redraw(&mut self) -> RedrawRequest {
        let request = self.scheduler.request_redraw();
        if request == RedrawRequest::Immediate {
            self.redraw();
        }
        request
    }

    /// Frame callback for the [`FrameHost`]. Runs the pending redraw, if any.
    pub fn on_animation_frame(&mut self) -> bool {
        if !self.scheduler.take_frame() {
            return false;
        }
        self.redraw();
        true
    }

    /// Repaint every region from current state.
    pub fn redraw(&mut self) {
        if self.destroyed {
            return;
        }
        let started = Instant::now();
        let (width, height) = self.display;
        self.surface.resize(width, height);
        self.surface.clear();

        let Some(factor) = ScaleFactor::new(self.image_width, width as f32) else {
            log::debug!("Overlay has no width, nothing drawn");
            return;
        };

        let disable_key = self.policy.disable_key.as_deref();
        let mut painted = 0;
        for region in &mut self.regions {
            let Some(shape) = region.shape() else {
                continue;
            };
            let scaled = shape.scaled(factor);
            let path = match scaled.to_path() {
                Ok(path) => path,
                Err(warning) => {
                    log::trace!("Skipping {}: {}", region.id(), warning);
                    continue;
                }
            };

            let style = self.options.styles.resolve_region(
                region,
                disable_key,
                self.hovered,
                &self.selection,
            );
            self.surface.set_style(&style);
            self.surface.fill(&path);
            self.surface.stroke(&path);

            region.set_rendered_coords(scaled.coords().to_vec());
            painted += 1;
        }

        log::trace!(
            "Redrew {} regions at {}x{} (scale {:.3}) in {:?}",
            painted,
            width,
            height,
            factor.value(),
            started.elapsed()
        );
    }

    /// Make the overlay inert. Later events, resizes and frames are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.scheduler.destroy();
        self.listeners.clear();
        log::info!("Overlay destroyed");
    }

    // =========================================================================
    // Region attributes
    // =========================================================================

    /// Change an attribute of a region, e.g. to toggle its disable marker.
    /// Takes effect on the next redraw or activation.
    pub fn set_region_attribute(&mut self, id: RegionId, name: &str, value: &str) -> bool {
        match self.regions.get_mut(id.index()) {
            Some(region) => {
                region.set_attribute(name, value);
                true
            }
            None => false,
        }
    }

    pub fn remove_region_attribute(&mut self, id: RegionId, name: &str) -> bool {
        self.regions
            .get_mut(id.index())
            .is_some_and(|region| region.remove_attribute(name).is_some())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn hovered(&self) -> Option<RegionId> {
        self.hovered
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected regions, oldest first.
    pub fn selected_regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.regions.get(id.index()))
    }

    /// The derived selection value; `None` when no value key is configured.
    pub fn value(&self) -> Option<&SelectionValue> {
        self.value.as_ref()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    pub fn options(&self) -> &PictareaOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display
    }

    /// Current image-to-display scale, `None` while the overlay has no width.
    pub fn scale_factor(&self) -> Option<ScaleFactor> {
        ScaleFactor::new(self.image_width, self.display.0 as f32)
    }
}

impl<S: Surface> std::fmt::Debug for PictareaController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictareaController")
            .field("regions", &self.regions.len())
            .field("display", &self.display)
            .field("hovered", &self.hovered)
            .field("selection", &self.selection.ids())
            .field("value", &self.value)
            .field("scheduler", &self.scheduler)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
