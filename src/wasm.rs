//! Browser host: a 2D canvas surface, `requestAnimationFrame` redraw
//! scheduling and the JavaScript-facing overlay handle.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use pictarea_render::{PaintStyle, Path, PathCommand, Surface};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::callback::{PictareaEvent, Propagation};
use crate::config::PictareaOptions;
use crate::controller::PictareaController;
use crate::region::RegionId;
use crate::scheduler::FrameHost;
use crate::source::ImageMap;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"Pictarea: logger already initialized".into());
    }
}

/// A canvas element's 2D context as a drawing surface.
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn trace(&self, path: &Path) {
        let ctx = &self.context;
        ctx.begin_path();
        for cmd in path.commands() {
            match cmd {
                PathCommand::MoveTo(p) => ctx.move_to(p.x as f64, p.y as f64),
                PathCommand::LineTo(p) => ctx.line_to(p.x as f64, p.y as f64),
                PathCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                } => ctx.rect(*x as f64, *y as f64, *width as f64, *height as f64),
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    if let Err(e) = ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        *start_angle as f64,
                        *end_angle as f64,
                    ) {
                        log::warn!("Canvas arc failed: {:?}", e);
                    }
                }
                PathCommand::Close => ctx.close_path(),
            }
        }
    }
}

impl Surface for WebCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        // Assigning the size also resets the context, even when unchanged
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    /// The element's laid-out box; the backing store defaults to 300x150
    /// until the first redraw fits it.
    fn display_size(&self) -> (u32, u32) {
        let width = u32::try_from(self.canvas.offset_width()).unwrap_or(0);
        let height = u32::try_from(self.canvas.offset_height()).unwrap_or(0);
        (width, height)
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.context.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn set_style(&mut self, style: &PaintStyle) {
        let ctx = &self.context;
        ctx.set_fill_style_str(&style.fill.to_css());
        ctx.set_stroke_style_str(&style.stroke.to_css());
        ctx.set_line_width(style.line_width as f64);
        ctx.set_shadow_color(&style.shadow_color.to_css());
        ctx.set_shadow_blur(style.shadow_blur as f64);
    }

    fn fill(&mut self, path: &Path) {
        self.trace(path);
        self.context.fill();
    }

    fn stroke(&mut self, path: &Path) {
        self.trace(path);
        self.context.stroke();
    }
}

type SharedController = Rc<RefCell<PictareaController<WebCanvas>>>;

/// Delivers redraw frames through `window.requestAnimationFrame`.
struct AnimationFrameHost {
    target: Weak<RefCell<PictareaController<WebCanvas>>>,
}

impl FrameHost for AnimationFrameHost {
    fn request_frame(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let target = self.target.clone();
        let callback = Closure::once_into_js(move || {
            let Some(controller) = target.upgrade() else {
                return;
            };
            // Runs outside any controller call, so the borrow is free
            if let Ok(mut controller) = controller.try_borrow_mut() {
                controller.on_animation_frame();
            }
        });
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(_) => true,
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                false
            }
        }
    }
}

/// Overlay handle exported to JavaScript.
#[wasm_bindgen]
pub struct WebPictarea {
    inner: SharedController,
}

#[wasm_bindgen]
impl WebPictarea {
    /// Attach an overlay to `canvas` for the map named by `usemap` in `map_html`.
    ///
    /// `options` is a JSON string using the plugin option names.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        map_html: &str,
        usemap: &str,
        image_width: f32,
        options: Option<String>,
    ) -> Result<WebPictarea, JsValue> {
        let options = match options {
            Some(json) => PictareaOptions::from_json_str(&json).map_err(to_js)?,
            None => PictareaOptions::default(),
        };
        let map = ImageMap::parse_html(map_html, usemap).map_err(to_js)?;
        let surface = WebCanvas::new(canvas)?;
        let controller = PictareaController::new(&map, image_width, surface, options).map_err(to_js)?;

        let inner = Rc::new(RefCell::new(controller));
        let host = AnimationFrameHost {
            target: Rc::downgrade(&inner),
        };
        inner.borrow_mut().set_frame_host(Box::new(host));
        Ok(WebPictarea { inner })
    }

    /// Register a listener called as `listener(event)`, where `event` holds
    /// `type`, `area`, `key` and, for `change.pictarea`, `selection` and
    /// `value`. Returning `false` vetoes enter, leave and select notifications.
    ///
    /// Everything a listener needs is in `event`. Calls back into the overlay
    /// from inside a listener are rejected because it is mid-update.
    #[wasm_bindgen(js_name = addListener)]
    pub fn add_listener(&self, listener: js_sys::Function) {
        let Ok(mut inner) = self.write() else {
            return;
        };
        inner.on_event(move |event| {
            let payload = match event_object(event) {
                Ok(payload) => payload,
                Err(e) => {
                    log::error!("Could not build payload for {}: {:?}", event.name(), e);
                    return Propagation::Continue;
                }
            };
            match listener.call1(&JsValue::NULL, &payload) {
                Ok(result) if result.as_bool() == Some(false) => Propagation::Prevent,
                Ok(_) => Propagation::Continue,
                Err(e) => {
                    log::error!("Listener for {} threw: {:?}", event.name(), e);
                    Propagation::Continue
                }
            }
        });
    }

    #[wasm_bindgen(js_name = hoverEnter)]
    pub fn hover_enter(&self, index: usize) -> bool {
        self.write().is_ok_and(|mut inner| inner.hover_enter(RegionId(index)))
    }

    #[wasm_bindgen(js_name = hoverLeave)]
    pub fn hover_leave(&self, index: usize) -> bool {
        self.write().is_ok_and(|mut inner| inner.hover_leave(RegionId(index)))
    }

    pub fn activate(&self, index: usize) -> bool {
        self.write().is_ok_and(|mut inner| inner.activate(RegionId(index)))
    }

    /// Index of the area under a point in canvas coordinates, or -1.
    #[wasm_bindgen(js_name = areaAt)]
    pub fn area_at(&self, x: f32, y: f32) -> i32 {
        let Ok(inner) = self.read() else {
            return -1;
        };
        inner
            .region_at(x, y)
            .and_then(|id| i32::try_from(id.index()).ok())
            .unwrap_or(-1)
    }

    pub fn resize(&self, width: u32, height: u32) {
        if let Ok(mut inner) = self.write() {
            inner.resize(width, height);
        }
    }

    /// Measure the canvas element's laid-out box and resize to it.
    pub fn fit(&self) {
        let Ok(mut inner) = self.write() else {
            return;
        };
        let (width, height) = inner.surface().display_size();
        inner.resize(width, height);
    }

    pub fn redraw(&self) {
        if let Ok(mut inner) = self.write() {
            inner.redraw();
        }
    }

    /// The selection value as JSON: a key, `null`, or an array of keys.
    #[wasm_bindgen(js_name = valueJson)]
    pub fn value_json(&self) -> Result<String, JsValue> {
        let inner = self.read()?;
        serde_json::to_string(&inner.value()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Scaled coordinates of an area from the last redraw, for updating the
    /// live `<area>` element.
    #[wasm_bindgen(js_name = renderedCoords)]
    pub fn rendered_coords(&self, index: usize) -> Option<Vec<f32>> {
        let inner = self.read().ok()?;
        inner
            .region(RegionId(index))
            .and_then(|r| r.rendered_coords())
            .map(<[f32]>::to_vec)
    }

    #[wasm_bindgen(js_name = setAreaAttribute)]
    pub fn set_area_attribute(&self, index: usize, name: &str, value: &str) -> bool {
        self.write()
            .is_ok_and(|mut inner| inner.set_region_attribute(RegionId(index), name, value))
    }

    #[wasm_bindgen(js_name = removeAreaAttribute)]
    pub fn remove_area_attribute(&self, index: usize, name: &str) -> bool {
        self.write()
            .is_ok_and(|mut inner| inner.remove_region_attribute(RegionId(index), name))
    }

    pub fn destroy(&self) {
        if let Ok(mut inner) = self.write() {
            inner.destroy();
        }
    }

    #[wasm_bindgen(js_name = isDestroyed)]
    pub fn is_destroyed(&self) -> Result<bool, JsValue> {
        Ok(self.read()?.is_destroyed())
    }
}

impl WebPictarea {
    fn read(&self) -> Result<Ref<'_, PictareaController<WebCanvas>>, JsValue> {
        self.inner.try_borrow().map_err(|_| busy())
    }

    fn write(&self) -> Result<RefMut<'_, PictareaController<WebCanvas>>, JsValue> {
        self.inner.try_borrow_mut().map_err(|_| {
            log::warn!("Overlay called back into while dispatching an event");
            busy()
        })
    }
}

fn busy() -> JsValue {
    JsValue::from_str("Overlay is busy dispatching an event")
}

/// The event payload as a plain JS object.
fn event_object(event: &PictareaEvent<'_>) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(&event.payload()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn to_js(e: crate::error::PictareaError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
