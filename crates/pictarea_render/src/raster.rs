//! CPU raster surface backed by tiny-skia.
//!
//! Shadows are not rasterized; everything else matches the canvas primitives.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::path::{is_full_turn, Path, PathCommand, Rect};
use crate::style::PaintStyle;
use crate::surface::Surface;

/// Segments used to flatten a partial arc.
const ARC_SEGMENTS_PER_TURN: f32 = 64.0;

pub struct RasterSurface {
    /// `None` while the surface is zero-sized
    pixmap: Option<Pixmap>,
    width: u32,
    height: u32,
    style: PaintStyle,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            width,
            height,
            style: PaintStyle::default(),
        }
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Premultiplied RGBA of one pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixel = self.pixmap.as_ref()?.pixel(x, y)?;
        Some([pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()])
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let pixmap = self.pixmap.as_ref().ok_or(RenderError::EmptySurface {
            width: self.width,
            height: self.height,
        })?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    fn paint(color: Color) -> Option<Paint<'static>> {
        if color.is_transparent() {
            return None;
        }
        let color = tiny_skia::Color::from_rgba(
            color.r.clamp(0.0, 1.0),
            color.g.clamp(0.0, 1.0),
            color.b.clamp(0.0, 1.0),
            color.a.clamp(0.0, 1.0),
        )?;
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        Some(paint)
    }
}

fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let mut has_current = false;

    for cmd in path.commands() {
        match cmd {
            PathCommand::MoveTo(p) => {
                pb.move_to(p.x, p.y);
                has_current = true;
            }
            PathCommand::LineTo(p) => {
                if has_current {
                    pb.line_to(p.x, p.y);
                } else {
                    pb.move_to(p.x, p.y);
                    has_current = true;
                }
            }
            PathCommand::Rect {
                x,
                y,
                width,
                height,
            } => {
                let r = Rect::from_signed(*x, *y, *width, *height);
                if let Some(rect) = tiny_skia::Rect::from_ltrb(r.x, r.y, r.right(), r.bottom()) {
                    pb.push_rect(rect);
                }
                has_current = false;
            }
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                if is_full_turn(*start_angle, *end_angle) {
                    pb.push_circle(center.x, center.y, *radius);
                    has_current = false;
                    continue;
                }
                let sweep = end_angle - start_angle;
                let steps = ((sweep.abs() / std::f32::consts::TAU) * ARC_SEGMENTS_PER_TURN)
                    .ceil()
                    .max(1.0) as usize;
                for i in 0..=steps {
                    let angle = start_angle + sweep * (i as f32 / steps as f32);
                    let x = center.x + radius * angle.cos();
                    let y = center.y + radius * angle.sin();
                    if has_current {
                        pb.line_to(x, y);
                    } else {
                        pb.move_to(x, y);
                        has_current = true;
                    }
                }
            }
            PathCommand::Close => {
                pb.close();
                has_current = false;
            }
        }
    }

    pb.finish()
}

impl Surface for RasterSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixmap = Pixmap::new(width, height);
        if self.pixmap.is_none() {
            log::debug!("Raster surface is empty at {}x{}", width, height);
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    fn set_style(&mut self, style: &PaintStyle) {
        self.style = *style;
    }

    fn fill(&mut self, path: &Path) {
        let (Some(pixmap), Some(paint)) = (self.pixmap.as_mut(), Self::paint(self.style.fill)) else {
            return;
        };
        if let Some(path) = to_skia_path(path) {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn stroke(&mut self, path: &Path) {
        if self.style.line_width <= 0.0 {
            return;
        }
        let (Some(pixmap), Some(paint)) = (self.pixmap.as_mut(), Self::paint(self.style.stroke)) else {
            return;
        };
        let stroke = Stroke {
            width: self.style.line_width,
            ..Stroke::default()
        };
        if let Some(path) = to_skia_path(path) {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}
