use crate::path::Path;
use crate::style::PaintStyle;

/// A drawing target sized to the overlay's display box.
///
/// The primitives follow a canvas 2D context: style state is set first,
/// then the path is filled and/or stroked with it.
pub trait Surface {
    /// Resize the backing store. Resizing discards previous content.
    fn resize(&mut self, width: u32, height: u32);

    /// Current backing store size in pixels.
    fn size(&self) -> (u32, u32);

    /// Size the surface is laid out at. The backing store is fitted to it
    /// on every redraw, so the two only differ before the first one.
    fn display_size(&self) -> (u32, u32) {
        self.size()
    }

    /// Clear everything to transparent.
    fn clear(&mut self);

    /// Replace the current paint state.
    fn set_style(&mut self, style: &PaintStyle);

    fn fill(&mut self, path: &Path);

    fn stroke(&mut self, path: &Path);
}

/// A draw command captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Clear,
    SetStyle(PaintStyle),
    Fill(Path),
    Stroke(Path),
}

/// A surface that records commands instead of producing pixels.
///
/// Used by tests and by hosts that replay the command list into their
/// own renderer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of clears recorded, i.e. full redraws.
    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    /// Commands recorded since the most recent clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    /// The style used for each fill of the most recent frame, in paint order.
    pub fn last_frame_fills(&self) -> Vec<(PaintStyle, Path)> {
        let mut current = PaintStyle::default();
        let mut fills = Vec::new();
        for cmd in self.last_frame() {
            match cmd {
                DrawCommand::SetStyle(style) => current = *style,
                DrawCommand::Fill(path) => fills.push((current, path.clone())),
                _ => {}
            }
        }
        fills
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_style(&mut self, style: &PaintStyle) {
        self.commands.push(DrawCommand::SetStyle(*style));
    }

    fn fill(&mut self, path: &Path) {
        self.commands.push(DrawCommand::Fill(path.clone()));
    }

    fn stroke(&mut self, path: &Path) {
        self.commands.push(DrawCommand::Stroke(path.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_recording_surface_frames() {
        let mut surface = RecordingSurface::new(10, 10);
        let mut path = Path::new();
        path.rect(0.0, 0.0, 5.0, 5.0);

        surface.clear();
        surface.fill(&path);
        surface.clear();
        let style = PaintStyle {
            fill: Color::RED,
            ..PaintStyle::default()
        };
        surface.set_style(&style);
        surface.fill(&path);
        surface.stroke(&path);

        assert_eq!(surface.clear_count(), 2);
        assert_eq!(surface.last_frame().len(), 3);
        let fills = surface.last_frame_fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].0.fill, Color::RED);
    }

    #[test]
    fn test_resize_updates_size() {
        let mut surface = RecordingSurface::default();
        surface.resize(320, 200);
        assert_eq!(surface.size(), (320, 200));
        assert_eq!(surface.display_size(), (320, 200));
        assert_eq!(surface.take_commands().len(), 1);
        assert!(surface.commands().is_empty());
    }
}
