//! Drawable paths, modelled on the canvas 2D path API.

use std::f32::consts::TAU;

/// A 2D point in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle from an origin and signed extents, flipped so width/height are positive.
    pub fn from_signed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: x.min(x + width),
            y: y.min(y + height),
            width: width.abs(),
            height: height.abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// A closed rectangle sub-path. Width and height keep their sign,
    /// the way `CanvasRenderingContext2D.rect` accepts them.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Arc around `center`, angles in radians, clockwise.
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Close,
}

/// An ordered list of path commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.commands.push(PathCommand::Rect {
            x,
            y,
            width,
            height,
        });
        self
    }

    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) -> &mut Self {
        self.commands.push(PathCommand::Arc {
            center: Point::new(cx, cy),
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether the last command closes the current sub-path.
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Vertices visited by move/line commands, in order.
    pub fn vertices(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Smallest rectangle containing every command's extent.
    pub fn bounds(&self) -> Option<Rect> {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        let mut include = |x: f32, y: f32| {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        };

        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => include(p.x, p.y),
                PathCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                } => {
                    include(*x, *y);
                    include(x + width, y + height);
                }
                // Partial arcs are bounded by their full circle
                PathCommand::Arc { center, radius, .. } => {
                    include(center.x - radius, center.y - radius);
                    include(center.x + radius, center.y + radius);
                }
                PathCommand::Close => {}
            }
        }

        if min_x > max_x {
            return None;
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Whether an arc sweeps a full turn.
pub fn is_full_turn(start_angle: f32, end_angle: f32) -> bool {
    (end_angle - start_angle).abs() >= TAU - 1e-4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_signed_extents() {
        let r = Rect::from_signed(50.0, 60.0, -40.0, -40.0);
        assert_eq!(r, Rect::new(10.0, 20.0, 40.0, 40.0));
    }

    #[test]
    fn test_path_vertices_and_close() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0).close();

        assert!(path.is_closed());
        assert_eq!(
            path.vertices(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0)
            ]
        );
    }

    #[test]
    fn test_bounds_with_negative_rect() {
        let mut path = Path::new();
        path.rect(50.0, 60.0, -40.0, -40.0);
        assert_eq!(path.bounds(), Some(Rect::new(10.0, 20.0, 40.0, 40.0)));
    }

    #[test]
    fn test_bounds_of_circle() {
        let mut path = Path::new();
        path.arc(10.0, 10.0, 5.0, 0.0, TAU);
        assert_eq!(path.bounds(), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(is_full_turn(0.0, TAU));
        assert!(!is_full_turn(0.0, 1.0));
    }

    #[test]
    fn test_empty_path_has_no_bounds() {
        assert!(Path::new().bounds().is_none());
    }
}
