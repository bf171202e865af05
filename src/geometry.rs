//! Region geometry: shape parsing, coordinate scaling and path construction.
//!
//! Area coordinates are stored in the natural image's coordinate space. The
//! overlay canvas is usually displayed at a different size, so every
//! coordinate is divided by a [`ScaleFactor`] before a path is built.

use std::f32::consts::TAU;

use pictarea_render::{Path, Rect};

use crate::constants::{CIRCLE_COORDS, MIN_POLYGON_POINTS, RECT_COORDS};
use crate::error::GeometryWarning;

/// The shape of an image map area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// `x1,y1,x2,y2`
    Rectangle,
    /// `x1,y1,x2,y2,...,xn,yn`
    Polygon,
    /// `cx,cy,r`
    Circle,
}

impl ShapeKind {
    /// Parse an area `shape` attribute.
    ///
    /// Only the first four characters are significant and case is ignored,
    /// so `rect`, `RECTANGLE`, `poly`, `polygon`, `circ` and `circle` all work.
    pub fn parse(shape: &str) -> Result<Self, GeometryWarning> {
        let lower = shape.trim().to_ascii_lowercase();
        let prefix: String = lower.chars().take(4).collect();
        match prefix.as_str() {
            "rect" => Ok(ShapeKind::Rectangle),
            "poly" => Ok(ShapeKind::Polygon),
            "circ" => Ok(ShapeKind::Circle),
            _ => Err(GeometryWarning::UnknownShape(shape.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Circle => "Circle",
        }
    }

    /// Check that `coords` is usable for this shape.
    pub fn validate(&self, coords: &[f32]) -> Result<(), GeometryWarning> {
        let expected = match self {
            ShapeKind::Rectangle => RECT_COORDS,
            ShapeKind::Polygon => MIN_POLYGON_POINTS * 2,
            ShapeKind::Circle => CIRCLE_COORDS,
        };
        if coords.len() < expected {
            return Err(GeometryWarning::TooFewCoordinates {
                shape: self.name(),
                expected,
                found: coords.len(),
            });
        }
        match self {
            ShapeKind::Polygon if coords.len() % 2 != 0 => {
                Err(GeometryWarning::OddCoordinateCount(coords.len()))
            }
            ShapeKind::Circle if coords[2] < 0.0 => Err(GeometryWarning::NegativeRadius(coords[2])),
            _ => Ok(()),
        }
    }
}

/// Parse an area `coords` attribute. Commas and whitespace both separate values.
pub fn parse_coords(coords: &str) -> Result<Vec<f32>, GeometryWarning> {
    coords
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeometryWarning::InvalidNumber(s.to_string()))
        })
        .collect()
}

/// Ratio of natural image width to rendered canvas width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f32);

impl ScaleFactor {
    /// Returns `None` when either width is not a positive finite number.
    pub fn new(image_width: f32, canvas_width: f32) -> Option<Self> {
        let factor = image_width / canvas_width;
        (image_width > 0.0 && canvas_width > 0.0 && factor.is_finite()).then_some(Self(factor))
    }

    /// A factor of one: render coordinates equal image coordinates.
    pub fn identity() -> Self {
        Self(1.0)
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

/// Map image-space coordinates into render space.
pub fn normalize(raw: &[f32], factor: ScaleFactor) -> Vec<f32> {
    raw.iter().map(|c| c / factor.0).collect()
}

/// Build the drawable path for a shape in render space.
pub fn build_path(kind: ShapeKind, coords: &[f32]) -> Result<Path, GeometryWarning> {
    kind.validate(coords)?;

    let mut path = Path::new();
    match kind {
        ShapeKind::Rectangle => {
            path.rect(coords[0], coords[1], coords[2] - coords[0], coords[3] - coords[1]);
        }
        ShapeKind::Polygon => {
            path.move_to(coords[0], coords[1]);
            for pair in coords[2..].chunks_exact(2) {
                path.line_to(pair[0], pair[1]);
            }
        }
        ShapeKind::Circle => {
            path.arc(coords[0], coords[1], coords[2], 0.0, TAU);
        }
    }
    path.close();
    Ok(path)
}

/// A validated shape with its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    kind: ShapeKind,
    coords: Vec<f32>,
}

impl RegionShape {
    pub fn new(kind: ShapeKind, coords: Vec<f32>) -> Result<Self, GeometryWarning> {
        kind.validate(&coords)?;
        Ok(Self { kind, coords })
    }

    /// Parse `shape` and `coords` attribute values.
    pub fn parse(shape: &str, coords: &str) -> Result<Self, GeometryWarning> {
        let kind = ShapeKind::parse(shape)?;
        Self::new(kind, parse_coords(coords)?)
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    pub fn scaled(&self, factor: ScaleFactor) -> RegionShape {
        RegionShape {
            kind: self.kind,
            coords: normalize(&self.coords, factor),
        }
    }

    pub fn to_path(&self) -> Result<Path, GeometryWarning> {
        build_path(self.kind, &self.coords)
    }

    /// Axis-aligned bounds regardless of corner order.
    pub fn bounds(&self) -> Rect {
        let c = &self.coords;
        match self.kind {
            ShapeKind::Rectangle => Rect::from_signed(c[0], c[1], c[2] - c[0], c[3] - c[1]),
            ShapeKind::Circle => Rect::new(c[0] - c[2], c[1] - c[2], c[2] * 2.0, c[2] * 2.0),
            ShapeKind::Polygon => {
                let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
                let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
                for p in c.chunks_exact(2) {
                    min_x = min_x.min(p[0]);
                    min_y = min_y.min(p[1]);
                    max_x = max_x.max(p[0]);
                    max_y = max_y.max(p[1]);
                }
                Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }

    /// Check if a point is inside this shape (edges included for rectangles and circles).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let c = &self.coords;
        match self.kind {
            ShapeKind::Rectangle => {
                let b = self.bounds();
                x >= b.x && x <= b.right() && y >= b.y && y <= b.bottom()
            }
            ShapeKind::Circle => {
                let dx = x - c[0];
                let dy = y - c[1];
                dx * dx + dy * dy <= c[2] * c[2]
            }
            ShapeKind::Polygon => {
                // Ray casting
                let vertices: Vec<(f32, f32)> = c.chunks_exact(2).map(|p| (p[0], p[1])).collect();
                let mut inside = false;
                let mut j = vertices.len() - 1;
                for i in 0..vertices.len() {
                    let (xi, yi) = vertices[i];
                    let (xj, yj) = vertices[j];
                    if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
                        inside = !inside;
                    }
                    j = i;
                }
                inside
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pictarea_render::{PathCommand, Point};

    #[test]
    fn test_shape_kind_prefixes() {
        assert_eq!(ShapeKind::parse("rect").unwrap(), ShapeKind::Rectangle);
        assert_eq!(ShapeKind::parse("RECTANGLE").unwrap(), ShapeKind::Rectangle);
        assert_eq!(ShapeKind::parse("polygon").unwrap(), ShapeKind::Polygon);
        assert_eq!(ShapeKind::parse("Circle").unwrap(), ShapeKind::Circle);
        assert_eq!(
            ShapeKind::parse("default"),
            Err(GeometryWarning::UnknownShape("default".to_string()))
        );
    }

    #[test]
    fn test_parse_coords_separators() {
        assert_eq!(parse_coords("1,2, 3 ,4").unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(parse_coords("1.5 2.5 3").unwrap(), vec![1.5, 2.5, 3.0]);
        assert_eq!(parse_coords("").unwrap(), Vec::<f32>::new());
        assert_eq!(
            parse_coords("1,x,3"),
            Err(GeometryWarning::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn test_scale_factor() {
        let f = ScaleFactor::new(1000.0, 500.0).unwrap();
        assert_eq!(f.value(), 2.0);
        assert_eq!(normalize(&[100.0, 50.0, 7.0], f), vec![50.0, 25.0, 3.5]);

        assert!(ScaleFactor::new(1000.0, 0.0).is_none());
        assert!(ScaleFactor::new(0.0, 500.0).is_none());
        assert_eq!(ScaleFactor::identity().value(), 1.0);
    }

    #[test]
    fn test_rectangle_path_keeps_signed_extents() {
        let path = build_path(ShapeKind::Rectangle, &[50.0, 60.0, 10.0, 20.0]).unwrap();
        assert_eq!(
            path.commands()[0],
            PathCommand::Rect {
                x: 50.0,
                y: 60.0,
                width: -40.0,
                height: -40.0
            }
        );
        assert!(path.is_closed());
    }

    #[test]
    fn test_rectangle_corner_order_is_irrelevant() {
        let cases = [
            ([10.0, 20.0, 50.0, 60.0], [50.0, 60.0, 10.0, 20.0]),
            ([0.0, 0.0, 3.0, 7.0], [3.0, 7.0, 0.0, 0.0]),
            ([5.0, 9.0, 1.0, 2.0], [1.0, 2.0, 5.0, 9.0]),
        ];
        for (a, b) in cases {
            let pa = build_path(ShapeKind::Rectangle, &a).unwrap();
            let pb = build_path(ShapeKind::Rectangle, &b).unwrap();
            assert_eq!(pa.bounds(), pb.bounds());

            let sa = RegionShape::new(ShapeKind::Rectangle, a.to_vec()).unwrap();
            let sb = RegionShape::new(ShapeKind::Rectangle, b.to_vec()).unwrap();
            assert_eq!(sa.bounds(), sb.bounds());
        }
    }

    #[test]
    fn test_polygon_path_visits_points_in_order() {
        for n in 3..8 {
            let coords: Vec<f32> = (0..n).flat_map(|i| [i as f32 * 10.0, (i * i) as f32]).collect();
            let path = build_path(ShapeKind::Polygon, &coords).unwrap();

            let expected: Vec<Point> = coords.chunks(2).map(|p| Point::new(p[0], p[1])).collect();
            assert_eq!(path.vertices(), expected);
            assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
            assert!(path.is_closed());
        }
    }

    #[test]
    fn test_polygon_validation() {
        assert_eq!(
            build_path(ShapeKind::Polygon, &[0.0, 0.0, 1.0, 1.0]),
            Err(GeometryWarning::TooFewCoordinates {
                shape: "Polygon",
                expected: 6,
                found: 4
            })
        );
        assert_eq!(
            build_path(ShapeKind::Polygon, &[0.0, 0.0, 1.0, 1.0, 2.0, 0.0, 5.0]),
            Err(GeometryWarning::OddCoordinateCount(7))
        );
    }

    #[test]
    fn test_circle_path_is_full_arc() {
        let path = build_path(ShapeKind::Circle, &[10.0, 20.0, 5.0]).unwrap();
        match &path.commands()[0] {
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                assert_eq!(*center, Point::new(10.0, 20.0));
                assert_eq!(*radius, 5.0);
                assert_eq!(*start_angle, 0.0);
                assert!((end_angle - TAU).abs() < 1e-6);
            }
            other => panic!("expected arc, got {:?}", other),
        }
        assert_eq!(
            build_path(ShapeKind::Circle, &[1.0, 1.0, -1.0]),
            Err(GeometryWarning::NegativeRadius(-1.0))
        );
    }

    #[test]
    fn test_scaled_shape() {
        let shape = RegionShape::parse("circle", "100,100,50").unwrap();
        let scaled = shape.scaled(ScaleFactor::new(800.0, 400.0).unwrap());
        assert_eq!(scaled.coords(), &[50.0, 50.0, 25.0]);
        assert_eq!(scaled.kind(), ShapeKind::Circle);
    }

    #[test]
    fn test_contains() {
        let rect = RegionShape::parse("rect", "50,50,10,10").unwrap();
        assert!(rect.contains(20.0, 30.0));
        assert!(!rect.contains(60.0, 30.0));

        let circle = RegionShape::parse("circ", "0,0,5").unwrap();
        assert!(circle.contains(3.0, 4.0));
        assert!(!circle.contains(4.0, 4.0));

        let triangle = RegionShape::parse("poly", "0,0,10,0,0,10").unwrap();
        assert!(triangle.contains(2.0, 2.0));
        assert!(!triangle.contains(8.0, 8.0));
    }
}
