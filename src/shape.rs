//! Per-cell mark geometry and the fills marks are painted with.

use resvg::tiny_skia::{
    self, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point, Rect,
    SpreadMode, Transform,
};

use crate::config::{DotStyle, EyeStyle, HexColor};

/// Corner radius of a rounded mark, relative to its size.
pub const ROUNDED_MARK_RATIO: f32 = 0.3;

// ============================================================================
// MarkShape
// ============================================================================

/// Every geometry a single mark can take.
///
/// Data modules use [`DotStyle`] and finder modules use [`EyeStyle`]; both
/// convert into this enum so drawing is one exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkShape {
    Square,
    Circle,
    Rounded,
    Diamond,
    Leaf,
}

impl From<DotStyle> for MarkShape {
    fn from(style: DotStyle) -> Self {
        match style {
            DotStyle::Square => Self::Square,
            DotStyle::Circle => Self::Circle,
            DotStyle::Rounded => Self::Rounded,
            DotStyle::Diamond => Self::Diamond,
        }
    }
}

impl From<EyeStyle> for MarkShape {
    fn from(style: EyeStyle) -> Self {
        match style {
            EyeStyle::Square => Self::Square,
            EyeStyle::Circle => Self::Circle,
            EyeStyle::Rounded => Self::Rounded,
            EyeStyle::Leaf => Self::Leaf,
        }
    }
}

// ============================================================================
// Fill
// ============================================================================

/// A linear gradient running from the surface origin to its far corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientField {
    pub start: HexColor,
    pub end: HexColor,
    pub width: f32,
    pub height: f32,
}

impl GradientField {
    pub fn new(start: HexColor, end: HexColor, width: f32, height: f32) -> Self {
        Self {
            start,
            end,
            width,
            height,
        }
    }

    /// Color of the field at `(x, y)`, projected onto the diagonal.
    pub fn sample(&self, x: f32, y: f32) -> HexColor {
        let len_sq = self.width * self.width + self.height * self.height;
        let t = if len_sq > 0.0 {
            ((x * self.width + y * self.height) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        HexColor::rgb(
            lerp(self.start.r, self.end.r),
            lerp(self.start.g, self.end.g),
            lerp(self.start.b, self.end.b),
        )
    }

    fn shader(&self) -> Option<tiny_skia::Shader<'static>> {
        LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(self.width, self.height),
            vec![
                GradientStop::new(0.0, self.start.to_skia()),
                GradientStop::new(1.0, self.end.to_skia()),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        )
    }
}

/// How marks are painted: one color, or one gradient shared by every mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(HexColor),
    Gradient(GradientField),
}

impl Fill {
    /// Builds the paint once so every mark samples the same field.
    pub fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.anti_alias = true;
        match self {
            Self::Solid(color) => paint.set_color(color.to_skia()),
            Self::Gradient(field) => match field.shader() {
                Some(shader) => paint.shader = shader,
                None => paint.set_color(field.start.to_skia()),
            },
        }
        paint
    }

    /// Color at `(x, y)` in surface coordinates.
    pub fn sample(&self, x: f32, y: f32) -> HexColor {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient(field) => field.sample(x, y),
        }
    }
}

// ============================================================================
// Drawing
// ============================================================================

/// Draws one mark in the box `(x, y, size, size)`.
///
/// Returns false if the box is degenerate and nothing was drawn.
pub fn draw_mark(
    surface: &mut Pixmap,
    x: f32,
    y: f32,
    size: f32,
    shape: MarkShape,
    paint: &Paint<'_>,
) -> bool {
    if size.is_nan() || size <= 0.0 {
        return false;
    }
    if shape == MarkShape::Square {
        let Some(rect) = Rect::from_xywh(x, y, size, size) else {
            return false;
        };
        surface.fill_rect(rect, paint, Transform::identity(), None);
        return true;
    }
    let Some(path) = mark_path(x, y, size, shape) else {
        return false;
    };
    surface.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    true
}

/// The outline of a mark. Square marks are returned as a plain rectangle.
pub fn mark_path(x: f32, y: f32, size: f32, shape: MarkShape) -> Option<Path> {
    let half = size / 2.0;
    match shape {
        MarkShape::Square => Rect::from_xywh(x, y, size, size).map(PathBuilder::from_rect),
        MarkShape::Circle => PathBuilder::from_circle(x + half, y + half, half),
        MarkShape::Rounded => rounded_rect_path(x, y, size, size, size * ROUNDED_MARK_RATIO),
        MarkShape::Diamond => {
            let mut pb = PathBuilder::new();
            pb.move_to(x + half, y);
            pb.line_to(x + size, y + half);
            pb.line_to(x + half, y + size);
            pb.line_to(x, y + half);
            pb.close();
            pb.finish()
        }
        MarkShape::Leaf => {
            let mut pb = PathBuilder::new();
            pb.move_to(x, y + size);
            pb.quad_to(x, y, x + half, y);
            pb.quad_to(x + size, y, x + size, y + size);
            pb.quad_to(x + half, y + half, x, y + size);
            pb.close();
            pb.finish()
        }
    }
}

/// A rectangle with quadratic corners of `radius`.
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + width - r, y);
    pb.quad_to(x + width, y, x + width, y + r);
    pb.line_to(x + width, y + height - r);
    pb.quad_to(x + width, y + height, x + width - r, y + height);
    pb.line_to(x + r, y + height);
    pb.quad_to(x, y + height, x, y + height - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: u32 = 40;

    fn draw(shape: MarkShape) -> Pixmap {
        let mut pixmap = Pixmap::new(SIZE, SIZE).unwrap();
        let paint = Fill::Solid(HexColor::BLACK).paint();
        assert!(draw_mark(&mut pixmap, 0.0, 0.0, SIZE as f32, shape, &paint));
        pixmap
    }

    fn alpha(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn square_fills_whole_box() {
        let p = draw(MarkShape::Square);
        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39), (20, 20)] {
            assert_eq!(alpha(&p, x, y), 255, "pixel ({x},{y})");
        }
    }

    #[test]
    fn circle_leaves_corners_empty() {
        let p = draw(MarkShape::Circle);
        assert_eq!(alpha(&p, 20, 20), 255);
        assert_eq!(alpha(&p, 0, 0), 0);
        assert_eq!(alpha(&p, 39, 39), 0);
        assert_eq!(alpha(&p, 20, 1), 255);
    }

    #[test]
    fn rounded_keeps_edges_but_trims_corners() {
        let p = draw(MarkShape::Rounded);
        assert_eq!(alpha(&p, 0, 0), 0);
        assert_eq!(alpha(&p, 20, 0), 255);
        assert_eq!(alpha(&p, 0, 20), 255);
    }

    #[test]
    fn diamond_touches_edge_midpoints() {
        let p = draw(MarkShape::Diamond);
        assert_eq!(alpha(&p, 20, 20), 255);
        assert_eq!(alpha(&p, 19, 2), 255);
        assert_eq!(alpha(&p, 2, 2), 0);
        assert_eq!(alpha(&p, 37, 37), 0);
    }

    #[test]
    fn leaf_is_a_dome_with_scooped_base() {
        let p = draw(MarkShape::Leaf);
        assert_eq!(alpha(&p, 20, 16), 255);
        assert_eq!(alpha(&p, 20, 36), 0);
        assert_eq!(alpha(&p, 1, 1), 0);
    }

    #[test]
    fn degenerate_box_draws_nothing() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let paint = Fill::Solid(HexColor::BLACK).paint();
        assert!(!draw_mark(&mut pixmap, 0.0, 0.0, 0.0, MarkShape::Circle, &paint));
        assert!(!draw_mark(&mut pixmap, 0.0, 0.0, -2.0, MarkShape::Square, &paint));
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn gradient_samples_endpoints_exactly() {
        let start = HexColor::rgb(0xe4, 0x40, 0x5f);
        let end = HexColor::rgb(0xfd, 0x59, 0x49);
        let field = GradientField::new(start, end, 340.0, 340.0);
        assert_eq!(field.sample(0.0, 0.0), start);
        assert_eq!(field.sample(340.0, 340.0), end);
        // Points beyond the corners clamp.
        assert_eq!(field.sample(-5.0, -5.0), start);
        assert_eq!(field.sample(400.0, 400.0), end);
    }

    #[test]
    fn gradient_midpoint_is_halfway() {
        let field = GradientField::new(HexColor::BLACK, HexColor::WHITE, 100.0, 100.0);
        let mid = field.sample(50.0, 50.0);
        assert!((127..=128).contains(&mid.r));
        // Anti-diagonal points share the midpoint color.
        assert_eq!(field.sample(100.0, 0.0), mid);
    }

    #[test]
    fn style_enums_map_to_shapes() {
        assert_eq!(MarkShape::from(DotStyle::Diamond), MarkShape::Diamond);
        assert_eq!(MarkShape::from(EyeStyle::Leaf), MarkShape::Leaf);
        assert_eq!(MarkShape::from(EyeStyle::Rounded), MarkShape::Rounded);
    }
}
