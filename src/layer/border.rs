//! Stroke around the surface bounds.

use resvg::tiny_skia::{Paint, PathBuilder, Rect, Stroke, Transform};

use super::{LayerEffect, RenderContext};
use crate::config::StyleConfig;
use crate::shape::rounded_rect_path;

/// Strokes the outer edge of the surface. The stroke is centered on the edge,
/// so only the inner half is visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderLayer;

impl LayerEffect for BorderLayer {
    const NAME: &'static str = "border";

    fn is_active(&self, config: &StyleConfig) -> bool {
        config.border_width > 0.0
    }

    fn transform(&self, ctx: &mut RenderContext<'_>) {
        let side = ctx.geometry.surface_size as f32;
        let radius = ctx.config.border_radius;
        let path = if radius > 0.0 {
            rounded_rect_path(0.0, 0.0, side, side, radius)
        } else {
            Rect::from_xywh(0.0, 0.0, side, side).map(PathBuilder::from_rect)
        };
        let Some(path) = path else {
            tracing::warn!(side, "border skipped: degenerate outline");
            return;
        };

        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(ctx.config.border_color.to_skia());
        let stroke = Stroke {
            width: ctx.config.border_width,
            ..Stroke::default()
        };
        ctx.surface
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}
