//! Background fill and optional background image.

use resvg::tiny_skia::{Color, PixmapPaint, Transform};

use super::raster::resized_pixmap;
use super::{LayerEffect, RenderContext};
use crate::asset::Asset;

/// Fills the surface with the background color, then stretches the
/// background image (if any) over the module region at its configured
/// opacity.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundLayer<'a> {
    image: Option<&'a Asset>,
}

impl<'a> BackgroundLayer<'a> {
    pub fn new(image: Option<&'a Asset>) -> Self {
        Self { image }
    }
}

impl LayerEffect for BackgroundLayer<'_> {
    const NAME: &'static str = "background";

    fn transform(&self, ctx: &mut RenderContext<'_>) {
        let bg = ctx.config.background_color;
        ctx.surface.fill(Color::from_rgba8(bg.r, bg.g, bg.b, 255));

        let Some(asset) = self.image else {
            return;
        };
        let side = ctx.config.size;
        let Some(stretched) = resized_pixmap(asset.image(), side, side) else {
            tracing::warn!(reference = asset.reference(), "background image skipped: empty target");
            return;
        };
        let paint = PixmapPaint {
            opacity: f32::from(ctx.config.background_image_opacity) / 100.0,
            ..PixmapPaint::default()
        };
        let offset = ctx.config.padding as i32;
        ctx.surface.draw_pixmap(
            offset,
            offset,
            stretched.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }
}
