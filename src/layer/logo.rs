//! Centered logo with an opaque backing square.

use resvg::tiny_skia::{FilterQuality, Paint, PixmapPaint, Rect, Transform};

use super::raster::resized_pixmap;
use super::{LayerEffect, RenderContext};
use crate::asset::Asset;
use crate::config::HexColor;

/// How far the white backing extends past the logo on each side, in pixels.
pub const LOGO_BACKING_MARGIN: f32 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct LogoLayer<'a> {
    logo: Option<&'a Asset>,
}

impl<'a> LogoLayer<'a> {
    pub fn new(logo: Option<&'a Asset>) -> Self {
        Self { logo }
    }
}

impl LayerEffect for LogoLayer<'_> {
    const NAME: &'static str = "logo";

    fn is_active(&self, _config: &crate::config::StyleConfig) -> bool {
        self.logo.is_some()
    }

    fn transform(&self, ctx: &mut RenderContext<'_>) {
        let Some(asset) = self.logo else {
            return;
        };
        let region = ctx.geometry.region_size;
        let side = region * ctx.config.logo_size / 100.0;
        let pixels = side.round() as u32;
        let Some(logo) = resized_pixmap(asset.image(), pixels, pixels) else {
            tracing::warn!(reference = asset.reference(), side, "logo skipped: too small to draw");
            return;
        };

        let origin = ctx.geometry.padding + (region - side) / 2.0;
        if let Some(backing) = Rect::from_xywh(
            origin - LOGO_BACKING_MARGIN,
            origin - LOGO_BACKING_MARGIN,
            side + 2.0 * LOGO_BACKING_MARGIN,
            side + 2.0 * LOGO_BACKING_MARGIN,
        ) {
            let mut paint = Paint::default();
            paint.set_color(HexColor::WHITE.to_skia());
            ctx.surface
                .fill_rect(backing, &paint, Transform::identity(), None);
        }

        let paint = PixmapPaint {
            opacity: f32::from(ctx.config.logo_opacity) / 100.0,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        ctx.surface.draw_pixmap(
            0,
            0,
            logo.as_ref(),
            &paint,
            Transform::from_translate(origin, origin),
            None,
        );
    }
}
