//! Decorative frame bands and label.
//!
//! The frame is drawn last so it sits on top of the border. Its label color
//! is derived from the frame color, using HSL lightness to pick black or
//! white text.

use std::sync::Arc;

use resvg::tiny_skia::{FillRule, Mask, Paint, PathBuilder, Rect, Transform};
use resvg::usvg::{Options, fontdb};

use super::raster::{escape_xml, render_svg_onto};
use super::{LayerEffect, RenderContext};
use crate::config::{FrameStyle, HexColor, StyleConfig};
use crate::shape::rounded_rect_path;

/// Thickness of square and rounded frame bands, and diameter of circle disks.
pub const FRAME_BAND: f32 = 40.0;

/// Corner radius of the mask a rounded frame is clipped to.
pub const FRAME_CORNER_RADIUS: f32 = 20.0;

/// Font size of the frame label.
pub const LABEL_FONT_SIZE: f32 = 16.0;

/// Distance from the band's midline down to the label baseline.
const LABEL_BASELINE_SHIFT: f32 = 6.0;

pub struct FrameLayer<'a> {
    fonts: &'a Arc<fontdb::Database>,
}

impl<'a> FrameLayer<'a> {
    pub fn new(fonts: &'a Arc<fontdb::Database>) -> Self {
        Self { fonts }
    }

    fn draw_label(&self, ctx: &mut RenderContext<'_>) {
        let text = ctx.config.frame_text.trim();
        if text.is_empty() {
            return;
        }
        let side = ctx.geometry.surface_size as f32;
        let svg = label_svg(text, ctx.config.frame_color.contrasting(), side);
        let mut opts = Options::default();
        opts.fontdb = Arc::clone(self.fonts);
        if let Err(err) = render_svg_onto(&mut ctx.surface, &svg, &opts) {
            tracing::warn!(error = %err, "frame label skipped");
        }
    }
}

impl LayerEffect for FrameLayer<'_> {
    const NAME: &'static str = "frame";

    fn is_active(&self, config: &StyleConfig) -> bool {
        config.frame_style != FrameStyle::None
    }

    fn transform(&self, ctx: &mut RenderContext<'_>) {
        let side = ctx.geometry.surface_size as f32;
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(ctx.config.frame_color.to_skia());

        match ctx.config.frame_style {
            FrameStyle::None => return,
            FrameStyle::Square => fill_bands(ctx, side, &paint, None),
            FrameStyle::Rounded => {
                let Some(mut mask) = Mask::new(ctx.geometry.surface_size, ctx.geometry.surface_size)
                else {
                    tracing::warn!(side, "frame skipped: cannot allocate mask");
                    return;
                };
                let Some(outline) = rounded_rect_path(0.0, 0.0, side, side, FRAME_CORNER_RADIUS)
                else {
                    return;
                };
                mask.fill_path(&outline, FillRule::Winding, true, Transform::identity());
                fill_bands(ctx, side, &paint, Some(&mask));
            }
            FrameStyle::Circle => {
                let radius = FRAME_BAND / 2.0;
                for cy in [radius, side - radius] {
                    if let Some(disk) = PathBuilder::from_circle(side / 2.0, cy, radius) {
                        ctx.surface.fill_path(
                            &disk,
                            &paint,
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        );
                    }
                }
            }
        }

        self.draw_label(ctx);
    }
}

fn fill_bands(ctx: &mut RenderContext<'_>, side: f32, paint: &Paint<'_>, mask: Option<&Mask>) {
    let band = FRAME_BAND.min(side);
    let bands = [
        Rect::from_xywh(0.0, 0.0, side, band),
        Rect::from_xywh(0.0, side - band, side, band),
        Rect::from_xywh(0.0, 0.0, band, side),
        Rect::from_xywh(side - band, 0.0, band, side),
    ];
    for rect in bands.into_iter().flatten() {
        ctx.surface
            .fill_rect(rect, paint, Transform::identity(), mask);
    }
}

/// SVG document holding the label centered in the top band.
fn label_svg(text: &str, color: HexColor, side: f32) -> String {
    let baseline = FRAME_BAND / 2.0 + LABEL_BASELINE_SHIFT;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{side}" height="{side}"><text x="{x}" y="{baseline}" font-family="Arial, sans-serif" font-size="{LABEL_FONT_SIZE}" text-anchor="middle" fill="{color}">{text}</text></svg>"#,
        x = side / 2.0,
        color = color.to_hex(),
        text = escape_xml(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::compositor;
    use crate::matrix::ModuleMatrix;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn framed(style: FrameStyle) -> StyleConfig {
        let mut config = StyleConfig::default()
            .with_size(300, 20)
            .with_frame(style, "");
        config.frame_color = HexColor::rgb(255, 0, 0);
        config
    }

    fn render(config: &StyleConfig) -> crate::surface::Surface {
        compositor()
            .render(config, &ModuleMatrix::empty(25), None, None)
            .unwrap()
    }

    #[test]
    fn square_frame_paints_four_bands() {
        let s = render(&framed(FrameStyle::Square));
        for (x, y) in [(0, 0), (170, 5), (170, 335), (5, 170), (335, 170), (39, 170)] {
            assert_eq!(s.pixel(x, y), Some(RED), "pixel ({x},{y})");
        }
        assert_eq!(s.pixel(40, 170), Some(WHITE));
        assert_eq!(s.pixel(170, 170), Some(WHITE));
    }

    #[test]
    fn rounded_frame_is_clipped_at_the_corners() {
        let s = render(&framed(FrameStyle::Rounded));
        assert_eq!(s.pixel(0, 0), Some(WHITE));
        assert_eq!(s.pixel(339, 339), Some(WHITE));
        assert_eq!(s.pixel(170, 2), Some(RED));
        assert_eq!(s.pixel(20, 20), Some(RED));
    }

    #[test]
    fn circle_frame_draws_two_disks() {
        let s = render(&framed(FrameStyle::Circle));
        for (x, y) in [(170, 2), (170, 20), (170, 30), (170, 38), (170, 320), (170, 337)] {
            assert_eq!(s.pixel(x, y), Some(RED), "pixel ({x},{y})");
        }
        for (x, y) in [(170, 45), (140, 20), (5, 5), (5, 170), (170, 295)] {
            assert_eq!(s.pixel(x, y), Some(WHITE), "pixel ({x},{y})");
        }
    }

    #[test]
    fn no_frame_leaves_edges_alone() {
        let s = render(&framed(FrameStyle::None));
        assert_eq!(s.pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn label_contrasts_with_frame_color() {
        let svg = label_svg("Scan me", HexColor::BLACK.contrasting(), 340.0);
        assert!(svg.contains(r##"fill="#ffffff""##), "{svg}");
        assert!(svg.contains(">Scan me</text>"));

        let svg = label_svg("Scan me", HexColor::rgb(0xf5, 0xf5, 0xf5).contrasting(), 340.0);
        assert!(svg.contains(r##"fill="#000000""##), "{svg}");
    }

    #[test]
    fn label_text_is_escaped() {
        let svg = label_svg("<b>&", HexColor::WHITE, 340.0);
        assert!(svg.contains(">&lt;b&gt;&amp;</text>"));
    }

    /// Brightest pixel inside `pred` within the top band.
    fn brightest_in_band(s: &crate::surface::Surface, pred: impl Fn(u32, u32) -> bool) -> u8 {
        let mut max = 0;
        for y in 0..FRAME_BAND as u32 {
            for x in 0..s.width() {
                if pred(x, y) {
                    if let Some([r, ..]) = s.pixel(x, y) {
                        max = max.max(r);
                    }
                }
            }
        }
        max
    }

    #[test]
    fn label_is_visible_on_the_frame() {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        crate::layer::resolve_sans_serif(&mut db);
        if db.len() == 0 {
            return;
        }
        let compositor = crate::Compositor::with_fonts(Arc::new(db));

        for style in [FrameStyle::Square, FrameStyle::Circle] {
            let mut config = framed(style);
            config.frame_color = HexColor::BLACK;
            config.frame_text = "SCAN ME".to_string();
            let s = compositor
                .render(&config, &ModuleMatrix::empty(25), None, None)
                .unwrap();

            // Band (or disk) pixels only: white there can only come from the label.
            let on_frame = |x: u32, y: u32| match style {
                FrameStyle::Circle => {
                    let (dx, dy) = (x as f32 - 170.0, y as f32 - FRAME_BAND / 2.0);
                    dx * dx + dy * dy < 17.0 * 17.0
                }
                _ => (120..220).contains(&x) && (4..36).contains(&y),
            };
            assert!(brightest_in_band(&s, on_frame) > 200, "{style:?} label not drawn");
            assert_eq!(s.pixel(170, 2), Some([0, 0, 0, 255]), "{style:?}");
        }
    }

    #[test]
    fn label_without_fonts_keeps_frame_intact() {
        let mut config = framed(FrameStyle::Square);
        config.frame_text = "SCAN ME".to_string();
        let s = render(&config);
        assert_eq!(s.pixel(170, 5), Some(RED));
        assert_eq!(s.pixel(170, 170), Some(WHITE));
    }
}
