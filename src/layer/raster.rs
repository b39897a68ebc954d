//! Conversions between `image` buffers and tiny-skia pixmaps, plus SVG
//! rasterization onto an existing surface.
//!
//! tiny-skia stores premultiplied alpha; `image` buffers are straight alpha.
//! Every crossing between the two goes through this module.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{IntSize, Pixmap, Transform};
use resvg::usvg::{self, Options, Tree};

// ============================================================================
// Pixel Conversion
// ============================================================================

/// Converts a premultiplied pixmap into a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Converts a straight-alpha image into a premultiplied pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = img.as_raw().clone();
    premultiply_in_place(&mut data);
    Pixmap::from_vec(data, size)
}

/// Stretches `img` to exactly `width`×`height` and converts it to a pixmap.
pub fn resized_pixmap(img: &RgbaImage, width: u32, height: u32) -> Option<Pixmap> {
    if width == 0 || height == 0 {
        return None;
    }
    if img.dimensions() == (width, height) {
        return rgba_to_pixmap(img);
    }
    let resized = imageops::resize(img, width, height, FilterType::Triangle);
    rgba_to_pixmap(&resized)
}

fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Parses `svg_data` and renders it onto `surface` at its own coordinates.
///
/// # Errors
///
/// Returns the parse error if the markup is not valid SVG.
pub fn render_svg_onto(
    surface: &mut Pixmap,
    svg_data: &str,
    opts: &Options<'_>,
) -> Result<(), usvg::Error> {
    let tree = Tree::from_str(svg_data, opts)?;
    resvg::render(&tree, Transform::identity(), &mut surface.as_mut());
    Ok(())
}

/// Escapes text for use inside SVG element content.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_transparent_pixel_survives_conversion() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        let pixmap = rgba_to_pixmap(&img).unwrap();

        let stored = pixmap.pixel(0, 0).unwrap();
        assert_eq!(stored.alpha(), 128);
        assert_eq!(stored.red(), ((200u16 * 128 + 127) / 255) as u8);

        let back = pixmap_to_rgba_image(&pixmap);
        let [r, g, b, a] = back.get_pixel(0, 0).0;
        assert_eq!(a, 128);
        assert!(r.abs_diff(200) <= 1 && g.abs_diff(100) <= 1 && b.abs_diff(50) <= 1);
    }

    #[test]
    fn resize_stretches_to_exact_box() {
        let img = RgbaImage::from_pixel(3, 7, Rgba([0, 0, 255, 255]));
        let pixmap = resized_pixmap(&img, 10, 10).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (10, 10));
        assert_eq!(pixmap.pixel(5, 5).unwrap().blue(), 255);
        assert!(resized_pixmap(&img, 0, 10).is_none());
    }

    #[test]
    fn svg_renders_onto_existing_pixels() {
        let mut surface = Pixmap::new(10, 10).unwrap();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect x="0" y="0" width="5" height="10" fill="#ff0000"/></svg>"##;
        render_svg_onto(&mut surface, svg, &Options::default()).unwrap();
        assert_eq!(surface.pixel(1, 5).unwrap().red(), 255);
        assert_eq!(surface.pixel(8, 5).unwrap().alpha(), 0);
    }

    #[test]
    fn invalid_svg_is_an_error() {
        let mut surface = Pixmap::new(4, 4).unwrap();
        assert!(render_svg_onto(&mut surface, "<not-svg", &Options::default()).is_err());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("Scan <me> & \"go\""), "Scan &lt;me&gt; &amp; &quot;go&quot;");
    }
}
