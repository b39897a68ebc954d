//! Module marks.

use super::{LayerEffect, RenderContext};
use crate::matrix::ModuleMatrix;
use crate::region::{Region, classify};
use crate::shape::{Fill, GradientField, MarkShape, draw_mark};

/// Draws one mark per dark module, using the eye shape inside the three
/// finder blocks and the dot shape everywhere else.
#[derive(Debug, Clone, Copy)]
pub struct ModuleLayer<'a> {
    matrix: &'a ModuleMatrix,
}

impl<'a> ModuleLayer<'a> {
    pub fn new(matrix: &'a ModuleMatrix) -> Self {
        Self { matrix }
    }
}

impl LayerEffect for ModuleLayer<'_> {
    const NAME: &'static str = "modules";

    fn transform(&self, ctx: &mut RenderContext<'_>) {
        let config = ctx.config;
        let geometry = ctx.geometry;
        let side = geometry.surface_size as f32;

        let fill = if config.gradient_enabled {
            Fill::Gradient(GradientField::new(
                config.foreground_color,
                config.gradient_color,
                side,
                side,
            ))
        } else {
            Fill::Solid(config.foreground_color)
        };
        let paint = fill.paint();

        let eye_shape = MarkShape::from(config.eye_style);
        let data_shape = MarkShape::from(config.dot_style);
        let inset = config.dot_padding;
        let mark_size = geometry.cell_size - 2.0 * inset;
        let n = self.matrix.size();

        for (x, y) in self.matrix.dark_cells() {
            let (cx, cy) = geometry.cell_origin(x, y);
            let region = classify(x, y, n);
            let shape = match region {
                Region::Eye => eye_shape,
                Region::Data => data_shape,
            };
            if !draw_mark(&mut ctx.surface, cx + inset, cy + inset, mark_size, shape, &paint) {
                continue;
            }
            match region {
                Region::Eye => ctx.stats.eye += 1,
                Region::Data => ctx.stats.data += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{EyeStyle, HexColor, StyleConfig};
    use crate::layer::tests::compositor;
    use crate::matrix::ModuleMatrix;

    #[test]
    fn eye_and_data_cells_use_their_own_shapes() {
        // Cell (0,0) is in the top-left finder, (12,12) is data.
        let matrix = ModuleMatrix::empty(25).with_dark(0, 0).with_dark(12, 12);
        let config = StyleConfig::default()
            .with_size(300, 20)
            .with_eye_style(EyeStyle::Circle);
        let surface = compositor().render(&config, &matrix, None, None).unwrap();

        assert_eq!(surface.stats.eye, 1);
        assert_eq!(surface.stats.data, 1);
        // Circle eye leaves its cell corner white, square data fills it.
        assert_eq!(surface.pixel(20, 20), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(26, 26), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(164, 164), Some([0, 0, 0, 255]));
    }

    #[test]
    fn gradient_runs_across_the_surface() {
        let start = HexColor::rgb(0xe4, 0x40, 0x5f);
        let end = HexColor::rgb(0x00, 0x00, 0xff);
        let matrix = ModuleMatrix::empty(25).with_dark(0, 0).with_dark(24, 24);
        let mut config = StyleConfig::default()
            .with_size(300, 20)
            .with_gradient(Some(end));
        config.foreground_color = start;
        let surface = compositor().render(&config, &matrix, None, None).unwrap();

        let [r0, _, b0, _] = surface.pixel(22, 22).unwrap();
        let [r1, _, b1, _] = surface.pixel(317, 317).unwrap();
        assert!(r0 > 200 && b0 < 120, "near start: {r0} {b0}");
        assert!(r1 < 40 && b1 > 220, "near end: {r1} {b1}");
    }
}
