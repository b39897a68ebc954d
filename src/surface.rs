//! Output surface types.
//!
//! A [`Surface`] is the finished raster of one render pass, together with the
//! geometry it was laid out with and the marks that were drawn.

use image::RgbaImage;

use crate::config::StyleConfig;

/// Pixel layout of one render, derived from the config and the matrix side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Side of the whole surface: region plus padding on both sides.
    pub surface_size: u32,
    /// Offset of the module region from the surface edge.
    pub padding: f32,
    /// Side of the module region.
    pub region_size: f32,
    /// Number of modules per side.
    pub modules: usize,
    /// Side of one module cell, before dot padding is applied.
    pub cell_size: f32,
}

impl Geometry {
    pub fn new(config: &StyleConfig, modules: usize) -> Self {
        let region_size = config.size as f32;
        Self {
            surface_size: config.surface_size(),
            padding: config.padding as f32,
            region_size,
            modules,
            cell_size: if modules == 0 {
                0.0
            } else {
                region_size / modules as f32
            },
        }
    }

    /// Top-left corner of the cell at column `x`, row `y`.
    pub fn cell_origin(&self, x: usize, y: usize) -> (f32, f32) {
        (
            self.padding + x as f32 * self.cell_size,
            self.padding + y as f32 * self.cell_size,
        )
    }
}

/// How many marks of each kind a render drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkStats {
    pub eye: usize,
    pub data: usize,
}

impl MarkStats {
    pub fn total(&self) -> usize {
        self.eye + self.data
    }
}

/// A finished render: straight-alpha RGBA pixels plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub image: RgbaImage,
    pub geometry: Geometry,
    pub stats: MarkStats,
}

impl Surface {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
