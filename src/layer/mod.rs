//! Layer infrastructure for QR compositing.
//!
//! A render is a fixed sequence of layers drawn over one tiny-skia surface.
//! Each layer implements [`LayerEffect`], which decides whether the layer
//! participates for a given config and paints its contribution into the
//! shared [`RenderContext`].
//!
//! # Pipeline
//!
//! ```text
//! ┌────────────┐
//! │ Background │ ◄── fill color, optional stretched image
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │  Modules   │ ◄── one mark per dark cell, eye or data shape
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │    Logo    │ ◄── white backing + centered image
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Border   │ ◄── stroke around the surface bounds
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Frame    │ ◄── bands or disks, optional label
//! └────────────┘
//! ```

pub mod background;
pub mod border;
pub mod frame;
pub mod logo;
pub mod modules;
pub mod raster;

pub use background::BackgroundLayer;
pub use border::BorderLayer;
pub use frame::{FRAME_BAND, FRAME_CORNER_RADIUS, FrameLayer};
pub use logo::{LOGO_BACKING_MARGIN, LogoLayer};
pub use modules::ModuleLayer;

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::Pixmap;
use resvg::usvg::fontdb;

use crate::asset::Asset;
use crate::config::StyleConfig;
use crate::error::{StudioError, StudioResult};
use crate::matrix::ModuleMatrix;
use crate::surface::{Geometry, MarkStats, Surface};

// ============================================================================
// Render Context
// ============================================================================

/// State that flows through the layer sequence of one render.
pub struct RenderContext<'a> {
    /// The surface every layer paints into, premultiplied.
    pub surface: Pixmap,
    pub config: &'a StyleConfig,
    pub geometry: Geometry,
    /// Marks drawn so far, filled in by [`ModuleLayer`].
    pub stats: MarkStats,
}

impl<'a> RenderContext<'a> {
    /// Allocates a transparent surface sized for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] if the surface cannot be allocated.
    pub fn new(config: &'a StyleConfig, geometry: Geometry) -> StudioResult<Self> {
        let side = geometry.surface_size;
        let surface = Pixmap::new(side, side).ok_or_else(|| {
            StudioError::invalid(format!("cannot allocate a {side}x{side} surface"))
        })?;
        Ok(Self {
            surface,
            config,
            geometry,
            stats: MarkStats::default(),
        })
    }

    /// Consumes the context and converts the surface to straight alpha.
    pub fn finish(self) -> Surface {
        Surface {
            image: raster::pixmap_to_rgba_image(&self.surface),
            geometry: self.geometry,
            stats: self.stats,
        }
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// One step of the compositing sequence.
pub trait LayerEffect {
    /// Name used in log events.
    const NAME: &'static str;

    /// Returns false to skip the layer for this config.
    fn is_active(&self, _config: &StyleConfig) -> bool {
        true
    }

    /// Paints the layer into `ctx.surface`.
    fn transform(&self, ctx: &mut RenderContext<'_>);
}

fn apply<L: LayerEffect>(layer: &L, ctx: &mut RenderContext<'_>) {
    if !layer.is_active(ctx.config) {
        tracing::trace!(layer = L::NAME, "skipped");
        return;
    }
    layer.transform(ctx);
    tracing::trace!(layer = L::NAME, "applied");
}

// ============================================================================
// Compositor
// ============================================================================

/// Runs the layer sequence and owns the font database used for frame labels.
///
/// Loading system fonts is slow, so [`Compositor::new`] shares one database
/// across every compositor in the process.
#[derive(Clone)]
pub struct Compositor {
    fonts: Arc<fontdb::Database>,
}

impl Compositor {
    /// A compositor backed by the system fonts, loaded on first use.
    pub fn new() -> Self {
        static SYSTEM_FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
        let fonts = SYSTEM_FONTS.get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            resolve_sans_serif(&mut db);
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        });
        Self::with_fonts(Arc::clone(fonts))
    }

    /// A compositor that resolves label text against `fonts`.
    pub fn with_fonts(fonts: Arc<fontdb::Database>) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &Arc<fontdb::Database> {
        &self.fonts
    }

    /// Composites one styled code.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] if the config is invalid, the
    /// matrix is empty, or the dot padding leaves no room for a mark. All of
    /// these are detected before the surface is allocated.
    #[tracing::instrument(skip_all, fields(modules = matrix.size(), size = config.size))]
    pub fn render(
        &self,
        config: &StyleConfig,
        matrix: &ModuleMatrix,
        logo: Option<&Asset>,
        background: Option<&Asset>,
    ) -> StudioResult<Surface> {
        config.validate()?;
        if matrix.size() == 0 {
            return Err(StudioError::invalid("module matrix is empty"));
        }
        let geometry = Geometry::new(config, matrix.size());
        let mark_size = geometry.cell_size - 2.0 * config.dot_padding;
        if mark_size <= 0.0 {
            return Err(StudioError::invalid(format!(
                "dotPadding {} leaves no room in a {:.2}px cell",
                config.dot_padding, geometry.cell_size
            )));
        }

        let mut ctx = RenderContext::new(config, geometry)?;
        apply(&BackgroundLayer::new(background), &mut ctx);
        apply(&ModuleLayer::new(matrix), &mut ctx);
        apply(&LogoLayer::new(logo), &mut ctx);
        apply(&BorderLayer, &mut ctx);
        apply(&FrameLayer::new(&self.fonts), &mut ctx);

        tracing::debug!(eye = ctx.stats.eye, data = ctx.stats.data, "rendered");
        Ok(ctx.finish())
    }
}

/// Points the generic `sans-serif` family at an installed face when the
/// database default (Arial) is missing, so frame labels still find a font.
pub(crate) fn resolve_sans_serif(db: &mut fontdb::Database) {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    if db.query(&query).is_some() {
        return;
    }
    let Some(family) = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
    else {
        return;
    };
    tracing::debug!(%family, "sans-serif fallback");
    db.set_sans_serif_family(family);
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("font_faces", &self.fonts.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
