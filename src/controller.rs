//! Regeneration controller.
//!
//! The controller owns the editable inputs and tracks which of them changed
//! since the displayed surface was produced. [`refresh`](RegenerationController::refresh)
//! re-renders only when something did.
//!
//! # Versioning
//!
//! Each input lives in a [`Watched`] slot whose version bumps only when the
//! stored value actually differs. The sum of the three versions is the
//! [`DependencyVersion`] a surface was rendered from; the controller is stale
//! whenever the current version differs from the displayed one.
//!
//! # Jobs and tickets
//!
//! A render can also be driven in three steps:
//!
//! ```
//! use qrstudio_renderer::{QrEncoder, RegenerationController};
//!
//! let mut controller = RegenerationController::new(QrEncoder);
//! let job = controller.begin_render().unwrap();
//! let outcome = job.run(&QrEncoder);
//! controller.finish(outcome).unwrap();
//! assert!(controller.surface().is_some());
//! ```
//!
//! Jobs own their inputs, so several can be in flight. Each carries a ticket;
//! a finished job is settled only if its ticket is not older than the one
//! already on display. Older outcomes are dropped, failures included, and so
//! is anything issued before the last [`reset`](RegenerationController::reset).
//! A job that will never finish is handed back through
//! [`abandon`](RegenerationController::abandon).

use std::path::Path;

use crate::asset::Asset;
use crate::config::StyleConfig;
use crate::error::{StudioError, StudioResult};
use crate::export;
use crate::layer::Compositor;
use crate::matrix::{MatrixProvider, QrEncoder};
use crate::surface::Surface;
use crate::template::{self, StylePatch};

// ============================================================================
// Watched
// ============================================================================

/// A value with a version that bumps whenever the value changes.
#[derive(Debug, Clone, Default)]
pub struct Watched<T> {
    value: T,
    version: u64,
}

impl<T: PartialEq> Watched<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Stores `value`. Returns true (and bumps the version) if it differs.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version = self.version.wrapping_add(1);
        true
    }
}

/// Combined version of every input a surface depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependencyVersion(u64);

impl DependencyVersion {
    /// Combines input versions. Versions only ever increase, so any single
    /// change yields a new combined value.
    pub fn combine(versions: &[u64]) -> Self {
        Self(versions.iter().fold(0u64, |acc, v| acc.wrapping_add(*v)))
    }
}

// ============================================================================
// Jobs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Rendering,
}

/// A snapshot of the controller's inputs, ready to render.
#[derive(Debug, Clone)]
pub struct RenderJob {
    ticket: u64,
    deps: DependencyVersion,
    config: StyleConfig,
    logo: Option<Asset>,
    background: Option<Asset>,
    compositor: Compositor,
}

impl RenderJob {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Encodes the payload and composites the surface.
    #[tracing::instrument(skip_all, fields(ticket = self.ticket))]
    pub fn run<P: MatrixProvider + ?Sized>(self, provider: &P) -> RenderOutcome {
        let result = provider
            .encode(&self.config.payload(), self.config.error_correction_level)
            .and_then(|matrix| {
                self.compositor.render(
                    &self.config,
                    &matrix,
                    self.logo.as_ref(),
                    self.background.as_ref(),
                )
            });
        RenderOutcome {
            ticket: self.ticket,
            deps: self.deps,
            result,
        }
    }
}

/// The result of a [`RenderJob`], handed back to
/// [`RegenerationController::finish`].
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    ticket: u64,
    deps: DependencyVersion,
    pub result: StudioResult<Surface>,
}

impl RenderOutcome {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

#[derive(Debug, Clone)]
struct Displayed {
    ticket: u64,
    deps: DependencyVersion,
    surface: Surface,
}

// ============================================================================
// RegenerationController
// ============================================================================

/// Keeps the displayed surface in sync with the editable inputs.
#[derive(Debug)]
pub struct RegenerationController<P = QrEncoder> {
    provider: P,
    compositor: Compositor,
    config: Watched<StyleConfig>,
    logo: Watched<Option<Asset>>,
    background: Watched<Option<Asset>>,
    next_ticket: u64,
    /// Tickets at or below this were issued before the last reset.
    reset_floor: u64,
    in_flight: usize,
    displayed: Option<Displayed>,
    last_error: Option<StudioError>,
    warnings: Vec<StudioError>,
}

impl<P: MatrixProvider> RegenerationController<P> {
    /// A controller with the default config and the system font database.
    pub fn new(provider: P) -> Self {
        Self::with_compositor(provider, Compositor::new())
    }

    pub fn with_compositor(provider: P, compositor: Compositor) -> Self {
        Self {
            provider,
            compositor,
            config: Watched::new(StyleConfig::default()),
            logo: Watched::new(None),
            background: Watched::new(None),
            next_ticket: 0,
            reset_floor: 0,
            in_flight: 0,
            displayed: None,
            last_error: None,
            warnings: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &StyleConfig {
        self.config.get()
    }

    pub fn logo(&self) -> Option<&Asset> {
        self.logo.get().as_ref()
    }

    pub fn background(&self) -> Option<&Asset> {
        self.background.get().as_ref()
    }

    /// The last successfully rendered surface.
    pub fn surface(&self) -> Option<&Surface> {
        self.displayed.as_ref().map(|d| &d.surface)
    }

    pub fn state(&self) -> ControllerState {
        if self.in_flight > 0 {
            ControllerState::Rendering
        } else {
            ControllerState::Idle
        }
    }

    /// The error of the most recent failed render, cleared by a success.
    pub fn last_error(&self) -> Option<&StudioError> {
        self.last_error.as_ref()
    }

    /// Drains recovered problems, such as images that failed to load.
    pub fn take_warnings(&mut self) -> Vec<StudioError> {
        std::mem::take(&mut self.warnings)
    }

    pub fn dependency_version(&self) -> DependencyVersion {
        DependencyVersion::combine(&[
            self.config.version(),
            self.logo.version(),
            self.background.version(),
        ])
    }

    /// True if the displayed surface does not reflect the current inputs.
    pub fn is_stale(&self) -> bool {
        self.displayed
            .as_ref()
            .is_none_or(|d| d.deps != self.dependency_version())
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Replaces the whole config.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] and keeps the current config if
    /// `config` is invalid.
    pub fn set_config(&mut self, config: StyleConfig) -> StudioResult<()> {
        config.validate()?;
        self.config.set(config);
        Ok(())
    }

    /// Merges a patch into the current config.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] and keeps the current config if
    /// the merged config is invalid.
    pub fn update(&mut self, patch: &StylePatch) -> StudioResult<()> {
        let next = self.config.get().merged(patch)?;
        self.config.set(next);
        Ok(())
    }

    /// Applies a built-in template by id.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] for an unknown id.
    pub fn apply_template(&mut self, id: &str) -> StudioResult<()> {
        let preset = template::template(id)
            .ok_or_else(|| StudioError::invalid(format!("unknown template '{id}'")))?;
        let next = template::apply_template(self.config.get(), &preset)?;
        self.config.set(next);
        Ok(())
    }

    /// Decodes and installs a logo. On failure the logo is cleared and the
    /// error is kept as a warning. Returns true if the logo loaded.
    pub fn load_logo(&mut self, reference: impl Into<String>, bytes: &[u8]) -> bool {
        let loaded = Asset::decode(reference, bytes);
        self.install_logo(loaded)
    }

    /// Reads and installs a logo file. Failures behave as in [`Self::load_logo`].
    pub fn open_logo(&mut self, path: impl AsRef<Path>) -> bool {
        let loaded = Asset::open(path);
        self.install_logo(loaded)
    }

    pub fn remove_logo(&mut self) {
        self.set_logo_slot(None);
    }

    /// Decodes and installs a background image. Failures behave as in
    /// [`Self::load_logo`].
    pub fn load_background(&mut self, reference: impl Into<String>, bytes: &[u8]) -> bool {
        let loaded = Asset::decode(reference, bytes);
        self.install_background(loaded)
    }

    pub fn open_background(&mut self, path: impl AsRef<Path>) -> bool {
        let loaded = Asset::open(path);
        self.install_background(loaded)
    }

    pub fn remove_background(&mut self) {
        self.set_background_slot(None);
    }

    /// Restores the default config with no images and nothing displayed.
    ///
    /// Jobs begun before the reset no longer count as in flight, and their
    /// outcomes are ignored by [`Self::finish`].
    pub fn reset(&mut self) {
        self.config.set(StyleConfig::default());
        self.logo.set(None);
        self.background.set(None);
        self.reset_floor = self.next_ticket;
        self.in_flight = 0;
        self.displayed = None;
        self.last_error = None;
        self.warnings.clear();
        tracing::debug!("controller reset");
    }

    fn install_logo(&mut self, loaded: StudioResult<Asset>) -> bool {
        match loaded {
            Ok(asset) => {
                self.set_logo_slot(Some(asset));
                true
            }
            Err(err) => {
                self.record_warning(err);
                self.set_logo_slot(None);
                false
            }
        }
    }

    fn install_background(&mut self, loaded: StudioResult<Asset>) -> bool {
        match loaded {
            Ok(asset) => {
                self.set_background_slot(Some(asset));
                true
            }
            Err(err) => {
                self.record_warning(err);
                self.set_background_slot(None);
                false
            }
        }
    }

    fn set_logo_slot(&mut self, asset: Option<Asset>) {
        let mut config = self.config.get().clone();
        config.logo_source = asset.as_ref().map(|a| a.reference().to_string());
        self.config.set(config);
        self.logo.set(asset);
    }

    fn set_background_slot(&mut self, asset: Option<Asset>) {
        let mut config = self.config.get().clone();
        config.background_image_source = asset.as_ref().map(|a| a.reference().to_string());
        self.config.set(config);
        self.background.set(asset);
    }

    fn record_warning(&mut self, err: StudioError) {
        tracing::warn!(error = %err, "continuing without image");
        self.warnings.push(err);
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Snapshots the current inputs into a job and takes a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::EmptyPayload`] if the content is blank. No job
    /// is started and the displayed surface is kept.
    pub fn begin_render(&mut self) -> StudioResult<RenderJob> {
        let config = self.config.get();
        if config.is_blank() {
            self.last_error = Some(StudioError::EmptyPayload);
            return Err(StudioError::EmptyPayload);
        }
        self.next_ticket += 1;
        self.in_flight += 1;
        Ok(RenderJob {
            ticket: self.next_ticket,
            deps: self.dependency_version(),
            config: config.clone(),
            logo: self.logo.get().clone(),
            background: self.background.get().clone(),
            compositor: self.compositor.clone(),
        })
    }

    /// Settles a finished job.
    ///
    /// Returns `Ok(true)` if the surface is now displayed and `Ok(false)` if
    /// the outcome was discarded: a newer surface is already on display, or
    /// the job was begun before the last [`Self::reset`]. Discarded outcomes
    /// never touch [`Self::last_error`], whether they succeeded or failed.
    ///
    /// # Errors
    ///
    /// Returns the job's error. The displayed surface is kept and the error
    /// is available through [`Self::last_error`].
    pub fn finish(&mut self, outcome: RenderOutcome) -> StudioResult<bool> {
        let RenderOutcome {
            ticket,
            deps,
            result,
        } = outcome;
        if ticket <= self.reset_floor {
            tracing::debug!(ticket, "discarded render from before reset");
            return Ok(false);
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.displayed.as_ref().is_some_and(|d| d.ticket > ticket) {
            tracing::debug!(ticket, failed = result.is_err(), "discarded stale render");
            return Ok(false);
        }

        let surface = match result {
            Ok(surface) => surface,
            Err(err) => {
                tracing::warn!(ticket, error = %err, "render failed");
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };
        self.displayed = Some(Displayed {
            ticket,
            deps,
            surface,
        });
        self.last_error = None;
        Ok(true)
    }

    /// Releases a job that will not be run or finished.
    pub fn abandon(&mut self, job: RenderJob) {
        if job.ticket > self.reset_floor {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        tracing::debug!(ticket = job.ticket, "render abandoned");
    }

    /// Renders if the inputs changed since the displayed surface.
    ///
    /// # Errors
    ///
    /// Returns the render error; the previous surface stays displayed.
    pub fn refresh(&mut self) -> StudioResult<()> {
        if !self.is_stale() {
            return Ok(());
        }
        let job = self.begin_render()?;
        let outcome = job.run(&self.provider);
        self.finish(outcome).map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    fn displayed_surface(&self) -> StudioResult<&Surface> {
        self.surface()
            .ok_or_else(|| StudioError::export("nothing has been rendered yet"))
    }

    /// Encodes the displayed surface as a PNG at the configured export size.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::ExportFailed`] if nothing is displayed or
    /// encoding fails.
    pub fn export_png(&self) -> StudioResult<Vec<u8>> {
        export::encode_png(self.displayed_surface()?, self.config().export_size)
    }

    /// Writes the displayed surface to `path`. Errors as in [`Self::export_png`].
    pub fn save_png(&self, path: impl AsRef<Path>) -> StudioResult<()> {
        export::save_png(self.displayed_surface()?, path, self.config().export_size)
    }

    /// Copies the displayed surface to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::ExportFailed`] if nothing is displayed or the
    /// clipboard is unavailable.
    #[cfg(feature = "clipboard")]
    pub fn copy_to_clipboard(&self) -> StudioResult<()> {
        export::copy_to_clipboard(self.displayed_surface()?)
    }
}

impl Default for RegenerationController<QrEncoder> {
    fn default() -> Self {
        Self::new(QrEncoder)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::config::{DotStyle, HexColor};
    use crate::layer::tests::compositor;
    use crate::matrix::{ErrorCorrection, ModuleMatrix};

    fn controller() -> RegenerationController {
        RegenerationController::with_compositor(QrEncoder, compositor())
    }

    fn png(color: [u8; 4]) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba(color)))
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    /// Provider that always returns the same matrix.
    struct Fixed(ModuleMatrix);

    impl MatrixProvider for Fixed {
        fn encode(&self, _payload: &str, _level: ErrorCorrection) -> StudioResult<ModuleMatrix> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn watched_bumps_only_on_change() {
        let mut w = Watched::new(3);
        assert!(!w.set(3));
        assert_eq!(w.version(), 0);
        assert!(w.set(4));
        assert_eq!(w.version(), 1);
        assert_eq!(*w.get(), 4);
    }

    #[test]
    fn first_refresh_renders_default_config() {
        let mut c = controller();
        assert!(c.is_stale());
        c.refresh().unwrap();
        let surface = c.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (340, 340));
        assert!(!c.is_stale());
        assert_eq!(c.state(), ControllerState::Idle);
    }

    #[test]
    fn identical_edit_does_not_go_stale() {
        let mut c = controller();
        c.refresh().unwrap();
        c.set_config(StyleConfig::default()).unwrap();
        assert!(!c.is_stale());

        c.update(&StylePatch {
            dot_style: Some(DotStyle::Circle),
            ..StylePatch::default()
        })
        .unwrap();
        assert!(c.is_stale());
        // The old surface stays until the next render completes.
        assert!(c.surface().is_some());
    }

    #[test]
    fn blank_content_refuses_to_render() {
        let mut c = controller();
        c.refresh().unwrap();
        let before = c.surface().cloned();

        c.set_config(StyleConfig::default().with_content(crate::ContentType::Text, "   "))
            .unwrap();
        assert_eq!(c.refresh(), Err(StudioError::EmptyPayload));
        assert_eq!(c.last_error(), Some(&StudioError::EmptyPayload));
        assert_eq!(c.surface().cloned(), before);
        assert_eq!(c.state(), ControllerState::Idle);
    }

    #[test]
    fn oversized_payload_keeps_displayed_surface() {
        let mut c = controller();
        c.refresh().unwrap();
        let before = c.surface().cloned();

        let config = StyleConfig::default()
            .with_content(crate::ContentType::Text, "x".repeat(3000))
            .with_error_correction(ErrorCorrection::H);
        c.set_config(config).unwrap();
        let err = c.refresh().unwrap_err();
        assert!(matches!(err, StudioError::GenerationFailed(_)), "{err:?}");
        assert!(matches!(c.last_error(), Some(StudioError::GenerationFailed(_))));
        assert_eq!(c.surface().cloned(), before);
        assert!(c.is_stale());
    }

    #[test]
    fn corrupt_logo_becomes_warning() {
        let mut c = controller();
        assert!(!c.load_logo("logo.png", b"garbage"));
        assert!(c.logo().is_none());
        assert_eq!(c.config().logo_source, None);

        c.refresh().unwrap();
        let warnings = c.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            StudioError::AssetLoadFailed { reference, .. } if reference == "logo.png"
        ));
        assert!(c.take_warnings().is_empty());

        // No logo means no white backing in the center.
        let mut plain = controller();
        plain.refresh().unwrap();
        assert_eq!(c.surface(), plain.surface());
    }

    #[test]
    fn logo_load_and_remove_track_source() {
        let mut c = controller();
        assert!(c.load_logo("brand.png", &png([255, 0, 0, 255])));
        assert_eq!(c.config().logo_source.as_deref(), Some("brand.png"));
        c.refresh().unwrap();
        assert_eq!(c.surface().unwrap().pixel(170, 170), Some([255, 0, 0, 255]));

        c.remove_logo();
        assert!(c.is_stale());
        assert_eq!(c.config().logo_source, None);
        c.refresh().unwrap();
        assert_ne!(c.surface().unwrap().pixel(170, 170), Some([255, 0, 0, 255]));
    }

    #[test]
    fn reloading_the_same_background_is_not_a_change() {
        let mut c = controller();
        let bytes = png([0, 0, 255, 255]);
        assert!(c.load_background("bg.png", &bytes));
        c.refresh().unwrap();
        assert!(c.load_background("bg.png", &bytes));
        assert!(!c.is_stale());
        c.remove_background();
        assert!(c.background().is_none());
        assert!(c.is_stale());
    }

    #[test]
    fn newest_ticket_wins() {
        let mut c = controller();
        let first = c.begin_render().unwrap();
        c.update(&StylePatch {
            foreground_color: Some(HexColor::rgb(255, 0, 0)),
            ..StylePatch::default()
        })
        .unwrap();
        let second = c.begin_render().unwrap();
        assert!(second.ticket() > first.ticket());
        assert_eq!(c.state(), ControllerState::Rendering);

        assert_eq!(c.finish(second.run(&QrEncoder)), Ok(true));
        assert_eq!(c.finish(first.run(&QrEncoder)), Ok(false));
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(!c.is_stale());
        // Finder corner carries the newer foreground.
        assert_eq!(c.surface().unwrap().pixel(21, 21), Some([255, 0, 0, 255]));
    }

    #[test]
    fn superseded_failure_does_not_report_an_error() {
        let mut c = controller();
        c.set_config(
            StyleConfig::default()
                .with_content(crate::ContentType::Text, "x".repeat(3000))
                .with_error_correction(ErrorCorrection::H),
        )
        .unwrap();
        let doomed = c.begin_render().unwrap();

        c.set_config(StyleConfig::default()).unwrap();
        let current = c.begin_render().unwrap();
        assert_eq!(c.finish(current.run(&QrEncoder)), Ok(true));

        let late = doomed.run(&QrEncoder);
        assert!(late.result.is_err());
        assert_eq!(c.finish(late), Ok(false));
        assert_eq!(c.last_error(), None);
        assert!(!c.is_stale());
        assert_eq!(c.state(), ControllerState::Idle);
    }

    #[test]
    fn older_ticket_displays_when_nothing_newer_finished() {
        let mut c = controller();
        let first = c.begin_render().unwrap();
        let second = c.begin_render().unwrap();
        assert_eq!(c.finish(first.run(&QrEncoder)), Ok(true));
        assert_eq!(c.finish(second.run(&QrEncoder)), Ok(true));
    }

    #[test]
    fn custom_provider_drives_matrix() {
        let matrix = ModuleMatrix::empty(25).with_dark(12, 12);
        let mut c = RegenerationController::with_compositor(Fixed(matrix), compositor());
        c.refresh().unwrap();
        assert_eq!(c.surface().unwrap().stats.total(), 1);
    }

    #[test]
    fn template_edits_are_atomic() {
        let mut c = controller();
        c.apply_template("instagram").unwrap();
        assert_eq!(c.config().foreground_color, HexColor::rgb(0xe4, 0x40, 0x5f));
        assert_eq!(c.config().content, "https://example.com");

        let before = c.config().clone();
        assert!(matches!(
            c.apply_template("myspace"),
            Err(StudioError::InvalidConfig(_))
        ));
        let bad = StylePatch {
            logo_size: Some(0.0),
            ..StylePatch::default()
        };
        assert!(c.update(&bad).is_err());
        assert_eq!(c.config(), &before);
    }

    #[test]
    fn reset_clears_everything() {
        let mut c = controller();
        c.load_logo("broken.png", b"nope");
        c.apply_template("spotify").unwrap();
        c.refresh().unwrap();

        c.reset();
        assert_eq!(c.config(), &StyleConfig::default());
        assert!(c.surface().is_none());
        assert!(c.take_warnings().is_empty());
        assert!(c.last_error().is_none());
        assert!(c.is_stale());
    }

    #[test]
    fn jobs_from_before_reset_are_ignored() {
        let mut c = controller();
        c.apply_template("spotify").unwrap();
        let old = c.begin_render().unwrap();
        assert_eq!(c.state(), ControllerState::Rendering);

        c.reset();
        assert_eq!(c.state(), ControllerState::Idle);
        assert_eq!(c.finish(old.run(&QrEncoder)), Ok(false));
        assert!(c.surface().is_none());
        assert!(c.is_stale());

        // Tickets issued after the reset still count.
        let fresh = c.begin_render().unwrap();
        assert_eq!(c.state(), ControllerState::Rendering);
        assert_eq!(c.finish(fresh.run(&QrEncoder)), Ok(true));
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(!c.is_stale());
    }

    #[test]
    fn abandoned_job_releases_rendering_state() {
        let mut c = controller();
        let job = c.begin_render().unwrap();
        assert_eq!(c.state(), ControllerState::Rendering);
        c.abandon(job);
        assert_eq!(c.state(), ControllerState::Idle);
        assert!(c.surface().is_none());

        // Abandoning a pre-reset job leaves newer jobs counted.
        let stale = c.begin_render().unwrap();
        c.reset();
        let _current = c.begin_render().unwrap();
        c.abandon(stale);
        assert_eq!(c.state(), ControllerState::Rendering);
    }

    #[test]
    fn export_needs_a_surface() {
        let mut c = controller();
        assert!(matches!(c.export_png(), Err(StudioError::ExportFailed(_))));

        c.update(&StylePatch {
            export_size: Some(200),
            ..StylePatch::default()
        })
        .unwrap();
        c.refresh().unwrap();
        let bytes = c.export_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 200));
    }
}
