//! qrstudio-renderer: styled, brand-customizable QR code compositing
//!
//! This crate turns a payload and a [`StyleConfig`] into a raster image:
//! the payload is encoded into a module matrix, and every dark module is
//! drawn as a styled mark. A background, a logo, a border, and a frame are
//! composited around and over the marks.
//!
//! # Example
//!
//! ```
//! use qrstudio_renderer::{
//!     Compositor, DotStyle, EyeStyle, MatrixProvider, QrEncoder, StyleConfig,
//! };
//!
//! let config = StyleConfig::default()
//!     .with_dot_style(DotStyle::Circle)
//!     .with_eye_style(EyeStyle::Rounded);
//! let matrix = QrEncoder
//!     .encode(&config.payload(), config.error_correction_level)
//!     .unwrap();
//! let surface = Compositor::new()
//!     .render(&config, &matrix, None, None)
//!     .unwrap();
//! assert_eq!(surface.width(), 340);
//! ```
//!
//! # Interactive Editing
//!
//! [`RegenerationController`] holds the editable inputs and re-renders only
//! when something actually changed:
//!
//! ```
//! use qrstudio_renderer::RegenerationController;
//!
//! let mut controller = RegenerationController::default();
//! controller.apply_template("spotify").unwrap();
//! controller.refresh().unwrap();
//!
//! let png = controller.export_png().unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Serializable Styles
//!
//! [`StyleConfig`] and [`StylePatch`] round-trip through camelCase JSON, so
//! styles and custom presets can be stored as plain files.

mod asset;
mod config;
mod controller;
mod error;
pub mod export;
pub mod layer;
mod matrix;
mod payload;
mod region;
mod shape;
mod surface;
mod template;

pub use asset::Asset;
pub use config::{DotStyle, EyeStyle, FrameStyle, HexColor, StyleConfig};
pub use controller::{
    ControllerState, DependencyVersion, RegenerationController, RenderJob, RenderOutcome, Watched,
};
pub use error::{StudioError, StudioResult};
pub use layer::{Compositor, LayerEffect, RenderContext};
pub use matrix::{ErrorCorrection, MatrixProvider, ModuleMatrix, QrEncoder};
pub use payload::{ContentType, WIFI_PASSWORD_PLACEHOLDER, format_payload, format_wifi_payload};
pub use region::{EYE_BLOCK, Region, classify, is_eye_region};
pub use shape::{Fill, GradientField, MarkShape, draw_mark, mark_path};
pub use surface::{Geometry, MarkStats, Surface};
pub use template::{StylePatch, Template, apply_template, builtin_templates, template};
