//! The style configuration: the single immutable value rendering reads from.
//!
//! A [`StyleConfig`] is never edited in place. Every change produces a new
//! value, either through the `with_*` builders or by merging a
//! [`StylePatch`](crate::StylePatch). It serializes to camelCase JSON so a
//! frontend can send the whole configuration across a process boundary.
//!
//! ```
//! use qrstudio_renderer::{ContentType, DotStyle, StyleConfig};
//!
//! let config = StyleConfig::default()
//!     .with_content(ContentType::Url, "example.com")
//!     .with_dot_style(DotStyle::Circle);
//!
//! assert_eq!(config.payload(), "https://example.com");
//! let json = config.to_json().unwrap();
//! assert_eq!(StyleConfig::from_json(&json).unwrap(), config);
//! ```

use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use resvg::tiny_skia;
use serde::{Deserialize, Serialize};

use crate::error::{StudioError, StudioResult};
use crate::matrix::ErrorCorrection;
use crate::payload::{ContentType, format_payload, format_wifi_payload};
use crate::template::StylePatch;

// ============================================================================
// HexColor
// ============================================================================

/// An opaque sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_skia(&self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }

    /// HSL lightness in `0.0..=1.0`.
    pub fn lightness(&self) -> f32 {
        let rgb = Srgb::new(self.r, self.g, self.b).into_format::<f32>();
        let hsl: Hsl = rgb.into_color();
        hsl.lightness
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting(&self) -> Self {
        if self.lightness() > 0.6 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rgb: Srgb<u8> = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid color '{s}': {e}"))?;
        Ok(Self::rgb(rgb.red, rgb.green, rgb.blue))
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_hex()
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for HexColor {
    fn schema_name() -> String {
        "HexColor".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(generator)
    }
}

// ============================================================================
// Shape enums
// ============================================================================

/// Shape used for data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum DotStyle {
    #[default]
    Square,
    Circle,
    Rounded,
    Diamond,
}

/// Shape used for modules inside the finder blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum EyeStyle {
    #[default]
    Square,
    Circle,
    Rounded,
    Leaf,
}

/// Decorative frame drawn over the finished code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    #[default]
    None,
    Square,
    Rounded,
    Circle,
}

macro_rules! impl_lowercase_from_str {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(format!(concat!("unknown ", stringify!($ty), " '{}'"), other)),
                }
            }
        }
    };
}

impl_lowercase_from_str!(DotStyle { Square => "square", Circle => "circle", Rounded => "rounded", Diamond => "diamond" });
impl_lowercase_from_str!(EyeStyle { Square => "square", Circle => "circle", Rounded => "rounded", Leaf => "leaf" });
impl_lowercase_from_str!(FrameStyle { None => "none", Square => "square", Rounded => "rounded", Circle => "circle" });

// ============================================================================
// StyleConfig
// ============================================================================

/// Every user-tunable rendering parameter.
///
/// # JSON Format
///
/// ```json
/// {
///   "contentType": "url",
///   "content": "https://example.com",
///   "errorCorrectionLevel": "M",
///   "size": 300,
///   "foregroundColor": "#000000",
///   "dotStyle": "circle",
///   "frameStyle": "none"
/// }
/// ```
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    // Content
    pub content_type: ContentType,
    pub content: String,
    /// Metadata for an external tracking service; no rendering effect.
    pub is_dynamic: bool,
    /// Password for `wifi` payloads. `None` emits the placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_password: Option<String>,

    // Encoding
    pub error_correction_level: ErrorCorrection,
    /// Side of the module region in pixels.
    pub size: u32,
    /// Side of exported images in pixels.
    pub export_size: u32,

    // Colors
    pub foreground_color: HexColor,
    pub background_color: HexColor,
    pub border_color: HexColor,
    pub frame_color: HexColor,
    pub gradient_enabled: bool,
    pub gradient_color: HexColor,

    // Geometry
    pub border_width: f32,
    pub border_radius: f32,
    pub padding: u32,
    /// Inset applied to every module box on each side.
    pub dot_padding: f32,

    // Shapes
    pub dot_style: DotStyle,
    pub eye_style: EyeStyle,
    pub frame_style: FrameStyle,
    pub frame_text: String,

    // Overlays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_source: Option<String>,
    /// Logo side as a percentage of the region size.
    pub logo_size: f32,
    pub logo_opacity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_source: Option<String>,
    pub background_image_opacity: u8,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::Url,
            content: "https://example.com".to_string(),
            is_dynamic: false,
            wifi_password: None,
            error_correction_level: ErrorCorrection::M,
            size: 300,
            export_size: 1000,
            foreground_color: HexColor::BLACK,
            background_color: HexColor::WHITE,
            border_color: HexColor::BLACK,
            frame_color: HexColor::BLACK,
            gradient_enabled: false,
            gradient_color: HexColor::rgb(0x63, 0x66, 0xf1),
            border_width: 0.0,
            border_radius: 0.0,
            padding: 20,
            dot_padding: 0.0,
            dot_style: DotStyle::Square,
            eye_style: EyeStyle::Square,
            frame_style: FrameStyle::None,
            frame_text: String::new(),
            logo_source: None,
            logo_size: 20.0,
            logo_opacity: 100,
            background_image_source: None,
            background_image_opacity: 30,
        }
    }
}

impl StyleConfig {
    /// Checks every invariant that does not depend on the encoded matrix.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> StudioResult<()> {
        if self.size == 0 {
            return Err(StudioError::invalid("size must be greater than zero"));
        }
        if self.export_size == 0 {
            return Err(StudioError::invalid("exportSize must be greater than zero"));
        }
        if self.checked_surface_size().is_none() {
            return Err(StudioError::invalid(format!(
                "size {} plus padding {} on both sides overflows the surface",
                self.size, self.padding
            )));
        }
        for (name, value) in [
            ("logoOpacity", self.logo_opacity),
            ("backgroundImageOpacity", self.background_image_opacity),
        ] {
            if value > 100 {
                return Err(StudioError::invalid(format!(
                    "{name} must be within 0..=100, got {value}"
                )));
            }
        }
        if !(self.logo_size.is_finite() && self.logo_size > 0.0 && self.logo_size <= 100.0) {
            return Err(StudioError::invalid(format!(
                "logoSize must be within (0, 100], got {}",
                self.logo_size
            )));
        }
        for (name, value) in [
            ("dotPadding", self.dot_padding),
            ("borderWidth", self.border_width),
            ("borderRadius", self.border_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StudioError::invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// The literal string handed to the encoder.
    pub fn payload(&self) -> String {
        match self.content_type {
            ContentType::Wifi => format_wifi_payload(&self.content, self.wifi_password.as_deref()),
            other => format_payload(other, &self.content),
        }
    }

    /// True if the raw content is blank and no render should be attempted.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Side of the output surface: region plus padding on both sides.
    ///
    /// Saturates on overflow; [`Self::validate`] rejects such configs.
    pub fn surface_size(&self) -> u32 {
        self.size.saturating_add(self.padding.saturating_mul(2))
    }

    /// Like [`Self::surface_size`], but `None` if the side does not fit a `u32`.
    pub fn checked_surface_size(&self) -> Option<u32> {
        self.padding.checked_mul(2)?.checked_add(self.size)
    }

    /// Merges a patch into a copy of this config and validates the result.
    ///
    /// The merge is all-or-nothing: on error `self` is the config to keep.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] if the merged value is invalid.
    pub fn merged(&self, patch: &StylePatch) -> StudioResult<Self> {
        let mut next = self.clone();
        patch.write_into(&mut next);
        next.validate()?;
        Ok(next)
    }

    pub fn with_content(mut self, content_type: ContentType, content: impl Into<String>) -> Self {
        self.content_type = content_type;
        self.content = content.into();
        self
    }

    pub fn with_error_correction(mut self, level: ErrorCorrection) -> Self {
        self.error_correction_level = level;
        self
    }

    pub fn with_size(mut self, size: u32, padding: u32) -> Self {
        self.size = size;
        self.padding = padding;
        self
    }

    pub fn with_dot_style(mut self, style: DotStyle) -> Self {
        self.dot_style = style;
        self
    }

    pub fn with_eye_style(mut self, style: EyeStyle) -> Self {
        self.eye_style = style;
        self
    }

    pub fn with_gradient(mut self, end: Option<HexColor>) -> Self {
        self.gradient_enabled = end.is_some();
        if let Some(end) = end {
            self.gradient_color = end;
        }
        self
    }

    pub fn with_frame(mut self, style: FrameStyle, text: impl Into<String>) -> Self {
        self.frame_style = style;
        self.frame_text = text.into();
        self
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// JSON Schema describing the serialized form.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(StyleConfig)
    }
}

// ============================================================================
// Tests
// ============================================================================
