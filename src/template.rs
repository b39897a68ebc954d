//! Partial style updates and the built-in brand presets.
//!
//! A [`StylePatch`] is the serializable "only these fields" counterpart of
//! [`StyleConfig`]. Templates are named patches; applying one is a pure merge
//! that either fully succeeds or leaves the caller's config as it was.
//!
//! ```
//! use qrstudio_renderer::{apply_template, template, DotStyle, StyleConfig};
//!
//! let config = StyleConfig::default();
//! let instagram = template("instagram").unwrap();
//! let styled = apply_template(&config, &instagram).unwrap();
//!
//! assert_eq!(styled.dot_style, DotStyle::Circle);
//! assert_eq!(styled.content, config.content);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{DotStyle, EyeStyle, FrameStyle, HexColor, StyleConfig};
use crate::error::StudioResult;
use crate::matrix::ErrorCorrection;
use crate::payload::ContentType;

// ============================================================================
// StylePatch
// ============================================================================

/// A partial [`StyleConfig`]. `None` fields are left untouched on merge.
///
/// Asset references are not part of a patch; they change only through
/// explicit load/remove operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dynamic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_correction_level: Option<ErrorCorrection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_style: Option<DotStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_style: Option<EyeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_style: Option<FrameStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_opacity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_opacity: Option<u8>,
}

macro_rules! write_fields {
    ($patch:expr, $target:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the patch sets no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every field that is set in the patch.
    pub(crate) fn write_into(&self, target: &mut StyleConfig) {
        write_fields!(self, target;
            content_type, content, is_dynamic, error_correction_level, size, export_size,
            foreground_color, background_color, border_color, frame_color,
            gradient_enabled, gradient_color, border_width, border_radius, padding,
            dot_padding, dot_style, eye_style, frame_style, frame_text,
            logo_size, logo_opacity, background_image_opacity,
        );
    }

    /// Serializes the patch to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a patch from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Templates
// ============================================================================

/// A named, static style preset.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub patch: StylePatch,
}

/// Merges a template into `config`, returning the new config.
///
/// The input config is never modified. If the merged result fails
/// validation nothing is applied.
///
/// # Errors
///
/// Returns [`StudioError::InvalidConfig`](crate::StudioError::InvalidConfig)
/// if the merged config violates an invariant.
pub fn apply_template(config: &StyleConfig, template: &Template) -> StudioResult<StyleConfig> {
    let next = config.merged(&template.patch)?;
    tracing::debug!(template = template.id, "applied template");
    Ok(next)
}

/// Looks up a built-in template by id (case-insensitive).
pub fn template(id: &str) -> Option<Template> {
    builtin_templates()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
}

struct Brand {
    id: &'static str,
    name: &'static str,
    foreground: HexColor,
    background: HexColor,
    border_radius: f32,
    dot: DotStyle,
    eye: EyeStyle,
    dot_padding: f32,
    frame: FrameStyle,
    frame_color: HexColor,
    gradient: Option<HexColor>,
}

impl Brand {
    fn into_template(self) -> Template {
        Template {
            id: self.id,
            name: self.name,
            patch: StylePatch {
                foreground_color: Some(self.foreground),
                background_color: Some(self.background),
                border_radius: Some(self.border_radius),
                dot_style: Some(self.dot),
                eye_style: Some(self.eye),
                dot_padding: Some(self.dot_padding),
                frame_style: Some(self.frame),
                frame_color: Some(self.frame_color),
                gradient_enabled: self.gradient.map(|_| true),
                gradient_color: self.gradient,
                ..StylePatch::default()
            },
        }
    }
}

const fn hex(rgb: u32) -> HexColor {
    HexColor::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// The built-in brand presets, in display order.
pub fn builtin_templates() -> Vec<Template> {
    let white = HexColor::WHITE;
    [
        Brand {
            id: "instagram",
            name: "Instagram",
            foreground: hex(0xE4405F),
            background: white,
            border_radius: 20.0,
            dot: DotStyle::Circle,
            eye: EyeStyle::Rounded,
            dot_padding: 2.0,
            frame: FrameStyle::Rounded,
            frame_color: hex(0xE4405F),
            gradient: Some(hex(0xFD5949)),
        },
        Brand {
            id: "facebook",
            name: "Facebook",
            foreground: hex(0x1877F2),
            background: white,
            border_radius: 15.0,
            dot: DotStyle::Rounded,
            eye: EyeStyle::Rounded,
            dot_padding: 1.0,
            frame: FrameStyle::Square,
            frame_color: hex(0x1877F2),
            gradient: None,
        },
        Brand {
            id: "twitter",
            name: "Twitter",
            foreground: hex(0x1DA1F2),
            background: white,
            border_radius: 25.0,
            dot: DotStyle::Circle,
            eye: EyeStyle::Circle,
            dot_padding: 3.0,
            frame: FrameStyle::Circle,
            frame_color: hex(0x1DA1F2),
            gradient: None,
        },
        Brand {
            id: "linkedin",
            name: "LinkedIn",
            foreground: hex(0x0A66C2),
            background: white,
            border_radius: 10.0,
            dot: DotStyle::Square,
            eye: EyeStyle::Rounded,
            dot_padding: 1.0,
            frame: FrameStyle::Square,
            frame_color: hex(0x0A66C2),
            gradient: None,
        },
        Brand {
            id: "youtube",
            name: "YouTube",
            foreground: hex(0xFF0000),
            background: white,
            border_radius: 15.0,
            dot: DotStyle::Rounded,
            eye: EyeStyle::Rounded,
            dot_padding: 2.0,
            frame: FrameStyle::Rounded,
            frame_color: hex(0xFF0000),
            gradient: None,
        },
        Brand {
            id: "spotify",
            name: "Spotify",
            foreground: hex(0x1DB954),
            background: hex(0x191414),
            border_radius: 20.0,
            dot: DotStyle::Circle,
            eye: EyeStyle::Circle,
            dot_padding: 2.0,
            frame: FrameStyle::Circle,
            frame_color: hex(0x1DB954),
            gradient: None,
        },
        Brand {
            id: "premium",
            name: "Premium",
            foreground: hex(0xFFD700),
            background: HexColor::BLACK,
            border_radius: 15.0,
            dot: DotStyle::Circle,
            eye: EyeStyle::Rounded,
            dot_padding: 3.0,
            frame: FrameStyle::Rounded,
            frame_color: hex(0xFFD700),
            gradient: Some(hex(0xFFA500)),
        },
        Brand {
            id: "modern",
            name: "Modern",
            foreground: hex(0x6366F1),
            background: white,
            border_radius: 25.0,
            dot: DotStyle::Circle,
            eye: EyeStyle::Circle,
            dot_padding: 4.0,
            frame: FrameStyle::Circle,
            frame_color: hex(0x8B5CF6),
            gradient: Some(hex(0x8B5CF6)),
        },
    ]
    .into_iter()
    .map(Brand::into_template)
    .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudioError;

    #[test]
    fn instagram_sets_brand_fields_and_keeps_content() {
        let config = StyleConfig::default().with_content(ContentType::Email, "hi@example.com");
        let applied = apply_template(&config, &template("instagram").unwrap()).unwrap();

        assert_eq!(applied.foreground_color, "#E4405F".parse().unwrap());
        assert_eq!(applied.dot_style, DotStyle::Circle);
        assert_eq!(applied.eye_style, EyeStyle::Rounded);
        assert!(applied.gradient_enabled);
        assert_eq!(applied.content_type, ContentType::Email);
        assert_eq!(applied.content, "hi@example.com");
        assert_eq!(applied.size, config.size);
    }

    #[test]
    fn application_is_idempotent() {
        let config = StyleConfig::default();
        for t in builtin_templates() {
            let once = apply_template(&config, &t).unwrap();
            let twice = apply_template(&once, &t).unwrap();
            assert_eq!(once, twice, "template {} is not idempotent", t.id);
        }
    }

    #[test]
    fn absent_fields_are_untouched() {
        let mut config = StyleConfig::default();
        config.gradient_enabled = true;
        config.gradient_color = HexColor::rgb(1, 2, 3);
        config.border_width = 7.0;
        config.frame_text = "SCAN ME".into();

        // Facebook sets no gradient fields.
        let applied = apply_template(&config, &template("facebook").unwrap()).unwrap();
        assert!(applied.gradient_enabled);
        assert_eq!(applied.gradient_color, HexColor::rgb(1, 2, 3));
        assert_eq!(applied.border_width, 7.0);
        assert_eq!(applied.frame_text, "SCAN ME");
    }

    #[test]
    fn rejected_merge_applies_nothing() {
        let config = StyleConfig::default();
        let bad = Template {
            id: "bad",
            name: "Bad",
            patch: StylePatch {
                foreground_color: Some(HexColor::rgb(9, 9, 9)),
                logo_opacity: Some(150),
                ..StylePatch::default()
            },
        };
        let err = apply_template(&config, &bad).unwrap_err();
        assert!(matches!(err, StudioError::InvalidConfig(_)));
        assert_eq!(config, StyleConfig::default());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(template("Spotify").unwrap().name, "Spotify");
        assert!(template("myspace").is_none());
        assert_eq!(builtin_templates().len(), 8);
    }

    #[test]
    fn patch_json_roundtrip_skips_unset() {
        let patch = template("premium").unwrap().patch;
        let json = patch.to_json().unwrap();
        assert!(json.contains("\"foregroundColor\":\"#ffd700\""));
        assert!(!json.contains("content"));
        assert_eq!(StylePatch::from_json(&json).unwrap(), patch);
        assert!(StylePatch::from_json("{}").unwrap().is_empty());
    }
}
