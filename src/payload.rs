//! Payload formatting: turns a content type and raw user input into the
//! literal string handed to the encoder.

use serde::{Deserialize, Serialize};

/// Placeholder used in WiFi payloads when no password is configured.
pub const WIFI_PASSWORD_PLACEHOLDER: &str = "password";

/// The semantic kind of content encoded in the QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Url,
    Text,
    Email,
    Phone,
    Sms,
    Wifi,
    Vcard,
    Location,
    Event,
}

impl ContentType {
    pub const ALL: [ContentType; 9] = [
        Self::Url,
        Self::Text,
        Self::Email,
        Self::Phone,
        Self::Sms,
        Self::Wifi,
        Self::Vcard,
        Self::Location,
        Self::Event,
    ];

    /// Stable lowercase identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Sms => "sms",
            Self::Wifi => "wifi",
            Self::Vcard => "vcard",
            Self::Location => "location",
            Self::Event => "event",
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown content type '{s}'"))
    }
}

/// Formats raw input for the given content type.
///
/// Empty input is passed through untouched for every type except the
/// templated ones; callers must refuse to encode a blank payload.
pub fn format_payload(content_type: ContentType, raw: &str) -> String {
    match content_type {
        ContentType::Url => {
            if has_scheme(raw) {
                raw.to_string()
            } else {
                format!("https://{raw}")
            }
        }
        ContentType::Email => format!("mailto:{raw}"),
        ContentType::Phone => format!("tel:{raw}"),
        ContentType::Sms => format!("sms:{raw}"),
        ContentType::Wifi => format_wifi_payload(raw, None),
        ContentType::Vcard => format!("BEGIN:VCARD\nVERSION:3.0\nFN:{raw}\nEND:VCARD"),
        ContentType::Location => format!("geo:{raw}"),
        ContentType::Event | ContentType::Text => raw.to_string(),
    }
}

/// Formats a WPA network join payload.
///
/// Without a password the literal [`WIFI_PASSWORD_PLACEHOLDER`] is emitted.
pub fn format_wifi_payload(ssid: &str, password: Option<&str>) -> String {
    let password = password.unwrap_or(WIFI_PASSWORD_PLACEHOLDER);
    format!("WIFI:T:WPA;S:{ssid};P:{password};H:false;;")
}

/// True if `raw` begins with a URI scheme such as `https:` or `mailto:`.
///
/// A colon followed by a digit reads as `host:port`, not as a scheme.
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, rest)) = raw.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    };
    valid && rest.chars().next().is_some_and(|c| !c.is_ascii_digit())
}
