//! Container configuration.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};

use crate::camera::Viewpoint;
use crate::error::{FormError, FormResult};

/// Parse a CSS color string (`#rgb`, `#rrggbb`, `#rrggbbaa`, named colors,
/// `rgb(...)`, ...) into an sRGB color.
pub fn parse_css_color(value: &str) -> FormResult<Color> {
    parse_color(value.trim())
        .map(|color| color.to_alpha_color::<Srgb>())
        .map_err(|err| FormError::InvalidColor {
            value: value.to_string(),
            reason: err.to_string(),
        })
}

/// Format a color as `#rrggbb`, or `#rrggbbaa` when not opaque.
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Serde adapter storing colors as CSS strings.
pub mod css_color {
    use super::{Color, parse_css_color, to_hex};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_css_color(&value).map_err(serde::de::Error::custom)
    }
}

/// Configuration of a mounted form container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Whether the background panel is shown.
    pub background: bool,
    /// Clear color behind the scene.
    #[serde(with = "css_color")]
    pub background_color: Color,
    /// Color of the background panel.
    #[serde(with = "css_color")]
    pub form_color: Color,
    /// Width given to every child widget.
    pub width: f64,
    /// Space between the panel edge and the first/last child.
    pub padding: f64,
    /// Vertical gap between children.
    pub gap: f64,
    /// Camera viewpoint name; unknown names mean front.
    pub camera: String,
    /// Camera zoom factor.
    pub zoom: f64,
    /// Whether meshes and lights cast shadows.
    pub shadows: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            background: true,
            background_color: Color::from_rgb8(0xde, 0xfd, 0xfe),
            form_color: Color::from_rgb8(0xff, 0xd7, 0x00),
            width: 6.0,
            padding: 1.0,
            gap: 0.5,
            camera: Viewpoint::Front.name().to_string(),
            zoom: 1.0,
            shadows: true,
        }
    }
}

impl FormConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> FormResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the dimensions make sense.
    pub fn validate(&self) -> FormResult<()> {
        if !(self.width > 0.0) {
            return Err(FormError::InvalidConfig(format!("width must be positive, got {}", self.width)));
        }
        if !(self.zoom > 0.0) {
            return Err(FormError::InvalidConfig(format!("zoom must be positive, got {}", self.zoom)));
        }
        if !(self.padding >= 0.0) {
            return Err(FormError::InvalidConfig(format!("padding must not be negative, got {}", self.padding)));
        }
        if !(self.gap >= 0.0) {
            return Err(FormError::InvalidConfig(format!("gap must not be negative, got {}", self.gap)));
        }
        Ok(())
    }

    /// The configured viewpoint.
    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint::from_name(&self.camera)
    }
}
