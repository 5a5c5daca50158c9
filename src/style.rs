use crate::{EditorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const DEFAULT_WIDTH: f64 = 140.0;
pub const DEFAULT_HEIGHT: f64 = 100.0;
pub const DEFAULT_BORDER_RADIUS: f64 = 5.0;
pub const DEFAULT_BORDER_WIDTH: f64 = 1.0;
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Per-node visual overrides. Every field is optional; `None` means kind-default rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StyleAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    /// Fraction in `0.0..=1.0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Degrees in `[0, 360)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
}

impl StyleAttributes {
    /// Overlay every field set in `patch` onto `self`
    pub fn merge(&mut self, patch: &StyleAttributes) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        take(&mut self.background_color, &patch.background_color);
        take(&mut self.text_color, &patch.text_color);
        take(&mut self.width, &patch.width);
        take(&mut self.height, &patch.height);
        take(&mut self.border_radius, &patch.border_radius);
        take(&mut self.border_width, &patch.border_width);
        take(&mut self.border_style, &patch.border_style);
        take(&mut self.opacity, &patch.opacity);
        take(&mut self.font_size, &patch.font_size);
        take(&mut self.font_family, &patch.font_family);
        take(&mut self.rotation, &patch.rotation);
        take(&mut self.shadow, &patch.shadow);
    }

    /// Merged copy, leaving `self` untouched
    pub fn merged(&self, patch: &StyleAttributes) -> StyleAttributes {
        let mut out = self.clone();
        out.merge(patch);
        out
    }

    /// Check if no override is set
    pub fn is_empty(&self) -> bool {
        *self == StyleAttributes::default()
    }

    /// Fill every unset field with its documented default
    pub fn resolve(&self) -> ResolvedStyle {
        ResolvedStyle {
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            border_radius: self.border_radius.unwrap_or(DEFAULT_BORDER_RADIUS),
            border_width: self.border_width.unwrap_or(DEFAULT_BORDER_WIDTH),
            border_style: self.border_style.unwrap_or_default(),
            opacity: self.opacity.unwrap_or(DEFAULT_OPACITY),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            font_family: self.font_family.clone(),
            rotation: self.rotation.unwrap_or(0.0),
            shadow: self.shadow.unwrap_or(false),
        }
    }
}

/// Style with defaults applied, as presented by the style editor
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// `None` keeps the kind's palette color
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub width: f64,
    pub height: f64,
    pub border_radius: f64,
    pub border_width: f64,
    pub border_style: BorderStyle,
    pub opacity: f64,
    pub font_size: f64,
    pub font_family: Option<String>,
    pub rotation: f64,
    pub shadow: bool,
}

impl ResolvedStyle {
    /// Opacity as the 0-100 percent shown by the slider
    pub fn opacity_percent(&self) -> f64 {
        (self.opacity * 100.0).round()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    None,
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
            BorderStyle::None => "none",
        };
        f.write_str(name)
    }
}

/// Convert a 0-100 slider value to the stored fraction
pub fn opacity_from_percent(percent: f64) -> f64 {
    let clamped = if percent.is_nan() {
        100.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    clamped / 100.0
}

/// Normalize any angle to `[0, 360)`
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Height for a width under a locked aspect ratio
pub fn locked_height(width: f64, ratio: f64) -> f64 {
    (width * ratio).round()
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(#([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|[a-zA-Z]+)$")
            .expect("color pattern is valid")
    })
}

/// Validate a CSS color (hex notation or a named color) and return it trimmed
pub fn parse_color(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if color_pattern().is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(EditorError::InvalidColor(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let resolved = StyleAttributes::default().resolve();

        assert_eq!(resolved.width, 140.0);
        assert_eq!(resolved.height, 100.0);
        assert_eq!(resolved.border_radius, 5.0);
        assert_eq!(resolved.border_width, 1.0);
        assert_eq!(resolved.font_size, 12.0);
        assert_eq!(resolved.opacity_percent(), 100.0);
        assert_eq!(resolved.border_style, BorderStyle::Solid);
        assert_eq!(resolved.rotation, 0.0);
        assert!(!resolved.shadow);
        assert!(resolved.background_color.is_none());
    }

    #[test]
    fn test_merge_keeps_unpatched_fields() {
        let mut style = StyleAttributes {
            background_color: Some("#4DABF7".to_string()),
            width: Some(200.0),
            ..Default::default()
        };
        let patch = StyleAttributes {
            width: Some(220.0),
            shadow: Some(true),
            ..Default::default()
        };

        style.merge(&patch);

        assert_eq!(style.background_color.as_deref(), Some("#4DABF7"));
        assert_eq!(style.width, Some(220.0));
        assert_eq!(style.shadow, Some(true));
        assert!(style.height.is_none());
    }

    #[test]
    fn test_opacity_from_percent() {
        assert_eq!(opacity_from_percent(55.0), 0.55);
        assert_eq!(opacity_from_percent(55.5), 0.555);
        assert_eq!(opacity_from_percent(100.0), 1.0);
        assert_eq!(opacity_from_percent(0.0), 0.0);
        assert_eq!(opacity_from_percent(150.0), 1.0);
        assert_eq!(opacity_from_percent(-5.0), 0.0);
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0.0), 0.0);
        assert_eq!(normalize_rotation(360.0), 0.0);
        assert_eq!(normalize_rotation(450.0), 90.0);
        assert_eq!(normalize_rotation(-90.0), 270.0);
        assert_eq!(normalize_rotation(f64::NAN), 0.0);
    }

    #[test]
    fn test_locked_height() {
        assert_eq!(locked_height(140.0, 0.7), 98.0);
        assert_eq!(locked_height(200.0, 0.7), 140.0);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FA5252").unwrap(), "#FA5252");
        assert_eq!(parse_color(" #fff ").unwrap(), "#fff");
        assert_eq!(parse_color("white").unwrap(), "white");
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("rgb(0, 0, 0); x").is_err());
    }

    #[test]
    fn test_style_serialization_skips_unset() {
        let style = StyleAttributes {
            opacity: Some(0.55),
            ..Default::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r#"{"opacity":0.55}"#);
    }
}
