//! Font-size fitting for long field values

use crate::config::{Color, FontFamily, StyleDescriptor};

/// Texts up to this many characters keep their nominal font size
pub const FIT_THRESHOLD_CHARS: usize = 20;

/// A style with its font size settled for one particular text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub font_size: f32,
    pub font_family: FontFamily,
    pub color: Color,
}

impl From<&StyleDescriptor> for ResolvedStyle {
    fn from(style: &StyleDescriptor) -> Self {
        Self {
            anchor_x: style.anchor_x,
            anchor_y: style.anchor_y,
            font_size: style.font_size,
            font_family: style.font_family,
            color: style.color,
        }
    }
}

/// Shrink the font size of `style` so that long text stays inside its region
///
/// Length is counted in characters. Above [`FIT_THRESHOLD_CHARS`] the size is
/// scaled by `threshold / length`, but never below `min_font_size` (half the
/// nominal size when unset) and never above the nominal size.
pub fn fit_text(text: &str, style: &StyleDescriptor) -> ResolvedStyle {
    let mut resolved = ResolvedStyle::from(style);

    let length = text.chars().count();
    if length <= FIT_THRESHOLD_CHARS {
        return resolved;
    }

    let reduction = (FIT_THRESHOLD_CHARS as f32 / length as f32).min(1.0);
    let floor = style.min_font_size.unwrap_or(style.font_size / 2.0);
    resolved.font_size = (style.font_size * reduction)
        .max(floor)
        .min(style.font_size);

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: f32, min_font_size: Option<f32>) -> StyleDescriptor {
        StyleDescriptor {
            anchor_x: 421.0,
            anchor_y: 300.0,
            font_size,
            min_font_size,
            font_family: FontFamily::HelveticaBold,
            color: Color::rgb(0.1, 0.2, 0.5),
        }
    }

    #[test]
    fn test_short_text_is_unchanged() {
        let style = style(36.0, Some(18.0));
        for length in 0..=FIT_THRESHOLD_CHARS {
            let text = "x".repeat(length);
            assert_eq!(fit_text(&text, &style), ResolvedStyle::from(&style));
        }
    }

    #[test]
    fn test_long_text_is_scaled() {
        let style = style(36.0, Some(10.0));
        // 36 * 20 / 30
        let resolved = fit_text(&"x".repeat(30), &style);
        assert!((resolved.font_size - 24.0).abs() < 1e-4);
        assert_eq!(resolved.anchor_x, style.anchor_x);
        assert_eq!(resolved.font_family, style.font_family);
    }

    #[test]
    fn test_floor_is_min_font_size() {
        let style = style(36.0, Some(18.0));
        let resolved = fit_text(&"x".repeat(200), &style);
        assert_eq!(resolved.font_size, 18.0);
    }

    #[test]
    fn test_floor_defaults_to_half_size() {
        let style = style(30.0, None);
        let resolved = fit_text(&"x".repeat(500), &style);
        assert_eq!(resolved.font_size, 15.0);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let style = style(36.0, None);
        // 20 characters, 40 bytes
        let text = "é".repeat(20);
        assert_eq!(fit_text(&text, &style).font_size, 36.0);
    }

    #[test]
    fn test_size_is_bounded_and_non_increasing() {
        for min in [None, Some(6.0), Some(20.0), Some(24.0)] {
            let style = style(24.0, min);
            let floor = min.unwrap_or(12.0);
            let mut previous = style.font_size;

            for length in FIT_THRESHOLD_CHARS + 1..300 {
                let size = fit_text(&"w".repeat(length), &style).font_size;
                assert!(size <= style.font_size);
                assert!(size >= floor);
                assert!(size <= previous, "size grew at length {length}");
                previous = size;
            }
        }
    }
}
