//! Textual color decoding

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::hsl::hsl_to_rgb;
use crate::{Error, Result, Rgba};

static RGB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").unwrap()
});

static RGBA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*([\d.]+)\s*\)$")
        .unwrap()
});

static HSL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^hsl\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*\)$").unwrap()
});

static HSLA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^hsla\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*,\s*([\d.]+)\s*\)$")
        .unwrap()
});

static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{3}|[A-Fa-f0-9]{6})$").unwrap());

static FLOAT_OBJECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\{\s*"?r"?\s*:\s*([\d.]+)\s*,\s*"?g"?\s*:\s*([\d.]+)\s*,\s*"?b"?\s*:\s*([\d.]+)\s*(?:,\s*"?opacity"?\s*:\s*([\d.]+)\s*)?\}$"#,
    )
    .unwrap()
});

/// Textual color encodings understood by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    Hex,
    FloatObject,
}

impl ColorFormat {
    /// Detect the encoding of `input` (already trimmed).
    ///
    /// Patterns are mutually exclusive and checked in priority order.
    pub fn detect(input: &str) -> Option<Self> {
        [
            (ColorFormat::Rgb, &*RGB_PATTERN),
            (ColorFormat::Rgba, &*RGBA_PATTERN),
            (ColorFormat::Hsl, &*HSL_PATTERN),
            (ColorFormat::Hsla, &*HSLA_PATTERN),
            (ColorFormat::Hex, &*HEX_PATTERN),
            (ColorFormat::FloatObject, &*FLOAT_OBJECT_PATTERN),
        ]
        .into_iter()
        .find(|(_, pattern)| pattern.is_match(input))
        .map(|(format, _)| format)
    }

    fn pattern(self) -> &'static Regex {
        match self {
            ColorFormat::Rgb => &RGB_PATTERN,
            ColorFormat::Rgba => &RGBA_PATTERN,
            ColorFormat::Hsl => &HSL_PATTERN,
            ColorFormat::Hsla => &HSLA_PATTERN,
            ColorFormat::Hex => &HEX_PATTERN,
            ColorFormat::FloatObject => &FLOAT_OBJECT_PATTERN,
        }
    }
}

/// Parse a textual color into normalized channels.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] when no known encoding matches and
/// [`Error::InvalidChannel`] when a matched channel is not a valid number.
///
/// # Examples
///
/// ```
/// use tokensync_color::{parse_color, Rgba};
///
/// assert_eq!(parse_color("#ff0000").unwrap(), Rgba::opaque(1.0, 0.0, 0.0));
/// assert_eq!(parse_color("rgb(255, 0, 0)").unwrap(), Rgba::opaque(1.0, 0.0, 0.0));
/// assert!(parse_color("papayawhip").is_err());
/// ```
pub fn parse_color(input: &str) -> Result<Rgba> {
    let color = input.trim();
    let format = ColorFormat::detect(color).ok_or_else(|| Error::unsupported(color))?;
    let caps = format
        .pattern()
        .captures(color)
        .ok_or_else(|| Error::unsupported(color))?;

    let channels = Channels { input: color, caps };

    let rgba = match format {
        ColorFormat::Rgb => Rgba::new(
            channels.byte(1, "red")?,
            channels.byte(2, "green")?,
            channels.byte(3, "blue")?,
            1.0,
        ),
        ColorFormat::Rgba => Rgba::new(
            channels.byte(1, "red")?,
            channels.byte(2, "green")?,
            channels.byte(3, "blue")?,
            channels.float(4, "alpha")?,
        ),
        ColorFormat::Hsl | ColorFormat::Hsla => {
            let (r, g, b) = hsl_to_rgb(
                channels.float(1, "hue")?,
                channels.percent(2, "saturation")?,
                channels.percent(3, "lightness")?,
            );
            let alpha = if format == ColorFormat::Hsla {
                channels.float(4, "alpha")?
            } else {
                1.0
            };
            Rgba::new(r, g, b, alpha)
        }
        ColorFormat::Hex => decode_hex(color)?,
        ColorFormat::FloatObject => {
            let alpha = match channels.caps.get(4) {
                Some(_) => channels.float(4, "opacity")?,
                None => 1.0,
            };
            Rgba::new(
                channels.float(1, "red")?,
                channels.float(2, "green")?,
                channels.float(3, "blue")?,
                alpha,
            )
        }
    };

    Ok(rgba)
}

/// Decode a textual color, falling back to opaque black.
///
/// Unrecognized input never fails; it is logged at warn level.
pub fn decode_color(input: &str) -> Rgba {
    match parse_color(input) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!(input, error = %e, "Unhandled color format, using black");
            Rgba::BLACK
        }
    }
}

struct Channels<'a> {
    input: &'a str,
    caps: Captures<'a>,
}

impl Channels<'_> {
    fn float(&self, index: usize, channel: &'static str) -> Result<f64> {
        self.caps
            .get(index)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(|| Error::InvalidChannel {
                input: self.input.to_string(),
                channel,
            })
    }

    fn byte(&self, index: usize, channel: &'static str) -> Result<f64> {
        Ok(self.float(index, channel)? / 255.0)
    }

    fn percent(&self, index: usize, channel: &'static str) -> Result<f64> {
        Ok(self.float(index, channel)? / 100.0)
    }
}

fn decode_hex(color: &str) -> Result<Rgba> {
    let digits = &color[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let channel = |range: std::ops::Range<usize>, name: &'static str| {
        u8::from_str_radix(&expanded[range], 16).map_err(|_| Error::InvalidChannel {
            input: color.to_string(),
            channel: name,
        })
    };

    Ok(Rgba::from_bytes(
        channel(0..2, "red")?,
        channel(2..4, "green")?,
        channel(4..6, "blue")?,
        1.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("rgb(1, 2, 3)", ColorFormat::Rgb)]
    #[case("rgba(1, 2, 3, 0.5)", ColorFormat::Rgba)]
    #[case("hsl(10, 20%, 30%)", ColorFormat::Hsl)]
    #[case("hsla(10, 20%, 30%, 0.4)", ColorFormat::Hsla)]
    #[case("#abc", ColorFormat::Hex)]
    #[case("#aabbcc", ColorFormat::Hex)]
    #[case("{ r: 0.1, g: 0.2, b: 0.3 }", ColorFormat::FloatObject)]
    #[case(r#"{"r": 0.1, "g": 0.2, "b": 0.3, "opacity": 0.5}"#, ColorFormat::FloatObject)]
    fn test_detect_format(#[case] input: &str, #[case] expected: ColorFormat) {
        assert_eq!(ColorFormat::detect(input), Some(expected));
    }

    #[rstest]
    #[case("#abcd")]
    #[case("#ggg")]
    #[case("rgb(1, 2)")]
    #[case("red")]
    #[case("")]
    fn test_detect_rejects(#[case] input: &str) {
        assert_eq!(ColorFormat::detect(input), None);
    }

    #[test]
    fn test_parse_hex_red() {
        assert_eq!(parse_color("#ff0000").unwrap(), Rgba::opaque(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_short_hex_expands() {
        assert_eq!(parse_color("#f00").unwrap(), parse_color("#ff0000").unwrap());
    }

    #[test]
    fn test_parse_uppercase_hex() {
        assert_eq!(parse_color("#FFFFFF").unwrap(), Rgba::opaque(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(
            parse_color("rgb(255,0,0)").unwrap(),
            Rgba::opaque(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_parse_rgba() {
        assert_eq!(
            parse_color("rgba(255,0,0,0.5)").unwrap(),
            Rgba::new(1.0, 0.0, 0.0, 0.5)
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            parse_color("  rgb( 0 , 255 , 0 )  ").unwrap(),
            Rgba::opaque(0.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_parse_hsla_keeps_alpha() {
        let color = parse_color("hsla(240, 100%, 50%, 0.25)").unwrap();
        assert!(color.approx_eq(&Rgba::new(0.0, 0.0, 1.0, 0.25), 1e-9));
    }

    #[test]
    fn test_parse_hsl_gray() {
        let color = parse_color("hsl(90, 0%, 40%)").unwrap();
        assert!(color.approx_eq(&Rgba::opaque(0.4, 0.4, 0.4), 1e-9));
    }

    #[test]
    fn test_parse_float_object_with_opacity() {
        let color = parse_color("{ r: 0.5, g: 0.25, b: 1, opacity: 0.75 }").unwrap();
        assert_eq!(color, Rgba::new(0.5, 0.25, 1.0, 0.75));
    }

    #[test]
    fn test_parse_float_object_without_opacity() {
        let color = parse_color("{r: 0.5, g: 0.25, b: 1}").unwrap();
        assert!(color.is_opaque());
    }

    #[test]
    fn test_parse_out_of_range_byte_clamps() {
        assert_eq!(
            parse_color("rgb(300, 0, 0)").unwrap(),
            Rgba::opaque(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_parse_malformed_alpha_is_channel_error() {
        let err = parse_color("rgba(1, 2, 3, 1.2.3)").unwrap_err();
        assert!(matches!(err, Error::InvalidChannel { channel: "alpha", .. }));
    }

    #[test]
    fn test_parse_unknown_is_unsupported() {
        let err = parse_color("papayawhip").unwrap_err();
        assert_eq!(err, Error::unsupported("papayawhip"));
    }

    #[test]
    fn test_decode_falls_back_to_black() {
        assert_eq!(decode_color("not a color"), Rgba::BLACK);
    }
}
