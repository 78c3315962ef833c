//! Semantic token type classification

use std::fmt;

/// Token types that map onto a numeric variable
pub const NUMERIC_TYPES: &[&str] = &[
    "number",
    "borderRadius",
    "borderWidth",
    "dimension",
    "spacing",
    "paragraphSpacing",
    "fontSizes",
    "fontSize",
];

/// Token type for colors
pub const COLOR_TYPE: &str = "color";

/// Token type for font families, which may be given as a list
pub const FONT_FAMILY_TYPE: &str = "fontFamily";

/// Classification of a token's `$type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    Color,
    Number,
    /// Any other type; becomes a string variable when the value is textual
    Other(String),
}

impl TokenType {
    pub fn classify(raw: &str) -> Self {
        if raw == COLOR_TYPE {
            TokenType::Color
        } else if NUMERIC_TYPES.contains(&raw) {
            TokenType::Number
        } else {
            TokenType::Other(raw.to_string())
        }
    }

    pub fn is_font_family(&self) -> bool {
        matches!(self, TokenType::Other(name) if name == FONT_FAMILY_TYPE)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Color => f.write_str(COLOR_TYPE),
            TokenType::Number => f.write_str("number"),
            TokenType::Other(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("number")]
    #[case("borderRadius")]
    #[case("borderWidth")]
    #[case("dimension")]
    #[case("spacing")]
    #[case("paragraphSpacing")]
    #[case("fontSizes")]
    fn test_numeric_family(#[case] raw: &str) {
        assert_eq!(TokenType::classify(raw), TokenType::Number);
    }

    #[test]
    fn test_color() {
        assert_eq!(TokenType::classify("color"), TokenType::Color);
    }

    #[test]
    fn test_other_keeps_name() {
        let ty = TokenType::classify("strokeStyle");
        assert_eq!(ty, TokenType::Other("strokeStyle".to_string()));
        assert_eq!(ty.to_string(), "strokeStyle");
    }

    #[test]
    fn test_font_family() {
        assert!(TokenType::classify("fontFamily").is_font_family());
        assert!(!TokenType::classify("fontWeight").is_font_family());
    }
}
