//! Normalized RGBA color value

use serde::{Deserialize, Serialize};

/// A color with every channel in the unit interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Rgba {
    /// Opaque black, the fallback for colors that cannot be decoded
    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Create a color, clamping every channel into `[0, 1]`
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    /// Create a fully opaque color
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from 8-bit channels and a unit alpha
    pub fn from_bytes(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            a,
        )
    }

    /// The RGB channels scaled to 8-bit integers
    pub fn to_bytes(&self) -> [u8; 3] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Approximate equality, for values that went through a byte round trip
    pub fn approx_eq(&self, other: &Rgba, epsilon: f64) -> bool {
        (self.r - other.r).abs() <= epsilon
            && (self.g - other.g).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.a - other.a).abs() <= epsilon
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn to_byte(value: f64) -> u8 {
    (unit(value) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_channels() {
        let color = Rgba::new(1.5, -0.2, 0.5, 2.0);
        assert_eq!(color, Rgba::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_nan_channel_becomes_zero() {
        let color = Rgba::opaque(f64::NAN, 0.0, 0.0);
        assert_eq!(color.r, 0.0);
    }

    #[test]
    fn test_byte_round_trip() {
        let color = Rgba::from_bytes(12, 128, 255, 1.0);
        assert_eq!(color.to_bytes(), [12, 128, 255]);
    }

    #[test]
    fn test_missing_alpha_deserializes_opaque() {
        let color: Rgba = serde_json::from_str(r#"{"r":1.0,"g":0.0,"b":0.0}"#).unwrap();
        assert!(color.is_opaque());
    }
}
