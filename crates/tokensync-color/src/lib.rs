//! Color codec for tokensync
//!
//! Converts between the textual color encodings found in design token
//! documents and normalized unit-interval RGBA channels used by the
//! variable store.
//!
//! # Decoding
//!
//! Recognized inputs, checked in this order:
//!
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)` with 8-bit channels
//! - `hsl(h, s%, l%)` and `hsla(h, s%, l%, a)` with hue in degrees
//! - `#rgb` and `#rrggbb` hex
//! - float objects such as `{ r: 0.5, g: 0.5, b: 0.5, opacity: 0.4 }`
//!
//! [`parse_color`] is strict and returns an error for anything else.
//! [`decode_color`] is lenient: it logs a warning and yields opaque black.
//!
//! # Encoding
//!
//! ```
//! use tokensync_color::{encode_color, Rgba};
//!
//! assert_eq!(encode_color(&Rgba::opaque(1.0, 0.0, 0.0)), "#ff0000");
//! assert_eq!(
//!     encode_color(&Rgba::new(1.0, 0.0, 0.0, 0.5)),
//!     "rgba(255, 0, 0, 0.5000)"
//! );
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod hsl;
pub mod rgba;

pub use decode::{ColorFormat, decode_color, parse_color};
pub use encode::encode_color;
pub use error::{Error, Result};
pub use rgba::Rgba;
