//! Textual color encoding

use crate::Rgba;

/// Encode a color for a design token document.
///
/// Fully opaque colors become 6-digit lowercase hex. Anything else becomes
/// `rgba(R, G, B, A)` with 8-bit channels and alpha to four decimal places.
pub fn encode_color(color: &Rgba) -> String {
    let [r, g, b] = color.to_bytes();
    if color.is_opaque() {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("rgba({}, {}, {}, {:.4})", r, g, b, color.a)
    }
}
