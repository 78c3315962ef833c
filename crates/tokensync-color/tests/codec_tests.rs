//! Property tests for the color codec.
//!
//! Decoding what the encoder produced must give back the same color, up to
//! 8-bit channel quantization.

use proptest::prelude::*;
use tokensync_color::{Rgba, decode_color, encode_color, parse_color};

fn channel() -> impl Strategy<Value = f64> {
    (0u8..=255).prop_map(|b| f64::from(b) / 255.0)
}

proptest! {
    #[test]
    fn opaque_colors_survive_hex(r in channel(), g in channel(), b in channel()) {
        let color = Rgba::opaque(r, g, b);
        let encoded = encode_color(&color);
        prop_assert!(encoded.starts_with('#'));
        prop_assert_eq!(encoded.len(), 7);
        let decoded = parse_color(&encoded).unwrap();
        prop_assert!(decoded.approx_eq(&color, 1e-9));
    }

    #[test]
    fn translucent_colors_survive_rgba(
        r in channel(),
        g in channel(),
        b in channel(),
        alpha in 0u16..1000,
    ) {
        let a = f64::from(alpha) / 1000.0;
        let color = Rgba::new(r, g, b, a);
        let encoded = encode_color(&color);
        prop_assert!(encoded.starts_with("rgba("));
        let decoded = parse_color(&encoded).unwrap();
        prop_assert!(decoded.approx_eq(&color, 1e-4));
    }

    #[test]
    fn decode_never_panics(input in ".*") {
        let color = decode_color(&input);
        prop_assert!((0.0..=1.0).contains(&color.r));
        prop_assert!((0.0..=1.0).contains(&color.a));
    }
}

#[test]
fn spec_examples() {
    assert_eq!(parse_color("#ff0000").unwrap(), Rgba::opaque(1.0, 0.0, 0.0));
    assert_eq!(
        parse_color("rgb(255,0,0)").unwrap(),
        Rgba::opaque(1.0, 0.0, 0.0)
    );
    assert_eq!(
        parse_color("rgba(255,0,0,0.5)").unwrap(),
        Rgba::new(1.0, 0.0, 0.0, 0.5)
    );
    assert_eq!(encode_color(&Rgba::new(1.0, 0.0, 0.0, 1.0)), "#ff0000");
    assert_eq!(
        encode_color(&Rgba::new(1.0, 0.0, 0.0, 0.5)),
        "rgba(255, 0, 0, 0.5000)"
    );
}
