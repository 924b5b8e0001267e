//! Hex color parsing.

/// Parse a hex color to RGB floats.
///
/// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa` (alpha is ignored), with or
/// without the leading `#`.
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.trim().trim_start_matches('#');
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

    match hex.len() {
        3 => {
            let mut rgb = [0.0; 3];
            for (i, c) in hex.chars().enumerate() {
                let digit = c.to_digit(16)? as f32;
                rgb[i] = digit * 17.0 / 255.0;
            }
            Some(rgb)
        }
        6 | 8 if hex.is_ascii() => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        _ => None,
    }
}
