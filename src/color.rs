//! Palette colors for particles and connective lines
//!
//! Palette entries are written as CSS color strings in `particles.toml`:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hwb()`, `oklch()`
//! - Named: `violet`, `cyan`, etc.
//!
//! Canvas drawing needs the reverse direction, so [`css_rgba`] formats a
//! color plus a per-draw opacity as an `rgba(...)` style string.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Violet used for particles and particle-to-particle lines
pub const VIOLET: Rgba<u8> = Rgba([124, 58, 237, 255]);
/// Cyan used for particles and particle-to-pointer lines
pub const CYAN: Rgba<u8> = Rgba([6, 182, 212, 255]);
/// Lavender particle color
pub const LAVENDER: Rgba<u8> = Rgba([139, 92, 246, 255]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use particle_field::color::parse_color;
///
/// assert_eq!(parse_color("#7c3aed").unwrap(), image::Rgba([124, 58, 237, 255]));
/// assert_eq!(parse_color("rgb(6, 182, 212)").unwrap(), image::Rgba([6, 182, 212, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(s),
    }
}

/// Parse the digits of a hex color (without the leading '#').
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(bad));
    }

    // All digits are ASCII hex at this point, so byte slicing is safe
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);

    match hex.len() {
        3 => Ok(Rgba([nibble(0) * 17, nibble(1) * 17, nibble(2) * 17, 255])),
        4 => Ok(Rgba([nibble(0) * 17, nibble(1) * 17, nibble(2) * 17, nibble(3) * 17])),
        6 => Ok(Rgba([byte(0), byte(2), byte(4), 255])),
        8 => Ok(Rgba([byte(0), byte(2), byte(4), byte(6)])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                unit_to_byte(rgb.r as f64),
                unit_to_byte(rgb.g as f64),
                unit_to_byte(rgb.b as f64),
                unit_to_byte(rgb.alpha as f64),
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

fn unit_to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Effective opacity of a draw: the color's own alpha times the draw opacity.
pub fn effective_alpha(color: Rgba<u8>, opacity: f64) -> f64 {
    (color[3] as f64 / 255.0) * opacity.clamp(0.0, 1.0)
}

/// Format a color and a draw opacity as a canvas style string.
///
/// ```
/// use particle_field::color::{css_rgba, VIOLET};
///
/// assert_eq!(css_rgba(VIOLET, 0.5), "rgba(124,58,237,0.5)");
/// ```
pub fn css_rgba(color: Rgba<u8>, opacity: f64) -> String {
    let alpha = effective_alpha(color, opacity);
    format!("rgba({},{},{},{})", color[0], color[1], color[2], round_alpha(alpha))
}

/// Trim alpha to 4 decimal places so style strings stay short.
fn round_alpha(alpha: f64) -> f64 {
    (alpha * 10_000.0).round() / 10_000.0
}
