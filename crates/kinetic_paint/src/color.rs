//! Color types and utilities

use crate::error::PaintError;
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map_opt, value},
    number::complete::float,
    sequence::{delimited, preceded},
    Finish, IResult,
};
use serde::{Deserialize, Serialize};

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create from hex value (0xRRGGBB or 0xRRGGBBAA)
    pub fn from_hex(hex: u32) -> Self {
        if hex > 0xFFFFFF {
            Self::from_rgba8(
                ((hex >> 24) & 0xFF) as u8,
                ((hex >> 16) & 0xFF) as u8,
                ((hex >> 8) & 0xFF) as u8,
                (hex & 0xFF) as u8,
            )
        } else {
            Self::from_rgba8(
                ((hex >> 16) & 0xFF) as u8,
                ((hex >> 8) & 0xFF) as u8,
                (hex & 0xFF) as u8,
                255,
            )
        }
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Convert to u8 array [r, g, b, a]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Parse a CSS color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` and the names `black`, `white`, `transparent`.
    /// Function and color names are case-insensitive.
    pub fn parse(input: &str) -> Result<Self, PaintError> {
        all_consuming(delimited(
            multispace0,
            alt((hex_color, rgba_color, rgb_color, named_color)),
            multispace0,
        ))(input)
        .finish()
        .map(|(_, color)| color)
        .map_err(|_| PaintError::InvalidColor(input.to_string()))
    }

    /// Blend two colors at `t`.
    ///
    /// RGB channels are mixed in squared space (`sqrt(a² · (1-t) + b² · t)`),
    /// which avoids the dark band a straight lerp produces between saturated
    /// colors. Alpha is mixed linearly.
    pub fn mix(from: Color, to: Color, t: f32) -> Color {
        let channel = |a: f32, b: f32| (a * a * (1.0 - t) + b * b * t).max(0.0).sqrt();
        Color {
            r: channel(from.r, to.r),
            g: channel(from.g, to.g),
            b: channel(from.b, to.b),
            a: from.a + (to.a - from.a) * t,
        }
    }

    /// Format as a CSS `rgba()` string
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        let a = (self.a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        format!("rgba({r}, {g}, {b}, {a})")
    }
}

// ============================================================================
// Color Parsing
// ============================================================================

/// Parse hex color: #RGB, #RRGGBB, or #RRGGBBAA
fn hex_color(input: &str) -> IResult<&str, Color> {
    map_opt(
        preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit())),
        decode_hex,
    )(input)
}

fn decode_hex(digits: &str) -> Option<Color> {
    // Short form doubles each digit: `f` is `ff`
    let short = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
    let pair = |i: usize| u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok();
    match digits.len() {
        3 => Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
        6 => Some(Color::from_rgba8(pair(0)?, pair(1)?, pair(2)?, 255)),
        8 => Some(Color::from_rgba8(pair(0)?, pair(1)?, pair(2)?, pair(3)?)),
        _ => None,
    }
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(input)
}

/// 0-255 channel, normalized
fn channel(input: &str) -> IResult<&str, f32> {
    let (input, v) = float(input)?;
    Ok((input, (v / 255.0).clamp(0.0, 1.0)))
}

/// Parse rgba(r, g, b, a)
fn rgba_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgba")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, r) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, b) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, a) = float(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    Ok((input, Color::new(r, g, b, a.clamp(0.0, 1.0))))
}

/// Parse rgb(r, g, b)
fn rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, r) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, b) = channel(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    Ok((input, Color::rgb(r, g, b)))
}

/// Parse named colors
fn named_color(input: &str) -> IResult<&str, Color> {
    alt((
        value(Color::BLACK, tag_no_case("black")),
        value(Color::WHITE, tag_no_case("white")),
        value(Color::TRANSPARENT, tag_no_case("transparent")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse("#d1d5db").unwrap().to_rgba8(),
            [0xd1, 0xd5, 0xdb, 0xff]
        );
        assert_eq!(
            Color::parse("#f9fafb33").unwrap().to_rgba8(),
            [0xf9, 0xfa, 0xfb, 0x33]
        );
    }

    #[test]
    fn test_parse_rgba() {
        let c = Color::parse("rgba(252,211,77,0)").unwrap();
        assert_eq!(c.to_rgba8(), [252, 211, 77, 0]);

        let c = Color::parse("rgb(10, 20, 30)").unwrap();
        assert_eq!(c.to_rgba8(), [10, 20, 30, 255]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse("#12").is_err());
        assert!(Color::parse("rgba(1,2,3)").is_err());
        assert!(Color::parse("hsl(0, 0%, 0%)").is_err());
        assert!(Color::parse("#fffz").is_err());
        assert!(Color::parse("rgb(1, 2, 3) trailing").is_err());
    }

    #[test]
    fn test_parse_rejects_signed_hex() {
        assert!(Color::parse("#+12345").is_err());
        assert!(Color::parse("#-fff").is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Color::parse("BLACK").unwrap(), Color::BLACK);
        assert_eq!(Color::parse("Transparent").unwrap(), Color::TRANSPARENT);
        assert_eq!(Color::parse("RGB(1, 2, 3)").unwrap().to_rgba8(), [1, 2, 3, 255]);
        assert_eq!(
            Color::parse("Rgba( 4 , 5 , 6 , 0.5 )").unwrap().to_rgba8(),
            [4, 5, 6, 128]
        );
        assert_eq!(Color::parse("#ABCDEF").unwrap(), Color::parse("#abcdef").unwrap());
    }

    #[test]
    fn test_mix_endpoints_and_alpha() {
        let from = Color::from_rgba8(252, 211, 77, 0);
        let to = Color::from_rgba8(252, 211, 77, 255);

        assert_eq!(Color::mix(from, to, 0.0).to_rgba8(), from.to_rgba8());
        assert_eq!(Color::mix(from, to, 1.0).to_rgba8(), to.to_rgba8());
        assert!((Color::mix(from, to, 0.5).a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mix_is_brighter_than_lerp() {
        let mid = Color::mix(Color::BLACK, Color::WHITE, 0.5);
        // sqrt(0.5) rather than 0.5
        assert!((mid.r - 0.5f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_to_css() {
        assert_eq!(Color::BLACK.to_css(), "rgba(0, 0, 0, 1)");
        assert_eq!(
            Color::from_rgba8(252, 211, 77, 0).to_css(),
            "rgba(252, 211, 77, 0)"
        );
    }
}
