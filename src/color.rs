//! Requantization of 16-bit LAS colors into packed 8-bit PCD colors.

use std::fmt;
use std::str::FromStr;

/// A LAS color with 16 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl From<las::Color> for Rgb16 {
    fn from(color: las::Color) -> Self {
        Rgb16 {
            red: color.red,
            green: color.green,
            blue: color.blue,
        }
    }
}

/// Scales a 16-bit channel to 8 bits as `ceil(v / 65536 * 256)`.
///
/// Inputs above 65280 produce 256, which wraps to 0 once narrowed to a byte.
/// PCD files written by the original las2pcd carry exactly these values.
pub fn downscale_16_to_8(v: u16) -> u8 {
    ceil_scaled(v) as u8
}

fn ceil_scaled(v: u16) -> u16 {
    (f32::from(v) / 65536.0 * 256.0).ceil() as u16
}

/// Packs three 8-bit channels as `0x00RRGGBB`.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Splits a packed `0x00RRGGBB` color into its channels.
pub fn unpack_rgb(rgb: u32) -> (u8, u8, u8) {
    ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// How 16-bit channels are reduced to 8 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScaling {
    /// `ceil(v / 65536 * 256)` with 256 wrapping to 0, see [downscale_16_to_8]
    #[default]
    Wrap,
    /// `ceil(v / 65536 * 256)` with 256 clamped to 255
    Clamp,
    /// `round(v * 255 / 65535)`
    Linear,
}

impl ColorScaling {
    /// Reduces a single channel.
    pub fn requantize(self, v: u16) -> u8 {
        match self {
            ColorScaling::Wrap => downscale_16_to_8(v),
            ColorScaling::Clamp => ceil_scaled(v).min(255) as u8,
            ColorScaling::Linear => ((u32::from(v) * 255 + 32767) / 65535) as u8,
        }
    }

    /// Reduces and packs a color. A missing color is black.
    pub fn requantize_rgb(self, color: Option<Rgb16>) -> u32 {
        match color {
            Some(c) => pack_rgb(
                self.requantize(c.red),
                self.requantize(c.green),
                self.requantize(c.blue),
            ),
            None => 0,
        }
    }
}

impl FromStr for ColorScaling {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wrap" => Ok(ColorScaling::Wrap),
            "clamp" => Ok(ColorScaling::Clamp),
            "linear" => Ok(ColorScaling::Linear),
            _ => Err(crate::Error::InvalidOption {
                name: "color scaling",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorScaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorScaling::Wrap => "wrap",
            ColorScaling::Clamp => "clamp",
            ColorScaling::Linear => "linear",
        };
        f.write_str(name)
    }
}
