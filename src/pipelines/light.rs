//! Point light parameters and the hex colour strings they are edited with.

use std::{fmt, str::FromStr};

use anyhow::{Context as _, bail};
use cgmath::{Matrix4, Vector3, Vector4};

/// Parses `#rrggbb` into normalized RGB: each byte is read as base-16 and
/// divided by 255.
pub fn hex_to_rgb(hex: &str) -> anyhow::Result<[f32; 3]> {
    let color: HexColor = hex.parse()?;
    Ok(color.to_rgb())
}

/// A validated `#rrggbb` colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn to_rgb(&self) -> [f32; 3] {
        self.0.map(|byte| byte as f32 / 255.0)
    }
}

impl FromStr for HexColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = match s.strip_prefix('#') {
            Some(digits) if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()) => {
                digits
            }
            _ => bail!("expected a colour of the form #rrggbb, got '{s}'"),
        };
        let mut rgb = [0u8; 3];
        for (i, byte) in rgb.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .with_context(|| format!("'{pair}' in '{s}' is not a hex byte"))?;
        }
        Ok(Self(rgb))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// World-space light position and its Phong colour terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSettings {
    pub position: Vector3<f32>,
    pub ambient: HexColor,
    pub diffuse: HexColor,
    pub specular: HexColor,
}

impl LightSettings {
    /// The light position in view space, `view · (x, y, z, 1)`.
    pub fn view_position(&self, view: &Matrix4<f32>) -> Vector4<f32> {
        view * self.position.extend(1.0)
    }
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            position: Vector3::new(3.0, 4.0, 4.0),
            ambient: HexColor::new(0x20, 0x20, 0x20),
            diffuse: HexColor::new(0xff, 0xff, 0xff),
            specular: HexColor::new(0xff, 0xff, 0xff),
        }
    }
}
