use std::{fmt, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color. Serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}
impl Pixel {
    /// `#6366F1`, the default icon background.
    pub const BRAND: Self = Self::rgb(99, 102, 241);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, u8::MAX)
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl FromStr for Pixel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            anyhow::bail!("expected #RRGGBB or #RRGGBBAA, got {s:?}");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("invalid color {s:?}"))
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { u8::MAX };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)?;
        if self.alpha != u8::MAX {
            write!(f, "{:02X}", self.alpha)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Pixel {
    type Error = anyhow::Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pixel> for String {
    fn from(value: Pixel) -> Self {
        value.to_string()
    }
}

impl From<Pixel> for image::Rgba<u8> {
    fn from(value: Pixel) -> Self {
        image::Rgba(value.to_rgba())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_hex() {
        assert_eq!("#6366F1".parse::<Pixel>().unwrap(), Pixel::BRAND);
        assert_eq!("6366f1".parse::<Pixel>().unwrap(), Pixel::BRAND);
        assert_eq!(Pixel::BRAND.to_string(), "#6366F1");
    }

    #[test]
    fn alpha_is_optional() {
        let p: Pixel = "#00000080".parse().unwrap();
        assert_eq!(p, Pixel::new(0, 0, 0, 0x80));
        assert_eq!(p.to_string(), "#00000080");
    }

    #[test]
    fn rejects_junk() {
        assert!("#12345".parse::<Pixel>().is_err());
        assert!("#GGGGGG".parse::<Pixel>().is_err());
        assert!("#ééé".parse::<Pixel>().is_err());
    }

    #[test]
    fn serde_uses_hex() {
        let json = serde_json::to_string(&Pixel::WHITE).unwrap();
        assert_eq!(json, "\"#FFFFFF\"");
        let back: Pixel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Pixel::WHITE);
    }
}
