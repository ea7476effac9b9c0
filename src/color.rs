//! Text colors.
//!
//! Colors are 24-bit values written as `#rrggbb` in configuration files and rendered
//! using the truecolor form of ANSI escape sequences.

use crate::error::{Error, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Parses `value` as a hex color of the form `#rrggbb` or `rrggbb`, where
    /// digits are case insensitive.
    pub fn parse(value: &str) -> Result<Rgb> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_color(value));
        }
        let component = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::invalid_color(value))
        };
        Ok(Rgb::new(component(0)?, component(2)?, component(4)?))
    }

    /// Returns the color that best contrasts with `self`, used for drawing the cursor
    /// cell.
    pub fn inverse(&self) -> Rgb {
        Rgb::new(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Rgb> {
        Rgb::parse(s)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'a> Deserialize<'a> for Rgb {
    fn deserialize<D: Deserializer<'a>>(deserializer: D) -> std::result::Result<Rgb, D::Error> {
        let value = String::deserialize(deserializer)?;
        Rgb::parse(&value).map_err(de::Error::custom)
    }
}
