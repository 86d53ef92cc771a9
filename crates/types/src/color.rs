use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;

/// An RGB color with 0-255 channels.
///
/// Equality is structural, so the named constants compare equal to their
/// value-constructed equivalents.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED: [(&str, Color); 5] = [
    ("BLACK", Color::BLACK),
    ("WHITE", Color::WHITE),
    ("RED", Color::RED),
    ("GREEN", Color::GREEN),
    ("BLUE", Color::BLUE),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from unchecked channel values.
    ///
    /// Fails with [`ConfigError::InvalidColorChannel`] naming the first
    /// channel outside `0..=255`.
    pub fn new(red: i64, green: i64, blue: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            r: channel("red", red)?,
            g: channel("green", green)?,
            b: channel("blue", blue)?,
        })
    }

    /// The web representation, e.g. `#FF8000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a hex color string (#RGB or #RRGGBB format)
    pub fn from_hex(s: &str) -> Result<Color, ConfigError> {
        let invalid = || ConfigError::InvalidHexColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let digits: Vec<String> = match hex.len() {
            // #RGB format - expand each digit
            3 => hex.chars().map(|c| c.to_string().repeat(2)).collect(),
            6 => vec![hex[0..2].to_string(), hex[2..4].to_string(), hex[4..6].to_string()],
            _ => return Err(invalid()),
        };

        let parse = |d: &str| u8::from_str_radix(d, 16).map_err(|_| invalid());
        Ok(Color {
            r: parse(&digits[0])?,
            g: parse(&digits[1])?,
            b: parse(&digits[2])?,
        })
    }

    /// The constant name for one of the named colors, if this is one.
    pub fn name(&self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|(_, named)| named == self)
            .map(|(name, _)| *name)
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8, ConfigError> {
    u8::try_from(value).map_err(|_| ConfigError::InvalidColorChannel {
        channel: name,
        value,
    })
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for (u8, u8, u8) {
    fn from(color: Color) -> Self {
        (color.r, color.g, color.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Color.{}", name),
            None => write!(f, "({}, {}, {})", self.r, self.g, self.b),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Str(String),
            Map { r: i64, g: i64, b: i64 },
        }

        match ColorDef::deserialize(deserializer)? {
            ColorDef::Str(s) => Self::from_hex(&s).map_err(de::Error::custom),
            ColorDef::Map { r, g, b } => Self::new(r, g, b).map_err(de::Error::custom),
        }
    }
}
