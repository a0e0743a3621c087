use std::fmt::Debug;
use std::path::Path;
use std::str::FromStr;
use serde::{Deserialize, Serialize, Serializer};
use crate::errors::FieldLinesError;
use crate::survey::SurveyMethod;

/// One row of the teams CSV. The CSV has a header row; `team` and `color` are required,
/// `abbr` and `method` may be left out entirely or left blank.
#[derive(Clone, Debug, Deserialize)]
pub struct Team {
    /// also the name of the survey file, `<team>.kml`
    pub team: String,
    pub color: Color,
    #[serde(default)]
    pub abbr: Option<String>,
    #[serde(default)]
    pub method: Option<SurveyMethod>,
}

impl Team {
    pub fn load_all<P: AsRef<Path> + Debug>(path: P) -> Result<Vec<Team>, FieldLinesError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut teams: Vec<Team> = Vec::new();
        for team in reader.deserialize() {
            teams.push(team?);
        }
        Ok(teams)
    }
}

/// An RGBA colour with channels in `0..=1`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// a few CSS keywords, enough for the colours teams actually wear
const NAMED_COLORS: [(&str, [u8; 3]); 16] = [
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("navy", [0, 0, 128]),
    ("yellow", [255, 255, 0]),
    ("gold", [255, 215, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("maroon", [128, 0, 0]),
    ("crimson", [220, 20, 60]),
    ("gray", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("teal", [0, 128, 128]),
];

impl Color {
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self{
        Color {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// `[red, green, blue, alpha]`, the layout the globe viewer unpacks
    pub fn pack(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// KML's `aabbggrr` hex, the channels in reverse order
    pub fn kml_color(&self) -> String {
        let byte = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("{:02x}{:02x}{:02x}{:02x}", byte(self.alpha), byte(self.blue), byte(self.green), byte(self.red))
    }

    fn from_hex(hex: &str) -> Option<Color> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            4 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// the inside of `rgb(...)` or `rgba(...)`, channels 0-255 and alpha 0-1
    fn from_functional(arguments: &str, with_alpha: bool) -> Option<Color> {
        let parts: Vec<&str> = arguments.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |part: &str| part.parse::<f32>().ok()
            .filter(|value| (0.0..=255.0).contains(value))
            .map(|value| value / 255.0);
        let alpha = match parts.get(3) {
            Some(part) => part.parse::<f32>().ok().filter(|value| (0.0..=1.0).contains(value))?,
            None => 1.0,
        };
        Some(Color {
            red: channel(parts[0])?,
            green: channel(parts[1])?,
            blue: channel(parts[2])?,
            alpha,
        })
    }
}

impl FromStr for Color {
    type Err = FieldLinesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let color = if let Some(hex) = text.strip_prefix('#') {
            Color::from_hex(hex)
        } else if let Some(arguments) = text.strip_prefix("rgba(").and_then(|rest| rest.strip_suffix(')')) {
            Color::from_functional(arguments, true)
        } else if let Some(arguments) = text.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            Color::from_functional(arguments, false)
        } else {
            NAMED_COLORS.iter()
                .find(|(name, _)| *name == text)
                .map(|(_, [r, g, b])| Color::from_rgba8(*r, *g, *b, 255))
        };
        color.ok_or_else(|| FieldLinesError::ColorParseError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.pack().serialize(serializer)
    }
}
