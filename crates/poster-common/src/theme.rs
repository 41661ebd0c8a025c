//! Theme configuration for poster rendering.
//!
//! A theme is a named record of colors keyed by semantic role (background,
//! water, road classes, ...). Themes are persisted as one JSON file per
//! theme name and loaded into an immutable [`ThemeStore`] once per process.
//! A missing or malformed role is a fatal configuration error for the
//! request; a wrong-but-parseable poster is never produced by substituting
//! defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{PosterError, PosterResult};

/// An RGBA color parsed strictly from `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#RRGGBB` or `#RRGGBBAA` hex string. Anything else is an
    /// error; there is no fallback color.
    pub fn from_hex(s: &str) -> PosterResult<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| PosterError::ThemeInvalid(format!("color '{}' must start with '#'", s)))?;

        // Byte length check; non-ASCII digits would also break the channel
        // slicing below.
        if (digits.len() != 6 && digits.len() != 8) || !digits.is_ascii() {
            return Err(PosterError::ThemeInvalid(format!(
                "color '{}' must be #RRGGBB or #RRGGBBAA",
                s
            )));
        }

        let channel = |range: std::ops::Range<usize>| -> PosterResult<u8> {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PosterError::ThemeInvalid(format!("color '{}' has non-hex digits", s)))
        };

        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if digits.len() == 8 { channel(6..8)? } else { 255 };

        Ok(Self { r, g, b, a })
    }

    /// Format as lowercase hex, omitting the alpha channel when opaque.
    pub fn hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).map_err(|e| e.to_string())
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.hex()
    }
}

/// A named poster color scheme. Every color role is required; a record
/// missing any role fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Human-readable name
    pub name: String,

    /// Description of the theme
    #[serde(default)]
    pub description: String,

    pub bg: Color,
    pub text: Color,
    pub gradient_color: Color,
    pub water: Color,
    pub parks: Color,
    pub road_motorway: Color,
    pub road_primary: Color,
    pub road_secondary: Color,
    pub road_tertiary: Color,
    pub road_residential: Color,
    pub road_default: Color,
}

impl Theme {
    /// Load a theme record from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PosterError::ThemeInvalid(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
            .map_err(|e| PosterError::ThemeInvalid(format!("{}: {}", path.display(), e)))
    }

    /// Parse a theme record from a JSON string.
    pub fn from_json(json: &str) -> PosterResult<Self> {
        serde_json::from_str(json).map_err(|e| PosterError::ThemeInvalid(e.to_string()))
    }
}

/// Immutable collection of themes keyed by name, loaded once per process
/// and passed by reference into each render call.
#[derive(Debug, Clone, Default)]
pub struct ThemeStore {
    themes: HashMap<String, Theme>,
}

impl ThemeStore {
    /// Load every `*.json` record in a directory. The file stem is the
    /// lookup name. Any unreadable or malformed record fails the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> PosterResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            PosterError::ThemeInvalid(format!("cannot read theme dir {}: {}", dir.display(), e))
        })?;

        let mut themes = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                PosterError::ThemeInvalid(format!("cannot read theme dir {}: {}", dir.display(), e))
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(s) => s.to_string(),
                None => continue,
            };
            let theme = Theme::from_file(&path)?;
            themes.insert(stem, theme);
        }

        if themes.is_empty() {
            return Err(PosterError::ThemeInvalid(format!(
                "no theme records found in {}",
                dir.display()
            )));
        }

        Ok(Self { themes })
    }

    /// Build a store from in-memory themes, keyed by their `name` field.
    pub fn from_themes(themes: impl IntoIterator<Item = Theme>) -> Self {
        Self {
            themes: themes.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    /// Get a theme by name.
    pub fn get(&self, name: &str) -> PosterResult<&Theme> {
        self.themes
            .get(name)
            .ok_or_else(|| PosterError::ThemeInvalid(format!("unknown theme: {}", name)))
    }

    /// All known theme names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
