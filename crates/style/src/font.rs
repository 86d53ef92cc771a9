use banded_types::{ConfigError, FontId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// The id under which every registry holds its fallback font.
pub const DEFAULT_FONT_ID: &str = "default";

/// A combination of style flags (`ITALIC | BOLD | UNDERLINED`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontStyle(u8);

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle(0);
    pub const ITALIC: FontStyle = FontStyle(1);
    pub const BOLD: FontStyle = FontStyle(2);
    pub const UNDERLINED: FontStyle = FontStyle(4);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: FontStyle) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }

    pub fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    pub fn is_underlined(self) -> bool {
        self.contains(Self::UNDERLINED)
    }
}

impl BitOr for FontStyle {
    type Output = FontStyle;

    fn bitor(self, rhs: FontStyle) -> FontStyle {
        FontStyle(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontStyle {
    fn bitor_assign(&mut self, rhs: FontStyle) {
        self.0 |= rhs.0;
    }
}

/// A font definition waiting to be registered.
///
/// When `id` is `None` the registry assigns one (`font_0`, `font_1`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    #[serde(default)]
    pub id: Option<String>,
    /// Comma-separated list of candidate faces, in fallback order.
    pub faces: String,
    /// Size in points.
    pub size: f32,
    #[serde(default)]
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(faces: impl Into<String>, size: f32) -> Self {
        Self {
            id: None,
            faces: faces.into(),
            size,
            style: FontStyle::REGULAR,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// A registered font.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    id: FontId,
    faces: Vec<String>,
    pub size: f32,
    pub style: FontStyle,
}

impl Font {
    pub fn id(&self) -> &FontId {
        &self.id
    }

    /// The primary face name.
    pub fn face(&self) -> &str {
        &self.faces[0]
    }

    /// All candidate faces; backends try them in order.
    pub fn faces(&self) -> &[String] {
        &self.faces
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Font {} face: {} size {} style {}",
            self.id,
            self.face(),
            self.size,
            self.style.bits()
        )
    }
}

/// The font table of a single report.
///
/// Ids are unique within the registry. Automatic ids come from a counter
/// that belongs to the registry, so two reports never influence each other's
/// numbering.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    fonts: IndexMap<FontId, Font>,
    next_auto_id: usize,
}

impl Default for FontRegistry {
    /// Creates a registry holding only the default font (Helvetica 10pt).
    fn default() -> Self {
        let mut fonts = IndexMap::new();
        let id = FontId::new(DEFAULT_FONT_ID);
        fonts.insert(
            id.clone(),
            Font {
                id,
                faces: vec!["Helvetica".to_string()],
                size: 10.0,
                style: FontStyle::REGULAR,
            },
        );
        Self {
            fonts,
            next_auto_id: 0,
        }
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a font and returns its id.
    pub fn register(&mut self, spec: FontSpec) -> Result<FontId, ConfigError> {
        let id = match spec.id {
            Some(id) => {
                let id = FontId::from(id);
                if self.fonts.contains_key(&id) {
                    return Err(ConfigError::DuplicateFont(id.to_string()));
                }
                id
            }
            None => self.next_auto_id(),
        };

        let faces: Vec<String> = spec
            .faces
            .split(',')
            .map(|face| face.trim().to_string())
            .filter(|face| !face.is_empty())
            .collect();
        if faces.is_empty() {
            return Err(ConfigError::EmptyFontFaces(id.to_string()));
        }

        log::debug!("Registered font '{}' ({} faces, {}pt)", id, faces.len(), spec.size);
        self.fonts.insert(
            id.clone(),
            Font {
                id: id.clone(),
                faces,
                size: spec.size,
                style: spec.style,
            },
        );
        Ok(id)
    }

    fn next_auto_id(&mut self) -> FontId {
        loop {
            let candidate = FontId::from(format!("font_{}", self.next_auto_id));
            self.next_auto_id += 1;
            if !self.fonts.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Looks up a font, failing for unregistered ids.
    pub fn get(&self, id: &FontId) -> Result<&Font, ConfigError> {
        self.fonts
            .get(id)
            .ok_or_else(|| ConfigError::UnregisteredFont(id.to_string()))
    }

    pub fn contains(&self, id: &FontId) -> bool {
        self.fonts.contains_key(id)
    }

    pub fn default_font_id(&self) -> FontId {
        FontId::new(DEFAULT_FONT_ID)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Font> {
        self.fonts.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_flags_combine() {
        let style = FontStyle::ITALIC | FontStyle::BOLD;
        assert!(style.is_italic());
        assert!(style.is_bold());
        assert!(!style.is_underlined());
        assert_eq!(style.bits(), 3);
    }

    #[test]
    fn test_auto_ids_are_deterministic_per_registry() {
        let mut a = FontRegistry::new();
        let mut b = FontRegistry::new();
        assert_eq!(a.register(FontSpec::new("Helvetica", 22.0)).unwrap().as_str(), "font_0");
        assert_eq!(a.register(FontSpec::new("Times", 12.0)).unwrap().as_str(), "font_1");
        // A second registry starts its own numbering.
        assert_eq!(b.register(FontSpec::new("Courier", 9.0)).unwrap().as_str(), "font_0");
    }

    #[test]
    fn test_auto_id_skips_taken_names() {
        let mut fonts = FontRegistry::new();
        fonts.register(FontSpec::new("Helvetica", 10.0).with_id("font_0")).unwrap();
        let id = fonts.register(FontSpec::new("Helvetica", 12.0)).unwrap();
        assert_eq!(id.as_str(), "font_1");
    }

    #[test]
    fn test_duplicate_and_unknown_ids() {
        let mut fonts = FontRegistry::new();
        fonts.register(FontSpec::new("Helvetica", 10.0).with_id("body")).unwrap();
        assert_eq!(
            fonts.register(FontSpec::new("Times", 10.0).with_id("body")),
            Err(ConfigError::DuplicateFont("body".to_string()))
        );
        assert_eq!(
            fonts.get(&FontId::new("missing")).unwrap_err(),
            ConfigError::UnregisteredFont("missing".to_string())
        );
    }

    #[test]
    fn test_face_fallback_chain() {
        let mut fonts = FontRegistry::new();
        let id = fonts
            .register(FontSpec::new("Helvetica, Arial,sans", 10.0))
            .unwrap();
        let font = fonts.get(&id).unwrap();
        assert_eq!(font.face(), "Helvetica");
        assert_eq!(font.faces(), &["Helvetica", "Arial", "sans"]);
        assert!(fonts.register(FontSpec::new(" , ", 10.0)).is_err());
    }

    #[test]
    fn test_default_font_is_present() {
        let fonts = FontRegistry::new();
        let font = fonts.get(&fonts.default_font_id()).unwrap();
        assert_eq!(font.face(), "Helvetica");
        assert_eq!(font.size, 10.0);
    }

    #[test]
    fn test_spec_deserializes() {
        let spec: FontSpec =
            serde_json::from_str(r#"{"faces": "Helvetica", "size": 22, "style": 3}"#).unwrap();
        assert_eq!(spec.style, FontStyle::ITALIC | FontStyle::BOLD);
        assert!(spec.id.is_none());
    }
}
