//! Presentation settings
//!
//! Persisted as JSON by the host; every field has a serde default so older
//! or partial settings files load merged over defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{paths, selection};

/// Which font(s) the user selected
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontSelection {
    /// Nothing applied; all slots cleared
    #[default]
    None,
    /// A single file name inside the font directory
    Single(String),
    /// Every supported font in the font directory
    AllFonts,
}

impl From<String> for FontSelection {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(selection::NONE) {
            FontSelection::None
        } else if trimmed.eq_ignore_ascii_case(selection::ALL_FONTS) {
            FontSelection::AllFonts
        } else {
            FontSelection::Single(trimmed.to_string())
        }
    }
}

impl From<FontSelection> for String {
    fn from(value: FontSelection) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FontSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSelection::None => f.write_str(selection::NONE),
            FontSelection::Single(name) => f.write_str(name),
            FontSelection::AllFonts => f.write_str(selection::ALL_FONTS),
        }
    }
}

/// How the general slot is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Theme variables
    Default,
    /// User CSS verbatim
    Custom,
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default)]
    pub font: FontSelection,

    /// Blanket `!important` override on all elements
    #[serde(default)]
    pub force_mode: bool,

    #[serde(default)]
    pub custom_css_enabled: bool,

    #[serde(default)]
    pub custom_css: String,

    /// Storage-relative directory scanned for fonts
    #[serde(default = "default_font_dir")]
    pub font_dir: String,

    /// Storage-relative directory for cached fragments
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

fn default_font_dir() -> String {
    paths::FONT_DIR.to_string()
}

fn default_cache_dir() -> String {
    paths::CACHE_DIR.to_string()
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            font: FontSelection::None,
            force_mode: false,
            custom_css_enabled: false,
            custom_css: String::new(),
            font_dir: default_font_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl PresentationConfig {
    /// Requested generation mode, before validation of the custom text
    pub fn mode(&self) -> PresentationMode {
        if self.custom_css_enabled {
            PresentationMode::Custom
        } else {
            PresentationMode::Default
        }
    }

    /// Custom mode enabled but the field left blank
    pub fn custom_css_missing(&self) -> bool {
        self.custom_css_enabled && self.custom_css.trim().is_empty()
    }
}
