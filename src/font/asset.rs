//! Font file identity: family name, extension and MIME type

use std::path::Path;

use crate::constants::fonts::{GENERIC_MIME, MIME_TYPES};

/// A font file resolved within the font directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    /// File name including extension (e.g. "MyFont.woff2")
    pub file_name: String,
    /// File name without its last extension, lower-cased
    pub family_name: String,
    /// Lower-cased extension, empty when the name has none
    pub extension: String,
}

impl FontAsset {
    /// Derive family name and extension from a file name.
    /// Directory components are ignored.
    pub fn from_file_name(file_name: &str) -> Self {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_name);

        // Dotfiles like ".woff" have a stem but no extension
        let (stem, extension) = match base.rfind('.') {
            Some(idx) if idx > 0 => (&base[..idx], &base[idx + 1..]),
            _ => (base, ""),
        };

        Self {
            file_name: base.to_string(),
            family_name: stem.to_lowercase(),
            extension: extension.to_lowercase(),
        }
    }

    /// MIME type for the data URI
    pub fn mime_type(&self) -> &'static str {
        mime_for_extension(&self.extension)
    }

    /// Whether the extension is one of the known font formats
    pub fn is_supported(&self) -> bool {
        is_supported_extension(&self.extension)
    }

    /// Class-safe form of the family name used for batch-mode selectors
    pub fn family_class(&self) -> String {
        family_class(&self.family_name)
    }
}

/// Look up the MIME type for a lower-cased extension
pub fn mime_for_extension(extension: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(GENERIC_MIME)
}

pub fn is_supported_extension(extension: &str) -> bool {
    MIME_TYPES.iter().any(|(ext, _)| *ext == extension)
}

/// Replace anything that is not `[a-z0-9_-]` with `-`
pub fn family_class(family_name: &str) -> String {
    family_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_table_for_supported_extensions() {
        assert_eq!(mime_for_extension("woff"), "font/woff");
        assert_eq!(mime_for_extension("ttf"), "font/truetype");
        assert_eq!(mime_for_extension("woff2"), "font/woff2");
        assert_eq!(mime_for_extension("otf"), "font/opentype");
    }

    #[test]
    fn test_mime_fallback_for_unknown_extension() {
        assert_eq!(mime_for_extension("eot"), "font");
        assert_eq!(mime_for_extension(""), "font");
        assert_eq!(FontAsset::from_file_name("Readme").mime_type(), "font");
    }

    #[test]
    fn test_family_name_strips_last_extension_and_lowercases() {
        let asset = FontAsset::from_file_name("MyFont.WOFF2");
        assert_eq!(asset.family_name, "myfont");
        assert_eq!(asset.extension, "woff2");
        assert_eq!(asset.file_name, "MyFont.WOFF2");
        assert!(asset.is_supported());

        let asset = FontAsset::from_file_name("Vazir.Bold.ttf");
        assert_eq!(asset.family_name, "vazir.bold");
        assert_eq!(asset.extension, "ttf");
    }

    #[test]
    fn test_directory_components_ignored() {
        let asset = FontAsset::from_file_name(".obsidian/fonts/Sahel.otf");
        assert_eq!(asset.file_name, "Sahel.otf");
        assert_eq!(asset.family_name, "sahel");
    }

    #[test]
    fn test_family_class_sanitizes() {
        assert_eq!(family_class("vazir.bold"), "vazir-bold");
        assert_eq!(family_class("fira code"), "fira-code");
        assert_eq!(FontAsset::from_file_name("My_Font-2.ttf").family_class(), "my_font-2");
    }
}
