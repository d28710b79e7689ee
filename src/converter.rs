//! Standalone font-to-CSS converter
//!
//! Stateless: takes font files already read into memory and returns the
//! combined `@font-face` CSS plus one styling template. No cache, no slots.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::constants::theme::FAMILY_PLACEHOLDER;
use crate::css::{quote_family, Rule};
use crate::error::{FontError, Result};
use crate::font::{convert_font_to_fragment, FontAsset};
use crate::presentation::variables_rule;

/// Styling template appended after the `@font-face` rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterStyle {
    /// Root theme variables
    Default,
    /// `font-family` rule on a user-provided selector
    Custom(String),
    /// `font-family` forced on every element
    Force,
}

impl FromStr for ConverterStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ConverterStyle::Default),
            "custom" => Ok(ConverterStyle::Custom(String::new())),
            "force" => Ok(ConverterStyle::Force),
            _ => Err(format!(
                "unknown style \"{s}\": expected \"default\", \"custom\" or \"force\""
            )),
        }
    }
}

impl fmt::Display for ConverterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterStyle::Default => f.write_str("default"),
            ConverterStyle::Custom(_) => f.write_str("custom"),
            ConverterStyle::Force => f.write_str("force"),
        }
    }
}

/// One input file
#[derive(Debug, Clone)]
pub struct FontFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FontFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Convert the supported files and append the styling template.
///
/// Files with other extensions are skipped. Fails when nothing is left, or
/// when the custom style has no selector.
pub fn convert_files(files: &[FontFile], style: &ConverterStyle) -> Result<String> {
    let valid = supported_files(files);
    for file in files.iter().filter(|file| !is_supported(file)) {
        warn!(file = %file.name, "Skipping file with unsupported extension");
    }

    if valid.is_empty() {
        return Err(FontError::NoValidFonts);
    }
    if let ConverterStyle::Custom(selector) = style {
        if selector.trim().is_empty() {
            return Err(FontError::MissingSelector);
        }
    }

    let mut css = String::new();
    let mut families = Vec::with_capacity(valid.len());
    for file in &valid {
        let fragment = convert_font_to_fragment(&file.bytes, &file.name);
        css.push_str(&fragment.css);
        css.push_str("\n\n");
        families.push(fragment.family_name);
    }

    css.push_str(&styling_template(&families, style).to_string());

    info!(files = valid.len(), style = %style, "Converted fonts to CSS");
    Ok(css.trim().to_string())
}

/// Suggested file name for saving the output; skipped files do not count
pub fn download_name(files: &[FontFile]) -> String {
    match supported_files(files).as_slice() {
        [file] => {
            let stem = file.name.split('.').next().unwrap_or(&file.name);
            format!("{}-font.css", stem)
        }
        _ => "custom-fonts.css".to_string(),
    }
}

fn is_supported(file: &FontFile) -> bool {
    FontAsset::from_file_name(&file.name).is_supported()
}

fn supported_files(files: &[FontFile]) -> Vec<&FontFile> {
    files.iter().filter(|file| is_supported(file)).collect()
}

/// With several families the template uses a placeholder the user replaces
fn styling_template(families: &[String], style: &ConverterStyle) -> Rule {
    let (family, hint) = match families {
        [only] => (only.as_str(), None),
        _ => (
            FAMILY_PLACEHOLDER,
            Some(format!(
                "Replace '{}' with one of: {}",
                FAMILY_PLACEHOLDER,
                families.join(", ")
            )),
        ),
    };

    let (comment, mut rule) = match style {
        ConverterStyle::Default => (
            "Default Obsidian CSS Variables",
            variables_rule(":root", family),
        ),
        ConverterStyle::Custom(selector) => (
            "Custom CSS Class",
            Rule::new(selector.trim()).declare_important("font-family", quote_family(family)),
        ),
        ConverterStyle::Force => (
            "Force style for all elements",
            Rule::new("*").declare_important("font-family", quote_family(family)),
        ),
    };

    rule.comments.push(comment.to_string());
    if let Some(hint) = hint {
        rule.comments.push(hint);
    }
    rule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_default_style() {
        let css = convert_files(&[FontFile::new("MyFont.woff2", vec![0u8, 1, 2])], &ConverterStyle::Default)
            .unwrap();

        assert!(css.starts_with("@font-face {"));
        assert!(css.contains("src: url(data:font/woff2;base64,AAEC);"));
        assert!(css.contains("/* Default Obsidian CSS Variables */\n:root {"));
        assert!(css.contains("--font-family-editor: 'myfont';"));
        assert!(!css.contains(FAMILY_PLACEHOLDER));
    }

    #[test]
    fn test_multiple_files_use_placeholder() {
        let files = [FontFile::new("A.ttf", vec![1u8]), FontFile::new("B.otf", vec![2u8])];
        let css = convert_files(&files, &ConverterStyle::Force).unwrap();

        assert_eq!(css.matches("@font-face").count(), 2);
        assert!(css.contains("data:font/truetype;base64,"));
        assert!(css.contains("data:font/opentype;base64,"));
        assert!(css.contains("/* Replace 'your-font-name' with one of: a, b */"));
        assert!(css.ends_with("* {\n    font-family: 'your-font-name' !important;\n}"));
    }

    #[test]
    fn test_custom_style_uses_selector() {
        let style = ConverterStyle::Custom(".markdown-rendered".to_string());
        let css = convert_files(&[FontFile::new("Vazir.woff", vec![1u8])], &style).unwrap();
        assert!(css.contains(".markdown-rendered {\n    font-family: 'vazir' !important;\n}"));
    }

    #[test]
    fn test_custom_style_requires_selector() {
        let style = ConverterStyle::Custom("  ".to_string());
        let err = convert_files(&[FontFile::new("Vazir.woff", vec![1u8])], &style).unwrap_err();
        assert!(matches!(err, FontError::MissingSelector));
    }

    #[test]
    fn test_invalid_files_skipped_or_rejected() {
        let err = convert_files(&[FontFile::new("notes.txt", vec![1u8])], &ConverterStyle::Default)
            .unwrap_err();
        assert!(matches!(err, FontError::NoValidFonts));

        let css = convert_files(
            &[FontFile::new("notes.txt", vec![1u8]), FontFile::new("Vazir.woff", vec![1u8])],
            &ConverterStyle::Default,
        )
        .unwrap();
        assert_eq!(css.matches("@font-face").count(), 1);
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name(&[FontFile::new("Vazir.woff", Vec::<u8>::new())]), "Vazir-font.css");
        assert_eq!(
            download_name(&[FontFile::new("a.ttf", Vec::<u8>::new()), FontFile::new("b.ttf", Vec::<u8>::new())]),
            "custom-fonts.css"
        );
        assert_eq!(
            download_name(&[FontFile::new("Vazir.woff", Vec::<u8>::new()), FontFile::new("notes.txt", Vec::<u8>::new())]),
            "Vazir-font.css"
        );
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Default".parse::<ConverterStyle>().unwrap(), ConverterStyle::Default);
        assert_eq!("force".parse::<ConverterStyle>().unwrap(), ConverterStyle::Force);
        assert!("bold".parse::<ConverterStyle>().is_err());
    }
}
