//! Font bytes → base64 `@font-face` fragment

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};

use crate::constants::fonts::FINGERPRINT_LEN;
use crate::css::{quote_family, Rule};

use super::asset::FontAsset;

/// A `@font-face` rule embedding one font as a data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFontFragment {
    pub family_name: String,
    /// Truncated SHA-256 of the font bytes
    pub fingerprint: String,
    pub css: String,
}

/// Encode a font file into its `@font-face` fragment.
///
/// Unknown extensions are not an error; the data URI falls back to the
/// generic `font` MIME type.
pub fn convert_font_to_fragment(font_bytes: &[u8], font_file_name: &str) -> EncodedFontFragment {
    let asset = FontAsset::from_file_name(font_file_name);
    let payload = BASE64.encode(font_bytes);

    let rule = Rule::new("@font-face")
        .declare("font-family", quote_family(&asset.family_name))
        .declare("src", format!("url(data:{};base64,{})", asset.mime_type(), payload));

    EncodedFontFragment {
        family_name: asset.family_name,
        fingerprint: fingerprint(font_bytes),
        css: rule.to_string(),
    }
}

/// Hex fingerprint of the font content used as cache key
pub fn fingerprint(font_bytes: &[u8]) -> String {
    let digest = Sha256::digest(font_bytes);
    let mut hex: String = digest.iter().map(|byte| format!("{:02x}", byte)).collect();
    hex.truncate(FINGERPRINT_LEN);
    hex
}
