//! Font files: identity, discovery and base64 encoding

pub mod asset;
pub mod discovery;
pub mod encode;

pub use asset::FontAsset;
pub use discovery::list_fonts;
pub use encode::{convert_font_to_fragment, fingerprint, EncodedFontFragment};
