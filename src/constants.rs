//! Application-wide constants
//!
//! This module contains the string literals used throughout the engine,
//! providing a single source of truth for paths, slot ids and theme variables.

/// Storage-relative locations inside a vault
pub mod paths {
    /// Directory scanned for font files
    pub const FONT_DIR: &str = ".obsidian/fonts";

    /// Cached `@font-face` fragments
    pub const CACHE_DIR: &str = ".obsidian/plugins/custom-font/cache";

    /// Persisted presentation settings
    pub const SETTINGS_FILE: &str = ".obsidian/plugins/custom-font/data.json";

    /// Default output for the rendered stylesheet (a CSS snippet)
    pub const SNIPPET_FILE: &str = ".obsidian/snippets/custom-font.css";
}

/// Element ids of the injected style blocks
pub mod slots {
    /// `@font-face` declarations
    pub const FONT_FACE_ID: &str = "custom-font-plugin-base64";

    /// Theme variables or user CSS
    pub const GENERAL_ID: &str = "custom-font-plugin-css";

    /// Blanket `!important` override
    pub const FORCE_ID: &str = "custom-font-plugin-force";
}

/// Theme integration
pub mod theme {
    /// CSS variables that receive the selected family in default mode
    pub const FONT_VARIABLES: &[&str] = &[
        "--font-default",
        "--default-font",
        "--font-family-editor",
        "--font-monospace-default",
        "--font-interface-override",
        "--font-text-override",
        "--font-monospace-override",
    ];

    /// Prefix of the per-family class used in batch mode
    pub const FAMILY_CLASS_PREFIX: &str = "custom-font-";

    /// Placeholder used by converter templates covering several fonts
    pub const FAMILY_PLACEHOLDER: &str = "your-font-name";
}

/// Font file handling
pub mod fonts {
    /// Extension → MIME type for data URIs
    pub const MIME_TYPES: &[(&str, &str)] = &[
        ("woff", "font/woff"),
        ("ttf", "font/truetype"),
        ("woff2", "font/woff2"),
        ("otf", "font/opentype"),
    ];

    /// MIME type used for unrecognized extensions
    pub const GENERIC_MIME: &str = "font";

    /// Hex digits of the content fingerprint kept in cache file names
    pub const FINGERPRINT_LEN: usize = 16;
}

/// Settings sentinels (serialized values of `FontSelection`)
pub mod selection {
    /// No font applied
    pub const NONE: &str = "None";

    /// Every font in the font directory
    pub const ALL_FONTS: &str = "All fonts";
}
