//! Font discovery in the configured font directory
//!
//! Lists the directory through the host storage and keeps files with a
//! supported extension, sorted by file name so batch output is stable across
//! hosts whose listing order differs.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{FontError, Result};
use crate::host::{file_name, Storage};

use super::asset::FontAsset;

/// Supported font files in `font_dir`, sorted by file name
pub async fn list_fonts<S: Storage>(storage: &S, font_dir: &str) -> Result<Vec<FontAsset>> {
    info!(font_dir = %font_dir, "Scanning font directory");

    let entries = storage
        .list(font_dir)
        .await
        .map_err(|e| FontError::list(font_dir, e))?;

    let mut fonts: Vec<FontAsset> = entries
        .iter()
        .map(|path| FontAsset::from_file_name(file_name(path)))
        .filter(|asset| {
            let keep = asset.is_supported();
            if !keep {
                debug!(file = %asset.file_name, "Skipping non-font file");
            }
            keep
        })
        .collect();

    fonts.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    for (family, files) in family_collisions(&fonts) {
        warn!(
            family = %family,
            files = ?files,
            "Several files share a family name; their @font-face rules become alternative sources"
        );
    }

    info!(count = fonts.len(), "Discovered fonts");
    Ok(fonts)
}

/// Families derived from more than one file, with those files in listing order
pub(crate) fn family_collisions(fonts: &[FontAsset]) -> Vec<(&str, Vec<&str>)> {
    let mut by_family: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for font in fonts {
        by_family
            .entry(font.family_name.as_str())
            .or_default()
            .push(font.file_name.as_str());
    }
    by_family.into_iter().filter(|(_, files)| files.len() > 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryStorage;

    #[tokio::test]
    async fn test_list_fonts_filters_and_sorts() {
        let storage = MemoryStorage::new();
        storage.insert("fonts/Vazir.woff", vec![1u8]);
        storage.insert("fonts/notes.txt", vec![2u8]);
        storage.insert("fonts/Amiri.TTF", vec![3u8]);
        storage.insert("fonts/Sahel.woff2", vec![4u8]);

        let fonts = list_fonts(&storage, "fonts").await.unwrap();
        let names: Vec<_> = fonts.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["Amiri.TTF", "Sahel.woff2", "Vazir.woff"]);
        assert_eq!(fonts[0].family_name, "amiri");
    }

    #[tokio::test]
    async fn test_missing_directory_is_list_error() {
        let storage = MemoryStorage::new();
        let err = list_fonts(&storage, "fonts").await.unwrap_err();
        assert!(matches!(err, FontError::List { .. }));
    }

    #[tokio::test]
    async fn test_family_collisions_found_regardless_of_order() {
        let storage = MemoryStorage::new();
        storage.insert("fonts/Amiri.ttf", vec![1u8]);
        storage.insert("fonts/Sahel.ttf", vec![2u8]);
        storage.insert("fonts/amiri.woff", vec![3u8]);

        let fonts = list_fonts(&storage, "fonts").await.unwrap();
        let names: Vec<_> = fonts.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["Amiri.ttf", "Sahel.ttf", "amiri.woff"]);

        let collisions = family_collisions(&fonts);
        assert_eq!(collisions, vec![("amiri", vec!["Amiri.ttf", "amiri.woff"])]);
    }
}
