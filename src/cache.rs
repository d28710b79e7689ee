//! On-disk cache of encoded `@font-face` fragments
//!
//! Entries are keyed by a digest of the file name *and* a fingerprint of the
//! font bytes, so replacing a font under the same name produces a new entry
//! instead of silently reusing the stale one.

use tracing::{debug, info};

use crate::error::{FontError, Result};
use crate::font::asset::family_class;
use crate::font::{convert_font_to_fragment, fingerprint, EncodedFontFragment, FontAsset};
use crate::host::{join, Storage};

/// Where a fragment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFragment {
    pub fragment: EncodedFontFragment,
    pub status: CacheStatus,
}

pub struct FragmentCache<'a, S> {
    storage: &'a S,
    font_dir: &'a str,
    cache_dir: &'a str,
}

impl<'a, S: Storage> FragmentCache<'a, S> {
    pub fn new(storage: &'a S, font_dir: &'a str, cache_dir: &'a str) -> Self {
        Self {
            storage,
            font_dir,
            cache_dir,
        }
    }

    /// Deterministic cache path for a font name and content fingerprint.
    ///
    /// The readable prefix is lossy (`Vazir Bold` and `Vazir-Bold` share a
    /// family class), so a digest of the exact file name keeps entries of
    /// different fonts apart.
    pub fn entry_path(&self, font_file_name: &str, fingerprint: &str) -> String {
        let asset = FontAsset::from_file_name(font_file_name);
        let name_digest = crate::font::fingerprint(asset.file_name.as_bytes());
        let name = if asset.extension.is_empty() {
            format!("{}-{}-{}.css", family_class(&asset.family_name), name_digest, fingerprint)
        } else {
            format!(
                "{}-{}-{}-{}.css",
                family_class(&asset.family_name),
                asset.extension,
                name_digest,
                fingerprint
            )
        };
        join(self.cache_dir, &name)
    }

    /// Return the cached fragment for this font, encoding and persisting it
    /// only when no entry matches the current bytes.
    pub async fn load_or_convert(&self, font_file_name: &str) -> Result<LoadedFragment> {
        let font_path = join(self.font_dir, font_file_name);
        let bytes = self
            .storage
            .read_binary(&font_path)
            .await
            .map_err(|e| FontError::read(&font_path, e))?;

        let fp = fingerprint(&bytes);
        let entry = self.entry_path(font_file_name, &fp);

        if self.storage.exists(&entry).await {
            let css = self
                .storage
                .read(&entry)
                .await
                .map_err(|e| FontError::read(&entry, e))?;
            debug!(font = %font_file_name, entry = %entry, "Loaded cached fragment");
            return Ok(LoadedFragment {
                fragment: EncodedFontFragment {
                    family_name: FontAsset::from_file_name(font_file_name).family_name,
                    fingerprint: fp,
                    css,
                },
                status: CacheStatus::Hit,
            });
        }

        info!(font = %font_file_name, bytes = bytes.len(), "Encoding font");
        let fragment = convert_font_to_fragment(&bytes, font_file_name);

        self.storage
            .mkdir(self.cache_dir)
            .await
            .map_err(|e| FontError::write(self.cache_dir, e))?;
        self.storage
            .write(&entry, &fragment.css)
            .await
            .map_err(|e| FontError::write(&entry, e))?;
        debug!(font = %font_file_name, entry = %entry, "Cached fragment");

        Ok(LoadedFragment {
            fragment,
            status: CacheStatus::Miss,
        })
    }
}
