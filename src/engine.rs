//! Font conversion and injection engine
//!
//! Drives one conversion pass per settings change: resolve the selected
//! font(s), load or encode their `@font-face` fragments, build the
//! presentation fragment and install everything into the style slots.
//!
//! Passes run on a single-threaded runtime and may overlap when the user
//! changes the selection again before the previous pass finished. Every pass
//! carries a generation number; a pass that is no longer current drops its
//! results instead of writing to the slots.

use std::cell::{Cell, RefCell};

use tracing::{debug, error, info, warn};

use crate::cache::{CacheStatus, FragmentCache, LoadedFragment};
use crate::config::{FontSelection, PresentationConfig};
use crate::error::Result;
use crate::font::list_fonts;
use crate::host::{Notifier, SettingsStore, Storage, StyleSink};
use crate::presentation::build_presentation_fragment;
use crate::registry::{SlotId, StyleRegistry};

/// Result of a conversion pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Selection is `None`; every slot is empty
    Cleared,
    /// Slots hold the fragments for these families
    Applied { families: Vec<String>, cache_hits: usize },
    /// A newer pass started; nothing was written after that point
    Superseded,
    /// The pass aborted; the message was notified
    Failed(String),
}

pub struct FontEngine<S, D, N> {
    storage: S,
    document: D,
    notifier: N,
    registry: RefCell<StyleRegistry>,
    generation: Cell<u64>,
    selection: RefCell<FontSelection>,
}

impl<S: Storage, D: StyleSink, N: Notifier> FontEngine<S, D, N> {
    pub fn new(storage: S, document: D, notifier: N) -> Self {
        Self {
            storage,
            document,
            notifier,
            registry: RefCell::new(StyleRegistry::new()),
            generation: Cell::new(0),
            selection: RefCell::new(FontSelection::None),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Selection of the most recent pass
    pub fn selection(&self) -> FontSelection {
        self.selection.borrow().clone()
    }

    /// Current content of a slot
    pub fn slot(&self, slot: SlotId) -> String {
        self.registry.borrow().get(slot).to_string()
    }

    /// Install `css` into `slot`, replacing the occupant or appending to it,
    /// and mirror the result into the host document
    pub fn apply_style(&self, css: &str, slot: SlotId, append: bool) {
        let mut registry = self.registry.borrow_mut();
        let content = registry.apply(slot, css, append);
        self.document.set_slot(slot, content);
    }

    pub fn clear_slot(&self, slot: SlotId) {
        self.registry.borrow_mut().clear(slot);
        self.document.clear_slot(slot);
    }

    pub fn clear_all(&self) {
        for slot in SlotId::ALL {
            self.clear_slot(slot);
        }
    }

    /// Load or encode a single font using the directories from `config`
    pub async fn load_or_convert(&self, config: &PresentationConfig, font_file_name: &str) -> Result<LoadedFragment> {
        FragmentCache::new(&self.storage, &config.font_dir, &config.cache_dir)
            .load_or_convert(font_file_name)
            .await
    }

    /// Plugin activation: load stored settings and run a pass
    pub async fn activate<T: SettingsStore>(&self, settings: &T) -> PassOutcome {
        match settings.load().await {
            Ok(config) => self.apply(&config).await,
            Err(e) => self.fail(e.to_string()),
        }
    }

    /// Settings edit: persist the new settings, then run a pass
    pub async fn update<T: SettingsStore>(&self, settings: &T, config: &PresentationConfig) -> PassOutcome {
        if let Err(e) = settings.save(config).await {
            return self.fail(e.to_string());
        }
        self.apply(config).await
    }

    /// Bring the slots in line with `config`.
    ///
    /// Selecting `None` clears every slot without converting anything. Any
    /// other selection clears the slots and runs a full pass. Errors abort
    /// the pass with a single notification; slots written before the error
    /// are left as they are.
    pub async fn apply(&self, config: &PresentationConfig) -> PassOutcome {
        let generation = self.begin_pass();
        let previous = self.selection.replace(config.font.clone());
        info!(from = %previous, to = %config.font, generation = generation, "Applying font selection");

        self.clear_all();
        if config.font == FontSelection::None {
            return PassOutcome::Cleared;
        }

        if config.custom_css_missing() {
            self.notifier
                .notify("Custom CSS is enabled but empty; using the default font variables instead");
        }

        match self.run_pass(config, generation).await {
            Ok(outcome) => outcome,
            Err(e) if !self.is_current(generation) => {
                debug!(generation = generation, error = %e, "Superseded pass failed, ignoring");
                PassOutcome::Superseded
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    async fn run_pass(&self, config: &PresentationConfig, generation: u64) -> Result<PassOutcome> {
        let (targets, batch) = match &config.font {
            FontSelection::None => return Ok(PassOutcome::Cleared),
            FontSelection::Single(name) => (vec![name.clone()], false),
            FontSelection::AllFonts => {
                let fonts = list_fonts(&self.storage, &config.font_dir).await?;
                (fonts.into_iter().map(|f| f.file_name).collect::<Vec<_>>(), true)
            }
        };

        if targets.is_empty() {
            warn!(font_dir = %config.font_dir, "No fonts to apply");
            if self.is_current(generation) {
                self.notifier
                    .notify(&format!("No font files found in {}", config.font_dir));
            }
        }

        let cache = FragmentCache::new(&self.storage, &config.font_dir, &config.cache_dir);
        let mut families = Vec::with_capacity(targets.len());
        let mut cache_hits = 0;

        for name in &targets {
            let loaded = cache.load_or_convert(name).await?;
            if !self.is_current(generation) {
                debug!(generation = generation, font = %name, "Pass superseded, discarding results");
                return Ok(PassOutcome::Superseded);
            }
            if loaded.status == CacheStatus::Hit {
                cache_hits += 1;
            }
            // Batch mode keeps every @font-face in the same slot
            self.apply_style(&loaded.fragment.css, SlotId::FontFace, batch);
            families.push(loaded.fragment.family_name);
        }

        let presentation = build_presentation_fragment(&families, config);
        if !presentation.general.is_empty() {
            self.apply_style(&presentation.general, SlotId::General, false);
        }
        if let Some(force) = &presentation.force {
            self.apply_style(force, SlotId::Force, false);
        }

        info!(families = ?families, cache_hits = cache_hits, "Applied fonts");
        Ok(PassOutcome::Applied { families, cache_hits })
    }

    fn begin_pass(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn fail(&self, message: String) -> PassOutcome {
        error!(error = %message, "Font pass failed");
        self.notifier.notify(&message);
        PassOutcome::Failed(message)
    }
}
