//! Named style slots owned by the engine
//!
//! Each slot holds at most one style block. `set` replaces, `append` adds to
//! the current occupant, `clear` empties. These are the only mutators.

use std::collections::BTreeMap;

use crate::constants::slots;

/// Logical role of an injected style block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotId {
    /// `@font-face` declarations
    FontFace,
    /// Theme variables or custom CSS
    General,
    /// Blanket `!important` override
    Force,
}

impl SlotId {
    pub const ALL: [SlotId; 3] = [SlotId::FontFace, SlotId::General, SlotId::Force];

    /// Element id of the `<style>` block in the host document
    pub fn element_id(self) -> &'static str {
        match self {
            SlotId::FontFace => slots::FONT_FACE_ID,
            SlotId::General => slots::GENERAL_ID,
            SlotId::Force => slots::FORCE_ID,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    slots: BTreeMap<SlotId, String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `css` in `slot`.
    ///
    /// Without `append` any prior occupant is removed first. With `append` the
    /// text is added after the existing content; on an empty slot this is a
    /// fresh install. Returns the slot's resulting content.
    pub fn apply(&mut self, slot: SlotId, css: &str, append: bool) -> &str {
        let content = self.slots.entry(slot).or_default();
        if append && !content.is_empty() {
            content.push('\n');
            content.push_str(css);
        } else {
            content.clear();
            content.push_str(css);
        }
        content
    }

    pub fn set(&mut self, slot: SlotId, css: &str) -> &str {
        self.apply(slot, css, false)
    }

    pub fn append(&mut self, slot: SlotId, css: &str) -> &str {
        self.apply(slot, css, true)
    }

    pub fn clear(&mut self, slot: SlotId) {
        self.slots.remove(&slot);
    }

    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    /// Current content; empty when the slot is unoccupied
    pub fn get(&self, slot: SlotId) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(String::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_prior_content() {
        let mut registry = StyleRegistry::new();
        registry.set(SlotId::General, ":root { --font-default: 'old'; }");
        registry.set(SlotId::General, ":root { --font-default: 'new'; }");

        assert_eq!(registry.get(SlotId::General), ":root { --font-default: 'new'; }");
        assert!(!registry.get(SlotId::General).contains("old"));
    }

    #[test]
    fn test_append_keeps_prior_first() {
        let mut registry = StyleRegistry::new();
        registry.append(SlotId::FontFace, "first");
        registry.append(SlotId::FontFace, "second");

        let content = registry.get(SlotId::FontFace);
        assert_eq!(content, "first\nsecond");
        assert!(content.find("first").unwrap() < content.find("second").unwrap());
    }

    #[test]
    fn test_append_on_empty_slot_is_fresh_install() {
        let mut registry = StyleRegistry::new();
        assert_eq!(registry.append(SlotId::Force, "only"), "only");
    }

    #[test]
    fn test_clear_leaves_empty_content() {
        let mut registry = StyleRegistry::new();
        registry.set(SlotId::FontFace, "a");
        registry.set(SlotId::General, "b");
        registry.clear(SlotId::FontFace);
        assert_eq!(registry.get(SlotId::FontFace), "");
        assert!(!registry.is_empty());

        registry.clear_all();
        for slot in SlotId::ALL {
            assert_eq!(registry.get(slot), "");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_element_ids() {
        assert_eq!(SlotId::FontFace.element_id(), "custom-font-plugin-base64");
        assert_eq!(SlotId::General.element_id(), "custom-font-plugin-css");
        assert_eq!(SlotId::Force.element_id(), "custom-font-plugin-force");
    }
}
