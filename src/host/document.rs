//! In-memory mirror of the live document's style blocks

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::registry::SlotId;

use super::StyleSink;

#[derive(Debug, Default)]
pub struct LiveDocument {
    blocks: RefCell<BTreeMap<SlotId, String>>,
}

impl LiveDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of a slot; empty when cleared or never set
    pub fn slot(&self, slot: SlotId) -> String {
        self.blocks.borrow().get(&slot).cloned().unwrap_or_default()
    }

    /// All non-empty blocks in slot order, each headed by its element id
    pub fn render(&self) -> String {
        let blocks = self.blocks.borrow();
        let mut out = String::new();
        for (slot, css) in blocks.iter().filter(|(_, css)| !css.is_empty()) {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&format!("/* {} */\n{}", slot.element_id(), css));
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl StyleSink for LiveDocument {
    fn set_slot(&self, slot: SlotId, css: &str) {
        self.blocks.borrow_mut().insert(slot, css.to_string());
    }

    fn clear_slot(&self, slot: SlotId) {
        self.blocks.borrow_mut().remove(&slot);
    }
}
