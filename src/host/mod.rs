//! Host collaborator contracts
//!
//! The engine never touches the filesystem or the rendered document
//! directly. Everything it needs from its environment goes through these
//! traits, and each environment provides its own adapters.

mod document;
mod fs;
mod memory;
mod notify;
mod settings;

pub use document::LiveDocument;
pub use fs::FsStorage;
pub use memory::MemoryStorage;
pub use notify::{LogNotifier, RecordingNotifier};
pub use settings::JsonSettings;

use std::io;
use std::rc::Rc;

use crate::config::PresentationConfig;
use crate::error::Result;
use crate::registry::SlotId;

/// File access owned by the host. Paths are `/`-separated and relative to
/// the storage root.
#[allow(async_fn_in_trait)]
pub trait Storage {
    async fn exists(&self, path: &str) -> bool;
    async fn read(&self, path: &str) -> io::Result<String>;
    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>>;
    /// Create or overwrite. No atomic-rename guarantee.
    async fn write(&self, path: &str, contents: &str) -> io::Result<()>;
    /// Paths of the files directly inside `dir`, in host order
    async fn list(&self, dir: &str) -> io::Result<Vec<String>>;
    /// Create a directory and any missing parents
    async fn mkdir(&self, path: &str) -> io::Result<()>;
}

/// User-visible, fire-and-forget messages
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Key-value persistence of the presentation settings
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Stored settings merged over defaults
    async fn load(&self) -> Result<PresentationConfig>;
    async fn save(&self, config: &PresentationConfig) -> Result<()>;
}

/// The live document's style slots
pub trait StyleSink {
    fn set_slot(&self, slot: SlotId, css: &str);
    fn clear_slot(&self, slot: SlotId);
}

/// Join a storage directory and an entry name
pub fn join(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Last component of a storage path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl<T: Storage> Storage for Rc<T> {
    async fn exists(&self, path: &str) -> bool {
        (**self).exists(path).await
    }

    async fn read(&self, path: &str) -> io::Result<String> {
        (**self).read(path).await
    }

    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read_binary(path).await
    }

    async fn write(&self, path: &str, contents: &str) -> io::Result<()> {
        (**self).write(path, contents).await
    }

    async fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        (**self).list(dir).await
    }

    async fn mkdir(&self, path: &str) -> io::Result<()> {
        (**self).mkdir(path).await
    }
}

impl<T: Notifier> Notifier for Rc<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

impl<T: StyleSink> StyleSink for Rc<T> {
    fn set_slot(&self, slot: SlotId, css: &str) {
        (**self).set_slot(slot, css)
    }

    fn clear_slot(&self, slot: SlotId) {
        (**self).clear_slot(slot)
    }
}
