//! Embed local font files as base64 `@font-face` rules and inject them into a
//! host document's style slots.
//!
//! The [`engine::FontEngine`] depends on its environment only through the
//! traits in [`host`]; [`converter`] is the stateless variant used for
//! one-off conversions.

#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod constants;
pub mod converter;
pub mod css;
pub mod engine;
pub mod error;
pub mod font;
pub mod host;
pub mod presentation;
pub mod registry;

pub use config::{FontSelection, PresentationConfig};
pub use engine::{FontEngine, PassOutcome};
pub use error::{FontError, Result};
pub use registry::SlotId;
