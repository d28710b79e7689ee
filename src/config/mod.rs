//! Configuration for the font injector
//!
//! - **presentation**: user-chosen settings persisted by the host's settings store

pub mod presentation;

pub use presentation::{FontSelection, PresentationConfig, PresentationMode};
