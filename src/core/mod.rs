//! Core module - application configuration and its persistence
//!
//! # Contents
//!
//! - [`GameSettings`] / [`ServiceSettings`] - User preferences and move service connection
//! - [`settings_persistence`] - JSON load/save in the platform config directory
//! - [`CoreError`] - Settings I/O and serialization errors

pub mod error;
pub mod resources;
pub mod settings_persistence;


// Re-export commonly used items
pub use error::{CoreError, CoreResult};
pub use resources::*;
pub use settings_persistence::{load_settings, read_settings, save_settings, settings_path};
