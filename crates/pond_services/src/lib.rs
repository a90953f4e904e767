//! Pond Services Layer
//!
//! Host-facing glue that is independent of the windowing backend: settings
//! files and the key/pointer bindings that turn user input into simulation
//! commands.

pub mod input;
pub mod settings;

pub use input::{InputBindings, InputState, Key};
pub use settings::{InputSettings, RuntimeSettings, Settings, SettingsError, WindowSettings};
