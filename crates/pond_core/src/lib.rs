//! Pond Core
//!
//! Contains the simulation of the pond's nitrogen cycle:
//! - Water surface waves
//! - Nitrate and bubble transport
//! - Bacteria-driven nitrate to ammonium conversion and root uptake
//! - Fish behaviour and the eutrophication timescale
//! - Pointer picking, hover highlight and the info table

pub mod ammonium;
pub mod bacteria;
pub mod config;
pub mod error;
pub mod fish;
pub mod highlight;
pub mod info;
pub mod landscape;
pub mod math;
pub mod picking;
pub mod scene;
pub mod sim;
pub mod snapshot;
pub mod time;
pub mod timescale;
pub mod transport;
pub mod wave;

pub use config::PondConfig;
pub use error::PondError;
pub use picking::{InfoPanelView, RayCaster, TooltipView, Viewport};
pub use scene::{Category, EntityId};
pub use sim::{CommandLog, SimCommand, Simulation, StepReport};
pub use snapshot::{FrameSnapshot, RenderItem, RenderKind};

pub use glam;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
