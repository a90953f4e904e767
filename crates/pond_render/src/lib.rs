//! Pond Render Support
//!
//! Everything the renderer needs from the simulation side: the orbit
//! camera (which also turns pointer positions into pick rays), window
//! configuration, and GPU instance packing of the per-frame snapshot.

pub mod camera;
pub mod instances;
pub mod window;

pub use camera::OrbitCamera;
pub use instances::{pack, InstanceBatch, RenderInstance};
pub use window::{RenderError, WindowConfig};

pub use winit;
