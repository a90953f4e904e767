//! Window management
//!
//! Cross-platform window creation via winit

use thiserror::Error;
use winit::{
    dpi::LogicalSize,
    event_loop::EventLoop,
    window::{Window, WindowAttributes},
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pond Nitrogen Cycle".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
}

/// In winit 0.30+ windows are created inside `ApplicationHandler::resumed`;
/// this only builds the loop.
pub fn create_event_loop() -> Result<EventLoop<()>, RenderError> {
    Ok(EventLoop::new()?)
}
