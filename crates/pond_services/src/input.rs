//! Input bindings: backend-neutral keys and pointer state mapped onto
//! simulation commands.

use crate::settings::InputSettings;
use pond_core::glam::Vec2;
use pond_core::SimCommand;

/// Keys the pond reacts to. The window backend maps its own key codes onto
/// these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    B,
    R,
    Escape,
    Other,
}

/// Pointer position and the slider value the keys adjust.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub pointer: Option<Vec2>,
    /// Last timescale sent to the simulation.
    pub timescale: f32,
}

impl InputState {
    /// Pointer left the window.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }
}

/// Key → command table.
#[derive(Debug, Clone)]
pub struct InputBindings {
    timescale_step: f32,
}

impl InputBindings {
    pub fn new(settings: &InputSettings) -> Self {
        Self {
            timescale_step: settings.timescale_step,
        }
    }

    /// Command for a key press, updating the tracked timescale. Up/Down
    /// saturate at the ends of `[0, 1]`.
    pub fn command_for(&self, key: Key, state: &mut InputState) -> Option<SimCommand> {
        match key {
            Key::Up => Some(self.nudge(state, self.timescale_step)),
            Key::Down => Some(self.nudge(state, -self.timescale_step)),
            Key::B => Some(SimCommand::ToggleBacteria),
            Key::R => {
                state.timescale = 0.0;
                Some(SimCommand::Reset)
            }
            Key::Escape | Key::Other => None,
        }
    }

    fn nudge(&self, state: &mut InputState, delta: f32) -> SimCommand {
        state.timescale = (state.timescale + delta).clamp(0.0, 1.0);
        SimCommand::SetTimescale(state.timescale)
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::new(&InputSettings::default())
    }
}
