//! Windowed host: winit event loop driving the simulation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use pond_core::glam::Vec2;
use pond_core::{SimCommand, Simulation, Viewport};
use pond_metrics::FrameTimer;
use pond_render::instances::{self, InstanceBatch, RenderInstance};
use pond_render::window::{create_event_loop, window_attributes, RenderError, WindowConfig};
use pond_render::OrbitCamera;
use pond_services::{InputBindings, InputState, Key, Settings};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{log_metrics, metrics_due, FRAME_WINDOW};

/// Radians per Left/Right press.
const ORBIT_STEP: f32 = 0.05;
/// Zoom factor per wheel line.
const ZOOM_STEP: f32 = 0.9;
/// Pixels treated as one wheel line on touchpads.
const PIXELS_PER_LINE: f64 = 50.0;

pub fn run(settings: Settings, sim: Simulation) -> Result<()> {
    let event_loop = create_event_loop()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings, sim);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    settings: Settings,
    sim: Simulation,
    camera: OrbitCamera,
    bindings: InputBindings,
    input: InputState,
    window: Option<Arc<Window>>,
    last_frame: Option<Instant>,
    timer: FrameTimer,
    /// Instance data for the current frame, grouped by mesh.
    instances: Vec<RenderInstance>,
    batches: Vec<InstanceBatch>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings, sim: Simulation) -> Self {
        let bindings = InputBindings::new(&settings.input);
        Self {
            settings,
            sim,
            camera: OrbitCamera::new(),
            bindings,
            input: InputState::default(),
            window: None,
            last_frame: None,
            timer: FrameTimer::new(FRAME_WINDOW),
            instances: Vec::new(),
            batches: Vec::new(),
            error: None,
        }
    }

    fn viewport(&self) -> Viewport {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                Viewport::new(size.width as f32, size.height as f32)
            }
            None => Viewport::new(0.0, 0.0),
        }
    }

    fn hover(&mut self, pointer: Vec2) {
        let viewport = self.viewport();
        let before = self.sim.hovered();
        let tooltip = self.sim.pointer_moved(&self.camera, pointer, &viewport);
        if self.sim.hovered() != before {
            match tooltip {
                Some(tooltip) => tracing::debug!(label = tooltip.label, "tooltip shown"),
                None => tracing::debug!("tooltip hidden"),
            }
        }
    }

    fn click(&mut self) {
        let Some(pointer) = self.input.pointer else {
            return;
        };
        let viewport = self.viewport();
        match self.sim.clicked(&self.camera, pointer, &viewport) {
            Some(panel) => tracing::info!(title = panel.title, "{}", panel.text),
            None => tracing::debug!("info panel hidden"),
        }
    }

    fn key_pressed(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        if map_key(code) == Key::Escape {
            event_loop.exit();
            return;
        }
        if let Some(command) = route_key(code, &mut self.camera, &self.bindings, &mut self.input) {
            tracing::debug!(?command, "queued");
            self.sim.queue(command);
        }
    }

    fn frame(&mut self) {
        let runtime = &self.settings.runtime;
        let now = Instant::now();
        let wall = self
            .last_frame
            .map(|last| now.duration_since(last))
            .unwrap_or_else(|| Duration::from_secs_f32(runtime.fixed_delta_secs));
        self.last_frame = Some(now);
        self.timer.record_frame(wall);

        let dt = wall.as_secs_f32().min(runtime.max_delta_secs);
        let sim = &mut self.sim;
        self.timer.time_step(|| sim.step(dt));

        // Objects drift under a still pointer
        if let Some(pointer) = self.input.pointer {
            self.hover(pointer);
        }

        let (instances, batches) = instances::pack(&self.sim.snapshot());
        self.instances = instances;
        self.batches = batches;

        if metrics_due(self.sim.frame(), self.settings.runtime.metrics_log_interval) {
            log_metrics(&self.sim, &self.timer);
            tracing::debug!(
                instances = self.instances.len(),
                batches = self.batches.len(),
                bytes = instances::as_bytes(&self.instances).len(),
                "instance buffer"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = &self.settings.window;
        let config = WindowConfig {
            title: window.title.clone(),
            width: window.width,
            height: window.height,
            resizable: window.resizable,
        };
        match event_loop.create_window(window_attributes(&config)) {
            Ok(window) => {
                tracing::info!(width = config.width, height = config.height, "window created");
                self.window = Some(Arc::new(window));
            }
            Err(err) => {
                self.error = Some(RenderError::from(err).into());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = Vec2::new(position.x as f32, position.y as f32);
                self.input.pointer = Some(pointer);
                self.hover(pointer);
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.pointer_left();
                self.sim.pointer_left();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.click();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(offset) => (offset.y / PIXELS_PER_LINE) as f32,
                };
                self.camera.zoom(ZOOM_STEP.powf(lines));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.key_pressed(event_loop, code);
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!(
            frames = self.sim.frame(),
            commands = self.sim.command_log().len(),
            "shutting down"
        );
    }
}

/// Apply the camera side of a key press and return the simulation command
/// it maps to. Reset also brings the camera home.
fn route_key(
    code: KeyCode,
    camera: &mut OrbitCamera,
    bindings: &InputBindings,
    input: &mut InputState,
) -> Option<SimCommand> {
    match code {
        KeyCode::ArrowLeft => camera.orbit(-ORBIT_STEP, 0.0),
        KeyCode::ArrowRight => camera.orbit(ORBIT_STEP, 0.0),
        KeyCode::Home => camera.reset(),
        _ => {}
    }
    let command = bindings.command_for(map_key(code), input)?;
    if command == SimCommand::Reset {
        camera.reset();
    }
    Some(command)
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyR => Key::R,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_key_brings_camera_home() {
        let mut camera = OrbitCamera::new();
        let bindings = InputBindings::default();
        let mut input = InputState::default();
        camera.orbit(0.8, 0.3);
        camera.zoom(0.5);
        input.timescale = 0.7;

        let command = route_key(KeyCode::KeyR, &mut camera, &bindings, &mut input);
        assert_eq!(command, Some(SimCommand::Reset));
        assert_eq!(camera, OrbitCamera::default());
        assert_eq!(input.timescale, 0.0);
    }

    #[test]
    fn test_other_keys_leave_camera_framing() {
        let mut camera = OrbitCamera::new();
        let bindings = InputBindings::default();
        let mut input = InputState::default();
        camera.orbit(0.4, 0.0);
        let orbited = camera.clone();

        assert_eq!(
            route_key(KeyCode::KeyB, &mut camera, &bindings, &mut input),
            Some(SimCommand::ToggleBacteria)
        );
        assert_eq!(
            route_key(KeyCode::ArrowUp, &mut camera, &bindings, &mut input),
            Some(SimCommand::SetTimescale(0.05))
        );
        assert_eq!(camera, orbited);

        assert_eq!(route_key(KeyCode::ArrowLeft, &mut camera, &bindings, &mut input), None);
        assert_ne!(camera, orbited);
        assert_eq!(route_key(KeyCode::Home, &mut camera, &bindings, &mut input), None);
        assert_eq!(camera, OrbitCamera::default());
    }
}
