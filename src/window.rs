//! Window and Event Loop Management
//!
//! The shell owns the top-level window, the renderer and the drawing state,
//! and turns winit notifications into drawing-area events for the router.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::app::{Dispatch, WindowState};
use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::input::{ButtonMask, EventMask, InputEvent, KeyInput, PointerButton, WindowCommand};
use crate::layout::FrameLayout;
use crate::renderer::Renderer;

/// The drawing widget: receives only the notifications it subscribed to
#[derive(Debug, Default)]
pub struct DrawingArea {
    events: EventMask,
}

impl DrawingArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> EventMask {
        self.events
    }

    pub fn set_events(&mut self, events: EventMask) {
        self.events = events;
    }

    /// Whether `event` should be delivered to this widget
    pub fn accepts(&self, event: &InputEvent) -> bool {
        let required = event.required_mask();
        required == EventMask::NONE || self.events.contains(required)
    }
}

/// Top-level window shell
pub struct Shell {
    config: ShellConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    drawing_area: DrawingArea,
    layout: FrameLayout,
    state: WindowState,
    /// Last cursor position, window coordinates
    cursor: Option<PhysicalPosition<f64>>,
    /// Pointer buttons currently held
    buttons: ButtonMask,
    /// The drawing area owns the implicit pointer grab
    grabbed: bool,
    /// Activation failure to report once the loop exits
    error: Option<Error>,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        let layout = FrameLayout::compute(0, 0, &config);
        let state = WindowState::new(config.brush, config.background);
        Self {
            config,
            window: None,
            renderer: None,
            drawing_area: DrawingArea::new(),
            layout,
            state,
            cursor: None,
            buttons: ButtonMask::NONE,
            grabbed: false,
            error: None,
        }
    }

    /// Build the window tree and hook up rendering
    fn activate(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.min_window_size();
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_min_inner_size(PhysicalSize::new(width, height));

        #[cfg(target_os = "linux")]
        let window_attributes = {
            use winit::platform::wayland::WindowAttributesExtWayland;
            window_attributes.with_name(self.config.app_id.as_str(), "")
        };

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        log::info!("Window created: {:?}", window.inner_size());

        let renderer = pollster::block_on(Renderer::new(window.clone(), window.inner_size(), &self.config))?;

        // Pointer notifications are opt-in for the drawing area
        self.drawing_area
            .set_events(self.drawing_area.events() | EventMask::BUTTON_PRESS | EventMask::POINTER_MOTION);

        self.renderer = Some(renderer);
        self.window = Some(window.clone());

        // winit does not promise a Resized before the first redraw, so size
        // the canvas from the window as created.
        self.relayout(window.inner_size());
        window.request_redraw();
        Ok(())
    }

    /// Recompute the frame layout and reconfigure the canvas
    fn relayout(&mut self, size: PhysicalSize<u32>) {
        self.layout = FrameLayout::compute(size.width, size.height, &self.config);
        let (width, height) = self.layout.canvas_size();
        self.route(InputEvent::Configure { width, height });
    }

    /// Deliver an event to the drawing area's handlers
    fn route(&mut self, event: InputEvent) -> Option<Dispatch> {
        if !self.drawing_area.accepts(&event) {
            log::trace!("Drawing area not subscribed to {:?}", event);
            return None;
        }
        let outcome = self.state.dispatch(event);
        if outcome.redraw {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        Some(outcome)
    }

    fn apply_command(&mut self, event_loop: &ActiveEventLoop, command: WindowCommand) {
        log::info!("Window command: {:?}", command);
        match command {
            WindowCommand::EnterFullscreen => {
                if let Some(window) = &self.window {
                    window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                }
            }
            WindowCommand::LeaveFullscreen => {
                if let Some(window) = &self.window {
                    window.set_fullscreen(None);
                }
            }
            WindowCommand::Close => self.close(event_loop),
        }
    }

    /// Release the canvas and the window, then stop the loop
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.route(InputEvent::Close);
        // The surface must go before the window it was created from
        self.renderer = None;
        self.window = None;
        event_loop.exit();
    }

    fn cursor_on_canvas(&self) -> Option<[f64; 2]> {
        let pos = self.cursor?;
        self.layout
            .hit_canvas(pos.x, pos.y)
            .then(|| self.layout.to_canvas(pos.x, pos.y))
    }

    /// Record a button change and pick the press event for the drawing area
    ///
    /// The first press of a gesture decides who owns the grab: a press on
    /// the canvas grabs to the drawing area, a press on the border or frame
    /// grabs to the window. Later presses follow the owner until every
    /// button is released.
    fn press_target(&mut self, button: PointerButton, state: ElementState) -> Option<InputEvent> {
        match state {
            ElementState::Pressed => {
                let gesture_start = self.buttons.is_empty() && !self.grabbed;
                self.buttons.insert(button.mask());
                let position = self.cursor_on_canvas();
                if gesture_start {
                    self.grabbed = position.is_some();
                }
                if !self.grabbed {
                    return None;
                }
                // During a grab the press is delivered even off the canvas
                let pos = self.cursor?;
                Some(InputEvent::PointerPress {
                    button,
                    position: position.unwrap_or_else(|| self.layout.to_canvas(pos.x, pos.y)),
                })
            }
            ElementState::Released => {
                self.buttons.remove(button.mask());
                if self.buttons.is_empty() {
                    self.grabbed = false;
                }
                None
            }
        }
    }

    /// Pick the motion event for the drawing area, if it should get one
    ///
    /// Motion reaches the drawing area while it holds the grab, or when no
    /// button is held and the cursor is over it.
    fn motion_target(&mut self, position: PhysicalPosition<f64>) -> Option<InputEvent> {
        self.cursor = Some(position);
        let inside = self.layout.hit_canvas(position.x, position.y);
        let deliver = self.grabbed || (inside && self.buttons.is_empty());
        deliver.then(|| InputEvent::PointerMotion {
            buttons: self.buttons,
            position: self.layout.to_canvas(position.x, position.y),
        })
    }

    fn pointer_button(&mut self, button: PointerButton, state: ElementState) {
        if let Some(event) = self.press_target(button, state) {
            self.route(event);
        }
    }

    fn pointer_moved(&mut self, position: PhysicalPosition<f64>) {
        if let Some(event) = self.motion_target(position) {
            self.route(event);
        }
    }

    /// Activation error, if activation failed
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.activate(event_loop) {
            log::error!("Activation failed: {}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                self.close(event_loop);
            }
            WindowEvent::Destroyed => {
                self.state.close();
            }
            WindowEvent::Resized(physical_size) => {
                log::debug!("Resized: {:?}", physical_size);
                if physical_size.width == 0 || physical_size.height == 0 {
                    log::warn!("Ignoring resize to zero size: {:?}", physical_size);
                    return;
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                self.relayout(physical_size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer_button(PointerButton::from(button), state);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let key = KeyInput::from_winit(&event.logical_key);
                if let Some(command) = self.route(InputEvent::KeyPress(key)).and_then(|d| d.command) {
                    self.apply_command(event_loop, command);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = &mut self.renderer {
                    let status = renderer.render(&mut self.state, &self.layout);
                    if status.needs_redraw() {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run the application until its window closes
///
/// `args` are the process arguments; winit takes no command-line options,
/// so they are only logged.
pub fn run(config: ShellConfig, args: impl IntoIterator<Item = String>) -> Result<()> {
    let args: Vec<String> = args.into_iter().collect();
    log::debug!("Command line: {:?}", args);
    log::info!("Starting {} ({})", config.title, config.app_id);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut shell = Shell::new(config);
    event_loop.run_app(&mut shell)?;

    match shell.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
