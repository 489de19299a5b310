//! Window State and Event Routing
//!
//! This module contains the per-window drawing state and the handlers that
//! react to each notification. It is independent of the windowing system,
//! so every handler can be driven directly from tests.

use crate::brush::Brush;
use crate::canvas::BackingCanvas;
use crate::color::Rgba8;
use crate::damage::Damage;
use crate::input::{ButtonMask, InputEvent, KeyInput, PointerButton, WindowCommand};

/// Whether an event should continue to default processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Handled, stop here
    Stop,
    /// Let the default handling run as well
    Continue,
}

/// Outcome of routing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub propagation: Propagation,
    /// Pending damage changed; the shell should request a redraw
    pub redraw: bool,
    /// Window-level action requested by the handler
    pub command: Option<WindowCommand>,
}

impl Dispatch {
    fn stop() -> Self {
        Self {
            propagation: Propagation::Stop,
            redraw: false,
            command: None,
        }
    }
}

/// Drawing state owned by one window
pub struct WindowState {
    /// Accumulated drawing; absent until the first configure and after close
    canvas: Option<BackingCanvas>,
    brush: Brush,
    background: Rgba8,
    /// Screen area that no longer matches the canvas
    damage: Damage,
    /// Number of notifications routed through this state
    events_handled: u64,
}

impl WindowState {
    pub fn new(brush: Brush, background: Rgba8) -> Self {
        Self {
            canvas: None,
            brush,
            background,
            damage: Damage::None,
            events_handled: 0,
        }
    }

    pub fn canvas(&self) -> Option<&BackingCanvas> {
        self.canvas.as_ref()
    }

    pub fn pending_damage(&self) -> Damage {
        self.damage
    }

    /// Hand the pending damage to the renderer
    pub fn take_damage(&mut self) -> Damage {
        self.damage.take()
    }

    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    /// Route one notification to its handler
    pub fn dispatch(&mut self, event: InputEvent) -> Dispatch {
        self.events_handled += 1;
        log::debug!("Dispatching {:?}", event);

        let before = self.damage;
        let mut outcome = Dispatch::stop();
        match event {
            InputEvent::Configure { width, height } => {
                outcome.propagation = self.configure(width, height);
            }
            InputEvent::PointerPress { button, position } => {
                outcome.propagation = self.pointer_press(button, position[0], position[1]);
            }
            InputEvent::PointerMotion { buttons, position } => {
                outcome.propagation = self.pointer_motion(buttons, position[0], position[1]);
            }
            InputEvent::KeyPress(key) => {
                let (propagation, command) = self.key_press(&key);
                outcome.propagation = propagation;
                outcome.command = command;
            }
            InputEvent::Close => {
                self.close();
            }
        }
        outcome.redraw = self.damage != before;
        outcome
    }

    /// Replace the canvas with a fresh one of the new allocation size
    ///
    /// The old canvas is dropped before the new one is allocated. If the
    /// allocation fails the slot stays empty and drawing is skipped until
    /// the next successful configure.
    pub fn configure(&mut self, width: u32, height: u32) -> Propagation {
        self.canvas = None;
        match BackingCanvas::new(width, height, self.background) {
            Ok(canvas) => {
                log::info!("Configured backing canvas: {}x{}", width, height);
                self.canvas = Some(canvas);
            }
            Err(err) => {
                log::error!("Drawing disabled until next resize: {}", err);
            }
        }
        self.damage.add_full();
        Propagation::Stop
    }

    /// Reset the canvas to the background colour
    ///
    /// Returns whether there was a canvas to clear.
    pub fn clear(&mut self) -> bool {
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        canvas.clear();
        self.damage.add_full();
        true
    }

    /// Stamp the brush at (x, y) and invalidate the square around it
    pub fn paint(&mut self, x: f64, y: f64) -> bool {
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        let square = self.brush.stamp(canvas, x, y);
        self.damage.add(square);
        true
    }

    pub fn pointer_press(&mut self, button: PointerButton, x: f64, y: f64) -> Propagation {
        if self.canvas.is_none() {
            log::debug!("Pointer press before configure, ignoring");
            return Propagation::Stop;
        }
        match button {
            PointerButton::Primary => {
                self.paint(x, y);
            }
            PointerButton::Secondary => {
                self.clear();
            }
            _ => {}
        }
        Propagation::Stop
    }

    pub fn pointer_motion(&mut self, buttons: ButtonMask, x: f64, y: f64) -> Propagation {
        if self.canvas.is_none() {
            return Propagation::Stop;
        }
        if buttons.contains(ButtonMask::PRIMARY) {
            self.paint(x, y);
        }
        Propagation::Stop
    }

    pub fn key_press(&mut self, key: &KeyInput) -> (Propagation, Option<WindowCommand>) {
        let command = match key {
            KeyInput::Character(c) if c.eq_ignore_ascii_case("f") => {
                Some(WindowCommand::EnterFullscreen)
            }
            KeyInput::Character(c) if c.eq_ignore_ascii_case("q") => Some(WindowCommand::Close),
            KeyInput::Escape => Some(WindowCommand::LeaveFullscreen),
            _ => None,
        };
        (Propagation::Stop, command)
    }

    /// Release the canvas; safe to call any number of times
    pub fn close(&mut self) {
        if self.canvas.take().is_some() {
            log::info!(
                "Released backing canvas after {} events",
                self.events_handled
            );
        }
        self.damage = Damage::None;
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::new(Brush::default(), Rgba8::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rect;

    const BG: Rgba8 = Rgba8::WHITE;
    const FG: Rgba8 = Rgba8::BLACK;

    fn configured(width: u32, height: u32) -> WindowState {
        let mut state = WindowState::default();
        state.configure(width, height);
        state
    }

    fn is_uniform(state: &WindowState, color: Rgba8) -> bool {
        state
            .canvas()
            .unwrap()
            .pixels()
            .iter()
            .all(|&p| p == color)
    }

    fn square_is(state: &WindowState, cx: i32, cy: i32, color: Rgba8) -> bool {
        let canvas = state.canvas().unwrap();
        (cy - 3..cy + 3).all(|y| (cx - 3..cx + 3).all(|x| canvas.pixel(x, y) == Some(color)))
    }

    fn press(button: PointerButton, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerPress {
            button,
            position: [x, y],
        }
    }

    fn motion(buttons: ButtonMask, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMotion {
            buttons,
            position: [x, y],
        }
    }

    #[test]
    fn configure_tracks_latest_size() {
        let mut state = WindowState::default();
        for (w, h) in [(400, 300), (800, 600), (401, 299), (400, 300)] {
            assert_eq!(state.configure(w, h), Propagation::Stop);
            assert_eq!(state.canvas().unwrap().size(), (w, h));
            assert!(is_uniform(&state, BG));
        }
        assert_eq!(state.take_damage(), Damage::Full);
    }

    #[test]
    fn configure_discards_previous_drawing() {
        let mut state = configured(100, 100);
        state.paint(50.0, 50.0);
        state.configure(100, 100);
        assert!(is_uniform(&state, BG));
    }

    #[test]
    fn failed_configure_leaves_no_canvas() {
        let mut state = configured(100, 100);
        state.configure(0, 100);
        assert!(state.canvas().is_none());

        // Handlers stay inert until a usable size arrives.
        state.dispatch(press(PointerButton::Primary, 10.0, 10.0));
        assert!(state.canvas().is_none());
        state.configure(50, 50);
        assert_eq!(state.canvas().unwrap().size(), (50, 50));
    }

    #[test]
    fn paint_then_composite_shows_square() {
        let mut state = configured(100, 100);
        state.take_damage();
        assert!(state.paint(20.0, 30.0));

        let canvas = state.canvas().unwrap();
        for y in 0..100 {
            for x in 0..100 {
                let inside = (17..23).contains(&x) && (27..33).contains(&y);
                let expected = if inside { FG } else { BG };
                assert_eq!(canvas.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
        assert_eq!(state.take_damage(), Damage::Region(Rect::new(17, 27, 23, 33)));
    }

    #[test]
    fn clear_restores_background_and_is_idempotent() {
        let mut state = configured(64, 64);
        state.paint(10.0, 10.0);
        assert!(state.clear());
        assert!(is_uniform(&state, BG));
        assert!(state.clear());
        assert!(is_uniform(&state, BG));
        assert_eq!(state.pending_damage(), Damage::Full);
    }

    #[test]
    fn secondary_press_matches_clear() {
        let mut via_press = configured(64, 64);
        let mut via_clear = configured(64, 64);
        for state in [&mut via_press, &mut via_clear] {
            state.paint(10.0, 10.0);
            state.paint(40.0, 12.0);
        }

        via_press.dispatch(press(PointerButton::Secondary, 30.0, 30.0));
        via_clear.clear();

        assert_eq!(
            via_press.canvas().unwrap().pixels(),
            via_clear.canvas().unwrap().pixels()
        );
        assert_eq!(via_press.pending_damage(), via_clear.pending_damage());
    }

    #[test]
    fn other_buttons_do_nothing() {
        let mut state = configured(64, 64);
        state.take_damage();
        let out = state.dispatch(press(PointerButton::Middle, 10.0, 10.0));
        assert_eq!(out.propagation, Propagation::Stop);
        assert!(!out.redraw);
        assert!(is_uniform(&state, BG));
    }

    #[test]
    fn motion_without_primary_never_paints() {
        let mut state = configured(64, 64);
        state.take_damage();
        for buttons in [ButtonMask::NONE, ButtonMask::SECONDARY, ButtonMask::MIDDLE] {
            let out = state.dispatch(motion(buttons, 20.0, 20.0));
            assert_eq!(out.propagation, Propagation::Stop);
            assert!(!out.redraw);
        }
        assert!(is_uniform(&state, BG));
        assert!(state.pending_damage().is_none());
    }

    #[test]
    fn motion_with_primary_held_paints() {
        let mut state = configured(64, 64);
        state.take_damage();
        let out = state.dispatch(motion(ButtonMask::PRIMARY | ButtonMask::SECONDARY, 20.0, 20.0));
        assert!(out.redraw);
        assert!(square_is(&state, 20, 20, FG));
    }

    #[test]
    fn handlers_without_canvas_are_inert() {
        let mut state = WindowState::default();
        let events = [
            press(PointerButton::Primary, 5.0, 5.0),
            press(PointerButton::Secondary, 5.0, 5.0),
            motion(ButtonMask::PRIMARY, 6.0, 6.0),
        ];
        for event in events {
            let out = state.dispatch(event);
            assert_eq!(out.propagation, Propagation::Stop);
            assert!(!out.redraw);
        }
        assert!(!state.paint(1.0, 1.0));
        assert!(!state.clear());
        assert!(state.canvas().is_none());
        assert!(state.pending_damage().is_none());
    }

    #[test]
    fn keys_map_to_window_commands() {
        let mut state = WindowState::default();
        let cases = [
            (KeyInput::Character("f".into()), Some(WindowCommand::EnterFullscreen)),
            (KeyInput::Character("F".into()), Some(WindowCommand::EnterFullscreen)),
            (KeyInput::Character("q".into()), Some(WindowCommand::Close)),
            (KeyInput::Character("Q".into()), Some(WindowCommand::Close)),
            (KeyInput::Escape, Some(WindowCommand::LeaveFullscreen)),
            (KeyInput::Character("x".into()), None),
            (KeyInput::Other, None),
        ];
        for (key, expected) in cases {
            let out = state.dispatch(InputEvent::KeyPress(key.clone()));
            assert_eq!(out.command, expected, "key {key:?}");
            assert_eq!(out.propagation, Propagation::Stop);
        }
    }

    #[test]
    fn close_releases_canvas_once() {
        let mut state = configured(32, 32);
        state.dispatch(InputEvent::Close);
        assert!(state.canvas().is_none());
        assert!(state.pending_damage().is_none());

        // Second close is harmless.
        state.close();
        assert!(state.canvas().is_none());
    }

    #[test]
    fn events_are_counted() {
        let mut state = WindowState::default();
        state.dispatch(InputEvent::Configure { width: 10, height: 10 });
        state.dispatch(InputEvent::KeyPress(KeyInput::Other));
        assert_eq!(state.events_handled(), 2);
    }

    #[test]
    fn drawing_session_scenario() {
        let mut state = WindowState::default();
        state.dispatch(InputEvent::Configure { width: 400, height: 300 });
        assert_eq!(state.canvas().unwrap().size(), (400, 300));
        assert!(is_uniform(&state, BG));
        state.take_damage();

        let out = state.dispatch(press(PointerButton::Primary, 50.0, 50.0));
        assert!(out.redraw);
        assert!(square_is(&state, 50, 50, FG));

        state.dispatch(motion(ButtonMask::PRIMARY, 55.0, 50.0));
        assert!(square_is(&state, 55, 50, FG));
        let canvas = state.canvas().unwrap();
        assert_eq!(canvas.pixel(50, 44), Some(BG));
        assert_eq!(canvas.pixel(50, 53), Some(BG));
        assert_eq!(canvas.pixel(58, 50), Some(BG));
        assert_eq!(
            state.take_damage(),
            Damage::Region(Rect::new(47, 47, 58, 53))
        );

        // A jump leaves the pixels in between untouched.
        state.dispatch(motion(ButtonMask::PRIMARY, 90.0, 50.0));
        assert_eq!(state.canvas().unwrap().pixel(70, 50), Some(BG));

        let out = state.dispatch(press(PointerButton::Secondary, 0.0, 0.0));
        assert!(out.redraw);
        assert!(is_uniform(&state, BG));
    }
}
