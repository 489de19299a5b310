//! Input Event Model
//!
//! Toolkit-neutral versions of the notifications the drawing area reacts
//! to. The shell converts winit events into these, already translated into
//! drawing-area coordinates, and hands them to the router in `app`.

use std::ops::{BitOr, BitOrAssign};

use winit::event::MouseButton;
use winit::keyboard::{Key, NamedKey};

/// Pointer button identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Main button (usually left)
    Primary,
    /// Alternate button (usually right)
    Secondary,
    Middle,
    Other(u16),
}

impl PointerButton {
    /// Bit for this button in a [`ButtonMask`]
    pub fn mask(self) -> ButtonMask {
        match self {
            PointerButton::Primary => ButtonMask::PRIMARY,
            PointerButton::Secondary => ButtonMask::SECONDARY,
            PointerButton::Middle => ButtonMask::MIDDLE,
            PointerButton::Other(_) => ButtonMask::NONE,
        }
    }
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            MouseButton::Back => PointerButton::Other(4),
            MouseButton::Forward => PointerButton::Other(5),
            MouseButton::Other(n) => PointerButton::Other(n),
        }
    }
}

/// Set of held pointer buttons, as reported alongside motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const PRIMARY: ButtonMask = ButtonMask(1 << 0);
    pub const MIDDLE: ButtonMask = ButtonMask(1 << 1);
    pub const SECONDARY: ButtonMask = ButtonMask(1 << 2);

    pub fn contains(self, other: ButtonMask) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: ButtonMask) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ButtonMask) {
        self.0 &= !other.0;
    }
}

impl BitOr for ButtonMask {
    type Output = ButtonMask;

    fn bitor(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonMask {
    fn bitor_assign(&mut self, rhs: ButtonMask) {
        self.0 |= rhs.0;
    }
}

/// Notification kinds a widget has subscribed to
///
/// Pointer notifications are not delivered to the drawing area unless it
/// opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const BUTTON_PRESS: EventMask = EventMask(1 << 0);
    pub const POINTER_MOTION: EventMask = EventMask(1 << 1);

    pub fn contains(self, other: EventMask) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

/// Keys the window reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Character(String),
    Escape,
    Other,
}

impl KeyInput {
    pub fn from_winit(key: &Key) -> Self {
        match key {
            Key::Character(c) => KeyInput::Character(c.to_string()),
            Key::Named(NamedKey::Escape) => KeyInput::Escape,
            _ => KeyInput::Other,
        }
    }
}

/// Request from a handler to the window shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    EnterFullscreen,
    LeaveFullscreen,
    Close,
}

/// A notification for the drawing area, in drawing-area pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Drawing area allocation became known or changed
    Configure { width: u32, height: u32 },
    /// Pointer button pressed
    PointerPress { button: PointerButton, position: [f64; 2] },
    /// Pointer moved; `buttons` holds the buttons down at the time
    PointerMotion { buttons: ButtonMask, position: [f64; 2] },
    /// Key pressed while the window has focus
    KeyPress(KeyInput),
    /// Window is going away
    Close,
}

impl InputEvent {
    /// Which subscription a widget needs to receive this event, if any
    pub fn required_mask(&self) -> EventMask {
        match self {
            InputEvent::PointerPress { .. } => EventMask::BUTTON_PRESS,
            InputEvent::PointerMotion { .. } => EventMask::POINTER_MOTION,
            _ => EventMask::NONE,
        }
    }
}
