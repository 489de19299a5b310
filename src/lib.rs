//! Scribble Canvas Library
//!
//! A small desktop drawing area: primary-button drags stamp squares onto a
//! backing canvas, the secondary button clears it, and `F`/`Escape`/`Q`
//! control fullscreen and closing.
//!
//! The drawing state and event routing (`app`, `canvas`, `brush`,
//! `damage`, `input`, `layout`) do not depend on a window and are driven
//! directly by the tests; `window` and `renderer` bind them to winit and
//! wgpu.

mod app;
mod brush;
mod canvas;
mod color;
mod config;
mod damage;
mod error;
mod input;
mod layout;
mod renderer;
mod window;

pub use app::{Dispatch, Propagation, WindowState};
pub use brush::Brush;
pub use canvas::{BackingCanvas, Rect};
pub use color::Rgba8;
pub use config::ShellConfig;
pub use damage::Damage;
pub use error::{Error, Result};
pub use input::{ButtonMask, EventMask, InputEvent, KeyInput, PointerButton, WindowCommand};
pub use layout::FrameLayout;
pub use renderer::{FrameStatus, Renderer};
pub use window::{run, DrawingArea, Shell};
