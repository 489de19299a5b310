//! Shell Configuration
//!
//! Fixed appearance and sizing of the window. Nothing here is read from
//! disk or the environment; `Default` is the configuration.

use crate::brush::Brush;
use crate::color::Rgba8;

#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Window title
    pub title: String,
    /// Application identifier (used as the X11/Wayland app id where supported)
    pub app_id: String,
    /// Empty space between the window edge and the frame, in pixels
    pub border_width: u32,
    /// Width of the frame's inset line, in pixels
    pub frame_width: u32,
    /// Minimum drawing-area size, in pixels
    pub min_canvas_size: (u32, u32),
    /// Canvas background (the "cleared" colour)
    pub background: Rgba8,
    /// Window fill behind the frame
    pub window_color: Rgba8,
    /// Frame line colour
    pub frame_color: Rgba8,
    /// Paint stamp
    pub brush: Brush,
}

impl ShellConfig {
    /// Inner window size that fits exactly the minimum drawing area
    pub fn min_window_size(&self) -> (u32, u32) {
        let inset = 2 * (self.border_width + self.frame_width);
        (
            self.min_canvas_size.0 + inset,
            self.min_canvas_size.1 + inset,
        )
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "Drawing Area".to_string(),
            app_id: "org.gtk.example".to_string(),
            border_width: 8,
            frame_width: 1,
            min_canvas_size: (400, 300),
            background: Rgba8::WHITE,
            window_color: Rgba8::opaque(246, 245, 244),
            frame_color: Rgba8::opaque(145, 145, 145),
            brush: Brush::default(),
        }
    }
}
