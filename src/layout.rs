//! Frame Layout
//!
//! Geometry of the window contents: a border of empty space, a thin inset
//! frame line, and the drawing area filling the rest.

use crate::canvas::Rect;
use crate::config::ShellConfig;

/// Placement of the frame and drawing area inside the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Window inner size
    pub window: (u32, u32),
    /// Frame outer rectangle, window coordinates
    pub frame: Rect,
    /// Drawing area rectangle, window coordinates
    pub drawing_area: Rect,
}

impl FrameLayout {
    pub fn compute(window_width: u32, window_height: u32, config: &ShellConfig) -> Self {
        let frame = inset(Rect::of_size(window_width, window_height), config.border_width);
        let drawing_area = inset(frame, config.frame_width);
        Self {
            window: (window_width, window_height),
            frame,
            drawing_area,
        }
    }

    /// Drawing area allocation
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.drawing_area.width(), self.drawing_area.height())
    }

    /// Translate a window position into drawing-area coordinates
    pub fn to_canvas(&self, x: f64, y: f64) -> [f64; 2] {
        [x - self.drawing_area.x0 as f64, y - self.drawing_area.y0 as f64]
    }

    /// Whether a window position falls on the drawing area
    pub fn hit_canvas(&self, x: f64, y: f64) -> bool {
        self.drawing_area.contains(x.floor() as i32, y.floor() as i32)
    }
}

/// Shrink `rect` by `by` on every side, collapsing to empty rather than
/// inverting
fn inset(rect: Rect, by: u32) -> Rect {
    let by = by as i32;
    let x0 = (rect.x0 + by).min(rect.x1);
    let y0 = (rect.y0 + by).min(rect.y1);
    Rect::new(x0, y0, (rect.x1 - by).max(x0), (rect.y1 - by).max(y0))
}
