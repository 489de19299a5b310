//! Brush
//!
//! The paint operation: every stamp is an axis-aligned filled square
//! centred on the pointer position.

use crate::canvas::{BackingCanvas, Rect};
use crate::color::Rgba8;

/// Parameters of the square stamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    /// Distance from the centre to each edge, in pixels
    pub half_width: f64,
    /// Foreground colour
    pub color: Rgba8,
}

impl Brush {
    pub fn new(half_width: f64, color: Rgba8) -> Self {
        Self { half_width, color }
    }

    /// Pixel rectangle covered by a stamp centred at (x, y)
    ///
    /// Edges are rounded to the nearest pixel boundary, so an integer centre
    /// covers `x - 3 ..= x + 2` with the default half-width.
    pub fn square(&self, x: f64, y: f64) -> Rect {
        let h = self.half_width;
        Rect::new(
            (x - h).round() as i32,
            (y - h).round() as i32,
            (x + h).round() as i32,
            (y + h).round() as i32,
        )
    }

    /// Stamp a square at (x, y) into `canvas`
    ///
    /// Pixels outside the canvas are dropped. Returns the unclipped square,
    /// which is the region to hand to the redraw machinery.
    pub fn stamp(&self, canvas: &mut BackingCanvas, x: f64, y: f64) -> Rect {
        let square = self.square(x, y);
        let written = canvas.fill_rect(square, self.color);
        log::trace!("Stamped {:?} at ({:.1}, {:.1}), wrote {:?}", square, x, y, written);
        square
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(3.0, Rgba8::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreground_pixels(canvas: &BackingCanvas) -> usize {
        canvas
            .pixels()
            .iter()
            .filter(|&&p| p != canvas.background())
            .count()
    }

    #[test]
    fn default_stamp_is_six_by_six() {
        let brush = Brush::default();
        let sq = brush.square(50.0, 50.0);
        assert_eq!(sq, Rect::new(47, 47, 53, 53));
        assert_eq!((sq.width(), sq.height()), (6, 6));
    }

    #[test]
    fn stamp_fills_square_only() {
        let brush = Brush::default();
        let mut canvas = BackingCanvas::new(100, 100, Rgba8::WHITE).unwrap();
        let damaged = brush.stamp(&mut canvas, 50.0, 50.0);

        assert_eq!(damaged, Rect::new(47, 47, 53, 53));
        assert_eq!(foreground_pixels(&canvas), 36);
        for y in 47..53 {
            for x in 47..53 {
                assert_eq!(canvas.pixel(x, y), Some(Rgba8::BLACK));
            }
        }
        assert_eq!(canvas.pixel(46, 50), Some(Rgba8::WHITE));
        assert_eq!(canvas.pixel(53, 50), Some(Rgba8::WHITE));
        assert_eq!(canvas.pixel(50, 46), Some(Rgba8::WHITE));
        assert_eq!(canvas.pixel(50, 53), Some(Rgba8::WHITE));
    }

    #[test]
    fn wider_brush_in_its_own_colour() {
        let red = Rgba8::opaque(255, 0, 0);
        let brush = Brush::new(5.0, red);
        let mut canvas = BackingCanvas::new(40, 40, Rgba8::WHITE).unwrap();
        assert_eq!(brush.stamp(&mut canvas, 20.0, 20.0), Rect::new(15, 15, 25, 25));
        assert_eq!(canvas.pixel(15, 24), Some(red));
        assert_eq!(canvas.pixel(25, 20), Some(Rgba8::WHITE));
    }

    #[test]
    fn fractional_centre_still_covers_six_pixels() {
        let brush = Brush::default();
        let sq = brush.square(10.4, 20.6);
        assert_eq!((sq.width(), sq.height()), (6, 6));
        assert_eq!(sq, Rect::new(7, 18, 13, 24));
    }

    #[test]
    fn stamp_near_edge_is_clipped() {
        let brush = Brush::default();
        let mut canvas = BackingCanvas::new(20, 20, Rgba8::WHITE).unwrap();
        let damaged = brush.stamp(&mut canvas, 1.0, 19.0);

        // Damage keeps the full square; the canvas only gets the visible part.
        assert_eq!(damaged, Rect::new(-2, 16, 4, 22));
        assert_eq!(foreground_pixels(&canvas), 4 * 4);
        assert_eq!(canvas.pixel(0, 19), Some(Rgba8::BLACK));
    }

    #[test]
    fn stamp_fully_outside_changes_nothing() {
        let brush = Brush::default();
        let mut canvas = BackingCanvas::new(20, 20, Rgba8::WHITE).unwrap();
        brush.stamp(&mut canvas, -50.0, 200.0);
        assert_eq!(foreground_pixels(&canvas), 0);
    }
}
