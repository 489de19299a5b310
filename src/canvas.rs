//! Backing Canvas
//!
//! The off-screen pixel buffer that holds the accumulated drawing. It is
//! sized to the drawing area's allocation and replaced wholesale whenever
//! that allocation changes.

use crate::color::Rgba8;
use crate::error::{Error, Result};

/// Axis-aligned pixel rectangle, half-open: `[x0, x1) × [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle covering a whole `width` × `height` area at the origin
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Overlap of both, `None` when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        );
        (!r.is_empty()).then_some(r)
    }
}

/// Off-screen drawing state, one pixel per drawing-area pixel
pub struct BackingCanvas {
    width: u32,
    height: u32,
    background: Rgba8,
    pixels: Vec<Rgba8>,
}

impl BackingCanvas {
    /// Allocate a canvas filled with `background`
    ///
    /// Allocation failure is reported instead of aborting so the caller can
    /// carry on without a canvas.
    pub fn new(width: u32, height: u32, background: Rgba8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyCanvas { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::CanvasAllocation { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| Error::CanvasAllocation { width, height })?;
        pixels.resize(len, background);

        Ok(Self {
            width,
            height,
            background,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Whole-canvas rectangle
    pub fn bounds(&self) -> Rect {
        Rect::of_size(self.width, self.height)
    }

    /// Reset every pixel to the background colour, keeping the allocation
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Pixel at (x, y), `None` outside the canvas
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        Some(self.pixels[self.index(x as u32, y as u32)])
    }

    /// Fill `rect` with `color`, clipped to the canvas
    ///
    /// Returns the area actually written, if any.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> Option<Rect> {
        let clipped = rect.intersect(&self.bounds())?;
        for y in clipped.y0..clipped.y1 {
            let start = self.index(clipped.x0 as u32, y as u32);
            let end = start + clipped.width() as usize;
            self.pixels[start..end].fill(color);
        }
        Some(clipped)
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major, no padding
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bytes per row of [`Self::as_bytes`]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * std::mem::size_of::<Rgba8>() as u32
    }

    /// Byte offset of pixel (x, y) within [`Self::as_bytes`]
    pub fn byte_offset(&self, x: u32, y: u32) -> u64 {
        (self.index(x, y) * std::mem::size_of::<Rgba8>()) as u64
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl std::fmt::Debug for BackingCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_uniform_background() {
        let canvas = BackingCanvas::new(400, 300, Rgba8::WHITE).unwrap();
        assert_eq!(canvas.size(), (400, 300));
        assert_eq!(canvas.pixels().len(), 400 * 300);
        assert!(canvas.pixels().iter().all(|&p| p == Rgba8::WHITE));
        assert_eq!(canvas.as_bytes().len(), 400 * 300 * 4);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(
            BackingCanvas::new(0, 10, Rgba8::WHITE),
            Err(Error::EmptyCanvas { width: 0, height: 10 })
        ));
        assert!(BackingCanvas::new(10, 0, Rgba8::WHITE).is_err());
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut canvas = BackingCanvas::new(10, 10, Rgba8::WHITE).unwrap();
        let written = canvas.fill_rect(Rect::new(-3, 8, 2, 14), Rgba8::BLACK);
        assert_eq!(written, Some(Rect::new(0, 8, 2, 10)));
        assert_eq!(canvas.pixel(0, 9), Some(Rgba8::BLACK));
        assert_eq!(canvas.pixel(1, 8), Some(Rgba8::BLACK));
        assert_eq!(canvas.pixel(2, 9), Some(Rgba8::WHITE));
        assert_eq!(canvas.pixel(0, 7), Some(Rgba8::WHITE));
    }

    #[test]
    fn fill_rect_outside_writes_nothing() {
        let mut canvas = BackingCanvas::new(10, 10, Rgba8::WHITE).unwrap();
        assert_eq!(canvas.fill_rect(Rect::new(20, 20, 26, 26), Rgba8::BLACK), None);
        assert!(canvas.pixels().iter().all(|&p| p == Rgba8::WHITE));
    }

    #[test]
    fn clear_restores_background() {
        let mut canvas = BackingCanvas::new(8, 8, Rgba8::WHITE).unwrap();
        canvas.fill_rect(canvas.bounds(), Rgba8::BLACK);
        canvas.clear();
        assert!(canvas.pixels().iter().all(|&p| p == Rgba8::WHITE));
    }

    #[test]
    fn pixel_outside_is_none() {
        let canvas = BackingCanvas::new(4, 4, Rgba8::WHITE).unwrap();
        assert_eq!(canvas.pixel(-1, 0), None);
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.pixel(0, 4), None);
    }

    #[test]
    fn byte_offsets_follow_rows() {
        let canvas = BackingCanvas::new(5, 3, Rgba8::WHITE).unwrap();
        assert_eq!(canvas.bytes_per_row(), 20);
        assert_eq!(canvas.byte_offset(0, 1), 20);
        assert_eq!(canvas.byte_offset(2, 2), 48);
    }

    #[test]
    fn rect_union_and_intersect() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 3, 6, 8);
        assert_eq!(a.union(&b), Rect::new(0, 0, 6, 8));
        assert_eq!(a.intersect(&b), Some(Rect::new(2, 3, 4, 4)));
        assert_eq!(a.intersect(&Rect::new(4, 0, 5, 1)), None);
        assert_eq!(Rect::new(1, 1, 1, 1).union(&a), a);
    }
}
