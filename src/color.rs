//! Colour Types and Conversion
//!
//! Canvas pixels are stored as 8-bit sRGB-encoded RGBA, which matches the
//! `Rgba8UnormSrgb` canvas texture byte for byte. Surface clear colours are
//! handed to wgpu in linear space, so they go through [`srgb_to_linear`].

/// A single canvas pixel: 8-bit sRGB-encoded RGBA
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);

    /// Create a fully opaque colour from sRGB components
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to a linear-space wgpu colour (for render pass clears)
    pub fn to_linear_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = srgb_u8_to_linear_f32(self.r, self.g, self.b, self.a as f32 / 255.0);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

/// Convert a single sRGB colour component to linear space
///
/// sRGB uses a gamma curve with a linear segment near black.
/// Formula from: https://en.wikipedia.org/wiki/SRGB#From_sRGB_to_CIE_XYZ
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert RGB from 0-255 sRGB to linear 0.0-1.0; alpha is passed through
#[inline]
pub fn srgb_u8_to_linear_f32(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [
        srgb_to_linear(r as f32 / 255.0),
        srgb_to_linear(g as f32 / 255.0),
        srgb_to_linear(b as f32 / 255.0),
        a,
    ]
}
