use crate::error::RenderError;

/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with a uniform opaque color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// White canvas — the background both motives are drawn on.
    pub fn white(width: u32, height: u32) -> crate::Result<Self> {
        Self::filled(width, height, [255, 255, 255])
    }

    #[inline]
    pub fn set_pixel(&mut self, px: u32, py: u32, rgba: [u8; 4]) {
        debug_assert!(px < self.width && py < self.height);
        let idx = (py as usize * self.width as usize + px as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    #[inline]
    pub fn pixel(&self, px: u32, py: u32) -> [u8; 4] {
        let idx = (py as usize * self.width as usize + px as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}
