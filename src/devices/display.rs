//! Framebuffer mirror of the display window.
//!
//! The display window at $FC00-$FFFF is a 32x32 grid of one-byte pixels laid
//! out row by row. `PixelBuffer` keeps the pixel values a renderer needs and the
//! set of pixels touched since the renderer last looked.

use super::DisplaySink;
use crate::memory::DISPLAY_SIZE;

/// Pixels per display row.
pub const DISPLAY_WIDTH: usize = 0x20;

/// Display rows.
pub const DISPLAY_HEIGHT: usize = 0x20;

/// 32x32 pixel buffer fed by display window writes.
///
/// # Examples
///
/// ```rust
/// use emu6502::{DisplaySink, PixelBuffer};
///
/// let mut screen = PixelBuffer::new();
/// screen.on_write(0xFC21, 0x0E); // row 1, column 1
///
/// assert_eq!(screen.pixel(1, 1), 0x0E);
/// assert_eq!(screen.take_dirty(), vec![0x21]);
/// ```
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    dirty: Vec<u16>,
    pending: Vec<bool>,
}

impl PixelBuffer {
    /// Create a blank (all zero) buffer.
    pub fn new() -> Self {
        Self {
            pixels: vec![0; DISPLAY_SIZE],
            dirty: Vec::new(),
            pending: vec![false; DISPLAY_SIZE],
        }
    }

    /// Pixel value at column `x`, row `y`. Coordinates wrap inside the grid.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        let index = (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH);
        self.pixels[index]
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Offsets (0-0x3FF) written since the last call, each listed once in
    /// order of first write.
    pub fn take_dirty(&mut self) -> Vec<u16> {
        for &offset in &self.dirty {
            self.pending[offset as usize] = false;
        }
        std::mem::take(&mut self.dirty)
    }

    /// True when every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for PixelBuffer {
    fn on_write(&mut self, address: u16, value: u8) {
        let offset = address & (DISPLAY_SIZE as u16 - 1);
        self.pixels[offset as usize] = value;
        if !self.pending[offset as usize] {
            self.pending[offset as usize] = true;
            self.dirty.push(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_layout_is_row_major() {
        let mut screen = PixelBuffer::new();

        screen.on_write(0xFC00, 1);
        screen.on_write(0xFC1F, 2);
        screen.on_write(0xFC20, 3);
        screen.on_write(0xFFFF, 4);

        assert_eq!(screen.pixel(0, 0), 1);
        assert_eq!(screen.pixel(31, 0), 2);
        assert_eq!(screen.pixel(0, 1), 3);
        assert_eq!(screen.pixel(31, 31), 4);
    }

    #[test]
    fn test_take_dirty_drains() {
        let mut screen = PixelBuffer::new();
        screen.on_write(0xFC05, 9);

        assert_eq!(screen.take_dirty(), vec![5]);
        assert!(screen.take_dirty().is_empty());
        assert!(!screen.is_blank());
    }

    #[test]
    fn test_dirty_list_is_bounded_by_window() {
        let mut screen = PixelBuffer::new();

        for i in 0..100_000u32 {
            screen.on_write(0xFC00 + (i % DISPLAY_SIZE as u32) as u16, i as u8);
        }
        screen.on_write(0xFC07, 0xAA);

        let dirty = screen.take_dirty();
        assert_eq!(dirty.len(), DISPLAY_SIZE);
        assert_eq!(dirty[0], 0);
        assert_eq!(dirty[DISPLAY_SIZE - 1], 0x3FF);
        assert_eq!(screen.pixel(7, 0), 0xAA);

        screen.on_write(0xFC07, 0xBB);
        assert_eq!(screen.take_dirty(), vec![7]);
    }
}
