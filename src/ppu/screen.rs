use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Pixel sink fed by the display controller, one call per pixel in raster
/// order. `shade` is 8-bit grayscale, 255 being white.
pub trait Screen {
    fn set_pixel(&mut self, x: usize, y: usize, shade: u8);
}

/// In-memory 160x144 grayscale frame.
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: Box<[u8; SCREEN_WIDTH * SCREEN_HEIGHT]>,
    writes: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: Box::new([0xFF; SCREEN_WIDTH * SCREEN_HEIGHT]),
            writes: 0,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels[..]
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// Total `set_pixel` calls received.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Screen for FrameBuffer {
    fn set_pixel(&mut self, x: usize, y: usize, shade: u8) {
        self.writes += 1;
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = shade;
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}
