use std::fmt::Write;

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::ppu::FrameBuffer;

/// Maps an 8-bit shade onto the 24-step ANSI grayscale ramp (232-255).
fn ansi_gray(shade: u8) -> u16 {
    232 + (shade as u16 * 23) / 255
}

pub fn render_frame(frame: &FrameBuffer) -> String {
    let mut output = String::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 8);

    // Move cursor to top-left (don't clear screen to avoid flickering)
    output.push_str("\x1B[H");

    // One character covers two vertical pixels.
    for y in (0..SCREEN_HEIGHT).step_by(2) {
        for x in 0..SCREEN_WIDTH {
            let top = ansi_gray(frame.pixel(x, y));
            let bottom = ansi_gray(frame.pixel(x, y + 1));
            // ▄ is the Unicode "Lower Half Block"
            let _ = write!(output, "\x1B[38;5;{}m\x1B[48;5;{}m▄", bottom, top);
        }
        output.push_str("\x1B[0m\n");
    }
    output
}

pub fn display_frame(frame: &FrameBuffer) {
    print!("{}", render_frame(frame));
}
