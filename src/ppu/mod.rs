mod render;
mod screen;
pub mod terminal;

use core::fmt;

use log::debug;

use crate::bits;
use crate::constants::*;
use crate::interrupt::Interrupt;
use crate::mmu::Memory;

pub use screen::{FrameBuffer, Screen};

/// STAT mode bits 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamSearch = 2,
    PixelTransfer = 3,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::HBlank => "H-Blank",
            Mode::VBlank => "V-Blank",
            Mode::OamSearch => "OAM Scan",
            Mode::PixelTransfer => "Drawing",
        };
        f.write_str(name)
    }
}

/// Display controller: the mode state machine plus the scanline renderer.
/// All registers it reads or updates (LCDC, STAT, LY, ...) live on the bus.
pub struct Ppu<S: Screen> {
    mode: Mode,
    /// Cycles spent in the current mode (all of V-Blank while in it).
    mode_cycles: u32,
    /// Mirrors LCDC bit 7 as last observed.
    enabled: bool,
    frame_ready: bool,
    /// IF bits raised during the previous advance.
    raised: u8,
    line: [u8; SCREEN_WIDTH],
    bg_index: [u8; SCREEN_WIDTH],
    screen: S,
}

impl<S: Screen> Ppu<S> {
    pub fn new(screen: S) -> Self {
        Self {
            mode: Mode::HBlank,
            mode_cycles: 0,
            enabled: false,
            frame_ready: false,
            raised: 0,
            line: [0xFF; SCREEN_WIDTH],
            bg_index: [0; SCREEN_WIDTH],
            screen,
        }
    }

    pub fn reset(&mut self) {
        self.mode = Mode::HBlank;
        self.mode_cycles = 0;
        self.enabled = false;
        self.frame_ready = false;
        self.raised = 0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_cycles(&self) -> u32 {
        self.mode_cycles
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Peeks at the frame-complete flag without consuming it.
    pub fn is_frame_ready(&self) -> bool {
        self.frame_ready
    }

    /// True once per V-Blank entry; the call clears it.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn advance(&mut self, cycles: u32, bus: &mut impl Memory) {
        self.clear_raised(bus);
        bus.set_oam_access(true);
        bus.set_vram_access(true);

        let lcdc = bus.read_byte(LCDC_ADDR);
        if !bits::bit(lcdc, 7) {
            if self.enabled {
                debug!("Display disabled");
                self.set_mode(Mode::HBlank, bus);
                self.mode_cycles = 0;
                self.enabled = false;
            }
            bus.write_register(LY_ADDR, 0);
            return;
        }
        if !self.enabled {
            debug!("Display enabled");
            self.set_mode(Mode::OamSearch, bus);
            self.mode_cycles = 0;
            self.enabled = true;
        }

        self.mode_cycles += cycles;
        match self.mode {
            Mode::OamSearch => {
                if self.mode_cycles >= OAM_SEARCH_CYCLES {
                    self.mode_cycles -= OAM_SEARCH_CYCLES;
                    self.set_mode(Mode::PixelTransfer, bus);
                }
            }
            Mode::PixelTransfer => {
                if self.mode_cycles >= PIXEL_TRANSFER_CYCLES {
                    self.mode_cycles -= PIXEL_TRANSFER_CYCLES;
                    self.set_mode(Mode::HBlank, bus);
                    let ly = bus.read_byte(LY_ADDR);
                    self.draw_line(ly, &*bus);
                }
            }
            Mode::HBlank => {
                if self.mode_cycles >= HBLANK_CYCLES {
                    self.mode_cycles -= HBLANK_CYCLES;
                    let ly = bus.read_byte(LY_ADDR).wrapping_add(1);
                    bus.write_register(LY_ADDR, ly);
                    if ly as usize >= SCREEN_HEIGHT {
                        self.set_mode(Mode::VBlank, bus);
                    } else {
                        self.set_mode(Mode::OamSearch, bus);
                    }
                }
            }
            Mode::VBlank => {
                if self.mode_cycles >= VBLANK_CYCLES {
                    self.mode_cycles -= VBLANK_CYCLES;
                    self.set_mode(Mode::OamSearch, bus);
                    bus.write_register(LY_ADDR, 0);
                } else {
                    let ly = (self.mode_cycles / SCANLINE_CYCLES) as u8 + SCREEN_HEIGHT as u8;
                    bus.write_register(LY_ADDR, ly);
                }
            }
        }

        self.update_lyc(bus);
        self.update_access(bus);
    }

    fn raise(&mut self, source: Interrupt, bus: &mut impl Memory) {
        bus.request_interrupt(source);
        self.raised |= source.bit();
    }

    fn clear_raised(&mut self, bus: &mut impl Memory) {
        if self.raised != 0 {
            let flags = bus.read_if();
            bus.write_if(flags & !self.raised);
            self.raised = 0;
        }
    }

    fn set_mode(&mut self, mode: Mode, bus: &mut impl Memory) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;

        let stat = (bus.read_byte(STAT_ADDR) & 0x7C) | mode as u8;
        let source_enabled = match mode {
            Mode::HBlank => bits::bit(stat, 3),
            Mode::VBlank => bits::bit(stat, 4),
            Mode::OamSearch => bits::bit(stat, 5),
            Mode::PixelTransfer => false,
        };
        if source_enabled {
            self.raise(Interrupt::LcdStat, bus);
        }
        if mode == Mode::VBlank {
            self.raise(Interrupt::VBlank, bus);
            self.frame_ready = true;
        }
        bus.write_register(STAT_ADDR, stat);
    }

    fn update_lyc(&mut self, bus: &mut impl Memory) {
        let matched = bus.read_byte(LY_ADDR) == bus.read_byte(LYC_ADDR);
        let stat = bits::set_bit(bus.read_byte(STAT_ADDR) & 0x7F, 2, matched);
        bus.write_register(STAT_ADDR, stat);
        if matched {
            self.raise(Interrupt::LcdStat, bus);
        }
    }

    fn update_access(&self, bus: &mut impl Memory) {
        if !self.enabled {
            return;
        }
        match self.mode {
            Mode::OamSearch => bus.set_oam_access(false),
            Mode::PixelTransfer => {
                bus.set_oam_access(false);
                bus.set_vram_access(false);
            }
            Mode::HBlank | Mode::VBlank => {}
        }
    }
}

impl<S: Screen> fmt::Debug for Ppu<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "--- PPU State ---\n\
             MODE: {:<8} | CYCLES: {}\n\
             ON:   {:<8} | FRAME:  {}\n\
             -----------------",
            self.mode, self.mode_cycles, self.enabled, self.frame_ready
        )
    }
}
