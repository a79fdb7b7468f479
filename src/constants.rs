use std::time::Duration;

// Constants for flags
pub const FLAG_Z: u8 = 0b1000_0000;
pub const FLAG_N: u8 = 0b0100_0000;
pub const FLAG_H: u8 = 0b0010_0000;
pub const FLAG_C: u8 = 0b0001_0000;

pub const CB_PREFIX_OPCODE_BYTE: u8 = 0xCB;

// I/O register addresses
pub const JOYP_ADDR: u16 = 0xFF00;
pub const SB_ADDR: u16 = 0xFF01;
pub const SC_ADDR: u16 = 0xFF02;
pub const DIV_ADDR: u16 = 0xFF04;
pub const TIMA_ADDR: u16 = 0xFF05;
pub const TMA_ADDR: u16 = 0xFF06;
pub const TAC_ADDR: u16 = 0xFF07;
pub const IF_ADDR: u16 = 0xFF0F;
pub const LCDC_ADDR: u16 = 0xFF40;
pub const STAT_ADDR: u16 = 0xFF41;
pub const SCY_ADDR: u16 = 0xFF42;
pub const SCX_ADDR: u16 = 0xFF43;
pub const LY_ADDR: u16 = 0xFF44;
pub const LYC_ADDR: u16 = 0xFF45;
pub const DMA_ADDR: u16 = 0xFF46;
pub const BGP_ADDR: u16 = 0xFF47;
pub const OBP0_ADDR: u16 = 0xFF48;
pub const OBP1_ADDR: u16 = 0xFF49;
pub const WY_ADDR: u16 = 0xFF4A;
pub const WX_ADDR: u16 = 0xFF4B;
pub const BOOT_ADDR: u16 = 0xFF50;
pub const IE_ADDR: u16 = 0xFFFF;

/// Joypad register value when no input device is attached.
pub const JOYP_OPEN_BUS: u8 = 0xEF;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

// Display controller timing, in cycles.
pub const OAM_SEARCH_CYCLES: u32 = 79;
pub const PIXEL_TRANSFER_CYCLES: u32 = 172;
pub const HBLANK_CYCLES: u32 = 205;
pub const SCANLINE_CYCLES: u32 = 456;
pub const VBLANK_CYCLES: u32 = SCANLINE_CYCLES * 10;
/// 154 scanlines.
pub const CYCLES_PER_FRAME: u32 = SCANLINE_CYCLES * 154;

/// Cost of a step that executes nothing (halted, or waking from halt).
pub const DEFAULT_STEP_CYCLES: u32 = 4;
/// Cost of dispatching to an interrupt vector.
pub const INTERRUPT_SERVICE_CYCLES: u32 = 20;

pub const FRAME_DURATION: Duration = Duration::from_nanos(16_742_706); // ~59.7 fps
