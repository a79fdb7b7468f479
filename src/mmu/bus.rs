/*
Source: https://gbdev.io/pandocs/Memory_Map.html

Start	End	Description
0000	3FFF	16 KiB ROM bank 00 (bootstrap image below 0100 while booting)
4000	7FFF	16 KiB ROM Bank 01–NN, switched by the bank controller
8000	9FFF	8 KiB Video RAM (VRAM), gated by the display
A000	BFFF	8 KiB External RAM, via the bank controller
C000	DFFF	8 KiB Work RAM (WRAM)
E000	FDFF	Echo RAM (mirror of C000–DDFF)
FE00	FE9F	Object attribute memory (OAM), gated by the display
FEA0	FEFF	Not Usable
FF00	FF7F	I/O Registers
FF80	FFFE	High RAM (HRAM)
FFFF	FFFF	Interrupt Enable register (IE)
*/

use log::{debug, trace};

use crate::{
    cartridge::{BankController, Cartridge, ConfigError},
    constants::*,
    input::Joypad,
    interrupt::Interrupt,
    mmu::memory_trait::Memory,
};

const WRAM_SIZE: usize = 0x2000;
const VRAM_SIZE: usize = 0x2000;
const OAM_SIZE: usize = 0xA0;
/// FF00-FF7F plus one trailing byte for IE.
const IO_SIZE: usize = 0x81;
const HRAM_SIZE: usize = 0x7F;
const IE_INDEX: usize = IO_SIZE - 1;

/// Reads from a region the display controller has locked.
const GATED_READ: u8 = 0x00;

pub struct Bus {
    mbc: BankController,
    bootrom: Option<Vec<u8>>,
    /// Set at power-on when a bootstrap image exists; cleared for good by a
    /// nonzero write to FF50.
    booting: bool,
    wram: Box<[u8; WRAM_SIZE]>,
    vram: Box<[u8; VRAM_SIZE]>,
    oam: [u8; OAM_SIZE],
    io: [u8; IO_SIZE],
    hram: [u8; HRAM_SIZE],
    vram_accessible: bool,
    oam_accessible: bool,
    joypad: Option<Joypad>,
    serial_buffer: Vec<u8>,
}

impl Bus {
    pub fn new(cartridge: Cartridge) -> Result<Self, ConfigError> {
        let Cartridge {
            rom,
            bootrom,
            headers,
        } = cartridge;
        let mbc = BankController::new(rom, headers.cart_type, headers.ram_size_code)?;

        Ok(Bus {
            mbc,
            booting: bootrom.is_some(),
            bootrom,
            wram: Box::new([0; WRAM_SIZE]),
            vram: Box::new([0; VRAM_SIZE]),
            oam: [0; OAM_SIZE],
            io: [0; IO_SIZE],
            hram: [0; HRAM_SIZE],
            vram_accessible: true,
            oam_accessible: true,
            joypad: None,
            serial_buffer: Vec::new(),
        })
    }

    /// Clears all storage and re-arms the boot latch.
    pub fn reset(&mut self) {
        self.mbc.reset();
        self.booting = self.bootrom.is_some();
        self.wram.fill(0);
        self.vram.fill(0);
        self.oam.fill(0);
        self.io.fill(0);
        self.hram.fill(0);
        self.vram_accessible = true;
        self.oam_accessible = true;
        self.serial_buffer.clear();
    }

    /// Routes joypad register reads through `joypad` from now on.
    pub fn attach_joypad(&mut self, joypad: Joypad) {
        self.joypad = Some(joypad);
    }

    pub fn joypad_mut(&mut self) -> Option<&mut Joypad> {
        self.joypad.as_mut()
    }

    pub fn has_bootrom(&self) -> bool {
        self.bootrom.is_some()
    }

    pub fn is_booting(&self) -> bool {
        self.booting
    }

    pub fn vram_accessible(&self) -> bool {
        self.vram_accessible
    }

    pub fn oam_accessible(&self) -> bool {
        self.oam_accessible
    }

    pub fn mbc(&self) -> &BankController {
        &self.mbc
    }

    /// Every byte shifted out over the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.serial_buffer
    }

    fn dma_transfer(&mut self, val: u8) {
        let source_base = (val as u16) << 8;
        debug!("DMA transfer from 0x{:04X}", source_base);
        for i in 0..OAM_SIZE as u16 {
            self.oam[i as usize] = self.read_byte(source_base.wrapping_add(i));
        }
    }

    fn serial_transfer(&mut self) {
        let byte = self.io[(SB_ADDR - 0xFF00) as usize];
        debug!("Serial: 0x{:02X} '{}'", byte, byte as char);
        self.serial_buffer.push(byte);
        // Transfer completes immediately.
        self.io[(SC_ADDR - 0xFF00) as usize] &= 0x7F;
        self.request_interrupt(Interrupt::Serial);
    }

    fn read_boot_or_cartridge(&self, addr: u16) -> u8 {
        self.bootrom
            .as_ref()
            .and_then(|boot| boot.get(addr as usize).copied())
            .unwrap_or_else(|| self.mbc.read(addr))
    }
}

impl Memory for Bus {
    fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00FF if self.booting => self.read_boot_or_cartridge(addr),
            0x0000..=0x7FFF => self.mbc.read(addr),
            0x8000..=0x9FFF => {
                if self.vram_accessible {
                    self.vram[(addr - 0x8000) as usize]
                } else {
                    GATED_READ
                }
            }
            0xA000..=0xBFFF => self.mbc.read(addr),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],
            0xFE00..=0xFE9F => {
                if self.oam_accessible {
                    self.oam[(addr - 0xFE00) as usize]
                } else {
                    GATED_READ
                }
            }
            0xFEA0..=0xFEFF => 0x00,
            JOYP_ADDR => self
                .joypad
                .as_ref()
                .map_or(JOYP_OPEN_BUS, |pad| pad.read(self.io[0])),
            STAT_ADDR => self.io[(addr - 0xFF00) as usize] | 0x80,
            0xFF01..=0xFF7F => self.io[(addr - 0xFF00) as usize],
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            IE_ADDR => self.io[IE_INDEX],
        }
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.mbc.write(addr, val),
            0x8000..=0x9FFF => {
                if self.vram_accessible {
                    self.vram[(addr - 0x8000) as usize] = val;
                } else {
                    trace!("write_byte [0x{:04X}] -> 0x{:02X} (VRAM locked)", addr, val);
                }
            }
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = val,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = val,
            0xFE00..=0xFE9F => {
                if self.oam_accessible {
                    self.oam[(addr - 0xFE00) as usize] = val;
                } else {
                    trace!("write_byte [0x{:04X}] -> 0x{:02X} (OAM locked)", addr, val);
                }
            }
            0xFEA0..=0xFEFF => {}
            JOYP_ADDR => self.io[0] = val & 0x30,
            SC_ADDR => {
                self.io[(addr - 0xFF00) as usize] = val;
                if val == 0x81 {
                    self.serial_transfer();
                }
            }
            DIV_ADDR => self.io[(addr - 0xFF00) as usize] = 0,
            STAT_ADDR => {
                // Bits 3-6 select interrupt sources; mode and match bits are
                // owned by the display controller.
                let mask = 0b0111_1000;
                let index = (addr - 0xFF00) as usize;
                self.io[index] = (val & mask) | (self.io[index] & !mask);
            }
            DMA_ADDR => {
                self.io[(addr - 0xFF00) as usize] = val;
                self.dma_transfer(val);
            }
            BOOT_ADDR => {
                self.io[(addr - 0xFF00) as usize] = val;
                if val != 0 && self.booting {
                    debug!("Boot latch released");
                    self.booting = false;
                }
            }
            0xFF01..=0xFF7F => self.io[(addr - 0xFF00) as usize] = val,
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = val,
            IE_ADDR => self.io[IE_INDEX] = val,
        }
    }

    fn write_register(&mut self, addr: u16, val: u8) {
        match addr {
            0xFF00..=0xFF7F => self.io[(addr - 0xFF00) as usize] = val,
            IE_ADDR => self.io[IE_INDEX] = val,
            _ => self.write_byte(addr, val),
        }
    }

    fn set_vram_access(&mut self, accessible: bool) {
        self.vram_accessible = accessible;
    }

    fn set_oam_access(&mut self, accessible: bool) {
        self.oam_accessible = accessible;
    }
}
