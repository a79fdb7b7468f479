//! Cartridge bank controller.
//!
//! Owns the ROM image and the optional external RAM, and translates the two
//! cartridge windows (`0000-7FFF` ROM, `A000-BFFF` RAM) into physical offsets.

use log::{debug, trace};

use super::error::ConfigError;

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;
const OPEN_BUS: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    /// Plain 32 KiB ROM, no banking registers.
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc4,
    Mbc5,
}

impl ControllerKind {
    pub fn from_cart_type(code: u8) -> Result<Self, ConfigError> {
        match code {
            0x00 => Ok(ControllerKind::None),
            0x01..=0x03 => Ok(ControllerKind::Mbc1),
            0x05 | 0x06 => Ok(ControllerKind::Mbc2),
            0x0F | 0x10 | 0x12 | 0x13 => Ok(ControllerKind::Mbc3),
            0x15..=0x17 => Ok(ControllerKind::Mbc4),
            0x19..=0x1E => Ok(ControllerKind::Mbc5),
            _ => Err(ConfigError::UnknownCartridgeType(code)),
        }
    }
}

/// Cartridge type codes that carry external RAM.
fn has_external_ram(code: u8) -> bool {
    matches!(
        code,
        0x02 | 0x03
            | 0x08
            | 0x09
            | 0x0C
            | 0x0D
            | 0x10
            | 0x13
            | 0x16
            | 0x17
            | 0x1A
            | 0x1B
            | 0x1D
            | 0x1E
            | 0xFF
    )
}

fn external_ram_size(kind: ControllerKind, ram_size_code: u8) -> Result<usize, ConfigError> {
    // MBC2 has 512 half-bytes built in; the header code is meaningless.
    if kind == ControllerKind::Mbc2 {
        return Ok(512);
    }
    match ram_size_code {
        0x01 => Ok(0x0800),
        0x02 => Ok(0x2000),
        0x03 => Ok(0x8000),
        _ => Err(ConfigError::UnknownRamSize(ram_size_code)),
    }
}

#[derive(Debug)]
pub struct BankController {
    kind: ControllerKind,
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_bank: u8,
    ram_bank: u8,
    ram_enabled: bool,
    /// Mode register: false selects ROM banking, true RAM banking.
    ram_banking: bool,
}

impl BankController {
    pub fn new(rom: Vec<u8>, cart_type: u8, ram_size_code: u8) -> Result<Self, ConfigError> {
        let kind = ControllerKind::from_cart_type(cart_type)?;
        let ram = if kind == ControllerKind::Mbc2 || has_external_ram(cart_type) {
            vec![0; external_ram_size(kind, ram_size_code)?]
        } else {
            Vec::new()
        };

        debug!(
            "Bank controller: {:?}, rom: {} bytes, external ram: {} bytes",
            kind,
            rom.len(),
            ram.len()
        );

        Ok(Self {
            kind,
            rom,
            ram,
            rom_bank: 0,
            ram_bank: 0,
            ram_enabled: false,
            ram_banking: false,
        })
    }

    /// Returns the banking registers to their power-on state.
    /// External RAM contents survive.
    pub fn reset(&mut self) {
        self.rom_bank = 0;
        self.ram_bank = 0;
        self.ram_enabled = false;
        self.ram_banking = false;
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn rom_bank(&self) -> u8 {
        self.rom_bank
    }

    pub fn ram_bank(&self) -> u8 {
        self.ram_bank
    }

    pub fn ram_enabled(&self) -> bool {
        self.ram_enabled
    }

    pub fn ram_len(&self) -> usize {
        self.ram.len()
    }

    /// Physical ROM offset for an address in the switched window.
    pub fn translate_rom_address(&self, addr: u16) -> usize {
        if self.rom_bank <= 0x01 {
            return addr as usize;
        }

        let mut bank = self.rom_bank as usize;
        if self.kind == ControllerKind::Mbc1 && matches!(bank, 0x20 | 0x40 | 0x60) {
            bank += 1;
        }
        bank * ROM_BANK_SIZE + (addr as usize - ROM_BANK_SIZE)
    }

    fn ram_offset(&self, addr: u16) -> Option<usize> {
        if self.ram.is_empty() {
            return None;
        }
        let bank = if self.ram_banking {
            self.ram_bank as usize
        } else {
            0
        };
        Some((bank * RAM_BANK_SIZE + (addr as usize - 0xA000)) % self.ram.len())
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x3FFF => self.rom.get(addr as usize).copied().unwrap_or(OPEN_BUS),
            0x4000..=0x7FFF => self
                .rom
                .get(self.translate_rom_address(addr))
                .copied()
                .unwrap_or(OPEN_BUS),
            0xA000..=0xBFFF => {
                if !self.ram_enabled {
                    return 0x00;
                }
                self.ram_offset(addr).map_or(0x00, |i| self.ram[i])
            }
            _ => {
                debug_assert!(false, "bank controller read outside its windows: {addr:04X}");
                OPEN_BUS
            }
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        if self.kind == ControllerKind::None && addr < 0x8000 {
            trace!("write [0x{:04X}] -> 0x{:02X} (ROM only, ignored)", addr, val);
            return;
        }

        match addr {
            0x0000..=0x1FFF => {
                let enabled = val & 0x0F == 0x0A;
                if enabled != self.ram_enabled {
                    debug!("External RAM enabled: {}", enabled);
                }
                self.ram_enabled = enabled;
            }
            0x2000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0xE0) | (val & 0x1F);
                debug!("ROM bank select: 0x{:02X}", self.rom_bank);
            }
            0x4000..=0x5FFF => {
                let val = val & 0x03;
                if self.ram_banking {
                    self.ram_bank = val;
                    debug!("RAM bank select: {}", self.ram_bank);
                } else {
                    self.rom_bank = (self.rom_bank & 0x1F) | (val << 5);
                    debug!("ROM bank select: 0x{:02X}", self.rom_bank);
                }
            }
            0x6000..=0x7FFF => {
                self.ram_banking = val & 0x01 != 0;
                debug!("Banking mode: ram_banking = {}", self.ram_banking);
            }
            0xA000..=0xBFFF => {
                if !self.ram_enabled {
                    return;
                }
                if let Some(i) = self.ram_offset(addr) {
                    self.ram[i] = val;
                }
            }
            _ => {
                debug_assert!(false, "bank controller write outside its windows: {addr:04X}");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// 64 banks, each byte holding its own bank number.
    fn banked_rom() -> Vec<u8> {
        (0..64usize)
            .flat_map(|bank| std::iter::repeat_n(bank as u8, ROM_BANK_SIZE))
            .collect()
    }

    fn mbc1() -> BankController {
        BankController::new(banked_rom(), 0x01, 0x00).unwrap()
    }

    #[test]
    fn test_type_table() {
        assert_eq!(
            ControllerKind::from_cart_type(0x00),
            Ok(ControllerKind::None)
        );
        assert_eq!(
            ControllerKind::from_cart_type(0x03),
            Ok(ControllerKind::Mbc1)
        );
        assert_eq!(
            ControllerKind::from_cart_type(0x06),
            Ok(ControllerKind::Mbc2)
        );
        assert_eq!(
            ControllerKind::from_cart_type(0x13),
            Ok(ControllerKind::Mbc3)
        );
        assert_eq!(
            ControllerKind::from_cart_type(0x16),
            Ok(ControllerKind::Mbc4)
        );
        assert_eq!(
            ControllerKind::from_cart_type(0x1E),
            Ok(ControllerKind::Mbc5)
        );
        assert_eq!(
            ControllerKind::from_cart_type(0x04),
            Err(ConfigError::UnknownCartridgeType(0x04))
        );
    }

    #[test]
    fn test_unknown_ram_size_is_fatal() {
        let err = BankController::new(vec![0; 0x8000], 0x03, 0x07).unwrap_err();
        assert_eq!(err, ConfigError::UnknownRamSize(0x07));
    }

    #[test]
    fn test_ram_sizes() {
        let ctl = BankController::new(vec![0; 0x8000], 0x03, 0x01).unwrap();
        assert_eq!(ctl.ram_len(), 0x0800);
        let ctl = BankController::new(vec![0; 0x8000], 0x03, 0x02).unwrap();
        assert_eq!(ctl.ram_len(), 0x2000);
        let ctl = BankController::new(vec![0; 0x8000], 0x03, 0x03).unwrap();
        assert_eq!(ctl.ram_len(), 0x8000);
        // MBC2 ignores the size code.
        let ctl = BankController::new(vec![0; 0x8000], 0x05, 0x00).unwrap();
        assert_eq!(ctl.ram_len(), 512);
        // No external RAM, size code not consulted.
        let ctl = BankController::new(vec![0; 0x8000], 0x01, 0x42).unwrap();
        assert_eq!(ctl.ram_len(), 0);
    }

    #[test]
    fn test_low_banks_pass_through() {
        let mut ctl = mbc1();
        assert_eq!(ctl.read(0x4000), 1);
        ctl.write(0x2000, 0x01);
        assert_eq!(ctl.translate_rom_address(0x4123), 0x4123);
    }

    #[test]
    fn test_bank_switch() {
        let mut ctl = mbc1();
        ctl.write(0x2000, 0x05);
        assert_eq!(ctl.rom_bank(), 0x05);
        assert_eq!(ctl.read(0x4000), 5);
        assert_eq!(ctl.read(0x7FFF), 5);
        // The fixed window never moves.
        assert_eq!(ctl.read(0x3FFF), 0);
    }

    #[test]
    fn test_mbc1_alias_skip() {
        let mut ctl = mbc1();
        ctl.write(0x2000, 0x00);
        ctl.write(0x4000, 0x01); // high bits -> bank 0x20
        assert_eq!(ctl.rom_bank(), 0x20);
        assert_eq!(ctl.translate_rom_address(0x4000), 0x21 * ROM_BANK_SIZE);
        assert_eq!(ctl.read(0x4000), 0x21);
    }

    #[test]
    fn test_mbc5_has_no_alias_skip() {
        let mut ctl = BankController::new(banked_rom(), 0x19, 0x00).unwrap();
        ctl.write(0x2000, 0x00);
        ctl.write(0x4000, 0x01);
        assert_eq!(ctl.translate_rom_address(0x4000), 0x20 * ROM_BANK_SIZE);
    }

    #[test]
    fn test_ram_enable_and_banking() {
        let mut ctl = BankController::new(vec![0; 0x8000], 0x03, 0x03).unwrap();

        // Disabled RAM ignores writes and reads zero.
        ctl.write(0xA000, 0x12);
        assert_eq!(ctl.read(0xA000), 0x00);

        ctl.write(0x0000, 0x1A); // low nibble 0xA enables
        assert!(ctl.ram_enabled());
        ctl.write(0xA000, 0x12);
        assert_eq!(ctl.read(0xA000), 0x12);

        ctl.write(0x6000, 0x01); // RAM banking mode
        ctl.write(0x4000, 0x02);
        assert_eq!(ctl.ram_bank(), 2);
        assert_eq!(ctl.read(0xA000), 0x00);
        ctl.write(0xA000, 0x34);
        ctl.write(0x4000, 0x00);
        assert_eq!(ctl.read(0xA000), 0x12);

        ctl.write(0x0000, 0x00);
        assert!(!ctl.ram_enabled());
        assert_eq!(ctl.read(0xA000), 0x00);
    }

    #[test]
    fn test_rom_only_ignores_register_writes() {
        let mut ctl = BankController::new(vec![0xAB; 0x8000], 0x00, 0x00).unwrap();
        ctl.write(0x2000, 0x03);
        assert_eq!(ctl.rom_bank(), 0);
        assert_eq!(ctl.read(0x4000), 0xAB);
    }

    #[test]
    fn test_read_past_rom_is_open_bus() {
        let mut ctl = BankController::new(vec![0; 0x8000], 0x01, 0x00).unwrap();
        ctl.write(0x2000, 0x1F);
        assert_eq!(ctl.read(0x4000), OPEN_BUS);
    }
}
