use lockstep_gb::cartridge::Cartridge;
use lockstep_gb::cpu::Cpu;

const ENTRY_POINT: usize = 0x0100;
const CART_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;

/// Builds small cartridge images for tests. Programs land at the entry
/// point unless placed elsewhere.
pub struct RomImage {
    bytes: Vec<u8>,
}

impl RomImage {
    /// 32 KiB ROM-only image, all zeroes (NOP sled).
    pub fn new() -> Self {
        Self {
            bytes: vec![0; 0x8000],
        }
    }

    /// Image of `banks` 16 KiB banks for the given controller, each bank
    /// filled with its own index.
    pub fn banked(banks: usize, cart_type: u8, ram_size_code: u8) -> Self {
        let mut bytes: Vec<u8> = (0..banks)
            .flat_map(|bank| std::iter::repeat_n(bank as u8, 0x4000))
            .collect();
        bytes[CART_TYPE] = cart_type;
        bytes[ROM_SIZE] = (banks / 2).trailing_zeros() as u8;
        bytes[RAM_SIZE] = ram_size_code;
        // Keep the entry point a NOP sled.
        bytes[ENTRY_POINT..ENTRY_POINT + 4].fill(0);
        Self { bytes }
    }

    pub fn program(self, code: &[u8]) -> Self {
        self.at(ENTRY_POINT, code)
    }

    pub fn at(mut self, addr: usize, code: &[u8]) -> Self {
        self.bytes[addr..addr + code.len()].copy_from_slice(code);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn cartridge(self) -> Cartridge {
        Cartridge::new(self.bytes, None).unwrap()
    }

    pub fn cpu(self) -> Cpu {
        Cpu::with_frame_buffer(self.cartridge()).unwrap()
    }
}

impl Default for RomImage {
    fn default() -> Self {
        Self::new()
    }
}
