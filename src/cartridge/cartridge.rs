use log::info;

use super::error::LoadError;
use super::header::Headers;

/// Immutable snapshot handed to the core at power-on: the ROM image,
/// an optional bootstrap image and the parsed header.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub rom: Vec<u8>,
    pub bootrom: Option<Vec<u8>>,
    pub headers: Headers,
}

impl Cartridge {
    pub fn new(rom: Vec<u8>, bootrom: Option<Vec<u8>>) -> Result<Self, LoadError> {
        let headers = Headers::parse(&rom)?;
        info!(
            "Cartridge '{}': type 0x{:02X}, {} ROM banks, RAM code 0x{:02X}, header valid: {}",
            headers.title,
            headers.cart_type,
            headers.rom_banks(),
            headers.ram_size_code,
            headers.is_valid
        );
        Ok(Self {
            rom,
            bootrom,
            headers,
        })
    }
}
