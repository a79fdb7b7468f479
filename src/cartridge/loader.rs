use std::fs;
use std::path::Path;

use log::info;

use super::cartridge::Cartridge;
use super::error::LoadError;

pub fn validate_extension(path: &Path) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .ok_or(LoadError::MissingExtension)?
        .to_str()
        .ok_or(LoadError::MissingExtension)?;

    if ext.eq_ignore_ascii_case("gb") || ext.eq_ignore_ascii_case("gbc") {
        Ok(())
    } else {
        Err(LoadError::InvalidExtension {
            expected: ".gb or .gbc",
            found: ext.to_string(),
        })
    }
}

pub fn load_rom(path: &Path) -> Result<Vec<u8>, LoadError> {
    validate_extension(path)?;
    Ok(fs::read(path)?)
}

/// Reads the cartridge image and, when given, the bootstrap image.
/// The bootstrap file may carry any extension.
pub fn load_cartridge(rom_path: &Path, boot_path: Option<&Path>) -> Result<Cartridge, LoadError> {
    let rom = load_rom(rom_path)?;
    let bootrom = match boot_path {
        Some(path) => {
            let bytes = fs::read(path)?;
            info!("Loaded bootstrap image: {} bytes", bytes.len());
            Some(bytes)
        }
        None => None,
    };
    Cartridge::new(rom, bootrom)
}
