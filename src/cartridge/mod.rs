mod cartridge;
mod error;
mod header;
mod loader;
mod mbc;

pub use cartridge::Cartridge;
pub use error::{ConfigError, LoadError};
pub use header::Headers;
pub use loader::{load_cartridge, load_rom, validate_extension};
pub use mbc::{BankController, ControllerKind};
