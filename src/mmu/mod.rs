mod bus;
mod memory_trait;

pub use bus::Bus;
pub use memory_trait::Memory;
