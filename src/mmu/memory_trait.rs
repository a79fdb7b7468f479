use crate::constants::{IE_ADDR, IF_ADDR};
use crate::interrupt::Interrupt;

/// Everything outside the bus reaches storage through this trait.
pub trait Memory {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, val: u8);

    /// Stores into the I/O block without the side effects a CPU write has
    /// (DIV reset, STAT masking, DMA). Used by the timer and display.
    fn write_register(&mut self, addr: u16, val: u8);

    fn set_vram_access(&mut self, accessible: bool);
    fn set_oam_access(&mut self, accessible: bool);

    // Helper for 16-bit reads (Little Endian)
    fn read_u16(&self, addr: u16) -> u16 {
        let low = self.read_byte(addr) as u16;
        let high = self.read_byte(addr.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    // Helper for 16-bit writes (Little Endian)
    fn write_u16(&mut self, addr: u16, val: u16) {
        self.write_byte(addr, (val & 0xFF) as u8);
        self.write_byte(addr.wrapping_add(1), (val >> 8) as u8);
    }

    fn read_ie(&self) -> u8 {
        self.read_byte(IE_ADDR)
    }

    fn read_if(&self) -> u8 {
        self.read_byte(IF_ADDR)
    }

    fn write_ie(&mut self, value: u8) {
        self.write_register(IE_ADDR, value);
    }

    fn write_if(&mut self, value: u8) {
        self.write_register(IF_ADDR, value);
    }

    fn request_interrupt(&mut self, source: Interrupt) {
        let flags = self.read_if();
        self.write_if(flags | source.bit());
    }

    fn clear_interrupt(&mut self, source: Interrupt) {
        let flags = self.read_if();
        self.write_if(flags & !source.bit());
    }

    /// Sources both requested and enabled.
    fn pending_interrupts(&self) -> u8 {
        self.read_if() & self.read_ie() & 0x1F
    }
}
