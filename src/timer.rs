use log::trace;

use crate::bits;
use crate::constants::{DIV_ADDR, TAC_ADDR, TIMA_ADDR, TMA_ADDR};
use crate::interrupt::Interrupt;
use crate::mmu::Memory;

/// Counter periods selected by TAC bits 0-1.
const CLOCKS: [u32; 4] = [1024, 16, 64, 256];
/// DIV ticks once every 256 cycles.
const DIV_PERIOD: u32 = 256;

/// Divider and programmable counter. The registers themselves live on
/// the bus; this only carries the cycle accumulators between calls.
#[derive(Debug, Default, Clone)]
pub struct Timer {
    divider: u32,
    counter: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.divider = 0;
        self.counter = 0;
    }

    pub fn advance(&mut self, cycles: u32, bus: &mut impl Memory) {
        let control = bus.read_byte(TAC_ADDR);

        self.divider += cycles;
        while self.divider >= DIV_PERIOD {
            self.divider -= DIV_PERIOD;
            let div = bus.read_byte(DIV_ADDR).wrapping_add(1);
            // A CPU write would reset DIV, so go around it.
            bus.write_register(DIV_ADDR, div);
        }

        if !bits::bit(control, 2) {
            return;
        }

        self.counter += cycles;
        let period = CLOCKS[(control & 0x03) as usize];
        while self.counter >= period {
            self.counter -= period;
            let (mut tima, overflow) = bus.read_byte(TIMA_ADDR).overflowing_add(1);
            if overflow {
                tima = bus.read_byte(TMA_ADDR);
                trace!("Timer overflow, reload 0x{:02X}", tima);
                bus.request_interrupt(Interrupt::Timer);
            }
            bus.write_register(TIMA_ADDR, tima);
        }
    }
}
