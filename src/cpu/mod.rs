mod alu;
pub mod flags;
mod instruction_set;
mod prefixed;
pub mod register;
mod snapshot;

use core::fmt;

use log::{debug, trace};

use crate::bits;
use crate::cartridge::{Cartridge, ConfigError};
use crate::constants::*;
use crate::input::{Button, Joypad};
use crate::interrupt::Interrupt;
use crate::mmu::{Bus, Memory};
use crate::ppu::{FrameBuffer, Ppu, Screen};
use crate::timer::Timer;

pub use flags::Flags;
pub use register::{Reg8, Reg16};
pub use snapshot::CpuSnapshot;

/// I/O register values the bootstrap image leaves behind.
const POST_BOOT_IO: [(u16, u8); 31] = [
    (TIMA_ADDR, 0x00),
    (TMA_ADDR, 0x00),
    (TAC_ADDR, 0x00),
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF17, 0x00),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF21, 0x00),
    (0xFF22, 0x00),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
    (LCDC_ADDR, 0x91),
    (SCY_ADDR, 0x00),
    (SCX_ADDR, 0x00),
    (LYC_ADDR, 0x00),
    (BGP_ADDR, 0xFC),
    (OBP0_ADDR, 0xFF),
    (OBP1_ADDR, 0xFF),
    (WY_ADDR, 0x00),
    (WX_ADDR, 0x00),
    (IE_ADDR, 0x00),
];

/// The processor, and the owner of everything it drives. Each `step`
/// runs one instruction (or interrupt dispatch, or halted idle) and then
/// hands the same number of cycles to the timer and the display.
pub struct Cpu<S: Screen = FrameBuffer> {
    pub a: u8,
    /// Packed flags, refreshed from `flags` after every instruction.
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub flags: Flags,

    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    /// EI takes effect after the instruction that follows it.
    ime_pending: bool,

    pub bus: Bus,
    pub timer: Timer,
    pub ppu: Ppu<S>,
}

impl Cpu<FrameBuffer> {
    /// Convenience constructor rendering into an in-memory frame buffer.
    pub fn with_frame_buffer(cartridge: Cartridge) -> Result<Self, ConfigError> {
        Cpu::new(cartridge, FrameBuffer::new())
    }
}

impl<S: Screen> Cpu<S> {
    pub fn new(cartridge: Cartridge, screen: S) -> Result<Self, ConfigError> {
        let mut bus = Bus::new(cartridge)?;
        bus.attach_joypad(Joypad::new());

        let mut cpu = Cpu {
            a: 0,
            f: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: 0,
            pc: 0,
            flags: Flags::default(),
            ime: false,
            halted: false,
            ime_pending: false,
            bus,
            timer: Timer::new(),
            ppu: Ppu::new(screen),
        };
        cpu.reset();
        Ok(cpu)
    }

    /// Power-on state. Without a bootstrap image execution starts at the
    /// cartridge entry point with the registers the bootstrap would have left.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.timer.reset();
        self.ppu.reset();

        self.set_reg16(Reg16::AF, 0);
        self.set_reg16(Reg16::BC, 0);
        self.set_reg16(Reg16::DE, 0);
        self.set_reg16(Reg16::HL, 0);
        self.sp = 0;
        self.pc = 0;
        self.ime = false;
        self.ime_pending = false;
        self.halted = false;

        if !self.bus.has_bootrom() {
            self.init_post_boot();
        }
        debug!("CPU reset, PC=0x{:04X}", self.pc);
    }

    fn init_post_boot(&mut self) {
        self.set_reg16(Reg16::AF, 0x01B0);
        self.set_reg16(Reg16::BC, 0x0013);
        self.set_reg16(Reg16::DE, 0x00D8);
        self.set_reg16(Reg16::HL, 0x014D);
        self.sp = 0xFFFE;
        self.pc = 0x0100;

        for (addr, val) in POST_BOOT_IO {
            self.bus.write_register(addr, val);
        }
        self.bus.write_register(BOOT_ADDR, 0x01);
    }

    /// Runs one unit of work and returns the cycles it took. The timer and
    /// the display have been advanced by the same amount on return.
    pub fn step(&mut self) -> u32 {
        let pending = self.bus.pending_interrupts();

        let cycles = if self.ime && pending != 0 {
            self.service_interrupt(pending)
        } else if self.halted {
            if pending != 0 {
                trace!("Halt released, pending 0x{:02X}", pending);
                self.halted = false;
            }
            DEFAULT_STEP_CYCLES
        } else {
            let enable_ime = self.ime_pending;
            trace!("{}", self);

            let opcode = self.fetch_byte();
            let cycles = self.execute(opcode);
            self.f = self.flags.pack();

            // DI inside the delay slot clears ime_pending and wins.
            if enable_ime && self.ime_pending {
                self.ime = true;
                self.ime_pending = false;
            }
            cycles
        };

        self.timer.advance(cycles, &mut self.bus);
        self.ppu.advance(cycles, &mut self.bus);
        cycles
    }

    fn service_interrupt(&mut self, pending: u8) -> u32 {
        let Some(interrupt) = Interrupt::highest_priority(pending) else {
            return DEFAULT_STEP_CYCLES;
        };
        trace!("Servicing {:?} from PC=0x{:04X}", interrupt, self.pc);

        self.bus.clear_interrupt(interrupt);
        self.ime = false;
        self.ime_pending = false;
        self.halted = false;
        self.push_u16(self.pc);
        self.pc = interrupt.vector();
        INTERRUPT_SERVICE_CYCLES
    }

    /// Steps until the display finishes a frame. With the display off no
    /// frame ever completes, so a frame's worth of cycles is the cap.
    pub fn run_frame(&mut self) -> u32 {
        let mut elapsed = 0;
        loop {
            elapsed += self.step();
            if self.ppu.take_frame_ready() {
                break;
            }
            if !self.ppu.is_enabled() && elapsed >= CYCLES_PER_FRAME {
                break;
            }
        }
        elapsed
    }

    pub fn press(&mut self, button: Button) {
        let Some(joypad) = self.bus.joypad_mut() else {
            return;
        };
        if joypad.press(button) {
            self.bus.request_interrupt(Interrupt::Joypad);
        }
    }

    pub fn release(&mut self, button: Button) {
        if let Some(joypad) = self.bus.joypad_mut() {
            joypad.release(button);
        }
    }

    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial_output()
    }

    pub fn screen(&self) -> &S {
        self.ppu.screen()
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot::from_cpu(self)
    }

    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let val = self.bus.read_byte(self.pc);
        self.pc = self.pc.wrapping_add(1);
        val
    }

    pub(crate) fn fetch_word(&mut self) -> u16 {
        let low = self.fetch_byte();
        let high = self.fetch_byte();
        bits::combine(high, low)
    }

    /// High byte goes to the higher address.
    pub(crate) fn push_u16(&mut self, val: u16) {
        self.sp = self.sp.wrapping_sub(1);
        self.bus.write_byte(self.sp, bits::high(val));
        self.sp = self.sp.wrapping_sub(1);
        self.bus.write_byte(self.sp, bits::low(val));
    }

    pub(crate) fn pop_u16(&mut self) -> u16 {
        let low = self.bus.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        let high = self.bus.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        bits::combine(high, low)
    }
}

impl<S: Screen> fmt::Display for Cpu<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.snapshot().to_doctor_string())
    }
}

impl<S: Screen> fmt::Debug for Cpu<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("Cpu")
            .field("registers", &snapshot.to_doctor_string())
            .field("flags", &snapshot.pretty_format_flags())
            .field("ime", &self.ime)
            .field("halted", &self.halted)
            .field("mode", &self.ppu.mode())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cpu_with(program: &[u8]) -> Cpu {
        let mut rom = vec![0; 0x8000];
        rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
        Cpu::with_frame_buffer(Cartridge::new(rom, None).unwrap()).unwrap()
    }

    #[test]
    fn test_post_boot_registers() {
        let cpu = cpu_with(&[]);
        assert_eq!(cpu.get_reg16(Reg16::AF), 0x01B0);
        assert_eq!(cpu.get_reg16(Reg16::BC), 0x0013);
        assert_eq!(cpu.get_reg16(Reg16::DE), 0x00D8);
        assert_eq!(cpu.get_reg16(Reg16::HL), 0x014D);
        assert_eq!(cpu.sp, 0xFFFE);
        assert_eq!(cpu.pc, 0x0100);
        assert!(cpu.flags.z && !cpu.flags.n && cpu.flags.h && cpu.flags.c);
        assert!(!cpu.ime);
        assert_eq!(cpu.bus.read_byte(LCDC_ADDR), 0x91);
        assert_eq!(cpu.bus.read_byte(BGP_ADDR), 0xFC);
    }

    #[test]
    fn test_bootrom_starts_at_zero() {
        let rom = vec![0; 0x8000];
        let cart = Cartridge::new(rom, Some(vec![0; 0x100])).unwrap();
        let cpu = Cpu::with_frame_buffer(cart).unwrap();
        assert_eq!(cpu.pc, 0x0000);
        assert_eq!(cpu.sp, 0x0000);
        assert_eq!(cpu.get_reg16(Reg16::AF), 0x0000);
        assert!(cpu.bus.is_booting());
    }

    #[test]
    fn test_push_pop_order() {
        let mut cpu = cpu_with(&[]);
        cpu.push_u16(0xBEEF);
        assert_eq!(cpu.sp, 0xFFFC);
        assert_eq!(cpu.bus.read_byte(0xFFFD), 0xBE);
        assert_eq!(cpu.bus.read_byte(0xFFFC), 0xEF);
        assert_eq!(cpu.pop_u16(), 0xBEEF);
        assert_eq!(cpu.sp, 0xFFFE);
    }

    #[test]
    fn test_fetch_word_little_endian() {
        let mut cpu = cpu_with(&[0x34, 0x12]);
        assert_eq!(cpu.fetch_word(), 0x1234);
        assert_eq!(cpu.pc, 0x0102);
    }

    #[test]
    fn test_display_doctor_format() {
        let cpu = cpu_with(&[0x00, 0xC3, 0x13, 0x02]);
        assert_eq!(
            cpu.to_string(),
            "A:01 F:B0 B:00 C:13 D:00 E:D8 H:01 L:4D SP:FFFE PC:0100 PCMEM:00,C3,13,02"
        );
    }

    #[test]
    fn test_press_requests_joypad_once() {
        let mut cpu = cpu_with(&[]);
        cpu.press(Button::Start);
        assert_eq!(cpu.bus.read_if() & Interrupt::Joypad.bit(), Interrupt::Joypad.bit());

        cpu.bus.clear_interrupt(Interrupt::Joypad);
        cpu.press(Button::Start);
        assert_eq!(cpu.bus.read_if() & Interrupt::Joypad.bit(), 0);

        cpu.release(Button::Start);
        cpu.press(Button::Start);
        assert_ne!(cpu.bus.read_if() & Interrupt::Joypad.bit(), 0);
    }
}
