use crate::constants::*;
use crate::cpu::Cpu;
use crate::mmu::Memory;
use crate::ppu::Screen;

/// Register file plus the four bytes at PC, as printed by trace logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CpuSnapshot {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub pcmem: [u8; 4],
}

impl CpuSnapshot {
    pub fn from_cpu<S: Screen>(cpu: &Cpu<S>) -> Self {
        // Plain memory reads; none of these addresses have read side effects.
        let pcmem = [0, 1, 2, 3].map(|i| cpu.bus.read_byte(cpu.pc.wrapping_add(i)));
        CpuSnapshot {
            a: cpu.a,
            f: cpu.flags.pack(),
            b: cpu.b,
            c: cpu.c,
            d: cpu.d,
            e: cpu.e,
            h: cpu.h,
            l: cpu.l,
            sp: cpu.sp,
            pc: cpu.pc,
            pcmem,
        }
    }

    /// `[ZNHC]` with a dash for every clear flag.
    pub fn pretty_format_flags(&self) -> String {
        [(FLAG_Z, 'Z'), (FLAG_N, 'N'), (FLAG_H, 'H'), (FLAG_C, 'C')]
            .iter()
            .map(|&(flag, letter)| if self.f & flag != 0 { letter } else { '-' })
            .fold(String::from("["), |mut s, c| {
                s.push(c);
                s
            })
            + "]"
    }

    pub fn to_doctor_string(&self) -> String {
        format!(
            "A:{:02X} F:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} PCMEM:{:02X},{:02X},{:02X},{:02X}",
            self.a,
            self.f,
            self.b,
            self.c,
            self.d,
            self.e,
            self.h,
            self.l,
            self.sp,
            self.pc,
            self.pcmem[0],
            self.pcmem[1],
            self.pcmem[2],
            self.pcmem[3]
        )
    }
}
