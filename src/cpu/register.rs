use crate::bits;
use crate::cpu::Cpu;
use crate::cpu::flags::Flags;
use crate::mmu::Memory;
use crate::ppu::Screen;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
}

impl Reg16 {
    /// Pair selected by opcode bits 4-5 for loads and arithmetic.
    pub fn from_bits_sp(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ => Reg16::SP,
        }
    }

    /// Pair selected by opcode bits 4-5 for PUSH/POP.
    pub fn from_bits_af(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ => Reg16::AF,
        }
    }
}

/// 8-bit operand slot encoded in three opcode bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg8),
    /// The byte at address HL.
    IndirectHL,
}

impl Operand {
    pub fn decode(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Operand::Reg(Reg8::B),
            1 => Operand::Reg(Reg8::C),
            2 => Operand::Reg(Reg8::D),
            3 => Operand::Reg(Reg8::E),
            4 => Operand::Reg(Reg8::H),
            5 => Operand::Reg(Reg8::L),
            6 => Operand::IndirectHL,
            _ => Operand::Reg(Reg8::A),
        }
    }
}

impl<S: Screen> Cpu<S> {
    pub fn get_reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    pub fn set_reg8(&mut self, reg: Reg8, val: u8) {
        match reg {
            Reg8::A => self.a = val,
            Reg8::B => self.b = val,
            Reg8::C => self.c = val,
            Reg8::D => self.d = val,
            Reg8::E => self.e = val,
            Reg8::H => self.h = val,
            Reg8::L => self.l = val,
        }
    }

    pub fn get_reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => bits::combine(self.a, self.f),
            Reg16::BC => bits::combine(self.b, self.c),
            Reg16::DE => bits::combine(self.d, self.e),
            Reg16::HL => bits::combine(self.h, self.l),
            Reg16::SP => self.sp,
        }
    }

    pub fn set_reg16(&mut self, reg: Reg16, val: u16) {
        let (high, low) = (bits::high(val), bits::low(val));
        match reg {
            Reg16::AF => {
                self.a = high;
                self.f = low & 0xF0;
                self.flags = Flags::from(self.f);
            }
            Reg16::BC => {
                self.b = high;
                self.c = low;
            }
            Reg16::DE => {
                self.d = high;
                self.e = low;
            }
            Reg16::HL => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = val,
        }
    }

    pub(crate) fn read_operand(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Reg(reg) => self.get_reg8(reg),
            Operand::IndirectHL => self.bus.read_byte(self.get_reg16(Reg16::HL)),
        }
    }

    pub(crate) fn write_operand(&mut self, operand: Operand, val: u8) {
        match operand {
            Operand::Reg(reg) => self.set_reg8(reg, val),
            Operand::IndirectHL => {
                let addr = self.get_reg16(Reg16::HL);
                self.bus.write_byte(addr, val);
            }
        }
    }
}
