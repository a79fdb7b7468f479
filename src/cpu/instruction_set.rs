use log::{debug, warn};

use crate::constants::CB_PREFIX_OPCODE_BYTE;
use crate::cpu::Cpu;
use crate::cpu::alu;
use crate::cpu::register::{Operand, Reg16};
use crate::mmu::Memory;
use crate::ppu::Screen;

/// Extra cycles when an 8-bit operand is (HL).
fn operand_cost(operand: Operand) -> u32 {
    match operand {
        Operand::IndirectHL => 4,
        Operand::Reg(_) => 0,
    }
}

impl<S: Screen> Cpu<S> {
    /// Condition encoded in opcode bits 3-4: NZ, Z, NC, C.
    fn condition(&self, opcode: u8) -> bool {
        match (opcode >> 3) & 0x03 {
            0 => !self.flags.z,
            1 => self.flags.z,
            2 => !self.flags.c,
            _ => self.flags.c,
        }
    }

    /// Runs one base-table opcode whose byte has already been fetched.
    /// Returns the cycle cost.
    pub(crate) fn execute(&mut self, opcode: u8) -> u32 {
        match opcode {
            0x00 => 4,
            0x10 => {
                // STOP is two bytes; nothing here needs low-power mode.
                self.fetch_byte();
                debug!("STOP at 0x{:04X}", self.pc.wrapping_sub(2));
                4
            }
            0x76 => {
                self.halted = true;
                4
            }

            // 16-bit loads and arithmetic
            0x01 | 0x11 | 0x21 | 0x31 => {
                let val = self.fetch_word();
                self.set_reg16(Reg16::from_bits_sp(opcode >> 4), val);
                12
            }
            0x03 | 0x13 | 0x23 | 0x33 => {
                let reg = Reg16::from_bits_sp(opcode >> 4);
                self.set_reg16(reg, self.get_reg16(reg).wrapping_add(1));
                8
            }
            0x0B | 0x1B | 0x2B | 0x3B => {
                let reg = Reg16::from_bits_sp(opcode >> 4);
                self.set_reg16(reg, self.get_reg16(reg).wrapping_sub(1));
                8
            }
            0x09 | 0x19 | 0x29 | 0x39 => {
                let hl = self.get_reg16(Reg16::HL);
                let rr = self.get_reg16(Reg16::from_bits_sp(opcode >> 4));
                let result = alu::add16(&mut self.flags, hl, rr);
                self.set_reg16(Reg16::HL, result);
                8
            }
            0x08 => {
                let addr = self.fetch_word();
                self.bus.write_u16(addr, self.sp);
                20
            }
            0xF9 => {
                self.sp = self.get_reg16(Reg16::HL);
                8
            }
            0xE8 => {
                let offset = self.fetch_byte() as i8;
                self.sp = alu::add_sp(&mut self.flags, self.sp, offset);
                16
            }
            0xF8 => {
                let offset = self.fetch_byte() as i8;
                let result = alu::add_sp(&mut self.flags, self.sp, offset);
                self.set_reg16(Reg16::HL, result);
                12
            }

            // Indirect accumulator loads
            0x02 | 0x12 => {
                let addr = self.get_reg16(Reg16::from_bits_sp(opcode >> 4));
                self.bus.write_byte(addr, self.a);
                8
            }
            0x0A | 0x1A => {
                let addr = self.get_reg16(Reg16::from_bits_sp(opcode >> 4));
                self.a = self.bus.read_byte(addr);
                8
            }
            0x22 | 0x32 => {
                let addr = self.hl_post_step(opcode == 0x22);
                self.bus.write_byte(addr, self.a);
                8
            }
            0x2A | 0x3A => {
                let addr = self.hl_post_step(opcode == 0x2A);
                self.a = self.bus.read_byte(addr);
                8
            }
            0xE0 => {
                let addr = 0xFF00 | self.fetch_byte() as u16;
                self.bus.write_byte(addr, self.a);
                12
            }
            0xF0 => {
                let addr = 0xFF00 | self.fetch_byte() as u16;
                self.a = self.bus.read_byte(addr);
                12
            }
            0xE2 => {
                self.bus.write_byte(0xFF00 | self.c as u16, self.a);
                8
            }
            0xF2 => {
                self.a = self.bus.read_byte(0xFF00 | self.c as u16);
                8
            }
            0xEA => {
                let addr = self.fetch_word();
                self.bus.write_byte(addr, self.a);
                16
            }
            0xFA => {
                let addr = self.fetch_word();
                self.a = self.bus.read_byte(addr);
                16
            }

            // 8-bit increment, decrement and immediate loads
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let operand = Operand::decode(opcode >> 3);
                let val = self.read_operand(operand);
                let result = alu::inc(&mut self.flags, val);
                self.write_operand(operand, result);
                4 + 2 * operand_cost(operand)
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let operand = Operand::decode(opcode >> 3);
                let val = self.read_operand(operand);
                let result = alu::dec(&mut self.flags, val);
                self.write_operand(operand, result);
                4 + 2 * operand_cost(operand)
            }
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let operand = Operand::decode(opcode >> 3);
                let val = self.fetch_byte();
                self.write_operand(operand, val);
                8 + operand_cost(operand)
            }

            // Accumulator rotates always clear Z.
            0x07 | 0x0F | 0x17 | 0x1F => {
                self.a = match opcode {
                    0x07 => alu::rlc(&mut self.flags, self.a),
                    0x0F => alu::rrc(&mut self.flags, self.a),
                    0x17 => alu::rl(&mut self.flags, self.a),
                    _ => alu::rr(&mut self.flags, self.a),
                };
                self.flags.z = false;
                4
            }
            0x27 => {
                self.a = alu::daa(&mut self.flags, self.a);
                4
            }
            0x2F => {
                self.a = !self.a;
                self.flags.n = true;
                self.flags.h = true;
                4
            }
            0x37 => {
                self.flags.n = false;
                self.flags.h = false;
                self.flags.c = true;
                4
            }
            0x3F => {
                self.flags.n = false;
                self.flags.h = false;
                self.flags.c = !self.flags.c;
                4
            }

            0x40..=0x75 | 0x77..=0x7F => {
                let dst = Operand::decode(opcode >> 3);
                let src = Operand::decode(opcode);
                let val = self.read_operand(src);
                self.write_operand(dst, val);
                4 + operand_cost(dst) + operand_cost(src)
            }
            0x80..=0xBF => {
                let src = Operand::decode(opcode);
                let val = self.read_operand(src);
                self.alu_a(opcode >> 3, val);
                4 + operand_cost(src)
            }
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let val = self.fetch_byte();
                self.alu_a(opcode >> 3, val);
                8
            }

            // Control flow
            0x18 => {
                let offset = self.fetch_byte() as i8;
                self.pc = self.pc.wrapping_add_signed(offset as i16);
                12
            }
            0x20 | 0x28 | 0x30 | 0x38 => {
                let offset = self.fetch_byte() as i8;
                if self.condition(opcode) {
                    self.pc = self.pc.wrapping_add_signed(offset as i16);
                    12
                } else {
                    8
                }
            }
            0xC3 => {
                self.pc = self.fetch_word();
                16
            }
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let target = self.fetch_word();
                if self.condition(opcode) {
                    self.pc = target;
                    16
                } else {
                    12
                }
            }
            0xE9 => {
                self.pc = self.get_reg16(Reg16::HL);
                4
            }
            0xCD => {
                let target = self.fetch_word();
                self.push_u16(self.pc);
                self.pc = target;
                24
            }
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let target = self.fetch_word();
                if self.condition(opcode) {
                    self.push_u16(self.pc);
                    self.pc = target;
                    24
                } else {
                    12
                }
            }
            0xC9 => {
                self.pc = self.pop_u16();
                16
            }
            0xD9 => {
                self.pc = self.pop_u16();
                self.ime = true;
                16
            }
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                if self.condition(opcode) {
                    self.pc = self.pop_u16();
                    20
                } else {
                    8
                }
            }
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.push_u16(self.pc);
                self.pc = (opcode & 0x38) as u16;
                16
            }

            // Stack
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let val = self.pop_u16();
                self.set_reg16(Reg16::from_bits_af(opcode >> 4), val);
                12
            }
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let val = self.get_reg16(Reg16::from_bits_af(opcode >> 4));
                self.push_u16(val);
                16
            }

            // Interrupt master enable
            0xF3 => {
                self.ime = false;
                self.ime_pending = false;
                4
            }
            0xFB => {
                self.ime_pending = true;
                4
            }

            CB_PREFIX_OPCODE_BYTE => self.execute_prefixed(),

            0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD => {
                warn!(
                    "Undefined opcode 0x{:02X} at 0x{:04X}",
                    opcode,
                    self.pc.wrapping_sub(1)
                );
                4
            }
        }
    }

    /// ALU group selected by opcode bits 3-5, applied to A.
    fn alu_a(&mut self, op: u8, val: u8) {
        let flags = &mut self.flags;
        match op & 0x07 {
            0 => self.a = alu::add(flags, self.a, val, false),
            1 => {
                let carry = flags.c;
                self.a = alu::add(flags, self.a, val, carry);
            }
            2 => self.a = alu::sub(flags, self.a, val, false),
            3 => {
                let carry = flags.c;
                self.a = alu::sub(flags, self.a, val, carry);
            }
            4 => self.a = alu::and(flags, self.a, val),
            5 => self.a = alu::xor(flags, self.a, val),
            6 => self.a = alu::or(flags, self.a, val),
            _ => alu::cp(flags, self.a, val),
        }
    }

    /// Returns HL, then steps it by one in the given direction.
    fn hl_post_step(&mut self, increment: bool) -> u16 {
        let hl = self.get_reg16(Reg16::HL);
        let next = if increment {
            hl.wrapping_add(1)
        } else {
            hl.wrapping_sub(1)
        };
        self.set_reg16(Reg16::HL, next);
        hl
    }
}
