use crate::bits;
use crate::cpu::Cpu;
use crate::cpu::alu;
use crate::cpu::register::Operand;
use crate::ppu::Screen;

impl<S: Screen> Cpu<S> {
    /// Fetches and runs the opcode following a 0xCB prefix. The returned
    /// cost covers the prefix byte too.
    pub(crate) fn execute_prefixed(&mut self) -> u32 {
        let opcode = self.fetch_byte();
        let operand = Operand::decode(opcode);
        let index = (opcode >> 3) & 0x07;
        let indirect = operand == Operand::IndirectHL;

        let val = self.read_operand(operand);
        let result = match opcode >> 6 {
            0 => {
                let flags = &mut self.flags;
                match index {
                    0 => alu::rlc(flags, val),
                    1 => alu::rrc(flags, val),
                    2 => alu::rl(flags, val),
                    3 => alu::rr(flags, val),
                    4 => alu::sla(flags, val),
                    5 => alu::sra(flags, val),
                    6 => alu::swap(flags, val),
                    _ => alu::srl(flags, val),
                }
            }
            1 => {
                // BIT only reads.
                alu::bit(&mut self.flags, val, index);
                return if indirect { 12 } else { 8 };
            }
            2 => bits::set_bit(val, index, false),
            _ => bits::set_bit(val, index, true),
        };
        self.write_operand(operand, result);

        if indirect { 16 } else { 8 }
    }
}
