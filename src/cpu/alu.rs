//! Flag-producing arithmetic. Every helper takes the working flags and the
//! operands explicitly and returns the result; callers store it.
//!
//! Carry and half-carry for 8-bit add/sub come from the XOR of both operands
//! and the untruncated result: bit 8 is the carry out of bit 7, bit 4 the
//! carry out of bit 3.

use super::flags::Flags;

pub fn inc(flags: &mut Flags, v: u8) -> u8 {
    let result = v.wrapping_add(1);
    flags.z = result == 0;
    flags.n = false;
    flags.h = v & 0x0F == 0x0F;
    result
}

pub fn dec(flags: &mut Flags, v: u8) -> u8 {
    let result = v.wrapping_sub(1);
    flags.z = result == 0;
    flags.n = true;
    flags.h = v & 0x0F == 0x00;
    result
}

pub fn add(flags: &mut Flags, a: u8, b: u8, carry_in: bool) -> u8 {
    let raw = a as u16 + b as u16 + carry_in as u16;
    let carries = a as u16 ^ b as u16 ^ raw;
    let result = raw as u8;
    flags.z = result == 0;
    flags.n = false;
    flags.h = carries & 0x10 != 0;
    flags.c = carries & 0x100 != 0;
    result
}

pub fn sub(flags: &mut Flags, a: u8, b: u8, carry_in: bool) -> u8 {
    let raw = (a as u16)
        .wrapping_sub(b as u16)
        .wrapping_sub(carry_in as u16);
    let borrows = a as u16 ^ b as u16 ^ raw;
    let result = raw as u8;
    flags.z = result == 0;
    flags.n = true;
    flags.h = borrows & 0x10 != 0;
    flags.c = borrows & 0x100 != 0;
    result
}

pub fn and(flags: &mut Flags, a: u8, b: u8) -> u8 {
    let result = a & b;
    *flags = Flags {
        z: result == 0,
        n: false,
        h: true,
        c: false,
    };
    result
}

pub fn or(flags: &mut Flags, a: u8, b: u8) -> u8 {
    let result = a | b;
    *flags = Flags {
        z: result == 0,
        ..Flags::default()
    };
    result
}

pub fn xor(flags: &mut Flags, a: u8, b: u8) -> u8 {
    let result = a ^ b;
    *flags = Flags {
        z: result == 0,
        ..Flags::default()
    };
    result
}

/// Subtract for flags only.
pub fn cp(flags: &mut Flags, a: u8, b: u8) {
    sub(flags, a, b, false);
}

/// ADD HL,rr: carry out of bit 15, half-carry out of bit 11. Z untouched.
pub fn add16(flags: &mut Flags, a: u16, b: u16) -> u16 {
    let raw = a as u32 + b as u32;
    let carries = a as u32 ^ b as u32 ^ raw;
    flags.n = false;
    flags.h = carries & 0x1000 != 0;
    flags.c = carries & 0x10000 != 0;
    raw as u16
}

/// SP plus a signed offset (ADD SP,e8 and LD HL,SP+e8). Flags come from
/// the unsigned low-byte addition.
pub fn add_sp(flags: &mut Flags, sp: u16, offset: i8) -> u16 {
    let b = offset as i16 as u16;
    let result = sp.wrapping_add(b);
    let carries = sp ^ b ^ result;
    *flags = Flags {
        z: false,
        n: false,
        h: carries & 0x10 != 0,
        c: carries & 0x100 != 0,
    };
    result
}

/// Decimal adjust after a BCD add or subtract.
pub fn daa(flags: &mut Flags, a: u8) -> u8 {
    let mut result = a;
    if !flags.n {
        if flags.c || a > 0x99 {
            result = result.wrapping_add(0x60);
            flags.c = true;
        }
        if flags.h || a & 0x0F > 0x09 {
            result = result.wrapping_add(0x06);
        }
    } else {
        if flags.c {
            result = result.wrapping_sub(0x60);
        }
        if flags.h {
            result = result.wrapping_sub(0x06);
        }
    }
    flags.z = result == 0;
    flags.h = false;
    result
}

fn shifted(flags: &mut Flags, result: u8, carry_out: bool) -> u8 {
    *flags = Flags {
        z: result == 0,
        n: false,
        h: false,
        c: carry_out,
    };
    result
}

pub fn rlc(flags: &mut Flags, v: u8) -> u8 {
    shifted(flags, v.rotate_left(1), v & 0x80 != 0)
}

pub fn rrc(flags: &mut Flags, v: u8) -> u8 {
    shifted(flags, v.rotate_right(1), v & 0x01 != 0)
}

/// Rotate left through carry.
pub fn rl(flags: &mut Flags, v: u8) -> u8 {
    let result = (v << 1) | flags.c as u8;
    shifted(flags, result, v & 0x80 != 0)
}

/// Rotate right through carry.
pub fn rr(flags: &mut Flags, v: u8) -> u8 {
    let result = (v >> 1) | ((flags.c as u8) << 7);
    shifted(flags, result, v & 0x01 != 0)
}

pub fn sla(flags: &mut Flags, v: u8) -> u8 {
    shifted(flags, v << 1, v & 0x80 != 0)
}

/// Arithmetic shift; bit 7 is kept.
pub fn sra(flags: &mut Flags, v: u8) -> u8 {
    shifted(flags, (v >> 1) | (v & 0x80), v & 0x01 != 0)
}

pub fn srl(flags: &mut Flags, v: u8) -> u8 {
    shifted(flags, v >> 1, v & 0x01 != 0)
}

pub fn swap(flags: &mut Flags, v: u8) -> u8 {
    shifted(flags, v.rotate_left(4), false)
}

/// BIT b: Z is the complement of the tested bit. Carry untouched.
pub fn bit(flags: &mut Flags, v: u8, index: u8) {
    flags.z = (v >> index) & 1 == 0;
    flags.n = false;
    flags.h = true;
}
