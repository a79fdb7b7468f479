use crate::constants::{FLAG_C, FLAG_H, FLAG_N, FLAG_Z};

/// Working copy of the four condition flags. Instructions update these;
/// the packed F register is only refreshed between instructions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

impl Flags {
    /// Packs into the F register layout. Low nibble is always zero.
    pub fn pack(self) -> u8 {
        let mut f = 0;
        if self.z {
            f |= FLAG_Z;
        }
        if self.n {
            f |= FLAG_N;
        }
        if self.h {
            f |= FLAG_H;
        }
        if self.c {
            f |= FLAG_C;
        }
        f
    }
}

impl From<u8> for Flags {
    fn from(f: u8) -> Self {
        Self {
            z: f & FLAG_Z != 0,
            n: f & FLAG_N != 0,
            h: f & FLAG_H != 0,
            c: f & FLAG_C != 0,
        }
    }
}
