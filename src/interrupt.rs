use crate::bits;

/// The five interrupt sources, in service priority order.
/// The discriminant is the bit index in IF/IE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Mask of this source in the IF/IE registers.
    pub fn bit(self) -> u8 {
        1 << self.index()
    }

    pub fn vector(self) -> u16 {
        0x40 + 8 * self.index() as u16
    }

    /// Lowest numbered source set in `pending`, which wins priority.
    pub fn highest_priority(pending: u8) -> Option<Interrupt> {
        Self::ALL
            .into_iter()
            .find(|source| bits::bit(pending, source.index()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vectors() {
        assert_eq!(Interrupt::VBlank.vector(), 0x40);
        assert_eq!(Interrupt::LcdStat.vector(), 0x48);
        assert_eq!(Interrupt::Timer.vector(), 0x50);
        assert_eq!(Interrupt::Serial.vector(), 0x58);
        assert_eq!(Interrupt::Joypad.vector(), 0x60);
    }

    #[test]
    fn test_priority_picks_lowest_bit() {
        assert_eq!(
            Interrupt::highest_priority(0b1_0011),
            Some(Interrupt::VBlank)
        );
        assert_eq!(Interrupt::highest_priority(0b1_0100), Some(Interrupt::Timer));
        assert_eq!(Interrupt::highest_priority(0b1110_0000), None);
        assert_eq!(Interrupt::highest_priority(0), None);
    }
}
