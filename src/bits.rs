//! Byte-pair and single-bit helpers shared by the processor and the bus.

/// Joins a high and a low byte into one 16-bit value.
#[inline]
pub fn combine(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

#[inline]
pub fn high(value: u16) -> u8 {
    (value >> 8) as u8
}

#[inline]
pub fn low(value: u16) -> u8 {
    (value & 0xFF) as u8
}

/// Tests bit `index` (0 = least significant).
#[inline]
pub fn bit(value: u8, index: u8) -> bool {
    (value >> index) & 1 != 0
}

#[inline]
pub fn set_bit(value: u8, index: u8, on: bool) -> u8 {
    if on {
        value | (1 << index)
    } else {
        value & !(1 << index)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_byte_pair_round_trip(v in 0u16..=0xFFFF) {
            prop_assert_eq!(combine(high(v), low(v)), v);
        }

        #[test]
        fn prop_set_bit_then_read(v in 0u8..=0xFF, index in 0u8..8, on: bool) {
            prop_assert_eq!(bit(set_bit(v, index, on), index), on);
        }
    }

    #[test]
    fn test_split() {
        assert_eq!(high(0xABCD), 0xAB);
        assert_eq!(low(0xABCD), 0xCD);
        assert_eq!(combine(0x12, 0x34), 0x1234);
    }

    #[test]
    fn test_set_bit_leaves_others() {
        assert_eq!(set_bit(0b1010_0000, 0, true), 0b1010_0001);
        assert_eq!(set_bit(0b1010_0001, 7, false), 0b0010_0001);
        assert!(bit(0x80, 7));
        assert!(!bit(0x7F, 7));
    }
}
