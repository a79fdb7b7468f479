use crate::bits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Bit position inside the selected group of the joypad register.
    fn line(self) -> u8 {
        match self {
            Button::Right | Button::A => 0,
            Button::Left | Button::B => 1,
            Button::Up | Button::Select => 2,
            Button::Down | Button::Start => 3,
        }
    }

    fn is_direction(self) -> bool {
        matches!(
            self,
            Button::Right | Button::Left | Button::Up | Button::Down
        )
    }
}

/// Latched button state, synthesised into the joypad register on read.
#[derive(Debug, Default, Clone)]
pub struct Joypad {
    directions: u8,
    actions: u8,
}

impl Joypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the button was not already held.
    pub fn press(&mut self, button: Button) -> bool {
        let group = self.group_mut(button);
        let was_held = bits::bit(*group, button.line());
        *group = bits::set_bit(*group, button.line(), true);
        !was_held
    }

    pub fn release(&mut self, button: Button) {
        let group = self.group_mut(button);
        *group = bits::set_bit(*group, button.line(), false);
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        let group = if button.is_direction() {
            self.directions
        } else {
            self.actions
        };
        bits::bit(group, button.line())
    }

    fn group_mut(&mut self, button: Button) -> &mut u8 {
        if button.is_direction() {
            &mut self.directions
        } else {
            &mut self.actions
        }
    }

    /// Derives the register value from the stored select bits.
    /// Bit 4 clear selects directions, otherwise the action buttons.
    /// A held button reads as 0.
    pub fn read(&self, select: u8) -> u8 {
        let held = if bits::bit(select, 4) {
            self.actions
        } else {
            self.directions
        };
        0xC0 | (select & 0x30) | (!held & 0x0F)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_nothing_pressed_reads_high() {
        let pad = Joypad::new();
        assert_eq!(pad.read(0x20), 0xEF);
        assert_eq!(pad.read(0x10), 0xDF);
    }

    #[test]
    fn test_direction_group() {
        let mut pad = Joypad::new();
        pad.press(Button::Right);
        pad.press(Button::Down);
        assert_eq!(pad.read(0x20) & 0x0F, 0b0110);
        // Action group is unaffected.
        assert_eq!(pad.read(0x10) & 0x0F, 0x0F);
    }

    #[test]
    fn test_action_group() {
        let mut pad = Joypad::new();
        pad.press(Button::Start);
        pad.press(Button::A);
        assert_eq!(pad.read(0x10) & 0x0F, 0b0110);
        pad.release(Button::A);
        assert_eq!(pad.read(0x10) & 0x0F, 0b0111);
        assert!(pad.is_pressed(Button::Start));
        assert!(!pad.is_pressed(Button::A));
    }

    #[test]
    fn test_press_reports_new_edge() {
        let mut pad = Joypad::new();
        assert!(pad.press(Button::B));
        assert!(!pad.press(Button::B));
        pad.release(Button::B);
        assert!(pad.press(Button::B));
    }
}
