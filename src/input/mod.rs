mod joypad;

pub use joypad::{Button, Joypad};
