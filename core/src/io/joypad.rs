//! Joypad implementation, heavily inspired by MoonEyeGB,
//! as I couldn't glean from the docs how the Joypad was implemented
//! with games writing to the Joypad register.

use bitflags::*;

pub const JOYPAD_REGISTER: u16 = 0xFF00;

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum InputKey {
    START,
    SELECT,
    A,
    B,
    UP,
    DOWN,
    LEFT,
    RIGHT,
}

#[derive(Debug, Clone)]
pub struct JoyPad {
    pressed_buttons: JoypadFlags,
    pressed_directions: JoypadFlags,
    selected_mode: JoypadFlags,
}

impl JoyPad {
    pub fn new() -> Self {
        JoyPad {
            pressed_buttons: JoypadFlags::empty(),
            pressed_directions: JoypadFlags::empty(),
            selected_mode: JoypadFlags::from_bits_truncate(0xFF),
        }
    }

    /// Get the current JoyPad register for the most recently selected mode (Button, Direction)
    pub fn get_register(&self) -> u8 {
        !self.selected_mode.bits
    }

    /// Set the register, primarily used to set the current mode (Button, Direction) by games.
    /// If a game tries to write to the lower nibble for some reason those bits will just be
    /// discarded.
    pub fn set_register(&mut self, mode: u8) {
        self.selected_mode = JoypadFlags::from_bits_truncate(!mode);
        self.update_flags();
    }

    /// Register a key as pressed down.
    pub fn press_key(&mut self, input: InputKey) {
        use InputKey::*;
        match input {
            DOWN | UP | LEFT | RIGHT => self.pressed_directions.insert(input.get_flag_value()),
            A | B | SELECT | START => self.pressed_buttons.insert(input.get_flag_value()),
        }
        self.update_flags();
    }

    /// Whether `input` is currently held down, regardless of which matrix row is selected.
    pub fn is_pressed(&self, input: InputKey) -> bool {
        use InputKey::*;
        let flag = input.get_flag_value();
        match input {
            DOWN | UP | LEFT | RIGHT => self.pressed_directions.contains(flag),
            A | B | SELECT | START => self.pressed_buttons.contains(flag),
        }
    }

    /// Whether `input`'s matrix row (buttons or directions) is the one currently
    /// selected via the register's bits 4-5. A 1-to-0 transition on an unselected row's
    /// line never reaches the interrupt controller on real hardware.
    pub fn is_row_selected(&self, input: InputKey) -> bool {
        use InputKey::*;
        match input {
            DOWN | UP | LEFT | RIGHT => self.selected_mode.contains(JoypadFlags::DIRECTION_KEYS),
            A | B | SELECT | START => self.selected_mode.contains(JoypadFlags::BUTTON_KEYS),
        }
    }

    /// Release a key that was pressed down before.
    pub fn release_key(&mut self, input: InputKey) {
        use InputKey::*;
        match input {
            DOWN | UP | LEFT | RIGHT => self.pressed_directions.remove(input.get_flag_value()),
            A | B | SELECT | START => self.pressed_buttons.remove(input.get_flag_value()),
        }
        self.update_flags()
    }

    fn update_flags(&mut self) {
        // Discard any writes that may have been made to the lower nibble.
        self.selected_mode = JoypadFlags::from_bits_truncate(self.selected_mode.bits() & 0b0011_0000);
        if self.selected_mode.contains(JoypadFlags::BUTTON_KEYS) {
            self.selected_mode.insert(self.pressed_buttons);
        }
        if self.selected_mode.contains(JoypadFlags::DIRECTION_KEYS) {
            self.selected_mode.insert(self.pressed_directions);
        }
    }
}

impl InputKey {
    fn get_flag_value(&self) -> JoypadFlags {
        match self {
            InputKey::START | InputKey::DOWN => JoypadFlags::DOWN_START,
            InputKey::SELECT | InputKey::UP => JoypadFlags::UP_SELECT,
            InputKey::B | InputKey::LEFT => JoypadFlags::LEFT_B,
            InputKey::A | InputKey::RIGHT => JoypadFlags::RIGHT_A,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_rows_read_high() {
        let mut pad = JoyPad::new();
        pad.set_register(0xFF); // neither row selected
        pad.press_key(InputKey::A);
        assert_eq!(pad.get_register() & 0x0F, 0x0F);
    }

    #[test]
    fn pressed_key_pulls_its_bit_low_when_row_selected() {
        let mut pad = JoyPad::new();
        pad.set_register(0b1101_1111); // select buttons (bit 5 low)
        pad.press_key(InputKey::A);
        assert_eq!(pad.get_register() & JoypadFlags::RIGHT_A.bits(), 0);
    }

    #[test]
    fn both_rows_selected_ors_their_pressed_bits() {
        let mut pad = JoyPad::new();
        pad.press_key(InputKey::A); // RIGHT_A bit, button row
        pad.press_key(InputKey::UP); // UP_SELECT bit, direction row
        pad.set_register(0x0F); // both rows selected (bits 4,5 low)
        let register = pad.get_register();
        assert_eq!(register & JoypadFlags::RIGHT_A.bits(), 0);
        assert_eq!(register & JoypadFlags::UP_SELECT.bits(), 0);
    }

    #[test]
    fn row_selection_tracks_selected_mode() {
        let mut pad = JoyPad::new();
        pad.set_register(0b1110_1111); // select directions only
        assert!(pad.is_row_selected(InputKey::UP));
        assert!(!pad.is_row_selected(InputKey::A));
    }
}

bitflags! {
    #[derive(Default)]
    struct JoypadFlags: u8 {
        /// Right or A
        const RIGHT_A         = 0b0000_0001;
        /// Left or B
        const LEFT_B          = 0b0000_0010;
        /// Input Up or Select
        const UP_SELECT       = 0b0000_0100;
        /// Input Down or Start
        const DOWN_START      = 0b0000_1000;
        /// Select Direction Keys
        const DIRECTION_KEYS  = 0b0001_0000;
        /// Select Button Keys
        const BUTTON_KEYS     = 0b0010_0000;
        /// Unused, but necessary for bits() to return 0xFF
        const UNUSED_0        = 0b0100_0000;
        /// Unused, but necessary for bits() to return 0xFF
        const UNUSED_1        = 0b1000_0000;
    }
}
