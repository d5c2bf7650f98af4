//! Keyboard-to-[`InputKey`] mapping. A fixed layout; remapping is a host concern the
//! core has no opinion on.

use gb_core::InputKey;
use sdl2::keyboard::Keycode;

pub fn keycode_to_input(keycode: Keycode) -> Option<InputKey> {
    match keycode {
        Keycode::Up => Some(InputKey::UP),
        Keycode::Down => Some(InputKey::DOWN),
        Keycode::Left => Some(InputKey::LEFT),
        Keycode::Right => Some(InputKey::RIGHT),
        Keycode::Z => Some(InputKey::A),
        Keycode::X => Some(InputKey::B),
        Keycode::Return => Some(InputKey::START),
        Keycode::RShift | Keycode::LShift => Some(InputKey::SELECT),
        _ => None,
    }
}
