//! A higher-contrast palette than the in-game green tint, picked so regressions in the
//! rendered output are easier to eyeball in the snapshot PNGs.

use gb_core::DmgColor;

pub struct Rgb(pub u8, pub u8, pub u8);

pub fn shade_to_rgb(color: DmgColor) -> Rgb {
    match color {
        DmgColor::White => Rgb(255, 255, 255),
        DmgColor::LightGray => Rgb(123, 255, 49),
        DmgColor::DarkGray => Rgb(0, 99, 197),
        DmgColor::Black => Rgb(0, 0, 0),
    }
}
