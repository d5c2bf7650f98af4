//! Maps the core's 4-shade [`DmgColor`] to actual RGB pixels; the core only ever hands
//! out the abstract shade (§6), so picking real colors is entirely a host concern.

use gb_core::DmgColor;

#[derive(Debug, Copy, Clone)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The classic green-tinted DMG screen.
pub const DMG_GREEN: [Rgb; 4] = [
    Rgb(155, 188, 15),
    Rgb(139, 172, 15),
    Rgb(48, 98, 48),
    Rgb(15, 56, 15),
];

pub fn shade_to_rgb(color: DmgColor) -> Rgb {
    match color {
        DmgColor::White => DMG_GREEN[0],
        DmgColor::LightGray => DMG_GREEN[1],
        DmgColor::DarkGray => DMG_GREEN[2],
        DmgColor::Black => DMG_GREEN[3],
    }
}
