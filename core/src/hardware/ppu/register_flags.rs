//! Bitflag views over `LCDC`, `STAT`, and OAM sprite attribute bytes (§4.4/§6).

use bitflags::*;

bitflags! {
    #[derive(Default)]
    pub struct LcdControl: u8 {
        /// BG/window enable (DMG); when clear both layers render as color 0.
        const BG_WINDOW_PRIORITY   = 0b0000_0001;
        const SPRITE_DISPLAY_ENABLE = 0b0000_0010;
        /// Clear: 8x8 sprites. Set: 8x16.
        const SPRITE_SIZE           = 0b0000_0100;
        /// Clear: `9800-9BFF`. Set: `9C00-9FFF`.
        const BG_TILE_MAP_SELECT    = 0b0000_1000;
        /// Clear: signed tile addressing from `9000`. Set: unsigned from `8000`.
        const BG_WINDOW_TILE_SELECT = 0b0001_0000;
        const WINDOW_DISPLAY        = 0b0010_0000;
        /// Clear: `9800-9BFF`. Set: `9C00-9FFF`.
        const WINDOW_MAP_SELECT     = 0b0100_0000;
        const LCD_DISPLAY           = 0b1000_0000;
    }
}

bitflags! {
    #[derive(Default)]
    pub struct LcdStatus: u8 {
        const MODE_FLAG_0            = 0b0000_0001;
        const MODE_FLAG_1             = 0b0000_0010;
        const COINCIDENCE_FLAG        = 0b0000_0100;
        const MODE_0_H_INTERRUPT      = 0b0000_1000;
        const MODE_1_V_INTERRUPT      = 0b0001_0000;
        const MODE_2_OAM_INTERRUPT    = 0b0010_0000;
        const COINCIDENCE_INTERRUPT   = 0b0100_0000;
        const UNUSED                  = 0b1000_0000;
    }
}

impl LcdStatus {
    pub fn mode(self) -> u8 {
        self.bits() & 0x3
    }

    pub fn set_mode(&mut self, mode: u8) {
        self.remove(LcdStatus::MODE_FLAG_0 | LcdStatus::MODE_FLAG_1);
        self.insert(LcdStatus::from_bits_truncate(mode & 0x3));
    }

    pub fn set_coincidence(&mut self, equal: bool) {
        self.set(LcdStatus::COINCIDENCE_FLAG, equal);
    }
}

bitflags! {
    #[derive(Default)]
    pub struct AttributeFlags: u8 {
        const PALETTE_NUMBER    = 0b0001_0000;
        const X_FLIP            = 0b0010_0000;
        const Y_FLIP            = 0b0100_0000;
        const OBJ_TO_BG_PRIORITY = 0b1000_0000;
    }
}
