pub mod emulator;
pub mod error;
pub use crate::error::CartridgeLoadError;
pub use crate::hardware::ppu::palette::DmgColor;
pub use crate::hardware::ppu::{FRAMEBUFFER_SIZE, RESOLUTION_HEIGHT, RESOLUTION_WIDTH};
pub use crate::io::joypad::InputKey;

pub mod hardware;
mod io;

/// Construction-time options for an [`Emulator`](crate::emulator::Emulator): an optional
/// boot ROM dump and an optional battery-RAM save to restore.
#[derive(Debug, Default)]
pub struct EmulatorOptions {
    pub boot_rom: Option<[u8; 256]>,
    pub saved_ram: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct EmulatorOptionsBuilder {
    boot_rom: Option<[u8; 256]>,
    saved_ram: Option<Vec<u8>>,
}

impl EmulatorOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boot_rom(mut self, boot_rom: Option<[u8; 256]>) -> Self {
        self.boot_rom = boot_rom;
        self
    }

    pub fn saved_ram(mut self, saved_ram: Option<Vec<u8>>) -> Self {
        self.saved_ram = saved_ram;
        self
    }

    pub fn build(self) -> EmulatorOptions {
        EmulatorOptions {
            boot_rom: self.boot_rom,
            saved_ram: self.saved_ram,
        }
    }
}

impl From<EmulatorOptions> for EmulatorOptionsBuilder {
    fn from(from: EmulatorOptions) -> Self {
        EmulatorOptionsBuilder {
            boot_rom: from.boot_rom,
            saved_ram: from.saved_ram,
        }
    }
}
