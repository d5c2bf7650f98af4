//! Cartridge loading and MBC dispatch (§4.2). [`Cartridge`] is a closed enum over the
//! four families this core supports rather than a trait object: there's a fixed, known
//! set of them, and a `match` keeps bank-select semantics in one place per family.

pub mod header;
pub mod mbc;
pub mod mbc3;
pub mod mbc5;

use crate::error::CartridgeLoadError;
use crate::hardware::cartridge::header::{CartridgeHeader, MbcKind};
use crate::hardware::cartridge::mbc::{Mbc1, NoMbc};
use crate::hardware::cartridge::mbc3::Mbc3;
use crate::hardware::cartridge::mbc5::Mbc5;

enum MbcState {
    NoMbc(NoMbc),
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

pub struct Cartridge {
    pub header: CartridgeHeader,
    mbc: MbcState,
}

impl Cartridge {
    pub fn new(rom: Vec<u8>) -> Result<Self, CartridgeLoadError> {
        let header = CartridgeHeader::new(&rom)?;
        let ram_size = header.ram_size;

        let mbc = match header.mbc_kind {
            MbcKind::NoMbc => MbcState::NoMbc(NoMbc::new(rom, ram_size)),
            MbcKind::Mbc1 => MbcState::Mbc1(Mbc1::new(rom, ram_size)),
            MbcKind::Mbc3 { .. } => MbcState::Mbc3(Mbc3::new(rom, ram_size)),
            MbcKind::Mbc5 => MbcState::Mbc5(Mbc5::new(rom, ram_size)),
        };

        Ok(Cartridge { header, mbc })
    }

    pub fn read_rom(&self, address: u16) -> u8 {
        match &self.mbc {
            MbcState::NoMbc(mbc) => mbc.read_rom(address),
            MbcState::Mbc1(mbc) => mbc.read_rom(address),
            MbcState::Mbc3(mbc) => mbc.read_rom(address),
            MbcState::Mbc5(mbc) => mbc.read_rom(address),
        }
    }

    pub fn write_rom(&mut self, address: u16, value: u8) {
        match &mut self.mbc {
            MbcState::NoMbc(mbc) => mbc.write_rom(address, value),
            MbcState::Mbc1(mbc) => mbc.write_rom(address, value),
            MbcState::Mbc3(mbc) => mbc.write_rom(address, value),
            MbcState::Mbc5(mbc) => mbc.write_rom(address, value),
        }
    }

    pub fn read_ram(&self, address: u16) -> u8 {
        match &self.mbc {
            MbcState::NoMbc(mbc) => mbc.read_ram(address),
            MbcState::Mbc1(mbc) => mbc.read_ram(address),
            MbcState::Mbc3(mbc) => mbc.read_ram(address),
            MbcState::Mbc5(mbc) => mbc.read_ram(address),
        }
    }

    pub fn write_ram(&mut self, address: u16, value: u8) {
        match &mut self.mbc {
            MbcState::NoMbc(mbc) => mbc.write_ram(address, value),
            MbcState::Mbc1(mbc) => mbc.write_ram(address, value),
            MbcState::Mbc3(mbc) => mbc.write_ram(address, value),
            MbcState::Mbc5(mbc) => mbc.write_ram(address, value),
        }
    }

    /// Advance the cartridge's real-time clock, if it has one, by one M-cycle.
    /// A no-op for every MBC family but MBC3.
    pub fn tick(&mut self) {
        if let MbcState::Mbc3(mbc) = &mut self.mbc {
            mbc.tick();
        }
    }

    pub fn battery_ram(&self) -> Option<&[u8]> {
        if !self.header.has_battery {
            return None;
        }
        Some(match &self.mbc {
            MbcState::NoMbc(mbc) => mbc.ram(),
            MbcState::Mbc1(mbc) => mbc.ram(),
            MbcState::Mbc3(mbc) => mbc.ram(),
            MbcState::Mbc5(mbc) => mbc.ram(),
        })
    }

    /// Restore battery-backed RAM from a save file. The slice must be exactly the
    /// cartridge's declared RAM size.
    pub fn load_battery_ram(&mut self, data: &[u8]) -> Result<(), CartridgeLoadError> {
        if data.len() != self.header.ram_size {
            return Err(CartridgeLoadError::SaveRamSizeMismatch {
                expected: self.header.ram_size,
                actual: data.len(),
            });
        }
        match &mut self.mbc {
            MbcState::NoMbc(mbc) => mbc.load_ram(data),
            MbcState::Mbc1(mbc) => mbc.load_ram(data),
            MbcState::Mbc3(mbc) => mbc.load_ram(data),
            MbcState::Mbc5(mbc) => mbc.load_ram(data),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_header(cartridge_type: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 32 * 1024];
        rom[0x147] = cartridge_type;
        rom[0x148] = 0;
        rom[0x149] = 0;
        rom
    }

    #[test]
    fn selects_no_mbc_for_type_zero() {
        let cart = Cartridge::new(rom_with_header(0x00)).unwrap();
        assert_eq!(cart.header.mbc_kind, MbcKind::NoMbc);
    }

    #[test]
    fn unsupported_type_is_rejected() {
        assert!(Cartridge::new(rom_with_header(0xFF)).is_err());
    }
}
