//! Cartridge header parsing (`0x0100-0x014F`, §4.2/§6).

use crate::error::CartridgeLoadError;

pub const HEADER_START: u16 = 0x0100;
pub const HEADER_END: u16 = 0x014F;

/// The memory bank controller family selected by header byte `0x147`. Sub-features of
/// a family (battery, RAM, RTC) are folded into the variant since they change how the
/// concrete MBC struct is constructed, not how it's addressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MbcKind {
    NoMbc,
    Mbc1,
    Mbc3 { has_rtc: bool },
    Mbc5,
}

#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    /// Upper-case ASCII, up to 16 characters, zero-padded.
    pub title: String,
    pub new_licensee_code: u16,
    pub sgb_flag: bool,
    pub mbc_kind: MbcKind,
    pub has_battery: bool,
    /// Total ROM size in bytes.
    pub rom_size: usize,
    /// Total external RAM size in bytes (0 if the cartridge has none).
    pub ram_size: usize,
    pub is_japanese: bool,
    pub old_licensee_code: u8,
    pub mask_rom_version_number: u8,
    pub header_checksum: u8,
    pub global_checksum: u16,
}

impl CartridgeHeader {
    pub fn new(rom: &[u8]) -> Result<Self, CartridgeLoadError> {
        if rom.len() <= HEADER_END as usize {
            return Err(CartridgeLoadError::TooSmall {
                expected: HEADER_END as usize + 1,
                actual: rom.len(),
            });
        }

        let (mbc_kind, has_battery) = decode_cartridge_type(rom[0x147])?;
        let rom_size = decode_rom_size(rom[0x148])?;
        let ram_size = decode_ram_size(rom[0x149])?;

        if rom.len() < rom_size {
            return Err(CartridgeLoadError::TooSmall {
                expected: rom_size,
                actual: rom.len(),
            });
        }

        Ok(CartridgeHeader {
            title: read_title(rom),
            new_licensee_code: ((rom[0x144] as u16) << 8) | rom[0x145] as u16,
            sgb_flag: rom[0x146] == 0x03,
            mbc_kind,
            has_battery,
            rom_size,
            ram_size,
            is_japanese: rom[0x14A] == 0x00,
            old_licensee_code: rom[0x14B],
            mask_rom_version_number: rom[0x14C],
            header_checksum: rom[0x14D],
            global_checksum: ((rom[0x14E] as u16) << 8) | rom[0x14F] as u16,
        })
    }
}

fn read_title(rom: &[u8]) -> String {
    std::str::from_utf8(&rom[0x134..=0x143])
        .unwrap_or("")
        .trim_matches(char::from(0))
        .to_owned()
}

/// Maps header byte `0x147` to an MBC family plus whether it carries a battery (and,
/// for MBC3, an RTC). We only recognize the cartridge types actually reachable from the
/// four families this core supports; everything else is a load error.
fn decode_cartridge_type(byte: u8) -> Result<(MbcKind, bool), CartridgeLoadError> {
    match byte {
        0x00 => Ok((MbcKind::NoMbc, false)),
        0x08 | 0x09 => Ok((MbcKind::NoMbc, byte == 0x09)),
        0x01 | 0x02 => Ok((MbcKind::Mbc1, false)),
        0x03 => Ok((MbcKind::Mbc1, true)),
        0x0F | 0x10 => Ok((MbcKind::Mbc3 { has_rtc: true }, true)),
        0x11 | 0x12 => Ok((MbcKind::Mbc3 { has_rtc: false }, false)),
        0x13 => Ok((MbcKind::Mbc3 { has_rtc: false }, true)),
        0x19 | 0x1A => Ok((MbcKind::Mbc5, false)),
        0x1B => Ok((MbcKind::Mbc5, true)),
        0x1C | 0x1D => Ok((MbcKind::Mbc5, false)),
        0x1E => Ok((MbcKind::Mbc5, true)),
        _ => Err(CartridgeLoadError::UnsupportedCartridgeType(byte)),
    }
}

fn decode_rom_size(byte: u8) -> Result<usize, CartridgeLoadError> {
    match byte {
        0..=8 => Ok(32 * 1024 << byte),
        _ => Err(CartridgeLoadError::InvalidRomSizeByte(byte)),
    }
}

fn decode_ram_size(byte: u8) -> Result<usize, CartridgeLoadError> {
    match byte {
        0 => Ok(0),
        2 => Ok(8 * 1024),
        3 => Ok(32 * 1024),
        4 => Ok(128 * 1024),
        5 => Ok(64 * 1024),
        _ => Err(CartridgeLoadError::InvalidRamSizeByte(byte)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_header(cartridge_type: u8, rom_size: u8, ram_size: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 32 * 1024];
        let title = b"Hello Wor";
        rom[0x134..0x134 + title.len()].copy_from_slice(title);
        rom[0x147] = cartridge_type;
        rom[0x148] = rom_size;
        rom[0x149] = ram_size;
        rom
    }

    #[test]
    fn reads_title() {
        let rom = rom_with_header(0x00, 0, 0);
        let header = CartridgeHeader::new(&rom).unwrap();
        assert_eq!(header.title, "Hello Wor");
    }

    #[test]
    fn decodes_rom_and_ram_size() {
        let rom = rom_with_header(0x03, 1, 3);
        let header = CartridgeHeader::new(&rom).unwrap();
        assert_eq!(header.rom_size, 64 * 1024);
        assert_eq!(header.ram_size, 32 * 1024);
        assert_eq!(header.mbc_kind, MbcKind::Mbc1);
        assert!(header.has_battery);
    }

    #[test]
    fn mbc3_with_rtc_is_detected() {
        let rom = rom_with_header(0x10, 0, 0);
        let header = CartridgeHeader::new(&rom).unwrap();
        assert_eq!(header.mbc_kind, MbcKind::Mbc3 { has_rtc: true });
    }

    #[test]
    fn unknown_cartridge_type_is_an_error() {
        let rom = rom_with_header(0xFF, 0, 0);
        assert!(matches!(
            CartridgeHeader::new(&rom),
            Err(CartridgeLoadError::UnsupportedCartridgeType(0xFF))
        ));
    }

    #[test]
    fn rom_too_small_for_declared_size_is_an_error() {
        let mut rom = rom_with_header(0x00, 1, 0);
        rom.truncate(32 * 1024);
        assert!(matches!(CartridgeHeader::new(&rom), Err(CartridgeLoadError::TooSmall { .. })));
    }
}
