use std::fmt;

/// Failure to construct a [`Cartridge`](crate::hardware::cartridge::Cartridge) from a ROM dump.
///
/// These are the only errors the core ever returns; everything else (bad reads,
/// disabled-RAM writes, mode-gated VRAM access) is a logged runtime anomaly, not
/// a `Result`.
#[derive(Debug)]
pub enum CartridgeLoadError {
    /// The ROM is shorter than a header requires, or shorter than its own declared size.
    TooSmall { expected: usize, actual: usize },
    /// Header byte `0x147` doesn't match any MBC family we know.
    UnsupportedCartridgeType(u8),
    /// Header byte `0x148` is outside the `0..=8` range the hardware defines.
    InvalidRomSizeByte(u8),
    /// Header byte `0x149` is outside the `0..=5` range the hardware defines.
    InvalidRamSizeByte(u8),
    /// A battery save file was supplied but its length doesn't match the cartridge's RAM size.
    SaveRamSizeMismatch { expected: usize, actual: usize },
    /// A boot ROM was requested but the supplied buffer wasn't exactly 256 bytes.
    InvalidBootRomSize(usize),
}

impl fmt::Display for CartridgeLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeLoadError::TooSmall { expected, actual } => write!(
                f,
                "ROM is too small: expected at least {} bytes, got {}",
                expected, actual
            ),
            CartridgeLoadError::UnsupportedCartridgeType(t) => {
                write!(f, "unsupported cartridge type byte: {:#04x}", t)
            }
            CartridgeLoadError::InvalidRomSizeByte(b) => {
                write!(f, "invalid ROM size header byte: {:#04x}", b)
            }
            CartridgeLoadError::InvalidRamSizeByte(b) => {
                write!(f, "invalid RAM size header byte: {:#04x}", b)
            }
            CartridgeLoadError::SaveRamSizeMismatch { expected, actual } => write!(
                f,
                "save RAM size mismatch: cartridge expects {} bytes, file has {}",
                expected, actual
            ),
            CartridgeLoadError::InvalidBootRomSize(size) => {
                write!(f, "boot rom must be exactly 256 bytes, got {}", size)
            }
        }
    }
}

impl std::error::Error for CartridgeLoadError {}
