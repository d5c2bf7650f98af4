//! Battery-RAM persistence: where a save file lives when the user doesn't name one
//! explicitly, and the read/write around it.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// `<rom_stem>.sav` next to the ROM if `explicit_path` is `None`.
pub fn save_path_for(rom_path: &Path, explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return PathBuf::from(path);
    }
    rom_path.with_extension("sav")
}

/// The per-user directory save files fall back to when the ROM's own directory isn't
/// writable; currently unused by [`save_path_for`] but kept available for a frontend
/// that wants to centralize saves instead of scattering them next to ROMs.
pub fn default_save_dir() -> Option<PathBuf> {
    ProjectDirs::from("top", "hirtol", "rustyboi").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn load_battery_ram(path: &Path) -> Result<Option<Vec<u8>>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(path).with_context(|| format!("reading save file {}", path.display()))?;
    Ok(Some(data))
}

pub fn save_battery_ram(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("writing save file {}", path.display()))
}
