//! A regression harness: runs every ROM under `--blargg-path`/`--mooneye-path` for a
//! fixed number of frames and snapshots the resulting framebuffer to a PNG. A second run
//! diffs the new snapshots against the previous run's (via a Blake2s hash) and copies
//! whichever ones changed into `testing_frames/changed/` for inspection.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs::{copy, create_dir_all, read, read_dir, remove_dir_all, rename, File};
use std::io;
use std::path::{Path, PathBuf};
use std::thread::spawn;
use std::time::Instant;

use anyhow::{anyhow, Result};
use blake2::{Blake2s, Digest};
use gb_core::emulator::{Emulator, CYCLES_PER_FRAME};
use gb_core::EmulatorOptions;
use gumdrop::Options;
use image::imageops::FilterType;
use image::ImageBuffer;

use crate::display::shade_to_rgb;
use crate::options::AppOptions;

mod display;
mod options;

const TESTING_PATH_OLD: &str = "testing_frames/old/";
const TESTING_PATH_CHANGED: &str = "testing_frames/changed/";
const TESTING_PATH_NEW: &str = "testing_frames/new/";

fn main() -> Result<()> {
    let opts: AppOptions = AppOptions::parse_args_default_or_exit();
    let start = Instant::now();

    let _ = remove_dir_all(TESTING_PATH_OLD);
    let _ = remove_dir_all(TESTING_PATH_CHANGED);
    if Path::new(TESTING_PATH_NEW).exists() {
        rename(TESTING_PATH_NEW, TESTING_PATH_OLD)?;
    }
    create_dir_all(TESTING_PATH_NEW)?;
    create_dir_all(TESTING_PATH_CHANGED)?;

    let old_hashes = calculate_hashes(TESTING_PATH_OLD).unwrap_or_default();

    let boot_rom = if !opts.boot_rom.is_empty() && Path::new(&opts.boot_rom).exists() {
        read(&opts.boot_rom).ok()
    } else {
        None
    };
    let frames = (opts.cycles / CYCLES_PER_FRAME).max(1);

    if !opts.blargg_path.is_empty() {
        run_path(&opts.blargg_path, boot_rom.clone(), frames);
    }
    if !opts.mooneye_path.is_empty() {
        run_path(&opts.mooneye_path, boot_rom, frames);
    }

    let new_hashes = calculate_hashes(TESTING_PATH_NEW).unwrap_or_default();

    for (path, hash) in old_hashes {
        if new_hashes.get(&path).filter(|h| **h != hash).is_some() {
            println!("Change in file: {:?}", path);
            copy_changed_file(&path);
        }
    }

    println!("Took: {:?}", start.elapsed());
    Ok(())
}

/// Spawns one thread per ROM under `path` and runs each for `frames` frames.
fn run_path(path: impl AsRef<str>, boot_rom: Option<Vec<u8>>, frames: u32) {
    let tests = match list_files_with_extension(path.as_ref(), ".gb") {
        Ok(tests) => tests,
        Err(e) => {
            eprintln!("could not list test ROMs under {}: {}", path.as_ref(), e);
            return;
        }
    };

    let mut threads = Vec::with_capacity(tests.len());
    for rom_path in tests {
        let boot_rom = boot_rom.clone();
        threads.push(spawn(move || {
            let file_stem = rom_path.file_stem().unwrap().to_owned();
            let rom = match read(&rom_path) {
                Ok(rom) => rom,
                Err(e) => {
                    eprintln!("could not read {:?}: {}", rom_path, e);
                    return;
                }
            };

            let options = EmulatorOptions {
                boot_rom,
                saved_ram: None,
            };
            let mut emulator = match Emulator::new(rom, options) {
                Ok(emulator) => emulator,
                Err(e) => {
                    eprintln!("could not load {:?}: {}", rom_path, e);
                    return;
                }
            };

            for _ in 0..frames {
                emulator.step_frame();
            }

            let serial = emulator.serial_output();
            if serial.contains("Failed") {
                eprintln!("{:?} reported failure on its serial port: {}", file_stem, serial);
            }

            save_image(emulator.framebuffer(), format!("{}.png", file_stem.to_str().unwrap()));
        }));
    }

    for t in threads {
        let _ = t.join();
    }
}

fn list_files_with_extension(path: impl AsRef<Path>, extension: impl AsRef<str>) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    if !path.as_ref().is_dir() {
        return Ok(result);
    }
    for entry in read_dir(path)? {
        let path = entry?.path();
        if path.is_dir() {
            result.extend(list_files_with_extension(&path, extension.as_ref())?);
        } else if path.to_str().filter(|p| p.ends_with(extension.as_ref())).is_some() {
            result.push(path);
        }
    }
    Ok(result)
}

fn copy_changed_file(file_name: &OsString) {
    for dir in [TESTING_PATH_NEW, TESTING_PATH_OLD] {
        let entries = match read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let stem = match path.file_stem().and_then(OsStr::to_str) {
                Some(stem) => stem,
                None => continue,
            };
            if stem.contains(file_name.to_str().unwrap_or_default()) {
                let suffix = if dir == TESTING_PATH_NEW { "new" } else { "old" };
                let _ = copy(&path, format!("{}{}_{}.png", TESTING_PATH_CHANGED, stem, suffix));
            }
        }
    }
}

fn calculate_hashes(directory: impl AsRef<Path>) -> Result<HashMap<OsString, String>> {
    let files = list_files_with_extension(directory, ".png")?;
    let mut result = HashMap::with_capacity(files.len());

    if files.is_empty() {
        return Err(anyhow!("there are no image files to hash"));
    }

    for path in &files {
        let mut file = File::open(path)?;
        let mut hasher = Blake2s::new();
        io::copy(&mut file, &mut hasher)?;
        let hash = hasher.finalize();
        result.insert(path.file_stem().unwrap().to_os_string(), format!("{:x}", hash));
    }

    Ok(result)
}

fn save_image(framebuffer: &[gb_core::DmgColor], file_name: impl AsRef<str>) {
    use gb_core::{RESOLUTION_HEIGHT, RESOLUTION_WIDTH};

    let mut raw = vec![0u8; framebuffer.len() * 3];
    for (i, color) in framebuffer.iter().enumerate() {
        let rgb = shade_to_rgb(*color);
        raw[i * 3] = rgb.0;
        raw[i * 3 + 1] = rgb.1;
        raw[i * 3 + 2] = rgb.2;
    }

    let image_buffer: ImageBuffer<image::Rgb<u8>, Vec<u8>> =
        match ImageBuffer::from_raw(RESOLUTION_WIDTH as u32, RESOLUTION_HEIGHT as u32, raw) {
            Some(buffer) => buffer,
            None => return,
        };
    let resized = image::imageops::resize(
        &image_buffer,
        (RESOLUTION_WIDTH * 2) as u32,
        (RESOLUTION_HEIGHT * 2) as u32,
        FilterType::Nearest,
    );
    let _ = resized.save(format!("{}{}", TESTING_PATH_NEW, file_name.as_ref()));
}
