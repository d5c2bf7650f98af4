//! The thin frontend binary: parses arguments, loads a ROM (and optional boot ROM and
//! save file), and either drives an SDL2 window or runs headlessly for a fixed number
//! of frames. Everything it does beyond that is the core's job.

mod actions;
mod display;
mod options;
mod storage;

use anyhow::{Context, Result};
use gb_core::emulator::Emulator;
use gb_core::{CartridgeLoadError, EmulatorOptions};
use gumdrop::Options as _;
use log::{info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};
use std::fs;
use std::path::PathBuf;

use crate::options::AppOptions;

fn main() -> Result<()> {
    let opts = AppOptions::parse_args_default_or_exit();

    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed).ok();

    let rom_path = PathBuf::from(&opts.rom_path);
    let rom = fs::read(&rom_path).with_context(|| format!("reading ROM {}", rom_path.display()))?;

    let boot_rom = opts
        .boot_rom_path
        .as_ref()
        .map(|path| -> Result<[u8; 256]> {
            let bytes = fs::read(path).with_context(|| format!("reading boot ROM {}", path))?;
            bytes
                .try_into()
                .map_err(|v: Vec<u8>| CartridgeLoadError::InvalidBootRomSize(v.len()).into())
        })
        .transpose()?;

    let save_path = storage::save_path_for(&rom_path, opts.save_path.as_deref());
    let saved_ram = storage::load_battery_ram(&save_path)?;

    let emulator_options = EmulatorOptions { boot_rom, saved_ram };
    let mut emulator = Emulator::new(rom, emulator_options).context("loading cartridge")?;

    if opts.headless {
        for _ in 0..opts.headless_frames {
            emulator.step_frame();
        }
        info!("ran {} frames headlessly", opts.headless_frames);
    } else {
        run_windowed(&mut emulator)?;
    }

    if let Some(ram) = emulator.battery_ram() {
        storage::save_battery_ram(&save_path, ram)?;
    }

    Ok(())
}

fn run_windowed(emulator: &mut Emulator) -> Result<()> {
    use gb_core::{RESOLUTION_HEIGHT, RESOLUTION_WIDTH};
    use sdl2::event::Event;
    use sdl2::pixels::PixelFormatEnum;

    let sdl_context = sdl2::init().map_err(|e| anyhow::anyhow!(e))?;
    let video = sdl_context.video().map_err(|e| anyhow::anyhow!(e))?;
    let window = video
        .window("rustyboi", (RESOLUTION_WIDTH * 3) as u32, (RESOLUTION_HEIGHT * 3) as u32)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator.create_texture_streaming(
        PixelFormatEnum::RGB24,
        RESOLUTION_WIDTH as u32,
        RESOLUTION_HEIGHT as u32,
    )?;

    let mut event_pump = sdl_context.event_pump().map_err(|e| anyhow::anyhow!(e))?;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown { keycode: Some(k), .. } => {
                    if let Some(key) = actions::keycode_to_input(k) {
                        emulator.press_key(key);
                    }
                }
                Event::KeyUp { keycode: Some(k), .. } => {
                    if let Some(key) = actions::keycode_to_input(k) {
                        emulator.release_key(key);
                    }
                }
                _ => {}
            }
        }

        emulator.step_frame();

        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (i, color) in emulator.framebuffer().iter().enumerate() {
                let rgb = display::shade_to_rgb(*color);
                let offset = (i / RESOLUTION_WIDTH) * pitch + (i % RESOLUTION_WIDTH) * 3;
                buffer[offset] = rgb.0;
                buffer[offset + 1] = rgb.1;
                buffer[offset + 2] = rgb.2;
            }
        })
        .map_err(|e| anyhow::anyhow!(e))?;

        canvas.copy(&texture, None, None).map_err(|e| anyhow::anyhow!(e))?;
        canvas.present();
    }

    Ok(())
}
