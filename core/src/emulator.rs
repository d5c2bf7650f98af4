//! The top-level orchestrator. [`Emulator`] owns the CPU/bus pair and is the only type
//! a host needs: feed it ROM bytes, step it a frame at a time, and read back the
//! framebuffer, serial output, and save RAM.

use crate::error::CartridgeLoadError;
use crate::hardware::bus::Bus;
use crate::hardware::cartridge::Cartridge;
use crate::hardware::cpu::{CpuDebugState, CPU};
use crate::hardware::ppu::palette::DmgColor;
use crate::hardware::ppu::FRAMEBUFFER_SIZE;
use crate::io::joypad::InputKey;
use crate::EmulatorOptions;

/// M-cycles in one 154-scanline frame: `154 * 114`.
pub const CYCLES_PER_FRAME: u32 = 17_556;

pub struct Emulator {
    cpu: CPU<Bus>,
    debug_callback: Option<Box<dyn FnMut(u16, u8)>>,
}

impl Emulator {
    /// Builds an emulator from a ROM dump. `options.boot_rom`, if present, is mapped at
    /// `0000-00FF` and the CPU starts at `PC=0`; otherwise the CPU starts post-boot, at
    /// the register state a real boot ROM leaves behind. `options.saved_ram`, if present,
    /// restores battery-backed cartridge RAM.
    pub fn new(rom: Vec<u8>, options: EmulatorOptions) -> Result<Self, CartridgeLoadError> {
        let mut cartridge = Cartridge::new(rom)?;
        if let Some(ram) = &options.saved_ram {
            cartridge.load_battery_ram(ram)?;
        }

        let has_boot_rom = options.boot_rom.is_some();
        let bus = Bus::new(cartridge, options.boot_rom);
        let cpu = if has_boot_rom {
            CPU::new(bus)
        } else {
            CPU::new_post_boot(bus)
        };

        Ok(Emulator {
            cpu,
            debug_callback: None,
        })
    }

    /// Execute the next instruction, or service a pending interrupt, or spend one idle
    /// M-cycle if halted/stuck.
    pub fn step_cycle(&mut self) {
        self.cpu.step_cycle();
        self.dispatch_debug_hits();
    }

    /// Advance by one full frame's worth of M-cycles ([`CYCLES_PER_FRAME`]). Instructions
    /// take a variable number of M-cycles, so this runs [`Self::step_cycle`] until the
    /// CPU's own M-cycle counter has advanced by the frame budget, rather than a fixed
    /// number of instructions.
    pub fn step_frame(&mut self) {
        let target = self.cpu.cycles_performed + CYCLES_PER_FRAME as u128;
        while self.cpu.cycles_performed < target {
            self.cpu.step_cycle();
        }
        self.dispatch_debug_hits();
    }

    fn dispatch_debug_hits(&mut self) {
        if self.debug_callback.is_none() {
            return;
        }
        let hits = self.cpu.mmu.drain_debug_hits();
        if hits.is_empty() {
            return;
        }
        let callback = self.debug_callback.as_mut().unwrap();
        for (address, value) in hits {
            callback(address, value);
        }
    }

    /// Register an address for [`Self::set_debug_callback`] to be notified about.
    pub fn watch_debug_address(&mut self, address: u16) {
        self.cpu.mmu.watch_debug_address(address);
    }

    /// Install a callback fired, in write order, with `(address, value)` for every write
    /// to a watched address since the last time it ran.
    pub fn set_debug_callback(&mut self, callback: impl FnMut(u16, u8) + 'static) {
        self.debug_callback = Some(Box::new(callback));
    }

    /// `A,F,B,C,D,E,H,L,SP,PC` and the four bytes at `PC`.
    pub fn debug_state(&mut self) -> CpuDebugState {
        self.cpu.debug_state()
    }

    pub fn press_key(&mut self, key: InputKey) {
        self.cpu.mmu.press_key(key);
    }

    pub fn release_key(&mut self, key: InputKey) {
        self.cpu.mmu.release_key(key);
    }

    pub fn framebuffer(&self) -> &[DmgColor; FRAMEBUFFER_SIZE] {
        self.cpu.mmu.ppu.framebuffer()
    }

    /// The serial port's transmit buffer, decoded lossily as ASCII. Used by test harnesses
    /// to scan for the blargg ROMs' `"Passed"`/`"Failed"` markers.
    pub fn serial_output(&self) -> String {
        self.cpu.mmu.serial.as_string()
    }

    /// Battery-backed cartridge RAM, ready to persist to a save file. `None` if the
    /// cartridge has no battery.
    pub fn battery_ram(&self) -> Option<&[u8]> {
        self.cpu.mmu.cartridge_battery_ram()
    }

    /// Total machine cycles executed since construction. Exposed for test harnesses that
    /// need to verify [`Self::step_frame`]'s cycle budget directly.
    pub fn cycles_performed(&self) -> u128 {
        self.cpu.cycles_performed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_header(cartridge_type: u8, banks: usize) -> Vec<u8> {
        let mut rom = vec![0u8; banks * 0x4000];
        rom[0x147] = cartridge_type;
        rom[0x148] = 0;
        rom[0x149] = 0;
        rom
    }

    #[test]
    fn construction_without_boot_rom_starts_post_boot() {
        let mut emulator = Emulator::new(rom_with_header(0x00, 2), EmulatorOptions::default()).unwrap();
        assert_eq!(emulator.debug_state().pc, 0x0100);
    }

    #[test]
    fn construction_with_boot_rom_starts_at_zero() {
        let options = EmulatorOptions {
            boot_rom: Some([0; 256]),
            saved_ram: None,
        };
        let mut emulator = Emulator::new(rom_with_header(0x00, 2), options).unwrap();
        assert_eq!(emulator.debug_state().pc, 0x0000);
    }

    #[test]
    fn debug_callback_fires_on_watched_write() {
        let mut rom = rom_with_header(0x00, 2);
        // LD (nn), A ; nn = 0xC000, then loop.
        rom[0x100] = 0xEA;
        rom[0x101] = 0x00;
        rom[0x102] = 0xC0;
        let mut emulator = Emulator::new(rom, EmulatorOptions::default()).unwrap();
        emulator.watch_debug_address(0xC000);

        let hit = std::rc::Rc::new(std::cell::RefCell::new(None));
        let hit_clone = hit.clone();
        emulator.set_debug_callback(move |address, value| {
            *hit_clone.borrow_mut() = Some((address, value));
        });

        emulator.step_cycle(); // runs the whole LD (nn), A instruction

        assert_eq!(*hit.borrow(), Some((0xC000, 0)));
    }
}
