//! The system bus: address decoding, echo RAM mirroring, and OAM DMA bus-locking.
//!
//! Every component the CPU can reach is owned here. [`MemoryMapper`] is the seam the
//! CPU is generic over, so unit tests can swap in a bare-bones mapper without dragging
//! in a full cartridge and PPU.

use log::*;

use crate::hardware::cartridge::Cartridge;
use crate::hardware::ppu::register_flags::{LcdControl, LcdStatus};
use crate::hardware::ppu::PPU;
use crate::io::apu::Apu;
use crate::io::bootrom::BootRom;
use crate::io::interrupts::{InterruptFlags, InterruptModule};
use crate::io::joypad::{InputKey, JoyPad};
use crate::io::serial::Serial;
use crate::io::timer::{TimerControl, TimerRegisters};

pub const ROM_BANK_00_START: u16 = 0x0000;
pub const ROM_BANK_NN_START: u16 = 0x4000;
pub const ROM_BANK_NN_END: u16 = 0x7FFF;
pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;
pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;
pub const WRAM_START: u16 = 0xC000;
pub const WRAM_END: u16 = 0xDFFF;
pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFDFF;
pub const ECHO_RAM_OFFSET: u16 = 0x2000;
pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;
pub const PROHIBITED_START: u16 = 0xFEA0;
pub const PROHIBITED_END: u16 = 0xFEFF;
pub const JOYPAD_REGISTER: u16 = 0xFF00;
pub const SERIAL_DATA: u16 = 0xFF01;
pub const SERIAL_CONTROL: u16 = 0xFF02;
pub const DIV_REGISTER: u16 = 0xFF04;
pub const TIMA_REGISTER: u16 = 0xFF05;
pub const TMA_REGISTER: u16 = 0xFF06;
pub const TAC_REGISTER: u16 = 0xFF07;
pub const INTERRUPT_FLAG: u16 = 0xFF0F;
pub const APU_START: u16 = 0xFF10;
pub const APU_END: u16 = 0xFF3F;
pub const PPU_REG_START: u16 = 0xFF40;
pub const DMA_REGISTER: u16 = 0xFF46;
pub const PPU_REG_END: u16 = 0xFF4B;
pub const BOOT_ROM_DISABLE: u16 = 0xFF50;
pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;
pub const INTERRUPT_ENABLE: u16 = 0xFFFF;

/// Value returned for reads that hit hardware which never drives the bus
/// (the prohibited range, a disabled cartridge RAM, mode-gated VRAM/OAM).
pub const INVALID_READ: u8 = 0xFF;

/// The seam the CPU is generic over. A concrete [`Bus`] is the only implementor
/// that ships, but the CPU never assumes more than this trait gives it.
pub trait MemoryMapper {
    fn read_byte(&mut self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);
    /// Advance every other subsystem (PPU, timer, OAM DMA, APU, cartridge RTC) by one
    /// machine cycle. Called once per M-cycle the CPU spends, in the fixed order
    /// PPU -> Timer -> DMA -> APU -> cartridge.
    fn tick_m_cycle(&mut self);
    fn request_interrupt(&mut self, flag: InterruptFlags);
    fn interrupt_flags(&self) -> InterruptFlags;
    fn interrupt_enable(&self) -> InterruptFlags;
    fn clear_interrupt(&mut self, flag: InterruptFlags);
}

#[derive(Debug, Default, Clone, Copy)]
struct OamDma {
    active: bool,
    source_base: u16,
    progress: u16,
}

impl OamDma {
    fn start(&mut self, written: u8) {
        let source_page = if written > 0xDF { written - 0x20 } else { written };
        self.source_base = (source_page as u16) << 8;
        self.active = true;
        self.progress = 0;
    }
}

pub struct Bus {
    cartridge: Cartridge,
    boot_rom: BootRom,
    boot_rom_mapped: bool,
    wram: [u8; (WRAM_END - WRAM_START + 1) as usize],
    hram: [u8; (HRAM_END - HRAM_START + 1) as usize],
    pub ppu: PPU,
    pub timer: TimerRegisters,
    pub joypad: JoyPad,
    pub serial: Serial,
    pub apu: Apu,
    interrupts: InterruptModule,
    oam_dma: OamDma,
    debug_addresses: Vec<u16>,
    debug_hits: Vec<(u16, u8)>,
}

impl Bus {
    pub fn new(cartridge: Cartridge, boot_rom: Option<[u8; 256]>) -> Self {
        let boot_rom_mapped = boot_rom.is_some();
        let mut bus = Bus {
            cartridge,
            boot_rom: BootRom::new(boot_rom),
            boot_rom_mapped,
            wram: [0; (WRAM_END - WRAM_START + 1) as usize],
            hram: [0; (HRAM_END - HRAM_START + 1) as usize],
            ppu: PPU::new(),
            timer: TimerRegisters::new(),
            joypad: JoyPad::new(),
            serial: Serial::new(),
            apu: Apu::new(),
            interrupts: InterruptModule::default(),
            oam_dma: OamDma::default(),
            debug_addresses: Vec::new(),
            debug_hits: Vec::new(),
        };
        if !boot_rom_mapped {
            bus.initialise_post_boot_state();
        }
        bus
    }

    /// Register values a real boot ROM would have left behind, used whenever the
    /// frontend doesn't supply one.
    fn initialise_post_boot_state(&mut self) {
        self.ppu.lcdc = LcdControl::from_bits_truncate(0x91);
        self.ppu.stat = LcdStatus::from_bits_truncate(0x85);
        self.ppu.bgp = 0xFC;
        self.timer.set_div_raw(0xAB00);
        self.timer.tac = TimerControl::from_bits_truncate(0xF8);
        self.interrupts.interrupt_flag = InterruptFlags::from_bits_truncate(0xE1);
    }

    pub fn press_key(&mut self, key: InputKey) {
        let was_high = !self.joypad.is_pressed(key);
        let row_selected = self.joypad.is_row_selected(key);
        self.joypad.press_key(key);
        if was_high && row_selected {
            self.request_interrupt(InterruptFlags::JOYPAD);
        }
    }

    pub fn release_key(&mut self, key: InputKey) {
        self.joypad.release_key(key);
    }

    pub fn oam_dma_active(&self) -> bool {
        self.oam_dma.active
    }

    /// Battery-backed cartridge RAM, ready to persist to a save file. `None` if the
    /// cartridge has no battery.
    pub fn cartridge_battery_ram(&self) -> Option<&[u8]> {
        self.cartridge.battery_ram()
    }

    /// Register an address to watch; every write to it is recorded for
    /// [`Self::drain_debug_hits`] to pick up. Used by acceptance tests (e.g. Mooneye's
    /// `LD B,B` breakpoint convention) to detect a ROM signalling pass/fail.
    pub fn watch_debug_address(&mut self, address: u16) {
        self.debug_addresses.push(address);
    }

    /// Take every `(address, value)` pair written to a watched address since the last call.
    pub fn drain_debug_hits(&mut self) -> Vec<(u16, u8)> {
        std::mem::take(&mut self.debug_hits)
    }

    /// Read bypassing DMA bus-locking; only ever used by the DMA engine itself and tests.
    fn read_raw(&mut self, address: u16) -> u8 {
        match address {
            ROM_BANK_00_START..=ROM_BANK_NN_END => {
                if self.boot_rom_mapped && address <= 0x00FF {
                    self.boot_rom.read_byte(address)
                } else {
                    self.cartridge.read_rom(address)
                }
            }
            VRAM_START..=VRAM_END => self.ppu.read_vram(address, true),
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self.cartridge.read_ram(address),
            WRAM_START..=WRAM_END => self.wram[(address - WRAM_START) as usize],
            ECHO_RAM_START..=ECHO_RAM_END => self.wram[(address - ECHO_RAM_START) as usize],
            OAM_START..=OAM_END => self.ppu.read_oam(address, true),
            PROHIBITED_START..=PROHIBITED_END => INVALID_READ,
            HRAM_START..=HRAM_END => self.hram[(address - HRAM_START) as usize],
            INTERRUPT_ENABLE => self.interrupts.interrupt_enable.bits() | 0xE0,
            _ => self.read_io_byte(address),
        }
    }

    fn read_io_byte(&mut self, address: u16) -> u8 {
        match address {
            JOYPAD_REGISTER => self.joypad.get_register(),
            SERIAL_DATA => self.serial.data,
            SERIAL_CONTROL => self.serial.control,
            DIV_REGISTER => self.timer.div(),
            TIMA_REGISTER => self.timer.tima,
            TMA_REGISTER => self.timer.tma,
            TAC_REGISTER => self.timer.tac.bits() | 0xF8,
            INTERRUPT_FLAG => self.interrupts.interrupt_flag.bits() | 0xE0,
            APU_START..=APU_END => self.apu.read_byte(address),
            PPU_REG_START..=PPU_REG_END => self.ppu.read_register(address),
            BOOT_ROM_DISABLE => 0xFF,
            _ => {
                trace!("Read from unmapped IO address {:#06x}", address);
                INVALID_READ
            }
        }
    }

    fn write_io_byte(&mut self, address: u16, value: u8) {
        match address {
            JOYPAD_REGISTER => self.joypad.set_register(value),
            SERIAL_DATA => self.serial.data = value,
            SERIAL_CONTROL => {
                self.serial.control = value;
                if value & 0x81 == 0x81 {
                    self.serial.push_byte(self.serial.data);
                    self.interrupts.insert_interrupt(InterruptFlags::SERIAL);
                }
            }
            DIV_REGISTER => self.timer.reset_div(),
            TIMA_REGISTER => self.timer.write_tima(value),
            TMA_REGISTER => self.timer.write_tma(value),
            TAC_REGISTER => self.timer.set_control(value),
            INTERRUPT_FLAG => self.interrupts.interrupt_flag = InterruptFlags::from_bits_truncate(value),
            APU_START..=APU_END => self.apu.write_byte(address, value),
            DMA_REGISTER => {
                self.ppu.write_register(address, value);
                self.oam_dma.start(value);
            }
            PPU_REG_START..=PPU_REG_END => self.ppu.write_register(address, value),
            BOOT_ROM_DISABLE => {
                if value != 0 {
                    self.boot_rom_mapped = false;
                }
            }
            _ => trace!("Write to unmapped IO address {:#06x} = {:#04x}", address, value),
        }
    }

    fn tick_oam_dma(&mut self) {
        if !self.oam_dma.active {
            return;
        }
        let source = self.oam_dma.source_base + self.oam_dma.progress;
        let value = self.read_raw(source);
        self.ppu.write_oam_raw(self.oam_dma.progress as u8, value);
        self.oam_dma.progress += 1;
        if self.oam_dma.progress >= 160 {
            self.oam_dma.active = false;
        }
    }
}

impl MemoryMapper for Bus {
    fn read_byte(&mut self, address: u16) -> u8 {
        if self.oam_dma.active && !(HRAM_START..=HRAM_END).contains(&address) {
            let source = self.oam_dma.source_base + self.oam_dma.progress.min(159);
            return self.read_raw(source);
        }
        self.read_raw(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        if self.debug_addresses.contains(&address) {
            self.debug_hits.push((address, value));
        }
        match address {
            ROM_BANK_00_START..=ROM_BANK_NN_END => self.cartridge.write_rom(address, value),
            VRAM_START..=VRAM_END => self.ppu.write_vram(address, value),
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self.cartridge.write_ram(address, value),
            WRAM_START..=WRAM_END => self.wram[(address - WRAM_START) as usize] = value,
            ECHO_RAM_START..=ECHO_RAM_END => self.wram[(address - ECHO_RAM_START) as usize] = value,
            OAM_START..=OAM_END => self.ppu.write_oam(address, value),
            PROHIBITED_START..=PROHIBITED_END => {}
            HRAM_START..=HRAM_END => self.hram[(address - HRAM_START) as usize] = value,
            INTERRUPT_ENABLE => self.interrupts.interrupt_enable = InterruptFlags::from_bits_truncate(value),
            _ => self.write_io_byte(address, value),
        }
    }

    fn tick_m_cycle(&mut self) {
        if let Some(request) = self.ppu.tick() {
            self.interrupts.insert_interrupt(request);
        }
        if let Some(overflow_interrupt) = self.timer.tick() {
            self.interrupts.insert_interrupt(overflow_interrupt);
        }
        self.tick_oam_dma();
        self.apu.tick();
        self.cartridge.tick();
    }

    fn request_interrupt(&mut self, flag: InterruptFlags) {
        self.interrupts.insert_interrupt(flag);
    }

    fn interrupt_flags(&self) -> InterruptFlags {
        self.interrupts.interrupt_flag
    }

    fn interrupt_enable(&self) -> InterruptFlags {
        self.interrupts.interrupt_enable
    }

    fn clear_interrupt(&mut self, flag: InterruptFlags) {
        self.interrupts.interrupt_flag.remove(flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::cartridge::Cartridge;

    fn rom_only_bus() -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[0x147] = 0x00; // ROM ONLY
        rom[0x148] = 0x00; // 32 KiB
        rom[0x149] = 0x00; // no RAM
        let cartridge = Cartridge::new(rom).unwrap();
        Bus::new(cartridge, None)
    }

    /// A DMA triggered by `FF46 <- 0xE0` reads from work RAM starting at `0xC000`, not
    /// echo RAM's `0xE000`: the source page is clamped back into the range it mirrors.
    #[test]
    fn oam_dma_source_is_clamped_out_of_echo_ram() {
        let mut bus = rom_only_bus();
        bus.write_byte(0xC034, 0x34);
        bus.write_byte(DMA_REGISTER, 0xE0);

        for _ in 0..160 {
            bus.tick_m_cycle();
        }

        assert_eq!(bus.ppu.read_oam(OAM_START + 0x34, true), 0x34);
    }

    /// The number of OAM DMA cycles remaining strictly decreases every M-cycle until the
    /// transfer completes.
    #[test]
    fn oam_dma_progress_counts_down_monotonically() {
        let mut bus = rom_only_bus();
        bus.write_byte(DMA_REGISTER, 0x00);
        assert!(bus.oam_dma_active());

        for _ in 0..159 {
            assert!(bus.oam_dma_active());
            bus.tick_m_cycle();
        }
        bus.tick_m_cycle();
        assert!(!bus.oam_dma_active());
    }

    /// Pressing a key on a matrix row that isn't currently selected must not raise the
    /// JOYPAD interrupt; only a 1-to-0 transition on the *selected* row does.
    #[test]
    fn press_key_only_interrupts_when_its_row_is_selected() {
        let mut bus = rom_only_bus();
        bus.joypad.set_register(0xDF); // select buttons row, directions unselected

        bus.press_key(InputKey::UP); // direction key, unselected row
        assert!(!bus.interrupt_flags().contains(InterruptFlags::JOYPAD));

        bus.press_key(InputKey::A); // button key, selected row
        assert!(bus.interrupt_flags().contains(InterruptFlags::JOYPAD));
    }

    /// A write to a watched address is recorded for later draining; writes elsewhere are
    /// not.
    #[test]
    fn debug_hits_only_capture_watched_addresses() {
        let mut bus = rom_only_bus();
        bus.watch_debug_address(0xC000);

        bus.write_byte(0xC000, 0x42);
        bus.write_byte(0xC001, 0x99);

        assert_eq!(bus.drain_debug_hits(), vec![(0xC000, 0x42)]);
        assert_eq!(bus.drain_debug_hits(), vec![]);
    }
}
