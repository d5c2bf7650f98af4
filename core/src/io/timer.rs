//! `DIV`/`TIMA`/`TMA`/`TAC` (§4.6), including the well-known TIMA overflow/reload quirk:
//! the reload into `TMA` and the interrupt request both lag one M-cycle behind the
//! overflow itself, and a `TIMA` write landing in that window has special-cased
//! semantics depending on exactly when it lands.

use crate::io::interrupts::InterruptFlags;
use bitflags::*;

pub const DIV_REGISTER: u16 = 0xFF04;
pub const TIMA_REGISTER: u16 = 0xFF05;
pub const TMA_REGISTER: u16 = 0xFF06;
pub const TAC_REGISTER: u16 = 0xFF07;

bitflags! {
    #[derive(Default)]
    pub struct TimerControl: u8 {
        const CLOCK_SELECT_LOW  = 0b0000_0001;
        const CLOCK_SELECT_HIGH = 0b0000_0010;
        const TIMER_ENABLE      = 0b0000_0100;
    }
}

impl TimerControl {
    /// Bit of the 16-bit system counter that the frequency multiplexer watches for a
    /// falling edge, per the two clock-select bits.
    fn multiplexer_bit(self) -> u16 {
        match self.bits() & 0x3 {
            0b00 => 0x0200, // 4096 Hz   (every 1024 M-cycles... T-cycles, bit 9)
            0b01 => 0x0008, // 262144 Hz (bit 3)
            0b10 => 0x0020, // 65536 Hz  (bit 5)
            0b11 => 0x0080, // 16384 Hz  (bit 7)
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TimerRegisters {
    system_clock: u16,
    pub tima: u8,
    pub tma: u8,
    pub tac: TimerControl,
    overflowed: bool,
    just_reloaded: bool,
}

impl TimerRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn div(&self) -> u8 {
        (self.system_clock >> 8) as u8
    }

    /// Used only to establish the post-boot-ROM system clock value (§6); never exposed
    /// to a running game, which can only reset `DIV` to zero.
    pub fn set_div_raw(&mut self, value: u16) {
        self.system_clock = value;
    }

    /// Advance by one M-cycle (4 T-cycles). Returns `Some(InterruptFlags::TIMER)` on the
    /// cycle the overflow from the *previous* tick reloads into `TIMA`.
    pub fn tick(&mut self) -> Option<InterruptFlags> {
        let mut requested = None;
        self.just_reloaded = false;

        if self.overflowed {
            self.tima = self.tma;
            self.overflowed = false;
            self.just_reloaded = true;
            requested = Some(InterruptFlags::TIMER);
        }

        let old_clock = self.system_clock;
        self.system_clock = self.system_clock.wrapping_add(4);

        if self.tac.contains(TimerControl::TIMER_ENABLE) && self.fell(old_clock, self.tac.multiplexer_bit()) {
            self.increment_tima();
        }

        requested
    }

    fn fell(&self, old_clock: u16, bit: u16) -> bool {
        (old_clock & bit) != 0 && (self.system_clock & bit) == 0
    }

    fn increment_tima(&mut self) {
        let (new_value, overflowed) = self.tima.overflowing_add(1);
        self.tima = new_value;
        self.overflowed = overflowed;
    }

    /// Write to `TIMA`. A write landing in the one-cycle reload window is dropped in
    /// favour of the `TMA` value that is being loaded; a write landing in the cycle the
    /// overflow itself occurred (before the reload) cancels the pending interrupt.
    pub fn write_tima(&mut self, value: u8) {
        if self.overflowed && self.tima == 0 {
            self.overflowed = false;
        }

        if self.just_reloaded {
            self.tima = self.tma;
        } else {
            self.tima = value;
        }
    }

    /// Write to `TMA`. If this lands in the same cycle `TIMA` is being reloaded, the new
    /// value is used for the reload instead of the stale one.
    pub fn write_tma(&mut self, value: u8) {
        if self.just_reloaded {
            self.tima = value;
        }
        self.tma = value;
    }

    /// Write to `DIV`; always resets the 16-bit system counter to zero. Because this can
    /// clear a bit the multiplexer was watching, it can itself trigger a falling-edge
    /// increment of `TIMA`.
    pub fn reset_div(&mut self) {
        let old_clock = self.system_clock;
        self.system_clock = 0;

        if self.tac.contains(TimerControl::TIMER_ENABLE) && self.fell(old_clock, self.tac.multiplexer_bit()) {
            self.increment_tima();
        }
    }

    /// Write to `TAC`. Changing the clock select (or disabling the timer outright) can
    /// flip the multiplexer's watched bit from 1 to 0 mid-cycle, which on real hardware
    /// ticks `TIMA` immediately rather than waiting for the bit's next natural fall.
    pub fn set_control(&mut self, value: u8) {
        let old_tac = self.tac;
        self.tac = TimerControl::from_bits_truncate(value);

        let old_bit = old_tac.multiplexer_bit();
        let new_bit = self.tac.multiplexer_bit();

        if old_tac.contains(TimerControl::TIMER_ENABLE)
            && !self.tac.contains(TimerControl::TIMER_ENABLE)
            && (self.system_clock & old_bit) != 0
        {
            self.increment_tima();
        }

        if old_tac.contains(TimerControl::TIMER_ENABLE)
            && self.tac.contains(TimerControl::TIMER_ENABLE)
            && (self.system_clock & old_bit) != 0
            && (self.system_clock & new_bit) == 0
        {
            self.increment_tima();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_increments_every_256_t_cycles() {
        let mut timer = TimerRegisters::new();
        for _ in 0..64 {
            timer.tick();
        }
        assert_eq!(timer.div(), 1);
    }

    #[test]
    fn reset_div_zeroes_register() {
        let mut timer = TimerRegisters::new();
        for _ in 0..64 {
            timer.tick();
        }
        timer.reset_div();
        assert_eq!(timer.div(), 0);
    }

    #[test]
    fn overflow_reloads_one_cycle_late_and_requests_interrupt() {
        let mut timer = TimerRegisters::new();
        timer.set_control(0b0000_0101); // enabled, every 16 T-cycles
        timer.tma = 0x05;
        timer.tima = 0xFF;

        // One more increment should overflow TIMA to 0, no interrupt yet.
        let mut requested = None;
        for _ in 0..4 {
            requested = timer.tick();
        }
        assert_eq!(timer.tima, 0);
        assert!(requested.is_none());

        // Next M-cycle: TMA reload + interrupt request.
        let requested = timer.tick();
        assert_eq!(timer.tima, 0x05);
        assert_eq!(requested, Some(InterruptFlags::TIMER));
    }

    #[test]
    fn write_during_overflow_cycle_cancels_interrupt() {
        let mut timer = TimerRegisters::new();
        timer.set_control(0b0000_0101);
        timer.tima = 0xFF;
        for _ in 0..4 {
            timer.tick();
        }
        assert_eq!(timer.tima, 0);
        timer.write_tima(0x42);
        let requested = timer.tick();
        assert!(requested.is_none());
        assert_eq!(timer.tima, 0x43);
    }
}
