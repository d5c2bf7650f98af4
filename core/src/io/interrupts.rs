//! Interrupt flags shared between `IE` (`FFFF`) and `IF` (`FF0F`), and the
//! fixed priority order the CPU resolves them in at an instruction boundary.

use bitflags::*;

bitflags! {
    #[derive(Default)]
    pub struct InterruptFlags: u8 {
        /// V-Blank, vector `0x40`.
        const VBLANK = 0b0000_0001;
        /// LCD STAT, vector `0x48`.
        const LCD    = 0b0000_0010;
        /// Timer overflow, vector `0x50`.
        const TIMER  = 0b0000_0100;
        /// Serial transfer complete, vector `0x58`.
        const SERIAL = 0b0000_1000;
        /// Joypad press, vector `0x60`.
        const JOYPAD = 0b0001_0000;
    }
}

impl InterruptFlags {
    /// The 5 bits real hardware uses, in descending priority. Index 0 is the
    /// highest-priority interrupt: `VBlank > LCD STAT > Timer > Serial > Joypad` (§4.7).
    const PRIORITY: [(InterruptFlags, u16); 5] = [
        (InterruptFlags::VBLANK, 0x0040),
        (InterruptFlags::LCD, 0x0048),
        (InterruptFlags::TIMER, 0x0050),
        (InterruptFlags::SERIAL, 0x0058),
        (InterruptFlags::JOYPAD, 0x0060),
    ];

    /// Resolve the highest priority interrupt set in `self` (normally `IE & IF & 0x1F`),
    /// returning the single flag that won and its service vector.
    pub fn highest_priority(self) -> Option<(InterruptFlags, u16)> {
        Self::PRIORITY.iter().copied().find(|(flag, _)| self.contains(*flag))
    }
}

#[derive(Default, Debug, Clone)]
pub struct InterruptModule {
    pub interrupt_enable: InterruptFlags,
    pub interrupt_flag: InterruptFlags,
}

impl InterruptModule {
    pub fn insert_interrupt(&mut self, interrupt: InterruptFlags) {
        self.interrupt_flag.insert(interrupt);
    }

    /// `IE & IF`, masked to the 5 bits hardware defines.
    pub fn pending(&self) -> InterruptFlags {
        self.interrupt_enable & self.interrupt_flag & InterruptFlags::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_vblank_first() {
        let both = InterruptFlags::JOYPAD | InterruptFlags::VBLANK | InterruptFlags::TIMER;
        assert_eq!(both.highest_priority(), Some((InterruptFlags::VBLANK, 0x0040)));
    }

    #[test]
    fn priority_falls_through_in_order() {
        let pending = InterruptFlags::SERIAL | InterruptFlags::JOYPAD;
        assert_eq!(pending.highest_priority(), Some((InterruptFlags::SERIAL, 0x0058)));
    }

    #[test]
    fn no_pending_returns_none() {
        assert_eq!(InterruptFlags::empty().highest_priority(), None);
    }
}
