//! Operand resolution: the concrete [`ToU8`]/[`SetU8`]/[`ToU16`]/[`SetU16`] impls that
//! let a single instruction body (e.g. `load_8bit`) serve both a plain register and a
//! `(HL)`-style indirect operand, plus the byte/word fetch helpers every instruction
//! routes its memory traffic through so M-cycle accounting stays in one place.

use crate::hardware::bus::MemoryMapper;
use crate::hardware::cpu::execute::{InstructionAddress, WrapperEnum};
use crate::hardware::cpu::registers::{Reg16, Reg8};
use crate::hardware::cpu::traits::{SetU16, SetU8, ToU16, ToU8};
use crate::hardware::cpu::CPU;

impl<M: MemoryMapper> CPU<M> {
    /// Advance every other subsystem by one M-cycle. Every byte of memory traffic, and
    /// every "free" internal cycle an instruction spends, goes through this.
    pub(crate) fn add_cycles(&mut self) {
        self.mmu.tick_m_cycle();
        self.cycles_performed += 1;
    }

    pub(crate) fn read_byte_cycle(&mut self, address: u16) -> u8 {
        let value = self.mmu.read_byte(address);
        self.add_cycles();
        value
    }

    pub(crate) fn write_byte_cycle(&mut self, address: u16, value: u8) {
        self.mmu.write_byte(address, value);
        self.add_cycles();
    }

    /// Fetch the byte at `PC`, then advance `PC`. One M-cycle.
    pub(crate) fn get_instr_u8(&mut self) -> u8 {
        let value = self.read_byte_cycle(self.registers.pc);
        self.registers.pc = self.registers.pc.wrapping_add(1);
        value
    }

    /// Fetch the little-endian word at `PC, PC+1`, then advance `PC` by two. Two M-cycles.
    pub(crate) fn get_instr_u16(&mut self) -> u16 {
        let low = self.get_instr_u8();
        let high = self.get_instr_u8();
        (high as u16) << 8 | low as u16
    }

    /// Read a little-endian word from `address, address+1`. Two M-cycles.
    pub(crate) fn read_short_cycle(&mut self, address: u16) -> u16 {
        let low = self.read_byte_cycle(address);
        let high = self.read_byte_cycle(address.wrapping_add(1));
        (high as u16) << 8 | low as u16
    }

    /// Write a little-endian word to `address, address+1`. Two M-cycles.
    pub(crate) fn write_short_cycle(&mut self, address: u16, value: u16) {
        self.write_byte_cycle(address, value as u8);
        self.write_byte_cycle(address.wrapping_add(1), (value >> 8) as u8);
    }

    /// Fetch the second byte of a `CB`-prefixed instruction and dispatch it. One M-cycle
    /// for the fetch, on top of the one already spent fetching `0xCB` itself.
    pub(crate) fn cb_prefix_call(&mut self) {
        let opcode = self.get_instr_u8();
        self.execute_prefix(opcode);
    }

    fn resolve_address(&mut self, target: InstructionAddress) -> u16 {
        match target {
            InstructionAddress::BCI => self.registers.bc(),
            InstructionAddress::DEI => self.registers.de(),
            InstructionAddress::HLI => self.registers.hl(),
            InstructionAddress::HLIP => {
                let addr = self.registers.hl();
                self.registers.set_hl(addr.wrapping_add(1));
                addr
            }
            InstructionAddress::HLIN => {
                let addr = self.registers.hl();
                self.registers.set_hl(addr.wrapping_sub(1));
                addr
            }
            InstructionAddress::DirectMem => self.get_instr_u16(),
            InstructionAddress::IoDirect => 0xFF00 | self.get_instr_u8() as u16,
            InstructionAddress::IoC => 0xFF00 | self.registers.c as u16,
            InstructionAddress::DIRECT => unreachable!("DIRECT is an immediate, not an address"),
        }
    }
}

impl<M: MemoryMapper> ToU8<Reg8> for CPU<M> {
    fn read_u8_value(&mut self, target: Reg8) -> u8 {
        match target {
            Reg8::A => self.registers.a,
            Reg8::B => self.registers.b,
            Reg8::C => self.registers.c,
            Reg8::D => self.registers.d,
            Reg8::E => self.registers.e,
            Reg8::H => self.registers.h,
            Reg8::L => self.registers.l,
        }
    }
}

impl<M: MemoryMapper> SetU8<Reg8> for CPU<M> {
    fn set_u8_value(&mut self, target: Reg8, value: u8) {
        match target {
            Reg8::A => self.registers.a = value,
            Reg8::B => self.registers.b = value,
            Reg8::C => self.registers.c = value,
            Reg8::D => self.registers.d = value,
            Reg8::E => self.registers.e = value,
            Reg8::H => self.registers.h = value,
            Reg8::L => self.registers.l = value,
        }
    }
}

impl<M: MemoryMapper> ToU16<Reg16> for CPU<M> {
    fn read_u16_value(&mut self, target: Reg16) -> u16 {
        match target {
            Reg16::AF => self.registers.af(),
            Reg16::BC => self.registers.bc(),
            Reg16::DE => self.registers.de(),
            Reg16::HL => self.registers.hl(),
            Reg16::SP => self.registers.sp,
        }
    }
}

impl<M: MemoryMapper> SetU16<Reg16> for CPU<M> {
    fn set_u16_value(&mut self, target: Reg16, value: u16) {
        match target {
            Reg16::AF => self.registers.set_af(value),
            Reg16::BC => self.registers.set_bc(value),
            Reg16::DE => self.registers.set_de(value),
            Reg16::HL => self.registers.set_hl(value),
            Reg16::SP => self.registers.sp = value,
        }
    }
}

impl<M: MemoryMapper> ToU8<InstructionAddress> for CPU<M> {
    fn read_u8_value(&mut self, target: InstructionAddress) -> u8 {
        if let InstructionAddress::DIRECT = target {
            return self.get_instr_u8();
        }
        let address = self.resolve_address(target);
        self.read_byte_cycle(address)
    }
}

impl<M: MemoryMapper> SetU8<InstructionAddress> for CPU<M> {
    fn set_u8_value(&mut self, target: InstructionAddress, value: u8) {
        if let InstructionAddress::DIRECT = target {
            unreachable!("DIRECT is never a write target");
        }
        let address = self.resolve_address(target);
        self.write_byte_cycle(address, value);
    }
}

impl<M: MemoryMapper> ToU16<InstructionAddress> for CPU<M> {
    fn read_u16_value(&mut self, target: InstructionAddress) -> u16 {
        match target {
            InstructionAddress::DIRECT => self.get_instr_u16(),
            _ => unreachable!("only DIRECT is read as a 16-bit immediate"),
        }
    }
}

impl<M: MemoryMapper> SetU16<InstructionAddress> for CPU<M> {
    fn set_u16_value(&mut self, target: InstructionAddress, value: u16) {
        match target {
            InstructionAddress::DirectMem => {
                let address = self.get_instr_u16();
                self.write_short_cycle(address, value);
            }
            _ => unreachable!("only DirectMem is written as a 16-bit immediate target"),
        }
    }
}

impl<M: MemoryMapper> ToU8<WrapperEnum> for CPU<M> {
    fn read_u8_value(&mut self, target: WrapperEnum) -> u8 {
        match target {
            WrapperEnum::Reg8(reg) => self.read_u8_value(reg),
            WrapperEnum::InstructionAddress(addr) => self.read_u8_value(addr),
        }
    }
}

impl<M: MemoryMapper> SetU8<WrapperEnum> for CPU<M> {
    fn set_u8_value(&mut self, target: WrapperEnum, value: u8) {
        match target {
            WrapperEnum::Reg8(reg) => self.set_u8_value(reg, value),
            WrapperEnum::InstructionAddress(addr) => self.set_u8_value(addr, value),
        }
    }
}
