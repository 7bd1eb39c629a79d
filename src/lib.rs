// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction-stepping Motorola 68000 emulator with a pluggable memory map.
//!
//! This library emulates the user and supervisor instructions of the M68k ISA.
//! The memory map is application-dependant, so it is the user's responsibility
//! to define it by implementing the [Memory](memory::Memory) trait; regions
//! return their backing bytes from `translate` or `None` for a bus error.
//! [memory::MemoryManager] provides the usual composition of a low-memory
//! guard, flat RAM and the host-callback region at the top of the address
//! space.
//!
//! The emulator steps one instruction at a time and tracks its processor
//! condition:
//!
//! - [reset](Emulator::reset) loads the stack pointer and program counter
//!   from the vector table at address 0 and leaves the machine [Normal](Condition::Normal)
//!   (or [Halted](Condition::Halted) if the vectors are unreadable).
//! - [step](Emulator::step) fetches, decodes and executes one instruction,
//!   converting instruction-level faults into emulated 68000 exceptions.
//! - `BKPT #n` suspends execution with condition [Bkpt](Condition::Bkpt)
//!   and PC still addressing the breakpoint; the host inspects the machine
//!   and resumes with [acknowledge_breakpoint](Emulator::acknowledge_breakpoint),
//!   substituting the instruction to execute in the breakpoint's place.
//!
//! # Basic usage:
//!
//! ```
//! use v68k::{Condition, CpuModel, Emulator};
//!
//! let mut mem = [0u8; 1024];
//! mem[7] = 0x40;  // PC vector: 0x40
//! mem[3] = 0xFF;  // SSP vector: 0xFF
//! mem[0x40] = 0x4E; // NOP
//! mem[0x41] = 0x71;
//!
//! let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
//! emu.reset();
//! assert_eq!(emu.condition, Condition::Normal);
//! assert!(emu.step());
//! assert_eq!(emu.regs.pc, 0x42);
//! ```

pub mod addressing_modes;
pub mod callback;
pub mod decoder;
pub mod endian;
pub mod exception;
pub mod instruction;
mod interpreter;
pub mod isa;
pub mod memory;
pub mod status_register;
pub mod utils;

use exception::ACCESS_ERROR;
use isa::{Fetchers, Isa};
use memory::{FunctionCode, Memory};
use status_register::StatusRegister;
use utils::IsEven;

/// The emulated processor model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CpuModel {
    Mc68000,
}

/// M68000 registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    /// Data registers.
    pub d: [u32; 8],
    /// Address registers a0-a6. a7 is banked, see [usp](Self::usp) and [ssp](Self::ssp).
    pub a: [u32; 7],
    /// User Stack Pointer.
    pub usp: u32,
    /// System Stack Pointer.
    pub ssp: u32,
    /// Status Register.
    pub sr: StatusRegister,
    /// Program Counter.
    pub pc: u32,
}

impl Registers {
    /// Sets the lower 8-bits of the given data register to the given value.
    /// The higher 24-bits remains untouched.
    pub fn d_byte(&mut self, reg: u8, value: u8) {
        self.d[reg as usize] &= 0xFFFF_FF00;
        self.d[reg as usize] |= value as u32;
    }

    /// Sets the lower 16-bits of the given data register to the given value.
    /// The higher 16-bits remains untouched.
    pub fn d_word(&mut self, reg: u8, value: u16) {
        self.d[reg as usize] &= 0xFFFF_0000;
        self.d[reg as usize] |= value as u32;
    }

    /// Returns an address register. a7 resolves to the active stack pointer.
    pub const fn a(&self, reg: u8) -> u32 {
        if reg < 7 {
            self.a[reg as usize]
        } else {
            self.sp()
        }
    }

    /// Returns a mutable reference to an address register.
    pub fn a_mut(&mut self, reg: u8) -> &mut u32 {
        if reg < 7 {
            &mut self.a[reg as usize]
        } else {
            self.sp_mut()
        }
    }

    /// Returns the stack pointer, SSP if in supervisor mode, USP if in user mode.
    pub const fn sp(&self) -> u32 {
        if self.sr.s {
            self.ssp
        } else {
            self.usp
        }
    }

    /// Returns a mutable reference to the stack pointer, SSP if in supervisor mode, USP if in user mode.
    pub fn sp_mut(&mut self) -> &mut u32 {
        if self.sr.s {
            &mut self.ssp
        } else {
            &mut self.usp
        }
    }

    /// The data address space of the current privilege mode.
    pub const fn data_space(&self) -> FunctionCode {
        if self.sr.s {
            FunctionCode::SupervisorData
        } else {
            FunctionCode::UserData
        }
    }

    /// The program address space of the current privilege mode.
    pub const fn program_space(&self) -> FunctionCode {
        if self.sr.s {
            FunctionCode::SupervisorProgram
        } else {
            FunctionCode::UserProgram
        }
    }
}

/// The processor condition of the emulator.
///
/// Only [Normal](Self::Normal) is steppable. Every other condition makes
/// [Emulator::step] return false without executing anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// The machine has been created but not reset yet.
    Startup,
    /// Fetching and executing instructions.
    Normal,
    /// A STOP instruction was executed; waiting for an interrupt.
    Stopped,
    /// The program terminated (`STOP #0xFFFF`).
    Finished,
    /// A double fault or an unreadable reset vector; the machine cannot
    /// continue.
    Halted,
    /// A `BKPT #n` instruction was reached and awaits
    /// [acknowledgement](Emulator::acknowledge_breakpoint).
    Bkpt(u8),
}

impl Condition {
    /// Returns true if the emulator can execute instructions in this condition.
    pub const fn is_steppable(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// A M68000 core bound to its memory map.
#[derive(Debug)]
pub struct Emulator<'m, M: Memory + ?Sized> {
    /// The emulated processor model.
    pub model: CpuModel,
    /// The registers of the CPU.
    pub regs: Registers,
    /// The current processor condition.
    pub condition: Condition,
    /// The opcode of the instruction currently or last executed. After a
    /// breakpoint this holds the trapped BKPT opcode until acknowledged.
    pub opcode: u16,
    /// The memory map.
    pub mem: &'m mut M,
    /// True when [opcode](Self::opcode) must be executed by the next step
    /// instead of fetching from PC (breakpoint acknowledgement).
    pending: bool,
    count: u64,
}

impl<'m, M: Memory + ?Sized> Emulator<'m, M> {
    /// Creates a new emulator over the given memory map, in the
    /// [Startup](Condition::Startup) condition.
    ///
    /// Call [reset](Self::reset) to load the reset vectors and make the
    /// machine steppable.
    pub fn new(model: CpuModel, mem: &'m mut M) -> Self {
        Self {
            model,
            regs: Registers::default(),
            condition: Condition::Startup,
            opcode: 0,
            mem,
            pending: false,
            count: 0,
        }
    }

    /// The number of instructions executed since the last reset.
    pub const fn instruction_count(&self) -> u64 {
        self.count
    }

    /// The single transition point of the condition state machine.
    pub(crate) fn transition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    /// Loads SSP and PC from the reset vectors at address 0.
    ///
    /// SR is set to 0x2700 (supervisor, interrupt mask 7). If either vector
    /// is unreadable or the initial PC is odd the machine is left
    /// [Halted](Condition::Halted), otherwise it is [Normal](Condition::Normal).
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.pending = false;
        self.count = 0;

        match self.reset_vectors() {
            Ok(()) => self.transition(Condition::Normal),
            Err(_) => self.transition(Condition::Halted),
        }
    }

    fn reset_vectors(&mut self) -> Result<(), u8> {
        let fc = FunctionCode::SupervisorData;
        self.regs.ssp = self.mem.get_long(0, fc).ok_or(ACCESS_ERROR)?;
        // The registers keep whatever was read, even when an odd initial PC
        // halts the machine.
        self.regs.pc = self.mem.get_long(4, fc).ok_or(ACCESS_ERROR)?;
        self.regs.pc.even()?;
        Ok(())
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// Returns true if the machine is still [Normal](Condition::Normal)
    /// afterwards. Instruction-level faults vector through the emulated
    /// exception table and still return true when the exception was taken
    /// successfully; returns false without executing anything when the
    /// condition is not steppable.
    pub fn step(&mut self) -> bool {
        if !self.condition.is_steppable() {
            return false;
        }

        let opcode = if self.pending {
            // Execute the substituted opcode in place of the acknowledged
            // breakpoint; PC moves past the breakpoint slot.
            self.pending = false;
            self.regs.pc = self.regs.pc.wrapping_add(2);
            self.opcode
        } else {
            match self.get_next_word() {
                Ok(opcode) => opcode,
                Err(vector) => {
                    self.exception(vector);
                    return self.condition.is_steppable();
                },
            }
        };

        self.opcode = opcode;
        self.count += 1;

        let isa = Isa::from(opcode);
        let trace = self.regs.sr.t;

        match Fetchers::<'m, M>::FETCH[isa as usize](self) {
            // Only instructions that completed are traced; a faulting one
            // vectors through its own exception instead.
            Ok(()) => {
                if trace && self.condition.is_steppable() {
                    self.exception(exception::Vector::Trace as u8);
                }
            },
            Err(vector) => self.exception(vector),
        }

        self.condition.is_steppable()
    }

    /// Resumes from a breakpoint, substituting `opcode` for the trapped
    /// `BKPT` instruction.
    ///
    /// The next [step](Self::step) executes `opcode` directly and moves PC
    /// past the breakpoint slot. Returns false (and does nothing) if the
    /// machine is not at a breakpoint.
    pub fn acknowledge_breakpoint(&mut self, opcode: u16) -> bool {
        if let Condition::Bkpt(_) = self.condition {
            self.opcode = opcode;
            self.pending = true;
            self.transition(Condition::Normal);
            true
        } else {
            false
        }
    }
}
