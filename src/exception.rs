// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exception vectors and exception entry.
//!
//! Instruction-level faults never abort the emulation. They are converted to
//! the corresponding 68000 exception: the engine pushes the status register
//! and program counter on the supervisor stack and jumps through the vector
//! table in low memory. Only a fault during that entry sequence (the
//! double-fault equivalent, e.g. an unreadable vector table) halts the
//! machine.

use crate::{Condition, Emulator};
use crate::memory::Memory;
use crate::utils::IsEven;

/// Constant equal to the AccessError vector.
pub const ACCESS_ERROR: u8 = Vector::AccessError as u8;
/// Constant equal to the AddressError vector.
pub const ADDRESS_ERROR: u8 = Vector::AddressError as u8;

/// Exception vectors of the 68000.
///
/// You can directly cast the enum to u8 to get the vector number.
/// ```
/// use v68k::exception::Vector;
/// assert_eq!(Vector::AccessError as u8, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Vector {
    ResetSspPc = 0,
    /// Bus error. Sent when the accessed address is not in the memory map of the system.
    AccessError = 2,
    AddressError,
    IllegalInstruction,
    ZeroDivide,
    ChkInstruction,
    TrapVInstruction,
    PrivilegeViolation,
    Trace,
    LineAEmulator,
    LineFEmulator,
    UninitializedInterrupt = 15,
    SpuriousInterrupt = 24,
    Level1Interrupt,
    Level2Interrupt,
    Level3Interrupt,
    Level4Interrupt,
    Level5Interrupt,
    Level6Interrupt,
    Level7Interrupt,
    Trap0Instruction,
    Trap1Instruction,
    Trap2Instruction,
    Trap3Instruction,
    Trap4Instruction,
    Trap5Instruction,
    Trap6Instruction,
    Trap7Instruction,
    Trap8Instruction,
    Trap9Instruction,
    Trap10Instruction,
    Trap11Instruction,
    Trap12Instruction,
    Trap13Instruction,
    Trap14Instruction,
    Trap15Instruction,
}

impl<'m, M: Memory + ?Sized> Emulator<'m, M> {
    /// Takes the given exception, vectoring through the table in low memory.
    ///
    /// On a fault during the entry sequence itself the machine transitions to
    /// [Condition::Halted] instead of recursing.
    pub(crate) fn exception(&mut self, vector: u8) {
        if self.process_exception(vector).is_err() {
            self.transition(Condition::Halted);
        }
    }

    /// Pushes SR and PC, then loads PC from the vector table.
    fn process_exception(&mut self, vector: u8) -> Result<(), u8> {
        let sr = u16::from(self.regs.sr);
        self.regs.sr.t = false;
        self.regs.sr.s = true;

        self.push_long(self.regs.pc)?;
        self.push_word(sr)?;

        let fc = self.regs.data_space();
        let handler = self.mem.get_long(vector as u32 * 4, fc).ok_or(ACCESS_ERROR)?;
        self.regs.pc = handler.even()?;

        Ok(())
    }
}
