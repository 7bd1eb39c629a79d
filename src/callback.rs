// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-side callback bridge.
//!
//! The emulator core has no notion of native callbacks: jumping to the
//! reserved region at the top of the address space merely executes the
//! `BKPT` pattern served by [CallbackMemory](crate::memory::CallbackMemory)
//! and suspends the machine. The bridge maps the suspended PC back to a
//! callback number and invokes the native handler registered in that slot.
//!
//! A handler returns `Some(opcode)` to resume emulation with a synthetic
//! instruction (typically `RTS`, 0x4E75, injected through
//! [acknowledge_breakpoint](crate::Emulator::acknowledge_breakpoint)), or
//! `None` when the call was handled by other means (signal, exit) and the
//! step loop must not resume.

use crate::Emulator;
use crate::memory::Memory;

/// The address callback number `index` lives at.
///
/// Callbacks occupy one instruction slot (2 bytes) each, growing downwards
/// from the top of the address space: callback 0 is at 0xFFFFFFFE.
pub const fn callback_address(index: u32) -> u32 {
    0u32.wrapping_sub((index + 1) * 2)
}

/// A native callback handler with full access to the machine.
pub type Handler<M> = fn(&mut Emulator<'_, M>) -> Option<u16>;

/// One entry of the bridge's slot table.
pub enum Slot<M: Memory + ?Sized> {
    /// Allocated to a service this host does not provide.
    Reserved,
    /// Not a callback; reaching it ends the step loop.
    Empty,
    /// A registered native handler.
    Handler(Handler<M>),
}

impl<M: Memory + ?Sized> Clone for Slot<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Memory + ?Sized> Copy for Slot<M> {}

impl<M: Memory + ?Sized> std::fmt::Debug for Slot<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reserved => write!(f, "Reserved"),
            Self::Empty => write!(f, "Empty"),
            Self::Handler(_) => write!(f, "Handler"),
        }
    }
}

/// The fixed table of native callbacks, injected at construction.
///
/// Immutable after construction, so one bridge can serve several emulator
/// instances.
#[derive(Debug)]
pub struct Bridge<M: Memory + ?Sized> {
    slots: Vec<Slot<M>>,
}

impl<M: Memory + ?Sized> Bridge<M> {
    pub fn new(slots: Vec<Slot<M>>) -> Self {
        Self { slots }
    }

    /// The number of slots in the table.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolves the callback number addressed by the given PC.
    ///
    /// Returns None if the PC is not inside the table's slots.
    pub fn callback_number(&self, pc: u32) -> Option<u32> {
        if pc & 1 != 0 {
            return None;
        }

        let number = (0u32.wrapping_sub(pc) / 2).checked_sub(1)?;
        if (number as usize) < self.slots.len() {
            Some(number)
        } else {
            None
        }
    }

    /// Invokes the callback the machine is suspended at.
    ///
    /// Returns the synthetic opcode to inject via
    /// [acknowledge_breakpoint](Emulator::acknowledge_breakpoint), or None if
    /// the PC resolves to no handler or the handler ended the program.
    pub fn dispatch(&self, emu: &mut Emulator<'_, M>) -> Option<u16> {
        let number = self.callback_number(emu.regs.pc)?;
        match self.slots[number as usize] {
            Slot::Handler(handler) => handler(emu),
            Slot::Reserved | Slot::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_addresses() {
        assert_eq!(callback_address(0), 0xFFFF_FFFE);
        assert_eq!(callback_address(1), 0xFFFF_FFFC);
        assert_eq!(callback_address(9), 0xFFFF_FFEC);
    }

    #[test]
    fn callback_number_resolution() {
        let bridge: Bridge<[u8]> = Bridge::new(vec![Slot::Empty; 4]);

        assert_eq!(bridge.callback_number(callback_address(0)), Some(0));
        assert_eq!(bridge.callback_number(callback_address(3)), Some(3));
        // Out of the table.
        assert_eq!(bridge.callback_number(callback_address(4)), None);
        // Not in the callback region at all.
        assert_eq!(bridge.callback_number(0), None);
        assert_eq!(bridge.callback_number(0x1000), None);
        // Odd addresses never resolve.
        assert_eq!(bridge.callback_number(0xFFFF_FFFF), None);
    }
}
