// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Memory access-related traits and structs.
//!
//! The address space is partitioned into caller-defined regions, each of
//! which answers [Memory::translate] by classifying the requested range and
//! returning the backing bytes, or `None` to signal a bus error. Accesses
//! that straddle two regions fail rather than splicing adjacent regions'
//! data: a region only returns a slice when the whole `addr..addr + length`
//! range lies inside it.

use crate::endian::{read_big_longword, read_big_word, write_big_longword, write_big_word};

/// The address space qualifier sent along with every memory access.
///
/// Regions use it to enforce access rules, e.g. to keep user-mode code from
/// scribbling over the vector table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionCode {
    UserData = 1,
    UserProgram = 2,
    SupervisorData = 5,
    SupervisorProgram = 6,
    CpuSpace = 7,
}

impl FunctionCode {
    /// True for the supervisor address spaces.
    pub const fn is_supervisor(self) -> bool {
        matches!(self, Self::SupervisorData | Self::SupervisorProgram | Self::CpuSpace)
    }
}

/// The kind of access being translated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// The trait to be implemented by the memory system that will be used by the core.
///
/// Only the two `translate` methods are required; the typed accessors are
/// provided on top of them and apply the big-endian codec. Returning `None`
/// from `translate` signals a bus error, which the engine converts into an
/// emulated Access Error exception.
///
/// `translate` is a pure function of the region state: calling it twice with
/// identical arguments and no intervening write returns the same bytes.
pub trait Memory {
    /// Translates the given range for reading (or classification).
    ///
    /// Returns the `length` bytes starting at `addr`, or `None` if the range
    /// is not entirely inside a region or the access is not permitted.
    fn translate(&self, addr: u32, length: u32, fc: FunctionCode, access: Access) -> Option<&[u8]>;

    /// Translates the given range for writing.
    ///
    /// Returns `None` for read-only regions (e.g. callback memory) and for
    /// ranges not entirely inside a region.
    fn translate_mut(&mut self, addr: u32, length: u32, fc: FunctionCode) -> Option<&mut [u8]>;

    /// Returns the 8-bits integer at the given address.
    fn get_byte(&self, addr: u32, fc: FunctionCode) -> Option<u8> {
        self.translate(addr, 1, fc, Access::Read).map(|bytes| bytes[0])
    }

    /// Returns the big-endian 16-bits integer at the given address.
    fn get_word(&self, addr: u32, fc: FunctionCode) -> Option<u16> {
        self.translate(addr, 2, fc, Access::Read).map(read_big_word)
    }

    /// Returns the big-endian 32-bits integer at the given address.
    fn get_long(&self, addr: u32, fc: FunctionCode) -> Option<u32> {
        self.translate(addr, 4, fc, Access::Read).map(read_big_longword)
    }

    /// Stores the given 8-bits value at the given address.
    #[must_use]
    fn put_byte(&mut self, addr: u32, value: u8, fc: FunctionCode) -> Option<()> {
        self.translate_mut(addr, 1, fc).map(|bytes| bytes[0] = value)
    }

    /// Stores the given 16-bits value at the given address, in big-endian format.
    #[must_use]
    fn put_word(&mut self, addr: u32, value: u16, fc: FunctionCode) -> Option<()> {
        self.translate_mut(addr, 2, fc).map(|bytes| write_big_word(bytes, value))
    }

    /// Stores the given 32-bits value at the given address, in big-endian format.
    #[must_use]
    fn put_long(&mut self, addr: u32, value: u32, fc: FunctionCode) -> Option<()> {
        self.translate_mut(addr, 4, fc).map(|bytes| write_big_longword(bytes, value))
    }

    /// Called when the CPU executes a RESET instruction.
    ///
    /// Override this to reset external devices connected to the bus.
    fn reset_instruction(&mut self) {}
}

/// Flat RAM/ROM block: a plain byte slice is a valid address space starting
/// at address 0, with no access restrictions.
impl Memory for [u8] {
    fn translate(&self, addr: u32, length: u32, _fc: FunctionCode, _access: Access) -> Option<&[u8]> {
        let end = addr.checked_add(length)? as usize;
        self.get(addr as usize..end)
    }

    fn translate_mut(&mut self, addr: u32, length: u32, _fc: FunctionCode) -> Option<&mut [u8]> {
        let end = addr.checked_add(length)? as usize;
        self.get_mut(addr as usize..end)
    }
}

/// The byte pattern every callback address reads as: `BKPT #3`, repeated so
/// that odd addresses decode to the same instruction.
static CALLBACK_TRAP: [u8; 5] = [0x48, 0x4B, 0x48, 0x4B, 0x48];

/// Read-only region mapping the top of the address space to breakpoint stubs.
///
/// Callback `i` occupies the two bytes at `0 - (i + 1) * 2`. Every address in
/// the region reads as the `BKPT #3` opcode regardless of which callback is
/// "at" that address; the actual dispatch happens by decoding the PC value,
/// not by reading distinct memory.
#[derive(Clone, Copy, Debug)]
pub struct CallbackMemory {
    n_callbacks: u32,
}

impl CallbackMemory {
    pub const fn new(n_callbacks: u32) -> Self {
        Self { n_callbacks }
    }

    /// The lowest address belonging to the callback region.
    pub const fn first_address(&self) -> u32 {
        0u32.wrapping_sub(self.n_callbacks * 2)
    }
}

impl Memory for CallbackMemory {
    fn translate(&self, addr: u32, length: u32, _fc: FunctionCode, access: Access) -> Option<&[u8]> {
        if access == Access::Write {
            return None;
        }

        if addr < self.first_address() {
            return None;
        }

        // The region ends at the top of the address space; an access that
        // would wrap past it fails like any other straddle.
        if addr as u64 + length as u64 > 1 << 32 {
            return None;
        }

        let offset = (addr & 1) as usize;
        CALLBACK_TRAP.get(offset..offset + length as usize)
    }

    /// Callback memory is write-protected: any write access fails translation.
    fn translate_mut(&mut self, _addr: u32, _length: u32, _fc: FunctionCode) -> Option<&mut [u8]> {
        None
    }
}

/// The standard host memory map: a low-memory guard over the vector and trap
/// tables, general RAM above it, and the callback region at the top of the
/// address space.
///
/// The guard denies user-mode writes below `low_memory_size`; supervisor
/// accesses and user reads pass through to RAM.
#[derive(Debug)]
pub struct MemoryManager<'a> {
    mem: &'a mut [u8],
    low_memory_size: u32,
    callbacks: CallbackMemory,
}

impl<'a> MemoryManager<'a> {
    pub fn new(mem: &'a mut [u8], low_memory_size: u32, n_callbacks: u32) -> Self {
        Self {
            mem,
            low_memory_size,
            callbacks: CallbackMemory::new(n_callbacks),
        }
    }

    fn guarded(&self, addr: u32, fc: FunctionCode, access: Access) -> bool {
        access == Access::Write && !fc.is_supervisor() && addr < self.low_memory_size
    }
}

impl Memory for MemoryManager<'_> {
    fn translate(&self, addr: u32, length: u32, fc: FunctionCode, access: Access) -> Option<&[u8]> {
        if addr >= self.callbacks.first_address() {
            return self.callbacks.translate(addr, length, fc, access);
        }

        if self.guarded(addr, fc, access) {
            return None;
        }

        self.mem.translate(addr, length, fc, access)
    }

    fn translate_mut(&mut self, addr: u32, length: u32, fc: FunctionCode) -> Option<&mut [u8]> {
        if addr >= self.callbacks.first_address() {
            return None;
        }

        if self.guarded(addr, fc, Access::Write) {
            return None;
        }

        self.mem.translate_mut(addr, length, fc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_bounds() {
        let mut mem = [0u8; 8];

        assert!(mem.translate(0, 8, FunctionCode::SupervisorData, Access::Read).is_some());
        assert!(mem.translate(7, 2, FunctionCode::SupervisorData, Access::Read).is_none());
        assert!(mem.translate(8, 1, FunctionCode::SupervisorData, Access::Read).is_none());
        assert!(mem.translate(0xFFFF_FFFF, 2, FunctionCode::SupervisorData, Access::Read).is_none());

        assert_eq!(mem.put_word(6, 0x4E75, FunctionCode::SupervisorData), Some(()));
        assert_eq!(mem.get_word(6, FunctionCode::SupervisorData), Some(0x4E75));
        assert_eq!(mem[6], 0x4E);
    }

    #[test]
    fn callback_region_reads_bkpt() {
        let callbacks = CallbackMemory::new(8);

        let first = callbacks.first_address();
        assert_eq!(first, 0xFFFF_FFF0);

        assert_eq!(callbacks.get_word(first, FunctionCode::SupervisorProgram), Some(0x484B));
        assert_eq!(callbacks.get_word(0xFFFF_FFFE, FunctionCode::UserProgram), Some(0x484B));
        assert_eq!(callbacks.get_byte(0xFFFF_FFF1, FunctionCode::UserData), Some(0x4B));

        assert!(callbacks.get_word(first - 2, FunctionCode::UserProgram).is_none());
        // A longword at the last slot would wrap past the top of the space.
        assert!(callbacks.get_long(0xFFFF_FFFE, FunctionCode::UserData).is_none());
    }

    #[test]
    fn callback_region_is_write_protected() {
        let mut callbacks = CallbackMemory::new(8);

        assert!(callbacks.put_word(0xFFFF_FFFE, 0, FunctionCode::SupervisorData).is_none());
        assert!(callbacks
            .translate(0xFFFF_FFFE, 2, FunctionCode::SupervisorData, Access::Write)
            .is_none());
    }

    #[test]
    fn low_memory_guard() {
        let mut mem = [0u8; 2048];
        let mut map = MemoryManager::new(&mut mem, 1024, 8);

        assert!(map.put_word(0, 0x1234, FunctionCode::UserData).is_none());
        assert_eq!(map.put_word(0, 0x1234, FunctionCode::SupervisorData), Some(()));
        assert_eq!(map.put_word(1024, 0x5678, FunctionCode::UserData), Some(()));

        assert_eq!(map.get_word(0, FunctionCode::UserData), Some(0x1234));
    }

    #[test]
    fn translate_is_idempotent() {
        let mut mem = [0u8; 64];
        mem[10] = 0xAB;
        let map = MemoryManager::new(&mut mem, 0, 8);

        let a = map.translate(8, 4, FunctionCode::UserData, Access::Read).unwrap().to_vec();
        let b = map.translate(8, 4, FunctionCode::UserData, Access::Read).unwrap().to_vec();
        assert_eq!(a, b);
    }
}
