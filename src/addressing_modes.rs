// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Addressing mode-related structs, enums and functions.

use crate::Emulator;
use crate::instruction::Size;
use crate::memory::Memory;

/// The brief extension word of the indexed addressing modes.
///
/// Bit 15 selects an address register as the index, bit 11 selects the long
/// index size, bits 14-12 are the register number and the low byte is the
/// signed displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BriefExtensionWord(pub u16);

impl BriefExtensionWord {
    /// The sign-extended 8-bits displacement.
    pub const fn displacement(self) -> u32 {
        self.0 as i8 as u32
    }
}

/// Addressing modes of the 68000, with their decoded extension words.
///
/// The program counter values stored in the PC-relative modes are the
/// address of their extension word, as the 68000 defines it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Data Register Direct.
    Drd(u8),
    /// Address Register Direct.
    Ard(u8),
    /// Address Register Indirect.
    Ari(u8),
    /// Address Register Indirect With Postincrement.
    Ariwpo(u8),
    /// Address Register Indirect With Predecrement.
    Ariwpr(u8),
    /// Address Register Indirect With Displacement.
    Ariwd(u8, i16),
    /// Address Register Indirect With Index 8.
    Ariwi8(u8, BriefExtensionWord),
    /// Absolute Short.
    AbsShort(u16),
    /// Absolute Long.
    AbsLong(u32),
    /// Program Counter Indirect With Displacement.
    Pciwd(u32, i16),
    /// Program Counter Indirect With Index 8.
    Pciwi8(u32, BriefExtensionWord),
    /// Immediate Data.
    Immediate(u32),
}

impl AddressingMode {
    /// Returns the register number of the register-direct modes.
    pub const fn register(self) -> Option<u8> {
        match self {
            Self::Drd(reg) | Self::Ard(reg) => Some(reg),
            _ => None,
        }
    }

    /// Returns true if the addressing mode is Data Register Direct.
    pub const fn is_drd(self) -> bool {
        matches!(self, Self::Drd(_))
    }

    /// Returns true if the addressing mode is Address Register Direct.
    pub const fn is_ard(self) -> bool {
        matches!(self, Self::Ard(_))
    }

    /// Returns true if the addressing mode is Address Register Indirect With Postincrement.
    pub const fn is_ariwpo(self) -> bool {
        matches!(self, Self::Ariwpo(_))
    }

    /// Returns true if the addressing mode is Address Register Indirect With Predecrement.
    pub const fn is_ariwpr(self) -> bool {
        matches!(self, Self::Ariwpr(_))
    }

    /// Returns true if the operand is in memory (not a register, not immediate).
    pub const fn is_memory(self) -> bool {
        !matches!(self, Self::Drd(_) | Self::Ard(_) | Self::Immediate(_))
    }
}

/// An effective address field with its resolved address cached.
///
/// The address of memory operands is computed at most once, so instructions
/// that both read and write their operand see a single postincrement or
/// predecrement.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EffectiveAddress {
    pub mode: AddressingMode,
    pub size: Option<Size>,
    pub address: Option<u32>,
}

impl EffectiveAddress {
    pub(crate) const fn new(mode: AddressingMode, size: Option<Size>) -> Self {
        Self {
            mode,
            size,
            address: None,
        }
    }
}

impl<M: Memory + ?Sized> Emulator<'_, M> {
    /// Decodes the addressing mode field, fetching its extension words at PC.
    ///
    /// `eamode` and `eareg` are the raw 3-bits mode and register fields.
    /// `size` is required by the immediate mode to know how many extension
    /// words to fetch.
    pub(crate) fn addressing_mode(&mut self, eamode: u16, eareg: u8, size: Option<Size>) -> Result<AddressingMode, u8> {
        Ok(match eamode {
            0 => AddressingMode::Drd(eareg),
            1 => AddressingMode::Ard(eareg),
            2 => AddressingMode::Ari(eareg),
            3 => AddressingMode::Ariwpo(eareg),
            4 => AddressingMode::Ariwpr(eareg),
            5 => AddressingMode::Ariwd(eareg, self.get_next_word()? as i16),
            6 => AddressingMode::Ariwi8(eareg, BriefExtensionWord(self.get_next_word()?)),
            _ => match eareg {
                0 => AddressingMode::AbsShort(self.get_next_word()?),
                1 => AddressingMode::AbsLong(self.get_next_long()?),
                2 => {
                    let pc = self.regs.pc;
                    AddressingMode::Pciwd(pc, self.get_next_word()? as i16)
                },
                3 => {
                    let pc = self.regs.pc;
                    AddressingMode::Pciwi8(pc, BriefExtensionWord(self.get_next_word()?))
                },
                4 => AddressingMode::Immediate(if size == Some(Size::Long) {
                    self.get_next_long()?
                } else {
                    self.get_next_word()? as u32
                }),
                _ => return Err(crate::exception::Vector::IllegalInstruction as u8),
            },
        })
    }

    /// Calculates the address of the given effective address operand.
    ///
    /// If the address has already been calculated it is returned and no
    /// computation is performed. Returns None if the operand is not in memory.
    pub(crate) fn get_effective_address(&mut self, ea: &mut EffectiveAddress) -> Option<u32> {
        if ea.address.is_none() {
            ea.address = match ea.mode {
                AddressingMode::Ari(reg) => Some(self.regs.a(reg)),
                AddressingMode::Ariwpo(reg) => Some(self.ariwpo(reg, ea.size.unwrap_or(Size::Word))),
                AddressingMode::Ariwpr(reg) => Some(self.ariwpr(reg, ea.size.unwrap_or(Size::Word))),
                AddressingMode::Ariwd(reg, disp) => Some(self.regs.a(reg).wrapping_add(disp as u32)),
                AddressingMode::Ariwi8(reg, bew) => {
                    Some(self.regs.a(reg).wrapping_add(bew.displacement()).wrapping_add(self.index_register(bew)))
                },
                AddressingMode::AbsShort(addr) => Some(addr as i16 as u32),
                AddressingMode::AbsLong(addr) => Some(addr),
                AddressingMode::Pciwd(pc, disp) => Some(pc.wrapping_add(disp as u32)),
                AddressingMode::Pciwi8(pc, bew) => {
                    Some(pc.wrapping_add(bew.displacement()).wrapping_add(self.index_register(bew)))
                },
                _ => None,
            };
        }
        ea.address
    }

    /// The value of the index register selected by a brief extension word.
    fn index_register(&self, bew: BriefExtensionWord) -> u32 {
        let reg = (bew.0 >> 12 & 0x7) as u8;
        let value = if bew.0 & 0x8000 != 0 {
            self.regs.a(reg)
        } else {
            self.regs.d[reg as usize]
        };

        if bew.0 & 0x0800 != 0 {
            value
        } else {
            value as i16 as u32
        }
    }

    /// Address Register Indirect With Postincrement.
    ///
    /// Byte accesses through a7 move the stack pointer by 2 to keep it
    /// word aligned.
    pub(crate) fn ariwpo(&mut self, reg: u8, size: Size) -> u32 {
        let step = if reg == 7 { size.as_word_long() } else { size } as u32;
        let areg = self.regs.a_mut(reg);
        let addr = *areg;
        *areg = areg.wrapping_add(step);
        addr
    }

    /// Address Register Indirect With Predecrement.
    ///
    /// Byte accesses through a7 move the stack pointer by 2 to keep it
    /// word aligned.
    pub(crate) fn ariwpr(&mut self, reg: u8, size: Size) -> u32 {
        let step = if reg == 7 { size.as_word_long() } else { size } as u32;
        let areg = self.regs.a_mut(reg);
        *areg = areg.wrapping_sub(step);
        *areg
    }
}
