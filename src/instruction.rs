// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction-related enums and operand-field extraction.
//!
//! The extraction functions take the opcode and return the operand fields
//! that live entirely in the instruction word. Operands with extension words
//! are fetched by the per-instruction fetchers.

use crate::utils::bits;

/// Specify the direction of the operation.
///
/// `RegisterToMemory` and `MemoryToRegister` are used by MOVEM and MOVEP.
///
/// `DstReg` and `DstEa` are used by ADD, AND, OR and SUB.
///
/// `Left` and `Right` are used by the Shift and Rotate instructions.
///
/// `RegisterToUsp` and `UspToRegister` are used by MOVE USP.
///
/// `RegisterToRegister` and `MemoryToMemory` are used by ABCD, ADDX, SBCD and SUBX.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Transfer from a register to memory.
    RegisterToMemory,
    /// Transfer from memory to a register.
    MemoryToRegister,
    /// Destination is a register.
    DstReg,
    /// Destination is in memory.
    DstEa,
    /// Left shift or rotation.
    Left,
    /// Right shift or rotation.
    Right,
    /// For MOVE USP only.
    RegisterToUsp,
    /// For MOVE USP only.
    UspToRegister,
    /// Register to register operation.
    RegisterToRegister,
    /// Memory to memory operation.
    MemoryToMemory,
    /// Exchange Data Registers (EXG only).
    ExchangeData,
    /// Exchange Address Registers (EXG only).
    ExchangeAddress,
    /// Exchange Data and Address Registers (EXG only).
    ExchangeDataAddress,
}

/// Size of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Size {
    Byte = 1,
    Word = 2,
    Long = 4,
}

impl Size {
    /// Returns Word when self is Byte, self otherwise.
    ///
    /// This is used in addressing modes, where byte post/pre increment
    /// of a7 increments the register by 2 instead of 1.
    #[inline(always)]
    pub fn as_word_long(self) -> Self {
        if self == Self::Byte {
            Self::Word
        } else {
            self
        }
    }

    /// Creates a new size from a single size bit (like MOVEM and ADDA).
    ///
    /// Size bit means:
    /// - 0 => Word
    /// - 1 => Long
    #[inline(always)]
    pub fn from_bit(d: u16) -> Self {
        match d {
            0 => Self::Word,
            1 => Self::Long,
            _ => panic!("[Size::from_bit] Wrong size : expected 0 or 1, got {}", d),
        }
    }

    /// Creates a new size from the size bits of a MOVE or MOVEA instruction.
    ///
    /// - 1 => Byte
    /// - 3 => Word
    /// - 2 => Long
    #[inline(always)]
    pub fn from_move(d: u16) -> Self {
        match d {
            1 => Self::Byte,
            3 => Self::Word,
            2 => Self::Long,
            _ => panic!("[Size::from_move] Wrong Size : expected 1, 3 or 2, got {}", d),
        }
    }

    /// The operand mask: 0xFF, 0xFFFF or 0xFFFF_FFFF.
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0x0000_00FF,
            Self::Word => 0x0000_FFFF,
            Self::Long => 0xFFFF_FFFF,
        }
    }

    /// The sign bit of the operand size.
    #[inline(always)]
    pub const fn msb(self) -> u32 {
        match self {
            Self::Byte => 0x0000_0080,
            Self::Word => 0x0000_8000,
            Self::Long => 0x8000_0000,
        }
    }

    /// Sign-extends the low `self` bytes of `data` to 32 bits.
    #[inline(always)]
    pub const fn sign_extend(self, data: u32) -> u32 {
        match self {
            Self::Byte => data as u8 as i8 as u32,
            Self::Word => data as u16 as i16 as u32,
            Self::Long => data,
        }
    }

    /// Returns true if it is Size::Byte, false otherwise.
    #[inline(always)]
    pub fn is_byte(self) -> bool {
        self == Self::Byte
    }

    /// Returns true if it is Size::Long, false otherwise.
    #[inline(always)]
    pub fn is_long(self) -> bool {
        self == Self::Long
    }
}

impl From<u16> for Size {
    /// Creates a new size from the primary size bits.
    ///
    /// Size bits must be:
    /// - 0 => Byte
    /// - 1 => Word
    /// - 2 => Long
    fn from(d: u16) -> Self {
        match d {
            0 => Self::Byte,
            1 => Self::Word,
            2 => Self::Long,
            _ => panic!("[Size::from<u16>] Wrong size : expected 0, 1 or 2, got {}", d),
        }
    }
}

/// ABCD, ADDX, SBCD, SUBX
pub fn register_size_mode_register(opcode: u16) -> (u8, Size, Direction, u8) {
    let regl = bits(opcode, 9, 11) as u8;
    let size = Size::from(bits(opcode, 6, 7));
    let mode = if bits(opcode, 3, 3) != 0 { Direction::MemoryToMemory } else { Direction::RegisterToRegister };
    let regr = bits(opcode, 0, 2) as u8;

    (regl, size, mode, regr)
}

/// CMPM
pub fn register_size_register(opcode: u16) -> (u8, Size, u8) {
    let regl = bits(opcode, 9, 11) as u8;
    let size = Size::from(bits(opcode, 6, 7));
    let regr = bits(opcode, 0, 2) as u8;

    (regl, size, regr)
}

/// EXG
pub fn register_opmode_register(opcode: u16) -> (u8, Direction, u8) {
    let regl = bits(opcode, 9, 11) as u8;
    let opmode = bits(opcode, 3, 7) as u8;
    let regr = bits(opcode, 0, 2) as u8;
    let dir = if opmode == 0b01000 {
        Direction::ExchangeData
    } else if opmode == 0b01001 {
        Direction::ExchangeAddress
    } else {
        Direction::ExchangeDataAddress
    };

    (regl, dir, regr)
}

/// EXT
pub fn opmode_register(opcode: u16) -> (u8, u8) {
    let opmode = bits(opcode, 6, 8) as u8;
    let reg = bits(opcode, 0, 2) as u8;

    (opmode, reg)
}

/// TRAP
pub fn vector(opcode: u16) -> u8 {
    bits(opcode, 0, 3) as u8
}

/// BKPT
pub fn breakpoint(opcode: u16) -> u8 {
    bits(opcode, 0, 2) as u8
}

/// SWAP, UNLK, LINK
pub fn register(opcode: u16) -> u8 {
    bits(opcode, 0, 2) as u8
}

/// MOVE USP
pub fn direction_register(opcode: u16) -> (Direction, u8) {
    let dir = if bits(opcode, 3, 3) != 0 { Direction::UspToRegister } else { Direction::RegisterToUsp };
    let reg = bits(opcode, 0, 2) as u8;

    (dir, reg)
}

/// MOVEQ
pub fn register_data(opcode: u16) -> (u8, i8) {
    let reg = bits(opcode, 9, 11) as u8;
    let data = opcode as i8;

    (reg, data)
}

/// ASr, LSr, ROr, ROXr
pub fn rotation_direction_size_mode_register(opcode: u16) -> (u8, Direction, Size, u8, u8) {
    let count = bits(opcode, 9, 11) as u8;
    let dir = if bits(opcode, 8, 8) != 0 { Direction::Left } else { Direction::Right };
    let size = Size::from(bits(opcode, 6, 7));
    let mode = bits(opcode, 5, 5) as u8;
    let reg = bits(opcode, 0, 2) as u8;

    (count, dir, size, mode, reg)
}
