// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ISA definition and the fetcher dispatch table.

use std::marker::PhantomData;

use crate::Emulator;
use crate::decoder::DECODER;
use crate::interpreter::FetchResult;
use crate::memory::Memory;

/// ISA of the M68000.
///
/// Converts a raw opcode to this enum using the [from](Self::from) method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Isa {
    Unknown,
    Abcd,
    Add,
    Adda,
    Addi,
    Addq,
    Addx,
    And,
    Andi,
    Andiccr,
    Andisr,
    Asm,
    Asr,
    Bcc,
    Bchg,
    Bclr,
    Bkpt,
    Bra,
    Bset,
    Bsr,
    Btst,
    Chk,
    Clr,
    Cmp,
    Cmpa,
    Cmpi,
    Cmpm,
    Dbcc,
    Divs,
    Divu,
    Eor,
    Eori,
    Eoriccr,
    Eorisr,
    Exg,
    Ext,
    Illegal,
    Jmp,
    Jsr,
    Lea,
    LineA,
    LineF,
    Link,
    Lsm,
    Lsr,
    Move,
    Movea,
    Moveccr,
    Movefsr,
    Movesr,
    Moveusp,
    Movem,
    Movep,
    Moveq,
    Muls,
    Mulu,
    Nbcd,
    Neg,
    Negx,
    Nop,
    Not,
    Or,
    Ori,
    Oriccr,
    Orisr,
    Pea,
    Reset,
    Rom,
    Ror,
    Roxm,
    Roxr,
    Rte,
    Rtr,
    Rts,
    Sbcd,
    Scc,
    Stop,
    Sub,
    Suba,
    Subi,
    Subq,
    Subx,
    Swap,
    Tas,
    Trap,
    Trapv,
    Tst,
    Unlk,
    _Size,
}

impl Isa {
    /// Returns true for the instructions that trap with a privilege
    /// violation when executed in user mode.
    pub const fn is_privileged(self) -> bool {
        matches!(self,
            Self::Andisr |
            Self::Eorisr |
            Self::Orisr |
            Self::Movesr |
            Self::Moveusp |
            Self::Reset |
            Self::Rte |
            Self::Stop
        )
    }
}

impl From<u16> for Isa {
    /// Returns the instruction represented by the given opcode.
    fn from(opcode: u16) -> Self {
        DECODER[opcode as usize]
    }
}

pub(crate) struct Fetchers<'m, M: Memory + ?Sized> {
    _m: PhantomData<&'m mut M>,
}

impl<'m, M: Memory + ?Sized> Fetchers<'m, M> {
    /// The fetcher of each instruction: decodes the operands at PC and
    /// executes. Index it with the [Isa] of the current opcode.
    pub(crate) const FETCH: [fn(&mut Emulator<'m, M>) -> FetchResult; Isa::_Size as usize] = [
        Emulator::fetch_unknown_instruction,
        Emulator::fetch_abcd,
        Emulator::fetch_add,
        Emulator::fetch_adda,
        Emulator::fetch_addi,
        Emulator::fetch_addq,
        Emulator::fetch_addx,
        Emulator::fetch_and,
        Emulator::fetch_andi,
        Emulator::fetch_andiccr,
        Emulator::fetch_andisr,
        Emulator::fetch_asm,
        Emulator::fetch_asr,
        Emulator::fetch_bcc,
        Emulator::fetch_bchg,
        Emulator::fetch_bclr,
        Emulator::fetch_bkpt,
        Emulator::fetch_bra,
        Emulator::fetch_bset,
        Emulator::fetch_bsr,
        Emulator::fetch_btst,
        Emulator::fetch_chk,
        Emulator::fetch_clr,
        Emulator::fetch_cmp,
        Emulator::fetch_cmpa,
        Emulator::fetch_cmpi,
        Emulator::fetch_cmpm,
        Emulator::fetch_dbcc,
        Emulator::fetch_divs,
        Emulator::fetch_divu,
        Emulator::fetch_eor,
        Emulator::fetch_eori,
        Emulator::fetch_eoriccr,
        Emulator::fetch_eorisr,
        Emulator::fetch_exg,
        Emulator::fetch_ext,
        Emulator::fetch_illegal,
        Emulator::fetch_jmp,
        Emulator::fetch_jsr,
        Emulator::fetch_lea,
        Emulator::fetch_linea,
        Emulator::fetch_linef,
        Emulator::fetch_link,
        Emulator::fetch_lsm,
        Emulator::fetch_lsr,
        Emulator::fetch_move,
        Emulator::fetch_movea,
        Emulator::fetch_moveccr,
        Emulator::fetch_movefsr,
        Emulator::fetch_movesr,
        Emulator::fetch_moveusp,
        Emulator::fetch_movem,
        Emulator::fetch_movep,
        Emulator::fetch_moveq,
        Emulator::fetch_muls,
        Emulator::fetch_mulu,
        Emulator::fetch_nbcd,
        Emulator::fetch_neg,
        Emulator::fetch_negx,
        Emulator::fetch_nop,
        Emulator::fetch_not,
        Emulator::fetch_or,
        Emulator::fetch_ori,
        Emulator::fetch_oriccr,
        Emulator::fetch_orisr,
        Emulator::fetch_pea,
        Emulator::fetch_reset,
        Emulator::fetch_rom,
        Emulator::fetch_ror,
        Emulator::fetch_roxm,
        Emulator::fetch_roxr,
        Emulator::fetch_rte,
        Emulator::fetch_rtr,
        Emulator::fetch_rts,
        Emulator::fetch_sbcd,
        Emulator::fetch_scc,
        Emulator::fetch_stop,
        Emulator::fetch_sub,
        Emulator::fetch_suba,
        Emulator::fetch_subi,
        Emulator::fetch_subq,
        Emulator::fetch_subx,
        Emulator::fetch_swap,
        Emulator::fetch_tas,
        Emulator::fetch_trap,
        Emulator::fetch_trapv,
        Emulator::fetch_tst,
        Emulator::fetch_unlk,
    ];
}
