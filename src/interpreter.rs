// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction decoding and execution.
//!
//! Each instruction has a `fetch_*` method that decodes the operands (reading
//! extension words at PC) and an `execute_*` method that performs the
//! operation. Faults return `Err(vector)` and are turned into emulated
//! exceptions by [Emulator::step](crate::Emulator::step).

use crate::{Condition, Emulator};
use crate::addressing_modes::{AddressingMode, EffectiveAddress};
use crate::exception::{ACCESS_ERROR, Vector};
use crate::instruction::{self, Direction, Size};
use crate::memory::Memory;
use crate::utils::{bits, IsEven};

pub(super) const SR_UPPER_MASK: u16 = 0xA700;
pub(super) const CCR_MASK: u16 = 0x001F;
pub(super) const SIGN_BIT_8: u8 = 0x80;
pub(super) const SIGN_BIT_16: u16 = 0x8000;
pub(super) const SIGN_BIT_32: u32 = 0x8000_0000;

/// Ok on success, an exception vector number on error. Alias for `Result<(), u8>`.
pub(crate) type FetchResult = Result<(), u8>;

impl<M: Memory + ?Sized> Emulator<'_, M> {
    #[must_use]
    const fn check_supervisor(&self) -> Result<(), u8> {
        if self.regs.sr.s {
            Ok(())
        } else {
            Err(Vector::PrivilegeViolation as u8)
        }
    }

    /// Returns the word at PC then advances PC by 2.
    #[must_use]
    pub(crate) fn get_next_word(&mut self) -> Result<u16, u8> {
        let fc = self.regs.program_space();
        let data = self.mem.get_word(self.regs.pc.even()?, fc).ok_or(ACCESS_ERROR);
        self.regs.pc = self.regs.pc.wrapping_add(2);
        data
    }

    /// Returns the long at PC then advances PC by 4.
    #[must_use]
    pub(crate) fn get_next_long(&mut self) -> Result<u32, u8> {
        let fc = self.regs.program_space();
        let data = self.mem.get_long(self.regs.pc.even()?, fc).ok_or(ACCESS_ERROR);
        self.regs.pc = self.regs.pc.wrapping_add(4);
        data
    }

    #[must_use]
    pub(super) fn get_byte(&mut self, ea: &mut EffectiveAddress) -> Result<u8, u8> {
        match ea.mode {
            AddressingMode::Drd(reg) => Ok(self.regs.d[reg as usize] as u8),
            AddressingMode::Immediate(imm) => Ok(imm as u8),
            _ => {
                let addr = self.get_effective_address(ea).ok_or(ACCESS_ERROR)?;
                self.mem.get_byte(addr, self.regs.data_space()).ok_or(ACCESS_ERROR)
            },
        }
    }

    #[must_use]
    pub(super) fn get_word(&mut self, ea: &mut EffectiveAddress) -> Result<u16, u8> {
        match ea.mode {
            AddressingMode::Drd(reg) => Ok(self.regs.d[reg as usize] as u16),
            AddressingMode::Ard(reg) => Ok(self.regs.a(reg) as u16),
            AddressingMode::Immediate(imm) => Ok(imm as u16),
            _ => {
                let addr = self.get_effective_address(ea).ok_or(ACCESS_ERROR)?;
                self.mem.get_word(addr.even()?, self.regs.data_space()).ok_or(ACCESS_ERROR)
            },
        }
    }

    #[must_use]
    pub(super) fn get_long(&mut self, ea: &mut EffectiveAddress) -> Result<u32, u8> {
        match ea.mode {
            AddressingMode::Drd(reg) => Ok(self.regs.d[reg as usize]),
            AddressingMode::Ard(reg) => Ok(self.regs.a(reg)),
            AddressingMode::Immediate(imm) => Ok(imm),
            _ => {
                let addr = self.get_effective_address(ea).ok_or(ACCESS_ERROR)?;
                self.mem.get_long(addr.even()?, self.regs.data_space()).ok_or(ACCESS_ERROR)
            },
        }
    }

    #[must_use]
    pub(super) fn set_byte(&mut self, ea: &mut EffectiveAddress, value: u8) -> FetchResult {
        match ea.mode {
            AddressingMode::Drd(reg) => Ok(self.regs.d_byte(reg, value)),
            _ => {
                let addr = self.get_effective_address(ea).ok_or(ACCESS_ERROR)?;
                self.mem.put_byte(addr, value, self.regs.data_space()).ok_or(ACCESS_ERROR)
            },
        }
    }

    #[must_use]
    pub(super) fn set_word(&mut self, ea: &mut EffectiveAddress, value: u16) -> FetchResult {
        match ea.mode {
            AddressingMode::Drd(reg) => Ok(self.regs.d_word(reg, value)),
            AddressingMode::Ard(reg) => Ok(*self.regs.a_mut(reg) = value as i16 as u32),
            _ => {
                let addr = self.get_effective_address(ea).ok_or(ACCESS_ERROR)?;
                self.mem.put_word(addr.even()?, value, self.regs.data_space()).ok_or(ACCESS_ERROR)
            },
        }
    }

    #[must_use]
    pub(super) fn set_long(&mut self, ea: &mut EffectiveAddress, value: u32) -> FetchResult {
        match ea.mode {
            AddressingMode::Drd(reg) => Ok(self.regs.d[reg as usize] = value),
            AddressingMode::Ard(reg) => Ok(*self.regs.a_mut(reg) = value),
            _ => {
                let addr = self.get_effective_address(ea).ok_or(ACCESS_ERROR)?;
                self.mem.put_long(addr.even()?, value, self.regs.data_space()).ok_or(ACCESS_ERROR)
            },
        }
    }

    /// Pops the 16-bits value from the stack.
    #[must_use]
    pub(super) fn pop_word(&mut self) -> Result<u16, u8> {
        let addr = self.ariwpo(7, Size::Word);
        self.mem.get_word(addr.even()?, self.regs.data_space()).ok_or(ACCESS_ERROR)
    }

    /// Pops the 32-bits value from the stack.
    #[must_use]
    pub(super) fn pop_long(&mut self) -> Result<u32, u8> {
        let addr = self.ariwpo(7, Size::Long);
        self.mem.get_long(addr.even()?, self.regs.data_space()).ok_or(ACCESS_ERROR)
    }

    /// Pushes the given 16-bits value on the stack.
    #[must_use]
    pub(super) fn push_word(&mut self, value: u16) -> FetchResult {
        let addr = self.ariwpr(7, Size::Word);
        self.mem.put_word(addr.even()?, value, self.regs.data_space()).ok_or(ACCESS_ERROR)
    }

    /// Pushes the given 32-bits value on the stack.
    #[must_use]
    pub(crate) fn push_long(&mut self, value: u32) -> FetchResult {
        let addr = self.ariwpr(7, Size::Long);
        self.mem.put_long(addr.even()?, value, self.regs.data_space()).ok_or(ACCESS_ERROR)
    }

    pub(crate) fn fetch_unknown_instruction(&mut self) -> FetchResult {
        self.execute_unknown_instruction()
    }

    pub(crate) fn fetch_abcd(&mut self) -> FetchResult {
        let (rx, _, mode, ry) = instruction::register_size_mode_register(self.opcode);
        self.execute_abcd(rx, mode, ry)
    }

    pub(crate) fn fetch_add(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_add(reg, dir, size, am)
    }

    pub(crate) fn fetch_adda(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let size = Size::from_bit(bits(opcode, 8, 8));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_adda(reg, size, am)
    }

    pub(crate) fn fetch_addi(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (size, am, imm) = self.size_effective_address_immediate(opcode)?;
        self.execute_addi(size, am, imm)
    }

    pub(crate) fn fetch_addq(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let imm = bits(opcode, 9, 11) as u8;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_addq(imm, size, am)
    }

    pub(crate) fn fetch_addx(&mut self) -> FetchResult {
        let (rx, size, mode, ry) = instruction::register_size_mode_register(self.opcode);
        self.execute_addx(rx, size, mode, ry)
    }

    pub(crate) fn fetch_and(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_and(reg, dir, size, am)
    }

    pub(crate) fn fetch_andi(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (size, am, imm) = self.size_effective_address_immediate(opcode)?;
        self.execute_andi(size, am, imm)
    }

    pub(crate) fn fetch_andiccr(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_andiccr(imm)
    }

    pub(crate) fn fetch_andisr(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_andisr(imm)
    }

    pub(crate) fn fetch_asm(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let dir = shift_direction(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_asm(dir, am)
    }

    pub(crate) fn fetch_asr(&mut self) -> FetchResult {
        let (rot, dir, size, mode, reg) = instruction::rotation_direction_size_mode_register(self.opcode);
        self.execute_asr(rot, dir, size, mode, reg)
    }

    pub(crate) fn fetch_bcc(&mut self) -> FetchResult {
        let pc = self.regs.pc;
        let opcode = self.opcode;
        let condition = bits(opcode, 8, 11) as u8;
        let disp = self.branch_displacement(opcode)?;
        self.execute_bcc(pc, condition, disp)
    }

    pub(crate) fn fetch_bchg(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (am, count) = self.effective_address_count(opcode)?;
        self.execute_bchg(am, count)
    }

    pub(crate) fn fetch_bclr(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (am, count) = self.effective_address_count(opcode)?;
        self.execute_bclr(am, count)
    }

    /// Suspends execution at the breakpoint: PC is rewound to address the
    /// BKPT instruction itself and the condition becomes [Condition::Bkpt].
    pub(crate) fn fetch_bkpt(&mut self) -> FetchResult {
        let n = instruction::breakpoint(self.opcode);
        self.regs.pc = self.regs.pc.wrapping_sub(2);
        self.transition(Condition::Bkpt(n));
        Ok(())
    }

    pub(crate) fn fetch_bra(&mut self) -> FetchResult {
        let pc = self.regs.pc;
        let opcode = self.opcode;
        let disp = self.branch_displacement(opcode)?;
        self.execute_bra(pc, disp)
    }

    pub(crate) fn fetch_bset(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (am, count) = self.effective_address_count(opcode)?;
        self.execute_bset(am, count)
    }

    pub(crate) fn fetch_bsr(&mut self) -> FetchResult {
        let pc = self.regs.pc;
        let opcode = self.opcode;
        let disp = self.branch_displacement(opcode)?;
        self.execute_bsr(pc, disp)
    }

    pub(crate) fn fetch_btst(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (am, count) = self.effective_address_count(opcode)?;
        self.execute_btst(am, count)
    }

    pub(crate) fn fetch_chk(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_chk(reg, am)
    }

    pub(crate) fn fetch_clr(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_clr(size, am)
    }

    pub(crate) fn fetch_cmp(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (reg, _, size) = register_direction_size(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_cmp(reg, size, am)
    }

    pub(crate) fn fetch_cmpa(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let size = Size::from_bit(bits(opcode, 8, 8));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_cmpa(reg, size, am)
    }

    pub(crate) fn fetch_cmpi(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (size, am, imm) = self.size_effective_address_immediate(opcode)?;
        self.execute_cmpi(size, am, imm)
    }

    pub(crate) fn fetch_cmpm(&mut self) -> FetchResult {
        let (ax, size, ay) = instruction::register_size_register(self.opcode);
        self.execute_cmpm(ax, size, ay)
    }

    pub(crate) fn fetch_dbcc(&mut self) -> FetchResult {
        let pc = self.regs.pc;
        let opcode = self.opcode;
        let cc = bits(opcode, 8, 11) as u8;
        let reg = bits(opcode, 0, 2) as u8;
        let disp = self.get_next_word()? as i16;
        self.execute_dbcc(pc, cc, reg, disp)
    }

    pub(crate) fn fetch_divs(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_divs(reg, am)
    }

    pub(crate) fn fetch_divu(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_divu(reg, am)
    }

    pub(crate) fn fetch_eor(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (reg, _, size) = register_direction_size(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_eor(reg, size, am)
    }

    pub(crate) fn fetch_eori(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (size, am, imm) = self.size_effective_address_immediate(opcode)?;
        self.execute_eori(size, am, imm)
    }

    pub(crate) fn fetch_eoriccr(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_eoriccr(imm)
    }

    pub(crate) fn fetch_eorisr(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_eorisr(imm)
    }

    pub(crate) fn fetch_exg(&mut self) -> FetchResult {
        let (rx, mode, ry) = instruction::register_opmode_register(self.opcode);
        self.execute_exg(rx, mode, ry)
    }

    pub(crate) fn fetch_ext(&mut self) -> FetchResult {
        let (mode, reg) = instruction::opmode_register(self.opcode);
        self.execute_ext(mode, reg)
    }

    pub(crate) fn fetch_illegal(&mut self) -> FetchResult {
        self.execute_illegal()
    }

    pub(crate) fn fetch_jmp(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, None)?;
        self.execute_jmp(am)
    }

    pub(crate) fn fetch_jsr(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, None)?;
        self.execute_jsr(am)
    }

    pub(crate) fn fetch_lea(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Long))?;
        self.execute_lea(reg, am)
    }

    pub(crate) fn fetch_linea(&mut self) -> FetchResult {
        Err(Vector::LineAEmulator as u8)
    }

    pub(crate) fn fetch_linef(&mut self) -> FetchResult {
        Err(Vector::LineFEmulator as u8)
    }

    pub(crate) fn fetch_link(&mut self) -> FetchResult {
        let reg = instruction::register(self.opcode);
        let disp = self.get_next_word()? as i16;
        self.execute_link(reg, disp)
    }

    pub(crate) fn fetch_lsm(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let dir = shift_direction(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_lsm(dir, am)
    }

    pub(crate) fn fetch_lsr(&mut self) -> FetchResult {
        let (rot, dir, size, mode, reg) = instruction::rotation_direction_size_mode_register(self.opcode);
        self.execute_lsr(rot, dir, size, mode, reg)
    }

    pub(crate) fn fetch_move(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from_move(bits(opcode, 12, 13));

        // The source operand's extension words come first.
        let amsrc = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        let amdst = self.addressing_mode(bits(opcode, 6, 8), bits(opcode, 9, 11) as u8, Some(size))?;

        self.execute_move(size, amdst, amsrc)
    }

    pub(crate) fn fetch_movea(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from_move(bits(opcode, 12, 13));
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_movea(size, reg, am)
    }

    pub(crate) fn fetch_moveccr(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_moveccr(am)
    }

    pub(crate) fn fetch_movefsr(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_movefsr(am)
    }

    pub(crate) fn fetch_movesr(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_movesr(am)
    }

    pub(crate) fn fetch_moveusp(&mut self) -> FetchResult {
        let (dir, reg) = instruction::direction_register(self.opcode);
        self.execute_moveusp(dir, reg)
    }

    pub(crate) fn fetch_movem(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let list = self.get_next_word()?;
        let dir = if bits(opcode, 10, 10) != 0 { Direction::MemoryToRegister } else { Direction::RegisterToMemory };
        let size = Size::from_bit(bits(opcode, 6, 6));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_movem(dir, size, am, list)
    }

    pub(crate) fn fetch_movep(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let data = bits(opcode, 9, 11) as u8;
        let dir = if bits(opcode, 7, 7) != 0 { Direction::RegisterToMemory } else { Direction::MemoryToRegister };
        let size = if bits(opcode, 6, 6) != 0 { Size::Long } else { Size::Word };
        let addr = bits(opcode, 0, 2) as u8;
        let disp = self.get_next_word()? as i16;
        self.execute_movep(data, dir, size, addr, disp)
    }

    pub(crate) fn fetch_moveq(&mut self) -> FetchResult {
        let (reg, data) = instruction::register_data(self.opcode);
        self.execute_moveq(reg, data)
    }

    pub(crate) fn fetch_muls(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_muls(reg, am)
    }

    pub(crate) fn fetch_mulu(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_mulu(reg, am)
    }

    pub(crate) fn fetch_nbcd(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Byte))?;
        self.execute_nbcd(am)
    }

    pub(crate) fn fetch_neg(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_neg(size, am)
    }

    pub(crate) fn fetch_negx(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_negx(size, am)
    }

    pub(crate) fn fetch_nop(&mut self) -> FetchResult {
        Ok(())
    }

    pub(crate) fn fetch_not(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_not(size, am)
    }

    pub(crate) fn fetch_or(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_or(reg, dir, size, am)
    }

    pub(crate) fn fetch_ori(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (size, am, imm) = self.size_effective_address_immediate(opcode)?;
        self.execute_ori(size, am, imm)
    }

    pub(crate) fn fetch_oriccr(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_oriccr(imm)
    }

    pub(crate) fn fetch_orisr(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_orisr(imm)
    }

    pub(crate) fn fetch_pea(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Long))?;
        self.execute_pea(am)
    }

    pub(crate) fn fetch_reset(&mut self) -> FetchResult {
        self.execute_reset()
    }

    pub(crate) fn fetch_rom(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let dir = shift_direction(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_rom(dir, am)
    }

    pub(crate) fn fetch_ror(&mut self) -> FetchResult {
        let (rot, dir, size, mode, reg) = instruction::rotation_direction_size_mode_register(self.opcode);
        self.execute_ror(rot, dir, size, mode, reg)
    }

    pub(crate) fn fetch_roxm(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let dir = shift_direction(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Word))?;
        self.execute_roxm(dir, am)
    }

    pub(crate) fn fetch_roxr(&mut self) -> FetchResult {
        let (rot, dir, size, mode, reg) = instruction::rotation_direction_size_mode_register(self.opcode);
        self.execute_roxr(rot, dir, size, mode, reg)
    }

    pub(crate) fn fetch_rte(&mut self) -> FetchResult {
        self.execute_rte()
    }

    pub(crate) fn fetch_rtr(&mut self) -> FetchResult {
        self.execute_rtr()
    }

    pub(crate) fn fetch_rts(&mut self) -> FetchResult {
        self.execute_rts()
    }

    pub(crate) fn fetch_sbcd(&mut self) -> FetchResult {
        let (ry, _, mode, rx) = instruction::register_size_mode_register(self.opcode);
        self.execute_sbcd(ry, mode, rx)
    }

    pub(crate) fn fetch_scc(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let cc = bits(opcode, 8, 11) as u8;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Byte))?;
        self.execute_scc(cc, am)
    }

    pub(crate) fn fetch_stop(&mut self) -> FetchResult {
        let imm = self.get_next_word()?;
        self.execute_stop(imm)
    }

    pub(crate) fn fetch_sub(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_sub(reg, dir, size, am)
    }

    pub(crate) fn fetch_suba(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let reg = bits(opcode, 9, 11) as u8;
        let size = Size::from_bit(bits(opcode, 8, 8));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_suba(reg, size, am)
    }

    pub(crate) fn fetch_subi(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let (size, am, imm) = self.size_effective_address_immediate(opcode)?;
        self.execute_subi(size, am, imm)
    }

    pub(crate) fn fetch_subq(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let imm = bits(opcode, 9, 11) as u8;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_subq(imm, size, am)
    }

    pub(crate) fn fetch_subx(&mut self) -> FetchResult {
        let (ry, size, mode, rx) = instruction::register_size_mode_register(self.opcode);
        self.execute_subx(ry, size, mode, rx)
    }

    pub(crate) fn fetch_swap(&mut self) -> FetchResult {
        let reg = instruction::register(self.opcode);
        self.execute_swap(reg)
    }

    pub(crate) fn fetch_tas(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(Size::Byte))?;
        self.execute_tas(am)
    }

    pub(crate) fn fetch_trap(&mut self) -> FetchResult {
        let vector = instruction::vector(self.opcode);
        self.execute_trap(vector)
    }

    pub(crate) fn fetch_trapv(&mut self) -> FetchResult {
        self.execute_trapv()
    }

    pub(crate) fn fetch_tst(&mut self) -> FetchResult {
        let opcode = self.opcode;
        let size = Size::from(bits(opcode, 6, 7));
        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        self.execute_tst(size, am)
    }

    pub(crate) fn fetch_unlk(&mut self) -> FetchResult {
        let reg = instruction::register(self.opcode);
        self.execute_unlk(reg)
    }

    /// ADDI, ANDI, CMPI, EORI, ORI, SUBI: the immediate extension words come
    /// before the effective address extension words.
    fn size_effective_address_immediate(&mut self, opcode: u16) -> Result<(Size, AddressingMode, u32), u8> {
        let size = Size::from(bits(opcode, 6, 7));

        let imm = if size.is_long() {
            self.get_next_long()?
        } else {
            self.get_next_word()? as u32
        };

        let am = self.addressing_mode(bits(opcode, 3, 5), bits(opcode, 0, 2) as u8, Some(size))?;
        Ok((size, am, imm))
    }

    /// BCHG, BCLR, BSET, BTST: static bit numbers live in an extension word,
    /// dynamic ones in a data register selected by the opcode.
    fn effective_address_count(&mut self, opcode: u16) -> Result<(AddressingMode, u8), u8> {
        let count = if bits(opcode, 8, 8) != 0 {
            bits(opcode, 9, 11) as u8
        } else {
            self.get_next_word()? as u8
        };

        let eamode = bits(opcode, 3, 5);
        let size = if eamode == 0 { Size::Long } else { Size::Byte };
        let am = self.addressing_mode(eamode, bits(opcode, 0, 2) as u8, Some(size))?;
        Ok((am, count))
    }

    /// BRA, BSR, Bcc: a zero 8-bits displacement selects a word displacement
    /// in the extension word.
    fn branch_displacement(&mut self, opcode: u16) -> Result<i16, u8> {
        let disp = opcode as i8 as i16;
        if disp == 0 {
            Ok(self.get_next_word()? as i16)
        } else {
            Ok(disp)
        }
    }

    pub(super) fn execute_unknown_instruction(&self) -> FetchResult {
        Err(Vector::IllegalInstruction as u8)
    }

    pub(super) fn execute_abcd(&mut self, rx: u8, mode: Direction, ry: u8) -> FetchResult {
        let fc = self.regs.data_space();
        let (src, dst) = if mode == Direction::MemoryToMemory {
            let src_addr = self.ariwpr(ry, Size::Byte);
            let dst_addr = self.ariwpr(rx, Size::Byte);
            (self.mem.get_byte(src_addr, fc).ok_or(ACCESS_ERROR)?, self.mem.get_byte(dst_addr, fc).ok_or(ACCESS_ERROR)?)
        } else {
            (self.regs.d[ry as usize] as u8, self.regs.d[rx as usize] as u8)
        };

        let low = (src & 0x0F) + (dst & 0x0F) + self.regs.sr.x as u8;
        let high = (src >> 4 & 0x0F) + (dst >> 4 & 0x0F) + (low > 9) as u8;
        let res = (if high > 9 { high - 10 } else { high }) << 4 |
                      if low > 9 { low - 10 } else { low };

        if res != 0 { self.regs.sr.z = false; }
        self.regs.sr.c = high > 9;
        self.regs.sr.x = self.regs.sr.c;

        if mode == Direction::MemoryToMemory {
            self.mem.put_byte(self.regs.a(rx), res, fc).ok_or(ACCESS_ERROR)
        } else {
            Ok(self.regs.d_byte(rx, res))
        }
    }

    pub(super) fn execute_add(&mut self, reg: u8, dir: Direction, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg as usize] as u8, self.get_byte(&mut ea)?)
                } else {
                    (self.get_byte(&mut ea)?, self.regs.d[reg as usize] as u8)
                };

                let (res, v) = (src as i8).overflowing_add(dst as i8);
                let (_, c) = src.overflowing_add(dst);

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res as u8)?;
                } else {
                    self.regs.d_byte(reg, res as u8);
                }
            },
            Size::Word => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg as usize] as u16, self.get_word(&mut ea)?)
                } else {
                    (self.get_word(&mut ea)?, self.regs.d[reg as usize] as u16)
                };

                let (res, v) = (src as i16).overflowing_add(dst as i16);
                let (_, c) = src.overflowing_add(dst);

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res as u16)?;
                } else {
                    self.regs.d_word(reg, res as u16);
                }
            },
            Size::Long => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg as usize], self.get_long(&mut ea)?)
                } else {
                    (self.get_long(&mut ea)?, self.regs.d[reg as usize])
                };

                let (res, v) = (src as i32).overflowing_add(dst as i32);
                let (_, c) = src.overflowing_add(dst);

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res as u32)?;
                } else {
                    self.regs.d[reg as usize] = res as u32;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_adda(&mut self, reg: u8, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        let src = if size == Size::Word {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        let areg = self.regs.a_mut(reg);
        *areg = areg.wrapping_add(src);

        Ok(())
    }

    pub(super) fn execute_addi(&mut self, size: Size, am: AddressingMode, imm: u32) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let (res, v) = (data as i8).overflowing_add(imm as i8);
                let (_, c) = data.overflowing_add(imm as u8);
                self.set_byte(&mut ea, res as u8)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let (res, v) = (data as i16).overflowing_add(imm as i16);
                let (_, c) = data.overflowing_add(imm as u16);
                self.set_word(&mut ea, res as u16)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let (res, v) = (data as i32).overflowing_add(imm as i32);
                let (_, c) = data.overflowing_add(imm);
                self.set_long(&mut ea, res as u32)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_addq(&mut self, imm: u8, size: Size, am: AddressingMode) -> FetchResult {
        // ADDQ to an address register operates on the whole register and
        // leaves the flags untouched.
        if let AddressingMode::Ard(reg) = am {
            let areg = self.regs.a_mut(reg);
            *areg = areg.wrapping_add(imm as u32);
            return Ok(());
        }

        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let (res, v) = (data as i8).overflowing_add(imm as i8);
                let (_, c) = data.overflowing_add(imm);
                self.set_byte(&mut ea, res as u8)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let (res, v) = (data as i16).overflowing_add(imm as i16);
                let (_, c) = data.overflowing_add(imm as u16);
                self.set_word(&mut ea, res as u16)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let (res, v) = (data as i32).overflowing_add(imm as i32);
                let (_, c) = data.overflowing_add(imm as u32);
                self.set_long(&mut ea, res as u32)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_addx(&mut self, rx: u8, size: Size, mode: Direction, ry: u8) -> FetchResult {
        let fc = self.regs.data_space();

        match size {
            Size::Byte => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.ariwpr(ry, size);
                    let dst_addr = self.ariwpr(rx, size);
                    (self.mem.get_byte(src_addr, fc).ok_or(ACCESS_ERROR)?, self.mem.get_byte(dst_addr, fc).ok_or(ACCESS_ERROR)?)
                } else {
                    (self.regs.d[ry as usize] as u8, self.regs.d[rx as usize] as u8)
                };

                let (res, v, c) = extended_add_8(src, dst, self.regs.sr.x);

                self.regs.sr.x = c;
                self.regs.sr.n = res & SIGN_BIT_8 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if mode == Direction::MemoryToMemory {
                    self.mem.put_byte(self.regs.a(rx), res, fc).ok_or(ACCESS_ERROR)
                } else {
                    Ok(self.regs.d_byte(rx, res))
                }
            },
            Size::Word => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.ariwpr(ry, size);
                    let dst_addr = self.ariwpr(rx, size);
                    (self.mem.get_word(src_addr.even()?, fc).ok_or(ACCESS_ERROR)?, self.mem.get_word(dst_addr.even()?, fc).ok_or(ACCESS_ERROR)?)
                } else {
                    (self.regs.d[ry as usize] as u16, self.regs.d[rx as usize] as u16)
                };

                let (res, v, c) = extended_add_16(src, dst, self.regs.sr.x);

                self.regs.sr.x = c;
                self.regs.sr.n = res & SIGN_BIT_16 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if mode == Direction::MemoryToMemory {
                    self.mem.put_word(self.regs.a(rx), res, fc).ok_or(ACCESS_ERROR)
                } else {
                    Ok(self.regs.d_word(rx, res))
                }
            },
            Size::Long => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.ariwpr(ry, size);
                    let dst_addr = self.ariwpr(rx, size);
                    (self.mem.get_long(src_addr.even()?, fc).ok_or(ACCESS_ERROR)?, self.mem.get_long(dst_addr.even()?, fc).ok_or(ACCESS_ERROR)?)
                } else {
                    (self.regs.d[ry as usize], self.regs.d[rx as usize])
                };

                let (res, v, c) = extended_add_32(src, dst, self.regs.sr.x);

                self.regs.sr.x = c;
                self.regs.sr.n = res & SIGN_BIT_32 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if mode == Direction::MemoryToMemory {
                    self.mem.put_long(self.regs.a(rx), res, fc).ok_or(ACCESS_ERROR)
                } else {
                    Ok(self.regs.d[rx as usize] = res)
                }
            },
        }
    }

    pub(super) fn execute_and(&mut self, reg: u8, dir: Direction, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.regs.d[reg as usize] as u8;
                let dst = self.get_byte(&mut ea)?;

                let res = src & dst;

                self.regs.sr.n = res & SIGN_BIT_8 != 0;
                self.regs.sr.z = res == 0;

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res)?;
                } else {
                    self.regs.d_byte(reg, res);
                }
            },
            Size::Word => {
                let src = self.regs.d[reg as usize] as u16;
                let dst = self.get_word(&mut ea)?;

                let res = src & dst;

                self.regs.sr.n = res & SIGN_BIT_16 != 0;
                self.regs.sr.z = res == 0;

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res)?;
                } else {
                    self.regs.d_word(reg, res);
                }
            },
            Size::Long => {
                let src = self.regs.d[reg as usize];
                let dst = self.get_long(&mut ea)?;

                let res = src & dst;

                self.regs.sr.n = res & SIGN_BIT_32 != 0;
                self.regs.sr.z = res == 0;

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res)?;
                } else {
                    self.regs.d[reg as usize] = res;
                }
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_andi(&mut self, size: Size, am: AddressingMode, imm: u32) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)? & imm as u8;
                self.set_byte(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_8 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)? & imm as u16;
                self.set_word(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_16 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)? & imm;
                self.set_long(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_32 != 0;
                self.regs.sr.z = data == 0;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_andiccr(&mut self, imm: u16) -> FetchResult {
        self.regs.sr &= SR_UPPER_MASK | imm;

        Ok(())
    }

    pub(super) fn execute_andisr(&mut self, imm: u16) -> FetchResult {
        self.check_supervisor()?;

        self.regs.sr &= imm;
        Ok(())
    }

    pub(super) fn execute_asm(&mut self, dir: Direction, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)? as i16;
        let sign = data & SIGN_BIT_16 as i16;

        if dir == Direction::Left {
            data <<= 1;
            self.regs.sr.x = sign != 0;
            self.regs.sr.v = sign ^ data & SIGN_BIT_16 as i16 != 0;
            self.regs.sr.c = sign != 0;
        } else {
            let bit = data & 1;
            data >>= 1;
            self.regs.sr.x = bit != 0;
            self.regs.sr.v = false;
            self.regs.sr.c = bit != 0;
        }

        self.regs.sr.n = data < 0;
        self.regs.sr.z = data == 0;

        self.set_word(&mut ea, data as u16)
    }

    pub(super) fn execute_asr(&mut self, rot: u8, dir: Direction, size: Size, mode: u8, reg: u8) -> FetchResult {
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        let shift_count = if mode == 1 {
            (self.regs.d[rot as usize] % 64) as u8
        } else if rot == 0 {
            8
        } else {
            rot
        };

        let mask = size.msb();
        let mut data = self.regs.d[reg as usize] & size.mask();

        if dir == Direction::Left {
            for _ in 0..shift_count {
                let sign = data & mask;
                data <<= 1;
                self.regs.sr.x = sign != 0;
                self.regs.sr.c = sign != 0;
                if sign ^ data & mask != 0 {
                    self.regs.sr.v = true;
                }
            }
        } else {
            let sign = data & mask;
            for _ in 0..shift_count {
                let bit = data & 1;
                data >>= 1;
                data |= sign;
                self.regs.sr.x = bit != 0;
                self.regs.sr.c = bit != 0;
            }
        }

        self.regs.sr.n = data & mask != 0;
        self.regs.sr.z = data & size.mask() == 0;

        match size {
            Size::Byte => self.regs.d_byte(reg, data as u8),
            Size::Word => self.regs.d_word(reg, data as u16),
            Size::Long => self.regs.d[reg as usize] = data,
        }

        Ok(())
    }

    pub(super) fn execute_bcc(&mut self, pc: u32, condition: u8, disp: i16) -> FetchResult {
        if self.regs.sr.condition(condition) {
            self.regs.pc = pc.wrapping_add(disp as u32);
        }

        Ok(())
    }

    pub(super) fn execute_bchg(&mut self, am: AddressingMode, mut count: u8) -> FetchResult {
        if bits(self.opcode, 8, 8) != 0 {
            count = self.regs.d[count as usize] as u8;
        }

        if let AddressingMode::Drd(reg) = am {
            count %= 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << count == 0;
            self.regs.d[reg as usize] ^= 1 << count;
        } else {
            // Memory is byte only.
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            count %= 8;
            let mut data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << count == 0;
            data ^= 1 << count;
            self.set_byte(&mut ea, data)?;
        }

        Ok(())
    }

    pub(super) fn execute_bclr(&mut self, am: AddressingMode, mut count: u8) -> FetchResult {
        if bits(self.opcode, 8, 8) != 0 {
            count = self.regs.d[count as usize] as u8;
        }

        if let AddressingMode::Drd(reg) = am {
            count %= 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << count == 0;
            self.regs.d[reg as usize] &= !(1 << count);
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            count %= 8;
            let mut data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << count == 0;
            data &= !(1 << count);
            self.set_byte(&mut ea, data)?;
        }

        Ok(())
    }

    pub(super) fn execute_bra(&mut self, pc: u32, disp: i16) -> FetchResult {
        self.regs.pc = pc.wrapping_add(disp as u32);

        Ok(())
    }

    pub(super) fn execute_bset(&mut self, am: AddressingMode, mut count: u8) -> FetchResult {
        if bits(self.opcode, 8, 8) != 0 {
            count = self.regs.d[count as usize] as u8;
        }

        if let AddressingMode::Drd(reg) = am {
            count %= 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << count == 0;
            self.regs.d[reg as usize] |= 1 << count;
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            count %= 8;
            let mut data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << count == 0;
            data |= 1 << count;
            self.set_byte(&mut ea, data)?;
        }

        Ok(())
    }

    pub(super) fn execute_bsr(&mut self, pc: u32, disp: i16) -> FetchResult {
        self.push_long(self.regs.pc)?;
        self.regs.pc = pc.wrapping_add(disp as u32);

        Ok(())
    }

    pub(super) fn execute_btst(&mut self, am: AddressingMode, mut count: u8) -> FetchResult {
        if bits(self.opcode, 8, 8) != 0 {
            count = self.regs.d[count as usize] as u8;
        }

        if let AddressingMode::Drd(reg) = am {
            count %= 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << count == 0;
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            count %= 8;
            let data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << count == 0;
        }

        Ok(())
    }

    pub(super) fn execute_chk(&mut self, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as i16;
        let data = self.regs.d[reg as usize] as i16;

        if data < 0 || data > src {
            Err(Vector::ChkInstruction as u8)
        } else {
            Ok(())
        }
    }

    pub(super) fn execute_clr(&mut self, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => self.set_byte(&mut ea, 0)?,
            Size::Word => self.set_word(&mut ea, 0)?,
            Size::Long => self.set_long(&mut ea, 0)?,
        }

        self.regs.sr.n = false;
        self.regs.sr.z = true;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_cmp(&mut self, reg: u8, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.get_byte(&mut ea)?;
                let dst = self.regs.d[reg as usize] as u8;

                let (res, v) = (dst as i8).overflowing_sub(src as i8);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let src = self.get_word(&mut ea)?;
                let dst = self.regs.d[reg as usize] as u16;

                let (res, v) = (dst as i16).overflowing_sub(src as i16);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let src = self.get_long(&mut ea)?;
                let dst = self.regs.d[reg as usize];

                let (res, v) = (dst as i32).overflowing_sub(src as i32);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_cmpa(&mut self, reg: u8, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        let src = if size == Size::Word {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        let (res, v) = (self.regs.a(reg) as i32).overflowing_sub(src as i32);
        let (_, c) = self.regs.a(reg).overflowing_sub(src);

        self.regs.sr.n = res < 0;
        self.regs.sr.z = res == 0;
        self.regs.sr.v = v;
        self.regs.sr.c = c;

        Ok(())
    }

    pub(super) fn execute_cmpi(&mut self, size: Size, am: AddressingMode, imm: u32) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let (res, v) = (data as i8).overflowing_sub(imm as i8);
                let (_, c) = data.overflowing_sub(imm as u8);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let (res, v) = (data as i16).overflowing_sub(imm as i16);
                let (_, c) = data.overflowing_sub(imm as u16);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let (res, v) = (data as i32).overflowing_sub(imm as i32);
                let (_, c) = data.overflowing_sub(imm);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_cmpm(&mut self, ax: u8, size: Size, ay: u8) -> FetchResult {
        let fc = self.regs.data_space();
        let addry = self.ariwpo(ay, size);
        let addrx = self.ariwpo(ax, size);

        match size {
            Size::Byte => {
                let src = self.mem.get_byte(addry, fc).ok_or(ACCESS_ERROR)?;
                let dst = self.mem.get_byte(addrx, fc).ok_or(ACCESS_ERROR)?;

                let (res, v) = (dst as i8).overflowing_sub(src as i8);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let src = self.mem.get_word(addry.even()?, fc).ok_or(ACCESS_ERROR)?;
                let dst = self.mem.get_word(addrx.even()?, fc).ok_or(ACCESS_ERROR)?;

                let (res, v) = (dst as i16).overflowing_sub(src as i16);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let src = self.mem.get_long(addry.even()?, fc).ok_or(ACCESS_ERROR)?;
                let dst = self.mem.get_long(addrx.even()?, fc).ok_or(ACCESS_ERROR)?;

                let (res, v) = (dst as i32).overflowing_sub(src as i32);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_dbcc(&mut self, pc: u32, cc: u8, reg: u8, disp: i16) -> FetchResult {
        if !self.regs.sr.condition(cc) {
            let counter = (self.regs.d[reg as usize] as u16).wrapping_sub(1) as i16;
            self.regs.d_word(reg, counter as u16);

            if counter != -1 {
                self.regs.pc = pc.wrapping_add(disp as u32);
            }
        }

        Ok(())
    }

    pub(super) fn execute_divs(&mut self, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as i16 as i32;
        let dst = self.regs.d[reg as usize] as i32;

        if src == 0 {
            return Err(Vector::ZeroDivide as u8);
        }

        // i32::MIN / -1 overflows; the quotient does not fit in 16 bits
        // either way so only the flags matter.
        let quot = dst.wrapping_div(src);
        let rem = dst.wrapping_rem(src);

        let overflow = quot < i16::MIN as i32 || quot > i16::MAX as i32;
        if !overflow {
            self.regs.d[reg as usize] = (rem as u16 as u32) << 16 | quot as u16 as u32;
        }

        self.regs.sr.n = quot < 0;
        self.regs.sr.z = quot == 0;
        self.regs.sr.v = overflow;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_divu(&mut self, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as u32;
        let dst = self.regs.d[reg as usize];

        if src == 0 {
            return Err(Vector::ZeroDivide as u8);
        }

        let quot = dst / src;
        let rem = dst % src;

        let overflow = quot > u16::MAX as u32;
        if !overflow {
            self.regs.d[reg as usize] = rem << 16 | quot;
        }

        self.regs.sr.n = quot & 0x0000_8000 != 0;
        self.regs.sr.z = quot == 0;
        self.regs.sr.v = overflow;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_eor(&mut self, reg: u8, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.regs.d[reg as usize] as u8;
                let res = src ^ self.get_byte(&mut ea)?;

                self.regs.sr.n = res & SIGN_BIT_8 != 0;
                self.regs.sr.z = res == 0;

                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let src = self.regs.d[reg as usize] as u16;
                let res = src ^ self.get_word(&mut ea)?;

                self.regs.sr.n = res & SIGN_BIT_16 != 0;
                self.regs.sr.z = res == 0;

                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let src = self.regs.d[reg as usize];
                let res = src ^ self.get_long(&mut ea)?;

                self.regs.sr.n = res & SIGN_BIT_32 != 0;
                self.regs.sr.z = res == 0;

                self.set_long(&mut ea, res)?;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_eori(&mut self, size: Size, am: AddressingMode, imm: u32) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)? ^ imm as u8;
                self.set_byte(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_8 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)? ^ imm as u16;
                self.set_word(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_16 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)? ^ imm;
                self.set_long(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_32 != 0;
                self.regs.sr.z = data == 0;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_eoriccr(&mut self, imm: u16) -> FetchResult {
        self.regs.sr ^= imm & CCR_MASK;

        Ok(())
    }

    pub(super) fn execute_eorisr(&mut self, imm: u16) -> FetchResult {
        self.check_supervisor()?;

        self.regs.sr ^= imm;
        Ok(())
    }

    pub(super) fn execute_exg(&mut self, rx: u8, mode: Direction, ry: u8) -> FetchResult {
        if mode == Direction::ExchangeData {
            self.regs.d.swap(rx as usize, ry as usize);
        } else if mode == Direction::ExchangeAddress {
            let y = self.regs.a(ry);
            *self.regs.a_mut(ry) = self.regs.a(rx);
            *self.regs.a_mut(rx) = y;
        } else {
            let y = self.regs.a(ry);
            *self.regs.a_mut(ry) = self.regs.d[rx as usize];
            self.regs.d[rx as usize] = y;
        }

        Ok(())
    }

    pub(super) fn execute_ext(&mut self, mode: u8, reg: u8) -> FetchResult {
        if mode == 0b010 {
            let d = self.regs.d[reg as usize] as i8 as i16;
            self.regs.d_word(reg, d as u16);
            self.regs.sr.n = d < 0;
            self.regs.sr.z = d == 0;
        } else {
            let d = self.regs.d[reg as usize] as i16 as i32;
            self.regs.d[reg as usize] = d as u32;
            self.regs.sr.n = d < 0;
            self.regs.sr.z = d == 0;
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_illegal(&self) -> FetchResult {
        Err(Vector::IllegalInstruction as u8)
    }

    pub(super) fn execute_jmp(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, None);

        self.regs.pc = self.get_effective_address(&mut ea).ok_or(ACCESS_ERROR)?;

        Ok(())
    }

    pub(super) fn execute_jsr(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, None);

        self.push_long(self.regs.pc)?;
        self.regs.pc = self.get_effective_address(&mut ea).ok_or(ACCESS_ERROR)?;

        Ok(())
    }

    pub(super) fn execute_lea(&mut self, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, None);

        *self.regs.a_mut(reg) = self.get_effective_address(&mut ea).ok_or(ACCESS_ERROR)?;

        Ok(())
    }

    pub(super) fn execute_link(&mut self, reg: u8, disp: i16) -> FetchResult {
        self.push_long(self.regs.a(reg))?;
        *self.regs.a_mut(reg) = self.regs.sp();
        let sp = self.regs.sp_mut();
        *sp = sp.wrapping_add(disp as u32);

        Ok(())
    }

    pub(super) fn execute_lsm(&mut self, dir: Direction, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;

        if dir == Direction::Left {
            let sign = data & SIGN_BIT_16;
            data <<= 1;
            self.regs.sr.x = sign != 0;
            self.regs.sr.c = sign != 0;
        } else {
            let bit = data & 1;
            data >>= 1;
            self.regs.sr.x = bit != 0;
            self.regs.sr.c = bit != 0;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;

        self.set_word(&mut ea, data)
    }

    pub(super) fn execute_lsr(&mut self, rot: u8, dir: Direction, size: Size, mode: u8, reg: u8) -> FetchResult {
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        let shift_count = if mode == 1 {
            (self.regs.d[rot as usize] % 64) as u8
        } else if rot == 0 {
            8
        } else {
            rot
        };

        let mask = size.msb();
        let mut data = self.regs.d[reg as usize] & size.mask();

        if dir == Direction::Left {
            for _ in 0..shift_count {
                let sign = data & mask;
                data <<= 1;
                self.regs.sr.x = sign != 0;
                self.regs.sr.c = sign != 0;
            }
        } else {
            for _ in 0..shift_count {
                let bit = data & 1;
                data >>= 1;
                self.regs.sr.x = bit != 0;
                self.regs.sr.c = bit != 0;
            }
        }

        self.regs.sr.n = data & mask != 0;
        self.regs.sr.z = data & size.mask() == 0;

        match size {
            Size::Byte => self.regs.d_byte(reg, data as u8),
            Size::Word => self.regs.d_word(reg, data as u16),
            Size::Long => self.regs.d[reg as usize] = data,
        }

        Ok(())
    }

    pub(super) fn execute_move(&mut self, size: Size, amdst: AddressingMode, amsrc: AddressingMode) -> FetchResult {
        let mut src = EffectiveAddress::new(amsrc, Some(size));
        let mut dst = EffectiveAddress::new(amdst, Some(size));

        match size {
            Size::Byte => {
                let d = self.get_byte(&mut src)?;
                self.set_byte(&mut dst, d)?;
                self.regs.sr.n = d & SIGN_BIT_8 != 0;
                self.regs.sr.z = d == 0;
            },
            Size::Word => {
                let d = self.get_word(&mut src)?;
                self.set_word(&mut dst, d)?;
                self.regs.sr.n = d & SIGN_BIT_16 != 0;
                self.regs.sr.z = d == 0;
            },
            Size::Long => {
                let d = self.get_long(&mut src)?;
                self.set_long(&mut dst, d)?;
                self.regs.sr.n = d & SIGN_BIT_32 != 0;
                self.regs.sr.z = d == 0;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_movea(&mut self, size: Size, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        let value = if size == Size::Word {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };
        *self.regs.a_mut(reg) = value;

        Ok(())
    }

    pub(super) fn execute_moveccr(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let ccr = self.get_word(&mut ea)?;
        self.regs.sr.set_ccr(ccr);

        Ok(())
    }

    pub(super) fn execute_movefsr(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let sr = u16::from(self.regs.sr);
        self.set_word(&mut ea, sr)
    }

    pub(super) fn execute_movesr(&mut self, am: AddressingMode) -> FetchResult {
        self.check_supervisor()?;

        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let sr = self.get_word(&mut ea)?;
        self.regs.sr = sr.into();
        Ok(())
    }

    pub(super) fn execute_moveusp(&mut self, dir: Direction, reg: u8) -> FetchResult {
        self.check_supervisor()?;

        if dir == Direction::UspToRegister {
            *self.regs.a_mut(reg) = self.regs.usp;
        } else {
            self.regs.usp = self.regs.a(reg);
        }
        Ok(())
    }

    pub(super) fn execute_movem(&mut self, dir: Direction, size: Size, am: AddressingMode, mut list: u16) -> FetchResult {
        let fc = self.regs.data_space();
        let mut ea = EffectiveAddress::new(am, Some(size));

        let gap = size as u32;

        if let AddressingMode::Ariwpr(eareg) = ea.mode {
            // Predecrement stores the registers in reverse order, a7 first.
            let mut addr = self.regs.a(eareg);

            for reg in (0..8u8).rev() {
                if list & 1 != 0 {
                    addr = addr.wrapping_sub(gap);
                    let value = self.regs.a(reg);
                    if size == Size::Word {
                        self.mem.put_word(addr.even()?, value as u16, fc).ok_or(ACCESS_ERROR)?;
                    } else {
                        self.mem.put_long(addr.even()?, value, fc).ok_or(ACCESS_ERROR)?;
                    }
                }

                list >>= 1;
            }

            for reg in (0..8).rev() {
                if list & 1 != 0 {
                    addr = addr.wrapping_sub(gap);
                    let value = self.regs.d[reg];
                    if size == Size::Word {
                        self.mem.put_word(addr.even()?, value as u16, fc).ok_or(ACCESS_ERROR)?;
                    } else {
                        self.mem.put_long(addr.even()?, value, fc).ok_or(ACCESS_ERROR)?;
                    }
                }

                list >>= 1;
            }

            *self.regs.a_mut(eareg) = addr;
        } else {
            let mut addr = if let AddressingMode::Ariwpo(eareg) = ea.mode {
                self.regs.a(eareg)
            } else {
                self.get_effective_address(&mut ea).ok_or(ACCESS_ERROR)?
            };

            for reg in 0..8 {
                if list & 1 != 0 {
                    if dir == Direction::MemoryToRegister {
                        // Word transfers are sign-extended to the full register.
                        let value = if size == Size::Word {
                            self.mem.get_word(addr.even()?, fc).ok_or(ACCESS_ERROR)? as i16 as u32
                        } else {
                            self.mem.get_long(addr.even()?, fc).ok_or(ACCESS_ERROR)?
                        };
                        self.regs.d[reg] = value;
                    } else {
                        let value = self.regs.d[reg];
                        if size == Size::Word {
                            self.mem.put_word(addr.even()?, value as u16, fc).ok_or(ACCESS_ERROR)?;
                        } else {
                            self.mem.put_long(addr.even()?, value, fc).ok_or(ACCESS_ERROR)?;
                        }
                    }

                    addr = addr.wrapping_add(gap);
                }

                list >>= 1;
            }

            for reg in 0..8u8 {
                if list & 1 != 0 {
                    if dir == Direction::MemoryToRegister {
                        let value = if size == Size::Word {
                            self.mem.get_word(addr.even()?, fc).ok_or(ACCESS_ERROR)? as i16 as u32
                        } else {
                            self.mem.get_long(addr.even()?, fc).ok_or(ACCESS_ERROR)?
                        };
                        *self.regs.a_mut(reg) = value;
                    } else {
                        let value = self.regs.a(reg);
                        if size == Size::Word {
                            self.mem.put_word(addr.even()?, value as u16, fc).ok_or(ACCESS_ERROR)?;
                        } else {
                            self.mem.put_long(addr.even()?, value, fc).ok_or(ACCESS_ERROR)?;
                        }
                    }

                    addr = addr.wrapping_add(gap);
                }

                list >>= 1;
            }

            if let AddressingMode::Ariwpo(eareg) = ea.mode {
                *self.regs.a_mut(eareg) = addr;
            }
        }

        Ok(())
    }

    pub(super) fn execute_movep(&mut self, data: u8, dir: Direction, size: Size, areg: u8, disp: i16) -> FetchResult {
        let fc = self.regs.data_space();
        let mut shift: i32 = if size == Size::Word { 8 } else { 24 };
        let mut addr = self.regs.a(areg).wrapping_add(disp as u32);

        if dir == Direction::RegisterToMemory {
            while shift >= 0 {
                let d = (self.regs.d[data as usize] >> shift) as u8;
                self.mem.put_byte(addr, d, fc).ok_or(ACCESS_ERROR)?;
                shift -= 8;
                addr = addr.wrapping_add(2);
            }
        } else {
            if size == Size::Word {
                self.regs.d[data as usize] &= 0xFFFF_0000;
            } else {
                self.regs.d[data as usize] = 0;
            }

            while shift >= 0 {
                let d = self.mem.get_byte(addr, fc).ok_or(ACCESS_ERROR)? as u32;
                self.regs.d[data as usize] |= d << shift;
                shift -= 8;
                addr = addr.wrapping_add(2);
            }
        }

        Ok(())
    }

    pub(super) fn execute_moveq(&mut self, reg: u8, data: i8) -> FetchResult {
        self.regs.d[reg as usize] = data as u32;

        self.regs.sr.n = data < 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_muls(&mut self, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as i16 as i32;
        let dst = self.regs.d[reg as usize] as i16 as i32;

        let res = src.wrapping_mul(dst);
        self.regs.d[reg as usize] = res as u32;

        self.regs.sr.n = res < 0;
        self.regs.sr.z = res == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_mulu(&mut self, reg: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as u32;
        let dst = self.regs.d[reg as usize] as u16 as u32;

        let res = src.wrapping_mul(dst);
        self.regs.d[reg as usize] = res;

        self.regs.sr.n = res & SIGN_BIT_32 != 0;
        self.regs.sr.z = res == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_nbcd(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Byte));

        let data = self.get_byte(&mut ea)?;

        let low = 0 - (data as i8 & 0x0F) - self.regs.sr.x as i8;
        let high = 0 - (data as i8 >> 4 & 0x0F) - (low < 0) as i8;
        let res = (if high < 0 { 10 + high } else { high } as u8) << 4 |
                      if low < 0 { 10 + low } else { low } as u8;

        self.set_byte(&mut ea, res)?;

        if res != 0 { self.regs.sr.z = false; }
        self.regs.sr.c = res != 0;
        self.regs.sr.x = self.regs.sr.c;

        Ok(())
    }

    pub(super) fn execute_neg(&mut self, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = (self.get_byte(&mut ea)? as i8).wrapping_neg();
                self.set_byte(&mut ea, data as u8)?;

                self.regs.sr.n = data < 0;
                self.regs.sr.z = data == 0;
                self.regs.sr.v = data == i8::MIN;
                self.regs.sr.c = data != 0;
                self.regs.sr.x = self.regs.sr.c;
            },
            Size::Word => {
                let data = (self.get_word(&mut ea)? as i16).wrapping_neg();
                self.set_word(&mut ea, data as u16)?;

                self.regs.sr.n = data < 0;
                self.regs.sr.z = data == 0;
                self.regs.sr.v = data == i16::MIN;
                self.regs.sr.c = data != 0;
                self.regs.sr.x = self.regs.sr.c;
            },
            Size::Long => {
                let data = (self.get_long(&mut ea)? as i32).wrapping_neg();
                self.set_long(&mut ea, data as u32)?;

                self.regs.sr.n = data < 0;
                self.regs.sr.z = data == 0;
                self.regs.sr.v = data == i32::MIN;
                self.regs.sr.c = data != 0;
                self.regs.sr.x = self.regs.sr.c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_negx(&mut self, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;

                let (res, v, c) = extended_sub_8(data, 0, self.regs.sr.x);
                self.set_byte(&mut ea, res)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res & SIGN_BIT_8 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;

                let (res, v, c) = extended_sub_16(data, 0, self.regs.sr.x);
                self.set_word(&mut ea, res)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res & SIGN_BIT_16 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;

                let (res, v, c) = extended_sub_32(data, 0, self.regs.sr.x);
                self.set_long(&mut ea, res)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res & SIGN_BIT_32 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_not(&mut self, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = !self.get_byte(&mut ea)?;
                self.set_byte(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_8 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Word => {
                let data = !self.get_word(&mut ea)?;
                self.set_word(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_16 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Long => {
                let data = !self.get_long(&mut ea)?;
                self.set_long(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_32 != 0;
                self.regs.sr.z = data == 0;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_or(&mut self, reg: u8, dir: Direction, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.regs.d[reg as usize] as u8;
                let res = src | self.get_byte(&mut ea)?;

                self.regs.sr.n = res & SIGN_BIT_8 != 0;
                self.regs.sr.z = res == 0;

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res)?;
                } else {
                    self.regs.d_byte(reg, res);
                }
            },
            Size::Word => {
                let src = self.regs.d[reg as usize] as u16;
                let res = src | self.get_word(&mut ea)?;

                self.regs.sr.n = res & SIGN_BIT_16 != 0;
                self.regs.sr.z = res == 0;

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res)?;
                } else {
                    self.regs.d_word(reg, res);
                }
            },
            Size::Long => {
                let src = self.regs.d[reg as usize];
                let res = src | self.get_long(&mut ea)?;

                self.regs.sr.n = res & SIGN_BIT_32 != 0;
                self.regs.sr.z = res == 0;

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res)?;
                } else {
                    self.regs.d[reg as usize] = res;
                }
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_ori(&mut self, size: Size, am: AddressingMode, imm: u32) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)? | imm as u8;
                self.set_byte(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_8 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)? | imm as u16;
                self.set_word(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_16 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)? | imm;
                self.set_long(&mut ea, data)?;

                self.regs.sr.n = data & SIGN_BIT_32 != 0;
                self.regs.sr.z = data == 0;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_oriccr(&mut self, imm: u16) -> FetchResult {
        self.regs.sr |= imm & CCR_MASK;

        Ok(())
    }

    pub(super) fn execute_orisr(&mut self, imm: u16) -> FetchResult {
        self.check_supervisor()?;

        self.regs.sr |= imm;
        Ok(())
    }

    pub(super) fn execute_pea(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, None);

        let addr = self.get_effective_address(&mut ea).ok_or(ACCESS_ERROR)?;
        self.push_long(addr)
    }

    pub(super) fn execute_reset(&mut self) -> FetchResult {
        self.check_supervisor()?;

        self.mem.reset_instruction();
        Ok(())
    }

    pub(super) fn execute_rom(&mut self, dir: Direction, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;
        let sign = data & SIGN_BIT_16;

        if dir == Direction::Left {
            data <<= 1;
            data |= (sign != 0) as u16;
            self.regs.sr.c = sign != 0;
        } else {
            let bit = data & 1;
            data >>= 1;
            if bit != 0 {
                data |= SIGN_BIT_16;
            }
            self.regs.sr.c = bit != 0;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;

        self.set_word(&mut ea, data)
    }

    pub(super) fn execute_ror(&mut self, rot: u8, dir: Direction, size: Size, mode: u8, reg: u8) -> FetchResult {
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        let shift_count = if mode == 1 {
            (self.regs.d[rot as usize] % 64) as u8
        } else if rot == 0 {
            8
        } else {
            rot
        };

        let mask = size.msb();
        let mut data = self.regs.d[reg as usize] & size.mask();

        if dir == Direction::Left {
            for _ in 0..shift_count {
                let sign = data & mask;
                data <<= 1;
                if sign != 0 {
                    data |= 1;
                }
                self.regs.sr.c = sign != 0;
            }
        } else {
            for _ in 0..shift_count {
                let bit = data & 1;
                data >>= 1;
                if bit != 0 {
                    data |= mask;
                }
                self.regs.sr.c = bit != 0;
            }
        }

        self.regs.sr.n = data & mask != 0;
        self.regs.sr.z = data & size.mask() == 0;

        match size {
            Size::Byte => self.regs.d_byte(reg, data as u8),
            Size::Word => self.regs.d_word(reg, data as u16),
            Size::Long => self.regs.d[reg as usize] = data,
        }

        Ok(())
    }

    pub(super) fn execute_roxm(&mut self, dir: Direction, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;
        let sign = data & SIGN_BIT_16;

        if dir == Direction::Left {
            data <<= 1;
            data |= self.regs.sr.x as u16;
            self.regs.sr.x = sign != 0;
            self.regs.sr.c = sign != 0;
        } else {
            let bit = data & 1;
            data >>= 1;
            if self.regs.sr.x {
                data |= SIGN_BIT_16;
            }
            self.regs.sr.x = bit != 0;
            self.regs.sr.c = bit != 0;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;

        self.set_word(&mut ea, data)
    }

    pub(super) fn execute_roxr(&mut self, rot: u8, dir: Direction, size: Size, mode: u8, reg: u8) -> FetchResult {
        self.regs.sr.v = false;
        self.regs.sr.c = self.regs.sr.x;

        let shift_count = if mode == 1 {
            (self.regs.d[rot as usize] % 64) as u8
        } else if rot == 0 {
            8
        } else {
            rot
        };

        let mask = size.msb();
        let mut data = self.regs.d[reg as usize] & size.mask();

        if dir == Direction::Left {
            for _ in 0..shift_count {
                let sign = data & mask;
                data <<= 1;
                data |= self.regs.sr.x as u32;
                self.regs.sr.x = sign != 0;
                self.regs.sr.c = sign != 0;
            }
        } else {
            for _ in 0..shift_count {
                let bit = data & 1;
                data >>= 1;
                if self.regs.sr.x {
                    data |= mask;
                }
                self.regs.sr.x = bit != 0;
                self.regs.sr.c = bit != 0;
            }
        }

        self.regs.sr.n = data & mask != 0;
        self.regs.sr.z = data & size.mask() == 0;

        match size {
            Size::Byte => self.regs.d_byte(reg, data as u8),
            Size::Word => self.regs.d_word(reg, data as u16),
            Size::Long => self.regs.d[reg as usize] = data,
        }

        Ok(())
    }

    pub(super) fn execute_rte(&mut self) -> FetchResult {
        self.check_supervisor()?;

        let sr = self.pop_word()?;
        self.regs.pc = self.pop_long()?;
        self.regs.sr = sr.into();

        Ok(())
    }

    pub(super) fn execute_rtr(&mut self) -> FetchResult {
        let ccr = self.pop_word()?;
        self.regs.sr &= SR_UPPER_MASK;
        self.regs.sr |= ccr & CCR_MASK;
        self.regs.pc = self.pop_long()?;

        Ok(())
    }

    pub(super) fn execute_rts(&mut self) -> FetchResult {
        self.regs.pc = self.pop_long()?;

        Ok(())
    }

    pub(super) fn execute_sbcd(&mut self, ry: u8, mode: Direction, rx: u8) -> FetchResult {
        let fc = self.regs.data_space();
        let (src, dst) = if mode == Direction::MemoryToMemory {
            let src_addr = self.ariwpr(rx, Size::Byte);
            let dst_addr = self.ariwpr(ry, Size::Byte);
            (self.mem.get_byte(src_addr, fc).ok_or(ACCESS_ERROR)?, self.mem.get_byte(dst_addr, fc).ok_or(ACCESS_ERROR)?)
        } else {
            (self.regs.d[rx as usize] as u8, self.regs.d[ry as usize] as u8)
        };

        let low = (dst as i8 & 0x0F) - (src as i8 & 0x0F) - self.regs.sr.x as i8;
        let high = (dst as i8 >> 4 & 0x0F) - (src as i8 >> 4 & 0x0F) - (low < 0) as i8;
        let res = (if high < 0 { 10 + high } else { high } as u8) << 4 |
                      if low < 0 { 10 + low } else { low } as u8;

        if res != 0 { self.regs.sr.z = false; }
        self.regs.sr.c = high < 0;
        self.regs.sr.x = self.regs.sr.c;

        if mode == Direction::MemoryToMemory {
            self.mem.put_byte(self.regs.a(ry), res, fc).ok_or(ACCESS_ERROR)
        } else {
            Ok(self.regs.d_byte(ry, res))
        }
    }

    pub(super) fn execute_scc(&mut self, cc: u8, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Byte));

        if self.regs.sr.condition(cc) {
            self.set_byte(&mut ea, 0xFF)
        } else {
            self.set_byte(&mut ea, 0)
        }
    }

    /// STOP drives the condition state machine rather than an interrupt wait:
    /// `#0xFFFF` ends the program, any other immediate loads SR and leaves
    /// the machine stopped.
    pub(super) fn execute_stop(&mut self, imm: u16) -> FetchResult {
        self.check_supervisor()?;

        if imm == 0xFFFF {
            self.transition(Condition::Finished);
        } else {
            self.regs.sr = imm.into();
            self.transition(Condition::Stopped);
        }
        Ok(())
    }

    pub(super) fn execute_sub(&mut self, reg: u8, dir: Direction, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg as usize] as u8, self.get_byte(&mut ea)?)
                } else {
                    (self.get_byte(&mut ea)?, self.regs.d[reg as usize] as u8)
                };

                let (res, v) = (dst as i8).overflowing_sub(src as i8);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res as u8)?;
                } else {
                    self.regs.d_byte(reg, res as u8);
                }
            },
            Size::Word => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg as usize] as u16, self.get_word(&mut ea)?)
                } else {
                    (self.get_word(&mut ea)?, self.regs.d[reg as usize] as u16)
                };

                let (res, v) = (dst as i16).overflowing_sub(src as i16);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res as u16)?;
                } else {
                    self.regs.d_word(reg, res as u16);
                }
            },
            Size::Long => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg as usize], self.get_long(&mut ea)?)
                } else {
                    (self.get_long(&mut ea)?, self.regs.d[reg as usize])
                };

                let (res, v) = (dst as i32).overflowing_sub(src as i32);
                let (_, c) = dst.overflowing_sub(src);

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res as u32)?;
                } else {
                    self.regs.d[reg as usize] = res as u32;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_suba(&mut self, reg: u8, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        let src = if size == Size::Word {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        let areg = self.regs.a_mut(reg);
        *areg = areg.wrapping_sub(src);

        Ok(())
    }

    pub(super) fn execute_subi(&mut self, size: Size, am: AddressingMode, imm: u32) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let (res, v) = (data as i8).overflowing_sub(imm as i8);
                let (_, c) = data.overflowing_sub(imm as u8);
                self.set_byte(&mut ea, res as u8)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let (res, v) = (data as i16).overflowing_sub(imm as i16);
                let (_, c) = data.overflowing_sub(imm as u16);
                self.set_word(&mut ea, res as u16)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let (res, v) = (data as i32).overflowing_sub(imm as i32);
                let (_, c) = data.overflowing_sub(imm);
                self.set_long(&mut ea, res as u32)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_subq(&mut self, imm: u8, size: Size, am: AddressingMode) -> FetchResult {
        if let AddressingMode::Ard(reg) = am {
            let areg = self.regs.a_mut(reg);
            *areg = areg.wrapping_sub(imm as u32);
            return Ok(());
        }

        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let (res, v) = (data as i8).overflowing_sub(imm as i8);
                let (_, c) = data.overflowing_sub(imm);
                self.set_byte(&mut ea, res as u8)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let (res, v) = (data as i16).overflowing_sub(imm as i16);
                let (_, c) = data.overflowing_sub(imm as u16);
                self.set_word(&mut ea, res as u16)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let (res, v) = (data as i32).overflowing_sub(imm as i32);
                let (_, c) = data.overflowing_sub(imm as u32);
                self.set_long(&mut ea, res as u32)?;

                self.regs.sr.x = c;
                self.regs.sr.n = res < 0;
                self.regs.sr.z = res == 0;
                self.regs.sr.v = v;
                self.regs.sr.c = c;
            },
        }

        Ok(())
    }

    pub(super) fn execute_subx(&mut self, ry: u8, size: Size, mode: Direction, rx: u8) -> FetchResult {
        let fc = self.regs.data_space();

        match size {
            Size::Byte => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.ariwpr(rx, size);
                    let dst_addr = self.ariwpr(ry, size);
                    (self.mem.get_byte(src_addr, fc).ok_or(ACCESS_ERROR)?, self.mem.get_byte(dst_addr, fc).ok_or(ACCESS_ERROR)?)
                } else {
                    (self.regs.d[rx as usize] as u8, self.regs.d[ry as usize] as u8)
                };

                let (res, v, c) = extended_sub_8(src, dst, self.regs.sr.x);

                self.regs.sr.n = res & SIGN_BIT_8 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;
                self.regs.sr.x = c;

                if mode == Direction::MemoryToMemory {
                    self.mem.put_byte(self.regs.a(ry), res, fc).ok_or(ACCESS_ERROR)
                } else {
                    Ok(self.regs.d_byte(ry, res))
                }
            },
            Size::Word => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.ariwpr(rx, size);
                    let dst_addr = self.ariwpr(ry, size);
                    (self.mem.get_word(src_addr.even()?, fc).ok_or(ACCESS_ERROR)?, self.mem.get_word(dst_addr.even()?, fc).ok_or(ACCESS_ERROR)?)
                } else {
                    (self.regs.d[rx as usize] as u16, self.regs.d[ry as usize] as u16)
                };

                let (res, v, c) = extended_sub_16(src, dst, self.regs.sr.x);

                self.regs.sr.n = res & SIGN_BIT_16 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;
                self.regs.sr.x = c;

                if mode == Direction::MemoryToMemory {
                    self.mem.put_word(self.regs.a(ry), res, fc).ok_or(ACCESS_ERROR)
                } else {
                    Ok(self.regs.d_word(ry, res))
                }
            },
            Size::Long => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.ariwpr(rx, size);
                    let dst_addr = self.ariwpr(ry, size);
                    (self.mem.get_long(src_addr.even()?, fc).ok_or(ACCESS_ERROR)?, self.mem.get_long(dst_addr.even()?, fc).ok_or(ACCESS_ERROR)?)
                } else {
                    (self.regs.d[rx as usize], self.regs.d[ry as usize])
                };

                let (res, v, c) = extended_sub_32(src, dst, self.regs.sr.x);

                self.regs.sr.n = res & SIGN_BIT_32 != 0;
                if res != 0 { self.regs.sr.z = false; }
                self.regs.sr.v = v;
                self.regs.sr.c = c;
                self.regs.sr.x = c;

                if mode == Direction::MemoryToMemory {
                    self.mem.put_long(self.regs.a(ry), res, fc).ok_or(ACCESS_ERROR)
                } else {
                    Ok(self.regs.d[ry as usize] = res)
                }
            },
        }
    }

    pub(super) fn execute_swap(&mut self, reg: u8) -> FetchResult {
        let high = self.regs.d[reg as usize] >> 16;
        self.regs.d[reg as usize] <<= 16;
        self.regs.d[reg as usize] |= high;

        self.regs.sr.n = self.regs.d[reg as usize] & SIGN_BIT_32 != 0;
        self.regs.sr.z = self.regs.d[reg as usize] == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_tas(&mut self, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(Size::Byte));

        let mut data = self.get_byte(&mut ea)?;

        self.regs.sr.n = data & SIGN_BIT_8 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        data |= SIGN_BIT_8;
        self.set_byte(&mut ea, data)
    }

    pub(super) fn execute_trap(&mut self, vector: u8) -> FetchResult {
        Err(Vector::Trap0Instruction as u8 + vector)
    }

    pub(super) fn execute_trapv(&self) -> FetchResult {
        if self.regs.sr.v {
            Err(Vector::TrapVInstruction as u8)
        } else {
            Ok(())
        }
    }

    pub(super) fn execute_tst(&mut self, size: Size, am: AddressingMode) -> FetchResult {
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                self.regs.sr.n = data & SIGN_BIT_8 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                self.regs.sr.n = data & SIGN_BIT_16 != 0;
                self.regs.sr.z = data == 0;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                self.regs.sr.n = data & SIGN_BIT_32 != 0;
                self.regs.sr.z = data == 0;
            },
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_unlk(&mut self, reg: u8) -> FetchResult {
        *self.regs.sp_mut() = self.regs.a(reg);
        *self.regs.a_mut(reg) = self.pop_long()?;

        Ok(())
    }
}

/// ADD, AND, CMP, EOR, OR, SUB. CMP and EOR ignore the direction.
fn register_direction_size(opcode: u16) -> (u8, Direction, Size) {
    let reg = bits(opcode, 9, 11) as u8;
    let dir = if bits(opcode, 8, 8) != 0 { Direction::DstEa } else { Direction::DstReg };
    let size = Size::from(bits(opcode, 6, 7));

    (reg, dir, size)
}

/// ASM, LSM, ROM, ROXM.
fn shift_direction(opcode: u16) -> Direction {
    if bits(opcode, 8, 8) != 0 {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// Add with extend: `src + dst + x`. Returns the result, the signed overflow
/// and the carry.
const fn extended_add_8(src: u8, dst: u8, x: bool) -> (u8, bool, bool) {
    let (t, c1) = src.overflowing_add(dst);
    let (res, c2) = t.overflowing_add(x as u8);
    let (s, v1) = (src as i8).overflowing_add(dst as i8);
    let (_, v2) = s.overflowing_add(x as i8);
    (res, v1 != v2, c1 || c2)
}

const fn extended_add_16(src: u16, dst: u16, x: bool) -> (u16, bool, bool) {
    let (t, c1) = src.overflowing_add(dst);
    let (res, c2) = t.overflowing_add(x as u16);
    let (s, v1) = (src as i16).overflowing_add(dst as i16);
    let (_, v2) = s.overflowing_add(x as i16);
    (res, v1 != v2, c1 || c2)
}

const fn extended_add_32(src: u32, dst: u32, x: bool) -> (u32, bool, bool) {
    let (t, c1) = src.overflowing_add(dst);
    let (res, c2) = t.overflowing_add(x as u32);
    let (s, v1) = (src as i32).overflowing_add(dst as i32);
    let (_, v2) = s.overflowing_add(x as i32);
    (res, v1 != v2, c1 || c2)
}

/// Subtract with extend: `dst - src - x`. Returns the result, the signed
/// overflow and the borrow.
const fn extended_sub_8(src: u8, dst: u8, x: bool) -> (u8, bool, bool) {
    let (t, c1) = dst.overflowing_sub(src);
    let (res, c2) = t.overflowing_sub(x as u8);
    let (s, v1) = (dst as i8).overflowing_sub(src as i8);
    let (_, v2) = s.overflowing_sub(x as i8);
    (res, v1 != v2, c1 || c2)
}

const fn extended_sub_16(src: u16, dst: u16, x: bool) -> (u16, bool, bool) {
    let (t, c1) = dst.overflowing_sub(src);
    let (res, c2) = t.overflowing_sub(x as u16);
    let (s, v1) = (dst as i16).overflowing_sub(src as i16);
    let (_, v2) = s.overflowing_sub(x as i16);
    (res, v1 != v2, c1 || c2)
}

const fn extended_sub_32(src: u32, dst: u32, x: bool) -> (u32, bool, bool) {
    let (t, c1) = dst.overflowing_sub(src);
    let (res, c2) = t.overflowing_sub(x as u32);
    let (s, v1) = (dst as i32).overflowing_sub(src as i32);
    let (_, v2) = s.overflowing_sub(x as i32);
    (res, v1 != v2, c1 || c2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_arithmetic() {
        // 0xFF + 0x01 + X carries all the way through.
        assert_eq!(extended_add_8(0xFF, 0x00, true), (0x00, false, true));
        assert_eq!(extended_add_8(0x7F, 0x00, true), (0x80, true, false));
        assert_eq!(extended_sub_8(0x01, 0x00, false), (0xFF, false, true));
        assert_eq!(extended_sub_8(0x00, 0x80, true), (0x7F, true, false));
        assert_eq!(extended_sub_32(0, 0, true), (0xFFFF_FFFF, false, true));
    }
}
