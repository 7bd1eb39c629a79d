// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reset, condition state machine, STOP and breakpoint behavior.

use v68k::memory::Memory;
use v68k::{Condition, CpuModel, Emulator};

/// Writes the reset vectors: initial SSP at 0, initial PC at 4.
fn boot(mem: &mut [u8], ssp: u32, pc: u32) {
    mem[0..4].copy_from_slice(&ssp.to_be_bytes());
    mem[4..8].copy_from_slice(&pc.to_be_bytes());
}

fn put_words(mem: &mut [u8], addr: usize, words: &[u16]) {
    for (i, word) in words.iter().enumerate() {
        mem[addr + i * 2..addr + i * 2 + 2].copy_from_slice(&word.to_be_bytes());
    }
}

fn put_long(mem: &mut [u8], addr: usize, value: u32) {
    mem[addr..addr + 4].copy_from_slice(&value.to_be_bytes());
}

#[test]
fn reset_requires_both_vectors() {
    // 7 bytes cannot hold the two reset vectors.
    let mut mem = [0u8; 7];
    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    assert_eq!(emu.condition, Condition::Halted);
    assert!(!emu.step());

    // 8 zero bytes are enough: zero vectors are valid.
    let mut mem = [0u8; 8];
    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    assert_eq!(emu.condition, Condition::Normal);
    assert_eq!(emu.regs.ssp, 0);
    assert_eq!(emu.regs.pc, 0);
}

#[test]
fn reset_loads_vectors() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    assert_eq!(emu.condition, Condition::Normal);
    assert_eq!(emu.regs.ssp, 4096);
    assert_eq!(emu.regs.pc, 1024);
    assert_eq!(u16::from(emu.regs.sr), 0x2700);
}

#[test]
fn reset_rejects_odd_pc() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 0xFFFF_FFFF);

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    assert_eq!(emu.condition, Condition::Halted);
    // The halted machine keeps what the vectors held.
    assert_eq!(emu.regs.ssp, 4096);
    assert_eq!(emu.regs.pc, 0xFFFF_FFFF);
}

#[test]
fn stop_ffff_finishes() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_words(&mut mem, 1024, &[0x4E72, 0xFFFF]);

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    assert!(!emu.step());
    assert_eq!(emu.condition, Condition::Finished);
    assert_eq!(u16::from(emu.regs.sr), 0x2700);
    assert_eq!(emu.regs.pc, 1028);

    // Finished is terminal.
    assert!(!emu.step());
}

#[test]
fn stop_loads_sr() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_words(&mut mem, 1024, &[0x4E72, 0x2EFF]);

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    assert!(!emu.step());
    assert_eq!(emu.condition, Condition::Stopped);
    // Only the defined SR bits of the immediate stick.
    assert_eq!(u16::from(emu.regs.sr), 0x261F);
    assert_eq!(emu.regs.pc, 1028);
}

#[test]
fn breakpoint_suspends_and_acknowledges() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_words(&mut mem, 1024, &[0x4848]); // BKPT #0

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    // The breakpoint suspends execution without advancing PC.
    assert!(!emu.step());
    assert_eq!(emu.condition, Condition::Bkpt(0));
    assert_eq!(emu.regs.pc, 1024);

    // Substituting another BKPT re-suspends at the same slot.
    assert!(emu.acknowledge_breakpoint(0x484F));
    assert!(!emu.step());
    assert_eq!(emu.condition, Condition::Bkpt(7));
    assert_eq!(emu.regs.pc, 1024);

    // Substituting a NOP resumes past the breakpoint slot.
    assert!(emu.acknowledge_breakpoint(0x4E71));
    assert_eq!(emu.condition, Condition::Normal);
    assert_eq!(emu.opcode, 0x4E71);
    assert!(emu.step());
    assert_eq!(emu.regs.pc, 1026);

    // Acknowledging is only valid at a breakpoint.
    assert!(!emu.acknowledge_breakpoint(0x4E71));
}

#[test]
fn illegal_instruction_vectors() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_long(&mut mem, 16, 0x800); // Vector 4: illegal instruction.
    put_words(&mut mem, 1024, &[0x4AFC]); // ILLEGAL

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    // The fault vectors through the emulated exception table and execution
    // continues in the handler.
    assert!(emu.step());
    assert_eq!(emu.condition, Condition::Normal);
    assert_eq!(emu.regs.pc, 0x800);
    assert!(emu.regs.sr.s);

    // The exception frame holds SR then PC.
    assert_eq!(emu.regs.ssp, 4096 - 6);
    assert_eq!(emu.mem.get_word(emu.regs.ssp, emu.regs.data_space()), Some(0x2700));
    assert_eq!(emu.mem.get_long(emu.regs.ssp + 2, emu.regs.data_space()), Some(1026));
}

#[test]
fn privileged_instruction_in_user_mode() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_long(&mut mem, 32, 0x900); // Vector 8: privilege violation.
    put_words(&mut mem, 1024, &[0x4E72, 0x2EFF]); // STOP

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    emu.regs.sr.s = false;
    emu.regs.usp = 2048;

    assert!(emu.step());
    assert_eq!(emu.condition, Condition::Normal);
    assert_eq!(emu.regs.pc, 0x900);
    assert!(emu.regs.sr.s);
}

#[test]
fn trace_exception_after_instruction() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_long(&mut mem, 36, 0xA00); // Vector 9: trace.
    put_words(&mut mem, 1024, &[0x4E71]); // NOP

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    emu.regs.sr.t = true;

    assert!(emu.step());
    assert_eq!(emu.regs.pc, 0xA00);
    assert!(!emu.regs.sr.t);
}

#[test]
fn trace_follows_privileged_instructions() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_long(&mut mem, 36, 0xA00); // Vector 9: trace.
    put_words(&mut mem, 1024, &[0x4E68]); // MOVE USP,A0

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    emu.regs.sr.t = true;

    // A privileged instruction that completes in supervisor mode is traced
    // like any other; only the faulting ones skip the trace exception.
    assert!(emu.step());
    assert_eq!(emu.regs.pc, 0xA00);
    assert!(!emu.regs.sr.t);
}

#[test]
fn instruction_count() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 4096, 1024);
    put_words(&mut mem, 1024, &[0x4E71, 0x4E71, 0x4E72, 0xFFFF]);

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    assert_eq!(emu.instruction_count(), 0);

    while emu.step() {}
    assert_eq!(emu.instruction_count(), 3);
    assert_eq!(emu.condition, Condition::Finished);
}
