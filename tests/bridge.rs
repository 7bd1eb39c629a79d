// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end callback bridging: JSR into the callback region, breakpoint,
//! native handler, RTS injection, resume.

use v68k::callback::{callback_address, Bridge, Slot};
use v68k::memory::MemoryManager;
use v68k::{Condition, CpuModel, Emulator};

fn boot(mem: &mut [u8], ssp: u32, pc: u32) {
    mem[0..4].copy_from_slice(&ssp.to_be_bytes());
    mem[4..8].copy_from_slice(&pc.to_be_bytes());
}

fn put_words(mem: &mut [u8], addr: usize, words: &[u16]) {
    for (i, word) in words.iter().enumerate() {
        mem[addr + i * 2..addr + i * 2 + 2].copy_from_slice(&word.to_be_bytes());
    }
}

fn native_service(emu: &mut Emulator<'_, MemoryManager<'_>>) -> Option<u16> {
    emu.regs.d[0] = 0xCAFE;
    Some(0x4E75) // Resume with RTS.
}

#[test]
fn bridged_call_round_trip() {
    let mut block = vec![0u8; 0x2000];
    boot(&mut block, 0x1000, 0x500);
    // JSR to callback 2, then STOP #0xFFFF once the call returns.
    let target = callback_address(2);
    put_words(&mut block, 0x500, &[
        0x4EB9, (target >> 16) as u16, target as u16, // JSR (xxx).L
        0x4E72, 0xFFFF,                               // STOP #0xFFFF
    ]);

    let mut map = MemoryManager::new(&mut block, 0, 8);
    let mut emu = Emulator::new(CpuModel::Mc68000, &mut map);
    let bridge = Bridge::new(vec![
        Slot::Empty,
        Slot::Reserved,
        Slot::Handler(native_service),
        Slot::Empty,
    ]);

    emu.reset();

    // JSR pushes the return address and lands in the callback region.
    assert!(emu.step());
    assert_eq!(emu.regs.pc, target);

    // The region reads as BKPT #3: execution suspends with PC still at the
    // callback address, which is what identifies the callback.
    assert!(!emu.step());
    assert_eq!(emu.condition, Condition::Bkpt(3));
    assert_eq!(emu.regs.pc, target);

    // The host resolves and invokes the native handler.
    assert_eq!(bridge.callback_number(emu.regs.pc), Some(2));
    let opcode = bridge.dispatch(&mut emu);
    assert_eq!(opcode, Some(0x4E75));
    assert_eq!(emu.regs.d[0], 0xCAFE);

    // Injecting the returned RTS resumes at the call site.
    assert!(emu.acknowledge_breakpoint(0x4E75));
    assert!(emu.step());
    assert_eq!(emu.regs.pc, 0x506);

    assert!(!emu.step());
    assert_eq!(emu.condition, Condition::Finished);
}

#[test]
fn empty_and_reserved_slots_do_not_resume() {
    let mut block = vec![0u8; 0x100];
    boot(&mut block, 0x80, 0x40);

    let mut map = MemoryManager::new(&mut block, 0, 8);
    let mut emu = Emulator::new(CpuModel::Mc68000, &mut map);
    let bridge = Bridge::new(vec![
        Slot::Empty,
        Slot::Reserved,
        Slot::Handler(native_service),
    ]);

    emu.reset();

    emu.regs.pc = callback_address(0);
    assert!(bridge.dispatch(&mut emu).is_none());

    emu.regs.pc = callback_address(1);
    assert!(bridge.dispatch(&mut emu).is_none());

    // Past the table.
    emu.regs.pc = callback_address(3);
    assert_eq!(bridge.callback_number(emu.regs.pc), None);
    assert!(bridge.dispatch(&mut emu).is_none());

    // An ordinary PC is not a callback.
    emu.regs.pc = 0x40;
    assert!(bridge.dispatch(&mut emu).is_none());
}
