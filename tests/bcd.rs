// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ABCD/SBCD digit adjustment and the extend/zero flag chain.

use v68k::{CpuModel, Emulator};

fn boot(mem: &mut [u8], ssp: u32, pc: u32) {
    mem[0..4].copy_from_slice(&ssp.to_be_bytes());
    mem[4..8].copy_from_slice(&pc.to_be_bytes());
}

fn put_words(mem: &mut [u8], addr: usize, words: &[u16]) {
    for (i, word) in words.iter().enumerate() {
        mem[addr + i * 2..addr + i * 2 + 2].copy_from_slice(&word.to_be_bytes());
    }
}

#[test]
fn abcd_adjusts_digits() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 0x1000, 0x400);
    put_words(&mut mem, 0x400, &[0xC300, 0xC300, 0xC300]); // ABCD D0,D1 x3

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    // 08 + 09 = 17: the low digit sum overflows a nibble and must carry
    // into the tens digit, not leak into it.
    emu.regs.d[0] = 0x08;
    emu.regs.d[1] = 0x09;
    emu.regs.sr.z = true;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1] & 0xFF, 0x17);
    assert!(!emu.regs.sr.c);
    assert!(!emu.regs.sr.x);
    assert!(!emu.regs.sr.z);

    // 99 + 99 + X = 99 carry 1.
    emu.regs.d[0] = 0x99;
    emu.regs.d[1] = 0x99;
    emu.regs.sr.x = true;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1] & 0xFF, 0x99);
    assert!(emu.regs.sr.c);
    assert!(emu.regs.sr.x);

    // 99 + 01 = 00 carry 1; a zero result leaves Z alone so multi-byte
    // sums can test the whole chain at the end.
    emu.regs.d[0] = 0x01;
    emu.regs.d[1] = 0x99;
    emu.regs.sr.x = false;
    emu.regs.sr.z = true;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1] & 0xFF, 0x00);
    assert!(emu.regs.sr.c);
    assert!(emu.regs.sr.z);
}

#[test]
fn sbcd_borrows_across_digits() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 0x1000, 0x400);
    put_words(&mut mem, 0x400, &[0x8300, 0x8300]); // SBCD D0,D1 x2

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();

    // 42 - 17 = 25: the low digit borrows from the tens digit.
    emu.regs.d[0] = 0x17;
    emu.regs.d[1] = 0x42;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1] & 0xFF, 0x25);
    assert!(!emu.regs.sr.c);
    assert!(!emu.regs.sr.x);

    // 25 - 30 = 95 borrow 1 (ten's complement).
    emu.regs.d[0] = 0x30;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1] & 0xFF, 0x95);
    assert!(emu.regs.sr.c);
    assert!(emu.regs.sr.x);
}
