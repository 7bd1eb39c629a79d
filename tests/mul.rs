// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MULU/MULS results and flag sequences.
//!
//! The flags are checked over consecutive instructions to catch state
//! carrying over from one multiplication into the next.

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

#[test]
fn mulu_flag_sequence() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 0x1000, 0x400);
    put_words(&mut mem, 0x400, &[0xC2C0, 0xC2C0, 0xC2C0]); // MULU.W D0,D1 x3

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    emu.regs.d[0] = 0x0001_FFFF; // Low word 0xFFFF; high word must be ignored.

    emu.regs.d[1] = 0x0001_0000;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1], 0);
    assert_eq!(emu.regs.sr.nzvc(), 0b0100);

    emu.regs.d[1] = 0x0001_0001;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1], 0x0000_FFFF);
    assert_eq!(emu.regs.sr.nzvc(), 0b0000);

    // 0xFFFF * 0xFFFF: the full 32-bit product lands in D1 and N follows
    // its top bit. V and C stay clear even though it exceeds 16 bits.
    assert!(emu.step());
    assert_eq!(emu.regs.d[1], 0xFFFE_0001);
    assert_eq!(emu.regs.sr.nzvc(), 0b1000);

    assert_eq!(emu.condition, Condition::Normal);
}

#[test]
fn muls_flag_sequence() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 0x1000, 0x400);
    put_words(&mut mem, 0x400, &[0xC3C0, 0xC3C0, 0xC3C0]); // MULS.W D0,D1 x3

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    emu.regs.d[0] = 0x0001_FFFF; // Low word -1 signed.

    emu.regs.d[1] = 0x0001_0000;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1], 0);
    assert_eq!(emu.regs.sr.nzvc(), 0b0100);

    emu.regs.d[1] = 0x0001_0001;
    assert!(emu.step());
    assert_eq!(emu.regs.d[1], 0xFFFF_FFFF); // -1 * 1
    assert_eq!(emu.regs.sr.nzvc(), 0b1000);

    assert!(emu.step());
    assert_eq!(emu.regs.d[1], 1); // -1 * -1
    assert_eq!(emu.regs.sr.nzvc(), 0b0000);
}

#[test]
fn mul_preserves_x() {
    let mut mem = vec![0u8; 0x2000];
    boot(&mut mem, 0x1000, 0x400);
    put_words(&mut mem, 0x400, &[0xC2C0]); // MULU.W D0,D1

    let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
    emu.reset();
    emu.regs.sr.x = true;
    emu.regs.sr.v = true;
    emu.regs.sr.c = true;
    emu.regs.d[0] = 0xFFFF;
    emu.regs.d[1] = 0xFFFF;

    assert!(emu.step());
    // V and C are always cleared, X is untouched.
    assert!(emu.regs.sr.x);
    assert_eq!(emu.regs.sr.nzvc(), 0b1000);
}
