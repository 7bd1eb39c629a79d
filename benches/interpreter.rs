// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Step-loop throughput over register-only workloads.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
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

fn countdown_loop(c: &mut Criterion) {
    let mut mem = vec![0u8; 0x1000];
    boot(&mut mem, 0x800, 0x400);
    put_words(&mut mem, 0x400, &[
        0x7064,         // MOVEQ #100,D0
        0x51C8, 0xFFFE, // DBRA D0,*
        0x4E72, 0xFFFF, // STOP #0xFFFF
    ]);

    c.bench_function("countdown loop", |b| {
        b.iter(|| {
            let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
            emu.reset();
            while emu.step() {}
            emu.instruction_count()
        })
    });
}

fn alu_mix(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(68000);
    let mut mem = vec![0u8; 0x4000];
    boot(&mut mem, 0x3000, 0x400);

    // A straight-line mix of MOVEQ and ADD.L between data registers.
    let mut addr = 0x400;
    while addr < 0x2400 {
        let opcode: u16 = if rng.gen_bool(0.5) {
            0x7000 | rng.gen_range(0..8u16) << 9 | rng.gen_range(0..=255u16)
        } else {
            0xD080 | rng.gen_range(0..8u16) << 9 | rng.gen_range(0..8u16)
        };
        put_words(&mut mem, addr, &[opcode]);
        addr += 2;
    }
    put_words(&mut mem, 0x2400, &[0x4E72, 0xFFFF]);

    c.bench_function("alu mix", |b| {
        b.iter(|| {
            let mut emu = Emulator::new(CpuModel::Mc68000, &mut mem[..]);
            emu.reset();
            while emu.step() {}
            emu.instruction_count()
        })
    });
}

criterion_group!(benches, countdown_loop, alu_mix);
criterion_main!(benches);
