// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The translate() contract, seen from an embedding host.

use quickcheck::quickcheck;
use v68k::endian::{big_longword, big_word};
use v68k::memory::{Access, CallbackMemory, FunctionCode, Memory, MemoryManager};

const UD: FunctionCode = FunctionCode::UserData;
const SD: FunctionCode = FunctionCode::SupervisorData;

#[test]
fn accessors_are_big_endian() {
    let mut mem = [0u8; 16];

    assert_eq!(mem.put_long(0, 0x1234_5678, SD), Some(()));
    assert_eq!(&mem[0..4], &[0x12, 0x34, 0x56, 0x78]);
    assert_eq!(mem.get_long(0, SD), Some(0x1234_5678));
    assert_eq!(mem.get_word(0, SD), Some(0x1234));
    assert_eq!(mem.get_word(2, SD), Some(0x5678));
    assert_eq!(mem.get_byte(3, SD), Some(0x78));
}

#[test]
fn straddling_accesses_fail() {
    let mem = [0u8; 16];

    assert!(mem.get_word(15, SD).is_none());
    assert!(mem.get_long(13, SD).is_none());
    assert!(mem.get_byte(16, SD).is_none());
    // Wrap-around of addr + length never reaches back into the block.
    assert!(mem.get_word(0xFFFF_FFFF, SD).is_none());
}

#[test]
fn translate_is_pure() {
    let mut block = [0u8; 64];
    block[20] = 0x5A;
    let map = MemoryManager::new(&mut block, 8, 4);

    let first = map.translate(20, 4, UD, Access::Read).map(<[u8]>::to_vec);
    let second = map.translate(20, 4, UD, Access::Read).map(<[u8]>::to_vec);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn callback_region_serves_breakpoints() {
    let callbacks = CallbackMemory::new(4);
    assert_eq!(callbacks.first_address(), 0xFFFF_FFF8);

    // Every slot reads as BKPT #3, the dispatch happens by PC, not by data.
    for index in 0..4u32 {
        let addr = 0u32.wrapping_sub((index + 1) * 2);
        assert_eq!(callbacks.get_word(addr, FunctionCode::UserProgram), Some(0x484B));
    }

    assert!(callbacks.get_word(0xFFFF_FFF6, FunctionCode::UserProgram).is_none());
}

#[test]
fn callback_region_rejects_writes() {
    let mut map_block = [0u8; 64];
    let mut map = MemoryManager::new(&mut map_block, 0, 4);

    assert!(map.put_word(0xFFFF_FFFE, 0x4E71, SD).is_none());
    assert!(map.translate(0xFFFF_FFFE, 2, SD, Access::Write).is_none());
    // Reads still go through.
    assert_eq!(map.get_word(0xFFFF_FFFE, SD), Some(0x484B));
}

#[test]
fn low_memory_guard_is_user_write_only() {
    let mut block = [0u8; 256];
    let mut map = MemoryManager::new(&mut block, 64, 4);

    // User writes below the boundary are denied.
    assert!(map.put_byte(0, 1, UD).is_none());
    assert!(map.put_word(62, 1, UD).is_none());
    // User reads and supervisor writes pass through.
    assert_eq!(map.get_word(0, UD), Some(0));
    assert_eq!(map.put_word(0, 0x1234, SD), Some(()));
    assert_eq!(map.get_word(0, UD), Some(0x1234));
    // Above the boundary user writes are plain RAM.
    assert_eq!(map.put_word(64, 0x5678, UD), Some(()));
}

quickcheck! {
    fn word_codec_is_an_involution(x: u16) -> bool {
        big_word(big_word(x)) == x
    }

    fn longword_codec_is_an_involution(x: u32) -> bool {
        big_longword(big_longword(x)) == x
    }

    fn slice_translate_matches_bounds(addr: u32) -> bool {
        let mem = [0u8; 64];
        let in_bounds = addr as u64 + 2 <= 64;
        mem.translate(addr, 2, UD, Access::Read).is_some() == in_bounds
    }
}
