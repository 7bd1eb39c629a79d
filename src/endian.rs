// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Big-endian codec.
//!
//! The 68000 bus is big-endian regardless of the host, so every multi-byte
//! value crossing the memory boundary goes through these functions.

/// Converts a 16-bits value between host and big-endian byte order.
///
/// The conversion is its own inverse: `big_word(big_word(x)) == x`.
#[inline(always)]
pub const fn big_word(data: u16) -> u16 {
    data.to_be()
}

/// Converts a 32-bits value between host and big-endian byte order.
///
/// The conversion is its own inverse: `big_longword(big_longword(x)) == x`.
#[inline(always)]
pub const fn big_longword(data: u32) -> u32 {
    data.to_be()
}

/// Reads a big-endian 16-bits integer from the first two bytes of the slice.
#[inline(always)]
pub fn read_big_word(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Reads a big-endian 32-bits integer from the first four bytes of the slice.
#[inline(always)]
pub fn read_big_longword(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Stores the given 16-bits integer in the first two bytes of the slice, big-endian.
#[inline(always)]
pub fn write_big_word(bytes: &mut [u8], data: u16) {
    bytes[..2].copy_from_slice(&data.to_be_bytes());
}

/// Stores the given 32-bits integer in the first four bytes of the slice, big-endian.
#[inline(always)]
pub fn write_big_longword(bytes: &mut [u8], data: u32) {
    bytes[..4].copy_from_slice(&data.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_round_trip() {
        let mut buf = [0u8; 4];

        write_big_word(&mut buf, 0x4E72);
        assert_eq!(buf[0], 0x4E);
        assert_eq!(buf[1], 0x72);
        assert_eq!(read_big_word(&buf), 0x4E72);

        write_big_longword(&mut buf, 0x0001_0400);
        assert_eq!(buf, [0x00, 0x01, 0x04, 0x00]);
        assert_eq!(read_big_longword(&buf), 0x0001_0400);
    }
}
