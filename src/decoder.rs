// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction decoding module.
//!
//! The decoder is a 65536-entry look-up table mapping every possible opcode
//! word to its [Isa], built once on first use and shared by every emulator
//! instance. Encodings are described as 16-character bit strings where
//! letter runs are variable fields, each constrained to the values its
//! instruction accepts; everything not covered decodes to [Isa::Unknown].

use lazy_static::lazy_static;

use crate::isa::Isa;

lazy_static! {
    /// Look up the Isa of the given opcode.
    ///
    /// Use the raw opcode as the index in the array.
    pub static ref DECODER: Box<[Isa; 65536]> = generate();
}

/// Stores `isa` at every opcode matching `format`.
///
/// `format` is a 16-character string of `0`, `1` and letters. Each run of a
/// repeated letter is a variable field; `fields` gives, per field from left
/// to right, the values it takes.
fn fill(table: &mut [Isa; 65536], format: &str, fields: &[&[u8]], isa: Isa) {
    let bytes = format.as_bytes();
    debug_assert_eq!(bytes.len(), 16);

    let mut base = 0u16;
    let mut shifts = Vec::new();

    let mut i = 0;
    while i < 16 {
        let c = bytes[i];
        if c == b'0' || c == b'1' {
            if c == b'1' {
                base |= 1 << (15 - i);
            }
            i += 1;
        } else {
            while i < 16 && bytes[i] == c {
                i += 1;
            }
            shifts.push(16 - i);
        }
    }
    debug_assert_eq!(shifts.len(), fields.len());

    let mut indexes = vec![0usize; fields.len()];
    loop {
        let mut opcode = base;
        for (f, shift) in shifts.iter().enumerate() {
            opcode |= (fields[f][indexes[f]] as u16) << shift;
        }
        table[opcode as usize] = isa;

        // Odometer over the field values, rightmost field fastest.
        let mut f = fields.len();
        loop {
            if f == 0 {
                return;
            }
            f -= 1;
            indexes[f] += 1;
            if indexes[f] < fields[f].len() {
                break;
            }
            indexes[f] = 0;
        }
    }
}

const V0_1: &[u8] = &[0, 1];
const V0_2: &[u8] = &[0, 1, 2];
const V0_3: &[u8] = &[0, 1, 2, 3];
const V0_4: &[u8] = &[0, 1, 2, 3, 4];
const V0_6: &[u8] = &[0, 1, 2, 3, 4, 5, 6];
const V0_7: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
const V0_15: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
/// Alterable addressing modes: every mode but Ard.
const V0__2_6: &[u8] = &[0, 2, 3, 4, 5, 6];
const V1_2: &[u8] = &[1, 2];
const V1_3: &[u8] = &[1, 2, 3];
const V2_3: &[u8] = &[2, 3];
/// Control addressing modes.
const V2__5_6: &[u8] = &[2, 5, 6];
/// Control alterable addressing modes plus predecrement.
const V2__4_6: &[u8] = &[2, 4, 5, 6];
/// Control addressing modes plus postincrement.
const V2_3__5_6: &[u8] = &[2, 3, 5, 6];
const V2_6: &[u8] = &[2, 3, 4, 5, 6];
const V2_15: &[u8] = &[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const V4_6: &[u8] = &[4, 5, 6];
const V4_7: &[u8] = &[4, 5, 6, 7];
const V8_9__17: &[u8] = &[8, 9, 17];

fn generate() -> Box<[Isa; 65536]> {
    let mut table = Box::new([Isa::Unknown; 65536]);
    let t = &mut *table;

    let vbyte: Vec<u8> = (0..=255).collect();

    fill(t, "1100aaa10000bccc", &[V0_7, V0_1, V0_7], Isa::Abcd);

    fill(t, "1101aaabbbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::Add);
    fill(t, "1101aaabbb001ddd", &[V0_7, V1_2, V0_7], Isa::Add);
    fill(t, "1101aaabbb111ddd", &[V0_7, V0_2, V0_4], Isa::Add);
    fill(t, "1101aaabbbcccddd", &[V0_7, V4_6, V2_6, V0_7], Isa::Add);
    fill(t, "1101aaabbb111ddd", &[V0_7, V4_6, V0_1], Isa::Add);

    fill(t, "1101aaab11cccddd", &[V0_7, V0_1, V0_6, V0_7], Isa::Adda);
    fill(t, "1101aaab11111ddd", &[V0_7, V0_1, V0_4], Isa::Adda);

    fill(t, "00000110aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Addi);
    fill(t, "00000110aa111ccc", &[V0_2, V0_1], Isa::Addi);

    fill(t, "0101aaa0bbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::Addq);
    fill(t, "0101aaa0bb111ddd", &[V0_7, V0_2, V0_1], Isa::Addq);
    fill(t, "0101aaa0bb001ddd", &[V0_7, V1_2, V0_7], Isa::Addq);

    fill(t, "1101aaa1bb00cddd", &[V0_7, V0_2, V0_1, V0_7], Isa::Addx);

    fill(t, "1100aaa0bbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::And);
    fill(t, "1100aaa0bb111ddd", &[V0_7, V0_2, V0_4], Isa::And);
    fill(t, "1100aaa1bbcccddd", &[V0_7, V0_2, V2_6, V0_7], Isa::And);
    fill(t, "1100aaa1bb111ddd", &[V0_7, V0_2, V0_1], Isa::And);

    fill(t, "00000010aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Andi);
    fill(t, "00000010aa111ccc", &[V0_2, V0_1], Isa::Andi);

    t[0x023C] = Isa::Andiccr;
    t[0x027C] = Isa::Andisr;

    fill(t, "1110000a11bbbccc", &[V0_1, V2_6, V0_7], Isa::Asm);
    fill(t, "1110000a11111ccc", &[V0_1, V0_1], Isa::Asm);

    fill(t, "1110aaabccd00eee", &[V0_7, V0_1, V0_2, V0_1, V0_7], Isa::Asr);

    fill(t, "0110aaaabbbbbbbb", &[V2_15, &vbyte], Isa::Bcc);

    fill(t, "0000aaa101bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Bchg);
    fill(t, "0000aaa101111ccc", &[V0_7, V0_1], Isa::Bchg);
    fill(t, "0000100001aaabbb", &[V0__2_6, V0_7], Isa::Bchg);
    t[0x0878] = Isa::Bchg;
    t[0x0879] = Isa::Bchg;

    fill(t, "0000aaa110bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Bclr);
    fill(t, "0000aaa110111ccc", &[V0_7, V0_1], Isa::Bclr);
    fill(t, "0000100010aaabbb", &[V0__2_6, V0_7], Isa::Bclr);
    t[0x08B8] = Isa::Bclr;
    t[0x08B9] = Isa::Bclr;

    fill(t, "0100100001001aaa", &[V0_7], Isa::Bkpt);

    fill(t, "01100000aaaaaaaa", &[&vbyte], Isa::Bra);

    fill(t, "0000aaa111bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Bset);
    fill(t, "0000aaa111111ccc", &[V0_7, V0_1], Isa::Bset);
    fill(t, "0000100011aaabbb", &[V0__2_6, V0_7], Isa::Bset);
    t[0x08F8] = Isa::Bset;
    t[0x08F9] = Isa::Bset;

    fill(t, "01100001aaaaaaaa", &[&vbyte], Isa::Bsr);

    fill(t, "0000aaa100bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Btst);
    fill(t, "0000aaa100111ccc", &[V0_7, V0_4], Isa::Btst);
    fill(t, "0000100000aaabbb", &[V0__2_6, V0_7], Isa::Btst);
    t[0x0838] = Isa::Btst;
    t[0x0839] = Isa::Btst;
    t[0x083A] = Isa::Btst;
    t[0x083B] = Isa::Btst;

    fill(t, "0100aaa110bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Chk);
    fill(t, "0100aaa110111ccc", &[V0_7, V0_4], Isa::Chk);

    fill(t, "01000010aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Clr);
    fill(t, "01000010aa111ccc", &[V0_2, V0_1], Isa::Clr);

    fill(t, "1011aaa000cccddd", &[V0_7, V0__2_6, V0_7], Isa::Cmp);
    fill(t, "1011aaa000111ddd", &[V0_7, V0_4], Isa::Cmp);
    fill(t, "1011aaa0bbcccddd", &[V0_7, V1_2, V0_6, V0_7], Isa::Cmp);
    fill(t, "1011aaa0bb111ddd", &[V0_7, V1_2, V0_4], Isa::Cmp);

    fill(t, "1011aaab11cccddd", &[V0_7, V0_1, V0_6, V0_7], Isa::Cmpa);
    fill(t, "1011aaab11111ddd", &[V0_7, V0_1, V0_4], Isa::Cmpa);

    fill(t, "00001100aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Cmpi);
    fill(t, "00001100aa111ccc", &[V0_2, V0_1], Isa::Cmpi);

    fill(t, "1011aaa1bb001ccc", &[V0_7, V0_2, V0_7], Isa::Cmpm);

    fill(t, "0101aaaa11001bbb", &[V0_15, V0_7], Isa::Dbcc);

    fill(t, "1000aaa111bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Divs);
    fill(t, "1000aaa111111ccc", &[V0_7, V0_4], Isa::Divs);

    fill(t, "1000aaa011bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Divu);
    fill(t, "1000aaa011111ccc", &[V0_7, V0_4], Isa::Divu);

    fill(t, "1011aaa1bbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::Eor);
    fill(t, "1011aaa1bb111ddd", &[V0_7, V0_2, V0_1], Isa::Eor);

    fill(t, "00001010aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Eori);
    fill(t, "00001010aa111ccc", &[V0_2, V0_1], Isa::Eori);

    t[0x0A3C] = Isa::Eoriccr;
    t[0x0A7C] = Isa::Eorisr;

    fill(t, "1100aaa1bbbbbccc", &[V0_7, V8_9__17, V0_7], Isa::Exg);

    fill(t, "0100100aaa000bbb", &[V2_3, V0_7], Isa::Ext);

    t[0x4AFC] = Isa::Illegal;

    fill(t, "0100111011aaabbb", &[V2__5_6, V0_7], Isa::Jmp);
    fill(t, "0100111011111bbb", &[V0_3], Isa::Jmp);

    fill(t, "0100111010aaabbb", &[V2__5_6, V0_7], Isa::Jsr);
    fill(t, "0100111010111bbb", &[V0_3], Isa::Jsr);

    fill(t, "0100aaa111bbbccc", &[V0_7, V2__5_6, V0_7], Isa::Lea);
    fill(t, "0100aaa111111ccc", &[V0_7, V0_3], Isa::Lea);

    // The whole line A and line F opcode spaces take their dedicated vectors.
    for opcode in 0xA000..=0xAFFF {
        t[opcode] = Isa::LineA;
    }
    for opcode in 0xF000..=0xFFFF {
        t[opcode] = Isa::LineF;
    }

    fill(t, "0100111001010aaa", &[V0_7], Isa::Link);

    fill(t, "1110001a11bbbccc", &[V0_1, V2_6, V0_7], Isa::Lsm);
    fill(t, "1110001a11111ccc", &[V0_1, V0_1], Isa::Lsm);

    fill(t, "1110aaabccd01eee", &[V0_7, V0_1, V0_2, V0_1, V0_7], Isa::Lsr);

    fill(t, "00aabbbcccdddeee", &[V1_3, V0_7, V0__2_6, V0__2_6, V0_7], Isa::Move);
    fill(t, "00aabbb111dddeee", &[V1_3, V0_1, V0__2_6, V0_7], Isa::Move);
    fill(t, "00aabbbccc111eee", &[V1_3, V0_7, V0__2_6, V0_4], Isa::Move);
    fill(t, "00aabbb111111eee", &[V1_3, V0_1, V0_4], Isa::Move);
    fill(t, "00aabbbccc001eee", &[V2_3, V0_7, V0__2_6, V0_7], Isa::Move);
    fill(t, "00aabbb111001eee", &[V2_3, V0_1, V0_7], Isa::Move);

    fill(t, "001abbb001cccddd", &[V0_1, V0_7, V0_6, V0_7], Isa::Movea);
    fill(t, "001abbb001111ddd", &[V0_1, V0_7, V0_4], Isa::Movea);

    fill(t, "0100010011aaabbb", &[V0__2_6, V0_7], Isa::Moveccr);
    fill(t, "0100010011111bbb", &[V0_4], Isa::Moveccr);

    fill(t, "0100000011aaabbb", &[V0__2_6, V0_7], Isa::Movefsr);
    t[0x40F8] = Isa::Movefsr;
    t[0x40F9] = Isa::Movefsr;

    fill(t, "0100011011aaabbb", &[V0__2_6, V0_7], Isa::Movesr);
    fill(t, "0100011011111bbb", &[V0_4], Isa::Movesr);

    fill(t, "010011100110abbb", &[V0_1, V0_7], Isa::Moveusp);

    // Registers to memory never postincrements, memory to registers never
    // predecrements.
    fill(t, "010010001bcccddd", &[V0_1, V2__4_6, V0_7], Isa::Movem);
    fill(t, "010010001b111ddd", &[V0_1, V0_1], Isa::Movem);
    fill(t, "010011001bcccddd", &[V0_1, V2_3__5_6, V0_7], Isa::Movem);
    fill(t, "010011001b111ddd", &[V0_1, V0_3], Isa::Movem);

    fill(t, "0000aaabbb001ccc", &[V0_7, V4_7, V0_7], Isa::Movep);

    fill(t, "0111aaa0bbbbbbbb", &[V0_7, &vbyte], Isa::Moveq);

    fill(t, "1100aaa111bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Muls);
    fill(t, "1100aaa111111ccc", &[V0_7, V0_4], Isa::Muls);

    fill(t, "1100aaa011bbbccc", &[V0_7, V0__2_6, V0_7], Isa::Mulu);
    fill(t, "1100aaa011111ccc", &[V0_7, V0_4], Isa::Mulu);

    fill(t, "0100100000aaabbb", &[V0__2_6, V0_7], Isa::Nbcd);
    t[0x4838] = Isa::Nbcd;
    t[0x4839] = Isa::Nbcd;

    fill(t, "01000100aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Neg);
    fill(t, "01000100aa111ccc", &[V0_2, V0_1], Isa::Neg);

    fill(t, "01000000aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Negx);
    fill(t, "01000000aa111ccc", &[V0_2, V0_1], Isa::Negx);

    t[0x4E71] = Isa::Nop;

    fill(t, "01000110aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Not);
    fill(t, "01000110aa111ccc", &[V0_2, V0_1], Isa::Not);

    fill(t, "1000aaa0bbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::Or);
    fill(t, "1000aaa0bb111ddd", &[V0_7, V0_2, V0_4], Isa::Or);
    fill(t, "1000aaa1bbcccddd", &[V0_7, V0_2, V2_6, V0_7], Isa::Or);
    fill(t, "1000aaa1bb111ddd", &[V0_7, V0_2, V0_1], Isa::Or);

    fill(t, "00000000aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Ori);
    fill(t, "00000000aa111ccc", &[V0_2, V0_1], Isa::Ori);

    t[0x003C] = Isa::Oriccr;
    t[0x007C] = Isa::Orisr;

    fill(t, "0100100001aaabbb", &[V2__5_6, V0_7], Isa::Pea);
    fill(t, "0100100001111bbb", &[V0_3], Isa::Pea);

    t[0x4E70] = Isa::Reset;

    fill(t, "1110011a11bbbccc", &[V0_1, V2_6, V0_7], Isa::Rom);
    fill(t, "1110011a11111ccc", &[V0_1, V0_1], Isa::Rom);

    fill(t, "1110aaabccd11eee", &[V0_7, V0_1, V0_2, V0_1, V0_7], Isa::Ror);

    fill(t, "1110010a11bbbccc", &[V0_1, V2_6, V0_7], Isa::Roxm);
    fill(t, "1110010a11111ccc", &[V0_1, V0_1], Isa::Roxm);

    fill(t, "1110aaabccd10eee", &[V0_7, V0_1, V0_2, V0_1, V0_7], Isa::Roxr);

    t[0x4E73] = Isa::Rte;
    t[0x4E77] = Isa::Rtr;
    t[0x4E75] = Isa::Rts;

    fill(t, "1000aaa10000bccc", &[V0_7, V0_1, V0_7], Isa::Sbcd);

    fill(t, "0101aaaa11bbbccc", &[V0_15, V0__2_6, V0_7], Isa::Scc);
    fill(t, "0101aaaa11111ccc", &[V0_15, V0_1], Isa::Scc);

    t[0x4E72] = Isa::Stop;

    fill(t, "1001aaabbbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::Sub);
    fill(t, "1001aaabbb001ddd", &[V0_7, V1_2, V0_7], Isa::Sub);
    fill(t, "1001aaabbb111ddd", &[V0_7, V0_2, V0_4], Isa::Sub);
    fill(t, "1001aaabbbcccddd", &[V0_7, V4_6, V2_6, V0_7], Isa::Sub);
    fill(t, "1001aaabbb111ddd", &[V0_7, V4_6, V0_1], Isa::Sub);

    fill(t, "1001aaab11cccddd", &[V0_7, V0_1, V0_6, V0_7], Isa::Suba);
    fill(t, "1001aaab11111ddd", &[V0_7, V0_1, V0_4], Isa::Suba);

    fill(t, "00000100aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Subi);
    fill(t, "00000100aa111ccc", &[V0_2, V0_1], Isa::Subi);

    fill(t, "0101aaa1bbcccddd", &[V0_7, V0_2, V0__2_6, V0_7], Isa::Subq);
    fill(t, "0101aaa1bb111ddd", &[V0_7, V0_2, V0_1], Isa::Subq);
    fill(t, "0101aaa1bb001ddd", &[V0_7, V1_2, V0_7], Isa::Subq);

    fill(t, "1001aaa1bb00cddd", &[V0_7, V0_2, V0_1, V0_7], Isa::Subx);

    fill(t, "0100100001000aaa", &[V0_7], Isa::Swap);

    fill(t, "0100101011aaabbb", &[V0__2_6, V0_7], Isa::Tas);
    t[0x4AF8] = Isa::Tas;
    t[0x4AF9] = Isa::Tas;

    fill(t, "010011100100aaaa", &[V0_15], Isa::Trap);

    t[0x4E76] = Isa::Trapv;

    fill(t, "01001010aabbbccc", &[V0_2, V0__2_6, V0_7], Isa::Tst);
    fill(t, "01001010aa111ccc", &[V0_2, V0_1], Isa::Tst);

    fill(t, "0100111001011aaa", &[V0_7], Isa::Unlk);

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_encodings() {
        assert_eq!(DECODER[0x4E71], Isa::Nop);
        assert_eq!(DECODER[0x4E72], Isa::Stop);
        assert_eq!(DECODER[0x4E75], Isa::Rts);
        assert_eq!(DECODER[0x4AFC], Isa::Illegal);
        assert_eq!(DECODER[0x003C], Isa::Oriccr);
    }

    #[test]
    fn breakpoints() {
        for n in 0..8 {
            assert_eq!(DECODER[0x4848 + n], Isa::Bkpt);
        }
        assert_eq!(DECODER[0x4840], Isa::Swap);
        assert_eq!(DECODER[0x4850], Isa::Pea);
    }

    #[test]
    fn unassigned_lines() {
        assert_eq!(DECODER[0xA000], Isa::LineA);
        assert_eq!(DECODER[0xA123], Isa::LineA);
        assert_eq!(DECODER[0xAFFF], Isa::LineA);
        assert_eq!(DECODER[0xF000], Isa::LineF);
        assert_eq!(DECODER[0xFFFF], Isa::LineF);
    }

    #[test]
    fn multiply_encodings() {
        assert_eq!(DECODER[0xC0C1], Isa::Mulu); // MULU.W D1,D0
        assert_eq!(DECODER[0xC1C1], Isa::Muls); // MULS.W D1,D0
        assert_eq!(DECODER[0xC0FC], Isa::Mulu); // MULU.W #imm,D0
    }

    #[test]
    fn movem_direction_restricts_modes() {
        assert_eq!(DECODER[0x48A0], Isa::Movem); // MOVEM.W regs,-(A0)
        assert_eq!(DECODER[0x4C98], Isa::Movem); // MOVEM.W (A0)+,regs
        assert_eq!(DECODER[0x4898], Isa::Unknown); // regs,(A0)+
        assert_eq!(DECODER[0x4CA0], Isa::Unknown); // -(A0),regs
    }

    #[test]
    fn holes_are_unknown() {
        assert_eq!(DECODER[0x4AFA], Isa::Unknown);
        assert_eq!(DECODER[0x0008], Isa::Unknown); // ORI.B to Ard
    }
}
