// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! M68000 status register.

use crate::utils::bits;

/// M68000 status register.
///
/// [StatusRegister::default] returns a Status Register set to 0x2700 (supervisor bit set, interrupt mask to 7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusRegister {
    /// Trace
    pub t: bool,
    /// Supervisor
    pub s: bool,
    /// Interrupt Priority Mask
    pub interrupt_mask: u8,
    /// Extend
    pub x: bool,
    /// Negative
    pub n: bool,
    /// Zero
    pub z: bool,
    /// Overflow
    pub v: bool,
    /// Carry
    pub c: bool,
}

impl StatusRegister {
    /// The default raw value of 0x2700 (supervisor bit set, interrupt mask to 7).
    pub const DEFAULT: u16 = 0x2700;

    const fn cond_t(&self) -> bool {
        true
    }

    const fn cond_f(&self) -> bool {
        false
    }

    const fn cond_hi(&self) -> bool {
        !self.c && !self.z
    }

    const fn cond_ls(&self) -> bool {
        self.c || self.z
    }

    const fn cond_cc(&self) -> bool {
        !self.c
    }

    const fn cond_cs(&self) -> bool {
        self.c
    }

    const fn cond_ne(&self) -> bool {
        !self.z
    }

    const fn cond_eq(&self) -> bool {
        self.z
    }

    const fn cond_vc(&self) -> bool {
        !self.v
    }

    const fn cond_vs(&self) -> bool {
        self.v
    }

    const fn cond_pl(&self) -> bool {
        !self.n
    }

    const fn cond_mi(&self) -> bool {
        self.n
    }

    const fn cond_ge(&self) -> bool {
        self.n == self.v
    }

    const fn cond_lt(&self) -> bool {
        self.n != self.v
    }

    const fn cond_gt(&self) -> bool {
        !self.z && self.n == self.v
    }

    const fn cond_le(&self) -> bool {
        self.z || self.n != self.v
    }

    const CONDITIONS: [fn(&Self) -> bool; 16] = [
        Self::cond_t,  Self::cond_f,  Self::cond_hi, Self::cond_ls,
        Self::cond_cc, Self::cond_cs, Self::cond_ne, Self::cond_eq,
        Self::cond_vc, Self::cond_vs, Self::cond_pl, Self::cond_mi,
        Self::cond_ge, Self::cond_lt, Self::cond_gt, Self::cond_le,
    ];

    /// Tests the given condition from the raw bits of conditional instructions.
    pub fn condition(&self, cc: u8) -> bool {
        Self::CONDITIONS[cc as usize](self)
    }

    /// Sets the CCR bits to the one's of the given status register. Supervisor bits are unchanged.
    pub fn set_ccr(&mut self, sr: u16) {
        self.x = bits(sr, 4, 4) != 0;
        self.n = bits(sr, 3, 3) != 0;
        self.z = bits(sr, 2, 2) != 0;
        self.v = bits(sr, 1, 1) != 0;
        self.c = bits(sr, 0, 0) != 0;
    }

    /// Returns the N, Z, V and C flags packed in the low 4 bits, N highest.
    pub const fn nzvc(&self) -> u8 {
        (self.n as u8) << 3 |
        (self.z as u8) << 2 |
        (self.v as u8) << 1 |
        self.c as u8
    }

    /// Returns the CCR (X, N, Z, V, C) packed in the low 5 bits.
    pub const fn ccr(&self) -> u16 {
        (self.x as u16) << 4 | self.nzvc() as u16
    }
}

impl Default for StatusRegister {
    /// Returns a Status Register set to 0x2700 (supervisor bit set, interrupt mask to 7).
    fn default() -> Self {
        StatusRegister::from(StatusRegister::DEFAULT)
    }
}

impl From<u16> for StatusRegister {
    fn from(sr: u16) -> Self {
        Self {
            t: bits(sr, 15, 15) != 0,
            s: bits(sr, 13, 13) != 0,
            interrupt_mask: bits(sr, 8, 10) as u8,
            x: bits(sr, 4, 4) != 0,
            n: bits(sr, 3, 3) != 0,
            z: bits(sr, 2, 2) != 0,
            v: bits(sr, 1, 1) != 0,
            c: bits(sr, 0, 0) != 0,
        }
    }
}

impl From<StatusRegister> for u16 {
    fn from(sr: StatusRegister) -> u16 {
        (sr.t as u16) << 15 |
        (sr.s as u16) << 13 |
        (sr.interrupt_mask as u16) << 8 |
        sr.ccr()
    }
}

impl std::ops::BitAndAssign<u16> for StatusRegister {
    fn bitand_assign(&mut self, rhs: u16) {
        *self = Self::from(u16::from(*self) & rhs);
    }
}

impl std::ops::BitOrAssign<u16> for StatusRegister {
    fn bitor_assign(&mut self, rhs: u16) {
        *self = Self::from(u16::from(*self) | rhs);
    }
}

impl std::ops::BitXorAssign<u16> for StatusRegister {
    fn bitxor_assign(&mut self, rhs: u16) {
        *self = Self::from(u16::from(*self) ^ rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_conversions() {
        let sr = StatusRegister::from(0x2EFF);
        assert!(sr.s);
        assert!(!sr.t);
        assert_eq!(sr.interrupt_mask, 6);
        assert_eq!(u16::from(sr), 0x261F);
    }

    #[test]
    fn ccr_protects_system_bits() {
        let mut sr = StatusRegister::default();
        sr.set_ccr(0xFFFF);
        assert_eq!(u16::from(sr), 0x271F);
        sr.set_ccr(0);
        assert_eq!(u16::from(sr), 0x2700);
    }

    #[test]
    fn signed_conditions() {
        let mut sr = StatusRegister::default();
        sr.n = true;
        sr.v = true;
        assert!(sr.condition(12)); // GE
        assert!(!sr.condition(13)); // LT
        sr.z = true;
        assert!(!sr.condition(14)); // GT
        assert!(sr.condition(15)); // LE
    }
}
