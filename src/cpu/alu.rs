//! Arithmetic, logic and control-flow primitives
//!
//! The `inc_byte`/`dec_byte`/`add`/`adc`/`sub`/`sbc`/`daa`/rotate/shift/
//! `call`/`ret`/... family used by opcode dispatch. Pure byte/word ALU
//! helpers take and return values so `execute.rs`'s register-selector
//! dispatch can share one implementation across B/C/D/E/H/L/(HL)/A; helpers
//! that need bus access or extra internal cycles take `&mut Mmu` directly.

use super::flags::{FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use super::Cpu;
use crate::mmu::Mmu;

impl Cpu {
    pub(super) fn inc_byte(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, result & 0xF == 0);
        result
    }

    pub(super) fn dec_byte(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, true);
        self.state.set_flag(FLAG_H, value & 0xF == 0);
        result
    }

    /// 16-bit INC/DEC don't touch flags and cost one extra internal cycle.
    pub(super) fn inc_word(&mut self, mmu: &mut Mmu, value: u16) -> u16 {
        mmu.clock.add(4);
        value.wrapping_add(1)
    }

    pub(super) fn dec_word(&mut self, mmu: &mut Mmu, value: u16) -> u16 {
        mmu.clock.add(4);
        value.wrapping_sub(1)
    }

    /// ADD HL,rr - H/C come from bit 11/bit 15 carries, Z is untouched.
    pub(super) fn add_word(&mut self, mmu: &mut Mmu, lhs: u16, rhs: u16) -> u16 {
        mmu.clock.add(4);
        let result = lhs.wrapping_add(rhs);
        self.state.set_flag(FLAG_N, false);
        self.state
            .set_flag(FLAG_H, (lhs & 0xFFF) + (rhs & 0xFFF) > 0xFFF);
        self.state
            .set_flag(FLAG_C, (lhs as u32) + (rhs as u32) > 0xFFFF);
        result
    }

    /// ADD SP,r8 - flags are computed exactly like an 8-bit add of SP's low
    /// byte with the signed offset; Z and N are always cleared. Costs two
    /// internal cycles (vs one for `load_add_signed`'s LD HL,SP+r8).
    pub(super) fn add_word_signed(&mut self, mmu: &mut Mmu, lhs: u16, offset: i8) -> u16 {
        mmu.clock.add(8);
        let offset16 = offset as i16 as u16;
        let low = lhs as u8;
        let low_offset = offset16 as u8;
        self.state.set_flag(FLAG_Z, false);
        self.state.set_flag(FLAG_N, false);
        self.state
            .set_flag(FLAG_H, (low & 0xF) + (low_offset & 0xF) > 0xF);
        self.state
            .set_flag(FLAG_C, (low as u16) + (low_offset as u16) > 0xFF);
        lhs.wrapping_add(offset16)
    }

    /// LD HL,SP+r8 shares ADD SP,r8's flag computation but doesn't write SP
    /// and doesn't cost the extra internal cycle ADD SP,r8 has.
    pub(super) fn load_add_signed(&mut self, mmu: &mut Mmu, sp: u16, offset: i8) -> u16 {
        mmu.clock.add(4);
        let offset16 = offset as i16 as u16;
        let low = sp as u8;
        let low_offset = offset16 as u8;
        self.state.set_flag(FLAG_Z, false);
        self.state.set_flag(FLAG_N, false);
        self.state
            .set_flag(FLAG_H, (low & 0xF) + (low_offset & 0xF) > 0xF);
        self.state
            .set_flag(FLAG_C, (low as u16) + (low_offset as u16) > 0xFF);
        sp.wrapping_add(offset16)
    }

    pub(super) fn add(&mut self, value: u8) {
        let a = self.state.a;
        let result = a.wrapping_add(value);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, (a & 0xF) + (value & 0xF) > 0xF);
        self.state
            .set_flag(FLAG_C, (a as u16) + (value as u16) > 0xFF);
        self.state.a = result;
    }

    pub(super) fn adc(&mut self, value: u8) {
        let a = self.state.a;
        let carry = self.state.flag(FLAG_C) as u8;
        let result = a.wrapping_add(value).wrapping_add(carry);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, false);
        self.state
            .set_flag(FLAG_H, (a & 0xF) + (value & 0xF) + carry > 0xF);
        self.state
            .set_flag(FLAG_C, (a as u16) + (value as u16) + (carry as u16) > 0xFF);
        self.state.a = result;
    }

    pub(super) fn sub(&mut self, value: u8) {
        let a = self.state.a;
        let result = a.wrapping_sub(value);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, true);
        self.state.set_flag(FLAG_H, (a & 0xF) < (value & 0xF));
        self.state.set_flag(FLAG_C, (a as u16) < (value as u16));
        self.state.a = result;
    }

    pub(super) fn sbc(&mut self, value: u8) {
        let a = self.state.a;
        let carry = self.state.flag(FLAG_C) as u8;
        let result = a.wrapping_sub(value).wrapping_sub(carry);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, true);
        self.state
            .set_flag(FLAG_H, (a & 0xF) < (value & 0xF) + carry);
        self.state
            .set_flag(FLAG_C, (a as u16) < (value as u16) + (carry as u16));
        self.state.a = result;
    }

    pub(super) fn cp(&mut self, value: u8) {
        let a = self.state.a;
        self.sub(value);
        self.state.a = a;
    }

    pub(super) fn and_a(&mut self, value: u8) {
        self.state.a &= value;
        self.state.set_flag(FLAG_Z, self.state.a == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, true);
        self.state.set_flag(FLAG_C, false);
    }

    pub(super) fn xor_a(&mut self, value: u8) {
        self.state.a ^= value;
        self.state.set_flag(FLAG_Z, self.state.a == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, false);
    }

    pub(super) fn or_a(&mut self, value: u8) {
        self.state.a |= value;
        self.state.set_flag(FLAG_Z, self.state.a == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, false);
    }

    /// `rlca`/`rrca` clear F entirely before setting C - unlike the
    /// CB-prefixed `rlc`/`rrc`, Z is never set from the rotated result.
    pub(super) fn rlca(&mut self) {
        let carry = self.state.a >> 7;
        self.state.a = (self.state.a << 1) | carry;
        self.state.f = 0;
        self.state.set_flag(FLAG_C, carry != 0);
    }

    pub(super) fn rrca(&mut self) {
        let carry = self.state.a & 1;
        self.state.a = (self.state.a >> 1) | (carry << 7);
        self.state.f = 0;
        self.state.set_flag(FLAG_C, carry != 0);
    }

    pub(super) fn rla(&mut self) {
        let old_carry = self.state.flag(FLAG_C) as u8;
        let new_carry = self.state.a >> 7;
        self.state.a = (self.state.a << 1) | old_carry;
        self.state.f = 0;
        self.state.set_flag(FLAG_C, new_carry != 0);
    }

    pub(super) fn rra(&mut self) {
        let old_carry = self.state.flag(FLAG_C) as u8;
        let new_carry = self.state.a & 1;
        self.state.a = (self.state.a >> 1) | (old_carry << 7);
        self.state.f = 0;
        self.state.set_flag(FLAG_C, new_carry != 0);
    }

    pub(super) fn rlc(&mut self, value: u8) -> u8 {
        let carry = value >> 7;
        let result = (value << 1) | carry;
        self.set_rotate_flags(result, carry != 0);
        result
    }

    pub(super) fn rrc(&mut self, value: u8) -> u8 {
        let carry = value & 1;
        let result = (value >> 1) | (carry << 7);
        self.set_rotate_flags(result, carry != 0);
        result
    }

    pub(super) fn rl(&mut self, value: u8) -> u8 {
        let old_carry = self.state.flag(FLAG_C) as u8;
        let new_carry = value >> 7;
        let result = (value << 1) | old_carry;
        self.set_rotate_flags(result, new_carry != 0);
        result
    }

    pub(super) fn rr(&mut self, value: u8) -> u8 {
        let old_carry = self.state.flag(FLAG_C) as u8;
        let new_carry = value & 1;
        let result = (value >> 1) | (old_carry << 7);
        self.set_rotate_flags(result, new_carry != 0);
        result
    }

    pub(super) fn sla(&mut self, value: u8) -> u8 {
        let carry = value >> 7;
        let result = value << 1;
        self.set_rotate_flags(result, carry != 0);
        result
    }

    pub(super) fn sra(&mut self, value: u8) -> u8 {
        let carry = value & 1;
        let result = (value >> 1) | (value & 0x80);
        self.set_rotate_flags(result, carry != 0);
        result
    }

    pub(super) fn swap(&mut self, value: u8) -> u8 {
        let result = (value << 4) | (value >> 4);
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, false);
        result
    }

    pub(super) fn srl(&mut self, value: u8) -> u8 {
        let carry = value & 1;
        let result = value >> 1;
        self.set_rotate_flags(result, carry != 0);
        result
    }

    fn set_rotate_flags(&mut self, result: u8, carry: bool) {
        self.state.set_flag(FLAG_Z, result == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, carry);
    }

    pub(super) fn bit(&mut self, bit_index: u8, value: u8) {
        self.state.set_flag(FLAG_Z, value & (1 << bit_index) == 0);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, true);
    }

    pub(super) fn res(&mut self, bit_index: u8, value: u8) -> u8 {
        value & !(1 << bit_index)
    }

    pub(super) fn set(&mut self, bit_index: u8, value: u8) -> u8 {
        value | (1 << bit_index)
    }

    pub(super) fn daa(&mut self) {
        let mut adjust = 0u8;
        let mut carry = self.state.flag(FLAG_C);

        if self.state.flag(FLAG_N) {
            if self.state.flag(FLAG_H) {
                adjust = adjust.wrapping_add(0x06);
            }
            if carry {
                adjust = adjust.wrapping_add(0x60);
            }
            self.state.a = self.state.a.wrapping_sub(adjust);
        } else {
            if self.state.flag(FLAG_H) || self.state.a & 0xF > 0x9 {
                adjust = adjust.wrapping_add(0x06);
            }
            if carry || self.state.a > 0x99 {
                adjust = adjust.wrapping_add(0x60);
                carry = true;
            }
            self.state.a = self.state.a.wrapping_add(adjust);
        }

        self.state.set_flag(FLAG_Z, self.state.a == 0);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, carry);
    }

    pub(super) fn cpl(&mut self) {
        self.state.a = !self.state.a;
        self.state.set_flag(FLAG_N, true);
        self.state.set_flag(FLAG_H, true);
    }

    pub(super) fn scf(&mut self) {
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, true);
    }

    pub(super) fn ccf(&mut self) {
        let carry = self.state.flag(FLAG_C);
        self.state.set_flag(FLAG_N, false);
        self.state.set_flag(FLAG_H, false);
        self.state.set_flag(FLAG_C, !carry);
    }

    /// Unconditional relative jump; the offset byte must already have been
    /// fetched by the caller. Costs one extra internal cycle.
    pub(super) fn jmp_rel(&mut self, mmu: &mut Mmu, offset: i8) {
        mmu.clock.add(4);
        self.state.pc = self.state.pc.wrapping_add(offset as i16 as u16);
    }

    /// Unconditional absolute jump. `JP (HL)` does NOT go through this - it
    /// writes PC directly with no extra cycle.
    pub(super) fn jmp(&mut self, mmu: &mut Mmu, address: u16) {
        mmu.clock.add(4);
        self.state.pc = address;
    }

    pub(super) fn push(&mut self, mmu: &mut Mmu, value: u16) {
        mmu.clock.add(4);
        self.state.sp = self.state.sp.wrapping_sub(1);
        self.write_at(mmu, self.state.sp, (value >> 8) as u8);
        self.state.sp = self.state.sp.wrapping_sub(1);
        self.write_at(mmu, self.state.sp, value as u8);
    }

    pub(super) fn pop(&mut self, mmu: &mut Mmu) -> u16 {
        let lo = self.read_at(mmu, self.state.sp) as u16;
        self.state.sp = self.state.sp.wrapping_add(1);
        let hi = self.read_at(mmu, self.state.sp) as u16;
        self.state.sp = self.state.sp.wrapping_add(1);
        lo | (hi << 8)
    }

    /// Shared by `CALL`, `RST`, and the interrupt dispatch in `mod.rs` -
    /// `_is_interrupt` is unused but documents the call site; all three
    /// push the current PC and jump unconditionally with identical timing.
    pub(super) fn call(&mut self, mmu: &mut Mmu, address: u16, _is_interrupt: bool) {
        let pc = self.state.pc;
        self.push(mmu, pc);
        self.state.pc = address;
    }

    pub(super) fn ret(&mut self, mmu: &mut Mmu) {
        let address = self.pop(mmu);
        mmu.clock.add(4);
        self.state.pc = address;
    }

    pub(super) fn reti(&mut self, mmu: &mut Mmu) {
        let address = self.pop(mmu);
        mmu.clock.add(4);
        self.state.pc = address;
        self.state.ime = true;
        self.state.next_ime = true;
    }
}
