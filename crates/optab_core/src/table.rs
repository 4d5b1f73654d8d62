/*
    optab86
    Opcode table generator for 16-bit x86 emulator cores.

    Copyright 2025-2026 The optab86 Authors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the "Software"),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    optab_core::table.rs

    Assembles the 256-slot decode table from four disjoint sources:
    hand-authored explicit entries, register-indexed families, the
    ALU-offset family, and the condition families. Every insertion records
    its source; a second write to any index is a contract violation and
    fails the build.

*/

use std::{error::Error, fmt, fmt::Display};

use enumflags2::make_bitflags;
use log::debug;

use crate::{
    opcode::{Action, NumArgs, Opcode, OpcodeFlags, Placeholder, Routine, Segment},
    predicate::{cond_jump_opcode, jump_conditions, loop_conditions, loop_opcode},
};

pub const TABLE_LEN: usize = 256;

/// Which construction source claimed a slot. Kept per-slot during
/// construction so collisions can name both offenders.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Explicit,
    RegisterFamily,
    AluFamily,
    CondJump,
    Loop,
}

#[derive(Debug, PartialEq)]
pub enum TableError {
    Collision { index: u8, first: Source, second: Source },
}

impl Error for TableError {}
impl Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TableError::Collision { index, first, second } => {
                write!(
                    f,
                    "Opcode {:#04x} claimed by two table sources: {:?}, then {:?}.",
                    index, first, second
                )
            }
        }
    }
}

/// The finished table: one slot per opcode byte, `None` for illegal or
/// unimplemented opcodes.
pub struct OpcodeTable {
    slots: Vec<Option<Opcode>>,
}

impl OpcodeTable {
    pub fn get(&self, index: u8) -> Option<&Opcode> {
        self.slots[index as usize].as_ref()
    }

    pub fn slots(&self) -> &[Option<Opcode>] {
        &self.slots
    }

    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

struct TableBuilder {
    slots: Vec<Option<(Source, Opcode)>>,
}

impl TableBuilder {
    fn new() -> Self {
        Self {
            slots: (0..TABLE_LEN).map(|_| None).collect(),
        }
    }

    fn insert(&mut self, index: u8, source: Source, opcode: Opcode) -> Result<(), TableError> {
        let slot = &mut self.slots[index as usize];
        if let Some((first, _)) = slot {
            return Err(TableError::Collision {
                index,
                first: *first,
                second: source,
            });
        }
        *slot = Some((source, opcode));
        Ok(())
    }

    fn finish(self) -> OpcodeTable {
        OpcodeTable {
            slots: self.slots.into_iter().map(|s| s.map(|(_, op)| op)).collect(),
        }
    }
}

fn act(module: &'static str, name: &'static str) -> Action {
    Action::Routine(Routine::new(module, name))
}

/// Build the complete decode table. Pure: no state outside the builder,
/// deterministic output, and any index claimed twice is an error rather
/// than a silent overwrite.
pub fn build_table() -> Result<OpcodeTable, TableError> {
    let mut b = TableBuilder::new();

    add_explicit(&mut b)?;
    add_register_families(&mut b)?;
    add_alu_family(&mut b)?;
    add_cond_jumps(&mut b)?;
    add_loops(&mut b)?;

    let table = b.finish();
    debug!(
        "opcode table built: {} populated, {} undefined",
        table.populated(),
        TABLE_LEN - table.populated()
    );
    Ok(table)
}

#[rustfmt::skip]
fn add_explicit(b: &mut TableBuilder) -> Result<(), TableError> {
    use NumArgs::*;
    use Placeholder::*;
    let s = Source::Explicit;

    // NOP. Owns 0x90; the accumulator-exchange family starts at 0x91.
    b.insert(0x90, s, Opcode::new(Zero, act("mem", "nop"))
        .set_flags(make_bitflags!(OpcodeFlags::{Nop}))
        .set_mnemonic_str("nop"))?;

    // MOV
    b.insert(0x88, s, Opcode::new(Two, act("mem", "mov")).set_mnemonic_str("mov"))?;
    b.insert(0xA0, s, Opcode::new(Two, act("mem", "mov"))
        .set_placeholders(Some(Reg(0)), Some(Ptr))
        .set_mnemonic_str("mov"))?;
    b.insert(0xC6, s, Opcode::new(Two, act("mem", "mov"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("mov"))?;

    // LDS, LES, LEA
    b.insert(0xC5, s, Opcode::new(Two, act("mem", "ldw"))
        .set_flags(make_bitflags!(OpcodeFlags::{ForceDWord}))
        .set_mnemonic_str("lds"))?;
    b.insert(0xC4, s, Opcode::new(Two, act("mem", "ldw"))
        .set_flags(make_bitflags!(OpcodeFlags::{ForceDWord}))
        .set_mnemonic_str("les"))?;
    b.insert(0x8D, s, Opcode::new(Two, act("mem", "lea"))
        .set_flags(make_bitflags!(OpcodeFlags::{ForceDirection}))
        .set_mnemonic_str("lea"))?;

    // XCHG r/m, XLAT
    b.insert(0x86, s, Opcode::new(Two, act("mem", "xchg")).set_mnemonic_str("xchg"))?;
    b.insert(0xD7, s, Opcode::new(Zero, act("mem", "xlat")).set_mnemonic_str("xlat"))?;

    // String family
    b.insert(0xAC, s, Opcode::new(One, act("mem", "lods"))
        .set_placeholders(Some(Byte(0)), None)
        .set_mnemonic_str("lodsb"))?;
    b.insert(0xAD, s, Opcode::new(One, act("mem", "lods"))
        .set_placeholders(Some(Word(0)), None)
        .set_mnemonic_str("lodsw"))?;
    b.insert(0xA4, s, Opcode::new(One, act("mem", "movs"))
        .set_placeholders(Some(Byte(0)), None)
        .set_mnemonic_str("movsb"))?;
    b.insert(0xA5, s, Opcode::new(One, act("mem", "movs"))
        .set_placeholders(Some(Word(0)), None)
        .set_mnemonic_str("movsw"))?;
    b.insert(0xAA, s, Opcode::new(One, act("mem", "stos"))
        .set_placeholders(Some(Byte(0)), None)
        .set_mnemonic_str("stosb"))?;
    b.insert(0xAB, s, Opcode::new(One, act("mem", "stos"))
        .set_placeholders(Some(Word(0)), None)
        .set_mnemonic_str("stosw"))?;
    b.insert(0xA6, s, Opcode::new(Zero, act("flags", "cmps"))
        .set_placeholders(Some(Reg16(6)), Some(Reg16(7)))
        .set_mnemonic_str("cmps"))?;
    b.insert(0xAE, s, Opcode::new(Zero, act("flags", "scas"))
        .set_placeholders(Some(Reg(0)), Some(Reg16(7)))
        .set_mnemonic_str("scas"))?;

    // Sign extension
    b.insert(0x98, s, Opcode::new(Zero, act("mem", "cbw")).set_mnemonic_str("cbw"))?;
    b.insert(0x99, s, Opcode::new(Zero, act("mem", "cdw")).set_mnemonic_str("cwd"))?;

    // ALU immediate dispatch groups; mnemonic depends on the reg field.
    b.insert(0x80, s, Opcode::new(Two, act("alu", "alu_dispatch_two_args"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_func(Routine::new("alu", "alu_dispatch_two_args_mnemonic")))?;
    b.insert(0x83, s, Opcode::new(Two, act("alu", "alu_dispatch_two_args"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch}))
        .set_mnemonic_func(Routine::new("alu", "alu_dispatch_two_args_mnemonic")))?;

    // INC/DEC group, multiply group, rotate/shift group
    b.insert(0xFE, s, Opcode::new(One, act("alu", "alu_dispatch_one_arg"))
        .set_mnemonic_func(Routine::new("alu", "alu_dispatch_one_arg_mnemonic")))?;
    b.insert(0xF6, s, Opcode::new(One, act("alu", "mul_dispatch"))
        .set_mnemonic_func(Routine::new("alu", "mul_dispatch_mnemonic")))?;
    b.insert(0xD0, s, Opcode::new(Two, act("alu", "rotate_dispatch"))
        .set_placeholders(None, Some(Byte(1)))
        .set_mnemonic_func(Routine::new("alu", "rotate_dispatch_mnemonic")))?;
    b.insert(0xD2, s, Opcode::new(Two, act("alu", "rotate_dispatch"))
        .set_placeholders(None, Some(Reg8(1)))
        .set_mnemonic_func(Routine::new("alu", "rotate_dispatch_mnemonic")))?;

    // ADC, SBB. Not part of the ALU offset family.
    b.insert(0x10, s, Opcode::new(Two, act("alu", "adc")).set_mnemonic_str("adc"))?;
    b.insert(0x14, s, Opcode::new(Two, act("alu", "adc"))
        .set_placeholders(Some(Reg8(0)), Some(Imm))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("adc"))?;
    b.insert(0x18, s, Opcode::new(Two, act("alu", "sbb")).set_mnemonic_str("sbb"))?;
    b.insert(0x1C, s, Opcode::new(Two, act("alu", "sbb"))
        .set_placeholders(Some(Reg8(0)), Some(Imm))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("sbb"))?;

    // CMP, TEST
    b.insert(0x38, s, Opcode::new(Two, act("flags", "cmp"))
        .set_flags(make_bitflags!(OpcodeFlags::{SizeMismatch}))
        .set_mnemonic_str("cmp"))?;
    b.insert(0x3C, s, Opcode::new(Two, act("flags", "cmp"))
        .set_placeholders(Some(Reg(0)), Some(Imm))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("cmp"))?;
    b.insert(0x84, s, Opcode::new(Two, act("flags", "test")).set_mnemonic_str("test"))?;
    b.insert(0xA8, s, Opcode::new(Two, act("flags", "test"))
        .set_placeholders(Some(Reg(0)), Some(Imm))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("test"))?;

    // Segment register push/pop
    b.insert(0x06, s, Opcode::new(One, act("stack", "push"))
        .set_placeholders(Some(SegReg(0)), None)
        .set_mnemonic_str("push"))?;
    b.insert(0x07, s, Opcode::new(One, act("stack", "pop"))
        .set_placeholders(Some(SegReg(0)), None)
        .set_mnemonic_str("pop"))?;
    b.insert(0x0E, s, Opcode::new(One, act("stack", "push"))
        .set_placeholders(Some(SegReg(1)), None)
        .set_mnemonic_str("push"))?;
    b.insert(0x16, s, Opcode::new(One, act("stack", "push"))
        .set_placeholders(Some(SegReg(2)), None)
        .set_mnemonic_str("push"))?;
    b.insert(0x17, s, Opcode::new(One, act("stack", "pop"))
        .set_placeholders(Some(SegReg(2)), None)
        .set_mnemonic_str("pop"))?;
    b.insert(0x1E, s, Opcode::new(One, act("stack", "push"))
        .set_placeholders(Some(SegReg(3)), None)
        .set_mnemonic_str("push"))?;
    b.insert(0x1F, s, Opcode::new(One, act("stack", "pop"))
        .set_placeholders(Some(SegReg(3)), None)
        .set_mnemonic_str("pop"))?;

    // Stack misc
    b.insert(0x8F, s, Opcode::new(One, act("stack", "pop")).set_mnemonic_str("pop"))?;
    b.insert(0x9C, s, Opcode::new(Zero, act("stack", "pushf")).set_mnemonic_str("pushf"))?;
    b.insert(0x9D, s, Opcode::new(Zero, act("stack", "popf")).set_mnemonic_str("popf"))?;
    b.insert(0x60, s, Opcode::new(Zero, act("stack", "pusha")).set_mnemonic_str("pusha"))?;
    b.insert(0x61, s, Opcode::new(Zero, act("stack", "popa")).set_mnemonic_str("popa"))?;

    // CALL/RET, near and far
    b.insert(0xE8, s, Opcode::new(One, act("stack", "near_call"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceWord}))
        .set_mnemonic_str("call"))?;
    b.insert(0x9A, s, Opcode::new(One, act("stack", "far_call"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceWord}))
        .set_mnemonic_str("call"))?;
    b.insert(0xC3, s, Opcode::new(One, act("stack", "near_ret"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceWord}))
        .set_mnemonic_str("ret"))?;
    b.insert(0xCB, s, Opcode::new(One, act("stack", "far_ret"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceWord}))
        .set_mnemonic_str("retf"))?;

    // ENTER/LEAVE
    b.insert(0xC8, s, Opcode::new(Two, act("stack", "enter"))
        .set_placeholders(Some(Imm), Some(Imm))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch}))
        .set_mnemonic_str("enter"))?;
    b.insert(0xC9, s, Opcode::new(Zero, act("stack", "leave")).set_mnemonic_str("leave"))?;

    // Unconditional jumps and JCXZ. JCXZ tests the counter register, not
    // flag state, so it stays a named routine rather than a predicate.
    b.insert(0xE9, s, Opcode::new(One, act("jmp", "jmp"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("jmp"))?;
    b.insert(0xEA, s, Opcode::new(One, act("jmp", "jmp_far"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceWord}))
        .set_mnemonic_str("jmp"))?;
    b.insert(0xEB, s, Opcode::new(One, act("jmp", "jmp"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch}))
        .set_mnemonic_str("jmp"))?;
    b.insert(0xE3, s, Opcode::new(One, act("jmp", "jcxz"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch}))
        .set_seg(Segment::CS)
        .set_mnemonic_str("jcxz"))?;

    // Flag set/clear
    b.insert(0xF8, s, Opcode::new(Zero, act("flags", "clc")).set_mnemonic_str("clc"))?;
    b.insert(0xF9, s, Opcode::new(Zero, act("flags", "stc")).set_mnemonic_str("stc"))?;
    b.insert(0xFA, s, Opcode::new(Zero, act("flags", "cli")).set_mnemonic_str("cli"))?;
    b.insert(0xFB, s, Opcode::new(Zero, act("flags", "sti")).set_mnemonic_str("sti"))?;
    b.insert(0xFC, s, Opcode::new(Zero, act("flags", "cld")).set_mnemonic_str("cld"))?;
    b.insert(0xFD, s, Opcode::new(Zero, act("flags", "std")).set_mnemonic_str("std"))?;
    b.insert(0xF5, s, Opcode::new(Zero, act("flags", "cmc")).set_mnemonic_str("cmc"))?;

    // Flag transfer
    b.insert(0x9F, s, Opcode::new(Zero, act("flags", "lahf")).set_mnemonic_str("lahf"))?;
    b.insert(0x9E, s, Opcode::new(Zero, act("flags", "sahf")).set_mnemonic_str("sahf"))?;

    // ASCII adjust
    b.insert(0x37, s, Opcode::new(Zero, act("alu", "aaa")).set_mnemonic_str("aaa"))?;
    b.insert(0x3F, s, Opcode::new(Zero, act("alu", "aas")).set_mnemonic_str("aas"))?;
    b.insert(0xD4, s, Opcode::new(One, act("alu", "aam"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceByte}))
        .set_mnemonic_str("aam"))?;
    b.insert(0xD5, s, Opcode::new(One, act("alu", "aad"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceByte}))
        .set_mnemonic_str("aad"))?;

    // Repeat prefixes; the display name depends on the instruction that
    // follows, so the mnemonic is resolved at decode time.
    b.insert(0xF3, s, Opcode::new(Zero, act("mem", "rep"))
        .set_mnemonic_func(Routine::new("mem", "rep_mnemonic")))?;
    b.insert(0xF2, s, Opcode::new(Zero, act("mem", "repne"))
        .set_mnemonic_func(Routine::new("mem", "repne_mnemonic")))?;

    // Software interrupts
    b.insert(0xCC, s, Opcode::new(One, act("int", "int_req"))
        .set_placeholders(Some(Byte(3)), None)
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
        .set_mnemonic_str("int"))?;
    b.insert(0xCD, s, Opcode::new(One, act("int", "int_req"))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | ForceByte}))
        .set_mnemonic_str("int"))?;
    b.insert(0xCE, s, Opcode::new(Zero, act("int", "into")).set_mnemonic_str("into"))?;
    b.insert(0xCF, s, Opcode::new(Zero, act("int", "iret")).set_mnemonic_str("iret"))?;
    b.insert(0x62, s, Opcode::new(Two, act("int", "bound"))
        .set_flags(make_bitflags!(OpcodeFlags::{ForceDWord}))
        .set_mnemonic_str("bound"))?;

    Ok(())
}

fn add_register_families(b: &mut TableBuilder) -> Result<(), TableError> {
    use NumArgs::*;
    use Placeholder::*;
    let s = Source::RegisterFamily;

    for k in 0..8u8 {
        b.insert(
            0xB0 + k,
            s,
            Opcode::new(Two, act("mem", "mov"))
                .set_placeholders(Some(Reg8(k)), Some(Imm))
                .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
                .set_mnemonic_str("mov"),
        )?;
        b.insert(
            0xB8 + k,
            s,
            Opcode::new(Two, act("mem", "mov"))
                .set_placeholders(Some(Reg16(k)), Some(Imm))
                .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
                .set_mnemonic_str("mov"),
        )?;
        b.insert(
            0x40 + k,
            s,
            Opcode::new(Zero, act("alu", "inc"))
                .set_placeholders(Some(Reg16(k)), None)
                .set_mnemonic_str("inc"),
        )?;
        b.insert(
            0x48 + k,
            s,
            Opcode::new(Zero, act("alu", "dec"))
                .set_placeholders(Some(Reg16(k)), None)
                .set_mnemonic_str("dec"),
        )?;
        b.insert(
            0x50 + k,
            s,
            Opcode::new(One, act("stack", "push"))
                .set_placeholders(Some(Reg16(k)), None)
                .set_mnemonic_str("push"),
        )?;
        b.insert(
            0x58 + k,
            s,
            Opcode::new(One, act("stack", "pop"))
                .set_placeholders(Some(Reg16(k)), None)
                .set_mnemonic_str("pop"),
        )?;
    }

    // Accumulator exchange starts at offset 1. 0x90 is the explicit NOP
    // entry; generating offset 0 here would clobber it.
    for k in 1..8u8 {
        b.insert(
            0x90 + k,
            s,
            Opcode::new(Two, act("mem", "xchg"))
                .set_placeholders(Some(Reg16(k)), Some(Reg16(0)))
                .set_mnemonic_str("xchg"),
        )?;
    }

    Ok(())
}

// Base offsets of the two-operand ALU families. base+0x00 is the
// register/memory form, base+0x04 the accumulator/immediate form.
const ALU_OFFSETS: [(u8, &str); 5] = [
    (0x00, "add"),
    (0x28, "sub"),
    (0x30, "xor"),
    (0x20, "and"),
    (0x08, "or"),
];

fn add_alu_family(b: &mut TableBuilder) -> Result<(), TableError> {
    let s = Source::AluFamily;

    for (base, op) in ALU_OFFSETS {
        b.insert(
            base + 0x00,
            s,
            Opcode::new(NumArgs::Two, act("alu", op)).set_mnemonic_str(op),
        )?;
        b.insert(
            base + 0x04,
            s,
            Opcode::new(NumArgs::Two, act("alu", op))
                .set_placeholders(Some(Placeholder::Reg(0)), Some(Placeholder::Imm))
                .set_flags(make_bitflags!(OpcodeFlags::{Immediate}))
                .set_mnemonic_str(op),
        )?;
    }

    Ok(())
}

fn add_cond_jumps(b: &mut TableBuilder) -> Result<(), TableError> {
    for (i, (suffix, cond)) in jump_conditions().into_iter().enumerate() {
        b.insert(0x70 + i as u8, Source::CondJump, cond_jump_opcode(suffix, cond))?;
    }
    Ok(())
}

fn add_loops(b: &mut TableBuilder) -> Result<(), TableError> {
    for (i, (suffix, cond)) in loop_conditions().into_iter().enumerate() {
        b.insert(0xE0 + i as u8, Source::Loop, loop_opcode(suffix, cond))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Mnemonic;

    fn table() -> OpcodeTable {
        build_table().unwrap()
    }

    #[test]
    fn every_byte_has_exactly_one_slot() {
        let t = table();
        assert_eq!(t.slots().len(), TABLE_LEN);
    }

    #[test]
    fn sources_are_disjoint() {
        // insert() refuses the second write, so a clean build is itself the
        // pairwise-disjointness proof. Exercise the failure path directly.
        let mut b = TableBuilder::new();
        b.insert(0x90, Source::Explicit, Opcode::undefined()).unwrap();
        let err = b.insert(0x90, Source::RegisterFamily, Opcode::undefined()).unwrap_err();
        assert_eq!(
            err,
            TableError::Collision {
                index: 0x90,
                first: Source::Explicit,
                second: Source::RegisterFamily,
            }
        );
        assert!(err.to_string().contains("0x90"));
    }

    #[test]
    fn nop_owns_0x90() {
        let t = table();
        let nop = t.get(0x90).unwrap();
        assert_eq!(nop.num_args, NumArgs::Zero);
        assert!(nop.flags.contains(OpcodeFlags::Nop));
        assert_eq!(nop.mnemonic, Mnemonic::Static(String::from("nop")));
    }

    #[test]
    fn exchange_family_starts_at_0x91() {
        let t = table();
        for k in 1..8u8 {
            let xchg = t.get(0x90 + k).unwrap();
            assert_eq!(xchg.shorthand1, Some(Placeholder::Reg16(k)));
            assert_eq!(xchg.shorthand2, Some(Placeholder::Reg16(0)));
            assert_eq!(xchg.mnemonic, Mnemonic::Static(String::from("xchg")));
        }
    }

    #[test]
    fn register_families() {
        let t = table();
        for k in 0..8u8 {
            let mov8 = t.get(0xB0 + k).unwrap();
            assert_eq!(mov8.shorthand1, Some(Placeholder::Reg8(k)));
            assert!(mov8.flags.contains(OpcodeFlags::Immediate));

            let mov16 = t.get(0xB8 + k).unwrap();
            assert_eq!(mov16.shorthand1, Some(Placeholder::Reg16(k)));

            let inc = t.get(0x40 + k).unwrap();
            assert_eq!(inc.shorthand1, Some(Placeholder::Reg16(k)));
            assert_eq!(inc.mnemonic, Mnemonic::Static(String::from("inc")));

            let pop = t.get(0x58 + k).unwrap();
            assert_eq!(pop.shorthand1, Some(Placeholder::Reg16(k)));
            assert_eq!(pop.mnemonic, Mnemonic::Static(String::from("pop")));
        }
    }

    #[test]
    fn alu_family_add_forms() {
        let t = table();
        let rm = t.get(0x00).unwrap();
        assert!(!rm.flags.contains(OpcodeFlags::Immediate));
        assert!(!rm.has_shorthand());
        assert_eq!(rm.mnemonic, Mnemonic::Static(String::from("add")));

        let acc_imm = t.get(0x04).unwrap();
        assert!(acc_imm.flags.contains(OpcodeFlags::Immediate));
        assert_eq!(acc_imm.shorthand1, Some(Placeholder::Reg(0)));
        assert_eq!(acc_imm.shorthand2, Some(Placeholder::Imm));
    }

    #[test]
    fn alu_family_gaps_stay_undefined() {
        let t = table();
        assert!(t.get(0x05).is_none());
        assert!(t.get(0x2D).is_none());
        assert!(t.get(0x31).is_none());
    }

    #[test]
    fn cond_jump_family_order_and_flags() {
        let t = table();
        let suffixes = ["o", "no", "c", "nc", "e", "ne", "be", "a", "s", "ns", "p", "np", "l", "ge", "le", "g"];
        for (i, suffix) in suffixes.iter().enumerate() {
            let op = t.get(0x70 + i as u8).unwrap();
            assert_eq!(op.mnemonic, Mnemonic::Static(format!("j{}", suffix)));
            assert_eq!(op.num_args, NumArgs::One);
            assert!(op.flags.contains(OpcodeFlags::Immediate));
            assert!(op.flags.contains(OpcodeFlags::SizeMismatch));
            assert_eq!(op.segment, Segment::CS);
            assert!(matches!(op.action, Action::CondJump(_)));
        }
    }

    #[test]
    fn loop_family_order() {
        let t = table();
        let names = ["loopne", "loope", "loop"];
        for (i, name) in names.iter().enumerate() {
            let op = t.get(0xE0 + i as u8).unwrap();
            assert_eq!(op.mnemonic, Mnemonic::Static(String::from(*name)));
            assert_eq!(op.segment, Segment::CS);
            assert!(matches!(op.action, Action::Loop(_)));
        }
        assert!(t.get(0xE3).is_some()); // jcxz, explicit
    }

    #[test]
    fn dynamic_mnemonics_only_where_underdetermined() {
        let t = table();
        for (index, slot) in t.slots().iter().enumerate() {
            if let Some(op) = slot {
                if let Mnemonic::Dynamic(_) = op.mnemonic {
                    assert!(
                        matches!(index, 0x80 | 0x83 | 0xD0 | 0xD2 | 0xF2 | 0xF3 | 0xF6 | 0xFE),
                        "unexpected dynamic mnemonic at {:#04x}",
                        index
                    );
                }
            }
        }
    }

    #[test]
    fn population_is_deterministic() {
        let a = build_table().unwrap();
        let b = build_table().unwrap();
        for i in 0..TABLE_LEN {
            assert_eq!(a.slots()[i], b.slots()[i], "slot {:#04x} differs", i);
        }
        // Sanity: a healthy majority of the table is populated.
        assert!(a.populated() > 140, "only {} slots populated", a.populated());
    }
}
