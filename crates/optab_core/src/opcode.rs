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

    optab_core::opcode.rs

    The schema for a single decode-table entry: operand count, action
    identity, mnemonic, implicit operands, decode modifier flags and the
    default segment. A pure value holder; all table semantics live in the
    table builder.

*/

use std::fmt;

use enumflags2::{bitflags, BitFlags};
use strum_macros::Display;

use crate::predicate::Cond;

/// Decode modifier flags. Bit values match the table consumer's
/// `OpcodeFlags` declaration; the emitter prints these by variant name.
#[bitflags]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OpcodeFlags {
    Immediate = 0x0001,
    SizeMismatch = 0x0002,
    Nop = 0x0004,
    ForceWord = 0x0008,
    ForceByte = 0x0010,
    ForceDWord = 0x0020,
    ForceDirection = 0x0040,
}

/// Number of operand slots the decoder fills after the opcode byte,
/// whether parsed from the instruction stream or pre-filled from the
/// record's implicit operands.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum NumArgs {
    Zero,
    One,
    Two,
}

/// Default segment register an instruction addresses through, absent an
/// override prefix.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Segment {
    DS,
    ES,
    CS,
}

/// An implicit operand, fixed by the instruction's identity rather than
/// encoded in the bytes that follow.
///
/// `Reg` is a register whose width is resolved by the width bit at decode
/// time. `SegReg` indices follow the x86 segment field encoding
/// (ES=0, CS=1, SS=2, DS=3). `Imm` marks a slot to be filled from the
/// immediate data that the `Immediate` flag says follows the opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placeholder {
    Reg8(u8),
    Reg16(u8),
    Reg(u8),
    SegReg(u8),
    Byte(u8),
    Word(u16),
    Imm,
    Ptr,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Placeholder::Reg8(r) => write!(f, "Placeholder::Reg8({})", r),
            Placeholder::Reg16(r) => write!(f, "Placeholder::Reg16({})", r),
            Placeholder::Reg(r) => write!(f, "Placeholder::Reg({})", r),
            Placeholder::SegReg(r) => write!(f, "Placeholder::SegReg({})", r),
            Placeholder::Byte(b) => write!(f, "Placeholder::Byte({})", b),
            Placeholder::Word(w) => write!(f, "Placeholder::Word({})", w),
            Placeholder::Imm => write!(f, "Placeholder::Imm"),
            Placeholder::Ptr => write!(f, "Placeholder::Ptr"),
        }
    }
}

/// A named routine in the consumer's `actions` tree, e.g. `mem::mov`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Routine {
    pub module: &'static str,
    pub name: &'static str,
}

impl Routine {
    pub const fn new(module: &'static str, name: &'static str) -> Self {
        Self { module, name }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// The semantic operation of an opcode.
///
/// Conditional jumps and loops carry their flag predicate as data; the
/// emitter turns it into a closure applied to the consumer's `cond_jmp`
/// or `lop` combinator.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Routine(Routine),
    CondJump(Cond),
    Loop(Cond),
    Undefined,
}

/// Display name of an opcode: fixed text, or a routine that resolves the
/// name from bits not yet decoded at table-build time (the reg field of
/// the dispatch groups, or the byte following a repeat prefix).
#[derive(Clone, Debug, PartialEq)]
pub enum Mnemonic {
    Static(String),
    Dynamic(Routine),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Opcode {
    pub num_args: NumArgs,
    pub action: Action,
    pub mnemonic: Mnemonic,
    pub shorthand1: Option<Placeholder>,
    pub shorthand2: Option<Placeholder>,
    pub flags: BitFlags<OpcodeFlags>,
    pub segment: Segment,
}

impl Opcode {
    pub fn new(num_args: NumArgs, action: Action) -> Self {
        Self {
            num_args,
            action,
            mnemonic: Mnemonic::Static(String::new()),
            shorthand1: None,
            shorthand2: None,
            flags: BitFlags::EMPTY,
            segment: Segment::DS,
        }
    }

    /// The sentinel record for illegal/unimplemented opcodes. The emitter
    /// never prints it (untouched slots emit `None`); it exists for
    /// consumers that want a concrete trap record.
    pub fn undefined() -> Self {
        Opcode::new(NumArgs::Zero, Action::Undefined).set_mnemonic_str("UD")
    }

    pub fn set_flags(mut self, flags: BitFlags<OpcodeFlags>) -> Self {
        self.flags = flags;
        self
    }

    pub fn set_seg(mut self, segment: Segment) -> Self {
        self.segment = segment;
        self
    }

    pub fn set_placeholders(mut self, shorthand1: Option<Placeholder>, shorthand2: Option<Placeholder>) -> Self {
        self.shorthand1 = shorthand1;
        self.shorthand2 = shorthand2;
        self
    }

    pub fn set_mnemonic_str(mut self, mnemonic: &str) -> Self {
        self.mnemonic = Mnemonic::Static(String::from(mnemonic));
        self
    }

    pub fn set_mnemonic_func(mut self, mnemonic: Routine) -> Self {
        self.mnemonic = Mnemonic::Dynamic(mnemonic);
        self
    }

    pub fn has_shorthand(&self) -> bool {
        self.shorthand1.is_some() || self.shorthand2.is_some()
    }
}
