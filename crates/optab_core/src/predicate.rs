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

    optab_core::predicate.rs

    Runtime-evaluated flag predicates for the conditional-jump and loop
    families. Predicates are plain data here; the emitter serializes each
    one as a closure over the consumer's flag accessors, and eval() gives
    the same semantics against a raw FLAGS word for testing.

*/

use enumflags2::make_bitflags;
use strum_macros::IntoStaticStr;

use crate::opcode::{Action, NumArgs, Opcode, OpcodeFlags, Segment};

/// A processor status flag, named by the constant the consumer declares
/// for it in `CPUFlags`.
#[derive(Copy, Clone, Debug, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CpuFlag {
    Carry,
    Parity,
    Zero,
    Sign,
    Overflow,
}

impl CpuFlag {
    pub fn symbol(&self) -> &'static str {
        self.into()
    }

    /// Bit position in the x86 FLAGS word.
    pub fn mask(&self) -> u16 {
        match self {
            CpuFlag::Carry => 0x0001,
            CpuFlag::Parity => 0x0004,
            CpuFlag::Zero => 0x0040,
            CpuFlag::Sign => 0x0080,
            CpuFlag::Overflow => 0x0800,
        }
    }
}

/// A boolean expression over processor flag bits, evaluated at instruction
/// execution time, never at table-build time.
#[derive(Clone, Debug, PartialEq)]
pub enum Cond {
    Always,
    Set(CpuFlag),
    Clear(CpuFlag),
    Differ(CpuFlag, CpuFlag),
    Equal(CpuFlag, CpuFlag),
    Or(Box<Cond>, Box<Cond>),
    And(Box<Cond>, Box<Cond>),
}

impl Cond {
    pub fn or(a: Cond, b: Cond) -> Cond {
        Cond::Or(Box::new(a), Box::new(b))
    }

    pub fn and(a: Cond, b: Cond) -> Cond {
        Cond::And(Box::new(a), Box::new(b))
    }

    /// True when the serialized closure body reads the CPU at all. The
    /// always-true loop predicate binds `_` instead of a parameter name so
    /// the generated file compiles without unused-binding warnings.
    pub fn uses_cpu(&self) -> bool {
        match self {
            Cond::Always => false,
            Cond::Or(a, b) | Cond::And(a, b) => a.uses_cpu() || b.uses_cpu(),
            _ => true,
        }
    }

    /// Evaluate against a raw FLAGS word. Mirrors the expression the
    /// emitter prints; unit tests hold the two in sync.
    pub fn eval(&self, flags: u16) -> bool {
        match self {
            Cond::Always => true,
            Cond::Set(f) => flags & f.mask() != 0,
            Cond::Clear(f) => flags & f.mask() == 0,
            Cond::Differ(a, b) => (flags & a.mask() != 0) != (flags & b.mask() != 0),
            Cond::Equal(a, b) => (flags & a.mask() != 0) == (flags & b.mask() != 0),
            Cond::Or(a, b) => a.eval(flags) || b.eval(flags),
            Cond::And(a, b) => a.eval(flags) && b.eval(flags),
        }
    }

    /// The closure source the emitter embeds in the generated table, e.g.
    /// `|comp| comp.check_flag(CPUFlags::ZERO)`.
    pub fn closure_source(&self) -> String {
        if self.uses_cpu() {
            format!("|comp| {}", self.expr_source())
        } else {
            String::from("|_| true")
        }
    }

    fn expr_source(&self) -> String {
        match self {
            Cond::Always => String::from("true"),
            Cond::Set(f) => format!("comp.check_flag(CPUFlags::{})", f.symbol()),
            Cond::Clear(f) => format!("!comp.check_flag(CPUFlags::{})", f.symbol()),
            Cond::Differ(a, b) => {
                format!("comp.check_flags_not_equal(CPUFlags::{}, CPUFlags::{})", a.symbol(), b.symbol())
            }
            Cond::Equal(a, b) => {
                format!("!comp.check_flags_not_equal(CPUFlags::{}, CPUFlags::{})", a.symbol(), b.symbol())
            }
            Cond::Or(a, b) => format!("{} || {}", a.operand_source(), b.operand_source()),
            Cond::And(a, b) => format!("{} && {}", a.operand_source(), b.operand_source()),
        }
    }

    // Parenthesize composite operands so mixed &&/|| chains keep their
    // intended grouping.
    fn operand_source(&self) -> String {
        match self {
            Cond::Or(..) | Cond::And(..) => format!("({})", self.expr_source()),
            _ => self.expr_source(),
        }
    }
}

/// The 16 conditional-jump conditions, in opcode order 0x70..0x7F. Each
/// suffix is appended to the `j` prefix to form the mnemonic.
pub fn jump_conditions() -> [(&'static str, Cond); 16] {
    use CpuFlag::*;
    [
        ("o", Cond::Set(Overflow)),
        ("no", Cond::Clear(Overflow)),
        ("c", Cond::Set(Carry)),
        ("nc", Cond::Clear(Carry)),
        ("e", Cond::Set(Zero)),
        ("ne", Cond::Clear(Zero)),
        ("be", Cond::or(Cond::Set(Carry), Cond::Set(Zero))),
        ("a", Cond::and(Cond::Clear(Carry), Cond::Clear(Zero))),
        ("s", Cond::Set(Sign)),
        ("ns", Cond::Clear(Sign)),
        ("p", Cond::Set(Parity)),
        ("np", Cond::Clear(Parity)),
        ("l", Cond::Differ(Sign, Overflow)),
        ("ge", Cond::Equal(Sign, Overflow)),
        ("le", Cond::or(Cond::Set(Zero), Cond::Differ(Sign, Overflow))),
        ("g", Cond::and(Cond::Clear(Zero), Cond::Equal(Sign, Overflow))),
    ]
}

/// The loop conditions, in opcode order 0xE0..0xE2: loopne, loope, loop.
/// Only the zero-flag half lives here; the counter-register test is part
/// of the consumer's `lop` combinator.
pub fn loop_conditions() -> [(&'static str, Cond); 3] {
    [
        ("ne", Cond::Clear(CpuFlag::Zero)),
        ("e", Cond::Set(CpuFlag::Zero)),
        ("", Cond::Always),
    ]
}

/// Build the record for one conditional-jump opcode.
pub fn cond_jump_opcode(suffix: &str, cond: Cond) -> Opcode {
    Opcode::new(NumArgs::One, Action::CondJump(cond))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch}))
        .set_seg(Segment::CS)
        .set_mnemonic_str(&format!("j{}", suffix))
}

/// Build the record for one loop opcode.
pub fn loop_opcode(suffix: &str, cond: Cond) -> Opcode {
    Opcode::new(NumArgs::One, Action::Loop(cond))
        .set_flags(make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch}))
        .set_seg(Segment::CS)
        .set_mnemonic_str(&format!("loop{}", suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Mnemonic;

    const CF: u16 = 0x0001;
    const PF: u16 = 0x0004;
    const ZF: u16 = 0x0040;
    const SF: u16 = 0x0080;
    const OF: u16 = 0x0800;

    fn cond(suffix: &str) -> Cond {
        jump_conditions()
            .into_iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, c)| c)
            .unwrap()
    }

    #[test]
    fn simple_flag_conditions() {
        assert!(cond("o").eval(OF));
        assert!(!cond("o").eval(0));
        assert!(cond("no").eval(0));
        assert!(cond("c").eval(CF));
        assert!(cond("nc").eval(ZF | SF));
        assert!(cond("e").eval(ZF));
        assert!(cond("ne").eval(CF));
        assert!(cond("s").eval(SF));
        assert!(cond("ns").eval(0));
        assert!(cond("p").eval(PF));
        assert!(cond("np").eval(0));
    }

    #[test]
    fn unsigned_comparisons() {
        // be: carry or zero
        assert!(cond("be").eval(CF));
        assert!(cond("be").eval(ZF));
        assert!(!cond("be").eval(0));
        // a: neither carry nor zero
        assert!(cond("a").eval(0));
        assert!(!cond("a").eval(CF));
        assert!(!cond("a").eval(ZF));
    }

    #[test]
    fn signed_comparisons() {
        // l: SF != OF
        assert!(cond("l").eval(SF));
        assert!(cond("l").eval(OF));
        assert!(!cond("l").eval(SF | OF));
        assert!(!cond("l").eval(0));
        // ge: SF == OF
        assert!(cond("ge").eval(0));
        assert!(cond("ge").eval(SF | OF));
        // le: ZF or SF != OF
        assert!(cond("le").eval(ZF));
        assert!(cond("le").eval(OF));
        assert!(!cond("le").eval(0));
        // g: !ZF and SF == OF
        assert!(cond("g").eval(0));
        assert!(cond("g").eval(SF | OF));
        assert!(!cond("g").eval(ZF));
        assert!(!cond("g").eval(SF));
    }

    #[test]
    fn loop_condition_order() {
        let conds = loop_conditions();
        assert_eq!(conds[0].0, "ne");
        assert_eq!(conds[1].0, "e");
        assert_eq!(conds[2].0, "");
        assert!(conds[2].1.eval(0));
        assert!(conds[2].1.eval(ZF | CF | SF | OF | PF));
    }

    #[test]
    fn closure_source_binds_param_only_when_used() {
        assert_eq!(Cond::Always.closure_source(), "|_| true");
        assert_eq!(
            Cond::Set(CpuFlag::Zero).closure_source(),
            "|comp| comp.check_flag(CPUFlags::ZERO)"
        );
        assert_eq!(
            cond("a").closure_source(),
            "|comp| !comp.check_flag(CPUFlags::CARRY) && !comp.check_flag(CPUFlags::ZERO)"
        );
        assert_eq!(
            cond("ge").closure_source(),
            "|comp| !comp.check_flags_not_equal(CPUFlags::SIGN, CPUFlags::OVERFLOW)"
        );
    }

    #[test]
    fn mnemonic_concatenation() {
        let op = cond_jump_opcode("e", Cond::Set(CpuFlag::Zero));
        assert_eq!(op.mnemonic, Mnemonic::Static(String::from("je")));
        let op = loop_opcode("", Cond::Always);
        assert_eq!(op.mnemonic, Mnemonic::Static(String::from("loop")));
        let op = loop_opcode("ne", Cond::Clear(CpuFlag::Zero));
        assert_eq!(op.mnemonic, Mnemonic::Static(String::from("loopne")));
    }

    #[test]
    fn eval_matches_serialized_shape() {
        // A nested condition keeps its grouping when serialized.
        let c = Cond::or(
            Cond::Set(CpuFlag::Zero),
            Cond::and(Cond::Clear(CpuFlag::Carry), Cond::Set(CpuFlag::Sign)),
        );
        assert_eq!(
            c.closure_source(),
            "|comp| comp.check_flag(CPUFlags::ZERO) || (!comp.check_flag(CPUFlags::CARRY) && comp.check_flag(CPUFlags::SIGN))"
        );
        assert!(c.eval(ZF));
        assert!(c.eval(SF));
        assert!(!c.eval(CF | SF));
    }
}
