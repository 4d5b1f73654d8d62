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

    optab_core::emit.rs

    Serializes the finished table into the consumer's source form: a fixed
    header of declarations, then the 256 entries in strict index order
    inside a lazy_static array. Rendering is pure and deterministic; the
    single side effect is the final file write.

*/

use std::{fmt::Write as _, fs, io, path::Path};

use enumflags2::BitFlags;
use log::info;

use crate::{
    opcode::{Action, Mnemonic, Opcode, OpcodeFlags},
    table::OpcodeTable,
};

/// Repository-relative path the generated table is written to; the
/// consumer crate's instruction module picks it up from there.
pub const OUTPUT_PATH: &str = "emu86/src/cpu/instruction/data.rs";

const HEADER: &str = "\
// Generated by optab86. Do not edit; regenerate instead.

use std::sync::Arc;

use enumflags2::{make_bitflags, BitFlags};
use lazy_static::lazy_static;

use crate::cpu::instruction::actions::{alu, flags, int, jmp, mem, stack};
use crate::cpu::instruction::opcode::{Mnemonic, NumArgs, Opcode, OpcodeFlags, Placeholder};
use crate::cpu::{CPUFlags, Regs};

lazy_static! {
    pub static ref OPCODE_DATA: [Option<Opcode>; 256] = [
";

const FOOTER: &str = "    ];\n}\n";

/// Render the full generated file as a string.
pub fn render(table: &OpcodeTable) -> String {
    let mut out = String::with_capacity(64 * 1024);
    out.push_str(HEADER);
    for slot in table.slots() {
        match slot {
            None => out.push_str("        None,\n"),
            Some(op) => {
                out.push_str("        ");
                render_opcode(op, &mut out);
                out.push_str(",\n");
            }
        }
    }
    out.push_str(FOOTER);
    out
}

fn render_opcode(op: &Opcode, out: &mut String) {
    // String is infallible as a fmt::Write sink.
    let _ = write!(
        out,
        "Some(Opcode {{ num_args: NumArgs::{}, action: {}, mnemonic: {}, shorthand1: {}, shorthand2: {}, flags: {}, segment: Regs::{} }})",
        op.num_args,
        render_action(&op.action),
        render_mnemonic(&op.mnemonic),
        render_placeholder(op.shorthand1.as_ref()),
        render_placeholder(op.shorthand2.as_ref()),
        render_flags(op.flags),
        op.segment,
    );
}

fn render_action(action: &Action) -> String {
    match action {
        Action::Routine(r) => format!("Arc::new({})", r),
        Action::CondJump(cond) => format!("jmp::cond_jmp(Box::new({}))", cond.closure_source()),
        Action::Loop(cond) => format!("jmp::lop(Box::new({}))", cond.closure_source()),
        Action::Undefined => String::from("Arc::new(undefined)"),
    }
}

fn render_mnemonic(mnemonic: &Mnemonic) -> String {
    match mnemonic {
        Mnemonic::Static(text) => format!("Mnemonic::Static(String::from(\"{}\"))", text),
        Mnemonic::Dynamic(routine) => format!("Mnemonic::Dynamic(Arc::new({}))", routine),
    }
}

fn render_placeholder(placeholder: Option<&crate::opcode::Placeholder>) -> String {
    match placeholder {
        None => String::from("None"),
        Some(p) => format!("Some({})", p),
    }
}

fn render_flags(flags: BitFlags<OpcodeFlags>) -> String {
    if flags.is_empty() {
        return String::from("BitFlags::EMPTY");
    }
    let names: Vec<String> = flags.iter().map(|f| format!("{:?}", f)).collect();
    format!("make_bitflags!(OpcodeFlags::{{{}}})", names.join(" | "))
}

/// Write the generated file, creating parent directories as needed.
/// Overwrites any previous output; regeneration is idempotent.
pub fn write_table(table: &OpcodeTable, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(table))?;
    info!("wrote opcode table to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_table;

    fn rendered() -> String {
        render(&build_table().unwrap())
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(rendered(), rendered());
    }

    #[test]
    fn header_and_footer_shape() {
        let text = rendered();
        assert!(text.starts_with("// Generated by optab86."));
        assert!(text.contains("use enumflags2::{make_bitflags, BitFlags};"));
        assert!(text.contains("use crate::cpu::instruction::actions::{alu, flags, int, jmp, mem, stack};"));
        assert!(text.contains("pub static ref OPCODE_DATA: [Option<Opcode>; 256] = ["));
        assert!(text.ends_with("    ];\n}\n"));
    }

    #[test]
    fn one_entry_per_byte_in_order() {
        let text = rendered();
        let entries: Vec<&str> = text
            .lines()
            .filter(|l| {
                let t = l.trim_start();
                t.starts_with("Some(Opcode {") || *l == "        None,"
            })
            .collect();
        assert_eq!(entries.len(), 256);
        // 0x00 is the add r/m form, 0x05 an undefined gap.
        assert!(entries[0x00].contains("Arc::new(alu::add)"));
        assert_eq!(entries[0x05].trim(), "None,");
    }

    #[test]
    fn spot_check_entries() {
        let text = rendered();
        let entries: Vec<&str> = text
            .lines()
            .filter(|l| {
                let t = l.trim_start();
                t.starts_with("Some(Opcode {") || *l == "        None,"
            })
            .collect();

        // je at 0x74: predicate closure, both decode flags, code segment.
        let je = entries[0x74];
        assert!(je.contains("jmp::cond_jmp(Box::new(|comp| comp.check_flag(CPUFlags::ZERO)))"));
        assert!(je.contains("make_bitflags!(OpcodeFlags::{Immediate | SizeMismatch})"));
        assert!(je.contains("segment: Regs::CS"));
        assert!(je.contains("Mnemonic::Static(String::from(\"je\"))"));

        // loop at 0xE2: always-true predicate with an unused binding.
        assert!(entries[0xE2].contains("jmp::lop(Box::new(|_| true))"));

        // nop at 0x90: empty placeholders, Nop flag.
        let nop = entries[0x90];
        assert!(nop.contains("Arc::new(mem::nop)"));
        assert!(nop.contains("make_bitflags!(OpcodeFlags::{Nop})"));
        assert!(nop.contains("shorthand1: None, shorthand2: None"));

        // mov bl, imm8 at 0xB3: register family with immediate placeholder.
        let mov = entries[0xB3];
        assert!(mov.contains("Some(Placeholder::Reg8(3))"));
        assert!(mov.contains("Some(Placeholder::Imm)"));

        // ALU dispatch group at 0x80: dynamic mnemonic.
        assert!(entries[0x80].contains("Mnemonic::Dynamic(Arc::new(alu::alu_dispatch_two_args_mnemonic))"));

        // Entries with no flags print the empty set.
        assert!(entries[0x88].contains("flags: BitFlags::EMPTY"));
    }
}
