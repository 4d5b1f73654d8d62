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

    optab_core::lib.rs

    Builds the static 256-entry decode table for a 16-bit x86-family
    instruction decoder and emits it as compilable source text. The table
    is assembled once, checked for source disjointness, and written to a
    fixed output path; the runtime CPU that consumes it lives elsewhere.

*/

pub mod emit;
pub mod opcode;
pub mod predicate;
pub mod table;

pub use emit::{render, write_table, OUTPUT_PATH};
pub use opcode::{Action, Mnemonic, NumArgs, Opcode, OpcodeFlags, Placeholder, Routine, Segment};
pub use predicate::{jump_conditions, loop_conditions, Cond, CpuFlag};
pub use table::{build_table, OpcodeTable, Source, TableError, TABLE_LEN};

use lazy_static::lazy_static;

lazy_static! {
    /// The fully built decode table. First access panics if the source
    /// definitions collide, which is a bug in this crate, not in the
    /// caller.
    pub static ref OPCODE_TABLE: OpcodeTable =
        build_table().expect("opcode table source definitions collide");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_table_matches_fresh_build() {
        let fresh = build_table().unwrap();
        assert_eq!(OPCODE_TABLE.populated(), fresh.populated());
        assert_eq!(render(&OPCODE_TABLE), render(&fresh));
    }
}
