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

    optab_gen::lib.rs

    Front-end for the generator: builds the table, writes the generated
    file, reports what happened. Invocation is argument-free and always
    regenerates the same fixed path.

*/

use std::path::Path;

use anyhow::Context;
use log::info;

use optab_core::{build_table, emit, TABLE_LEN};

pub fn run() -> anyhow::Result<()> {
    let table = build_table().context("opcode table construction failed")?;
    info!(
        "opcode table built: {} populated, {} undefined",
        table.populated(),
        TABLE_LEN - table.populated()
    );

    emit::write_table(&table, Path::new(emit::OUTPUT_PATH))
        .with_context(|| format!("failed to write {}", emit::OUTPUT_PATH))?;

    Ok(())
}
