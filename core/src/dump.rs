//! Block dump: human-readable text output for A32 IR blocks.
//!
//! The format is stable within a build but not versioned. Two dumps of
//! the same unmodified block are byte-identical.

use std::fmt::{self, Write as FmtWrite};
use std::io;

use crate::block::Block;
use crate::types::Cond;
use crate::value::{InstRef, Value};

/// Maps arena slots to program-order indices for `%N` names.
struct SlotNames {
    index: Vec<Option<usize>>,
}

impl SlotNames {
    fn new(block: &Block) -> Self {
        let len = block
            .inst_refs()
            .iter()
            .map(|r| r.index() + 1)
            .max()
            .unwrap_or(0);
        let mut index = vec![None; len];
        for (i, r) in block.inst_refs().iter().enumerate() {
            index[r.index()] = Some(i);
        }
        Self { index }
    }

    fn get(&self, r: InstRef) -> Option<usize> {
        self.index.get(r.index()).copied().flatten()
    }
}

/// Format one operand.
fn fmt_value(
    names: &SlotNames,
    v: &Value,
    out: &mut impl FmtWrite,
) -> fmt::Result {
    match *v {
        Value::Empty => out.write_str("<null>"),
        Value::U1(b) => write!(out, "#{}", b as u8),
        Value::U8(x) => write!(out, "#{x}"),
        Value::U16(x) => write!(out, "#{x:#x}"),
        Value::U32(x) => write!(out, "#{x:#x}"),
        Value::U64(x) => write!(out, "#{x:#x}"),
        Value::A32Reg(r) => write!(out, "{r}"),
        Value::A32ExtReg(r) => write!(out, "{r}"),
        Value::Inst(r, _) => match names.get(r) {
            Some(i) => write!(out, "%{i}"),
            // Reference to a node that is no longer in the block.
            None => write!(out, "<erased {}>", r.0),
        },
    }
}

/// Write the dump of `block` to any formatter sink.
pub fn write_block(block: &Block, out: &mut impl FmtWrite) -> fmt::Result {
    let names = SlotNames::new(block);

    writeln!(out, "Block: location={}", block.location())?;
    write!(
        out,
        "cycles={}, entry_cond={}",
        block.cycle_count(),
        block.condition()
    )?;
    if block.condition() != Cond::Al {
        match block.try_condition_failed_location() {
            Ok(loc) => write!(out, ", cond_fail={loc}")?,
            Err(_) => out.write_str(", cond_fail=<none>")?,
        }
    }
    out.write_char('\n')?;

    for (i, (r, inst)) in block.instructions().enumerate() {
        let op = inst.opcode();
        write!(out, "[{:016x}] ", r.index())?;
        if inst.get_type().is_void() {
            out.write_str("         ")?;
        } else {
            write!(out, "{:<6} = ", format!("%{i}"))?;
        }
        out.write_str(op.name())?;

        for (a, arg) in inst.args().iter().enumerate() {
            out.write_str(if a == 0 { " " } else { ", " })?;
            fmt_value(&names, arg, out)?;
            let actual = arg.get_type();
            let formal = op.arg_type(a);
            if !actual.is_compatible_with(formal) {
                write!(out, " <type error: {actual} != {formal}>")?;
            }
        }

        writeln!(out, " (uses: {})", inst.use_count())?;
    }

    match block.terminal() {
        Some(t) => writeln!(out, "terminal = {t}"),
        None => writeln!(out, "terminal = <invalid terminal>"),
    }
}

/// Render `block` as text.
pub fn dump_block(block: &Block) -> String {
    let mut s = String::with_capacity(64 * (block.len() + 3));
    // Formatting into a String cannot fail.
    let _ = write_block(block, &mut s);
    s
}

/// Dump `block` to an I/O writer.
pub fn dump_block_io(block: &Block, w: &mut impl io::Write) -> io::Result<()> {
    w.write_all(dump_block(block).as_bytes())
}
