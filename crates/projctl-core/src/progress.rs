//! Progressive status lines for sequential batches.
//!
//! The label goes out before the remote call and the outcome right after it
//! completes, so a slow batch shows where it is.

use std::io::{self, Write};

/// Writes `{label}... ` and flushes.
pub(crate) fn begin<W: Write + ?Sized>(out: &mut W, label: &str) -> io::Result<()> {
    write!(out, "{label}... ")?;
    out.flush()
}

/// Completes the line started by [`begin`].
pub(crate) fn finish<W: Write + ?Sized>(out: &mut W, ok: bool) -> io::Result<()> {
    writeln!(out, "{}", if ok { "ok" } else { "failed" })?;
    out.flush()
}
