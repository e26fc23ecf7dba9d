//! Character I/O primitives.
//!
//! Each primitive is generic over `Read`/`Write` so the exported symbols can
//! drive the process streams while tests drive in-memory buffers. None of
//! them report failure: the calling convention has no channel for it. Failed
//! writes are dropped and logged at `debug`.

use std::io::{ErrorKind, Read, Write};
use tracing::debug;

/// Value `read_byte` returns once input is exhausted.
pub const END_OF_INPUT: i64 = -1;

/// Next byte of `input` as `0..=255`, or [`END_OF_INPUT`].
///
/// Interrupted reads are retried; any other read error counts as end of input.
pub fn read_byte<R: Read + ?Sized>(input: &mut R) -> i64 {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return END_OF_INPUT,
            Ok(_) => return i64::from(buf[0]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "read failed, reporting end of input");
                return END_OF_INPUT;
            }
        }
    }
}

/// Print the 32-bit truncation of `value` in decimal, then a newline.
pub fn print_line<W: Write + ?Sized>(out: &mut W, value: i64) {
    if let Err(e) = writeln!(out, "{}", value as i32) {
        debug!(error = %e, value, "println dropped");
    }
}

/// Write the low 8 bits of `value` as one raw byte.
pub fn write_byte<W: Write + ?Sized>(out: &mut W, value: i64) {
    if let Err(e) = out.write_all(&[value as u8]) {
        debug!(error = %e, value, "write dropped");
    }
}

/// Force delivery of anything `out` has buffered.
pub fn flush<W: Write + ?Sized>(out: &mut W) {
    if let Err(e) = out.flush() {
        debug!(error = %e, "flush dropped");
    }
}
