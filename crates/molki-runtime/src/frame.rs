//! Argument extraction from a caller-built stack frame.

use crate::abi::{ArgWidth, Param};
use std::ptr;

/// The callee's view of the stack at primitive entry.
///
/// # Safety invariant
/// A `CallFrame` always holds the frame base of a live primitive invocation
/// whose caller pushed arguments as [`crate::abi::CONTRACT`] describes. Reads
/// outside that layout are the caller's contract violation and are not
/// detected.
#[derive(Debug, Clone, Copy)]
pub struct CallFrame {
    base: *const u8,
}

impl CallFrame {
    /// Wrap a frame base.
    ///
    /// # Safety
    /// `base` must be the frame base of the current primitive invocation, and
    /// the frame must stay untouched for as long as the `CallFrame` is used.
    pub unsafe fn from_base(base: *const u8) -> Self {
        Self { base }
    }

    /// Read a parameter, zero-extended to 64 bits
    pub fn read(&self, param: &Param) -> u64 {
        match param.width {
            ArgWidth::Dword => u64::from(self.read_dword(param.offset)),
            ArgWidth::Qword => self.read_qword(param.offset),
        }
    }

    pub fn read_qword(&self, offset: usize) -> u64 {
        // SAFETY: covered by the type's invariant.
        unsafe { ptr::read_unaligned(self.base.add(offset) as *const u64) }
    }

    pub fn read_dword(&self, offset: usize) -> u32 {
        // SAFETY: covered by the type's invariant.
        unsafe { ptr::read_unaligned(self.base.add(offset) as *const u32) }
    }
}
