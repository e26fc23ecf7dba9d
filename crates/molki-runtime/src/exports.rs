//! The symbols generated code links against.
//!
//! On `x86_64` every primitive is entered through a naked shim that sets up
//! `rbp` as the frame base, aligns `rsp` down to 16 bytes for the Rust
//! handler, and passes `rbp` to it. The handler's result stays in `rax`
//! across `leave`.
//!
//! Generated code may call with any number of slots pushed, so `rsp` is only
//! 8-byte aligned on entry.
//!
//! The `*_frame` handlers are public so the convention can be exercised on
//! targets without a shim, given a hand-built frame. There, the primitives
//! without arguments are ordinary `extern "C"` functions.

use crate::abi;
use crate::alloc::{allocate_zeroed, AllocRequest};
use crate::frame::CallFrame;
use crate::io;
use std::io::{stdin, stdout};
use tracing::trace;

/// Body of `system_in_read`. The frame carries no arguments.
pub extern "C" fn read_frame(_base: *const u8) -> i64 {
    let byte = io::read_byte(&mut stdin().lock());
    trace!(symbol = abi::READ.symbol, byte);
    byte
}

/// Body of `system_out_flush`.
pub extern "C" fn flush_frame(_base: *const u8) {
    trace!(symbol = abi::FLUSH.symbol);
    io::flush(&mut stdout().lock());
}

/// Body of `system_out_println`.
///
/// # Safety
/// `base` must be a frame laid out per [`abi::PRINTLN`].
pub unsafe extern "C" fn println_frame(base: *const u8) {
    let frame = unsafe { CallFrame::from_base(base) };
    let value = frame.read(&abi::PRINTLN.params[0]) as i64;
    trace!(symbol = abi::PRINTLN.symbol, value);
    io::print_line(&mut stdout().lock(), value);
}

/// Body of `system_out_write`.
///
/// # Safety
/// `base` must be a frame laid out per [`abi::WRITE`].
pub unsafe extern "C" fn write_frame(base: *const u8) {
    let frame = unsafe { CallFrame::from_base(base) };
    let value = frame.read(&abi::WRITE.params[0]) as i64;
    trace!(symbol = abi::WRITE.symbol, value);
    io::write_byte(&mut stdout().lock(), value);
}

/// Body of `alloc_mem`. Never returns null.
///
/// # Safety
/// `base` must be a frame laid out per [`abi::ALLOC`].
pub unsafe extern "C" fn alloc_frame(base: *const u8) -> *mut u8 {
    let frame = unsafe { CallFrame::from_base(base) };
    let request = AllocRequest::new(
        frame.read(&abi::ALLOC.params[0]) as u32,
        frame.read(&abi::ALLOC.params[1]) as u32,
    );
    allocate_zeroed(request).as_ptr()
}

#[cfg(target_arch = "x86_64")]
macro_rules! frame_shim {
    ($(#[$meta:meta])* $symbol:ident => $handler:ident $(-> $ret:ty)?) => {
        $(#[$meta])*
        ///
        /// # Safety
        /// Only callable with the stack calling convention: arguments pushed,
        /// then `call`. Not callable as a Rust or C function.
        #[unsafe(naked)]
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $symbol() $(-> $ret)? {
            core::arch::naked_asm!(
                "push rbp",
                "mov rbp, rsp",
                "and rsp, -16",
                "mov rdi, rbp",
                "call {handler}",
                "leave",
                "ret",
                handler = sym $handler,
            )
        }
    };
}

#[cfg(target_arch = "x86_64")]
frame_shim! {
    /// `system_in_read() -> i64`
    system_in_read => read_frame -> i64
}

#[cfg(target_arch = "x86_64")]
frame_shim! {
    /// `system_out_flush()`
    system_out_flush => flush_frame
}

#[cfg(target_arch = "x86_64")]
frame_shim! {
    /// `system_out_println(value)`
    system_out_println => println_frame
}

#[cfg(target_arch = "x86_64")]
frame_shim! {
    /// `system_out_write(value)`
    system_out_write => write_frame
}

#[cfg(target_arch = "x86_64")]
frame_shim! {
    /// `alloc_mem(count, size)`
    alloc_mem => alloc_frame -> *mut u8
}

/// `system_in_read`
#[cfg(not(target_arch = "x86_64"))]
#[unsafe(no_mangle)]
pub extern "C" fn system_in_read() -> i64 {
    read_frame(std::ptr::null())
}

/// `system_out_flush`
#[cfg(not(target_arch = "x86_64"))]
#[unsafe(no_mangle)]
pub extern "C" fn system_out_flush() {
    flush_frame(std::ptr::null())
}
