//! Shared test utilities
//!
//! Call the exported primitives the way generated code does: arguments pushed
//! right to left, `call`, caller pops. On targets without the naked shims the
//! same helpers build the frame by hand and call the handler.

#![allow(dead_code)]

/// Upper-half junk pushed with 32-bit arguments; the callee must ignore it.
pub const DWORD_JUNK: u64 = 0xa5a5_a5a5_0000_0000;

/// Stack alignment at the `call` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    /// `rsp` 16-byte aligned, as a C compiler would leave it
    Aligned,
    /// `rsp` off by one slot, as after an odd number of pushes
    Skewed,
}

impl CallSite {
    /// Padding to subtract before pushing `slots` arguments.
    fn padding(self, slots: u64) -> u64 {
        match (self, slots % 2 == 0) {
            (CallSite::Aligned, true) | (CallSite::Skewed, false) => 0,
            _ => 8,
        }
    }
}

#[cfg(target_arch = "x86_64")]
pub fn call_println_at(site: CallSite, value: i64) {
    unsafe {
        std::arch::asm!(
            "mov r12, rsp",
            "and rsp, -16",
            "sub rsp, {pad}",
            "push {value}",
            "call {target}",
            "mov rsp, r12",
            pad = in(reg) site.padding(1),
            value = in(reg) value,
            target = sym molki_runtime::exports::system_out_println,
            out("r12") _,
            clobber_abi("C"),
        );
    }
}

#[cfg(target_arch = "x86_64")]
pub fn call_write_at(site: CallSite, value: i64) {
    unsafe {
        std::arch::asm!(
            "mov r12, rsp",
            "and rsp, -16",
            "sub rsp, {pad}",
            "push {value}",
            "call {target}",
            "mov rsp, r12",
            pad = in(reg) site.padding(1),
            value = in(reg) value,
            target = sym molki_runtime::exports::system_out_write,
            out("r12") _,
            clobber_abi("C"),
        );
    }
}

#[cfg(target_arch = "x86_64")]
pub fn call_alloc_mem_at(site: CallSite, count: u32, size: u32) -> *mut u8 {
    let block: *mut u8;
    unsafe {
        std::arch::asm!(
            "mov r12, rsp",
            "and rsp, -16",
            "sub rsp, {pad}",
            "push {size}",
            "push {count}",
            "call {target}",
            "mov rsp, r12",
            pad = in(reg) site.padding(2),
            size = in(reg) DWORD_JUNK | u64::from(size),
            count = in(reg) DWORD_JUNK | u64::from(count),
            target = sym molki_runtime::exports::alloc_mem,
            out("rax") block,
            out("r12") _,
            clobber_abi("C"),
        );
    }
    block
}

#[cfg(target_arch = "x86_64")]
pub fn call_read_at(site: CallSite) -> i64 {
    let byte: i64;
    unsafe {
        std::arch::asm!(
            "mov r12, rsp",
            "and rsp, -16",
            "sub rsp, {pad}",
            "call {target}",
            "mov rsp, r12",
            pad = in(reg) site.padding(0),
            target = sym molki_runtime::exports::system_in_read,
            out("rax") byte,
            out("r12") _,
            clobber_abi("C"),
        );
    }
    byte
}

#[cfg(target_arch = "x86_64")]
pub fn call_flush_at(site: CallSite) {
    unsafe {
        std::arch::asm!(
            "mov r12, rsp",
            "and rsp, -16",
            "sub rsp, {pad}",
            "call {target}",
            "mov rsp, r12",
            pad = in(reg) site.padding(0),
            target = sym molki_runtime::exports::system_out_flush,
            out("r12") _,
            clobber_abi("C"),
        );
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn call_println_at(_site: CallSite, value: i64) {
    let image = [0u64, 0, value as u64];
    unsafe { molki_runtime::exports::println_frame(image.as_ptr().cast()) }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn call_write_at(_site: CallSite, value: i64) {
    let image = [0u64, 0, value as u64];
    unsafe { molki_runtime::exports::write_frame(image.as_ptr().cast()) }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn call_alloc_mem_at(_site: CallSite, count: u32, size: u32) -> *mut u8 {
    let image = [0u64, 0, DWORD_JUNK | u64::from(count), DWORD_JUNK | u64::from(size)];
    unsafe { molki_runtime::exports::alloc_frame(image.as_ptr().cast()) }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn call_read_at(_site: CallSite) -> i64 {
    molki_runtime::exports::system_in_read()
}

#[cfg(not(target_arch = "x86_64"))]
pub fn call_flush_at(_site: CallSite) {
    molki_runtime::exports::system_out_flush()
}

pub fn call_println(value: i64) {
    call_println_at(CallSite::Aligned, value)
}

pub fn call_write(value: i64) {
    call_write_at(CallSite::Aligned, value)
}

pub fn call_alloc_mem(count: u32, size: u32) -> *mut u8 {
    call_alloc_mem_at(CallSite::Aligned, count, size)
}

pub fn call_read() -> i64 {
    call_read_at(CallSite::Aligned)
}

pub fn call_flush() {
    call_flush_at(CallSite::Aligned)
}

/// View `len` bytes of a block returned by `alloc_mem`
///
/// # Safety
/// `block` must come from `alloc_mem` with a byte length of at least `len`.
pub unsafe fn block_bytes<'a>(block: *mut u8, len: usize) -> &'a [u8] {
    unsafe { std::slice::from_raw_parts(block, len) }
}
