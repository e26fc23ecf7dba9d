//! Molki Runtime - support library for stack-convention generated code
//!
//! Generated programs pass arguments on the stack at fixed offsets rather
//! than in registers. This library provides the primitives such programs
//! call and the process entry that starts them:
//! - `system_in_read`, `system_out_println`, `system_out_write`,
//!   `system_out_flush`: character I/O on the standard streams
//! - `alloc_mem`: zeroed, never-freed blocks; aborts when memory runs out
//! - `main` (feature `entry`): runs `__minijava_main` once
//!
//! The boundary is described once, in [`abi::CONTRACT`].
//!
//! # Linking
//!
//! ```text
//! cargo build --release -p molki-runtime --features entry
//! cc program.s target/release/libmolki_runtime.a -lpthread -ldl -o program
//! ```
//!
//! `tests/entry_main.rs` links the same way against a small assembly program:
//!
//! ```text
//! cargo test -p molki-runtime --features entry --test entry_main
//! ```

pub mod abi;
pub mod alloc;
pub mod diagnostics;
pub mod entry;
pub mod exports;
pub mod frame;
pub mod io;

pub use abi::{ArgWidth, Contract, ContractError, Param, Returns, Signature, CONTRACT};
pub use alloc::{allocate_zeroed, allocate_zeroed_in, AllocRequest};
pub use entry::{EntryError, Trampoline, EXIT_STATUS};
pub use frame::CallFrame;
pub use io::END_OF_INPUT;

