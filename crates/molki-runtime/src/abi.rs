//! The calling-convention contract between generated code and the runtime.
//!
//! Generated code pushes arguments right to left and `call`s the primitive.
//! Seen from the callee's frame base (the address `rbp` holds after
//! `push rbp; mov rbp, rsp`), the saved `rbp` sits at offset 0, the return
//! address at 8, and argument `i` at `16 + 8 * i`. A 32-bit argument occupies
//! the low half of its slot.
//!
//! Callers need not keep `rsp` 16-byte aligned at the `call`: any whole number
//! of pushed slots is accepted, and the runtime realigns before running Rust
//! code.
//!
//! Every offset the runtime reads comes from [`CONTRACT`]; nothing else in the
//! crate spells out a stack offset.
//!
//! ```text
//! system_in_read() -> i64
//! system_out_println(value@16:qword)
//! system_out_write(value@16:qword)
//! system_out_flush()
//! alloc_mem(count@16:dword, size@24:dword) -> ptr
//! __minijava_main()
//! ```

use std::fmt;
use thiserror::Error;

/// Offset of the first argument from the frame base.
pub const FRAME_ARGS_OFFSET: usize = 16;

/// Width of one pushed stack slot.
pub const STACK_SLOT: usize = 8;

/// Width of an argument as read from its stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgWidth {
    /// 32 bits, low half of the slot
    Dword,
    /// 64 bits, the whole slot
    Qword,
}

impl ArgWidth {
    pub fn display_name(self) -> &'static str {
        match self {
            ArgWidth::Dword => "dword",
            ArgWidth::Qword => "qword",
        }
    }
}

/// Where a primitive leaves its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Returns {
    /// Void; `rax` is unspecified
    Nothing,
    /// Signed 64-bit integer in `rax`
    Int64,
    /// Address in `rax`
    Pointer,
}

impl Returns {
    pub fn display_name(self) -> &'static str {
        match self {
            Returns::Nothing => "void",
            Returns::Int64 => "i64",
            Returns::Pointer => "ptr",
        }
    }
}

/// One argument of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: &'static str,
    /// Byte offset from the callee's frame base
    pub offset: usize,
    pub width: ArgWidth,
}

impl Param {
    pub const fn new(name: &'static str, offset: usize, width: ArgWidth) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }
}

/// A symbol the generated code and the runtime agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub symbol: &'static str,
    /// Arguments in push-slot order (first argument nearest the return address)
    pub params: &'static [Param],
    pub returns: Returns,
}

impl Signature {
    /// Bytes of caller stack the arguments occupy, i.e. what the caller pops
    /// after the call returns.
    pub fn frame_bytes(&self) -> usize {
        self.params.len() * STACK_SLOT
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.symbol)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{}@{}:{}",
                param.name,
                param.offset,
                param.width.display_name()
            )?;
        }
        write!(f, ")")?;
        if self.returns != Returns::Nothing {
            write!(f, " -> {}", self.returns.display_name())?;
        }
        Ok(())
    }
}

/// `int64 system_in_read()`: next input byte, or -1 at end of input.
pub const READ: Signature = Signature {
    symbol: "system_in_read",
    params: &[],
    returns: Returns::Int64,
};

/// `void system_out_println(int64 value)`: prints `value as i32` and a newline.
pub const PRINTLN: Signature = Signature {
    symbol: "system_out_println",
    params: &[Param::new("value", FRAME_ARGS_OFFSET, ArgWidth::Qword)],
    returns: Returns::Nothing,
};

/// `void system_out_write(int64 value)`: writes `value as u8`.
pub const WRITE: Signature = Signature {
    symbol: "system_out_write",
    params: &[Param::new("value", FRAME_ARGS_OFFSET, ArgWidth::Qword)],
    returns: Returns::Nothing,
};

/// `void system_out_flush()`
pub const FLUSH: Signature = Signature {
    symbol: "system_out_flush",
    params: &[],
    returns: Returns::Nothing,
};

/// `void* alloc_mem(uint32 count, uint32 size)`: zeroed block, never null.
pub const ALLOC: Signature = Signature {
    symbol: "alloc_mem",
    params: &[
        Param::new("count", FRAME_ARGS_OFFSET, ArgWidth::Dword),
        Param::new("size", FRAME_ARGS_OFFSET + STACK_SLOT, ArgWidth::Dword),
    ],
    returns: Returns::Pointer,
};

/// `void __minijava_main()`: the generated program, imported by the trampoline.
pub const ENTRY: Signature = Signature {
    symbol: "__minijava_main",
    params: &[],
    returns: Returns::Nothing,
};

/// The complete boundary, in the order the table is documented.
pub const CONTRACT: Contract = Contract {
    signatures: &[READ, PRINTLN, WRITE, FLUSH, ALLOC, ENTRY],
};

/// Contract table validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("empty symbol name at table index {0}")]
    EmptySymbol(usize),

    #[error("symbol '{0}' appears more than once")]
    DuplicateSymbol(&'static str),

    #[error("{symbol}: parameter '{param}' at offset {actual}, expected {expected}")]
    MisplacedParam {
        symbol: &'static str,
        param: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// An ordered table of signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub signatures: &'static [Signature],
}

impl Contract {
    /// Find the signature exported or imported under `symbol`
    pub fn lookup(&self, symbol: &str) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.symbol == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    /// Check the table is internally consistent with the push-slot layout.
    pub fn validate(&self) -> Result<(), ContractError> {
        for (index, sig) in self.signatures.iter().enumerate() {
            if sig.symbol.is_empty() {
                return Err(ContractError::EmptySymbol(index));
            }
            if self.signatures[..index]
                .iter()
                .any(|earlier| earlier.symbol == sig.symbol)
            {
                return Err(ContractError::DuplicateSymbol(sig.symbol));
            }

            for (slot, param) in sig.params.iter().enumerate() {
                let expected = FRAME_ARGS_OFFSET + slot * STACK_SLOT;
                if param.offset != expected {
                    return Err(ContractError::MisplacedParam {
                        symbol: sig.symbol,
                        param: param.name,
                        expected,
                        actual: param.offset,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sig in self.signatures {
            writeln!(f, "{}", sig)?;
        }
        Ok(())
    }
}
