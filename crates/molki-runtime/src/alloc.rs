//! Zero-initialized allocation for arrays and objects.
//!
//! Blocks are handed to generated code and never reclaimed. There is no way
//! to report failure back through the calling convention, so an allocator
//! that cannot satisfy a request terminates the process with SIGABRT via
//! [`std::alloc::handle_alloc_error`].

use std::alloc::{handle_alloc_error, GlobalAlloc, Layout, System};
use std::ptr::NonNull;
use tracing::{error, trace};

/// Every block is a whole number of quadwords.
pub const BLOCK_GRANULE: usize = 8;

/// Alignment of every block.
pub const BLOCK_ALIGN: usize = 8;

/// `count` elements of `size` bytes each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocRequest {
    pub count: u32,
    pub size: u32,
}

impl AllocRequest {
    pub fn new(count: u32, size: u32) -> Self {
        Self { count, size }
    }

    /// `count * size` without overflow
    pub fn requested_bytes(&self) -> u64 {
        u64::from(self.count) * u64::from(self.size)
    }

    /// Bytes actually allocated: the request rounded up to a multiple of 8,
    /// and never less than 8 so a zero-sized request still yields a unique,
    /// non-null block.
    pub fn byte_len(&self) -> u64 {
        let granule = BLOCK_GRANULE as u64;
        let rounded = self.requested_bytes().div_ceil(granule) * granule;
        rounded.max(granule)
    }

    /// Layout of the block, or `None` if the host cannot represent it.
    pub fn layout(&self) -> Option<Layout> {
        let len = usize::try_from(self.byte_len()).ok()?;
        Layout::from_size_align(len, BLOCK_ALIGN).ok()
    }
}

/// Allocate a zeroed block from the host system allocator.
pub fn allocate_zeroed(request: AllocRequest) -> NonNull<u8> {
    allocate_zeroed_in(&System, request)
}

/// Allocate a zeroed block from `allocator`, aborting the process on failure.
pub fn allocate_zeroed_in<A: GlobalAlloc + ?Sized>(
    allocator: &A,
    request: AllocRequest,
) -> NonNull<u8> {
    let Some(layout) = request.layout() else {
        error!(
            count = request.count,
            size = request.size,
            bytes = request.byte_len(),
            "allocation larger than the address space allows"
        );
        std::process::abort()
    };

    // SAFETY: `layout` has a non-zero size (at least BLOCK_GRANULE).
    let raw = unsafe { allocator.alloc_zeroed(layout) };
    match NonNull::new(raw) {
        Some(block) => {
            trace!(
                count = request.count,
                size = request.size,
                bytes = layout.size(),
                "alloc_mem"
            );
            block
        }
        None => handle_alloc_error(layout),
    }
}
