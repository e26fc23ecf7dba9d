//! Allocation primitive tests: sizing policy, zeroing, and the exported
//! `alloc_mem` entered with stack-pushed arguments.

mod common;

use common::{block_bytes, call_alloc_mem, call_alloc_mem_at, CallSite};
use molki_runtime::alloc::{allocate_zeroed_in, AllocRequest, BLOCK_ALIGN};
use proptest::prelude::*;
use rstest::rstest;
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::Mutex;

/// Records the layouts it was asked for and defers to the system allocator.
struct Recording {
    layouts: Mutex<Vec<Layout>>,
}

unsafe impl GlobalAlloc for Recording {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.layouts.lock().unwrap().push(layout);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

proptest! {
    #[test]
    fn prop_byte_len_policy(count in any::<u32>(), size in any::<u32>()) {
        let request = AllocRequest::new(count, size);
        let requested = u64::from(count) * u64::from(size);
        let len = request.byte_len();

        prop_assert_eq!(len % 8, 0);
        prop_assert!(len >= requested);
        prop_assert!(len - requested < 8 || requested == 0);
        if requested == 0 {
            prop_assert_eq!(len, 8);
        }
    }

    #[test]
    fn prop_small_blocks_are_zeroed(count in 0u32..64, size in 0u32..64) {
        let block = call_alloc_mem(count, size);
        let len = AllocRequest::new(count, size).byte_len() as usize;

        prop_assert!(!block.is_null());
        prop_assert_eq!(block as usize % BLOCK_ALIGN, 0);
        let bytes = unsafe { block_bytes(block, len) };
        prop_assert!(bytes.iter().all(|&b| b == 0));
    }
}

#[rstest]
#[case(3, 4, 16)]
#[case(0, 0, 8)]
#[case(0, 100, 8)]
#[case(100, 0, 8)]
#[case(1, 1, 8)]
#[case(2, 8, 16)]
#[case(10, 4, 40)]
#[case(7, 3, 24)]
fn test_requested_layout(#[case] count: u32, #[case] size: u32, #[case] expected: usize) {
    let recording = Recording {
        layouts: Mutex::new(Vec::new()),
    };

    allocate_zeroed_in(&recording, AllocRequest::new(count, size));

    let layouts = recording.layouts.lock().unwrap();
    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].size(), expected);
    assert_eq!(layouts[0].align(), BLOCK_ALIGN);
}

#[test]
fn test_alloc_mem_three_by_four() {
    let block = call_alloc_mem(3, 4);
    assert!(!block.is_null());

    let bytes = unsafe { block_bytes(block, 16) };
    assert_eq!(bytes, &[0u8; 16]);
}

#[test]
fn test_alloc_mem_blocks_are_writable_and_independent() {
    let a = call_alloc_mem(2, 4);
    let b = call_alloc_mem(2, 4);
    assert_ne!(a, b);

    unsafe {
        std::ptr::write_bytes(a, 0xff, 8);
        assert_eq!(block_bytes(b, 8), &[0u8; 8]);
    }
}

#[rstest]
#[case(CallSite::Aligned)]
#[case(CallSite::Skewed)]
fn test_alloc_mem_at_either_call_site_alignment(#[case] site: CallSite) {
    let block = call_alloc_mem_at(site, 5, 1);
    assert_eq!(block as usize % BLOCK_ALIGN, 0);

    let bytes = unsafe { block_bytes(block, 8) };
    assert_eq!(bytes, &[0u8; 8]);
}
