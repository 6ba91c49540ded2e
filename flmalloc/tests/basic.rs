//! Single-threaded exercises of the three allocators, against the real program break.
//!
//! The break is shared by the whole process; tests that rely on consecutive growths being contiguous avoid
//! allocating through the standard library in between them.

use std::{ptr, slice};

use serial_test::serial;

use flmalloc::{AllocError, ExclusiveAllocator, SerialAllocator, SharedAllocator, Strategy, ALIGNMENT, HEADER_SIZE};

#[serial]
#[test]
fn serial_allocate_write_read() {
    let allocator = SerialAllocator::new();

    let payload = allocator.allocate(64, Strategy::FirstFit).unwrap();

    assert_eq!(0, payload.as_ptr() as usize % ALIGNMENT);

    //  Safety:
    //  -   `payload` points to 64 exclusively owned bytes.
    unsafe {
        ptr::write_bytes(payload.as_ptr(), 0xAB, 64);

        for &byte in slice::from_raw_parts(payload.as_ptr(), 64) {
            assert_eq!(0xAB, byte);
        }

        allocator.release(payload);
    }
}

#[serial]
#[test]
fn serial_release_then_allocate_reuses_pointer() {
    let allocator = SerialAllocator::new();

    let payload = allocator.allocate(128, Strategy::BestFit).unwrap();

    //  Safety:
    //  -   `payload` came from this allocator, and is no longer used.
    unsafe { allocator.release(payload) };

    let total = allocator.total_heap_bytes();

    //  The freed block is an exact fit: reused as-is, without growing the heap.
    assert_eq!(Ok(payload), allocator.allocate(128, Strategy::FirstFit));
    assert_eq!(total, allocator.total_heap_bytes());
}

#[serial]
#[test]
fn serial_split_and_coalesce_round_trip() {
    let allocator = SerialAllocator::new();

    //  Grow once, then carve everything out of the one region: splits are contiguous by construction, so full
    //  coalescing is guaranteed no matter what else moved the break in between tests.
    let big = allocator.allocate(208, Strategy::FirstFit).unwrap();

    //  Safety:
    //  -   `big` came from this allocator, and is no longer used.
    unsafe { allocator.release(big) };

    let total = allocator.total_heap_bytes();

    let a = allocator.allocate(32, Strategy::FirstFit).unwrap();
    let b = allocator.allocate(32, Strategy::FirstFit).unwrap();
    let c = allocator.allocate(48, Strategy::FirstFit).unwrap();

    //  No growth: everything came out of the released block.
    assert_eq!(big, a);
    assert_eq!(total, allocator.total_heap_bytes());
    assert_eq!(0, allocator.free_heap_bytes());

    //  Safety:
    //  -   The payloads came from this allocator, and are no longer used.
    unsafe {
        allocator.release(a);
        allocator.release(c);
        allocator.release(b);
    }

    //  The three blocks merged back into the original.
    assert_eq!(total, allocator.total_heap_bytes());
    assert_eq!(total, allocator.free_heap_bytes());
    assert_eq!(1, allocator.blocks().len());
    assert_eq!(208, allocator.blocks()[0].payload_size);
}

#[serial]
#[test]
fn serial_coalesce_across_growths() {
    let allocator = SerialAllocator::new();

    //  Three separate growths. Nothing in between allocates, so nothing else moves the break, and each extension
    //  starts exactly where the previous one ended.
    let a = allocator.allocate(16, Strategy::FirstFit).unwrap();
    let b = allocator.allocate(16, Strategy::FirstFit).unwrap();
    let c = allocator.allocate(16, Strategy::FirstFit).unwrap();

    //  Safety:
    //  -   The payloads came from this allocator, and are no longer used.
    unsafe {
        allocator.release(b);
        allocator.release(a);
        allocator.release(c);
    }

    //  The three blocks merged back into a single free region.
    assert_eq!(allocator.total_heap_bytes(), allocator.free_heap_bytes());
    assert_eq!(1, allocator.blocks().len());

    //  The merged region serves a request larger than any single original block, without growing the heap.
    let total = allocator.total_heap_bytes();
    let payload = allocator.allocate(40, Strategy::FirstFit).unwrap();

    assert_eq!(a, payload);
    assert_eq!(total, allocator.total_heap_bytes());
}

#[serial]
#[test]
fn serial_release_is_idempotent() {
    let allocator = SerialAllocator::new();

    let payload = allocator.allocate(32, Strategy::FirstFit).unwrap();

    //  Safety:
    //  -   `payload` came from this allocator, and is no longer used.
    unsafe {
        allocator.release(payload);
        allocator.release(payload);
    }

    assert_eq!(allocator.total_heap_bytes(), allocator.free_heap_bytes());
}

#[serial]
#[test]
fn serial_rejects_invalid_sizes() {
    let allocator = SerialAllocator::new();

    assert_eq!(Err(AllocError::ZeroSize), allocator.allocate(0, Strategy::FirstFit));
    assert_eq!(Err(AllocError::SizeOverflow), allocator.allocate(usize::MAX, Strategy::BestFit));
}

#[serial]
#[test]
fn serial_blocks_report_is_address_ordered() {
    let allocator = SerialAllocator::new();

    let _a = allocator.allocate(16, Strategy::FirstFit).unwrap();
    let _b = allocator.allocate(32, Strategy::FirstFit).unwrap();

    let reports = allocator.blocks();

    assert_eq!(2, reports.len());

    for report in &reports {
        assert_eq!(report.address + HEADER_SIZE, report.payload_address);
        assert!(!report.available);
    }

    assert!(reports[0].address < reports[1].address);
}

#[serial]
#[test]
fn shared_release_then_allocate_reuses_pointer() {
    let allocator = SharedAllocator::new();

    let payload = allocator.allocate(64, Strategy::BestFit).unwrap();

    //  Safety:
    //  -   `payload` points to 64 exclusively owned bytes.
    unsafe { ptr::write_bytes(payload.as_ptr(), 0xCD, 64) };

    //  Safety:
    //  -   `payload` came from this allocator, and is no longer used.
    unsafe { allocator.release(payload) };

    assert_eq!(allocator.total_heap_bytes(), allocator.free_heap_bytes());

    let total = allocator.total_heap_bytes();

    assert_eq!(Ok(payload), allocator.allocate(64, Strategy::FirstFit));
    assert_eq!(total, allocator.total_heap_bytes());
}

#[serial]
#[test]
fn shared_global_alloc_round_trip() {
    use std::alloc::{GlobalAlloc, Layout};

    let allocator = SharedAllocator::new();

    let layout = Layout::from_size_align(24, 8).unwrap();

    //  Safety:
    //  -   `layout` has a non-zero size and a supported alignment.
    let pointer = unsafe { allocator.alloc(layout) };

    assert!(!pointer.is_null());
    assert_eq!(0, pointer as usize % ALIGNMENT);

    //  Safety:
    //  -   `pointer` was handed out by `alloc` with this layout.
    unsafe { allocator.dealloc(pointer, layout) };

    assert_eq!(allocator.total_heap_bytes(), allocator.free_heap_bytes());
}

#[serial]
#[test]
fn shared_global_alloc_refuses_over_aligned_layouts() {
    use std::alloc::{GlobalAlloc, Layout};

    let allocator = SharedAllocator::new();

    let layout = Layout::from_size_align(64, 2 * ALIGNMENT).unwrap();

    //  Safety:
    //  -   `layout` has a non-zero size.
    let pointer = unsafe { allocator.alloc(layout) };

    assert!(pointer.is_null());
}

#[serial]
#[test]
fn exclusive_release_then_allocate_reuses_pointer() {
    //  The exclusive allocator state is process-wide; assertions are deltas, not absolutes.
    let allocator = ExclusiveAllocator::new();

    let payload = allocator.allocate(96, Strategy::FirstFit).unwrap();

    assert!(!allocator.thread_holds(payload));

    //  Safety:
    //  -   `payload` came from this allocator, and is no longer used.
    unsafe { allocator.release(payload) };

    assert!(allocator.thread_holds(payload));

    let total = allocator.total_heap_bytes();

    assert_eq!(Ok(payload), allocator.allocate(96, Strategy::BestFit));
    assert_eq!(total, allocator.total_heap_bytes());
}
