//! Multi-threaded exercises of the concurrent allocators.

use std::{collections, ptr, slice};

use serial_test::serial;

use flmalloc::{ExclusiveAllocator, SharedAllocator, Strategy, HEADER_SIZE};
use flmalloc_test::{Gate, Pool};

static EXCLUSIVE: ExclusiveAllocator = ExclusiveAllocator::new();
static SHARED: SharedAllocator = SharedAllocator::new();

//
//  Tests
//

#[serial]
#[test]
fn exclusive_concurrent_allocations_are_disjoint() {
    //  Test that blocks handed out simultaneously to different threads never overlap.

    let number_threads = number_threads();
    let number_blocks = 64;
    let block_size = 64;

    let start = Gate::new(number_threads);

    let pool = Pool::spawn(number_threads, |thread_index| {
        let start = start.clone();

        move || {
            start.arrive_and_wait();

            let mut addresses = Vec::with_capacity(number_blocks);

            for _ in 0..number_blocks {
                let payload = EXCLUSIVE.allocate(block_size, Strategy::FirstFit).unwrap();

                //  Tag the whole payload, so that an overlap with another thread's block corrupts it.
                //
                //  Safety:
                //  -   `payload` points to `block_size` exclusively owned bytes.
                unsafe { ptr::write_bytes(payload.as_ptr(), thread_index as u8, block_size) };

                addresses.push(payload.as_ptr() as usize);
            }

            for &address in &addresses {
                //  Safety:
                //  -   `address` designates `block_size` bytes this thread tagged and still owns.
                for &byte in unsafe { slice::from_raw_parts(address as *const u8, block_size) } {
                    assert_eq!(thread_index as u8, byte);
                }
            }

            for &address in &addresses {
                //  Safety:
                //  -   The payload came from the allocator, and is no longer used.
                unsafe { EXCLUSIVE.release(ptr::NonNull::new(address as *mut u8).unwrap()) };
            }

            addresses
        }
    });

    let results = pool.join();

    //  Every address is distinct across all threads.
    let distinct: collections::BTreeSet<_> = results.iter().flatten().collect();

    assert_eq!(number_threads * number_blocks, distinct.len());
}

#[serial]
#[test]
fn exclusive_pools_are_thread_isolated() {
    //  Test that a block pooled by one thread is invisible to the others.

    let block_size = 256;

    let pool = Pool::spawn(1, |_| {
        move || {
            let payload = EXCLUSIVE.allocate(block_size, Strategy::FirstFit).unwrap();

            //  Safety:
            //  -   `payload` came from the allocator, and is no longer used.
            unsafe { EXCLUSIVE.release(payload) };

            assert!(EXCLUSIVE.thread_holds(payload));

            payload.as_ptr() as usize
        }
    });

    let pooled = pool.join()[0];
    let pooled = ptr::NonNull::new(pooled as *mut u8).unwrap();

    //  The block sits in the (now dead) first thread's pool, not this one's.
    assert!(!EXCLUSIVE.thread_holds(pooled));

    //  An equally sized request on this thread grows the heap rather than stealing the pooled block.
    let total = EXCLUSIVE.total_heap_bytes();
    let payload = EXCLUSIVE.allocate(block_size, Strategy::BestFit).unwrap();

    assert_ne!(pooled, payload);
    assert_eq!(total + block_size + HEADER_SIZE, EXCLUSIVE.total_heap_bytes());

    //  Safety:
    //  -   `payload` came from the allocator, and is no longer used.
    unsafe { EXCLUSIVE.release(payload) };
}

#[serial]
#[test]
fn shared_concurrent_churn() {
    //  Test that threads can allocate, fill, verify, and release blocks of varied sizes through the single lock
    //  without corrupting one another.

    let number_iterations = 16;
    let number_threads = number_threads();
    let sizes = [16usize, 48, 112, 256];

    let start = Gate::new(number_threads);

    let pool = Pool::spawn(number_threads, |thread_index| {
        let start = start.clone();

        move || {
            start.arrive_and_wait();

            for iteration in 0..number_iterations {
                let mut blocks = Vec::with_capacity(sizes.len());

                for (index, &size) in sizes.iter().enumerate() {
                    let payload = SHARED.allocate(size, Strategy::BestFit).unwrap();
                    let tag = (thread_index * sizes.len() + index) as u8;

                    //  Safety:
                    //  -   `payload` points to `size` exclusively owned bytes.
                    unsafe { ptr::write_bytes(payload.as_ptr(), tag, size) };

                    blocks.push((payload, size, tag));
                }

                for &(payload, size, tag) in &blocks {
                    //  Safety:
                    //  -   The payload still exclusively owns `size` bytes.
                    for &byte in unsafe { slice::from_raw_parts(payload.as_ptr(), size) } {
                        assert_eq!(tag, byte, "thread {}, iteration {}", thread_index, iteration);
                    }
                }

                for (payload, _, _) in blocks {
                    //  Safety:
                    //  -   The payload came from the allocator, and is no longer used.
                    unsafe { SHARED.release(payload) };
                }
            }
        }
    });

    pool.join();

    //  Everything released: the heap is entirely free again.
    assert_eq!(SHARED.total_heap_bytes(), SHARED.free_heap_bytes());
}

#[serial]
#[test]
fn shared_cross_thread_release() {
    //  Test that blocks allocated on one thread can be released on another.

    let number_threads = number_threads();
    let number_blocks = 32;
    let block_size = 128;

    let start = Gate::new(number_threads);

    let pool = Pool::spawn(number_threads, |_| {
        let start = start.clone();

        move || {
            start.arrive_and_wait();

            (0..number_blocks)
                .map(|_| SHARED.allocate(block_size, Strategy::FirstFit).unwrap().as_ptr() as usize)
                .collect::<Vec<_>>()
        }
    });

    let addresses: Vec<usize> = pool.join().into_iter().flatten().collect();

    assert_eq!(number_threads * number_blocks, addresses.len());

    //  This thread allocated none of them; it releases all of them.
    for address in &addresses {
        //  Safety:
        //  -   The address came from the allocator, and its payload is no longer used.
        unsafe { SHARED.release(ptr::NonNull::new(*address as *mut u8).unwrap()) };
    }

    //  Everything released, from whichever thread: the heap is entirely free again.
    assert_eq!(SHARED.total_heap_bytes(), SHARED.free_heap_bytes());
}

#[serial]
#[test]
fn shared_synchronized_double_release_is_noop() {
    //  Test that racing releases of the same block leave a single pooled copy.

    let number_threads = number_threads();

    let payload = SHARED.allocate(64, Strategy::FirstFit).unwrap();
    let address = payload.as_ptr() as usize;

    let start = Gate::new(number_threads);

    let pool = Pool::spawn(number_threads, |_| {
        let start = start.clone();

        move || {
            start.arrive_and_wait();

            //  Safety:
            //  -   The address designates a block of the allocator; releases are serialized by its lock, and
            //      releasing an already free block is a no-op.
            unsafe { SHARED.release(ptr::NonNull::new(address as *mut u8).unwrap()) };
        }
    });

    pool.join();

    //  Pooled exactly once: a double insertion would count the block twice, pushing free past total.
    assert_eq!(SHARED.total_heap_bytes(), SHARED.free_heap_bytes());
}

//
//  Implementation Details
//

fn number_threads() -> usize { num_cpus::get().max(2).min(8) }
