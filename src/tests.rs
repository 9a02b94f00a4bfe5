#![cfg(test)]
extern crate std;

use core::{cmp, iter, ptr, ptr::NonNull};

use crate::{AllocError, AllocInitError, DefaultBuddy, GlobalPages, PageSource, PagedBuddy};

use alloc::vec::Vec;
use quickcheck::{Arbitrary, Gen, QuickCheck};

fn default_buddy() -> DefaultBuddy<GlobalPages> {
    DefaultBuddy::try_new(GlobalPages::new(8192)).unwrap()
}

/// Returns the number of free blocks in each size class, smallest first.
fn class_counts<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource>(
    buddy: &PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>,
) -> Vec<usize> {
    iter::successors(Some(MIN_BLOCK), |&s| (s < PAGE_SIZE).then(|| s * 2))
        .map(|s| buddy.free_blocks(s))
        .collect()
}

/// Returns the number of pages the allocator is accounted to hold.
fn held<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource>(
    buddy: &PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>,
) -> usize {
    let stats = buddy.stats();
    stats.data_pages + stats.metadata_pages
}

// Property tests ==============================================================

#[derive(Clone, Debug)]
struct SourceParams {
    /// Maximum number of outstanding pages, if any.
    limit: Option<usize>,
}

impl Arbitrary for SourceParams {
    fn arbitrary(g: &mut Gen) -> Self {
        SourceParams {
            limit: Option::<u8>::arbitrary(g).map(|n| 2 + usize::from(n) % 8),
        }
    }
}

#[derive(Clone, Debug)]
enum AllocatorOp {
    /// Allocate a block of at least `size` bytes.
    Allocate { size: usize },
    /// Free an existing allocation.
    ///
    /// Given `n` outstanding allocations, the allocation to free is at index
    /// `index % n`.
    Free { index: usize },
}

/// Limit on request size, expressed in bits.
const SIZE_LIMIT_BITS: u8 = 13;

fn limited_size(g: &mut Gen) -> usize {
    let exp = u8::arbitrary(g) % (SIZE_LIMIT_BITS + 1);
    1 + usize::arbitrary(g) % 2_usize.pow(exp.into())
}

impl Arbitrary for AllocatorOp {
    fn arbitrary(g: &mut Gen) -> Self {
        match bool::arbitrary(g) {
            true => AllocatorOp::Allocate {
                size: limited_size(g),
            },
            false => AllocatorOp::Free {
                index: usize::arbitrary(g),
            },
        }
    }
}

type OpId = u32;

struct Allocation {
    op_id: OpId,
    ptr: NonNull<[u32]>,
    size: usize,
}

struct AllocatorChecker<const PAGE_SIZE: usize, const MIN_BLOCK: usize> {
    allocator: PagedBuddy<PAGE_SIZE, MIN_BLOCK, GlobalPages>,
    allocations: Vec<Allocation>,
    num_ops: u32,
}

impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize> AllocatorChecker<PAGE_SIZE, MIN_BLOCK> {
    fn new(params: SourceParams, capacity: usize) -> Result<Self, AllocInitError> {
        let source = match params.limit {
            Some(limit) => GlobalPages::with_limit(PAGE_SIZE, limit),
            None => GlobalPages::new(PAGE_SIZE),
        };

        Ok(AllocatorChecker {
            allocator: PagedBuddy::try_new(source)?,
            allocations: Vec::with_capacity(capacity),
            num_ops: 0,
        })
    }

    fn check_structure(&self) {
        // Holds under exhaustion too: a block that cannot be recorded stays
        // allocated rather than free and unmerged.
        self.allocator.assert_consistent();
        self.allocator.assert_fully_coalesced();

        assert_eq!(self.allocator.source().outstanding(), held(&self.allocator));
    }

    fn do_op(&mut self, op: AllocatorOp) -> bool {
        let op_id = self.num_ops;
        self.num_ops += 1;

        match op {
            AllocatorOp::Allocate { size } => {
                let size = cmp::min(size, PAGE_SIZE);

                match self.allocator.allocate(size) {
                    Ok(block) => {
                        let expected = cmp::max(size.next_power_of_two(), MIN_BLOCK);
                        let addr = block.cast::<u8>().as_ptr() as usize;
                        if block.len() != expected || addr % expected != 0 {
                            return false;
                        }

                        let len = block.len() / core::mem::size_of::<u32>();
                        let ptr = NonNull::new(ptr::slice_from_raw_parts_mut(
                            block.as_ptr().cast::<u32>(),
                            len,
                        ))
                        .unwrap();

                        // Paint the whole block so overlaps are caught on free.
                        unsafe { (*ptr.as_ptr()).fill(op_id) };

                        self.allocations.push(Allocation { op_id, ptr, size });
                    }

                    Err(AllocError::OutOfPages) => (),
                    Err(AllocError::InvalidSize(_)) => return false,
                }
            }

            AllocatorOp::Free { index } => {
                if self.allocations.is_empty() {
                    return true;
                }

                let index = index % self.allocations.len();
                let a = self.allocations.swap_remove(index);

                let painted = unsafe { a.ptr.as_ref() };
                if !painted.iter().all(|&w| w == a.op_id) {
                    return false;
                }

                unsafe { self.allocator.deallocate(a.ptr.cast(), a.size) };
            }
        }

        self.check_structure();

        true
    }

    fn run_ops(&mut self, ops: Vec<AllocatorOp>) -> bool {
        ops.into_iter().all(|op| self.do_op(op))
    }

    fn free_all(&mut self) -> bool {
        while !self.allocations.is_empty() {
            if !self.do_op(AllocatorOp::Free { index: 0 }) {
                return false;
            }
        }

        true
    }
}

// Miri is substantially slower to run property tests, so the number of test
// cases is reduced to keep the runtime in check.

#[cfg(not(miri))]
const MAX_TESTS: u64 = 100;

#[cfg(miri)]
const MAX_TESTS: u64 = 20;

fn mutually_exclusive<const PAGE_SIZE: usize, const MIN_BLOCK: usize>(
    params: SourceParams,
    ops: Vec<AllocatorOp>,
) -> bool {
    let mut checker =
        AllocatorChecker::<PAGE_SIZE, MIN_BLOCK>::new(params, ops.len()).unwrap();

    checker.run_ops(ops) && checker.free_all()
}

fn fully_coalesces<const PAGE_SIZE: usize, const MIN_BLOCK: usize>(
    ops: Vec<AllocatorOp>,
) -> bool {
    let mut checker =
        AllocatorChecker::<PAGE_SIZE, MIN_BLOCK>::new(SourceParams { limit: None }, ops.len())
            .unwrap();

    if !(checker.run_ops(ops) && checker.free_all()) {
        return false;
    }

    let stats = checker.allocator.stats();
    if stats.data_pages == 0 {
        return true;
    }

    let mut expected = class_counts(&checker.allocator);
    expected.iter_mut().for_each(|c| *c = 0);
    *expected.last_mut().unwrap() = 1;

    stats.data_pages == 1
        && stats.allocated_bytes == 0
        && class_counts(&checker.allocator) == expected
}

fn round_trip_restores_state<const PAGE_SIZE: usize, const MIN_BLOCK: usize>(
    ops: Vec<AllocatorOp>,
    size: usize,
) -> bool {
    let mut checker =
        AllocatorChecker::<PAGE_SIZE, MIN_BLOCK>::new(SourceParams { limit: None }, ops.len())
            .unwrap();

    if !checker.run_ops(ops) {
        return false;
    }

    // The first data page is kept once created, so there is nothing to
    // restore on an allocator that has never held one.
    if checker.allocator.stats().data_pages == 0 {
        return true;
    }

    let before = (checker.allocator.stats(), class_counts(&checker.allocator));

    let size = 1 + size % PAGE_SIZE;
    if !checker.do_op(AllocatorOp::Allocate { size }) {
        return false;
    }
    let last = checker.allocations.len() - 1;
    if !checker.do_op(AllocatorOp::Free { index: last }) {
        return false;
    }

    let after = (checker.allocator.stats(), class_counts(&checker.allocator));

    before.0.data_pages == after.0.data_pages
        && before.0.free_bytes == after.0.free_bytes
        && before.1 == after.1
}

#[test]
fn allocations_are_mutually_exclusive() {
    let mut qc = QuickCheck::new().max_tests(MAX_TESTS);
    qc.quickcheck(mutually_exclusive::<8192, 16> as fn(_, _) -> bool);
    qc.quickcheck(mutually_exclusive::<4096, 32> as fn(_, _) -> bool);
    qc.quickcheck(mutually_exclusive::<1024, 16> as fn(_, _) -> bool);
}

#[test]
fn freeing_everything_fully_coalesces() {
    let mut qc = QuickCheck::new().max_tests(MAX_TESTS);
    qc.quickcheck(fully_coalesces::<8192, 16> as fn(_) -> bool);
    qc.quickcheck(fully_coalesces::<1024, 16> as fn(_) -> bool);
}

#[test]
fn allocate_then_free_restores_state() {
    let mut qc = QuickCheck::new().max_tests(MAX_TESTS);
    qc.quickcheck(round_trip_restores_state::<8192, 16> as fn(_, _) -> bool);
    qc.quickcheck(round_trip_restores_state::<1024, 16> as fn(_, _) -> bool);
}

// Allocation ==================================================================

#[test]
fn allocate_rounds_up_and_splits() {
    let mut buddy = default_buddy();

    let block = buddy.allocate(100).unwrap();
    assert_eq!(block.len(), 128);
    assert_eq!(block.cast::<u8>().as_ptr() as usize % 128, 0);

    // The page was split from 8192 down to 128, leaving one free block in
    // each class from 128 to 4096.
    assert_eq!(class_counts(&buddy), [0, 0, 0, 1, 1, 1, 1, 1, 1, 0]);
    buddy.assert_consistent();

    let stats = buddy.stats();
    assert_eq!(stats.data_pages, 1);
    assert_eq!(stats.allocated_bytes, 128);
    assert_eq!(stats.free_bytes, 8192 - 128);
}

#[test]
fn allocate_rejects_invalid_sizes() {
    let mut buddy = default_buddy();

    assert_eq!(buddy.allocate(0), Err(AllocError::InvalidSize(0)));
    assert_eq!(buddy.allocate(8193), Err(AllocError::InvalidSize(8193)));
    assert_eq!(buddy.allocate(8200), Err(AllocError::InvalidSize(8200)));

    // Rejections never touch the page source.
    assert_eq!(buddy.stats().data_pages, 0);
    assert_eq!(buddy.source().outstanding(), 2);
}

#[test]
fn whole_page_round_trip() {
    let mut buddy = default_buddy();

    let block = buddy.allocate(8192).unwrap();
    assert_eq!(block.len(), 8192);
    assert_eq!(class_counts(&buddy), [0; 10]);

    unsafe { buddy.deallocate(block.cast(), 8192) };
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(buddy.stats().data_pages, 1);
    buddy.assert_consistent();
}

#[test]
fn buddies_coalesce_up_to_a_page() {
    let mut buddy = default_buddy();

    let a = buddy.allocate(16).unwrap();
    let b = buddy.allocate(16).unwrap();
    assert_eq!(
        b.cast::<u8>().as_ptr() as usize,
        a.cast::<u8>().as_ptr() as usize + 16
    );

    unsafe { buddy.deallocate(a.cast(), 16) };
    assert_eq!(buddy.free_blocks(16), 1);

    unsafe { buddy.deallocate(b.cast(), 16) };
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    buddy.assert_consistent();
}

#[test]
fn buddies_merge_within_one_call() {
    let mut buddy = default_buddy();

    let blocks: Vec<_> = (0..4).map(|_| buddy.allocate(16).unwrap()).collect();

    unsafe {
        buddy.deallocate(blocks[0].cast(), 16);
        buddy.deallocate(blocks[2].cast(), 16);
    }
    assert_eq!(buddy.free_blocks(16), 2);
    assert_eq!(buddy.free_blocks(32), 0);

    // Freeing the sibling of the first block merges the pair at once, but
    // the third block's buddy is still live.
    unsafe { buddy.deallocate(blocks[1].cast(), 16) };
    assert_eq!(buddy.free_blocks(16), 1);
    assert_eq!(buddy.free_blocks(32), 1);
    buddy.assert_fully_coalesced();

    unsafe { buddy.deallocate(blocks[3].cast(), 16) };
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    buddy.assert_consistent();
}

#[test]
fn sizes_share_the_rounded_class() {
    let mut buddy = default_buddy();

    for size in [1, 15, 16] {
        let block = buddy.allocate(size).unwrap();
        assert_eq!(block.len(), 16);
        unsafe { buddy.deallocate(block.cast(), size) };
    }

    for size in [4097, 8191] {
        let block = buddy.allocate(size).unwrap();
        assert_eq!(block.len(), 8192);
        unsafe { buddy.deallocate(block.cast(), size) };
    }

    buddy.assert_consistent();
}

// Page lifecycle ==============================================================

#[test]
fn empty_page_is_reclaimed_while_another_is_live() {
    let mut buddy = default_buddy();

    let a = buddy.allocate(8192).unwrap();
    let b = buddy.allocate(16).unwrap();
    assert_eq!(buddy.stats().data_pages, 2);
    assert_eq!(buddy.source().outstanding(), 4);

    unsafe { buddy.deallocate(a.cast(), 8192) };
    assert_eq!(buddy.stats().data_pages, 1);
    assert_eq!(buddy.source().outstanding(), 3);
    assert!(!buddy.owns(a.cast()));
    assert!(buddy.owns(b.cast()));
    buddy.assert_consistent();

    unsafe { buddy.deallocate(b.cast(), 16) };
}

#[test]
fn last_page_is_kept() {
    let mut buddy = default_buddy();

    let a = buddy.allocate(16).unwrap();
    unsafe { buddy.deallocate(a.cast(), 16) };

    assert_eq!(buddy.stats().data_pages, 1);
    assert_eq!(buddy.free_blocks(8192), 1);
    assert!(buddy.owns(a.cast()));
    assert_eq!(buddy.source().outstanding(), 3);
}

#[test]
fn fragmented_page_is_reclaimed() {
    let mut buddy = default_buddy();

    let a = buddy.allocate(16).unwrap();
    let whole = buddy.allocate(8192).unwrap();
    let c = buddy.allocate(16).unwrap();
    assert!(buddy.owns(a.cast()) && buddy.owns(c.cast()));
    assert_eq!(buddy.stats().data_pages, 2);

    unsafe { buddy.deallocate(a.cast(), 16) };
    assert_eq!(buddy.free_blocks(16), 1);

    // The first page still has fragments filed in every class below 8192;
    // all of them go with it.
    unsafe { buddy.deallocate(c.cast(), 16) };
    assert_eq!(buddy.stats().data_pages, 1);
    assert_eq!(class_counts(&buddy), [0; 10]);
    assert!(!buddy.owns(a.cast()));
    buddy.assert_consistent();

    unsafe { buddy.deallocate(whole.cast(), 8192) };
    assert_eq!(buddy.free_blocks(8192), 1);
}

#[test]
fn out_of_pages_leaves_state_intact() {
    let mut buddy = DefaultBuddy::try_new(GlobalPages::with_limit(8192, 3)).unwrap();

    let whole = buddy.allocate(8192).unwrap();
    assert_eq!(buddy.allocate(16), Err(AllocError::OutOfPages));

    assert_eq!(buddy.stats().data_pages, 1);
    assert_eq!(class_counts(&buddy), [0; 10]);
    buddy.assert_consistent();

    unsafe { buddy.deallocate(whole.cast(), 8192) };
    let small = buddy.allocate(16).unwrap();
    assert!(buddy.owns(small.cast()));
}

#[test]
fn metadata_exhaustion_keeps_block_allocated() {
    // Both pinned pages plus a single data page.
    let mut buddy = DefaultBuddy::try_new(GlobalPages::with_limit(8192, 3)).unwrap();

    let blocks: Vec<_> = (0..512).map(|_| buddy.allocate(16).unwrap()).collect();
    assert_eq!(buddy.stats().free_bytes, 0);

    // No freed block has a free buddy, so each one needs its own record.
    // The pinned page holds 200 of them and no more pages can be obtained.
    for block in blocks.iter().step_by(2) {
        unsafe { buddy.deallocate(block.cast(), 16) };
    }

    assert_eq!(buddy.free_blocks(16), 200);
    assert_eq!(buddy.stats().free_bytes, 200 * 16);
    buddy.assert_consistent();

    assert_eq!(buddy.into_source().outstanding(), 0);
}

/// A 512-byte page has room for 9 free-block records in its pinned page, and
/// a limit of 3 pages leaves no room for another metadata page.
fn cramped_buddy() -> (PagedBuddy<512, 16, GlobalPages>, Vec<NonNull<[u8]>>) {
    let mut buddy = PagedBuddy::<512, 16, _>::try_new(GlobalPages::with_limit(512, 3)).unwrap();

    // Fills the low half of the page in address order.
    let blocks: Vec<_> = (0..16).map(|_| buddy.allocate(16).unwrap()).collect();
    let base = blocks[0].cast::<u8>().as_ptr();
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.cast::<u8>().as_ptr(), base.wrapping_add(16 * i));
    }
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 1, 0]);

    (buddy, blocks)
}

fn free_checked<const PAGE_SIZE: usize, const MIN_BLOCK: usize>(
    buddy: &mut PagedBuddy<PAGE_SIZE, MIN_BLOCK, GlobalPages>,
    block: NonNull<[u8]>,
) {
    unsafe { buddy.deallocate(block.cast(), 16) };
    buddy.assert_consistent();
    buddy.assert_fully_coalesced();
}

#[test]
fn split_failure_merges_partial_split() {
    let (mut buddy, blocks) = cramped_buddy();

    for &block in blocks.iter().step_by(2).take(6) {
        free_checked(&mut buddy, block);
    }
    assert_eq!(class_counts(&buddy), [6, 0, 0, 0, 1, 0]);

    // Seven records are live. Splitting 256 into two 128s fits, but the
    // next split needs two more records and only one is left.
    assert_eq!(buddy.allocate(32), Err(AllocError::OutOfPages));
    assert_eq!(class_counts(&buddy), [6, 0, 0, 0, 1, 0]);
    buddy.assert_consistent();
    buddy.assert_fully_coalesced();

    for (i, &block) in blocks.iter().enumerate() {
        if i % 2 == 1 || i >= 12 {
            free_checked(&mut buddy, block);
        }
    }

    let stats = buddy.stats();
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 0, 1]);
    assert_eq!(stats.allocated_bytes, 0);
    assert_eq!(stats.data_pages, 1);
}

#[test]
fn full_pool_merges_into_free_buddy() {
    let (mut buddy, blocks) = cramped_buddy();

    // Eight 16-byte records and the 256-byte one fill the pinned page.
    for &block in blocks.iter().step_by(2) {
        free_checked(&mut buddy, block);
    }
    assert_eq!(class_counts(&buddy), [8, 0, 0, 0, 1, 0]);
    assert_eq!(buddy.stats().allocated_bytes, 128);

    // The freed block's buddy is free, so its record describes the merge.
    free_checked(&mut buddy, blocks[1]);
    assert_eq!(buddy.stats().allocated_bytes, 112);
    assert_eq!(class_counts(&buddy), [7, 1, 0, 0, 1, 0]);

    for &block in blocks.iter().skip(3).step_by(2) {
        free_checked(&mut buddy, block);
    }

    assert_eq!(buddy.stats().allocated_bytes, 0);
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 0, 1]);
}

#[test]
fn metadata_pages_grow_and_are_reclaimed() {
    let mut buddy = default_buddy();

    let blocks: Vec<_> = (0..1024).map(|_| buddy.allocate(16).unwrap()).collect();
    assert_eq!(buddy.stats().data_pages, 2);
    assert_eq!(buddy.stats().metadata_pages, 2);

    // 512 free records: 200 in the pinned page, then 204 per page.
    for block in blocks.iter().step_by(2) {
        unsafe { buddy.deallocate(block.cast(), 16) };
    }
    assert_eq!(buddy.free_blocks(16), 512);
    assert_eq!(buddy.stats().metadata_pages, 4);
    assert_eq!(buddy.source().outstanding(), 6);
    buddy.assert_consistent();

    for block in blocks.iter().skip(1).step_by(2) {
        unsafe { buddy.deallocate(block.cast(), 16) };
    }

    let stats = buddy.stats();
    assert_eq!(stats.data_pages, 1);
    assert!(stats.metadata_pages < 4);
    assert_eq!(buddy.source().outstanding(), held(&buddy));
    assert_eq!(class_counts(&buddy), [0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    buddy.assert_consistent();
}

// Construction ================================================================

#[test]
fn invalid_geometry_is_rejected() {
    assert!(matches!(
        PagedBuddy::<8192, 24, _>::try_new(GlobalPages::new(8192)),
        Err(AllocInitError::InvalidConfig)
    ));

    assert!(matches!(
        DefaultBuddy::try_new(GlobalPages::new(4096)),
        Err(AllocInitError::InvalidConfig)
    ));

    // Too small to hold a page record next to the root header.
    assert!(matches!(
        PagedBuddy::<64, 16, _>::try_new(GlobalPages::new(64)),
        Err(AllocInitError::InvalidConfig)
    ));

    assert!(matches!(
        PagedBuddy::<32, 64, _>::try_new(GlobalPages::new(32)),
        Err(AllocInitError::InvalidConfig)
    ));
}

#[test]
fn init_failure_releases_pages() {
    let mut pages = GlobalPages::with_limit(8192, 1);

    assert!(matches!(
        DefaultBuddy::try_new(&mut pages),
        Err(AllocInitError::AllocFailed)
    ));
    assert_eq!(pages.outstanding(), 0);
}

#[test]
fn drop_returns_every_page() {
    let mut pages = GlobalPages::new(8192);

    {
        let mut buddy = DefaultBuddy::try_new(&mut pages).unwrap();

        let blocks: Vec<_> = (0..1024).map(|_| buddy.allocate(16).unwrap()).collect();
        for block in blocks.iter().step_by(2) {
            unsafe { buddy.deallocate(block.cast(), 16) };
        }

        assert_eq!(buddy.source().outstanding(), 6);
    }

    assert_eq!(pages.outstanding(), 0);
}

#[test]
fn into_source_returns_every_page() {
    let mut buddy = default_buddy();
    buddy.allocate(100).unwrap();
    buddy.allocate(8192).unwrap();

    let pages = buddy.into_source();
    assert_eq!(pages.outstanding(), 0);
}

// Hardening ===================================================================

#[test]
#[should_panic(expected = "double free")]
fn double_free_panics() {
    let mut buddy = default_buddy();

    let a = buddy.allocate(16).unwrap();
    let _b = buddy.allocate(16).unwrap();

    unsafe {
        buddy.deallocate(a.cast(), 16);
        buddy.deallocate(a.cast(), 16);
    }
}

#[test]
#[should_panic(expected = "not allocated by this allocator")]
fn foreign_pointer_panics() {
    let mut buddy = default_buddy();
    let _a = buddy.allocate(16).unwrap();

    let mut local = [0_u8; 16];
    unsafe { buddy.deallocate(NonNull::from(&mut local).cast(), 16) };
}

#[test]
#[should_panic(expected = "is not the start of a 32-byte block")]
fn misaligned_pointer_panics() {
    let mut buddy = default_buddy();
    let a = buddy.allocate(64).unwrap();

    let inner = NonNull::new(a.cast::<u8>().as_ptr().wrapping_add(16)).unwrap();
    unsafe { buddy.deallocate(inner, 32) };
}

#[test]
#[should_panic(expected = "double free or mismatched size")]
fn mismatched_size_panics() {
    let mut buddy = default_buddy();
    let a = buddy.allocate(16).unwrap();

    unsafe { buddy.deallocate(a.cast(), 32) };
}

// Version sync ================================================================
#[test]
fn html_root_url() {
    version_sync::assert_html_root_url_updated!("src/lib.rs");
}

#[test]
fn readme_deps() {
    version_sync::assert_markdown_deps_updated!("README.md");
}
