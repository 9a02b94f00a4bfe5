//! Buddy allocation over pages from a [`PageSource`].
//!
//! A buddy allocator carves pages into blocks whose sizes are powers of two.
//! A request is rounded up to the nearest such size; if no free block of
//! that size exists, the smallest larger free block is split in half
//! repeatedly until one does. The two halves of a split are each other's
//! *buddies*, and when both are free again they are merged back into the
//! block they came from.
//!
//! [`PagedBuddy`] obtains every page it manages from a [`PageSource`]. Data
//! pages hold nothing but caller data. The allocator's own bookkeeping
//! (one record per data page with an occupancy bitmap, and one record per
//! free block) lives in separate metadata pages from the same source. When
//! a data page becomes entirely free while another data page is live, it is
//! handed back to the source, and so is any metadata page left without live
//! records.
//!
//! ## Characteristics
//!
//! #### Time complexity
//!
//! Let *P* be the number of data pages held and *B* the number of free blocks
//! per size class.
//!
//! | Operation                | Best-case | Worst-case                 |
//! |--------------------------|-----------|----------------------------|
//! | Allocate                 | O(P)      | O(log(C / M) × B + P)      |
//! | Deallocate               | O(P)      | O(log(C / M) × B + P)      |
//!
//! #### Fragmentation
//!
//! Every allocation is rounded up to a power of two no smaller than the
//! minimum block size, so internal fragmentation may waste just under half of
//! a block. Requests larger than one page are not supported.

use core::{
    cmp, fmt, iter,
    mem::ManuallyDrop,
    num::NonZeroUsize,
    ptr::{self, NonNull},
};

use log::{debug, trace, warn};

use crate::{
    base::PagePtr,
    bitmap::Bitmap,
    node::{Arena, Head, NodePool, NodeRef, LINK_WORDS, PAYLOAD},
    page::{Page, PageHandle, PageSource},
    polyfill::NonNullStrict,
    AllocError, AllocInitError,
};

// Free-block records.
const BLOCK_ADDR: usize = PAYLOAD;
const BLOCK_SIZE: usize = PAYLOAD + 1;
const BLOCK_RECORD_WORDS: usize = PAYLOAD + 2;

// Page records. The occupancy bitmap runs to the end of the record.
const DATA_HANDLE: usize = PAYLOAD;
const DATA_ADDR: usize = PAYLOAD + 1;
const OCCUPANCY: usize = PAYLOAD + 2;

// List heads in the root page of the page-record pool. Head 0 is the pool's
// empty list.
const FILLED_PAGES: usize = 1;
const PAGE_HEADS: usize = 2;

// List heads in the root page of the free-block pool. Head 0 is the pool's
// empty list; the size-class table follows it.
const FIRST_CLASS: usize = 1;

/// A buddy allocator over 8 KiB pages with a 16-byte minimum block size.
pub type DefaultBuddy<S> = PagedBuddy<8192, 16, S>;

/// A snapshot of the pages held by a [`PagedBuddy`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Stats {
    /// The number of pages holding caller data.
    pub data_pages: usize,
    /// The number of pages holding allocator metadata.
    pub metadata_pages: usize,
    /// The number of bytes in data pages that are free.
    pub free_bytes: usize,
    /// The number of bytes in data pages that are allocated, including the
    /// rounding applied to each request.
    pub allocated_bytes: usize,
}

/// A binary-buddy allocator built on a [`PageSource`].
///
/// This takes two const parameters:
/// - `PAGE_SIZE` is the size of each page obtained from the source, and the
///   size of the largest allocation the allocator can make.
/// - `MIN_BLOCK` is the size of the smallest block handed out.
///
/// Both must be powers of two with `MIN_BLOCK <= PAGE_SIZE`, and a page must
/// be large enough to hold the allocator's root metadata; otherwise
/// construction fails with [`AllocInitError::InvalidConfig`].
///
/// For example, the type of a buddy allocator which hands out blocks of sizes
/// from 16 to 4096 bytes would be:
///
/// ```
/// use paged_buddy::PagedBuddy;
///
/// type CustomBuddy<S> = PagedBuddy<4096, 16, S>;
/// # fn main() {}
/// ```
///
/// For a discussion of buddy allocation, see the [module-level
/// documentation].
///
/// [module-level documentation]: crate::buddy
pub struct PagedBuddy<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource> {
    /// Page records. The pinned root page holds the list of live data pages.
    pages: NodePool,
    /// Free-block records. The pinned root page holds the size-class table.
    blocks: NodePool,
    data_pages: usize,
    source: S,
}

impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource>
    PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>
{
    /// Returns the number of size classes, from `MIN_BLOCK` up to `PAGE_SIZE`.
    fn num_classes() -> usize {
        (PAGE_SIZE.ilog2() - MIN_BLOCK.ilog2()) as usize + 1
    }

    /// Returns the number of occupancy bits tracked per data page.
    fn units() -> usize {
        PAGE_SIZE / MIN_BLOCK
    }

    fn page_header_words() -> usize {
        LINK_WORDS * PAGE_HEADS
    }

    fn page_record_words() -> usize {
        OCCUPANCY + Bitmap::num_words(Self::units())
    }

    fn block_header_words() -> usize {
        LINK_WORDS * (FIRST_CLASS + Self::num_classes())
    }

    fn check_config(source: &S) -> Result<(), AllocInitError> {
        if !PAGE_SIZE.is_power_of_two()
            || !MIN_BLOCK.is_power_of_two()
            || MIN_BLOCK > PAGE_SIZE
            || source.page_size() != PAGE_SIZE
        {
            return Err(AllocInitError::InvalidConfig);
        }

        let page_slots = NodePool::slots_per_page(
            PAGE_SIZE,
            Self::page_header_words(),
            Self::page_record_words(),
        );
        let block_slots =
            NodePool::slots_per_page(PAGE_SIZE, Self::block_header_words(), BLOCK_RECORD_WORDS);

        if page_slots == 0 || block_slots == 0 {
            return Err(AllocInitError::InvalidConfig);
        }

        Ok(())
    }

    /// Constructs a new `PagedBuddy` which draws its pages from `source`.
    ///
    /// This obtains the two pinned metadata pages immediately; data pages
    /// are obtained on demand.
    ///
    /// # Errors
    ///
    /// Returns [`AllocInitError::InvalidConfig`] if the const parameters are
    /// invalid or `source` hands out pages of a size other than `PAGE_SIZE`.
    /// Returns [`AllocInitError::AllocFailed`] if `source` cannot supply the
    /// metadata pages.
    pub fn try_new(mut source: S) -> Result<PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>, AllocInitError> {
        Self::check_config(&source)?;

        let page_root = source.get_page().ok_or(AllocInitError::AllocFailed)?;
        let block_root = match source.get_page() {
            Some(p) => p,
            None => {
                // SAFETY: the page came from `source` and was never used.
                unsafe { source.release_page(page_root) };
                return Err(AllocInitError::AllocFailed);
            }
        };

        let arena = Arena::new(PAGE_SIZE);

        // SAFETY: both pages came from `source`, which guarantees they are
        // valid for `PAGE_SIZE` bytes, and `check_config` verified that each
        // holds at least one slot.
        let (pages, blocks) = unsafe {
            (
                NodePool::new(
                    arena,
                    page_root,
                    Self::page_header_words(),
                    Self::page_record_words(),
                ),
                NodePool::new(
                    arena,
                    block_root,
                    Self::block_header_words(),
                    BLOCK_RECORD_WORDS,
                ),
            )
        };

        Ok(PagedBuddy {
            pages,
            blocks,
            data_pages: 0,
            source,
        })
    }

    /// Returns a reference to the page source.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Releases every page held by the allocator and returns the page source.
    ///
    /// All outstanding allocations are invalidated.
    pub fn into_source(self) -> S {
        let mut this = ManuallyDrop::new(self);

        // SAFETY: `this` is never used again, and its `Drop` impl does not
        // run; the source is moved out exactly once.
        unsafe {
            this.release_pages();
            ptr::read(&this.source)
        }
    }

    // Size classes ===========================================================

    /// Rounds a request up to the size of the block that satisfies it.
    #[inline]
    fn block_size_for(size: usize) -> usize {
        cmp::max(size.next_power_of_two(), MIN_BLOCK)
    }

    /// Returns the block sizes from `size` up to `PAGE_SIZE`, smallest first.
    fn sizes_from(size: usize) -> impl Iterator<Item = usize> {
        iter::successors(Some(size), |&s| (s < PAGE_SIZE).then(|| s * 2))
    }

    /// Returns the head of the free list for blocks of `size` bytes.
    fn class_head(&self, size: usize) -> Head {
        assert!(
            size.is_power_of_two() && (MIN_BLOCK..=PAGE_SIZE).contains(&size),
            "no size class for {size} bytes"
        );

        let class = (size.ilog2() - MIN_BLOCK.ilog2()) as usize;
        self.blocks.head(FIRST_CLASS + class)
    }

    // Free-block records =====================================================

    /// Returns the address and size of the block described by `node`.
    fn block(&self, node: NodeRef) -> (usize, usize) {
        let arena = self.blocks.arena();

        (
            arena.field(node, BLOCK_ADDR) as usize,
            arena.field(node, BLOCK_SIZE) as usize,
        )
    }

    /// Records the block at `addr` as free in its size class.
    fn file(&mut self, node: NodeRef, addr: usize, size: usize) {
        let arena = self.blocks.arena();
        arena.set_field(node, BLOCK_ADDR, addr as u64);
        arena.set_field(node, BLOCK_SIZE, size as u64);
        arena.push(self.class_head(size), node);
    }

    /// Removes a free-block record from its size class and recycles it.
    fn unfile(&mut self, node: NodeRef) {
        let (_, size) = self.block(node);
        let removed = self.blocks.arena().remove(self.class_head(size), node);
        assert!(removed, "free block missing from its size class");

        self.blocks.release(&mut self.source, node);
    }

    /// Finds the free block of `size` bytes at `addr`, if there is one.
    fn find_block(&self, addr: usize, size: usize) -> Option<NodeRef> {
        self.blocks
            .arena()
            .iter(self.class_head(size))
            .find(|&node| self.block(node).0 == addr)
    }

    /// Finds a free block in the smallest nonempty size class of at least
    /// `size` bytes.
    fn best_fit(&self, size: usize) -> Option<NodeRef> {
        let arena = self.blocks.arena();
        Self::sizes_from(size).find_map(|s| arena.get(self.class_head(s)))
    }

    // Page records ===========================================================

    fn filled_pages(&self) -> Head {
        self.pages.head(FILLED_PAGES)
    }

    fn data_handle(&self, rec: NodeRef) -> PageHandle {
        PageHandle::new(self.pages.arena().field(rec, DATA_HANDLE))
    }

    fn data_page(&self, rec: NodeRef) -> PagePtr {
        let addr = NonZeroUsize::new(self.pages.arena().field(rec, DATA_ADDR) as usize)
            .expect("page record without a data page");

        // SAFETY: the data page of a live page record has not been released,
        // and its provenance was exposed when the record was filled in.
        unsafe { PagePtr::from_addr(addr, PAGE_SIZE) }
    }

    fn occupancy(&self, rec: NodeRef) -> Bitmap {
        let arena = self.pages.arena();

        Bitmap::new(
            arena.page_of(rec),
            arena.field_offset(rec, OCCUPANCY),
            Self::units(),
        )
    }

    /// Finds the record of the data page containing `addr`.
    fn page_containing(&self, addr: usize) -> Option<NodeRef> {
        self.pages
            .arena()
            .iter(self.filled_pages())
            .find(|&rec| self.data_page(rec).contains_addr(addr))
    }

    /// Obtains a new data page and files it as one free block.
    ///
    /// Both metadata records are acquired before the page is requested, so a
    /// failure leaves the allocator unchanged.
    fn new_data_page(&mut self) -> Result<NodeRef, AllocError> {
        let rec = self.pages.acquire(&mut self.source)?;

        let whole = match self.blocks.acquire(&mut self.source) {
            Ok(n) => n,
            Err(e) => {
                self.pages.release(&mut self.source, rec);
                return Err(e);
            }
        };

        let page = match self.source.get_page() {
            Some(p) => p,
            None => {
                self.blocks.release(&mut self.source, whole);
                self.pages.release(&mut self.source, rec);
                return Err(AllocError::OutOfPages);
            }
        };

        // SAFETY: the source guarantees the page is valid for `PAGE_SIZE`
        // bytes until it is released.
        let data = unsafe { PagePtr::new(page.ptr(), PAGE_SIZE) };
        let addr = data.addr().get();

        let arena = self.pages.arena();
        arena.set_field(rec, DATA_HANDLE, page.handle().get());
        arena.set_field(rec, DATA_ADDR, addr as u64);
        self.occupancy(rec).clear();
        arena.push(self.filled_pages(), rec);
        self.data_pages += 1;

        self.file(whole, addr, PAGE_SIZE);
        trace!("obtained data page {addr:#x}");

        Ok(whole)
    }

    /// Hands a data page with no allocated blocks back to the source.
    ///
    /// Every free block filed within the page is dropped from its size class
    /// first, so the page's range never appears in a free list afterward.
    fn reclaim_data_page(&mut self, rec: NodeRef) {
        let data = self.data_page(rec);
        let arena = self.blocks.arena();

        for size in Self::sizes_from(MIN_BLOCK) {
            let head = self.class_head(size);

            arena.unlink_where(
                head,
                |n| data.contains_addr(arena.field(n, BLOCK_ADDR) as usize),
                |n| self.blocks.release(&mut self.source, n),
            );
        }

        let handle = self.data_handle(rec);

        // SAFETY: the page came from the source, and no record refers to it
        // any more.
        unsafe { self.source.release_page(Page::new(handle, data.ptr())) };

        let removed = self.pages.arena().remove(self.filled_pages(), rec);
        assert!(removed, "page record missing from the filled list");
        self.pages.release(&mut self.source, rec);
        self.data_pages -= 1;

        debug!("reclaimed data page {:#x}", data.addr());
    }

    /// Reclaims the data page containing `addr` if nothing in it is
    /// allocated and it is not the last data page.
    ///
    /// A page obtained for an allocation that then failed is left in this
    /// state.
    fn release_if_idle(&mut self, addr: usize) {
        if self.data_pages <= 1 {
            return;
        }

        if let Some(rec) = self.page_containing(addr) {
            if self.occupancy(rec).is_clear() {
                self.reclaim_data_page(rec);
            }
        }
    }

    // Allocation =============================================================

    /// Attempts to allocate a block of at least `size` bytes.
    ///
    /// On success, returns a [`NonNull<[u8]>`] spanning the whole block, whose
    /// length is `size` rounded up to a power of two no smaller than
    /// `MIN_BLOCK`. The block starts at an offset within its page that is a
    /// multiple of its length.
    ///
    /// The contents of the block are uninitialized.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::InvalidSize`] if `size` is zero or larger than
    /// `PAGE_SIZE`, and [`AllocError::OutOfPages`] if the page source cannot
    /// supply a needed page. On failure, every block that was free remains
    /// free.
    ///
    /// [`NonNull<[u8]>`]: NonNull
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<[u8]>, AllocError> {
        if size == 0 || size > PAGE_SIZE {
            return Err(AllocError::InvalidSize(size));
        }

        let target = Self::block_size_for(size);

        let mut node = match self.best_fit(target) {
            Some(n) => n,
            None => self.new_data_page()?,
        };

        // Split the block repeatedly to obtain a suitably sized block. Both
        // halves are recorded before the parent is dropped, so the allocator
        // is consistent after every step.
        loop {
            let (addr, block_size) = self.block(node);
            if block_size == target {
                break;
            }

            let half = block_size / 2;
            let halves = self.blocks.acquire(&mut self.source).and_then(|low| {
                match self.blocks.acquire(&mut self.source) {
                    Ok(high) => Ok((low, high)),
                    Err(e) => {
                        self.blocks.release(&mut self.source, low);
                        Err(e)
                    }
                }
            });

            let (low, high) = match halves {
                Ok(h) => h,
                Err(e) => {
                    // Undo the splits made so far; merging needs no records.
                    let rec = self
                        .page_containing(addr)
                        .expect("free block outside of every data page");
                    let data = self.data_page(rec);
                    self.coalesce(node, data);
                    self.release_if_idle(addr);
                    return Err(e);
                }
            };

            self.file(high, addr + half, half);
            self.file(low, addr, half);
            self.unfile(node);

            node = low;
        }

        let (addr, _) = self.block(node);
        let rec = self
            .page_containing(addr)
            .expect("free block outside of every data page");
        let data = self.data_page(rec);
        let start = data.offset_to(addr);

        let units = start / MIN_BLOCK..(start + target) / MIN_BLOCK;
        let mut occupancy = self.occupancy(rec);
        assert!(
            occupancy.all(units.clone(), false),
            "free block overlaps an allocation"
        );
        occupancy.set_range(units, true);

        self.unfile(node);

        Ok(data.slice(start, target))
    }

    /// Deallocates the block referenced by `ptr`.
    ///
    /// If this leaves the block's page without allocations while another
    /// data page is live, the page is returned to the source. Otherwise the
    /// block is merged with its buddy for as long as the buddy is free.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a block of memory currently allocated via this
    /// allocator, and `size` must be the size that was passed to
    /// [`allocate`](Self::allocate) for it.
    ///
    /// # Panics
    ///
    /// Panics if `ptr` does not lie within a data page of this allocator, is
    /// not the start of a block of the rounded `size`, or if that block is not
    /// currently allocated.
    pub unsafe fn deallocate(&mut self, ptr: NonNull<u8>, size: usize) {
        assert!(
            size != 0 && size <= PAGE_SIZE,
            "invalid deallocation size: {size}"
        );

        let block_size = Self::block_size_for(size);
        let addr = NonNullStrict::addr(ptr).get();

        let rec = self
            .page_containing(addr)
            .expect("pointer not allocated by this allocator");
        let data = self.data_page(rec);
        let start = data.offset_to(addr);
        assert_eq!(
            start % block_size,
            0,
            "pointer is not the start of a {block_size}-byte block"
        );

        let units = start / MIN_BLOCK..(start + block_size) / MIN_BLOCK;
        let mut occupancy = self.occupancy(rec);
        assert!(
            occupancy.all(units.clone(), true),
            "double free or mismatched size at {addr:#x}"
        );
        occupancy.set_range(units.clone(), false);

        // Reclaiming the page takes precedence over merging inside it.
        if self.data_pages > 1 && occupancy.is_clear() {
            self.reclaim_data_page(rec);
            return;
        }

        // A free buddy's record can describe the merged block, so only a
        // block without one needs a fresh record.
        let node = match self.free_buddy(addr, block_size, data) {
            Some((buddy, buddy_addr)) => {
                self.refile(buddy, cmp::min(addr, buddy_addr), block_size * 2);
                buddy
            }
            None => match self.blocks.acquire(&mut self.source) {
                Ok(n) => {
                    self.file(n, addr, block_size);
                    n
                }
                Err(_) => {
                    warn!("no metadata left to record freed block {addr:#x}; it stays allocated");
                    occupancy.set_range(units, true);
                    return;
                }
            },
        };

        self.coalesce(node, data);
    }

    /// Merges the free block described by `node` with its buddy, repeatedly,
    /// until the buddy is not free or the block spans the whole page.
    fn coalesce(&mut self, node: NodeRef, data: PagePtr) {
        loop {
            let (addr, size) = self.block(node);

            let Some((buddy, buddy_addr)) = self.free_buddy(addr, size, data) else {
                break;
            };

            // The merged block takes over this block's record.
            self.unfile(buddy);
            self.refile(node, cmp::min(addr, buddy_addr), size * 2);
        }
    }

    /// Finds the free buddy of the `size`-byte block at `addr` in `data`,
    /// returning its record and address.
    fn free_buddy(&self, addr: usize, size: usize, data: PagePtr) -> Option<(NodeRef, usize)> {
        if size == PAGE_SIZE {
            return None;
        }

        let offset = data.offset_to(addr);
        let buddy_addr = addr - offset + (offset ^ size);

        self.find_block(buddy_addr, size).map(|buddy| (buddy, buddy_addr))
    }

    /// Moves a filed free-block record to describe a different block.
    fn refile(&mut self, node: NodeRef, addr: usize, size: usize) {
        let (_, old_size) = self.block(node);
        let removed = self.blocks.arena().remove(self.class_head(old_size), node);
        assert!(removed, "free block missing from its size class");

        self.file(node, addr, size);
    }

    // Introspection ==========================================================

    /// Returns the number of free blocks of exactly `size` bytes.
    ///
    /// Returns zero if `size` is not one of the allocator's block sizes.
    pub fn free_blocks(&self, size: usize) -> usize {
        if !size.is_power_of_two() || !(MIN_BLOCK..=PAGE_SIZE).contains(&size) {
            return 0;
        }

        self.blocks.arena().iter(self.class_head(size)).count()
    }

    /// Returns `true` if `ptr` lies within one of the allocator's data pages.
    pub fn owns(&self, ptr: NonNull<u8>) -> bool {
        self.page_containing(NonNullStrict::addr(ptr).get())
            .is_some()
    }

    /// Returns a snapshot of the pages held by the allocator.
    pub fn stats(&self) -> Stats {
        let free_bytes = Self::sizes_from(MIN_BLOCK)
            .map(|size| size * self.free_blocks(size))
            .sum();
        let allocated_units: usize = self
            .pages
            .arena()
            .iter(self.filled_pages())
            .map(|rec| self.occupancy(rec).count_ones())
            .sum();

        Stats {
            data_pages: self.data_pages,
            metadata_pages: self.pages.metadata_pages() + self.blocks.metadata_pages(),
            free_bytes,
            allocated_bytes: allocated_units * MIN_BLOCK,
        }
    }

    /// Returns every page, data and metadata, to the source.
    ///
    /// # Safety
    ///
    /// The allocator must not be used after this call.
    unsafe fn release_pages(&mut self) {
        let arena = self.pages.arena();

        for rec in arena.iter(self.filled_pages()) {
            let page = Page::new(self.data_handle(rec), self.data_page(rec).ptr());

            // SAFETY: the page came from the source and is not used again.
            unsafe { self.source.release_page(page) };
        }

        self.data_pages = 0;

        // SAFETY: every record is either free or filed in a list headed in
        // its pool's root page.
        unsafe {
            self.blocks.release_all(&mut self.source);
            self.pages.release_all(&mut self.source);
        }
    }
}

impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource> Drop
    for PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>
{
    fn drop(&mut self) {
        // SAFETY: the allocator is not used after drop.
        unsafe { self.release_pages() };
    }
}

impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource> fmt::Debug
    for PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedBuddy")
            .field("page_size", &PAGE_SIZE)
            .field("min_block", &MIN_BLOCK)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize, S: PageSource>
    PagedBuddy<PAGE_SIZE, MIN_BLOCK, S>
{
    /// Checks that every unit of every data page is either allocated or
    /// covered by exactly one free block, and that an idle data page is only
    /// kept when it is the last one.
    pub(crate) fn assert_consistent(&self) {
        use alloc::{vec, vec::Vec};

        let recs: Vec<NodeRef> = self.pages.arena().iter(self.filled_pages()).collect();
        assert_eq!(recs.len(), self.data_pages, "data page count out of sync");

        let mut coverage: Vec<Vec<u8>> = recs.iter().map(|_| vec![0; Self::units()]).collect();

        for size in Self::sizes_from(MIN_BLOCK) {
            for node in self.blocks.arena().iter(self.class_head(size)) {
                let (addr, block_size) = self.block(node);
                assert_eq!(block_size, size, "block filed under the wrong size class");

                let i = recs
                    .iter()
                    .position(|&r| self.data_page(r).contains_addr(addr))
                    .expect("free block outside of every data page");
                let start = self.data_page(recs[i]).offset_to(addr);
                assert_eq!(start % size, 0, "misaligned free block");

                for unit in start / MIN_BLOCK..(start + size) / MIN_BLOCK {
                    coverage[i][unit] += 1;
                }
            }
        }

        for (i, &rec) in recs.iter().enumerate() {
            let occupancy = self.occupancy(rec);

            for (unit, covered) in coverage[i].iter().enumerate() {
                let total = covered + u8::from(occupancy.get(unit));
                assert_eq!(total, 1, "unit {unit} of data page {i} is covered {total} times");
            }

            if self.data_pages > 1 {
                assert!(!occupancy.is_clear(), "idle data page kept alongside others");
            }
        }
    }

    /// Checks that no two free buddies have been left unmerged.
    pub(crate) fn assert_fully_coalesced(&self) {
        for size in Self::sizes_from(MIN_BLOCK).take_while(|&s| s < PAGE_SIZE) {
            for node in self.blocks.arena().iter(self.class_head(size)) {
                let (addr, _) = self.block(node);
                let rec = self
                    .page_containing(addr)
                    .expect("free block outside of every data page");
                let start = self.data_page(rec).offset_to(addr);
                let buddy = addr - start + (start ^ size);

                assert!(
                    self.find_block(buddy, size).is_none(),
                    "free buddies {addr:#x} and {buddy:#x} left unmerged"
                );
            }
        }
    }
}
