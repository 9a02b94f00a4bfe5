//! Metadata records hosted in pages obtained from the page source.
//!
//! A metadata page is an array of fixed-size record slots followed by a
//! trailer:
//!
//! ```text
//! +--------+--------+--------+-----+--------+-------------+
//! | header | slot 0 | slot 1 | ... | unused | handle|live |
//! +--------+--------+--------+-----+--------+-------------+
//! ```
//!
//! Only the pinned root page of each pool has a header; it holds the heads of
//! the lists threaded through the pool's records. Every record starts with a
//! link to the next record in its list and the address of the page that holds
//! it. Links are stored as (page address, byte offset) pairs rather than as
//! pointers, so a page can be handed back to the source without leaving
//! dangling pointers behind; each page address is resolved through the
//! provenance it exposed when first recorded.

use core::num::NonZeroUsize;

use log::trace;

use crate::{
    base::{PagePtr, WORD},
    page::{Page, PageHandle, PageSource},
    AllocError,
};

/// The number of words in a link to a record.
pub const LINK_WORDS: usize = 2;

/// Word index of the link to the next record in a list.
const NEXT: usize = 0;
/// Word index of the address of the page holding a record.
const OWNER: usize = NEXT + LINK_WORDS;
/// Word index of the first word available to the record's kind.
pub const PAYLOAD: usize = OWNER + 1;

/// The number of words reserved at the end of every metadata page.
const TRAILER_WORDS: usize = 2;

/// A reference to a record slot in a metadata page.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NodeRef {
    page: NonZeroUsize,
    offset: usize,
}

impl NodeRef {
    /// Returns the address of the metadata page holding this slot.
    #[inline]
    pub fn page_addr(self) -> NonZeroUsize {
        self.page
    }
}

/// The location of a list head inside a metadata page.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Head {
    page: PagePtr,
    offset: usize,
}

/// Accessors for records in metadata pages of one size.
///
/// Every `NodeRef` passed to an `Arena` must refer to a slot in a metadata
/// page which has not been released to the page source.
#[derive(Copy, Clone, Debug)]
pub struct Arena {
    page_size: usize,
}

impl Arena {
    pub fn new(page_size: usize) -> Arena {
        Arena { page_size }
    }

    #[inline]
    pub fn page_size(self) -> usize {
        self.page_size
    }

    /// Resolves the page holding `node`.
    #[inline]
    pub fn page_of(self, node: NodeRef) -> PagePtr {
        // SAFETY: node pages stay valid until the pool releases them, and the
        // pool unlinks every slot of a page before releasing it.
        unsafe { PagePtr::from_addr(node.page, self.page_size) }
    }

    #[inline]
    pub fn field(self, node: NodeRef, word: usize) -> u64 {
        self.page_of(node).read_word(node.offset + word * WORD)
    }

    #[inline]
    pub fn set_field(self, node: NodeRef, word: usize, value: u64) {
        self.page_of(node)
            .write_word(node.offset + word * WORD, value);
    }

    /// Returns the byte offset of word `word` of `node` within its page.
    #[inline]
    pub fn field_offset(self, node: NodeRef, word: usize) -> usize {
        node.offset + word * WORD
    }

    fn read_link(page: PagePtr, offset: usize) -> Option<NodeRef> {
        let addr = NonZeroUsize::new(page.read_word(offset) as usize)?;
        let node_offset = page.read_word(offset + WORD) as usize;

        Some(NodeRef {
            page: addr,
            offset: node_offset,
        })
    }

    fn write_link(page: PagePtr, offset: usize, link: Option<NodeRef>) {
        let (addr, node_offset) = link.map_or((0, 0), |n| (n.page.get(), n.offset));

        page.write_word(offset, addr as u64);
        page.write_word(offset + WORD, node_offset as u64);
    }

    #[inline]
    pub fn next(self, node: NodeRef) -> Option<NodeRef> {
        Self::read_link(self.page_of(node), node.offset + NEXT * WORD)
    }

    #[inline]
    pub fn set_next(self, node: NodeRef, next: Option<NodeRef>) {
        Self::write_link(self.page_of(node), node.offset + NEXT * WORD, next);
    }

    /// Returns the address of the metadata page which owns `node`.
    #[inline]
    pub fn owner(self, node: NodeRef) -> usize {
        self.field(node, OWNER) as usize
    }

    #[inline]
    pub fn get(self, head: Head) -> Option<NodeRef> {
        Self::read_link(head.page, head.offset)
    }

    #[inline]
    pub fn set(self, head: Head, node: Option<NodeRef>) {
        Self::write_link(head.page, head.offset, node);
    }

    /// Pushes `node` onto the front of the list at `head`.
    pub fn push(self, head: Head, node: NodeRef) {
        self.set_next(node, self.get(head));
        self.set(head, Some(node));
    }

    /// Unlinks `node` from the list at `head`.
    ///
    /// Returns `false` if `node` is not in the list.
    pub fn remove(self, head: Head, node: NodeRef) -> bool {
        self.unlink_where(head, |n| n == node, |_| {}) != 0
    }

    /// Unlinks every node for which `pred` returns `true`, passing each one to
    /// `on_removed` once it is out of the list.
    ///
    /// Returns the number of nodes removed.
    pub fn unlink_where<P, R>(self, head: Head, mut pred: P, mut on_removed: R) -> usize
    where
        P: FnMut(NodeRef) -> bool,
        R: FnMut(NodeRef),
    {
        let mut removed = 0;
        let mut prev: Option<NodeRef> = None;
        let mut cur = self.get(head);

        while let Some(node) = cur {
            // Read the link before `on_removed` gets a chance to reuse it.
            let next = self.next(node);

            if pred(node) {
                match prev {
                    Some(p) => self.set_next(p, next),
                    None => self.set(head, next),
                }

                on_removed(node);
                removed += 1;
            } else {
                prev = Some(node);
            }

            cur = next;
        }

        removed
    }

    /// Returns an iterator over the list at `head`.
    pub fn iter(self, head: Head) -> Iter {
        Iter {
            arena: self,
            cur: self.get(head),
        }
    }
}

/// An iterator over the nodes of a list.
#[derive(Debug)]
pub struct Iter {
    arena: Arena,
    cur: Option<NodeRef>,
}

impl Iterator for Iter {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let node = self.cur?;
        self.cur = self.arena.next(node);
        Some(node)
    }
}

/// A self-hosted pool of fixed-size records.
///
/// The pool's root page is obtained at construction and pinned: it is never
/// released while the pool exists, because it holds the heads of the pool's
/// lists. Head 0 is always the list of empty slots; the remaining heads belong
/// to the pool's user.
#[derive(Debug)]
pub struct NodePool {
    arena: Arena,
    root: PagePtr,
    header_words: usize,
    record_words: usize,
    metadata_pages: usize,
}

impl NodePool {
    /// Returns the number of record slots that fit in a page after
    /// `header_words` of header.
    pub const fn slots_per_page(page_size: usize, header_words: usize, record_words: usize) -> usize {
        let usable = (page_size / WORD).saturating_sub(header_words + TRAILER_WORDS);
        usable / record_words
    }

    /// Builds a pool whose root metadata lives in `root`.
    ///
    /// All `header_words / LINK_WORDS` list heads start out empty.
    ///
    /// # Safety
    ///
    /// `root` must have been obtained from the page source later passed to
    /// this pool's methods, and must be valid for reads and writes for
    /// `arena.page_size()` bytes. The root page must hold at least one slot.
    pub unsafe fn new(
        arena: Arena,
        root: Page,
        header_words: usize,
        record_words: usize,
    ) -> NodePool {
        assert!(record_words > PAYLOAD);
        assert_eq!(header_words % LINK_WORDS, 0);
        assert!(header_words >= LINK_WORDS);
        assert!(Self::slots_per_page(arena.page_size(), header_words, record_words) > 0);

        let handle = root.handle();
        let root = unsafe { PagePtr::new(root.ptr(), arena.page_size()) };
        root.zero(0, header_words * WORD);

        let pool = NodePool {
            arena,
            root,
            header_words,
            record_words,
            metadata_pages: 1,
        };

        pool.partition(root, handle, header_words * WORD);
        trace!("pinned metadata page {:#x}", root.addr());

        pool
    }

    #[inline]
    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Returns the location of the `index`th list head in the root page.
    #[inline]
    pub fn head(&self, index: usize) -> Head {
        assert!(index < self.header_words / LINK_WORDS);

        Head {
            page: self.root,
            offset: index * LINK_WORDS * WORD,
        }
    }

    #[inline]
    fn empty_head(&self) -> Head {
        self.head(0)
    }

    /// Returns the number of metadata pages held by this pool, including the
    /// root.
    #[inline]
    pub fn metadata_pages(&self) -> usize {
        self.metadata_pages
    }

    fn trailer_offset(&self) -> usize {
        self.arena.page_size() - TRAILER_WORDS * WORD
    }

    fn live(&self, page: PagePtr) -> u64 {
        page.read_word(self.trailer_offset() + WORD)
    }

    fn set_live(&self, page: PagePtr, live: u64) {
        page.write_word(self.trailer_offset() + WORD, live);
    }

    fn handle(&self, page: PagePtr) -> PageHandle {
        PageHandle::new(page.read_word(self.trailer_offset()))
    }

    /// Carves `page` into slots starting `start` bytes from its base, tags
    /// each slot with its owner and pushes them onto the empty list.
    fn partition(&self, page: PagePtr, handle: PageHandle, start: usize) {
        page.write_word(self.trailer_offset(), handle.get());
        self.set_live(page, 0);

        let record_size = self.record_words * WORD;
        let count = (self.trailer_offset() - start) / record_size;
        let owner = page.addr();

        // Push in reverse so the lowest slot ends up at the head.
        for i in (0..count).rev() {
            let node = NodeRef {
                page: owner,
                offset: start + i * record_size,
            };

            self.arena.set_field(node, OWNER, owner.get() as u64);
            self.arena.push(self.empty_head(), node);
        }
    }

    fn grow<S: PageSource>(&mut self, source: &mut S) -> Result<(), AllocError> {
        let page = source.get_page().ok_or(AllocError::OutOfPages)?;
        let handle = page.handle();

        // SAFETY: the source guarantees the page is valid for `page_size`
        // bytes until it is released.
        let page = unsafe { PagePtr::new(page.ptr(), self.arena.page_size()) };

        self.partition(page, handle, 0);
        self.metadata_pages += 1;
        trace!("grew node pool with metadata page {:#x}", page.addr());

        Ok(())
    }

    /// Takes a slot from the empty list, obtaining a new metadata page if
    /// there are none.
    ///
    /// The contents of the slot past its link and owner are unspecified.
    pub fn acquire<S: PageSource>(&mut self, source: &mut S) -> Result<NodeRef, AllocError> {
        if self.arena.get(self.empty_head()).is_none() {
            self.grow(source)?;
        }

        let node = self
            .arena
            .get(self.empty_head())
            .ok_or(AllocError::OutOfPages)?;
        self.arena.set(self.empty_head(), self.arena.next(node));
        self.arena.set_next(node, None);

        let page = self.arena.page_of(node);
        self.set_live(page, self.live(page) + 1);

        Ok(node)
    }

    /// Returns a slot to the empty list.
    ///
    /// If this leaves its metadata page without live slots, and the page is
    /// not the root, the page is released to `source`.
    ///
    /// `node` must have been acquired from this pool and must not be in any
    /// list.
    pub fn release<S: PageSource>(&mut self, source: &mut S, node: NodeRef) {
        self.arena.push(self.empty_head(), node);

        let page = self.arena.page_of(node);
        let live = self
            .live(page)
            .checked_sub(1)
            .expect("released a slot from a page with no live slots");
        self.set_live(page, live);

        if live == 0 && page != self.root {
            self.release_page(source, page);
        }
    }

    /// Unlinks every slot of `page` from the empty list and hands the page back
    /// to `source`.
    fn release_page<S: PageSource>(&mut self, source: &mut S, page: PagePtr) {
        let owner = page.addr().get();
        let arena = self.arena;
        arena.unlink_where(self.empty_head(), |n| arena.owner(n) == owner, |_| {});

        let handle = self.handle(page);
        self.metadata_pages -= 1;
        trace!("released metadata page {:#x}", owner);

        // SAFETY: none of the page's slots are reachable any more.
        unsafe { source.release_page(Page::new(handle, page.ptr())) };
    }

    /// Releases every metadata page, including the root, to `source`.
    ///
    /// Every slot must be in one of the lists headed in the root page.
    ///
    /// # Safety
    ///
    /// The pool must not be used after this call.
    pub unsafe fn release_all<S: PageSource>(&mut self, source: &mut S) {
        let arena = self.arena;
        let root = self.root.addr();
        let num_heads = self.header_words / LINK_WORDS;

        loop {
            let victim = (0..num_heads).find_map(|h| {
                arena
                    .iter(self.head(h))
                    .map(NodeRef::page_addr)
                    .find(|&page| page != root)
            });

            let Some(victim) = victim else {
                break;
            };

            for h in 0..num_heads {
                arena.unlink_where(self.head(h), |n| n.page == victim, |_| {});
            }

            // SAFETY: every slot of `victim` was just unlinked.
            let page = unsafe { PagePtr::from_addr(victim, arena.page_size()) };
            let handle = self.handle(page);
            self.metadata_pages -= 1;

            unsafe { source.release_page(Page::new(handle, page.ptr())) };
        }

        let handle = self.handle(self.root);
        self.metadata_pages -= 1;

        unsafe { source.release_page(Page::new(handle, self.root.ptr())) };
    }
}
