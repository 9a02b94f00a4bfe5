#![deny(unsafe_op_in_unsafe_fn)]

use std::ptr::NonNull;

use alloc_hater::Subject;
use paged_buddy::{AllocInitError, GlobalPages, PagedBuddy};

pub struct BuddySubject<const PAGE_SIZE: usize, const MIN_BLOCK: usize>(
    PagedBuddy<PAGE_SIZE, MIN_BLOCK, GlobalPages>,
);

impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize> BuddySubject<PAGE_SIZE, MIN_BLOCK> {
    pub fn new() -> Result<Self, AllocInitError> {
        let b = PagedBuddy::try_new(GlobalPages::new(PAGE_SIZE))?;
        Ok(BuddySubject(b))
    }

    /// Creates a subject whose page source never has more than `limit` pages
    /// outstanding.
    pub fn new_with_page_limit(limit: usize) -> Result<Self, AllocInitError> {
        let b = PagedBuddy::try_new(GlobalPages::with_limit(PAGE_SIZE, limit))?;
        Ok(BuddySubject(b))
    }

    pub fn allocator(&self) -> &PagedBuddy<PAGE_SIZE, MIN_BLOCK, GlobalPages> {
        &self.0
    }
}

impl<const PAGE_SIZE: usize, const MIN_BLOCK: usize> Subject for BuddySubject<PAGE_SIZE, MIN_BLOCK> {
    type Op = ();
    type AllocError = paged_buddy::AllocError;

    fn allocate(&mut self, size: usize) -> Result<NonNull<[u8]>, Self::AllocError> {
        self.0.allocate(size)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, size: usize) {
        unsafe { self.0.deallocate(ptr, size) };
    }

    fn handle_custom_op(&mut self, (): ()) {}
}
