use core::{
    mem,
    num::NonZeroUsize,
    ptr::{self, NonNull},
};

use crate::polyfill::NonNullStrict;

/// The size in bytes of one metadata word.
pub const WORD: usize = mem::size_of::<u64>();

/// A pointer to the base of a page, together with the page's extent.
///
/// All accesses through a `PagePtr` are bounds-checked against the extent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PagePtr {
    ptr: NonNull<u8>,
    extent: usize,
}

impl PagePtr {
    /// Creates a `PagePtr` from `ptr`.
    ///
    /// The returned value assumes the provenance of `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes for `extent` bytes for as long
    /// as the returned value, or any copy of it, is used.
    #[inline]
    pub unsafe fn new(ptr: NonNull<u8>, extent: usize) -> PagePtr {
        NonNullStrict::addr(ptr)
            .get()
            .checked_add(extent)
            .expect("page limit overflows usize");

        PagePtr { ptr, extent }
    }

    /// Recovers a `PagePtr` from an address previously returned by
    /// [`PagePtr::addr`].
    ///
    /// # Safety
    ///
    /// `addr` must be the exposed address of a page which is still valid for
    /// reads and writes for `extent` bytes.
    #[inline]
    pub unsafe fn from_addr(addr: NonZeroUsize, extent: usize) -> PagePtr {
        unsafe { PagePtr::new(NonNull::from_exposed_addr(addr), extent) }
    }

    /// Returns the base pointer as a `NonNull<u8>`.
    #[inline]
    pub fn ptr(self) -> NonNull<u8> {
        self.ptr
    }

    /// Returns the address of the page, exposing its provenance.
    #[inline]
    pub fn addr(self) -> NonZeroUsize {
        self.ptr.expose_addr()
    }

    #[inline]
    pub fn limit(self) -> usize {
        NonNullStrict::addr(self.ptr).get() + self.extent
    }

    #[inline]
    pub fn contains_addr(self, addr: usize) -> bool {
        NonNullStrict::addr(self.ptr).get() <= addr && addr < self.limit()
    }

    /// Calculates the offset from the base of the page to `addr`.
    #[inline]
    pub fn offset_to(self, addr: usize) -> usize {
        assert!(self.contains_addr(addr), "address outside of page");

        addr - NonNullStrict::addr(self.ptr).get()
    }

    #[inline]
    fn check(self, offset: usize, len: usize) {
        let in_bounds = offset.checked_add(len).map_or(false, |end| end <= self.extent);
        assert!(
            in_bounds,
            "page access out of bounds: offset {offset} len {len} extent {}",
            self.extent
        );
    }

    /// Reads the word at `offset` bytes from the base.
    #[inline]
    pub fn read_word(self, offset: usize) -> u64 {
        self.check(offset, WORD);

        // SAFETY: the access is in bounds of a page valid for reads.
        unsafe { self.ptr.as_ptr().add(offset).cast::<u64>().read_unaligned() }
    }

    /// Writes `value` to the word at `offset` bytes from the base.
    #[inline]
    pub fn write_word(self, offset: usize, value: u64) {
        self.check(offset, WORD);

        // SAFETY: the access is in bounds of a page valid for writes.
        unsafe {
            self.ptr
                .as_ptr()
                .add(offset)
                .cast::<u64>()
                .write_unaligned(value)
        };
    }

    /// Zeroes `len` bytes starting `offset` bytes from the base.
    #[inline]
    pub fn zero(self, offset: usize, len: usize) {
        self.check(offset, len);

        // SAFETY: the range is in bounds of a page valid for writes.
        unsafe { ptr::write_bytes(self.ptr.as_ptr().add(offset), 0, len) };
    }

    /// Creates a slice pointer to `len` bytes starting `offset` bytes from the
    /// base.
    ///
    /// The returned pointer has the provenance of this pointer.
    #[inline]
    pub fn slice(self, offset: usize, len: usize) -> NonNull<[u8]> {
        self.check(offset, len);

        // SAFETY: the range is in bounds, so the pointer is non-null.
        unsafe {
            let start = self.ptr.as_ptr().add(offset);
            NonNull::new_unchecked(ptr::slice_from_raw_parts_mut(start, len))
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::prelude::rust_2021::*;

    use super::*;

    fn page_of(buf: &mut Vec<u64>) -> PagePtr {
        let ptr = NonNull::new(buf.as_mut_ptr().cast::<u8>()).unwrap();
        unsafe { PagePtr::new(ptr, buf.len() * WORD) }
    }

    #[test]
    fn words_round_trip_at_any_offset() {
        let mut buf = std::vec![0_u64; 8];
        let page = page_of(&mut buf);

        page.write_word(0, 0xdead_beef);
        page.write_word(13, u64::MAX);

        assert_eq!(page.read_word(0), 0xdead_beef);
        assert_eq!(page.read_word(13), u64::MAX);

        page.zero(8, 32);
        assert_eq!(page.read_word(13), 0);
        assert_eq!(page.read_word(0), 0xdead_beef);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn read_past_end_panics() {
        let mut buf = std::vec![0_u64; 2];
        let page = page_of(&mut buf);

        page.read_word(9);
    }

    #[test]
    fn from_addr_recovers_page() {
        let mut buf = std::vec![0_u64; 4];
        let page = page_of(&mut buf);

        let again = unsafe { PagePtr::from_addr(page.addr(), 4 * WORD) };
        again.write_word(WORD, 42);

        assert_eq!(page.read_word(WORD), 42);
        assert_eq!(again.offset_to(page.limit() - 1), 4 * WORD - 1);
        assert!(!again.contains_addr(page.limit()));
    }
}
