//! The boundary between the allocator and the source of its pages.
//!
//! A [`PageSource`] hands out pages of exactly [`PageSource::page_size()`]
//! bytes and takes them back. The allocator never asks for anything else:
//! both caller data and the allocator's own metadata live in these pages.

use core::{fmt, ptr::NonNull};

#[cfg(any(feature = "alloc", test))]
use core::alloc::Layout;

/// An opaque identifier chosen by a [`PageSource`] for one of its pages.
///
/// The allocator stores handles alongside its metadata and passes them back
/// unchanged when the page is released.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PageHandle(u64);

impl PageHandle {
    /// Creates a handle from a raw identifier.
    #[inline]
    pub const fn new(raw: u64) -> PageHandle {
        PageHandle(raw)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A page of memory obtained from a [`PageSource`].
pub struct Page {
    handle: PageHandle,
    ptr: NonNull<u8>,
}

impl Page {
    /// Creates a new `Page` from its handle and a pointer to its storage.
    #[inline]
    pub fn new(handle: PageHandle, ptr: NonNull<u8>) -> Page {
        Page { handle, ptr }
    }

    /// Returns the handle which identifies this page to its source.
    #[inline]
    pub fn handle(&self) -> PageHandle {
        self.handle
    }

    /// Returns a pointer to the start of the page.
    #[inline]
    pub fn ptr(&self) -> NonNull<u8> {
        self.ptr
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("handle", &self.handle.get())
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// Types which supply the pages managed by an allocator.
///
/// # Safety
///
/// Every page returned by [`get_page`](PageSource::get_page) must be valid
/// for reads and writes for [`page_size()`](PageSource::page_size) bytes, and
/// must not overlap any other page handed out and not yet released. The
/// allocator relies on this to write its metadata into the pages.
pub unsafe trait PageSource {
    /// Returns the size in bytes of every page this source hands out.
    ///
    /// This must not change over the lifetime of the source.
    fn page_size(&self) -> usize;

    /// Obtains a new page, or `None` if no page can be supplied.
    ///
    /// The returned page must be valid for reads and writes for
    /// `self.page_size()` bytes until it is passed to
    /// [`release_page`](PageSource::release_page). Its contents are
    /// unspecified.
    fn get_page(&mut self) -> Option<Page>;

    /// Returns a page to this source.
    ///
    /// # Safety
    ///
    /// `page` must have been obtained from this source via
    /// [`get_page`](PageSource::get_page) and not released since. The caller
    /// must not access the page after this call.
    unsafe fn release_page(&mut self, page: Page);
}

// SAFETY: forwards to `S`.
unsafe impl<S: PageSource + ?Sized> PageSource for &mut S {
    #[inline]
    fn page_size(&self) -> usize {
        (**self).page_size()
    }

    #[inline]
    fn get_page(&mut self) -> Option<Page> {
        (**self).get_page()
    }

    #[inline]
    unsafe fn release_page(&mut self, page: Page) {
        unsafe { (**self).release_page(page) }
    }
}

/// A [`PageSource`] backed by the global allocator.
///
/// Pages are aligned to their own size, so every block carved out of them is
/// naturally aligned to its size.
#[cfg(any(feature = "alloc", test))]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
#[derive(Debug)]
pub struct GlobalPages {
    layout: Layout,
    next_handle: u64,
    outstanding: usize,
    limit: Option<usize>,
}

#[cfg(any(feature = "alloc", test))]
impl GlobalPages {
    /// Creates a page source which hands out pages of `page_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero or not a power of two.
    pub fn new(page_size: usize) -> GlobalPages {
        assert!(
            page_size.is_power_of_two(),
            "page size must be a nonzero power of two"
        );

        GlobalPages {
            layout: Layout::from_size_align(page_size, page_size)
                .expect("page layout overflows isize"),
            next_handle: 1,
            outstanding: 0,
            limit: None,
        }
    }

    /// Creates a page source which never has more than `limit` pages
    /// outstanding at once.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero or not a power of two.
    pub fn with_limit(page_size: usize, limit: usize) -> GlobalPages {
        GlobalPages {
            limit: Some(limit),
            ..GlobalPages::new(page_size)
        }
    }

    /// Returns the number of pages handed out and not yet released.
    #[inline]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

// SAFETY: pages are distinct allocations of `layout` from the global
// allocator, held until they are released.
#[cfg(any(feature = "alloc", test))]
unsafe impl PageSource for GlobalPages {
    #[inline]
    fn page_size(&self) -> usize {
        self.layout.size()
    }

    fn get_page(&mut self) -> Option<Page> {
        if self.limit.map_or(false, |limit| self.outstanding >= limit) {
            return None;
        }

        // SAFETY: page size is nonzero.
        let ptr = NonNull::new(unsafe { alloc::alloc::alloc(self.layout) })?;

        let handle = PageHandle::new(self.next_handle);
        self.next_handle += 1;
        self.outstanding += 1;

        Some(Page::new(handle, ptr))
    }

    unsafe fn release_page(&mut self, page: Page) {
        self.outstanding = self
            .outstanding
            .checked_sub(1)
            .expect("released more pages than were handed out");

        unsafe { alloc::alloc::dealloc(page.ptr.as_ptr(), self.layout) };
    }
}
