//! Polyfills for pointer provenance APIs.
//!
//! Metadata records store page addresses rather than pointers. A page's
//! provenance is exposed when its address is first recorded, and recovered
//! from that address when the page is accessed again.

use core::{num::NonZeroUsize, ptr::NonNull};

use sptr::Strict;

pub trait NonNullStrict<T> {
    fn addr(self) -> NonZeroUsize
    where
        T: Sized;

    fn expose_addr(self) -> NonZeroUsize
    where
        T: Sized;

    fn from_exposed_addr(addr: NonZeroUsize) -> Self
    where
        T: Sized;
}

impl<T> NonNullStrict<T> for NonNull<T> {
    fn addr(self) -> NonZeroUsize
    where
        T: Sized,
    {
        // SAFETY: The pointer is guaranteed by the type to be non-null,
        // meaning that the address will be non-zero.
        unsafe { NonZeroUsize::new_unchecked(Strict::addr(self.as_ptr())) }
    }

    fn expose_addr(self) -> NonZeroUsize
    where
        T: Sized,
    {
        // SAFETY: The pointer is guaranteed by the type to be non-null,
        // meaning that the address will be non-zero.
        unsafe { NonZeroUsize::new_unchecked(Strict::expose_addr(self.as_ptr())) }
    }

    fn from_exposed_addr(addr: NonZeroUsize) -> Self
    where
        T: Sized,
    {
        // SAFETY: `addr` is non-zero, so the resulting pointer is non-null.
        unsafe { NonNull::new_unchecked(sptr::from_exposed_addr_mut::<T>(addr.get())) }
    }
}
