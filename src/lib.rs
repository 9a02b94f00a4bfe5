//! A buddy allocator built on top of a fixed-size page source.
//!
//! [`PagedBuddy`] implements the classic `malloc`/`free` pair on top of a
//! [`PageSource`], a primitive that can only hand out and reclaim whole pages
//! of one fixed size. Pages are split into power-of-two blocks on allocation
//! and merged back with their buddies on free. A page whose contents are
//! entirely free is handed back to the source, as long as another data page
//! remains.
//!
//! The allocator's bookkeeping lives in pages obtained from the same source,
//! so it never needs a heap of its own.
//!
//! ```
//! use paged_buddy::{DefaultBuddy, GlobalPages};
//!
//! let mut buddy = DefaultBuddy::try_new(GlobalPages::new(8192)).unwrap();
//!
//! let block = buddy.allocate(100).unwrap();
//! assert_eq!(block.len(), 128);
//!
//! unsafe { buddy.deallocate(block.cast(), 100) };
//! ```

#![doc(html_root_url = "https://docs.rs/paged_buddy/0.1.0")]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docs_rs, feature(doc_cfg))]
// This is necessary to allow `sptr` and `polyfill` to shadow methods which
// have since been stabilized on pointers.
#![allow(unstable_name_collisions)]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

mod base;
mod bitmap;
pub mod buddy;
mod node;
pub mod page;
mod polyfill;

#[cfg(test)]
mod tests;

use core::fmt;

pub use crate::{
    buddy::{DefaultBuddy, PagedBuddy, Stats},
    page::{Page, PageHandle, PageSource},
};

#[cfg(any(feature = "alloc", test))]
pub use crate::page::GlobalPages;

/// The error type for allocator constructors.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AllocInitError {
    /// A necessary allocation failed.
    ///
    /// This variant is returned when the page source cannot supply the pages
    /// which hold the allocator's root metadata.
    AllocFailed,

    /// The configuration of the allocator is invalid.
    ///
    /// This variant is returned when an allocator's configuration
    /// parameters are impossible to satisfy.
    InvalidConfig,
}

impl fmt::Display for AllocInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocInitError::AllocFailed => f.write_str("page source could not supply root metadata"),
            AllocInitError::InvalidConfig => f.write_str("invalid allocator configuration"),
        }
    }
}

/// Indicates an allocation failure due to resource exhaustion or an
/// unsupported request size.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AllocError {
    /// The requested size was zero or larger than one page.
    InvalidSize(usize),

    /// The page source could not supply a page.
    OutOfPages,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::InvalidSize(size) => write!(f, "invalid allocation size: {size}"),
            AllocError::OutOfPages => f.write_str("page source exhausted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

#[cfg(feature = "std")]
impl std::error::Error for AllocInitError {}
