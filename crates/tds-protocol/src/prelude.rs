//! Internal prelude for no_std compatibility.
//!
//! Re-exports the allocation types used throughout the crate, sourcing them
//! from either `std` or `alloc` depending on feature flags.

#[cfg(feature = "std")]
pub use std::{
    string::{String, ToString},
    vec::Vec,
};

#[cfg(all(feature = "alloc", not(feature = "std")))]
pub use alloc::{
    string::{String, ToString},
    vec::Vec,
};
