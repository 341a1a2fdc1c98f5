//! # scfg Testkit
//!
//! Testing utilities for scfg.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: [`CountingAllocator`] and [`FailingAllocator`] to observe
//!   and disturb buffer heap traffic
//! - **Generators**: Proptest strategies for wide text, payloads and resize
//!   sequences around the inline threshold
//! - **Golden vectors**: Published digests for every supported algorithm
//!
//! ## Allocator Symmetry
//!
//! ```rust
//! use scfg_core::ByteBuffer;
//! use scfg_testkit::CountingAllocator;
//!
//! let alloc = CountingAllocator::new();
//! let mut buf = ByteBuffer::new_in(&alloc);
//! buf.resize(64).unwrap();
//! buf.release();
//! assert_eq!(alloc.deallocations(), 1);
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use scfg_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, hex);
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{CountingAllocator, FailingAllocator};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
