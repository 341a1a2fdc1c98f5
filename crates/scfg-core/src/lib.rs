//! # scfg Core
//!
//! The storage and text primitives every other scfg component builds on.
//!
//! This crate contains no I/O and no hashing. It provides a small-buffer
//! optimized container, the allocator seam that container grows through,
//! and an exact UTF-8 <-> wide-character codec over it.
//!
//! ## Key Types
//!
//! - [`SboBuffer`] - Inline-or-heap container, generic over [`BufferKind`]
//! - [`ByteBuffer`], [`Utf8Buffer`], [`WideBuffer`] - The three buffer kinds
//! - [`Allocator`] - Injectable memory source; [`Global`] is the default
//! - [`ScfgError`] - The flat error taxonomy shared by all scfg crates
//!
//! ## Small-buffer optimization
//!
//! Buffers whose contents fit in [`SMALL_BUFFER_SIZE`] bytes live inline.
//! Past that they move to an exactly sized heap block and return inline when
//! shrunk again.
//! See the [`buffer`] module.
//!
//! ## Text
//!
//! The [`unicode`] module predicts and performs UTF-8 <-> wide conversion
//! deterministically, independent of process locale.

pub mod alloc;
pub mod buffer;
pub mod error;
pub mod kind;
pub mod unicode;

pub use alloc::{Allocator, Global};
pub use buffer::{ByteBuffer, SboBuffer, Utf8Buffer, WideBuffer, SMALL_BUFFER_SIZE};
pub use error::{Result, ScfgError};
pub use kind::{BufferKind, BufferKindTag, Bytes, Utf8, Wide, WideUnit};
pub use unicode::{
    decode_utf8, encode_utf8, to_utf8_buffer, to_utf8_buffer_in, to_wide_buffer,
    to_wide_buffer_in, utf8_len, utf8_to_wide, wide_len, wide_to_utf8,
};
