//! # scfg
//!
//! The unified API for the scfg data substrate: small-buffer-optimized
//! storage, deterministic UTF-8 transcoding and pluggable digests.
//!
//! ## Overview
//!
//! - **Buffers**: [`ByteBuffer`], [`Utf8Buffer`] and [`WideBuffer`] keep
//!   short contents inline and move to an exactly sized heap block past
//!   [`SMALL_BUFFER_SIZE`] bytes
//! - **Allocators**: every buffer is bound to an [`Allocator`]; [`Global`]
//!   is the default
//! - **Text**: exact UTF-8 <-> wide conversion, see [`core::unicode`]
//! - **Digests**: BLAKE3, SHA3-512 and Whirlpool behind [`hash`] and
//!   [`hash_stream`]
//!
//! ## Usage
//!
//! ```rust
//! use scfg::{hash, to_utf8_buffer, ByteBuffer, HashId};
//!
//! let wide: Vec<u32> = "grüße".chars().map(|c| c as u32).collect();
//! let utf8 = to_utf8_buffer(&wide).unwrap();
//! assert_eq!(utf8.as_str().unwrap(), "grüße");
//!
//! let mut digest = ByteBuffer::zeroed(HashId::Whirlpool.output_size()).unwrap();
//! hash(&utf8, HashId::Whirlpool, &mut digest).unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `scfg::core` - Buffers, allocators, codec and errors
//! - `scfg::digest` - Digest dispatcher (also re-exported at the top level)

pub use scfg_core as core;
pub use scfg_hash as digest;

pub use scfg_core::{
    decode_utf8, encode_utf8, to_utf8_buffer, to_utf8_buffer_in, to_wide_buffer,
    to_wide_buffer_in, utf8_len, utf8_to_wide, wide_len, wide_to_utf8, Allocator, BufferKind,
    BufferKindTag, ByteBuffer, Bytes, Global, Result, SboBuffer, ScfgError, Utf8, Utf8Buffer, Wide,
    WideBuffer, WideUnit, SMALL_BUFFER_SIZE,
};
pub use scfg_hash::{
    hash, hash_stream, hash_to_hex, hash_to_vec, is_valid_hash_id, DigestAlgorithm, Dispatcher,
    HashConfig, HashId, HashInput,
};
