//! # scfg Hash
//!
//! A uniform digest API over three algorithms, writing into scfg buffers.
//!
//! ## Algorithms
//!
//! | [`HashId`]    | algorithm  | output   |
//! |---------------|------------|----------|
//! | `Blake3`      | BLAKE3     | 32 bytes |
//! | `Sha512`      | SHA3-512   | 64 bytes |
//! | `Whirlpool`   | Whirlpool  | 64 bytes |
//!
//! All three implement [`DigestAlgorithm`], so the dispatcher drives them
//! identically.
//!
//! ## Usage
//!
//! ```rust
//! use scfg_core::ByteBuffer;
//! use scfg_hash::{hash, HashId};
//!
//! let mut out = ByteBuffer::zeroed(HashId::Blake3.output_size()).unwrap();
//! hash("config text", HashId::Blake3, &mut out).unwrap();
//! assert_eq!(out.len(), 32);
//! ```
//!
//! Streams are hashed from a byte offset to their end with [`hash_stream`],
//! in chunks sized by [`HashConfig`].

pub mod algorithm;
pub mod config;
pub mod dispatch;
pub mod id;

pub use algorithm::{digest_into, Blake3, DigestAlgorithm, Sha512, Whirlpool};
pub use config::{HashConfig, DEFAULT_CHUNK_SIZE};
pub use dispatch::{hash, hash_stream, hash_to_hex, hash_to_vec, Dispatcher, HashInput};
pub use id::{is_valid_hash_id, HashId};
