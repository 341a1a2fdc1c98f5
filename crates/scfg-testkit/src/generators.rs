//! Proptest generators for property-based testing.

use proptest::prelude::*;

use scfg_core::unicode::MAX_CODE_POINT;
use scfg_core::{WideUnit, SMALL_BUFFER_SIZE};
use scfg_hash::HashId;

/// Any value the codec accepts, surrogates included.
pub fn code_point() -> impl Strategy<Value = WideUnit> {
    0..=MAX_CODE_POINT
}

/// Values the codec must reject.
pub fn oversized_code_point() -> impl Strategy<Value = WideUnit> {
    (MAX_CODE_POINT + 1)..=u32::MAX
}

/// Wide text of up to `max_len` code points.
pub fn wide_text(max_len: usize) -> impl Strategy<Value = Vec<WideUnit>> {
    prop::collection::vec(code_point(), 0..=max_len)
}

/// Payload bytes of up to `max_len` bytes.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Lengths clustered around the inline threshold.
pub fn buffer_len() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0),
        Just(SMALL_BUFFER_SIZE),
        Just(SMALL_BUFFER_SIZE + 1),
        1..SMALL_BUFFER_SIZE,
        SMALL_BUFFER_SIZE..SMALL_BUFFER_SIZE * 8,
    ]
}

/// A sequence of resize targets.
pub fn resize_steps(max_steps: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(buffer_len(), 1..=max_steps)
}

/// Any supported digest algorithm.
pub fn hash_id() -> impl Strategy<Value = HashId> {
    prop_oneof![
        Just(HashId::Blake3),
        Just(HashId::Sha512),
        Just(HashId::Whirlpool),
    ]
}
