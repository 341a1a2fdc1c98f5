//! Deterministic UTF-8 <-> wide-character transcoding.
//!
//! Wide text stores one code point per [`WideUnit`]. The predictors report
//! exactly how many units the matching transcoder will produce, so callers
//! size the destination once and the transcoder never allocates.
//!
//! Decoding classifies sequences by their leading byte only; continuation
//! bytes contribute their low six bits without being re-validated.

use crate::alloc::{Allocator, Global};
use crate::buffer::{SboBuffer, Utf8Buffer, WideBuffer};
use crate::error::{Result, ScfgError};
use crate::kind::{Utf8, Wide, WideUnit};

/// Largest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

const CONTINUATION_TAG: u8 = 0b1000_0000;
const CONTINUATION_MASK: u8 = 0b0011_1111;

/// Encoded length of one code point.
fn encoded_len(value: u32, offset: usize) -> Result<usize> {
    match value {
        0..=0x7F => Ok(1),
        0x80..=0x7FF => Ok(2),
        0x800..=0xFFFF => Ok(3),
        0x1_0000..=MAX_CODE_POINT => Ok(4),
        _ => Err(ScfgError::CodePointTooLarge { value, offset }),
    }
}

/// Sequence length announced by a leading byte.
fn sequence_len(lead: u8, offset: usize) -> Result<usize> {
    if lead & 0b1000_0000 == 0 {
        Ok(1)
    } else if lead & 0b1110_0000 == 0b1100_0000 {
        Ok(2)
    } else if lead & 0b1111_0000 == 0b1110_0000 {
        Ok(3)
    } else if lead & 0b1111_1000 == 0b1111_0000 {
        Ok(4)
    } else {
        Err(ScfgError::CodePointTooLarge {
            value: lead as u32,
            offset,
        })
    }
}

/// Number of UTF-8 bytes needed to encode `wide`.
pub fn utf8_len(wide: &[WideUnit]) -> Result<usize> {
    wide.iter()
        .enumerate()
        .try_fold(0usize, |total, (i, &unit)| Ok(total + encoded_len(unit, i)?))
}

/// Number of wide units produced by decoding `utf8`.
pub fn wide_len(utf8: &[u8]) -> Result<usize> {
    let mut count = 0;
    let mut pos = 0;
    while pos < utf8.len() {
        let len = sequence_len(utf8[pos], pos)?;
        if pos + len > utf8.len() {
            return Err(ScfgError::InvalidCodePoint { offset: pos });
        }
        pos += len;
        count += 1;
    }
    Ok(count)
}

/// Encode `wide` into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least [`utf8_len`] bytes; nothing is written otherwise.
pub fn encode_utf8(wide: &[WideUnit], dst: &mut [u8]) -> Result<usize> {
    let required = utf8_len(wide)?;
    if dst.len() < required {
        return Err(ScfgError::too_small(required, dst.len()));
    }

    let mut pos = 0;
    for &cp in wide {
        match cp {
            0..=0x7F => {
                dst[pos] = cp as u8;
                pos += 1;
            }
            0x80..=0x7FF => {
                dst[pos] = 0b1100_0000 | (cp >> 6) as u8;
                dst[pos + 1] = continuation(cp);
                pos += 2;
            }
            0x800..=0xFFFF => {
                dst[pos] = 0b1110_0000 | (cp >> 12) as u8;
                dst[pos + 1] = continuation(cp >> 6);
                dst[pos + 2] = continuation(cp);
                pos += 3;
            }
            _ => {
                dst[pos] = 0b1111_0000 | (cp >> 18) as u8;
                dst[pos + 1] = continuation(cp >> 12);
                dst[pos + 2] = continuation(cp >> 6);
                dst[pos + 3] = continuation(cp);
                pos += 4;
            }
        }
    }
    Ok(pos)
}

#[inline]
fn continuation(bits: u32) -> u8 {
    CONTINUATION_TAG | (bits as u8 & CONTINUATION_MASK)
}

/// Decode `utf8` into `dst`, returning the number of wide units written.
///
/// `dst` must hold at least [`wide_len`] units; nothing is written otherwise.
pub fn decode_utf8(utf8: &[u8], dst: &mut [WideUnit]) -> Result<usize> {
    let required = wide_len(utf8)?;
    if dst.len() < required {
        return Err(ScfgError::too_small(required, dst.len()));
    }

    let mut pos = 0;
    let mut out = 0;
    while pos < utf8.len() {
        let lead = utf8[pos];
        // Lengths were validated by `wide_len` above.
        let (len, payload) = match lead {
            b if b & 0b1000_0000 == 0 => (1, b as u32),
            b if b & 0b1110_0000 == 0b1100_0000 => (2, (b & 0b0001_1111) as u32),
            b if b & 0b1111_0000 == 0b1110_0000 => (3, (b & 0b0000_1111) as u32),
            b => (4, (b & 0b0000_0111) as u32),
        };

        let cp = utf8[pos + 1..pos + len]
            .iter()
            .fold(payload, |acc, &b| (acc << 6) | (b & CONTINUATION_MASK) as u32);

        dst[out] = cp;
        out += 1;
        pos += len;
    }
    Ok(out)
}

/// Encode `wide` into a caller-sized UTF-8 buffer.
pub fn wide_to_utf8<A: Allocator, const N: usize>(
    wide: &[WideUnit],
    dst: &mut SboBuffer<Utf8, A, N>,
) -> Result<usize> {
    encode_utf8(wide, dst.as_mut_slice())
}

/// Decode UTF-8 into a caller-sized wide buffer.
pub fn utf8_to_wide<A: Allocator, const N: usize>(
    utf8: &[u8],
    dst: &mut SboBuffer<Wide, A, N>,
) -> Result<usize> {
    decode_utf8(utf8, dst.as_mut_slice())
}

/// Encode `wide` into a fresh UTF-8 buffer sized exactly to the output.
pub fn to_utf8_buffer(wide: &[WideUnit]) -> Result<Utf8Buffer> {
    to_utf8_buffer_in(wide, Global)
}

/// Like [`to_utf8_buffer`], allocating through `alloc`.
pub fn to_utf8_buffer_in<A: Allocator>(wide: &[WideUnit], alloc: A) -> Result<Utf8Buffer<A>> {
    let mut buf = Utf8Buffer::new_in(alloc);
    buf.resize(utf8_len(wide)?)?;
    wide_to_utf8(wide, &mut buf)?;
    Ok(buf)
}

/// Decode `utf8` into a fresh wide buffer sized exactly to the output.
pub fn to_wide_buffer(utf8: &[u8]) -> Result<WideBuffer> {
    to_wide_buffer_in(utf8, Global)
}

/// Like [`to_wide_buffer`], allocating through `alloc`.
pub fn to_wide_buffer_in<A: Allocator>(utf8: &[u8], alloc: A) -> Result<WideBuffer<A>> {
    let mut buf = WideBuffer::new_in(alloc);
    buf.resize(wide_len(utf8)?)?;
    utf8_to_wide(utf8, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wide(s: &str) -> Vec<WideUnit> {
        s.chars().map(|c| c as u32).collect()
    }

    #[test]
    fn test_utf8_len_classes() {
        assert_eq!(utf8_len(&[0x41]).unwrap(), 1);
        assert_eq!(utf8_len(&[0x7FF]).unwrap(), 2);
        assert_eq!(utf8_len(&[0xFFFF]).unwrap(), 3);
        assert_eq!(utf8_len(&[0x10FFFF]).unwrap(), 4);
        assert_eq!(utf8_len(&[]).unwrap(), 0);
    }

    #[test]
    fn test_utf8_len_rejects_out_of_range() {
        let err = utf8_len(&[0x41, 0x110000, 0x41]).unwrap_err();
        assert!(matches!(
            err,
            ScfgError::CodePointTooLarge {
                value: 0x110000,
                offset: 1
            }
        ));
    }

    #[test]
    fn test_encode_matches_std() {
        let text = "a\u{e9}\u{20ac}\u{1F600}";
        let mut out = [0u8; 10];
        let n = encode_utf8(&wide(text), &mut out).unwrap();
        assert_eq!(&out[..n], text.as_bytes());
    }

    #[test]
    fn test_decode_matches_std() {
        let text = "zażółć \u{10348}";
        let mut out = vec![0; wide_len(text.as_bytes()).unwrap()];
        let n = decode_utf8(text.as_bytes(), &mut out).unwrap();
        assert_eq!(&out[..n], &wide(text)[..]);
    }

    #[test]
    fn test_malformed_leading_byte() {
        let err = wide_len(&[0xF8, 0x80, 0x80, 0x80, 0x80]).unwrap_err();
        assert!(matches!(err, ScfgError::CodePointTooLarge { offset: 0, .. }));

        let mut out = [0xDEAD; 4];
        assert!(decode_utf8(&[0xF8], &mut out).is_err());
        assert_eq!(out, [0xDEAD; 4]);
    }

    #[test]
    fn test_stray_continuation_byte() {
        assert!(wide_len(&[b'a', 0x80]).is_err());
    }

    #[test]
    fn test_truncated_sequence() {
        let err = wide_len(&[b'a', 0xE2, 0x82]).unwrap_err();
        assert!(matches!(err, ScfgError::InvalidCodePoint { offset: 1 }));
    }

    #[test]
    fn test_destination_too_small() {
        let mut out = [0u8; 2];
        let err = encode_utf8(&[0x20AC], &mut out).unwrap_err();
        assert!(matches!(
            err,
            ScfgError::BufferTooSmall {
                required: 3,
                available: 2
            }
        ));
        assert_eq!(out, [0, 0]);
    }

    #[test]
    fn test_buffer_entry_points() {
        let source = wide("héllo wörld, this spills past sixteen");
        let utf8 = to_utf8_buffer(&source).unwrap();
        assert!(!utf8.is_inline());
        assert_eq!(utf8.as_str().unwrap(), "héllo wörld, this spills past sixteen");

        let back = to_wide_buffer(&utf8).unwrap();
        assert_eq!(back.as_slice(), &source[..]);
    }

    #[test]
    fn test_caller_sized_buffer_too_small() {
        let mut dst = Utf8Buffer::zeroed(1).unwrap();
        assert!(wide_to_utf8(&[0xE9], &mut dst).is_err());
        assert_eq!(dst.as_slice(), &[0]);
    }

    proptest! {
        #[test]
        fn test_roundtrip_any_code_point(units in prop::collection::vec(0u32..=MAX_CODE_POINT, 0..64)) {
            let expected_len = utf8_len(&units).unwrap();
            let mut encoded = vec![0u8; expected_len];
            prop_assert_eq!(encode_utf8(&units, &mut encoded).unwrap(), expected_len);

            prop_assert_eq!(wide_len(&encoded).unwrap(), units.len());
            let mut decoded = vec![0u32; units.len()];
            prop_assert_eq!(decode_utf8(&encoded, &mut decoded).unwrap(), units.len());
            prop_assert_eq!(decoded, units);
        }

        #[test]
        fn test_agrees_with_std_for_scalar_values(text in "\\PC{0,40}") {
            let units = wide(&text);
            let buf = to_utf8_buffer(&units).unwrap();
            prop_assert_eq!(buf.as_slice(), text.as_bytes());
        }
    }
}
