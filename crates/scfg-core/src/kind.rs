//! Buffer kinds: the element width a buffer stores.
//!
//! All three kinds share one SBO implementation; the kind only decides the
//! unit type and how the buffer identifies itself.

use std::fmt;

use bytemuck::Pod;

use crate::error::ScfgError;

/// One wide-character code unit. Holds a whole Unicode code point.
pub type WideUnit = u32;

/// Runtime selector for the three buffer kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BufferKindTag {
    /// Raw bytes.
    Bytes = 0,
    /// UTF-8 code units.
    Utf8 = 1,
    /// Wide code units (one code point each).
    Wide = 2,
}

impl BufferKindTag {
    /// Width of one unit in bytes.
    pub const fn unit_size(self) -> usize {
        match self {
            BufferKindTag::Bytes | BufferKindTag::Utf8 => 1,
            BufferKindTag::Wide => std::mem::size_of::<WideUnit>(),
        }
    }

    /// Wire value of the tag.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BufferKindTag {
    type Error = ScfgError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(BufferKindTag::Bytes),
            1 => Ok(BufferKindTag::Utf8),
            2 => Ok(BufferKindTag::Wide),
            other => Err(ScfgError::UnknownBufferKind(other)),
        }
    }
}

impl fmt::Display for BufferKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferKindTag::Bytes => "bytes",
            BufferKindTag::Utf8 => "utf8",
            BufferKindTag::Wide => "wide",
        };
        f.write_str(name)
    }
}

/// Compile-time description of a buffer kind.
pub trait BufferKind: 'static {
    /// Element stored by the buffer. All-zero bit patterns must be valid.
    ///
    /// Units must be non-zero-sized and aligned to at most 16 bytes to fit
    /// the inline area of a buffer.
    type Unit: Pod + PartialEq + fmt::Debug;

    /// The runtime tag for this kind.
    const TAG: BufferKindTag;
}

/// Raw byte buffers.
#[derive(Debug, Clone, Copy)]
pub enum Bytes {}

/// UTF-8 text buffers.
#[derive(Debug, Clone, Copy)]
pub enum Utf8 {}

/// Wide-character text buffers.
#[derive(Debug, Clone, Copy)]
pub enum Wide {}

impl BufferKind for Bytes {
    type Unit = u8;
    const TAG: BufferKindTag = BufferKindTag::Bytes;
}

impl BufferKind for Utf8 {
    type Unit = u8;
    const TAG: BufferKindTag = BufferKindTag::Utf8;
}

impl BufferKind for Wide {
    type Unit = WideUnit;
    const TAG: BufferKindTag = BufferKindTag::Wide;
}
