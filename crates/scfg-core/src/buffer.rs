//! Small-buffer-optimized storage.
//!
//! An [`SboBuffer`] keeps its units inline while they fit in `N` bytes and
//! moves to an exactly sized heap block once it grows past that threshold.
//! The threshold is the same number of bytes for every kind, so a
//! [`WideBuffer`] holds `N / 4` units inline where a [`ByteBuffer`] holds `N`.
//! Shrinking back under the threshold moves the data inline again and frees
//! the heap block.
//!
//! The storage location is a tagged sum, so the rule "inline iff the units
//! fit in `N` bytes" is carried by the type rather than by pointer
//! bookkeeping:
//!
//! - fits: inline bytes hold `len` live units followed by zeros.
//! - does not fit: heap block holds exactly `len` units.
//!
//! Any unit that becomes visible through a resize is zero, and units
//! vacated by a shrink are zeroed.

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::alloc::{Allocator, Global};
use crate::error::{Result, ScfgError};
use crate::kind::{BufferKind, BufferKindTag, Bytes, Utf8, Wide};

/// Inline capacity in bytes, shared by every buffer kind.
pub const SMALL_BUFFER_SIZE: usize = 16;

/// Alignment of the inline area; unit types may not require more.
const INLINE_ALIGN: usize = 16;

/// Buffer of raw bytes.
pub type ByteBuffer<A = Global> = SboBuffer<Bytes, A>;

/// Buffer of UTF-8 code units.
pub type Utf8Buffer<A = Global> = SboBuffer<Utf8, A>;

/// Buffer of wide code units.
pub type WideBuffer<A = Global> = SboBuffer<Wide, A>;

/// An exactly sized heap allocation of `len` units.
struct HeapBlock<E> {
    ptr: NonNull<E>,
    len: usize,
    layout: Layout,
}

impl<E: Zeroable> HeapBlock<E> {
    /// Allocate `len` zeroed units from `alloc`.
    fn allocate_zeroed<A: Allocator>(alloc: &A, len: usize) -> Result<Self> {
        let layout = Layout::array::<E>(len).map_err(|_| ScfgError::OutOfMemory {
            requested: len.saturating_mul(mem::size_of::<E>()),
        })?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = alloc.allocate(layout).ok_or(ScfgError::OutOfMemory {
                requested: layout.size(),
            })?;
            // SAFETY: the allocator handed out `layout.size()` writable bytes.
            unsafe { ptr::write_bytes(raw.as_ptr(), 0, layout.size()) };
            raw.cast()
        };

        Ok(Self { ptr, len, layout })
    }

    fn as_slice(&self) -> &[E] {
        // SAFETY: `ptr` is valid for `len` initialized units while the block lives.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [E] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Return the block to the allocator that produced it.
    ///
    /// # Safety
    ///
    /// `alloc` must be the allocator passed to `allocate_zeroed`.
    unsafe fn free<A: Allocator>(self, alloc: &A) {
        if self.layout.size() != 0 {
            alloc.deallocate(self.ptr.cast(), self.layout);
        }
    }
}

/// `N` zero-initialised bytes, aligned for units of up to `INLINE_ALIGN`.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
struct InlineBytes<const N: usize>([u8; N]);

impl<const N: usize> InlineBytes<N> {
    const ZERO: Self = Self([0; N]);

    /// The first `len` units stored in these bytes.
    fn units<E: Pod>(&self, len: usize) -> &[E] {
        bytemuck::cast_slice(&self.0[..len * mem::size_of::<E>()])
    }

    fn units_mut<E: Pod>(&mut self, len: usize) -> &mut [E] {
        bytemuck::cast_slice_mut(&mut self.0[..len * mem::size_of::<E>()])
    }
}

enum Storage<E, const N: usize> {
    Inline(InlineBytes<N>),
    Heap(HeapBlock<E>),
}

/// A variable-length container with small-buffer optimization.
///
/// `N` is the inline capacity in bytes. The buffer is bound to the
/// allocator it was created with; every heap block it ever owns is allocated
/// and freed through that allocator.
pub struct SboBuffer<K: BufferKind, A: Allocator = Global, const N: usize = SMALL_BUFFER_SIZE> {
    len: usize,
    storage: Storage<K::Unit, N>,
    alloc: A,
    _kind: PhantomData<K>,
}

// SAFETY: the heap block is uniquely owned; sending the buffer sends its
// units and its allocator.
unsafe impl<K: BufferKind, A: Allocator + Send, const N: usize> Send for SboBuffer<K, A, N> where
    K::Unit: Send
{
}

// SAFETY: shared access only hands out `&[K::Unit]` and `&A`.
unsafe impl<K: BufferKind, A: Allocator + Sync, const N: usize> Sync for SboBuffer<K, A, N> where
    K::Unit: Sync
{
}

impl<K: BufferKind, const N: usize> SboBuffer<K, Global, N> {
    /// Create an empty buffer using the default allocator.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create a buffer holding a copy of `units`.
    pub fn from_slice(units: &[K::Unit]) -> Result<Self> {
        Self::from_slice_in(units, Global)
    }

    /// Create a zero-filled buffer of `len` units.
    pub fn zeroed(len: usize) -> Result<Self> {
        let mut buf = Self::new();
        buf.resize(len)?;
        Ok(buf)
    }
}

impl<K: BufferKind, const N: usize> Default for SboBuffer<K, Global, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> SboBuffer<K, A, N> {
    /// Units that fit in the `N` inline bytes.
    const INLINE_UNITS: usize = {
        assert!(mem::align_of::<K::Unit>() <= INLINE_ALIGN);
        N / mem::size_of::<K::Unit>()
    };

    /// Create an empty buffer bound to `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            len: 0,
            storage: Storage::Inline(InlineBytes::ZERO),
            alloc,
            _kind: PhantomData,
        }
    }

    /// Create a buffer bound to `alloc` holding a copy of `units`.
    pub fn from_slice_in(units: &[K::Unit], alloc: A) -> Result<Self> {
        let mut buf = Self::new_in(alloc);
        buf.resize(units.len())?;
        buf.as_mut_slice().copy_from_slice(units);
        Ok(buf)
    }

    /// Number of live units.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the inline array is the authoritative storage.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline(_))
    }

    /// Number of units kept inline: `N` bytes divided by the unit size.
    #[inline]
    pub const fn inline_capacity(&self) -> usize {
        Self::INLINE_UNITS
    }

    /// Runtime tag of this buffer's kind.
    #[inline]
    pub fn kind(&self) -> BufferKindTag {
        K::TAG
    }

    /// The allocator this buffer is bound to.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The live units in the current storage. Never allocates.
    pub fn as_slice(&self) -> &[K::Unit] {
        match &self.storage {
            Storage::Inline(inline) => inline.units::<K::Unit>(self.len),
            Storage::Heap(block) => block.as_slice(),
        }
    }

    /// Mutable view of the live units in the current storage.
    pub fn as_mut_slice(&mut self) -> &mut [K::Unit] {
        match &mut self.storage {
            Storage::Inline(inline) => inline.units_mut::<K::Unit>(self.len),
            Storage::Heap(block) => block.as_mut_slice(),
        }
    }

    /// Pointer to the current storage. Invalidated by `resize` and `release`.
    pub fn as_ptr(&self) -> *const K::Unit {
        self.as_slice().as_ptr()
    }

    /// Change the number of live units to `new_len`.
    ///
    /// Storage moves between inline and heap as the length crosses
    /// [`inline_capacity`](Self::inline_capacity).
    /// Newly exposed units are zero. On allocation failure the buffer keeps
    /// its previous contents and `OutOfMemory` is returned.
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        if new_len == self.len {
            return Ok(());
        }
        if new_len == 0 {
            self.release();
            return Ok(());
        }

        let old_len = self.len;
        let unit = mem::size_of::<K::Unit>();
        match &mut self.storage {
            Storage::Inline(inline) => {
                if new_len <= Self::INLINE_UNITS {
                    if new_len < old_len {
                        inline.0[new_len * unit..old_len * unit].fill(0);
                    }
                } else {
                    // Also covers a fresh allocation from an empty buffer.
                    let mut block = HeapBlock::allocate_zeroed(&self.alloc, new_len)?;
                    block.as_mut_slice()[..old_len]
                        .copy_from_slice(inline.units::<K::Unit>(old_len));
                    trace!(kind = %K::TAG, from = old_len, to = new_len, "promoted buffer to heap");
                    self.storage = Storage::Heap(block);
                }
            }
            Storage::Heap(block) => {
                let keep = old_len.min(new_len);
                if new_len > Self::INLINE_UNITS {
                    let mut grown = HeapBlock::allocate_zeroed(&self.alloc, new_len)?;
                    grown.as_mut_slice()[..keep].copy_from_slice(&block.as_slice()[..keep]);
                    let old = mem::replace(block, grown);
                    // SAFETY: every heap block of this buffer comes from `self.alloc`.
                    unsafe { old.free(&self.alloc) };
                } else {
                    let mut staged = InlineBytes::<N>::ZERO;
                    staged
                        .units_mut::<K::Unit>(keep)
                        .copy_from_slice(&block.as_slice()[..keep]);
                    if let Storage::Heap(old) =
                        mem::replace(&mut self.storage, Storage::Inline(staged))
                    {
                        // SAFETY: as above.
                        unsafe { old.free(&self.alloc) };
                    }
                    trace!(kind = %K::TAG, from = old_len, to = new_len, "demoted buffer to inline");
                }
            }
        }

        self.len = new_len;
        Ok(())
    }

    /// Drop all contents and return to the empty inline state.
    ///
    /// Heap storage is freed through the bound allocator. Releasing an empty
    /// buffer does nothing.
    pub fn release(&mut self) {
        if let Storage::Heap(block) = mem::replace(&mut self.storage, Storage::Inline(InlineBytes::ZERO))
        {
            trace!(kind = %K::TAG, len = block.len, "released heap buffer");
            // SAFETY: every heap block of this buffer comes from `self.alloc`.
            unsafe { block.free(&self.alloc) };
        }
        self.len = 0;
    }
}

impl<A: Allocator, const N: usize> SboBuffer<Utf8, A, N> {
    /// View the contents as text, validating the UTF-8.
    pub fn as_str(&self) -> Result<&str> {
        std::str::from_utf8(self.as_slice()).map_err(|e| ScfgError::InvalidCodePoint {
            offset: e.valid_up_to(),
        })
    }
}

impl<const N: usize> SboBuffer<Utf8, Global, N> {
    /// Create a UTF-8 buffer holding a copy of `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> Drop for SboBuffer<K, A, N> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> Deref for SboBuffer<K, A, N> {
    type Target = [K::Unit];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> DerefMut for SboBuffer<K, A, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> AsRef<[K::Unit]> for SboBuffer<K, A, N> {
    fn as_ref(&self) -> &[K::Unit] {
        self.as_slice()
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> PartialEq<[K::Unit]> for SboBuffer<K, A, N> {
    fn eq(&self, other: &[K::Unit]) -> bool {
        self.as_slice() == other
    }
}

impl<K: BufferKind, A: Allocator, B: Allocator, const N: usize, const M: usize>
    PartialEq<SboBuffer<K, B, M>> for SboBuffer<K, A, N>
{
    fn eq(&self, other: &SboBuffer<K, B, M>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: BufferKind, A: Allocator, const N: usize> fmt::Debug for SboBuffer<K, A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SboBuffer")
            .field("kind", &K::TAG)
            .field("len", &self.len)
            .field("inline", &self.is_inline())
            .field("data", &self.as_slice())
            .finish()
    }
}
