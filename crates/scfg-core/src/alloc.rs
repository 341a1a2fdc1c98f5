//! Allocator abstraction for heap-backed buffers.
//!
//! A buffer is created with an allocator and keeps it for its whole lifetime,
//! so the allocator that produced a heap block is always the one that frees it.

use std::alloc::Layout;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

/// A source of raw memory for buffer heap storage.
///
/// # Safety
///
/// Implementations must return either `None` or a pointer to a fresh block
/// valid for reads and writes of `layout.size()` bytes, aligned to
/// `layout.align()`, that stays valid until passed back to `deallocate`.
pub unsafe trait Allocator {
    /// Allocate a block for `layout`. `None` signals allocation failure.
    ///
    /// The buffer engine never requests zero-sized layouts, but other callers
    /// may; implementations must handle them without touching memory.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Return a block previously produced by [`Allocator::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator with the same
    /// `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process default allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return Some(dangling_for(layout));
        }
        // SAFETY: `layout` has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            std::alloc::dealloc(ptr.as_ptr(), layout)
        }
    }
}

/// A non-null pointer aligned to `layout`, valid for zero-sized access.
fn dangling_for(layout: Layout) -> NonNull<u8> {
    // SAFETY: alignments are non-zero powers of two.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

unsafe impl<A: Allocator + ?Sized> Allocator for Arc<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

unsafe impl<A: Allocator + ?Sized> Allocator for Rc<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}
