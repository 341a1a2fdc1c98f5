//! Instrumented allocators for buffer tests.

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use scfg_core::{Allocator, Global};

/// Forwards to the process allocator and counts every call.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    live_bytes: AtomicUsize,
}

impl CountingAllocator {
    /// Create an allocator with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Number of `deallocate` calls.
    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::SeqCst)
    }

    /// Bytes allocated and not yet returned.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::SeqCst)
    }

    /// Whether every allocation has been returned.
    pub fn is_balanced(&self) -> bool {
        self.allocations() == self.deallocations() && self.live_bytes() == 0
    }
}

unsafe impl Allocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = Global.allocate(layout)?;
        self.allocations.fetch_add(1, Ordering::SeqCst);
        self.live_bytes.fetch_add(layout.size(), Ordering::SeqCst);
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.fetch_add(1, Ordering::SeqCst);
        self.live_bytes.fetch_sub(layout.size(), Ordering::SeqCst);
        Global.deallocate(ptr, layout)
    }
}

/// Succeeds for the first `budget` allocations, then fails every request.
#[derive(Debug)]
pub struct FailingAllocator {
    budget: AtomicUsize,
    inner: CountingAllocator,
}

impl FailingAllocator {
    /// Allow `budget` successful allocations.
    pub fn new(budget: usize) -> Self {
        Self {
            budget: AtomicUsize::new(budget),
            inner: CountingAllocator::new(),
        }
    }

    /// Counters for the allocations that went through.
    pub fn counts(&self) -> &CountingAllocator {
        &self.inner
    }
}

unsafe impl Allocator for FailingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        self.budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .ok()?;
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.inner.deallocate(ptr, layout)
    }
}
