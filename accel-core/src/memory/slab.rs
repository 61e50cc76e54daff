// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::util::{align_up, Spinlock};
use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, trace};

/// Alignment and granularity of every pooled block.
pub const ALIGN: usize = 8;
/// Largest request served from the free lists.
pub const MAX_CHUNK_SIZE: usize = 256;
pub const SIZE_CLASS_COUNT: usize = MAX_CHUNK_SIZE / ALIGN;
pub const DEFAULT_MAX_FIND_CHUNK_COUNT: usize = 2;

/// Free-list link written into the first word of a pooled block.
struct Chunk {
    next: Option<NonNull<Chunk>>,
}

struct FreeLists {
    heads: [Option<NonNull<Chunk>>; SIZE_CLASS_COUNT],
    counts: [usize; SIZE_CLASS_COUNT],
}

// SAFETY: the lists own the blocks they link; they are only touched under the allocator's lock.
unsafe impl Send for FreeLists {}

impl FreeLists {
    const fn new() -> Self {
        FreeLists {
            heads: [None; SIZE_CLASS_COUNT],
            counts: [0; SIZE_CLASS_COUNT],
        }
    }

    #[inline(always)]
    fn pop(&mut self, class: usize) -> Option<NonNull<u8>> {
        let head = self.heads[class]?;
        // SAFETY: every linked chunk was written by `push` and is still owned by the list.
        self.heads[class] = unsafe { head.as_ref().next };
        self.counts[class] -= 1;
        Some(head.cast())
    }

    #[inline(always)]
    fn push(&mut self, class: usize, block: NonNull<u8>) {
        let chunk = block.cast::<Chunk>();
        // SAFETY: the block is at least ALIGN bytes, ALIGN-aligned and no longer in use.
        unsafe {
            ptr::write(
                chunk.as_ptr(),
                Chunk {
                    next: self.heads[class],
                },
            )
        };
        self.heads[class] = Some(chunk);
        self.counts[class] += 1;
    }
}

#[inline(always)]
fn class_of(size: usize) -> usize {
    align_up(size.max(1), ALIGN) / ALIGN - 1
}

#[inline(always)]
const fn class_size(class: usize) -> usize {
    (class + 1) * ALIGN
}

#[inline(always)]
fn layout_for(size: usize) -> Result<Layout, Error> {
    Layout::from_size_align(size, ALIGN).map_err(|_| Error::allocation_failure(size))
}

fn os_alloc(size: usize) -> Result<NonNull<u8>, Error> {
    let layout = layout_for(size)?;
    // SAFETY: size is never zero here; callers normalize zero-byte requests.
    let raw = unsafe { alloc::alloc(layout) };
    NonNull::new(raw).ok_or_else(|| Error::allocation_failure(size))
}

/// # Safety
/// `block` must come from `os_alloc(size)` and must not be used afterwards.
unsafe fn os_free(block: NonNull<u8>, size: usize) {
    if let Ok(layout) = layout_for(size) {
        alloc::dealloc(block.as_ptr(), layout);
    }
}

/// Size-class pooling allocator for small buffers.
///
/// Requests up to [`MAX_CHUNK_SIZE`] bytes are rounded up to a multiple of
/// [`ALIGN`] and served from one of 32 LIFO free lists. When a class is empty
/// up to `max_find_chunk_count` wider classes are probed before going to the
/// OS; a borrowed wider block is reported with its real size. Larger requests
/// bypass the pool entirely.
///
/// All free lists sit behind one [`Spinlock`].
pub struct SlabAllocator {
    lists: Spinlock<FreeLists>,
    max_find_chunk_count: AtomicUsize,
}

static LIVE_ALLOCATORS: OnceLock<Spinlock<Vec<Weak<SlabAllocator>>>> = OnceLock::new();
static SHARED: OnceLock<Arc<SlabAllocator>> = OnceLock::new();

fn live_allocators() -> &'static Spinlock<Vec<Weak<SlabAllocator>>> {
    LIVE_ALLOCATORS.get_or_init(|| Spinlock::new(Vec::new()))
}

impl SlabAllocator {
    /// Creates an allocator and enrolls it in the process-wide sweep.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Arc<SlabAllocator> {
        Self::with_max_find_chunk_count(DEFAULT_MAX_FIND_CHUNK_COUNT)
    }

    pub fn with_max_find_chunk_count(count: usize) -> Arc<SlabAllocator> {
        let allocator = Arc::new(SlabAllocator {
            lists: Spinlock::new(FreeLists::new()),
            max_find_chunk_count: AtomicUsize::new(count),
        });
        let mut live = live_allocators().lock();
        live.retain(|w| w.strong_count() > 0);
        live.push(Arc::downgrade(&allocator));
        allocator
    }

    /// The process-wide allocator used by writers created without one.
    pub fn shared() -> Arc<SlabAllocator> {
        SHARED.get_or_init(SlabAllocator::new).clone()
    }

    #[inline(always)]
    pub fn max_find_chunk_count(&self) -> usize {
        self.max_find_chunk_count.load(Ordering::Relaxed)
    }

    pub fn set_max_find_chunk_count(&self, count: usize) {
        self.max_find_chunk_count.store(count, Ordering::Relaxed);
    }

    /// Returns a block of at least `min_size` bytes together with its actual size.
    ///
    /// The block must be handed back through [`free`](Self::free) or
    /// [`reallocate`](Self::reallocate) with that actual size.
    pub fn allocate(&self, min_size: usize) -> Result<(NonNull<u8>, usize), Error> {
        let min_size = min_size.max(1);
        if min_size > MAX_CHUNK_SIZE {
            trace!(size = min_size, "large block from the OS");
            return os_alloc(min_size).map(|block| (block, min_size));
        }
        let class = class_of(min_size);
        {
            let mut lists = self.lists.lock();
            if let Some(block) = lists.pop(class) {
                return Ok((block, class_size(class)));
            }
            let probe_end = class
                .saturating_add(self.max_find_chunk_count())
                .min(SIZE_CLASS_COUNT - 1);
            for wider in class + 1..=probe_end {
                if let Some(block) = lists.pop(wider) {
                    trace!(requested = min_size, actual = class_size(wider), "borrowed wider chunk");
                    return Ok((block, class_size(wider)));
                }
            }
        }
        trace!(size = class_size(class), "refilling size class from the OS");
        os_alloc(class_size(class)).map(|block| (block, class_size(class)))
    }

    /// Returns `block` to its size class, or to the OS when it is a large block.
    ///
    /// # Safety
    /// `block` must have been returned by this allocator with actual size `size`
    /// and must not be used after this call.
    pub unsafe fn free(&self, block: NonNull<u8>, size: usize) {
        let size = size.max(1);
        if size > MAX_CHUNK_SIZE {
            os_free(block, size);
            return;
        }
        self.lists.lock().push(class_of(size), block);
    }

    /// Moves the contents of `block` into a new block of at least `min_new_size` bytes.
    ///
    /// # Safety
    /// Same contract as [`free`](Self::free) for `block` and `old_size`. On error
    /// `block` is left untouched and still owned by the caller.
    pub unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        min_new_size: usize,
    ) -> Result<(NonNull<u8>, usize), Error> {
        let (new_block, new_size) = self.allocate(min_new_size)?;
        ptr::copy_nonoverlapping(block.as_ptr(), new_block.as_ptr(), old_size.min(new_size));
        self.free(block, old_size);
        Ok((new_block, new_size))
    }

    /// Releases pooled blocks to the OS. With `all == false` one block of each
    /// non-empty class is kept.
    pub fn trim(&self, all: bool) {
        let keep = usize::from(!all);
        let mut released = Vec::new();
        {
            let mut lists = self.lists.lock();
            for class in 0..SIZE_CLASS_COUNT {
                while lists.counts[class] > keep {
                    match lists.pop(class) {
                        Some(block) => released.push((block, class_size(class))),
                        None => break,
                    }
                }
            }
        }
        let bytes: usize = released.iter().map(|(_, size)| size).sum();
        for (block, size) in released {
            // SAFETY: popped blocks are exclusively ours.
            unsafe { os_free(block, size) };
        }
        debug!(all, bytes, "trimmed slab allocator");
    }

    /// Bytes currently parked in the free lists.
    pub fn total_pooled_bytes(&self) -> usize {
        let lists = self.lists.lock();
        lists
            .counts
            .iter()
            .enumerate()
            .map(|(class, count)| class_size(class) * count)
            .sum()
    }

    /// Number of pooled blocks in the size class serving `size` bytes.
    pub fn pooled_chunks(&self, size: usize) -> usize {
        if size > MAX_CHUNK_SIZE {
            return 0;
        }
        self.lists.lock().counts[class_of(size)]
    }
}

impl Drop for SlabAllocator {
    fn drop(&mut self) {
        let lists = self.lists.get_mut();
        for class in 0..SIZE_CLASS_COUNT {
            while let Some(block) = lists.pop(class) {
                // SAFETY: the allocator is going away; nothing else references pooled blocks.
                unsafe { os_free(block, class_size(class)) };
            }
        }
    }
}

/// Trims every live allocator in the process down to nothing.
pub fn free_all_available_memory() {
    let alive: Vec<Arc<SlabAllocator>> = {
        let mut live = live_allocators().lock();
        live.retain(|w| w.strong_count() > 0);
        live.iter().filter_map(Weak::upgrade).collect()
    };
    debug!(allocators = alive.len(), "sweeping all slab allocators");
    for allocator in alive {
        allocator.trim(true);
    }
}

#[cfg(test)]
pub(crate) fn sweep_guard() -> std::sync::MutexGuard<'static, ()> {
    static SWEEP: std::sync::Mutex<()> = std::sync::Mutex::new(());
    SWEEP.lock().unwrap_or_else(|e| e.into_inner())
}
