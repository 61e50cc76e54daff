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

use super::SlabAllocator;
use crate::error::Error;
use std::alloc::{handle_alloc_error, Layout};
use std::ptr::NonNull;
use std::sync::Arc;

/// A growable byte region borrowed from a [`SlabAllocator`].
///
/// The region goes back to its allocator exactly once, when the value drops.
pub struct NativeMemory {
    ptr: NonNull<u8>,
    capacity: usize,
    len: usize,
    allocator: Arc<SlabAllocator>,
}

// SAFETY: the region is uniquely owned; the allocator handle is Send + Sync.
unsafe impl Send for NativeMemory {}

#[cold]
fn escalate(err: Error, size: usize) -> ! {
    tracing::error!(%err, size, "native memory allocation failed");
    let layout = Layout::from_size_align(size.max(1), super::ALIGN)
        .unwrap_or_else(|_| Layout::new::<u8>());
    handle_alloc_error(layout)
}

impl NativeMemory {
    pub fn try_allocate(allocator: Arc<SlabAllocator>, min_size: usize) -> Result<Self, Error> {
        let (ptr, capacity) = allocator.allocate(min_size)?;
        Ok(NativeMemory {
            ptr,
            capacity,
            len: 0,
            allocator,
        })
    }

    /// Like [`try_allocate`](Self::try_allocate), escalating failure to the global handler.
    pub fn allocate(allocator: Arc<SlabAllocator>, min_size: usize) -> Self {
        match Self::try_allocate(allocator, min_size) {
            Ok(memory) => memory,
            Err(err) => escalate(err, min_size),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn allocator(&self) -> &Arc<SlabAllocator> {
        &self.allocator
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the first `len` bytes are initialized and owned by `self`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Makes room for `additional` more bytes, growing to `max(capacity * 2, required)`.
    #[inline(always)]
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len + additional;
        if required > self.capacity {
            self.grow(required);
        }
    }

    #[inline(never)]
    fn grow(&mut self, required: usize) {
        let target = (self.capacity * 2).max(required);
        // SAFETY: `ptr`/`capacity` is the live block handed out by `allocator`.
        match unsafe { self.allocator.reallocate(self.ptr, self.capacity, target) } {
            Ok((ptr, capacity)) => {
                self.ptr = ptr;
                self.capacity = capacity;
            }
            Err(err) => escalate(err, target),
        }
    }

    #[inline(always)]
    pub fn push(&mut self, byte: u8) {
        self.reserve(1);
        // SAFETY: reserve guarantees `len < capacity`.
        unsafe { self.ptr.as_ptr().add(self.len).write(byte) };
        self.len += 1;
    }

    #[inline(always)]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        // SAFETY: reserve guarantees room; `bytes` cannot alias our exclusive block.
        unsafe {
            std::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.ptr.as_ptr().add(self.len),
                bytes.len(),
            )
        };
        self.len += bytes.len();
    }
}

impl Drop for NativeMemory {
    fn drop(&mut self) {
        // SAFETY: the block came from this allocator with this capacity and is dropped once.
        unsafe { self.allocator.free(self.ptr, self.capacity) };
    }
}
