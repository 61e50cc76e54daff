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

use crate::memory::DEFAULT_MAX_FIND_CHUNK_COUNT;
use crate::types::Endian;

/// Initial capacity of a fresh writer when the type gives no size hint.
pub const DEFAULT_INITIAL_BUFFER_SIZE: usize = 20;

/// Default nesting limit for decoding length-prefixed values.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Configuration for Accel serialization.
///
/// This struct holds the options that control how values are laid out and
/// decoded. It is shared between the `Accel` entry point and the
/// `WriteContext`/`ReadContext` so both sides agree on byte order and limits.
#[derive(Clone, Debug)]
pub struct Config {
    /// Byte order of every fixed-width payload.
    pub endian: Endian,
    /// Treat every struct as strict, rejecting unknown serial indices.
    pub strict: bool,
    /// Maximum nesting depth of length-prefixed values while decoding.
    pub max_depth: u32,
    /// Initial writer capacity for types without an `initial_size` hint.
    pub initial_buffer_size: usize,
    /// Wider size classes probed by the allocator before asking the OS.
    pub max_find_chunk_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endian: Endian::Little,
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
            initial_buffer_size: DEFAULT_INITIAL_BUFFER_SIZE,
            max_find_chunk_count: DEFAULT_MAX_FIND_CHUNK_COUNT,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Check if strict decoding is forced for all types.
    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn initial_buffer_size(&self) -> usize {
        self.initial_buffer_size
    }

    #[inline(always)]
    pub fn max_find_chunk_count(&self) -> usize {
        self.max_find_chunk_count
    }
}
