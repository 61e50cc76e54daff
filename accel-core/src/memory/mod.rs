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

mod native;
mod slab;

pub use native::NativeMemory;
pub use slab::{
    free_all_available_memory, SlabAllocator, ALIGN, DEFAULT_MAX_FIND_CHUNK_COUNT,
    MAX_CHUNK_SIZE, SIZE_CLASS_COUNT,
};

#[cfg(test)]
pub(crate) use slab::sweep_guard;
