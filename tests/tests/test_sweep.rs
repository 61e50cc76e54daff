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

use accel::{free_all_available_memory, SlabAllocator};

fn pool_one(allocator: &SlabAllocator, size: usize) {
    let (block, actual) = allocator.allocate(size).unwrap();
    unsafe { allocator.free(block, actual) };
}

#[test]
fn test_sweep_empties_every_live_allocator() {
    let first = SlabAllocator::new();
    let second = SlabAllocator::with_max_find_chunk_count(0);
    pool_one(&first, 24);
    pool_one(&first, 200);
    pool_one(&second, 8);
    pool_one(&SlabAllocator::shared(), 64);
    assert!(first.total_pooled_bytes() > 0);
    assert!(second.total_pooled_bytes() > 0);

    free_all_available_memory();

    assert_eq!(first.total_pooled_bytes(), 0);
    assert_eq!(second.total_pooled_bytes(), 0);
    assert_eq!(SlabAllocator::shared().total_pooled_bytes(), 0);

    // allocators stay usable after a sweep
    pool_one(&first, 24);
    assert_eq!(first.pooled_chunks(24), 1);
}
