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

mod test_helpers;

use accel::{Endian, Reader, SlabAllocator, Writer};
use accel_core::types::{NumberFormat, TextEncoding};
use test_helpers::init_tracing;

#[test]
fn test_allocator_reuses_freed_blocks() {
    init_tracing();
    let allocator = SlabAllocator::new();
    let (first, size) = allocator.allocate(64).unwrap();
    assert_eq!(size, 64);
    unsafe { allocator.free(first, size) };
    let (second, size) = allocator.allocate(64).unwrap();
    assert_eq!(second, first);
    unsafe { allocator.free(second, size) };

    allocator.trim(true);
    assert_eq!(allocator.pooled_chunks(64), 0);
    assert_eq!(allocator.total_pooled_bytes(), 0);
}

#[test]
fn test_allocator_size_classes() {
    let allocator = SlabAllocator::new();
    let (small, size) = allocator.allocate(5).unwrap();
    assert_eq!(size, 8);
    let (large, large_size) = allocator.allocate(257).unwrap();
    assert_eq!(large_size, 257);
    unsafe {
        allocator.free(small, size);
        allocator.free(large, large_size);
    }
    assert_eq!(allocator.pooled_chunks(8), 1);
    assert_eq!(allocator.total_pooled_bytes(), 8);
}

#[test]
fn test_trim_keeps_one_block_per_class() {
    let allocator = SlabAllocator::new();
    let blocks: Vec<_> = (0..3).map(|_| allocator.allocate(32).unwrap()).collect();
    for (block, size) in blocks {
        unsafe { allocator.free(block, size) };
    }
    assert_eq!(allocator.pooled_chunks(32), 3);
    allocator.trim(false);
    assert_eq!(allocator.pooled_chunks(32), 1);
    allocator.trim(true);
    assert_eq!(allocator.pooled_chunks(32), 0);
}

#[test]
fn test_writer_capacity_doubles() {
    let allocator = SlabAllocator::new();
    let mut writer = Writer::with_capacity(allocator.clone(), 16, Endian::Little);
    assert_eq!(writer.capacity(), 16);

    writer.write_bytes(&[0xAB; 17]);
    assert_eq!(writer.capacity(), 32);
    writer.write_bytes(&[0xCD; 40]);
    assert_eq!(writer.capacity(), 64);
    writer.write_bytes(&[0xEF; 200]);
    assert_eq!(writer.capacity(), 257);
    assert_eq!(writer.len(), 257);
    assert_eq!(writer.as_slice()[16], 0xAB);
    assert_eq!(writer.as_slice()[17], 0xCD);

    writer.dispose();
    assert!(allocator.total_pooled_bytes() > 0);
}

#[test]
fn test_writer_copy_out() {
    let mut writer = Writer::with_capacity(SlabAllocator::new(), 8, Endian::Little);
    writer.write_index(3);
    writer.write_str("ok", TextEncoding::Utf8);

    let mut sink = Vec::new();
    writer.write_all_to(&mut sink).unwrap();
    assert_eq!(sink, writer.to_owned_bytes());

    let mut exact = [0u8; 5];
    assert_eq!(writer.copy_to_slice(&mut exact).unwrap(), 5);
    assert_eq!(exact, [0x03, 0x0F, 0x02, b'o', b'k']);
    let mut short = [0u8; 2];
    assert!(writer.copy_to_slice(&mut short).is_err());

    writer.reset();
    assert!(writer.is_empty());
}

#[test]
fn test_reader_walks_records_it_does_not_understand() {
    let mut writer = Writer::with_capacity(SlabAllocator::new(), 32, Endian::Big);
    writer.write_index(1);
    writer.write_integer(-129i32, NumberFormat::Variant);
    writer.write_index(2);
    writer.write_f64(2.5);
    writer.write_index(3);
    writer.write_nested(|inner| {
        inner.write_index(1);
        inner.write_bool(true);
        Ok(())
    })
    .unwrap();
    writer.write_index(4);
    writer.write_char('x', TextEncoding::Ascii);

    let bytes = writer.to_owned_bytes();
    let mut reader = Reader::new(&bytes, Endian::Big);
    let mut seen = Vec::new();
    while let Some(index) = reader.next_index().unwrap() {
        seen.push(index);
        if index == 4 {
            assert_eq!(reader.read_char(TextEncoding::Ascii).unwrap(), 'x');
        } else {
            reader.skip_next().unwrap();
        }
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert!(reader.is_exhausted());
    assert_eq!(reader.cursor(), bytes.len());
}

#[test]
fn test_reader_range_is_a_window() {
    let bytes = [0xFF, 0x01, 0x2A, 0xFF];
    let mut reader = Reader::with_range(&bytes, 1, 2, Endian::Little).unwrap();
    assert_eq!(reader.read_integer::<u8>().unwrap(), 42);
    assert!(reader.is_exhausted());
    assert!(reader.read_tag().is_err());
    assert!(Reader::with_range(&bytes, 3, 2, Endian::Little).is_err());
}
