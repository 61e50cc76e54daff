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

use crate::buffer::{Reader, Writer};
use crate::ensure;
use crate::error::Error;
use crate::memory::SlabAllocator;
use crate::meta::TypeDescriptor;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_registry::{DecodeFn, EncodeFn, TypeRegistry};
use crate::serializer::{Serializer, StructSerializer};
use crate::types::Endian;
use crate::Config;
use std::any::TypeId;
use std::sync::Arc;

/// The main Accel serialization instance.
///
/// `Accel` owns a [`TypeRegistry`] and a [`Config`], and hands out writers
/// backed by one [`SlabAllocator`]. A derived struct is written as its bare
/// stream of indexed records; every other type is written as one record.
///
/// # Examples
///
/// ```rust, ignore
/// use accel::{Accel, AccelObject};
///
/// #[derive(AccelObject, Debug, PartialEq)]
/// struct Point {
///     #[accel(index = 1)]
///     x: i32,
///     #[accel(index = 2, variant)]
///     y: i32,
/// }
///
/// let accel = Accel::default();
/// let bytes = accel.serialize(&Point { x: 1, y: 2 }).unwrap();
/// let point: Point = accel.deserialize(&bytes).unwrap();
/// ```
///
/// Custom configuration:
///
/// ```rust
/// use accel_core::{Accel, Endian};
///
/// let accel = Accel::default()
///     .endian(Endian::Big)
///     .strict(true)
///     .max_depth(16);
/// ```
pub struct Accel {
    config: Config,
    registry: TypeRegistry,
    allocator: Arc<SlabAllocator>,
}

impl Default for Accel {
    fn default() -> Self {
        Accel {
            config: Config::default(),
            registry: TypeRegistry::new(),
            allocator: SlabAllocator::shared(),
        }
    }
}

impl Accel {
    /// Sets the byte order of fixed-width payloads. Writer and reader must agree.
    pub fn endian(mut self, endian: Endian) -> Self {
        self.config.endian = endian;
        self
    }

    /// Rejects unknown serial indices for every type, not only `#[accel(strict)]` ones.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Sets the maximum nesting depth accepted while decoding.
    ///
    /// ```rust
    /// use accel_core::Accel;
    ///
    /// let accel = Accel::default().max_depth(8);
    /// assert_eq!(accel.config().max_depth(), 8);
    /// ```
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn initial_buffer_size(mut self, size: usize) -> Self {
        self.config.initial_buffer_size = size;
        self
    }

    /// Switches to a dedicated allocator probing `count` wider size classes.
    pub fn max_find_chunk_count(mut self, count: usize) -> Self {
        self.config.max_find_chunk_count = count;
        self.allocator = SlabAllocator::with_max_find_chunk_count(count);
        self
    }

    /// Backs every writer of this instance with `allocator`.
    pub fn allocator(mut self, allocator: Arc<SlabAllocator>) -> Self {
        self.config.max_find_chunk_count = allocator.max_find_chunk_count();
        self.allocator = allocator;
        self
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline(always)]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline(always)]
    pub fn get_allocator(&self) -> &Arc<SlabAllocator> {
        &self.allocator
    }

    /// Binds `T` to hand-written procedures and an explicit field list.
    pub fn register<T: 'static>(
        &self,
        descriptor: TypeDescriptor,
        encode_fn: EncodeFn,
        decode_fn: DecodeFn,
    ) -> Result<(), Error> {
        self.registry.register::<T>(descriptor, encode_fn, decode_fn)
    }

    /// Builds and binds the descriptor of a derived struct ahead of first use.
    pub fn register_struct<T: StructSerializer>(&self) -> Result<(), Error> {
        self.registry.register_struct::<T>()
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registry.is_registered::<T>()
    }

    pub fn has_binding(&self, type_id: TypeId) -> bool {
        self.registry.has_binding(type_id)
    }

    pub fn fields_of<T: 'static>(&self) -> Option<Arc<TypeDescriptor>> {
        self.registry.fields_of::<T>()
    }

    /// An empty writer from this instance's allocator and byte order.
    pub fn new_writer(&self, capacity: usize) -> Writer {
        Writer::with_capacity(self.allocator.clone(), capacity, self.config.endian)
    }

    /// Serializes `value` into a fresh byte vector.
    pub fn serialize<T: Serializer>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let size_hint = self
            .registry
            .binding_of::<T>()
            .and_then(|b| b.descriptor().map(|d| d.approx_byte_size() as usize))
            .unwrap_or(self.config.initial_buffer_size)
            .max(T::accel_reserved_space());
        let mut writer = self.new_writer(size_hint);
        self.serialize_to(value, &mut writer)?;
        Ok(writer.to_owned_bytes())
    }

    /// Appends the encoding of `value` to `writer`.
    pub fn serialize_to<T: Serializer>(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        ensure!(
            writer.endian() == self.config.endian,
            "writer byte order {:?} differs from the configured {:?}",
            writer.endian(),
            self.config.endian
        );
        let mut context = WriteContext::new(&self.registry, &self.config, writer);
        self.registry.encode(value, &mut context)
    }

    /// Deserializes a `T` that must span all of `bf`.
    pub fn deserialize<T: Serializer>(&self, bf: &[u8]) -> Result<T, Error> {
        self.deserialize_from(Reader::new(bf, self.config.endian))
    }

    /// Deserializes a `T` from the rest of `reader`'s range.
    pub fn deserialize_from<T: Serializer>(&self, reader: Reader) -> Result<T, Error> {
        let mut context = ReadContext::new(&self.registry, &self.config, reader);
        let value = self.registry.decode::<T>(&mut context)?;
        ensure!(
            context.reader.is_exhausted(),
            "{} trailing bytes after {}",
            context.reader.remaining(),
            std::any::type_name::<T>()
        );
        Ok(value)
    }

    /// Serializes a type known only through [`register`](Self::register).
    pub fn serialize_registered<T: 'static>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut writer = self.new_writer(self.config.initial_buffer_size);
        let mut context = WriteContext::new(&self.registry, &self.config, &mut writer);
        self.registry.encode_registered(value, &mut context)?;
        Ok(writer.to_owned_bytes())
    }

    pub fn deserialize_registered<T: 'static>(&self, bf: &[u8]) -> Result<T, Error> {
        let reader = Reader::new(bf, self.config.endian);
        let mut context = ReadContext::new(&self.registry, &self.config, reader);
        let value = self.registry.decode_registered::<T>(&mut context)?;
        ensure!(
            context.reader.is_exhausted(),
            "{} trailing bytes after {}",
            context.reader.remaining(),
            std::any::type_name::<T>()
        );
        Ok(value)
    }
}
