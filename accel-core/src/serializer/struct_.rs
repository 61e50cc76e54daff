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
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_registry::{downcast_value, TypeBinding};
use crate::serializer::{Serializer, StructSerializer};
use std::any::Any;
use tracing::trace;

/// Writes every field of a derived struct as an indexed record, in
/// ascending serial-index order.
pub fn encode_struct<T: StructSerializer>(
    value: &dyn Any,
    context: &mut WriteContext,
    binding: &TypeBinding,
) -> Result<(), Error> {
    let this = downcast_value::<T>(value)?;
    let descriptor = binding.require_descriptor()?;
    this.accel_before_serialize();
    for (slot, field) in descriptor.fields().iter().enumerate() {
        context.writer.write_index(field.serial_index);
        this.accel_write_field(slot, context)?;
    }
    Ok(())
}

/// Reads indexed records until the range is exhausted.
///
/// Unknown indices are skipped, or rejected when either the type or the
/// configuration is strict. Fields that never appear keep their default.
pub fn decode_struct<T: StructSerializer>(
    context: &mut ReadContext,
    binding: &TypeBinding,
) -> Result<Box<dyn Any>, Error> {
    let mut value = T::accel_construct().ok_or_else(|| {
        Error::not_supported(format!(
            "{} cannot be default-constructed for decoding",
            binding.type_name()
        ))
    })?;
    let strict = binding.require_descriptor()?.is_strict() || context.config().is_strict();
    let dispatch = binding.dispatch().ok_or_else(|| {
        Error::unregistered_type(format!("{} has no field dispatch", binding.type_name()))
    })?;
    while let Some(index) = context.reader.next_index()? {
        match dispatch.slot_of(index) {
            Some(slot) => value.accel_read_field(slot, context)?,
            None if strict => {
                return Err(Error::strict_index_mismatch(index, binding.type_name()));
            }
            None => {
                trace!(
                    type_name = binding.type_name(),
                    serial_index = index,
                    "skipping unknown field"
                );
                context.reader.skip_next()?;
            }
        }
    }
    value.accel_after_deserialize();
    Ok(Box::new(value))
}

/// Writes a struct-typed field as one length-prefixed record of its fields.
pub fn write_nested<T: Serializer>(value: &T, context: &mut WriteContext) -> Result<(), Error> {
    let binding = context.registry().resolve::<T>()?;
    context.write_nested_sized(binding.approx_byte_size(), |context| {
        binding.encode(value.as_any(), context)
    })
}

/// Reads a struct-typed field written by [`write_nested`].
pub fn read_nested<T: Serializer>(context: &mut ReadContext) -> Result<T, Error> {
    let binding = context.registry().resolve::<T>()?;
    context.read_nested(|context| binding.decode::<T>(context))
}
