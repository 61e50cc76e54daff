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
use crate::meta::FieldSchema;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_registry::TypeBinding;
use crate::types::{FieldOptions, TypeShape, WireKind};
use std::any::Any;
use std::fmt::Display;

mod array;
mod bool;
mod box_;
mod char;
mod collection;
mod datetime;
mod float;
mod list;
mod map;
mod number;
mod option;
mod string;
pub mod struct_;
mod tuple;

pub use collection::{read_elements, write_elements};

/// Value a field takes when its record is missing or carries the default tag.
pub trait AccelDefault: Sized {
    fn accel_default() -> Self;
}

/// Encoding and decoding of one record of `Self`.
///
/// `accel_write` emits the tag and payload of a record; the caller writes the
/// serial index, if any. `accel_read` consumes exactly one record.
pub trait Serializer: Sized + 'static {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error>;

    fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error>;

    fn accel_wire_kind(options: &FieldOptions) -> WireKind;

    fn accel_shape() -> TypeShape {
        TypeShape::Primitive
    }

    fn accel_is_none(&self) -> bool {
        false
    }

    /// The possible max memory size of the type.
    /// Used to size the writer up front.
    fn accel_reserved_space() -> usize {
        0
    }

    /// Descriptor-driven binding for struct-shaped types, provided by the derive.
    fn accel_struct_binding() -> Option<Result<TypeBinding, Error>> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Type-level options set through `#[accel(...)]` on a struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeOptions {
    pub strict: bool,
    pub initial_size: u32,
}

impl Default for TypeOptions {
    fn default() -> Self {
        TypeOptions {
            strict: false,
            initial_size: crate::config::DEFAULT_INITIAL_BUFFER_SIZE as u32,
        }
    }
}

/// Field-by-field access generated by `#[derive(AccelObject)]`.
///
/// Slots number the fields in ascending serial-index order, matching the
/// order of [`accel_fields`](Self::accel_fields).
pub trait StructSerializer: Serializer {
    fn accel_fields() -> Vec<FieldSchema>;

    fn accel_type_options() -> TypeOptions {
        TypeOptions::default()
    }

    /// A value to decode into, or `None` when the type has no default.
    fn accel_construct() -> Option<Self>;

    fn accel_write_field(&self, slot: usize, context: &mut WriteContext) -> Result<(), Error>;

    fn accel_read_field(&mut self, slot: usize, context: &mut ReadContext) -> Result<(), Error>;

    fn accel_before_serialize(&self) {}

    fn accel_after_deserialize(&mut self) {}
}

/// Conversion between a field type and the type that goes on the wire.
///
/// Blanket-implemented for every `Clone + Into<W>` type whose wire type
/// converts back with `TryInto`.
pub trait Facade<W>: Sized {
    fn to_facade(&self) -> W;

    fn from_facade(wire: W) -> Result<Self, Error>;
}

impl<T, W> Facade<W> for T
where
    T: Clone + Into<W>,
    W: TryInto<T>,
    <W as TryInto<T>>::Error: Display,
{
    fn to_facade(&self) -> W {
        self.clone().into()
    }

    fn from_facade(wire: W) -> Result<Self, Error> {
        wire.try_into().map_err(|e| {
            Error::invalid_data(format!(
                "facade value does not convert to {}: {}",
                std::any::type_name::<T>(),
                e
            ))
        })
    }
}

/// Reads one record, mapping errors to include the field name.
pub fn read_field<T: Serializer>(
    context: &mut ReadContext,
    options: &FieldOptions,
    name: &'static str,
) -> Result<T, Error> {
    T::accel_read(context, options).map_err(|e| match e {
        Error::InvalidData(s) => Error::invalid_data(format!("field `{}`: {}", name, s)),
        Error::InvalidTag(s) => Error::invalid_tag(format!("field `{}`: {}", name, s)),
        other => other,
    })
}
