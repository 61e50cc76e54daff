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
use crate::serializer::collection::{read_elements, write_elements};
use crate::serializer::{AccelDefault, Serializer};
use crate::types::{FieldOptions, TypeShape, WireKind};

#[inline(always)]
fn element_rank<T: Serializer>() -> u8 {
    match T::accel_shape() {
        TypeShape::Array { rank } => rank,
        _ => 0,
    }
}

fn reject_nested<T: Serializer, const N: usize>() -> Result<(), Error> {
    if element_rank::<T>() > 0 {
        return Err(Error::not_supported(format!(
            "{} is a multi-dimensional array",
            std::any::type_name::<[T; N]>()
        )));
    }
    Ok(())
}

/// Fixed arrays share the list layout. A null or default record decodes as
/// an array of default elements; any other count mismatch is an error.
impl<T: Serializer + AccelDefault, const N: usize> Serializer for [T; N] {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        reject_nested::<T, N>()?;
        write_elements(self.iter(), N, context, options)
    }

    fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
        reject_nested::<T, N>()?;
        let elements: Vec<T> = read_elements(context, options)?;
        if elements.is_empty() {
            return Ok(std::array::from_fn(|_| T::accel_default()));
        }
        let len = elements.len();
        elements.try_into().map_err(|_| {
            Error::invalid_data(format!(
                "expected {} array elements, found {}",
                N, len
            ))
        })
    }

    fn accel_wire_kind(_: &FieldOptions) -> WireKind {
        WireKind::Complex
    }

    fn accel_shape() -> TypeShape {
        TypeShape::Array {
            rank: element_rank::<T>().saturating_add(1),
        }
    }

    fn accel_reserved_space() -> usize {
        T::accel_reserved_space() * N + 11
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl<T: AccelDefault, const N: usize> AccelDefault for [T; N] {
    fn accel_default() -> Self {
        std::array::from_fn(|_| T::accel_default())
    }
}
