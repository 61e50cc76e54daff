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
use crate::serializer::collection::read_count;
use crate::serializer::{AccelDefault, Serializer};
use crate::types::{FieldOptions, TypeShape, WireKind};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Entries go as key record then value record, behind the usual collection header.
fn write_entries<'a, K, V, I>(
    iter: I,
    len: usize,
    context: &mut WriteContext,
    options: &FieldOptions,
) -> Result<(), Error>
where
    K: Serializer + 'a,
    V: Serializer + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    if len == 0 {
        context.writer.write_default();
        return Ok(());
    }
    let count = u32::try_from(len)
        .map_err(|_| Error::not_supported(format!("map of {} entries", len)))?;
    let size_hint = (K::accel_reserved_space() + V::accel_reserved_space()).max(2) * len + 5;
    context.write_nested_sized(size_hint.min(4096), |context| {
        context.writer.write_var_uint32(count);
        for (key, value) in iter {
            key.accel_write(context, options)?;
            value.accel_write(context, options)?;
        }
        Ok(())
    })
}

fn read_entries<K, V, M>(context: &mut ReadContext, options: &FieldOptions) -> Result<M, Error>
where
    K: Serializer,
    V: Serializer,
    M: FromIterator<(K, V)>,
{
    context.read_nested(|context| {
        let count = read_count(context)?;
        (0..count)
            .map(|_| {
                let key = K::accel_read(context, options)?;
                let value = V::accel_read(context, options)?;
                Ok((key, value))
            })
            .collect()
    })
}

macro_rules! impl_map_serializer {
    ($map:ident, $($bound:path),*) => {
        impl<K, V> Serializer for $map<K, V>
        where
            K: Serializer $(+ $bound)*,
            V: Serializer,
        {
            fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
                write_entries(self.iter(), self.len(), context, options)
            }

            fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
                read_entries(context, options)
            }

            fn accel_wire_kind(_: &FieldOptions) -> WireKind {
                WireKind::Complex
            }

            fn accel_shape() -> TypeShape {
                TypeShape::Map
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl<K, V> AccelDefault for $map<K, V> {
            fn accel_default() -> Self {
                $map::new()
            }
        }
    };
}

impl_map_serializer!(HashMap, Eq, Hash);
impl_map_serializer!(BTreeMap, Ord);
