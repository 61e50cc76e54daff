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
use crate::serializer::{AccelDefault, Serializer};
use crate::types::{FieldOptions, WireKind};

/// Tuples are one length-prefixed record holding each element in order,
/// without a count. A key/value pair is the two-element case.
macro_rules! impl_tuple_serializer {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name: Serializer + AccelDefault),+> Serializer for ($($name,)+) {
            fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
                context.write_nested_sized(Self::accel_reserved_space(), |context| {
                    $(self.$idx.accel_write(context, options)?;)+
                    Ok(())
                })
            }

            fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
                context.read_nested(|context| {
                    if context.reader.is_exhausted() {
                        return Ok(($($name::accel_default(),)+));
                    }
                    Ok(($($name::accel_read(context, options)?,)+))
                })
            }

            fn accel_wire_kind(_: &FieldOptions) -> WireKind {
                WireKind::Complex
            }

            fn accel_reserved_space() -> usize {
                0 $(+ $name::accel_reserved_space().max(1))+
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl<$($name: AccelDefault),+> AccelDefault for ($($name,)+) {
            fn accel_default() -> Self {
                ($($name::accel_default(),)+)
            }
        }
    };
}

impl_tuple_serializer!(A: 0, B: 1);
impl_tuple_serializer!(A: 0, B: 1, C: 2);
impl_tuple_serializer!(A: 0, B: 1, C: 2, D: 3);
