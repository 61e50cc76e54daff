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
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::hash::Hash;

macro_rules! impl_list_serializer {
    ($collection:ident, $($bound:path),*) => {
        impl<T: Serializer $(+ $bound)*> Serializer for $collection<T> {
            fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
                write_elements(self.iter(), self.len(), context, options)
            }

            fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
                read_elements(context, options)
            }

            fn accel_wire_kind(_: &FieldOptions) -> WireKind {
                WireKind::Complex
            }

            fn accel_shape() -> TypeShape {
                TypeShape::List
            }

            fn accel_reserved_space() -> usize {
                // tag, byte length and count
                1 + 5 + 5
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl<T> AccelDefault for $collection<T> {
            fn accel_default() -> Self {
                $collection::new()
            }
        }
    };
}

impl_list_serializer!(Vec,);
impl_list_serializer!(VecDeque,);
impl_list_serializer!(LinkedList,);
impl_list_serializer!(HashSet, Eq, Hash);
impl_list_serializer!(BTreeSet, Ord);
