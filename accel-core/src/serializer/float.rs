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
use crate::types::{FieldOptions, Float128, WireKind};

macro_rules! impl_float_serializer {
    ($ty:ty, $write:ident, $read:ident, $kind:expr, $zero:expr) => {
        impl Serializer for $ty {
            #[inline(always)]
            fn accel_write(&self, context: &mut WriteContext, _: &FieldOptions) -> Result<(), Error> {
                context.writer.$write(*self);
                Ok(())
            }

            #[inline(always)]
            fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
                context.reader.$read()
            }

            #[inline(always)]
            fn accel_wire_kind(_: &FieldOptions) -> WireKind {
                $kind
            }

            #[inline(always)]
            fn accel_reserved_space() -> usize {
                std::mem::size_of::<$ty>() + 1
            }

            #[inline(always)]
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl AccelDefault for $ty {
            #[inline(always)]
            fn accel_default() -> Self {
                $zero
            }
        }
    };
}

impl_float_serializer!(f32, write_f32, read_f32, WireKind::Float32, 0.0);
impl_float_serializer!(f64, write_f64, read_f64, WireKind::Float64, 0.0);
impl_float_serializer!(Float128, write_f128, read_f128, WireKind::Float128, Float128::ZERO);
