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
use crate::types::{FieldOptions, TypeShape, WireKind};

impl<T: Serializer> Serializer for Option<T> {
    #[inline(always)]
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        match self {
            Some(v) => v.accel_write(context, options),
            None => {
                context.writer.write_null();
                Ok(())
            }
        }
    }

    /// The null tag reads as `None`; a default tag is a present default value.
    #[inline(always)]
    fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
        if context.reader.peek_tag()?.is_null() {
            context.reader.read_tag()?;
            return Ok(None);
        }
        Ok(Some(T::accel_read(context, options)?))
    }

    #[inline(always)]
    fn accel_wire_kind(options: &FieldOptions) -> WireKind {
        T::accel_wire_kind(options)
    }

    #[inline(always)]
    fn accel_shape() -> TypeShape {
        TypeShape::Nullable
    }

    #[inline(always)]
    fn accel_is_none(&self) -> bool {
        self.is_none()
    }

    #[inline(always)]
    fn accel_reserved_space() -> usize {
        T::accel_reserved_space()
    }

    #[inline(always)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl<T> AccelDefault for Option<T> {
    #[inline(always)]
    fn accel_default() -> Self {
        None
    }
}
