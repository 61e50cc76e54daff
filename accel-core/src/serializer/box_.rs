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

impl<T: Serializer> Serializer for Box<T> {
    fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
        T::accel_write(self.as_ref(), context, options)
    }

    fn accel_read(context: &mut ReadContext, options: &FieldOptions) -> Result<Self, Error> {
        Ok(Box::new(T::accel_read(context, options)?))
    }

    fn accel_wire_kind(options: &FieldOptions) -> WireKind {
        T::accel_wire_kind(options)
    }

    /// A boxed struct is written as one nested record rather than a bare field stream.
    fn accel_shape() -> TypeShape {
        match T::accel_shape() {
            TypeShape::Struct => TypeShape::Primitive,
            shape => shape,
        }
    }

    fn accel_reserved_space() -> usize {
        T::accel_reserved_space()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl<T: AccelDefault> AccelDefault for Box<T> {
    fn accel_default() -> Self {
        Box::new(T::accel_default())
    }
}
