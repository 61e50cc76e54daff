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

use crate::config::DEFAULT_INITIAL_BUFFER_SIZE;
use crate::error::Error;
use crate::types::{TypeShape, WireKind};
use std::borrow::Cow;

/// Largest serial index a field may carry.
pub const MAX_SERIAL_INDEX: u32 = 1 << 28;

/// Static description of one serializable field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldSchema {
    /// Rust field name, diagnostics only.
    pub name: &'static str,
    pub serial_index: u32,
    pub wire_kind: WireKind,
    pub nullable: bool,
    /// Set when the field is converted through a facade type before encoding.
    pub facade_kind: Option<WireKind>,
    pub shape: TypeShape,
}

impl FieldSchema {
    pub fn new(name: &'static str, serial_index: u32, wire_kind: WireKind) -> FieldSchema {
        FieldSchema {
            name,
            serial_index,
            wire_kind,
            nullable: false,
            facade_kind: None,
            shape: TypeShape::Primitive,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn facade(mut self, kind: WireKind) -> Self {
        self.facade_kind = Some(kind);
        self
    }

    pub fn shape(mut self, shape: TypeShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Immutable, validated field list of one type, sorted by serial index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    type_name: Cow<'static, str>,
    fields: Vec<FieldSchema>,
    is_index_contiguous: bool,
    approx_byte_size: u32,
    strict: bool,
}

impl TypeDescriptor {
    /// Sorts `fields` and rejects zero, oversized or repeated serial indices.
    pub fn new<S: Into<Cow<'static, str>>>(
        type_name: S,
        mut fields: Vec<FieldSchema>,
    ) -> Result<TypeDescriptor, Error> {
        let type_name = type_name.into();
        fields.sort_by_key(|f| f.serial_index);
        for field in &fields {
            if field.serial_index == 0 || field.serial_index > MAX_SERIAL_INDEX {
                return Err(Error::invalid_data(format!(
                    "field `{}` of {} has serial index {}, expected 1..={}",
                    field.name, type_name, field.serial_index, MAX_SERIAL_INDEX
                )));
            }
        }
        if let Some(pair) = fields
            .windows(2)
            .find(|w| w[0].serial_index == w[1].serial_index)
        {
            return Err(Error::invalid_data(format!(
                "fields `{}` and `{}` of {} share serial index {}",
                pair[0].name, pair[1].name, type_name, pair[0].serial_index
            )));
        }
        let is_index_contiguous = match (fields.first(), fields.last()) {
            (Some(first), Some(last)) => {
                (last.serial_index - first.serial_index) as usize + 1 == fields.len()
            }
            _ => true,
        };
        Ok(TypeDescriptor {
            type_name,
            fields,
            is_index_contiguous,
            approx_byte_size: DEFAULT_INITIAL_BUFFER_SIZE as u32,
            strict: false,
        })
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_approx_byte_size(mut self, size: u32) -> Self {
        self.approx_byte_size = size;
        self
    }

    #[inline(always)]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline(always)]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    #[inline(always)]
    pub fn is_index_contiguous(&self) -> bool {
        self.is_index_contiguous
    }

    #[inline(always)]
    pub fn approx_byte_size(&self) -> u32 {
        self.approx_byte_size
    }

    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn first_index(&self) -> Option<u32> {
        self.fields.first().map(|f| f.serial_index)
    }

    pub fn field(&self, serial_index: u32) -> Option<&FieldSchema> {
        self.fields
            .binary_search_by_key(&serial_index, |f| f.serial_index)
            .ok()
            .map(|pos| &self.fields[pos])
    }
}
