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

use crate::meta::TypeDescriptor;

/// Maps a serial index read off the wire to the field's slot in its
/// descriptor.
///
/// Contiguous indices use a jump table keyed by `index - first`; sparse
/// indices fall back to a binary search over the sorted index list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldDispatch {
    Table { first: u32, len: u32 },
    Chain { indices: Box<[u32]> },
}

impl FieldDispatch {
    pub fn build(descriptor: &TypeDescriptor) -> FieldDispatch {
        match descriptor.first_index() {
            Some(first) if descriptor.is_index_contiguous() => FieldDispatch::Table {
                first,
                len: descriptor.fields().len() as u32,
            },
            None => FieldDispatch::Table { first: 1, len: 0 },
            Some(_) => FieldDispatch::Chain {
                indices: descriptor.fields().iter().map(|f| f.serial_index).collect(),
            },
        }
    }

    #[inline(always)]
    pub fn slot_of(&self, serial_index: u32) -> Option<usize> {
        match self {
            FieldDispatch::Table { first, len } => {
                let offset = serial_index.checked_sub(*first)?;
                (offset < *len).then_some(offset as usize)
            }
            FieldDispatch::Chain { indices } => indices.binary_search(&serial_index).ok(),
        }
    }

    #[inline(always)]
    pub fn is_table(&self) -> bool {
        matches!(self, FieldDispatch::Table { .. })
    }
}
