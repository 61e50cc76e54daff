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

use crate::ensure;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Serializer;
use crate::types::FieldOptions;

/// Upper bound on the bytes reserved up front for one collection.
const MAX_RESERVE: usize = 4096;

/// Writes `iter` as `LengthPrefixed, byte length, count, elements`, or the
/// default tag when `len` is zero.
pub fn write_elements<'a, T, I>(
    iter: I,
    len: usize,
    context: &mut WriteContext,
    options: &FieldOptions,
) -> Result<(), Error>
where
    T: Serializer + 'a,
    I: IntoIterator<Item = &'a T>,
{
    if len == 0 {
        context.writer.write_default();
        return Ok(());
    }
    let count = u32::try_from(len)
        .map_err(|_| Error::not_supported(format!("collection of {} elements", len)))?;
    let size_hint = (T::accel_reserved_space().max(1) * len + 5).min(MAX_RESERVE);
    context.write_nested_sized(size_hint, |context| {
        context.writer.write_var_uint32(count);
        for item in iter {
            item.accel_write(context, options)?;
        }
        Ok(())
    })
}

/// Reads a collection written by [`write_elements`]. Null and default
/// records decode as an empty collection.
pub fn read_elements<T, C>(context: &mut ReadContext, options: &FieldOptions) -> Result<C, Error>
where
    T: Serializer,
    C: FromIterator<T>,
{
    context.read_nested(|context| {
        let count = read_count(context)?;
        (0..count).map(|_| T::accel_read(context, options)).collect()
    })
}

/// Element count of the current nested range; zero when it is empty.
///
/// Every element takes at least its tag byte, so a count larger than the
/// remaining range is rejected before anything is allocated.
pub(crate) fn read_count(context: &mut ReadContext) -> Result<usize, Error> {
    if context.reader.is_exhausted() {
        return Ok(0);
    }
    let count = context.reader.read_var_uint32()? as usize;
    ensure!(
        count <= context.reader.remaining(),
        "element count {} exceeds the {} remaining bytes",
        count,
        context.reader.remaining()
    );
    Ok(count)
}
