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

macro_rules! impl_integer_serializer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serializer for $ty {
                #[inline(always)]
                fn accel_write(&self, context: &mut WriteContext, options: &FieldOptions) -> Result<(), Error> {
                    context.writer.write_integer(*self, options.number);
                    Ok(())
                }

                #[inline(always)]
                fn accel_read(context: &mut ReadContext, _: &FieldOptions) -> Result<Self, Error> {
                    context.reader.read_integer::<$ty>()
                }

                #[inline(always)]
                fn accel_wire_kind(options: &FieldOptions) -> WireKind {
                    WireKind::integer(<$ty>::BITS as u8, options.number)
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
                    0
                }
            }
        )*
    };
}

impl_integer_serializer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use crate::buffer::{Reader, Writer};
    use crate::config::Config;
    use crate::resolver::context::{ReadContext, WriteContext};
    use crate::resolver::type_registry::TypeRegistry;
    use crate::serializer::Serializer;
    use crate::types::{Endian, FieldOptions, NumberFormat, TextEncoding, WireKind};

    #[test]
    fn variant_option_shrinks_the_payload() {
        let registry = TypeRegistry::new();
        let config = Config::default();
        let variant = FieldOptions::new(NumberFormat::Variant, TextEncoding::Utf8);
        let mut writer = Writer::default();
        let mut context = WriteContext::new(&registry, &config, &mut writer);
        100u64.accel_write(&mut context, &variant).unwrap();
        1000u64.accel_write(&mut context, &variant).unwrap();
        100u64.accel_write(&mut context, &FieldOptions::DEFAULT).unwrap();
        let bytes = writer.to_owned_bytes();
        assert_eq!(&bytes[..5], &[0x01, 100, 0x02, 0xE8, 0x03]);
        assert_eq!(bytes[5], 0x08);
        assert_eq!(bytes.len(), 5 + 9);

        let mut context = ReadContext::new(&registry, &config, Reader::new(&bytes, Endian::Little));
        assert_eq!(u64::accel_read(&mut context, &variant).unwrap(), 100);
        assert_eq!(u64::accel_read(&mut context, &variant).unwrap(), 1000);
        assert_eq!(u64::accel_read(&mut context, &FieldOptions::DEFAULT).unwrap(), 100);
    }

    #[test]
    fn wire_kind_follows_the_number_option() {
        let variant = FieldOptions::new(NumberFormat::Variant, TextEncoding::Utf8);
        assert_eq!(i32::accel_wire_kind(&FieldOptions::DEFAULT), WireKind::FixedInt(32));
        assert_eq!(u128::accel_wire_kind(&FieldOptions::DEFAULT), WireKind::FixedInt(128));
        assert_eq!(i16::accel_wire_kind(&variant), WireKind::VariantInt);
    }
}
