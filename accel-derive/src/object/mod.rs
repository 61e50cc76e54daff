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

mod field_meta;
mod read;
mod serializer;
mod write;

pub use serializer::derive_serializer;

use crate::util::SourceField;
use field_meta::{AccelFieldMeta, NumberFormat, TextEncoding};
use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

/// A serialized field with its parsed attributes. Slots are positions in
/// the list sorted by serial index.
pub struct StructField<'a> {
    pub source: &'a SourceField<'a>,
    pub meta: &'a AccelFieldMeta,
    pub index: u32,
}

impl<'a> StructField<'a> {
    #[inline]
    pub fn ty(&self) -> &'a Type {
        &self.source.field.ty
    }

    /// The type that goes on the wire: the facade when there is one.
    pub fn wire_ty(&self) -> &Type {
        self.meta.facade.as_ref().unwrap_or(&self.source.field.ty)
    }

    pub fn options(&self) -> TokenStream {
        let number = match self.meta.number {
            NumberFormat::Fixed => quote! { accel_core::types::NumberFormat::Fixed },
            NumberFormat::Variant => quote! { accel_core::types::NumberFormat::Variant },
        };
        let encoding = match self.meta.encoding {
            TextEncoding::Utf8 => quote! { accel_core::types::TextEncoding::Utf8 },
            TextEncoding::Unicode => quote! { accel_core::types::TextEncoding::Unicode },
            TextEncoding::Ascii => quote! { accel_core::types::TextEncoding::Ascii },
        };
        quote! { accel_core::types::FieldOptions::new(#number, #encoding) }
    }
}
