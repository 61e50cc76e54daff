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

use super::field_meta::AccelFieldMeta;
use super::StructField;
use crate::util::SourceField;
use proc_macro2::TokenStream;
use quote::quote;

pub fn gen_read_field(fields: &[StructField]) -> TokenStream {
    let arms = fields.iter().enumerate().map(|(slot, field)| {
        let member = &field.source.member;
        let name = &field.source.field_name;
        let ty = field.ty();
        let options = field.options();
        match &field.meta.facade {
            None => quote! {
                #slot => {
                    self.#member = accel_core::serializer::read_field::<#ty>(context, &#options, #name)?;
                    Ok(())
                }
            },
            Some(wire) => quote! {
                #slot => {
                    let wire = accel_core::serializer::read_field::<#wire>(context, &#options, #name)?;
                    self.#member = <#ty as accel_core::serializer::Facade<#wire>>::from_facade(wire)?;
                    Ok(())
                }
            },
        }
    });
    quote! {
        match slot {
            #(#arms)*
            _ => Err(accel_core::error::Error::invalid_data(format!(
                "{} has no field slot {}",
                std::any::type_name::<Self>(),
                slot
            ))),
        }
    }
}

/// Field initializers of the generated `accel_default`.
///
/// Serialized fields take their `AccelDefault`; skipped and facade fields
/// fall back to `Default`.
pub fn gen_default_inits(parsed: &[(SourceField, AccelFieldMeta)]) -> Vec<TokenStream> {
    parsed
        .iter()
        .map(|(source, meta)| {
            let ty = &source.field.ty;
            let value = if meta.skip || meta.facade.is_some() {
                quote! { <#ty as ::core::default::Default>::default() }
            } else {
                quote! { <#ty as accel_core::serializer::AccelDefault>::accel_default() }
            };
            source.field_init(value)
        })
        .collect()
}
