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

use super::StructField;
use proc_macro2::TokenStream;
use quote::quote;

pub fn gen_write_field(fields: &[StructField]) -> TokenStream {
    let arms = fields.iter().enumerate().map(|(slot, field)| {
        let member = &field.source.member;
        let ty = field.ty();
        let options = field.options();
        let never_null = gen_never_null_check(field);
        match &field.meta.facade {
            None => quote! {
                #slot => {
                    let value = &self.#member;
                    #never_null
                    <#ty as accel_core::serializer::Serializer>::accel_write(value, context, &#options)
                }
            },
            Some(wire) => quote! {
                #slot => {
                    let wire = <#ty as accel_core::serializer::Facade<#wire>>::to_facade(&self.#member);
                    let value = &wire;
                    #never_null
                    <#wire as accel_core::serializer::Serializer>::accel_write(value, context, &#options)
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

/// `#[accel(nullable = false)]` turns a `None` into an encode error instead of a null record.
fn gen_never_null_check(field: &StructField) -> TokenStream {
    if field.meta.nullable != Some(false) {
        return quote! {};
    }
    let name = &field.source.field_name;
    quote! {
        if accel_core::serializer::Serializer::accel_is_none(value) {
            return Err(accel_core::error::Error::invalid_data(format!(
                "{}.{} is declared non-nullable but holds no value",
                std::any::type_name::<Self>(),
                #name
            )));
        }
    }
}

pub fn gen_field_schemas(fields: &[StructField]) -> TokenStream {
    let schemas = fields.iter().map(|field| {
        let name = &field.source.field_name;
        let index = field.index;
        let wire_ty = field.wire_ty();
        let options = field.options();
        let nullable = field.meta.effective_nullable(field.ty());
        let facade = field.meta.facade.as_ref().map(|wire| {
            quote! {
                .facade(<#wire as accel_core::serializer::Serializer>::accel_wire_kind(&#options))
            }
        });
        quote! {
            accel_core::meta::FieldSchema::new(
                #name,
                #index,
                <#wire_ty as accel_core::serializer::Serializer>::accel_wire_kind(&#options),
            )
            .nullable(#nullable)
            .shape(<#wire_ty as accel_core::serializer::Serializer>::accel_shape())
            #facade
        }
    });
    quote! {
        vec![#(#schemas),*]
    }
}
