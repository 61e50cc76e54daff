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

use super::field_meta::{parse_field_meta, parse_type_attrs, validate_field_metas, AccelFieldMeta};
use super::{read, write, StructField};
use crate::util::{source_fields, SourceField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput};

/// Default writer reservation for a struct without `#[accel(initial_size)]`.
const DEFAULT_INITIAL_SIZE: u32 = 20;

pub fn derive_serializer(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let fields = match &ast.data {
        Data::Struct(s) => &s.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "AccelObject can only be derived for structs",
            ))
        }
    };
    let type_attrs = parse_type_attrs(&ast.attrs)?;

    let sources = source_fields(fields);
    let parsed = sources
        .into_iter()
        .map(|source| parse_field_meta(&source).map(|meta| (source, meta)))
        .collect::<syn::Result<Vec<(SourceField, AccelFieldMeta)>>>()?;
    validate_field_metas(&parsed)?;

    let mut serialized: Vec<StructField> = parsed
        .iter()
        .filter(|(_, meta)| !meta.skip)
        .filter_map(|(source, meta)| {
            meta.index.map(|index| StructField {
                source,
                meta,
                index,
            })
        })
        .collect();
    serialized.sort_by_key(|field| field.index);

    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let strict = type_attrs.strict;
    let initial_size = type_attrs.initial_size.unwrap_or(DEFAULT_INITIAL_SIZE);
    let reserved_space = initial_size as usize;
    let field_schemas = write::gen_field_schemas(&serialized);
    let write_field = write::gen_write_field(&serialized);
    let read_field = read::gen_read_field(&serialized);

    let construct = if type_attrs.no_default {
        quote! { None }
    } else {
        quote! { Some(<Self as accel_core::serializer::AccelDefault>::accel_default()) }
    };
    let before_serialize = type_attrs.before_serialize.as_ref().map(|path| {
        quote! {
            fn accel_before_serialize(&self) {
                #path(self)
            }
        }
    });
    let after_deserialize = type_attrs.after_deserialize.as_ref().map(|path| {
        quote! {
            fn accel_after_deserialize(&mut self) {
                #path(self)
            }
        }
    });

    let default_impl = if type_attrs.no_default {
        quote! {}
    } else {
        let inits = read::gen_default_inits(&parsed);
        quote! {
            impl #impl_generics accel_core::serializer::AccelDefault for #name #ty_generics #where_clause {
                fn accel_default() -> Self {
                    Self {
                        #(#inits),*
                    }
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics accel_core::serializer::Serializer for #name #ty_generics #where_clause {
            #[inline(always)]
            fn accel_write(
                &self,
                context: &mut accel_core::resolver::context::WriteContext,
                _: &accel_core::types::FieldOptions,
            ) -> Result<(), accel_core::error::Error> {
                accel_core::serializer::struct_::write_nested::<Self>(self, context)
            }

            #[inline(always)]
            fn accel_read(
                context: &mut accel_core::resolver::context::ReadContext,
                _: &accel_core::types::FieldOptions,
            ) -> Result<Self, accel_core::error::Error> {
                accel_core::serializer::struct_::read_nested::<Self>(context)
            }

            fn accel_wire_kind(_: &accel_core::types::FieldOptions) -> accel_core::types::WireKind {
                accel_core::types::WireKind::Complex
            }

            fn accel_shape() -> accel_core::types::TypeShape {
                accel_core::types::TypeShape::Struct
            }

            fn accel_reserved_space() -> usize {
                #reserved_space
            }

            fn accel_struct_binding() -> Option<Result<
                accel_core::resolver::type_registry::TypeBinding,
                accel_core::error::Error,
            >> {
                Some(accel_core::resolver::type_registry::TypeBinding::for_struct::<Self>())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        impl #impl_generics accel_core::serializer::StructSerializer for #name #ty_generics #where_clause {
            fn accel_fields() -> Vec<accel_core::meta::FieldSchema> {
                #field_schemas
            }

            fn accel_type_options() -> accel_core::serializer::TypeOptions {
                accel_core::serializer::TypeOptions {
                    strict: #strict,
                    initial_size: #initial_size,
                }
            }

            fn accel_construct() -> Option<Self> {
                #construct
            }

            fn accel_write_field(
                &self,
                slot: usize,
                context: &mut accel_core::resolver::context::WriteContext,
            ) -> Result<(), accel_core::error::Error> {
                #write_field
            }

            fn accel_read_field(
                &mut self,
                slot: usize,
                context: &mut accel_core::resolver::context::ReadContext,
            ) -> Result<(), accel_core::error::Error> {
                #read_field
            }

            #before_serialize
            #after_deserialize
        }

        #default_impl
    })
}
