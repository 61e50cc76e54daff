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

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Field, Fields, GenericArgument, Index, Member, PathArguments, Type};

/// Source field with its member and display name preserved.
///
/// For tuple structs, the member is the position (`self.0`) and the name is
/// that position as a string.
#[derive(Clone)]
pub struct SourceField<'a> {
    pub member: Member,
    pub field: &'a Field,
    pub field_name: String,
}

impl<'a> SourceField<'a> {
    /// `member: value` for struct construction; tuple structs use the member
    /// index, which is valid in brace syntax too.
    pub fn field_init(&self, value: TokenStream) -> TokenStream {
        let member = &self.member;
        quote! { #member: #value }
    }
}

pub fn source_fields(fields: &Fields) -> Vec<SourceField<'_>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| match &field.ident {
            Some(ident) => SourceField {
                member: Member::Named(ident.clone()),
                field,
                field_name: ident.to_string(),
            },
            None => SourceField {
                member: Member::Unnamed(Index::from(idx)),
                field,
                field_name: idx.to_string(),
            },
        })
        .collect()
}

/// Extract the outer type name from a type (e.g., "Option" from `Option<String>`)
pub fn extract_outer_type_name(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|seg| seg.ident.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Extract the inner type from `Option<T>`
pub fn extract_option_inner_type(ty: &Type) -> Option<&Type> {
    if extract_outer_type_name(ty) != "Option" {
        return None;
    }
    let Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    match &seg.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner_ty)) => Some(inner_ty),
            _ => None,
        },
        _ => None,
    }
}
