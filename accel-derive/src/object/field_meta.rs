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

//! Parsing of `#[accel(...)]` attributes on fields and on the struct itself.

use crate::util::{extract_option_inner_type, SourceField};
use std::collections::HashMap;
use syn::{Attribute, Path, Type};

/// Largest serial index a field may carry.
const MAX_SERIAL_INDEX: u32 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Fixed,
    Variant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Unicode,
    Ascii,
}

/// Represents parsed `#[accel(...)]` field attributes
#[derive(Clone, Default)]
pub struct AccelFieldMeta {
    pub index: Option<u32>,
    pub number: NumberFormat,
    pub encoding: TextEncoding,
    /// None = decided by the field type (`Option<T>` is nullable)
    pub nullable: Option<bool>,
    pub facade: Option<Type>,
    pub skip: bool,
}

impl AccelFieldMeta {
    pub fn effective_nullable(&self, ty: &Type) -> bool {
        self.nullable
            .unwrap_or_else(|| extract_option_inner_type(ty).is_some())
    }
}

/// Parse `#[accel(...)]` attributes from a field
pub fn parse_field_meta(source: &SourceField) -> syn::Result<AccelFieldMeta> {
    let mut meta = AccelFieldMeta::default();
    let mut number_set = false;

    for attr in &source.field.attrs {
        if !attr.path().is_ident("accel") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("index") {
                let lit: syn::LitInt = nested.value()?.parse()?;
                let index: u32 = lit.base10_parse()?;
                if index == 0 || index > MAX_SERIAL_INDEX {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("index must be in 1..={}", MAX_SERIAL_INDEX),
                    ));
                }
                meta.index = Some(index);
            } else if nested.path.is_ident("fixed") || nested.path.is_ident("variant") {
                if number_set {
                    return Err(nested.error("`fixed` and `variant` are mutually exclusive"));
                }
                number_set = true;
                meta.number = if nested.path.is_ident("fixed") {
                    NumberFormat::Fixed
                } else {
                    NumberFormat::Variant
                };
            } else if nested.path.is_ident("encoding") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                meta.encoding = match lit.value().to_ascii_lowercase().as_str() {
                    "utf8" | "utf-8" => TextEncoding::Utf8,
                    "unicode" | "utf16" | "utf-16" => TextEncoding::Unicode,
                    "ascii" => TextEncoding::Ascii,
                    other => {
                        return Err(syn::Error::new(
                            lit.span(),
                            format!("unknown text encoding `{}`", other),
                        ))
                    }
                };
            } else if nested.path.is_ident("nullable") {
                meta.nullable = Some(parse_bool_or_flag(&nested)?);
            } else if nested.path.is_ident("facade") {
                meta.facade = Some(nested.value()?.parse()?);
            } else if nested.path.is_ident("skip") {
                meta.skip = true;
            } else {
                return Err(nested.error("unsupported accel field attribute"));
            }
            Ok(())
        })?;
    }

    if meta.index.is_none() && !meta.skip {
        return Err(syn::Error::new_spanned(
            source.field,
            format!(
                "field `{}` needs #[accel(index = N)] or #[accel(skip)]",
                source.field_name
            ),
        ));
    }
    Ok(meta)
}

/// Parse a boolean value or treat standalone flag as true
fn parse_bool_or_flag(meta: &syn::meta::ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
        Ok(true)
    } else {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    }
}

/// Validates that serial indices are unique within a struct
pub fn validate_field_metas(fields: &[(SourceField, AccelFieldMeta)]) -> syn::Result<()> {
    let mut index_to_field: HashMap<u32, &str> = HashMap::new();

    for (source, meta) in fields {
        let Some(index) = meta.index.filter(|_| !meta.skip) else {
            continue;
        };
        if let Some(existing) = index_to_field.get(&index) {
            return Err(syn::Error::new_spanned(
                source.field,
                format!(
                    "duplicate accel index={} on fields '{}' and '{}'",
                    index, existing, source.field_name
                ),
            ));
        }
        index_to_field.insert(index, &source.field_name);
    }

    Ok(())
}

/// Represents parsed `#[accel(...)]` struct attributes
#[derive(Default)]
pub struct AccelTypeAttrs {
    pub strict: bool,
    pub initial_size: Option<u32>,
    pub before_serialize: Option<Path>,
    pub after_deserialize: Option<Path>,
    pub no_default: bool,
}

pub fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<AccelTypeAttrs> {
    let mut result = AccelTypeAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("accel") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("strict") {
                result.strict = parse_bool_or_flag(&nested)?;
            } else if nested.path.is_ident("initial_size") {
                let lit: syn::LitInt = nested.value()?.parse()?;
                result.initial_size = Some(lit.base10_parse()?);
            } else if nested.path.is_ident("before_serialize") {
                result.before_serialize = Some(nested.value()?.parse()?);
            } else if nested.path.is_ident("after_deserialize") {
                result.after_deserialize = Some(nested.value()?.parse()?);
            } else if nested.path.is_ident("no_default") {
                result.no_default = true;
            } else {
                return Err(nested.error("unsupported accel struct attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
