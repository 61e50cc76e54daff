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

//! # Accel Derive Macros
//!
//! This crate provides the procedural macro for the Accel serialization
//! engine. It generates, at compile time, the field schema of a struct and
//! the per-field encode/decode procedures the type registry dispatches to.
//!
//! ## `#[derive(AccelObject)]`
//!
//! Every serialized field carries a stable serial index. Indices must be
//! unique, non-zero and at most `2^28`; they do not have to be contiguous.
//!
//! **Field attributes:**
//! - `index = N`: serial index of the field (required unless `skip`)
//! - `fixed` / `variant`: integer layout, full declared width or smallest width (default `fixed`)
//! - `encoding = "utf8" | "unicode" | "ascii"`: text encoding of strings and chars (default `utf8`)
//! - `nullable`: record the field as nullable; `Option<T>` fields are nullable already
//! - `facade = Type`: convert through `Type` before encoding and back after decoding
//! - `skip`: leave the field out of the wire format
//!
//! **Struct attributes:**
//! - `strict`: reject unknown serial indices instead of skipping them
//! - `initial_size = N`: writer size hint for one value of the type (default 20)
//! - `before_serialize = path`: called with `&Self` before the fields are written
//! - `after_deserialize = path`: called with `&mut Self` once every field was read
//! - `no_default`: do not generate `AccelDefault`; decoding then fails with `NotSupported`
//!
//! **Example:**
//! ```rust, ignore
//! use accel::AccelObject;
//!
//! #[derive(AccelObject, Debug, PartialEq)]
//! #[accel(initial_size = 32)]
//! struct Person {
//!     #[accel(index = 1, encoding = "unicode")]
//!     name: String,
//!     #[accel(index = 2, variant)]
//!     age: i32,
//!     #[accel(index = 4)]
//!     address: Option<Address>,
//! }
//!
//! #[derive(AccelObject, Debug, PartialEq)]
//! struct Address {
//!     #[accel(index = 1)]
//!     street: String,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derive macro for descriptor-driven struct serialization.
///
/// Implements `Serializer`, `StructSerializer` and, unless `no_default` is
/// given, `AccelDefault` for the annotated struct.
#[proc_macro_derive(AccelObject, attributes(accel))]
pub fn proc_macro_derive_accel_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_serializer(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
