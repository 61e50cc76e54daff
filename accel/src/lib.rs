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

//! # Accel
//!
//! Accel is a compact, self-describing binary serialization engine. Every
//! value becomes a record of a one-byte tag and a payload sized by that
//! tag, so defaults cost one byte and unknown fields can be skipped without
//! their type.
//!
//! ## Key Features
//!
//! - **Dense encoding**: zero, `false` and empty values collapse into the tag
//! - **Schema evolution**: fields carry serial indices; readers skip the ones they do not know
//! - **Pooled buffers**: writers draw their storage from a slab allocator
//! - **Derive-driven**: `#[derive(AccelObject)]` generates the field schema and dispatch
//!
//! ```rust
//! use accel::{Accel, AccelObject, Error};
//!
//! #[derive(AccelObject, Debug, PartialEq)]
//! struct Person {
//!     #[accel(index = 1)]
//!     name: String,
//!     #[accel(index = 2, variant)]
//!     age: i32,
//!     #[accel(index = 3)]
//!     address: Option<Address>,
//!     #[accel(index = 4)]
//!     hobbies: Vec<String>,
//! }
//!
//! #[derive(AccelObject, Debug, PartialEq)]
//! struct Address {
//!     #[accel(index = 1)]
//!     street: String,
//!     #[accel(index = 2)]
//!     city: String,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let person = Person {
//!     name: "John Doe".to_string(),
//!     age: 30,
//!     address: Some(Address {
//!         street: "123 Main St".to_string(),
//!         city: "New York".to_string(),
//!     }),
//!     hobbies: vec!["reading".to_string(), "coding".to_string()],
//! };
//!
//! let accel = Accel::default();
//! let bytes = accel.serialize(&person)?;
//! let decoded: Person = accel.deserialize(&bytes)?;
//! assert_eq!(person, decoded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Field attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `index = N` | Serial index written before the field, unique and non-zero |
//! | `fixed` / `variant` | Integer payload at declared width, or the smallest width that fits |
//! | `encoding = "utf8" \| "unicode" \| "ascii"` | Text encoding of `String` and `char` fields |
//! | `nullable` | Marks the field nullable in its schema; `Option<T>` fields are nullable already |
//! | `facade = W` | Writes the field as `W` through `Into` and `TryInto` |
//! | `skip` | Leaves the field out of the stream |
//!
//! ## Schema evolution
//!
//! Fields written by a newer version of a type are skipped by an older
//! reader, and fields the writer did not know keep their default. Types
//! marked `#[accel(strict)]`, or an [`Accel`] built with `.strict(true)`,
//! reject unknown indices instead.
//!
//! ```rust
//! use accel::{Accel, AccelObject};
//!
//! #[derive(AccelObject, Debug, PartialEq)]
//! struct V1 {
//!     #[accel(index = 1)]
//!     id: u32,
//! }
//!
//! #[derive(AccelObject, Debug, PartialEq)]
//! struct V2 {
//!     #[accel(index = 1)]
//!     id: u32,
//!     #[accel(index = 2)]
//!     label: String,
//! }
//!
//! let accel = Accel::default();
//! let bytes = accel
//!     .serialize(&V2 { id: 7, label: "new".to_string() })
//!     .unwrap();
//! assert_eq!(accel.deserialize::<V1>(&bytes).unwrap(), V1 { id: 7 });
//! assert!(Accel::default()
//!     .strict(true)
//!     .deserialize::<V1>(&bytes)
//!     .is_err());
//! ```

pub use accel_core::{
    accel::Accel, buffer::Reader, buffer::Writer, config::Config, error::Error,
    free_all_available_memory, meta::FieldSchema, meta::TypeDescriptor, types::Endian,
    types::FieldOptions, types::NumberFormat, types::TextEncoding, AccelDefault, Facade,
    ReadContext, Serializer, SlabAllocator, StructSerializer, WriteContext,
};
pub use accel_derive::AccelObject;
