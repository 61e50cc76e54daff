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

//! # Accel Core
//!
//! This is the core implementation of the Accel binary serialization engine.
//! It turns typed field values into a dense, self-describing byte stream and
//! back, without a global envelope and without per-call heap churn.
//!
//! ## Architecture
//!
//! The core library is organized into several key modules:
//!
//! - **`accel`**: Main serialization entry point and public API
//! - **`meta`**: One-byte tags, text codecs and per-type field descriptors
//! - **`memory`**: Slab allocator and the native regions it backs
//! - **`buffer`**: Record-level `Writer` and `Reader`
//! - **`resolver`**: Type registry, field dispatch and encode/decode contexts
//! - **`serializer`**: Encodings of built-in types
//! - **`types`**: Categories, wire kinds and encoding options
//! - **`error`**: Error handling and result types
//!
//! ## Wire format
//!
//! Every value is a record `[VarUint serial_index]? tag payload?`. The tag
//! byte names a width category and flags default and inline values, so a
//! zero, `false` or empty value costs a single byte and any record can be
//! skipped without knowing its type. Struct fields carry their serial index,
//! which lets older readers skip fields they do not know.
//!
//! ```rust
//! use accel_core::buffer::Reader;
//! use accel_core::{Accel, Endian};
//!
//! let accel = Accel::default();
//! let bytes = accel.serialize(&300i32).unwrap();
//! assert_eq!(bytes, vec![0x04, 0x2C, 0x01, 0x00, 0x00]);
//! assert_eq!(accel.deserialize::<i32>(&bytes).unwrap(), 300);
//!
//! let mut reader = Reader::new(&bytes, Endian::Little);
//! reader.skip_next().unwrap();
//! assert!(reader.is_exhausted());
//! ```

pub mod accel;
pub mod buffer;
pub mod config;
pub mod error;
pub mod memory;
pub mod meta;
pub mod resolver;
pub mod serializer;
pub mod types;
pub mod util;

pub use accel::Accel;
pub use config::Config;
pub use error::Error;
pub use memory::{free_all_available_memory, SlabAllocator};
pub use meta::{FieldSchema, Tag, TypeDescriptor};
pub use resolver::context::{ReadContext, WriteContext};
pub use resolver::type_registry::{Harness, TypeBinding, TypeRegistry};
pub use serializer::{AccelDefault, Facade, Serializer, StructSerializer, TypeOptions};
pub use types::{Category, Endian, FieldOptions, Float128, NumberFormat, TextEncoding, TypeShape, WireKind};
