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

mod test_helpers;

use accel::{Accel, AccelObject, Error, FieldSchema, TextEncoding, TypeDescriptor};
use accel_core::resolver::context::{ReadContext, WriteContext};
use accel_core::resolver::type_registry::{downcast_value, TypeBinding};
use accel_core::types::WireKind;
use std::any::{Any, TypeId};
use test_helpers::init_tracing;

/// A type with no derive, bound by hand the way a schema compiler would.
#[derive(Debug, PartialEq)]
struct Reading {
    sensor: String,
    celsius: f64,
}

fn reading_descriptor() -> TypeDescriptor {
    TypeDescriptor::new(
        "Reading",
        vec![
            FieldSchema::new("sensor", 1, WireKind::String(TextEncoding::Utf8)),
            FieldSchema::new("celsius", 2, WireKind::Float64),
        ],
    )
    .unwrap()
}

fn encode_reading(
    value: &dyn Any,
    context: &mut WriteContext,
    _: &TypeBinding,
) -> Result<(), Error> {
    let reading = downcast_value::<Reading>(value)?;
    context.writer.write_index(1);
    context.writer.write_str(&reading.sensor, TextEncoding::Utf8);
    context.writer.write_index(2);
    context.writer.write_f64(reading.celsius);
    Ok(())
}

fn decode_reading(context: &mut ReadContext, _: &TypeBinding) -> Result<Box<dyn Any>, Error> {
    let mut sensor = String::new();
    let mut celsius = 0.0;
    while let Some(index) = context.reader.next_index()? {
        match index {
            1 => sensor = context.reader.read_string(TextEncoding::Utf8)?,
            2 => celsius = context.reader.read_f64()?,
            _ => context.reader.skip_next()?,
        }
    }
    Ok(Box::new(Reading { sensor, celsius }))
}

#[test]
fn test_manual_registration() {
    init_tracing();
    let accel = Accel::default();
    assert!(!accel.is_registered::<Reading>());
    accel
        .register::<Reading>(reading_descriptor(), encode_reading, decode_reading)
        .unwrap();
    assert!(accel.has_binding(TypeId::of::<Reading>()));
    assert_eq!(accel.fields_of::<Reading>().unwrap().fields().len(), 2);

    let reading = Reading {
        sensor: "t1".to_string(),
        celsius: -4.5,
    };
    let bytes = accel.serialize_registered(&reading).unwrap();
    assert_eq!(&bytes[..5], &[0x01, 0x0F, 0x02, b't', b'1']);
    assert_eq!(accel.deserialize_registered::<Reading>(&bytes).unwrap(), reading);
}

#[test]
fn test_unregistered_type_is_reported() {
    let accel = Accel::default();
    let err = accel.serialize_registered(&Reading {
        sensor: String::new(),
        celsius: 1.0,
    });
    assert!(matches!(err, Err(Error::UnregisteredType(_))));
}

#[test]
fn test_duplicate_registration() {
    let accel = Accel::default();
    accel
        .register::<Reading>(reading_descriptor(), encode_reading, decode_reading)
        .unwrap();
    accel
        .register::<Reading>(reading_descriptor(), encode_reading, decode_reading)
        .unwrap();

    let narrower = TypeDescriptor::new(
        "Reading",
        vec![FieldSchema::new("sensor", 1, WireKind::String(TextEncoding::Utf8))],
    )
    .unwrap();
    let err = accel
        .register::<Reading>(narrower, encode_reading, decode_reading)
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateRegistration(_)));
}

#[derive(AccelObject, Debug, PartialEq)]
#[accel(initial_size = 64)]
struct Frame {
    #[accel(index = 1)]
    seq: u32,
    #[accel(index = 2)]
    body: Vec<u8>,
}

#[test]
fn test_struct_registration() {
    let accel = Accel::default();
    accel.register_struct::<Frame>().unwrap();
    accel.register_struct::<Frame>().unwrap();
    let descriptor = accel.fields_of::<Frame>().unwrap();
    assert_eq!(descriptor.approx_byte_size(), 64);
    assert!(descriptor.is_index_contiguous());
    assert!(!descriptor.is_strict());

    let frame = Frame {
        seq: 1,
        body: vec![0xFF; 3],
    };
    let bytes = accel.serialize(&frame).unwrap();
    assert_eq!(accel.deserialize::<Frame>(&bytes).unwrap(), frame);
}

#[test]
fn test_bindings_are_memoized_on_first_use() {
    let accel = Accel::default();
    assert!(accel.is_registered::<u64>());
    assert!(accel.is_registered::<uuid::Uuid>());
    assert!(accel.is_registered::<chrono::DateTime<chrono::FixedOffset>>());
    assert!(!accel.is_registered::<Vec<Frame>>());
    accel.serialize(&vec![Frame {
        seq: 0,
        body: Vec::new(),
    }])
    .unwrap();
    assert!(accel.is_registered::<Vec<Frame>>());
}

#[test]
fn test_multi_dimensional_arrays_are_rejected() {
    let accel = Accel::default();
    let err = accel.serialize(&[[1u8; 2]; 2]).unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));

    #[derive(AccelObject, Debug, PartialEq)]
    struct Grid {
        #[accel(index = 1)]
        cells: [[u8; 3]; 3],
    }
    let err = accel.register_struct::<Grid>().unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));

    let err = accel.serialize(&Grid { cells: [[0; 3]; 3] }).unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
}

#[test]
fn test_types_without_default_cannot_decode() {
    #[derive(AccelObject, Debug, PartialEq)]
    #[accel(no_default)]
    struct Handle {
        #[accel(index = 1)]
        id: u32,
    }

    let err = Accel::default().register_struct::<Handle>().unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let accel = Accel::default();
    let mut bytes = accel.serialize(&7u16).unwrap();
    bytes.push(0x10);
    assert!(matches!(
        accel.deserialize::<u16>(&bytes),
        Err(Error::InvalidData(_))
    ));
}
