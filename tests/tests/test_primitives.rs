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

use accel::{Accel, Endian, Error};
use accel_core::meta::Tag;
use accel_core::types::{Category, Float128};
use chrono::{FixedOffset, NaiveDate, TimeDelta, TimeZone};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Duration;
use test_helpers::{init_tracing, test_roundtrip};
use uuid::Uuid;

#[test]
fn test_integer_extremes() {
    init_tracing();
    let accel = Accel::default();
    test_roundtrip(&accel, 0i8);
    test_roundtrip(&accel, i8::MIN);
    test_roundtrip(&accel, i8::MAX);
    test_roundtrip(&accel, i16::MIN);
    test_roundtrip(&accel, u16::MAX);
    test_roundtrip(&accel, i32::MIN);
    test_roundtrip(&accel, u32::MAX);
    test_roundtrip(&accel, i64::MIN);
    test_roundtrip(&accel, u64::MAX);
    test_roundtrip(&accel, i128::MIN);
    test_roundtrip(&accel, u128::MAX);
    test_roundtrip(&accel, isize::MIN);
    test_roundtrip(&accel, usize::MAX);
}

#[test]
fn test_floats_keep_their_bits() {
    let accel = Accel::default();
    test_roundtrip(&accel, f32::MIN_POSITIVE);
    test_roundtrip(&accel, f32::MAX);
    test_roundtrip(&accel, f64::MIN);
    test_roundtrip(&accel, f64::INFINITY);
    test_roundtrip(&accel, Float128::from_bits(0x3FFF_0000_0000_0000_0000_0000_0000_0000));

    let bytes = accel.serialize(&-0.0f64).unwrap();
    assert_eq!(bytes.len(), 9);
    assert!(accel.deserialize::<f64>(&bytes).unwrap().is_sign_negative());

    let nan: f64 = accel.deserialize(&accel.serialize(&f64::NAN).unwrap()).unwrap();
    assert!(nan.is_nan());
}

#[test]
fn test_text_and_well_known_types() {
    let accel = Accel::default();
    test_roundtrip(&accel, true);
    test_roundtrip(&accel, 'é');
    test_roundtrip(&accel, '🦀');
    test_roundtrip(&accel, "hello, 世界".to_string());
    test_roundtrip(&accel, NaiveDate::from_ymd_opt(1969, 7, 20).unwrap());
    test_roundtrip(
        &accel,
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap(),
    );
    test_roundtrip(&accel, TimeDelta::microseconds(-1_500_000));
    test_roundtrip(&accel, TimeDelta::MIN);
    test_roundtrip(&accel, TimeDelta::MAX);
    test_roundtrip(&accel, Duration::new(3, 7));
    test_roundtrip(
        &accel,
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 8, 30, 0)
            .unwrap(),
    );
    test_roundtrip(&accel, Uuid::from_u128(0x9b2f_c1e0_0000_4000_8000_0000_dead_beef));
    test_roundtrip(&accel, Uuid::nil());
}

#[test]
fn test_collections() {
    let accel = Accel::default();
    test_roundtrip(&accel, vec![1u32, 0, u32::MAX]);
    test_roundtrip(&accel, VecDeque::from(vec!["a".to_string(), String::new()]));
    test_roundtrip(&accel, HashSet::from([3i64, -3]));
    test_roundtrip(
        &accel,
        HashMap::from([("one".to_string(), 1u8), ("zero".to_string(), 0u8)]),
    );
    test_roundtrip(&accel, BTreeMap::from([(1u16, vec![true, false])]));
    test_roundtrip(&accel, [7i32, 0, -7]);
    test_roundtrip(&accel, ("key".to_string(), 42u64));
    test_roundtrip(&accel, Box::new(12.5f32));
    test_roundtrip(&accel, vec![Some(1u8), None, Some(0)]);
}

#[test]
fn test_default_values_cost_one_byte() {
    let accel = Accel::default();
    assert_eq!(accel.serialize(&0u64).unwrap(), vec![0x10]);
    assert_eq!(accel.serialize(&0.0f32).unwrap(), vec![0x10]);
    assert_eq!(accel.serialize(&false).unwrap(), vec![0x10]);
    assert_eq!(accel.serialize(&'\0').unwrap(), vec![0x10]);
    assert_eq!(accel.serialize(&String::new()).unwrap(), vec![0x10]);
    assert_eq!(accel.serialize(&Vec::<i32>::new()).unwrap(), vec![0x10]);
    assert_eq!(accel.serialize(&true).unwrap(), vec![0x21]);
}

#[test]
fn test_null_and_empty_string_differ() {
    let accel = Accel::default();
    let none = accel.serialize(&None::<String>).unwrap();
    let empty = accel.serialize(&Some(String::new())).unwrap();
    assert_eq!(none, vec![0x00]);
    assert_eq!(empty, vec![0x10]);
    assert_eq!(accel.deserialize::<Option<String>>(&none).unwrap(), None);
    assert_eq!(
        accel.deserialize::<Option<String>>(&empty).unwrap(),
        Some(String::new())
    );
    assert_eq!(
        accel.serialize(&"hi".to_string()).unwrap(),
        vec![0x0F, 0x02, 0x68, 0x69]
    );
}

#[test]
fn test_fixed_integers_use_declared_width() {
    let accel = Accel::default();
    for value in [1i64, 100, 1 << 40] {
        let bytes = accel.serialize(&value).unwrap();
        assert_eq!(Tag::from_byte(bytes[0]).unwrap().category(), Category::Fixed64);
        assert_eq!(bytes.len(), 9);
    }
}

#[test]
fn test_byte_order_is_applied_to_payloads() {
    let value = 0x0102_0304u32;
    let little = Accel::default().serialize(&value).unwrap();
    let big = Accel::default().endian(Endian::Big).serialize(&value).unwrap();
    assert_eq!(little, vec![0x04, 0x04, 0x03, 0x02, 0x01]);
    assert_eq!(big, vec![0x04, 0x01, 0x02, 0x03, 0x04]);

    let payload: [u8; 4] = little[1..].try_into().unwrap();
    assert_eq!(u32::from_be_bytes(payload), value.swap_bytes());
    let payload: [u8; 4] = big[1..].try_into().unwrap();
    assert_eq!(u32::from_le_bytes(payload), value.swap_bytes());

    let crossed: u32 = Accel::default().endian(Endian::Big).deserialize(&little).unwrap();
    assert_eq!(crossed, value.swap_bytes());
}

#[test]
fn test_malformed_input_is_rejected() {
    let accel = Accel::default();

    let err = accel.deserialize::<String>(&[0x0F, 0x02, 0xC3, 0x28]).unwrap_err();
    assert!(matches!(err, Error::TextDecode(_)));

    let err = accel.deserialize::<u32>(&[0x04, 0x01, 0x02]).unwrap_err();
    assert!(matches!(err, Error::TruncatedStream(..)));

    let err = accel.deserialize::<u32>(&[0x0D]).unwrap_err();
    assert!(matches!(err, Error::InvalidTag(_)));

    let err = accel.deserialize::<u8>(&[0x02, 0x00, 0x01]).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));

    let err = accel.deserialize::<u8>(&[0x01, 0x05, 0x10]).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}
