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

use accel::{Accel, AccelObject, Error};
use accel_core::meta::Tag;
use accel_core::types::Category;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_helpers::{init_tracing, test_roundtrip};

#[derive(AccelObject, Debug, PartialEq)]
struct Sample {
    #[accel(index = 1)]
    a: i32,
    #[accel(index = 2, variant)]
    b: i32,
    #[accel(index = 3)]
    c: String,
}

#[test]
fn test_sample_layout() {
    init_tracing();
    let accel = Accel::default();
    let value = Sample {
        a: 0,
        b: 300,
        c: "hi".to_string(),
    };
    let bytes = accel.serialize(&value).unwrap();
    assert_eq!(
        bytes,
        vec![0x01, 0x10, 0x02, 0x02, 0x2C, 0x01, 0x03, 0x0F, 0x02, 0x68, 0x69]
    );
    assert_eq!(Tag::from_byte(bytes[3]).unwrap().category(), Category::Fixed16);
    assert_eq!(accel.deserialize::<Sample>(&bytes).unwrap(), value);
}

#[derive(AccelObject, Debug, PartialEq)]
struct Widths {
    #[accel(index = 1, variant)]
    small: u64,
    #[accel(index = 2, variant)]
    medium: u64,
    #[accel(index = 3)]
    fixed: u64,
}

#[test]
fn test_variant_width_follows_the_value() {
    let accel = Accel::default();
    let bytes = accel
        .serialize(&Widths {
            small: 100,
            medium: 1000,
            fixed: 100,
        })
        .unwrap();
    assert_eq!(&bytes[..7], &[0x01, 0x01, 100, 0x02, 0x02, 0xE8, 0x03]);
    assert_eq!(bytes[7], 0x03);
    assert_eq!(Tag::from_byte(bytes[8]).unwrap().category(), Category::Fixed64);
    assert_eq!(bytes.len(), 9 + 8);
}

#[derive(AccelObject, Debug, PartialEq)]
struct Zeros {
    #[accel(index = 1)]
    int: i32,
    #[accel(index = 2)]
    float: f64,
    #[accel(index = 3)]
    flag: bool,
    #[accel(index = 4)]
    letter: char,
    #[accel(index = 5)]
    text: String,
    #[accel(index = 6)]
    list: Vec<u8>,
}

#[test]
fn test_zero_fields_are_index_and_tag_only() {
    let accel = Accel::default();
    let zeros = Zeros {
        int: 0,
        float: 0.0,
        flag: false,
        letter: '\0',
        text: String::new(),
        list: Vec::new(),
    };
    let bytes = accel.serialize(&zeros).unwrap();
    assert_eq!(
        bytes,
        vec![0x01, 0x10, 0x02, 0x10, 0x03, 0x10, 0x04, 0x10, 0x05, 0x10, 0x06, 0x10]
    );
    assert_eq!(accel.deserialize::<Zeros>(&bytes).unwrap(), zeros);
}

#[derive(AccelObject, Debug, PartialEq)]
struct ProfileV1 {
    #[accel(index = 1)]
    id: u32,
    #[accel(index = 2)]
    name: String,
}

#[derive(AccelObject, Debug, PartialEq)]
struct ProfileV2 {
    #[accel(index = 1)]
    id: u32,
    #[accel(index = 2)]
    name: String,
    #[accel(index = 3)]
    tags: Vec<String>,
}

#[derive(AccelObject, Debug, PartialEq)]
#[accel(strict)]
struct StrictProfile {
    #[accel(index = 1)]
    id: u32,
    #[accel(index = 2)]
    name: String,
}

fn v2_bytes(accel: &Accel) -> Vec<u8> {
    accel
        .serialize(&ProfileV2 {
            id: 9,
            name: "ada".to_string(),
            tags: vec!["admin".to_string(), "ops".to_string()],
        })
        .unwrap()
}

#[test]
fn test_older_reader_skips_new_fields() {
    let accel = Accel::default();
    let v1: ProfileV1 = accel.deserialize(&v2_bytes(&accel)).unwrap();
    assert_eq!(
        v1,
        ProfileV1 {
            id: 9,
            name: "ada".to_string()
        }
    );

    let v1_bytes = accel.serialize(&v1).unwrap();
    let v2: ProfileV2 = accel.deserialize(&v1_bytes).unwrap();
    assert_eq!(v2.name, "ada");
    assert!(v2.tags.is_empty());
}

#[test]
fn test_strict_mode_rejects_unknown_fields() {
    let accel = Accel::default().strict(true);
    let err = accel.deserialize::<ProfileV1>(&v2_bytes(&accel)).unwrap_err();
    assert!(matches!(err, Error::StrictIndexMismatch(3, _)));

    let accel = Accel::default();
    let err = accel
        .deserialize::<StrictProfile>(&v2_bytes(&accel))
        .unwrap_err();
    assert!(matches!(err, Error::StrictIndexMismatch(3, _)));
}

#[derive(AccelObject, Debug, PartialEq)]
struct Address {
    #[accel(index = 1)]
    street: String,
    #[accel(index = 2)]
    zip: Option<u32>,
}

#[derive(AccelObject, Debug, PartialEq)]
struct Customer {
    #[accel(index = 1)]
    name: String,
    #[accel(index = 2)]
    home: Address,
    #[accel(index = 3)]
    billing: Option<Address>,
    #[accel(index = 4)]
    others: Vec<Address>,
    #[accel(index = 5)]
    scores: HashMap<String, i64>,
}

#[test]
fn test_nested_structs() {
    let accel = Accel::default();
    test_roundtrip(
        &accel,
        Customer {
            name: "Grace".to_string(),
            home: Address {
                street: "1 Loop Rd".to_string(),
                zip: Some(0),
            },
            billing: None,
            others: vec![
                Address {
                    street: String::new(),
                    zip: None,
                },
                Address {
                    street: "2 Byte St".to_string(),
                    zip: Some(94040),
                },
            ],
            scores: HashMap::from([("q1".to_string(), -3), ("q2".to_string(), 0)]),
        },
    );

    let present_but_empty = Customer {
        name: String::new(),
        home: Address {
            street: String::new(),
            zip: None,
        },
        billing: Some(Address {
            street: String::new(),
            zip: None,
        }),
        others: Vec::new(),
        scores: HashMap::new(),
    };
    test_roundtrip(&accel, present_but_empty);
}

#[derive(AccelObject, Debug, PartialEq)]
struct Sparse {
    #[accel(index = 1000)]
    late: u8,
    #[accel(index = 1)]
    early: u8,
    #[accel(index = 40)]
    middle: String,
}

#[test]
fn test_sparse_indices_use_chain_dispatch() {
    let accel = Accel::default();
    let value = Sparse {
        late: 3,
        early: 1,
        middle: "m".to_string(),
    };
    let bytes = accel.serialize(&value).unwrap();
    assert_eq!(bytes[0], 0x01);
    assert_eq!(accel.deserialize::<Sparse>(&bytes).unwrap(), value);

    let binding = accel.registry().binding_of::<Sparse>().unwrap();
    assert!(!binding.dispatch().unwrap().is_table());
    let descriptor = accel.fields_of::<Sparse>().unwrap();
    let indices: Vec<u32> = descriptor.fields().iter().map(|f| f.serial_index).collect();
    assert_eq!(indices, vec![1, 40, 1000]);
    assert!(!descriptor.is_index_contiguous());
}

#[derive(AccelObject, Debug, PartialEq)]
struct TreeNode {
    #[accel(index = 1, variant)]
    value: i64,
    #[accel(index = 2)]
    children: Vec<TreeNode>,
    #[accel(index = 3)]
    next: Option<Box<TreeNode>>,
}

fn chain(len: i64) -> TreeNode {
    (1..len).fold(
        TreeNode {
            value: 0,
            children: Vec::new(),
            next: None,
        },
        |tail, value| TreeNode {
            value,
            children: Vec::new(),
            next: Some(Box::new(tail)),
        },
    )
}

#[test]
fn test_recursive_types() {
    let accel = Accel::default();
    let tree = TreeNode {
        value: -1,
        children: vec![chain(3), chain(1)],
        next: Some(Box::new(chain(2))),
    };
    test_roundtrip(&accel, tree);
}

#[test]
fn test_depth_limit() {
    let bytes = Accel::default().serialize(&chain(10)).unwrap();
    let err = Accel::default()
        .max_depth(4)
        .deserialize::<TreeNode>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::DepthExceed(_)));
    assert_eq!(
        Accel::default().deserialize::<TreeNode>(&bytes).unwrap(),
        chain(10)
    );
}

#[test]
fn test_truncated_struct_fails_whole() {
    let accel = Accel::default();
    let bytes = accel
        .serialize(&Sample {
            a: 1,
            b: 2,
            c: "hi".to_string(),
        })
        .unwrap();
    let err = accel
        .deserialize::<Sample>(&bytes[..bytes.len() - 1])
        .unwrap_err();
    assert!(matches!(err, Error::TruncatedStream(..)));
}

#[test]
fn test_field_errors_name_the_field() {
    #[derive(AccelObject, Debug, PartialEq)]
    struct Small {
        #[accel(index = 1)]
        value: u8,
    }

    #[derive(AccelObject, Debug, PartialEq)]
    struct Large {
        #[accel(index = 1, variant)]
        value: u32,
    }

    let accel = Accel::default();
    let bytes = accel.serialize(&Large { value: 70_000 }).unwrap();
    let err = accel.deserialize::<Small>(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
    assert!(err.to_string().contains("field `value`"));
}

#[test]
fn test_tuple_struct() {
    #[derive(AccelObject, Debug, PartialEq)]
    struct Pair(#[accel(index = 1)] String, #[accel(index = 2)] i16);

    test_roundtrip(&Accel::default(), Pair("left".to_string(), -2));
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Millis(u32);

impl From<Millis> for u64 {
    fn from(value: Millis) -> u64 {
        value.0 as u64
    }
}

impl TryFrom<u64> for Millis {
    type Error = std::num::TryFromIntError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Millis)
    }
}

#[derive(AccelObject, Debug, PartialEq)]
struct Timer {
    #[accel(index = 1, facade = u64, variant)]
    elapsed: Millis,
}

#[derive(AccelObject, Debug, PartialEq)]
struct WideTimer {
    #[accel(index = 1, variant)]
    elapsed: u64,
}

#[test]
fn test_facade_fields() {
    let accel = Accel::default();
    let timer = Timer {
        elapsed: Millis(1500),
    };
    let bytes = accel.serialize(&timer).unwrap();
    assert_eq!(bytes, vec![0x01, 0x02, 0xDC, 0x05]);
    assert_eq!(
        accel.deserialize::<WideTimer>(&bytes).unwrap(),
        WideTimer { elapsed: 1500 }
    );
    assert_eq!(accel.deserialize::<Timer>(&bytes).unwrap(), timer);

    let field = accel.fields_of::<Timer>().unwrap().fields()[0].clone();
    assert!(field.facade_kind.is_some());

    let too_wide = accel.serialize(&WideTimer { elapsed: 1 << 40 }).unwrap();
    let err = accel.deserialize::<Timer>(&too_wide).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

static RECEIPT_WRITES: AtomicUsize = AtomicUsize::new(0);

#[derive(AccelObject, Debug, PartialEq)]
#[accel(before_serialize = Self::count_write, after_deserialize = Self::rebuild_total)]
struct Receipt {
    #[accel(index = 1)]
    lines: Vec<u32>,
    #[accel(skip)]
    total: u32,
}

impl Receipt {
    fn count_write(&self) {
        RECEIPT_WRITES.fetch_add(1, Ordering::SeqCst);
    }

    fn rebuild_total(&mut self) {
        self.total = self.lines.iter().sum();
    }
}

#[test]
fn test_callbacks_and_skipped_fields() {
    let accel = Accel::default();
    let receipt = Receipt {
        lines: vec![5, 7],
        total: 999,
    };
    let before = RECEIPT_WRITES.load(Ordering::SeqCst);
    let bytes = accel.serialize(&receipt).unwrap();
    assert_eq!(RECEIPT_WRITES.load(Ordering::SeqCst), before + 1);

    let decoded: Receipt = accel.deserialize(&bytes).unwrap();
    assert_eq!(decoded.lines, vec![5, 7]);
    assert_eq!(decoded.total, 12);
}

#[test]
fn test_text_encodings_per_field() {
    #[derive(AccelObject, Debug, PartialEq)]
    struct Labels {
        #[accel(index = 1, encoding = "unicode")]
        wide: String,
        #[accel(index = 2, encoding = "ascii")]
        narrow: String,
        #[accel(index = 3, encoding = "unicode")]
        initial: char,
    }

    let accel = Accel::default();
    let bytes = accel
        .serialize(&Labels {
            wide: "ab".to_string(),
            narrow: "né".to_string(),
            initial: 'z',
        })
        .unwrap();
    assert_eq!(&bytes[..7], &[0x01, 0x0F, 0x04, b'a', 0x00, b'b', 0x00]);
    let decoded: Labels = accel.deserialize(&bytes).unwrap();
    assert_eq!(decoded.wide, "ab");
    assert_eq!(decoded.narrow, "n?");
    assert_eq!(decoded.initial, 'z');
}

#[test]
fn test_non_nullable_fields_refuse_none() {
    #[derive(AccelObject, Debug, PartialEq)]
    struct Account {
        #[accel(index = 1, nullable = false)]
        owner: Option<String>,
        #[accel(index = 2)]
        note: Option<String>,
    }

    let accel = Accel::default();
    let account = Account {
        owner: Some("ada".to_string()),
        note: None,
    };
    let bytes = accel.serialize(&account).unwrap();
    assert_eq!(accel.deserialize::<Account>(&bytes).unwrap(), account);

    let err = accel
        .serialize(&Account {
            owner: None,
            note: None,
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
    assert!(err.to_string().contains("owner is declared non-nullable"));

    let descriptor = accel.fields_of::<Account>().unwrap();
    assert!(!descriptor.fields()[0].nullable);
    assert!(descriptor.fields()[1].nullable);
}
