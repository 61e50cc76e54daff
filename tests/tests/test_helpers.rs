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

use accel::Accel;
use accel_core::Serializer;
use std::fmt::Debug;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` events to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Generic helper function for roundtrip serialization testing
#[allow(dead_code)]
pub fn test_roundtrip<T>(accel: &Accel, value: T)
where
    T: Serializer + PartialEq + Debug,
{
    let bytes = accel.serialize(&value).unwrap();
    let result: T = accel.deserialize(&bytes).unwrap();
    assert_eq!(value, result);
}
