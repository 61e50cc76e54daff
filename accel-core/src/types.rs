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

use crate::error::Error;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::str::FromStr;

/// The low nibble of a tag byte.
///
/// Categories 1 through 8 are payload widths in bytes. 9 through 12 cover the
/// wide integer and float encodings, 13 and 14 are reserved and 15 marks a
/// length-prefixed payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Category {
    Missing = 0,
    Fixed8 = 1,
    Fixed16 = 2,
    Fixed24 = 3,
    Fixed32 = 4,
    Fixed40 = 5,
    Fixed48 = 6,
    Fixed56 = 7,
    Fixed64 = 8,
    Fixed80 = 9,
    Fixed96 = 10,
    Fixed112 = 11,
    Fixed128 = 12,
    LengthPrefixed = 15,
}

impl Category {
    /// Payload width in bytes of a fixed category. `Missing` and
    /// `LengthPrefixed` report zero.
    #[inline(always)]
    pub const fn width(self) -> usize {
        match self {
            Category::Missing | Category::LengthPrefixed => 0,
            Category::Fixed80 => 10,
            Category::Fixed96 => 12,
            Category::Fixed112 => 14,
            Category::Fixed128 => 16,
            other => other as usize,
        }
    }

    /// The category whose payload is exactly `bytes` wide.
    pub const fn for_width(bytes: usize) -> Option<Category> {
        Some(match bytes {
            0 => Category::Missing,
            1 => Category::Fixed8,
            2 => Category::Fixed16,
            3 => Category::Fixed24,
            4 => Category::Fixed32,
            5 => Category::Fixed40,
            6 => Category::Fixed48,
            7 => Category::Fixed56,
            8 => Category::Fixed64,
            10 => Category::Fixed80,
            12 => Category::Fixed96,
            14 => Category::Fixed112,
            16 => Category::Fixed128,
            _ => return None,
        })
    }

    #[inline(always)]
    pub const fn is_fixed(self) -> bool {
        !matches!(self, Category::Missing | Category::LengthPrefixed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// How integers are laid out on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// Full declared width.
    #[default]
    Fixed,
    /// Smallest of the 8/16/32/64 bit widths that holds the value.
    Variant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TextEncoding {
    Utf8 = 0,
    /// UTF-16 code units in the buffer's byte order.
    Unicode = 1,
    Ascii = 2,
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf8
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "unicode" | "utf16" | "utf-16" => Ok(TextEncoding::Unicode),
            "ascii" => Ok(TextEncoding::Ascii),
            other => Err(Error::not_supported(format!(
                "unknown text encoding `{}`",
                other
            ))),
        }
    }
}

/// Declared wire representation of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireKind {
    VariantInt,
    /// Declared width in bits: 8, 16, 32, 64 or 128.
    FixedInt(u8),
    Float32,
    Float64,
    Float128,
    Boolean,
    Char(TextEncoding),
    String(TextEncoding),
    Complex,
}

impl WireKind {
    /// Integer kind for a type of `bits` width under `format`.
    #[inline(always)]
    pub const fn integer(bits: u8, format: NumberFormat) -> WireKind {
        match format {
            NumberFormat::Fixed => WireKind::FixedInt(bits),
            NumberFormat::Variant => WireKind::VariantInt,
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireKind::VariantInt => write!(f, "variant int"),
            WireKind::FixedInt(bits) => write!(f, "fixed int{}", bits),
            WireKind::Float32 => write!(f, "float32"),
            WireKind::Float64 => write!(f, "float64"),
            WireKind::Float128 => write!(f, "float128"),
            WireKind::Boolean => write!(f, "boolean"),
            WireKind::Char(enc) => write!(f, "char({:?})", enc),
            WireKind::String(enc) => write!(f, "string({:?})", enc),
            WireKind::Complex => write!(f, "complex"),
        }
    }
}

/// Structural shape of a Rust type, used by the registry to pick a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Primitive,
    /// Fixed-size array; `rank` counts the nesting depth of `[[T; N]; M]`.
    Array { rank: u8 },
    List,
    Map,
    Nullable,
    Struct,
}

/// Per-field encoding options, propagated to collection elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct FieldOptions {
    pub number: NumberFormat,
    pub encoding: TextEncoding,
}

impl FieldOptions {
    pub const DEFAULT: FieldOptions = FieldOptions {
        number: NumberFormat::Fixed,
        encoding: TextEncoding::Utf8,
    };

    pub const fn new(number: NumberFormat, encoding: TextEncoding) -> Self {
        FieldOptions { number, encoding }
    }
}

/// IEEE 754 binary128 value carried as raw bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Float128 {
    pub bits: u128,
}

impl Float128 {
    pub const ZERO: Float128 = Float128 { bits: 0 };

    pub const fn from_bits(bits: u128) -> Self {
        Float128 { bits }
    }

    pub const fn to_bits(self) -> u128 {
        self.bits
    }
}
