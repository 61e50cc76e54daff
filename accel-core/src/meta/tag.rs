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

//! Tag byte layout and value classification.
//!
//! ```text
//!   7   6   5        4         3 2 1 0
//! +---+---+--------+---------+---------+
//! | 0 | 0 | INLINE | DEFAULT | category|
//! +---+---+--------+---------+---------+
//! ```
//!
//! A record carries a payload only when its category is fixed or
//! length-prefixed and neither flag is set. The byte `0x00` is the null tag.

use crate::error::Error;
use crate::types::{Category, Float128, NumberFormat, TextEncoding};
use std::fmt;

pub const DEFAULT_FLAG: u8 = 0x10;
pub const INLINE_FLAG: u8 = 0x20;
const CATEGORY_MASK: u8 = 0x0F;
const RESERVED_MASK: u8 = 0xC0;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(u8);

impl Tag {
    /// An absent nullable value.
    pub const NULL: Tag = Tag(0);
    /// Zero, false, empty: the type's default value with no payload.
    pub const DEFAULT: Tag = Tag(DEFAULT_FLAG);
    /// Boolean `true`, carried by the tag alone.
    pub const TRUE: Tag = Tag(Category::Fixed8 as u8 | INLINE_FLAG);
    pub const LENGTH_PREFIXED: Tag = Tag(Category::LengthPrefixed as u8);

    #[inline(always)]
    pub const fn new(category: Category) -> Tag {
        Tag(category as u8)
    }

    /// Validates a byte read off the wire.
    pub fn from_byte(byte: u8) -> Result<Tag, Error> {
        if byte & RESERVED_MASK != 0 {
            return Err(Error::invalid_tag(format!(
                "tag 0x{:02x} has reserved bits set",
                byte
            )));
        }
        if Category::try_from(byte & CATEGORY_MASK).is_err() {
            return Err(Error::invalid_tag(format!(
                "tag 0x{:02x} uses reserved category {}",
                byte,
                byte & CATEGORY_MASK
            )));
        }
        Ok(Tag(byte))
    }

    #[inline(always)]
    pub const fn byte(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub fn category(self) -> Category {
        // bytes are validated on construction
        Category::try_from(self.0 & CATEGORY_MASK).unwrap_or(Category::Missing)
    }

    #[inline(always)]
    pub const fn is_default(self) -> bool {
        self.0 & DEFAULT_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_inline(self) -> bool {
        self.0 & INLINE_FLAG != 0
    }

    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn has_payload(self) -> bool {
        self.0 & (DEFAULT_FLAG | INLINE_FLAG) == 0 && self.category() != Category::Missing
    }

    /// Number of fixed payload bytes following the tag. Zero for records
    /// without payload and for length-prefixed records.
    #[inline(always)]
    pub fn width(self) -> usize {
        if self.has_payload() {
            self.category().width()
        } else {
            0
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?}", self.category())?;
        if self.is_default() {
            write!(f, " | DEFAULT")?;
        }
        if self.is_inline() {
            write!(f, " | INLINE")?;
        }
        write!(f, ")")
    }
}

/// Payload width in bytes of `category`.
#[inline(always)]
pub fn apply_width(category: Category) -> usize {
    category.width()
}

/// Integer types that can be carried in a fixed-category record.
pub trait Integral: Copy + PartialEq + fmt::Display + 'static {
    const BITS: u8;
    const SIGNED: bool;
    const ZERO: Self;

    /// Two's complement bits, sign-extended for signed types.
    fn widen(self) -> u128;

    /// Range-checked conversion from sign- or zero-extended bits.
    fn narrow(bits: u128) -> Option<Self>;
}

macro_rules! impl_integral {
    (signed: $($ty:ty),*) => {
        $(
            impl Integral for $ty {
                const BITS: u8 = <$ty>::BITS as u8;
                const SIGNED: bool = true;
                const ZERO: Self = 0;

                #[inline(always)]
                fn widen(self) -> u128 {
                    self as i128 as u128
                }

                #[inline(always)]
                fn narrow(bits: u128) -> Option<Self> {
                    <$ty>::try_from(bits as i128).ok()
                }
            }
        )*
    };
    (unsigned: $($ty:ty),*) => {
        $(
            impl Integral for $ty {
                const BITS: u8 = <$ty>::BITS as u8;
                const SIGNED: bool = false;
                const ZERO: Self = 0;

                #[inline(always)]
                fn widen(self) -> u128 {
                    self as u128
                }

                #[inline(always)]
                fn narrow(bits: u128) -> Option<Self> {
                    <$ty>::try_from(bits).ok()
                }
            }
        )*
    };
}

impl_integral!(signed: i8, i16, i32, i64, i128, isize);
impl_integral!(unsigned: u8, u16, u32, u64, u128, usize);

#[inline(always)]
fn fits(bits: u128, bytes: usize, signed: bool) -> bool {
    if bytes >= 16 {
        return true;
    }
    let shift = bytes * 8;
    if signed {
        let v = bits as i128;
        let bound = 1i128 << (shift - 1);
        v >= -bound && v < bound
    } else {
        bits >> shift == 0
    }
}

/// Smallest of 1, 2, 4, 8 and 16 bytes that holds `value`, never wider than `T`.
pub fn significant_width<T: Integral>(value: T) -> usize {
    let bits = value.widen();
    let declared = T::BITS as usize / 8;
    for bytes in [1usize, 2, 4, 8] {
        if bytes >= declared {
            return declared;
        }
        if fits(bits, bytes, T::SIGNED) {
            return bytes;
        }
    }
    declared
}

pub fn classify_integer<T: Integral>(value: T, format: NumberFormat) -> Tag {
    if value == T::ZERO {
        return Tag::DEFAULT;
    }
    let width = match format {
        NumberFormat::Fixed => T::BITS as usize / 8,
        NumberFormat::Variant => significant_width(value),
    };
    Tag::new(Category::for_width(width).unwrap_or(Category::Fixed128))
}

#[inline(always)]
pub fn classify_f32(value: f32) -> Tag {
    if value.to_bits() == 0 {
        Tag::DEFAULT
    } else {
        Tag::new(Category::Fixed32)
    }
}

#[inline(always)]
pub fn classify_f64(value: f64) -> Tag {
    if value.to_bits() == 0 {
        Tag::DEFAULT
    } else {
        Tag::new(Category::Fixed64)
    }
}

#[inline(always)]
pub fn classify_f128(value: Float128) -> Tag {
    if value.bits == 0 {
        Tag::DEFAULT
    } else {
        Tag::new(Category::Fixed128)
    }
}

#[inline(always)]
pub fn classify_bool(value: bool) -> Tag {
    if value {
        Tag::TRUE
    } else {
        Tag::DEFAULT
    }
}

/// Byte width of `value` in `encoding`. ASCII always takes one byte.
#[inline(always)]
pub fn char_width(value: char, encoding: TextEncoding) -> usize {
    match encoding {
        TextEncoding::Utf8 => value.len_utf8(),
        TextEncoding::Unicode => value.len_utf16() * 2,
        TextEncoding::Ascii => 1,
    }
}

pub fn classify_char(value: char, encoding: TextEncoding) -> Tag {
    if value == '\0' {
        return Tag::DEFAULT;
    }
    Tag::new(Category::for_width(char_width(value, encoding)).unwrap_or(Category::Fixed32))
}

/// `None` is the null tag, the empty string is the default tag.
pub fn classify_str(value: Option<&str>) -> Tag {
    match value {
        None => Tag::NULL,
        Some(s) if s.is_empty() => Tag::DEFAULT,
        Some(_) => Tag::LENGTH_PREFIXED,
    }
}
