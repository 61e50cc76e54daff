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

//! # PERFORMANCE CRITICAL MODULE
//!
//! Error constructors sit on every bounds check of the [`Reader`](crate::buffer::Reader)
//! and on every tag check of the typed record readers. They are marked `#[cold]` so
//! that LLVM keeps the successful path tight; do not remove those attributes.

use std::borrow::Cow;

use thiserror::Error;

/// Set `ACCEL_PANIC_ON_ERROR=1` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("ACCEL_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for every encode, decode, registration and allocation operation.
///
/// # Always use the constructor functions
///
/// Construct errors through [`Error::truncated_stream`], [`Error::invalid_tag`] and
/// friends rather than the enum syntax. The constructors convert messages via
/// `Into<Cow<'static, str>>` and honor `ACCEL_PANIC_ON_ERROR`:
///
/// ```rust
/// use accel_core::error::Error;
///
/// let err = Error::invalid_tag("expected Fixed32, found LengthPrefixed");
/// let err = Error::unregistered_type(format!("no binding for {}", "Foo"));
/// let err = Error::truncated_stream(10, 4, 12);
/// ```
///
/// ## Debugging
///
/// ```bash
/// RUST_BACKTRACE=1 ACCEL_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The reader's range ended in the middle of a record.
    ///
    /// Do not construct this variant directly; use [`Error::truncated_stream`] instead.
    #[error("Truncated stream: {0} + {1} > {2}")]
    TruncatedStream(usize, usize, usize),

    /// Tag category unknown, reserved, or incompatible with the requested read.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_tag`] instead.
    #[error("{0}")]
    InvalidTag(Cow<'static, str>),

    /// Bytes are malformed for the configured text encoding.
    ///
    /// Do not construct this variant directly; use [`Error::text_decode`] instead.
    #[error("{0}")]
    TextDecode(Cow<'static, str>),

    /// Encode or decode was requested for a type without a resolvable binding.
    ///
    /// Do not construct this variant directly; use [`Error::unregistered_type`] instead.
    #[error("{0}")]
    UnregisteredType(Cow<'static, str>),

    /// Two different descriptors were registered for the same type.
    ///
    /// Do not construct this variant directly; use [`Error::duplicate_registration`] instead.
    #[error("{0}")]
    DuplicateRegistration(Cow<'static, str>),

    /// The OS allocator could not provide the requested number of bytes.
    ///
    /// Do not construct this variant directly; use [`Error::allocation_failure`] instead.
    #[error("Allocation of {0} bytes failed")]
    AllocationFailure(usize),

    /// A strict type met a serial index absent from its descriptor.
    ///
    /// Do not construct this variant directly; use [`Error::strict_index_mismatch`] instead.
    #[error("Unknown serial index {0} for strict type {1}")]
    StrictIndexMismatch(u32, Cow<'static, str>),

    /// The type or shape cannot be serialized.
    ///
    /// Do not construct this variant directly; use [`Error::not_supported`] instead.
    #[error("{0}")]
    NotSupported(Cow<'static, str>),

    /// Well-formed records carrying a value that does not fit the target.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_data`] instead.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Nested values exceed the configured decode depth.
    ///
    /// Do not construct this variant directly; use [`Error::depth_exceed`] instead.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::TruncatedStream`] from the cursor, the requested length and the range end.
    ///
    /// # Example
    /// ```
    /// use accel_core::error::Error;
    ///
    /// let err = Error::truncated_stream(10, 4, 12);
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn truncated_stream(offset: usize, length: usize, end: usize) -> Self {
        let err = Error::TruncatedStream(offset, length, end);
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidTag`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_tag<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidTag(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TextDecode`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn text_decode<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::TextDecode(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnregisteredType`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unregistered_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnregisteredType(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DuplicateRegistration`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn duplicate_registration<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DuplicateRegistration(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::AllocationFailure`] for a request of `size` bytes.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn allocation_failure(size: usize) -> Self {
        let err = Error::AllocationFailure(size);
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::StrictIndexMismatch`].
    ///
    /// # Example
    /// ```
    /// use accel_core::error::Error;
    ///
    /// let err = Error::strict_index_mismatch(3, "demo::Point");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn strict_index_mismatch<S: Into<Cow<'static, str>>>(index: u32, type_name: S) -> Self {
        let err = Error::StrictIndexMismatch(index, type_name.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::NotSupported`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_supported<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::NotSupported(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidData`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidData(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("ACCEL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Appends the Rust type name to an [`Error::UnregisteredType`] or [`Error::NotSupported`].
    ///
    /// ```
    /// use accel_core::error::Error;
    ///
    /// let err = Error::enhance_type_error::<String>(Error::not_supported("no binding"));
    /// assert!(err.to_string().ends_with("(type: alloc::string::String)"));
    /// ```
    #[inline(never)]
    pub fn enhance_type_error<T: ?Sized + 'static>(err: Error) -> Error {
        match err {
            Error::UnregisteredType(s) => {
                Error::unregistered_type(format!("{} (type: {})", s, std::any::type_name::<T>()))
            }
            Error::NotSupported(s) => {
                Error::not_supported(format!("{} (type: {})", s, std::any::type_name::<T>()))
            }
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// # Examples
/// ```
/// use accel_core::ensure;
/// use accel_core::error::Error;
///
/// fn check_len(n: usize) -> Result<(), Error> {
///     ensure!(n > 0, "length must be positive");
///     ensure!(n < 10, Error::invalid_data(format!("length {} too large", n)));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::InvalidData`].
///
/// # Examples
/// ```
/// use accel_core::bail;
/// use accel_core::error::Error;
///
/// fn fail_fast() -> Result<(), Error> {
///     bail!("something went wrong");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_data($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}
