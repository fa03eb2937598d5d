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

//! Error kinds shared by the buffer, the class checker and the codec
//! optimizer.
//!
//! Error constructors sit on the failure paths of every buffer read/write, so
//! they are `#[cold]` static constructor functions: the hot paths stay free
//! of formatting code and LLVM can lay the error branches out of line.

use std::borrow::Cow;

use thiserror::Error;

/// Compile-time switch turning every constructed error into a panic.
///
/// Set `FURY_PANIC_ON_ERROR=1` when building to get a full stack trace at the
/// exact location an error is created, instead of a propagated `Err`.
pub const PANIC_ON_ERROR: bool = option_env!("FURY_PANIC_ON_ERROR").is_some();

/// Error type for the Fury serialization core.
///
/// Construct variants through the static functions ([`Error::buffer_out_of_bound`],
/// [`Error::varint_malformed`], ...) rather than the enum syntax; they apply
/// the `FURY_PANIC_ON_ERROR` debug switch and keep message conversion in one
/// place.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Buffer access beyond the addressable region of a non-growable buffer.
    #[error("Buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// A var-length integer ran off the buffer or never terminated within its
    /// byte cap.
    #[error("{0}")]
    VarintMalformed(Cow<'static, str>),

    /// The allocator rejected a buffer allocation or growth request.
    #[error("{0}")]
    AllocationFailure(Cow<'static, str>),

    /// A class was denied by the class checker.
    #[error("{0}")]
    Insecure(Cow<'static, str>),

    /// API misuse: recursive listener mutation, cursor invariants broken.
    #[error("{0}")]
    ProgrammerError(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::BufferOutOfBound`] for an access of `length`
    /// bytes at `offset` in a buffer of `capacity` bytes.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::VarintMalformed`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn varint_malformed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::VarintMalformed(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::AllocationFailure`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn allocation_failure<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::AllocationFailure(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Insecure`] from a string or static message.
    ///
    /// Raised by the class resolver when the active checker denies a class on
    /// either the serialize or deserialize path.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn insecure<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Insecure(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::ProgrammerError`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn programmer_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::ProgrammerError(s.into());
        if PANIC_ON_ERROR {
            panic!("FURY_PANIC_ON_ERROR: {}", err);
        }
        err
    }
}

/// Ensures a condition is true; otherwise returns the given [`enum@Error`].
///
/// # Examples
/// ```
/// use fury_core::ensure;
/// use fury_core::error::Error;
///
/// fn check_range(offset: usize, capacity: usize) -> Result<(), Error> {
///     ensure!(
///         offset < capacity,
///         Error::buffer_out_of_bound(offset, 1, capacity)
///     );
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
