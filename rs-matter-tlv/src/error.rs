/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

use core::fmt;

/// The reason a TLV encode or decode operation failed.
///
/// Write-side: `OutOfSpace`, `DepthExceeded`, `UnbalancedContainer`, `UnterminatedContainer`,
/// `InvalidTag`, `DuplicateTag`, `InvalidArgument`.
///
/// Read-side: `BufferUnderrun`, `MalformedElement`, `MalformedTag`, `TypeMismatch`, `DepthExceeded`,
/// `UnbalancedContainer`, `UnterminatedContainer`, `DuplicateTag`, `InvalidState`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// The output buffer cannot hold the element; nothing was written.
    OutOfSpace,
    /// The input ended in the middle of an element header or value.
    BufferUnderrun,
    /// The control byte or the value of an element is invalid.
    MalformedElement,
    /// Fewer tag bytes are available than the tag form requires.
    MalformedTag,
    /// The element is not of the requested type.
    TypeMismatch,
    /// A container end does not match the innermost open container.
    UnbalancedContainer,
    /// A container is still open where the stream is expected to be complete.
    UnterminatedContainer,
    /// Container nesting would go beyond `MAX_CONTAINER_DEPTH`.
    DepthExceeded,
    /// A context tag appears twice in the same structure.
    DuplicateTag,
    /// The tag form is not allowed in the enclosing container.
    InvalidTag,
    InvalidArgument,
    /// The operation is not valid in the current reader/writer state.
    InvalidState,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

pub struct Error {
    code: ErrorCode,
    #[cfg(all(feature = "std", feature = "backtrace"))]
    backtrace: std::backtrace::Backtrace,
}

impl Error {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            #[cfg(all(feature = "std", feature = "backtrace"))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[cfg(all(feature = "std", feature = "backtrace"))]
    pub const fn backtrace(&self) -> &std::backtrace::Backtrace {
        &self.backtrace
    }

    /// Return `true` if the error is caused by hostile or corrupted input
    /// (as opposed to a caller bug or an undersized output buffer).
    ///
    /// The transport layer uses this to decide whether to drop the message.
    pub const fn is_malformed_input(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::BufferUnderrun
                | ErrorCode::MalformedElement
                | ErrorCode::MalformedTag
                | ErrorCode::DepthExceeded
                | ErrorCode::UnbalancedContainer
                | ErrorCode::UnterminatedContainer
                | ErrorCode::DuplicateTag
        )
    }

    pub fn remap<F>(self, matcher: F, to: Self) -> Self
    where
        F: FnOnce(&Self) -> bool,
    {
        if matcher(&self) {
            to
        } else {
            self
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(not(all(feature = "std", feature = "backtrace")))]
        {
            write!(f, "Error::{}", self)?;
        }

        #[cfg(all(feature = "std", feature = "backtrace"))]
        {
            writeln!(f, "Error::{} {{", self)?;
            write!(f, "{}", self.backtrace())?;
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.code())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "Error::{}", self.code)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
