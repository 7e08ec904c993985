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

use crate::error::*;

/// An append-only cursor over a caller-owned, fixed-capacity byte buffer.
///
/// Appends are all-or-nothing: if the data does not fit, the buffer and the
/// tail stay untouched and `ErrorCode::OutOfSpace` is returned.
#[derive(Debug)]
pub struct WriteBuf<'a> {
    buf: &'a mut [u8],
    end: usize,
}

impl<'a> WriteBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, end: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn get_tail(&self) -> usize {
        self.end
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.end
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.end]
    }

    pub fn reset(&mut self) {
        self.end = 0;
    }

    /// Consume the buffer, returning the written prefix with the full
    /// lifetime of the underlying storage.
    pub fn into_written(self) -> &'a [u8] {
        let end = self.end;
        let buf: &'a mut [u8] = self.buf;
        let (written, _) = buf.split_at_mut(end);

        written
    }

    pub fn append_with<F>(&mut self, size: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut [u8]),
    {
        if size <= self.remaining() {
            f(&mut self.buf[self.end..self.end + size]);
            self.end += size;
            return Ok(());
        }
        Err(ErrorCode::OutOfSpace.into())
    }

    pub fn append(&mut self, src: &[u8]) -> Result<(), Error> {
        self.append_with(src.len(), |x| x.copy_from_slice(src))
    }

    /// Append several slices as one unit: either all of them fit and are
    /// written, or nothing is written.
    pub fn append_parts(&mut self, parts: &[&[u8]]) -> Result<(), Error> {
        let size = parts
            .iter()
            .try_fold(0_usize, |acc, part| acc.checked_add(part.len()))
            .ok_or(ErrorCode::OutOfSpace)?;

        self.append_with(size, |x| {
            let mut offset = 0;
            for part in parts {
                x[offset..offset + part.len()].copy_from_slice(part);
                offset += part.len();
            }
        })
    }

    pub fn le_u8(&mut self, data: u8) -> Result<(), Error> {
        self.append(&[data])
    }
}
