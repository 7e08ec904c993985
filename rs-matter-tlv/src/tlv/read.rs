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

use log::warn;

use crate::error::{Error, ErrorCode};

use super::{
    ContainerToken, NestingGuard, TLVConfig, TLVHeader, TLVTag, TLVValue, TLVValueType, TLV,
    MAX_CONTAINER_DEPTH,
};

/// A forward-only, cursor-style TLV decoder over a borrowed byte slice.
///
/// `next` advances to the next sibling in the current container. Containers are
/// descended into with `enter_container`; a container that is not entered is
/// skipped as a whole by the following `next` call.
///
/// Decoded strings borrow directly from the input; nothing is copied or allocated.
#[derive(Debug)]
pub struct TLVReader<'a> {
    data: &'a [u8],
    pos: usize,
    guard: NestingGuard,
    current: Option<TLV<'a>>,
    skip_pending: bool,
    container_ended: bool,
}

impl<'a> TLVReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::new_with_config(data, TLVConfig::default())
    }

    pub fn new_with_config(data: &'a [u8], config: TLVConfig) -> Self {
        Self {
            data,
            pos: 0,
            guard: NestingGuard::new(config),
            current: None,
            skip_pending: false,
            container_ended: false,
        }
    }

    /// Advance to the next element of the current container.
    ///
    /// Returns `Ok(None)` when the End-of-container of the current container is reached,
    /// or at the end of the input when no container is entered. Calling `next` again
    /// after that keeps returning `Ok(None)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<TLV<'a>>, Error> {
        if self.container_ended {
            return Ok(None);
        }

        if self.skip_pending {
            self.skip_container()?;
        }

        self.current = None;

        if self.pos == self.data.len() {
            if self.guard.depth() > 0 {
                warn!(
                    "Input ends with {} container(s) still open",
                    self.guard.depth()
                );
                Err(ErrorCode::UnterminatedContainer)?;
            }

            return Ok(None);
        }

        let (header, header_len, raw) = self.element_at(self.pos)?;

        if header.value_type().is_container_end() {
            if self.guard.depth() == 0 {
                warn!("End-of-container at top level, offset {}", self.pos);
                Err(ErrorCode::UnbalancedContainer)?;
            }

            self.pos += header_len;
            self.container_ended = true;

            return Ok(None);
        }

        self.guard.check_tag(&header.tag).map_err(|e| {
            e.remap(
                |e| e.code() == ErrorCode::InvalidTag,
                ErrorCode::MalformedElement.into(),
            )
        })?;

        let value = TLVValue::decode(header.value_type(), raw).map_err(|e| {
            warn!("Invalid {} value at offset {}", header.value_type(), self.pos);
            e
        })?;

        self.guard.mark_tag(&header.tag);

        self.pos += header_len + raw.len();
        self.skip_pending = header.value_type().is_container_start();

        let tlv = TLV::new(header.tag, value);
        self.current = Some(tlv.clone());

        Ok(Some(tlv))
    }

    /// Descend into the container the reader is currently positioned on.
    ///
    /// Fails with `ErrorCode::TypeMismatch` if the current element is not a container start,
    /// and with `ErrorCode::DepthExceeded` if `MAX_CONTAINER_DEPTH` containers are already entered.
    pub fn enter_container(&mut self) -> Result<ContainerToken, Error> {
        let kind = self
            .current()?
            .container_type()
            .ok_or(ErrorCode::TypeMismatch)?;

        if !self.skip_pending {
            Err(ErrorCode::InvalidState)?;
        }

        let token = self.guard.push(kind)?;

        self.skip_pending = false;
        self.current = None;

        Ok(token)
    }

    /// Leave the container identified by `token`, skipping its remaining elements
    /// and its End-of-container.
    ///
    /// Fails with `ErrorCode::UnbalancedContainer` if `token` does not belong to
    /// the innermost entered container.
    pub fn exit_container(&mut self, token: ContainerToken) -> Result<(), Error> {
        self.guard.check_pop(&token)?;

        while self.next()?.is_some() {}

        self.container_ended = false;
        self.current = None;

        self.guard.pop(token)
    }

    /// Check that the input is complete: no container is still entered and the
    /// remaining top-level elements are well formed.
    pub fn finish(mut self) -> Result<(), Error> {
        if self.guard.depth() > 0 {
            warn!(
                "Finishing with {} container(s) still entered",
                self.guard.depth()
            );
            Err(ErrorCode::UnterminatedContainer)?;
        }

        while self.next()?.is_some() {}

        Ok(())
    }

    /// The current element, i.e. the one returned by the last successful `next` call.
    pub fn current(&self) -> Result<&TLV<'a>, Error> {
        self.current
            .as_ref()
            .ok_or_else(|| ErrorCode::InvalidState.into())
    }

    pub fn tag(&self) -> Result<&TLVTag, Error> {
        Ok(&self.current()?.tag)
    }

    pub fn value_type(&self) -> Result<TLVValueType, Error> {
        Ok(self.current()?.value.value_type())
    }

    /// The number of currently entered containers.
    pub fn depth(&self) -> usize {
        self.guard.depth()
    }

    /// The offset of the first byte not consumed yet.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn config(&self) -> &TLVConfig {
        self.guard.config()
    }

    pub fn i8(&self) -> Result<i8, Error> {
        match self.value()? {
            TLVValue::S8(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn i16(&self) -> Result<i16, Error> {
        match self.value()? {
            TLVValue::S8(a) => Ok(*a as i16),
            TLVValue::S16(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn i32(&self) -> Result<i32, Error> {
        match self.value()? {
            TLVValue::S8(a) => Ok(*a as i32),
            TLVValue::S16(a) => Ok(*a as i32),
            TLVValue::S32(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn i64(&self) -> Result<i64, Error> {
        match self.value()? {
            TLVValue::S8(a) => Ok(*a as i64),
            TLVValue::S16(a) => Ok(*a as i64),
            TLVValue::S32(a) => Ok(*a as i64),
            TLVValue::S64(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn u8(&self) -> Result<u8, Error> {
        match self.value()? {
            TLVValue::U8(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn u16(&self) -> Result<u16, Error> {
        match self.value()? {
            TLVValue::U8(a) => Ok(*a as u16),
            TLVValue::U16(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn u32(&self) -> Result<u32, Error> {
        match self.value()? {
            TLVValue::U8(a) => Ok(*a as u32),
            TLVValue::U16(a) => Ok(*a as u32),
            TLVValue::U32(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn u64(&self) -> Result<u64, Error> {
        match self.value()? {
            TLVValue::U8(a) => Ok(*a as u64),
            TLVValue::U16(a) => Ok(*a as u64),
            TLVValue::U32(a) => Ok(*a as u64),
            TLVValue::U64(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn f32(&self) -> Result<f32, Error> {
        match self.value()? {
            TLVValue::F32(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn f64(&self) -> Result<f64, Error> {
        match self.value()? {
            TLVValue::F64(a) => Ok(*a),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    pub fn bool(&self) -> Result<bool, Error> {
        match self.value()? {
            TLVValue::True => Ok(true),
            TLVValue::False => Ok(false),
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    /// Return the current UTF-8 string, borrowed from the input.
    pub fn utf8(&self) -> Result<&'a str, Error> {
        match self.value()? {
            TLVValue::Utf8l(a) | TLVValue::Utf16l(a) | TLVValue::Utf32l(a) | TLVValue::Utf64l(a) => {
                Ok(*a)
            }
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    /// Return the current octet string, borrowed from the input.
    pub fn str(&self) -> Result<&'a [u8], Error> {
        match self.value()? {
            TLVValue::Str8l(a) | TLVValue::Str16l(a) | TLVValue::Str32l(a) | TLVValue::Str64l(a) => {
                Ok(*a)
            }
            _ => Err(ErrorCode::TypeMismatch.into()),
        }
    }

    /// Return the bytes of the current string, be it a UTF-8 or an octet string.
    pub fn octets(&self) -> Result<&'a [u8], Error> {
        self.value()?.octets().ok_or_else(|| ErrorCode::TypeMismatch.into())
    }

    pub fn is_null(&self) -> Result<bool, Error> {
        Ok(matches!(self.value()?, TLVValue::Null))
    }

    pub fn null(&self) -> Result<(), Error> {
        if self.is_null()? {
            Ok(())
        } else {
            Err(ErrorCode::TypeMismatch.into())
        }
    }

    fn value(&self) -> Result<&TLVValue<'a>, Error> {
        Ok(&self.current()?.value)
    }

    /// Decode the header of the element at `pos` and locate its value bytes.
    fn element_at(&self, pos: usize) -> Result<(TLVHeader, usize, &'a [u8]), Error> {
        let data: &'a [u8] = &self.data[pos..];

        let (header, header_len) = TLVHeader::decode(data).map_err(|e| {
            warn!("Malformed TLV header at offset {}: {}", pos, e);
            e
        })?;

        let rest = &data[header_len..];
        let value_len = header.value_len();

        if value_len > rest.len() as u64 {
            warn!(
                "TLV value at offset {} needs {} bytes, {} available",
                pos,
                value_len,
                rest.len()
            );
            Err(ErrorCode::BufferUnderrun)?;
        }

        Ok((header, header_len, &rest[..value_len as usize]))
    }

    /// Skip the content and the End-of-container of the container whose start
    /// element was the last one returned by `next`.
    ///
    /// The elements are only checked for well-formedness and the depth bound;
    /// tag rules and string contents are not validated.
    fn skip_container(&mut self) -> Result<(), Error> {
        self.skip_pending = false;

        let mut level = 1;
        if self.guard.depth() + level > MAX_CONTAINER_DEPTH {
            warn!("Skipped container exceeds the maximum depth");
            Err(ErrorCode::DepthExceeded)?;
        }

        while level > 0 {
            if self.pos == self.data.len() {
                warn!("Input ends inside a skipped container");
                Err(ErrorCode::UnterminatedContainer)?;
            }

            let (header, header_len, value) = self.element_at(self.pos)?;
            let value_type = header.value_type();

            if value_type.is_container_end() {
                level -= 1;
            } else if value_type.is_container_start() {
                level += 1;

                if self.guard.depth() + level > MAX_CONTAINER_DEPTH {
                    warn!("Skipped container exceeds the maximum depth");
                    Err(ErrorCode::DepthExceeded)?;
                }
            }

            self.pos += header_len + value.len();
        }

        Ok(())
    }
}
