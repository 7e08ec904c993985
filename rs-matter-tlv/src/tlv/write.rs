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

use log::{trace, warn};

use crate::error::{Error, ErrorCode};
use crate::utils::writebuf::WriteBuf;

use super::{
    ContainerToken, NestingGuard, TLVConfig, TLVContainerType, TLVControl, TLVHeader, TLVTag,
    TLVTagType, TLVValue, TLVValueType, MAX_HEADER_LEN,
};

/// A TLV encoder appending elements to a caller-provided, fixed-size buffer.
///
/// Every element is written as a whole or not at all: when an element does not fit,
/// `ErrorCode::OutOfSpace` is returned and the buffer is left as it was.
///
/// Containers are opened with `start_container` (or `start_struct`, `start_array`,
/// `start_list`), which return a `ContainerToken` that must be handed back to
/// `end_container`. Containers must be closed innermost first.
#[derive(Debug)]
pub struct TLVWriter<'a> {
    buf: WriteBuf<'a>,
    guard: NestingGuard,
}

impl<'a> TLVWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::new_with_config(buf, TLVConfig::default())
    }

    pub fn new_with_config(buf: &'a mut [u8], config: TLVConfig) -> Self {
        Self {
            buf: WriteBuf::new(buf),
            guard: NestingGuard::new(config),
        }
    }

    /// Write a tag and a non-container TLV value to the TLV stream.
    ///
    /// Container markers (`Struct`, `Array`, `List`, `EndCnt`) are rejected with
    /// `ErrorCode::TypeMismatch`; use `start_container` and `end_container` instead.
    pub fn put(&mut self, tag: &TLVTag, value: &TLVValue) -> Result<(), Error> {
        if value.value_type().is_container() {
            Err(ErrorCode::TypeMismatch)?;
        }

        self.element(tag, value)
    }

    /// Write a tag and a TLV S8 value to the TLV stream.
    pub fn i8(&mut self, tag: &TLVTag, data: i8) -> Result<(), Error> {
        self.put(tag, &TLVValue::i8(data))
    }

    /// Write a tag and a TLV S16 value to the TLV stream.
    ///
    /// The value is always encoded with 2 octets, even if it would fit in one.
    pub fn i16(&mut self, tag: &TLVTag, data: i16) -> Result<(), Error> {
        self.put(tag, &TLVValue::i16(data))
    }

    pub fn i32(&mut self, tag: &TLVTag, data: i32) -> Result<(), Error> {
        self.put(tag, &TLVValue::i32(data))
    }

    pub fn i64(&mut self, tag: &TLVTag, data: i64) -> Result<(), Error> {
        self.put(tag, &TLVValue::i64(data))
    }

    /// Write a tag and a TLV U8 value to the TLV stream.
    pub fn u8(&mut self, tag: &TLVTag, data: u8) -> Result<(), Error> {
        self.put(tag, &TLVValue::u8(data))
    }

    /// Write a tag and a TLV U16 value to the TLV stream.
    ///
    /// The value is always encoded with 2 octets, even if it would fit in one.
    pub fn u16(&mut self, tag: &TLVTag, data: u16) -> Result<(), Error> {
        self.put(tag, &TLVValue::u16(data))
    }

    pub fn u32(&mut self, tag: &TLVTag, data: u32) -> Result<(), Error> {
        self.put(tag, &TLVValue::u32(data))
    }

    pub fn u64(&mut self, tag: &TLVTag, data: u64) -> Result<(), Error> {
        self.put(tag, &TLVValue::u64(data))
    }

    /// Write a tag and a TLV F32 to the TLV stream.
    pub fn f32(&mut self, tag: &TLVTag, data: f32) -> Result<(), Error> {
        self.put(tag, &TLVValue::f32(data))
    }

    /// Write a tag and a TLV F64 to the TLV stream.
    pub fn f64(&mut self, tag: &TLVTag, data: f64) -> Result<(), Error> {
        self.put(tag, &TLVValue::f64(data))
    }

    pub fn bool(&mut self, tag: &TLVTag, data: bool) -> Result<(), Error> {
        self.put(tag, &TLVValue::bool(data))
    }

    pub fn null(&mut self, tag: &TLVTag) -> Result<(), Error> {
        self.put(tag, &TLVValue::null())
    }

    /// Write a tag and a TLV Octet String to the TLV stream.
    ///
    /// The exact octet string type (Str8l, Str16l, Str32l, or Str64l) is chosen based on the length of the data,
    /// whereas the smallest type filling the provided data length is chosen.
    pub fn str(&mut self, tag: &TLVTag, data: &[u8]) -> Result<(), Error> {
        self.put(tag, &TLVValue::str(data))
    }

    /// Write a tag and a TLV UTF-8 String to the TLV stream.
    ///
    /// The exact UTF-8 string type (Utf8l, Utf16l, Utf32l, or Utf64l) is chosen based on the length of the data,
    /// whereas the smallest type filling the provided data length is chosen.
    pub fn utf8(&mut self, tag: &TLVTag, data: &str) -> Result<(), Error> {
        self.put(tag, &TLVValue::utf8(data))
    }

    /// Write a tag and a value indicating the start of a Struct TLV container.
    pub fn start_struct(&mut self, tag: &TLVTag) -> Result<ContainerToken, Error> {
        self.start_container(tag, TLVContainerType::Struct)
    }

    /// Write a tag and a value indicating the start of an Array TLV container.
    pub fn start_array(&mut self, tag: &TLVTag) -> Result<ContainerToken, Error> {
        self.start_container(tag, TLVContainerType::Array)
    }

    /// Write a tag and a value indicating the start of a List TLV container.
    pub fn start_list(&mut self, tag: &TLVTag) -> Result<ContainerToken, Error> {
        self.start_container(tag, TLVContainerType::List)
    }

    /// Write a tag and a value indicating the start of a TLV container.
    ///
    /// Fails with `ErrorCode::DepthExceeded` if `MAX_CONTAINER_DEPTH` containers
    /// are already open, before anything is written.
    pub fn start_container(
        &mut self,
        tag: &TLVTag,
        kind: TLVContainerType,
    ) -> Result<ContainerToken, Error> {
        self.guard.check_push()?;

        let value = match kind {
            TLVContainerType::Struct => TLVValue::Struct,
            TLVContainerType::Array => TLVValue::Array,
            TLVContainerType::List => TLVValue::List,
        };

        self.element(tag, &value)?;

        self.guard.push(kind)
    }

    /// Write the End-of-container marker of the innermost open container.
    ///
    /// Fails with `ErrorCode::UnbalancedContainer` if `token` does not belong
    /// to the innermost open container.
    pub fn end_container(&mut self, token: ContainerToken) -> Result<(), Error> {
        self.guard.check_pop(&token)?;

        self.buf
            .le_u8(TLVControl::new(TLVTagType::Anonymous, TLVValueType::EndCnt).as_raw())?;

        self.guard.pop(token)
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }

    pub fn len(&self) -> usize {
        self.buf.get_tail()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// The number of currently open containers.
    pub fn depth(&self) -> usize {
        self.guard.depth()
    }

    pub fn config(&self) -> &TLVConfig {
        self.guard.config()
    }

    /// Discard everything written so far, including any open containers.
    pub fn reset(&mut self) {
        self.buf.reset();
        self.guard = NestingGuard::new(*self.guard.config());
    }

    /// Complete the encoding and return the written bytes.
    ///
    /// Fails with `ErrorCode::UnterminatedContainer` if some containers are still open.
    pub fn finalize(self) -> Result<&'a [u8], Error> {
        if self.guard.depth() > 0 {
            warn!(
                "Finalizing with {} container(s) still open",
                self.guard.depth()
            );
            Err(ErrorCode::UnterminatedContainer)?;
        }

        Ok(self.buf.into_written())
    }

    fn element(&mut self, tag: &TLVTag, value: &TLVValue) -> Result<(), Error> {
        self.guard.check_tag(tag)?;

        let header = TLVHeader::for_value(tag.clone(), value)?;

        let mut header_buf = [0; MAX_HEADER_LEN];
        let header_len = header.encode(&mut header_buf);

        let mut fixed_buf = [0; 8];
        let fixed_len = value.encode_fixed(&mut fixed_buf);

        let data = value.octets().unwrap_or(&fixed_buf[..fixed_len]);

        self.buf.append_parts(&[&header_buf[..header_len], data])?;
        self.guard.mark_tag(tag);

        trace!("Wrote {}: {}", tag, value);

        Ok(())
    }
}
