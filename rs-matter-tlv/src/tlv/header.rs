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

use byteorder::{ByteOrder, LittleEndian};

use num_traits::FromPrimitive;

use crate::error::{Error, ErrorCode};

use super::{TLVTag, TLVTagType, TLVValue, TLVValueType};

/// The maximum size of an element header:
/// control byte + the longest tag (8) + the longest length field (8).
pub const MAX_HEADER_LEN: usize = 1 + 8 + 8;

/// The control byte of a TLV element: the tag type in the upper 3 bits
/// and the value type in the lower 5 bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TLVControl {
    pub tag_type: TLVTagType,
    pub value_type: TLVValueType,
}

impl TLVControl {
    const TAG_SHIFT_BITS: u8 = 5;
    const TAG_MASK: u8 = 0xe0;
    const TYPE_MASK: u8 = 0x1f;

    pub const fn new(tag_type: TLVTagType, value_type: TLVValueType) -> Self {
        Self {
            tag_type,
            value_type,
        }
    }

    /// Parse a raw control byte.
    ///
    /// Fails with `ErrorCode::MalformedElement` for the reserved value types
    /// (25-31) and for an End-of-container that carries a tag.
    pub fn parse(control: u8) -> Result<Self, Error> {
        let tag_type = TLVTagType::from_u8((control & Self::TAG_MASK) >> Self::TAG_SHIFT_BITS)
            .ok_or(ErrorCode::MalformedElement)?;
        let value_type =
            TLVValueType::from_u8(control & Self::TYPE_MASK).ok_or(ErrorCode::MalformedElement)?;

        if value_type.is_container_end() && tag_type != TLVTagType::Anonymous {
            Err(ErrorCode::MalformedElement)?;
        }

        Ok(Self::new(tag_type, value_type))
    }

    pub const fn as_raw(&self) -> u8 {
        ((self.tag_type as u8) << Self::TAG_SHIFT_BITS) | (self.value_type as u8)
    }
}

/// The header of a TLV element: everything that precedes the value bytes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TLVHeader {
    pub control: TLVControl,
    pub tag: TLVTag,
    /// The explicit length field of string elements; 0 for all other types.
    pub len: u64,
}

impl TLVHeader {
    /// Build the header of an element carrying `value`.
    ///
    /// Fails with `ErrorCode::InvalidArgument` if `value` is an explicit string
    /// variant whose data does not fit the variant's length field.
    pub fn for_value(tag: TLVTag, value: &TLVValue<'_>) -> Result<Self, Error> {
        let value_type = value.value_type();
        let len = value.octets().map(|data| data.len() as u64).unwrap_or(0);

        let len_bytes = value_type.variable_size_len();
        if len_bytes > 0 && len_bytes < 8 && len >> (len_bytes * 8) != 0 {
            Err(ErrorCode::InvalidArgument)?;
        }

        Ok(Self {
            control: TLVControl::new(tag.tag_type(), value_type),
            tag,
            len,
        })
    }

    pub const fn value_type(&self) -> TLVValueType {
        self.control.value_type
    }

    /// The number of header bytes: control byte, tag and length field.
    pub const fn header_len(&self) -> usize {
        1 + self.control.tag_type.size() + self.control.value_type.variable_size_len()
    }

    /// The number of value bytes that follow the header.
    pub fn value_len(&self) -> u64 {
        match self.control.value_type.fixed_size() {
            Some(size) => size as u64,
            None => self.len,
        }
    }

    /// Write the header into `out` and return the number of bytes used.
    pub fn encode(&self, out: &mut [u8; MAX_HEADER_LEN]) -> usize {
        out[0] = self.control.as_raw();

        let tag_end = 1 + self.tag.encode(&mut out[1..]);

        let len_bytes = self.control.value_type.variable_size_len();
        if len_bytes > 0 {
            LittleEndian::write_uint(&mut out[tag_end..tag_end + len_bytes], self.len, len_bytes);
        }

        tag_end + len_bytes
    }

    /// Decode a header from the beginning of `data`, returning it together
    /// with the number of bytes it occupies.
    ///
    /// The whole header size is checked against `data` before the tag is
    /// decoded, so a truncated header always fails with `ErrorCode::BufferUnderrun`.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), Error> {
        let control = TLVControl::parse(*data.first().ok_or(ErrorCode::BufferUnderrun)?)?;

        let tag_len = control.tag_type.size();
        let len_bytes = control.value_type.variable_size_len();
        let header_len = 1 + tag_len + len_bytes;

        if data.len() < header_len {
            Err(ErrorCode::BufferUnderrun)?;
        }

        let tag = TLVTag::decode(control.tag_type, &data[1..1 + tag_len])?;

        let len = if len_bytes > 0 {
            LittleEndian::read_uint(&data[1 + tag_len..header_len], len_bytes)
        } else {
            0
        };

        Ok((Self { control, tag, len }, header_len))
    }
}
