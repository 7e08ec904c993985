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

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, ErrorCode};

pub use config::*;
pub use display::*;
pub use guard::*;
pub use header::*;
pub use read::*;
pub use write::*;

mod config;
mod display;
mod guard;
mod header;
mod read;
mod write;

/// The profile id of the Matter common profile.
pub const COMMON_PROFILE_ID: u32 = 0x0000_0000;

/// Represents the TLV tag type encoded in the control byte of each TLV element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, num_derive::FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TLVTagType {
    Anonymous = 0,
    Context = 1,
    CommonPrf16 = 2,
    CommonPrf32 = 3,
    ImplPrf16 = 4,
    ImplPrf32 = 5,
    FullQual48 = 6,
    FullQual64 = 7,
}

impl TLVTagType {
    /// Return the size of the tag data following the control byte
    /// in the TLV element representation.
    pub const fn size(&self) -> usize {
        match self {
            Self::Anonymous => 0,
            Self::Context => 1,
            Self::CommonPrf16 => 2,
            Self::CommonPrf32 => 4,
            Self::ImplPrf16 => 2,
            Self::ImplPrf32 => 4,
            Self::FullQual48 => 6,
            Self::FullQual64 => 8,
        }
    }
}

impl fmt::Display for TLVTagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Represents the TLV value type encoded in the control byte of each TLV element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, num_derive::FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TLVValueType {
    S8 = 0,
    S16 = 1,
    S32 = 2,
    S64 = 3,
    U8 = 4,
    U16 = 5,
    U32 = 6,
    U64 = 7,
    False = 8,
    True = 9,
    F32 = 10,
    F64 = 11,
    Utf8l = 12,
    Utf16l = 13,
    Utf32l = 14,
    Utf64l = 15,
    Str8l = 16,
    Str16l = 17,
    Str32l = 18,
    Str64l = 19,
    Null = 20,
    Struct = 21,
    Array = 22,
    List = 23,
    EndCnt = 24,
}

impl TLVValueType {
    /// Return the size of the value corresponding to this value type.
    ///
    /// If the value type has a variable size (i.e. octet and Utf8 strings), this function returns `None`.
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::S8 | Self::U8 => Some(1),
            Self::S16 | Self::U16 => Some(2),
            Self::S32 | Self::U32 | Self::F32 => Some(4),
            Self::S64 | Self::U64 | Self::F64 => Some(8),
            Self::Utf8l
            | Self::Utf16l
            | Self::Utf32l
            | Self::Utf64l
            | Self::Str8l
            | Self::Str16l
            | Self::Str32l
            | Self::Str64l => None,
            _ => Some(0),
        }
    }

    /// Return the size of the length field for variable size value types.
    ///
    /// if the value type has a fixed size, this function returns 0.
    pub const fn variable_size_len(&self) -> usize {
        match self {
            Self::Utf8l | Self::Str8l => 1,
            Self::Utf16l | Self::Str16l => 2,
            Self::Utf32l | Self::Str32l => 4,
            Self::Utf64l | Self::Str64l => 8,
            _ => 0,
        }
    }

    /// Convenience method to check if the value type is a container type
    /// (container start or end).
    pub const fn is_container(&self) -> bool {
        self.is_container_start() || self.is_container_end()
    }

    pub const fn is_container_start(&self) -> bool {
        matches!(self, Self::Struct | Self::Array | Self::List)
    }

    pub const fn is_container_end(&self) -> bool {
        matches!(self, Self::EndCnt)
    }

    /// Convenience method to check if the value type is an Octet String type.
    pub const fn is_str(&self) -> bool {
        matches!(
            self,
            Self::Str8l | Self::Str16l | Self::Str32l | Self::Str64l
        )
    }

    /// Convenience method to check if the value type is a UTF-8 String type.
    pub const fn is_utf8(&self) -> bool {
        matches!(
            self,
            Self::Utf8l | Self::Utf16l | Self::Utf32l | Self::Utf64l
        )
    }
}

impl fmt::Display for TLVValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The three kinds of TLV containers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TLVContainerType {
    Struct,
    Array,
    List,
}

impl TLVContainerType {
    /// Return the value type of the element that opens a container of this kind.
    pub const fn value_type(&self) -> TLVValueType {
        match self {
            Self::Struct => TLVValueType::Struct,
            Self::Array => TLVValueType::Array,
            Self::List => TLVValueType::List,
        }
    }

    /// Return the container kind opened by an element of the provided value type, if any.
    pub const fn from_value_type(value_type: TLVValueType) -> Option<Self> {
        match value_type {
            TLVValueType::Struct => Some(Self::Struct),
            TLVValueType::Array => Some(Self::Array),
            TLVValueType::List => Some(Self::List),
            _ => None,
        }
    }

    pub(crate) const fn close_char(&self) -> char {
        match self {
            Self::Struct => '}',
            Self::Array => ']',
            Self::List => ')',
        }
    }
}

impl fmt::Display for TLVContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A high-level representation of a TLV tag (tag type and tag value).
///
/// The tag form is always the one chosen by the caller: a `CommonPrf32(1)` tag
/// is emitted with 4 tag bytes even though its number would fit in 2.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TLVTag {
    Anonymous,
    Context(u8),
    CommonPrf16(u16),
    CommonPrf32(u32),
    ImplPrf16(u16),
    ImplPrf32(u32),
    FullQual48 {
        vendor_id: u16,
        profile: u16,
        tag: u16,
    },
    FullQual64 {
        vendor_id: u16,
        profile: u16,
        tag: u32,
    },
}

impl TLVTag {
    /// Return the tag type of the TLV tag.
    pub const fn tag_type(&self) -> TLVTagType {
        match self {
            Self::Anonymous => TLVTagType::Anonymous,
            Self::Context(_) => TLVTagType::Context,
            Self::CommonPrf16(_) => TLVTagType::CommonPrf16,
            Self::CommonPrf32(_) => TLVTagType::CommonPrf32,
            Self::ImplPrf16(_) => TLVTagType::ImplPrf16,
            Self::ImplPrf32(_) => TLVTagType::ImplPrf32,
            Self::FullQual48 { .. } => TLVTagType::FullQual48,
            Self::FullQual64 { .. } => TLVTagType::FullQual64,
        }
    }

    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Return the context tag number, if this is a context tag.
    pub const fn ctx(&self) -> Option<u8> {
        match self {
            Self::Context(tag) => Some(*tag),
            _ => None,
        }
    }

    /// Resolve the tag to a `(profile id, tag number)` pair.
    ///
    /// The implicit profile is tracked by the caller and is only used for the
    /// `ImplPrf16`/`ImplPrf32` forms. Anonymous and context tags do not belong
    /// to a profile and resolve to `None`.
    pub fn resolve(&self, implicit_profile: Option<u32>) -> Option<(u32, u32)> {
        match self {
            Self::Anonymous | Self::Context(_) => None,
            Self::CommonPrf16(tag) => Some((COMMON_PROFILE_ID, *tag as u32)),
            Self::CommonPrf32(tag) => Some((COMMON_PROFILE_ID, *tag)),
            Self::ImplPrf16(tag) => implicit_profile.map(|profile| (profile, *tag as u32)),
            Self::ImplPrf32(tag) => implicit_profile.map(|profile| (profile, *tag)),
            Self::FullQual48 {
                vendor_id,
                profile,
                tag,
            } => Some((
                ((*vendor_id as u32) << 16) | *profile as u32,
                *tag as u32,
            )),
            Self::FullQual64 {
                vendor_id,
                profile,
                tag,
            } => Some((((*vendor_id as u32) << 16) | *profile as u32, *tag)),
        }
    }

    /// Write the tag bytes (not including the control byte) into `out`
    /// and return their count.
    ///
    /// `out` must be at least `self.tag_type().size()` bytes long.
    pub fn encode(&self, out: &mut [u8]) -> usize {
        match self {
            Self::Anonymous => (),
            Self::Context(tag) => out[0] = *tag,
            Self::CommonPrf16(tag) | Self::ImplPrf16(tag) => LittleEndian::write_u16(out, *tag),
            Self::CommonPrf32(tag) | Self::ImplPrf32(tag) => LittleEndian::write_u32(out, *tag),
            Self::FullQual48 {
                vendor_id,
                profile,
                tag,
            } => {
                LittleEndian::write_u16(&mut out[0..2], *vendor_id);
                LittleEndian::write_u16(&mut out[2..4], *profile);
                LittleEndian::write_u16(&mut out[4..6], *tag);
            }
            Self::FullQual64 {
                vendor_id,
                profile,
                tag,
            } => {
                LittleEndian::write_u16(&mut out[0..2], *vendor_id);
                LittleEndian::write_u16(&mut out[2..4], *profile);
                LittleEndian::write_u32(&mut out[4..8], *tag);
            }
        }

        self.tag_type().size()
    }

    /// Decode a tag of the provided type from the beginning of `data`.
    ///
    /// Returns an error with code `ErrorCode::MalformedTag` if `data` is shorter
    /// than the tag form requires.
    pub fn decode(tag_type: TLVTagType, data: &[u8]) -> Result<Self, Error> {
        let data = data
            .get(..tag_type.size())
            .ok_or(ErrorCode::MalformedTag)?;

        let tag = match tag_type {
            TLVTagType::Anonymous => Self::Anonymous,
            TLVTagType::Context => Self::Context(data[0]),
            TLVTagType::CommonPrf16 => Self::CommonPrf16(LittleEndian::read_u16(data)),
            TLVTagType::CommonPrf32 => Self::CommonPrf32(LittleEndian::read_u32(data)),
            TLVTagType::ImplPrf16 => Self::ImplPrf16(LittleEndian::read_u16(data)),
            TLVTagType::ImplPrf32 => Self::ImplPrf32(LittleEndian::read_u32(data)),
            TLVTagType::FullQual48 => Self::FullQual48 {
                vendor_id: LittleEndian::read_u16(&data[0..2]),
                profile: LittleEndian::read_u16(&data[2..4]),
                tag: LittleEndian::read_u16(&data[4..6]),
            },
            TLVTagType::FullQual64 => Self::FullQual64 {
                vendor_id: LittleEndian::read_u16(&data[0..2]),
                profile: LittleEndian::read_u16(&data[2..4]),
                tag: LittleEndian::read_u32(&data[4..8]),
            },
        };

        Ok(tag)
    }
}

impl fmt::Display for TLVTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TLVTag::Anonymous => write!(f, "Anonymous"),
            TLVTag::Context(tag) => write!(f, "{tag}"),
            TLVTag::CommonPrf16(tag) => write!(f, "CommonPrf16({tag})"),
            TLVTag::CommonPrf32(tag) => write!(f, "CommonPrf32({tag})"),
            TLVTag::ImplPrf16(tag) => write!(f, "ImplPrf16({tag})"),
            TLVTag::ImplPrf32(tag) => write!(f, "ImplPrf32({tag})"),
            TLVTag::FullQual48 {
                vendor_id,
                profile,
                tag,
            } => write!(f, "FullQual48(VID:{vendor_id} PRF:{profile} {tag})"),
            TLVTag::FullQual64 {
                vendor_id,
                profile,
                tag,
            } => write!(f, "FullQual64(VID:{vendor_id} PRF:{profile} {tag})"),
        }
    }
}

/// A high-level representation of a TLV value.
///
/// Strings borrow from the buffer they were decoded from (or are about to be encoded from).
/// Containers are represented only by their start (`Struct`, `Array`, `List`) and end (`EndCnt`)
/// markers; their content is a sequence of sibling elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TLVValue<'a> {
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    False,
    True,
    F32(f32),
    F64(f64),
    Utf8l(&'a str),
    Utf16l(&'a str),
    Utf32l(&'a str),
    Utf64l(&'a str),
    Str8l(&'a [u8]),
    Str16l(&'a [u8]),
    Str32l(&'a [u8]),
    Str64l(&'a [u8]),
    Null,
    Struct,
    Array,
    List,
    EndCnt,
}

impl<'a> TLVValue<'a> {
    /// Return the value type of the TLV value.
    pub const fn value_type(&self) -> TLVValueType {
        match self {
            Self::S8(_) => TLVValueType::S8,
            Self::S16(_) => TLVValueType::S16,
            Self::S32(_) => TLVValueType::S32,
            Self::S64(_) => TLVValueType::S64,
            Self::U8(_) => TLVValueType::U8,
            Self::U16(_) => TLVValueType::U16,
            Self::U32(_) => TLVValueType::U32,
            Self::U64(_) => TLVValueType::U64,
            Self::False => TLVValueType::False,
            Self::True => TLVValueType::True,
            Self::F32(_) => TLVValueType::F32,
            Self::F64(_) => TLVValueType::F64,
            Self::Utf8l(_) => TLVValueType::Utf8l,
            Self::Utf16l(_) => TLVValueType::Utf16l,
            Self::Utf32l(_) => TLVValueType::Utf32l,
            Self::Utf64l(_) => TLVValueType::Utf64l,
            Self::Str8l(_) => TLVValueType::Str8l,
            Self::Str16l(_) => TLVValueType::Str16l,
            Self::Str32l(_) => TLVValueType::Str32l,
            Self::Str64l(_) => TLVValueType::Str64l,
            Self::Null => TLVValueType::Null,
            Self::Struct => TLVValueType::Struct,
            Self::Array => TLVValueType::Array,
            Self::List => TLVValueType::List,
            Self::EndCnt => TLVValueType::EndCnt,
        }
    }

    /// Create a TLV value as an S8 TLV value.
    pub const fn i8(value: i8) -> Self {
        Self::S8(value)
    }

    /// Create a TLV value as an S16 TLV value.
    ///
    /// The width is kept as declared, even if the value would fit in an S8.
    pub const fn i16(value: i16) -> Self {
        Self::S16(value)
    }

    pub const fn i32(value: i32) -> Self {
        Self::S32(value)
    }

    pub const fn i64(value: i64) -> Self {
        Self::S64(value)
    }

    pub const fn u8(value: u8) -> Self {
        Self::U8(value)
    }

    /// Create a TLV value as a U16 TLV value.
    ///
    /// The width is kept as declared, even if the value would fit in a U8.
    pub const fn u16(value: u16) -> Self {
        Self::U16(value)
    }

    pub const fn u32(value: u32) -> Self {
        Self::U32(value)
    }

    pub const fn u64(value: u64) -> Self {
        Self::U64(value)
    }

    pub const fn f32(value: f32) -> Self {
        Self::F32(value)
    }

    pub const fn f64(value: f64) -> Self {
        Self::F64(value)
    }

    /// Create a TLV value as a UTF-8 TLV value.
    /// The length of the string is encoded as 1, 2, 4 or 8 octets,
    /// depending on the length of the string.
    pub const fn utf8(value: &'a str) -> Self {
        let len = value.len() as u64;

        if len <= u8::MAX as u64 {
            Self::Utf8l(value)
        } else if len <= u16::MAX as u64 {
            Self::Utf16l(value)
        } else if len <= u32::MAX as u64 {
            Self::Utf32l(value)
        } else {
            Self::Utf64l(value)
        }
    }

    /// Create a TLV value as an octet string TLV value.
    /// The length of the string is encoded as 1, 2, 4 or 8 octets,
    /// depending on the length of the string.
    pub const fn str(value: &'a [u8]) -> Self {
        let len = value.len() as u64;

        if len <= u8::MAX as u64 {
            Self::Str8l(value)
        } else if len <= u16::MAX as u64 {
            Self::Str16l(value)
        } else if len <= u32::MAX as u64 {
            Self::Str32l(value)
        } else {
            Self::Str64l(value)
        }
    }

    /// Create a TLV value of type boolean (True or False).
    pub const fn bool(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    pub const fn null() -> Self {
        Self::Null
    }

    /// Return the bytes of a UTF-8 or octet string value, or `None` for any other value.
    pub fn octets(&self) -> Option<&'a [u8]> {
        match self {
            Self::Utf8l(a) | Self::Utf16l(a) | Self::Utf32l(a) | Self::Utf64l(a) => {
                Some(a.as_bytes())
            }
            Self::Str8l(a) | Self::Str16l(a) | Self::Str32l(a) | Self::Str64l(a) => Some(a),
            _ => None,
        }
    }

    /// Write the little-endian bytes of a fixed-size value into `out` and return their count.
    ///
    /// Strings and value-less types (booleans, null, container markers) write nothing.
    pub fn encode_fixed(&self, out: &mut [u8; 8]) -> usize {
        match self {
            Self::S8(a) => put_le(out, &a.to_le_bytes()),
            Self::S16(a) => put_le(out, &a.to_le_bytes()),
            Self::S32(a) => put_le(out, &a.to_le_bytes()),
            Self::S64(a) => put_le(out, &a.to_le_bytes()),
            Self::U8(a) => put_le(out, &a.to_le_bytes()),
            Self::U16(a) => put_le(out, &a.to_le_bytes()),
            Self::U32(a) => put_le(out, &a.to_le_bytes()),
            Self::U64(a) => put_le(out, &a.to_le_bytes()),
            Self::F32(a) => put_le(out, &a.to_le_bytes()),
            Self::F64(a) => put_le(out, &a.to_le_bytes()),
            _ => 0,
        }
    }

    /// Decode a value of the provided type from its raw value bytes
    /// (i.e. what follows the control byte, the tag and the length field).
    ///
    /// The caller guarantees that `data` has exactly the length implied by the
    /// value type (or by the length field, for strings).
    pub(crate) fn decode(value_type: TLVValueType, data: &'a [u8]) -> Result<Self, Error> {
        let value = match value_type {
            TLVValueType::S8 => Self::S8(data[0] as i8),
            TLVValueType::S16 => Self::S16(LittleEndian::read_i16(data)),
            TLVValueType::S32 => Self::S32(LittleEndian::read_i32(data)),
            TLVValueType::S64 => Self::S64(LittleEndian::read_i64(data)),
            TLVValueType::U8 => Self::U8(data[0]),
            TLVValueType::U16 => Self::U16(LittleEndian::read_u16(data)),
            TLVValueType::U32 => Self::U32(LittleEndian::read_u32(data)),
            TLVValueType::U64 => Self::U64(LittleEndian::read_u64(data)),
            TLVValueType::False => Self::False,
            TLVValueType::True => Self::True,
            TLVValueType::F32 => Self::F32(LittleEndian::read_f32(data)),
            TLVValueType::F64 => Self::F64(LittleEndian::read_f64(data)),
            TLVValueType::Utf8l => Self::Utf8l(utf8(data)?),
            TLVValueType::Utf16l => Self::Utf16l(utf8(data)?),
            TLVValueType::Utf32l => Self::Utf32l(utf8(data)?),
            TLVValueType::Utf64l => Self::Utf64l(utf8(data)?),
            TLVValueType::Str8l => Self::Str8l(data),
            TLVValueType::Str16l => Self::Str16l(data),
            TLVValueType::Str32l => Self::Str32l(data),
            TLVValueType::Str64l => Self::Str64l(data),
            TLVValueType::Null => Self::Null,
            TLVValueType::Struct => Self::Struct,
            TLVValueType::Array => Self::Array,
            TLVValueType::List => Self::List,
            TLVValueType::EndCnt => Self::EndCnt,
        };

        Ok(value)
    }
}

fn put_le(out: &mut [u8; 8], bytes: &[u8]) -> usize {
    out[..bytes.len()].copy_from_slice(bytes);

    bytes.len()
}

fn utf8(data: &[u8]) -> Result<&str, Error> {
    core::str::from_utf8(data).map_err(|_| ErrorCode::MalformedElement.into())
}

impl fmt::Display for TLVValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S8(a) => write!(f, "S8({a})"),
            Self::S16(a) => write!(f, "S16({a})"),
            Self::S32(a) => write!(f, "S32({a})"),
            Self::S64(a) => write!(f, "S64({a})"),
            Self::U8(a) => write!(f, "U8(0x{a:02x})"),
            Self::U16(a) => write!(f, "U16(0x{a:04x})"),
            Self::U32(a) => write!(f, "U32(0x{a:08x})"),
            Self::U64(a) => write!(f, "U64(0x{a:016x})"),
            Self::F32(a) => write!(f, "F32({a})"),
            Self::F64(a) => write!(f, "F64({a})"),
            Self::Null => write!(f, "Null"),
            Self::Struct => write!(f, "{{"),
            Self::Array => write!(f, "["),
            Self::List => write!(f, "("),
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Utf8l(a) | Self::Utf16l(a) | Self::Utf32l(a) | Self::Utf64l(a) => {
                write!(f, "\"{a}\"")
            }
            Self::Str8l(a) | Self::Str16l(a) | Self::Str32l(a) | Self::Str64l(a) => {
                write!(f, "({}){a:02X?}", a.len())
            }
            Self::EndCnt => write!(f, ">"),
        }
    }
}

/// A TLV tag + value pair, i.e. one decoded (or to-be-encoded) element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TLV<'a> {
    pub tag: TLVTag,
    pub value: TLVValue<'a>,
}

impl<'a> TLV<'a> {
    pub const fn new(tag: TLVTag, value: TLVValue<'a>) -> Self {
        Self { tag, value }
    }

    /// Return the container kind if this element opens a container.
    pub const fn container_type(&self) -> Option<TLVContainerType> {
        TLVContainerType::from_value_type(self.value.value_type())
    }
}

impl fmt::Display for TLV<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tag.is_anonymous() {
            write!(f, "{}: ", self.tag)?;
        }

        write!(f, "{}", self.value)
    }
}

pub(crate) fn pad(ident: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for _ in 0..ident {
        write!(f, "  ")?;
    }

    Ok(())
}
