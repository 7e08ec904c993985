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

use rs_matter_tlv::error::Error;
use rs_matter_tlv::tlv::TLVReader;

#[derive(Clone, Copy, Debug)]
pub enum InputBase {
    Hex,
    Dec,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub input: String,
    pub error: std::num::ParseIntError,
}

impl InputBase {
    /// Parses a single input
    ///
    /// # Examples
    ///
    /// ```
    /// use parser::InputBase;
    ///
    /// assert_eq!(InputBase::Hex.try_parse("12"), Ok(0x12));
    /// assert_eq!(InputBase::Dec.try_parse("12"), Ok(12));
    /// assert_eq!(InputBase::Hex.try_parse("0x12"), Ok(0x12));
    /// assert_eq!(InputBase::Dec.try_parse("0x12"), Ok(0x12)); // always hex if prefix
    /// ```
    pub fn try_parse(self, s: impl AsRef<str>) -> Result<u8, ParseError> {
        let s = s.as_ref();

        let error_map = |error: std::num::ParseIntError| ParseError {
            input: s.into(),
            error,
        };

        if let Some(suffix) = s.strip_prefix("0x") {
            // this is always hex
            return u8::from_str_radix(suffix, 16).map_err(error_map);
        }

        match self {
            InputBase::Hex => u8::from_str_radix(s, 16),
            InputBase::Dec => s.parse::<u8>(),
        }
        .map_err(error_map)
    }

    /// Parses a separated list of octets.
    ///
    /// # Examples
    ///
    /// ```
    /// use parser::InputBase;
    ///
    /// assert_eq!(InputBase::Hex.parse_list("1, 2, 10, 20", ','), vec![1, 2, 0x10, 0x20]);
    /// assert_eq!(InputBase::Dec.parse_list("1, 2, 10, 20", ','), vec![1, 2, 10, 20]);
    /// assert_eq!(InputBase::Dec.parse_list("1:2:3:123", ':'), vec![1, 2, 3, 123]);
    ///
    /// // Parsing is lenient (ignores/skips errors)
    /// assert_eq!(InputBase::Dec.parse_list("1, 2, foo, 10, bar, 20", ','), vec![1, 2, 10, 20]);
    /// ```
    pub fn parse_list(self, list: &str, separator: char) -> Vec<u8> {
        list.split(separator)
            .map(|b| self.try_parse(b.trim()))
            .filter_map(|r| {
                if let Err(ref err) = r {
                    warn!("Skipping '{}': {}", err.input, err.error);
                }
                r.ok()
            })
            .collect()
    }
}

/// Parses a contiguous hex string, e.g. `"1518"`.
///
/// Whitespace is ignored; unlike `InputBase::parse_list`, any other invalid
/// character is an error.
pub fn parse_hexstring(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();

    hex::decode(s.strip_prefix("0x").unwrap_or(s.as_str()))
}

/// Walks the whole TLV stream, entering every container, and returns the first
/// decoding error, if any.
pub fn validate(data: &[u8]) -> Result<(), Error> {
    let mut reader = TLVReader::new(data);
    let mut open = Vec::new();

    loop {
        match reader.next()? {
            Some(tlv) => {
                if tlv.container_type().is_some() {
                    open.push(reader.enter_container()?);
                }
            }
            None => match open.pop() {
                Some(token) => reader.exit_container(token)?,
                None => break,
            },
        }
    }

    reader.finish()
}
