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

use super::{pad, ContainerToken, TLVConfig, TLVReader, MAX_CONTAINER_DEPTH};

/// Renders a TLV stream as an indented tree, one element per line.
///
/// Malformed input is rendered up to the offending element, followed by
/// a line with the error.
#[derive(Debug, Clone)]
pub struct TLVDisplay<'a> {
    data: &'a [u8],
    config: TLVConfig,
}

impl<'a> TLVDisplay<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self::new_with_config(data, TLVConfig::new())
    }

    pub const fn new_with_config(data: &'a [u8], config: TLVConfig) -> Self {
        Self { data, config }
    }
}

impl fmt::Display for TLVDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reader = TLVReader::new_with_config(self.data, self.config);
        let mut open: heapless::Vec<ContainerToken, MAX_CONTAINER_DEPTH> = heapless::Vec::new();

        loop {
            let error = match reader.next() {
                Ok(Some(tlv)) => {
                    pad(open.len(), f)?;
                    writeln!(f, "{}", tlv)?;

                    if tlv.container_type().is_none() {
                        continue;
                    }

                    match reader.enter_container() {
                        Ok(token) => {
                            open.push(token).map_err(|_| fmt::Error)?;
                            continue;
                        }
                        Err(e) => e,
                    }
                }
                Ok(None) => {
                    let Some(token) = open.pop() else {
                        return Ok(());
                    };

                    let kind = token.kind();

                    match reader.exit_container(token) {
                        Ok(()) => {
                            pad(open.len(), f)?;
                            writeln!(f, "{}", kind.close_char())?;
                            continue;
                        }
                        Err(e) => e,
                    }
                }
                Err(e) => e,
            };

            pad(open.len(), f)?;
            return writeln!(f, "<{} at offset {}>", error, reader.position());
        }
    }
}
