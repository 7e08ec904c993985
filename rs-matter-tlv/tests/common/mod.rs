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

use rs_matter_tlv::error::Error;
use rs_matter_tlv::tlv::{TLVConfig, TLVReader, TLVTag, TLVValue, TLVWriter, TLV};

pub fn init_env_logger() {
    #[cfg(feature = "std")]
    {
        let _ = env_logger::try_init_from_env(
            env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
        );
    }
}

/// The marker used in flat element sequences for an End-of-container.
pub const END: TLV<'static> = TLV::new(TLVTag::Anonymous, TLVValue::EndCnt);

/// Encode a flat sequence of elements, where container starts are followed by
/// their members and an `END` marker.
pub fn encode(elements: &[TLV], config: TLVConfig) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0; 4096];
    let mut tw = TLVWriter::new_with_config(&mut buf, config);
    let mut open = Vec::new();

    for element in elements {
        if element.value == TLVValue::EndCnt {
            let token = open.pop().expect("END without an open container");
            tw.end_container(token)?;
        } else if let Some(kind) = element.container_type() {
            open.push(tw.start_container(&element.tag, kind)?);
        } else {
            tw.put(&element.tag, &element.value)?;
        }
    }

    Ok(tw.finalize()?.to_vec())
}

/// Decode a whole TLV stream into a flat sequence of elements, entering every container.
pub fn decode(data: &[u8], config: TLVConfig) -> Result<Vec<TLV<'_>>, Error> {
    let mut reader = TLVReader::new_with_config(data, config);
    let mut open = Vec::new();
    let mut elements = Vec::new();

    loop {
        match reader.next()? {
            Some(tlv) => {
                let container = tlv.container_type().is_some();
                elements.push(tlv);

                if container {
                    open.push(reader.enter_container()?);
                }
            }
            None => match open.pop() {
                Some(token) => {
                    reader.exit_container(token)?;
                    elements.push(END);
                }
                None => break,
            },
        }
    }

    reader.finish()?;

    Ok(elements)
}
