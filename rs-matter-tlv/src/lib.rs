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

//! Native Rust implementation of the Matter TLV (Tag-Length-Value) wire format.
//!
//! The crate encodes and decodes TLV streams in caller-provided buffers, without
//! allocating, and can be used in `no_std` environments (disable the default `std` feature).
//!
//! # Examples
//! ```
//! use rs_matter_tlv::tlv::{TLVReader, TLVTag, TLVValueType, TLVWriter};
//!
//! let mut buf = [0; 32];
//! let mut tw = TLVWriter::new(&mut buf);
//!
//! let s = tw.start_struct(&TLVTag::Anonymous).unwrap();
//! tw.u8(&TLVTag::Context(0), 1).unwrap();
//! tw.null(&TLVTag::Context(1)).unwrap();
//! let a = tw.start_array(&TLVTag::Context(2)).unwrap();
//! tw.u16(&TLVTag::Anonymous, 1000).unwrap();
//! tw.u16(&TLVTag::Anonymous, 2000).unwrap();
//! tw.end_container(a).unwrap();
//! tw.end_container(s).unwrap();
//!
//! let data = tw.finalize().unwrap();
//!
//! let mut reader = TLVReader::new(data);
//! reader.next().unwrap();
//! let s = reader.enter_container().unwrap();
//!
//! reader.next().unwrap();
//! assert_eq!(reader.u8().unwrap(), 1);
//!
//! reader.next().unwrap();
//! assert!(reader.is_null().unwrap());
//!
//! reader.next().unwrap();
//! assert_eq!(reader.value_type().unwrap(), TLVValueType::Array);
//!
//! reader.exit_container(s).unwrap();
//! reader.finish().unwrap();
//! ```
//!
//! Start off exploring by going to the [tlv] module.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod tlv;
pub mod utils;
