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

mod common;

#[cfg(test)]
mod tlv_encoding_tests {
    use rstest::rstest;

    use rs_matter_tlv::error::ErrorCode;
    use rs_matter_tlv::tlv::{
        DuplicateTagPolicy, TLVConfig, TLVDisplay, TLVReader, TLVTag, TLVValue, TLVValueType,
        TLVWriter, MAX_CONTAINER_DEPTH, TLV,
    };

    use crate::common::{decode, encode, init_env_logger, END};

    const FQ48: TLVTag = TLVTag::FullQual48 {
        vendor_id: 0xfff1,
        profile: 0xdeed,
        tag: 0xaa55,
    };

    const FQ64: TLVTag = TLVTag::FullQual64 {
        vendor_id: 0xfff1,
        profile: 0xdeed,
        tag: 0xaa55feed,
    };

    macro_rules! asserted_ok {
        ($a:expr, $message: literal) => {
            match $a {
                Ok(value) => value,
                Err(e) => {
                    panic!("{} failed with {:?}", $message, e);
                }
            }
        };
    }

    /// Structure{0 = u8(1), 1 = Null, 2 = Array[u16(1000), u16(2000)]}
    fn scenario() -> Vec<TLV<'static>> {
        vec![
            TLV::new(TLVTag::Anonymous, TLVValue::Struct),
            TLV::new(TLVTag::Context(0), TLVValue::U8(1)),
            TLV::new(TLVTag::Context(1), TLVValue::Null),
            TLV::new(TLVTag::Context(2), TLVValue::Array),
            TLV::new(TLVTag::Anonymous, TLVValue::U16(1000)),
            TLV::new(TLVTag::Anonymous, TLVValue::U16(2000)),
            END,
            END,
        ]
    }

    #[rstest]
    #[case(TLVValue::S8(-128))]
    #[case(TLVValue::S16(i16::MIN))]
    #[case(TLVValue::S32(-170000))]
    #[case(TLVValue::S64(i64::MAX))]
    #[case(TLVValue::U8(u8::MAX))]
    #[case(TLVValue::U16(0))]
    #[case(TLVValue::U32(0xdead_beef))]
    #[case(TLVValue::U64(u64::MAX))]
    #[case(TLVValue::False)]
    #[case(TLVValue::True)]
    #[case(TLVValue::F32(17.9))]
    #[case(TLVValue::F64(-1.0 / 3.0))]
    #[case(TLVValue::Utf8l("Tschüs"))]
    #[case(TLVValue::Utf16l("wide length field"))]
    #[case(TLVValue::Utf32l(""))]
    #[case(TLVValue::Utf64l("x"))]
    #[case(TLVValue::Str8l(&[0, 1, 2, 3, 4]))]
    #[case(TLVValue::Str16l(&[0xff; 3]))]
    #[case(TLVValue::Str32l(&[]))]
    #[case(TLVValue::Str64l(&[0x18]))]
    #[case(TLVValue::Null)]
    fn round_trip_value(#[case] value: TLVValue<'static>) {
        init_env_logger();

        let elements = [TLV::new(TLVTag::Anonymous, value)];

        let encoded = asserted_ok!(encode(&elements, TLVConfig::default()), "Encoding to TLV");
        let decoded = asserted_ok!(decode(&encoded, TLVConfig::default()), "Decoding of TLV");

        assert_eq!(decoded, elements);
    }

    #[rstest]
    #[case(TLVTag::Anonymous)]
    #[case(TLVTag::Context(0xff))]
    #[case(TLVTag::CommonPrf16(1))]
    #[case(TLVTag::CommonPrf32(100000))]
    #[case(TLVTag::ImplPrf16(0x1234))]
    #[case(TLVTag::ImplPrf32(0x1234_5678))]
    #[case(FQ48)]
    #[case(FQ64)]
    fn round_trip_tag(#[case] tag: TLVTag) {
        init_env_logger();

        let elements = [
            TLV::new(tag.clone(), TLVValue::utf8("Hello!")),
            TLV::new(tag.clone(), TLVValue::List),
            TLV::new(tag.clone(), TLVValue::U32(42)),
            END,
        ];

        let encoded = asserted_ok!(encode(&elements, TLVConfig::default()), "Encoding to TLV");
        let decoded = asserted_ok!(decode(&encoded, TLVConfig::default()), "Decoding of TLV");

        assert_eq!(decoded, elements);
        assert_eq!(
            encoded[0] >> 5,
            tag.tag_type() as u8,
            "tag control bits of {tag}"
        );
    }

    #[test]
    fn round_trip_nested_mixed_containers() {
        init_env_logger();

        let elements = [
            TLV::new(TLVTag::Anonymous, TLVValue::Struct),
            TLV::new(TLVTag::Context(0), TLVValue::Array),
            TLV::new(TLVTag::Anonymous, TLVValue::Struct),
            TLV::new(TLVTag::Context(0), TLVValue::List),
            TLV::new(TLVTag::Context(0), TLVValue::U8(2)),
            TLV::new(TLVTag::Anonymous, TLVValue::S64(-6)),
            TLV::new(FQ48, TLVValue::utf8("mixed")),
            END,
            TLV::new(TLVTag::Context(1), TLVValue::Struct),
            END,
            END,
            TLV::new(TLVTag::Anonymous, TLVValue::Array),
            TLV::new(TLVTag::Anonymous, TLVValue::F64(17.9)),
            END,
            END,
            TLV::new(TLVTag::CommonPrf16(7), TLVValue::str(&[0xca, 0xfe])),
            TLV::new(TLVTag::Context(2), TLVValue::False),
            END,
            TLV::new(TLVTag::Anonymous, TLVValue::True),
        ];

        let encoded = asserted_ok!(encode(&elements, TLVConfig::default()), "Encoding to TLV");
        let decoded = asserted_ok!(decode(&encoded, TLVConfig::default()), "Decoding of TLV");

        assert_eq!(decoded, elements);

        // Re-encoding the decoded elements is bit-for-bit identical
        let reencoded = asserted_ok!(encode(&decoded, TLVConfig::default()), "Encoding to TLV");
        assert_eq!(reencoded, encoded);
    }

    #[rstest]
    #[case(TLVValue::U8(5), &[0x04, 0x05])]
    #[case(TLVValue::U16(5), &[0x05, 0x05, 0x00])]
    #[case(TLVValue::U32(5), &[0x06, 0x05, 0x00, 0x00, 0x00])]
    #[case(TLVValue::U64(5), &[0x07, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00])]
    #[case(TLVValue::S16(-1), &[0x01, 0xff, 0xff])]
    #[case(TLVValue::S32(1), &[0x02, 0x01, 0x00, 0x00, 0x00])]
    #[case(TLVValue::Utf16l("a"), &[0x0d, 0x01, 0x00, 0x61])]
    #[case(TLVValue::Str32l(&[0x61]), &[0x12, 0x01, 0x00, 0x00, 0x00, 0x61])]
    fn width_fidelity(#[case] value: TLVValue<'static>, #[case] expected: &[u8]) {
        init_env_logger();

        let mut buf = [0; 16];
        let mut tw = TLVWriter::new(&mut buf);
        tw.put(&TLVTag::Anonymous, &value).unwrap();
        assert_eq!(tw.finalize().unwrap(), expected);

        let mut reader = TLVReader::new(expected);
        reader.next().unwrap();
        assert_eq!(reader.value_type().unwrap(), value.value_type());
    }

    #[test]
    fn end_to_end_scenario() {
        init_env_logger();

        let encoded = asserted_ok!(encode(&scenario(), TLVConfig::default()), "Encoding to TLV");
        assert_eq!(
            encoded,
            [
                0x15, 0x24, 0x00, 0x01, 0x34, 0x01, 0x36, 0x02, 0x05, 0xe8, 0x03, 0x05, 0xd0,
                0x07, 0x18, 0x18
            ]
        );

        let mut reader = TLVReader::new(&encoded);

        reader.next().unwrap();
        assert_eq!(reader.value_type().unwrap(), TLVValueType::Struct);
        let s = reader.enter_container().unwrap();

        reader.next().unwrap();
        assert_eq!(reader.tag().unwrap(), &TLVTag::Context(0));
        assert_eq!(reader.value_type().unwrap(), TLVValueType::U8);
        assert_eq!(reader.u8().unwrap(), 1);

        reader.next().unwrap();
        assert_eq!(reader.tag().unwrap(), &TLVTag::Context(1));
        assert_eq!(reader.value_type().unwrap(), TLVValueType::Null);

        reader.next().unwrap();
        assert_eq!(reader.tag().unwrap(), &TLVTag::Context(2));
        assert_eq!(reader.value_type().unwrap(), TLVValueType::Array);
        let a = reader.enter_container().unwrap();

        reader.next().unwrap();
        assert_eq!(reader.tag().unwrap(), &TLVTag::Anonymous);
        assert_eq!(reader.value_type().unwrap(), TLVValueType::U16);
        assert_eq!(reader.u16().unwrap(), 1000);

        reader.next().unwrap();
        assert_eq!(reader.u16().unwrap(), 2000);
        assert_eq!(
            reader.u8().map_err(|e| e.code()),
            Err(ErrorCode::TypeMismatch)
        );

        assert_eq!(reader.next().unwrap(), None);
        reader.exit_container(a).unwrap();
        assert_eq!(reader.next().unwrap(), None);
        reader.exit_container(s).unwrap();

        reader.finish().unwrap();
    }

    #[test]
    fn truncation_at_every_offset() {
        init_env_logger();

        let elements = [
            TLV::new(TLVTag::Anonymous, TLVValue::Struct),
            TLV::new(TLVTag::Context(0), TLVValue::utf8("Hello!")),
            TLV::new(FQ64, TLVValue::U64(u64::MAX)),
            TLV::new(TLVTag::Context(2), TLVValue::Array),
            TLV::new(TLVTag::Anonymous, TLVValue::F64(1.5)),
            TLV::new(TLVTag::Anonymous, TLVValue::str(&[1, 2, 3])),
            END,
            END,
        ];

        let encoded = asserted_ok!(encode(&elements, TLVConfig::default()), "Encoding to TLV");

        for cut in 1..encoded.len() {
            let code = decode(&encoded[..cut], TLVConfig::default())
                .map(|_| ())
                .map_err(|e| e.code());

            assert!(
                matches!(
                    code,
                    Err(ErrorCode::BufferUnderrun
                        | ErrorCode::MalformedElement
                        | ErrorCode::UnterminatedContainer)
                ),
                "cut at {cut} gave {code:?}"
            );
        }
    }

    #[test]
    fn depth_bound() {
        init_env_logger();

        let mut nested = vec![TLV::new(TLVTag::Anonymous, TLVValue::List); MAX_CONTAINER_DEPTH];
        nested.extend(vec![END; MAX_CONTAINER_DEPTH]);

        let encoded = asserted_ok!(encode(&nested, TLVConfig::default()), "Encoding to TLV");
        let decoded = asserted_ok!(decode(&encoded, TLVConfig::default()), "Decoding of TLV");
        assert_eq!(decoded, nested);

        let mut too_deep = vec![TLV::new(TLVTag::Anonymous, TLVValue::List); MAX_CONTAINER_DEPTH + 1];
        too_deep.extend(vec![END; MAX_CONTAINER_DEPTH + 1]);

        assert_eq!(
            encode(&too_deep, TLVConfig::default()).map_err(|e| e.code()),
            Err(ErrorCode::DepthExceeded)
        );

        let mut hostile = vec![0x17; MAX_CONTAINER_DEPTH + 1];
        hostile.extend(vec![0x18; MAX_CONTAINER_DEPTH + 1]);

        assert_eq!(
            decode(&hostile, TLVConfig::default())
                .map(|_| ())
                .map_err(|e| e.code()),
            Err(ErrorCode::DepthExceeded)
        );
        assert_eq!(
            TLVReader::new(&hostile).finish().map_err(|e| e.code()),
            Err(ErrorCode::DepthExceeded)
        );
    }

    #[test]
    fn container_balance() {
        init_env_logger();

        // Missing End-of-container
        let b = [0x15, 0x24, 0x00, 0x01];
        assert_eq!(
            decode(&b, TLVConfig::default())
                .map(|_| ())
                .map_err(|e| e.code()),
            Err(ErrorCode::UnterminatedContainer)
        );

        // Extra End-of-container at top level
        let b = [0x15, 0x24, 0x00, 0x01, 0x18, 0x18];
        assert_eq!(
            decode(&b, TLVConfig::default())
                .map(|_| ())
                .map_err(|e| e.code()),
            Err(ErrorCode::UnbalancedContainer)
        );

        // Writer side
        let mut buf = [0; 8];
        let mut tw = TLVWriter::new(&mut buf);
        let _open = tw.start_array(&TLVTag::Anonymous).unwrap();
        assert_eq!(
            tw.finalize().map_err(|e| e.code()),
            Err(ErrorCode::UnterminatedContainer)
        );
    }

    #[test]
    fn duplicate_tag_policy() {
        init_env_logger();

        let elements = [
            TLV::new(TLVTag::Anonymous, TLVValue::Struct),
            TLV::new(TLVTag::Context(3), TLVValue::U8(1)),
            TLV::new(TLVTag::Context(3), TLVValue::U8(2)),
            END,
        ];

        let reject = TLVConfig::default().with_duplicate_tags(DuplicateTagPolicy::Reject);

        assert_eq!(
            encode(&elements, reject).map_err(|e| e.code()),
            Err(ErrorCode::DuplicateTag)
        );

        let encoded = asserted_ok!(encode(&elements, TLVConfig::default()), "Encoding to TLV");
        assert_eq!(
            asserted_ok!(decode(&encoded, TLVConfig::default()), "Decoding of TLV"),
            elements
        );
        assert_eq!(
            decode(&encoded, reject).map(|_| ()).map_err(|e| e.code()),
            Err(ErrorCode::DuplicateTag)
        );
    }

    #[test]
    fn matter_spec_examples_decode() {
        init_env_logger();

        // Array, mix of element types, [42, -170000, {}, 17.9, "Hello!"]
        let b = [
            0x16, 0x00, 0x2a, 0x02, 0xf0, 0x67, 0xfd, 0xff, 0x15, 0x18, 0x0a, 0x33, 0x33, 0x8f,
            0x41, 0x0c, 0x06, 0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x21, 0x18,
        ];

        assert_eq!(
            asserted_ok!(decode(&b, TLVConfig::default()), "Decoding of TLV"),
            [
                TLV::new(TLVTag::Anonymous, TLVValue::Array),
                TLV::new(TLVTag::Anonymous, TLVValue::S8(42)),
                TLV::new(TLVTag::Anonymous, TLVValue::S32(-170000)),
                TLV::new(TLVTag::Anonymous, TLVValue::Struct),
                END,
                TLV::new(TLVTag::Anonymous, TLVValue::F32(17.9)),
                TLV::new(TLVTag::Anonymous, TLVValue::Utf8l("Hello!")),
                END,
            ]
        );

        // 65521::57069:1 = {65521::57069:43605 = 42U}
        let b = [
            0xd5, 0xf1, 0xff, 0xed, 0xde, 0x01, 0x00, 0xc4, 0xf1, 0xff, 0xed, 0xde, 0x55, 0xaa,
            0x2a, 0x18,
        ];

        let decoded = asserted_ok!(decode(&b, TLVConfig::default()), "Decoding of TLV");
        assert_eq!(decoded[1], TLV::new(FQ48, TLVValue::U8(42)));
        assert_eq!(
            decoded[1].tag.resolve(None),
            Some((0xfff1_deed, 0xaa55))
        );
    }

    #[test]
    fn display_scenario() {
        init_env_logger();

        let encoded = asserted_ok!(encode(&scenario(), TLVConfig::default()), "Encoding to TLV");

        assert_eq!(
            TLVDisplay::new(&encoded).to_string(),
            "{\n  0: U8(0x01)\n  1: Null\n  2: [\n    U16(0x03e8)\n    U16(0x07d0)\n  ]\n}\n"
        );
    }
}
