// Copyright 2026 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Byte-exact encoding vectors
//!
//! Each vector is checked in both directions: encoding the value must give exactly the
//! expected bytes, and decoding those bytes must give back the same tag and value.

use weave_tlv::{Tag, Value, from_slice, to_vec};

#[test]
fn test_integer_widths() {
    // Signed
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(0), "0000");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(127), "007f");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(128), "018000");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(-128), "0080");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(-129), "017fff");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(32767), "01ff7f");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(-32768), "010080");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(32768), "0200800000");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(2147483647), "02ffffff7f");
    assert_encode_decode(Tag::Anonymous, Value::SignedInt(-2147483648), "0200000080");
    assert_encode_decode(
        Tag::Anonymous,
        Value::SignedInt(2147483648),
        "030000008000000000",
    );
    assert_encode_decode(
        Tag::Anonymous,
        Value::SignedInt(i64::MAX),
        "03ffffffffffffff7f",
    );
    assert_encode_decode(
        Tag::Anonymous,
        Value::SignedInt(i64::MIN),
        "030000000000000080",
    );

    // Unsigned
    assert_encode_decode(Tag::Anonymous, Value::UnsignedInt(0), "0400");
    assert_encode_decode(Tag::Anonymous, Value::UnsignedInt(255), "04ff");
    assert_encode_decode(Tag::Anonymous, Value::UnsignedInt(256), "050001");
    assert_encode_decode(Tag::Anonymous, Value::UnsignedInt(65535), "05ffff");
    assert_encode_decode(Tag::Anonymous, Value::UnsignedInt(65536), "0600000100");
    assert_encode_decode(Tag::Anonymous, Value::UnsignedInt(4294967295), "06ffffffff");
    assert_encode_decode(
        Tag::Anonymous,
        Value::UnsignedInt(4294967296),
        "070000000001000000",
    );
    assert_encode_decode(
        Tag::Anonymous,
        Value::UnsignedInt(u64::MAX),
        "07ffffffffffffffff",
    );
}

#[test]
fn test_signed_and_unsigned_are_distinct() {
    let signed = to_vec(Tag::Anonymous, &Value::SignedInt(5)).unwrap();
    let unsigned = to_vec(Tag::Anonymous, &Value::UnsignedInt(5)).unwrap();
    assert_ne!(signed, unsigned);
    assert_eq!(signed[1..], unsigned[1..]);
}

#[test]
fn test_simple_values() {
    assert_encode_decode(Tag::Anonymous, Value::Bool(false), "08");
    assert_encode_decode(Tag::Anonymous, Value::Bool(true), "09");
    assert_encode_decode(Tag::Anonymous, Value::Null, "14");
}

#[cfg(not(feature = "compact_floats"))]
#[test]
fn test_floats() {
    assert_encode_decode(Tag::Anonymous, Value::Float(1.5), "0b000000000000f83f");
    assert_encode_decode(Tag::Anonymous, Value::Float(-4.1), "0b66666666666610c0");
}

#[cfg(feature = "compact_floats")]
#[test]
fn test_floats() {
    assert_encode_decode(Tag::Anonymous, Value::Float(1.5), "0a0000c03f");
    assert_encode_decode(Tag::Anonymous, Value::Float(-4.1), "0b66666666666610c0");
}

#[test]
fn test_strings() {
    assert_encode_decode(Tag::Anonymous, Value::from(""), "0c00");
    assert_encode_decode(Tag::Anonymous, Value::from("Goodbye!"), "0c08476f6f6462796521");
    assert_encode_decode(Tag::Anonymous, Value::from("\u{00fc}"), "0c02c3bc");
    assert_encode_decode(Tag::Anonymous, Value::ByteString(vec![]), "1000");
    assert_encode_decode(
        Tag::Anonymous,
        Value::ByteString(vec![0x01, 0x02, 0x03, 0x04]),
        "100401020304",
    );

    // Length field widens with the payload.
    let long = "x".repeat(256);
    let bytes = to_vec(Tag::Anonymous, &Value::from(long.as_str())).unwrap();
    assert_eq!(hex_from_bytes(&bytes[..3]), "0d0001");
    assert_eq!(from_slice(&bytes).unwrap().1, Value::from(long));
}

#[test]
fn test_tags() {
    assert_encode_decode(Tag::common(1), Value::Bool(true), "490100");
    assert_encode_decode(Tag::common(0x1_0000), Value::Bool(true), "6900000100");
    assert_encode_decode(Tag::implicit(1), Value::Bool(true), "890100");
    assert_encode_decode(Tag::implicit(0x1_0000), Value::Bool(true), "a900000100");
    assert_encode_decode(
        Tag::profile(0x235A_0000, 42),
        Value::Bool(true),
        "c900005a232a00",
    );
    assert_encode_decode(
        Tag::profile(0x235A_0000, 0x1_0000),
        Value::Bool(true),
        "e900005a2300000100",
    );
}

#[test]
fn test_containers() {
    assert_encode_decode(Tag::Anonymous, Value::Structure(vec![]), "1518");
    assert_encode_decode(Tag::Anonymous, Value::Array(vec![]), "1618");
    assert_encode_decode(Tag::Anonymous, Value::Path(vec![]), "1718");

    assert_encode_decode(
        Tag::Anonymous,
        Value::Structure(vec![
            (Tag::Context(1), Value::UnsignedInt(0)),
            (Tag::Context(2), Value::UnsignedInt(65536)),
        ]),
        "1524010026020000010018",
    );

    assert_encode_decode(
        Tag::Anonymous,
        Value::Structure(vec![(
            Tag::Context(7),
            Value::Array(vec![
                Value::from("Goodbye!"),
                Value::UnsignedInt(71024724507),
                Value::Bool(false),
            ]),
        )]),
        "153607\
         0c08476f6f6462796521\
         071b4a678910000000\
         08\
         18\
         18",
    );

    assert_encode_decode(
        Tag::Anonymous,
        Value::Path(vec![Tag::Context(1), Tag::implicit(3)]),
        "17340194030018",
    );
}

// Helper functions

fn assert_encode_decode(tag: Tag, value: Value, expected_hex: &str) {
    let expected_bytes = hex_to_bytes(expected_hex);

    let encoded = to_vec(tag, &value).unwrap();
    assert_eq!(
        hex_from_bytes(&encoded),
        expected_hex,
        "Encoding mismatch for {:?}",
        value
    );

    let decoded = from_slice(&expected_bytes).unwrap();
    assert_eq!(decoded, (tag, value), "Decoding mismatch for {}", expected_hex);
}

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

fn hex_from_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
