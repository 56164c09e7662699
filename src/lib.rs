//! # Weave TLV Library
//!
//! An encoder/decoder for Weave TLV, the compact Tag-Length-Value format used for
//! configuration blobs, device descriptors and trait data exchanged with remote peers.
//!
//! ## Features
//! - Signed/unsigned integers in the smallest of 1, 2, 4 or 8 bytes
//! - Booleans, null, 8-byte floats, UTF-8 strings and byte strings
//! - Structures, arrays and paths, with tag placement checked against the open container
//! - Anonymous, context, common-profile, implicit-profile and fully-qualified tags
//! - Canonical member order for structures built from unordered maps
//! - Explicit container stacks with a nesting limit in both directions
//! - [`debug::dump`] for a readable listing of encoded bytes
//! - Any `serde::Serialize` type via [`to_vec_serialize`], and back via
//!   [`from_slice_deserialize`]
//!
//! All multi-byte fields are little-endian.
//!
//! ## Example
//! ```rust
//! use weave_tlv::{Encoder, Tag, Value, from_slice};
//!
//! let mut buf = Vec::new();
//! let mut encoder = Encoder::new(&mut buf);
//! encoder.start_structure(Tag::Anonymous).unwrap();
//! encoder.put_unsigned(Tag::Context(1), 0).unwrap();
//! encoder.put_string(Tag::Context(2), "kitchen").unwrap();
//! encoder.end_container().unwrap();
//! encoder.finish().unwrap();
//!
//! let (_, value) = from_slice(&buf).unwrap();
//! assert_eq!(value.get(&Tag::Context(2)).and_then(Value::as_str), Some("kitchen"));
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod de;
pub mod debug;
mod decode;
mod encode;
pub mod error;
pub mod ser;
mod tags;
mod types;
mod value;

pub use decode::{DecodeConfig, Decoder, Header, from_slice, from_slice_with_config};
pub use encode::{DEFAULT_MAX_DEPTH, Encoder, EncoderConfig};
pub use error::{Result, TlvError};
pub use tags::{COMMON_PROFILE, ContainerKind, Tag, TagControl};
pub use types::{ElementType, Width};
pub use value::Value;

// Convenience functions
pub fn to_vec(tag: Tag, value: &Value) -> Result<Vec<u8>> {
    to_vec_with_config(tag, value, EncoderConfig::default())
}

pub fn to_vec_with_config(tag: Tag, value: &Value, config: EncoderConfig) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = Encoder::with_config(&mut buf, config);
    encoder.put(tag, value)?;
    encoder.finish()?;
    Ok(buf)
}

/// Encode any serializable value; see [`ser`] for the mapping.
pub fn to_vec_serialize<T: ?Sized + Serialize>(tag: Tag, value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf);
    encoder.encode(tag, value)?;
    encoder.finish()?;
    Ok(buf)
}

/// Decode one element into any deserializable type; see [`de`] for the mapping.
pub fn from_slice_deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<(Tag, T)> {
    let (tag, value) = from_slice(data)?;
    Ok((tag, de::from_value(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn roundtrip(tag: Tag, value: &Value) -> (Tag, Value) {
        from_slice(&to_vec(tag, value).unwrap()).unwrap()
    }

    #[test]
    fn test_basic_types() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::SignedInt(-42),
            Value::SignedInt(42),
            Value::UnsignedInt(42),
            Value::Float(-4.1),
            Value::from("hello"),
            Value::ByteString(vec![0, 1, 2]),
        ] {
            assert_eq!(roundtrip(Tag::Anonymous, &value), (Tag::Anonymous, value));
        }
    }

    #[test]
    fn test_scalar_struct() {
        let value = Value::Structure(vec![
            (Tag::Context(1), Value::UnsignedInt(0)),
            (Tag::Context(2), Value::UnsignedInt(65536)),
        ]);
        let bytes = to_vec(Tag::Anonymous, &value).unwrap();
        assert_eq!(
            bytes,
            [0x15, 0x24, 0x01, 0x00, 0x26, 0x02, 0x00, 0x00, 0x01, 0x00, 0x18]
        );
        assert_eq!(from_slice(&bytes).unwrap(), (Tag::Anonymous, value));
    }

    #[test]
    fn test_nested_array() {
        let value = Value::Structure(vec![(
            Tag::Context(7),
            Value::Array(vec![
                Value::from("Goodbye!"),
                Value::UnsignedInt(71024724507),
                Value::Bool(false),
            ]),
        )]);
        assert_eq!(roundtrip(Tag::Anonymous, &value).1, value);
    }

    #[test]
    fn test_fully_qualified_tag() {
        let tag = Tag::profile(0x235A_0000, 42);
        let bytes = to_vec(tag, &Value::UnsignedInt(1)).unwrap();
        assert_eq!(bytes[0] & 0xE0, TagControl::FullyQualified6 as u8);
        assert_eq!(&bytes[1..5], &0x235A_0000u32.to_le_bytes());
        assert_eq!(&bytes[5..7], &42u16.to_le_bytes());
        assert_eq!(from_slice(&bytes).unwrap().0, tag);

        let wide = Tag::profile(0x235A_0000, 70000);
        let bytes = to_vec(wide, &Value::Null).unwrap();
        assert_eq!(bytes[0] & 0xE0, TagControl::FullyQualified8 as u8);
        assert_eq!(from_slice(&bytes).unwrap().0, wide);
    }

    #[test]
    fn test_map_determinism() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for n in 0..32u8 {
            first.insert(Tag::Context(n), Value::UnsignedInt(n as u64));
        }
        for n in (0..32u8).rev() {
            second.insert(Tag::Context(n), Value::UnsignedInt(n as u64));
        }
        assert_eq!(
            to_vec(Tag::Anonymous, &Value::from(first)).unwrap(),
            to_vec(Tag::Anonymous, &Value::from(second)).unwrap()
        );
    }

    #[test]
    fn test_serialize_struct() {
        #[derive(Serialize)]
        struct Fabric {
            id: u64,
            name: String,
        }

        let bytes = to_vec_serialize(
            Tag::common(1),
            &Fabric {
                id: 7,
                name: "home".to_string(),
            },
        )
        .unwrap();
        let (tag, value) = from_slice(&bytes).unwrap();
        assert_eq!(tag, Tag::common(1));
        assert_eq!(value.get(&Tag::Context(0)), Some(&Value::UnsignedInt(7)));
        assert_eq!(value.get(&Tag::Context(1)), Some(&Value::from("home")));

        assert_eq!(
            to_vec_serialize(Tag::Anonymous, &(1i128 << 63)).unwrap(),
            [0x07, 0, 0, 0, 0, 0, 0, 0, 0x80]
        );
    }

    #[test]
    fn test_deserialize_struct() {
        #[derive(Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Fabric {
            id: u64,
            name: String,
            vendor: Option<u16>,
        }

        let fabric = Fabric {
            id: 1 << 63,
            name: "home".to_string(),
            vendor: Some(0x235A),
        };
        let bytes = to_vec_serialize(Tag::common(1), &fabric).unwrap();
        assert_eq!(
            from_slice_deserialize::<Fabric>(&bytes).unwrap(),
            (Tag::common(1), fabric)
        );
    }
}
