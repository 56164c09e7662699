//! Conversion from a [`Value`] tree back into any `serde::Deserialize` type.
//!
//! This is the inverse of [`crate::ser`]: structure members tagged `Context(n)` fill the
//! struct field with index `n`, and members with any other tag, or an index past the last
//! field, are ignored. Missing members leave `Option` fields as `None`. Unit enum variants
//! are read from strings.

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, Error as _, IntoDeserializer, Unexpected, Visitor};

use crate::error::{Result, TlvError};
use crate::tags::Tag;
use crate::value::Value;

/// Convert a [`Value`] tree into `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(value)
}

impl Value {
    fn unexpected(&self) -> Unexpected<'_> {
        match self {
            Value::Null => Unexpected::Unit,
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::SignedInt(i) => Unexpected::Signed(*i),
            Value::UnsignedInt(u) => Unexpected::Unsigned(*u),
            Value::Float(f) => Unexpected::Float(*f),
            Value::Utf8String(s) => Unexpected::Str(s),
            Value::ByteString(b) => Unexpected::Bytes(b),
            Value::Structure(_) => Unexpected::Other("structure"),
            Value::Array(_) => Unexpected::Seq,
            Value::Path(_) => Unexpected::Other("path"),
        }
    }
}

fn visit_items<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value> {
    let mut seq: SeqDeserializer<_, TlvError> = SeqDeserializer::new(items.into_iter());
    let out = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(out)
}

impl<'de> IntoDeserializer<'de, TlvError> for Value {
    type Deserializer = Value;

    fn into_deserializer(self) -> Value {
        self
    }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = TlvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::SignedInt(i) => visitor.visit_i64(i),
            Value::UnsignedInt(u) => visitor.visit_u64(u),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Utf8String(s) => visitor.visit_string(s),
            Value::ByteString(b) => visitor.visit_byte_buf(b),
            Value::Array(items) => visit_items(items, visitor),
            // Tuple structs, read positionally.
            Value::Structure(members) => {
                visit_items(members.into_iter().map(|(_, v)| v).collect(), visitor)
            }
            Value::Path(_) => Err(TlvError::UnsupportedValueKind("path".to_string())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let members = match self {
            Value::Structure(members) => members,
            other => return Err(TlvError::invalid_type(other.unexpected(), &visitor)),
        };
        let entries = members.into_iter().filter_map(|(tag, value)| match tag {
            Tag::Context(n) => fields.get(n as usize).map(|name| (*name, value)),
            _ => None,
        });
        let mut map: MapDeserializer<'de, _, TlvError> = MapDeserializer::new(entries);
        let out = visitor.visit_map(&mut map)?;
        map.end()?;
        Ok(out)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self {
            Value::Utf8String(s) => {
                let variant: StringDeserializer<TlvError> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            other => Err(TlvError::invalid_type(other.unexpected(), &visitor)),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::to_value;
    use crate::{from_slice, to_vec};
    use serde::{Deserialize, Serialize};
    use serde_bytes::ByteBuf;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Mode {
        Off,
        Heat,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Device {
        name: String,
        port: u16,
        offset: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        serial: Option<String>,
        enabled: bool,
        key: ByteBuf,
        addresses: Vec<u32>,
        mode: Mode,
        ratio: f32,
    }

    fn device() -> Device {
        Device {
            name: "thermostat".to_string(),
            port: 11095,
            offset: -3,
            serial: None,
            enabled: true,
            key: ByteBuf::from(vec![0xDE, 0xAD]),
            addresses: vec![1, 2],
            mode: Mode::Heat,
            ratio: 0.5,
        }
    }

    #[test]
    fn test_struct_through_wire() {
        let bytes = to_vec(Tag::Anonymous, &to_value(&device()).unwrap()).unwrap();
        let (_, value) = from_slice(&bytes).unwrap();
        assert_eq!(from_value::<Device>(value).unwrap(), device());
    }

    #[test]
    fn test_fields_matched_by_context_index() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Reading {
            id: u8,
            label: Option<String>,
            celsius: f64,
        }

        // Out of order, with a profile-tagged member and an unknown index.
        let value = Value::Structure(vec![
            (Tag::Context(2), Value::Float(21.5)),
            (Tag::common(0), Value::from("ignored")),
            (Tag::Context(0), Value::UnsignedInt(4)),
            (Tag::Context(9), Value::Bool(true)),
        ]);
        assert_eq!(
            from_value::<Reading>(value).unwrap(),
            Reading {
                id: 4,
                label: None,
                celsius: 21.5,
            }
        );
    }

    #[test]
    fn test_tuples_and_options() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Pair(u8, Option<f32>);

        let value = to_value(&Pair(1, None)).unwrap();
        assert_eq!(from_value::<Pair>(value).unwrap(), Pair(1, None));

        let value = to_value(&(7u64, 'x', -2i8)).unwrap();
        assert_eq!(from_value::<(u64, char, i8)>(value).unwrap(), (7, 'x', -2));
        assert_eq!(from_value::<Option<u8>>(Value::Null).unwrap(), None);
        assert_eq!(from_value::<u128>(Value::UnsignedInt(9)).unwrap(), 9);
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(
            from_value::<u8>(Value::UnsignedInt(300)),
            Err(TlvError::Serde(_))
        ));
        assert!(matches!(
            from_value::<Device>(Value::Array(vec![])),
            Err(TlvError::Serde(_))
        ));
        assert!(matches!(
            from_value::<Vec<u8>>(Value::Path(vec![])),
            Err(TlvError::UnsupportedValueKind(_))
        ));
        assert!(from_value::<Mode>(Value::from("Cool")).is_err());
    }
}
