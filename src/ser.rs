//! Conversion from any `serde::Serialize` type into a [`Value`] tree.
//!
//! Struct fields become structure members tagged `Context(field index)`, so field order is
//! part of the wire format. Sequences become arrays. Maps and enum variants carrying data
//! have no TLV mapping and fail with [`TlvError::UnsupportedValueKind`].

use serde::Serialize;
use serde::ser::{self, Impossible};

use crate::error::{Result, TlvError};
use crate::tags::Tag;
use crate::value::Value;

/// Convert `value` into a [`Value`] tree.
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

fn unsupported(what: impl Into<String>) -> TlvError {
    TlvError::UnsupportedValueKind(what.into())
}

/// Serializer whose output is a [`Value`].
pub struct ValueSerializer;

impl serde::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = TlvError;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = StructSerializer;
    type SerializeTupleVariant = Impossible<Value, TlvError>;
    type SerializeMap = Impossible<Value, TlvError>;
    type SerializeStruct = StructSerializer;
    type SerializeStructVariant = Impossible<Value, TlvError>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::SignedInt(v))
    }

    // Same sign rule as `Encoder::put_int`.
    fn serialize_i128(self, v: i128) -> Result<Value> {
        let converted = if v < 0 {
            i64::try_from(v).map(Value::SignedInt)
        } else {
            u64::try_from(v).map(Value::UnsignedInt)
        };
        converted.map_err(|_| TlvError::ValueOutOfRange(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::UnsignedInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        u64::try_from(v)
            .map(Value::UnsignedInt)
            .map_err(|_| TlvError::ValueOutOfRange(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Utf8String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Utf8String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::ByteString(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Value> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<StructSerializer> {
        Ok(StructSerializer::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<StructSerializer> {
        Ok(StructSerializer::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }
}

pub struct SeqSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = TlvError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = TlvError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

/// Collects struct fields as context-tagged members.
pub struct StructSerializer {
    members: Vec<(Tag, Value)>,
    next_index: usize,
}

impl StructSerializer {
    fn with_capacity(len: usize) -> Self {
        StructSerializer {
            members: Vec::with_capacity(len),
            next_index: 0,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let index = self.next_index;
        let tag = u8::try_from(index)
            .map(Tag::Context)
            .map_err(|_| TlvError::ValueOutOfRange(index.to_string()))?;
        self.next_index += 1;
        self.members.push((tag, value.serialize(ValueSerializer)?));
        Ok(())
    }
}

impl ser::SerializeStruct for StructSerializer {
    type Ok = Value;
    type Error = TlvError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.push(value)
    }

    // Skipped fields keep their index so the remaining tags stay stable.
    fn skip_field(&mut self, _key: &'static str) -> Result<()> {
        self.next_index += 1;
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Structure(self.members))
    }
}

impl ser::SerializeTupleStruct for StructSerializer {
    type Ok = Value;
    type Error = TlvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Structure(self.members))
    }
}
