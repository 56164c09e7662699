use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::tags::Tag;

/// Dynamic TLV value tree
///
/// A structure keeps its members in the order given. Build it with
/// [`Value::structure_from_map`] (or `From<HashMap<Tag, Value>>`) to get canonical member order
/// regardless of the map's iteration order.
///
/// # Example
/// ```
/// use weave_tlv::{Tag, Value, to_vec, from_slice};
///
/// let value = Value::Structure(vec![
///     (Tag::Context(1), Value::UnsignedInt(0)),
///     (Tag::Context(2), Value::Utf8String("hello".to_string())),
/// ]);
///
/// let bytes = to_vec(Tag::Anonymous, &value).unwrap();
/// let (tag, decoded) = from_slice(&bytes).unwrap();
/// assert_eq!(tag, Tag::Anonymous);
/// assert_eq!(value, decoded);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    SignedInt(i64),
    UnsignedInt(u64),
    Float(f64),
    Utf8String(String),
    ByteString(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Tagged members, emitted in order
    Structure(Vec<(Tag, Value)>),
    /// Members are always anonymous
    Array(Vec<Value>),
    /// A location inside another structure, given as a list of tags
    Path(Vec<Tag>),
}

impl Value {
    /// Build a structure whose members are sorted in canonical tag order.
    ///
    /// Two maps with the same content always produce the same member order.
    pub fn structure_from_map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Tag, Value)>,
    {
        let mut members: Vec<(Tag, Value)> = entries.into_iter().collect();
        members.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Structure(members)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Structure(_) | Value::Array(_) | Value::Path(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is an integer that fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::SignedInt(i) => Some(*i),
            Value::UnsignedInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Returns the value as a `u64` if it is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UnsignedInt(u) => Some(*u),
            Value::SignedInt(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&[(Tag, Value)]> {
        match self {
            Value::Structure(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&[Tag]> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Look up the first structure member carrying `tag`
    pub fn get(&self, tag: &Tag) -> Option<&Value> {
        self.as_structure()?
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v)
    }
}

impl From<HashMap<Tag, Value>> for Value {
    fn from(map: HashMap<Tag, Value>) -> Self {
        Value::structure_from_map(map)
    }
}

impl From<BTreeMap<Tag, Value>> for Value {
    fn from(map: BTreeMap<Tag, Value>) -> Self {
        // BTreeMap already iterates in canonical order.
        Value::Structure(map.into_iter().collect())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::SignedInt(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UnsignedInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::ByteString(v)
    }
}
