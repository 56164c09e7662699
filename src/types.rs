//! Element type codes: the low five bits of the control byte.

use crate::tags::ContainerKind;

const TYPE_SIGNED_INT: u8 = 0x00;
const TYPE_UNSIGNED_INT: u8 = 0x04;
const TYPE_FALSE: u8 = 0x08;
const TYPE_TRUE: u8 = 0x09;
const TYPE_FLOAT32: u8 = 0x0A;
const TYPE_FLOAT64: u8 = 0x0B;
const TYPE_UTF8_STRING: u8 = 0x0C;
const TYPE_BYTE_STRING: u8 = 0x10;
const TYPE_NULL: u8 = 0x14;
const TYPE_STRUCTURE: u8 = 0x15;
const TYPE_ARRAY: u8 = 0x16;
const TYPE_PATH: u8 = 0x17;
const TYPE_END_OF_CONTAINER: u8 = 0x18;

pub(crate) const TYPE_MASK: u8 = 0x1F;
const WIDTH_MASK: u8 = 0x03;

/// Width of a number or of a length field, selected by the two low type bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Width {
    One = 0,
    Two = 1,
    Four = 2,
    Eight = 3,
}

impl Width {
    const fn from_bits(bits: u8) -> Self {
        match bits & WIDTH_MASK {
            0 => Width::One,
            1 => Width::Two,
            2 => Width::Four,
            _ => Width::Eight,
        }
    }

    pub const fn bytes(self) -> usize {
        1 << self as usize
    }

    /// Smallest width holding `v` as an unsigned integer.
    pub const fn for_unsigned(v: u64) -> Self {
        if v <= u8::MAX as u64 {
            Width::One
        } else if v <= u16::MAX as u64 {
            Width::Two
        } else if v <= u32::MAX as u64 {
            Width::Four
        } else {
            Width::Eight
        }
    }

    /// Smallest width holding `v` as a two's complement signed integer.
    pub const fn for_signed(v: i64) -> Self {
        if v >= i8::MIN as i64 && v <= i8::MAX as i64 {
            Width::One
        } else if v >= i16::MIN as i64 && v <= i16::MAX as i64 {
            Width::Two
        } else if v >= i32::MIN as i64 && v <= i32::MAX as i64 {
            Width::Four
        } else {
            Width::Eight
        }
    }
}

/// A decoded element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    SignedInt(Width),
    UnsignedInt(Width),
    False,
    True,
    Float32,
    Float64,
    Utf8String(Width),
    ByteString(Width),
    Null,
    Structure,
    Array,
    Path,
    EndOfContainer,
}

impl ElementType {
    /// Parse the type bits of a control byte. Returns `None` for unassigned codes.
    pub const fn from_control_byte(byte: u8) -> Option<Self> {
        let code = byte & TYPE_MASK;
        let width = Width::from_bits(code);
        Some(match code {
            0x00..=0x03 => ElementType::SignedInt(width),
            0x04..=0x07 => ElementType::UnsignedInt(width),
            TYPE_FALSE => ElementType::False,
            TYPE_TRUE => ElementType::True,
            TYPE_FLOAT32 => ElementType::Float32,
            TYPE_FLOAT64 => ElementType::Float64,
            0x0C..=0x0F => ElementType::Utf8String(width),
            0x10..=0x13 => ElementType::ByteString(width),
            TYPE_NULL => ElementType::Null,
            TYPE_STRUCTURE => ElementType::Structure,
            TYPE_ARRAY => ElementType::Array,
            TYPE_PATH => ElementType::Path,
            TYPE_END_OF_CONTAINER => ElementType::EndOfContainer,
            _ => return None,
        })
    }

    pub const fn code(self) -> u8 {
        match self {
            ElementType::SignedInt(w) => TYPE_SIGNED_INT | w as u8,
            ElementType::UnsignedInt(w) => TYPE_UNSIGNED_INT | w as u8,
            ElementType::False => TYPE_FALSE,
            ElementType::True => TYPE_TRUE,
            ElementType::Float32 => TYPE_FLOAT32,
            ElementType::Float64 => TYPE_FLOAT64,
            ElementType::Utf8String(w) => TYPE_UTF8_STRING | w as u8,
            ElementType::ByteString(w) => TYPE_BYTE_STRING | w as u8,
            ElementType::Null => TYPE_NULL,
            ElementType::Structure => TYPE_STRUCTURE,
            ElementType::Array => TYPE_ARRAY,
            ElementType::Path => TYPE_PATH,
            ElementType::EndOfContainer => TYPE_END_OF_CONTAINER,
        }
    }

    pub const fn container_kind(self) -> Option<ContainerKind> {
        match self {
            ElementType::Structure => Some(ContainerKind::Structure),
            ElementType::Array => Some(ContainerKind::Array),
            ElementType::Path => Some(ContainerKind::Path),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementType::SignedInt(Width::One) => "Signed Integer 1-byte",
            ElementType::SignedInt(Width::Two) => "Signed Integer 2-byte",
            ElementType::SignedInt(Width::Four) => "Signed Integer 4-byte",
            ElementType::SignedInt(Width::Eight) => "Signed Integer 8-byte",
            ElementType::UnsignedInt(Width::One) => "Unsigned Integer 1-byte",
            ElementType::UnsignedInt(Width::Two) => "Unsigned Integer 2-byte",
            ElementType::UnsignedInt(Width::Four) => "Unsigned Integer 4-byte",
            ElementType::UnsignedInt(Width::Eight) => "Unsigned Integer 8-byte",
            ElementType::False => "Boolean False",
            ElementType::True => "Boolean True",
            ElementType::Float32 => "Floating Point 4-byte",
            ElementType::Float64 => "Floating Point 8-byte",
            ElementType::Utf8String(Width::One) => "UTF-8 String 1-byte length",
            ElementType::Utf8String(Width::Two) => "UTF-8 String 2-byte length",
            ElementType::Utf8String(Width::Four) => "UTF-8 String 4-byte length",
            ElementType::Utf8String(Width::Eight) => "UTF-8 String 8-byte length",
            ElementType::ByteString(Width::One) => "Byte String 1-byte length",
            ElementType::ByteString(Width::Two) => "Byte String 2-byte length",
            ElementType::ByteString(Width::Four) => "Byte String 4-byte length",
            ElementType::ByteString(Width::Eight) => "Byte String 8-byte length",
            ElementType::Null => "Null",
            ElementType::Structure => "Structure",
            ElementType::Array => "Array",
            ElementType::Path => "Path",
            ElementType::EndOfContainer => "End of Collection",
        }
    }
}

impl From<ContainerKind> for ElementType {
    fn from(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Structure => ElementType::Structure,
            ContainerKind::Array => ElementType::Array,
            ContainerKind::Path => ElementType::Path,
        }
    }
}
