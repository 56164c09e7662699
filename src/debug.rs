//! Human-readable listing of an encoded buffer, one element per line.

use std::fmt::Write;

use crate::decode::Decoder;
use crate::error::{Result, TlvError};
use crate::tags::Tag;
use crate::types::ElementType;
use crate::value::Value;

/// List every element in `data`, indented by nesting depth.
///
/// ```
/// use weave_tlv::debug::dump;
///
/// let text = dump(&[0x15, 0x24, 0x01, 0x2A, 0x18]).unwrap();
/// assert_eq!(
///     text,
///     "0000: Structure, Anonymous\n\
///      0001:   Unsigned Integer 1-byte, Context 1-byte, tag 1 = 42\n\
///      0004: End of Collection\n"
/// );
/// ```
pub fn dump(data: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut decoder = Decoder::new(data);
    let mut depth = 0usize;

    while !decoder.is_empty() {
        let header = decoder.read_header()?;
        let element_type = header.element_type;

        if element_type == ElementType::EndOfContainer {
            depth = depth.checked_sub(1).ok_or(TlvError::UnbalancedContainer {
                offset: header.offset,
            })?;
            line(&mut out, header.offset, depth, element_type.name());
            continue;
        }

        let mut text = format!("{}, {}", element_type.name(), header.control.name());
        if let Some(tag) = describe_tag(&header.tag) {
            let _ = write!(text, ", {tag}");
        }
        if element_type.container_kind().is_none() {
            let value = decoder.read_scalar(element_type, header.offset)?;
            if let Some(value) = describe_value(&value) {
                let _ = write!(text, " = {value}");
            }
        }
        line(&mut out, header.offset, depth, &text);

        if element_type.container_kind().is_some() {
            depth += 1;
        }
    }

    if depth > 0 {
        return Err(TlvError::UnbalancedContainer {
            offset: decoder.position(),
        });
    }
    Ok(out)
}

fn line(out: &mut String, offset: usize, depth: usize, text: &str) {
    let _ = writeln!(out, "{offset:04}: {:indent$}{text}", "", indent = depth * 2);
}

fn describe_tag(tag: &Tag) -> Option<String> {
    match *tag {
        Tag::Anonymous => None,
        Tag::Context(n) => Some(format!("tag {n}")),
        Tag::Profile {
            profile: None,
            tag_num,
        } => Some(format!("tag {tag_num}")),
        Tag::Profile {
            profile: Some(p),
            tag_num,
        } => Some(format!("profile {p:#010x} tag {tag_num}")),
    }
}

fn describe_value(value: &Value) -> Option<String> {
    match value {
        Value::SignedInt(i) => Some(i.to_string()),
        Value::UnsignedInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Utf8String(s) => Some(format!("{s:?}")),
        Value::ByteString(b) => Some(b.iter().map(|byte| format!("{byte:02x}")).collect()),
        _ => None,
    }
}
