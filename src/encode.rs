use serde::Serialize;
use std::io::Write;

use crate::error::{Result, TlvError};
use crate::tags::{COMMON_PROFILE, ContainerKind, Tag, TagControl};
use crate::types::{ElementType, Width};
use crate::value::Value;

/// Default maximum container nesting, shared by the encoder and the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Profile written in the short implicit form. `Tag::Profile { profile: None, .. }` always
    /// uses the implicit form.
    pub implicit_profile: Option<u32>,
    /// Maximum number of simultaneously open containers.
    pub max_depth: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            implicit_profile: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// Work item for the non-recursive tree walk in `put`.
enum Step<'a> {
    Element(Tag, &'a Value),
    PathMember(Tag),
    End,
}

/// Streaming TLV encoder
///
/// Tracks the stack of open containers so that every tag is checked against the container it
/// is written into.
pub struct Encoder<W: Write> {
    writer: W,
    config: EncoderConfig,
    stack: Vec<ContainerKind>,
    written: usize,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, EncoderConfig::default())
    }

    pub fn with_config(writer: W, config: EncoderConfig) -> Self {
        Encoder {
            writer,
            config,
            stack: Vec::new(),
            written: 0,
        }
    }

    pub fn set_implicit_profile(&mut self, profile: Option<u32>) {
        self.config.implicit_profile = profile;
    }

    pub fn implicit_profile(&self) -> Option<u32> {
        self.config.implicit_profile
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Return the writer. Fails if any container is still open.
    pub fn finish(self) -> Result<W> {
        if !self.stack.is_empty() {
            return Err(TlvError::UnbalancedContainer {
                offset: self.written,
            });
        }
        Ok(self.writer)
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn write_header(&mut self, tag: &Tag, element_type: ElementType) -> Result<()> {
        tag.check_placement(self.stack.last().copied())?;

        let control = TagControl::for_tag(tag, self.config.implicit_profile);
        self.emit(&[control as u8 | element_type.code()])?;

        match *tag {
            Tag::Anonymous => Ok(()),
            Tag::Context(n) => self.emit(&[n]),
            Tag::Profile { profile, tag_num } => {
                if matches!(
                    control,
                    TagControl::FullyQualified6 | TagControl::FullyQualified8
                ) {
                    let profile = profile.unwrap_or(COMMON_PROFILE);
                    self.emit(&profile.to_le_bytes())?;
                }
                match control {
                    TagControl::CommonProfile2
                    | TagControl::ImplicitProfile2
                    | TagControl::FullyQualified6 => self.emit(&(tag_num as u16).to_le_bytes()),
                    _ => self.emit(&tag_num.to_le_bytes()),
                }
            }
        }
    }

    pub fn put_null(&mut self, tag: Tag) -> Result<()> {
        self.write_header(&tag, ElementType::Null)
    }

    pub fn put_bool(&mut self, tag: Tag, v: bool) -> Result<()> {
        let element_type = if v {
            ElementType::True
        } else {
            ElementType::False
        };
        self.write_header(&tag, element_type)
    }

    /// Write a signed integer in the smallest width that holds it.
    pub fn put_signed(&mut self, tag: Tag, v: i64) -> Result<()> {
        let width = Width::for_signed(v);
        self.write_header(&tag, ElementType::SignedInt(width))?;
        self.emit(&v.to_le_bytes()[..width.bytes()])
    }

    /// Write an unsigned integer in the smallest width that holds it.
    pub fn put_unsigned(&mut self, tag: Tag, v: u64) -> Result<()> {
        let width = Width::for_unsigned(v);
        self.write_header(&tag, ElementType::UnsignedInt(width))?;
        self.emit(&v.to_le_bytes()[..width.bytes()])
    }

    /// Write an integer of unknown sign: negative values are written signed, all others
    /// unsigned.
    pub fn put_int(&mut self, tag: Tag, v: i128) -> Result<()> {
        if v < 0 {
            let v = i64::try_from(v).map_err(|_| TlvError::ValueOutOfRange(v.to_string()))?;
            self.put_signed(tag, v)
        } else {
            let v = u64::try_from(v).map_err(|_| TlvError::ValueOutOfRange(v.to_string()))?;
            self.put_unsigned(tag, v)
        }
    }

    pub fn put_float(&mut self, tag: Tag, v: f64) -> Result<()> {
        #[cfg(feature = "compact_floats")]
        {
            let narrow = v as f32;
            if narrow as f64 == v {
                self.write_header(&tag, ElementType::Float32)?;
                return self.emit(&narrow.to_le_bytes());
            }
        }
        self.write_header(&tag, ElementType::Float64)?;
        self.emit(&v.to_le_bytes())
    }

    pub fn put_string(&mut self, tag: Tag, v: &str) -> Result<()> {
        let width = Width::for_unsigned(v.len() as u64);
        self.write_header(&tag, ElementType::Utf8String(width))?;
        self.write_length(width, v.len())?;
        self.emit(v.as_bytes())
    }

    pub fn put_bytes(&mut self, tag: Tag, v: &[u8]) -> Result<()> {
        let width = Width::for_unsigned(v.len() as u64);
        self.write_header(&tag, ElementType::ByteString(width))?;
        self.write_length(width, v.len())?;
        self.emit(v)
    }

    fn write_length(&mut self, width: Width, len: usize) -> Result<()> {
        self.emit(&(len as u64).to_le_bytes()[..width.bytes()])
    }

    /// Open a container. `element_type` must be a structure, array or path.
    ///
    /// The tag is checked against the currently open container, not the new one.
    pub fn start_container(&mut self, tag: Tag, element_type: ElementType) -> Result<()> {
        let kind = element_type
            .container_kind()
            .ok_or(TlvError::InvalidContainerType(element_type.code()))?;
        tag.check_placement(self.stack.last().copied())?;
        if self.stack.len() >= self.config.max_depth {
            return Err(TlvError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        self.write_header(&tag, element_type)?;
        self.stack.push(kind);
        log::trace!("opened {} at depth {}", kind.name(), self.stack.len());
        Ok(())
    }

    pub fn start_structure(&mut self, tag: Tag) -> Result<()> {
        self.start_container(tag, ElementType::Structure)
    }

    pub fn start_array(&mut self, tag: Tag) -> Result<()> {
        self.start_container(tag, ElementType::Array)
    }

    pub fn start_path(&mut self, tag: Tag) -> Result<()> {
        self.start_container(tag, ElementType::Path)
    }

    /// Close the innermost open container.
    pub fn end_container(&mut self) -> Result<()> {
        let kind = self.stack.pop().ok_or(TlvError::UnbalancedContainer {
            offset: self.written,
        })?;
        log::trace!("closed {} at depth {}", kind.name(), self.stack.len() + 1);
        self.emit(&[TagControl::Anonymous as u8 | ElementType::EndOfContainer.code()])
    }

    /// Write a whole value tree.
    pub fn put(&mut self, tag: Tag, value: &Value) -> Result<()> {
        let mut work = vec![Step::Element(tag, value)];
        while let Some(step) = work.pop() {
            match step {
                Step::End => self.end_container()?,
                Step::PathMember(tag) => self.put_null(tag)?,
                Step::Element(tag, value) => match value {
                    Value::Null => self.put_null(tag)?,
                    Value::Bool(b) => self.put_bool(tag, *b)?,
                    Value::SignedInt(i) => self.put_signed(tag, *i)?,
                    Value::UnsignedInt(u) => self.put_unsigned(tag, *u)?,
                    Value::Float(f) => self.put_float(tag, *f)?,
                    Value::Utf8String(s) => self.put_string(tag, s)?,
                    Value::ByteString(b) => self.put_bytes(tag, b)?,
                    Value::Structure(members) => {
                        self.start_structure(tag)?;
                        work.push(Step::End);
                        work.extend(members.iter().rev().map(|(t, v)| Step::Element(*t, v)));
                    }
                    Value::Array(items) => {
                        self.start_array(tag)?;
                        work.push(Step::End);
                        work.extend(items.iter().rev().map(|v| Step::Element(Tag::Anonymous, v)));
                    }
                    Value::Path(tags) => {
                        self.start_path(tag)?;
                        work.push(Step::End);
                        work.extend(tags.iter().rev().map(|t| Step::PathMember(*t)));
                    }
                },
            }
        }
        Ok(())
    }

    /// Write a structure from an unordered map, members in canonical tag order.
    pub fn put_map<'a, I>(&mut self, tag: Tag, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a Tag, &'a Value)>,
    {
        let mut members: Vec<(&Tag, &Value)> = entries.into_iter().collect();
        members.sort_by(|a, b| a.0.cmp(b.0));
        self.start_structure(tag)?;
        for (t, v) in members {
            self.put(*t, v)?;
        }
        self.end_container()
    }

    /// Convert any serializable value with [`crate::ser::to_value`] and write it.
    pub fn encode<T: ?Sized + Serialize>(&mut self, tag: Tag, value: &T) -> Result<()> {
        let value = crate::ser::to_value(value)?;
        self.put(tag, &value)
    }
}
