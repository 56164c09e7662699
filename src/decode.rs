use crate::encode::DEFAULT_MAX_DEPTH;
use crate::error::{Result, TlvError};
use crate::tags::{ContainerKind, Tag, TagControl};
use crate::types::{ElementType, TYPE_MASK, Width};
use crate::value::Value;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum number of simultaneously open containers.
    pub max_depth: usize,
    /// Reject tags that the encoder would not have allowed in their position.
    pub validate_tags: bool,
    /// When set, implicit-profile tags decode with this profile id filled in instead of
    /// `profile: None`.
    pub implicit_profile: Option<u32>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            validate_tags: false,
            implicit_profile: None,
        }
    }
}

/// Control byte and tag of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Offset of the control byte.
    pub offset: usize,
    pub control: TagControl,
    pub element_type: ElementType,
    pub tag: Tag,
}

// An open container and the members read so far.
struct Frame {
    kind: ContainerKind,
    tag: Tag,
    members: Vec<(Tag, Value)>,
}

impl Frame {
    fn close(self) -> (Tag, Value) {
        let value = match self.kind {
            ContainerKind::Structure => Value::Structure(self.members),
            ContainerKind::Array => {
                Value::Array(self.members.into_iter().map(|(_, v)| v).collect())
            }
            ContainerKind::Path => {
                Value::Path(self.members.into_iter().map(|(t, _)| t).collect())
            }
        };
        (self.tag, value)
    }
}

/// Single pass TLV decoder over a byte slice
///
/// Containers are tracked on an explicit stack, so nesting depth is bounded by
/// [`DecodeConfig::max_depth`] rather than by the native call stack.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    config: DecodeConfig,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecodeConfig::default())
    }

    pub fn with_config(data: &'a [u8], config: DecodeConfig) -> Self {
        Decoder {
            data,
            pos: 0,
            config,
        }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() - self.pos < n {
            return Err(TlvError::TruncatedInput { offset: self.pos });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_uint(&mut self, width: Width) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf[..width.bytes()].copy_from_slice(self.take(width.bytes())?);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_int(&mut self, width: Width) -> Result<i64> {
        let shift = 64 - 8 * width.bytes() as u32;
        let raw = self.read_uint(width)?;
        // Sign-extend from the encoded width.
        Ok(((raw << shift) as i64) >> shift)
    }

    fn read_tag(&mut self, control: TagControl) -> Result<Tag> {
        let implicit = self.config.implicit_profile;
        Ok(match control {
            TagControl::Anonymous => Tag::Anonymous,
            TagControl::Context => Tag::Context(self.read_u8()?),
            TagControl::CommonProfile2 => Tag::common(self.read_u16()? as u32),
            TagControl::CommonProfile4 => Tag::common(self.read_u32()?),
            TagControl::ImplicitProfile2 => Tag::Profile {
                profile: implicit,
                tag_num: self.read_u16()? as u32,
            },
            TagControl::ImplicitProfile4 => Tag::Profile {
                profile: implicit,
                tag_num: self.read_u32()?,
            },
            TagControl::FullyQualified6 => {
                let profile = self.read_u32()?;
                Tag::profile(profile, self.read_u16()? as u32)
            }
            TagControl::FullyQualified8 => {
                let profile = self.read_u32()?;
                Tag::profile(profile, self.read_u32()?)
            }
        })
    }

    /// Read a control byte and the tag that follows it.
    pub fn read_header(&mut self) -> Result<Header> {
        let offset = self.pos;
        let byte = self.read_u8()?;
        let element_type =
            ElementType::from_control_byte(byte).ok_or(TlvError::UnsupportedType {
                code: byte & TYPE_MASK,
                offset,
            })?;
        let control = TagControl::from_control_byte(byte);
        if element_type == ElementType::EndOfContainer && control != TagControl::Anonymous {
            return Err(TlvError::TaggedEndOfContainer { offset });
        }
        let tag = self.read_tag(control)?;
        Ok(Header {
            offset,
            control,
            element_type,
            tag,
        })
    }

    fn read_length(&mut self, width: Width) -> Result<usize> {
        let offset = self.pos;
        let len = self.read_uint(width)?;
        usize::try_from(len).map_err(|_| TlvError::TruncatedInput { offset })
    }

    // Value bytes of a non-container element whose header has been read.
    pub(crate) fn read_scalar(
        &mut self,
        element_type: ElementType,
        offset: usize,
    ) -> Result<Value> {
        Ok(match element_type {
            ElementType::SignedInt(w) => Value::SignedInt(self.read_int(w)?),
            ElementType::UnsignedInt(w) => Value::UnsignedInt(self.read_uint(w)?),
            ElementType::False => Value::Bool(false),
            ElementType::True => Value::Bool(true),
            ElementType::Null => Value::Null,
            ElementType::Float32 => {
                let bits = self.read_uint(Width::Four)? as u32;
                Value::Float(f32::from_bits(bits) as f64)
            }
            ElementType::Float64 => Value::Float(f64::from_bits(self.read_uint(Width::Eight)?)),
            ElementType::Utf8String(w) => {
                let len = self.read_length(w)?;
                let start = self.pos;
                let bytes = self.take(len)?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|_| TlvError::InvalidUtf8 { offset: start })?;
                Value::Utf8String(s.to_owned())
            }
            ElementType::ByteString(w) => {
                let len = self.read_length(w)?;
                Value::ByteString(self.take(len)?.to_vec())
            }
            ElementType::Structure
            | ElementType::Array
            | ElementType::Path
            | ElementType::EndOfContainer => return Err(TlvError::ExpectedLeaf { offset }),
        })
    }

    fn decode_element(&mut self) -> Result<(Tag, Value)> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            if self.is_empty() && !stack.is_empty() {
                return Err(TlvError::UnbalancedContainer { offset: self.pos });
            }
            let header = self.read_header()?;
            let parent = stack.last().map(|f| f.kind);

            if self.config.validate_tags && header.element_type != ElementType::EndOfContainer {
                header.tag.check_placement(parent)?;
            }
            // Path members carry only their tag.
            if parent == Some(ContainerKind::Path)
                && !matches!(
                    header.element_type,
                    ElementType::Null | ElementType::EndOfContainer
                )
            {
                return Err(TlvError::InvalidPathMember {
                    offset: header.offset,
                });
            }

            let completed = match header.element_type {
                ElementType::EndOfContainer => {
                    let frame = stack.pop().ok_or(TlvError::UnbalancedContainer {
                        offset: header.offset,
                    })?;
                    log::trace!("closed {} at depth {}", frame.kind.name(), stack.len() + 1);
                    frame.close()
                }
                element_type => match element_type.container_kind() {
                    Some(kind) => {
                        if stack.len() >= self.config.max_depth {
                            return Err(TlvError::DepthLimitExceeded {
                                limit: self.config.max_depth,
                            });
                        }
                        stack.push(Frame {
                            kind,
                            tag: header.tag,
                            members: Vec::new(),
                        });
                        log::trace!("opened {} at depth {}", kind.name(), stack.len());
                        continue;
                    }
                    None => (
                        header.tag,
                        self.read_scalar(element_type, header.offset)?,
                    ),
                },
            };

            match stack.last_mut() {
                Some(frame) => frame.members.push(completed),
                None => return Ok(completed),
            }
        }
    }

    /// Decode the next top-level element, or `None` at end of input.
    pub fn next_element(&mut self) -> Result<Option<(Tag, Value)>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.decode_element()
            .map(Some)
            .inspect_err(|e| log::debug!("rejected TLV input: {e}"))
    }

    /// Decode every remaining top-level element.
    pub fn decode_all(&mut self) -> Result<Vec<(Tag, Value)>> {
        let mut elements = Vec::new();
        while let Some(element) = self.next_element()? {
            elements.push(element);
        }
        Ok(elements)
    }

    /// Read a single non-container element.
    ///
    /// This is a narrow helper for peeking at one scalar; use [`Decoder::next_element`] for
    /// general input. Containers and end-of-container markers fail with `ExpectedLeaf`.
    pub fn read_leaf(&mut self) -> Result<(Tag, Value)> {
        let header = self.read_header()?;
        let value = self.read_scalar(header.element_type, header.offset)?;
        Ok((header.tag, value))
    }
}

/// Decode exactly one element from `data`.
pub fn from_slice(data: &[u8]) -> Result<(Tag, Value)> {
    from_slice_with_config(data, DecodeConfig::default())
}

pub fn from_slice_with_config(data: &[u8], config: DecodeConfig) -> Result<(Tag, Value)> {
    let mut decoder = Decoder::with_config(data, config);
    let element = decoder
        .next_element()?
        .ok_or(TlvError::TruncatedInput { offset: 0 })?;
    if !decoder.is_empty() {
        return Err(TlvError::TrailingBytes {
            offset: decoder.position(),
        });
    }
    Ok(element)
}
