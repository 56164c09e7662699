use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{Result, TlvError};

/// Profile id of the common profile.
pub const COMMON_PROFILE: u32 = 0;

/// A TLV tag identifying an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// No tag. Used at top level and for array and path members.
    Anonymous,
    /// Small integer tag, meaningful only relative to the enclosing structure or path.
    Context(u8),
    /// Profile-specific tag.
    ///
    /// `profile: None` resolves to the encoder's implicit profile. `Some(0)` is the common
    /// profile; any other profile is written fully qualified.
    Profile { profile: Option<u32>, tag_num: u32 },
}

impl Tag {
    /// Shorthand for a profile tag in the implicit profile.
    pub const fn implicit(tag_num: u32) -> Self {
        Tag::Profile {
            profile: None,
            tag_num,
        }
    }

    /// Shorthand for a profile tag in the common profile.
    pub const fn common(tag_num: u32) -> Self {
        Tag::Profile {
            profile: Some(COMMON_PROFILE),
            tag_num,
        }
    }

    /// Shorthand for a profile tag with an explicit profile id.
    pub const fn profile(profile: u32, tag_num: u32) -> Self {
        Tag::Profile {
            profile: Some(profile),
            tag_num,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Tag::Anonymous)
    }

    /// Check that this tag may appear directly inside `parent`.
    ///
    /// `parent` is `None` at top level.
    pub fn check_placement(&self, parent: Option<ContainerKind>) -> Result<()> {
        let allowed = match (self, parent) {
            (Tag::Anonymous, Some(ContainerKind::Structure)) => false,
            (Tag::Anonymous, _) => true,
            (Tag::Context(_), None | Some(ContainerKind::Array)) => false,
            (Tag::Context(_), _) => true,
            (Tag::Profile { .. }, Some(ContainerKind::Array)) => false,
            (Tag::Profile { .. }, _) => true,
        };
        if allowed {
            Ok(())
        } else {
            Err(TlvError::InvalidTagPlacement {
                tag: *self,
                container: parent,
            })
        }
    }

    // Anonymous < Context < implicit profile < explicit profile (by id), then by number.
    fn rank(&self) -> (u8, u32, u32) {
        match *self {
            Tag::Anonymous => (0, 0, 0),
            Tag::Context(n) => (1, 0, n as u32),
            Tag::Profile {
                profile: None,
                tag_num,
            } => (2, 0, tag_num),
            Tag::Profile {
                profile: Some(p),
                tag_num,
            } => (3, p, tag_num),
        }
    }
}

/// Canonical tag order, used to sort structure members supplied as a map.
impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The three container element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    Structure,
    Array,
    Path,
}

impl ContainerKind {
    pub const fn name(self) -> &'static str {
        match self {
            ContainerKind::Structure => "structure",
            ContainerKind::Array => "array",
            ContainerKind::Path => "path",
        }
    }
}

/// Tag control: the high three bits of the control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TagControl {
    Anonymous = 0x00,
    Context = 0x20,
    CommonProfile2 = 0x40,
    CommonProfile4 = 0x60,
    ImplicitProfile2 = 0x80,
    ImplicitProfile4 = 0xA0,
    FullyQualified6 = 0xC0,
    FullyQualified8 = 0xE0,
}

pub(crate) const TAG_CONTROL_MASK: u8 = 0xE0;

impl TagControl {
    /// Split the tag-control bits out of a control byte. Every bit pattern is defined.
    pub const fn from_control_byte(byte: u8) -> Self {
        match byte & TAG_CONTROL_MASK {
            0x00 => TagControl::Anonymous,
            0x20 => TagControl::Context,
            0x40 => TagControl::CommonProfile2,
            0x60 => TagControl::CommonProfile4,
            0x80 => TagControl::ImplicitProfile2,
            0xA0 => TagControl::ImplicitProfile4,
            0xC0 => TagControl::FullyQualified6,
            _ => TagControl::FullyQualified8,
        }
    }

    /// Pick the tag control for `tag` given the encoder's implicit profile.
    pub fn for_tag(tag: &Tag, implicit_profile: Option<u32>) -> Self {
        match *tag {
            Tag::Anonymous => TagControl::Anonymous,
            Tag::Context(_) => TagControl::Context,
            Tag::Profile { profile, tag_num } => {
                let short = tag_num <= u16::MAX as u32;
                let implicit = match profile {
                    None => true,
                    Some(p) => implicit_profile == Some(p),
                };
                match (implicit, profile, short) {
                    (true, _, true) => TagControl::ImplicitProfile2,
                    (true, _, false) => TagControl::ImplicitProfile4,
                    (false, Some(COMMON_PROFILE), true) => TagControl::CommonProfile2,
                    (false, Some(COMMON_PROFILE), false) => TagControl::CommonProfile4,
                    (false, _, true) => TagControl::FullyQualified6,
                    (false, _, false) => TagControl::FullyQualified8,
                }
            }
        }
    }

    /// Number of tag bytes following the control byte.
    pub const fn tag_len(self) -> usize {
        match self {
            TagControl::Anonymous => 0,
            TagControl::Context => 1,
            TagControl::CommonProfile2 | TagControl::ImplicitProfile2 => 2,
            TagControl::CommonProfile4 | TagControl::ImplicitProfile4 => 4,
            TagControl::FullyQualified6 => 6,
            TagControl::FullyQualified8 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TagControl::Anonymous => "Anonymous",
            TagControl::Context => "Context 1-byte",
            TagControl::CommonProfile2 => "Common Profile 2-byte",
            TagControl::CommonProfile4 => "Common Profile 4-byte",
            TagControl::ImplicitProfile2 => "Implicit Profile 2-byte",
            TagControl::ImplicitProfile4 => "Implicit Profile 4-byte",
            TagControl::FullyQualified6 => "Fully Qualified 6-byte",
            TagControl::FullyQualified8 => "Fully Qualified 8-byte",
        }
    }
}
