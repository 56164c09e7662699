use std::io;
use thiserror::Error;

use crate::tags::{ContainerKind, Tag};

/// Error type for TLV encoding and decoding.
///
/// Decode errors carry the byte offset where the problem was detected.
#[derive(Error, Debug)]
pub enum TlvError {
    #[error("integer {0} does not fit in a 64-bit TLV integer")]
    ValueOutOfRange(String),

    #[error("tag {tag:?} is not allowed {}", placement(.container))]
    InvalidTagPlacement {
        tag: Tag,
        container: Option<ContainerKind>,
    },

    #[error("element type {0:#04x} is not a container type")]
    InvalidContainerType(u8),

    #[error("unbalanced container at offset {offset}")]
    UnbalancedContainer { offset: usize },

    #[error("value has no TLV mapping: {0}")]
    UnsupportedValueKind(String),

    #[error("input truncated at offset {offset}")]
    TruncatedInput { offset: usize },

    #[error("unsupported element type {code:#04x} at offset {offset}")]
    UnsupportedType { code: u8, offset: usize },

    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    #[error("trailing bytes after element at offset {offset}")]
    TrailingBytes { offset: usize },

    #[error("expected a leaf element at offset {offset}")]
    ExpectedLeaf { offset: usize },

    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("path member at offset {offset} is not null")]
    InvalidPathMember { offset: usize },

    #[error("end of container at offset {offset} carries a tag")]
    TaggedEndOfContainer { offset: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serde error: {0}")]
    Serde(String),
}

fn placement(container: &Option<ContainerKind>) -> String {
    match container {
        None => "at top level".to_string(),
        Some(kind) => format!("inside {}", kind.name()),
    }
}

impl serde::ser::Error for TlvError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TlvError::Serde(msg.to_string())
    }
}

impl serde::de::Error for TlvError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TlvError::Serde(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TlvError>;
