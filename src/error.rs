//! Structured error types for the font library builder.
//!
//! Input validation problems (`InvalidHeader`, `FaceNameMismatch`,
//! `UnencodableFaceName`) are all detected before any section is built, so
//! a failed build never produces partial output.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public mkfon API functions.
#[derive(Debug, Error)]
pub enum FonError {
    /// An input is too short, a name offset points outside its buffer, or
    /// no inputs were given at all (`index` is `None`).
    #[error("invalid font header{}: {reason}", fmt_index(.index))]
    InvalidHeader { index: Option<usize>, reason: String },

    /// The inputs disagree on their face name and none was given explicitly.
    #[error("fonts disagree on face name ({}); specify one with --facename", .names.join(", "))]
    FaceNameMismatch { names: Vec<String> },

    /// The explicit face name has a character outside Windows-1252.
    #[error("face name {0:?} cannot be encoded in Windows-1252")]
    UnencodableFaceName(String),

    /// A size, count or offset does not fit the field that stores it: a
    /// paragraph offset or length, an NE-relative table offset, the font
    /// count, or a name table's length byte.
    #[error("{what} is {value}, over the limit of {limit}")]
    TooLarge {
        what: String,
        value: usize,
        limit: usize,
    },

    /// An existing image could not be read back.
    #[error("malformed font library: {0}")]
    Malformed(String),

    /// Reading an input or writing the output failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" in input #{}", i + 1),
        None => String::new(),
    }
}

impl FonError {
    pub(crate) fn too_large(what: impl Into<String>, value: usize, limit: usize) -> Self {
        FonError::TooLarge {
            what: what.into(),
            value,
            limit,
        }
    }

    pub(crate) fn invalid_header(index: usize, reason: impl Into<String>) -> Self {
        FonError::InvalidHeader {
            index: Some(index),
            reason: reason.into(),
        }
    }
}
