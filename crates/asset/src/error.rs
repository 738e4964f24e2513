//! Typed failures raised while parsing OBJ text.

use std::fmt;

use thiserror::Error;

/// Attribute table a face reference points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Vertex,
    Texture,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Vertex => "vertex",
            AttributeKind::Texture => "texture",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Parse failure. Line numbers are 1-based.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ObjError {
    #[error("line {line}: face has {count} references, expected 3 or 4")]
    InvalidFaceArity { line: usize, count: usize },

    /// `index` is the value as written in the file (1-based or negative).
    #[error("line {line}: {kind} index {index} out of range (len={len})")]
    IndexOutOfRange {
        line: usize,
        kind: AttributeKind,
        index: i64,
        len: usize,
    },

    #[error("line {line}: malformed number '{token}'")]
    MalformedNumber { line: usize, token: String },

    #[error("line {line}: missing {what}")]
    MissingComponent { line: usize, what: &'static str },

    #[error("line {line}: {kind} indices given for some face references but not all")]
    MixedAttributes { line: usize, kind: AttributeKind },
}

impl ObjError {
    /// Line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ObjError::InvalidFaceArity { line, .. }
            | ObjError::IndexOutOfRange { line, .. }
            | ObjError::MalformedNumber { line, .. }
            | ObjError::MissingComponent { line, .. }
            | ObjError::MixedAttributes { line, .. } => *line,
        }
    }
}

pub type ObjResult<T> = Result<T, ObjError>;
