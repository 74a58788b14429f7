use core::fmt;
use thiserror::Error;

pub type Result<T, E = CodecError> = core::result::Result<T, E>;

/// Positional field names, as reported in [`CodecError::InvalidField`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    Dir1,
    Dir2,
    X,
    Y,
    HeadValue,
    TractorValue,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Dir1 => "dir1",
            Field::Dir2 => "dir2",
            Field::X => "x",
            Field::Y => "y",
            Field::HeadValue => "head_value",
            Field::TractorValue => "tractor_value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed message: wrong field count ({fields}, expected 3 or 5)")]
    MalformedMessage { fields: usize },
    #[error("invalid field {field}: {value:?}")]
    InvalidField { field: Field, value: String },
    #[error("payload is not valid UTF-8")]
    NotUtf8,
    #[error("target {target:?} contains the field separator")]
    InvalidTarget { target: String },
}

impl CodecError {
    pub(crate) fn invalid(field: Field, value: &str) -> Self {
        CodecError::InvalidField {
            field,
            value: value.to_string(),
        }
    }

    /// The offending field, if this is a field-level error.
    pub fn field(&self) -> Option<Field> {
        match self {
            CodecError::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }
}
