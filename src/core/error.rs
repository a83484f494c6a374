use std::fmt;

use thiserror::Error;

/// Errors that can occur while building, encoding or rendering a QR-bill.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QrBillError {
    /// One or more fields failed validation. Lists every violation.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The payload does not fit the largest permitted symbol version at
    /// error-correction level M.
    #[error("payload of {length} bytes exceeds the symbol capacity of {capacity} bytes")]
    SymbolCapacityExceeded { length: usize, capacity: usize },

    /// Output document could not be produced.
    #[error("render error: {0}")]
    Render(String),
}

impl QrBillError {
    /// All validation errors carried by this error (empty for other variants).
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Whether any carried validation error (or the error itself) is of `kind`.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        match self {
            Self::Validation(errors) => errors.iter().any(|e| e.kind == kind),
            Self::SymbolCapacityExceeded { .. } => kind == ErrorKind::SymbolCapacityExceeded,
            Self::Render(_) => false,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidChecksum,
    InvalidLength,
    InvalidCountry,
    ReferenceKindMismatch,
    FieldTooLong,
    UnsupportedCharacter,
    SymbolCapacityExceeded,
    /// A mandatory field is empty.
    MissingField,
    /// Amount is negative.
    InvalidAmount,
    /// Field content does not follow its required syntax.
    InvalidFormat,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidChecksum => "invalid checksum",
            Self::InvalidLength => "invalid length",
            Self::InvalidCountry => "invalid country",
            Self::ReferenceKindMismatch => "reference kind mismatch",
            Self::FieldTooLong => "field too long",
            Self::UnsupportedCharacter => "unsupported character",
            Self::SymbolCapacityExceeded => "symbol capacity exceeded",
            Self::MissingField => "missing field",
            Self::InvalidAmount => "invalid amount",
            Self::InvalidFormat => "invalid format",
        };
        f.write_str(name)
    }
}

/// A single validation error with field path, kind and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "debtor.address.town").
    pub field: String,
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable error description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Error returned by account identifier and reference parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("expected {expected} characters, found {found}")]
    InvalidLength { expected: String, found: usize },

    #[error("country code '{0}' is not permitted")]
    InvalidCountry(String),

    #[error("check digits do not match")]
    InvalidChecksum,

    #[error("character {character:?} is not allowed here")]
    UnsupportedCharacter { character: char },

    #[error("{reference} reference cannot be used with {account}")]
    ReferenceKindMismatch {
        reference: &'static str,
        account: &'static str,
    },
}

impl IdentifierError {
    /// The [`ErrorKind`] this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength { .. } => ErrorKind::InvalidLength,
            Self::InvalidCountry(_) => ErrorKind::InvalidCountry,
            Self::InvalidChecksum => ErrorKind::InvalidChecksum,
            Self::UnsupportedCharacter { .. } => ErrorKind::UnsupportedCharacter,
            Self::ReferenceKindMismatch { .. } => ErrorKind::ReferenceKindMismatch,
        }
    }

    /// Attach a field path, producing a [`ValidationError`].
    pub fn at(&self, field: impl Into<String>) -> ValidationError {
        ValidationError::new(field, self.kind(), self.to_string())
    }
}
