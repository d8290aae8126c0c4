//! Error taxonomy for schema building, interning, construction and writes.

use thiserror::Error;

pub mod codes {
    pub const INVALID_FIELD_TYPE: &str = "E0101";
    pub const DUPLICATE_FIELD_NAME: &str = "E0102";
    pub const MISSING_FIELD: &str = "E0103";
    pub const TYPE_MISMATCH: &str = "E0104";
    pub const IMMUTABLE_WRITE: &str = "E0105";
    pub const UNKNOWN_FIELD: &str = "E0106";
    pub const NOT_CALLABLE: &str = "E0107";
    pub const ARGUMENT_COUNT_MISMATCH: &str = "E0108";
    pub const FOREIGN_DEFINITION: &str = "E0109";
}

/// Every failure is reported synchronously by the operation that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    /// A schema references a type its kind does not permit.
    #[error("[E0101] field `{field}` has invalid type: {reason}")]
    InvalidFieldType { field: String, reason: String },
    #[error("[E0102] duplicate field name `{field}`")]
    DuplicateFieldName { field: String },
    /// A required field was absent from the source and has no default.
    #[error("[E0103] missing field `{field}` for {ty}")]
    MissingField { ty: String, field: String },
    #[error("[E0104] field `{field}` expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },
    /// Write to a sealed value instance.
    #[error("[E0105] cannot write `{field}`: {ty} values are immutable")]
    ImmutableWrite { ty: String, field: String },
    #[error("[E0106] {ty} has no field `{field}`")]
    UnknownField { ty: String, field: String },
    #[error("[E0107] `{name}` is not a method of {ty}")]
    NotCallable { ty: String, name: String },
    #[error("[E0108] `{name}` expects {expected_min}..={expected_max} arguments, got {actual}")]
    ArgumentCountMismatch {
        name: String,
        expected_min: usize,
        expected_max: usize,
        actual: usize,
    },
    /// A definition from another realm was handed to this realm's registry.
    #[error("[E0109] {ty} belongs to a different realm")]
    ForeignDefinition { ty: String },
}

impl ValueTypeError {
    pub fn code(&self) -> &'static str {
        match self {
            ValueTypeError::InvalidFieldType { .. } => codes::INVALID_FIELD_TYPE,
            ValueTypeError::DuplicateFieldName { .. } => codes::DUPLICATE_FIELD_NAME,
            ValueTypeError::MissingField { .. } => codes::MISSING_FIELD,
            ValueTypeError::TypeMismatch { .. } => codes::TYPE_MISMATCH,
            ValueTypeError::ImmutableWrite { .. } => codes::IMMUTABLE_WRITE,
            ValueTypeError::UnknownField { .. } => codes::UNKNOWN_FIELD,
            ValueTypeError::NotCallable { .. } => codes::NOT_CALLABLE,
            ValueTypeError::ArgumentCountMismatch { .. } => codes::ARGUMENT_COUNT_MISMATCH,
            ValueTypeError::ForeignDefinition { .. } => codes::FOREIGN_DEFINITION,
        }
    }

    pub fn invalid_field_type(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValueTypeError::InvalidFieldType {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: &'static str,
    ) -> Self {
        ValueTypeError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValueTypeError>;
