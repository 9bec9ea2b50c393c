use crate::criteria::CriteriaField;
use thiserror::Error;

/// Raised while turning raw criteria text into typed bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("criterion '{field}' expects a whole number, got '{value}'")]
    InvalidNumericCriterion { field: CriteriaField, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("unknown criteria field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is a checkbox and only accepts true/false")]
    ExpectedFlag(CriteriaField),
    #[error("field '{0}' is a text input and does not accept true/false")]
    ExpectedText(CriteriaField),
}
