use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("undefined: division by zero in {context}")]
    DivisionByZero { context: &'static str },
    #[error("{field} is out of range: {reason}")]
    InvalidRange {
        field: &'static str,
        reason: String,
    },
    #[error("result does not fit in a 64-bit integer")]
    Overflow,
    #[error("cannot parse {input:?}")]
    Parse { input: String },
}

impl CalcError {
    pub fn division_by_zero(context: &'static str) -> Self {
        CalcError::DivisionByZero { context }
    }

    pub fn invalid_range(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidRange {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, CalcError::DivisionByZero { .. })
    }
}
