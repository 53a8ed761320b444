use thiserror::Error;

pub type Result<T, E = ReflectError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    /// A node kind the requested operation is not defined for.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("{member} is not a member of {context}")]
    NotAMember { member: String, context: String },

    #[error("type variable {variable} is not bound in {context}")]
    UnresolvedVariable { variable: String, context: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ReflectError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        ReflectError::InvariantViolation(message.into())
    }
}
