//! Error taxonomy for the interpreter core.
//!
//! One variant per error kind named in the specification's error design:
//! each carries the structured data needed to format a precise message,
//! mirroring how a teacher runtime crate shapes its own error enum.

use thiserror::Error;

/// Every error the interpreter can raise.
///
/// Propagation is handled by `Result<T, VmError>` throughout the core; a
/// `try` block is the only place an error is caught and turned back into a
/// normal value (see `crate::interp::control`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VmError {
    /// Dispatcher saw an opcode it does not recognize.
    #[error("UnknownOpcode: {0}")]
    UnknownOpcode(String),

    /// Opcode known but operand missing or ill-typed.
    #[error("MalformedOperand: {0}")]
    MalformedOperand(String),

    /// Pop or peek on an empty evaluation stack.
    #[error("StackUnderflow: {0}")]
    StackUnderflow(String),

    /// Class, method, field, local, or argument not found.
    #[error("NotFound: {0}")]
    NotFound(String),

    /// Multiple candidates match a call target with equal specificity.
    #[error("AmbiguousOverload: {0}")]
    AmbiguousOverload(String),

    /// No candidate matches a call target.
    #[error("NoMatchingOverload: {0}")]
    NoMatchingOverload(String),

    /// Coercion failed, cast failed, or operand types disallow the operation.
    #[error("TypeMismatch: {0}")]
    TypeMismatch(String),

    /// Integer division or remainder by zero.
    #[error("DivisionByZero")]
    DivisionByZero,

    /// Branch target label not found, or index outside the instruction range.
    #[error("BranchOutOfRange: {0}")]
    BranchOutOfRange(String),

    /// Call-stack depth exceeded the interpreter's configured bound.
    #[error("RecursionLimit: exceeded depth {0}")]
    RecursionLimit(usize),

    /// A host (native) function raised.
    #[error("Host: {0}")]
    Host(String),
}

impl VmError {
    pub fn unknown_opcode<S: Into<String>>(opcode: S) -> Self {
        Self::UnknownOpcode(opcode.into())
    }

    pub fn malformed_operand<S: Into<String>>(msg: S) -> Self {
        Self::MalformedOperand(msg.into())
    }

    pub fn stack_underflow<S: Into<String>>(msg: S) -> Self {
        Self::StackUnderflow(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn ambiguous_overload<S: Into<String>>(msg: S) -> Self {
        Self::AmbiguousOverload(msg.into())
    }

    pub fn no_matching_overload<S: Into<String>>(msg: S) -> Self {
        Self::NoMatchingOverload(msg.into())
    }

    pub fn type_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub fn branch_out_of_range<S: Into<String>>(msg: S) -> Self {
        Self::BranchOutOfRange(msg.into())
    }

    pub fn host<S: Into<String>>(msg: S) -> Self {
        Self::Host(msg.into())
    }

    /// The taxonomy name of this error, as used in the default driver's
    /// one-line diagnostic (spec.md §7 "user-visible behavior").
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownOpcode(_) => "UnknownOpcode",
            Self::MalformedOperand(_) => "MalformedOperand",
            Self::StackUnderflow(_) => "StackUnderflow",
            Self::NotFound(_) => "NotFound",
            Self::AmbiguousOverload(_) => "AmbiguousOverload",
            Self::NoMatchingOverload(_) => "NoMatchingOverload",
            Self::TypeMismatch(_) => "TypeMismatch",
            Self::DivisionByZero => "DivisionByZero",
            Self::BranchOutOfRange(_) => "BranchOutOfRange",
            Self::RecursionLimit(_) => "RecursionLimit",
            Self::Host(_) => "Host",
        }
    }
}

/// Result type alias used throughout the core.
pub type VmResult<T> = Result<T, VmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(VmError::DivisionByZero.kind(), "DivisionByZero");
        assert_eq!(VmError::not_found("Foo").kind(), "NotFound");
    }

    #[test]
    fn display_includes_message() {
        let err = VmError::type_mismatch("expected int32, got string");
        assert_eq!(
            format!("{}", err),
            "TypeMismatch: expected int32, got string"
        );
    }
}
