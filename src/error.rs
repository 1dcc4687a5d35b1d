use thiserror::Error;

/// Failure raised by a registered function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapabilityError {
    #[error("function '{0}' is not available")]
    NotFound(String),

    #[error("expected {expected} argument(s), got {got}")]
    Arity { expected: String, got: usize },

    #[error("{0}")]
    InvalidArgument(String),
}

/// Everything that can go wrong between an expression string and its value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{function}(): {source}")]
    Evaluation {
        function: String,
        #[source]
        source: CapabilityError,
    },
}
