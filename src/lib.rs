pub mod angle;
pub mod ast;
pub mod calculator;
pub mod capabilities;
pub mod config;
pub mod engine;
pub mod error;
pub mod functions;
pub mod graph;
pub mod memory;

pub use angle::AngleMode;
pub use ast::{ASTNode, Bindings, Evaluator, Parser};
pub use calculator::Calculator;
pub use capabilities::{CapabilityTable, FunctionTable};
pub use config::EngineConfig;
pub use engine::MathEngine;
pub use error::{CapabilityError, EvalError};

/// Evaluates `expression` with the standard functions in radian mode.
pub fn evaluate_expression(
    expression: &str,
    context: &std::collections::HashMap<String, f64>,
) -> Result<f64, EvalError> {
    MathEngine::default().evaluate(expression, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_evaluate_expression() {
        let context = HashMap::from([("x".to_string(), 3.0)]);
        assert_eq!(evaluate_expression("2 * x + pow(x, 2)", &context), Ok(15.0));
        assert_eq!(
            evaluate_expression("__import__", &context),
            Err(EvalError::InvalidCharacter {
                character: '_',
                position: 0
            })
        );
    }
}
