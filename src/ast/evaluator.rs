use crate::ast::{constant, ASTNode, Bindings};
use crate::capabilities::CapabilityTable;
use crate::error::{CapabilityError, EvalError};
use log::trace;

/// Walks one AST against borrowed bindings and a borrowed capability table.
///
/// Built per call and dropped afterwards: it holds no state of its own, so
/// evaluating the same tree twice with the same inputs gives the same bits.
pub struct Evaluator<'a> {
    variables: &'a Bindings,
    capabilities: &'a dyn CapabilityTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a Bindings, capabilities: &'a dyn CapabilityTable) -> Self {
        Self {
            variables,
            capabilities,
        }
    }

    /// Evaluates an `ASTNode` against the bindings and capabilities.
    pub fn evaluate(&self, ast: &ASTNode) -> Result<f64, EvalError> {
        match ast {
            ASTNode::Number(n) => Ok(*n),

            ASTNode::Variable(name) => self.resolve(name),

            ASTNode::BinaryOperation { .. } => self.evaluate_chain(ast),

            ASTNode::UnaryOperation { operator, operand } => {
                Ok(operator.apply(self.evaluate(operand)?))
            }

            ASTNode::FunctionCall { name, args } => {
                let arguments = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<f64>, EvalError>>()?;

                trace!("Calling {}({:?})", name, arguments);
                self.capabilities
                    .call(name, &arguments)
                    .map_err(|err| match err {
                        CapabilityError::NotFound(_) => EvalError::UnknownFunction(name.clone()),
                        source => EvalError::Evaluation {
                            function: name.clone(),
                            source,
                        },
                    })
            }
        }
    }

    /// Left-associative operators nest down the left side of the tree, as deep
    /// as the chain is long. The spine is followed in a loop and folded left to
    /// right, so only right operands recurse.
    fn evaluate_chain(&self, ast: &ASTNode) -> Result<f64, EvalError> {
        let mut rights = Vec::new();
        let mut node = ast;
        while let ASTNode::BinaryOperation {
            left,
            operator,
            right,
        } = node
        {
            rights.push((operator, right));
            node = &**left;
        }

        let mut value = self.evaluate(node)?;
        for (operator, right) in rights.into_iter().rev() {
            value = operator.apply(value, self.evaluate(right)?);
        }
        Ok(value)
    }

    /// Caller bindings shadow the built-in constants.
    fn resolve(&self, name: &str) -> Result<f64, EvalError> {
        self.variables
            .get(name)
            .copied()
            .or_else(|| constant(name))
            .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()))
    }
}

/// Evaluates `ast` with a throwaway [`Evaluator`].
pub fn evaluate(
    ast: &ASTNode,
    variables: &Bindings,
    capabilities: &dyn CapabilityTable,
) -> Result<f64, EvalError> {
    Evaluator::new(variables, capabilities).evaluate(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Operator, Parser, UnaryOperator};
    use crate::capabilities::FunctionTable;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Helper function to register basic functions for testing
    fn setup_functions() -> FunctionTable {
        let mut functions = FunctionTable::new();

        functions.register_function("sqrt", |args| match args {
            [x] => Ok(x.sqrt()),
            _ => Err(CapabilityError::Arity {
                expected: "1".to_string(),
                got: args.len(),
            }),
        });

        functions.register_function("add", |args| match args {
            [a, b] => Ok(a + b),
            _ => Err(CapabilityError::Arity {
                expected: "2".to_string(),
                got: args.len(),
            }),
        });

        functions.register_function("sum", |args| Ok(args.iter().sum()));

        functions.register_function("constant", |_args| Ok(42.0));

        functions.register_function("reject", |_args| {
            Err(CapabilityError::InvalidArgument("always fails".to_string()))
        });

        functions
    }

    fn eval(input: &str, context: &Bindings) -> Result<f64, EvalError> {
        let ast = Parser::parse_expression(input)?;
        evaluate(&ast, context, &setup_functions())
    }

    #[test]
    fn test_simple_binary_expression() {
        let context = HashMap::from([("price".to_string(), 100.0), ("volume".to_string(), 50.0)]);

        assert_eq!(eval("price + volume", &context).unwrap(), 150.0);
        assert_eq!(eval("price - volume", &context).unwrap(), 50.0);
        assert_eq!(eval("price * volume", &context).unwrap(), 5000.0);
        assert_eq!(eval("price / volume", &context).unwrap(), 2.0);
    }

    #[test]
    fn test_precedence() {
        let context = HashMap::new();

        assert_eq!(eval("2+3*4", &context).unwrap(), 14.0);
        assert_eq!(eval("2^3^2", &context).unwrap(), 512.0);
        assert_eq!(eval("-2^2", &context).unwrap(), -4.0);
        assert_eq!(eval("(-2)^2", &context).unwrap(), 4.0);
        assert_eq!(eval("2^10", &context).unwrap(), 1024.0);
        assert_eq!(eval("2^-1", &context).unwrap(), 0.5);
        assert_eq!(eval("10 - 4 - 3", &context).unwrap(), 3.0);
        assert_eq!(eval("2 * 3 / 4", &context).unwrap(), 1.5);
        assert_eq!(eval("--3", &context).unwrap(), 3.0);
        assert_eq!(eval("+-3", &context).unwrap(), -3.0);
    }

    #[test]
    fn test_constants() {
        let context = HashMap::new();
        assert_eq!(eval("pi", &context).unwrap(), std::f64::consts::PI);
        assert_eq!(eval("e", &context).unwrap(), std::f64::consts::E);
    }

    #[test]
    fn test_binding_overrides_constant() {
        let context = HashMap::from([("pi".to_string(), 1.0)]);
        assert_eq!(eval("pi", &context).unwrap(), 1.0);
        assert_eq!(eval("e", &context).unwrap(), std::f64::consts::E);
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(
            eval("y", &HashMap::new()),
            Err(EvalError::UnknownIdentifier("y".to_string()))
        );
        assert_eq!(
            eval("x + 2", &HashMap::from([("y".to_string(), 1.0)])),
            Err(EvalError::UnknownIdentifier("x".to_string()))
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("foo(1)", &HashMap::new()),
            Err(EvalError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn test_function_name_is_not_a_variable() {
        // a binding does not make a name callable, and a function is not a value
        let context = HashMap::from([("foo".to_string(), 3.0)]);
        assert_eq!(
            eval("foo(1)", &context),
            Err(EvalError::UnknownFunction("foo".to_string()))
        );
        assert_eq!(
            eval("sqrt + 1", &HashMap::new()),
            Err(EvalError::UnknownIdentifier("sqrt".to_string()))
        );
    }

    #[test]
    fn test_argument_errors_surface_before_lookup() {
        assert_eq!(
            eval("foo(y)", &HashMap::new()),
            Err(EvalError::UnknownIdentifier("y".to_string()))
        );
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        let context = HashMap::new();
        assert_eq!(eval("1/0", &context).unwrap(), f64::INFINITY);
        assert_eq!(eval("-1/0", &context).unwrap(), f64::NEG_INFINITY);
        assert!(eval("0/0", &context).unwrap().is_nan());
    }

    #[test]
    fn test_power_domain_violation_is_nan() {
        assert!(eval("(-8)^(1/3)", &HashMap::new()).unwrap().is_nan());
    }

    #[test]
    fn test_function_dispatch() {
        let context = HashMap::new();
        assert_eq!(eval("sqrt(16)", &context).unwrap(), 4.0);
        assert!(eval("sqrt(-1)", &context).unwrap().is_nan());
        assert_eq!(eval("add(sqrt(16), 2 * 3)", &context).unwrap(), 10.0);
        assert_eq!(eval("sum()", &context).unwrap(), 0.0);
        assert_eq!(eval("sum(1, 2, 3, 4)", &context).unwrap(), 10.0);
        assert_eq!(eval("constant() * 2", &context).unwrap(), 84.0);
    }

    #[test]
    fn test_arity_mismatch_is_evaluation_error() {
        assert_eq!(
            eval("sqrt(3, 4)", &HashMap::new()),
            Err(EvalError::Evaluation {
                function: "sqrt".to_string(),
                source: CapabilityError::Arity {
                    expected: "1".to_string(),
                    got: 2
                }
            })
        );
    }

    #[test]
    fn test_function_failure_is_evaluation_error() {
        assert!(matches!(
            eval("1 + reject(2)", &HashMap::new()),
            Err(EvalError::Evaluation { function, .. }) if function == "reject"
        ));
    }

    #[test]
    fn test_arguments_evaluated_left_to_right() {
        let order = Arc::new(AtomicUsize::new(0));
        let mut functions = FunctionTable::new();

        for (name, slot) in [("first", 0usize), ("second", 1usize)] {
            let order = Arc::clone(&order);
            functions.register_function(name, move |_| {
                let seen = order.fetch_add(1, Ordering::SeqCst);
                Ok(if seen == slot { 1.0 } else { 0.0 })
            });
        }
        functions.register_function("both", |args| Ok(args.iter().product()));

        let ast = Parser::parse_expression("both(first(), second())").unwrap();
        assert_eq!(evaluate(&ast, &HashMap::new(), &functions).unwrap(), 1.0);
    }

    #[test]
    fn test_direct_ast_evaluation() {
        let ast = ASTNode::UnaryOperation {
            operator: UnaryOperator::Negate,
            operand: Box::new(ASTNode::BinaryOperation {
                left: Box::new(ASTNode::Variable("x".to_string())),
                operator: Operator::Power,
                right: Box::new(ASTNode::Number(2.0)),
            }),
        };
        let context = HashMap::from([("x".to_string(), 3.0)]);
        let functions = FunctionTable::new();

        let evaluator = Evaluator::new(&context, &functions);
        assert_eq!(evaluator.evaluate(&ast).unwrap(), -9.0);
    }

    #[test]
    fn test_long_sum_evaluates_in_order() {
        let terms = 100_000;
        let input = vec!["1"; terms].join("+") + "-x";
        let context = HashMap::from([("x".to_string(), 0.5)]);

        let result = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || eval(&input, &context))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(result, Ok(terms as f64 - 0.5));
    }

    #[test]
    fn test_repeated_evaluation_is_bit_identical() {
        let inputs = [
            "0.1 + 0.2",
            "sqrt(2) ^ pi / e",
            "1 / 3 * 3",
            "0/0",
            "2 ^ 0.5 ^ 0.5",
        ];

        for input in inputs {
            let first = eval(input, &HashMap::new()).unwrap();
            let second = eval(input, &HashMap::new()).unwrap();
            assert_eq!(first.to_bits(), second.to_bits(), "Input '{}'", input);
        }
    }

    #[test]
    fn test_grouped_expressions() {
        let context = HashMap::from([("price".to_string(), 20.0), ("volume".to_string(), 50.0)]);
        assert_eq!(
            eval("   (   price   +  10  )   *   (  volume  -  5  )   ", &context).unwrap(),
            1350.0
        );
    }

    #[test]
    fn test_large_expression() {
        let input = (0..50)
            .map(|i| format!("x{}", i))
            .collect::<Vec<_>>()
            .join(" + ");
        let context = HashMap::from_iter((0..50).map(|i| (format!("x{}", i), i as f64)));
        assert_eq!(eval(&input, &context).unwrap(), 1225.0);
    }
}
