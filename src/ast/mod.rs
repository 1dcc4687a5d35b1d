use std::collections::HashMap;
use std::f64::consts;

mod evaluator;
mod parser;

pub use evaluator::{evaluate, Evaluator};
pub use parser::ExpressionParser as Parser;
pub use parser::DEFAULT_MAX_DEPTH;

/// Per-call variable bindings.
pub type Bindings = HashMap<String, f64>;

/// Names resolved when a variable is not bound by the caller.
pub const CONSTANTS: [(&str, f64); 2] = [("pi", consts::PI), ("e", consts::E)];

/// Looks up one of the fixed constants.
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Variable(String),
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    UnaryOperation {
        operator: UnaryOperator,
        operand: Box<ASTNode>,
    },
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
}

impl ASTNode {
    /// Returns true if `name` appears as a variable anywhere in the tree.
    pub fn references(&self, name: &str) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                ASTNode::Number(_) => {}
                ASTNode::Variable(variable) => {
                    if variable == name {
                        return true;
                    }
                }
                ASTNode::BinaryOperation { left, right, .. } => {
                    pending.push(right);
                    pending.push(left);
                }
                ASTNode::UnaryOperation { operand, .. } => pending.push(operand),
                ASTNode::FunctionCall { args, .. } => pending.extend(args.iter().rev()),
            }
        }
        false
    }

    fn take_children(&mut self, into: &mut Vec<ASTNode>) {
        let placeholder = || ASTNode::Number(0.0);
        match self {
            ASTNode::Number(_) | ASTNode::Variable(_) => {}
            ASTNode::BinaryOperation { left, right, .. } => {
                into.push(std::mem::replace(left.as_mut(), placeholder()));
                into.push(std::mem::replace(right.as_mut(), placeholder()));
            }
            ASTNode::UnaryOperation { operand, .. } => {
                into.push(std::mem::replace(operand.as_mut(), placeholder()));
            }
            ASTNode::FunctionCall { args, .. } => into.append(args),
        }
    }
}

// Long `a + b + c + ...` chains are as deep as they are long, so the tree is
// taken apart with a work list instead of recursive drops.
impl Drop for ASTNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// Plain IEEE-754 semantics: `1/0` is infinity and `(-8)^(1/3)` is NaN.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" | "**" => Ok(Operator::Power),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Identity,
}

impl UnaryOperator {
    pub fn apply(&self, operand: f64) -> f64 {
        match self {
            UnaryOperator::Negate => -operand,
            UnaryOperator::Identity => operand,
        }
    }
}

impl TryFrom<&str> for UnaryOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "-" => Ok(UnaryOperator::Negate),
            "+" => Ok(UnaryOperator::Identity),
            _ => Err(format!("Unknown unary operator: {}", value)),
        }
    }
}
