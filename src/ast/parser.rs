use crate::ast::{ASTNode, Operator, UnaryOperator};
use crate::error::EvalError;
use lazy_static::lazy_static;
use log::{debug, trace};
use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use regex::Regex;

/// Nesting allowed when the caller does not pick a limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

lazy_static! {
    /// Anything outside digits, ASCII letters, the operators, parentheses,
    /// dot, comma and space.
    static ref DISALLOWED_CHAR: Regex = Regex::new(r"[^0-9A-Za-z+\-*/().,^ ]").unwrap();
}

#[derive(Parser)]
#[grammar = "./expression.pest"]
pub struct ExpressionParser;

impl ExpressionParser {
    pub fn parse_expression(input: &str) -> Result<ASTNode, EvalError> {
        Self::parse_with_limit(input, DEFAULT_MAX_DEPTH)
    }

    /// Parses `input`, rejecting anything that nests deeper than `max_depth`.
    pub fn parse_with_limit(input: &str, max_depth: usize) -> Result<ASTNode, EvalError> {
        debug!("Parsing expression: {}", input);

        validate_characters(input)?;
        if input.trim().is_empty() {
            return Err(EvalError::Syntax("empty expression".to_string()));
        }
        check_nesting(input, max_depth)?;

        let parse_result = ExpressionParser::parse(Rule::expression, input)
            .map_err(|err| syntax_error(err, max_depth))?
            .next()
            .ok_or_else(|| EvalError::Syntax("failed to parse expression".to_string()))?;

        trace!("Parse result: {:#?}", parse_result);
        Self::build_expression(parse_result)
    }

    fn build_expression(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        Self::build_additive(next_pair(&mut pairs, "an expression")?)
    }

    fn build_additive(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        let mut node = Self::build_multiplicative(next_pair(&mut pairs, "an operand")?)?;

        while let Some(operator_pair) = pairs.next() {
            let operator = match operator_pair.as_rule() {
                Rule::PLUS => Operator::Add,
                Rule::MINUS => Operator::Subtract,
                _ => return Err(unexpected(&operator_pair)),
            };

            let right = Self::build_multiplicative(next_pair(&mut pairs, "an operand")?)?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_multiplicative(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        trace!("Building term: {:?}", pair.as_str());
        let mut pairs = pair.into_inner();
        let mut node = Self::build_unary(next_pair(&mut pairs, "an operand")?)?;

        while let Some(operator_pair) = pairs.next() {
            let operator = match operator_pair.as_rule() {
                Rule::STAR => Operator::Multiply,
                Rule::SLASH => Operator::Divide,
                _ => return Err(unexpected(&operator_pair)),
            };

            let right = Self::build_unary(next_pair(&mut pairs, "an operand")?)?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_unary(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        let mut operators = Vec::new();
        let mut operand = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::NEG | Rule::POS => operators.push(
                    UnaryOperator::try_from(inner.as_str()).map_err(EvalError::Syntax)?,
                ),
                Rule::power => operand = Some(Self::build_power(inner)?),
                _ => return Err(unexpected(&inner)),
            }
        }

        let mut node =
            operand.ok_or_else(|| EvalError::Syntax("expected an operand".to_string()))?;

        // innermost sign is the one written closest to the operand
        for operator in operators.into_iter().rev() {
            node = ASTNode::UnaryOperation {
                operator,
                operand: Box::new(node),
            };
        }

        Ok(node)
    }

    fn build_power(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        let base = Self::build_primary(next_pair(&mut pairs, "an operand")?)?;

        let Some(operator_pair) = pairs.next() else {
            return Ok(base);
        };

        let operator: Operator = operator_pair
            .as_str()
            .try_into()
            .map_err(EvalError::Syntax)?;
        let exponent = Self::build_unary(next_pair(&mut pairs, "an exponent")?)?;

        Ok(ASTNode::BinaryOperation {
            left: Box::new(base),
            operator,
            right: Box::new(exponent),
        })
    }

    fn build_primary(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        trace!("Building primary expression: {:?}", pair.as_str());
        match pair.as_rule() {
            Rule::number => {
                let value = pair.as_str().parse::<f64>().map_err(|e| {
                    EvalError::Syntax(format!("invalid number '{}': {}", pair.as_str(), e))
                })?;
                Ok(ASTNode::Number(value))
            }
            Rule::identifier => Ok(ASTNode::Variable(pair.as_str().to_string())),
            Rule::group => {
                let mut inner = pair.into_inner();
                Self::build_additive(next_pair(&mut inner, "an expression")?)
            }
            Rule::function_call => Self::build_function_call(pair),
            _ => Err(unexpected(&pair)),
        }
    }

    fn build_function_call(pair: Pair<Rule>) -> Result<ASTNode, EvalError> {
        let mut inner = pair.into_inner();
        let name = next_pair(&mut inner, "a function name")?
            .as_str()
            .to_string();

        let args = match inner.next() {
            Some(arguments) => arguments
                .into_inner()
                .map(Self::build_additive)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        debug!("Function call: {}({} args)", name, args.len());
        Ok(ASTNode::FunctionCall { name, args })
    }
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, expected: &str) -> Result<Pair<'i, Rule>, EvalError> {
    pairs
        .next()
        .ok_or_else(|| EvalError::Syntax(format!("expected {}", expected)))
}

fn unexpected(pair: &Pair<Rule>) -> EvalError {
    EvalError::Syntax(format!(
        "unexpected {:?} '{}'",
        pair.as_rule(),
        pair.as_str()
    ))
}

/// Pest's own recursion guards report as the nesting error.
fn syntax_error(error: pest::error::Error<Rule>, max_depth: usize) -> EvalError {
    if let ErrorVariant::CustomError { message } = &error.variant {
        if message == "stack limit reached" || message == "call limit reached" {
            return EvalError::NestingTooDeep { limit: max_depth };
        }
    }

    let column = match error.line_col {
        LineColLocation::Pos((_, column)) => column,
        LineColLocation::Span((_, column), _) => column,
    };
    EvalError::Syntax(format!("{} at column {}", error.variant.message(), column))
}

/// Rejects characters outside the calculator alphabet before any grammar work.
fn validate_characters(input: &str) -> Result<(), EvalError> {
    match DISALLOWED_CHAR.find(input) {
        Some(found) => Err(EvalError::InvalidCharacter {
            character: found.as_str().chars().next().unwrap_or_default(),
            position: found.start(),
        }),
        None => Ok(()),
    }
}

/// Bounds the recursion the grammar and the evaluator would need.
///
/// Parentheses, prefix signs (`---x`) and powers (`2^2^2`, which associate to
/// the right) each open one more level below the operand they belong to. The
/// levels add up along the path from the root to the deepest operand, and
/// that total is held to `max_depth`. A binary operator or a comma starts a
/// sibling operand back at the level of the enclosing group; `)` returns to
/// the level the group was opened at.
fn check_nesting(input: &str, max_depth: usize) -> Result<(), EvalError> {
    let too_deep = || EvalError::NestingTooDeep { limit: max_depth };

    let mut level = 0usize;
    let mut base = 0usize;
    // (level, base) outside each open parenthesis
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut after_operand = false;
    let mut chars = input.char_indices().filter(|(_, c)| *c != ' ').peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '(' => {
                groups.push((level, base));
                level += 1;
                base = level;
            }
            ')' => {
                (level, base) = groups.pop().ok_or_else(|| {
                    EvalError::Syntax(format!("unbalanced ')' at position {}", position))
                })?;
            }
            '+' | '-' if after_operand => level = base,
            '+' | '-' | '^' => level += 1,
            '*' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                level += 1;
            }
            '*' | '/' | ',' => level = base,
            _ => {}
        }

        if level > max_depth {
            return Err(too_deep());
        }
        after_operand = c.is_ascii_alphanumeric() || c == '.' || c == ')';
    }

    if !groups.is_empty() {
        return Err(EvalError::Syntax(
            "unbalanced parentheses: missing ')'".to_string(),
        ));
    }

    Ok(())
}
