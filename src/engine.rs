use crate::angle::AngleMode;
use crate::ast::{self, ASTNode, Bindings, Parser};
use crate::capabilities::{CapabilityTable, FunctionTable};
use crate::config::EngineConfig;
use crate::error::{CapabilityError, EvalError};
use crate::functions::standard_table;
use log::debug;

/// The calculator's capability provider: the standard function table plus
/// the angle mode the trig functions read.
///
/// The engine is handed to the evaluator as a `&dyn CapabilityTable` for the
/// duration of one call. Changing the angle mode between calls changes what
/// `sin(90)` means; nothing inside an evaluation can change it.
#[derive(Debug, Clone)]
pub struct MathEngine {
    angle_mode: AngleMode,
    max_depth: usize,
    functions: FunctionTable,
}

impl Default for MathEngine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl MathEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_functions(config, standard_table())
    }

    /// An engine restricted to `functions` instead of the standard set.
    pub fn with_functions(config: EngineConfig, functions: FunctionTable) -> Self {
        Self {
            angle_mode: config.angle_mode,
            max_depth: config.max_depth,
            functions,
        }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    pub fn set_angle_mode(&mut self, angle_mode: AngleMode) {
        debug!("Angle mode set to {}", angle_mode);
        self.angle_mode = angle_mode;
    }

    /// Flips between radians and degrees and returns the new mode.
    pub fn toggle_angle_mode(&mut self) -> AngleMode {
        self.set_angle_mode(self.angle_mode.toggled());
        self.angle_mode
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Replacing a function with `register_function` also drops its angle
    /// conversion; use `register_angle_function` to keep it.
    pub fn functions_mut(&mut self) -> &mut FunctionTable {
        &mut self.functions
    }

    /// Names an expression may call.
    pub fn allowed_names(&self) -> Vec<&str> {
        self.functions.names()
    }

    pub fn parse(&self, expression: &str) -> Result<ASTNode, EvalError> {
        Parser::parse_with_limit(expression, self.max_depth)
    }

    /// Parses and evaluates `expression` with the given variable bindings.
    pub fn evaluate(&self, expression: &str, variables: &Bindings) -> Result<f64, EvalError> {
        let ast = self.parse(expression)?;
        let result = self.evaluate_ast(&ast, variables);
        debug!("Evaluated '{}' -> {:?}", expression, result);
        result
    }

    /// Evaluates an already parsed expression.
    pub fn evaluate_ast(&self, ast: &ASTNode, variables: &Bindings) -> Result<f64, EvalError> {
        ast::evaluate(ast, variables, self)
    }
}

impl CapabilityTable for MathEngine {
    fn call(&self, name: &str, args: &[f64]) -> Result<f64, CapabilityError> {
        if self.angle_mode == AngleMode::Degrees && self.functions.takes_angle(name) {
            let converted: Vec<f64> = args
                .iter()
                .map(|angle| self.angle_mode.to_radians(*angle))
                .collect();
            return self.functions.call(name, &converted);
        }

        self.functions.call(name, args)
    }

    fn contains(&self, name: &str) -> bool {
        self.functions.contains(name)
    }
}
