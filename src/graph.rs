//! Sampling an expression in `x` over a domain, the data side of the graph
//! panel. Points where evaluation fails become NaN so a plot shows a gap there
//! instead of losing the whole curve.

use crate::ast::Bindings;
use crate::engine::MathEngine;
use crate::error::EvalError;
use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

/// Samples taken when the caller does not ask for a count.
pub const DEFAULT_STEPS: usize = 400;

/// The free variable of a plotted expression.
pub const VARIABLE: &str = "x";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("expression does not use the variable '{0}'")]
    MissingVariable(String),

    #[error(transparent)]
    Parse(#[from] EvalError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub x_min: f64,
    pub x_max: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
        }
    }
}

impl Domain {
    pub fn new(x_min: f64, x_max: f64) -> Self {
        Self { x_min, x_max }
    }

    /// Reads the two bound fields; anything unparsable gives the default domain.
    pub fn from_inputs(x_min: &str, x_max: &str) -> Self {
        match (x_min.trim().parse::<f64>(), x_max.trim().parse::<f64>()) {
            (Ok(x_min), Ok(x_max)) => Self::new(x_min, x_max),
            _ => {
                warn!(
                    "Invalid graph domain [{}, {}], using the default",
                    x_min, x_max
                );
                Self::default()
            }
        }
    }
}

/// `steps` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps)
                .map(|i| {
                    if i == steps - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// A sampled curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub expression: String,
    pub points: Vec<(f64, f64)>,
    /// Points whose evaluation failed (and were stored as NaN).
    pub failures: usize,
}

impl Series {
    /// Points that can be drawn.
    pub fn defined(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().filter(|(_, y)| y.is_finite())
    }

    /// Number of points that cannot be drawn.
    pub fn gaps(&self) -> usize {
        self.points.len() - self.defined().count()
    }

    /// Smallest and largest finite y, if any.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.defined().fold(None, |range, (_, y)| match range {
            None => Some((y, y)),
            Some((low, high)) => Some((low.min(y), high.max(y))),
        })
    }
}

/// Evaluates `expression` at `steps` points of `domain`.
///
/// The expression is parsed once; a parse failure or an expression without
/// `x` is reported as an error. Failures at individual points are not.
pub fn sample(
    engine: &MathEngine,
    expression: &str,
    domain: Domain,
    steps: usize,
) -> Result<Series, GraphError> {
    let ast = engine.parse(expression)?;
    if !ast.references(VARIABLE) {
        return Err(GraphError::MissingVariable(VARIABLE.to_string()));
    }

    let xs = linspace(domain.x_min, domain.x_max, steps);
    let samples: Vec<(f64, Result<f64, EvalError>)> = xs
        .into_par_iter()
        .map(|x| {
            let bindings = Bindings::from([(VARIABLE.to_string(), x)]);
            (x, engine.evaluate_ast(&ast, &bindings))
        })
        .collect();

    let failures = samples.iter().filter(|(_, y)| y.is_err()).count();
    if let Some((x, Err(err))) = samples.iter().find(|(_, y)| y.is_err()) {
        warn!(
            "'{}' undefined at {} of {} points (first at x = {}: {})",
            expression,
            failures,
            samples.len(),
            x,
            err
        );
    }

    let points = samples
        .into_iter()
        .map(|(x, y)| (x, y.unwrap_or(f64::NAN)))
        .collect();

    debug!("Sampled '{}' at {} points", expression, steps);
    Ok(Series {
        expression: expression.to_string(),
        points,
        failures,
    })
}
