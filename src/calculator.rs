//! Headless calculator session: the state a keypad front end drives.

use crate::angle::AngleMode;
use crate::ast::Bindings;
use crate::engine::MathEngine;
use crate::error::EvalError;
use crate::graph::{self, Domain, GraphError, Series, DEFAULT_STEPS, VARIABLE};
use crate::memory::Memory;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

pub const GRAPH_HINT: &str = "Use GRAPH for x";
pub const GRAPH_NEEDS_X: &str = "Graph needs x";

lazy_static! {
    static ref TRAILING_NUMBER: Regex = Regex::new(r"(\d+\.?\d*)$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: f64,
}

#[derive(Debug, Clone)]
pub struct Calculator {
    engine: MathEngine,
    memory: Memory,
    display: String,
    status: String,
    history: Vec<HistoryEntry>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(MathEngine::default())
    }
}

impl Calculator {
    pub fn new(engine: MathEngine) -> Self {
        let status = engine.angle_mode().label().to_string();
        Self {
            engine,
            memory: Memory::new(),
            display: String::new(),
            status,
            history: Vec::new(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn set_display(&mut self, text: &str) {
        self.display = text.to_string();
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn engine(&self) -> &MathEngine {
        &self.engine
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.engine.angle_mode()
    }

    /// Appends key text to the display.
    pub fn insert(&mut self, text: &str) {
        self.display.push_str(text);
    }

    pub fn clear(&mut self) {
        self.display.clear();
        self.show_angle_mode();
    }

    pub fn backspace(&mut self) {
        self.display.pop();
    }

    /// Rewrites the trailing number `n` of the display as `(-n)`.
    pub fn toggle_sign(&mut self) {
        let Some(found) = TRAILING_NUMBER.find(&self.display) else {
            return;
        };
        let negated = format!("(-{})", found.as_str());
        self.display.replace_range(found.start().., &negated);
    }

    pub fn toggle_angle(&mut self) -> AngleMode {
        let mode = self.engine.toggle_angle_mode();
        self.show_angle_mode();
        mode
    }

    /// Evaluates the display. On success the result replaces the display and
    /// is recorded in the history; on failure only the status line changes.
    pub fn evaluate(&mut self) -> Result<f64, EvalError> {
        let expression = self.display.clone();
        match self.engine.evaluate(&expression, &Bindings::new()) {
            Ok(result) => {
                self.display = format_result(result);
                self.history.push(HistoryEntry { expression, result });
                Ok(result)
            }
            Err(err) => {
                debug!("'{}' failed: {}", expression, err);
                self.status = match &err {
                    EvalError::UnknownIdentifier(name) if name == VARIABLE => GRAPH_HINT.to_string(),
                    other => other.to_string(),
                };
                Err(err)
            }
        }
    }

    /// M+; a display that is not a plain number is ignored.
    pub fn mem_add(&mut self) {
        if let Some(value) = self.display_value() {
            self.memory.add(value);
        }
    }

    /// M-; a display that is not a plain number is ignored.
    pub fn mem_subtract(&mut self) {
        if let Some(value) = self.display_value() {
            self.memory.subtract(value);
        }
    }

    pub fn mem_recall(&mut self) {
        self.display = format_result(self.memory.recall());
    }

    pub fn mem_clear(&mut self) {
        self.memory.clear();
    }

    /// Samples the display as a function of `x` over `domain`.
    pub fn graph(&mut self, domain: Domain) -> Option<Series> {
        match graph::sample(&self.engine, self.display.trim(), domain, DEFAULT_STEPS) {
            Ok(series) => Some(series),
            Err(GraphError::MissingVariable(_)) => {
                self.status = GRAPH_NEEDS_X.to_string();
                None
            }
            Err(err) => {
                self.status = err.to_string();
                None
            }
        }
    }

    fn show_angle_mode(&mut self) {
        self.status = self.engine.angle_mode().label().to_string();
    }

    fn display_value(&self) -> Option<f64> {
        self.display.trim().parse().ok()
    }
}

fn format_result(value: f64) -> String {
    value.to_string()
}
