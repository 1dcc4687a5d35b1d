use crate::angle::AngleMode;
use crate::ast::DEFAULT_MAX_DEPTH;

/// Settings a [`MathEngine`](crate::engine::MathEngine) is built with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Angle mode the engine starts in.
    pub angle_mode: AngleMode,
    /// Deepest nesting the parser accepts (parentheses, sign runs, power chains).
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Radians,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn with_angle_mode(mut self, angle_mode: AngleMode) -> Self {
        self.angle_mode = angle_mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
