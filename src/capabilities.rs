use crate::error::CapabilityError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub type Function = Arc<dyn Fn(&[f64]) -> Result<f64, CapabilityError> + Send + Sync>;

/// The allow-list an expression may call into.
///
/// The evaluator never invokes anything that does not come through `call`.
/// Implementations return [`CapabilityError::NotFound`] for names they do not
/// provide; any other error is treated as a failure of the function itself.
pub trait CapabilityTable {
    fn call(&self, name: &str, args: &[f64]) -> Result<f64, CapabilityError>;

    fn contains(&self, name: &str) -> bool;
}

/// Registry of named numeric functions.
///
/// Functions registered with [`register_angle_function`](Self::register_angle_function)
/// take an angle; the engine converts their arguments in degree mode.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Function>,
    angle_inputs: HashSet<String>,
}

impl FunctionTable {
    /// An empty table: every call fails with `NotFound`.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            angle_inputs: HashSet::new(),
        }
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, CapabilityError> + Send + Sync + 'static,
    {
        self.angle_inputs.remove(name);
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    /// Registers a function whose arguments are angles in the caller's angle mode.
    pub fn register_angle_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, CapabilityError> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
        self.angle_inputs.insert(name.to_string());
    }

    pub fn unregister_function(&mut self, name: &str) -> bool {
        self.angle_inputs.remove(name);
        self.functions.remove(name).is_some()
    }

    pub fn takes_angle(&self, name: &str) -> bool {
        self.angle_inputs.contains(name)
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl CapabilityTable for FunctionTable {
    fn call(&self, name: &str, args: &[f64]) -> Result<f64, CapabilityError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| CapabilityError::NotFound(name.to_string()))?;
        function(args)
    }

    fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTable")
            .field("functions", &self.names())
            .finish()
    }
}
