//! Trigonometry in radians. `sin`, `cos` and `tan` are registered as angle
//! functions, so the engine converts their argument before calling in here.

use crate::capabilities::FunctionTable;
use crate::error::CapabilityError;
use scicalc_macros::capability;

pub fn register(table: &mut FunctionTable) {
    table.register_angle_function("sin", sin);
    table.register_angle_function("cos", cos);
    table.register_angle_function("tan", tan);
    table.register_function("asin", asin);
    table.register_function("acos", acos);
    table.register_function("atan", atan);
}

#[capability]
pub fn sin(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.sin())
}

#[capability]
pub fn cos(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.cos())
}

#[capability]
pub fn tan(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.tan())
}

/// NaN outside [-1, 1].
#[capability]
pub fn asin(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.asin())
}

/// NaN outside [-1, 1].
#[capability]
pub fn acos(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.acos())
}

#[capability]
pub fn atan(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.atan())
}
