use crate::capabilities::FunctionTable;
use crate::error::CapabilityError;
use scicalc_macros::capability;

pub fn register(table: &mut FunctionTable) {
    table.register_function("sqrt", sqrt);
    table.register_function("log", log);
    table.register_function("log10", log10);
    table.register_function("pow", pow);
    table.register_function("abs", abs);
    table.register_function("round", round);
}

#[capability]
pub fn sqrt(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.sqrt())
}

#[capability]
pub fn log10(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.log10())
}

#[capability]
pub fn pow(base: f64, exponent: f64) -> Result<f64, CapabilityError> {
    Ok(base.powf(exponent))
}

#[capability]
pub fn abs(x: f64) -> Result<f64, CapabilityError> {
    Ok(x.abs())
}

/// `log(x)` is the natural logarithm, `log(x, base)` the logarithm in `base`.
pub fn log(args: &[f64]) -> Result<f64, CapabilityError> {
    match *args {
        [x] => Ok(x.ln()),
        [x, base] => Ok(x.ln() / base.ln()),
        _ => Err(CapabilityError::Arity {
            expected: "1 or 2".to_string(),
            got: args.len(),
        }),
    }
}

/// Rounds half to even, either to an integer or to `digits` decimal places.
pub fn round(args: &[f64]) -> Result<f64, CapabilityError> {
    match *args {
        [x] => Ok(x.round_ties_even()),
        [x, digits] => {
            if digits.fract() != 0.0 || !digits.is_finite() {
                return Err(CapabilityError::InvalidArgument(format!(
                    "number of digits must be an integer, got {}",
                    digits
                )));
            }
            if !x.is_finite() {
                return Ok(x);
            }

            let scale = 10f64.powi(digits.abs().min(400.0) as i32);
            if !scale.is_finite() {
                // more digits than an f64 carries, or every digit rounded away
                return Ok(if digits > 0.0 { x } else { 0.0 });
            }

            if digits >= 0.0 {
                let scaled = x * scale;
                if !scaled.is_finite() {
                    return Ok(x);
                }
                Ok(scaled.round_ties_even() / scale)
            } else {
                Ok((x / scale).round_ties_even() * scale)
            }
        }
        _ => Err(CapabilityError::Arity {
            expected: "1 or 2".to_string(),
            got: args.len(),
        }),
    }
}
