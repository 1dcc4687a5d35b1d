use scicalc_rs::{AngleMode, EngineConfig, MathEngine};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let engine = MathEngine::with_config(EngineConfig::default().with_angle_mode(AngleMode::Degrees));
    let context = HashMap::from([("r".to_string(), 2.0)]);

    let expressions = [
        "pi * r ^ 2",
        "sin(30) + cos(60)",
        "log(1024, 2)",
        "round(e, 3)",
        "sqrt(-1)",
        "2 * y",
        "open('x')",
    ];

    for expression in expressions {
        match engine.evaluate(expression, &context) {
            Ok(result) => println!("{} = {}", expression, result),
            Err(err) => println!("{} -> error: {}", expression, err),
        }
    }
}
