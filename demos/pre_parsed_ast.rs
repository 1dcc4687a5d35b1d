use scicalc_rs::graph::linspace;
use scicalc_rs::MathEngine;
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let engine = MathEngine::new();

    let expression = "x ^ 3 - 2 * x + 1";
    let ast = engine.parse(expression).expect("Failed to parse");

    for x in linspace(-2.0, 2.0, 9) {
        let context = HashMap::from([("x".to_string(), x)]);
        match engine.evaluate_ast(&ast, &context) {
            Ok(result) => println!("f({:>5}) = {}", x, result),
            Err(err) => println!("f({:>5}) -> error: {}", x, err),
        }
    }
}
