//! Line driven calculator. Each input line is either a key command or text
//! appended to the display:
//!
//! `=` evaluate, `c` clear, `<` backspace, `+-` toggle sign, `deg` toggle
//! angle mode, `m+` `m-` `mr` `mc` memory keys, `graph [min max]` sample the
//! display over x, `history`, `quit`.

use scicalc_rs::graph::Domain;
use scicalc_rs::Calculator;
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    pretty_env_logger::init();

    let mut calculator = Calculator::default();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "[{}] {} > ", calculator.status(), calculator.display())?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "quit" => break,
            "=" => {
                let _ = calculator.evaluate();
            }
            "c" => calculator.clear(),
            "<" => calculator.backspace(),
            "+-" => calculator.toggle_sign(),
            "deg" => {
                calculator.toggle_angle();
            }
            "m+" => calculator.mem_add(),
            "m-" => calculator.mem_subtract(),
            "mr" => calculator.mem_recall(),
            "mc" => calculator.mem_clear(),
            "history" => {
                for entry in calculator.history() {
                    writeln!(stdout, "  {} = {}", entry.expression, entry.result)?;
                }
            }
            _ if line.starts_with("graph") => {
                let bounds: Vec<&str> = line.split_whitespace().skip(1).collect();
                let domain = match bounds.as_slice() {
                    [min, max] => Domain::from_inputs(min, max),
                    _ => Domain::default(),
                };
                if let Some(series) = calculator.graph(domain) {
                    writeln!(
                        stdout,
                        "  {} points, {} gaps, y range {:?}",
                        series.points.len(),
                        series.gaps(),
                        series.y_range()
                    )?;
                }
            }
            text => calculator.insert(text),
        }
    }

    Ok(())
}
