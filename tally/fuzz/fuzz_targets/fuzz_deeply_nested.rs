#![no_main]

use libfuzzer_sys::fuzz_target;
use tally::Bindings;

fuzz_target!(|depth: u8| {
    let depth = (depth as usize % 120) + 1;

    let mut expr = String::from("x");
    for i in 0..depth {
        expr = match i % 3 {
            0 => format!("({} + 1)", expr),
            1 => format!("-{}", expr),
            _ => format!("x > 0 ? {} : 0", expr),
        };
    }

    if let Ok(expression) = tally::compile(&expr) {
        let _ = expression.evaluate(&Bindings::new().with("x", 1));
    }
});
