#![no_main]

use libfuzzer_sys::fuzz_target;
use tally::{Bindings, Decimal};

fuzz_target!(|input: (&str, i64, i64)| {
    let (source, x, y) = input;
    if let Ok(expression) = tally::compile(source) {
        let bindings = Bindings::new()
            .with("x", x)
            .with("y", Decimal::new(y.into(), 3));
        let first = expression.evaluate(&bindings);
        let second = expression.evaluate(&bindings);
        assert_eq!(first.is_ok(), second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            assert_eq!(a, b);
        }
    }
});
