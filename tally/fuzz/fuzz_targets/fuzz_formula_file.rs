#![no_main]

use libfuzzer_sys::fuzz_target;
use tally::{Bindings, Engine};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut engine = Engine::new();

        if engine.add_formulas(s, "fuzz_input").is_ok() {
            let bindings = Bindings::new().with("x", 100).with("y", 50);
            let _ = engine.evaluate_all(&bindings);
        }
    }
});
