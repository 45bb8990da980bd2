#![no_main]

use libfuzzer_sys::fuzz_target;
use tally::TallyError;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expression) = tally::compile(s) {
            // Added spaces can push the canonical form past the source size limit
            match tally::compile(&expression.to_string()) {
                Ok(again) => {
                    assert_eq!(again.result_type(), expression.result_type());
                    assert_eq!(again.variables(), expression.variables());
                }
                Err(TallyError::ResourceLimitExceeded { .. }) => {}
                Err(err) => panic!("canonical form of {:?} does not compile: {}", s, err),
            }
        }
    }
});
