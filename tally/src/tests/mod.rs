



mod error;

use crate::{compile, Bindings, Decimal};
use std::str::FromStr;

fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

fn eval(source: &str) -> Decimal {
    compile(source).unwrap().evaluate(&Bindings::new()).unwrap()
}
