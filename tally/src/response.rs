use crate::types::Type;
use crate::{Decimal, TallyResult};

/// Result of evaluating a single named formula
///
/// A failed evaluation is kept as the `value` of its formula, so one bad
/// formula does not hide the results of the others.
#[derive(Debug, Clone)]
pub struct FormulaResult {
    pub name: String,
    /// The formula's expression as written
    pub source: String,
    pub result_type: Type,
    pub value: TallyResult<Decimal>,
}

impl FormulaResult {
    pub fn is_ok(&self) -> bool {
        self.value.is_ok()
    }

    /// The value read as a truth value, for boolean formulas
    pub fn as_bool(&self) -> Option<bool> {
        match (&self.value, self.result_type) {
            (Ok(value), Type::Boolean) => Some(crate::operators::is_true(value)),
            _ => None,
        }
    }
}
