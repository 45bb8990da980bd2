use crate::ast::Node;
use crate::evaluator::{Evaluator, VariableBindings};
use crate::operators::is_true;
use crate::types::Type;
use crate::{Decimal, TallyError, TallyResult};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A compiled, type-checked expression
///
/// Immutable once built. Evaluate it as often as needed, against different
/// bindings, from any number of threads.
#[derive(Debug, Clone)]
pub struct Expression {
    root: Node,
    source: Arc<str>,
}

impl Expression {
    pub(crate) fn new(root: Node, source: Arc<str>) -> Self {
        Self { root, source }
    }

    /// Evaluate against `bindings`.
    ///
    /// Every operand is evaluated, including the branch of a conditional
    /// that is not selected, so an error anywhere in the tree is reported.
    pub fn evaluate<B>(&self, bindings: &B) -> TallyResult<Decimal>
    where
        B: VariableBindings + ?Sized,
    {
        Evaluator.evaluate(self, bindings)
    }

    /// Evaluate and read the result as a truth value (non-zero is true)
    pub fn evaluate_bool<B>(&self, bindings: &B) -> TallyResult<bool>
    where
        B: VariableBindings + ?Sized,
    {
        self.evaluate(bindings).map(|value| is_true(&value))
    }

    pub fn result_type(&self) -> Type {
        self.root.ty
    }

    /// Distinct variable names, in order of first occurrence
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.root.for_each_variable(&mut |name| {
            if !names.contains(&name) {
                names.push(name);
            }
        });
        names
    }

    /// The text this expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn source_text(&self) -> &Arc<str> {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

/// Canonical, fully parenthesized form. Compiling it again yields an
/// expression that evaluates identically.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl FromStr for Expression {
    type Err = TallyError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        crate::compile(source)
    }
}
