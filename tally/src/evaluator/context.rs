//! Variable bindings and per-call evaluation state
//!
//! Bindings are owned by the caller and only read during a single
//! evaluation call.

use crate::ast::Span;
use crate::{Decimal, TallyError, TallyResult};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

/// A read-only lookup from variable name to value
pub trait VariableBindings {
    fn value(&self, name: &str) -> Option<&Decimal>;
}

impl VariableBindings for HashMap<String, Decimal> {
    fn value(&self, name: &str) -> Option<&Decimal> {
        self.get(name)
    }
}

impl VariableBindings for BTreeMap<String, Decimal> {
    fn value(&self, name: &str) -> Option<&Decimal> {
        self.get(name)
    }
}

impl<T: VariableBindings + ?Sized> VariableBindings for &T {
    fn value(&self, name: &str) -> Option<&Decimal> {
        (**self).value(name)
    }
}

/// An owned set of variable values
///
/// ```
/// use tally::{compile, Bindings, Decimal};
///
/// let bindings = Bindings::new().with("level", 3).with("base", 10);
/// let damage = compile("base * level").unwrap();
/// assert_eq!(damage.evaluate(&bindings).unwrap(), Decimal::from(30));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, Decimal>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Bindings::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Decimal>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Decimal>) -> Option<Decimal> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Decimal> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decimal)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Parse `name=value` assignments, as written on a command line
    pub fn from_assignments<I, S>(assignments: I) -> TallyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bindings = Self::new();
        for assignment in assignments {
            let (name, value) = parse_assignment(assignment.as_ref())?;
            bindings.insert(name, value);
        }
        Ok(bindings)
    }
}

impl VariableBindings for Bindings {
    fn value(&self, name: &str) -> Option<&Decimal> {
        self.values.get(name)
    }
}

impl<K: Into<String>, V: Into<Decimal>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

/// Parse a single `name=value` assignment
pub fn parse_assignment(assignment: &str) -> TallyResult<(String, Decimal)> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        TallyError::Engine(format!(
            "Invalid assignment '{}': expected name=value",
            assignment
        ))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(TallyError::Engine(format!(
            "Invalid assignment '{}': missing variable name",
            assignment
        )));
    }

    let value = Decimal::from_str(value.trim()).map_err(|_| {
        TallyError::Engine(format!(
            "Invalid assignment '{}': '{}' is not a decimal number",
            assignment,
            value.trim()
        ))
    })?;

    Ok((name.to_string(), value))
}

/// State for one evaluation call
pub struct EvaluationContext<'a, B: VariableBindings + ?Sized> {
    /// Caller-supplied variable values
    pub bindings: &'a B,

    /// Source of the expression being evaluated, for error reporting
    pub source: &'a Arc<str>,
}

impl<'a, B: VariableBindings + ?Sized> EvaluationContext<'a, B> {
    pub fn new(bindings: &'a B, source: &'a Arc<str>) -> Self {
        Self { bindings, source }
    }

    pub fn lookup(&self, name: &str, span: &Span) -> TallyResult<Decimal> {
        self.bindings
            .value(name)
            .cloned()
            .ok_or_else(|| TallyError::undefined_variable(name, span.clone(), self.source.clone()))
    }
}
