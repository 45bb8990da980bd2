use crate::evaluator::{Evaluator, VariableBindings};
use crate::lexer::{tokenize, TokenKind};
use crate::{
    compile_with_limits, Decimal, Expression, FormulaResult, ResourceLimits, TallyError,
    TallyResult,
};
use std::collections::HashMap;
use tracing::debug;

/// A compiled formula held by the [`Engine`]
#[derive(Debug, Clone)]
pub struct Formula {
    pub name: String,
    pub expression: Expression,
    /// Where the formula was loaded from, with its line when it came from a
    /// formula file
    pub origin: Option<String>,
}

/// A registry of named formulas.
///
/// Formulas are compiled once when added and evaluated on demand against
/// caller-supplied bindings.
pub struct Engine {
    formulas: HashMap<String, Formula>,
    order: Vec<String>,
    evaluator: Evaluator,
    limits: ResourceLimits,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            formulas: HashMap::new(),
            order: Vec::new(),
            evaluator: Evaluator,
            limits: ResourceLimits::default(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Compile `source` and register it as `name`
    pub fn add_formula(&mut self, name: &str, source: &str) -> TallyResult<()> {
        let formula = self.compile_formula(name, source, None)?;
        self.ensure_unused(name)?;
        self.insert(formula);
        Ok(())
    }

    /// Load formulas from text, one `name = expression` per line.
    ///
    /// Blank lines are skipped. A `#` at the start of a line or after
    /// whitespace starts a comment. Either every formula
    /// in the text is added or, on the first error, none is. Returns the
    /// names added, in file order.
    pub fn add_formulas(&mut self, text: &str, source_id: &str) -> TallyResult<Vec<String>> {
        let mut loaded: Vec<Formula> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let content = strip_comment(line).trim();
            if content.is_empty() {
                continue;
            }

            let (name, source) = content.split_once('=').ok_or_else(|| {
                TallyError::Engine(format!(
                    "{}:{}: expected 'name = expression', found '{}'",
                    source_id, line_number, content
                ))
            })?;
            let name = name.trim();

            let origin = format!("{}:{}", source_id, line_number);
            let formula = self.compile_formula(name, source.trim(), Some(origin))?;

            self.ensure_unused(name)?;
            if loaded.iter().any(|f| f.name == name) {
                return Err(TallyError::Engine(format!(
                    "{}:{}: formula '{}' is defined more than once",
                    source_id, line_number, name
                )));
            }
            loaded.push(formula);
        }

        debug!(source = source_id, formulas = loaded.len(), "loaded formulas");

        let names = loaded.iter().map(|f| f.name.clone()).collect();
        for formula in loaded {
            self.insert(formula);
        }
        Ok(names)
    }

    pub fn remove_formula(&mut self, name: &str) -> Option<Formula> {
        let removed = self.formulas.remove(name)?;
        self.order.retain(|n| n != name);
        Some(removed)
    }

    /// Formula names in the order they were added
    pub fn list_formulas(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn get_formula(&self, name: &str) -> Option<&Formula> {
        self.formulas.get(name)
    }

    /// Evaluate one formula
    pub fn evaluate<B>(&self, name: &str, bindings: &B) -> TallyResult<Decimal>
    where
        B: VariableBindings + ?Sized,
    {
        let formula = self.lookup(name)?;
        self.evaluator.evaluate(&formula.expression, bindings)
    }

    /// Evaluate every formula, in the order they were added
    pub fn evaluate_all<B>(&self, bindings: &B) -> Vec<FormulaResult>
    where
        B: VariableBindings + ?Sized,
    {
        self.order
            .iter()
            .filter_map(|name| self.formulas.get(name))
            .map(|formula| self.result_of(formula, bindings))
            .collect()
    }

    /// Evaluate the named formulas, in the order given
    ///
    /// Fails before evaluating anything if a name is not registered.
    pub fn evaluate_formulas<B, S>(&self, names: &[S], bindings: &B) -> TallyResult<Vec<FormulaResult>>
    where
        B: VariableBindings + ?Sized,
        S: AsRef<str>,
    {
        let formulas = names
            .iter()
            .map(|name| self.lookup(name.as_ref()))
            .collect::<TallyResult<Vec<_>>>()?;

        Ok(formulas
            .into_iter()
            .map(|formula| self.result_of(formula, bindings))
            .collect())
    }

    /// Variables referenced by any formula, in first-occurrence order
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for formula in self.order.iter().filter_map(|n| self.formulas.get(n)) {
            for variable in formula.expression.variables() {
                if !names.contains(&variable) {
                    names.push(variable);
                }
            }
        }
        names
    }

    fn result_of<B>(&self, formula: &Formula, bindings: &B) -> FormulaResult
    where
        B: VariableBindings + ?Sized,
    {
        FormulaResult {
            name: formula.name.clone(),
            source: formula.expression.source().to_string(),
            result_type: formula.expression.result_type(),
            value: self.evaluator.evaluate(&formula.expression, bindings),
        }
    }

    fn lookup(&self, name: &str) -> TallyResult<&Formula> {
        self.formulas
            .get(name)
            .ok_or_else(|| TallyError::Engine(format!("Formula '{}' not found", name)))
    }

    fn compile_formula(
        &self,
        name: &str,
        source: &str,
        origin: Option<String>,
    ) -> TallyResult<Formula> {
        if !is_formula_name(name) {
            let location = origin.as_deref().map(|o| format!("{}: ", o)).unwrap_or_default();
            return Err(TallyError::Engine(format!(
                "{}invalid formula name '{}'",
                location, name
            )));
        }

        let expression = compile_with_limits(source, &self.limits)?;
        Ok(Formula {
            name: name.to_string(),
            expression,
            origin,
        })
    }

    fn ensure_unused(&self, name: &str) -> TallyResult<()> {
        if self.formulas.contains_key(name) {
            return Err(TallyError::Engine(format!(
                "Formula '{}' is already defined",
                name
            )));
        }
        Ok(())
    }

    fn insert(&mut self, formula: Formula) {
        self.order.push(formula.name.clone());
        self.formulas.insert(formula.name.clone(), formula);
    }
}

/// A formula name must lex as a single identifier
fn is_formula_name(name: &str) -> bool {
    match tokenize(name) {
        Ok(tokens) => matches!(
            tokens.as_slice(),
            [first, last] if matches!(first.kind, TokenKind::Identifier(_))
                && matches!(last.kind, TokenKind::End)
        ),
        Err(_) => false,
    }
}

/// Text before a `#` that starts the line or follows whitespace
fn strip_comment(line: &str) -> &str {
    let mut previous: Option<char> = None;
    for (index, c) in line.char_indices() {
        if c == '#' && previous.map_or(true, char::is_whitespace) {
            return &line[..index];
        }
        previous = Some(c);
    }
    line
}
