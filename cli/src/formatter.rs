use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use serde_json::{json, Value};
use tally::{format_decimal, Bindings, Decimal, Expression, FormulaResult, Operator, Type};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// Result of a single `eval`
    pub fn format_evaluation(
        &self,
        expression: &Expression,
        bindings: &Bindings,
        value: &Decimal,
        raw: bool,
    ) -> String {
        if raw {
            return format!("{}\n", format_decimal(value));
        }

        let mut output = String::new();
        if !bindings.is_empty() {
            output.push_str(&self.format_bindings_table(bindings));
            output.push('\n');
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.add_row(Row::from(vec![Cell::new(format!(
            "{} = {}",
            expression,
            display_value(expression.result_type(), value)
        ))]));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    pub fn evaluation_json(&self, expression: &Expression, value: &Decimal) -> Value {
        json!({
            "expression": expression.to_string(),
            "type": expression.result_type().to_string(),
            "value": format_decimal(value),
        })
    }

    /// Output of `check`: canonical form, result type and variables
    pub fn format_check(&self, expression: &Expression) -> String {
        let variables = expression.variables();
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.add_row(Row::from(vec![
            "Canonical".to_string(),
            expression.to_string(),
        ]));
        table.add_row(Row::from(vec![
            "Type".to_string(),
            expression.result_type().to_string(),
        ]));
        table.add_row(Row::from(vec![
            "Variables".to_string(),
            if variables.is_empty() {
                "-".to_string()
            } else {
                variables.join(", ")
            },
        ]));
        format!("{}\n", table)
    }

    /// Results of `run`, one row per formula in registry order
    pub fn format_results(&self, results: &[FormulaResult], bindings: &Bindings) -> String {
        let mut output = String::new();
        if !bindings.is_empty() {
            output.push_str(&self.format_bindings_table(bindings));
            output.push('\n');
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Formula").set_alignment(CellAlignment::Left),
            Cell::new("Expression").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Right),
        ]));

        for result in results {
            let value = match &result.value {
                Ok(value) => display_value(result.result_type, value),
                Err(err) => format!("error: {}", err),
            };
            table.add_row(Row::from(vec![
                Cell::new(&result.name),
                Cell::new(&result.source),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]));
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    pub fn results_json(&self, results: &[FormulaResult]) -> Value {
        let entries: Vec<Value> = results
            .iter()
            .map(|result| match &result.value {
                Ok(value) => json!({
                    "name": result.name,
                    "expression": result.source,
                    "type": result.result_type.to_string(),
                    "value": format_decimal(value),
                }),
                Err(err) => json!({
                    "name": result.name,
                    "expression": result.source,
                    "type": result.result_type.to_string(),
                    "error": err.to_string(),
                }),
            })
            .collect();
        Value::Array(entries)
    }

    /// The operator table, lowest precedence first
    pub fn format_operators(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            "Operator",
            "Precedence",
            "Arity",
            "Form",
            "Operands",
            "Result",
        ]));

        for operator in Operator::ALL {
            let Some(fixity) = operator.fixity() else {
                continue;
            };
            let operands = match operator.operand_type(0) {
                Some(ty) => ty.to_string(),
                None => "boolean, T, T".to_string(),
            };
            let result = operator
                .result_type()
                .map(|ty| ty.to_string())
                .unwrap_or_else(|| "T".to_string());
            let symbol = if operator == Operator::Conditional {
                "? :".to_string()
            } else {
                operator.symbol().to_string()
            };
            table.add_row(Row::from(vec![
                Cell::new(symbol),
                Cell::new(operator.precedence()).set_alignment(CellAlignment::Right),
                Cell::new(operator.arity()).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:?}", fixity).to_lowercase()),
                Cell::new(operands),
                Cell::new(result),
            ]));
        }

        format!("{}\n", table)
    }

    fn format_bindings_table(&self, bindings: &Bindings) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Variable").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Left),
        ]));

        for (name, value) in bindings.iter() {
            table.add_row(Row::from(vec![name.to_string(), format_decimal(value)]));
        }

        table.to_string()
    }
}

fn display_value(ty: Type, value: &Decimal) -> String {
    match ty {
        Type::Boolean => format!("{} ({})", format_decimal(value), tally::is_true(value)),
        Type::Arithmetic => format_decimal(value),
    }
}
