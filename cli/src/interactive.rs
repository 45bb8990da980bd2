use anyhow::{Context, Result};
use inquire::validator::Validation;
use inquire::Text;
use std::str::FromStr;
use tally::{Bindings, Decimal, Expression};

/// Prompt for every variable of `expression` that has no value yet
pub fn prompt_missing(expression: &Expression, bindings: &mut Bindings) -> Result<()> {
    let missing: Vec<&str> = expression
        .variables()
        .into_iter()
        .filter(|name| !bindings.contains(name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    println!("\nEnter variable values:");

    for name in missing {
        let value = Text::new(&format!("{} [number]", name))
            .with_help_message("Example: 12.5")
            .with_validator(|input: &str| {
                Ok(match Decimal::from_str(input.trim()) {
                    Ok(_) => Validation::Valid,
                    Err(_) => Validation::Invalid("Enter a decimal number".into()),
                })
            })
            .prompt()
            .context(format!("Failed to get value for {}", name))?;

        let value = Decimal::from_str(value.trim())
            .with_context(|| format!("Invalid number for {}", name))?;
        bindings.insert(name, value);
    }

    Ok(())
}
