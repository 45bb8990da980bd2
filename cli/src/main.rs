mod error_formatter;
mod formatter;
mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formatter::Formatter;
use std::fs;
use std::path::{Path, PathBuf};
use tally::{compile_with_limits, Bindings, Engine, ResourceLimits, TallyError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Typed decimal expressions for game balance formulas.")]
#[command(
    long_about = "Tally compiles small typed expressions over 128-digit decimals and evaluates them against variable bindings.\nThe CLI lets you evaluate single expressions, check them without evaluating, or run whole formula files."
)]
#[command(version)]
struct Cli {
    /// Maximum nesting depth of parentheses, unary operators and conditionals
    #[arg(long, global = true, value_name = "DEPTH")]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and evaluate an expression
    ///
    /// Variables are bound with name=value arguments. Booleans evaluate to 1 or 0.
    ///
    /// Examples:
    ///   tally eval "2 + 3 * 4"
    ///   tally eval "level > 10 ? base * 2 : base + level" level=12 base=40
    Eval {
        /// The expression to evaluate
        expression: String,
        /// Variable values (format: name=value)
        ///
        /// Examples: hp=100, rate=0.25, config.scale=2
        bindings: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Output raw values only (for piping to other tools)
        #[arg(short = 'r', long)]
        raw: bool,
        /// Prompt for variables that have no value
        #[arg(short = 'i', long)]
        interactive: bool,
    },
    /// Compile an expression without evaluating it
    ///
    /// Prints the canonical form, the result type and the referenced variables.
    Check {
        /// The expression to check
        expression: String,
    },
    /// Evaluate formulas from a file
    ///
    /// A formula file holds one 'name = expression' per line. Lines starting
    /// with '#' are comments, as is text after ' #'.
    ///
    /// Examples:
    ///   tally run economy.tally workers=12 rate=2.5
    ///   tally run economy.tally income,tax workers=12 rate=2.5
    Run {
        /// Formula file to load
        file: PathBuf,
        /// Comma separated formulas to evaluate (default: all), followed by variable values
        ///
        /// Format: formula1,formula2 name=value name=value
        #[arg(value_name = "[FORMULAS] [NAME=VALUE]")]
        args: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the operator table
    Operators,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut limits = ResourceLimits::default();
    if let Some(depth) = cli.max_depth {
        limits = limits.with_max_expression_depth(depth);
    }

    let result = match &cli.command {
        Commands::Eval {
            expression,
            bindings,
            json,
            raw,
            interactive,
        } => eval_command(expression, bindings, *json, *raw, *interactive, &limits),
        Commands::Check { expression } => check_command(expression, &limits),
        Commands::Run { file, args, json } => run_command(file, args, *json, &limits),
        Commands::Operators => {
            print!("{}", Formatter::default().format_operators());
            Ok(())
        }
    };

    if let Err(e) = result {
        // Render TallyErrors against their source, otherwise use default
        if let Some(tally_err) = e.downcast_ref::<TallyError>() {
            eprintln!("{}", error_formatter::format_error(tally_err, &source_id(&e)));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tally=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn eval_command(
    source: &str,
    assignments: &[String],
    json: bool,
    raw: bool,
    interactive: bool,
    limits: &ResourceLimits,
) -> Result<()> {
    let expression = compile_with_limits(source, limits)?;
    let mut bindings = Bindings::from_assignments(assignments)?;

    if interactive {
        interactive::prompt_missing(&expression, &mut bindings)?;
    }

    let value = expression.evaluate(&bindings)?;
    let formatter = Formatter::default();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&formatter.evaluation_json(&expression, &value))?
        );
    } else {
        print!(
            "{}",
            formatter.format_evaluation(&expression, &bindings, &value, raw)
        );
    }

    Ok(())
}

fn check_command(source: &str, limits: &ResourceLimits) -> Result<()> {
    let expression = compile_with_limits(source, limits)?;
    print!("{}", Formatter::default().format_check(&expression));
    Ok(())
}

fn run_command(file: &Path, args: &[String], json: bool, limits: &ResourceLimits) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read formula file {}", file.display()))?;

    let mut engine = Engine::with_limits(limits.clone());
    let source_id = file.to_string_lossy().to_string();
    engine
        .add_formulas(&text, &source_id)
        .map_err(|err| anyhow::Error::new(err).context(SourceId(source_id.clone())))?;

    let (formulas, assignments) = split_run_args(args);
    let bindings = Bindings::from_assignments(assignments)?;
    debug!(
        file = %source_id,
        formulas = engine.list_formulas().len(),
        bindings = bindings.len(),
        "running formula file"
    );

    let results = match formulas {
        Some(names) => engine.evaluate_formulas(&names, &bindings)?,
        None => engine.evaluate_all(&bindings),
    };

    let formatter = Formatter::default();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&formatter.results_json(&results))?
        );
    } else {
        print!("{}", formatter.format_results(&results, &bindings));
    }

    if results.iter().any(|result| !result.is_ok()) {
        anyhow::bail!("{} formula(s) failed to evaluate", failed_count(&results));
    }

    Ok(())
}

fn failed_count(results: &[tally::FormulaResult]) -> usize {
    results.iter().filter(|result| !result.is_ok()).count()
}

/// Split `run` arguments into an optional formula list and name=value assignments
fn split_run_args(args: &[String]) -> (Option<Vec<String>>, &[String]) {
    match args.first() {
        Some(first) if !first.contains('=') => {
            let names: Vec<String> = first
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            (Some(names), &args[1..])
        }
        _ => (None, args),
    }
}

/// Name of the input an error was raised for, attached as context
#[derive(Debug)]
struct SourceId(String);

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn source_id(error: &anyhow::Error) -> String {
    error
        .downcast_ref::<SourceId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "<expr>".to_string())
}
