use crate::error::TallyError;
use crate::expression::Expression;
use crate::lexer::tokenize;
use crate::resource_limits::ResourceLimits;
use crate::TallyResult;
use std::sync::Arc;
use tracing::debug;

pub mod expressions;

use expressions::ExpressionParser;

/// Compile `source` with the default [`ResourceLimits`]
pub fn compile(source: &str) -> TallyResult<Expression> {
    compile_with_limits(source, &ResourceLimits::default())
}

/// Lex, parse and type-check `source` into a reusable [`Expression`]
pub fn compile_with_limits(source: &str, limits: &ResourceLimits) -> TallyResult<Expression> {
    // Check source size limit
    if source.len() > limits.max_source_bytes {
        return Err(TallyError::ResourceLimitExceeded {
            limit_name: "max_source_bytes".to_string(),
            limit_value: format!(
                "{} bytes ({} KB)",
                limits.max_source_bytes,
                limits.max_source_bytes / 1024
            ),
            actual_value: format!(
                "{} bytes ({:.2} KB)",
                source.len(),
                source.len() as f64 / 1024.0
            ),
            suggestion: "Shorten the expression or split it into several formulas".to_string(),
        });
    }

    let tokens = tokenize(source)?;
    let token_count = tokens.len();
    let source_text: Arc<str> = Arc::from(source);

    let root = ExpressionParser::new(tokens, source_text.clone(), limits).parse()?;

    debug!(
        source_bytes = source.len(),
        tokens = token_count,
        result_type = %root.ty,
        "compiled expression"
    );

    Ok(Expression::new(root, source_text))
}
