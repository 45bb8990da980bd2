use ariadne::{Color, Label, Report, ReportKind, Source};
use tally::TallyError;

/// Format a TallyError with fancy terminal output using Ariadne
///
/// `source_id` names the input in the report header, e.g. `<expr>` or
/// `economy.tally:4`.
pub fn format_error(error: &TallyError, source_id: &str) -> String {
    let Some(details) = error.details() else {
        return match error {
            TallyError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            ),
            _ => error.to_string(),
        };
    };

    let message = format!(
        "{}: {} (at {}:{})",
        error.label(),
        details.message,
        details.span.line,
        details.span.col
    );

    let start = details.span.start.min(details.source_text.len());
    let end = details.span.end.clamp(start, details.source_text.len());

    let mut report = Report::build(ReportKind::Error, source_id, start)
        .with_message(message)
        .with_label(
            Label::new((source_id, start..end))
                .with_message(label_message(error))
                .with_color(Color::Red),
        );

    if let Some(suggestion) = &details.suggestion {
        report = report.with_help(suggestion);
    }

    let mut output = Vec::new();
    match report.finish().write(
        (source_id, Source::from(details.source_text.as_ref())),
        &mut output,
    ) {
        Ok(_) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => error.to_string(),
    }
}

fn label_message(error: &TallyError) -> String {
    match error {
        TallyError::Syntax { kind, .. } => kind.to_string(),
        TallyError::Type {
            expected, actual, ..
        } => format!("expected {}, found {}", expected, actual),
        TallyError::UndefinedVariable { name, .. } => format!("'{}' has no value", name),
        TallyError::Arithmetic { operator, .. } => format!("'{}' failed here", operator),
        _ => String::new(),
    }
}
