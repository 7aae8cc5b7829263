//! Numeric field parsing
//!
//! UI fields arrive as raw text. Each one is parsed into a [`ParsedNumber`]: either
//! the value that was typed or an explicit default. The substitution is a visible
//! branch that lands in the [`UpdateReport`] rather than a silent coercion.

use crate::diagnostics::{UpdateReport, Warning};

/// Outcome of parsing one numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    /// The field held a finite number
    Valid(f64),
    /// The field was empty, non-numeric or non-finite
    Defaulted(f64),
}

impl ParsedNumber {
    pub fn value(self) -> f64 {
        match self {
            ParsedNumber::Valid(v) | ParsedNumber::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, ParsedNumber::Defaulted(_))
    }
}

/// Parse a field, substituting `default` for anything that is not a finite number
///
/// Surrounding whitespace is ignored. Partial numbers such as `"12abc"` are
/// rejected as a whole.
pub fn parse_number(raw: &str, default: f64) -> ParsedNumber {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => ParsedNumber::Valid(v),
        _ => ParsedNumber::Defaulted(default),
    }
}

/// Replace a non-finite value by `default`
pub fn sanitize(value: f64, default: f64) -> ParsedNumber {
    if value.is_finite() {
        ParsedNumber::Valid(value)
    } else {
        ParsedNumber::Defaulted(default)
    }
}

/// Reads fields while recording every default substitution in a report
pub struct FieldReader<'a> {
    report: &'a mut UpdateReport,
}

impl<'a> FieldReader<'a> {
    pub fn new(report: &'a mut UpdateReport) -> Self {
        Self { report }
    }

    /// Parse raw text for `field`
    pub fn text(&mut self, field: &str, raw: &str, default: f64) -> f64 {
        self.record(field, parse_number(raw, default))
    }

    /// Check an already-numeric value for `field`
    pub fn number(&mut self, field: &str, value: f64, default: f64) -> f64 {
        self.record(field, sanitize(value, default))
    }

    fn record(&mut self, field: &str, parsed: ParsedNumber) -> f64 {
        if parsed.is_defaulted() {
            self.report.push(Warning::InvalidNumericInput {
                field: field.to_string(),
                default: parsed.value(),
            });
        }
        parsed.value()
    }
}
