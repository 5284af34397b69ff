// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// How a failing rule affects the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Blocks the transition.
    Error,
    /// Advisory only. A payload whose failures are all informational is
    /// skipped, not rejected.
    Information,
}

impl Severity {
    /// Returns the string representation used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Information => "information",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    /// Dotted path of the field the rule is bound to.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// The severity of the failing rule.
    pub severity: Severity,
}

impl RuleFailure {
    /// Creates a new `RuleFailure`.
    #[must_use]
    pub const fn new(field: String, message: String, severity: Severity) -> Self {
        Self {
            field,
            message,
            severity,
        }
    }

    /// Returns true if this failure blocks the transition.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)
    }
}

/// Every failure produced by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    failures: Vec<RuleFailure>,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Records a failure.
    pub fn push(&mut self, failure: RuleFailure) {
        self.failures.push(failure);
    }

    /// Returns true if no Error-severity failure was recorded.
    ///
    /// Information-severity failures never make a report invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.failures.iter().any(RuleFailure::is_error)
    }

    /// All recorded failures, in evaluation order.
    #[must_use]
    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    /// Returns true if any failure is bound to `field`.
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.failures.iter().any(|f| f.field == field)
    }

    /// Classifies the report into the control path a caller must take.
    #[must_use]
    pub fn into_outcome(self) -> Outcome {
        if self.failures.is_empty() {
            Outcome::Valid
        } else if self.is_valid() {
            Outcome::Skipped(self.failures)
        } else {
            Outcome::Invalid(self.failures)
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// The control path that follows a validation pass.
///
/// `Skipped` is a successful no-op and must not be handled as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every rule passed.
    Valid,
    /// At least one Error-severity rule failed. Carries every failure.
    Invalid(Vec<RuleFailure>),
    /// Only Information-severity rules failed.
    Skipped(Vec<RuleFailure>),
}
