use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// A single diagnostic about an operation's current inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProblem {
    pub severity: Severity,
    pub transformation_id: String,
    pub operation_path: String,
    pub message: String,
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.operation_path, self.transformation_id, self.message
        )
    }
}

/// The diagnostics produced by one validation pass. A fresh set is built on every pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProblems {
    problems: Vec<ValidationProblem>,
}

impl ValidationProblems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: ValidationProblem) {
        self.problems.push(problem);
    }

    pub fn error(
        &mut self,
        transformation_id: &str,
        operation_path: &str,
        message: impl Into<String>,
    ) {
        self.push(ValidationProblem {
            severity: Severity::Error,
            transformation_id: transformation_id.to_string(),
            operation_path: operation_path.to_string(),
            message: message.into(),
        });
    }

    pub fn warning(
        &mut self,
        transformation_id: &str,
        operation_path: &str,
        message: impl Into<String>,
    ) {
        self.push(ValidationProblem {
            severity: Severity::Warning,
            transformation_id: transformation_id.to_string(),
            operation_path: operation_path.to_string(),
            message: message.into(),
        });
    }

    /// True if any contained problem has ERROR severity.
    pub fn is_error(&self) -> bool {
        self.problems.iter().any(|p| p.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationProblem> {
        self.problems.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationProblem> {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
    }
}

impl fmt::Display for ValidationProblems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, problem) in self.problems.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", problem)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationProblems {
    type Item = &'a ValidationProblem;
    type IntoIter = std::slice::Iter<'a, ValidationProblem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_alone_are_not_errors() {
        let mut problems = ValidationProblems::new();
        assert!(!problems.is_error());
        problems.warning("t", "/op", "target will be created");
        assert!(!problems.is_error());
        problems.error("t", "/op", "requires at least 1 input");
        assert!(problems.is_error());
        assert_eq!(problems.errors().count(), 1);
        assert_eq!(
            problems.to_string(),
            "[WARNING] /op (t): target will be created\n[ERROR] /op (t): requires at least 1 input"
        );
    }
}
