//! Violation reporting

use crate::error::{Result, ValidationError};
use beanpath::Value;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// A failed check, located by the path of the checked value
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    pub path: String,
    pub constraint: String,
    pub description: Option<String>,
    pub value: Value,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violated by '{}' = {}", self.constraint, self.path, self.value)?;
        if let Some(description) = &self.description {
            write!(f, " ({})", description)?;
        }
        Ok(())
    }
}

/// Receives every violation found by a validation session
pub trait ViolationReporter: Send + Sync {
    fn report(&self, violation: ConstraintViolation);
}

/// Keeps violations in memory, in the order they were reported
#[derive(Debug, Default)]
pub struct CollectingReporter {
    violations: Mutex<Vec<ConstraintViolation>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ConstraintViolation>> {
        self.violations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn violations(&self) -> Vec<ConstraintViolation> {
        self.guard().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Paths of all reported violations
    pub fn paths(&self) -> Vec<String> {
        self.guard().iter().map(|v| v.path.clone()).collect()
    }

    /// `Ok` when nothing was reported
    pub fn to_result(&self) -> Result<()> {
        let violations = self.guard();
        match violations.first() {
            None => Ok(()),
            Some(first) => Err(ValidationError::ConstraintsViolated {
                count: violations.len(),
                first_path: first.path.clone(),
            }),
        }
    }
}

impl ViolationReporter for CollectingReporter {
    fn report(&self, violation: ConstraintViolation) {
        self.guard().push(violation);
    }
}

/// Writes each violation to the `tracing` log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ViolationReporter for TracingReporter {
    fn report(&self, violation: ConstraintViolation) {
        info!(
            path = %violation.path,
            constraint = %violation.constraint,
            "constraint violated: {}",
            violation
        );
    }
}
