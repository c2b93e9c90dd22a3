//! Non-throwing adapter over the fallible config operations.
//!
//! [`attempt`] runs a fallible operation and turns its `Result` into an
//! [`Attempt`], logging the failure.  It adds no logic of its own: the
//! `try_*` operations are exactly their `Result` counterparts passed through
//! this adapter.
//!
//! Misuse errors ([`ConfigError::is_misuse`]) are converted like any other
//! failure, but logged at `error` level so a broken precondition never
//! disappears silently.

use tracing::{error, warn};

use crate::error::ConfigError;

/// Outcome of a non-throwing config operation.
#[derive(Debug)]
#[must_use]
pub enum Attempt<T> {
    Succeeded(T),
    Failed(ConfigError),
}

impl<T> Attempt<T> {
    pub fn succeeded(&self) -> bool {
        matches!(self, Attempt::Succeeded(_))
    }

    pub fn failed(&self) -> bool {
        !self.succeeded()
    }

    /// The produced value, or `None` on failure.
    pub fn value(self) -> Option<T> {
        match self {
            Attempt::Succeeded(value) => Some(value),
            Attempt::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ConfigError> {
        match self {
            Attempt::Succeeded(_) => None,
            Attempt::Failed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T, ConfigError> {
        self.into()
    }
}

impl<T> From<Result<T, ConfigError>> for Attempt<T> {
    fn from(result: Result<T, ConfigError>) -> Self {
        match result {
            Ok(value) => Attempt::Succeeded(value),
            Err(err) => Attempt::Failed(err),
        }
    }
}

impl<T> From<Attempt<T>> for Result<T, ConfigError> {
    fn from(attempt: Attempt<T>) -> Self {
        match attempt {
            Attempt::Succeeded(value) => Ok(value),
            Attempt::Failed(err) => Err(err),
        }
    }
}

/// Runs `op`, converting its error into [`Attempt::Failed`].
///
/// `operation` names the call in the log line.
pub fn attempt<T, F>(operation: &str, op: F) -> Attempt<T>
where
    F: FnOnce() -> Result<T, ConfigError>,
{
    match op() {
        Ok(value) => Attempt::Succeeded(value),
        Err(err) if err.is_misuse() => {
            error!("{operation} called incorrectly: {err}");
            Attempt::Failed(err)
        }
        Err(err) => {
            warn!("{operation} failed: {err}");
            Attempt::Failed(err)
        }
    }
}
