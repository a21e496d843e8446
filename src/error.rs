//! Error types.
//!
//! The crate-wide `Result` is `anyhow`-based. The ledger engine has its own typed error,
//! `LedgerError`, because callers need to tell a bad input apart from a state conflict or a
//! storage failure.

use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The result type returned by `Ledger` operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Failures of ledger operations.
///
/// Validation and state conflict failures are always detected before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The input was rejected, e.g. a non-positive amount or a missing payment method.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The operation is not allowed in the current state, e.g. starting a day twice.
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// A referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record store failed.
    #[error("Store failure: {0:#}")]
    Store(#[source] anyhow::Error),
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        LedgerError::StateConflict(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        LedgerError::NotFound(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::StateConflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }

    pub fn is_store(&self) -> bool {
        matches!(self, LedgerError::Store(_))
    }

    /// The category this failure is reported under: storage failures are database errors,
    /// everything else is a rejected ledger operation.
    pub fn error_type(&self) -> ErrorType {
        match self {
            LedgerError::Store(_) => ErrorType::Database,
            _ => ErrorType::Ledger,
        }
    }
}

impl From<anyhow::Error> for LedgerError {
    fn from(e: anyhow::Error) -> Self {
        LedgerError::Store(e)
    }
}

/// The broad category of a failure that is reported to the user.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` could not be created or loaded.
    Config,
    /// The SQLite database could not be opened or queried.
    Database,
    /// A ledger operation was rejected.
    Ledger,
    /// The command line input could not be understood.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// Tags an error with an `ErrorType` before it leaves a command handler.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(format!("{error_type} error")))
    }
}

/// Tags a ledger failure with the `ErrorType` that matches its kind.
pub(crate) trait IntoLedgerResult<T> {
    fn ledger_result(self) -> Result<T>;
}

impl<T> IntoLedgerResult<T> for LedgerResult<T> {
    fn ledger_result(self) -> Result<T> {
        self.map_err(|e| {
            let error_type = e.error_type();
            anyhow::Error::new(e).context(format!("{error_type} error"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_adds_error_type() {
        let r: std::result::Result<(), LedgerError> =
            Err(LedgerError::conflict("a day already exists for 2026-10-17"));
        let e = r.pub_result(ErrorType::Ledger).unwrap_err();
        assert_eq!(e.to_string(), "ledger error");
        let chain = format!("{e:#}");
        assert!(chain.contains("State conflict: a day already exists for 2026-10-17"));
        assert!(e.downcast_ref::<LedgerError>().unwrap().is_conflict());
    }

    #[test]
    fn test_ledger_result_tags_by_kind() {
        let r: LedgerResult<()> = Err(anyhow!("disk full").into());
        let e = r.ledger_result().unwrap_err();
        assert_eq!(e.to_string(), "database error");
        assert!(e.downcast_ref::<LedgerError>().unwrap().is_store());

        let r: LedgerResult<()> = Err(LedgerError::validation("amount is zero"));
        assert_eq!(r.ledger_result().unwrap_err().to_string(), "ledger error");
    }

    #[test]
    fn test_store_error_from_anyhow() {
        let e: LedgerError = anyhow!("disk full").into();
        assert!(e.is_store());
        assert_eq!(e.to_string(), "Store failure: disk full");
    }
}
