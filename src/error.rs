//! Engine-level errors.
//!
//! Document content never errors out of the pipeline: malformed constructs
//! become [`ConversionFailure`](crate::plan::ConversionFailure) records and
//! the run continues. The variants here cover host-contract violations only.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrateError {
    /// The host handed over an empty (or whitespace-only) document.
    #[error("document is empty")]
    EmptyDocument,

    /// The cancellation token fired between candidates.
    #[error("migration cancelled")]
    Cancelled,
}
