//! Core error type.
//!
//! Sub-crates define their own error enums (`GraphError`, `SimError`) and
//! wrap `CoreError` where configuration problems can surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `gdd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
