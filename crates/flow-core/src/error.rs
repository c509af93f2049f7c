//! Base error type for the kernel.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant (see `flow_network::NetError`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid lane id {0:?}: expected \"<edge>_<index>\"")]
    InvalidLaneId(String),
}

/// Shorthand result type for `flow-core`.
pub type CoreResult<T> = Result<T, CoreError>;
