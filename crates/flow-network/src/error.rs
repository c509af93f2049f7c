//! Network-subsystem error type.
//!
//! Variants fall into three families:
//!
//! - **parse** (`Io`, `Parse`): the export is unreadable or malformed.  The
//!   retry wrapper tries again.
//! - **validation** (`DuplicateEdge`, `InvalidEdge`, `UnresolvedVia`): the
//!   export parsed but is internally inconsistent.  Never retried.
//! - **lookup** (`UnknownEdge`, `PositionOutOfRange`, `EmptyNetwork`): a
//!   query named something the network does not have.

use thiserror::Error;

use flow_core::CoreError;

/// Errors produced by `flow-network`.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("topology parse error: {0}")]
    Parse(String),

    #[error("duplicate edge id {0:?}")]
    DuplicateEdge(String),

    #[error("edge {id:?} is invalid: {reason}")]
    InvalidEdge { id: String, reason: String },

    #[error("connection from {from:?} lane {lane} goes via {via:?}, which is not a known edge")]
    UnresolvedVia { from: String, lane: u32, via: String },

    #[error("edge {0:?} not found in network")]
    UnknownEdge(String),

    #[error("position {0} is below the start of the coordinate line")]
    PositionOutOfRange(f64),

    #[error("network has no edges")]
    EmptyNetwork,

    #[error("topology import cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl NetError {
    /// Whether a later attempt could succeed: the export may still be in the
    /// middle of being written by the external process.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NetError::Io(_) | NetError::Parse(_))
    }

    /// Data is internally inconsistent; retrying the same export cannot help.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NetError::DuplicateEdge(_) | NetError::InvalidEdge { .. } | NetError::UnresolvedVia { .. }
        )
    }

    /// A query named an edge or position the network does not have.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            NetError::UnknownEdge(_) | NetError::PositionOutOfRange(_) | NetError::EmptyNetwork
        )
    }
}

pub type NetResult<T> = Result<T, NetError>;
