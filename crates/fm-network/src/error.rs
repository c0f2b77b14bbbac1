//! Network error type.

use thiserror::Error;

use fm_core::NodeId;

/// Errors produced by `fm-network`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
