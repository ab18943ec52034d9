//! Error and warning types.
//!
//! Malformed records fail fast with [`ModelError`] before any analysis runs.
//! Integrity problems in otherwise well-formed records are not errors: they
//! are collected as [`IntegrityWarning`]s and travel with the analysis output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning raw input into a [`SimulationResult`].
///
/// [`SimulationResult`]: crate::model::SimulationResult
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed simulation record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("production edge {index} ({catalyst} -> {product}) has count 0, expected at least 1")]
    ZeroEdgeCount {
        index: usize,
        catalyst: String,
        product: String,
    },

    #[error("production edge {index} has an empty {field} identifier")]
    EmptyEdgeEndpoint { index: usize, field: &'static str },

    #[error("snapshot {index} has an empty strand identifier in its pool")]
    EmptyPoolStrand { index: usize },

    #[error("snapshot {index} reports a pool total above {max}", max = crate::model::MAX_POOL_TOTAL)]
    PoolTotalTooLarge { index: usize },

    #[error("simulation config name cannot be empty")]
    EmptyName,
}

/// A data-integrity finding in a well-formed record.
///
/// These are surfaced to the caller unchanged; nothing is clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// `poolSize` minus the selected strands' counts went below zero.
    NegativeOther { op: i64, other: i64 },
    /// A snapshot reports fewer pool entries than unique strands.
    PoolSmallerThanUnique {
        op: i64,
        pool_size: u64,
        unique_count: u64,
    },
    /// The pool's counts do not add up to the reported `poolSize`.
    PoolSumMismatch { op: i64, pool_size: u64, pool_sum: u64 },
    /// Snapshots are expected in non-decreasing `op` order.
    OpOutOfOrder { index: usize, previous: i64, op: i64 },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::NegativeOther { op, other } => {
                write!(f, "op {op}: residual 'other' bucket is negative ({other})")
            }
            IntegrityWarning::PoolSmallerThanUnique {
                op,
                pool_size,
                unique_count,
            } => write!(
                f,
                "op {op}: poolSize {pool_size} is smaller than uniqueCount {unique_count}"
            ),
            IntegrityWarning::PoolSumMismatch {
                op,
                pool_size,
                pool_sum,
            } => write!(
                f,
                "op {op}: pool counts sum to {pool_sum} but poolSize is {pool_size}"
            ),
            IntegrityWarning::OpOutOfOrder {
                index,
                previous,
                op,
            } => write!(
                f,
                "snapshot {index}: op {op} comes after op {previous}"
            ),
        }
    }
}
