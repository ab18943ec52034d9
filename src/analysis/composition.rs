//! Pool composition over time.
//!
//! Picks the strands that ever reached the highest counts and follows them
//! across every snapshot. Whatever the selected strands do not account for is
//! bucketed into an `other` series so the stack always adds up to the pool
//! size reported by the simulator.

use crate::error::IntegrityWarning;
use crate::model::Snapshot;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Fewer snapshots than this cannot describe a trend.
pub const MIN_SNAPSHOTS: usize = 2;

/// Count series for one selected strand, aligned with [`Composition::ops`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandSeries {
    pub strand: String,
    /// Highest count this strand reached in any snapshot.
    pub peak: u64,
    pub counts: Vec<u64>,
}

/// Top-N decomposition of the pool across the snapshot sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub ops: Vec<i64>,
    /// Selected strands, highest peak first.
    pub series: Vec<StrandSeries>,
    /// `poolSize` minus the selected strands, per snapshot. Never clamped.
    pub other: Vec<i64>,
    pub pool_size: Vec<u64>,
    pub unique_count: Vec<u64>,
}

impl Composition {
    /// Count series for a selected strand.
    pub fn series_for(&self, strand: &str) -> Option<&[u64]> {
        self.series
            .iter()
            .find(|s| s.strand == strand)
            .map(|s| s.counts.as_slice())
    }

    /// One warning per snapshot whose residual went negative.
    pub fn negative_other_warnings(&self) -> Vec<IntegrityWarning> {
        self.ops
            .iter()
            .zip(&self.other)
            .filter(|(_, other)| **other < 0)
            .map(|(&op, &other)| IntegrityWarning::NegativeOther { op, other })
            .collect()
    }
}

/// Outcome of the aggregation: either a full composition or a skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompositionBundle {
    Ready(Composition),
    /// Not enough snapshots to plot anything.
    Skipped { snapshot_count: usize },
}

impl CompositionBundle {
    pub fn composition(&self) -> Option<&Composition> {
        match self {
            CompositionBundle::Ready(composition) => Some(composition),
            CompositionBundle::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CompositionBundle::Skipped { .. })
    }
}

/// Peak count per strand over all snapshots.
pub fn strand_peaks(snapshots: &[Snapshot]) -> BTreeMap<&str, u64> {
    let mut peaks: BTreeMap<&str, u64> = BTreeMap::new();
    for snapshot in snapshots {
        for (strand, &count) in &snapshot.pool {
            let peak = peaks.entry(strand.as_str()).or_insert(0);
            *peak = (*peak).max(count);
        }
    }
    peaks
}

/// The `top_n` strands by peak count. Equal peaks are ordered by identifier,
/// ascending.
pub fn select_top_strands(snapshots: &[Snapshot], top_n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(&str, u64)> = strand_peaks(snapshots).into_iter().collect();
    ranked.sort_by_key(|&(strand, peak)| (Reverse(peak), strand));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(strand, peak)| (strand.to_string(), peak))
        .collect()
}

/// Build the top-`top_n` + other decomposition, or skip when there are fewer
/// than two snapshots.
pub fn aggregate(snapshots: &[Snapshot], top_n: usize) -> CompositionBundle {
    if snapshots.len() < MIN_SNAPSHOTS {
        return CompositionBundle::Skipped {
            snapshot_count: snapshots.len(),
        };
    }

    let series: Vec<StrandSeries> = select_top_strands(snapshots, top_n)
        .into_iter()
        .map(|(strand, peak)| {
            let counts = snapshots.iter().map(|snap| snap.count(&strand)).collect();
            StrandSeries {
                strand,
                peak,
                counts,
            }
        })
        .collect();

    let other = (0..snapshots.len())
        .map(|i| {
            let selected: u128 = series.iter().map(|s| u128::from(s.counts[i])).sum();
            residual(snapshots[i].pool_size, selected)
        })
        .collect();

    CompositionBundle::Ready(Composition {
        ops: snapshots.iter().map(|snap| snap.op).collect(),
        series,
        other,
        pool_size: snapshots.iter().map(|snap| snap.pool_size).collect(),
        unique_count: snapshots.iter().map(|snap| snap.unique_count).collect(),
    })
}

/// `pool_size - selected`, exact for validated records and pinned to the
/// `i64` bounds otherwise.
fn residual(pool_size: u64, selected: u128) -> i64 {
    let diff = i128::from(pool_size) - selected as i128;
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

/// Integrity checks on the raw snapshots, independent of any aggregation.
pub fn check_snapshots(snapshots: &[Snapshot]) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    for (index, snapshot) in snapshots.iter().enumerate() {
        if index > 0 && snapshot.op < snapshots[index - 1].op {
            warnings.push(IntegrityWarning::OpOutOfOrder {
                index,
                previous: snapshots[index - 1].op,
                op: snapshot.op,
            });
        }

        if snapshot.pool_size < snapshot.unique_count {
            warnings.push(IntegrityWarning::PoolSmallerThanUnique {
                op: snapshot.op,
                pool_size: snapshot.pool_size,
                unique_count: snapshot.unique_count,
            });
        }

        // Saturates for pools that were never validated.
        let pool_sum = snapshot.pool_sum().unwrap_or(u64::MAX);
        if pool_sum != snapshot.pool_size {
            warnings.push(IntegrityWarning::PoolSumMismatch {
                op: snapshot.op,
                pool_size: snapshot.pool_size,
                pool_sum,
            });
        }
    }

    warnings
}
