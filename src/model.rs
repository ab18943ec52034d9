//! Typed view over a recorded soup simulation.
//!
//! The record is produced by the simulator as a single JSON document:
//! production relationships observed over the whole run, plus a sequence of
//! pool snapshots. Nothing here computes anything; loading validates the
//! shape and fails fast on malformed input.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Largest `poolSize` or pool total a snapshot may report. The composition
/// residual is signed, so pool totals must fit in an `i64`.
pub const MAX_POOL_TOTAL: u64 = i64::MAX as u64;

/// One observed production relationship: `catalyst` produced `product`
/// `count` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionEdge {
    pub catalyst: String,
    pub product: String,
    pub count: u64,
}

impl ProductionEdge {
    pub fn new(catalyst: impl Into<String>, product: impl Into<String>, count: u64) -> Self {
        Self {
            catalyst: catalyst.into(),
            product: product.into(),
            count,
        }
    }
}

/// Pool state at one operation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Operation counter at which the snapshot was taken.
    pub op: i64,
    /// Strand -> copies present in the pool.
    pub pool: BTreeMap<String, u64>,
    /// Total strands in the pool, as reported by the simulator.
    pub pool_size: u64,
    /// Distinct strands with a non-zero count, as reported by the simulator.
    pub unique_count: u64,
}

impl Snapshot {
    /// Count for `strand`, or 0 when it is absent from this pool.
    pub fn count(&self, strand: &str) -> u64 {
        self.pool.get(strand).copied().unwrap_or(0)
    }

    /// Sum of all counts in the pool, or `None` if it overflows `u64`.
    pub fn pool_sum(&self) -> Option<u64> {
        self.pool
            .values()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
    }
}

/// Simulation configuration. Only `name` is interpreted; the rest of the
/// simulator's settings are kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A complete simulation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub config: SimulationConfig,
    pub production_edges: Vec<ProductionEdge>,
    pub snapshots: Vec<Snapshot>,
}

impl SimulationResult {
    /// Parse and validate a record from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let result: SimulationResult = serde_json::from_str(json)?;
        result.validate()?;
        Ok(result)
    }

    /// Read, parse and validate a record from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Name of the simulation this record belongs to.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.config.name.is_empty() {
            return Err(ModelError::EmptyName);
        }

        for (index, edge) in self.production_edges.iter().enumerate() {
            if edge.catalyst.is_empty() {
                return Err(ModelError::EmptyEdgeEndpoint {
                    index,
                    field: "catalyst",
                });
            }
            if edge.product.is_empty() {
                return Err(ModelError::EmptyEdgeEndpoint {
                    index,
                    field: "product",
                });
            }
            if edge.count == 0 {
                return Err(ModelError::ZeroEdgeCount {
                    index,
                    catalyst: edge.catalyst.clone(),
                    product: edge.product.clone(),
                });
            }
        }

        for (index, snapshot) in self.snapshots.iter().enumerate() {
            if snapshot.pool.keys().any(|strand| strand.is_empty()) {
                return Err(ModelError::EmptyPoolStrand { index });
            }
            let fits = |total: u64| total <= MAX_POOL_TOTAL;
            if !fits(snapshot.pool_size) || !snapshot.pool_sum().is_some_and(fits) {
                return Err(ModelError::PoolTotalTooLarge { index });
            }
        }

        Ok(())
    }
}

/// Stems of every `*.json` file in `dir`, sorted.
pub fn discover(dir: &Path) -> Result<Vec<String>, ModelError> {
    let entries = fs::read_dir(dir).map_err(|source| ModelError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ModelError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "config": {"name": "quest-7", "seed": 11, "rules": ["cut", "swap"]},
        "productionEdges": [
            {"catalyst": "AC", "product": "GT", "count": 3}
        ],
        "snapshots": [
            {"op": 0, "pool": {"AC": 2}, "poolSize": 2, "uniqueCount": 1}
        ]
    }"#;

    #[test]
    fn parses_camel_case_record_and_keeps_extra_config() {
        let result = SimulationResult::from_json_str(RECORD).unwrap();
        assert_eq!(result.name(), "quest-7");
        assert_eq!(result.production_edges, vec![ProductionEdge::new("AC", "GT", 3)]);
        assert_eq!(result.snapshots[0].pool_size, 2);
        assert_eq!(result.snapshots[0].count("AC"), 2);
        assert_eq!(result.snapshots[0].count("TT"), 0);
        assert_eq!(result.config.extra["seed"], serde_json::json!(11));
    }

    #[test]
    fn missing_snapshots_field_is_malformed() {
        let json = r#"{"config": {"name": "x"}, "productionEdges": []}"#;
        let err = SimulationResult::from_json_str(json).unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
        assert!(err.to_string().contains("snapshots"));
    }

    #[test]
    fn missing_config_name_is_malformed() {
        let json = r#"{"config": {}, "productionEdges": [], "snapshots": []}"#;
        assert!(matches!(
            SimulationResult::from_json_str(json),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn negative_pool_count_is_malformed() {
        let json = r#"{"config": {"name": "x"}, "productionEdges": [],
            "snapshots": [{"op": 0, "pool": {"A": -1}, "poolSize": 0, "uniqueCount": 0}]}"#;
        assert!(matches!(
            SimulationResult::from_json_str(json),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn zero_edge_count_is_rejected() {
        let json = r#"{"config": {"name": "x"},
            "productionEdges": [{"catalyst": "A", "product": "B", "count": 0}],
            "snapshots": []}"#;
        let err = SimulationResult::from_json_str(json).unwrap_err();
        assert!(matches!(err, ModelError::ZeroEdgeCount { index: 0, .. }));
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let json = r#"{"config": {"name": "x"},
            "productionEdges": [{"catalyst": "", "product": "B", "count": 1}],
            "snapshots": []}"#;
        assert!(matches!(
            SimulationResult::from_json_str(json),
            Err(ModelError::EmptyEdgeEndpoint {
                field: "catalyst",
                ..
            })
        ));

        let json = r#"{"config": {"name": ""}, "productionEdges": [], "snapshots": []}"#;
        assert!(matches!(
            SimulationResult::from_json_str(json),
            Err(ModelError::EmptyName)
        ));
    }

    #[test]
    fn oversized_pool_totals_are_rejected() {
        let json = format!(
            r#"{{"config": {{"name": "x"}}, "productionEdges": [],
            "snapshots": [{{"op": 0, "pool": {{"X": {}, "Y": 1}}, "poolSize": 1, "uniqueCount": 2}}]}}"#,
            u64::MAX
        );
        assert!(matches!(
            SimulationResult::from_json_str(&json),
            Err(ModelError::PoolTotalTooLarge { index: 0 })
        ));

        let json = format!(
            r#"{{"config": {{"name": "x"}}, "productionEdges": [],
            "snapshots": [{{"op": 0, "pool": {{}}, "poolSize": {}, "uniqueCount": 0}}]}}"#,
            MAX_POOL_TOTAL + 1
        );
        assert!(matches!(
            SimulationResult::from_json_str(&json),
            Err(ModelError::PoolTotalTooLarge { index: 0 })
        ));
    }

    #[test]
    fn huge_edge_counts_are_accepted() {
        let json = format!(
            r#"{{"config": {{"name": "x"}},
            "productionEdges": [{{"catalyst": "A", "product": "B", "count": {}}}],
            "snapshots": []}}"#,
            u64::MAX
        );
        let result = SimulationResult::from_json_str(&json).unwrap();
        assert_eq!(result.production_edges[0].count, u64::MAX);
    }

    #[test]
    fn pool_sum_reports_overflow() {
        let snapshot = Snapshot {
            op: 0,
            pool: [("X".to_string(), u64::MAX), ("Y".to_string(), 1)]
                .into_iter()
                .collect(),
            pool_size: 0,
            unique_count: 2,
        };
        assert_eq!(snapshot.pool_sum(), None);
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = SimulationResult::load(Path::new("/nonexistent/soup.json")).unwrap_err();
        match err {
            ModelError::Io { path, .. } => assert_eq!(path, Path::new("/nonexistent/soup.json")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
