//! Analysis pipeline for one simulation record.
//!
//! Production edges feed a graph, which feeds the degree, mutual-pair and
//! cycle stages. Snapshots independently feed the composition stage. The
//! graph lives only for the duration of [`analyze`]; everything handed back
//! is plain owned data.

pub mod composition;
pub mod cycles;
pub mod degree;
pub mod graph;
pub mod mutual;

use crate::error::IntegrityWarning;
use crate::model::SimulationResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

pub use composition::{Composition, CompositionBundle, StrandSeries};
pub use cycles::{CycleReport, RankedCycle};
pub use degree::NodeDegree;
pub use graph::ProductionGraph;
pub use mutual::MutualPair;

/// Bounds passed into each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Strands kept as their own series in the composition.
    pub top_n: usize,
    /// Longest cycle searched for.
    pub max_cycle_len: usize,
    /// Cycles kept in the ranked report.
    pub cycle_report_limit: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            top_n: 20,
            max_cycle_len: 4,
            cycle_report_limit: 20,
        }
    }
}

/// A directed edge as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: u64,
    /// Whether the reverse edge exists too.
    pub mutual: bool,
}

/// Everything needed to draw the production graph without recomputing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphBundle {
    /// Nodes in first-appearance order with their degree metrics.
    pub nodes: Vec<NodeDegree>,
    pub edges: Vec<EdgeRecord>,
    pub mutual_pairs: Vec<MutualPair>,
    pub max_weight: u64,
}

impl GraphBundle {
    pub fn build(graph: &ProductionGraph) -> Self {
        let mutual_ids = mutual::mutual_edges(graph);
        let edges = graph
            .edges()
            .iter()
            .enumerate()
            .map(|(id, e)| EdgeRecord {
                source: graph.node(e.source).to_string(),
                target: graph.node(e.target).to_string(),
                weight: e.weight,
                mutual: mutual_ids.binary_search(&id).is_ok(),
            })
            .collect();

        Self {
            nodes: degree::degree_metrics(graph),
            edges,
            mutual_pairs: mutual::mutual_pairs(graph).into_iter().collect(),
            max_weight: graph.max_weight(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of directed edges that belong to a mutual pair.
    pub fn mutual_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.mutual).count()
    }
}

/// Output of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub name: String,
    pub graph: GraphBundle,
    pub cycles: CycleReport,
    pub composition: CompositionBundle,
    /// Data-integrity findings, in the order they were detected.
    pub warnings: Vec<IntegrityWarning>,
}

impl AnalysisBundle {
    /// SHA-256 of the serialized bundle, as lowercase hex. Identical input
    /// always yields the same fingerprint.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}

/// Run every stage over `result`.
pub fn analyze(result: &SimulationResult, params: &AnalysisParams) -> AnalysisBundle {
    let name = result.name().to_string();

    let graph = ProductionGraph::from_edges(&result.production_edges);
    debug!(
        simulation = %name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built production graph"
    );
    if graph.edge_count() == 0 {
        info!(simulation = %name, "no production edges, nothing to show for the graph");
    }

    let graph_bundle = GraphBundle::build(&graph);
    let cycles = cycles::rank_cycles(&graph, params.max_cycle_len, params.cycle_report_limit);
    debug!(
        simulation = %name,
        found = cycles.total_found,
        max_len = cycles.max_len,
        "enumerated cycles"
    );
    drop(graph);

    let mut warnings = composition::check_snapshots(&result.snapshots);
    let composition = composition::aggregate(&result.snapshots, params.top_n);
    match &composition {
        CompositionBundle::Ready(c) => {
            debug!(
                simulation = %name,
                snapshots = c.ops.len(),
                selected = c.series.len(),
                "aggregated pool composition"
            );
            warnings.extend(c.negative_other_warnings());
        }
        CompositionBundle::Skipped { snapshot_count } => {
            info!(
                simulation = %name,
                snapshot_count,
                "too few snapshots, skipping composition"
            );
        }
    }

    for warning in &warnings {
        warn!(simulation = %name, "{warning}");
    }

    AnalysisBundle {
        name,
        graph: graph_bundle,
        cycles,
        composition,
        warnings,
    }
}
