//! soupviz - structural and temporal metrics from soup simulation records.
//!
//! A simulation record lists which strands produced which, and how the pool
//! looked at a series of operation steps. The `analysis` module turns that
//! into a weighted production graph, degree and mutual-pair metrics, ranked
//! short feedback cycles, and a top-N pool composition over time. The
//! `render` module draws those results as SVG.

pub mod analysis;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

pub use analysis::{analyze, AnalysisBundle, AnalysisParams};
pub use config::SoupvizConfig;
pub use error::{IntegrityWarning, ModelError};
pub use model::SimulationResult;
pub use render::Renderer;
