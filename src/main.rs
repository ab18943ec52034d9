//! soupviz CLI - render production graphs, pool composition and cycle tables
//! for recorded soup simulations.

use anyhow::{Context, Result};
use clap::Parser;
use soupviz::config::SoupvizConfig;
use soupviz::layout::SpringLayout;
use soupviz::model::{self, SimulationResult};
use soupviz::render::{CompositionRenderer, CycleRenderer, GraphRenderer, Renderer};
use soupviz::{analyze, AnalysisParams};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "soupviz")]
#[command(about = "Visualize soup simulation results")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "soupviz.toml")]
    config: PathBuf,

    /// Directory holding <name>.json records; artifacts are written next to them
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Simulation names to process; every record in the data directory when omitted
    names: Vec<String>,
}

fn renderers(config: &SoupvizConfig) -> Vec<Box<dyn Renderer>> {
    let layout = SpringLayout::new(config.graph.layout_iterations, config.graph.layout_seed);
    vec![
        Box::new(
            GraphRenderer::new(config.output.width, config.output.height)
                .with_labels(config.graph.label_count)
                .with_layout(layout),
        ),
        Box::new(CompositionRenderer::new(
            config.output.chart_width,
            config.output.chart_height,
        )),
        Box::new(CycleRenderer::default()),
    ]
}

fn process(
    name: &str,
    data_dir: &Path,
    params: &AnalysisParams,
    renderers: &[Box<dyn Renderer>],
) -> Result<()> {
    println!("\nProcessing: {}", name);
    let path = data_dir.join(format!("{}.json", name));
    let result = SimulationResult::load(&path)?;

    let bundle = analyze(&result, params);
    tracing::debug!(simulation = %name, fingerprint = %bundle.fingerprint()?, "analysis complete");

    for renderer in renderers {
        let Some(svg) = renderer.render(&bundle) else {
            println!("  Nothing to show, skipping {}", renderer.name());
            continue;
        };
        let out_path = data_dir.join(format!(
            "{}_{}.{}",
            name,
            renderer.name(),
            renderer.extension()
        ));
        fs::write(&out_path, svg)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        println!("  Saved {}", out_path.display());
    }

    Ok(())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("soupviz=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = SoupvizConfig::load(&cli.config)?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.directory.clone());
    let params = config.analysis.params();
    let renderers = renderers(&config);

    let names = if cli.names.is_empty() {
        model::discover(&data_dir)?
    } else {
        cli.names
    };

    let mut failed = 0;
    for name in &names {
        if let Err(err) = process(name, &data_dir, &params, &renderers) {
            tracing::error!(simulation = %name, "{err:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("{} of {} simulation(s) failed", failed, names.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
