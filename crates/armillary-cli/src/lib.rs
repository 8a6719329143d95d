//! CLI logic for the Armillary diagram renderer.
//!
//! The CLI ships the OpenTelemetry HA deployment diagrams (see [`topology`])
//! and renders them through Graphviz, with optional overrides from a TOML
//! configuration file.

pub mod error_adapter;
pub mod topology;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::{debug, info};

use armillary::{
    ArmillaryError, DiagramGraph,
    config::AppConfig,
    export::renderer_for,
    model::{Node, OutputFormat},
};

use topology::Topology;

/// Run the Armillary CLI application
///
/// Renders every selected topology into `args.output_dir`, creating the
/// directory if needed. The output format is taken from `--format`, then the
/// `[render]` configuration section, then the topology's own default.
///
/// # Errors
///
/// Returns `ArmillaryError` for:
/// - Configuration loading errors and invalid `--format` values
/// - Declaration errors in a topology
/// - Rendering and file I/O errors
pub fn run(args: &Args) -> Result<(), ArmillaryError> {
    info!(
        topology:% = args.topology,
        output_dir = args.output_dir;
        "Rendering topologies"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let format = match &args.format {
        Some(format) => Some(
            format
                .parse::<OutputFormat>()
                .map_err(ArmillaryError::Config)?,
        ),
        None => app_config.render().format(),
    };

    let output_dir = Path::new(&args.output_dir);
    fs::create_dir_all(output_dir)?;

    for topology in args.topology.topologies() {
        render_topology(*topology, &app_config, format, output_dir)?;
    }

    Ok(())
}

fn render_topology(
    topology: Topology,
    app_config: &AppConfig,
    format: Option<OutputFormat>,
    output_dir: &Path,
) -> Result<(), ArmillaryError> {
    let mut attributes = app_config.style().apply(topology.attributes()?)?;
    if let Some(format) = format {
        attributes = attributes.with_format(format);
    }

    let diagram = topology.declare(attributes)?.finish()?;

    let graph = DiagramGraph::from_diagram(&diagram);
    let entry_points = graph.roots().map(Node::label).collect::<Vec<_>>();
    debug!(
        topology = topology.name(),
        entry_points:? = entry_points;
        "Diagram entry points"
    );

    let renderer = renderer_for(
        diagram.attributes().format(),
        app_config.render().layout_program(),
        output_dir,
    );
    let path = renderer.render(&diagram)?;

    info!(
        topology = topology.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        path:? = path;
        "Topology rendered"
    );
    Ok(())
}
