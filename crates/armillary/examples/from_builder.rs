//! Example: Declaring a small deployment diagram with the builder
//!
//! Builds a two-node logging pipeline, prints its entry points, and writes
//! the DOT source to the current directory. Pass `png` as the first argument
//! to render an image instead (requires Graphviz).

use armillary::{
    ArmillaryError, DiagramBuilder, DiagramGraph,
    category::NodeCategory,
    color::Color,
    config::LayoutProgram,
    export::renderer_for,
    model::{DiagramAttributes, OutputFormat},
    style::{EdgeStyle, LineStyle},
};

fn main() -> Result<(), ArmillaryError> {
    let format = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<OutputFormat>())
        .transpose()
        .map_err(ArmillaryError::Config)?
        .unwrap_or(OutputFormat::Dot);

    let attributes = DiagramAttributes::new("Logging Pipeline")
        .with_filename("logging-pipeline")
        .with_format(format);
    let mut builder = DiagramBuilder::new(attributes);

    let apps = builder.add_node("apps", NodeCategory::MobileClient, "Applications")?;
    let (otel, loki) = builder.cluster("Node 1", |b| {
        let otel = b.add_node("otel", NodeCategory::Service, "OTel Aggregator\n:14318")?;
        let loki = b.add_node("loki", NodeCategory::Logging, "Loki\n:3100")?;
        Ok::<_, ArmillaryError>((otel, loki))
    })?;
    let bucket = builder.add_node("bucket", NodeCategory::Storage, "loki-data")?;

    let purple = Color::new("purple").map_err(ArmillaryError::Style)?;
    builder.connect(apps, otel, EdgeStyle::new().with_label("OTLP/HTTP"))?;
    builder.connect(
        otel,
        loki,
        EdgeStyle::new().with_label("Logs").with_color(purple),
    )?;
    builder.connect(
        loki,
        bucket,
        EdgeStyle::new().with_label("Store").with_line(LineStyle::Dashed),
    )?;

    let diagram = builder.finish()?;
    let graph = DiagramGraph::from_diagram(&diagram);
    for root in graph.roots() {
        println!("entry point: {}", root.label());
    }

    let renderer = renderer_for(format, LayoutProgram::Dot, ".");
    let path = renderer.render(&diagram)?;
    println!("wrote {}", path.display());
    Ok(())
}
