//! Renderers writing diagrams to disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use graphviz_rust::{
    cmd::{CommandArg, Format, Layout},
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, info};

use armillary_core::model::{Diagram, OutputFormat};

use super::{Renderer, dot::to_dot};
use crate::{config::LayoutProgram, error::RenderError};

/// Executable Graphviz is invoked through, whatever the layout program.
const GRAPHVIZ_BINARY: &str = "dot";

/// Renders diagrams to images by running Graphviz.
///
/// The output format is taken from each diagram's attributes; the file is
/// written to `<output_dir>/<filename>.<extension>`.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    output_dir: PathBuf,
    layout: LayoutProgram,
}

impl GraphvizRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, layout: LayoutProgram) -> Self {
        Self {
            output_dir: output_dir.into(),
            layout,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn layout(&self) -> LayoutProgram {
        self.layout
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, diagram: &Diagram) -> Result<PathBuf, RenderError> {
        let attributes = diagram.attributes();
        let path = self.output_dir.join(attributes.output_file_name());
        debug!(
            layout:% = self.layout,
            format:% = attributes.format(),
            path:% = path.display();
            "Running Graphviz"
        );

        let args = vec![
            CommandArg::Layout(layout_arg(self.layout)),
            CommandArg::Format(format_arg(attributes.format())),
        ];
        let bytes = exec(to_dot(diagram), &mut PrinterContext::default(), args)
            .map_err(|err| tool_error(self.layout, err))?;

        write_output(&path, &bytes)?;
        info!(path:% = path.display(), bytes = bytes.len(); "Diagram rendered");
        Ok(path)
    }
}

/// Writes the DOT source of diagrams without invoking Graphviz.
///
/// The file is always written to `<output_dir>/<filename>.dot`, whatever
/// format the diagram declares.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    output_dir: PathBuf,
}

impl DotRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Renderer for DotRenderer {
    fn render(&self, diagram: &Diagram) -> Result<PathBuf, RenderError> {
        let attributes = diagram.attributes();
        let file_name = format!(
            "{}.{}",
            attributes.filename(),
            OutputFormat::Dot.extension()
        );
        let path = self.output_dir.join(file_name);

        let source = to_dot(diagram).print(&mut PrinterContext::default());
        write_output(&path, source.as_bytes())?;
        info!(path:% = path.display(), bytes = source.len(); "DOT source written");
        Ok(path)
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    fs::write(path, bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn tool_error(layout: LayoutProgram, err: io::Error) -> RenderError {
    if err.kind() == io::ErrorKind::NotFound {
        RenderError::ToolNotFound {
            program: GRAPHVIZ_BINARY.to_string(),
        }
    } else {
        RenderError::Tool {
            program: layout.name().to_string(),
            source: err,
        }
    }
}

fn layout_arg(layout: LayoutProgram) -> Layout {
    match layout {
        LayoutProgram::Dot => Layout::Dot,
        LayoutProgram::Neato => Layout::Neato,
        LayoutProgram::Fdp => Layout::Fdp,
        LayoutProgram::Sfdp => Layout::Sfdp,
        LayoutProgram::Circo => Layout::Circo,
        LayoutProgram::Twopi => Layout::Twopi,
    }
}

fn format_arg(format: OutputFormat) -> Format {
    match format {
        OutputFormat::Png => Format::Png,
        OutputFormat::Jpg => Format::Jpg,
        OutputFormat::Svg => Format::Svg,
        OutputFormat::Pdf => Format::Pdf,
        OutputFormat::Dot => Format::Dot,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use armillary_core::{category::NodeCategory, model::DiagramAttributes, style::EdgeStyle};

    use super::*;
    use crate::{DiagramBuilder, export::renderer_for};

    fn diagram(format: OutputFormat) -> Diagram {
        let attributes = DiagramAttributes::new("Render Test")
            .with_filename("render-test")
            .with_format(format);
        let mut b = DiagramBuilder::new(attributes);
        let a = b.add_node("a", NodeCategory::MobileClient, "Clients").unwrap();
        let c = b.add_node("c", NodeCategory::Logging, "Loki\n:3100").unwrap();
        b.connect(a, c, EdgeStyle::new().with_label("Logs")).unwrap();
        b.finish().unwrap()
    }

    #[test]
    fn test_dot_renderer_writes_source() {
        let dir = tempdir().unwrap();
        let renderer = DotRenderer::new(dir.path());

        let path = renderer.render(&diagram(OutputFormat::Dot)).unwrap();
        assert_eq!(path, dir.path().join("render-test.dot"));

        let source = fs::read_to_string(&path).unwrap();
        assert!(source.contains("digraph"));
        assert!(source.contains("\"a\""));
        assert!(source.contains(r#"label="Loki\n:3100""#));
    }

    #[test]
    fn test_dot_renderer_ignores_declared_format() {
        let dir = tempdir().unwrap();
        let path = DotRenderer::new(dir.path())
            .render(&diagram(OutputFormat::Png))
            .unwrap();
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("dot"));
    }

    #[test]
    fn test_missing_directory_is_a_write_error() {
        let dir = tempdir().unwrap();
        let renderer = DotRenderer::new(dir.path().join("missing"));

        let err = renderer.render(&diagram(OutputFormat::Dot)).unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }));
    }

    #[test]
    fn test_renderer_for_dot_needs_no_graphviz() {
        let dir = tempdir().unwrap();
        let renderer = renderer_for(OutputFormat::Dot, LayoutProgram::Dot, dir.path());

        let path = renderer.render(&diagram(OutputFormat::Dot)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_tool_error_mapping() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "no such file");
        assert!(matches!(
            tool_error(LayoutProgram::Neato, missing),
            RenderError::ToolNotFound { program } if program == "dot"
        ));

        let failed = io::Error::other("syntax error in line 1");
        assert!(matches!(
            tool_error(LayoutProgram::Neato, failed),
            RenderError::Tool { program, .. } if program == "neato"
        ));
    }

    #[test]
    fn test_format_and_layout_mapping() {
        assert!(matches!(format_arg(OutputFormat::Png), Format::Png));
        assert!(matches!(format_arg(OutputFormat::Jpg), Format::Jpg));
        assert!(matches!(format_arg(OutputFormat::Svg), Format::Svg));
        assert!(matches!(format_arg(OutputFormat::Pdf), Format::Pdf));
        assert!(matches!(format_arg(OutputFormat::Dot), Format::Dot));

        assert!(matches!(layout_arg(LayoutProgram::Dot), Layout::Dot));
        assert!(matches!(layout_arg(LayoutProgram::Neato), Layout::Neato));
        assert!(matches!(layout_arg(LayoutProgram::Sfdp), Layout::Sfdp));
        assert!(matches!(layout_arg(LayoutProgram::Twopi), Layout::Twopi));
    }
}
