//! Export functionality for Armillary diagrams.
//!
//! This module provides the [`Renderer`] trait, the seam between a closed
//! [`Diagram`] and the artifact written to disk. It is the final stage in the
//! Armillary pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramBuilder
//!     ↓ finish
//! Diagram
//!     ↓ dot::to_dot (this module)
//! Graphviz digraph
//!     ↓ Renderer::render (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`GraphvizRenderer`]: lays the graph out with Graphviz and writes an image
//! - [`DotRenderer`]: writes the DOT source without invoking Graphviz
//!
//! Use [`renderer_for`] to pick one from an [`OutputFormat`].
//!
//! # Error Handling
//!
//! Rendering returns [`RenderError`], which converts into
//! [`ArmillaryError::Render`] at the crate boundary.
//!
//! [`ArmillaryError::Render`]: crate::ArmillaryError::Render

/// DOT translation of the diagram model.
pub mod dot;

mod graphviz;

use std::path::{Path, PathBuf};

use armillary_core::model::{Diagram, OutputFormat};

use crate::{config::LayoutProgram, error::RenderError};

pub use graphviz::{DotRenderer, GraphvizRenderer};

/// Abstraction for rendering backends.
///
/// Implementors turn a closed [`Diagram`] into a file. The diagram's
/// [`DiagramAttributes`](armillary_core::model::DiagramAttributes) decide the
/// file name; the renderer decides the directory.
pub trait Renderer {
    /// Renders `diagram` and returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ToolNotFound`] if the layout tool is missing,
    /// [`RenderError::Tool`] if it fails, or [`RenderError::Write`] if the
    /// output cannot be written.
    fn render(&self, diagram: &Diagram) -> Result<PathBuf, RenderError>;
}

/// Returns the renderer for `format`.
///
/// [`OutputFormat::Dot`] is written directly as source; every other format
/// goes through Graphviz using `layout`.
pub fn renderer_for(
    format: OutputFormat,
    layout: LayoutProgram,
    output_dir: impl AsRef<Path>,
) -> Box<dyn Renderer> {
    let output_dir = output_dir.as_ref().to_path_buf();
    match format {
        OutputFormat::Dot => Box::new(DotRenderer::new(output_dir)),
        _ => Box::new(GraphvizRenderer::new(output_dir, layout)),
    }
}
