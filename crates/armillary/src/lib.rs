//! Armillary - Infrastructure diagrams as code.
//!
//! Deployment diagrams are declared through [`DiagramBuilder`]: nodes with a
//! visual [`category`](category::NodeCategory), nested clusters that group
//! them, and styled edges between them. Closing the builder yields an
//! immutable [`model::Diagram`] that an [`export::Renderer`] turns into an
//! image through Graphviz.
//!
//! # Example
//!
//! ```rust,no_run
//! use armillary::{
//!     DiagramBuilder,
//!     category::NodeCategory,
//!     config::LayoutProgram,
//!     export::renderer_for,
//!     model::DiagramAttributes,
//!     style::EdgeStyle,
//! };
//!
//! let attributes = DiagramAttributes::new("Logging").with_filename("logging");
//! let mut builder = DiagramBuilder::new(attributes);
//! let otel = builder.add_node("otel", NodeCategory::Service, "OTel Aggregator")?;
//! let loki = builder.add_node("loki", NodeCategory::Logging, "Loki\n:3100")?;
//! builder.connect(otel, loki, EdgeStyle::new().with_label("Logs"))?;
//!
//! let format = builder.attributes().format();
//! let renderer = renderer_for(format, LayoutProgram::Dot, "out");
//! let path = builder.close(renderer.as_ref())?;
//! println!("wrote {}", path.display());
//! # Ok::<(), armillary::ArmillaryError>(())
//! ```

pub mod config;
pub mod export;

mod builder;
mod error;
mod structure;

pub use armillary_core::{category, color, identifier, model, style};

pub use builder::DiagramBuilder;
pub use error::{ArmillaryError, BuildError, BuildErrorKind, RenderError};
pub use structure::DiagramGraph;
