//! Configuration types for Armillary rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to the defaults baked
//! into the diagram itself.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Which Graphviz program and output format to use.
//! - [`StyleConfig`] - Overrides applied on top of a diagram's own attributes.
//!
//! # Example
//!
//! ```
//! # use armillary::config::{AppConfig, LayoutProgram};
//! let config = AppConfig::default();
//! assert_eq!(config.render().layout_program(), LayoutProgram::Dot);
//! assert!(config.render().format().is_none());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use armillary_core::{
    color::Color,
    model::{DiagramAttributes, Font, OutputFormat},
};

use crate::error::ArmillaryError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Graphviz layout program used to position the graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutProgram {
    /// Hierarchical layout (default)
    #[default]
    Dot,
    /// Spring model layout
    Neato,
    /// Force-directed placement
    Fdp,
    /// Scalable force-directed placement
    Sfdp,
    /// Circular layout
    Circo,
    /// Radial layout
    Twopi,
}

impl LayoutProgram {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Neato => "neato",
            Self::Fdp => "fdp",
            Self::Sfdp => "sfdp",
            Self::Circo => "circo",
            Self::Twopi => "twopi",
        }
    }
}

impl FromStr for LayoutProgram {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(Self::Dot),
            "neato" => Ok(Self::Neato),
            "fdp" => Ok(Self::Fdp),
            "sfdp" => Ok(Self::Sfdp),
            "circo" => Ok(Self::Circo),
            "twopi" => Ok(Self::Twopi),
            _ => Err(format!("unsupported layout program `{s}`")),
        }
    }
}

impl fmt::Display for LayoutProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How diagrams are handed to Graphviz.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RenderConfig {
    /// Graphviz program used for layout.
    #[serde(default)]
    layout_program: LayoutProgram,

    /// Output format overriding the one declared by each diagram.
    #[serde(default)]
    format: Option<OutputFormat>,
}

impl RenderConfig {
    pub fn new(layout_program: LayoutProgram, format: Option<OutputFormat>) -> Self {
        Self {
            layout_program,
            format,
        }
    }

    pub fn layout_program(&self) -> LayoutProgram {
        self.layout_program
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }
}

/// Style overrides applied to every rendered diagram.
///
/// Colors are kept as strings until [`StyleConfig::apply`] so that a bad
/// value is reported when it is used, together with the offending field.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Font face for titles, cluster labels, node labels and edge labels.
    #[serde(default)]
    font_name: Option<String>,

    /// Diagram background color, as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Fill behind clusters, as a CSS color string.
    #[serde(default)]
    cluster_background_color: Option<String>,

    /// Color of edges that do not set their own, as a CSS color string.
    #[serde(default)]
    edge_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if not configured.
    ///
    /// # Errors
    ///
    /// Returns [`ArmillaryError::Config`] if the color string is invalid.
    pub fn background_color(&self) -> Result<Option<Color>, ArmillaryError> {
        parse_color("background_color", self.background_color.as_deref())
    }

    /// Returns the parsed cluster fill [`Color`], or `None` if not configured.
    pub fn cluster_background_color(&self) -> Result<Option<Color>, ArmillaryError> {
        parse_color(
            "cluster_background_color",
            self.cluster_background_color.as_deref(),
        )
    }

    /// Returns the parsed default edge [`Color`], or `None` if not configured.
    pub fn edge_color(&self) -> Result<Option<Color>, ArmillaryError> {
        parse_color("edge_color", self.edge_color.as_deref())
    }

    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    /// Applies the configured overrides to `attributes`.
    ///
    /// Font overrides keep the sizes already set on the diagram.
    pub fn apply(
        &self,
        attributes: DiagramAttributes,
    ) -> Result<DiagramAttributes, ArmillaryError> {
        let mut attributes = attributes;

        if let Some(name) = self.font_name() {
            let graph = Font::new(name, attributes.graph_font().size());
            let node = Font::new(name, attributes.node_font().size());
            let edge = Font::new(name, attributes.edge_font().size());
            attributes = attributes
                .with_graph_font(graph)
                .with_node_font(node)
                .with_edge_font(edge);
        }
        if let Some(color) = self.background_color()? {
            attributes = attributes.with_background_color(color);
        }
        if let Some(color) = self.cluster_background_color()? {
            attributes = attributes.with_cluster_color(color);
        }
        if let Some(color) = self.edge_color()? {
            attributes = attributes.with_edge_color(color);
        }

        Ok(attributes)
    }
}

fn parse_color(field: &str, value: Option<&str>) -> Result<Option<Color>, ArmillaryError> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| ArmillaryError::Config(format!("invalid `{field}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_program_names() {
        for program in [
            LayoutProgram::Dot,
            LayoutProgram::Neato,
            LayoutProgram::Fdp,
            LayoutProgram::Sfdp,
            LayoutProgram::Circo,
            LayoutProgram::Twopi,
        ] {
            assert_eq!(program.name().parse::<LayoutProgram>(), Ok(program));
        }
        assert!("osage".parse::<LayoutProgram>().is_err());
    }

    #[test]
    fn test_empty_style_leaves_attributes_untouched() {
        let attributes = DiagramAttributes::new("Untouched");
        let applied = StyleConfig::default().apply(attributes.clone()).unwrap();
        assert_eq!(applied, attributes);
    }

    #[test]
    fn test_style_overrides() {
        let style = StyleConfig {
            font_name: Some("DejaVu Sans".to_string()),
            background_color: Some("white".to_string()),
            cluster_background_color: Some("#e5f5fd".to_string()),
            edge_color: Some("gray".to_string()),
        };
        let attributes = DiagramAttributes::new("Styled")
            .with_node_font(Font::new("Sans-Serif Bold", 14.0));

        let applied = style.apply(attributes).unwrap();
        assert_eq!(applied.node_font(), &Font::new("DejaVu Sans", 14.0));
        assert_eq!(applied.edge_font().name(), "DejaVu Sans");
        assert_eq!(applied.background_color().unwrap().to_hex(), "#ffffff");
        assert_eq!(applied.cluster_color().unwrap().to_hex(), "#e5f5fd");
        assert_eq!(applied.edge_color().unwrap().to_hex(), "#808080");
    }

    #[test]
    fn test_invalid_color_names_the_field() {
        let style = StyleConfig {
            background_color: Some("not-a-color".to_string()),
            ..StyleConfig::default()
        };
        let err = style.apply(DiagramAttributes::new("Broken")).unwrap_err();
        assert!(matches!(&err, ArmillaryError::Config(msg) if msg.contains("background_color")));
    }
}
