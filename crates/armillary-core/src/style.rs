//! Edge styling: line patterns, arrow direction and the combined [`EdgeStyle`].
//!
//! # Overview
//!
//! - [`LineStyle`]: the stroke pattern of a connector (solid, dashed, dotted, bold)
//! - [`EdgeDirection`]: where arrowheads are drawn
//! - [`EdgeStyle`]: label, color, line style and direction of one edge
//!
//! The names accepted by the `FromStr` implementations are the Graphviz
//! attribute values, so a style read from text maps straight onto the DOT
//! output.
//!
//! ```
//! use armillary_core::{color::Color, style::{EdgeDirection, EdgeStyle, LineStyle}};
//!
//! let upload = EdgeStyle::new()
//!     .with_label("Upload")
//!     .with_color(Color::new("purple").unwrap())
//!     .with_line(LineStyle::Bold);
//!
//! assert_eq!(upload.label(), Some("Upload"));
//! assert_eq!(upload.direction(), EdgeDirection::Forward);
//! ```

use std::{fmt, str::FromStr};

use crate::color::Color;

/// The stroke pattern of an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Solid line drawn with a heavier pen
    Bold,
}

impl LineStyle {
    /// Returns the Graphviz `style` attribute value.
    pub fn to_dot_value(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
        }
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "bold" => Ok(Self::Bold),
            _ => Err(format!(
                "invalid line style `{s}`, valid values: solid, dashed, dotted, bold"
            )),
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_dot_value())
    }
}

/// Where arrowheads are drawn on an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// Arrowhead at the target (`->`)
    #[default]
    Forward,
    /// Arrowhead at the source (`<-`)
    Backward,
    /// Arrowheads at both ends (`<->`)
    Bidirectional,
    /// Plain connector without arrowheads (`-`)
    Plain,
}

impl EdgeDirection {
    /// Returns the Graphviz `dir` attribute value.
    pub fn to_dot_value(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "back",
            Self::Bidirectional => "both",
            Self::Plain => "none",
        }
    }

    /// Returns `true` if the edge carries at least one arrowhead.
    pub fn is_directed(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

impl FromStr for EdgeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "->" | "forward" => Ok(Self::Forward),
            "<-" | "back" => Ok(Self::Backward),
            "<->" | "both" => Ok(Self::Bidirectional),
            "-" | "none" => Ok(Self::Plain),
            _ => Err(format!("invalid edge direction `{s}`")),
        }
    }
}

/// Visual attributes of one edge.
///
/// An edge without a color is drawn with the diagram's default edge color.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EdgeStyle {
    label: Option<String>,
    color: Option<Color>,
    line: LineStyle,
    direction: EdgeDirection,
}

impl EdgeStyle {
    /// Creates an unlabeled, solid, forward edge style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label text. Line breaks are kept.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    pub fn with_direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_style_from_str() {
        assert_eq!("solid".parse::<LineStyle>(), Ok(LineStyle::Solid));
        assert_eq!("dashed".parse::<LineStyle>(), Ok(LineStyle::Dashed));
        assert_eq!("dotted".parse::<LineStyle>(), Ok(LineStyle::Dotted));
        assert_eq!("bold".parse::<LineStyle>(), Ok(LineStyle::Bold));
        assert!("wavy".parse::<LineStyle>().is_err());
    }

    #[test]
    fn test_line_style_dot_value_parses_back() {
        for style in [
            LineStyle::Solid,
            LineStyle::Dashed,
            LineStyle::Dotted,
            LineStyle::Bold,
        ] {
            assert_eq!(style.to_dot_value().parse::<LineStyle>(), Ok(style));
        }
    }

    #[test]
    fn test_edge_direction_arrows() {
        assert_eq!("->".parse::<EdgeDirection>(), Ok(EdgeDirection::Forward));
        assert_eq!("<-".parse::<EdgeDirection>(), Ok(EdgeDirection::Backward));
        assert_eq!(
            "<->".parse::<EdgeDirection>(),
            Ok(EdgeDirection::Bidirectional)
        );
        assert_eq!("-".parse::<EdgeDirection>(), Ok(EdgeDirection::Plain));
        assert!("=>".parse::<EdgeDirection>().is_err());
    }

    #[test]
    fn test_edge_direction_dot_values() {
        assert_eq!(EdgeDirection::Forward.to_dot_value(), "forward");
        assert_eq!(EdgeDirection::Backward.to_dot_value(), "back");
        assert_eq!(EdgeDirection::Bidirectional.to_dot_value(), "both");
        assert_eq!(EdgeDirection::Plain.to_dot_value(), "none");
        assert!(!EdgeDirection::Plain.is_directed());
        assert!(EdgeDirection::Backward.is_directed());
    }

    #[test]
    fn test_edge_style_defaults() {
        let style = EdgeStyle::new();
        assert_eq!(style.label(), None);
        assert_eq!(style.color(), None);
        assert_eq!(style.line(), LineStyle::Solid);
        assert_eq!(style.direction(), EdgeDirection::Forward);
    }

    #[test]
    fn test_edge_style_builder() {
        let red = Color::new("red").unwrap();
        let style = EdgeStyle::new()
            .with_label("Scrape")
            .with_color(red)
            .with_line(LineStyle::Dashed)
            .with_direction(EdgeDirection::Plain);

        assert_eq!(style.label(), Some("Scrape"));
        assert_eq!(style.color(), Some(red));
        assert_eq!(style.line(), LineStyle::Dashed);
        assert_eq!(style.direction(), EdgeDirection::Plain);
    }
}
