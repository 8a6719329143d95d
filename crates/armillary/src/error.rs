//! Error types for Armillary operations.
//!
//! - [`BuildError`]: a declaration was rejected by the [`DiagramBuilder`]
//! - [`RenderError`]: the rendering collaborator failed
//! - [`ArmillaryError`]: the umbrella type returned at the crate boundary
//!
//! [`DiagramBuilder`]: crate::DiagramBuilder

use std::{io, path::PathBuf};

use thiserror::Error;

use armillary_core::{category::UnsupportedCategory, identifier::Id};

/// Coarse classification of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// An edge referenced a node that was never declared.
    Reference,
    /// Cluster nesting or node declarations are malformed.
    Structural,
    /// A node category outside the supported set was requested.
    UnsupportedCategory,
}

/// A declaration rejected while building a diagram.
///
/// The builder checks every declaration before touching its state, so a
/// rejected call leaves the model exactly as it was.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("edge references undeclared node `{id}`")]
    UnknownNode { id: Id },

    #[error("node `{id}` is already declared")]
    DuplicateNode { id: Id },

    #[error("diagram closed with {} open cluster(s): {}", .open.len(), .open.join(" > "))]
    UnclosedClusters { open: Vec<String> },

    #[error("no open cluster to close")]
    NoOpenCluster,

    #[error("cluster `{label}` was not the innermost open cluster when its scope ended")]
    UnbalancedCluster { label: String },

    #[error(transparent)]
    UnsupportedCategory(#[from] UnsupportedCategory),
}

impl BuildError {
    pub fn kind(&self) -> BuildErrorKind {
        match self {
            Self::UnknownNode { .. } => BuildErrorKind::Reference,
            Self::DuplicateNode { .. }
            | Self::UnclosedClusters { .. }
            | Self::NoOpenCluster
            | Self::UnbalancedCluster { .. } => BuildErrorKind::Structural,
            Self::UnsupportedCategory(_) => BuildErrorKind::UnsupportedCategory,
        }
    }
}

/// Failure of the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Graphviz program `{program}` was not found")]
    ToolNotFound { program: String },

    #[error("Graphviz program `{program}` failed: {source}")]
    Tool {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The main error type for Armillary operations.
#[derive(Debug, Error)]
pub enum ArmillaryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Style error: {0}")]
    Style(String),
}

impl From<UnsupportedCategory> for ArmillaryError {
    fn from(err: UnsupportedCategory) -> Self {
        Self::Build(err.into())
    }
}

#[cfg(test)]
mod tests {
    use armillary_core::category::NodeCategory;

    use super::*;

    #[test]
    fn test_kinds() {
        let unknown = BuildError::UnknownNode {
            id: Id::new("ghost"),
        };
        assert_eq!(unknown.kind(), BuildErrorKind::Reference);
        assert_eq!(BuildError::NoOpenCluster.kind(), BuildErrorKind::Structural);

        let category = "kafka".parse::<NodeCategory>().unwrap_err();
        assert_eq!(
            BuildError::from(category).kind(),
            BuildErrorKind::UnsupportedCategory
        );
    }

    #[test]
    fn test_messages() {
        let err = BuildError::UnclosedClusters {
            open: vec!["Node 1".to_string(), "Metrics Stack".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "diagram closed with 2 open cluster(s): Node 1 > Metrics Stack"
        );

        let err = ArmillaryError::from(BuildError::UnknownNode {
            id: Id::new("ghost"),
        });
        assert_eq!(
            err.to_string(),
            "Build error: edge references undeclared node `ghost`"
        );
    }
}
