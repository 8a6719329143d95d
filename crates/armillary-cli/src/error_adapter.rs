//! Error adapter for converting ArmillaryError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error gets a
//! stable code and, where the fix is known, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use armillary::{ArmillaryError, BuildError, BuildErrorKind, RenderError};

/// Adapter wrapping an [`ArmillaryError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a ArmillaryError);

impl ErrorAdapter<'_> {
    /// Stable diagnostic code for the wrapped error.
    pub fn code_str(&self) -> &'static str {
        match self.0 {
            ArmillaryError::Io(_) => "armillary::io",
            ArmillaryError::Build(err) => match err.kind() {
                BuildErrorKind::Reference => "armillary::reference",
                BuildErrorKind::Structural => "armillary::structure",
                BuildErrorKind::UnsupportedCategory => "armillary::category",
            },
            ArmillaryError::Render(_) => "armillary::render",
            ArmillaryError::Config(_) => "armillary::config",
            ArmillaryError::Style(_) => "armillary::style",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            ArmillaryError::Build(BuildError::UnknownNode { .. }) => {
                Some("declare both endpoints before connecting them")
            }
            ArmillaryError::Build(BuildError::DuplicateNode { .. }) => {
                Some("node keys must be unique within a diagram")
            }
            ArmillaryError::Build(
                BuildError::UnclosedClusters { .. } | BuildError::UnbalancedCluster { .. },
            ) => Some("close every cluster before closing the diagram"),
            ArmillaryError::Build(BuildError::NoOpenCluster) => {
                Some("`close_cluster` was called more often than `open_cluster`")
            }
            ArmillaryError::Build(BuildError::UnsupportedCategory(_)) => Some(
                "supported categories: generic, load_balancer, storage, time_series_db, \
                 logging, mobile_client, blank, service, dashboard",
            ),
            ArmillaryError::Render(RenderError::ToolNotFound { .. }) => Some(
                "install Graphviz (https://graphviz.org/download/) or use `--format dot`",
            ),
            ArmillaryError::Config(_) => {
                Some("check the `[render]` and `[style]` sections of the configuration file")
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wraps `err` for rendering through a miette report handler.
pub fn to_reportable(err: &ArmillaryError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
