//! Command-line argument definitions for the Armillary CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every flag has a default, so running `armillary` with no
//! arguments renders both built-in topologies into the working directory.

use clap::Parser;

use crate::topology::TopologySelection;

/// Command-line arguments for the Armillary diagram renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Which built-in topology to render
    #[arg(short, long, value_enum, default_value_t = TopologySelection::All)]
    pub topology: TopologySelection,

    /// Directory the rendered files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Output format (png, jpg, svg, pdf, dot); overrides the configuration
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
