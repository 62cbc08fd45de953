//! Command-line argument definitions for the Boxes CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. The `render` and `validate` subcommands take the input
//! document; configuration file selection and logging verbosity are global.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the Boxes diagram tool
#[derive(Parser, Debug)]
#[command(name = "boxes", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a .boxes.yaml file to SVG and/or PNG
    Render(RenderArgs),

    /// Validate a .boxes.yaml file without rendering
    Validate {
        /// Path to the input file
        input: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Path to the input file
    pub input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,

    /// Output path without extension [default: input without .boxes.yaml]
    #[arg(short, long)]
    pub output: Option<String>,

    /// PNG resolution [default: the document's dpi, 150 if unset]
    #[arg(long)]
    pub dpi: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Both,
}

impl OutputFormat {
    pub fn includes_svg(self) -> bool {
        matches!(self, Self::Svg | Self::Both)
    }

    pub fn includes_png(self) -> bool {
        matches!(self, Self::Png | Self::Both)
    }
}
