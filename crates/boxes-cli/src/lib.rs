//! CLI logic for the Boxes diagram tool.
//!
//! `render` reads a document, validates it and writes `<base>.svg` and/or
//! `<base>.png`; `validate` only checks the document.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, OutputFormat, RenderArgs};

use std::{fs, path::PathBuf};

use log::info;

use boxes::{BoxesError, DiagramBuilder, semantic::Diagram};

/// Output path base: the input path without `.boxes.yaml` or `.yaml`.
///
/// # Examples
///
/// ```
/// # use boxes_cli::output_base;
/// assert_eq!(output_base("docs/system.boxes.yaml"), "docs/system");
/// assert_eq!(output_base("context.yaml"), "context");
/// assert_eq!(output_base("notes.txt"), "notes.txt");
/// ```
pub fn output_base(input: &str) -> &str {
    input
        .strip_suffix(".boxes.yaml")
        .or_else(|| input.strip_suffix(".yaml"))
        .unwrap_or(input)
}

fn load(builder: &DiagramBuilder, input: &str) -> Result<Diagram, BoxesError> {
    let source = fs::read_to_string(input)?;
    let diagram = builder.parse(&source)?;
    builder.validate(&diagram)?;
    Ok(diagram)
}

/// Run the Boxes CLI application
///
/// # Errors
///
/// Returns `BoxesError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - YAML errors
/// - Validation errors (before any output is written)
/// - Layout and rendering errors
pub fn run(args: &Args) -> Result<(), BoxesError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = DiagramBuilder::new(app_config);

    match &args.command {
        Command::Validate { input } => {
            info!(input_path = input; "Validating diagram");
            let diagram = load(&builder, input)?;
            info!(
                input_path = input,
                diagram = diagram.name().unwrap_or_default();
                "Diagram is valid"
            );
            Ok(())
        }
        Command::Render(render) => run_render(&builder, render),
    }
}

fn run_render(builder: &DiagramBuilder, args: &RenderArgs) -> Result<(), BoxesError> {
    info!(input_path = args.input; "Processing diagram");
    let diagram = load(builder, &args.input)?;

    info!(diagram = diagram.name().unwrap_or_default(); "Laying out diagram");
    let svg = builder.render_svg(&diagram)?;

    let base = args
        .output
        .as_deref()
        .unwrap_or_else(|| output_base(&args.input));

    if args.format.includes_svg() {
        let path = PathBuf::from(format!("{base}.svg"));
        fs::write(&path, &svg)?;
        info!(output_file = path.display().to_string(); "SVG written");
    }

    if args.format.includes_png() {
        let dpi = args.dpi.unwrap_or_else(|| diagram.dpi());
        let png = render_png(builder, &svg, dpi)?;
        let path = PathBuf::from(format!("{base}.png"));
        fs::write(&path, png)?;
        info!(output_file = path.display().to_string(), dpi; "PNG written");
    }

    Ok(())
}

#[cfg(feature = "png")]
fn render_png(builder: &DiagramBuilder, svg: &str, dpi: u32) -> Result<Vec<u8>, BoxesError> {
    builder.render_png(svg, dpi)
}

#[cfg(not(feature = "png"))]
fn render_png(_builder: &DiagramBuilder, _svg: &str, _dpi: u32) -> Result<Vec<u8>, BoxesError> {
    Err(BoxesError::Config(
        "PNG output requires the `png` feature".to_string(),
    ))
}
