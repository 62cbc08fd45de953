//! PNG rasterisation of rendered SVG documents.
//!
//! The SVG is parsed with `usvg` (system fonts loaded so labels render) and
//! painted onto a white pixmap with `resvg`, scaled from the 96 DPI CSS
//! reference resolution to the requested one.

use log::{debug, info};
use resvg::tiny_skia;

use super::Error;

/// Resolution SVG user units are defined at.
const CSS_DPI: f32 = 96.0;

/// Rasterises `svg` at `dpi` and encodes the result as PNG.
///
/// # Errors
///
/// Returns [`Error::Render`] when the SVG cannot be parsed, when the scaled
/// image is empty or too large to allocate, or when PNG encoding fails.
pub fn export_png(svg: &str, dpi: u32) -> Result<Vec<u8>, Error> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| Error::Render(format!("Failed to parse SVG: {err}")))?;

    let scale = dpi as f32 / CSS_DPI;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    debug!(dpi, width, height; "Rasterising SVG");

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        Error::Render(format!("Cannot allocate a {width}x{height} pixmap"))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let png = pixmap
        .encode_png()
        .map_err(|err| Error::Render(format!("Failed to encode PNG: {err}")))?;
    info!(width, height, bytes = png.len(); "PNG rendered");
    Ok(png)
}
