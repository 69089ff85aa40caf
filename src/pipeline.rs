//! One render run: records -> grid -> fragment -> raster -> normalized image

use crate::capture::{capture, RenderBackend};
use crate::rendering::{compose, normalize_with, render_html, resolve, CellRecord, NormalizedImage, RasterBuffer};
use crate::{RenderConfig, Result};
use log::info;

/// Resolve, compose and serialize records into a standalone HTML document
pub fn render_document(records: &[CellRecord], current_time: Option<&str>) -> String {
    let grid = resolve(records.iter().cloned());
    render_html(&compose(&grid, current_time))
}

/// Resolve, compose and capture without normalizing
pub fn run_capture<B>(
    backend: &mut B,
    records: &[CellRecord],
    current_time: Option<&str>,
    config: &RenderConfig,
) -> Result<RasterBuffer>
where
    B: RenderBackend + ?Sized,
{
    config.validate()?;

    let grid = resolve(records.iter().cloned());
    info!(
        "resolved {} records into {}x{} grid ({} populated)",
        records.len(),
        grid.max_x() as u64 + 1,
        grid.max_y() as u64 + 1,
        grid.populated()
    );

    let fragment = compose(&grid, current_time);
    capture(backend, &fragment, config)
}

/// Run the full pipeline against `backend`.
///
/// Capture and decode failures abort the run; no fallback image is produced.
pub fn run<B>(
    backend: &mut B,
    records: &[CellRecord],
    current_time: Option<&str>,
    config: &RenderConfig,
) -> Result<NormalizedImage>
where
    B: RenderBackend + ?Sized,
{
    let raster = run_capture(backend, records, current_time, config)?;
    let image = normalize_with(&raster, &config.normalize)?;

    info!("normalized raster to {}x{}", image.width(), image.height());
    Ok(image)
}
