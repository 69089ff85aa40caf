//! Trainmap
//!
//! Renders a sparse set of positioned, typed, styled cells into a
//! departure-board style table, captures the table through a headless
//! browser and normalizes the screenshot into the final image.
//!
//! # Pipeline
//!
//! - [`rendering::grid`] resolves sparse records into a dense grid
//! - [`rendering::layout`] composes the grid into a fragment tree
//! - [`capture`] rasterizes a region of the composed document
//! - [`rendering::raster`] applies brightness/contrast and caps the width
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use trainmap::{cdp::CdpBackend, RenderConfig};
//!
//! let records = trainmap::rendering::grid::load_records_from_path("cells.json".as_ref())?;
//! let config = RenderConfig::default();
//! let mut backend = CdpBackend::launch(&config)?;
//! let image = trainmap::pipeline::run(&mut backend, &records, Some("08:15:00"), &config)?;
//! image.save("board.png".as_ref())?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cdp"))]
//! # fn main() {}
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod capture;
pub mod pipeline;
pub mod rendering;
pub mod serve;
pub mod stations;

#[cfg(feature = "cdp")]
pub mod cdp;

// Async facade running the pipeline on a worker thread
pub mod async_api;
pub use async_api::Renderer;

pub use capture::RenderBackend;
pub use rendering::{CellRecord, NormalizeOptions, NormalizedImage, RasterBuffer};
pub use serve::Delivery;

/// Configuration for one pipeline run
///
/// Defaults reproduce the reference recipe: a 1200x820 canvas, the grid
/// `table` as capture region, a 15 second capture budget and the fixed
/// normalization (brightness -20, contrast +40, width capped at 1200).
///
/// # Examples
///
/// ```
/// let cfg = trainmap::RenderConfig::default();
/// assert_eq!(cfg.region_selector, "table");
/// assert_eq!(cfg.normalize.max_width, 1200);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Browser window size
    pub viewport: Viewport,
    /// Budget for loading the document and waiting for the region, in milliseconds
    pub timeout_ms: u64,
    /// CSS selector of the region to capture
    pub region_selector: String,
    /// How the composed document is exposed to the engine
    pub delivery: Delivery,
    pub normalize: NormalizeOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timeout_ms: 15_000,
            region_selector: "table".to_string(),
            delivery: Delivery::Served,
            normalize: NormalizeOptions::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::ConfigError("timeout_ms must be greater than zero".into()));
        }
        if self.region_selector.trim().is_empty() {
            return Err(Error::ConfigError("region selector is empty".into()));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::ConfigError(format!(
                "viewport {}x{} has no area",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.normalize.max_width == 0 {
            return Err(Error::ConfigError("max_width must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: rendering::markup::CANVAS_WIDTH,
            height: rendering::markup::CANVAS_HEIGHT,
        }
    }
}
