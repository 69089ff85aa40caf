//! Region capture against an external rendering engine.
//!
//! The engine is abstracted behind [`RenderBackend`] so the pipeline can run
//! against the CDP backend (feature `cdp`) or an in-process fake in tests.

use crate::rendering::{render_html, DocumentFragment, RasterBuffer};
use crate::serve::DeliveredDocument;
use crate::{Error, RenderConfig, Result};
use log::{debug, info};
use std::time::{Duration, Instant};

/// The three operations the pipeline needs from a rendering engine
pub trait RenderBackend {
    /// Navigate to `url` and wait for the document to finish loading
    fn load(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Block until the element matched by `selector` is laid out and visible.
    ///
    /// Fails with `RegionNotFound` when the selector matches nothing and
    /// with `RenderTimeout` when it matches but never becomes visible.
    fn await_region(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Screenshot the element matched by `selector` as PNG bytes
    fn capture_region(&mut self, selector: &str) -> Result<Vec<u8>>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn load(&mut self, url: &str, timeout: Duration) -> Result<()> {
        (**self).load(url, timeout)
    }

    fn await_region(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        (**self).await_region(selector, timeout)
    }

    fn capture_region(&mut self, selector: &str) -> Result<Vec<u8>> {
        (**self).capture_region(selector)
    }
}

/// Overall time budget shared by the load and the region wait
struct Deadline {
    at: Instant,
    budget_ms: u64,
}

impl Deadline {
    fn new(budget_ms: u64) -> Self {
        Self {
            at: Instant::now() + Duration::from_millis(budget_ms),
            budget_ms,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    fn remaining(&self) -> Result<Duration> {
        self.at
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
            .ok_or(Error::RenderTimeout(self.budget_ms))
    }
}

/// Rasterize the configured region of the composed document.
///
/// The document is exposed through `config.delivery` for the duration of
/// this call only; it is released on success and on every error path.
pub fn capture<B>(backend: &mut B, fragment: &DocumentFragment, config: &RenderConfig) -> Result<RasterBuffer>
where
    B: RenderBackend + ?Sized,
{
    let html = render_html(fragment);
    let deadline = Deadline::new(config.timeout_ms);
    let selector = config.region_selector.as_str();

    let document = DeliveredDocument::open(config.delivery, html)?;
    debug!("document delivered at {}", document.url());

    // A load that fails once the budget is spent counts as a timeout.
    match backend.load(document.url(), deadline.remaining()?) {
        Err(Error::RenderTimeout(_)) => return Err(Error::RenderTimeout(config.timeout_ms)),
        Err(_) if deadline.expired() => return Err(Error::RenderTimeout(config.timeout_ms)),
        other => other?,
    }

    match backend.await_region(selector, deadline.remaining()?) {
        Err(Error::RenderTimeout(_)) => return Err(Error::RenderTimeout(config.timeout_ms)),
        other => other?,
    }

    let png = backend.capture_region(selector)?;
    drop(document);

    let raster = RasterBuffer::from_encoded(png)?;
    info!("captured region '{}' at {}x{}", selector, raster.width, raster.height);
    Ok(raster)
}
