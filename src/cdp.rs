//! Chrome DevTools Protocol backend for region capture

use crate::capture::RenderBackend;
use crate::{Error, RenderConfig, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::util::{Timeout, Wait};
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Visible when the element has a non-empty box and is not hidden by style.
const VISIBILITY_CHECK: &str = r#"(function(selector){
    const el = document.querySelector(selector);
    if (!el) return false;
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden' && style.display !== 'none';
})"#;

/// Headless Chrome instance with a single tab sized to the canvas
pub struct CdpBackend {
    // Held so the child process lives as long as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl CdpBackend {
    pub fn launch(config: &RenderConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .idle_browser_timeout(Duration::from_millis(config.timeout_ms.max(30_000)))
            .build()
            .map_err(|e| Error::EngineUnavailable(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::EngineUnavailable(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::EngineUnavailable(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

        Ok(Self { _browser: browser, tab })
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        let selector_json = serde_json::to_string(selector)?;
        let script = format!("{}({})", VISIBILITY_CHECK, selector_json);
        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| Error::CaptureError(format!("Visibility check failed: {}", e)))?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl RenderBackend for CdpBackend {
    fn load(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;
        self.tab.wait_until_navigated().map_err(|e| {
            if e.downcast_ref::<Timeout>().is_some() {
                Error::RenderTimeout(timeout.as_millis() as u64)
            } else {
                Error::LoadError(format!("Wait for navigation failed: {}", e))
            }
        })?;
        debug!("loaded {}", url);
        Ok(())
    }

    fn await_region(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let timeout_ms = timeout.as_millis() as u64;
        let ready = Wait::new(timeout, Duration::from_millis(50)).until(|| match self.is_visible(selector) {
            Ok(true) => Some(Ok(())),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        });

        match ready {
            Ok(res) => res,
            Err(_) => {
                // Distinguish "never matched" from "matched but never shown".
                if self.tab.find_element(selector).is_err() {
                    Err(Error::RegionNotFound(selector.to_string()))
                } else {
                    Err(Error::RenderTimeout(timeout_ms))
                }
            }
        }
    }

    fn capture_region(&mut self, selector: &str) -> Result<Vec<u8>> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| Error::RegionNotFound(selector.to_string()))?;
        element
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png)
            .map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))
    }
}
