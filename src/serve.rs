//! Scoped delivery of a composed document to the rendering engine.
//!
//! Both mechanisms yield a URL the engine can load and release their
//! resource on drop: the loopback server stops and its thread is joined,
//! the temporary file is removed.

use crate::{Error, Result};
use log::{debug, warn};
use std::io::Write;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::JoinHandle;
use tiny_http::{Header, Response, Server};

/// How the document reaches the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Loopback HTTP server on an ephemeral port
    #[default]
    Served,
    /// Temporary file loaded through a `file://` URL
    LocalFile,
}

impl std::str::FromStr for Delivery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "served" | "http" => Ok(Delivery::Served),
            "file" | "local" => Ok(Delivery::LocalFile),
            other => Err(Error::ConfigError(format!("unknown delivery mode '{}'", other))),
        }
    }
}

/// A document exposed to the engine for the lifetime of this value
pub enum DeliveredDocument {
    Served(ServedDocument),
    Local(LocalDocument),
}

impl DeliveredDocument {
    pub fn open(mode: Delivery, html: String) -> Result<Self> {
        match mode {
            Delivery::Served => Ok(DeliveredDocument::Served(ServedDocument::start(html)?)),
            Delivery::LocalFile => Ok(DeliveredDocument::Local(LocalDocument::write(&html)?)),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            DeliveredDocument::Served(s) => s.url(),
            DeliveredDocument::Local(l) => l.url(),
        }
    }
}

/// Serves one HTML document on `127.0.0.1:<ephemeral>` until dropped
pub struct ServedDocument {
    server: Arc<Server>,
    url: String,
    handle: Option<JoinHandle<()>>,
}

impl ServedDocument {
    pub fn start(html: String) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let server = Server::from_listener(listener, None)
            .map_err(|e| Error::Other(format!("Failed to start document server: {}", e)))?;
        let server = Arc::new(server);

        let worker = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            let content_type = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=UTF-8"[..]).ok();
            // `recv` errors once the server is unblocked on drop.
            while let Ok(request) = worker.recv() {
                debug!("serving document for {}", request.url());
                let mut response = Response::from_string(html.as_str());
                if let Some(header) = content_type.clone() {
                    response = response.with_header(header);
                }
                if let Err(e) = request.respond(response) {
                    warn!("Failed to respond with document: {}", e);
                }
            }
        });

        Ok(Self {
            server,
            url: format!("http://127.0.0.1:{}/", port),
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ServedDocument {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!("document server at {} stopped", self.url);
    }
}

/// Document written to a temporary `.html` file, removed on drop
pub struct LocalDocument {
    file: tempfile::NamedTempFile,
    url: String,
}

impl LocalDocument {
    pub fn write(html: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("trainmap-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;

        let url = url::Url::from_file_path(file.path())
            .map_err(|_| Error::Other(format!("Not an absolute path: {}", file.path().display())))?
            .to_string();

        Ok(Self { file, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}
