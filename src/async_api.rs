use crate::capture::RenderBackend;
use crate::rendering::{CellRecord, NormalizedImage};
use crate::{pipeline, Error, RenderConfig, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Render(Vec<CellRecord>, Option<String>, oneshot::Sender<Result<NormalizedImage>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly renderer backed by a dedicated worker thread.
///
/// The worker thread owns the rendering backend and runs each pipeline
/// sequentially, so callers can await renders without requiring the
/// backend to be `Send` across tasks.
#[derive(Clone)]
pub struct Renderer {
    cmd_tx: Sender<Command>,
}

impl Renderer {
    /// Spawn the worker and build the backend on it with `make_backend`.
    pub async fn new<F, B>(config: RenderConfig, make_backend: F) -> Result<Self>
    where
        F: FnOnce(&RenderConfig) -> Result<B> + Send + 'static,
        B: RenderBackend + 'static,
    {
        config.validate()?;

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let mut backend = match make_backend(&config) {
                Ok(b) => b,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Render(records, current_time, resp) => {
                        let res = pipeline::run(&mut backend, &records, current_time.as_deref(), &config);
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        drop(backend);
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Launch headless Chrome on the worker thread
    #[cfg(feature = "cdp")]
    pub async fn launch(config: RenderConfig) -> Result<Self> {
        Self::new(config, crate::cdp::CdpBackend::launch).await
    }

    /// Run one pipeline over `records`
    pub async fn render(&self, records: Vec<CellRecord>, current_time: Option<String>) -> Result<NormalizedImage> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Render(records, current_time, tx))
            .map_err(|_| Error::Other("Renderer worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Render canceled: {}", e)))?
    }

    /// Shut down the worker and release the backend.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
