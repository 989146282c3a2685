//! Operator acknowledgment between provisioning and teardown

use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{oneshot, watch};

const PROMPT: &str = "Press Enter to continue and delete the sample resources";

/// How a pause ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The operator confirmed (or input reached EOF)
    Acknowledged,
    /// The wait was cancelled through a [`CancelHandle`]
    Cancelled,
    /// No wait was requested
    Skipped,
}

/// Suspension point before teardown
#[async_trait]
pub trait Pause: Send {
    /// Line shown to the operator before waiting, if any
    fn prompt(&self) -> Option<&str>;

    async fn wait(&mut self) -> io::Result<PauseOutcome>;
}

/// Cancels a [`LinePause`] or [`StdinPause`] from elsewhere (e.g., a Ctrl-C handler)
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Resolve with the first of `read` finishing or `cancelled` flipping to true
async fn read_or_cancel<F>(
    read: F,
    cancelled: &mut watch::Receiver<bool>,
) -> io::Result<PauseOutcome>
where
    F: Future<Output = io::Result<()>> + Send,
{
    if *cancelled.borrow() {
        return Ok(PauseOutcome::Cancelled);
    }

    tokio::select! {
        read = read => {
            read?;
            Ok(PauseOutcome::Acknowledged)
        }
        // A dropped handle disables this branch instead of cancelling
        Ok(_) = cancelled.wait_for(|c| *c) => {
            tracing::debug!("Operator wait cancelled");
            Ok(PauseOutcome::Cancelled)
        }
    }
}

/// Waits for one line from an async reader, or for cancellation
pub struct LinePause<R> {
    reader: R,
    cancelled: watch::Receiver<bool>,
}

impl<R> LinePause<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> (Self, CancelHandle) {
        let (handle, cancelled) = CancelHandle::new();
        (Self { reader, cancelled }, handle)
    }
}

#[async_trait]
impl<R> Pause for LinePause<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn prompt(&self) -> Option<&str> {
        Some(PROMPT)
    }

    async fn wait(&mut self) -> io::Result<PauseOutcome> {
        let reader = &mut self.reader;
        let read = async move {
            let mut line = String::new();
            reader.read_line(&mut line).await.map(|_| ())
        };
        read_or_cancel(read, &mut self.cancelled).await
    }
}

/// Waits for one line on standard input, or for cancellation
///
/// The blocking read runs on a detached thread, so a cancelled wait never
/// holds up process exit.
pub struct StdinPause {
    cancelled: watch::Receiver<bool>,
}

impl StdinPause {
    pub fn new() -> (Self, CancelHandle) {
        let (handle, cancelled) = CancelHandle::new();
        (Self { cancelled }, handle)
    }
}

#[async_trait]
impl Pause for StdinPause {
    fn prompt(&self) -> Option<&str> {
        Some(PROMPT)
    }

    async fn wait(&mut self) -> io::Result<PauseOutcome> {
        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            let mut line = String::new();
            let _ = tx.send(std::io::stdin().read_line(&mut line).map(|_| ()));
        });

        let read = async {
            rx.await
                .unwrap_or_else(|_| Err(io::Error::other("stdin reader thread exited")))
        };
        read_or_cancel(read, &mut self.cancelled).await
    }
}

/// Continue immediately (non-interactive runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWait;

#[async_trait]
impl Pause for NoWait {
    fn prompt(&self) -> Option<&str> {
        None
    }

    async fn wait(&mut self) -> io::Result<PauseOutcome> {
        Ok(PauseOutcome::Skipped)
    }
}
