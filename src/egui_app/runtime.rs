//! Bridge between the egui frame loop and async network calls.
//!
//! Requests run on a shared tokio runtime; each result comes back over a
//! `std::sync::mpsc` channel that the UI polls with `try_recv` once per frame,
//! so the frame never blocks on the network.

use std::future::Future;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

/// Owns the runtime that executes screen requests.
pub struct Dispatcher {
    runtime: Runtime,
    repaint: Option<egui::Context>,
}

impl Dispatcher {
    pub fn new() -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("lgpd-io")
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            repaint: None,
        })
    }

    /// Wake the UI when a result arrives.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    /// Run `fut` in the background; its output arrives on the returned receiver.
    pub fn spawn<T, F>(&self, fut: F) -> Receiver<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.spawn_to(tx, fut);
        rx
    }

    /// Run `fut` in the background and deliver its output to `tx`.
    pub fn spawn_to<T, F>(&self, tx: Sender<T>, fut: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let repaint = self.repaint.clone();
        self.runtime.spawn(async move {
            let output = fut.await;
            if tx.send(output).is_err() {
                tracing::debug!("Result dropped, receiver gone");
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}

/// Event queue of one screen: any number of requests may report into it.
#[derive(Debug)]
pub struct Inbox<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Default for Inbox<T> {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl<T> Inbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> Sender<T> {
        self.tx.clone()
    }

    /// Everything that arrived since the last call, in arrival order.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }

    /// Wait for the next event.
    pub fn wait(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// A request whose result has not been collected yet.
#[derive(Debug)]
pub struct Pending<T> {
    rx: Option<Receiver<T>>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self { rx: None }
    }
}

impl<T> Pending<T> {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Track a new request, dropping any previous one unanswered.
    pub fn start(&mut self, rx: Receiver<T>) {
        self.rx = Some(rx);
    }

    pub fn is_busy(&self) -> bool {
        self.rx.is_some()
    }

    /// Non-blocking: the result if it has arrived.
    pub fn poll(&mut self) -> Option<T> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(value) => {
                self.rx = None;
                Some(value)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("Background task ended without a result");
                self.rx = None;
                None
            }
        }
    }

    /// Blocking variant of [`Pending::poll`] for headless callers.
    pub fn wait(&mut self, timeout: Duration) -> Option<T> {
        let rx = self.rx.as_ref()?;
        match rx.recv_timeout(timeout) {
            Ok(value) => {
                self.rx = None;
                Some(value)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.rx = None;
                None
            }
        }
    }
}
