//! Background worker feeding the dispatcher from a bus subscription.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::error;

use stockyard_events::{MessageBus, Subscription};
use stockyard_requests::{RequestStore, StatusChangeMessage};
use stockyard_workflow::StatusDispatcher;

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Stock-workflow worker loop.
///
/// - Subscribes to the status-change bus
/// - Feeds every message into the dispatch table
/// - Supports graceful shutdown
///
/// Handlers are idempotent (at-least-once delivery safe); a structural
/// dispatch error is logged and the loop keeps running - under a broker
/// transport the failed message would be redelivered and retried in full.
#[derive(Debug)]
pub struct StockWorker;

impl StockWorker {
    /// Spawn a worker thread processing messages from the bus.
    pub fn spawn<B, R>(
        name: &'static str,
        bus: B,
        dispatcher: Arc<StatusDispatcher<R>>,
    ) -> WorkerHandle
    where
        B: MessageBus<StatusChangeMessage> + Send + Sync + 'static,
        R: RequestStore + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub: Subscription<StatusChangeMessage> = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, dispatcher))
            .expect("failed to spawn stock worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}

fn worker_loop<R>(
    name: &'static str,
    sub: Subscription<StatusChangeMessage>,
    shutdown_rx: mpsc::Receiver<()>,
    dispatcher: Arc<StatusDispatcher<R>>,
) where
    R: RequestStore,
{
    let tick = Duration::from_millis(250);

    loop {
        // Shutdown check (non-blocking)
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(message) => {
                if let Err(err) = dispatcher.dispatch(&message) {
                    error!(
                        worker = name,
                        event = %message.event(),
                        %err,
                        "dispatch failed, message needs redelivery"
                    );
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}
