use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::message::{MailMessage, OutboundMail};
use super::transport::MailTransport;

/// Cloneable producer side of the mail queue. Never blocks the caller.
#[derive(Debug, Clone)]
pub struct MailQueue {
    sender: mpsc::Sender<MailMessage>,
}

impl MailQueue {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<MailMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Returns `false` when the message was dropped because the queue is full or closed.
    pub fn enqueue(&self, message: MailMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                warn!(to = %message.to, "mail queue full, dropping message");
                false
            }
            Err(TrySendError::Closed(message)) => {
                warn!(to = %message.to, "mail dispatcher stopped, dropping message");
                false
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: usize,
    pub failed: usize,
}

/// Single consumer draining the queue into a transport.
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    sender_address: String,
    receiver: mpsc::Receiver<MailMessage>,
    shutdown: CancellationToken,
    stats: DispatchStats,
}

impl MailDispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        sender_address: impl Into<String>,
        receiver: mpsc::Receiver<MailMessage>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            transport,
            sender_address: sender_address.into(),
            receiver,
            shutdown,
            stats: DispatchStats::default(),
        }
    }

    /// Creates the queue and spawns its worker on the current runtime.
    pub fn start(
        transport: Arc<dyn MailTransport>,
        sender_address: impl Into<String>,
        capacity: usize,
    ) -> (MailQueue, MailWorker) {
        let (queue, receiver) = MailQueue::channel(capacity);
        let shutdown = CancellationToken::new();
        let dispatcher = Self::new(transport, sender_address, receiver, shutdown.clone());
        let handle = tokio::spawn(dispatcher.run());
        (queue, MailWorker { handle, shutdown })
    }

    pub async fn run(mut self) -> DispatchStats {
        info!("mail dispatcher started");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    debug!("mail dispatcher received shutdown signal");
                    break;
                }
                message = self.receiver.recv() => match message {
                    Some(message) => self.deliver(message).await,
                    None => {
                        info!(
                            delivered = self.stats.delivered,
                            failed = self.stats.failed,
                            "mail queue closed"
                        );
                        return self.stats;
                    }
                },
            }
        }

        // Stop accepting, then flush whatever is already buffered.
        self.receiver.close();
        while let Some(message) = self.receiver.recv().await {
            self.deliver(message).await;
        }

        info!(
            delivered = self.stats.delivered,
            failed = self.stats.failed,
            "mail dispatcher stopped"
        );
        self.stats
    }

    async fn deliver(&mut self, message: MailMessage) {
        let outbound = OutboundMail::render(&self.sender_address, &message);
        match self.transport.send(&outbound).await {
            Ok(()) => {
                self.stats.delivered += 1;
                debug!(to = %outbound.to, "mail sent");
            }
            Err(err) => {
                self.stats.failed += 1;
                warn!(to = %outbound.to, error = %err, "failed to send mail");
            }
        }
    }
}

/// Handle to a running dispatcher task.
pub struct MailWorker {
    handle: JoinHandle<DispatchStats>,
    shutdown: CancellationToken,
}

impl MailWorker {
    /// Signals the worker, waits up to `timeout` for the buffered mail to drain.
    pub async fn shutdown(self, timeout: Duration) -> Option<DispatchStats> {
        self.shutdown.cancel();
        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(stats)) => Some(stats),
            Ok(Err(join_error)) => {
                error!(error = %join_error, "mail dispatcher task failed");
                None
            }
            Err(_) => {
                warn!(?timeout, "mail dispatcher did not drain before timeout");
                None
            }
        }
    }
}
