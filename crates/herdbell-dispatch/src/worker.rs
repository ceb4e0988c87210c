//! Background task draining the delivery queue.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::request::DeliveryRequest;
use crate::transport::Transport;

/// Calls the transport for every queued hand-off, one at a time.
#[derive(Debug)]
pub struct DeliveryWorker {
    receiver: mpsc::Receiver<DeliveryRequest>,
    transport: Arc<dyn Transport>,
}

impl DeliveryWorker {
    /// Create a worker over the receiving half of the dispatcher's queue.
    pub fn new(receiver: mpsc::Receiver<DeliveryRequest>, transport: Arc<dyn Transport>) -> Self {
        Self {
            receiver,
            transport,
        }
    }

    /// Run until cancelled or until every sender is dropped.
    ///
    /// On cancellation the queue is closed and whatever is already in it
    /// is still delivered.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Delivery worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.receiver.close();
                    let mut drained = 0usize;
                    while let Some(request) = self.receiver.recv().await {
                        self.deliver(request).await;
                        drained += 1;
                    }
                    info!(drained, "Delivery worker received shutdown signal");
                    break;
                }
                request = self.receiver.recv() => match request {
                    Some(request) => self.deliver(request).await,
                    None => break,
                },
            }
        }

        info!("Delivery worker shut down complete");
    }

    async fn deliver(&self, request: DeliveryRequest) {
        match self
            .transport
            .deliver(request.notification_id, request.channel)
            .await
        {
            Ok(()) => debug!(
                user_id = %request.user_id,
                notification_id = %request.notification_id,
                channel = %request.channel,
                "Delivered"
            ),
            Err(e) => warn!(
                user_id = %request.user_id,
                notification_id = %request.notification_id,
                channel = %request.channel,
                error = %e,
                "Delivery failed; not retrying"
            ),
        }
    }
}
