use futures::StreamExt;
use lapin::acker::Acker;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use tracing::warn;

use crate::queue::{QueueError, QueueMessage};

/// Explicit acknowledgement handle for one delivery.
///
/// Exactly one of `ack` or `nack` is expected per message. A dropped handle
/// leaves the delivery unacknowledged; the broker redelivers it once the
/// channel closes, which is at-least-once behaving as designed.
pub struct AckHandle {
    acker: Acker
}

impl AckHandle {
    /// Confirms the message was durably processed and may be discarded.
    pub async fn ack(self) -> Result<(), QueueError> {
        self.acker.ack(BasicAckOptions::default()).await.map_err(QueueError::Protocol)
    }

    /// Returns the message to the queue for redelivery.
    pub async fn nack(self) -> Result<(), QueueError> {
        self.acker
            .nack(BasicNackOptions {
                requeue: true,
                ..BasicNackOptions::default()
            })
            .await
            .map_err(QueueError::Protocol)
    }
}

/// Lazy, infinite sequence of queue deliveries.
///
/// `next` suspends until the broker pushes another message. The sequence is
/// not restartable: once the underlying connection closes it yields `None`
/// and stays that way. Cancellation is achieved by closing the connection.
pub struct BatchConsumer {
    inner: lapin::Consumer
}

impl BatchConsumer {
    pub(crate) fn new(inner: lapin::Consumer) -> Self {
        Self { inner }
    }

    /// Waits for the next delivery and pairs it with its ack handle.
    ///
    /// A body that fails to deserialize is nacked back onto the queue here,
    /// since the caller has nothing to acknowledge; the error is still
    /// surfaced so it can be counted.
    pub async fn next(&mut self) -> Option<Result<(QueueMessage, AckHandle), QueueError>> {
        let delivery = match self.inner.next().await? {
            Ok(delivery) => delivery,
            Err(error) => return Some(Err(QueueError::Protocol(error)))
        };

        let data = delivery.data;
        let handle = AckHandle { acker: delivery.acker };

        match serde_json::from_slice::<QueueMessage>(&data) {
            Ok(message) => Some(Ok((message, handle))),
            Err(error) => {
                warn!("Requeueing undecodable message body ({} bytes)", data.len());

                if let Err(nack_error) = handle.nack().await {
                    return Some(Err(nack_error));
                }

                Some(Err(QueueError::Payload(error)))
            }
        }
    }
}
