use std::sync::atomic::{AtomicU64, Ordering};

use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, BasicQosOptions, ConfirmSelectOptions, QueueDeclareOptions
};
use lapin::publisher_confirm::Confirmation;
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, info};

use crate::models::SalesRecord;
use crate::queue::{BatchConsumer, QueueError, QueueMessage};

/// AMQP delivery mode 2: the broker journals the message to disk before
/// considering it routed, so it survives a broker restart.
const PERSISTENT: u8 = 2;

/// Client-side sequence number of a confirmed publish.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct MessageId(pub u64);

/// Durable publish/consume interface to the broker.
///
/// One connection, one channel. Any failure after connection surfaces as a
/// `QueueError` and the client is done; there is no hidden reconnect loop.
pub struct QueueClient {
    connection: Connection,
    channel: Channel,
    queue: String,
    sequence: AtomicU64
}

impl QueueClient {
    /// Connects to the broker, enables publisher confirms, and declares the
    /// durable queue so publishes and consumes never race its existence.
    pub async fn connect(addr: &str, queue: &str) -> Result<Self, QueueError> {
        let connection = Connection::connect(addr, ConnectionProperties::default())
            .await
            .map_err(QueueError::Connection)?;

        let channel = connection.create_channel().await.map_err(QueueError::Protocol)?;

        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(QueueError::Protocol)?;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default()
            )
            .await
            .map_err(QueueError::Protocol)?;

        info!("Declared durable queue [{queue}] at {addr}");

        Ok(Self {
            connection,
            channel,
            queue: queue.to_string(),
            sequence: AtomicU64::new(0)
        })
    }

    /// Closes the underlying connection.
    ///
    /// This is the cancellation mechanism: any consumer stream opened from
    /// this client ends, and unacknowledged deliveries go back to the queue.
    pub async fn close(&self) -> Result<(), QueueError> {
        self.connection.close(200, "client shutdown").await.map_err(QueueError::Protocol)
    }

    /// Publishes a validated batch inline as one persistent message.
    pub async fn publish(&self, records: &[SalesRecord]) -> Result<MessageId, QueueError> {
        self.publish_message(&QueueMessage::Batch(records.to_vec())).await
    }

    /// Publishes a reference to a batch file instead of the rows themselves.
    pub async fn publish_file_ref(&self, path: &str) -> Result<MessageId, QueueError> {
        self.publish_message(&QueueMessage::FileRef(path.to_string())).await
    }

    async fn publish_message(&self, message: &QueueMessage) -> Result<MessageId, QueueError> {
        let body = serde_json::to_vec(message)?;

        let confirmation = self
            .channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(PERSISTENT)
            )
            .await
            .map_err(QueueError::Protocol)?
            .await
            .map_err(QueueError::Protocol)?;

        if matches!(confirmation, Confirmation::Nack(_)) {
            return Err(QueueError::Unconfirmed);
        }

        let message_id = MessageId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);

        debug!("Published message [{}] ({} bytes) to [{}]", message_id.0, body.len(), self.queue);

        Ok(message_id)
    }

    /// Opens the consuming half of the queue.
    ///
    /// Prefetch is pinned to one so a consumer holds a single unacknowledged
    /// message at a time; acknowledgement is always explicit.
    pub async fn consume(&self, consumer_tag: &str) -> Result<BatchConsumer, QueueError> {
        self.channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .map_err(QueueError::Protocol)?;

        let consumer = self
            .channel
            .basic_consume(
                &self.queue,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default()
            )
            .await
            .map_err(QueueError::Protocol)?;

        info!("Consuming from [{}] as [{consumer_tag}]", self.queue);

        Ok(BatchConsumer::new(consumer))
    }
}
