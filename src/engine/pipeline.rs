use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::engine::{PipelineError, loader};
use crate::metrics::{record_duration, record_error, record_rows_processed, record_run};
use crate::models::SalesRecord;
use crate::queue::{BatchConsumer, MessageId, QueueClient, QueueError, QueueMessage};
use crate::store::{SalesStore, UpsertWriter, WriteResult};
use crate::validator::SchemaValidator;

/// Consumer verdict for one queue message.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Disposition {
    Ack,
    Nack
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PipelineResult {
    pub rows_loaded: usize,
    pub rows_accepted: usize,
    pub rows_dropped: usize,
    pub written: usize,
    pub skipped: usize,
    pub duration: Duration
}

/// Sequences load → validate → publish/write and decides ack/nack in
/// streaming mode.
///
/// Collaborators are injected at construction; the pipeline holds no global
/// state and can run next to another instance against the same store, with
/// the table's unique key as the only coordination.
pub struct EtlPipeline<S> {
    validator: SchemaValidator,
    writer: UpsertWriter<S>
}

impl<S: SalesStore> EtlPipeline<S> {
    pub fn new(writer: UpsertWriter<S>) -> Self {
        Self {
            validator: SchemaValidator::new(),
            writer
        }
    }

    /// One-shot bulk load: read the file, validate, write straight to the
    /// store. Used for initial loads where the queue adds nothing.
    pub async fn run_batch(&self, path: &str) -> Result<PipelineResult, PipelineError> {
        record_run();
        let timer = Instant::now();

        let outcome = self.load_validate_write(path).await;
        let duration = timer.elapsed();
        record_duration(duration.as_secs_f64());

        match outcome {
            Ok(mut result) => {
                result.duration = duration;
                info!(
                    "Batch run complete: {} written, {} skipped, {} dropped in {duration:?}",
                    result.written, result.skipped, result.rows_dropped
                );
                Ok(result)
            }
            Err(pipeline_error) => {
                record_error();
                Err(pipeline_error)
            }
        }
    }

    /// Producer half of streaming mode: validate the file and publish the
    /// accepted rows as one persistent message. Nothing is written to the
    /// store here; that is the consumer's job.
    pub async fn publish_file(&self, path: &str, queue: &QueueClient) -> Result<MessageId, PipelineError> {
        record_run();
        let timer = Instant::now();

        let outcome = self.load_validate_publish(path, queue).await;
        record_duration(timer.elapsed().as_secs_f64());

        match outcome {
            Ok(message_id) => Ok(message_id),
            Err(pipeline_error) => {
                record_error();
                Err(pipeline_error)
            }
        }
    }

    /// Consumer half of streaming mode: process deliveries until the
    /// connection closes.
    ///
    /// Each message is acked only after a durable write; any failure nacks it
    /// back onto the queue for redelivery. Broker-level errors end the loop,
    /// the caller owns the restart decision.
    pub async fn consume(&self, mut deliveries: BatchConsumer) -> Result<(), PipelineError> {
        while let Some(delivery) = deliveries.next().await {
            let (message, handle) = match delivery {
                Ok(pair) => pair,
                Err(QueueError::Payload(payload_error)) => {
                    record_error();
                    error!("Requeued undecodable message: {payload_error}");
                    continue;
                }
                Err(queue_error) => {
                    record_error();
                    return Err(queue_error.into());
                }
            };

            record_run();
            let timer = Instant::now();
            let disposition = self.on_message(&message).await;
            record_duration(timer.elapsed().as_secs_f64());

            match disposition {
                Disposition::Ack => handle.ack().await?,
                Disposition::Nack => {
                    record_error();
                    handle.nack().await?;
                }
            }
        }

        info!("Queue connection closed, consumption finished");

        Ok(())
    }

    /// Decides ack or nack for one message.
    ///
    /// Inline batches were validated by the producer and go straight to the
    /// writer; file references are loaded and validated here first. Whatever
    /// fails, the message is either fully processed or fully requeued.
    pub async fn on_message(&self, message: &QueueMessage) -> Disposition {
        let outcome = match message {
            QueueMessage::Batch(records) => self.write_records(records).await.map(|_| ()),
            QueueMessage::FileRef(path) => self.load_validate_write(path).await.map(|_| ())
        };

        match outcome {
            Ok(()) => Disposition::Ack,
            Err(pipeline_error) => {
                error!("Message processing failed, requeueing: {pipeline_error}");
                Disposition::Nack
            }
        }
    }

    async fn load_validate_write(&self, path: &str) -> Result<PipelineResult, PipelineError> {
        let batch = loader::load_batch(path).await?;
        let (accepted, report) = self.validator.validate(&batch)?;

        info!("{report}");

        let write = self.write_records(&accepted).await?;

        Ok(PipelineResult {
            rows_loaded: report.received,
            rows_accepted: report.accepted,
            rows_dropped: report.dropped(),
            written: write.written,
            skipped: write.skipped,
            duration: Duration::default()
        })
    }

    async fn load_validate_publish(&self, path: &str, queue: &QueueClient) -> Result<MessageId, PipelineError> {
        let batch = loader::load_batch(path).await?;
        let (accepted, report) = self.validator.validate(&batch)?;

        info!("{report}");

        let message_id = queue.publish(&accepted).await?;

        info!("Published {} validated rows as message [{}]", accepted.len(), message_id.0);

        Ok(message_id)
    }

    async fn write_records(&self, records: &[SalesRecord]) -> Result<WriteResult, PipelineError> {
        let result = self.writer.write(records).await?;

        record_rows_processed((result.written + result.skipped) as u64);
        info!("Persisted batch: {} written, {} skipped", result.written, result.skipped);

        Ok(result)
    }
}
