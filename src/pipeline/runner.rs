//! Pipeline orchestration: reader -> decoder -> dispatcher

use bytes::Bytes;
use flashlight_shared::{protocol, BlockingQueue, Command, FrameDecoder};
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

use super::workers;
use crate::command::Dispatcher;
use crate::transport::{TcpConnector, TransportConnector, TransportError};

/// Configuration for the decode pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Device host name or address
    pub host: String,
    /// Device port
    pub port: u16,
    /// Maximum bytes pulled from the transport per chunk
    pub read_window: usize,
    /// Largest frame the decoder will carry between chunks (unbounded if `None`)
    pub max_carry: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            host: protocol::DEFAULT_HOST.into(),
            port: protocol::DEFAULT_PORT,
            read_window: protocol::DEFAULT_READ_WINDOW,
            max_carry: None,
        }
    }
}

impl PipelineConfig {
    /// Build a TCP connector for the configured endpoint
    pub fn tcp_connector(&self) -> TcpConnector {
        TcpConnector::new(self.host.clone(), self.port)
    }

    fn frame_decoder(&self) -> FrameDecoder {
        match self.max_carry {
            Some(max) => FrameDecoder::with_max_carry(max),
            None => FrameDecoder::new(),
        }
    }
}

/// Counters collected from all stages after a clean run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub chunks_read: u64,
    pub bytes_read: u64,
    pub commands_decoded: u64,
    pub commands_dispatched: u64,
}

/// Pipeline stages, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reader,
    Decoder,
    Dispatcher,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reader => write!(f, "reader"),
            Stage::Decoder => write!(f, "decoder"),
            Stage::Dispatcher => write!(f, "dispatcher"),
        }
    }
}

/// Errors surfaced once all workers have joined
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{stage} worker failed: {source}")]
    Worker {
        stage: Stage,
        #[source]
        source: JoinError,
    },
}

/// Three-stage decode pipeline connected by blocking queues
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all three stages to completion.
    ///
    /// Returns once the transport has ended and every decoded command has
    /// been dispatched. A transport error is reported only after all
    /// workers have joined.
    pub async fn run<C, D>(&self, connector: C, dispatcher: D) -> Result<PipelineStats, PipelineError>
    where
        C: TransportConnector,
        D: Dispatcher,
    {
        let chunk_queue: Arc<BlockingQueue<Bytes>> = Arc::new(BlockingQueue::new());
        let command_queue: Arc<BlockingQueue<Command>> = Arc::new(BlockingQueue::new());
        let reader_finished = Arc::new(AtomicBool::new(false));
        let decoder_finished = Arc::new(AtomicBool::new(false));

        let reader = tokio::spawn(workers::read_loop(
            connector,
            self.config.read_window,
            chunk_queue.clone(),
            reader_finished.clone(),
        ));

        let decoder = {
            let frame_decoder = self.config.frame_decoder();
            let command_queue = command_queue.clone();
            let decoder_finished = decoder_finished.clone();
            tokio::task::spawn_blocking(move || {
                workers::decode_loop(
                    frame_decoder,
                    chunk_queue,
                    reader_finished,
                    command_queue,
                    decoder_finished,
                )
            })
        };

        let dispatch = tokio::task::spawn_blocking(move || {
            workers::dispatch_loop(dispatcher, command_queue, decoder_finished)
        });

        let (read, decoded, dispatched) = tokio::join!(reader, decoder, dispatch);

        let read = read.map_err(|source| PipelineError::Worker {
            stage: Stage::Reader,
            source,
        })??;
        let commands_decoded = decoded.map_err(|source| PipelineError::Worker {
            stage: Stage::Decoder,
            source,
        })?;
        let commands_dispatched = dispatched.map_err(|source| PipelineError::Worker {
            stage: Stage::Dispatcher,
            source,
        })?;

        let stats = PipelineStats {
            chunks_read: read.chunks,
            bytes_read: read.bytes,
            commands_decoded,
            commands_dispatched,
        };
        info!("Pipeline finished: {:?}", stats);
        Ok(stats)
    }
}
