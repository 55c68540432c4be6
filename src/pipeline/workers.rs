//! Stage loops of the decode pipeline
//!
//! Each consumer loops while its upstream is unfinished OR its input queue
//! still holds items, so anything pushed before the upstream finished is
//! drained before the stage exits.

use bytes::Bytes;
use flashlight_shared::{BlockingQueue, Command, FrameDecoder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::command::Dispatcher;
use crate::transport::{TransportConnector, TransportError};

/// Raises a stage's finished-flag, then interrupts its output queue, on drop
pub(super) struct StageGuard<T> {
    finished: Arc<AtomicBool>,
    output: Arc<BlockingQueue<T>>,
}

impl<T> StageGuard<T> {
    pub(super) fn new(finished: Arc<AtomicBool>, output: Arc<BlockingQueue<T>>) -> Self {
        Self { finished, output }
    }
}

impl<T> Drop for StageGuard<T> {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::Relaxed);
        self.output.interrupt();
    }
}

/// Counters reported by the reader stage
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct ReadStats {
    pub chunks: u64,
    pub bytes: u64,
}

/// Connect and push every read into `output` until end-of-stream or error
pub(super) async fn read_loop<C>(
    connector: C,
    read_window: usize,
    output: Arc<BlockingQueue<Bytes>>,
    finished: Arc<AtomicBool>,
) -> Result<ReadStats, TransportError>
where
    C: TransportConnector,
{
    let _guard = StageGuard::new(finished, output.clone());
    info!("[READER] Starting via {}", connector.name());

    let result = pump_chunks(&connector, read_window, &output).await;
    match &result {
        Ok(stats) => info!(
            "[READER] Finished: {} chunks, {} bytes",
            stats.chunks, stats.bytes
        ),
        Err(e) => warn!("[READER] Stopped: {}", e),
    }
    result
}

async fn pump_chunks<C>(
    connector: &C,
    read_window: usize,
    output: &BlockingQueue<Bytes>,
) -> Result<ReadStats, TransportError>
where
    C: TransportConnector,
{
    let mut stream = connector.connect().await?;
    let mut window = vec![0u8; read_window.max(1)];
    let mut stats = ReadStats::default();

    loop {
        let n = stream.read(&mut window).await.map_err(TransportError::Read)?;
        if n == 0 {
            debug!("[READER] Peer closed the stream");
            return Ok(stats);
        }

        output.push(Bytes::copy_from_slice(&window[..n]));
        stats.chunks += 1;
        stats.bytes += n as u64;
    }
}

/// Decode chunks into commands until the reader has finished and drained
pub(super) fn decode_loop(
    mut decoder: FrameDecoder,
    input: Arc<BlockingQueue<Bytes>>,
    reader_finished: Arc<AtomicBool>,
    output: Arc<BlockingQueue<Command>>,
    finished: Arc<AtomicBool>,
) -> u64 {
    let _guard = StageGuard::new(finished, output.clone());
    info!("[DECODER] Started");

    let mut decoded = 0;
    while !reader_finished.load(Ordering::Relaxed) || !input.is_empty() {
        if let Some(chunk) = input.wait_and_pop() {
            decoder.decode_into(&chunk, |command| {
                decoded += 1;
                output.push(command);
            });
        }
    }

    if decoder.carry_len() > 0 {
        debug!(
            "[DECODER] Discarding {} bytes of an incomplete frame",
            decoder.carry_len()
        );
    }
    info!("[DECODER] Finished: {} commands decoded", decoded);
    decoded
}

/// Hand commands to the dispatcher until the decoder has finished and drained
pub(super) fn dispatch_loop<D>(
    mut dispatcher: D,
    input: Arc<BlockingQueue<Command>>,
    decoder_finished: Arc<AtomicBool>,
) -> u64
where
    D: Dispatcher,
{
    info!("[DISPATCH] Started");

    let mut dispatched = 0;
    while !decoder_finished.load(Ordering::Relaxed) || !input.is_empty() {
        if let Some(command) = input.wait_and_pop() {
            dispatcher.dispatch(command);
            dispatched += 1;
        }
    }

    info!("[DISPATCH] Finished: {} commands dispatched", dispatched);
    dispatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_stage_guard_signals_on_drop() {
        let finished = Arc::new(AtomicBool::new(false));
        let queue: Arc<BlockingQueue<u8>> = Arc::new(BlockingQueue::new());

        drop(StageGuard::new(finished.clone(), queue.clone()));

        assert!(finished.load(Ordering::Relaxed));
        assert!(queue.is_interrupted());
    }

    #[test]
    fn test_stage_guard_signals_on_panic() {
        let finished = Arc::new(AtomicBool::new(false));
        let queue: Arc<BlockingQueue<u8>> = Arc::new(BlockingQueue::new());

        let worker = {
            let finished = finished.clone();
            let queue = queue.clone();
            thread::spawn(move || {
                let _guard = StageGuard::new(finished, queue);
                panic!("stage failed");
            })
        };

        assert!(worker.join().is_err());
        assert!(finished.load(Ordering::Relaxed));
        assert_eq!(queue.wait_and_pop(), None);
    }

    #[test]
    fn test_decode_loop_drains_after_finish() {
        let input = Arc::new(BlockingQueue::new());
        let output = Arc::new(BlockingQueue::new());
        let reader_finished = Arc::new(AtomicBool::new(true));
        let finished = Arc::new(AtomicBool::new(false));

        input.push(Bytes::from_static(&[0x12, 0x21, 0x00]));
        input.push(Bytes::from_static(&[0x01, 0x2a, 0x13]));
        input.interrupt();

        let decoded = decode_loop(
            FrameDecoder::new(),
            input,
            reader_finished,
            output.clone(),
            finished.clone(),
        );

        assert_eq!(decoded, 3);
        assert!(finished.load(Ordering::Relaxed));
        assert_eq!(output.try_pop(), Some(Command::SwitchOn));
        assert_eq!(output.try_pop(), Some(Command::SetBrightness { level: 0x2a }));
        assert_eq!(output.try_pop(), Some(Command::SwitchOff));
        assert_eq!(output.try_pop(), None);
    }
}
