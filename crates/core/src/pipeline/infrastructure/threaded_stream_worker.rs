use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::pipeline::stream_driver::{EncodedFrame, FrameStream};

/// Channel capacity between the capture thread and the consumer. Zero makes
/// it a rendezvous: a frame is only captured once the consumer is ready for
/// it, so nothing queues up behind a slow reader.
const HANDOFF_CAPACITY: usize = 0;

/// Drives a [`FrameStream`] on its own thread and hands frames to one
/// consumer.
///
/// Dropping the worker (or calling [`StreamWorker::finish`]) disconnects the
/// channel; the thread exits after the frame it is currently producing.
pub struct StreamWorker {
    frames: Receiver<EncodedFrame>,
    handle: JoinHandle<usize>,
}

impl StreamWorker {
    pub fn spawn(stream: FrameStream) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<EncodedFrame>(HANDOFF_CAPACITY);
        let handle = std::thread::spawn(move || {
            let mut sent = 0;
            for frame in stream {
                if tx.send(frame).is_err() {
                    log::debug!("Stream consumer went away after {sent} frame(s)");
                    break;
                }
                sent += 1;
            }
            sent
        });
        Self { frames: rx, handle }
    }

    /// Blocks until the next frame arrives; `None` once the stream has ended.
    pub fn recv(&self) -> Option<EncodedFrame> {
        self.frames.recv().ok()
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EncodedFrame, RecvTimeoutError> {
        self.frames.recv_timeout(timeout)
    }

    /// Disconnects from the stream and waits for the capture thread.
    /// Returns how many frames were delivered.
    pub fn finish(self) -> usize {
        let StreamWorker { frames, handle } = self;
        drop(frames);
        match handle.join() {
            Ok(sent) => sent,
            Err(_) => {
                log::error!("Stream worker thread panicked");
                0
            }
        }
    }
}

impl Iterator for StreamWorker {
    type Item = EncodedFrame;

    fn next(&mut self) -> Option<EncodedFrame> {
        self.recv()
    }
}
