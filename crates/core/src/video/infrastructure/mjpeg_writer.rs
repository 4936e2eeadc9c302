use std::io::{self, Write};

use crate::shared::constants::MJPEG_BOUNDARY;

/// Writes encoded frames as `multipart/x-mixed-replace` parts, the framing
/// browsers render as a live MJPEG feed.
pub struct MjpegWriter<W: Write> {
    inner: W,
    parts: usize,
}

impl<W: Write> MjpegWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, parts: 0 }
    }

    /// Writes one part and flushes, so each frame reaches the consumer as
    /// soon as it is produced.
    pub fn write_part(&mut self, content_type: &str, payload: &[u8]) -> io::Result<()> {
        write!(
            self.inner,
            "--{MJPEG_BOUNDARY}\r\nContent-Type: {content_type}\r\n\r\n"
        )?;
        self.inner.write_all(payload)?;
        self.inner.write_all(b"\r\n")?;
        self.inner.flush()?;
        self.parts += 1;
        Ok(())
    }

    pub fn parts_written(&self) -> usize {
        self.parts
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
