use crate::shared::error::BoxError;
use crate::shared::frame::Frame;

/// An open live frame source (camera).
pub trait CaptureDevice: Send {
    /// Reads the next frame. `Ok(None)` means the device has no more frames
    /// (unplugged, end of input).
    fn read(&mut self) -> Result<Option<Frame>, BoxError>;

    /// Releases the underlying device. Safe to call more than once.
    fn release(&mut self);
}

/// Opens capture devices on demand, so a session can be started and stopped
/// repeatedly.
pub trait CaptureSource: Send + Sync {
    fn open(&self) -> Result<Box<dyn CaptureDevice>, BoxError>;
}
