use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Which blending path a composite took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOutcome {
    /// Gradient-domain clone succeeded.
    Blended,
    /// Clone was rejected; the resized source was copied over the region.
    Overwritten,
    /// Region had no area; the frame was left as is.
    Skipped,
}

/// Inputs a compositor cannot work with at all.
///
/// Blend failures are not errors: they are recovered inside the compositor
/// and reported as [`CompositeOutcome::Overwritten`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompositeError {
    #[error("source face image has no pixels")]
    EmptySource,
    #[error("failed to resize source face to {width}x{height}")]
    Resize { width: u32, height: u32 },
}

/// Domain interface for stamping a source face into one region of a frame.
///
/// Implementations modify the frame in place and never touch `source`.
pub trait FaceCompositor: Send + Sync {
    fn composite(
        &self,
        frame: &mut Frame,
        region: &Region,
        source: &Frame,
    ) -> Result<CompositeOutcome, CompositeError>;
}
