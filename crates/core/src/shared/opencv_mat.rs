use opencv::core::{Mat, Scalar, CV_8UC1, CV_8UC3};
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies a frame into a freshly allocated 8-bit `Mat` with the frame's
/// channel count. Channel order is carried over untouched.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let typ = if frame.channels() == 1 { CV_8UC1 } else { CV_8UC3 };
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        typ,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

/// Overwrites the frame's pixels with `mat`, which must have the frame's
/// geometry and channel count.
pub fn copy_mat_into(mat: &Mat, frame: &mut Frame) -> opencv::Result<()> {
    let continuous;
    let mat = if mat.is_continuous() {
        mat
    } else {
        continuous = mat.try_clone()?;
        &continuous
    };
    let bytes = mat.data_bytes()?;
    if bytes.len() != frame.data().len() {
        return Err(opencv::Error::new(
            opencv::core::StsUnmatchedSizes,
            format!(
                "mat holds {} bytes, frame needs {}",
                bytes.len(),
                frame.data().len()
            ),
        ));
    }
    frame.data_mut().copy_from_slice(bytes);
    Ok(())
}
