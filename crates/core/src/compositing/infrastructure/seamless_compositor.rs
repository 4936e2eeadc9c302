use image::imageops::FilterType;
use opencv::core::{Mat, Point, Scalar, CV_8UC1};
use opencv::photo;
use thiserror::Error;

use crate::compositing::domain::face_compositor::{
    CompositeError, CompositeOutcome, FaceCompositor,
};
use crate::shared::constants::{OUTLINE_COLOR_RGB, OUTLINE_THICKNESS};
use crate::shared::frame::{Frame, PixelLayout};
use crate::shared::opencv_mat::{copy_mat_into, frame_to_mat};
use crate::shared::region::Region;

use super::pixel_ops;

/// Stretches the source face onto the region and blends it with OpenCV's
/// normal-mode seamless clone, falling back to a plain pixel copy when the
/// clone cannot run (region at the frame edge, degenerate size, gray frame).
///
/// Every composited region gets a green outline afterwards.
#[derive(Debug, Default)]
pub struct SeamlessCompositor;

impl SeamlessCompositor {
    pub fn new() -> Self {
        Self
    }
}

impl FaceCompositor for SeamlessCompositor {
    fn composite(
        &self,
        frame: &mut Frame,
        region: &Region,
        source: &Frame,
    ) -> Result<CompositeOutcome, CompositeError> {
        if source.is_empty() {
            return Err(CompositeError::EmptySource);
        }
        if region.is_empty() {
            return Ok(CompositeOutcome::Skipped);
        }

        let resized = resize_to(source, region.width as u32, region.height as u32)?;
        let patch = resized.to_layout(frame.layout());

        let outcome = match seamless_clone(frame, &patch, region) {
            Ok(()) => CompositeOutcome::Blended,
            Err(e) => {
                log::debug!("Seamless clone skipped, overwriting region: {e}");
                pixel_ops::overwrite_rect(frame, &patch, region);
                CompositeOutcome::Overwritten
            }
        };

        pixel_ops::draw_outline(frame, region, OUTLINE_COLOR_RGB, OUTLINE_THICKNESS);
        Ok(outcome)
    }
}

#[derive(Error, Debug)]
enum CloneError {
    #[error("region {0:?} is smaller than 2x2")]
    TooSmall(Region),
    #[error("region {0:?} does not leave a 1-pixel border inside the frame")]
    OutOfBounds(Region),
    #[error("seamless clone needs a 3-channel frame")]
    Grayscale,
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

/// Blends `patch` (sized to `region`) into the frame with
/// `photo::seamless_clone(.., NORMAL_CLONE)` under a full mask centred on the
/// region. The frame is untouched when an error is returned.
fn seamless_clone(frame: &mut Frame, patch: &Frame, region: &Region) -> Result<(), CloneError> {
    if region.width < 2 || region.height < 2 {
        return Err(CloneError::TooSmall(*region));
    }
    // OpenCV rejects a destination ROI that reaches the frame border.
    if !region.fits_within(frame.width(), frame.height(), 1) {
        return Err(CloneError::OutOfBounds(*region));
    }
    if frame.layout() == PixelLayout::Gray {
        return Err(CloneError::Grayscale);
    }

    let src = frame_to_mat(patch)?;
    let dst = frame_to_mat(frame)?;
    let mask = Mat::new_rows_cols_with_default(
        patch.height() as i32,
        patch.width() as i32,
        CV_8UC1,
        Scalar::all(255.0),
    )?;
    let (cx, cy) = region.center();
    let mut blended = Mat::default();
    photo::seamless_clone(
        &src,
        &dst,
        &mask,
        Point::new(cx, cy),
        &mut blended,
        photo::NORMAL_CLONE,
    )?;
    copy_mat_into(&blended, frame)?;
    Ok(())
}

/// Bilinear stretch to exactly `width` x `height`; aspect ratio is not kept.
fn resize_to(source: &Frame, width: u32, height: u32) -> Result<Frame, CompositeError> {
    let failed = || CompositeError::Resize { width, height };
    let data = match source.layout() {
        PixelLayout::Gray => {
            let img =
                image::GrayImage::from_raw(source.width(), source.height(), source.data().to_vec())
                    .ok_or_else(failed)?;
            image::imageops::resize(&img, width, height, FilterType::Triangle).into_raw()
        }
        // The filter is channel-order agnostic, so BGR data can ride in an RgbImage.
        PixelLayout::Rgb | PixelLayout::Bgr => {
            let img =
                image::RgbImage::from_raw(source.width(), source.height(), source.data().to_vec())
                    .ok_or_else(failed)?;
            image::imageops::resize(&img, width, height, FilterType::Triangle).into_raw()
        }
    };
    Ok(Frame::new(data, width, height, source.layout(), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::{Duration, Instant};

    const GREEN: [u8; 3] = [0, 255, 0];

    fn compositor() -> SeamlessCompositor {
        SeamlessCompositor::new()
    }

    /// Dark source with a bright block in its middle third.
    fn block_source(width: u32, height: u32) -> Frame {
        let mut source = Frame::filled(width, height, PixelLayout::Rgb, &[20, 20, 20]);
        for y in height / 3..2 * height / 3 {
            for x in width / 3..2 * width / 3 {
                let i = ((y * width + x) * 3) as usize;
                source.data_mut()[i..i + 3].copy_from_slice(&[240, 240, 240]);
            }
        }
        source
    }

    #[rstest]
    #[case::wider(200, 100, 30, 60)]
    #[case::taller(50, 300, 64, 40)]
    #[case::upscale(10, 10, 47, 53)]
    fn test_resize_matches_region_regardless_of_aspect(
        #[case] sw: u32,
        #[case] sh: u32,
        #[case] rw: u32,
        #[case] rh: u32,
    ) {
        let source = Frame::filled(sw, sh, PixelLayout::Rgb, &[1, 2, 3]);
        let resized = resize_to(&source, rw, rh).unwrap();
        assert_eq!((resized.width(), resized.height()), (rw, rh));
        assert_eq!(resized.pixel(rw / 2, rh / 2), &[1, 2, 3]);
    }

    #[test]
    fn test_resize_keeps_layout() {
        let source = Frame::filled(8, 8, PixelLayout::Bgr, &[1, 2, 3]);
        assert_eq!(resize_to(&source, 4, 4).unwrap().layout(), PixelLayout::Bgr);
    }

    #[test]
    fn test_interior_region_is_blended() {
        let mut frame = Frame::filled(100, 100, PixelLayout::Rgb, &[120, 110, 100]);
        let source = block_source(60, 60);
        let outcome = compositor()
            .composite(&mut frame, &Region::new(30, 30, 40, 40), &source)
            .unwrap();

        assert_eq!(outcome, CompositeOutcome::Blended);
        let block = frame.pixel(50, 50)[0] as i32;
        let above = frame.pixel(50, 36)[0] as i32;
        assert!(block - above > 100, "block={block} above={above}");
    }

    #[test]
    fn test_region_touching_edge_falls_back_to_overwrite() {
        let mut frame = Frame::filled(100, 100, PixelLayout::Rgb, &[120, 110, 100]);
        let source = Frame::filled(30, 30, PixelLayout::Rgb, &[5, 6, 7]);
        let outcome = compositor()
            .composite(&mut frame, &Region::new(0, 0, 40, 40), &source)
            .unwrap();

        assert_eq!(outcome, CompositeOutcome::Overwritten);
        assert_eq!(frame.pixel(20, 20), &[5, 6, 7]);
        assert_eq!(frame.pixel(41, 20), &[120, 110, 100]);
    }

    #[test]
    fn test_region_exceeding_frame_overwrites_visible_part() {
        let mut frame = Frame::filled(50, 50, PixelLayout::Rgb, &[0, 0, 0]);
        let source = Frame::filled(10, 10, PixelLayout::Rgb, &[200, 100, 50]);
        let outcome = compositor()
            .composite(&mut frame, &Region::new(40, 40, 20, 20), &source)
            .unwrap();

        assert_eq!(outcome, CompositeOutcome::Overwritten);
        assert_eq!(frame.pixel(45, 45), &[200, 100, 50]);
    }

    #[test]
    fn test_source_converted_to_frame_layout() {
        let mut frame = Frame::filled(50, 50, PixelLayout::Bgr, &[0, 0, 0]);
        let source = Frame::filled(10, 10, PixelLayout::Rgb, &[200, 100, 50]);
        compositor()
            .composite(&mut frame, &Region::new(0, 0, 20, 20), &source)
            .unwrap();

        assert_eq!(frame.pixel(10, 10), &[50, 100, 200]);
    }

    #[test]
    fn test_outline_drawn_after_blend() {
        let mut frame = Frame::filled(100, 100, PixelLayout::Rgb, &[120, 110, 100]);
        let source = block_source(60, 60);
        compositor()
            .composite(&mut frame, &Region::new(30, 30, 40, 40), &source)
            .unwrap();

        assert_eq!(frame.pixel(30, 50), &GREEN);
        assert_eq!(frame.pixel(70, 50), &GREEN);
        assert_eq!(frame.pixel(50, 31), &GREEN);
        assert_eq!(frame.pixel(50, 69), &GREEN);
    }

    #[test]
    fn test_source_not_mutated() {
        let mut frame = Frame::filled(100, 100, PixelLayout::Rgb, &[120, 110, 100]);
        let source = block_source(60, 60);
        let before = source.clone();
        compositor()
            .composite(&mut frame, &Region::new(30, 30, 40, 40), &source)
            .unwrap();
        assert_eq!(source.data(), before.data());
    }

    #[test]
    fn test_empty_region_skipped() {
        let mut frame = Frame::filled(20, 20, PixelLayout::Rgb, &[1, 1, 1]);
        let original = frame.clone();
        let source = Frame::filled(10, 10, PixelLayout::Rgb, &[9, 9, 9]);
        let outcome = compositor()
            .composite(&mut frame, &Region::new(5, 5, 0, 10), &source)
            .unwrap();

        assert_eq!(outcome, CompositeOutcome::Skipped);
        assert_eq!(frame.data(), original.data());
    }

    #[test]
    fn test_empty_source_is_an_error() {
        let mut frame = Frame::filled(20, 20, PixelLayout::Rgb, &[1, 1, 1]);
        let source = Frame::new(Vec::new(), 0, 0, PixelLayout::Rgb, 0);
        let result = compositor().composite(&mut frame, &Region::new(5, 5, 5, 5), &source);
        assert_eq!(result, Err(CompositeError::EmptySource));
    }

    /// Frame with a diagonal ramp so the clone has real gradients to match.
    fn textured_frame(width: u32, height: u32) -> Frame {
        let mut frame = Frame::filled(width, height, PixelLayout::Rgb, &[0, 0, 0]);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) % 200) as u8 + 30;
                let i = ((y * width + x) * 3) as usize;
                frame.data_mut()[i..i + 3].copy_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        frame
    }

    #[test]
    fn test_close_up_face_blends_within_frame_budget() {
        let mut frame = textured_frame(640, 480);
        let region = Region::new(170, 90, 300, 300);
        let patch = block_source(300, 300);

        let started = Instant::now();
        seamless_clone(&mut frame, &patch, &region).unwrap();
        let elapsed = started.elapsed();

        assert!(
            elapsed < Duration::from_millis(500),
            "300x300 clone took {elapsed:?}"
        );
    }

    #[test]
    fn test_clone_leaves_pixels_outside_region_alone() {
        let original = textured_frame(200, 160);
        let mut frame = original.clone();
        let region = Region::new(50, 40, 80, 60);

        seamless_clone(&mut frame, &block_source(80, 60), &region).unwrap();

        for (x, y) in [(10, 10), (49, 70), (131, 70), (90, 39), (90, 101), (199, 159)] {
            assert_eq!(frame.pixel(x, y), original.pixel(x, y), "pixel ({x}, {y})");
        }
        assert_ne!(frame.pixel(90, 70), original.pixel(90, 70));
    }

    #[rstest]
    #[case::too_narrow(Region::new(10, 10, 1, 20))]
    #[case::touches_left_edge(Region::new(0, 10, 20, 20))]
    #[case::past_bottom_edge(Region::new(10, 35, 20, 20))]
    fn test_clone_rejects_unclonable_regions(#[case] region: Region) {
        let mut frame = Frame::filled(50, 50, PixelLayout::Rgb, &[9, 9, 9]);
        let patch = Frame::filled(
            region.width as u32,
            region.height as u32,
            PixelLayout::Rgb,
            &[200, 200, 200],
        );

        assert!(seamless_clone(&mut frame, &patch, &region).is_err());
        assert!(frame.data().iter().all(|&v| v == 9));
    }

    #[test]
    fn test_gray_frame_falls_back_to_overwrite() {
        let mut frame = Frame::filled(60, 60, PixelLayout::Gray, &[10]);
        let source = Frame::filled(20, 20, PixelLayout::Gray, &[200]);
        let outcome = compositor()
            .composite(&mut frame, &Region::new(20, 20, 20, 20), &source)
            .unwrap();

        assert_eq!(outcome, CompositeOutcome::Overwritten);
        assert_eq!(frame.pixel(30, 30), &[200]);
    }
}
