use crate::shared::frame::{Frame, PixelLayout};
use crate::shared::region::Region;

/// Copies `patch` (sized to `region`) over the frame, clipped to the frame.
pub fn overwrite_rect(frame: &mut Frame, patch: &Frame, region: &Region) {
    debug_assert_eq!(patch.layout(), frame.layout());
    let Some(visible) = region.clip_to(frame.width(), frame.height()) else {
        return;
    };

    let channels = frame.channels() as usize;
    let fw = frame.width() as usize;
    let pw = patch.width() as usize;
    let sx = (visible.x - region.x) as usize;
    let sy = (visible.y - region.y) as usize;
    let row_len = visible.width as usize * channels;

    let data = frame.data_mut();
    for row in 0..visible.height as usize {
        let src_offset = ((sy + row) * pw + sx) * channels;
        let dst_offset = ((visible.y as usize + row) * fw + visible.x as usize) * channels;
        data[dst_offset..dst_offset + row_len]
            .copy_from_slice(&patch.data()[src_offset..src_offset + row_len]);
    }
}

/// Draws a rectangle outline with inclusive corners `(x, y)` and
/// `(x + width, y + height)`. Clipped to the frame.
///
/// Unlike OpenCV's `rectangle`, which centres the stroke on the edge, the
/// thickness grows inward: a thick outline never paints outside those
/// corners, so neighbouring regions and frame edges see the same footprint
/// at every thickness.
pub fn draw_outline(frame: &mut Frame, region: &Region, color_rgb: [u8; 3], thickness: u32) {
    let color = color_in_layout(color_rgb, frame.layout());
    let x2 = region.x + region.width;
    let y2 = region.y + region.height;

    for t in 0..thickness as i32 {
        for x in region.x..=x2 {
            set_pixel(frame, x, region.y + t, &color);
            set_pixel(frame, x, y2 - t, &color);
        }
        for y in region.y..=y2 {
            set_pixel(frame, region.x + t, y, &color);
            set_pixel(frame, x2 - t, y, &color);
        }
    }
}

fn color_in_layout(rgb: [u8; 3], layout: PixelLayout) -> Vec<u8> {
    match layout {
        PixelLayout::Rgb => rgb.to_vec(),
        PixelLayout::Bgr => vec![rgb[2], rgb[1], rgb[0]],
        PixelLayout::Gray => Frame::new(rgb.to_vec(), 1, 1, PixelLayout::Rgb, 0).to_grayscale(),
    }
}

fn set_pixel(frame: &mut Frame, x: i32, y: i32, color: &[u8]) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let channels = frame.channels() as usize;
    let offset = (y as usize * frame.width() as usize + x as usize) * channels;
    frame.data_mut()[offset..offset + channels].copy_from_slice(color);
}
