/// Channel order of a frame's pixel data.
///
/// Stored and decoded images are RGB, capture devices deliver BGR. The layout
/// travels with every frame so conversions happen explicitly at boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Bgr,
    Gray,
}

impl PixelLayout {
    pub fn channels(self) -> u8 {
        match self {
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
            PixelLayout::Gray => 1,
        }
    }
}

/// A single video/image frame: contiguous bytes in row-major order.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    layout: PixelLayout,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, layout: PixelLayout, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (layout.channels() as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            layout,
            index,
        }
    }

    /// A frame filled with one pixel value (given in `layout` order).
    pub fn filled(width: u32, height: u32, layout: PixelLayout, pixel: &[u8]) -> Self {
        debug_assert_eq!(pixel.len(), layout.channels() as usize);
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * pixel.len())
            .collect();
        Self::new(data, width, height, layout, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.layout.channels()
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel bytes at `(x, y)`, in this frame's layout order.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels() as usize;
        let offset = ((y as usize) * (self.width as usize) + x as usize) * c;
        &self.data[offset..offset + c]
    }

    /// Single-channel luma plane using the BT.601 fixed-point weights OpenCV
    /// applies in `cvtColor(.., COLOR_*2GRAY)`.
    pub fn to_grayscale(&self) -> Vec<u8> {
        match self.layout {
            PixelLayout::Gray => self.data.clone(),
            PixelLayout::Rgb => self.data.chunks_exact(3).map(|p| luma(p[0], p[1], p[2])).collect(),
            PixelLayout::Bgr => self.data.chunks_exact(3).map(|p| luma(p[2], p[1], p[0])).collect(),
        }
    }

    /// Returns a copy of this frame in `target` layout.
    pub fn to_layout(&self, target: PixelLayout) -> Frame {
        if target == self.layout {
            return self.clone();
        }
        let data = match (self.layout, target) {
            (PixelLayout::Rgb, PixelLayout::Bgr) | (PixelLayout::Bgr, PixelLayout::Rgb) => self
                .data
                .chunks_exact(3)
                .flat_map(|p| [p[2], p[1], p[0]])
                .collect(),
            (PixelLayout::Gray, _) => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
            (_, PixelLayout::Gray) => self.to_grayscale(),
            _ => unreachable!("identical layouts handled above"),
        };
        Frame::new(data, self.width, self.height, target, self.index)
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + 8192) >> 14) as u8
}
