/// Axis-aligned face bounding box in pixel coordinates of the frame it was
/// detected in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Integer center, as used for clone placement.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Whether the region leaves at least `margin` pixels of frame on every side.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32, margin: i32) -> bool {
        self.x >= margin
            && self.y >= margin
            && self.x + self.width + margin <= frame_width as i32
            && self.y + self.height + margin <= frame_height as i32
    }

    /// Intersection with the frame rectangle, or `None` if nothing is visible.
    pub fn clip_to(&self, frame_width: u32, frame_height: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(frame_width as i32);
        let y2 = (self.y + self.height).min(frame_height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region::new(x1, y1, x2 - x1, y2 - y1))
    }

    /// Greedy deduplication: keeps a region only if its IoU with every
    /// previously-kept region is at or below the threshold.
    pub fn deduplicate(regions: &[Region], iou_threshold: f64) -> Vec<Region> {
        if regions.len() <= 1 {
            return regions.to_vec();
        }
        let mut kept: Vec<Region> = Vec::with_capacity(regions.len());
        for r in regions {
            let dominated = kept.iter().any(|k| r.iou(k) > iou_threshold);
            if !dominated {
                kept.push(*r);
            }
        }
        kept
    }

    pub fn iou(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width as f64 * self.height as f64;
        let area_b = other.width as f64 * other.height as f64;
        inter / (area_a + area_b - inter)
    }
}
