//! Dense boolean pixel masks and bounding-box geometry

use image::{GrayImage, Luma, RgbaImage};
use ndarray::{s, Array2, Zip};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `[x, y, width, height]` in the order the JSON responses use
    #[must_use]
    pub fn to_array(&self) -> [u32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// Dense boolean pixel mask
///
/// Backed by a row-major `(height, width)` grid. Accessors take `(x, y)`
/// coordinates to match the `image` crate convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    grid: Array2<bool>,
}

impl Mask {
    /// Create an all-false mask
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Array2::from_elem((height as usize, width as usize), false),
        }
    }

    /// Wrap an existing `(height, width)` grid
    #[must_use]
    pub fn from_grid(grid: Array2<bool>) -> Self {
        Self { grid }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        Self {
            grid: Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
                f(x as u32, y as u32)
            }),
        }
    }

    /// Mask that is true inside the half-open window `[x0, x1) x [y0, y1)`
    ///
    /// The window is clamped to the mask dimensions; an inverted range
    /// yields an empty mask.
    #[must_use]
    pub fn from_window(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let mut mask = Mask::new(width, height);
        let x0 = x0 as usize;
        let y0 = y0 as usize;
        let x1 = x1.min(width) as usize;
        let y1 = y1.min(height) as usize;
        if x0 < x1 && y0 < y1 {
            mask.grid.slice_mut(s![y0..y1, x0..x1]).fill(true);
        }
        mask
    }

    /// Opaque-pixel mask: true where alpha is at least `cutoff`
    #[must_use]
    pub fn from_alpha(image: &RgbaImage, cutoff: u8) -> Self {
        let (width, height) = image.dimensions();
        Self::from_fn(width, height, |x, y| image.get_pixel(x, y)[3] >= cutoff)
    }

    /// Mask from a grayscale image: true where luma is at least `cutoff`
    #[must_use]
    pub fn from_luma(image: &GrayImage, cutoff: u8) -> Self {
        let (width, height) = image.dimensions();
        Self::from_fn(width, height, |x, y| image.get_pixel(x, y)[0] >= cutoff)
    }

    /// Render as a grayscale image, 255 inside the mask and 0 outside
    #[must_use]
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.grid.ncols() as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.grid.nrows() as u32
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[must_use]
    pub fn matches_dimensions(&self, width: u32, height: u32) -> bool {
        self.width() == width && self.height() == height
    }

    /// Pixel value at `(x, y)`; panics when out of bounds
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.grid[[y as usize, x as usize]]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.grid[[y as usize, x as usize]] = value;
    }

    /// Number of set pixels
    #[must_use]
    pub fn area(&self) -> usize {
        self.grid.iter().filter(|&&v| v).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.grid.iter().any(|&v| v)
    }

    /// Pixels set in both masks
    ///
    /// Both masks must share the same dimensions.
    #[must_use]
    pub fn intersection(&self, other: &Mask) -> Mask {
        Mask {
            grid: Zip::from(&self.grid)
                .and(&other.grid)
                .map_collect(|&a, &b| a && b),
        }
    }

    /// Pixels set in either mask
    #[must_use]
    pub fn union(&self, other: &Mask) -> Mask {
        Mask {
            grid: Zip::from(&self.grid)
                .and(&other.grid)
                .map_collect(|&a, &b| a || b),
        }
    }

    /// Set every pixel that is set in `other`
    pub fn union_with(&mut self, other: &Mask) {
        Zip::from(&mut self.grid)
            .and(&other.grid)
            .for_each(|a, &b| *a = *a || b);
    }

    /// Clear every pixel that is not set in `other`
    pub fn intersect_with(&mut self, other: &Mask) {
        Zip::from(&mut self.grid)
            .and(&other.grid)
            .for_each(|a, &b| *a = *a && b);
    }

    /// Clear every pixel that is set in `other`
    pub fn subtract_with(&mut self, other: &Mask) {
        Zip::from(&mut self.grid)
            .and(&other.grid)
            .for_each(|a, &b| *a = *a && !b);
    }

    /// Number of pixels set in both masks
    #[must_use]
    pub fn intersection_area(&self, other: &Mask) -> usize {
        self.grid
            .iter()
            .zip(other.grid.iter())
            .filter(|&(&a, &b)| a && b)
            .count()
    }

    /// Number of pixels set in either mask
    #[must_use]
    pub fn union_area(&self, other: &Mask) -> usize {
        self.grid
            .iter()
            .zip(other.grid.iter())
            .filter(|&(&a, &b)| a || b)
            .count()
    }

    /// Intersection over union; 0 when both masks are empty
    #[must_use]
    pub fn iou(&self, other: &Mask) -> f64 {
        let union = self.union_area(other);
        if union == 0 {
            return 0.0;
        }
        self.intersection_area(other) as f64 / union as f64
    }

    /// True when any set pixel lies on the outer one-pixel frame
    #[must_use]
    pub fn touches_border(&self) -> bool {
        let (h, w) = self.grid.dim();
        if h == 0 || w == 0 {
            return false;
        }
        self.grid.row(0).iter().any(|&v| v)
            || self.grid.row(h - 1).iter().any(|&v| v)
            || self.grid.column(0).iter().any(|&v| v)
            || self.grid.column(w - 1).iter().any(|&v| v)
    }

    /// Tight bounding box of the set pixels, or `None` when empty
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for ((y, x), &v) in self.grid.indexed_iter() {
            if !v {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds.map(|(x0, y0, x1, y1)| BoundingBox::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Mean `(x, y)` of the set pixels, or `None` when empty
    #[must_use]
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let mut count = 0usize;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for ((y, x), &v) in self.grid.indexed_iter() {
            if v {
                count += 1;
                sum_x += x as f64;
                sum_y += y as f64;
            }
        }
        if count == 0 {
            None
        } else {
            Some((sum_x / count as f64, sum_y / count as f64))
        }
    }
}
