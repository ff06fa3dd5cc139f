//! Read-only access to rectangular image regions
//!
//! Extraction never looks at pixel values. It only asks the image for the
//! region under each tag slot and hands that view to the caller, so any
//! buffer that can answer "give me rows a..b, columns c..d" works.

use std::ops::Range;

use crate::board::BoundingBox;

/// An image-like buffer that can hand out rectangular sub-views
pub trait RegionSource {
    /// The view type returned for a region
    type Region<'a>
    where
        Self: 'a;

    /// `(height, width)` in pixels
    fn dimensions(&self) -> (usize, usize);

    /// The sub-view covering `rows × cols`, clamped to the image bounds
    fn region(&self, rows: Range<usize>, cols: Range<usize>) -> Self::Region<'_>;
}

/// An image known only by its size
///
/// Regions are the clamped bounding boxes themselves. Useful when the
/// caller reads the pixels through some other handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameExtent {
    pub height: usize,
    pub width: usize,
}

impl FrameExtent {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }
}

impl RegionSource for FrameExtent {
    type Region<'a> = BoundingBox;

    fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn region(&self, rows: Range<usize>, cols: Range<usize>) -> BoundingBox {
        BoundingBox::new(rows.start, rows.end, cols.start, cols.end)
            .clamp_to(self.height, self.width)
    }
}

/// An owned, row-major pixel buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T> Raster<T> {
    /// Wrap a row-major buffer; `None` if its length is not `height * width`
    pub fn from_vec(height: usize, width: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == height * width).then_some(Self {
            height,
            width,
            data,
        })
    }

    /// Build a buffer by evaluating `f(row, col)` for every pixel
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            height,
            width,
            data,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.data.get(row * self.width + col)
        } else {
            None
        }
    }

    fn row_slice(&self, row: usize, cols: Range<usize>) -> &[T] {
        let start = row * self.width;
        &self.data[start + cols.start..start + cols.end]
    }
}

impl<T> RegionSource for Raster<T> {
    type Region<'a>
        = RasterView<'a, T>
    where
        T: 'a;

    fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn region(&self, rows: Range<usize>, cols: Range<usize>) -> RasterView<'_, T> {
        RasterView {
            raster: self,
            bounds: BoundingBox::new(rows.start, rows.end, cols.start, cols.end)
                .clamp_to(self.height, self.width),
        }
    }
}

/// A borrowed rectangular window into a [`Raster`]
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a, T> {
    raster: &'a Raster<T>,
    bounds: BoundingBox,
}

impl<'a, T> RasterView<'a, T> {
    /// The window in the parent image's coordinates, after clamping
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn height(&self) -> usize {
        self.bounds.height()
    }

    pub fn width(&self) -> usize {
        self.bounds.width()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Pixel at `(row, col)` relative to the window's top-left corner
    pub fn get(&self, row: usize, col: usize) -> Option<&'a T> {
        if row < self.height() && col < self.width() {
            self.raster
                .get(self.bounds.row_start + row, self.bounds.col_start + col)
        } else {
            None
        }
    }

    /// Rows of the window as slices
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        let raster = self.raster;
        let cols = self.bounds.cols();
        self.bounds
            .rows()
            .map(move |row| raster.row_slice(row, cols.clone()))
    }
}
