//! Rectangle and point math for observation geometry.
//!
//! Backends report locations in a normalized unit space whose origin sits at
//! the lower-left corner of the image, `y` growing upward. Raster tooling
//! expects integer pixel rects with a top-left origin, so conversion flips
//! the vertical axis before rounding and clamping to the image bounds.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in normalized image space.
///
/// `x` and `y` locate the lower-left corner; all fields nominally lie in
/// `[0.0, 1.0]`, though backends occasionally return rects that poke past the
/// image edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NormalizedRect {
    /// Lower-left corner, horizontal.
    pub x: f64,
    /// Lower-left corner, vertical (measured from the bottom edge).
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl NormalizedRect {
    /// Convenience constructor.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in normalized units. Used to rank observations by size.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Converts to an integer pixel rect with a top-left origin.
    ///
    /// Edges are projected into pixel space, rounded, then clamped to the
    /// image. Returns `None` when any field is non-finite, the extents are
    /// not positive, or nothing remains inside the image after clamping.
    pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }

        let w = f64::from(image_width);
        let h = f64::from(image_height);

        // Flip the vertical axis: normalized y measures from the bottom.
        let left = (self.x * w).round() as i64;
        let right = ((self.x + self.width) * w).round() as i64;
        let top = ((1.0 - self.y - self.height) * h).round() as i64;
        let bottom = ((1.0 - self.y) * h).round() as i64;

        let left = left.clamp(0, i64::from(image_width));
        let right = right.clamp(0, i64::from(image_width));
        let top = top.clamp(0, i64::from(image_height));
        let bottom = bottom.clamp(0, i64::from(image_height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// An integer rectangle in pixel space with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels, always positive.
    pub width: u32,
    /// Height in pixels, always positive.
    pub height: u32,
}

/// A point in normalized image space with a lower-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NormalizedPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, measured from the bottom edge.
    pub y: f64,
}

impl NormalizedPoint {
    /// Convenience constructor.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts to pixel coordinates with a top-left origin.
    ///
    /// The result is rounded and clamped to the image, so it always lands in
    /// `[0, width] x [0, height]`. Returns `None` for non-finite input.
    pub fn to_pixel(&self, image_width: u32, image_height: u32) -> Option<(u32, u32)> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return None;
        }
        let px = (self.x * f64::from(image_width)).round() as i64;
        let py = ((1.0 - self.y) * f64::from(image_height)).round() as i64;
        Some((
            px.clamp(0, i64::from(image_width)) as u32,
            py.clamp(0, i64::from(image_height)) as u32,
        ))
    }
}

/// Picks the item with the largest normalized area, first wins on ties.
///
/// Returns `None` for an empty slice.
pub fn largest_by_area<T, F>(items: &[T], rect_of: F) -> Option<&T>
where
    F: Fn(&T) -> &NormalizedRect,
{
    items.iter().fold(None, |best, item| match best {
        None => Some(item),
        Some(current) if rect_of(item).area() > rect_of(current).area() => Some(item),
        Some(current) => Some(current),
    })
}
